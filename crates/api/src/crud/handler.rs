use std::marker::PhantomData;

use catalog_core::error::CoreError;
use catalog_core::types::DbId;
use catalog_core::validation::{evaluate, normalize_payload, RuleSet};
use catalog_db::repositories::{ReferenceRepo, Resource};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// List / create / read-one / update / delete over one resource type.
///
/// Stateless; construct one per request.
pub struct ResourceHandler<R> {
    _resource: PhantomData<fn() -> R>,
}

impl<R> Default for ResourceHandler<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for ResourceHandler<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for ResourceHandler<R> {}

impl<R> ResourceHandler<R> {
    pub const fn new() -> Self {
        Self {
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceHandler<R> {
    /// Every live row in creation order, plus soft-deleted rows on request.
    pub async fn list(&self, pool: &PgPool, with_deleted: bool) -> AppResult<Vec<R::Row>> {
        Ok(R::list(pool, with_deleted).await?)
    }

    pub async fn create(&self, pool: &PgPool, payload: Value) -> AppResult<R::Row> {
        let validated = self.validate(pool, R::store_rules(), payload).await?;
        let input: R::Create = from_validated(&validated)?;
        let row = R::create(pool, &input).await?;
        tracing::info!(entity = R::ENTITY, id = %R::key(&row), "Created");
        Ok(row)
    }

    pub async fn read_one(&self, pool: &PgPool, id: &str, with_deleted: bool) -> AppResult<R::Row> {
        let id = self.parse_id(id)?;
        let row = if with_deleted {
            R::find_by_id_include_deleted(pool, id).await?
        } else {
            R::find_by_id(pool, id).await?
        };
        row.ok_or_else(|| not_found::<R>(id))
    }

    /// Apply the validated subset of `payload` to a live row.
    ///
    /// An unknown id is reported before the payload is validated.
    pub async fn update(&self, pool: &PgPool, id: &str, payload: Value) -> AppResult<R::Row> {
        let id = self.find_live(pool, id).await?;
        let validated = self.validate(pool, R::update_rules(), payload).await?;
        let input: R::Update = from_validated(&validated)?;
        let row = R::update(pool, id, &input)
            .await?
            .ok_or_else(|| not_found::<R>(id))?;
        tracing::info!(entity = R::ENTITY, %id, "Updated");
        Ok(row)
    }

    /// Soft-delete a live row.
    pub async fn delete(&self, pool: &PgPool, id: &str) -> AppResult<()> {
        let id = self.parse_id(id)?;
        if !R::soft_delete(pool, id).await? {
            return Err(not_found::<R>(id));
        }
        tracing::info!(entity = R::ENTITY, %id, "Soft-deleted");
        Ok(())
    }

    /// Normalize and validate a request body against `rules`.
    ///
    /// `exists:` references are resolved against live rows. Returns only
    /// the declared fields present in the payload, coerced to their
    /// canonical JSON types.
    pub async fn validate(
        &self,
        pool: &PgPool,
        rules: &RuleSet,
        payload: Value,
    ) -> AppResult<Map<String, Value>> {
        let Value::Object(data) = normalize_payload(payload) else {
            return Err(AppError::BadRequest(
                "Request body must be a JSON object".to_string(),
            ));
        };

        let mut evaluation = evaluate(rules, &data);
        for check in std::mem::take(&mut evaluation.references) {
            if !ReferenceRepo::all_exist(pool, &check.table, &check.column, &check.values).await? {
                evaluation.reject_reference(&check);
            }
        }

        let validated = evaluation.finish()?;
        Ok(validated)
    }

    /// Resolve a path identifier to the id of a live row.
    pub async fn find_live(&self, pool: &PgPool, id: &str) -> AppResult<DbId> {
        let id = self.parse_id(id)?;
        match R::find_by_id(pool, id).await? {
            Some(_) => Ok(id),
            None => Err(not_found::<R>(id)),
        }
    }

    /// Malformed identifiers cannot match any row, so they are not-found.
    pub fn parse_id(&self, id: &str) -> AppResult<DbId> {
        id.parse::<DbId>()
            .map_err(|_| AppError::Core(CoreError::not_found(R::ENTITY, id)))
    }
}

pub(crate) fn not_found<R: Resource>(id: DbId) -> AppError {
    AppError::Core(CoreError::not_found(R::ENTITY, id))
}

/// Build a DTO from a validated field map.
pub(crate) fn from_validated<T: DeserializeOwned>(validated: &Map<String, Value>) -> AppResult<T> {
    serde_json::from_value(Value::Object(validated.clone()))
        .map_err(|e| AppError::BadRequest(format!("Invalid payload: {e}")))
}
