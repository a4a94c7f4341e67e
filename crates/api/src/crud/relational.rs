use async_trait::async_trait;
use catalog_core::types::DbId;
use catalog_db::repositories::Resource;
use serde_json::{Map, Value};
use sqlx::{PgConnection, PgPool};

use super::handler::{from_validated, not_found, ResourceHandler};
use crate::error::AppResult;

/// Association step run inside the write transaction of a relational resource.
#[async_trait]
pub trait RelationSync<R: Resource>: Send + Sync {
    /// Bring the associations of row `id` in line with `validated`.
    async fn sync(
        &self,
        conn: &mut PgConnection,
        id: DbId,
        validated: &Map<String, Value>,
    ) -> AppResult<()>;
}

/// [`ResourceHandler`] whose create and update also synchronise associations.
///
/// The row write and the sync step share one transaction. If the sync step
/// fails the transaction is rolled back and the row write is discarded.
pub struct RelationalHandler<R, S> {
    base: ResourceHandler<R>,
    sync: S,
}

impl<R: Resource, S: RelationSync<R>> RelationalHandler<R, S> {
    pub fn new(sync: S) -> Self {
        Self {
            base: ResourceHandler::new(),
            sync,
        }
    }

    /// The plain handler, for actions that never touch associations.
    pub fn base(&self) -> &ResourceHandler<R> {
        &self.base
    }

    pub async fn create(&self, pool: &PgPool, payload: Value) -> AppResult<R::Row> {
        let validated = self.base.validate(pool, R::store_rules(), payload).await?;
        let input: R::Create = from_validated(&validated)?;

        let mut tx = pool.begin().await?;
        let row = R::insert(&mut *tx, &input).await?;
        let id = R::key(&row);
        if let Err(err) = self.sync.sync(&mut *tx, id, &validated).await {
            tracing::warn!(entity = R::ENTITY, %id, error = %err, "Relation sync failed, rolling back create");
            tx.rollback().await?;
            return Err(err);
        }
        tx.commit().await?;

        tracing::info!(entity = R::ENTITY, %id, "Created with relations");
        Ok(row)
    }

    pub async fn update(&self, pool: &PgPool, id: &str, payload: Value) -> AppResult<R::Row> {
        let id = self.base.find_live(pool, id).await?;
        let validated = self.base.validate(pool, R::update_rules(), payload).await?;
        let input: R::Update = from_validated(&validated)?;

        let mut tx = pool.begin().await?;
        let Some(row) = R::apply_update(&mut *tx, id, &input).await? else {
            return Err(not_found::<R>(id));
        };
        if let Err(err) = self.sync.sync(&mut *tx, id, &validated).await {
            tracing::warn!(entity = R::ENTITY, %id, error = %err, "Relation sync failed, rolling back update");
            tx.rollback().await?;
            return Err(err);
        }
        tx.commit().await?;

        tracing::info!(entity = R::ENTITY, %id, "Updated with relations");
        Ok(row)
    }
}
