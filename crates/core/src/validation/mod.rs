//! Declarative payload validation.
//!
//! Rule sets are written as pipe-separated rule strings per field
//! (`"required|max:255"`), parsed once into a [`RuleSet`], and evaluated
//! against a JSON object. Evaluation is pure; `exists:` rules come back as
//! [`ReferenceCheck`]s for the storage layer to resolve.

pub mod evaluator;
pub mod normalize;
pub mod rules;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

pub use evaluator::{evaluate, Evaluation, ReferenceCheck};
pub use normalize::normalize_payload;
pub use rules::{FieldRules, Rule, RuleParseError, RuleSet};

/// Field name to ordered list of human-readable messages.
///
/// Fields are kept sorted by name; messages keep the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Human-readable attribute name used in messages (`is_active` -> `is active`).
pub fn attribute_name(field: &str) -> String {
    field.replace('_', " ")
}
