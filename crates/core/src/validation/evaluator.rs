//! Rule evaluator. Pure logic, no database access.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Number, Value};

use super::rules::{FieldRules, Rule, RuleSet};
use super::{attribute_name, ValidationErrors};
use crate::error::CoreError;

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}$").expect("valid regex"));

/// A storage lookup requested by an `exists:` rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCheck {
    pub field: String,
    pub table: String,
    pub column: String,
    /// Scalar values to look up (array elements are flattened).
    pub values: Vec<Value>,
}

impl ReferenceCheck {
    /// Message recorded when any of the values does not resolve.
    pub fn failure_message(&self) -> String {
        format!("The selected {} is invalid.", attribute_name(&self.field))
    }
}

/// Outcome of evaluating a rule set against one payload.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub errors: ValidationErrors,
    /// Declared fields present in the payload, coerced to their canonical type.
    pub validated: Map<String, Value>,
    /// Pending `exists:` lookups; the caller resolves them before [`Self::finish`].
    pub references: Vec<ReferenceCheck>,
}

impl Evaluation {
    /// Record a failed reference lookup.
    pub fn reject_reference(&mut self, check: &ReferenceCheck) {
        self.errors.add(&check.field, check.failure_message());
    }

    /// Produce the validated payload, or the collected errors.
    pub fn finish(self) -> Result<Map<String, Value>, CoreError> {
        if self.errors.is_empty() {
            Ok(self.validated)
        } else {
            Err(CoreError::Validation(self.errors))
        }
    }
}

/// Evaluate every rule in `rules` against `data`.
///
/// Keys not declared by the rule set are dropped from the validated output.
/// A missing or null value is only checked by `required`.
pub fn evaluate(rules: &RuleSet, data: &Map<String, Value>) -> Evaluation {
    let mut evaluation = Evaluation::default();

    for field in rules.fields() {
        let value = data.get(&field.field);

        if is_empty(value) {
            if field.is_required() {
                evaluation.errors.add(
                    &field.field,
                    format!("The {} field is required.", attribute_name(&field.field)),
                );
            } else if let Some(Value::Null) = value {
                evaluation.validated.insert(field.field.clone(), Value::Null);
            }
            continue;
        }
        let Some(value) = value else { continue };

        let mut failed = false;
        for rule in &field.rules {
            if let Rule::Exists { table, column } = rule {
                evaluation.references.push(ReferenceCheck {
                    field: field.field.clone(),
                    table: table.clone(),
                    column: column.clone(),
                    values: reference_values(value),
                });
                continue;
            }
            if let Some(message) = check_rule(rule, field, value) {
                evaluation.errors.add(&field.field, message);
                failed = true;
            }
        }

        if !failed {
            evaluation
                .validated
                .insert(field.field.clone(), coerce(field, value));
        }
    }

    evaluation
}

fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        _ => false,
    }
}

fn check_rule(rule: &Rule, field: &FieldRules, value: &Value) -> Option<String> {
    let attr = attribute_name(&field.field);
    match rule {
        Rule::Required | Rule::Nullable | Rule::Exists { .. } => None,
        Rule::String => (!value.is_string()).then(|| format!("The {attr} must be a string.")),
        Rule::Boolean => as_bool(value)
            .is_none()
            .then(|| format!("The {attr} field must be true or false.")),
        Rule::Integer => as_integer(value)
            .is_none()
            .then(|| format!("The {attr} must be an integer.")),
        Rule::Array => (!value.is_array()).then(|| format!("The {attr} must be an array.")),
        Rule::Max(max) => check_max(*max, field, value),
        Rule::Min(min) => check_min(*min, field, value),
        Rule::In(allowed) => (!scalar_repr(value).is_some_and(|s| allowed.contains(&s)))
            .then(|| format!("The selected {attr} is invalid.")),
        Rule::DateFormat(format) => (!scalar_repr(value).is_some_and(|s| YEAR_RE.is_match(&s)))
            .then(|| format!("The {attr} does not match the format {format}.")),
    }
}

fn check_max(max: u64, field: &FieldRules, value: &Value) -> Option<String> {
    let attr = attribute_name(&field.field);
    match value {
        // Integer-typed fields compare by value even when sent as a string.
        _ if field.has(&Rule::Integer) => {
            let n = as_integer(value)?;
            (n > 0 && n as u64 > max)
                .then(|| format!("The {attr} may not be greater than {max}."))
        }
        Value::String(s) => (s.chars().count() as u64 > max)
            .then(|| format!("The {attr} may not be greater than {max} characters.")),
        Value::Number(n) => n
            .as_f64()
            .filter(|n| *n > max as f64)
            .map(|_| format!("The {attr} may not be greater than {max}.")),
        Value::Array(items) => (items.len() as u64 > max)
            .then(|| format!("The {attr} may not have more than {max} items.")),
        _ => None,
    }
}

fn check_min(min: i64, field: &FieldRules, value: &Value) -> Option<String> {
    let attr = attribute_name(&field.field);
    match value {
        _ if field.has(&Rule::Integer) => {
            let n = as_integer(value)?;
            (n < min).then(|| format!("The {attr} must be at least {min}."))
        }
        Value::String(s) => ((s.chars().count() as i64) < min)
            .then(|| format!("The {attr} must be at least {min} characters.")),
        Value::Number(n) => n
            .as_f64()
            .filter(|n| *n < min as f64)
            .map(|_| format!("The {attr} must be at least {min}.")),
        Value::Array(items) => ((items.len() as i64) < min)
            .then(|| format!("The {attr} must have at least {min} items.")),
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.as_str() {
            "0" => Some(false),
            "1" => Some(true),
            _ => None,
        },
        _ => None,
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse::<i64>().ok(),
        _ => None,
    }
}

/// String form used by `in:` and `date_format:` comparisons.
fn scalar_repr(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some("0".to_string()),
        _ => None,
    }
}

fn reference_values(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}

/// Convert a value that passed its rules into the field's canonical JSON type.
fn coerce(field: &FieldRules, value: &Value) -> Value {
    if field.has(&Rule::Boolean) {
        if let Some(b) = as_bool(value) {
            return Value::Bool(b);
        }
    }
    let integer_like = field.has(&Rule::Integer)
        || field.rules.iter().any(|r| matches!(r, Rule::DateFormat(_)));
    if integer_like {
        if let Some(n) = as_integer(value) {
            return Value::Number(Number::from(n));
        }
    }
    let enumerated = field.rules.iter().any(|r| matches!(r, Rule::In(_)));
    if enumerated && value.is_number() {
        if let Some(s) = scalar_repr(value) {
            return Value::String(s);
        }
    }
    value.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn rules(declarations: &[(&str, &str)]) -> RuleSet {
        RuleSet::parse(declarations).unwrap()
    }

    fn data(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test data must be an object"),
        }
    }

    fn video_rules() -> RuleSet {
        rules(&[
            ("title", "required|max:255"),
            ("description", "required"),
            ("year_launched", "required|date_format:Y"),
            ("opened", "boolean"),
            ("rating", "required|in:L,10,12,14,16,18"),
            ("duration", "required|integer"),
            ("categories_id", "required|array|exists:categories,id"),
            ("genres_id", "required|array|exists:genres,id"),
        ])
    }

    #[test]
    fn required_fails_on_missing_field() {
        let eval = evaluate(&rules(&[("name", "required|max:255")]), &data(json!({})));
        assert_eq!(
            eval.errors.get("name").unwrap(),
            ["The name field is required."]
        );
    }

    #[test]
    fn required_fails_on_null_and_empty_array() {
        let set = rules(&[("name", "required"), ("ids", "required|array")]);
        let eval = evaluate(&set, &data(json!({"name": null, "ids": []})));
        assert!(eval.errors.contains_field("name"));
        assert_eq!(eval.errors.get("ids").unwrap(), ["The ids field is required."]);
    }

    #[test]
    fn required_failure_skips_other_rules() {
        let eval = evaluate(&rules(&[("name", "required|max:3")]), &data(json!({"name": ""})));
        assert_eq!(eval.errors.get("name").unwrap().len(), 1);
    }

    #[test]
    fn max_counts_characters() {
        let set = rules(&[("name", "required|max:255")]);
        let eval = evaluate(&set, &data(json!({"name": "a".repeat(256)})));
        assert_eq!(
            eval.errors.get("name").unwrap(),
            ["The name may not be greater than 255 characters."]
        );

        let eval = evaluate(&set, &data(json!({"name": "é".repeat(255)})));
        assert!(eval.errors.is_empty());
    }

    #[test]
    fn boolean_accepts_numeric_forms_and_coerces() {
        let set = rules(&[("is_active", "boolean")]);
        for (input, expected) in [
            (json!(true), true),
            (json!(0), false),
            (json!("1"), true),
            (json!("0"), false),
        ] {
            let eval = evaluate(&set, &data(json!({ "is_active": input })));
            assert!(eval.errors.is_empty());
            assert_eq!(eval.validated["is_active"], json!(expected));
        }
    }

    #[test]
    fn boolean_rejects_other_values() {
        let eval = evaluate(&rules(&[("is_active", "boolean")]), &data(json!({"is_active": "a"})));
        assert_eq!(
            eval.errors.get("is_active").unwrap(),
            ["The is active field must be true or false."]
        );
        assert!(!eval.validated.contains_key("is_active"));
    }

    #[test]
    fn optional_missing_field_is_omitted() {
        let eval = evaluate(&rules(&[("is_active", "boolean")]), &data(json!({})));
        assert!(eval.errors.is_empty());
        assert!(eval.validated.is_empty());
    }

    #[test]
    fn optional_null_field_is_kept_as_null() {
        let set = rules(&[("name", "required"), ("description", "nullable")]);
        let eval = evaluate(&set, &data(json!({"name": "n", "description": null})));
        assert!(eval.errors.is_empty());
        assert_eq!(eval.validated["description"], Value::Null);
    }

    #[test]
    fn undeclared_keys_are_dropped() {
        let set = rules(&[("name", "required")]);
        let eval = evaluate(&set, &data(json!({"name": "n", "id": "x", "deleted_at": "now"})));
        assert_eq!(eval.validated.len(), 1);
        assert_eq!(eval.validated["name"], json!("n"));
    }

    #[test]
    fn integer_accepts_numeric_string() {
        let set = rules(&[("duration", "required|integer")]);
        let eval = evaluate(&set, &data(json!({"duration": "90"})));
        assert!(eval.errors.is_empty());
        assert_eq!(eval.validated["duration"], json!(90));

        let eval = evaluate(&set, &data(json!({"duration": 1.5})));
        assert_eq!(
            eval.errors.get("duration").unwrap(),
            ["The duration must be an integer."]
        );
    }

    #[test]
    fn year_format() {
        let set = rules(&[("year_launched", "required|date_format:Y")]);
        let eval = evaluate(&set, &data(json!({"year_launched": 2010})));
        assert!(eval.errors.is_empty());
        assert_eq!(eval.validated["year_launched"], json!(2010));

        let eval = evaluate(&set, &data(json!({"year_launched": "a"})));
        assert_eq!(
            eval.errors.get("year_launched").unwrap(),
            ["The year launched does not match the format Y."]
        );
    }

    #[test]
    fn in_compares_string_representation() {
        let set = rules(&[("rating", "required|in:L,10,12,14,16,18")]);
        let eval = evaluate(&set, &data(json!({"rating": 10})));
        assert!(eval.errors.is_empty());
        assert_eq!(eval.validated["rating"], json!("10"));

        let eval = evaluate(&set, &data(json!({"rating": 0})));
        assert_eq!(
            eval.errors.get("rating").unwrap(),
            ["The selected rating is invalid."]
        );
    }

    #[test]
    fn integer_enumeration_keeps_integer_type() {
        let set = rules(&[("type", "required|integer|in:1,2")]);
        let eval = evaluate(&set, &data(json!({"type": "2"})));
        assert!(eval.errors.is_empty());
        assert_eq!(eval.validated["type"], json!(2));

        let eval = evaluate(&set, &data(json!({"type": 3})));
        assert_eq!(eval.errors.get("type").unwrap(), ["The selected type is invalid."]);
    }

    #[test]
    fn integer_bounds_compare_by_value() {
        let set = rules(&[("duration", "required|integer|min:-2147483648|max:2147483647")]);

        let eval = evaluate(&set, &data(json!({"duration": 3_000_000_000_i64})));
        assert_eq!(
            eval.errors.get("duration").unwrap(),
            ["The duration may not be greater than 2147483647."]
        );

        let eval = evaluate(&set, &data(json!({"duration": "-3000000000"})));
        assert_eq!(
            eval.errors.get("duration").unwrap(),
            ["The duration must be at least -2147483648."]
        );

        let eval = evaluate(&set, &data(json!({"duration": 2_147_483_647})));
        assert!(eval.errors.is_empty());
    }

    #[test]
    fn min_counts_characters() {
        let eval = evaluate(&rules(&[("code", "string|min:3")]), &data(json!({"code": "ab"})));
        assert_eq!(
            eval.errors.get("code").unwrap(),
            ["The code must be at least 3 characters."]
        );
    }

    #[test]
    fn exists_produces_reference_checks() {
        let eval = evaluate(
            &video_rules(),
            &data(json!({
                "title": "t",
                "description": "d",
                "year_launched": 2010,
                "rating": "L",
                "duration": 90,
                "categories_id": ["a", "b"],
                "genres_id": ["c"],
            })),
        );
        assert!(eval.errors.is_empty());
        assert_eq!(eval.references.len(), 2);
        assert_eq!(eval.references[0].table, "categories");
        assert_eq!(eval.references[0].values, vec![json!("a"), json!("b")]);
        assert_eq!(eval.references[1].field, "genres_id");
    }

    #[test]
    fn array_rule_rejects_scalar() {
        let eval = evaluate(&video_rules(), &data(json!({"categories_id": "a"})));
        assert_eq!(
            eval.errors.get("categories_id").unwrap(),
            ["The categories id must be an array."]
        );
    }

    #[test]
    fn rejected_reference_fails_evaluation() {
        let mut eval = evaluate(
            &rules(&[("genres_id", "required|array|exists:genres,id")]),
            &data(json!({"genres_id": [100]})),
        );
        let check = eval.references[0].clone();
        eval.reject_reference(&check);
        let err = eval.finish().unwrap_err();
        assert_matches!(err, CoreError::Validation(ref errors)
            if errors.get("genres_id").unwrap() == ["The selected genres id is invalid."]);
    }

    #[test]
    fn finish_returns_validated_payload() {
        let eval = evaluate(&rules(&[("name", "required")]), &data(json!({"name": "ok"})));
        let validated = eval.finish().unwrap();
        assert_eq!(validated["name"], json!("ok"));
    }
}
