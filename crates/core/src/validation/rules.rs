//! Rule types and the rule-string parser.

use std::str::FromStr;

/// A single constraint applied to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Value must be present, non-null, non-empty.
    Required,
    /// Declares an optional field that may be sent as `null`.
    Nullable,
    /// Value must be a JSON string.
    String,
    /// Value must be one of `true`, `false`, `0`, `1`, `"0"`, `"1"`.
    Boolean,
    /// Value must be an integer or an integer-valued string.
    Integer,
    /// Value must be a JSON array.
    Array,
    /// Upper bound: characters for strings, value for numbers, items for arrays.
    Max(u64),
    /// Lower bound, mirroring `Max`. Negative bounds only apply to integers.
    Min(i64),
    /// String representation must be one of the listed values.
    In(Vec<String>),
    /// Value must match a date format. Only `Y` (four-digit year) is supported.
    DateFormat(String),
    /// Every referenced value must exist in `table.column` among live rows.
    Exists { table: String, column: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleParseError {
    #[error("Unknown rule '{0}'")]
    UnknownRule(String),

    #[error("Rule '{rule}' requires a parameter")]
    MissingParameter { rule: &'static str },

    #[error("Invalid parameter '{value}' for rule '{rule}'")]
    InvalidParameter { rule: &'static str, value: String },
}

impl FromStr for Rule {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, param) = match s.split_once(':') {
            Some((name, param)) => (name.trim(), Some(param.trim())),
            None => (s.trim(), None),
        };

        match name {
            "required" => Ok(Rule::Required),
            "nullable" => Ok(Rule::Nullable),
            "string" => Ok(Rule::String),
            "boolean" => Ok(Rule::Boolean),
            "integer" => Ok(Rule::Integer),
            "array" => Ok(Rule::Array),
            "max" => {
                let param = require_param("max", param)?;
                param
                    .parse::<u64>()
                    .map(Rule::Max)
                    .map_err(|_| RuleParseError::InvalidParameter {
                        rule: "max",
                        value: param.to_string(),
                    })
            }
            "min" => {
                let param = require_param("min", param)?;
                param
                    .parse::<i64>()
                    .map(Rule::Min)
                    .map_err(|_| RuleParseError::InvalidParameter {
                        rule: "min",
                        value: param.to_string(),
                    })
            }
            "in" => {
                let param = require_param("in", param)?;
                Ok(Rule::In(
                    param.split(',').map(|v| v.trim().to_string()).collect(),
                ))
            }
            "date_format" => {
                let param = require_param("date_format", param)?;
                if param != "Y" {
                    return Err(RuleParseError::InvalidParameter {
                        rule: "date_format",
                        value: param.to_string(),
                    });
                }
                Ok(Rule::DateFormat(param.to_string()))
            }
            "exists" => {
                let param = require_param("exists", param)?;
                let (table, column) = match param.split_once(',') {
                    Some((table, column)) => (table.trim(), column.trim()),
                    None => (param, "id"),
                };
                if !is_identifier(table) || !is_identifier(column) {
                    return Err(RuleParseError::InvalidParameter {
                        rule: "exists",
                        value: param.to_string(),
                    });
                }
                Ok(Rule::Exists {
                    table: table.to_string(),
                    column: column.to_string(),
                })
            }
            other => Err(RuleParseError::UnknownRule(other.to_string())),
        }
    }
}

fn require_param<'a>(
    rule: &'static str,
    param: Option<&'a str>,
) -> Result<&'a str, RuleParseError> {
    match param {
        Some(p) if !p.is_empty() => Ok(p),
        _ => Err(RuleParseError::MissingParameter { rule }),
    }
}

/// `exists:` targets are interpolated into SQL, so only plain identifiers pass.
fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !s.starts_with(|c: char| c.is_ascii_digit())
}

/// The rules declared for one field, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRules {
    pub field: String,
    pub rules: Vec<Rule>,
}

impl FieldRules {
    pub fn has(&self, rule: &Rule) -> bool {
        self.rules.contains(rule)
    }

    pub fn is_required(&self) -> bool {
        self.has(&Rule::Required)
    }
}

/// Immutable per-entity validation configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    fields: Vec<FieldRules>,
}

impl RuleSet {
    /// Parse `(field, "rule|rule:param")` pairs into a rule set.
    pub fn parse(declarations: &[(&str, &str)]) -> Result<Self, RuleParseError> {
        let fields = declarations
            .iter()
            .map(|(field, rules)| {
                let rules = rules
                    .split('|')
                    .filter(|r| !r.trim().is_empty())
                    .map(str::parse)
                    .collect::<Result<Vec<Rule>, _>>()?;
                Ok(FieldRules {
                    field: (*field).to_string(),
                    rules,
                })
            })
            .collect::<Result<Vec<_>, RuleParseError>>()?;
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldRules] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldRules> {
        self.fields.iter().find(|f| f.field == name)
    }

    /// Whether `name` is declared by this rule set.
    pub fn declares(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}
