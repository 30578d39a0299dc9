//! Instance-driven positional WHERE compilation.
//!
//! The second construction strategy over the same schema metadata: instead
//! of reading request parameters, it inspects a model instance's current
//! field values and emits a positional-parameter WHERE clause (`$1, $2,
//! ...`) plus the ordered argument list. Zero-valued fields are skipped.
//! Only scalar criteria are supported here; a directive declaring anything
//! else is a hard error rather than a silent skip — this path has no
//! request to be lenient with.

use crate::criteria::Criteria;
use crate::emit::escape_like_pattern;
use crate::error::FilterError;
use crate::schema::ModelSchema;
use sea_query::Value;

/// A scalar taken from a model instance's field.
///
/// Maps onto the `sea_query::Value` variants the positional arguments are
/// bound as. "Zero" follows the original semantics: empty text, zero
/// numbers and `false` all read as "field not set, skip it".
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl RecordValue {
    fn is_zero(&self) -> bool {
        match self {
            RecordValue::Text(s) => s.trim().is_empty(),
            RecordValue::Int(n) => *n == 0,
            RecordValue::Float(x) => *x == 0.0,
            RecordValue::Bool(b) => !b,
        }
    }

    fn into_value(self) -> Value {
        match self {
            RecordValue::Text(s) => Value::from(s),
            RecordValue::Int(n) => Value::from(n),
            RecordValue::Float(x) => Value::from(x),
            RecordValue::Bool(b) => Value::from(b),
        }
    }

    /// Textual rendering used inside LIKE patterns.
    fn pattern_text(&self) -> String {
        match self {
            RecordValue::Text(s) => s.trim().to_string(),
            RecordValue::Int(n) => n.to_string(),
            RecordValue::Float(x) => x.to_string(),
            RecordValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for RecordValue {
    fn from(value: &str) -> Self {
        RecordValue::Text(value.to_string())
    }
}

impl From<String> for RecordValue {
    fn from(value: String) -> Self {
        RecordValue::Text(value)
    }
}

impl From<i32> for RecordValue {
    fn from(value: i32) -> Self {
        RecordValue::Int(i64::from(value))
    }
}

impl From<i64> for RecordValue {
    fn from(value: i64) -> Self {
        RecordValue::Int(value)
    }
}

impl From<f64> for RecordValue {
    fn from(value: f64) -> Self {
        RecordValue::Float(value)
    }
}

impl From<bool> for RecordValue {
    fn from(value: bool) -> Self {
        RecordValue::Bool(value)
    }
}

/// A model type whose instances can drive positional WHERE compilation.
///
/// `schema()` returns the process-wide schema for the model (typically a
/// `once_cell::sync::Lazy` static); `field_values()` exposes the
/// instance's current values keyed by field identifier. `None` means the
/// field is unset and will be skipped.
pub trait FilterRecord {
    fn schema() -> &'static ModelSchema;

    fn field_values(&self) -> Vec<(&'static str, Option<RecordValue>)>;
}

/// Compile a record's set fields into a positional WHERE clause.
///
/// Walks `field_values()` in order; for each field with a filter
/// directive and a non-zero value, appends `column <op> $N` and pushes the
/// bound argument. Pattern criteria escape the value and wrap it in `%`
/// wildcards exactly like the map path.
///
/// Returns the clause including its `WHERE ` prefix, or an empty string
/// (and no arguments) when nothing qualified.
///
/// # Errors
///
/// `FilterError::UnknownCriteria` when a qualifying field's directive
/// declares a criteria outside `eq`/`gt`/`lt`/`ilike`/`like`.
pub fn build_where_clause<R: FilterRecord>(record: &R) -> Result<(String, Vec<Value>), FilterError> {
    let schema = R::schema();
    let mut conditions: Vec<String> = Vec::new();
    let mut args: Vec<Value> = Vec::new();

    for (ident, value) in record.field_values() {
        let Some(directive) = schema.filter_directive_for(ident) else {
            continue;
        };
        let Some(value) = value else {
            continue;
        };
        if value.is_zero() {
            continue;
        }

        let column = &directive.db_column;
        let index = args.len() + 1;
        match directive.default_criteria.resolve() {
            Criteria::Equals => {
                conditions.push(format!("{column} = ${index}"));
                args.push(value.into_value());
            }
            Criteria::Gt => {
                conditions.push(format!("{column} > ${index}"));
                args.push(value.into_value());
            }
            Criteria::Lt => {
                conditions.push(format!("{column} < ${index}"));
                args.push(value.into_value());
            }
            Criteria::ILike => {
                conditions.push(format!("{column} ILIKE ${index}"));
                args.push(Value::from(pattern_arg(&value)));
            }
            Criteria::Like => {
                conditions.push(format!("{column} LIKE ${index}"));
                args.push(Value::from(pattern_arg(&value)));
            }
            other => {
                return Err(FilterError::UnknownCriteria {
                    token: other.as_token().to_string(),
                    field: ident.to_string(),
                });
            }
        }
    }

    if conditions.is_empty() {
        return Ok((String::new(), Vec::new()));
    }
    Ok((format!("WHERE {}", conditions.join(" AND ")), args))
}

fn pattern_arg(value: &RecordValue) -> String {
    format!("%{}%", escape_like_pattern(&value.pattern_text()))
}
