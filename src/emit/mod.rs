//! Clause emission onto a `sea_query::SelectStatement`.
//!
//! The emitter is the only stage that touches SQL. Every criteria maps to
//! a fixed predicate template; values are always bound, never
//! interpolated, and column identifiers are only emitted after passing
//! the schema's allow-list. There is no fallback template: a criteria the
//! table does not know cannot reach operator position.
//!
//! Wildcard handling for pattern criteria is order-sensitive: the
//! user-supplied value is escaped first (backslash doubled, then `_` and
//! `%`), and only then wrapped in `%...%`.

use crate::criteria::{Criteria, Direction};
use crate::error::FilterError;
use crate::filter::{FilterMap, FilterValue};
use crate::schema::ModelSchema;
use crate::sort::SortMap;
use sea_query::{Alias, Expr, ExprTrait, Func, Order, SelectStatement};

/// A hand-assembled filter condition.
///
/// The minimal entry point for callers that build conditions directly
/// instead of going through a request map; emitted through the same
/// fixed templates as everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCondition {
    pub column: String,
    pub criteria: Criteria,
    pub value: FilterValue,
}

impl FilterCondition {
    pub fn new<C: Into<String>>(column: C, criteria: Criteria, value: FilterValue) -> Self {
        Self {
            column: column.into(),
            criteria,
            value,
        }
    }
}

/// Append every filter-map entry as an AND-ed predicate.
///
/// # Errors
///
/// - `FilterError::UnknownColumn` when an entry's column is not declared
///   by the schema (the map was assembled by hand and bypassed it).
/// - `FilterError::ValueShape` when an entry's value shape does not match
///   its criteria (pair for `Between`, list for `In`, scalar otherwise).
pub fn apply_filter_map(
    stmt: &mut SelectStatement,
    schema: &ModelSchema,
    map: &FilterMap,
) -> Result<(), FilterError> {
    for (column, entry) in map.iter() {
        allow_column(schema, column)?;
        stmt.and_where(predicate(column, entry.criteria, &entry.value)?);
    }
    Ok(())
}

/// Append hand-assembled conditions as AND-ed predicates.
///
/// Unlike a `FilterMap`, a slice may name the same column more than once;
/// every condition is emitted. Same errors as [`apply_filter_map`].
pub fn apply_conditions(
    stmt: &mut SelectStatement,
    schema: &ModelSchema,
    conditions: &[FilterCondition],
) -> Result<(), FilterError> {
    for condition in conditions {
        allow_column(schema, &condition.column)?;
        stmt.and_where(predicate(
            &condition.column,
            condition.criteria,
            &condition.value,
        )?);
    }
    Ok(())
}

/// Append one ORDER BY term per sort-map entry, in map order.
///
/// Column identifiers cannot be parameter-bound, so they are validated
/// against the schema's declared set before emission.
///
/// # Errors
///
/// `FilterError::UnknownColumn` for a column outside the declared set.
pub fn apply_sort_map(
    stmt: &mut SelectStatement,
    schema: &ModelSchema,
    map: &SortMap,
) -> Result<(), FilterError> {
    for (column, direction) in map.iter() {
        allow_column(schema, column)?;
        let order = match direction {
            Direction::Asc => Order::Asc,
            Direction::Desc => Order::Desc,
        };
        stmt.order_by(Alias::new(column), order);
    }
    Ok(())
}

/// Escape `LIKE`/`ILIKE` wildcard characters in a user-supplied value.
///
/// Backslash is doubled before `_` and `%` are escaped; reversing that
/// order would re-escape the escapes.
pub fn escape_like_pattern(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('_', "\\_")
        .replace('%', "\\%")
}

fn allow_column(schema: &ModelSchema, column: &str) -> Result<(), FilterError> {
    if schema.declares_column(column) {
        Ok(())
    } else {
        Err(FilterError::UnknownColumn {
            column: column.to_string(),
        })
    }
}

/// Fixed predicate template for one criteria/value pairing.
fn predicate(
    column: &str,
    criteria: Criteria,
    value: &FilterValue,
) -> Result<Expr, FilterError> {
    use sea_query::extension::postgres::PgExpr;
    let col = Expr::col(Alias::new(column));
    match (criteria.resolve(), value) {
        (Criteria::Equals, FilterValue::Scalar(v)) => Ok(col.eq(v.clone())),
        (Criteria::Gt, FilterValue::Scalar(v)) => Ok(col.gt(v.clone())),
        (Criteria::Lt, FilterValue::Scalar(v)) => Ok(col.lt(v.clone())),
        (Criteria::Like, FilterValue::Scalar(v)) => Ok(col.like(wrapped_pattern(v))),
        (Criteria::ILike, FilterValue::Scalar(v)) => Ok(col.ilike(wrapped_pattern(v))),
        (Criteria::Date, FilterValue::Scalar(v)) => {
            let date_of_col = Func::cust(Alias::new("DATE")).arg(col);
            Ok(Expr::expr(date_of_col).eq(v.clone()))
        }
        (Criteria::Between, FilterValue::Range(low, high)) => {
            Ok(col.between(low.clone(), high.clone()))
        }
        (Criteria::In, FilterValue::List(values)) => Ok(col.is_in(values.iter().cloned())),
        (criteria, _) => Err(FilterError::ValueShape {
            column: column.to_string(),
            criteria,
        }),
    }
}

/// Escape the value, then add the surrounding `%` wildcards.
fn wrapped_pattern(value: &str) -> String {
    format!("%{}%", escape_like_pattern(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterEntry;
    use crate::schema::{Field, ModelSchema};
    use sea_query::{PostgresQueryBuilder, Query, Value};

    fn schema() -> ModelSchema {
        ModelSchema::builder("users")
            .field(Field::new("UserLogin").column("user_login").filter("login"))
            .field(Field::new("Age").filter("age"))
            .field(Field::new("Status").filter("status"))
            .field(Field::new("CreatedAt").sort("created"))
            .build()
            .unwrap()
    }

    fn select() -> SelectStatement {
        let mut stmt = Query::select();
        stmt.column(sea_query::Asterisk).from(Alias::new("users"));
        stmt
    }

    #[test]
    fn test_escape_doubles_backslash_first() {
        assert_eq!(escape_like_pattern("a_b"), "a\\_b");
        assert_eq!(escape_like_pattern("100%"), "100\\%");
        assert_eq!(escape_like_pattern("a\\_b"), "a\\\\\\_b");
    }

    #[test]
    fn test_like_pattern_wraps_after_escaping() {
        let mut map = FilterMap::new();
        map.insert(
            "user_login",
            FilterEntry {
                criteria: Criteria::ILike,
                value: FilterValue::Scalar("a_b".to_string()),
            },
        );
        let mut stmt = select();
        apply_filter_map(&mut stmt, &schema(), &map).unwrap();
        let (sql, values) = stmt.build(PostgresQueryBuilder);

        assert!(sql.contains("ILIKE"), "sql was: {sql}");
        // The added wildcards stay live; the user's underscore does not.
        assert_eq!(values.0[0], Value::from("%a\\_b%"));
    }

    #[test]
    fn test_equals_binds_value() {
        let mut map = FilterMap::new();
        map.insert(
            "user_login",
            FilterEntry {
                criteria: Criteria::Equals,
                value: FilterValue::Scalar("alice".to_string()),
            },
        );
        let mut stmt = select();
        apply_filter_map(&mut stmt, &schema(), &map).unwrap();
        let (sql, values) = stmt.build(PostgresQueryBuilder);

        assert!(sql.contains(r#""user_login" = $1"#), "sql was: {sql}");
        assert!(!sql.contains("alice"), "value must be bound, not inlined");
        assert_eq!(values.0[0], Value::from("alice"));
    }

    #[test]
    fn test_date_wraps_column_in_date_function() {
        let mut map = FilterMap::new();
        map.insert(
            "user_login",
            FilterEntry {
                criteria: Criteria::Date,
                value: FilterValue::Scalar("2024-12-25".to_string()),
            },
        );
        let mut stmt = select();
        apply_filter_map(&mut stmt, &schema(), &map).unwrap();
        let (sql, values) = stmt.build(PostgresQueryBuilder);

        assert!(sql.contains(r#"DATE("user_login") = $1"#), "sql was: {sql}");
        assert_eq!(values.0[0], Value::from("2024-12-25"));
    }

    #[test]
    fn test_between_binds_bounds_in_caller_order() {
        let mut map = FilterMap::new();
        map.insert(
            "age",
            FilterEntry {
                criteria: Criteria::Between,
                value: FilterValue::Range("20".to_string(), "10".to_string()),
            },
        );
        let mut stmt = select();
        apply_filter_map(&mut stmt, &schema(), &map).unwrap();
        let (sql, values) = stmt.build(PostgresQueryBuilder);

        assert!(sql.contains("BETWEEN"), "sql was: {sql}");
        // Reversed bounds are preserved, not reordered.
        assert_eq!(values.0[0], Value::from("20"));
        assert_eq!(values.0[1], Value::from("10"));
    }

    #[test]
    fn test_in_binds_every_value() {
        let mut map = FilterMap::new();
        map.insert(
            "status",
            FilterEntry {
                criteria: Criteria::In,
                value: FilterValue::List(vec!["a".to_string(), "b".to_string()]),
            },
        );
        let mut stmt = select();
        apply_filter_map(&mut stmt, &schema(), &map).unwrap();
        let (sql, values) = stmt.build(PostgresQueryBuilder);

        assert!(sql.contains(r#""status" IN ($1, $2)"#), "sql was: {sql}");
        assert_eq!(values.0.len(), 2);
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let mut map = FilterMap::new();
        map.insert(
            "is_admin; --",
            FilterEntry {
                criteria: Criteria::Equals,
                value: FilterValue::Scalar("t".to_string()),
            },
        );
        let err = apply_filter_map(&mut select(), &schema(), &map).unwrap_err();
        assert!(matches!(err, FilterError::UnknownColumn { .. }));
    }

    #[test]
    fn test_value_shape_mismatch_is_rejected() {
        let mut map = FilterMap::new();
        map.insert(
            "age",
            FilterEntry {
                criteria: Criteria::Between,
                value: FilterValue::Scalar("10".to_string()),
            },
        );
        let err = apply_filter_map(&mut select(), &schema(), &map).unwrap_err();
        assert_eq!(
            err,
            FilterError::ValueShape {
                column: "age".to_string(),
                criteria: Criteria::Between,
            }
        );
    }

    #[test]
    fn test_order_by_allow_list() {
        let mut map = SortMap::new();
        map.insert("created_at", Direction::Desc);
        let mut stmt = select();
        apply_sort_map(&mut stmt, &schema(), &map).unwrap();
        let (sql, _) = stmt.build(PostgresQueryBuilder);
        assert!(sql.contains(r#"ORDER BY "created_at" DESC"#), "sql was: {sql}");

        let mut map = SortMap::new();
        map.insert("pg_sleep(10)", Direction::Asc);
        let err = apply_sort_map(&mut select(), &schema(), &map).unwrap_err();
        assert!(matches!(err, FilterError::UnknownColumn { .. }));
    }

    #[test]
    fn test_conditions_allow_repeated_columns() {
        let conditions = vec![
            FilterCondition::new(
                "age",
                Criteria::Gt,
                FilterValue::Scalar("10".to_string()),
            ),
            FilterCondition::new(
                "age",
                Criteria::Lt,
                FilterValue::Scalar("20".to_string()),
            ),
        ];
        let mut stmt = select();
        apply_conditions(&mut stmt, &schema(), &conditions).unwrap();
        let (sql, values) = stmt.build(PostgresQueryBuilder);

        assert!(sql.contains(r#""age" > $1"#), "sql was: {sql}");
        assert!(sql.contains(r#""age" < $2"#), "sql was: {sql}");
        assert_eq!(values.0.len(), 2);
    }
}
