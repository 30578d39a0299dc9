//! Request-driven sort map construction.
//!
//! Sorting is the conservative half of the compiler: nothing here ever
//! fails. Unrecognized directions normalize to ascending and absent
//! parameters simply leave the field unsorted.
//!
//! Query parameter name, preserved for wire compatibility:
//! `sorting_<queryKey>_order`.

use crate::criteria::Direction;
use crate::params::QueryParams;
use crate::schema::ModelSchema;
use indexmap::IndexMap;
use serde::Serialize;

/// Prefix for sort parameters.
pub const SORT_PARAM_PREFIX: &str = "sorting_";
/// Suffix for the direction parameter.
pub const ORDER_PARAM_SUFFIX: &str = "_order";

/// Column-keyed sort directions.
///
/// Keyed by `db_column`, last write wins; iteration follows insertion
/// order so ORDER BY terms come out in schema declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SortMap {
    entries: IndexMap<String, Direction>,
}

impl SortMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The declared ordering: every sort-tagged field with its tag's
    /// default direction, in declaration order.
    ///
    /// This reproduces the behavior of always-on declared sorting for
    /// callers that want a stable ordering when the request asks for
    /// none; `build_sort_map` itself only enrolls fields the request
    /// names.
    pub fn defaults(schema: &ModelSchema) -> Self {
        let mut map = Self::new();
        for directive in schema.sort_directives() {
            map.insert(directive.db_column.clone(), directive.default_order);
        }
        map
    }

    /// Set the direction for `column`, replacing any existing one.
    pub fn insert<S: Into<String>>(&mut self, column: S, direction: Direction) {
        self.entries.insert(column.into(), direction);
    }

    /// Direction for `column`, if present.
    pub fn get(&self, column: &str) -> Option<Direction> {
        self.entries.get(column).copied()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Direction)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of sorted columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no sorting resolved.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build a `SortMap` from the request's query parameters.
///
/// A field is enrolled only when `sorting_<key>_order` is present and
/// non-empty; its value selects the direction, and anything that is not
/// `ASC`/`DESC` (any case) normalizes to ascending. Never errors.
pub fn build_sort_map(schema: &ModelSchema, params: &QueryParams) -> SortMap {
    let mut map = SortMap::new();

    for directive in schema.sort_directives() {
        let order_key = format!(
            "{SORT_PARAM_PREFIX}{}{ORDER_PARAM_SUFFIX}",
            directive.query_key
        );
        let raw = params.get(&order_key).unwrap_or("");
        if raw.is_empty() {
            continue;
        }
        map.insert(directive.db_column.clone(), Direction::parse_or_asc(raw));
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, ModelSchema};

    fn schema() -> ModelSchema {
        ModelSchema::builder("users")
            .field(Field::new("UserLogin").column("user_login").sort("login"))
            .field(Field::new("CreatedAt").sort("created,order=DESC"))
            .field(Field::new("Email"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_absent_params_produce_no_entries() {
        let map = build_sort_map(&schema(), &QueryParams::new());
        assert!(map.is_empty());
    }

    #[test]
    fn test_param_driven_presence() {
        let params = QueryParams::from_pairs([("sorting_login_order", "desc")]);
        let map = build_sort_map(&schema(), &params);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("user_login"), Some(Direction::Desc));
        assert_eq!(map.get("created_at"), None);
    }

    #[test]
    fn test_invalid_direction_normalizes_to_asc() {
        let params = QueryParams::from_pairs([("sorting_created_order", "sideways")]);
        let map = build_sort_map(&schema(), &params);
        assert_eq!(map.get("created_at"), Some(Direction::Asc));
    }

    #[test]
    fn test_empty_direction_is_skipped() {
        let params = QueryParams::from_pairs([("sorting_login_order", "")]);
        let map = build_sort_map(&schema(), &params);
        assert!(map.is_empty());
    }

    #[test]
    fn test_defaults_follow_declaration() {
        let map = SortMap::defaults(&schema());
        let entries: Vec<_> = map.iter().collect();
        assert_eq!(
            entries,
            vec![
                ("user_login", Direction::Asc),
                ("created_at", Direction::Desc),
            ]
        );
    }

    #[test]
    fn test_builder_is_pure() {
        let params = QueryParams::from_pairs([
            ("sorting_login_order", "asc"),
            ("sorting_created_order", "desc"),
        ]);
        let schema = schema();
        assert_eq!(
            build_sort_map(&schema, &params),
            build_sort_map(&schema, &params)
        );
    }

    #[test]
    fn test_serializes_directions() {
        let params = QueryParams::from_pairs([("sorting_created_order", "desc")]);
        let map = build_sort_map(&schema(), &params);
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json, serde_json::json!({ "created_at": "DESC" }));
    }
}
