//! Request-driven filter map construction.
//!
//! `build_filter_map` walks a schema's filter directives against the
//! request's query parameters and produces the column-keyed intermediate
//! representation the clause emitter consumes. Each directive is processed
//! independently: one field's unusable value never affects another, and
//! only a malformed range aborts the build.
//!
//! Query parameter names, preserved for wire compatibility:
//! value `filter_<queryKey>`, criteria override
//! `filter_<queryKey>_criteria`.

pub(crate) mod coerce;

use crate::criteria::Criteria;
use crate::error::FilterError;
use crate::params::QueryParams;
use crate::schema::ModelSchema;
use indexmap::IndexMap;
use serde::Serialize;

/// Prefix for filter value parameters.
pub const FILTER_PARAM_PREFIX: &str = "filter_";
/// Suffix for criteria override parameters.
pub const CRITERIA_PARAM_SUFFIX: &str = "_criteria";

/// A coerced filter value: scalar, range bounds, or membership list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Scalar(String),
    Range(String, String),
    List(Vec<String>),
}

/// One resolved filter: effective criteria plus the coerced value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterEntry {
    pub criteria: Criteria,
    pub value: FilterValue,
}

/// Column-keyed filter entries.
///
/// Keyed by `db_column`; inserting the same column twice overwrites
/// (last write wins). Iteration follows first-insertion order, which is
/// schema declaration order for built maps, so emission is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FilterMap {
    entries: IndexMap<String, FilterEntry>,
}

impl FilterMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry for `column`, replacing any existing one.
    pub fn insert<S: Into<String>>(&mut self, column: S, entry: FilterEntry) {
        self.entries.insert(column.into(), entry);
    }

    /// Entry for `column`, if present.
    pub fn get(&self, column: &str) -> Option<&FilterEntry> {
        self.entries.get(column)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of filtered columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no filters resolved.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build a `FilterMap` from the request's query parameters.
///
/// Per directive: read `filter_<key>`; skip absent/empty values; resolve
/// the criteria as request override ?? declared default ?? `Equals`;
/// coerce the raw value; key the entry by the directive's column.
///
/// # Errors
///
/// - `FilterError::UnknownCriteria` for an override token matching no
///   known criteria (client error — never interpolated as an operator).
/// - `FilterError::MalformedRange` for a `BETWEEN` value that does not
///   split into exactly two non-empty parts (client error, aborts the
///   whole build).
pub fn build_filter_map(
    schema: &ModelSchema,
    params: &QueryParams,
) -> Result<FilterMap, FilterError> {
    let mut map = FilterMap::new();

    for directive in schema.filter_directives() {
        let value_key = format!("{FILTER_PARAM_PREFIX}{}", directive.query_key);
        let raw = params.get(&value_key).unwrap_or("");
        if raw.is_empty() {
            continue;
        }

        let override_key = format!("{value_key}{CRITERIA_PARAM_SUFFIX}");
        let criteria = match params.get(&override_key) {
            Some(token) if !token.trim().is_empty() => {
                Criteria::parse_token(token).ok_or_else(|| FilterError::UnknownCriteria {
                    token: token.to_string(),
                    field: value_key.clone(),
                })?
            }
            _ => directive.default_criteria,
        }
        .resolve();

        match coerce::coerce(criteria, raw, &value_key)? {
            Some(value) => {
                map.insert(directive.db_column.clone(), FilterEntry { criteria, value });
            }
            None => {
                log::debug!(
                    "skipping {value_key}: value unusable for criteria {}",
                    criteria.as_token()
                );
            }
        }
    }

    Ok(map)
}
