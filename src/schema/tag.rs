//! Tag grammar for field filter/sort metadata.
//!
//! Filter form: `<queryKey>[,criteria=<CRITERIA>]`, with `type=<CRITERIA>`
//! accepted for compatibility with older declarations. Sort form:
//! `<queryKey>[,order=<ASC|DESC>]`. Empty or `-` metadata opts the field
//! out entirely; unknown trailing segments are ignored so the grammar can
//! grow without breaking existing declarations.

use crate::criteria::{Criteria, Direction};
use crate::error::FilterError;

/// Parsed filter metadata for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FilterTag {
    pub query_key: String,
    pub criteria: Criteria,
}

/// Parsed sort metadata for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SortTag {
    pub query_key: String,
    pub order: Direction,
}

/// Parse a filter tag. `Ok(None)` means the field opted out.
///
/// A declared criteria token that matches no known variant is a schema
/// error: declarations are trusted code, and an unknown operator there is
/// a bug, not request input.
pub(crate) fn parse_filter_tag(tag: &str, field: &str) -> Result<Option<FilterTag>, FilterError> {
    let Some((query_key, rest)) = split_tag(tag) else {
        return Ok(None);
    };

    let mut criteria = Criteria::Unset;
    for part in rest {
        let token = part
            .strip_prefix("criteria=")
            .or_else(|| part.strip_prefix("type="));
        if let Some(token) = token {
            criteria =
                Criteria::parse_token(token).ok_or_else(|| FilterError::Schema {
                    message: format!(
                        "unknown criteria token '{token}' declared for field {field}"
                    ),
                })?;
            break;
        }
    }

    Ok(Some(FilterTag {
        query_key,
        criteria,
    }))
}

/// Parse a sort tag. `Ok(None)` means the field opted out.
///
/// Unlike criteria, an unrecognized declared order normalizes to `Asc`;
/// direction handling never errors anywhere in the compiler.
pub(crate) fn parse_sort_tag(tag: &str) -> Option<SortTag> {
    let (query_key, rest) = split_tag(tag)?;

    let mut order = Direction::Asc;
    for part in rest {
        if let Some(token) = part.strip_prefix("order=") {
            order = Direction::parse_or_asc(token);
            break;
        }
    }

    Some(SortTag { query_key, order })
}

/// Split a tag into its trimmed query key and remaining segments.
/// Returns `None` for the opt-out forms (empty, `-`, or empty key).
fn split_tag(tag: &str) -> Option<(String, Vec<&str>)> {
    let tag = tag.trim();
    if tag.is_empty() || tag == "-" {
        return None;
    }

    let mut parts = tag.split(',');
    let query_key = parts.next()?.trim();
    if query_key.is_empty() || query_key == "-" {
        return None;
    }

    Some((query_key.to_string(), parts.map(str::trim).collect()))
}
