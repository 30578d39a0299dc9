//! Raw value coercion per resolved criteria.
//!
//! `Ok(None)` means the value is unusable and the field is silently
//! skipped; only a malformed range is a hard failure. Absence of usable
//! data is not a caller mistake, a half-open range unambiguously is.

use crate::criteria::Criteria;
use crate::error::FilterError;
use crate::filter::FilterValue;
use chrono::NaiveDate;

/// Shape `raw` into the value form `criteria` needs.
///
/// `field` is the request parameter name, used to label range errors.
pub(crate) fn coerce(
    criteria: Criteria,
    raw: &str,
    field: &str,
) -> Result<Option<FilterValue>, FilterError> {
    match criteria {
        Criteria::Date => Ok(normalize_date(raw.trim()).map(FilterValue::Scalar)),
        Criteria::Between => {
            let (low, high) = split_range(raw).ok_or_else(|| FilterError::MalformedRange {
                field: field.to_string(),
            })?;
            Ok(Some(FilterValue::Range(low, high)))
        }
        Criteria::In => {
            let values = split_list(raw);
            if values.is_empty() {
                Ok(None)
            } else {
                Ok(Some(FilterValue::List(values)))
            }
        }
        _ => Ok(Some(FilterValue::Scalar(raw.trim().to_string()))),
    }
}

/// Accepts `dd/mm/yyyy` or `yyyy-mm-dd`; returns the `yyyy-mm-dd` form the
/// `DATE(column) = ?` predicate compares against. Anything else is `None`.
fn normalize_date(raw: &str) -> Option<String> {
    let parsed = if raw.contains('/') {
        NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok()?
    } else if raw.contains('-') {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?
    } else {
        return None;
    };
    Some(parsed.format("%Y-%m-%d").to_string())
}

/// Split a range value on `-` into exactly two non-empty trimmed bounds.
///
/// More than one `-` is rejected rather than guessed at, which rules out
/// negative numbers and hyphenated dates as range bounds.
fn split_range(raw: &str) -> Option<(String, String)> {
    let mut parts = raw.split('-');
    let low = parts.next()?.trim();
    let high = parts.next()?.trim();
    if parts.next().is_some() || low.is_empty() || high.is_empty() {
        return None;
    }
    Some((low.to_string(), high.to_string()))
}

/// Split a list value on `,`, trimming parts and dropping empties.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
