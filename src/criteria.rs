//! Shared criteria and direction vocabulary.
//!
//! One tagged-variant type serves both compiler paths (the request-driven
//! map builder and the instance-driven positional builder), replacing the
//! stringly-typed operator tokens the paths previously disagreed on.
//! Tokens are matched case-insensitively; serialized forms are the upper
//! case wire tokens handlers echo back to clients.

use serde::{Deserialize, Serialize};

/// Comparison semantics applied to a filter value.
///
/// `Unset` is what a directive carries when its tag declares no criteria;
/// it normalizes to `Equals` at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criteria {
    /// `column = ?`
    #[serde(rename = "=")]
    Equals,
    /// `column LIKE ?` with escaped, `%`-wrapped pattern
    #[serde(rename = "LIKE")]
    Like,
    /// `column ILIKE ?` with escaped, `%`-wrapped pattern
    #[serde(rename = "ILIKE")]
    ILike,
    /// `DATE(column) = ?` against a normalized `yyyy-mm-dd` string
    #[serde(rename = "DATE")]
    Date,
    /// `column BETWEEN ? AND ?`
    #[serde(rename = "BETWEEN")]
    Between,
    /// `column IN (?, ...)`
    #[serde(rename = "IN")]
    In,
    /// `column > ?`
    #[serde(rename = ">")]
    Gt,
    /// `column < ?`
    #[serde(rename = "<")]
    Lt,
    /// No criteria declared; resolves to `Equals`
    #[serde(rename = "")]
    Unset,
}

impl Criteria {
    /// Parse a criteria token from a tag or a request override.
    ///
    /// Matching is case-insensitive, so the map path's upper case tokens
    /// (`ILIKE`, `BETWEEN`) and the positional path's lower case ones
    /// (`ilike`, `eq`) land on the same variants. Returns `None` for
    /// unrecognized tokens; the caller decides whether that is a schema
    /// error or a client error.
    pub fn parse_token(token: &str) -> Option<Self> {
        match token.trim().to_uppercase().as_str() {
            "" => Some(Criteria::Unset),
            "=" | "EQ" => Some(Criteria::Equals),
            "LIKE" => Some(Criteria::Like),
            "ILIKE" => Some(Criteria::ILike),
            "DATE" => Some(Criteria::Date),
            "BETWEEN" => Some(Criteria::Between),
            "IN" => Some(Criteria::In),
            ">" | "GT" => Some(Criteria::Gt),
            "<" | "LT" => Some(Criteria::Lt),
            _ => None,
        }
    }

    /// Normalize `Unset` to the canonical default, `Equals`.
    pub fn resolve(self) -> Self {
        match self {
            Criteria::Unset => Criteria::Equals,
            other => other,
        }
    }

    /// Canonical wire token for this criteria.
    pub fn as_token(&self) -> &'static str {
        match self {
            Criteria::Equals => "=",
            Criteria::Like => "LIKE",
            Criteria::ILike => "ILIKE",
            Criteria::Date => "DATE",
            Criteria::Between => "BETWEEN",
            Criteria::In => "IN",
            Criteria::Gt => ">",
            Criteria::Lt => "<",
            Criteria::Unset => "",
        }
    }
}

/// Sort direction for an ORDER BY term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// Parse a direction token, case-insensitively.
    pub fn parse_token(token: &str) -> Option<Self> {
        match token.trim().to_uppercase().as_str() {
            "ASC" => Some(Direction::Asc),
            "DESC" => Some(Direction::Desc),
            _ => None,
        }
    }

    /// Parse a direction token, normalizing anything unrecognized to `Asc`.
    ///
    /// Sorting is conservative: bad input never errors.
    pub fn parse_or_asc(token: &str) -> Self {
        Self::parse_token(token).unwrap_or(Direction::Asc)
    }

    /// Canonical wire token for this direction.
    pub fn as_token(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}
