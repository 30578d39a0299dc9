//! Declarative model schemas.
//!
//! A `ModelSchema` is the data-model description the compiler walks: an
//! ordered set of fields, each with an optional database column and
//! optional filter/sort metadata in the tag grammar. Schemas are declared
//! with a builder at startup (no runtime type introspection), derived into
//! immutable `FieldDirective`s once, and shared process-wide — a
//! `once_cell::sync::Lazy<ModelSchema>` per model type is the expected
//! holder.
//!
//! # Example
//!
//! ```
//! use bouncer::{Field, ModelSchema};
//!
//! let schema = ModelSchema::builder("users")
//!     .field(
//!         Field::new("UserLogin")
//!             .column("user_login")
//!             .filter("login,criteria=ILIKE")
//!             .sort("login"),
//!     )
//!     .field(Field::new("CreatedAt").filter("created,criteria=DATE").sort("created,order=DESC"))
//!     .field(Field::new("PasswordHash"))
//!     .build()
//!     .unwrap();
//!
//! assert!(schema.declares_column("created_at"));
//! assert_eq!(schema.filter_directives().count(), 2);
//! ```

mod tag;

use crate::criteria::{Criteria, Direction};
use crate::error::FilterError;
use heck::ToSnakeCase;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// SQL identifier shape accepted for table and column names.
static IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex is valid"));

/// Parsed, structured form of one field's filter or sort metadata.
///
/// Derived once at schema build time and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDirective {
    /// Key the request parameters are derived from (`filter_<key>`, ...)
    pub query_key: String,
    /// Database column the emitted predicate or ORDER BY term targets
    pub db_column: String,
    /// Criteria declared in the tag; `Unset` resolves to `Equals`
    pub default_criteria: Criteria,
    /// Order declared in the tag; used by defaults-driven sorting
    pub default_order: Direction,
}

/// One field declaration for the schema builder.
#[derive(Debug, Clone)]
pub struct Field {
    ident: &'static str,
    column: Option<String>,
    filter_tag: Option<String>,
    sort_tag: Option<String>,
}

impl Field {
    /// Declare a field by its model identifier (e.g. `"UserLogin"`).
    ///
    /// Without an explicit `column`, the database column falls back to the
    /// snake_case form of the identifier (`UserLogin` -> `user_login`).
    pub fn new(ident: &'static str) -> Self {
        Self {
            ident,
            column: None,
            filter_tag: None,
            sort_tag: None,
        }
    }

    /// Declare the database column explicitly.
    pub fn column<S: Into<String>>(mut self, column: S) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Attach filter metadata: `<queryKey>[,criteria=<CRITERIA>]`.
    pub fn filter<S: Into<String>>(mut self, tag: S) -> Self {
        self.filter_tag = Some(tag.into());
        self
    }

    /// Attach sort metadata: `<queryKey>[,order=<ASC|DESC>]`.
    pub fn sort<S: Into<String>>(mut self, tag: S) -> Self {
        self.sort_tag = Some(tag.into());
        self
    }
}

/// A built field: resolved column plus derived directives.
#[derive(Debug, Clone)]
struct FieldSchema {
    ident: &'static str,
    db_column: String,
    filter: Option<FieldDirective>,
    sort: Option<FieldDirective>,
}

/// Immutable data-model description: ordered fields, derived directives,
/// and the column allow-list the emitter validates against.
#[derive(Debug, Clone)]
pub struct ModelSchema {
    table: String,
    fields: Vec<FieldSchema>,
    columns: HashSet<String>,
}

impl ModelSchema {
    /// Start declaring a schema for `table`.
    pub fn builder<S: Into<String>>(table: S) -> ModelSchemaBuilder {
        ModelSchemaBuilder {
            table: table.into(),
            fields: Vec::new(),
        }
    }

    /// Table this model maps to.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Whether `column` belongs to the declared column set.
    ///
    /// This is the allow-list gate: identifiers are only ever emitted after
    /// passing it.
    pub fn declares_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    /// Filter directives in declaration order.
    pub fn filter_directives(&self) -> impl Iterator<Item = &FieldDirective> {
        self.fields.iter().filter_map(|f| f.filter.as_ref())
    }

    /// Sort directives in declaration order.
    pub fn sort_directives(&self) -> impl Iterator<Item = &FieldDirective> {
        self.fields.iter().filter_map(|f| f.sort.as_ref())
    }

    /// Filter directive for a field identifier, if the field declared one.
    pub(crate) fn filter_directive_for(&self, ident: &str) -> Option<&FieldDirective> {
        self.fields
            .iter()
            .find(|f| f.ident == ident)
            .and_then(|f| f.filter.as_ref())
    }
}

/// Builder for `ModelSchema`.
#[derive(Debug)]
pub struct ModelSchemaBuilder {
    table: String,
    fields: Vec<Field>,
}

impl ModelSchemaBuilder {
    /// Add a field declaration. Declaration order is preserved and drives
    /// map iteration and ORDER BY emission order.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Derive directives and validate the declaration.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Schema` for invalid table/column identifiers,
    /// unknown declared criteria tokens, or duplicate filter/sort query
    /// keys (two fields reading the same request parameter is ambiguous).
    pub fn build(self) -> Result<ModelSchema, FilterError> {
        validate_ident(&self.table, "table")?;

        let mut fields = Vec::with_capacity(self.fields.len());
        let mut columns = HashSet::new();
        let mut filter_keys: HashSet<String> = HashSet::new();
        let mut sort_keys: HashSet<String> = HashSet::new();

        for field in self.fields {
            let db_column = match field.column {
                Some(column) => column,
                None => field.ident.to_snake_case(),
            };
            validate_ident(&db_column, "column")?;

            let filter = match &field.filter_tag {
                Some(tag) => tag::parse_filter_tag(tag, field.ident)?.map(|parsed| {
                    FieldDirective {
                        query_key: parsed.query_key,
                        db_column: db_column.clone(),
                        default_criteria: parsed.criteria,
                        default_order: Direction::Asc,
                    }
                }),
                None => None,
            };
            if let Some(directive) = &filter {
                if !filter_keys.insert(directive.query_key.clone()) {
                    return Err(FilterError::Schema {
                        message: format!(
                            "duplicate filter query key '{}' (field {})",
                            directive.query_key, field.ident
                        ),
                    });
                }
            }

            let sort = field.sort_tag.as_deref().and_then(tag::parse_sort_tag).map(
                |parsed| FieldDirective {
                    query_key: parsed.query_key,
                    db_column: db_column.clone(),
                    default_criteria: Criteria::Unset,
                    default_order: parsed.order,
                },
            );
            if let Some(directive) = &sort {
                if !sort_keys.insert(directive.query_key.clone()) {
                    return Err(FilterError::Schema {
                        message: format!(
                            "duplicate sort query key '{}' (field {})",
                            directive.query_key, field.ident
                        ),
                    });
                }
            }

            columns.insert(db_column.clone());
            fields.push(FieldSchema {
                ident: field.ident,
                db_column,
                filter,
                sort,
            });
        }

        Ok(ModelSchema {
            table: self.table,
            fields,
            columns,
        })
    }
}

fn validate_ident(ident: &str, kind: &str) -> Result<(), FilterError> {
    if IDENT_RE.is_match(ident) {
        Ok(())
    } else {
        Err(FilterError::Schema {
            message: format!("invalid {kind} identifier '{ident}'"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_schema() -> ModelSchema {
        ModelSchema::builder("users")
            .field(
                Field::new("UserLogin")
                    .column("user_login")
                    .filter("login,criteria=ILIKE")
                    .sort("login"),
            )
            .field(Field::new("CreatedAt").filter("created,criteria=DATE"))
            .field(Field::new("PasswordHash"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_snake_case_column_fallback() {
        let schema = user_schema();
        assert!(schema.declares_column("created_at"));
        assert!(schema.declares_column("password_hash"));
        assert!(!schema.declares_column("CreatedAt"));
    }

    #[test]
    fn test_explicit_column_wins() {
        let schema = user_schema();
        assert!(schema.declares_column("user_login"));
    }

    #[test]
    fn test_directive_derivation() {
        let schema = user_schema();
        let directives: Vec<_> = schema.filter_directives().collect();
        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0].query_key, "login");
        assert_eq!(directives[0].db_column, "user_login");
        assert_eq!(directives[0].default_criteria, Criteria::ILike);
        assert_eq!(directives[1].default_criteria, Criteria::Date);

        let sorts: Vec<_> = schema.sort_directives().collect();
        assert_eq!(sorts.len(), 1);
        assert_eq!(sorts[0].default_order, Direction::Asc);
    }

    #[test]
    fn test_opted_out_fields_have_no_directives() {
        let schema = ModelSchema::builder("users")
            .field(Field::new("Secret").filter("-").sort(""))
            .build()
            .unwrap();
        assert_eq!(schema.filter_directives().count(), 0);
        assert_eq!(schema.sort_directives().count(), 0);
        // Opting out of filtering does not remove the column itself.
        assert!(schema.declares_column("secret"));
    }

    #[test]
    fn test_rejects_invalid_column_identifier() {
        let err = ModelSchema::builder("users")
            .field(Field::new("Login").column("user login; DROP TABLE"))
            .build()
            .unwrap_err();
        assert!(matches!(err, FilterError::Schema { .. }));
    }

    #[test]
    fn test_rejects_duplicate_filter_query_key() {
        let err = ModelSchema::builder("users")
            .field(Field::new("Login").filter("q"))
            .field(Field::new("Email").filter("q"))
            .build()
            .unwrap_err();
        assert!(matches!(err, FilterError::Schema { .. }));
    }

    #[test]
    fn test_duplicate_columns_are_allowed() {
        // Two query keys may target one column; the filter map is
        // column-keyed and the last write wins at request time.
        let schema = ModelSchema::builder("users")
            .field(Field::new("Name").filter("name,criteria=ILIKE"))
            .field(Field::new("NameExact").column("name").filter("name_exact"))
            .build()
            .unwrap();
        assert_eq!(schema.filter_directives().count(), 2);
    }

    #[test]
    fn test_rejects_unknown_declared_criteria() {
        let err = ModelSchema::builder("users")
            .field(Field::new("Login").filter("login,criteria=REGEX"))
            .build()
            .unwrap_err();
        assert!(matches!(err, FilterError::Schema { .. }));
    }
}
