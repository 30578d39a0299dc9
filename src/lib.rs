//! # Bouncer
//!
//! Declarative query-string filtering and sorting compiler for
//! parameter-bound SQL.
//!
//! Data models declare filter/sort metadata per field through
//! [`ModelSchema`]; requests supply decoded query parameters through
//! [`QueryParams`]; the builders produce column-keyed [`FilterMap`] /
//! [`SortMap`] intermediates; and the emitter appends parameter-bound
//! predicates and ORDER BY terms to a `sea_query::SelectStatement` the
//! caller executes.
//!
//! ```
//! use bouncer::{build_filter_map, build_sort_map, emit, Field, ModelSchema, QueryParams};
//! use sea_query::{Alias, Asterisk, PostgresQueryBuilder, Query};
//!
//! let schema = ModelSchema::builder("users")
//!     .field(Field::new("UserLogin").column("user_login").filter("login,criteria=ILIKE"))
//!     .field(Field::new("CreatedAt").filter("created,criteria=DATE").sort("created"))
//!     .build()
//!     .unwrap();
//!
//! let params = QueryParams::from_pairs([
//!     ("filter_login", "ali"),
//!     ("sorting_created_order", "desc"),
//! ]);
//!
//! let filters = build_filter_map(&schema, &params).unwrap();
//! let sorting = build_sort_map(&schema, &params);
//!
//! let mut stmt = Query::select();
//! stmt.column(Asterisk).from(Alias::new(schema.table()));
//! emit::apply_filter_map(&mut stmt, &schema, &filters).unwrap();
//! emit::apply_sort_map(&mut stmt, &schema, &sorting).unwrap();
//!
//! let (sql, values) = stmt.build(PostgresQueryBuilder);
//! assert!(sql.contains("ILIKE"));
//! assert_eq!(values.0.len(), 1);
//! ```

pub mod criteria;
pub mod emit;
pub mod error;
pub mod filter;
pub mod params;
pub mod record;
pub mod schema;
pub mod sort;

#[doc(inline)]
pub use criteria::{Criteria, Direction};
#[doc(inline)]
pub use emit::{apply_conditions, apply_filter_map, apply_sort_map, FilterCondition};
#[doc(inline)]
pub use error::FilterError;
#[doc(inline)]
pub use filter::{build_filter_map, FilterEntry, FilterMap, FilterValue};
#[doc(inline)]
pub use params::QueryParams;
#[doc(inline)]
pub use record::{build_where_clause, FilterRecord, RecordValue};
#[doc(inline)]
pub use schema::{Field, FieldDirective, ModelSchema, ModelSchemaBuilder};
#[doc(inline)]
pub use sort::{build_sort_map, SortMap};
