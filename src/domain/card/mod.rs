pub mod model;
pub mod query;

pub use model::{select_candidates, Candidate, Card, FieldNames, MissingFieldError, Selection};
pub use query::{build_scope_query, build_search_query};
