mod builder;
mod filters;
mod sql;
mod types;

pub use builder::RecipeSpecificationBuilder;
pub use sql::{build_search_query, SqlValue};
pub use types::{DataOption, FilterKey, SearchCriteria, SearchOperation, Value};
