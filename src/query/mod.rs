//! List query pipeline
//!
//! Shared filtering, sorting and pagination for every list endpoint.

pub mod params;
pub mod processor;

pub use params::{
    ListParams, ListQuery, PageRequest, QueryError, SortKey, SortOrder, SortSpec, DEFAULT_LIMIT,
    DEFAULT_PAGE, MAX_LIMIT,
};
pub use processor::{ListQueryProcessor, ListResult, Listable, Pagination, SortValue};
