mod collection;
mod filter;
mod operator;
mod parse_filter;
mod populate;
mod projection;
mod query;
mod sort;

pub use collection::{Collection, QueryError};
pub use filter::{Filter, FilterGroup, FilterNode, LogicalOp, merge_filters};
pub use operator::Operator;
pub use parse_filter::{FilterParseError, parse_filter};
pub use populate::Populate;
pub use projection::{Projection, ProjectionKind, ProjectionParseError};
pub use query::Query;
pub use sort::{Sort, SortDirection, parse_sort};
