//! Reverse populate: attach documents from a foreign collection onto the
//! owners they reference.
//!
//! ```text
//! validate → (empty? return) → index owners → build query → execute → bind
//! ```
//!
//! One query per call. Owners are mutated in place and the same slice is
//! handed back.

mod bind;
mod config;
mod error;
mod index;
mod options;
mod owner;
mod populate;
mod query;
mod reference;

pub use bind::{BindSummary, Binding, SINGULAR_MATCH_POLICY, populate_result};
pub use config::{FieldList, PopulateConfig, SortSpec};
pub use error::PopulateError;
pub use index::{Collision, DUPLICATE_OWNER_POLICY, OwnerIndex, OwnerKey, key_by};
pub use options::{PopulateOptions, REQUIRED_FIELDS, RequiredField, Validated};
pub use owner::{OWNER_KEY_FIELD, Owner, Populated, Record};
pub use populate::reverse_populate;
pub use query::{PreparedQuery, build_query, reference_constraint};
pub use reference::References;

pub use populate_query::{
    Collection, Filter, FilterGroup, FilterNode, LogicalOp, Operator, Populate, Projection,
    ProjectionKind, Query, QueryError, Sort, SortDirection,
};
