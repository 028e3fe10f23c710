use serde::{Deserialize, Serialize};

use crate::filter::FilterGroup;
use crate::populate::Populate;
use crate::projection::Projection;
use crate::sort::Sort;

/// A declarative find against one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub collection: String,
    pub filter: FilterGroup,
    pub projection: Option<Projection>,
    #[serde(default)]
    pub sort: Vec<Sort>,
    pub populate: Option<Populate>,
}
