use bson::Bson;
use serde::{Deserialize, Serialize};

use crate::operator::Operator;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub operator: Operator,
    pub value: Bson,
}

impl Filter {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Bson>) -> Self {
        Filter {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterNode {
    Condition(Filter),
    Group(FilterGroup),
}

/// A group of conditions joined by one logical operator.
///
/// An empty `And` group matches every document; an empty `Or` group
/// matches none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub logical: LogicalOp,
    pub children: Vec<FilterNode>,
}

impl FilterGroup {
    pub fn and(children: Vec<FilterNode>) -> Self {
        FilterGroup {
            logical: LogicalOp::And,
            children,
        }
    }

    pub fn or(children: Vec<FilterNode>) -> Self {
        FilterGroup {
            logical: LogicalOp::Or,
            children,
        }
    }

    /// Every condition in the tree, depth first.
    pub fn conditions(&self) -> Vec<&Filter> {
        let mut out = Vec::new();
        collect_conditions(self, &mut out);
        out
    }
}

fn collect_conditions<'a>(group: &'a FilterGroup, out: &mut Vec<&'a Filter>) {
    for child in &group.children {
        match child {
            FilterNode::Condition(filter) => out.push(filter),
            FilterNode::Group(inner) => collect_conditions(inner, out),
        }
    }
}

impl From<Filter> for FilterNode {
    fn from(filter: Filter) -> Self {
        FilterNode::Condition(filter)
    }
}

impl From<FilterGroup> for FilterNode {
    fn from(group: FilterGroup) -> Self {
        FilterNode::Group(group)
    }
}

/// Merge two optional filter groups under a top-level AND.
///
/// - Both None → None
/// - One present → that one
/// - Both present → AND(base, extra)
pub fn merge_filters(
    base: Option<&FilterGroup>,
    extra: Option<&FilterGroup>,
) -> Option<FilterGroup> {
    match (base, extra) {
        (None, None) => None,
        (Some(f), None) | (None, Some(f)) => Some(f.clone()),
        (Some(base), Some(extra)) => Some(FilterGroup::and(vec![
            FilterNode::Group(base.clone()),
            FilterNode::Group(extra.clone()),
        ])),
    }
}
