use bson::{Bson, Document};

use crate::filter::{Filter, FilterGroup, FilterNode, LogicalOp};
use crate::operator::Operator;

/// Parse error for filter documents.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParseError(pub String);

impl std::fmt::Display for FilterParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "filter parse error: {}", self.0)
    }
}

impl std::error::Error for FilterParseError {}

/// Parse a Mongo-style filter document into a `FilterGroup`.
///
/// - Top-level document is an implicit AND of all entries
/// - `{ "field": value }` is implicit `$eq`
/// - `{ "field": { "$ne": v } }` uses operator sub-documents
/// - `{ "$or": [...] }` / `{ "$and": [...] }` for explicit logical ops
/// - `{ "field": { "$in": [...] } }` requires an array operand
/// - `{ "field": { "$exists": true } }` for field existence checks
///
/// An empty document parses to an empty AND group, which matches everything.
pub fn parse_filter(doc: &Document) -> Result<FilterGroup, FilterParseError> {
    let mut children = Vec::new();

    for (key, value) in doc {
        match key.as_str() {
            "$and" => children.push(FilterNode::Group(parse_logical_array(
                value,
                LogicalOp::And,
            )?)),
            "$or" => children.push(FilterNode::Group(parse_logical_array(
                value,
                LogicalOp::Or,
            )?)),
            k if k.starts_with('$') => {
                return Err(FilterParseError(format!("unknown top-level operator: {k}")));
            }
            _ => children.extend(parse_field_condition(key, value)?),
        }
    }

    Ok(FilterGroup::and(children))
}

/// Parse a `$and` or `$or` array value into a logical group.
fn parse_logical_array(value: &Bson, logical: LogicalOp) -> Result<FilterGroup, FilterParseError> {
    let arr = match value {
        Bson::Array(a) => a,
        _ => return Err(FilterParseError("$and/$or value must be an array".into())),
    };

    let mut children = Vec::with_capacity(arr.len());
    for elem in arr {
        match elem {
            Bson::Document(sub_doc) => children.push(FilterNode::Group(parse_filter(sub_doc)?)),
            _ => {
                return Err(FilterParseError(
                    "$and/$or array elements must be documents".into(),
                ));
            }
        }
    }

    if children.is_empty() {
        return Err(FilterParseError("$and/$or array must not be empty".into()));
    }

    Ok(FilterGroup { logical, children })
}

/// Parse a field condition: either implicit $eq or an operator sub-document.
fn parse_field_condition(field: &str, value: &Bson) -> Result<Vec<FilterNode>, FilterParseError> {
    if let Bson::Document(sub_doc) = value
        && sub_doc.keys().next().is_some_and(|k| k.starts_with('$'))
    {
        return parse_operator_doc(field, sub_doc);
    }

    Ok(vec![Filter::new(field, Operator::Eq, value.clone()).into()])
}

/// Parse an operator sub-document like `{ "$gt": 21, "$lte": 100 }`.
fn parse_operator_doc(field: &str, doc: &Document) -> Result<Vec<FilterNode>, FilterParseError> {
    let mut conditions = Vec::with_capacity(doc.len());

    for (op_key, op_value) in doc {
        let operator = Operator::from_mongo(op_key)
            .ok_or_else(|| FilterParseError(format!("unknown field operator: {op_key}")))?;

        match operator {
            Operator::In | Operator::Nin if !matches!(op_value, Bson::Array(_)) => {
                return Err(FilterParseError(format!("{op_key} value must be an array")));
            }
            Operator::Exists if !matches!(op_value, Bson::Boolean(_)) => {
                return Err(FilterParseError("$exists value must be a boolean".into()));
            }
            _ => {}
        }

        conditions.push(Filter::new(field, operator, op_value.clone()).into());
    }

    Ok(conditions)
}
