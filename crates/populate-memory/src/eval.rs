use std::cmp::Ordering;

use bson::{Bson, Document};
use populate_query::{Filter, FilterGroup, FilterNode, LogicalOp, Operator};

use crate::path::get_path;

/// Evaluate whether a document matches the given filter group.
pub fn matches(doc: &Document, group: &FilterGroup) -> bool {
    match group.logical {
        LogicalOp::And => group.children.iter().all(|child| node_matches(doc, child)),
        LogicalOp::Or => group.children.iter().any(|child| node_matches(doc, child)),
    }
}

fn node_matches(doc: &Document, node: &FilterNode) -> bool {
    match node {
        FilterNode::Condition(filter) => filter_matches(doc, filter),
        FilterNode::Group(group) => matches(doc, group),
    }
}

fn filter_matches(doc: &Document, filter: &Filter) -> bool {
    let field_value = get_path(doc, &filter.field);
    match filter.operator {
        Operator::Eq => eq_matches(field_value, &filter.value),
        Operator::Ne => !eq_matches(field_value, &filter.value),
        Operator::In => in_matches(field_value, &filter.value),
        Operator::Nin => !in_matches(field_value, &filter.value),
        Operator::Exists => {
            // $exists checks physical presence; a null value still exists
            let expected = !std::matches!(filter.value, Bson::Boolean(false));
            field_value.is_some() == expected
        }
        Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte => {
            let predicate: fn(Ordering) -> bool = match filter.operator {
                Operator::Gt => |o| o == Ordering::Greater,
                Operator::Gte => |o| o != Ordering::Less,
                Operator::Lt => |o| o == Ordering::Less,
                _ => |o| o != Ordering::Greater,
            };
            any_element(field_value, |v| range_matches(v, &filter.value, predicate))
        }
    }
}

/// Apply `test` to a scalar value, or to each element of an array value.
fn any_element(field_value: Option<&Bson>, test: impl Fn(&Bson) -> bool) -> bool {
    match field_value {
        Some(Bson::Array(items)) => items.iter().any(test),
        Some(v) => test(v),
        None => false,
    }
}

fn eq_matches(field_value: Option<&Bson>, expected: &Bson) -> bool {
    // $eq: null matches both missing fields and explicit null values
    if std::matches!(expected, Bson::Null) {
        return std::matches!(field_value, None | Some(Bson::Null));
    }
    match field_value {
        Some(stored @ Bson::Array(items)) => {
            items.iter().any(|item| value_eq(item, expected)) || value_eq(stored, expected)
        }
        Some(v) => value_eq(v, expected),
        None => false,
    }
}

fn in_matches(field_value: Option<&Bson>, candidates: &Bson) -> bool {
    match candidates {
        Bson::Array(list) => list.iter().any(|c| eq_matches(field_value, c)),
        _ => false,
    }
}

fn range_matches(stored: &Bson, query: &Bson, predicate: fn(Ordering) -> bool) -> bool {
    // Type bracketing: values of different kinds never satisfy a range.
    type_rank(stored) == type_rank(query) && predicate(compare_present(stored, query))
}

fn number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(*v as f64),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

fn integer(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(v) => Some(*v as i64),
        Bson::Int64(v) => Some(*v),
        _ => None,
    }
}

/// Equality with numeric cross-type coercion and ObjectId ↔ hex string.
pub fn value_eq(a: &Bson, b: &Bson) -> bool {
    match (a, b) {
        (Bson::ObjectId(oid), Bson::String(s)) | (Bson::String(s), Bson::ObjectId(oid)) => {
            oid.to_hex() == *s
        }
        (Bson::DateTime(x), Bson::DateTime(y)) => x.timestamp_millis() == y.timestamp_millis(),
        (Bson::Array(xs), Bson::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| value_eq(x, y))
        }
        _ => match (integer(a), integer(b)) {
            (Some(x), Some(y)) => x == y,
            _ => match (number(a), number(b)) {
                (Some(x), Some(y)) => x == y,
                _ => a == b,
            },
        },
    }
}

/// Ordering bucket following the usual document-store type order.
fn type_rank(value: &Bson) -> u8 {
    match value {
        Bson::MinKey => 0,
        Bson::Null | Bson::Undefined => 1,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_) => 2,
        Bson::String(_) | Bson::Symbol(_) => 3,
        Bson::Document(_) => 4,
        Bson::Array(_) => 5,
        Bson::Binary(_) => 6,
        Bson::ObjectId(_) => 7,
        Bson::Boolean(_) => 8,
        Bson::DateTime(_) => 9,
        Bson::Timestamp(_) => 10,
        Bson::RegularExpression(_) => 11,
        Bson::MaxKey => 13,
        _ => 12,
    }
}

/// Compare two optional field values. Missing and null sort first and are equal.
pub fn compare_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    match (a, b) {
        (None | Some(Bson::Null), None | Some(Bson::Null)) => Ordering::Equal,
        (None | Some(Bson::Null), Some(_)) => Ordering::Less,
        (Some(_), None | Some(Bson::Null)) => Ordering::Greater,
        (Some(a), Some(b)) => compare_present(a, b),
    }
}

fn compare_present(a: &Bson, b: &Bson) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => x.cmp(y),
        (Bson::ObjectId(x), Bson::ObjectId(y)) => x.bytes().cmp(&y.bytes()),
        (Bson::Boolean(x), Bson::Boolean(y)) => x.cmp(y),
        (Bson::DateTime(x), Bson::DateTime(y)) => x.timestamp_millis().cmp(&y.timestamp_millis()),
        (Bson::Timestamp(x), Bson::Timestamp(y)) => {
            (x.time, x.increment).cmp(&(y.time, y.increment))
        }
        _ => match (integer(a), integer(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => match (number(a), number(b)) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            },
        },
    }
}
