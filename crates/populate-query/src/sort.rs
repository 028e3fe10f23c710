use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Sort {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Sort {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Parse a space separated sort string such as `"title -created"`.
///
/// A leading `-` sorts that field descending, a leading `+` (or nothing)
/// ascending. Empty tokens are ignored.
pub fn parse_sort(spec: &str) -> Vec<Sort> {
    spec.split_whitespace()
        .filter_map(|token| {
            if let Some(field) = token.strip_prefix('-') {
                (!field.is_empty()).then(|| Sort::desc(field))
            } else {
                let field = token.strip_prefix('+').unwrap_or(token);
                (!field.is_empty()).then(|| Sort::asc(field))
            }
        })
        .collect()
}
