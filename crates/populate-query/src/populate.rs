use bson::{Bson, Document};
use serde::{Deserialize, Serialize};

/// A nested-population directive.
///
/// Reverse populate never interprets this; it is handed to the collaborator
/// as given. The shapes mirror what document stores usually accept: a path
/// string (`"categories"` or `"categories tags"`), a list of directives, or
/// an options document carrying at least a `path` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Populate {
    Path(String),
    Many(Vec<Populate>),
    Options(Document),
}

impl Populate {
    /// Top-level paths named by this directive, in order.
    pub fn paths(&self) -> Vec<&str> {
        match self {
            Populate::Path(spec) => spec.split_whitespace().collect(),
            Populate::Many(items) => items.iter().flat_map(Populate::paths).collect(),
            Populate::Options(doc) => match doc.get("path") {
                Some(Bson::String(spec)) => spec.split_whitespace().collect(),
                _ => Vec::new(),
            },
        }
    }
}

impl From<&str> for Populate {
    fn from(path: &str) -> Self {
        Populate::Path(path.to_string())
    }
}
