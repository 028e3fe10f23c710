use std::collections::HashMap;

use bson::{Bson, Document};

/// A pre-built tree of dot-notation field paths.
///
/// Given `["author.name.first", "author.name.last", "title"]`, builds:
/// ```text
/// { "author": Branch({ "name": Branch({ "first": Leaf, "last": Leaf }) }),
///   "title": Leaf }
/// ```
///
/// Built once per query, reused across all documents.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FieldTree {
    /// Take the entire field value.
    Leaf,
    /// Recurse into sub-fields.
    Branch(HashMap<String, FieldTree>),
}

impl FieldTree {
    pub(crate) fn from_paths(paths: &[String]) -> HashMap<String, FieldTree> {
        let mut root = HashMap::new();
        for path in paths {
            insert_path(&mut root, path);
        }
        root
    }
}

fn insert_path(tree: &mut HashMap<String, FieldTree>, path: &str) {
    match path.split_once('.') {
        None => {
            // A shorter path wins over any deeper one already recorded.
            tree.insert(path.to_string(), FieldTree::Leaf);
        }
        Some((head, rest)) => {
            let node = tree
                .entry(head.to_string())
                .or_insert_with(|| FieldTree::Branch(HashMap::new()));
            if let FieldTree::Branch(children) = node {
                insert_path(children, rest);
            }
        }
    }
}

/// Copy the fields selected by `tree` into a new document. `_id` is always kept.
pub(crate) fn project_document(src: &Document, tree: &HashMap<String, FieldTree>) -> Document {
    let mut dest = Document::new();
    for (key, value) in src {
        if key == "_id" {
            dest.insert("_id", value.clone());
            continue;
        }

        let node = match tree.get(key) {
            Some(node) => node,
            None => continue,
        };

        match (node, value) {
            (FieldTree::Leaf, _) => {
                dest.insert(key, value.clone());
            }
            (FieldTree::Branch(children), Bson::Document(sub_doc)) => {
                dest.insert(key, project_nested(sub_doc, children));
            }
            (FieldTree::Branch(children), Bson::Array(items)) => {
                let projected: Vec<Bson> = items
                    .iter()
                    .map(|item| match item {
                        Bson::Document(elem) => project_nested(elem, children),
                        other => other.clone(),
                    })
                    .collect();
                dest.insert(key, projected);
            }
            (FieldTree::Branch(_), _) => {
                dest.insert(key, value.clone());
            }
        }
    }
    dest
}

fn project_nested(src: &Document, tree: &HashMap<String, FieldTree>) -> Bson {
    let mut dest = Document::new();
    for (key, value) in src {
        match (tree.get(key), value) {
            (Some(FieldTree::Leaf), _) => {
                dest.insert(key, value.clone());
            }
            (Some(FieldTree::Branch(children)), Bson::Document(sub_doc)) => {
                dest.insert(key, project_nested(sub_doc, children));
            }
            (Some(FieldTree::Branch(_)), _) => {
                dest.insert(key, value.clone());
            }
            (None, _) => {}
        }
    }
    Bson::Document(dest)
}

/// Copy every field of `src` except those selected by `tree`.
///
/// A leaf drops the whole field; a branch descends into embedded documents
/// and into each document element of an array.
pub(crate) fn exclude_fields(src: &Document, tree: &HashMap<String, FieldTree>) -> Document {
    let mut dest = Document::new();
    for (key, value) in src {
        match (tree.get(key), value) {
            (Some(FieldTree::Leaf), _) => {}
            (Some(FieldTree::Branch(children)), Bson::Document(sub_doc)) => {
                dest.insert(key, exclude_fields(sub_doc, children));
            }
            (Some(FieldTree::Branch(children)), Bson::Array(items)) => {
                let trimmed: Vec<Bson> = items
                    .iter()
                    .map(|item| match item {
                        Bson::Document(elem) => Bson::Document(exclude_fields(elem, children)),
                        other => other.clone(),
                    })
                    .collect();
                dest.insert(key, trimmed);
            }
            _ => {
                dest.insert(key, value.clone());
            }
        }
    }
    dest
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn shorter_path_overrides_branch() {
        let tree = FieldTree::from_paths(&paths(&["author.name", "author"]));
        assert_eq!(tree.get("author"), Some(&FieldTree::Leaf));
    }

    #[test]
    fn keeps_id_and_selected_fields() {
        let tree = FieldTree::from_paths(&paths(&["title"]));
        let projected = project_document(
            &doc! { "_id": 1_i32, "title": "t", "content": "c" },
            &tree,
        );
        assert_eq!(projected, doc! { "_id": 1_i32, "title": "t" });
    }

    #[test]
    fn nested_paths_trim_embedded_documents() {
        let tree = FieldTree::from_paths(&paths(&["author.name"]));
        let projected = project_document(
            &doc! {
                "_id": 1_i32,
                "author": { "name": "Ada", "email": "ada@example.com" },
                "reviews": [{ "name": "x" }],
            },
            &tree,
        );
        assert_eq!(projected, doc! { "_id": 1_i32, "author": { "name": "Ada" } });
    }

    #[test]
    fn exclusion_drops_leaves_and_nested_paths() {
        let tree = FieldTree::from_paths(&paths(&["content", "author.email", "comments.by"]));
        let trimmed = exclude_fields(
            &doc! {
                "_id": 1_i32,
                "title": "t",
                "content": "c",
                "author": { "name": "Ada", "email": "ada@example.com" },
                "comments": [{ "body": "a", "by": "x" }, "loose"],
            },
            &tree,
        );
        assert_eq!(
            trimmed,
            doc! {
                "_id": 1_i32,
                "title": "t",
                "author": { "name": "Ada" },
                "comments": [{ "body": "a" }, "loose"],
            }
        );
    }

    #[test]
    fn branch_over_array_projects_each_element() {
        let tree = FieldTree::from_paths(&paths(&["comments.body"]));
        let projected = project_document(
            &doc! { "_id": 1_i32, "comments": [{ "body": "a", "by": "x" }, "loose"] },
            &tree,
        );
        assert_eq!(
            projected,
            doc! { "_id": 1_i32, "comments": [{ "body": "a" }, "loose"] }
        );
    }
}
