use bson::{Bson, Document};

use crate::owner::OWNER_KEY_FIELD;

/// The owner identifiers a foreign document points at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum References<'a> {
    Scalar(&'a Bson),
    Sequence(&'a [Bson]),
}

impl<'a> References<'a> {
    /// Read `id_field` (dot-notation allowed) from `entity`.
    ///
    /// A missing or null field yields `None`: the document references nobody.
    pub fn extract(entity: &'a Document, id_field: &str) -> Option<Self> {
        match lookup(entity, id_field)? {
            Bson::Null => None,
            Bson::Array(ids) => Some(References::Sequence(ids)),
            id => Some(References::Scalar(id)),
        }
    }

    /// The identifiers as a sequence of one or more values.
    ///
    /// A reference that was itself populated into a document contributes
    /// that document's `_id`.
    pub fn ids(self) -> impl Iterator<Item = &'a Bson> {
        let values: &'a [Bson] = match self {
            References::Scalar(id) => std::slice::from_ref(id),
            References::Sequence(ids) => ids,
        };
        values.iter().map(reference_id)
    }

    pub fn len(&self) -> usize {
        match self {
            References::Scalar(_) => 1,
            References::Sequence(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn reference_id(value: &Bson) -> &Bson {
    match value {
        Bson::Document(doc) => doc.get(OWNER_KEY_FIELD).unwrap_or(value),
        other => other,
    }
}

fn lookup<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut parts = path.split('.');
    let mut current = doc.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Bson::Document(sub) => sub.get(part)?,
            _ => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn scalar_reference() {
        let post = doc! { "author": "a-1" };
        let refs = References::extract(&post, "author").unwrap();
        assert_eq!(refs, References::Scalar(&Bson::String("a-1".into())));
        assert_eq!(refs.ids().collect::<Vec<_>>(), vec![&Bson::String("a-1".into())]);
    }

    #[test]
    fn sequence_reference() {
        let post = doc! { "categories": ["c-1", "c-2"] };
        let refs = References::extract(&post, "categories").unwrap();
        assert_eq!(refs.len(), 2);
        assert!(matches!(refs, References::Sequence(_)));
    }

    #[test]
    fn empty_sequence() {
        let post = doc! { "categories": [] };
        let refs = References::extract(&post, "categories").unwrap();
        assert!(refs.is_empty());
        assert_eq!(refs.ids().count(), 0);
    }

    #[test]
    fn missing_or_null_references_nobody() {
        let post = doc! { "author": Bson::Null };
        assert_eq!(References::extract(&post, "author"), None);
        assert_eq!(References::extract(&post, "editor"), None);
    }

    #[test]
    fn populated_references_yield_their_ids() {
        let post = doc! { "categories": [{ "_id": "c-1", "name": "rust" }, "c-2"] };
        let refs = References::extract(&post, "categories").unwrap();
        let ids: Vec<&Bson> = refs.ids().collect();
        assert_eq!(
            ids,
            vec![&Bson::String("c-1".into()), &Bson::String("c-2".into())]
        );
    }

    #[test]
    fn nested_path() {
        let post = doc! { "meta": { "owner": 5_i32 } };
        let refs = References::extract(&post, "meta.owner").unwrap();
        assert_eq!(refs, References::Scalar(&Bson::Int32(5)));
    }
}
