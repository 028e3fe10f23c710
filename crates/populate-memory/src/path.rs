use bson::{Bson, Document};

/// Resolve a dot-notation path against a document.
///
/// Only descends through embedded documents; a path that crosses an array
/// or a scalar resolves to `None`.
pub(crate) fn get_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
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
    fn nested_lookup() {
        let doc = doc! { "author": { "name": { "first": "Ada" } }, "title": "t" };
        assert_eq!(
            get_path(&doc, "author.name.first"),
            Some(&Bson::String("Ada".into()))
        );
        assert_eq!(get_path(&doc, "title"), Some(&Bson::String("t".into())));
        assert_eq!(get_path(&doc, "title.length"), None);
        assert_eq!(get_path(&doc, "missing"), None);
    }
}
