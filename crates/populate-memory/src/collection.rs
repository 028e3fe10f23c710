use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, RwLock};

use bson::oid::ObjectId;
use bson::{Bson, Document};
use populate_query::{Collection, Populate, ProjectionKind, Query, Sort, SortDirection};
use tracing::debug;

use crate::error::MemoryError;
use crate::eval::{compare_values, matches, value_eq};
use crate::field_tree::{FieldTree, exclude_fields, project_document};
use crate::path::get_path;

/// An in-memory collection that answers `Query` descriptions.
///
/// Execution order is filter → sort → projection → populate, so sort keys
/// need not be projected and populated paths must survive the projection.
/// Nested populate paths are resolved against collections registered with
/// [`MemoryCollection::with_relation`], matching on `_id`.
#[derive(Debug)]
pub struct MemoryCollection {
    name: String,
    records: RwLock<Vec<Document>>,
    relations: HashMap<String, Arc<MemoryCollection>>,
    failure: Option<String>,
    executions: AtomicUsize,
    last_query: Mutex<Option<Query>>,
}

impl MemoryCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: RwLock::new(Vec::new()),
            relations: HashMap::new(),
            failure: None,
            executions: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    /// Resolve populate directives for `path` against `related`.
    pub fn with_relation(mut self, path: impl Into<String>, related: Arc<MemoryCollection>) -> Self {
        self.relations.insert(path.into(), related);
        self
    }

    /// Make every query fail with `MemoryError::Unavailable(message)`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Append documents, assigning an ObjectId `_id` to any that lack one.
    /// Returns the stored documents in insertion order.
    pub fn insert_many(
        &self,
        docs: impl IntoIterator<Item = Document>,
    ) -> Result<Vec<Document>, MemoryError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| MemoryError::Poisoned(self.name.clone()))?;

        let mut inserted = Vec::new();
        for mut doc in docs {
            if !doc.contains_key("_id") {
                doc.insert("_id", ObjectId::new());
            }
            records.push(doc.clone());
            inserted.push(doc);
        }
        Ok(inserted)
    }

    pub fn insert_one(&self, doc: Document) -> Result<Document, MemoryError> {
        let mut inserted = self.insert_many([doc])?;
        inserted
            .pop()
            .ok_or_else(|| MemoryError::Poisoned(self.name.clone()))
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `find` calls answered (or failed) so far.
    pub fn executions(&self) -> usize {
        self.executions.load(AtomicOrdering::SeqCst)
    }

    /// The most recent query handed to `find`.
    pub fn last_query(&self) -> Option<Query> {
        self.last_query.lock().ok().and_then(|q| q.clone())
    }

    fn run(&self, query: &Query) -> Result<Vec<Document>, MemoryError> {
        self.executions.fetch_add(1, AtomicOrdering::SeqCst);
        if let Ok(mut last) = self.last_query.lock() {
            *last = Some(query.clone());
        }

        if let Some(msg) = &self.failure {
            return Err(MemoryError::Unavailable(msg.clone()));
        }

        let records = self
            .records
            .read()
            .map_err(|_| MemoryError::Poisoned(self.name.clone()))?;

        let mut found: Vec<Document> = records
            .iter()
            .filter(|doc| matches(doc, &query.filter))
            .cloned()
            .collect();
        drop(records);

        sort_records(&mut found, &query.sort);

        if let Some(projection) = query.projection.as_ref().filter(|p| !p.is_empty()) {
            let tree = FieldTree::from_paths(projection.fields());
            found = match projection.kind() {
                ProjectionKind::Include => {
                    found.iter().map(|doc| project_document(doc, &tree)).collect()
                }
                ProjectionKind::Exclude => {
                    found.iter().map(|doc| exclude_fields(doc, &tree)).collect()
                }
            };
        }

        if let Some(populate) = &query.populate {
            for doc in &mut found {
                self.resolve(doc, populate)?;
            }
        }

        debug!(collection = %self.name, matched = found.len(), "memory query executed");
        Ok(found)
    }

    /// Replace ids under each populated path with the related documents.
    fn resolve(&self, doc: &mut Document, populate: &Populate) -> Result<(), MemoryError> {
        for path in populate.paths() {
            let related = match self.relations.get(path) {
                Some(related) => related,
                None => continue,
            };
            let resolved = match doc.get(path) {
                Some(Bson::Array(ids)) => Bson::Array(
                    ids.iter()
                        .filter_map(|id| related.lookup(id).transpose())
                        .map(|r| r.map(Bson::Document))
                        .collect::<Result<Vec<_>, _>>()?,
                ),
                Some(id) => related.lookup(id)?.map(Bson::Document).unwrap_or(Bson::Null),
                None => continue,
            };
            doc.insert(path, resolved);
        }
        Ok(())
    }

    fn lookup(&self, id: &Bson) -> Result<Option<Document>, MemoryError> {
        let records = self
            .records
            .read()
            .map_err(|_| MemoryError::Poisoned(self.name.clone()))?;
        Ok(records
            .iter()
            .find(|doc| doc.get("_id").is_some_and(|own| value_eq(own, id)))
            .cloned())
    }
}

fn sort_records(records: &mut [Document], sorts: &[Sort]) {
    if sorts.is_empty() {
        return;
    }

    // Stable sort: ties keep insertion order.
    records.sort_by(|a, b| {
        for sort in sorts {
            let ord = compare_values(get_path(a, &sort.field), get_path(b, &sort.field));
            let ord = match sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

impl Collection for MemoryCollection {
    type Error = MemoryError;

    fn name(&self) -> &str {
        &self.name
    }

    async fn find(&self, query: &Query) -> Result<Vec<Document>, MemoryError> {
        self.run(query)
    }
}
