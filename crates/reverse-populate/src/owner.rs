use std::collections::BTreeMap;

use bson::{Bson, Document};

/// Field holding an owner's identifier.
pub const OWNER_KEY_FIELD: &str = "_id";

/// An entity that can receive populated documents under a named property.
pub trait Owner {
    /// Read a field by name. Used to find the owner's identifier.
    fn field(&self, name: &str) -> Option<&Bson>;

    /// Put `property` into its pre-binding state: an empty sequence when
    /// `array_pop` is set, absent otherwise.
    fn reset_populated(&mut self, property: &str, array_pop: bool);

    /// Append to the sequence under `property`, creating it if needed.
    fn push_populated(&mut self, property: &str, entity: Document);

    /// Replace `property` with a single entity.
    fn set_populated(&mut self, property: &str, entity: Document);
}

impl Owner for Document {
    fn field(&self, name: &str) -> Option<&Bson> {
        self.get(name)
    }

    fn reset_populated(&mut self, property: &str, array_pop: bool) {
        if array_pop {
            self.insert(property, Bson::Array(Vec::new()));
        } else {
            self.remove(property);
        }
    }

    fn push_populated(&mut self, property: &str, entity: Document) {
        if let Some(Bson::Array(items)) = self.get_mut(property) {
            items.push(Bson::Document(entity));
            return;
        }
        self.insert(property, Bson::Array(vec![Bson::Document(entity)]));
    }

    fn set_populated(&mut self, property: &str, entity: Document) {
        self.insert(property, Bson::Document(entity));
    }
}

/// Documents attached to a [`Record`] under one property.
#[derive(Debug, Clone, PartialEq)]
pub enum Populated {
    Many(Vec<Document>),
    One(Document),
}

/// A typed owner: an identifier, caller data, and populated properties.
///
/// Use this when owners are plain Rust structs rather than documents.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    pub id: Bson,
    pub data: T,
    populated: BTreeMap<String, Populated>,
}

impl<T> Record<T> {
    pub fn new(id: impl Into<Bson>, data: T) -> Self {
        Self {
            id: id.into(),
            data,
            populated: BTreeMap::new(),
        }
    }

    pub fn populated(&self, property: &str) -> Option<&Populated> {
        self.populated.get(property)
    }

    /// Documents under an array property; empty when absent or singular.
    pub fn many(&self, property: &str) -> &[Document] {
        match self.populated.get(property) {
            Some(Populated::Many(items)) => items,
            _ => &[],
        }
    }

    /// The document under a singular property.
    pub fn one(&self, property: &str) -> Option<&Document> {
        match self.populated.get(property) {
            Some(Populated::One(entity)) => Some(entity),
            _ => None,
        }
    }
}

impl<T> Owner for Record<T> {
    fn field(&self, name: &str) -> Option<&Bson> {
        (name == OWNER_KEY_FIELD).then_some(&self.id)
    }

    fn reset_populated(&mut self, property: &str, array_pop: bool) {
        if array_pop {
            self.populated
                .insert(property.to_string(), Populated::Many(Vec::new()));
        } else {
            self.populated.remove(property);
        }
    }

    fn push_populated(&mut self, property: &str, entity: Document) {
        if let Some(Populated::Many(items)) = self.populated.get_mut(property) {
            items.push(entity);
            return;
        }
        self.populated
            .insert(property.to_string(), Populated::Many(vec![entity]));
    }

    fn set_populated(&mut self, property: &str, entity: Document) {
        self.populated
            .insert(property.to_string(), Populated::One(entity));
    }
}
