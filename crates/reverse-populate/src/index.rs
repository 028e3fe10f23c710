use std::collections::HashMap;
use std::fmt;

use bson::Bson;
use tracing::trace;

use crate::owner::Owner;

/// How a write to an already-claimed slot is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// The entry processed later replaces the earlier one.
    LastWriteWins,
}

/// Two owners sharing an identifier: the later one in the slice is indexed.
pub const DUPLICATE_OWNER_POLICY: Collision = Collision::LastWriteWins;

/// An identifier normalised to a string so that values of different BSON
/// types naming the same owner (an ObjectId and its hex string, `1` and
/// `1.0`) land on the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerKey(String);

impl OwnerKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Bson> for OwnerKey {
    fn from(value: &Bson) -> Self {
        let key = match value {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(s) => s.clone(),
            Bson::Int32(v) => v.to_string(),
            Bson::Int64(v) => v.to_string(),
            // -0.0 names the same owner as 0
            Bson::Double(v) if *v == 0.0 => "0".to_string(),
            Bson::Double(v) => v.to_string(),
            Bson::Boolean(v) => v.to_string(),
            other => other.to_string(),
        };
        OwnerKey(key)
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lookup from owner identifier to the owner's position in its slice.
#[derive(Debug, Clone, Default)]
pub struct OwnerIndex {
    positions: HashMap<OwnerKey, usize>,
    ids: Vec<Bson>,
}

impl OwnerIndex {
    pub fn get(&self, id: &Bson) -> Option<usize> {
        self.positions.get(&OwnerKey::from(id)).copied()
    }

    /// Distinct identifiers in first-seen order.
    pub fn ids(&self) -> &[Bson] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Index `owners` by the value of `key_field`.
///
/// Owners without the field (or with a null value) are left out. Duplicate
/// identifiers follow [`DUPLICATE_OWNER_POLICY`].
pub fn key_by<O: Owner>(owners: &[O], key_field: &str) -> OwnerIndex {
    let mut index = OwnerIndex::default();
    for (position, owner) in owners.iter().enumerate() {
        let id = match owner.field(key_field) {
            Some(Bson::Null) | None => {
                trace!(position, key_field, "owner has no identifier, not indexed");
                continue;
            }
            Some(id) => id,
        };
        if index.positions.insert(OwnerKey::from(id), position).is_none() {
            index.ids.push(id.clone());
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;
    use bson::{Document, doc};

    #[test]
    fn keys_by_named_field() {
        let items = vec![
            doc! { "name": "foo", "input": "bar" },
            doc! { "name": "baz", "input": "zle" },
        ];
        let index = key_by(&items, "name");
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(&Bson::String("foo".into())), Some(0));
        assert_eq!(index.get(&Bson::String("baz".into())), Some(1));
        assert_eq!(index.get(&Bson::String("bar".into())), None);
    }

    #[test]
    fn duplicate_ids_keep_last_owner() {
        assert_eq!(DUPLICATE_OWNER_POLICY, Collision::LastWriteWins);
        let owners = vec![
            doc! { "_id": "a", "n": 1_i32 },
            doc! { "_id": "b", "n": 2_i32 },
            doc! { "_id": "a", "n": 3_i32 },
        ];
        let index = key_by(&owners, "_id");
        assert_eq!(index.get(&Bson::String("a".into())), Some(2));
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.ids(),
            &[Bson::String("a".into()), Bson::String("b".into())]
        );
    }

    #[test]
    fn object_id_matches_hex_string() {
        let oid = ObjectId::new();
        let owners = vec![doc! { "_id": oid }];
        let index = key_by(&owners, "_id");
        assert_eq!(index.get(&Bson::String(oid.to_hex())), Some(0));
        assert_eq!(index.get(&Bson::ObjectId(oid)), Some(0));
    }

    #[test]
    fn numeric_ids_compare_across_types() {
        let owners = vec![doc! { "_id": 7_i32 }];
        let index = key_by(&owners, "_id");
        assert_eq!(index.get(&Bson::Int64(7)), Some(0));
        assert_eq!(index.get(&Bson::Double(7.0)), Some(0));
        assert_eq!(index.get(&Bson::String("7".into())), Some(0));
    }

    #[test]
    fn signed_zero_matches_integer_zero() {
        let owners = vec![doc! { "_id": 0_i32 }];
        let index = key_by(&owners, "_id");
        assert_eq!(index.get(&Bson::Double(-0.0)), Some(0));
        assert_eq!(index.get(&Bson::Double(0.0)), Some(0));
        assert_eq!(OwnerKey::from(&Bson::Double(-0.0)).as_str(), "0");
    }

    #[test]
    fn owners_without_id_are_skipped() {
        let owners: Vec<Document> = vec![doc! { "name": "x" }, doc! { "_id": Bson::Null }];
        assert!(key_by(&owners, "_id").is_empty());
    }
}
