use std::sync::Arc;

use bson::{Bson, Document, doc};
use populate_memory::MemoryCollection;

pub const POST_TITLES: [&str; 5] = ["echo", "delta", "charlie", "bravo", "alpha"];

/// Two categories, one author, five posts each tagged with both categories
/// and written by the author.
pub struct Blog {
    pub categories: Vec<Document>,
    pub authors: Vec<Document>,
    pub posts: Vec<Document>,
    pub post_collection: MemoryCollection,
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
        .with_test_writer()
        .try_init();
}

pub fn seed_blog() -> Blog {
    init_tracing();

    let category_collection = Arc::new(MemoryCollection::new("categories"));
    let categories = category_collection
        .insert_many(vec![doc! { "name": "rust" }, doc! { "name": "databases" }])
        .unwrap();

    let author_collection = MemoryCollection::new("authors");
    let authors = author_collection
        .insert_many(vec![doc! { "firstName": "Ada", "lastName": "Lovelace" }])
        .unwrap();

    let category_ids: Vec<Bson> = categories.iter().map(|c| id_of(c).clone()).collect();
    let author_id = id_of(&authors[0]).clone();

    let post_collection =
        MemoryCollection::new("posts").with_relation("categories", category_collection);
    let posts = post_collection
        .insert_many(POST_TITLES.iter().map(|title| {
            doc! {
                "title": *title,
                "categories": category_ids.clone(),
                "author": author_id.clone(),
                "content": format!("{title} body"),
            }
        }))
        .unwrap();

    Blog {
        categories,
        authors,
        posts,
        post_collection,
    }
}

/// Two persons, each owning one passport.
pub struct Registry {
    pub persons: Vec<Document>,
    pub passports: Vec<Document>,
    pub passport_collection: MemoryCollection,
}

pub fn seed_registry() -> Registry {
    init_tracing();

    let person_collection = MemoryCollection::new("persons");
    let persons = person_collection
        .insert_many(vec![
            doc! { "firstName": "Grace", "lastName": "Hopper" },
            doc! { "firstName": "Alan", "lastName": "Turing" },
        ])
        .unwrap();

    let passport_collection = MemoryCollection::new("passports");
    let passports = passport_collection
        .insert_many(vec![
            doc! { "number": "P-100", "owner": id_of(&persons[0]).clone() },
            doc! { "number": "P-200", "owner": id_of(&persons[1]).clone() },
        ])
        .unwrap();

    Registry {
        persons,
        passports,
        passport_collection,
    }
}

pub fn id_of(doc: &Document) -> &Bson {
    doc.get("_id").unwrap()
}

/// The documents stored under an array property.
pub fn populated<'a>(owner: &'a Document, property: &str) -> Vec<&'a Document> {
    owner
        .get_array(property)
        .unwrap()
        .iter()
        .map(|b| match b {
            Bson::Document(d) => d,
            other => panic!("expected populated document, got {other:?}"),
        })
        .collect()
}

/// Assert both sides hold the same `_id`s, ignoring order.
pub fn ids_match(actual: &[&Document], expected: &[Document]) {
    let mut actual: Vec<String> = actual.iter().map(|d| id_of(d).to_string()).collect();
    let mut expected: Vec<String> = expected.iter().map(|d| id_of(d).to_string()).collect();
    actual.sort();
    expected.sort();
    assert_eq!(actual, expected);
}
