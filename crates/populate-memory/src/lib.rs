mod collection;
mod error;
mod eval;
mod field_tree;
mod path;

pub use collection::MemoryCollection;
pub use error::MemoryError;
pub use eval::{compare_values, matches, value_eq};
