use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum MemoryError {
    /// The collection was configured to fail every query.
    Unavailable(String),
    /// A lock guarding the records was poisoned by a panicking writer.
    Poisoned(String),
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::Unavailable(msg) => write!(f, "collection unavailable: {msg}"),
            MemoryError::Poisoned(name) => write!(f, "collection lock poisoned: {name}"),
        }
    }
}

impl std::error::Error for MemoryError {}
