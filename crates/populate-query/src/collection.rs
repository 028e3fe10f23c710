use std::future::Future;

use bson::Document;

use crate::query::Query;

/// Boxed error returned by a collaborator, kept verbatim for the caller.
pub type QueryError = Box<dyn std::error::Error + Send + Sync>;

/// A queryable collection of documents.
///
/// Implementors own execution entirely: how the filter is evaluated, how
/// `populate` directives are resolved, and any timeout or retry policy.
pub trait Collection: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn name(&self) -> &str;

    fn find(&self, query: &Query) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send;
}
