use bson::{Bson, Document};
use populate_query::{Collection, Filter, FilterGroup, Operator, Query, merge_filters};

use crate::error::PopulateError;
use crate::index::OwnerIndex;
use crate::options::Validated;

/// A query bound to the collection that will run it.
#[derive(Debug)]
pub struct PreparedQuery<'a, C> {
    collection: &'a C,
    query: Query,
}

impl<'a, C: Collection> PreparedQuery<'a, C> {
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Run the query once. Collaborator errors are returned untouched.
    pub async fn execute(&self) -> Result<Vec<Document>, PopulateError> {
        self.collection
            .find(&self.query)
            .await
            .map_err(|e| PopulateError::Query(Box::new(e)))
    }
}

/// `id_field` must exist and reference one of `ids`.
pub fn reference_constraint(id_field: &str, ids: &[Bson]) -> FilterGroup {
    FilterGroup::and(vec![
        Filter::new(id_field, Operator::Exists, true).into(),
        Filter::new(id_field, Operator::In, Bson::Array(ids.to_vec())).into(),
    ])
}

/// Describe the single find that feeds a reverse populate.
///
/// Caller filters are ANDed with the reference constraint, so they can
/// narrow the result but never drop it. A projection never hides
/// `id_field`, which binding needs; a selection naming no fields is the
/// same as no selection.
pub fn build_query<'a, O, C: Collection>(
    options: &Validated<'a, O, C>,
    index: &OwnerIndex,
) -> PreparedQuery<'a, C> {
    let base = reference_constraint(&options.id_field, index.ids());
    let filter = merge_filters(Some(&base), options.filters.as_ref()).unwrap_or(base);

    let projection = options
        .select
        .clone()
        .filter(|projection| !projection.is_empty())
        .and_then(|mut projection| {
            projection.retain(&options.id_field);
            (!projection.is_empty()).then_some(projection)
        });

    PreparedQuery {
        collection: options.foreign_model,
        query: Query {
            collection: options.foreign_model.name().to_string(),
            filter,
            projection,
            sort: options.sort.clone(),
            populate: options.populate.clone(),
        },
    }
}
