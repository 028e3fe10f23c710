use populate_query::Collection;
use tracing::debug;

use crate::bind::Binding;
use crate::error::PopulateError;
use crate::index::key_by;
use crate::options::PopulateOptions;
use crate::owner::{OWNER_KEY_FIELD, Owner};
use crate::query::build_query;

/// Query `foreign_model` once and attach each result to the owners it
/// references.
///
/// Returns the same owner slice. Validation failures and empty input leave
/// the owners untouched; an empty slice never reaches the collaborator.
pub async fn reverse_populate<'a, O, C>(
    options: PopulateOptions<'a, O, C>,
) -> Result<&'a mut [O], PopulateError>
where
    O: Owner,
    C: Collection,
{
    let options = options.check_required()?;

    if options.model_array.is_empty() {
        debug!("owner array is empty, nothing to do");
        return Ok(options.model_array);
    }

    let index = key_by(options.model_array, OWNER_KEY_FIELD);
    let query = build_query(&options, &index);
    debug!(
        collection = %query.query().collection,
        owners = options.model_array.len(),
        ids = index.len(),
        id_field = %options.id_field,
        "executing reverse populate query"
    );

    let results = query.execute().await?;

    let binding = Binding {
        id_field: &options.id_field,
        store_where: &options.store_where,
        array_pop: options.array_pop,
    };
    let summary = binding.bind(options.model_array, &index, results);
    debug!(
        rows = summary.rows,
        bound = summary.bound,
        dangling = summary.dangling,
        store_where = %options.store_where,
        "reverse populate bound results"
    );

    Ok(options.model_array)
}
