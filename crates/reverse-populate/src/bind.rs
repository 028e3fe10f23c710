use bson::Document;
use tracing::trace;

use crate::index::{Collision, OwnerIndex};
use crate::owner::Owner;
use crate::reference::References;

/// Several foreign documents matching one owner in singular mode: the
/// document processed last (in result order) is kept.
pub const SINGULAR_MATCH_POLICY: Collision = Collision::LastWriteWins;

/// Attach one matched foreign document to one owner.
pub fn populate_result<O: Owner + ?Sized>(
    store_where: &str,
    array_pop: bool,
    owner: &mut O,
    entity: Document,
) {
    if array_pop {
        owner.push_populated(store_where, entity);
    } else {
        owner.set_populated(store_where, entity);
    }
}

/// Counts from one binding walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindSummary {
    pub rows: usize,
    /// (document, owner) pairs attached.
    pub bound: usize,
    /// Identifiers that matched no indexed owner.
    pub dangling: usize,
}

/// Where and how query results are attached.
#[derive(Debug, Clone, Copy)]
pub struct Binding<'s> {
    pub id_field: &'s str,
    pub store_where: &'s str,
    pub array_pop: bool,
}

impl Binding<'_> {
    /// Reset every owner's property, then attach each result to the owners
    /// it references.
    ///
    /// A result is attached at most once per owner even if its reference
    /// array repeats an identifier; a result shared by several owners is
    /// cloned for all but the last.
    pub fn bind<O: Owner>(
        &self,
        owners: &mut [O],
        index: &OwnerIndex,
        results: Vec<Document>,
    ) -> BindSummary {
        for owner in owners.iter_mut() {
            owner.reset_populated(self.store_where, self.array_pop);
        }

        let mut summary = BindSummary {
            rows: results.len(),
            ..BindSummary::default()
        };

        for entity in results {
            let mut targets: Vec<usize> = Vec::new();
            if let Some(references) = References::extract(&entity, self.id_field) {
                for id in references.ids() {
                    match index.get(id) {
                        Some(position) if !targets.contains(&position) => targets.push(position),
                        Some(_) => {}
                        None => {
                            summary.dangling += 1;
                            trace!(%id, id_field = self.id_field, "dangling reference skipped");
                        }
                    }
                }
            }

            summary.bound += targets.len();
            if let Some((&last, rest)) = targets.split_last() {
                for &position in rest {
                    populate_result(
                        self.store_where,
                        self.array_pop,
                        &mut owners[position],
                        entity.clone(),
                    );
                }
                populate_result(self.store_where, self.array_pop, &mut owners[last], entity);
            }
        }

        summary
    }
}
