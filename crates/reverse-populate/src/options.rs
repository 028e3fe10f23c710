use std::fmt;

use populate_query::{FilterGroup, Populate, Projection, Sort};

use crate::error::PopulateError;

/// The options a reverse populate cannot run without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    ModelArray,
    StoreWhere,
    ArrayPop,
    ForeignModel,
    IdField,
}

/// Validation order: the first missing field in this list is reported.
pub const REQUIRED_FIELDS: [RequiredField; 5] = [
    RequiredField::ModelArray,
    RequiredField::StoreWhere,
    RequiredField::ArrayPop,
    RequiredField::ForeignModel,
    RequiredField::IdField,
];

impl RequiredField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredField::ModelArray => "modelArray",
            RequiredField::StoreWhere => "storeWhere",
            RequiredField::ArrayPop => "arrayPop",
            RequiredField::ForeignModel => "foreignModel",
            RequiredField::IdField => "idField",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for one reverse populate call.
///
/// Every field is optional at construction so callers can assemble options
/// piecemeal; [`PopulateOptions::check_required`] turns them into a
/// [`Validated`] set or names the first missing mandatory field.
pub struct PopulateOptions<'a, O, C> {
    /// Owners to enrich. An empty slice is valid and short-circuits.
    pub model_array: Option<&'a mut [O]>,
    /// Property on each owner receiving populated documents.
    pub store_where: Option<String>,
    /// `true`: the property holds every match. `false`: a single match.
    pub array_pop: Option<bool>,
    /// The foreign collection to query.
    pub foreign_model: Option<&'a C>,
    /// Field on foreign documents that references owner `_id`s.
    pub id_field: Option<String>,
    pub filters: Option<FilterGroup>,
    pub select: Option<Projection>,
    pub sort: Vec<Sort>,
    pub populate: Option<Populate>,
}

impl<O, C> Default for PopulateOptions<'_, O, C> {
    fn default() -> Self {
        Self {
            model_array: None,
            store_where: None,
            array_pop: None,
            foreign_model: None,
            id_field: None,
            filters: None,
            select: None,
            sort: Vec::new(),
            populate: None,
        }
    }
}

impl<'a, O, C> PopulateOptions<'a, O, C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model_array(mut self, owners: &'a mut [O]) -> Self {
        self.model_array = Some(owners);
        self
    }

    pub fn store_where(mut self, property: impl Into<String>) -> Self {
        self.store_where = Some(property.into());
        self
    }

    pub fn array_pop(mut self, array_pop: bool) -> Self {
        self.array_pop = Some(array_pop);
        self
    }

    pub fn foreign_model(mut self, collection: &'a C) -> Self {
        self.foreign_model = Some(collection);
        self
    }

    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = Some(field.into());
        self
    }

    pub fn filters(mut self, filters: FilterGroup) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn select(mut self, projection: Projection) -> Self {
        self.select = Some(projection);
        self
    }

    pub fn sort(mut self, sort: Vec<Sort>) -> Self {
        self.sort = sort;
        self
    }

    pub fn populate(mut self, populate: impl Into<Populate>) -> Self {
        self.populate = Some(populate.into());
        self
    }

    /// The first mandatory field that is unset, in [`REQUIRED_FIELDS`] order.
    ///
    /// Empty strings count as unset; `array_pop = Some(false)` is set.
    pub fn missing_field(&self) -> Option<RequiredField> {
        REQUIRED_FIELDS.into_iter().find(|field| match field {
            RequiredField::ModelArray => self.model_array.is_none(),
            RequiredField::StoreWhere => is_blank(&self.store_where),
            RequiredField::ArrayPop => self.array_pop.is_none(),
            RequiredField::ForeignModel => self.foreign_model.is_none(),
            RequiredField::IdField => is_blank(&self.id_field),
        })
    }

    pub fn check_required(self) -> Result<Validated<'a, O, C>, PopulateError> {
        let missing = PopulateError::MissingField;

        // Same order as REQUIRED_FIELDS.
        let model_array = self
            .model_array
            .ok_or(missing(RequiredField::ModelArray))?;
        let store_where = self
            .store_where
            .filter(|s| !s.is_empty())
            .ok_or(missing(RequiredField::StoreWhere))?;
        let array_pop = self.array_pop.ok_or(missing(RequiredField::ArrayPop))?;
        let foreign_model = self
            .foreign_model
            .ok_or(missing(RequiredField::ForeignModel))?;
        let id_field = self
            .id_field
            .filter(|s| !s.is_empty())
            .ok_or(missing(RequiredField::IdField))?;

        Ok(Validated {
            model_array,
            store_where,
            array_pop,
            foreign_model,
            id_field,
            filters: self.filters,
            select: self.select,
            sort: self.sort,
            populate: self.populate,
        })
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

/// Options with every mandatory field present.
pub struct Validated<'a, O, C> {
    pub model_array: &'a mut [O],
    pub store_where: String,
    pub array_pop: bool,
    pub foreign_model: &'a C,
    pub id_field: String,
    pub filters: Option<FilterGroup>,
    pub select: Option<Projection>,
    pub sort: Vec<Sort>,
    pub populate: Option<Populate>,
}
