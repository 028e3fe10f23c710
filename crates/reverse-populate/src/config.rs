use bson::Document;
use populate_query::{Populate, Projection, ProjectionParseError, Sort, parse_filter, parse_sort};
use serde::{Deserialize, Serialize};

use crate::error::PopulateError;
use crate::options::PopulateOptions;

/// Field selection: `"title author"`, `"-content"` or `["title", "author"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldList {
    Text(String),
    Fields(Vec<String>),
}

impl FieldList {
    pub fn to_projection(&self) -> Result<Projection, ProjectionParseError> {
        match self {
            FieldList::Text(spec) => Projection::parse(spec),
            FieldList::Fields(fields) => Projection::from_tokens(fields.iter().map(String::as_str)),
        }
    }
}

/// Ordering: `"title -created"` or `[{ "field": "title", "direction": "asc" }]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SortSpec {
    Text(String),
    Fields(Vec<Sort>),
}

impl SortSpec {
    pub fn to_sorts(&self) -> Vec<Sort> {
        match self {
            SortSpec::Text(spec) => parse_sort(spec),
            SortSpec::Fields(sorts) => sorts.clone(),
        }
    }
}

/// Serializable reverse populate settings.
///
/// Holds everything except the owners and the foreign collection, which are
/// supplied at run time through [`PopulateConfig::into_options`].
///
/// ```json
/// { "storeWhere": "posts", "arrayPop": true, "idField": "author",
///   "filters": { "title": { "$ne": "draft" } }, "select": "title",
///   "sort": "-title", "populate": "categories" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PopulateConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_where: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_pop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<FieldList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub populate: Option<Populate>,
}

impl PopulateConfig {
    pub fn from_json(input: &str) -> Result<Self, PopulateError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Bind the settings to owners and a collection.
    ///
    /// Only the filter document and the field selection can fail here;
    /// missing mandatory fields are reported later by
    /// [`PopulateOptions::check_required`].
    pub fn into_options<'a, O, C>(
        self,
        model_array: &'a mut [O],
        foreign_model: &'a C,
    ) -> Result<PopulateOptions<'a, O, C>, PopulateError> {
        let filters = self.filters.as_ref().map(parse_filter).transpose()?;
        let select = self
            .select
            .as_ref()
            .map(FieldList::to_projection)
            .transpose()?;

        Ok(PopulateOptions {
            model_array: Some(model_array),
            store_where: self.store_where,
            array_pop: self.array_pop,
            foreign_model: Some(foreign_model),
            id_field: self.id_field,
            filters,
            select,
            sort: self.sort.as_ref().map(SortSpec::to_sorts).unwrap_or_default(),
            populate: self.populate,
        })
    }
}
