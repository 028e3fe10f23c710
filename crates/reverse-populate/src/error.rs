use populate_query::QueryError;

use crate::options::RequiredField;

#[derive(Debug, thiserror::Error)]
pub enum PopulateError {
    /// A mandatory option was not supplied. Raised before any query runs.
    #[error("Missing mandatory field '{0}'.")]
    MissingField(RequiredField),

    /// The collaborator failed to execute the query; the error is kept as-is.
    #[error(transparent)]
    Query(QueryError),

    #[error("invalid populate config: {0}")]
    InvalidConfig(String),
}

impl PopulateError {
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PopulateError::MissingField(_) | PopulateError::InvalidConfig(_)
        )
    }
}

impl From<populate_query::FilterParseError> for PopulateError {
    fn from(e: populate_query::FilterParseError) -> Self {
        PopulateError::InvalidConfig(e.to_string())
    }
}

impl From<populate_query::ProjectionParseError> for PopulateError {
    fn from(e: populate_query::ProjectionParseError) -> Self {
        PopulateError::InvalidConfig(e.to_string())
    }
}

impl From<serde_json::Error> for PopulateError {
    fn from(e: serde_json::Error) -> Self {
        PopulateError::InvalidConfig(e.to_string())
    }
}
