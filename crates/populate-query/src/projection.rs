use serde::{Deserialize, Serialize};

/// Whether the listed fields are the ones returned or the ones dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    #[default]
    Include,
    Exclude,
}

/// Parse error for field selections.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionParseError(pub String);

impl std::fmt::Display for ProjectionParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "projection parse error: {}", self.0)
    }
}

impl std::error::Error for ProjectionParseError {}

/// A field projection: the fields a collaborator should return, or the
/// fields it should leave out.
///
/// Entries may be dotted paths (`"author.name"`). `_id` is always
/// returned by collaborators and never needs listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    #[serde(default)]
    kind: ProjectionKind,
    fields: Vec<String>,
}

impl Projection {
    /// An inclusion projection.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_kind(ProjectionKind::Include, fields)
    }

    /// An exclusion projection.
    pub fn excluding<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_kind(ProjectionKind::Exclude, fields)
    }

    fn with_kind<I, S>(kind: ProjectionKind, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut projection = Projection {
            kind,
            fields: Vec::new(),
        };
        for field in fields {
            projection.add(field.into());
        }
        projection
    }

    /// Parse a space separated field list such as `"title author"` or
    /// `"-content -draft"`.
    pub fn parse(spec: &str) -> Result<Self, ProjectionParseError> {
        Self::from_tokens(spec.split_whitespace())
    }

    /// Build from tokens where a leading `-` excludes the field and a
    /// leading `+` (or nothing) includes it. Inclusions and exclusions
    /// cannot be mixed. `_id` tokens and bare signs are ignored.
    pub fn from_tokens<'t>(
        tokens: impl IntoIterator<Item = &'t str>,
    ) -> Result<Self, ProjectionParseError> {
        let mut kind = None;
        let mut fields = Vec::new();

        for token in tokens {
            let (token_kind, field) = match token.strip_prefix('-') {
                Some(field) => (ProjectionKind::Exclude, field),
                None => (
                    ProjectionKind::Include,
                    token.strip_prefix('+').unwrap_or(token),
                ),
            };
            if field.is_empty() || field == "_id" {
                continue;
            }
            match kind {
                Some(k) if k != token_kind => {
                    return Err(ProjectionParseError(
                        "cannot mix inclusion and exclusion".into(),
                    ));
                }
                _ => kind = Some(token_kind),
            }
            fields.push(field);
        }

        Ok(Self::with_kind(kind.unwrap_or_default(), fields))
    }

    /// Add a field to an inclusion projection unless it is already listed.
    /// An exclusion projection is left unchanged.
    pub fn include(&mut self, field: impl Into<String>) {
        if self.kind == ProjectionKind::Include {
            self.add(field.into());
        }
    }

    /// Make sure `field` is returned: listed when including, no longer
    /// listed when excluding.
    pub fn retain(&mut self, field: &str) {
        match self.kind {
            ProjectionKind::Include => self.add(field.to_string()),
            ProjectionKind::Exclude => self.fields.retain(|f| f != field),
        }
    }

    fn add(&mut self, field: String) {
        if !field.is_empty() && !self.contains(&field) {
            self.fields.push(field);
        }
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// No fields listed: the projection selects every field.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_on_whitespace() {
        let projection = Projection::parse(" title  author ").unwrap();
        assert_eq!(projection.kind(), ProjectionKind::Include);
        assert_eq!(projection.fields(), ["title", "author"]);
    }

    #[test]
    fn parse_exclusions() {
        let projection = Projection::parse("-content -draft").unwrap();
        assert_eq!(projection.kind(), ProjectionKind::Exclude);
        assert_eq!(projection.fields(), ["content", "draft"]);
    }

    #[test]
    fn mixing_is_rejected() {
        let err = Projection::parse("title -content").unwrap_err();
        assert!(err.0.contains("cannot mix"), "{err}");
    }

    #[test]
    fn id_and_bare_signs_are_ignored() {
        let projection = Projection::parse("-_id - -content").unwrap();
        assert_eq!(projection.fields(), ["content"]);

        let projection = Projection::parse("").unwrap();
        assert!(projection.is_empty());
        assert_eq!(projection.kind(), ProjectionKind::Include);
    }

    #[test]
    fn include_is_idempotent() {
        let mut projection = Projection::parse("title").unwrap();
        projection.include("author");
        projection.include("title");
        projection.include("");
        assert_eq!(projection.fields(), ["title", "author"]);
    }

    #[test]
    fn retain_depends_on_kind() {
        let mut projection = Projection::new(["title"]);
        projection.retain("author");
        assert_eq!(projection.fields(), ["title", "author"]);

        let mut projection = Projection::excluding(["author", "content"]);
        projection.retain("author");
        assert_eq!(projection.fields(), ["content"]);
        projection.include("title");
        assert_eq!(projection.fields(), ["content"]);
    }
}
