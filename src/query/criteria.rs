//! Search criteria mapping and key resolution
//!
//! Criteria arrive as field-name/value pairs, typically decoded from query
//! parameters; values may be native JSON or their string forms. Which keys
//! are searchable is declared statically here; there is no runtime
//! introspection of the model.

use std::collections::BTreeMap;

use serde_json::Value;

/// Well-known tag label behind the `science` flag
pub const TAG_LABEL_SCIENCE: &str = "SCIENCE";

/// Well-known tag label behind the `travel` flag
pub const TAG_LABEL_TRAVEL: &str = "TRAVEL";

/// Sparse search criteria: field name -> desired value.
///
/// Absent criteria imply "match all". Backed by an ordered map so that
/// compilation and logging are deterministic.
#[derive(Debug, Clone, Default)]
pub struct Criteria(BTreeMap<String, Value>);

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style entry, mainly for call sites assembling criteria by
    /// hand: `Criteria::new().with("title", "a")`
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<BTreeMap<String, Value>> for Criteria {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Criteria {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A declared searchable scalar field of the item collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchField {
    Id,
    Version,
    Title,
    Rating,
    Kind,
    Publisher,
    Price,
    Discount,
    Available,
    ReleaseDate,
    Issn,
    Homepage,
    CreatedAt,
    UpdatedAt,
}

/// Resolution of a single criteria key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CriteriaKey {
    Field(SearchField),
    /// Reserved boolean flag requiring ownership of a well-known tag label
    TagFlag(&'static str),
    Unrecognized,
}

/// Resolves a criteria key against the static whitelist.
///
/// Every declared item field is a legal key except `tags`; the relation
/// itself is only searchable through the reserved flags.
pub(crate) fn resolve_key(key: &str) -> CriteriaKey {
    match key {
        "id" => CriteriaKey::Field(SearchField::Id),
        "version" => CriteriaKey::Field(SearchField::Version),
        "title" => CriteriaKey::Field(SearchField::Title),
        "rating" => CriteriaKey::Field(SearchField::Rating),
        "kind" => CriteriaKey::Field(SearchField::Kind),
        "publisher" => CriteriaKey::Field(SearchField::Publisher),
        "price" => CriteriaKey::Field(SearchField::Price),
        "discount" => CriteriaKey::Field(SearchField::Discount),
        "available" => CriteriaKey::Field(SearchField::Available),
        "releaseDate" => CriteriaKey::Field(SearchField::ReleaseDate),
        "issn" => CriteriaKey::Field(SearchField::Issn),
        "homepage" => CriteriaKey::Field(SearchField::Homepage),
        "createdAt" => CriteriaKey::Field(SearchField::CreatedAt),
        "updatedAt" => CriteriaKey::Field(SearchField::UpdatedAt),
        "science" => CriteriaKey::TagFlag(TAG_LABEL_SCIENCE),
        "travel" => CriteriaKey::TagFlag(TAG_LABEL_TRAVEL),
        _ => CriteriaKey::Unrecognized,
    }
}

/// A flag is applied only when set to a truthy form ("true" or `true`);
/// any other value contributes nothing to the query.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_whitelisted_keys() {
        assert_eq!(resolve_key("title"), CriteriaKey::Field(SearchField::Title));
        assert_eq!(
            resolve_key("releaseDate"),
            CriteriaKey::Field(SearchField::ReleaseDate)
        );
        assert_eq!(resolve_key("id"), CriteriaKey::Field(SearchField::Id));
        assert_eq!(resolve_key("version"), CriteriaKey::Field(SearchField::Version));
        assert_eq!(
            resolve_key("createdAt"),
            CriteriaKey::Field(SearchField::CreatedAt)
        );
        assert_eq!(
            resolve_key("updatedAt"),
            CriteriaKey::Field(SearchField::UpdatedAt)
        );
        assert_eq!(resolve_key("science"), CriteriaKey::TagFlag(TAG_LABEL_SCIENCE));
        assert_eq!(resolve_key("travel"), CriteriaKey::TagFlag(TAG_LABEL_TRAVEL));
    }

    #[test]
    fn test_unrecognized_keys() {
        // The relation is not an equality-searchable field
        assert_eq!(resolve_key("tags"), CriteriaKey::Unrecognized);
        assert_eq!(resolve_key("Title"), CriteriaKey::Unrecognized);
        assert_eq!(resolve_key("release_date"), CriteriaKey::Unrecognized);
        assert_eq!(resolve_key(""), CriteriaKey::Unrecognized);
    }

    #[test]
    fn test_truthiness_forms() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!("true")));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!("TRUE")));
        assert!(!is_truthy(&json!("yes")));
        assert!(!is_truthy(&json!(1)));
    }

    #[test]
    fn test_criteria_iteration_is_ordered() {
        let criteria = Criteria::new()
            .with("title", "a")
            .with("issn", "2194-9379")
            .with("rating", 5);
        let keys: Vec<&str> = criteria.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["issn", "rating", "title"]);
    }
}
