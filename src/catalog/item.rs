//! Catalog item aggregate
//!
//! Field set and constraints follow the catalog schema in `crate::schema`.
//! `id`, `version`, `created_at` and `updated_at` are never client-settable:
//! the write pipelines assign identity and the storage layer owns the
//! version counter and timestamps.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::tag::Tag;

/// Publication form of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Kind {
    Digital,
    Print,
}

impl Kind {
    /// Parse the wire form ("DIGITAL" / "PRINT")
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "DIGITAL" => Some(Kind::Digital),
            "PRINT" => Some(Kind::Print),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Digital => "DIGITAL",
            Kind::Print => "PRINT",
        }
    }
}

/// Publishing house of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Publisher {
    PublisherA,
    PublisherB,
}

impl Publisher {
    /// Parse the wire form ("PUBLISHER_A" / "PUBLISHER_B")
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "PUBLISHER_A" => Some(Publisher::PublisherA),
            "PUBLISHER_B" => Some(Publisher::PublisherB),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Publisher::PublisherA => "PUBLISHER_A",
            Publisher::PublisherB => "PUBLISHER_B",
        }
    }
}

/// Strips the separator characters from an ISSN, producing the canonical
/// stored form ("2194-9379" -> "21949379").
pub fn normalize_issn(issn: &str) -> String {
    issn.chars().filter(|c| *c != '-').collect()
}

/// The catalog aggregate root.
///
/// Wire field names are camelCase; `version` is the optimistic-concurrency
/// token incremented by the storage layer on every successful merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    #[serde(default)]
    pub version: u64,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,

    pub publisher: Publisher,

    pub price: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,

    pub issn: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    #[serde(default)]
    pub tags: Vec<Tag>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogItem {
    /// Builds a typed item from a candidate document that has already passed
    /// `schema::validate` with no violations. The conversion itself performs
    /// no checks; callers must not feed it unvalidated input.
    pub fn from_payload(candidate: &Value) -> Self {
        let get = |key: &str| candidate.get(key);
        let get_str = |key: &str| get(key).and_then(Value::as_str);

        let tags = get("tags")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(|t| t.get("label").and_then(Value::as_str))
                    .map(Tag::new)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: None,
            version: 0,
            title: get_str("title").unwrap_or_default().to_string(),
            rating: get("rating").and_then(Value::as_i64),
            kind: get_str("kind").and_then(Kind::from_wire),
            publisher: get_str("publisher")
                .and_then(Publisher::from_wire)
                .unwrap_or(Publisher::PublisherA),
            price: get("price").and_then(Value::as_f64).unwrap_or(0.0),
            discount: get("discount").and_then(Value::as_f64),
            available: get("available").and_then(Value::as_bool),
            release_date: get_str("releaseDate")
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()),
            issn: get_str("issn").unwrap_or_default().to_string(),
            homepage: get_str("homepage").map(|s| s.to_string()),
            tags,
            created_at: None,
            updated_at: None,
        }
    }

    /// Overwrites this item's client-settable fields with the candidate's.
    ///
    /// Identity, version, and `created_at` are retained; `updated_at` is
    /// left for the storage layer to stamp. The candidate's ISSN is stored
    /// in canonical form.
    pub fn merge_from(&mut self, candidate: &CatalogItem) {
        self.title = candidate.title.clone();
        self.rating = candidate.rating;
        self.kind = candidate.kind;
        self.publisher = candidate.publisher;
        self.price = candidate.price;
        self.discount = candidate.discount;
        self.available = candidate.available;
        self.release_date = candidate.release_date;
        self.issn = normalize_issn(&candidate.issn);
        self.homepage = candidate.homepage.clone();
        self.tags = candidate.tags.clone();
    }
}
