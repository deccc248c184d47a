//! Criteria-to-query compilation
//!
//! Per-field semantics:
//! - `title` compiles to a case-insensitive substring predicate
//! - `issn` is compared for equality after separator stripping, matching
//!   the stored canonical form
//! - the reserved flags compile to required-tag constraints; both flags may
//!   apply at once (intersection)
//! - every other searchable field compiles to exact typed equality
//!
//! A criterion value that cannot be read in its field's type compiles the
//! search to `NoMatch`, the same fail-closed outcome as an unrecognized
//! key.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use uuid::Uuid;

use super::criteria::{is_truthy, resolve_key, Criteria, CriteriaKey, SearchField};
use crate::catalog::{normalize_issn, Kind, Publisher};
use crate::schema::parse_item_id;

/// A single compiled constraint on the item collection
#[derive(Debug, Clone, PartialEq)]
pub enum ItemPredicate {
    IdEquals(Uuid),
    VersionEquals(u64),
    /// Case-insensitive substring match; the needle is stored lowercased
    TitleContains(String),
    IssnEquals(String),
    RatingEquals(i64),
    KindEquals(Kind),
    PublisherEquals(Publisher),
    PriceEquals(f64),
    DiscountEquals(f64),
    AvailableEquals(bool),
    ReleaseDateEquals(NaiveDate),
    HomepageEquals(String),
    CreatedAtEquals(DateTime<Utc>),
    UpdatedAtEquals(DateTime<Utc>),
    /// Inner-join constraint: the item must own a tag with this label
    HasTag(&'static str),
}

/// An executable conjunctive query (all predicates must hold)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemQuery {
    pub(crate) predicates: Vec<ItemPredicate>,
}

impl ItemQuery {
    pub fn predicates(&self) -> &[ItemPredicate] {
        &self.predicates
    }
}

/// Outcome of compiling a criteria mapping
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledQuery {
    /// Empty criteria: fetch everything
    Unfiltered,
    /// Fail-closed: the search can never match
    NoMatch,
    Filter(ItemQuery),
}

/// The identity lookup path, used only by fetch-by-id.
///
/// Tags load eagerly with the item: a record fetched through this query
/// always carries its full tag set.
pub fn compile_id(id: Uuid) -> ItemQuery {
    ItemQuery {
        predicates: vec![ItemPredicate::IdEquals(id)],
    }
}

/// Compiles a criteria mapping into an executable query.
///
/// Predicates are conjoined in criteria key order. Any unrecognized key, or
/// a value unreadable in its field's type, short-circuits to
/// `CompiledQuery::NoMatch`.
pub fn compile(criteria: &Criteria) -> CompiledQuery {
    if criteria.is_empty() {
        return CompiledQuery::Unfiltered;
    }

    let mut predicates = Vec::new();
    for (key, value) in criteria.iter() {
        match resolve_key(key) {
            CriteriaKey::Field(field) => match compile_field(field, value) {
                Some(predicate) => predicates.push(predicate),
                None => return CompiledQuery::NoMatch,
            },
            CriteriaKey::TagFlag(label) => {
                if is_truthy(value) {
                    predicates.push(ItemPredicate::HasTag(label));
                }
            }
            CriteriaKey::Unrecognized => return CompiledQuery::NoMatch,
        }
    }

    // All flags may have been non-truthy
    if predicates.is_empty() {
        return CompiledQuery::Unfiltered;
    }

    CompiledQuery::Filter(ItemQuery { predicates })
}

fn compile_field(field: SearchField, value: &Value) -> Option<ItemPredicate> {
    match field {
        SearchField::Id => value
            .as_str()
            .and_then(parse_item_id)
            .map(ItemPredicate::IdEquals),
        SearchField::Version => as_i64(value)
            .and_then(|v| u64::try_from(v).ok())
            .map(ItemPredicate::VersionEquals),
        SearchField::Title => value
            .as_str()
            .map(|s| ItemPredicate::TitleContains(s.to_lowercase())),
        SearchField::Issn => value
            .as_str()
            .map(|s| ItemPredicate::IssnEquals(normalize_issn(s))),
        SearchField::Rating => as_i64(value).map(ItemPredicate::RatingEquals),
        SearchField::Kind => value
            .as_str()
            .and_then(Kind::from_wire)
            .map(ItemPredicate::KindEquals),
        SearchField::Publisher => value
            .as_str()
            .and_then(Publisher::from_wire)
            .map(ItemPredicate::PublisherEquals),
        SearchField::Price => as_f64(value).map(ItemPredicate::PriceEquals),
        SearchField::Discount => as_f64(value).map(ItemPredicate::DiscountEquals),
        SearchField::Available => as_bool(value).map(ItemPredicate::AvailableEquals),
        SearchField::ReleaseDate => value
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .map(ItemPredicate::ReleaseDateEquals),
        SearchField::Homepage => value
            .as_str()
            .map(|s| ItemPredicate::HomepageEquals(s.to_string())),
        SearchField::CreatedAt => as_datetime(value).map(ItemPredicate::CreatedAtEquals),
        SearchField::UpdatedAt => as_datetime(value).map(ItemPredicate::UpdatedAtEquals),
    }
}

// Criteria decoded from query parameters carry string forms; accept both
// the native JSON type and a parseable string.

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn as_datetime(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
