//! Predicate evaluation against catalog items
//!
//! Strict conjunction: an item matches a query only if every predicate
//! holds. A predicate on an unset optional field never matches. Numeric
//! equality is exact, mirroring column equality in a relational store.

use super::compiler::{ItemPredicate, ItemQuery};
use crate::catalog::CatalogItem;

impl ItemQuery {
    /// Checks whether an item satisfies every predicate of this query.
    pub fn matches(&self, item: &CatalogItem) -> bool {
        self.predicates.iter().all(|p| matches_predicate(item, p))
    }
}

fn matches_predicate(item: &CatalogItem, predicate: &ItemPredicate) -> bool {
    match predicate {
        ItemPredicate::IdEquals(id) => item.id == Some(*id),
        ItemPredicate::VersionEquals(version) => item.version == *version,
        ItemPredicate::TitleContains(needle) => item.title.to_lowercase().contains(needle),
        ItemPredicate::IssnEquals(issn) => &item.issn == issn,
        ItemPredicate::RatingEquals(rating) => item.rating == Some(*rating),
        ItemPredicate::KindEquals(kind) => item.kind == Some(*kind),
        ItemPredicate::PublisherEquals(publisher) => item.publisher == *publisher,
        ItemPredicate::PriceEquals(price) => item.price == *price,
        ItemPredicate::DiscountEquals(discount) => item.discount == Some(*discount),
        ItemPredicate::AvailableEquals(available) => item.available == Some(*available),
        ItemPredicate::ReleaseDateEquals(date) => item.release_date == Some(*date),
        ItemPredicate::HomepageEquals(homepage) => item.homepage.as_deref() == Some(homepage),
        ItemPredicate::CreatedAtEquals(ts) => item.created_at == Some(*ts),
        ItemPredicate::UpdatedAtEquals(ts) => item.updated_at == Some(*ts),
        ItemPredicate::HasTag(label) => item.tags.iter().any(|t| t.label == *label),
    }
}
