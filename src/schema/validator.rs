//! Candidate validation
//!
//! `validate` runs the declarative rule table against a candidate document
//! and returns the violation messages, one fixed message per failing rule.
//! Message order follows field declaration order, not discovery order, so
//! output is deterministic. No I/O, no mutation.

use chrono::NaiveDate;
use serde_json::Value;

use super::rules::{
    is_valid_issn, is_valid_title, is_valid_uri, parse_item_id, DECLARED_FIELDS, MAX_RATING,
};
use crate::catalog::{Kind, Publisher};

const MSG_ID: &str = "The id does not match the expected shape.";
const MSG_VERSION: &str = "The version number must be at least 0.";
const MSG_TITLE: &str = "A title must start with a letter, a digit or _.";
const MSG_RATING: &str = "A rating must be between 0 and 5.";
const MSG_KIND: &str = "The kind of an item must be DIGITAL or PRINT.";
const MSG_PUBLISHER: &str = "The publisher of an item must be PUBLISHER_A or PUBLISHER_B.";
const MSG_PRICE: &str = "The price must not be negative.";
const MSG_DISCOUNT: &str = "The discount must be a value between 0 and 1.";
const MSG_AVAILABLE: &str = "\"available\" must be set to true or false.";
const MSG_RELEASE_DATE: &str = "The release date must be in the format yyyy-MM-dd.";
const MSG_ISSN: &str = "The ISSN is not valid.";
const MSG_HOMEPAGE: &str = "The homepage is not a valid URL.";
const MSG_TAGS: &str = "Tags must be objects with a string label.";

/// Validates a candidate item document against the catalog schema.
///
/// Returns the list of violation messages; an empty list means the
/// candidate is valid. Required fields are `title`, `publisher`, `price`
/// and `issn`; the remaining declared fields are checked only when present.
/// Undeclared fields are violations (closed schema) and are reported after
/// the declared rules, in sorted key order.
pub fn validate(candidate: &Value) -> Vec<String> {
    let obj = match candidate.as_object() {
        Some(obj) => obj,
        None => return vec!["The candidate must be a JSON object.".to_string()],
    };

    // Null is treated as absent throughout: a caller echoing a read
    // payload back must not trip rules on fields the server nulled out.
    let field = |key: &str| obj.get(key).filter(|v| !v.is_null());

    let mut messages = Vec::new();
    let mut violation = |msg: &str| messages.push(msg.to_string());

    if let Some(id) = field("id") {
        if id.as_str().and_then(parse_item_id).is_none() {
            violation(MSG_ID);
        }
    }

    if let Some(version) = field("version") {
        if version.as_u64().is_none() {
            violation(MSG_VERSION);
        }
    }

    match field("title").and_then(Value::as_str) {
        Some(title) if is_valid_title(title) => {}
        _ => violation(MSG_TITLE),
    }

    if let Some(rating) = field("rating") {
        match rating.as_i64() {
            Some(r) if (0..=MAX_RATING).contains(&r) => {}
            _ => violation(MSG_RATING),
        }
    }

    if let Some(kind) = field("kind") {
        match kind.as_str() {
            // The empty string is tolerated as "not specified"
            Some("") => {}
            Some(s) if Kind::from_wire(s).is_some() => {}
            _ => violation(MSG_KIND),
        }
    }

    match field("publisher").and_then(Value::as_str) {
        Some(s) if Publisher::from_wire(s).is_some() => {}
        _ => violation(MSG_PUBLISHER),
    }

    match field("price").and_then(Value::as_f64) {
        Some(p) if p >= 0.0 => {}
        _ => violation(MSG_PRICE),
    }

    if let Some(discount) = field("discount") {
        match discount.as_f64() {
            Some(d) if d > 0.0 && d < 1.0 => {}
            _ => violation(MSG_DISCOUNT),
        }
    }

    if let Some(available) = field("available") {
        if !available.is_boolean() {
            violation(MSG_AVAILABLE);
        }
    }

    if let Some(release_date) = field("releaseDate") {
        let parsed = release_date
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
        if parsed.is_none() {
            violation(MSG_RELEASE_DATE);
        }
    }

    match field("issn").and_then(Value::as_str) {
        Some(issn) if is_valid_issn(issn) => {}
        _ => violation(MSG_ISSN),
    }

    if let Some(homepage) = field("homepage") {
        match homepage.as_str() {
            Some(uri) if is_valid_uri(uri) => {}
            _ => violation(MSG_HOMEPAGE),
        }
    }

    if let Some(tags) = field("tags") {
        let well_formed = tags.as_array().is_some_and(|arr| {
            arr.iter()
                .all(|t| t.get("label").and_then(Value::as_str).is_some())
        });
        if !well_formed {
            violation(MSG_TAGS);
        }
    }

    // Closed schema: undeclared keys are violations, reported in sorted
    // order for determinism.
    let mut unknown: Vec<&str> = obj
        .keys()
        .map(String::as_str)
        .filter(|key| !DECLARED_FIELDS.contains(key))
        .collect();
    unknown.sort_unstable();
    for key in unknown {
        messages.push(format!("\"{key}\" is not a known field."));
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_candidate() -> Value {
        json!({
            "title": "Orbit Weekly",
            "rating": 3,
            "kind": "PRINT",
            "publisher": "PUBLISHER_A",
            "price": 9.99,
            "discount": 0.1,
            "available": true,
            "releaseDate": "2024-03-01",
            "issn": "2194-9379",
            "homepage": "https://orbit.example.com",
            "tags": [{ "label": "SCIENCE" }]
        })
    }

    #[test]
    fn test_valid_candidate_passes() {
        assert!(validate(&valid_candidate()).is_empty());
    }

    #[test]
    fn test_minimal_candidate_passes() {
        let candidate = json!({
            "title": "Testrest",
            "issn": "9780007006441",
            "price": 99.99,
            "discount": 0.099,
            "publisher": "PUBLISHER_A",
            "kind": "PRINT"
        });
        assert!(validate(&candidate).is_empty());
    }

    #[test]
    fn test_each_violated_rule_reports_once() {
        let candidate = json!({
            "title": "!?$",
            "rating": -1,
            "kind": "INVISIBLE",
            "discount": 2,
            "issn": "bad"
        });
        let messages = validate(&candidate);

        assert!(messages.contains(&MSG_TITLE.to_string()));
        assert!(messages.contains(&MSG_RATING.to_string()));
        assert!(messages.contains(&MSG_KIND.to_string()));
        assert!(messages.contains(&MSG_DISCOUNT.to_string()));
        assert!(messages.contains(&MSG_ISSN.to_string()));
        // publisher and price are required and missing
        assert!(messages.contains(&MSG_PUBLISHER.to_string()));
        assert!(messages.contains(&MSG_PRICE.to_string()));
    }

    #[test]
    fn test_message_order_is_declaration_order() {
        let candidate = json!({
            "issn": "bad",
            "title": "!?$",
            "rating": 99,
            "publisher": "PUBLISHER_A",
            "price": 1.0
        });
        let messages = validate(&candidate);
        assert_eq!(
            messages,
            vec![
                MSG_TITLE.to_string(),
                MSG_RATING.to_string(),
                MSG_ISSN.to_string()
            ]
        );
    }

    #[test]
    fn test_unknown_field_is_a_violation() {
        let mut candidate = valid_candidate();
        candidate["binding"] = json!("hardcover");
        let messages = validate(&candidate);
        assert_eq!(messages, vec!["\"binding\" is not a known field.".to_string()]);
    }

    #[test]
    fn test_unknown_fields_sorted_after_declared_rules() {
        let candidate = json!({
            "zeta": 1,
            "alpha": 2,
            "title": "!?$",
            "publisher": "PUBLISHER_A",
            "price": 1.0,
            "issn": "21949379"
        });
        let messages = validate(&candidate);
        assert_eq!(
            messages,
            vec![
                MSG_TITLE.to_string(),
                "\"alpha\" is not a known field.".to_string(),
                "\"zeta\" is not a known field.".to_string()
            ]
        );
    }

    #[test]
    fn test_required_fields() {
        let messages = validate(&json!({}));
        assert_eq!(
            messages,
            vec![
                MSG_TITLE.to_string(),
                MSG_PUBLISHER.to_string(),
                MSG_PRICE.to_string(),
                MSG_ISSN.to_string()
            ]
        );
    }

    #[test]
    fn test_null_treated_as_absent() {
        let mut candidate = valid_candidate();
        candidate["rating"] = Value::Null;
        candidate["homepage"] = Value::Null;
        assert!(validate(&candidate).is_empty());

        // ...but a null required field is still missing
        candidate["issn"] = Value::Null;
        assert_eq!(validate(&candidate), vec![MSG_ISSN.to_string()]);
    }

    #[test]
    fn test_echoed_server_fields_pass() {
        let mut candidate = valid_candidate();
        candidate["id"] = json!("11111111-2222-3333-4444-555555555555");
        candidate["version"] = json!(3);
        candidate["createdAt"] = json!("2024-01-01T00:00:00Z");
        candidate["updatedAt"] = json!("2024-01-02T00:00:00Z");
        assert!(validate(&candidate).is_empty());

        candidate["id"] = json!("nope");
        candidate["version"] = json!(-1);
        assert_eq!(
            validate(&candidate),
            vec![MSG_ID.to_string(), MSG_VERSION.to_string()]
        );
    }

    #[test]
    fn test_rating_must_be_integer() {
        let mut candidate = valid_candidate();
        candidate["rating"] = json!(3.5);
        assert_eq!(validate(&candidate), vec![MSG_RATING.to_string()]);
    }

    #[test]
    fn test_empty_kind_tolerated() {
        let mut candidate = valid_candidate();
        candidate["kind"] = json!("");
        assert!(validate(&candidate).is_empty());
    }

    #[test]
    fn test_discount_bounds_are_exclusive() {
        let mut candidate = valid_candidate();
        candidate["discount"] = json!(0.0);
        assert_eq!(validate(&candidate), vec![MSG_DISCOUNT.to_string()]);
        candidate["discount"] = json!(1.0);
        assert_eq!(validate(&candidate), vec![MSG_DISCOUNT.to_string()]);
        candidate["discount"] = json!(0.999);
        assert!(validate(&candidate).is_empty());
    }

    #[test]
    fn test_date_and_homepage_rules() {
        let mut candidate = valid_candidate();
        candidate["releaseDate"] = json!("01.03.2024");
        candidate["homepage"] = json!("not a url");
        let messages = validate(&candidate);
        assert_eq!(
            messages,
            vec![MSG_RELEASE_DATE.to_string(), MSG_HOMEPAGE.to_string()]
        );
    }

    #[test]
    fn test_malformed_tags() {
        let mut candidate = valid_candidate();
        candidate["tags"] = json!(["SCIENCE"]);
        assert_eq!(validate(&candidate), vec![MSG_TAGS.to_string()]);
        candidate["tags"] = json!([{ "label": 7 }]);
        assert_eq!(validate(&candidate), vec![MSG_TAGS.to_string()]);
    }

    #[test]
    fn test_non_object_candidate() {
        assert_eq!(validate(&json!("item")).len(), 1);
        assert_eq!(validate(&json!([1, 2])).len(), 1);
    }

    #[test]
    fn test_validation_is_deterministic() {
        let candidate = json!({
            "title": "!?$",
            "rating": -1,
            "issn": "bad",
            "extra": true
        });
        let first = validate(&candidate);
        for _ in 0..50 {
            assert_eq!(validate(&candidate), first);
        }
    }
}
