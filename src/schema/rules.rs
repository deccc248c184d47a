//! Shape rules shared across the crate
//!
//! The id shape and the version-token shape are wire contracts: any
//! upstream layer must supply an id in grouped-hex 8-4-4-4-12 form and a
//! concurrency token as a double-quoted integer echoed back from a read.

use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

/// Upper bound of the rating range (inclusive)
pub const MAX_RATING: i64 = 5;

/// Every field a candidate document may carry, in declaration order.
///
/// Keys outside this list are violations; search keys are additionally
/// restricted to the searchable subset (see `crate::query`).
pub const DECLARED_FIELDS: &[&str] = &[
    "id",
    "version",
    "title",
    "rating",
    "kind",
    "publisher",
    "price",
    "discount",
    "available",
    "releaseDate",
    "issn",
    "homepage",
    "tags",
    "createdAt",
    "updatedAt",
];

fn id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            "^[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}$",
        )
        .expect("id pattern compiles")
    })
}

fn title_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\w").expect("title pattern compiles"))
}

fn version_token_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^"(-?\d+)"$"#).expect("version token pattern compiles"))
}

fn uri_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://\S+$").expect("uri pattern compiles")
    })
}

/// Checks the grouped-hex id shape and parses it.
///
/// Returns `None` for anything that does not match the 8-4-4-4-12 shape,
/// including other textual UUID encodings.
pub fn parse_item_id(id: &str) -> Option<Uuid> {
    if !id_pattern().is_match(id) {
        return None;
    }
    Uuid::parse_str(id).ok()
}

/// Parses an optimistic-concurrency token of the shape `"<integer>"`.
///
/// The grammar admits a sign so that a stale negative token is classified
/// as outdated rather than malformed.
pub fn parse_version_token(token: &str) -> Option<i64> {
    let caps = version_token_pattern().captures(token)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Title rule: must start with a letter, a digit or an underscore.
pub(crate) fn is_valid_title(title: &str) -> bool {
    title_pattern().is_match(title)
}

/// Homepage rule: absolute URI with an explicit scheme.
pub(crate) fn is_valid_uri(uri: &str) -> bool {
    uri_pattern().is_match(uri)
}

/// ISSN rule, applied after separator stripping.
///
/// Accepts the 8-character serial form with its mod-11 check digit, or the
/// 13-digit EAN form with its mod-10 check digit.
pub fn is_valid_issn(issn: &str) -> bool {
    let canonical: Vec<char> = issn.chars().filter(|c| *c != '-').collect();
    match canonical.len() {
        8 => issn_check_digit_ok(&canonical),
        13 => ean_check_digit_ok(&canonical),
        _ => false,
    }
}

fn issn_check_digit_ok(chars: &[char]) -> bool {
    let mut sum = 0u32;
    for (i, c) in chars[..7].iter().enumerate() {
        let digit = match c.to_digit(10) {
            Some(d) => d,
            None => return false,
        };
        sum += digit * (8 - i as u32);
    }
    let expected = (11 - sum % 11) % 11;
    match chars[7] {
        'X' | 'x' => expected == 10,
        c => c.to_digit(10) == Some(expected),
    }
}

fn ean_check_digit_ok(chars: &[char]) -> bool {
    let mut sum = 0u32;
    for (i, c) in chars[..12].iter().enumerate() {
        let digit = match c.to_digit(10) {
            Some(d) => d,
            None => return false,
        };
        sum += digit * if i % 2 == 0 { 1 } else { 3 };
    }
    let expected = (10 - sum % 10) % 10;
    chars[12].to_digit(10) == Some(expected)
}
