//! Catalog field schema and Validation Engine
//!
//! The schema is declarative and closed: every field an item may carry is
//! statically declared here together with its rule and its violation
//! message, and a candidate carrying an undeclared field is itself in
//! violation. Validation is a pure pass over a candidate document and is
//! fully deterministic: messages come out in field declaration order.

mod rules;
mod validator;

pub use rules::{
    is_valid_issn, parse_item_id, parse_version_token, DECLARED_FIELDS, MAX_RATING,
};
pub use validator::validate;
