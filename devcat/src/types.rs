//! Identifier aliases and the vocabulary used by authorization checks.
//!
//! All entity ids are store-assigned positive integers. Path segments are parsed with
//! [`parse_path_id`], which rejects anything that is not a positive `i64` with a
//! field-specific `400`.

use crate::errors::Error;
use std::fmt;

pub type ClientId = i64;
pub type UserId = i64;
pub type ProductId = i64;

/// Operations a principal performs on a resource it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ReadOwn,
    CreateOwn,
    DeleteOwn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ReadOwn => write!(f, "read"),
            Operation::CreateOwn => write!(f, "create"),
            Operation::DeleteOwn => write!(f, "delete"),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Users => write!(f, "users"),
        }
    }
}

/// Parse a raw path segment into a store id. `field` names the segment in the error message.
pub fn parse_path_id(field: &str, raw: &str) -> Result<i64, Error> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Error::BadRequest {
            message: format!("{field} must be a positive integer"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_path_id_accepts_positive_integers() {
        assert_eq!(parse_path_id("clientId", "42").unwrap(), 42);
        assert_eq!(parse_path_id("userId", "9223372036854775807").unwrap(), i64::MAX);
    }

    #[test]
    fn parse_path_id_rejects_everything_else() {
        for raw in ["0", "-3", "abc", "1.5", "", "9223372036854775808"] {
            let err = parse_path_id("clientId", raw).unwrap_err();
            assert_eq!(err.user_message(), "clientId must be a positive integer", "input {raw:?}");
        }
    }

    #[test]
    fn operations_display_as_verbs() {
        assert_eq!(Operation::DeleteOwn.to_string(), "delete");
        assert_eq!(Operation::ReadOwn.to_string(), "read");
        assert_eq!(Resource::Users.to_string(), "users");
    }
}
