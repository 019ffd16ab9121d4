//! API request/response models for client users.

use crate::db::models::users::UserDBResponse;
use crate::errors::{Error, FieldViolation, Result};
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

pub const NAME_MAX_CHARS: usize = 100;
pub const PHONE_MAX_CHARS: usize = 20;

/// Body of `POST /api/clients/{clientId}/users`.
///
/// Fields are taken as raw JSON so that missing, `null` and wrongly-typed values are all
/// reported by [`UserCreate::validate`] alongside every other violation, instead of failing
/// the whole body at deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UserCreate {
    #[schema(value_type = String, example = "Jane", max_length = 100)]
    pub first_name: Option<Value>,
    #[schema(value_type = String, example = "Doe", max_length = 100)]
    pub last_name: Option<Value>,
    #[schema(value_type = Option<String>, example = "+33 6 12 34 56 78", max_length = 20)]
    pub phone_number: Option<Value>,
}

/// A validated, trimmed user payload ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
}

/// Trimmed text of a field; `Ok(None)` for absent, `null` or blank, `Err` for non-strings
fn trimmed(value: Option<&Value>) -> std::result::Result<Option<String>, ()> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let s = s.trim();
            Ok((!s.is_empty()).then(|| s.to_string()))
        }
        Some(_) => Err(()),
    }
}

fn check_name(violations: &mut Vec<FieldViolation>, field: &str, label: &str, value: Option<&Value>) -> String {
    match trimmed(value) {
        Ok(Some(name)) if name.chars().count() > NAME_MAX_CHARS => {
            violations.push(FieldViolation::new(
                field,
                format!("The {label} cannot be longer than {NAME_MAX_CHARS} characters."),
            ));
            String::new()
        }
        Ok(Some(name)) => name,
        Ok(None) => {
            violations.push(FieldViolation::new(field, format!("The {label} is required")));
            String::new()
        }
        Err(()) => {
            violations.push(FieldViolation::new(field, format!("The {label} must be a string.")));
            String::new()
        }
    }
}

impl UserCreate {
    /// Trim every field and check it, returning the cleaned payload or one violation per
    /// failed field. A blank or `null` phone number is treated as absent.
    pub fn validate(&self) -> Result<NewUser> {
        let mut violations = Vec::new();
        let first_name = check_name(&mut violations, "firstName", "first name", self.first_name.as_ref());
        let last_name = check_name(&mut violations, "lastName", "last name", self.last_name.as_ref());

        let phone_number = match trimmed(self.phone_number.as_ref()) {
            Ok(Some(phone)) if phone.chars().count() > PHONE_MAX_CHARS => {
                violations.push(FieldViolation::new(
                    "phoneNumber",
                    format!("The phone number cannot be longer than {PHONE_MAX_CHARS} characters."),
                ));
                None
            }
            Ok(phone) => phone,
            Err(()) => {
                violations.push(FieldViolation::new("phoneNumber", "The phone number must be a string."));
                None
            }
        };

        if violations.is_empty() {
            Ok(NewUser {
                first_name,
                last_name,
                phone_number,
            })
        } else {
            Err(Error::Validation { violations })
        }
    }
}

/// A user as returned by the API. The owning client is implied by the request path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserDBResponse> for UserResponse {
    fn from(db: UserDBResponse) -> Self {
        Self {
            id: db.id,
            first_name: db.first_name,
            last_name: db.last_name,
            phone_number: db.phone_number,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: Value) -> UserCreate {
        serde_json::from_value(body).unwrap()
    }

    fn violations(create: UserCreate) -> Vec<FieldViolation> {
        match create.validate() {
            Err(Error::Validation { violations }) => violations,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_payload_is_trimmed() {
        let cleaned = parse(json!({ "firstName": "  Jane ", "lastName": "Doe\n", "phoneNumber": "   " }))
            .validate()
            .unwrap();
        assert_eq!(
            cleaned,
            NewUser {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                phone_number: None,
            }
        );
    }

    #[test]
    fn test_missing_fields_are_reported_together() {
        assert_eq!(
            violations(parse(json!({}))),
            vec![
                FieldViolation::new("firstName", "The first name is required"),
                FieldViolation::new("lastName", "The last name is required"),
            ]
        );
    }

    #[test]
    fn test_null_fields_are_required_not_malformed() {
        assert_eq!(
            violations(parse(json!({ "firstName": null, "lastName": "", "phoneNumber": null }))),
            vec![
                FieldViolation::new("firstName", "The first name is required"),
                FieldViolation::new("lastName", "The last name is required"),
            ]
        );
    }

    #[test]
    fn test_wrongly_typed_fields_are_reported_per_field() {
        assert_eq!(
            violations(parse(json!({ "firstName": 5, "lastName": "   ", "phoneNumber": ["0600"] }))),
            vec![
                FieldViolation::new("firstName", "The first name must be a string."),
                FieldViolation::new("lastName", "The last name is required"),
                FieldViolation::new("phoneNumber", "The phone number must be a string."),
            ]
        );
    }

    #[test]
    fn test_length_limits() {
        let create = parse(json!({
            "firstName": "a".repeat(101),
            "lastName": "b".repeat(100),
            "phoneNumber": "0".repeat(21),
        }));
        assert_eq!(
            violations(create),
            vec![
                FieldViolation::new("firstName", "The first name cannot be longer than 100 characters."),
                FieldViolation::new("phoneNumber", "The phone number cannot be longer than 20 characters."),
            ]
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let create = parse(json!({ "firstName": "é".repeat(100), "lastName": "Doe" }));
        assert!(create.validate().is_ok());
    }

    #[test]
    fn test_response_is_camel_case() {
        let now = Utc::now();
        let response = UserResponse {
            id: 3,
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            phone_number: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["firstName"], "Jane");
        assert_eq!(json["lastName"], "Doe");
        assert!(json["phoneNumber"].is_null());
        assert!(json.get("clientId").is_none());
    }
}
