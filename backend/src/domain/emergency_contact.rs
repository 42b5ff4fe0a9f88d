//! Emergency contacts attached to an account.
//!
//! Each user keeps a small address book of people to reach during a tour.
//! At most one contact per user is primary, and a user cannot store the same
//! phone number twice.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::user::{PhoneNumber, UserId, UserValidationError};

/// Maximum length for a contact's full name.
pub const CONTACT_NAME_MAX: usize = 100;

/// Relationship between the account holder and the contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    Parent,
    Guardian,
    Sibling,
    Spouse,
    Friend,
    Other,
}

impl Relationship {
    /// Stable string form used in storage and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::Guardian => "guardian",
            Self::Sibling => "sibling",
            Self::Spouse => "spouse",
            Self::Friend => "friend",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Relationship {
    type Err = ContactValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parent" => Ok(Self::Parent),
            "guardian" => Ok(Self::Guardian),
            "sibling" => Ok(Self::Sibling),
            "spouse" => Ok(Self::Spouse),
            "friend" => Ok(Self::Friend),
            "other" => Ok(Self::Other),
            other => Err(ContactValidationError::UnknownRelationship {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validation errors for emergency contact details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    /// Full name was missing or blank once trimmed.
    EmptyName,
    /// Full name exceeded [`CONTACT_NAME_MAX`] characters.
    NameTooLong { max: usize },
    /// Relationship value was not one of the known kinds.
    UnknownRelationship { value: String },
    /// Phone number failed validation.
    InvalidPhone,
}

impl fmt::Display for ContactValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "contact name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "contact name must be at most {max} characters")
            }
            Self::UnknownRelationship { value } => {
                write!(f, "unknown relationship: {value}")
            }
            Self::InvalidPhone => write!(
                f,
                "phone number must be 7 to 20 digits with an optional leading +",
            ),
        }
    }
}

impl std::error::Error for ContactValidationError {}

impl From<UserValidationError> for ContactValidationError {
    fn from(_: UserValidationError) -> Self {
        Self::InvalidPhone
    }
}

/// Validated fields shared by contact create and update operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    /// Contact's full name, trimmed.
    pub full_name: String,
    /// Relationship to the account holder.
    pub relationship: Relationship,
    /// Phone number to dial.
    pub phone: PhoneNumber,
    /// Optional email address, free-form.
    pub email: Option<String>,
    /// Optional postal address.
    pub address: Option<String>,
}

impl ContactDetails {
    /// Validate raw contact fields.
    pub fn try_from_parts(
        full_name: &str,
        relationship: Relationship,
        phone: &str,
        email: Option<&str>,
        address: Option<&str>,
    ) -> Result<Self, ContactValidationError> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(ContactValidationError::EmptyName);
        }
        if full_name.chars().count() > CONTACT_NAME_MAX {
            return Err(ContactValidationError::NameTooLong {
                max: CONTACT_NAME_MAX,
            });
        }
        let phone = PhoneNumber::new(phone)?;
        let clean = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_owned)
        };

        Ok(Self {
            full_name: full_name.to_owned(),
            relationship,
            phone,
            email: clean(email),
            address: clean(address),
        })
    }
}

/// Stored emergency contact.
///
/// ## Invariants
/// - `(owner, phone)` is unique per user.
/// - At most one contact per owner has `is_primary` set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmergencyContact {
    /// Unique identifier.
    pub id: Uuid,
    /// Account the contact belongs to.
    pub owner: UserId,
    /// Validated contact fields.
    pub details: ContactDetails,
    /// Whether this is the contact to call first.
    pub is_primary: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("parent", Relationship::Parent)]
    #[case("guardian", Relationship::Guardian)]
    #[case("sibling", Relationship::Sibling)]
    #[case("spouse", Relationship::Spouse)]
    #[case("friend", Relationship::Friend)]
    #[case("other", Relationship::Other)]
    fn relationship_round_trips(#[case] text: &str, #[case] expected: Relationship) {
        assert_eq!(text.parse::<Relationship>().expect("known kind"), expected);
        assert_eq!(expected.as_str(), text);
    }

    #[rstest]
    fn relationship_rejects_unknown_values() {
        let err = "cousin".parse::<Relationship>().unwrap_err();
        assert_eq!(
            err,
            ContactValidationError::UnknownRelationship {
                value: "cousin".to_owned()
            }
        );
    }

    #[rstest]
    fn details_trim_and_drop_blank_optionals() {
        let details = ContactDetails::try_from_parts(
            "  Rahim Uddin  ",
            Relationship::Parent,
            "+8801712345678",
            Some("   "),
            Some(" 12 Campus Road "),
        )
        .expect("valid details should succeed");
        assert_eq!(details.full_name, "Rahim Uddin");
        assert!(details.email.is_none());
        assert_eq!(details.address.as_deref(), Some("12 Campus Road"));
    }

    #[rstest]
    fn details_reject_blank_names() {
        let err = ContactDetails::try_from_parts("  ", Relationship::Friend, "01712345678", None, None)
            .expect_err("blank name must fail");
        assert_eq!(err, ContactValidationError::EmptyName);
    }

    #[rstest]
    fn details_reject_overlong_names() {
        let name = "x".repeat(CONTACT_NAME_MAX + 1);
        let err = ContactDetails::try_from_parts(&name, Relationship::Friend, "01712345678", None, None)
            .expect_err("overlong name must fail");
        assert_eq!(
            err,
            ContactValidationError::NameTooLong {
                max: CONTACT_NAME_MAX
            }
        );
    }

    #[rstest]
    fn details_reject_malformed_phones() {
        let err = ContactDetails::try_from_parts("Rahim", Relationship::Friend, "12-34", None, None)
            .expect_err("malformed phone must fail");
        assert_eq!(err, ContactValidationError::InvalidPhone);
    }
}
