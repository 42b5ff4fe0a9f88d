//! Role-specific profile data attached to an account.
//!
//! Registration creates the profile variant matching the chosen role so a
//! tourist never carries organizer fields and vice versa. Developers carry no
//! profile at all.

use chrono::NaiveDate;

use super::Role;

/// Department assigned to organizers who do not name one.
pub const DEFAULT_ORGANIZER_DEPARTMENT: &str = "CSE Department";

/// Optional academic details for a tourist account.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TouristProfile {
    /// University student identifier, free-form.
    pub student_id: Option<String>,
    /// Department the student belongs to, free-form.
    pub department: Option<String>,
    /// Current semester, free-form.
    pub semester: Option<String>,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
}

/// Organizer details shown alongside published tours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizerProfile {
    /// Department the organizer runs tours for.
    pub department: String,
    /// Staff identifier, free-form.
    pub organizer_id: Option<String>,
    /// Short biography shown on tour pages.
    pub bio: Option<String>,
    /// Set by developers once the organizer is vetted.
    pub is_verified: bool,
}

impl Default for OrganizerProfile {
    fn default() -> Self {
        Self {
            department: DEFAULT_ORGANIZER_DEPARTMENT.to_owned(),
            organizer_id: None,
            bio: None,
            is_verified: false,
        }
    }
}

/// Profile variant tied to the account role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleProfile {
    /// Academic details for a tourist.
    Tourist(TouristProfile),
    /// Department and verification state for an organizer.
    Organizer(OrganizerProfile),
    /// Developers carry no profile data.
    Developer,
}

impl RoleProfile {
    /// Empty profile matching the given role, used at registration.
    #[must_use]
    pub fn default_for(role: Role) -> Self {
        match role {
            Role::Tourist => Self::Tourist(TouristProfile::default()),
            Role::Organizer => Self::Organizer(OrganizerProfile::default()),
            Role::Developer => Self::Developer,
        }
    }

    /// Role this profile variant belongs to.
    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Self::Tourist(_) => Role::Tourist,
            Self::Organizer(_) => Role::Organizer,
            Self::Developer => Role::Developer,
        }
    }

    /// Organizer department when this is an organizer profile.
    #[must_use]
    pub fn organizer_department(&self) -> Option<&str> {
        match self {
            Self::Organizer(profile) => Some(profile.department.as_str()),
            _ => None,
        }
    }
}
