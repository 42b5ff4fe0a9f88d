//! University departments that tours are grouped under.

use std::fmt;

use uuid::Uuid;

/// Maximum length for a department name.
pub const DEPARTMENT_NAME_MAX: usize = 100;
/// Maximum length for a department code.
pub const DEPARTMENT_CODE_MAX: usize = 10;

/// Departments seeded on first start so the catalogue is never empty.
pub const DEFAULT_DEPARTMENTS: [(&str, &str); 6] = [
    ("CSE", "Computer Science and Engineering"),
    ("EEE", "Electrical and Electronic Engineering"),
    ("BBA", "Business Administration"),
    ("ENG", "English"),
    ("ARCH", "Architecture"),
    ("LAW", "Law"),
];

/// Validation errors for department fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepartmentValidationError {
    /// Name was missing or blank once trimmed.
    EmptyName,
    /// Name exceeded [`DEPARTMENT_NAME_MAX`] characters.
    NameTooLong { max: usize },
    /// Code was missing or blank once trimmed.
    EmptyCode,
    /// Code exceeded [`DEPARTMENT_CODE_MAX`] characters.
    CodeTooLong { max: usize },
}

impl fmt::Display for DepartmentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "department name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "department name must be at most {max} characters")
            }
            Self::EmptyCode => write!(f, "department code must not be empty"),
            Self::CodeTooLong { max } => {
                write!(f, "department code must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for DepartmentValidationError {}

/// Validated name and code pair for create and update operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentDetails {
    /// Full department name.
    pub name: String,
    /// Short code such as `CSE`.
    pub code: String,
    /// Free-form description shown on department pages.
    pub description: String,
}

impl DepartmentDetails {
    /// Validate raw department fields.
    pub fn try_from_parts(
        name: &str,
        code: &str,
        description: &str,
    ) -> Result<Self, DepartmentValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DepartmentValidationError::EmptyName);
        }
        if name.chars().count() > DEPARTMENT_NAME_MAX {
            return Err(DepartmentValidationError::NameTooLong {
                max: DEPARTMENT_NAME_MAX,
            });
        }
        let code = code.trim();
        if code.is_empty() {
            return Err(DepartmentValidationError::EmptyCode);
        }
        if code.chars().count() > DEPARTMENT_CODE_MAX {
            return Err(DepartmentValidationError::CodeTooLong {
                max: DEPARTMENT_CODE_MAX,
            });
        }

        Ok(Self {
            name: name.to_owned(),
            code: code.to_uppercase(),
            description: description.trim().to_owned(),
        })
    }
}

/// Stored department.
///
/// ## Invariants
/// - `name` is unique across departments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    /// Unique identifier.
    pub id: Uuid,
    /// Validated name, code, and description.
    pub details: DepartmentDetails,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn details_uppercase_codes_and_trim() {
        let details = DepartmentDetails::try_from_parts(
            " Computer Science and Engineering ",
            "cse",
            "  Tours of the labs.  ",
        )
        .expect("valid details should succeed");
        assert_eq!(details.name, "Computer Science and Engineering");
        assert_eq!(details.code, "CSE");
        assert_eq!(details.description, "Tours of the labs.");
    }

    #[rstest]
    #[case("", "CSE", DepartmentValidationError::EmptyName)]
    #[case("Physics", "", DepartmentValidationError::EmptyCode)]
    fn details_reject_blank_fields(
        #[case] name: &str,
        #[case] code: &str,
        #[case] expected: DepartmentValidationError,
    ) {
        let err = DepartmentDetails::try_from_parts(name, code, "")
            .expect_err("blank required fields must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn details_reject_overlong_codes() {
        let err = DepartmentDetails::try_from_parts("Physics", "PHYSICSDEPT", "")
            .expect_err("overlong code must fail");
        assert_eq!(
            err,
            DepartmentValidationError::CodeTooLong {
                max: DEPARTMENT_CODE_MAX
            }
        );
    }

    #[rstest]
    fn default_seed_list_covers_six_departments() {
        assert_eq!(DEFAULT_DEPARTMENTS.len(), 6);
        for (code, name) in DEFAULT_DEPARTMENTS {
            assert!(
                DepartmentDetails::try_from_parts(name, code, "").is_ok(),
                "seed {code} must satisfy validation"
            );
        }
    }
}
