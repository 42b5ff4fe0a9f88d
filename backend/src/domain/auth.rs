//! Authentication primitives such as login credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::user::{
    EmailAddress, PhoneNumber, Role, UserValidationError, Username,
};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("admin", "password").unwrap();
/// assert_eq!(creds.username(), "admin");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when registration payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// A username, email, or phone value failed validation.
    InvalidUser(UserValidationError),
    /// The password was shorter than [`PASSWORD_MIN`] characters.
    PasswordTooShort { min: usize },
    /// Password and confirmation did not match.
    PasswordMismatch,
    /// Developer accounts cannot be self-registered.
    RoleNotRegisterable,
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUser(err) => err.fmt(f),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordMismatch => write!(f, "passwords do not match"),
            Self::RoleNotRegisterable => {
                write!(f, "only tourist and organizer accounts can be registered")
            }
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

impl From<UserValidationError> for RegistrationValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::InvalidUser(value)
    }
}

/// Validated self-registration request.
///
/// ## Invariants
/// - `role` is [`Role::Tourist`] or [`Role::Organizer`], never developer.
/// - `password` matched its confirmation and meets the length floor.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    username: Username,
    email: EmailAddress,
    role: Role,
    phone: Option<PhoneNumber>,
    password: Zeroizing<String>,
}

impl RegistrationRequest {
    /// Construct a registration request from raw form inputs.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        role: Role,
        phone: Option<&str>,
        password: &str,
        password_confirmation: &str,
    ) -> Result<Self, RegistrationValidationError> {
        if role == Role::Developer {
            return Err(RegistrationValidationError::RoleNotRegisterable);
        }
        let username = Username::new(username)?;
        let email = EmailAddress::new(email)?;
        let phone = phone
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(PhoneNumber::new)
            .transpose()?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if password != password_confirmation {
            return Err(RegistrationValidationError::PasswordMismatch);
        }

        Ok(Self {
            username,
            email,
            role,
            phone,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested login name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Requested contact email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Requested account role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Optional contact phone number.
    pub fn phone(&self) -> Option<&PhoneNumber> {
        self.phone.as_ref()
    }

    /// Plaintext password awaiting hashing.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  admin  ", "secret")]
    #[case("alice", "correct horse battery staple")]
    fn valid_credentials_trim_username(#[case] username: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username(), username.trim());
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    #[case(Role::Tourist)]
    #[case(Role::Organizer)]
    fn registration_accepts_bookable_roles(#[case] role: Role) {
        let request = RegistrationRequest::try_from_parts(
            "mira_tourist",
            "mira@example.edu",
            role,
            Some("+8801712345678"),
            "strong-password",
            "strong-password",
        )
        .expect("valid registration should succeed");
        assert_eq!(request.role(), role);
        assert_eq!(request.username().as_ref(), "mira_tourist");
        assert_eq!(request.password(), "strong-password");
    }

    #[rstest]
    fn registration_rejects_developer_role() {
        let err = RegistrationRequest::try_from_parts(
            "mira_tourist",
            "mira@example.edu",
            Role::Developer,
            None,
            "strong-password",
            "strong-password",
        )
        .expect_err("developer registration must fail");
        assert_eq!(err, RegistrationValidationError::RoleNotRegisterable);
    }

    #[rstest]
    fn registration_rejects_short_passwords() {
        let err = RegistrationRequest::try_from_parts(
            "mira_tourist",
            "mira@example.edu",
            Role::Tourist,
            None,
            "short",
            "short",
        )
        .expect_err("short password must fail");
        assert_eq!(
            err,
            RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN }
        );
    }

    #[rstest]
    fn registration_rejects_mismatched_confirmation() {
        let err = RegistrationRequest::try_from_parts(
            "mira_tourist",
            "mira@example.edu",
            Role::Tourist,
            None,
            "strong-password",
            "different-password",
        )
        .expect_err("mismatched confirmation must fail");
        assert_eq!(err, RegistrationValidationError::PasswordMismatch);
    }

    #[rstest]
    fn registration_treats_blank_phone_as_absent() {
        let request = RegistrationRequest::try_from_parts(
            "mira_tourist",
            "mira@example.edu",
            Role::Tourist,
            Some("   "),
            "strong-password",
            "strong-password",
        )
        .expect("blank phone should be ignored");
        assert!(request.phone().is_none());
    }
}
