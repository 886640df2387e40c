//! Credential primitives for sign-up, login and password management.
//!
//! Handlers hand raw strings to these constructors; services only ever see
//! validated values. Passwords live in zeroizing buffers.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use zeroize::Zeroizing;

const PASSWORD_MIN_LEN: usize = 8;
const PASSWORD_SPECIALS: &str = "@$!%*?&";
const MASK: &str = "****";
/// Characters kept visible at each end of a masked local part.
const SHOWN_CHARS: usize = 2;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
});

/// Validation failures for credential payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Full name was blank once trimmed.
    EmptyFullName,
    /// Email was blank once trimmed.
    EmptyEmail,
    /// Email did not look like `local@domain.tld`.
    InvalidEmail,
    /// Password was empty.
    EmptyPassword,
    /// Password does not satisfy the strength policy.
    WeakPassword,
    /// Confirmation differs from the password.
    PasswordMismatch,
}

impl CredentialValidationError {
    /// Name of the offending payload field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyFullName => "fullName",
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::EmptyPassword | Self::WeakPassword => "password",
            Self::PasswordMismatch => "confirmPassword",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyFullName => "empty_full_name",
            Self::EmptyEmail => "empty_email",
            Self::InvalidEmail => "invalid_email",
            Self::EmptyPassword => "empty_password",
            Self::WeakPassword => "weak_password",
            Self::PasswordMismatch => "password_mismatch",
        }
    }
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFullName => write!(f, "full name must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "please enter a valid email address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::WeakPassword => write!(
                f,
                "password must be at least {PASSWORD_MIN_LEN} characters and include an \
                 uppercase letter, a lowercase letter, a number and one of {PASSWORD_SPECIALS}"
            ),
            Self::PasswordMismatch => write!(f, "Passwords do not match."),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Normalised email address.
///
/// ## Invariants
/// - trimmed and lower-cased;
/// - matches `local@domain.tld` with no whitespace.
///
/// # Examples
/// ```
/// use spark_backend::domain::EmailAddress;
///
/// let email = EmailAddress::parse("  Juan.Dela@Example.COM ").unwrap();
/// assert_eq!(email.as_ref(), "juan.dela@example.com");
/// assert_eq!(email.masked(), "ju****la@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Trim, lower-case and validate a raw email.
    pub fn parse(raw: &str) -> Result<Self, CredentialValidationError> {
        let normalised = raw.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(CredentialValidationError::EmptyEmail);
        }
        if !EMAIL_PATTERN.is_match(&normalised) {
            return Err(CredentialValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }

    /// Display form that hides the middle of the local part.
    ///
    /// Local parts of up to four characters keep at most their first half
    /// and lose the tail, so the mask never reveals the whole local part.
    pub fn masked(&self) -> String {
        let (local, domain) = self.0.split_once('@').unwrap_or((self.0.as_str(), ""));
        let chars: Vec<char> = local.chars().collect();
        if chars.len() <= 2 * SHOWN_CHARS {
            let head: String = chars.iter().take(chars.len() / 2).collect();
            return format!("{head}{MASK}@{domain}");
        }
        let head: String = chars.iter().take(SHOWN_CHARS).collect();
        let tail: String = chars[chars.len() - SHOWN_CHARS..].iter().collect();
        format!("{head}{MASK}{tail}@{domain}")
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trimmed, non-empty display name captured at sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName(String);

impl FullName {
    pub fn parse(raw: &str) -> Result<Self, CredentialValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CredentialValidationError::EmptyFullName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Password that satisfies the strength policy.
///
/// Used for sign-up and password updates; login accepts any non-empty
/// password so accounts created under an older policy still work.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    /// Validate `password` against the policy and `confirmation`.
    pub fn parse(password: &str, confirmation: &str) -> Result<Self, CredentialValidationError> {
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        if !meets_password_policy(password) {
            return Err(CredentialValidationError::WeakPassword);
        }
        if password != confirmation {
            return Err(CredentialValidationError::PasswordMismatch);
        }
        Ok(Self(Zeroizing::new(password.to_owned())))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(<redacted>)")
    }
}

/// Whether `password` satisfies the strength policy.
///
/// # Examples
/// ```
/// use spark_backend::domain::meets_password_policy;
///
/// assert!(meets_password_policy("Sp4rk!ng"));
/// assert!(!meets_password_policy("sp4rk!ng"));
/// ```
pub fn meets_password_policy(password: &str) -> bool {
    let allowed = |c: char| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c);
    password.chars().count() >= PASSWORD_MIN_LEN
        && password.chars().all(allowed)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is normalised as [`EmailAddress`].
/// - `password` is non-empty; whitespace is preserved.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let email = EmailAddress::parse(email)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpDetails {
    full_name: FullName,
    email: EmailAddress,
    password: NewPassword,
}

impl SignUpDetails {
    pub fn try_from_parts(
        full_name: &str,
        email: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<Self, CredentialValidationError> {
        Ok(Self {
            full_name: FullName::parse(full_name)?,
            email: EmailAddress::parse(email)?,
            password: NewPassword::parse(password, confirmation)?,
        })
    }

    pub fn full_name(&self) -> &FullName {
        &self.full_name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &NewPassword {
        &self.password
    }
}
