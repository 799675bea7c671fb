//! Input validation rules shared by the auth and chat surfaces
//!
//! Boolean predicates for direct checks, plus `validator` custom-function
//! adapters for use in `#[validate(custom(function = "..."))]`.

use regex::Regex;
use validator::ValidationError;

lazy_static::lazy_static! {
    /// Email grammar accepted at registration, login and password reset
    pub static ref EMAIL_REGEX: Regex =
        Regex::new(r"^([A-Za-z0-9_\-\.])+@([A-Za-z0-9_\-\.])+\.([A-Za-z]{2,4})$").unwrap();

    /// Reset tokens are 20 random bytes rendered as lowercase hex
    pub static ref RESET_TOKEN_REGEX: Regex = Regex::new(r"^[0-9a-f]{40}$").unwrap();

    /// User and conversation ids
    pub static ref OBJECT_ID_REGEX: Regex = Regex::new(r"^[0-9a-f]{24}$").unwrap();
}

pub const PASSWORD_MIN_CHARS: usize = 8;
pub const PASSWORD_MAX_CHARS: usize = 16;

pub fn validate_email_address(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Password policy: 8-16 characters with at least one ASCII uppercase letter,
/// one ASCII lowercase letter and one digit, and no whitespace.
pub fn validate_password_strength(password: &str) -> bool {
    let len = password.chars().count();
    if !(PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&len) {
        return false;
    }

    let mut upper = false;
    let mut lower = false;
    let mut digit = false;
    for c in password.chars() {
        if c.is_whitespace() {
            return false;
        }
        upper |= c.is_ascii_uppercase();
        lower |= c.is_ascii_lowercase();
        digit |= c.is_ascii_digit();
    }

    upper && lower && digit
}

pub fn validate_reset_token(token: &str) -> bool {
    RESET_TOKEN_REGEX.is_match(token)
}

pub fn validate_object_id(id: &str) -> bool {
    OBJECT_ID_REGEX.is_match(id)
}

/// Non-empty after trimming
pub fn validate_non_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

fn rule(ok: bool, code: &'static str, message: &'static str) -> Result<(), ValidationError> {
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new(code).with_message(message.into()))
    }
}

pub fn email_rule(email: &str) -> Result<(), ValidationError> {
    rule(
        validate_email_address(email),
        "email",
        "must be a valid email address",
    )
}

pub fn password_rule(password: &str) -> Result<(), ValidationError> {
    rule(
        validate_password_strength(password),
        "password",
        "must be 8-16 characters with an uppercase letter, a lowercase letter and a digit, and no spaces",
    )
}

pub fn reset_token_rule(token: &str) -> Result<(), ValidationError> {
    rule(
        validate_reset_token(token),
        "reset_token",
        "must be 40 lowercase hex characters",
    )
}

pub fn non_blank_rule(value: &str) -> Result<(), ValidationError> {
    rule(validate_non_blank(value), "blank", "must not be empty")
}
