//! Field validation for account forms.
//!
//! Limits are counted in Unicode scalar values, not bytes.

use crate::shared::error::SharedError;

pub const USERNAME_MAX_CHARS: usize = 20;
pub const PASSWORD_MIN_CHARS: usize = 8;
pub const PASSWORD_MAX_CHARS: usize = 100;

pub const USERNAME_LENGTH_MESSAGE: &str = "Username must be less than or equal to 20 characters long";
pub const PASSWORD_LENGTH_MESSAGE: &str = "New password must be between 8 and 100 characters";

/// Username must be 1 to 20 characters.
pub fn validate_username(username: &str) -> Result<(), SharedError> {
    let len = username.chars().count();
    if len < 1 || len > USERNAME_MAX_CHARS {
        return Err(SharedError::validation("username", USERNAME_LENGTH_MESSAGE));
    }
    Ok(())
}

/// Passwords chosen through the change-password flow must be 8 to 100 characters.
pub fn validate_new_password(password: &str) -> Result<(), SharedError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&len) {
        return Err(SharedError::validation("newPassword", PASSWORD_LENGTH_MESSAGE));
    }
    Ok(())
}
