//! Display name and reason rules.
//!
//! Lengths are checked in characters against the minimum and in bytes against
//! the fixed-width 32-byte slot the values are stored in.

use vetmint_types::{MAX_NAME_BYTES, MAX_REASON_BYTES, MIN_NAME_CHARS, MIN_REASON_CHARS};

use crate::{RegistryError, Result};

/// Check a display name for `register` and `rename`.
pub fn display_name(name: &str) -> Result<()> {
    if name.chars().count() < MIN_NAME_CHARS {
        return Err(RegistryError::NameTooShort);
    }
    if name.len() > MAX_NAME_BYTES {
        return Err(RegistryError::NameTooLong);
    }
    Ok(())
}

/// Check a block or revoke reason.
pub fn reason(reason: &str) -> Result<()> {
    if reason.chars().count() < MIN_REASON_CHARS {
        return Err(RegistryError::ReasonTooShort);
    }
    if reason.len() > MAX_REASON_BYTES {
        return Err(RegistryError::ReasonTooLong);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_boundaries() {
        assert_eq!(display_name("admn"), Err(RegistryError::NameTooShort));
        assert!(display_name("admin").is_ok());
        assert!(display_name(&"x".repeat(32)).is_ok());
        assert_eq!(display_name(&"x".repeat(33)), Err(RegistryError::NameTooLong));
    }

    #[test]
    fn test_name_counts_characters_not_bytes() {
        // four characters, eight bytes
        assert_eq!(display_name("ÄÖÜß"), Err(RegistryError::NameTooShort));
        assert!(display_name("ÄÖÜße").is_ok());
    }

    #[test]
    fn test_reason_boundaries() {
        assert_eq!(reason("123456789"), Err(RegistryError::ReasonTooShort));
        assert!(reason("1234567890").is_ok());
        assert!(reason("Bad validator").is_ok());
        assert_eq!(reason(&"r".repeat(33)), Err(RegistryError::ReasonTooLong));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            RegistryError::NameTooShort.to_string(),
            "Username must contain at least 5 characters."
        );
        assert_eq!(
            RegistryError::ReasonTooShort.to_string(),
            "Reason must contain at least 10 characters."
        );
        assert_eq!(RegistryError::DuplicateName.to_string(), "Username must be unique.");
    }
}
