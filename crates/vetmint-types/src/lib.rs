//! # vetmint-types
//!
//! Shared domain types used across the vetmint workspace.
//!
//! - [`identity`] — caller identities and calendar-day bucket keys
//! - [`member`] — member records and caller roles
//! - [`asset`] — issued asset records
//! - [`events`] — notifications emitted by committed operations

pub mod asset;
pub mod events;
pub mod identity;
pub mod member;

pub use asset::Asset;
pub use events::{Event, EventType, Notification};
pub use identity::{CallerId, DateKey, ParseCallerIdError, ParseDateKeyError};
pub use member::{Member, Role};

/// Global, 1-based member sequence number.
pub type MemberIndex = u64;

/// Global, 1-based asset sequence number.
pub type AssetId = u64;

/// Native currency amount in base units.
pub type Amount = u128;

/// Base units per whole native currency unit (18 decimals).
pub const BASE_UNITS_PER_NATIVE: Amount = 1_000_000_000_000_000_000;

/// Minimum display name length in characters.
pub const MIN_NAME_CHARS: usize = 5;

/// Maximum display name length in bytes (fixed-width 32-byte slot).
pub const MAX_NAME_BYTES: usize = 32;

/// Minimum block / revoke reason length in characters.
pub const MIN_REASON_CHARS: usize = 10;

/// Maximum block / revoke reason length in bytes.
pub const MAX_REASON_BYTES: usize = 32;

/// Block reason assigned to every member that signs up after the operator.
pub const UNDER_REVIEW_REASON: &str = "Username under review.";

/// Default global supply cap.
pub const DEFAULT_SUPPLY_CAP: u64 = 10_000;

/// Default per-member holding cap.
pub const DEFAULT_PER_MEMBER_CAP: u64 = 100;

/// Default price per asset: 0.5 native units.
pub const DEFAULT_UNIT_PRICE: Amount = BASE_UNITS_PER_NATIVE / 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_unit_price_is_half_a_native_unit() {
        assert_eq!(DEFAULT_UNIT_PRICE * 2, BASE_UNITS_PER_NATIVE);
        assert_eq!(DEFAULT_UNIT_PRICE, 500_000_000_000_000_000);
    }

    #[test]
    fn test_under_review_reason_fits_slot() {
        assert!(UNDER_REVIEW_REASON.len() <= MAX_REASON_BYTES);
    }
}
