//! # vetmint-registry
//!
//! Member registry with name uniqueness, the tiered approval workflow and
//! date-bucketed pagination.
//!
//! Members live in an arena indexed by their 1-based `member_index`. The
//! identity index, the name index and the [`date_index::DateIndex`] all hold
//! member indices rather than copies of the records, so the global view and
//! the per-day view can never disagree.
//!
//! Every mutating method checks all of its preconditions before touching any
//! structure: a returned error means nothing changed.
//!
//! ## Modules
//!
//! - [`registry`] — the [`UserRegistry`] arena and workflow transitions
//! - [`date_index`] — per-day member sequences
//! - [`validate`] — display name and reason rules
//! - [`page`] — 1-based pagination arithmetic

pub mod date_index;
pub mod page;
pub mod registry;
pub mod validate;

pub use registry::UserRegistry;

use vetmint_types::{CallerId, MAX_NAME_BYTES, MAX_REASON_BYTES, MIN_NAME_CHARS, MIN_REASON_CHARS};

/// Error types for registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Display name below the minimum length.
    #[error("Username must contain at least {} characters.", MIN_NAME_CHARS)]
    NameTooShort,

    /// Display name does not fit its fixed-width slot.
    #[error("Username must contain at most {} bytes.", MAX_NAME_BYTES)]
    NameTooLong,

    /// Reason below the minimum length.
    #[error("Reason must contain at least {} characters.", MIN_REASON_CHARS)]
    ReasonTooShort,

    /// Reason does not fit its fixed-width slot.
    #[error("Reason must contain at most {} bytes.", MAX_REASON_BYTES)]
    ReasonTooLong,

    /// Display name already held by another member (or by the caller).
    #[error("Username must be unique.")]
    DuplicateName,

    /// The identity already has a member record.
    #[error("You are already registered.")]
    AlreadyRegistered,

    /// No member record for this identity.
    #[error("member not found: {0}")]
    MemberNotFound(CallerId),

    /// No member holds this display name.
    #[error("member not found: {0}")]
    NameNotFound(String),

    /// Join timestamp cannot be mapped to a calendar day.
    #[error("timestamp {0} is outside the supported range")]
    InvalidTimestamp(u64),

    /// Page index or page size is zero.
    #[error("page index and size must be at least 1, got page {page_index} of size {page_size}")]
    InvalidPage {
        /// Requested 1-based page.
        page_index: u64,
        /// Requested page size.
        page_size: u64,
    },

    /// Restored member records violate a registry invariant.
    #[error("inconsistent registry state: {0}")]
    Inconsistent(String),
}

/// Convenience result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
