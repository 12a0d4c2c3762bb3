//! # vetmint-engine
//!
//! The stateful core: one [`Engine`] value owns the member registry, the
//! asset ledger, the treasury and the configuration store, and exposes every
//! public operation. Each operation resolves the caller's [`Role`], consults
//! the [`Settings`] when gated, then mutates.
//!
//! Operations run one at a time to completion. Every operation checks all of
//! its preconditions before the first mutation, so an `Err` leaves the engine
//! exactly as it was and stages no notification.
//!
//! ## Modules
//!
//! - [`access`] — caller role resolution and per-operation requirements
//! - [`settings`] — toggles, caps and unit price
//! - [`engine`] — the [`Engine`] and its operations
//! - [`snapshot`] — serializable engine state for persistence
//!
//! [`Role`]: vetmint_types::Role

pub mod access;
pub mod engine;
pub mod settings;
pub mod snapshot;

pub use access::{AccessDenied, Requirement};
pub use engine::{Engine, Genesis, Withdrawal};
pub use settings::Settings;
pub use snapshot::EngineSnapshot;

use serde::{Deserialize, Serialize};
use vetmint_ledger::LedgerError;
use vetmint_registry::RegistryError;
use vetmint_types::AssetId;

/// Error types for engine operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The caller's role is below the operation's requirement.
    #[error(transparent)]
    Unauthorized(#[from] AccessDenied),

    /// The target of a block or revoke is the operator.
    #[error("You cannot perform this action.")]
    CannotActOnOperator,

    /// Self-registration is switched off.
    #[error("Sign up is disabled at this moment.")]
    RegistrationDisabled,

    /// Issuance is switched off for non-operators.
    #[error("Minting is disabled at this moment.")]
    IssuanceDisabled,

    /// Burn by someone other than the holder or the operator.
    #[error("Caller is not the asset owner.")]
    NotOwner {
        /// The asset the caller tried to burn.
        asset_id: AssetId,
    },

    /// Member registry rejection.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Asset ledger or payment rejection.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A snapshot that cannot be restored.
    #[error("inconsistent snapshot: {0}")]
    Snapshot(String),
}

/// Convenience result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Closed classification of every rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthorized,
    InvalidInput,
    DuplicateName,
    DuplicateAsset,
    DuplicateMember,
    NotFound,
    CapacityExceeded,
    FeatureDisabled,
    PaymentInsufficient,
    NotOwner,
}

impl ErrorKind {
    /// Stable snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::DuplicateName => "duplicate_name",
            ErrorKind::DuplicateAsset => "duplicate_asset",
            ErrorKind::DuplicateMember => "duplicate_member",
            ErrorKind::NotFound => "not_found",
            ErrorKind::CapacityExceeded => "capacity_exceeded",
            ErrorKind::FeatureDisabled => "feature_disabled",
            ErrorKind::PaymentInsufficient => "payment_insufficient",
            ErrorKind::NotOwner => "not_owner",
        }
    }
}

impl EngineError {
    /// The taxonomy class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Unauthorized(_) | EngineError::CannotActOnOperator => {
                ErrorKind::Unauthorized
            }
            EngineError::RegistrationDisabled | EngineError::IssuanceDisabled => {
                ErrorKind::FeatureDisabled
            }
            EngineError::NotOwner { .. } => ErrorKind::NotOwner,
            EngineError::Snapshot(_) => ErrorKind::InvalidInput,
            EngineError::Registry(e) => match e {
                RegistryError::NameTooShort
                | RegistryError::NameTooLong
                | RegistryError::ReasonTooShort
                | RegistryError::ReasonTooLong
                | RegistryError::InvalidTimestamp(_)
                | RegistryError::InvalidPage { .. }
                | RegistryError::Inconsistent(_) => ErrorKind::InvalidInput,
                RegistryError::DuplicateName => ErrorKind::DuplicateName,
                RegistryError::AlreadyRegistered => ErrorKind::DuplicateMember,
                RegistryError::MemberNotFound(_) | RegistryError::NameNotFound(_) => {
                    ErrorKind::NotFound
                }
            },
            EngineError::Ledger(e) => match e {
                LedgerError::EmptyBatch
                | LedgerError::EmptyUri
                | LedgerError::Overflow(_)
                | LedgerError::Inconsistent(_) => ErrorKind::InvalidInput,
                LedgerError::DuplicateAsset { .. } => ErrorKind::DuplicateAsset,
                LedgerError::SupplyExceeded { .. } | LedgerError::PerOwnerCapExceeded { .. } => {
                    ErrorKind::CapacityExceeded
                }
                LedgerError::InsufficientPayment { .. } => ErrorKind::PaymentInsufficient,
                LedgerError::AssetNotFound(_) => ErrorKind::NotFound,
            },
        }
    }
}
