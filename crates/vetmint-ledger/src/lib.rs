//! # vetmint-ledger
//!
//! Capped issuance of uniquely identified assets, and the payment gate that
//! prices each issuance batch.
//!
//! Both halves split every mutation into a read-only *plan* step that performs
//! all checks and a *commit* step that cannot fail. The caller runs every plan
//! it needs first and commits only once all of them have succeeded, which is
//! how a batch mint either lands completely or not at all.
//!
//! ## Modules
//!
//! - [`ledger`] — active assets, holdings, burn ledger and supply counters
//! - [`payment`] — unit-price check and treasury balance

pub mod ledger;
pub mod payment;

pub use ledger::{AssetLedger, MintLimits, MintPlan};
pub use payment::{PaymentGate, Receipt};

use vetmint_types::{Amount, AssetId};

/// Error types for ledger and payment operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// A mint batch with no uris.
    #[error("mint batch must contain at least one uri")]
    EmptyBatch,

    /// A uri that is the empty string.
    #[error("asset uri must not be empty")]
    EmptyUri,

    /// A uri is already active, or repeated inside the batch.
    #[error("One of the assets is existing. You can only mint unique assets.")]
    DuplicateAsset {
        /// The offending uri.
        uri: String,
    },

    /// The batch would push live supply past the global cap.
    #[error("All assets are minted.")]
    SupplyExceeded {
        /// Batch size.
        requested: u64,
        /// Live supply before the batch.
        live: u64,
        /// Global cap.
        cap: u64,
    },

    /// The batch would push the owner's holdings past the per-member cap.
    #[error("Maximum minted assets per member exceeded.")]
    PerOwnerCapExceeded {
        /// Batch size.
        requested: u64,
        /// Assets the owner currently holds.
        held: u64,
        /// Per-member cap.
        cap: u64,
    },

    /// Attached payment below `unit_price * batch_size`.
    #[error("You paid less than the minimum price per asset.")]
    InsufficientPayment {
        /// Amount due.
        required: Amount,
        /// Amount attached.
        paid: Amount,
    },

    /// No active asset with this id.
    #[error("asset not found: {0}")]
    AssetNotFound(AssetId),

    /// A counter or balance would overflow.
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    /// Restored asset records violate a ledger invariant.
    #[error("inconsistent ledger state: {0}")]
    Inconsistent(String),
}

/// Convenience result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
