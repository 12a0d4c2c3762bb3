//! Configuration store: operational toggles, caps and unit price.
//!
//! Values are mutated only through the operator-gated setters on
//! [`crate::Engine`]. Lowering a cap never touches assets already issued.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use vetmint_types::{Amount, DEFAULT_PER_MEMBER_CAP, DEFAULT_SUPPLY_CAP, DEFAULT_UNIT_PRICE};

/// Mutable operational settings.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Self-registration open.
    #[serde(default)]
    pub registration_enabled: bool,
    /// Issuance open to non-operators.
    #[serde(default)]
    pub issuance_enabled: bool,
    /// Maximum live supply.
    #[serde(default = "default_supply_cap")]
    pub supply_cap: u64,
    /// Maximum active holdings per non-operator member.
    #[serde(default = "default_per_member_cap")]
    pub per_member_cap: u64,
    /// Price per asset in base units. Kept as a decimal string so it
    /// survives formats without 128-bit integers.
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_unit_price")]
    pub unit_price: Amount,
}

fn default_supply_cap() -> u64 {
    DEFAULT_SUPPLY_CAP
}

fn default_per_member_cap() -> u64 {
    DEFAULT_PER_MEMBER_CAP
}

fn default_unit_price() -> Amount {
    DEFAULT_UNIT_PRICE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registration_enabled: false,
            issuance_enabled: false,
            supply_cap: default_supply_cap(),
            per_member_cap: default_per_member_cap(),
            unit_price: default_unit_price(),
        }
    }
}
