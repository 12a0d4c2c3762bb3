//! Serializable engine state.
//!
//! A snapshot carries only primary records. Secondary indices (identity,
//! name, date buckets, uri, holdings) are rebuilt on restore.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use vetmint_types::{Amount, Asset, AssetId, CallerId, Member};

use crate::settings::Settings;

/// Complete engine state at one point in the operation order.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub operator: CallerId,
    pub settings: Settings,
    /// Members in `member_index` order.
    pub members: Vec<Member>,
    /// Active assets in ascending id order.
    pub assets: Vec<Asset>,
    /// Burn ledger in burn order.
    pub burned: Vec<Asset>,
    pub last_asset_id: AssetId,
    #[serde_as(as = "DisplayFromStr")]
    pub balance: Amount,
    /// Sequence number of the last staged notification.
    pub last_sequence: u64,
}

impl EngineSnapshot {
    /// Cross-record checks the registry and ledger cannot make on their own.
    pub(crate) fn check_links(&self) -> Result<(), String> {
        match self.members.first() {
            Some(first) if first.identity == self.operator => {}
            Some(first) => {
                return Err(format!(
                    "member #1 is {}, operator is {}",
                    first.identity, self.operator
                ))
            }
            None => return Err("no operator record".to_string()),
        }
        for asset in &self.assets {
            if !self.members.iter().any(|m| m.identity == asset.owner) {
                return Err(format!(
                    "asset {} held by unknown identity {}",
                    asset.asset_id, asset.owner
                ));
            }
        }
        Ok(())
    }
}
