//! Issued asset records.

use serde::{Deserialize, Serialize};

use crate::{AssetId, CallerId};

/// A uniquely identified issued asset.
///
/// The same shape is used for active assets and for entries of the burn
/// ledger, where `owner` is the holder at the time of the burn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct Asset {
    /// 1-based issuance sequence number, never reused.
    #[ts(type = "number")]
    pub asset_id: AssetId,
    /// Caller-supplied content identifier.
    pub uri: String,
    #[ts(type = "string")]
    pub owner: CallerId,
}
