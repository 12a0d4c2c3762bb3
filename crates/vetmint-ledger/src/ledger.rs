//! Active assets, per-owner holdings and the append-only burn ledger.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use vetmint_types::{Asset, AssetId, CallerId};

use crate::{LedgerError, Result};

/// Supply limits applied to one mint batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintLimits {
    /// Maximum live supply after the batch.
    pub supply_cap: u64,
    /// Maximum holdings of the recipient after the batch. `None` = exempt.
    pub per_owner_cap: Option<u64>,
}

/// A validated mint batch, ready to commit.
///
/// Only valid against the ledger state it was planned from; commit it before
/// any other ledger mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintPlan {
    owner: CallerId,
    uris: Vec<String>,
    first_id: AssetId,
}

impl MintPlan {
    /// Number of assets in the batch. Never zero.
    pub fn batch_size(&self) -> u64 {
        self.uris.len() as u64
    }
}

/// The issuance ledger.
#[derive(Debug, Clone, Default)]
pub struct AssetLedger {
    active: BTreeMap<AssetId, Asset>,
    by_uri: HashMap<String, AssetId>,
    holdings: HashMap<CallerId, BTreeSet<AssetId>>,
    burned: Vec<Asset>,
    burned_uris: HashSet<String>,
    last_asset_id: AssetId,
}

impl AssetLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from its active assets, its burn ledger (in burn
    /// order) and the last issued id.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Inconsistent`] unless every id in `1..=last_asset_id`
    ///   appears exactly once across `active` and `burned`, and active uris
    ///   are unique
    pub fn from_parts(
        active: Vec<Asset>,
        burned: Vec<Asset>,
        last_asset_id: AssetId,
    ) -> Result<Self> {
        let mut ledger = Self {
            last_asset_id,
            ..Self::default()
        };
        let mut seen = HashSet::new();
        for asset in active.iter().chain(burned.iter()) {
            if asset.asset_id == 0 || asset.asset_id > last_asset_id {
                return Err(LedgerError::Inconsistent(format!(
                    "asset id {} outside 1..={last_asset_id}",
                    asset.asset_id
                )));
            }
            if !seen.insert(asset.asset_id) {
                return Err(LedgerError::Inconsistent(format!(
                    "asset id {} recorded twice",
                    asset.asset_id
                )));
            }
        }
        if seen.len() as u64 != last_asset_id {
            return Err(LedgerError::Inconsistent(format!(
                "{} asset records for {last_asset_id} issued ids",
                seen.len()
            )));
        }
        for asset in active {
            if ledger.by_uri.contains_key(&asset.uri) {
                return Err(LedgerError::Inconsistent(format!(
                    "uri {:?} active twice",
                    asset.uri
                )));
            }
            ledger.insert_active(asset);
        }
        for asset in burned {
            ledger.burned_uris.insert(asset.uri.clone());
            ledger.burned.push(asset);
        }
        Ok(ledger)
    }

    /// Check a batch against the limits and current state.
    ///
    /// Checks run in order: empty batch, global cap, per-owner cap, then uri
    /// uniqueness (against active assets and within the batch).
    ///
    /// # Errors
    ///
    /// - [`LedgerError::EmptyBatch`] / [`LedgerError::EmptyUri`]
    /// - [`LedgerError::SupplyExceeded`]
    /// - [`LedgerError::PerOwnerCapExceeded`]
    /// - [`LedgerError::DuplicateAsset`]
    /// - [`LedgerError::Overflow`] if the id counter would wrap
    pub fn plan_mint(
        &self,
        owner: CallerId,
        uris: &[String],
        limits: MintLimits,
    ) -> Result<MintPlan> {
        if uris.is_empty() {
            return Err(LedgerError::EmptyBatch);
        }
        let requested = uris.len() as u64;

        let live = self.live_supply();
        if live
            .checked_add(requested)
            .map_or(true, |total| total > limits.supply_cap)
        {
            return Err(LedgerError::SupplyExceeded {
                requested,
                live,
                cap: limits.supply_cap,
            });
        }

        if let Some(cap) = limits.per_owner_cap {
            let held = self.holding_count(&owner);
            if held.checked_add(requested).map_or(true, |total| total > cap) {
                return Err(LedgerError::PerOwnerCapExceeded {
                    requested,
                    held,
                    cap,
                });
            }
        }

        let mut batch = HashSet::with_capacity(uris.len());
        for uri in uris {
            if uri.is_empty() {
                return Err(LedgerError::EmptyUri);
            }
            if self.by_uri.contains_key(uri) || !batch.insert(uri.as_str()) {
                return Err(LedgerError::DuplicateAsset { uri: uri.clone() });
            }
        }

        let first_id = self
            .last_asset_id
            .checked_add(1)
            .ok_or(LedgerError::Overflow("asset id"))?;
        first_id
            .checked_add(requested - 1)
            .ok_or(LedgerError::Overflow("asset id"))?;

        Ok(MintPlan {
            owner,
            uris: uris.to_vec(),
            first_id,
        })
    }

    /// Issue a planned batch. Returns the assigned ids in order.
    pub fn commit_mint(&mut self, plan: MintPlan) -> Vec<AssetId> {
        let MintPlan {
            owner,
            uris,
            first_id,
        } = plan;
        let mut ids = Vec::with_capacity(uris.len());
        for (asset_id, uri) in (first_id..).zip(uris) {
            self.insert_active(Asset {
                asset_id,
                uri,
                owner,
            });
            self.last_asset_id = asset_id;
            ids.push(asset_id);
        }
        tracing::debug!(%owner, first_id, count = ids.len(), "assets issued");
        ids
    }

    /// Burn an active asset: it leaves the owner's holdings and live supply
    /// and is appended to the burn ledger with its last owner.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::AssetNotFound`] if `asset_id` is not active
    pub fn burn(&mut self, asset_id: AssetId) -> Result<Asset> {
        let asset = self
            .active
            .remove(&asset_id)
            .ok_or(LedgerError::AssetNotFound(asset_id))?;
        self.by_uri.remove(&asset.uri);
        if let Some(held) = self.holdings.get_mut(&asset.owner) {
            held.remove(&asset_id);
            if held.is_empty() {
                self.holdings.remove(&asset.owner);
            }
        }
        self.burned_uris.insert(asset.uri.clone());
        self.burned.push(asset.clone());
        Ok(asset)
    }

    /// Active asset by id.
    pub fn get(&self, asset_id: AssetId) -> Option<&Asset> {
        self.active.get(&asset_id)
    }

    /// Current owner of an active asset.
    pub fn owner_of(&self, asset_id: AssetId) -> Result<CallerId> {
        self.get(asset_id)
            .map(|asset| asset.owner)
            .ok_or(LedgerError::AssetNotFound(asset_id))
    }

    /// Uri of an active asset.
    pub fn uri_of(&self, asset_id: AssetId) -> Result<&str> {
        self.get(asset_id)
            .map(|asset| asset.uri.as_str())
            .ok_or(LedgerError::AssetNotFound(asset_id))
    }

    /// Whether `uri` belongs to an active asset.
    pub fn asset_exists(&self, uri: &str) -> bool {
        self.by_uri.contains_key(uri)
    }

    /// Whether any burned asset carried `uri`.
    pub fn is_burned(&self, uri: &str) -> bool {
        self.burned_uris.contains(uri)
    }

    /// Active assets of `owner` in ascending id order.
    pub fn tokens_of(&self, owner: &CallerId) -> Vec<Asset> {
        self.holdings
            .get(owner)
            .map(|ids| ids.iter().filter_map(|id| self.active.get(id)).cloned().collect())
            .unwrap_or_default()
    }

    /// Number of active assets held by `owner`.
    pub fn holding_count(&self, owner: &CallerId) -> u64 {
        self.holdings.get(owner).map_or(0, |ids| ids.len() as u64)
    }

    /// The burn ledger in burn order.
    pub fn burned(&self) -> &[Asset] {
        &self.burned
    }

    /// All active assets in ascending id order.
    pub fn active_assets(&self) -> impl Iterator<Item = &Asset> {
        self.active.values()
    }

    /// Number of active assets.
    pub fn live_supply(&self) -> u64 {
        self.active.len() as u64
    }

    /// Number of assets ever issued; also the last issued id.
    pub fn total_minted(&self) -> u64 {
        self.last_asset_id
    }

    /// Number of assets ever burned.
    pub fn total_burned(&self) -> u64 {
        self.burned.len() as u64
    }

    fn insert_active(&mut self, asset: Asset) {
        self.by_uri.insert(asset.uri.clone(), asset.asset_id);
        self.holdings
            .entry(asset.owner)
            .or_default()
            .insert(asset.asset_id);
        self.active.insert(asset.asset_id, asset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN: MintLimits = MintLimits {
        supply_cap: 10_000,
        per_owner_cap: Some(100),
    };

    fn id(n: u8) -> CallerId {
        CallerId::from_bytes([n; 20])
    }

    fn uris(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| format!("ipfs://{n}")).collect()
    }

    fn mint(
        ledger: &mut AssetLedger,
        owner: CallerId,
        names: &[&str],
        limits: MintLimits,
    ) -> Result<Vec<AssetId>> {
        let plan = ledger.plan_mint(owner, &uris(names), limits)?;
        Ok(ledger.commit_mint(plan))
    }

    #[test]
    fn test_sequential_ids_and_ownership() {
        let mut ledger = AssetLedger::new();
        let ids = mint(&mut ledger, id(1), &["a", "b", "c"], OPEN)
            .expect("mint");
        assert_eq!(ids, vec![1, 2, 3]);
        let ids = mint(&mut ledger, id(2), &["d"], OPEN).expect("mint");
        assert_eq!(ids, vec![4]);

        assert_eq!(ledger.owner_of(2).expect("owner"), id(1));
        assert_eq!(ledger.uri_of(4).expect("uri"), "ipfs://d");
        assert_eq!(ledger.holding_count(&id(1)), 3);
        assert_eq!(ledger.live_supply(), 4);
        assert!(ledger.asset_exists("ipfs://a"));
    }

    #[test]
    fn test_supply_cap() {
        let mut ledger = AssetLedger::new();
        let limits = MintLimits {
            supply_cap: 2,
            per_owner_cap: None,
        };
        mint(&mut ledger, id(1), &["a", "b"], limits)
            .expect("reach cap");
        assert_eq!(ledger.live_supply(), 2);
        assert_eq!(
            mint(&mut ledger, id(1), &["c"], limits),
            Err(LedgerError::SupplyExceeded {
                requested: 1,
                live: 2,
                cap: 2
            })
        );
    }

    #[test]
    fn test_burn_frees_supply_but_not_ids() {
        let mut ledger = AssetLedger::new();
        let limits = MintLimits {
            supply_cap: 2,
            per_owner_cap: None,
        };
        mint(&mut ledger, id(1), &["a", "b"], limits).expect("mint");
        ledger.burn(1).expect("burn");
        let ids = mint(&mut ledger, id(1), &["c"], limits)
            .expect("capacity freed");
        assert_eq!(ids, vec![3]);
        assert_eq!(ledger.total_minted(), 3);
        assert_eq!(ledger.total_burned(), 1);
        assert_eq!(ledger.live_supply(), ledger.total_minted() - ledger.total_burned());
    }

    #[test]
    fn test_per_owner_cap() {
        let mut ledger = AssetLedger::new();
        let limits = MintLimits {
            supply_cap: 100,
            per_owner_cap: Some(2),
        };
        mint(&mut ledger, id(1), &["a"], limits).expect("mint");
        assert!(matches!(
            mint(&mut ledger, id(1), &["b", "c"], limits),
            Err(LedgerError::PerOwnerCapExceeded { held: 1, cap: 2, .. })
        ));
        mint(&mut ledger, id(2), &["b", "c"], limits)
            .expect("other owner has own cap");

        let exempt = MintLimits {
            supply_cap: 100,
            per_owner_cap: None,
        };
        mint(&mut ledger, id(1), &["d", "e", "f"], exempt)
            .expect("exempt owner");
    }

    #[test]
    fn test_duplicates_rejected_atomically() {
        let mut ledger = AssetLedger::new();
        mint(&mut ledger, id(1), &["a"], OPEN).expect("mint");
        assert_eq!(
            mint(&mut ledger, id(1), &["b", "a"], OPEN),
            Err(LedgerError::DuplicateAsset {
                uri: "ipfs://a".to_string()
            })
        );
        assert_eq!(
            mint(&mut ledger, id(1), &["x", "x"], OPEN),
            Err(LedgerError::DuplicateAsset {
                uri: "ipfs://x".to_string()
            })
        );
        assert!(!ledger.asset_exists("ipfs://b"));
        assert!(!ledger.asset_exists("ipfs://x"));
        assert_eq!(ledger.total_minted(), 1);
    }

    #[test]
    fn test_empty_batch_and_uri() {
        let ledger = AssetLedger::new();
        assert_eq!(ledger.plan_mint(id(1), &[], OPEN), Err(LedgerError::EmptyBatch));
        assert_eq!(
            ledger.plan_mint(id(1), &[String::new()], OPEN),
            Err(LedgerError::EmptyUri)
        );
    }

    #[test]
    fn test_burn_record() {
        let mut ledger = AssetLedger::new();
        mint(&mut ledger, id(2), &["a", "b", "c"], OPEN)
            .expect("mint");
        let burned = ledger.burn(2).expect("burn");
        assert_eq!(burned.owner, id(2));

        assert!(!ledger.asset_exists("ipfs://b"));
        assert!(ledger.is_burned("ipfs://b"));
        assert_eq!(ledger.burned(), &[burned]);
        let held: Vec<_> = ledger
            .tokens_of(&id(2))
            .iter()
            .map(|a| a.asset_id)
            .collect();
        assert_eq!(held, vec![1, 3]);
        assert_eq!(ledger.burn(2), Err(LedgerError::AssetNotFound(2)));
        assert_eq!(ledger.owner_of(2), Err(LedgerError::AssetNotFound(2)));
    }

    #[test]
    fn test_burned_uri_can_be_reissued() {
        let mut ledger = AssetLedger::new();
        mint(&mut ledger, id(1), &["a"], OPEN).expect("mint");
        ledger.burn(1).expect("burn");
        let ids = mint(&mut ledger, id(1), &["a"], OPEN).expect("reissue");
        assert_eq!(ids, vec![2]);
        assert!(ledger.asset_exists("ipfs://a"));
        assert!(ledger.is_burned("ipfs://a"));
        assert_eq!(ledger.burned().len(), 1);
    }

    #[test]
    fn test_from_parts_roundtrip() {
        let mut ledger = AssetLedger::new();
        mint(&mut ledger, id(1), &["a", "b"], OPEN).expect("mint");
        mint(&mut ledger, id(2), &["c"], OPEN).expect("mint");
        ledger.burn(2).expect("burn");

        let active: Vec<Asset> = ledger.active_assets().cloned().collect();
        let rebuilt =
            AssetLedger::from_parts(active, ledger.burned().to_vec(), ledger.total_minted())
                .expect("rebuild");
        assert_eq!(rebuilt.live_supply(), 2);
        assert_eq!(rebuilt.tokens_of(&id(1)).len(), 1);
        assert!(rebuilt.is_burned("ipfs://b"));
        assert!(rebuilt.asset_exists("ipfs://c"));
    }

    #[test]
    fn test_from_parts_rejects_missing_ids() {
        let asset = Asset {
            asset_id: 1,
            uri: "ipfs://a".to_string(),
            owner: id(1),
        };
        assert!(matches!(
            AssetLedger::from_parts(vec![asset], Vec::new(), 2),
            Err(LedgerError::Inconsistent(_))
        ));
    }
}
