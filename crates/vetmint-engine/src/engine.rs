//! The engine context and its public operations.
//!
//! Every operation takes the authenticated caller first. Gated operations
//! resolve the caller's role, check toggles and limits, run every remaining
//! precondition, and only then mutate. Public reads take no caller.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use vetmint_ledger::{AssetLedger, MintLimits, PaymentGate};
use vetmint_registry::{validate, RegistryError, UserRegistry};
use vetmint_types::{
    Amount, Asset, AssetId, CallerId, DateKey, Event, Member, MemberIndex, Notification, Role,
};

use crate::access::{self, Requirement};
use crate::settings::Settings;
use crate::snapshot::EngineSnapshot;
use crate::{EngineError, Result};

/// The operator's own registration, performed when the engine is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    pub operator: CallerId,
    pub name: String,
    pub avatar_id: u32,
    /// Unix seconds.
    pub joined_at: u64,
}

/// Funds moved out of the treasury by [`Engine::withdraw`].
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub to: CallerId,
    #[serde_as(as = "DisplayFromStr")]
    pub amount: Amount,
}

/// Membership registry plus issuance ledger, owned as one unit.
#[derive(Debug, Clone)]
pub struct Engine {
    operator: CallerId,
    settings: Settings,
    registry: UserRegistry,
    ledger: AssetLedger,
    treasury: PaymentGate,
    outbox: Vec<Event>,
    sequence: u64,
}

impl Engine {
    /// Create an engine and register the operator as member #1.
    ///
    /// Genesis bypasses the registration toggle but not the name rules.
    pub fn new(settings: Settings, genesis: Genesis) -> Result<Self> {
        let mut engine = Self {
            operator: genesis.operator,
            settings,
            registry: UserRegistry::new(),
            ledger: AssetLedger::new(),
            treasury: PaymentGate::new(),
            outbox: Vec::new(),
            sequence: 0,
        };
        engine.registry.register(
            genesis.operator,
            &genesis.name,
            genesis.avatar_id,
            genesis.joined_at,
        )?;
        tracing::info!(operator = %genesis.operator, name = %genesis.name, "engine initialized");
        engine.emit(Notification::RegistrationCompleted { name: genesis.name });
        Ok(engine)
    }

    /// Rebuild an engine from a snapshot, recomputing every index.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Snapshot`] if the operator is not member #1 or an
    ///   asset is held by a non-member
    /// - [`EngineError::Registry`] / [`EngineError::Ledger`] with an
    ///   `Inconsistent` variant if the records break a registry or ledger
    ///   invariant
    pub fn restore(snapshot: EngineSnapshot) -> Result<Self> {
        snapshot.check_links().map_err(EngineError::Snapshot)?;
        let EngineSnapshot {
            operator,
            settings,
            members,
            assets,
            burned,
            last_asset_id,
            balance,
            last_sequence,
        } = snapshot;

        let registry = UserRegistry::from_members(members)?;
        let ledger = AssetLedger::from_parts(assets, burned, last_asset_id)?;
        tracing::info!(
            members = registry.count(),
            live_supply = ledger.live_supply(),
            last_sequence,
            "engine restored"
        );
        Ok(Self {
            operator,
            settings,
            registry,
            ledger,
            treasury: PaymentGate::with_balance(balance),
            outbox: Vec::new(),
            sequence: last_sequence,
        })
    }

    /// Capture the complete state. Staged notifications are not included.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            operator: self.operator,
            settings: self.settings.clone(),
            members: self.registry.members().to_vec(),
            assets: self.ledger.active_assets().cloned().collect(),
            burned: self.ledger.burned().to_vec(),
            last_asset_id: self.ledger.total_minted(),
            balance: self.treasury.balance(),
            last_sequence: self.sequence,
        }
    }

    // =========================================================
    // Registration and identity
    // =========================================================

    /// Self-register `caller`. Returns the assigned member index.
    pub fn register(
        &mut self,
        caller: &CallerId,
        name: &str,
        avatar_id: u32,
        joined_at: u64,
    ) -> Result<MemberIndex> {
        if !self.settings.registration_enabled {
            return Err(EngineError::RegistrationDisabled);
        }
        let member = self.registry.register(*caller, name, avatar_id, joined_at)?;
        let member_index = member.member_index;
        tracing::info!(
            %caller,
            member_index,
            date_bucket = %member.date_bucket,
            date_index = member.date_index,
            "member registered"
        );
        self.emit(Notification::RegistrationCompleted {
            name: name.to_string(),
        });
        Ok(member_index)
    }

    /// Change the caller's display name.
    pub fn rename(&mut self, caller: &CallerId, new_name: &str) -> Result<()> {
        self.require(caller, Requirement::Registered)?;
        let old_name = self.registry.rename(caller, new_name)?;
        tracing::info!(%caller, %old_name, %new_name, "member renamed");
        self.emit(Notification::NameUpdated {
            old_name,
            new_name: new_name.to_string(),
        });
        Ok(())
    }

    /// The caller's own record.
    pub fn get_self(&self, caller: &CallerId) -> Result<Member> {
        self.require(caller, Requirement::Registered)?;
        self.registry
            .get(caller)
            .cloned()
            .ok_or(EngineError::Registry(RegistryError::MemberNotFound(*caller)))
    }

    /// Look up a member by exact display name.
    pub fn get_by_name(&self, caller: &CallerId, name: &str) -> Result<Member> {
        self.require(caller, Requirement::Validator)?;
        self.registry
            .get_by_name(name)
            .cloned()
            .ok_or_else(|| EngineError::Registry(RegistryError::NameNotFound(name.to_string())))
    }

    /// Whether any member holds `name`.
    pub fn name_exists(&self, name: &str) -> bool {
        self.registry.name_exists(name)
    }

    // =========================================================
    // Admission workflow
    // =========================================================

    pub fn approve(&mut self, caller: &CallerId, target: &CallerId) -> Result<()> {
        self.require(caller, Requirement::Validator)?;
        let member = self.registry.approve(target)?;
        tracing::info!(%caller, %target, member_index = member.member_index, "member approved");
        Ok(())
    }

    pub fn add_validator(&mut self, caller: &CallerId, target: &CallerId) -> Result<()> {
        self.require(caller, Requirement::Operator)?;
        let member = self.registry.add_validator(target)?;
        tracing::info!(%target, member_index = member.member_index, "validator added");
        Ok(())
    }

    pub fn revoke_validator(
        &mut self,
        caller: &CallerId,
        target: &CallerId,
        reason: &str,
    ) -> Result<()> {
        self.require(caller, Requirement::Operator)?;
        self.check_sanction(target, reason)?;
        let member = self.registry.revoke_validator(target, reason)?;
        tracing::info!(%target, member_index = member.member_index, %reason, "validator revoked");
        Ok(())
    }

    pub fn block(&mut self, caller: &CallerId, target: &CallerId, reason: &str) -> Result<()> {
        self.require(caller, Requirement::Validator)?;
        self.check_sanction(target, reason)?;
        let member = self.registry.block(target, reason)?;
        tracing::info!(
            %caller,
            %target,
            member_index = member.member_index,
            %reason,
            "member blocked"
        );
        Ok(())
    }

    // =========================================================
    // Directory
    // =========================================================

    /// One page of all members, ascending by member index.
    pub fn get_page(
        &self,
        caller: &CallerId,
        page_index: u64,
        page_size: u64,
    ) -> Result<Vec<Member>> {
        self.require(caller, Requirement::Operator)?;
        Ok(self.registry.page(page_index, page_size)?)
    }

    /// One page of a day's members, ascending by date index.
    pub fn get_page_by_date(
        &self,
        caller: &CallerId,
        key: DateKey,
        page_index: u64,
        page_size: u64,
    ) -> Result<Vec<Member>> {
        self.require(caller, Requirement::Operator)?;
        Ok(self.registry.page_by_date(key, page_index, page_size)?)
    }

    pub fn count_all(&self) -> u64 {
        self.registry.count()
    }

    pub fn count_by_date(&self, key: DateKey) -> u64 {
        self.registry.count_by_date(key)
    }

    /// Days with at least one registration, in first-seen order.
    pub fn list_date_keys(&self) -> &[DateKey] {
        self.registry.date_keys()
    }

    // =========================================================
    // Issuance
    // =========================================================

    /// Issue one asset per uri to the caller. Returns the assigned ids.
    ///
    /// The operator is exempt from the issuance toggle, the per-member cap
    /// and the price check. Any attached payment is credited on success.
    pub fn mint(
        &mut self,
        caller: &CallerId,
        uris: &[String],
        payment: Amount,
    ) -> Result<Vec<AssetId>> {
        let role = self.require(caller, Requirement::Approved)?;
        let exempt = role == Role::Operator;
        if !exempt && !self.settings.issuance_enabled {
            return Err(EngineError::IssuanceDisabled);
        }

        let limits = MintLimits {
            supply_cap: self.settings.supply_cap,
            per_owner_cap: (!exempt).then_some(self.settings.per_member_cap),
        };
        let plan = self.ledger.plan_mint(*caller, uris, limits)?;
        let receipt = self
            .treasury
            .accept(self.settings.unit_price, plan.batch_size(), payment, exempt)?;

        let ids = self.ledger.commit_mint(plan);
        self.treasury.settle(receipt);
        tracing::info!(
            %caller,
            asset_count = ids.len(),
            paid = %receipt.paid,
            balance = %receipt.balance_after,
            live_supply = self.ledger.live_supply(),
            "batch minted"
        );
        self.emit(Notification::BatchMinted {
            uris: uris.to_vec(),
        });
        Ok(ids)
    }

    /// Burn an active asset. Only its holder or the operator may burn it.
    pub fn burn(&mut self, caller: &CallerId, asset_id: AssetId) -> Result<Asset> {
        let owner = self.ledger.owner_of(asset_id)?;
        if owner != *caller && *caller != self.operator {
            return Err(EngineError::NotOwner { asset_id });
        }
        let asset = self.ledger.burn(asset_id)?;
        tracing::info!(%caller, asset_id, %owner, "asset burned");
        self.emit(Notification::AssetBurned {
            uri: asset.uri.clone(),
        });
        Ok(asset)
    }

    /// Whether `uri` belongs to an active asset.
    pub fn asset_exists(&self, uri: &str) -> bool {
        self.ledger.asset_exists(uri)
    }

    /// Whether any burned asset carried `uri`.
    pub fn is_burned(&self, caller: &CallerId, uri: &str) -> Result<bool> {
        self.require(caller, Requirement::Operator)?;
        Ok(self.ledger.is_burned(uri))
    }

    pub fn owner_of(&self, asset_id: AssetId) -> Result<CallerId> {
        Ok(self.ledger.owner_of(asset_id)?)
    }

    pub fn uri_of(&self, asset_id: AssetId) -> Result<String> {
        Ok(self.ledger.uri_of(asset_id)?.to_string())
    }

    /// Active holdings of any identity.
    pub fn tokens_of(&self, caller: &CallerId, owner: &CallerId) -> Result<Vec<Asset>> {
        self.require(caller, Requirement::Operator)?;
        Ok(self.ledger.tokens_of(owner))
    }

    /// The caller's own active holdings.
    pub fn my_tokens(&self, caller: &CallerId) -> Result<Vec<Asset>> {
        self.require(caller, Requirement::Vetted)?;
        Ok(self.ledger.tokens_of(caller))
    }

    /// The burn ledger in burn order.
    pub fn burned_list(&self, caller: &CallerId) -> Result<Vec<Asset>> {
        self.require(caller, Requirement::Operator)?;
        Ok(self.ledger.burned().to_vec())
    }

    pub fn live_supply(&self) -> u64 {
        self.ledger.live_supply()
    }

    pub fn total_minted(&self) -> u64 {
        self.ledger.total_minted()
    }

    pub fn total_burned(&self) -> u64 {
        self.ledger.total_burned()
    }

    // =========================================================
    // Configuration
    // =========================================================

    /// Current settings (public).
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_registration_enabled(&mut self, caller: &CallerId, enabled: bool) -> Result<()> {
        self.require(caller, Requirement::Operator)?;
        self.settings.registration_enabled = enabled;
        tracing::info!(enabled, "registration toggled");
        Ok(())
    }

    pub fn set_issuance_enabled(&mut self, caller: &CallerId, enabled: bool) -> Result<()> {
        self.require(caller, Requirement::Operator)?;
        self.settings.issuance_enabled = enabled;
        tracing::info!(enabled, "issuance toggled");
        Ok(())
    }

    /// Lowering the cap below live supply only blocks further issuance.
    pub fn set_supply_cap(&mut self, caller: &CallerId, cap: u64) -> Result<()> {
        self.require(caller, Requirement::Operator)?;
        self.settings.supply_cap = cap;
        tracing::info!(cap, live_supply = self.ledger.live_supply(), "supply cap updated");
        Ok(())
    }

    pub fn set_per_member_cap(&mut self, caller: &CallerId, cap: u64) -> Result<()> {
        self.require(caller, Requirement::Operator)?;
        self.settings.per_member_cap = cap;
        tracing::info!(cap, "per-member cap updated");
        Ok(())
    }

    pub fn set_unit_price(&mut self, caller: &CallerId, price: Amount) -> Result<()> {
        self.require(caller, Requirement::Operator)?;
        self.settings.unit_price = price;
        tracing::info!(price = %price, "unit price updated");
        Ok(())
    }

    // =========================================================
    // Funds
    // =========================================================

    pub fn balance(&self, caller: &CallerId) -> Result<Amount> {
        self.require(caller, Requirement::Operator)?;
        Ok(self.treasury.balance())
    }

    /// Move the whole treasury balance to the operator.
    pub fn withdraw(&mut self, caller: &CallerId) -> Result<Withdrawal> {
        self.require(caller, Requirement::Operator)?;
        let amount = self.treasury.withdraw();
        tracing::info!(to = %self.operator, amount = %amount, "treasury withdrawn");
        Ok(Withdrawal {
            to: self.operator,
            amount,
        })
    }

    // =========================================================
    // Roles and notifications
    // =========================================================

    pub fn operator(&self) -> CallerId {
        self.operator
    }

    pub fn is_operator(&self, identity: &CallerId) -> bool {
        *identity == self.operator
    }

    /// Resolved role of any identity.
    pub fn role_of(&self, identity: &CallerId) -> Role {
        access::classify(identity, &self.operator, &self.registry)
    }

    /// Take every staged notification, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.outbox)
    }

    /// Sequence number of the most recently staged notification.
    pub fn last_sequence(&self) -> u64 {
        self.sequence
    }

    fn require(&self, caller: &CallerId, requirement: Requirement) -> Result<Role> {
        let role = self.role_of(caller);
        access::authorize(role, requirement)?;
        Ok(role)
    }

    /// Preconditions shared by block and revoke: reason rules, then the
    /// operator is untouchable.
    fn check_sanction(&self, target: &CallerId, reason: &str) -> Result<()> {
        validate::reason(reason)?;
        if self.is_operator(target) {
            return Err(EngineError::CannotActOnOperator);
        }
        Ok(())
    }

    fn emit(&mut self, notification: Notification) {
        self.sequence += 1;
        tracing::debug!(
            sequence = self.sequence,
            event_type = notification.event_type().as_str(),
            "notification staged"
        );
        self.outbox.push(Event {
            sequence: self.sequence,
            notification,
        });
    }
}
