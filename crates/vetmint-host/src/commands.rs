//! Command protocol.
//!
//! One JSON object per line: `{"caller": "0x..", "op": "<name>", ...args}`.
//! Each line yields one [`Response`]. Amounts travel as decimal strings.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use vetmint_engine::{Engine, ErrorKind, Result, Settings, Withdrawal};
use vetmint_types::{Amount, Asset, AssetId, CallerId, DateKey, Member};

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Request {
    pub caller: CallerId,
    #[serde(flatten)]
    pub command: Command,
}

/// Every operation the host accepts.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    // Registration and identity
    Register {
        name: String,
        #[serde(default)]
        avatar_id: u32,
        /// Unix seconds; the host clock when absent.
        #[serde(default)]
        joined_at: Option<u64>,
    },
    Rename {
        new_name: String,
    },
    GetSelf,
    GetByName {
        name: String,
    },
    NameExists {
        name: String,
    },

    // Admission workflow
    Approve {
        target: CallerId,
    },
    AddValidator {
        target: CallerId,
    },
    RevokeValidator {
        target: CallerId,
        reason: String,
    },
    Block {
        target: CallerId,
        reason: String,
    },

    // Directory
    GetPage {
        page_index: u64,
        page_size: u64,
    },
    GetPageByDate {
        date: DateKey,
        page_index: u64,
        page_size: u64,
    },
    CountAll,
    CountByDate {
        date: DateKey,
    },
    ListDateKeys,

    // Issuance
    Mint {
        uris: Vec<String>,
        #[serde_as(as = "DisplayFromStr")]
        #[serde(default)]
        payment: Amount,
    },
    Burn {
        asset_id: AssetId,
    },
    AssetExists {
        uri: String,
    },
    IsBurned {
        uri: String,
    },
    OwnerOf {
        asset_id: AssetId,
    },
    UriOf {
        asset_id: AssetId,
    },
    TokensOf {
        owner: CallerId,
    },
    MyTokens,
    BurnedList,
    LiveSupply,
    TotalMinted,
    TotalBurned,

    // Configuration
    SetRegistrationEnabled {
        enabled: bool,
    },
    SetIssuanceEnabled {
        enabled: bool,
    },
    SetSupplyCap {
        cap: u64,
    },
    SetPerMemberCap {
        cap: u64,
    },
    SetUnitPrice {
        #[serde_as(as = "DisplayFromStr")]
        price: Amount,
    },
    Settings,

    // Roles and funds
    IsOperator {
        identity: CallerId,
    },
    Balance,
    Withdraw,
}

impl Command {
    /// Whether a successful run changes engine state.
    pub fn is_mutating(&self) -> bool {
        match self {
            Command::Register { .. }
            | Command::Rename { .. }
            | Command::Approve { .. }
            | Command::AddValidator { .. }
            | Command::RevokeValidator { .. }
            | Command::Block { .. }
            | Command::Mint { .. }
            | Command::Burn { .. }
            | Command::SetRegistrationEnabled { .. }
            | Command::SetIssuanceEnabled { .. }
            | Command::SetSupplyCap { .. }
            | Command::SetPerMemberCap { .. }
            | Command::SetUnitPrice { .. }
            | Command::Withdraw => true,
            Command::GetSelf
            | Command::GetByName { .. }
            | Command::NameExists { .. }
            | Command::GetPage { .. }
            | Command::GetPageByDate { .. }
            | Command::CountAll
            | Command::CountByDate { .. }
            | Command::ListDateKeys
            | Command::AssetExists { .. }
            | Command::IsBurned { .. }
            | Command::OwnerOf { .. }
            | Command::UriOf { .. }
            | Command::TokensOf { .. }
            | Command::MyTokens
            | Command::BurnedList
            | Command::LiveSupply
            | Command::TotalMinted
            | Command::TotalBurned
            | Command::Settings
            | Command::IsOperator { .. }
            | Command::Balance => false,
        }
    }
}

/// Successful command output.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Done,
    Flag(bool),
    Count(u64),
    AssetIds(Vec<AssetId>),
    Member(Member),
    Members(Vec<Member>),
    Asset(Asset),
    Assets(Vec<Asset>),
    Identity(CallerId),
    Text(String),
    DateKeys(Vec<DateKey>),
    Amount(#[serde_as(as = "DisplayFromStr")] Amount),
    Settings(Settings),
    Withdrawal(Withdrawal),
}

/// One output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Reply>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    /// Create a success response.
    pub fn success(result: Reply) -> Self {
        Self {
            ok: true,
            result: Some(result),
            kind: None,
            error: None,
        }
    }

    /// Create an error response.
    pub fn failure(kind: ErrorKind, error: impl Into<String>) -> Self {
        Self {
            ok: false,
            result: None,
            kind: Some(kind),
            error: Some(error.into()),
        }
    }
}

/// Run one command against the engine. `now` supplies `joined_at` when the
/// request omits it.
pub fn execute(
    engine: &mut Engine,
    caller: &CallerId,
    command: Command,
    now: u64,
) -> Result<Reply> {
    let reply = match command {
        Command::Register {
            name,
            avatar_id,
            joined_at,
        } => Reply::Count(engine.register(caller, &name, avatar_id, joined_at.unwrap_or(now))?),
        Command::Rename { new_name } => {
            engine.rename(caller, &new_name)?;
            Reply::Done
        }
        Command::GetSelf => Reply::Member(engine.get_self(caller)?),
        Command::GetByName { name } => Reply::Member(engine.get_by_name(caller, &name)?),
        Command::NameExists { name } => Reply::Flag(engine.name_exists(&name)),

        Command::Approve { target } => {
            engine.approve(caller, &target)?;
            Reply::Done
        }
        Command::AddValidator { target } => {
            engine.add_validator(caller, &target)?;
            Reply::Done
        }
        Command::RevokeValidator { target, reason } => {
            engine.revoke_validator(caller, &target, &reason)?;
            Reply::Done
        }
        Command::Block { target, reason } => {
            engine.block(caller, &target, &reason)?;
            Reply::Done
        }

        Command::GetPage {
            page_index,
            page_size,
        } => Reply::Members(engine.get_page(caller, page_index, page_size)?),
        Command::GetPageByDate {
            date,
            page_index,
            page_size,
        } => Reply::Members(engine.get_page_by_date(caller, date, page_index, page_size)?),
        Command::CountAll => Reply::Count(engine.count_all()),
        Command::CountByDate { date } => Reply::Count(engine.count_by_date(date)),
        Command::ListDateKeys => Reply::DateKeys(engine.list_date_keys().to_vec()),

        Command::Mint { uris, payment } => Reply::AssetIds(engine.mint(caller, &uris, payment)?),
        Command::Burn { asset_id } => Reply::Asset(engine.burn(caller, asset_id)?),
        Command::AssetExists { uri } => Reply::Flag(engine.asset_exists(&uri)),
        Command::IsBurned { uri } => Reply::Flag(engine.is_burned(caller, &uri)?),
        Command::OwnerOf { asset_id } => Reply::Identity(engine.owner_of(asset_id)?),
        Command::UriOf { asset_id } => Reply::Text(engine.uri_of(asset_id)?),
        Command::TokensOf { owner } => Reply::Assets(engine.tokens_of(caller, &owner)?),
        Command::MyTokens => Reply::Assets(engine.my_tokens(caller)?),
        Command::BurnedList => Reply::Assets(engine.burned_list(caller)?),
        Command::LiveSupply => Reply::Count(engine.live_supply()),
        Command::TotalMinted => Reply::Count(engine.total_minted()),
        Command::TotalBurned => Reply::Count(engine.total_burned()),

        Command::SetRegistrationEnabled { enabled } => {
            engine.set_registration_enabled(caller, enabled)?;
            Reply::Done
        }
        Command::SetIssuanceEnabled { enabled } => {
            engine.set_issuance_enabled(caller, enabled)?;
            Reply::Done
        }
        Command::SetSupplyCap { cap } => {
            engine.set_supply_cap(caller, cap)?;
            Reply::Done
        }
        Command::SetPerMemberCap { cap } => {
            engine.set_per_member_cap(caller, cap)?;
            Reply::Done
        }
        Command::SetUnitPrice { price } => {
            engine.set_unit_price(caller, price)?;
            Reply::Done
        }
        Command::Settings => Reply::Settings(engine.settings().clone()),

        Command::IsOperator { identity } => Reply::Flag(engine.is_operator(&identity)),
        Command::Balance => Reply::Amount(engine.balance(caller)?),
        Command::Withdraw => Reply::Withdrawal(engine.withdraw(caller)?),
    };
    Ok(reply)
}
