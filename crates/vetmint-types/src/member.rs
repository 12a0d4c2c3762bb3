//! Member records and caller roles.

use serde::{Deserialize, Serialize};

use crate::{CallerId, DateKey, MemberIndex};

/// A registered member.
///
/// Members are never deleted; blocking and unblocking only toggles flags and
/// reasons.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct Member {
    /// 1-based global registration sequence number.
    #[ts(type = "number")]
    pub member_index: MemberIndex,
    /// UTC calendar day of registration.
    #[ts(type = "string")]
    pub date_bucket: DateKey,
    /// 1-based position within `date_bucket`.
    #[ts(type = "number")]
    pub date_index: u64,
    pub display_name: String,
    pub avatar_id: u32,
    #[ts(type = "string")]
    pub identity: CallerId,
    pub is_validator: bool,
    pub is_approved: bool,
    /// Empty unless blocked or under review.
    pub block_reason: String,
    /// Empty unless validator standing was revoked.
    pub revoke_reason: String,
    /// Unix seconds.
    #[ts(type = "number")]
    pub joined_at: u64,
}

/// Role of a caller, as resolved for a single operation.
///
/// Variants are declared from least to most privileged.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ts_rs::TS,
)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Unregistered,
    UnapprovedMember,
    ApprovedMember,
    Validator,
    Operator,
}

impl Role {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Unregistered => "unregistered",
            Role::UnapprovedMember => "unapproved_member",
            Role::ApprovedMember => "approved_member",
            Role::Validator => "validator",
            Role::Operator => "operator",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ordering() {
        assert!(Role::Operator > Role::Validator);
        assert!(Role::Validator > Role::ApprovedMember);
        assert!(Role::ApprovedMember > Role::UnapprovedMember);
        assert!(Role::UnapprovedMember > Role::Unregistered);
    }

    #[test]
    fn test_role_serde_name() {
        let json = serde_json::to_string(&Role::ApprovedMember)
            .expect("serialize");
        assert_eq!(json, "\"approved_member\"");
        assert_eq!(Role::ApprovedMember.as_str(), "approved_member");
    }

    #[test]
    fn test_member_json_uses_text_keys() {
        let member = Member {
            member_index: 2,
            date_bucket: DateKey::from_ymd(2023, 3, 1).expect("valid"),
            date_index: 1,
            display_name: "second".to_string(),
            avatar_id: 2,
            identity: CallerId::from_bytes([2u8; 20]),
            is_validator: false,
            is_approved: false,
            block_reason: crate::UNDER_REVIEW_REASON.to_string(),
            revoke_reason: String::new(),
            joined_at: 1_677_628_800,
        };
        let value = serde_json::to_value(&member).expect("serialize");
        assert_eq!(value["identity"], format!("0x{}", "02".repeat(20)));
        assert_eq!(value["date_bucket"], "2023-03-01");
        assert_eq!(value["block_reason"], crate::UNDER_REVIEW_REASON);
    }
}
