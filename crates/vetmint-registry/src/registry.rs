//! The member arena and the approval workflow transitions.

use std::collections::HashMap;

use vetmint_types::{CallerId, DateKey, Member, MemberIndex, UNDER_REVIEW_REASON};

use crate::date_index::DateIndex;
use crate::{page, validate, RegistryError, Result};

/// Registry of all members.
///
/// `members[i]` holds the member with `member_index == i + 1`.
#[derive(Debug, Clone, Default)]
pub struct UserRegistry {
    members: Vec<Member>,
    by_identity: HashMap<CallerId, usize>,
    by_name: HashMap<String, usize>,
    dates: DateIndex,
}

impl UserRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry (and all of its indices) from member records in
    /// `member_index` order.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Inconsistent`] if the records have index gaps,
    ///   repeated identities or names, or date positions out of sequence
    pub fn from_members(members: Vec<Member>) -> Result<Self> {
        let mut registry = Self::new();
        for member in members {
            let slot = registry.members.len();
            let expected = slot as MemberIndex + 1;
            if member.member_index != expected {
                return Err(RegistryError::Inconsistent(format!(
                    "expected member index {expected}, found {}",
                    member.member_index
                )));
            }
            if registry.by_identity.contains_key(&member.identity) {
                return Err(RegistryError::Inconsistent(format!(
                    "identity {} registered twice",
                    member.identity
                )));
            }
            if registry.by_name.contains_key(&member.display_name) {
                return Err(RegistryError::Inconsistent(format!(
                    "name {:?} held twice",
                    member.display_name
                )));
            }
            if DateKey::from_timestamp(member.joined_at) != Some(member.date_bucket) {
                return Err(RegistryError::Inconsistent(format!(
                    "member {expected} joined at {} outside bucket {}",
                    member.joined_at, member.date_bucket
                )));
            }
            let position = registry.dates.next_position(member.date_bucket);
            if member.date_index != position {
                return Err(RegistryError::Inconsistent(format!(
                    "member {expected} has date index {}, expected {position}",
                    member.date_index
                )));
            }
            registry.dates.append(member.date_bucket, expected);
            registry.by_identity.insert(member.identity, slot);
            registry.by_name.insert(member.display_name.clone(), slot);
            registry.members.push(member);
        }
        Ok(registry)
    }

    /// Register a new member.
    ///
    /// The very first member becomes validator and approved with no block
    /// reason. Every later member starts unapproved and under review.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::AlreadyRegistered`] if `identity` has a record
    /// - [`RegistryError::NameTooShort`] / [`RegistryError::NameTooLong`]
    /// - [`RegistryError::DuplicateName`] if any member holds `name`
    /// - [`RegistryError::InvalidTimestamp`] if `joined_at` has no calendar day
    pub fn register(
        &mut self,
        identity: CallerId,
        name: &str,
        avatar_id: u32,
        joined_at: u64,
    ) -> Result<&Member> {
        if self.contains(&identity) {
            return Err(RegistryError::AlreadyRegistered);
        }
        validate::display_name(name)?;
        if self.by_name.contains_key(name) {
            return Err(RegistryError::DuplicateName);
        }
        let date_bucket = DateKey::from_timestamp(joined_at)
            .ok_or(RegistryError::InvalidTimestamp(joined_at))?;

        let first = self.members.is_empty();
        let slot = self.members.len();
        let member_index = slot as MemberIndex + 1;
        let date_index = self.dates.append(date_bucket, member_index);

        self.members.push(Member {
            member_index,
            date_bucket,
            date_index,
            display_name: name.to_string(),
            avatar_id,
            identity,
            is_validator: first,
            is_approved: first,
            block_reason: if first {
                String::new()
            } else {
                UNDER_REVIEW_REASON.to_string()
            },
            revoke_reason: String::new(),
            joined_at,
        });
        self.by_identity.insert(identity, slot);
        self.by_name.insert(name.to_string(), slot);

        Ok(&self.members[slot])
    }

    /// Approve a member and clear its block reason. Re-approving is a no-op.
    pub fn approve(&mut self, target: &CallerId) -> Result<&Member> {
        let slot = self.slot(target)?;
        let member = &mut self.members[slot];
        member.is_approved = true;
        member.block_reason.clear();
        Ok(member)
    }

    /// Grant validator standing (which implies approval).
    pub fn add_validator(&mut self, target: &CallerId) -> Result<&Member> {
        let slot = self.slot(target)?;
        let member = &mut self.members[slot];
        member.is_validator = true;
        member.is_approved = true;
        member.block_reason.clear();
        Ok(member)
    }

    /// Remove validator standing, keeping the member's approval.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::ReasonTooShort`] / [`RegistryError::ReasonTooLong`]
    /// - [`RegistryError::MemberNotFound`] if `target` has no record
    pub fn revoke_validator(&mut self, target: &CallerId, reason: &str) -> Result<&Member> {
        validate::reason(reason)?;
        let slot = self.slot(target)?;
        let member = &mut self.members[slot];
        member.is_validator = false;
        member.block_reason.clear();
        member.revoke_reason = reason.to_string();
        Ok(member)
    }

    /// Block a member: drops approval and validator standing.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::ReasonTooShort`] / [`RegistryError::ReasonTooLong`]
    /// - [`RegistryError::MemberNotFound`] if `target` has no record
    pub fn block(&mut self, target: &CallerId, reason: &str) -> Result<&Member> {
        validate::reason(reason)?;
        let slot = self.slot(target)?;
        let member = &mut self.members[slot];
        member.is_approved = false;
        member.is_validator = false;
        member.block_reason = reason.to_string();
        member.revoke_reason = reason.to_string();
        Ok(member)
    }

    /// Change a member's display name, freeing the old one.
    ///
    /// Returns the previous name.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::MemberNotFound`] if `identity` has no record
    /// - [`RegistryError::NameTooShort`] / [`RegistryError::NameTooLong`]
    /// - [`RegistryError::DuplicateName`] if any member, the caller included,
    ///   holds `new_name`
    pub fn rename(&mut self, identity: &CallerId, new_name: &str) -> Result<String> {
        let slot = self.slot(identity)?;
        validate::display_name(new_name)?;
        if self.by_name.contains_key(new_name) {
            return Err(RegistryError::DuplicateName);
        }
        let old_name = std::mem::replace(
            &mut self.members[slot].display_name,
            new_name.to_string(),
        );
        self.by_name.remove(&old_name);
        self.by_name.insert(new_name.to_string(), slot);
        Ok(old_name)
    }

    /// Member record of an identity.
    pub fn get(&self, identity: &CallerId) -> Option<&Member> {
        self.by_identity.get(identity).map(|&slot| &self.members[slot])
    }

    /// Member record holding a display name (exact, case-sensitive).
    pub fn get_by_name(&self, name: &str) -> Option<&Member> {
        self.by_name.get(name).map(|&slot| &self.members[slot])
    }

    /// Member record by its 1-based global index.
    pub fn get_by_index(&self, member_index: MemberIndex) -> Option<&Member> {
        let slot = usize::try_from(member_index.checked_sub(1)?).ok()?;
        self.members.get(slot)
    }

    /// Whether any member holds `name`.
    pub fn name_exists(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Whether `identity` has a member record.
    pub fn contains(&self, identity: &CallerId) -> bool {
        self.by_identity.contains_key(identity)
    }

    /// One page of members in ascending `member_index` order.
    pub fn page(&self, page_index: u64, page_size: u64) -> Result<Vec<Member>> {
        let range = page::bounds(self.members.len(), page_index, page_size)?;
        Ok(self.members[range].to_vec())
    }

    /// One page of a date bucket in ascending `date_index` order.
    pub fn page_by_date(
        &self,
        key: DateKey,
        page_index: u64,
        page_size: u64,
    ) -> Result<Vec<Member>> {
        let indices = self.dates.members(key);
        let range = page::bounds(indices.len(), page_index, page_size)?;
        Ok(indices[range]
            .iter()
            .filter_map(|&index| self.get_by_index(index))
            .cloned()
            .collect())
    }

    /// Total number of members.
    pub fn count(&self) -> u64 {
        self.members.len() as u64
    }

    /// Number of members that joined on `key`.
    pub fn count_by_date(&self, key: DateKey) -> u64 {
        self.dates.count(key)
    }

    /// Date bucket keys in first-seen order.
    pub fn date_keys(&self) -> &[DateKey] {
        self.dates.keys()
    }

    /// All member records in `member_index` order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    fn slot(&self, identity: &CallerId) -> Result<usize> {
        self.by_identity
            .get(identity)
            .copied()
            .ok_or(RegistryError::MemberNotFound(*identity))
    }
}
