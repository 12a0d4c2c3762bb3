//! Per-day member sequences.
//!
//! Each bucket is an append-only list of member indices that registered on the
//! same UTC day. Bucket keys are remembered in the order they were first seen,
//! which is also the order of the first member in each bucket.

use std::collections::HashMap;

use vetmint_types::{DateKey, MemberIndex};

/// Secondary index of members by registration day.
#[derive(Debug, Clone, Default)]
pub struct DateIndex {
    buckets: HashMap<DateKey, Vec<MemberIndex>>,
    keys: Vec<DateKey>,
}

impl DateIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// The 1-based position the next member of `key` would receive.
    pub fn next_position(&self, key: DateKey) -> u64 {
        self.count(key) + 1
    }

    /// Append a member to its bucket and return its 1-based position.
    pub fn append(&mut self, key: DateKey, member_index: MemberIndex) -> u64 {
        if !self.buckets.contains_key(&key) {
            tracing::debug!(date = %key, "opening date bucket");
            self.keys.push(key);
        }
        let bucket = self.buckets.entry(key).or_default();
        bucket.push(member_index);
        bucket.len() as u64
    }

    /// Member indices of a bucket in join order. Unknown keys are empty.
    pub fn members(&self, key: DateKey) -> &[MemberIndex] {
        self.buckets.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of members in a bucket.
    pub fn count(&self, key: DateKey) -> u64 {
        self.members(key).len() as u64
    }

    /// All bucket keys in first-seen order.
    pub fn keys(&self) -> &[DateKey] {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> DateKey {
        DateKey::from_ymd(2023, 5, d).expect("valid date")
    }

    #[test]
    fn test_positions_are_per_bucket() {
        let mut index = DateIndex::new();
        assert_eq!(index.next_position(day(2)), 1);
        assert_eq!(index.append(day(2), 1), 1);
        assert_eq!(index.append(day(2), 2), 2);
        assert_eq!(index.append(day(1), 3), 1);
        assert_eq!(index.append(day(2), 4), 3);

        assert_eq!(index.members(day(2)), &[1, 2, 4]);
        assert_eq!(index.members(day(1)), &[3]);
        assert_eq!(index.count(day(2)), 3);
        assert_eq!(index.next_position(day(2)), 4);
    }

    #[test]
    fn test_keys_keep_first_seen_order() {
        let mut index = DateIndex::new();
        index.append(day(9), 1);
        index.append(day(3), 2);
        index.append(day(9), 3);
        index.append(day(5), 4);
        assert_eq!(index.keys(), &[day(9), day(3), day(5)]);
    }

    #[test]
    fn test_unknown_bucket_is_empty() {
        let index = DateIndex::new();
        assert!(index.members(day(1)).is_empty());
        assert_eq!(index.count(day(1)), 0);
        assert!(index.keys().is_empty());
    }
}
