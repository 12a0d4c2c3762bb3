//! Caller identities and date bucket keys.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde_with::{DeserializeFromStr, SerializeDisplay};

/// Length of a caller identity in bytes.
pub const CALLER_ID_LEN: usize = 20;

/// Authenticated identity of the party submitting an operation.
///
/// Rendered as `0x`-prefixed lowercase hex, like an account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, SerializeDisplay, DeserializeFromStr)]
pub struct CallerId([u8; CALLER_ID_LEN]);

/// Failure to parse a [`CallerId`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCallerIdError {
    /// Not valid hex.
    #[error("invalid hex in caller id: {0}")]
    InvalidHex(String),

    /// Decoded to the wrong number of bytes.
    #[error("caller id must be {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Decoded length.
        actual: usize,
    },
}

impl CallerId {
    /// Wrap raw identity bytes.
    pub const fn from_bytes(bytes: [u8; CALLER_ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallerId({self})")
    }
}

impl FromStr for CallerId {
    type Err = ParseCallerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|e| ParseCallerIdError::InvalidHex(e.to_string()))?;
        let actual = bytes.len();
        let bytes: [u8; CALLER_ID_LEN] =
            bytes.try_into().map_err(|_| ParseCallerIdError::InvalidLength {
                expected: CALLER_ID_LEN,
                actual,
            })?;
        Ok(Self(bytes))
    }
}

/// UTC calendar day used to bucket members by registration date.
///
/// Rendered as `YYYY-MM-DD`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, SerializeDisplay, DeserializeFromStr)]
pub struct DateKey(NaiveDate);

/// Failure to parse a [`DateKey`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date key {input:?}: {reason}")]
pub struct ParseDateKeyError {
    /// Rejected input.
    pub input: String,
    /// Parser message.
    pub reason: String,
}

impl DateKey {
    /// Calendar day (UTC) containing the given unix timestamp in seconds.
    ///
    /// Returns `None` if the timestamp is outside the representable range.
    pub fn from_timestamp(secs: u64) -> Option<Self> {
        let secs = i64::try_from(secs).ok()?;
        DateTime::from_timestamp(secs, 0).map(|dt| Self(dt.date_naive()))
    }

    /// Build a key from a year, month and day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl fmt::Debug for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DateKey({self})")
    }
}

impl FromStr for DateKey {
    type Err = ParseDateKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|e| ParseDateKeyError {
                input: s.to_string(),
                reason: e.to_string(),
            })
    }
}
