//! Notifications emitted by committed operations.
//!
//! A notification is staged only after its operation has fully succeeded, so
//! a rejected operation never produces one.

use serde::{Deserialize, Serialize};

/// Observable outcome of a successful operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum Notification {
    RegistrationCompleted {
        name: String,
    },
    BatchMinted {
        uris: Vec<String>,
    },
    AssetBurned {
        uri: String,
    },
    NameUpdated {
        old_name: String,
        new_name: String,
    },
}

/// Notification discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    RegistrationCompleted,
    BatchMinted,
    AssetBurned,
    NameUpdated,
}

impl EventType {
    /// Stable snake_case name, matching the serde tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::RegistrationCompleted => "registration_completed",
            EventType::BatchMinted => "batch_minted",
            EventType::AssetBurned => "asset_burned",
            EventType::NameUpdated => "name_updated",
        }
    }
}

impl Notification {
    /// The discriminant of this notification.
    pub fn event_type(&self) -> EventType {
        match self {
            Notification::RegistrationCompleted { .. } => EventType::RegistrationCompleted,
            Notification::BatchMinted { .. } => EventType::BatchMinted,
            Notification::AssetBurned { .. } => EventType::AssetBurned,
            Notification::NameUpdated { .. } => EventType::NameUpdated,
        }
    }
}

/// A notification with its position in the engine's emission order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// 1-based, gap-free across the lifetime of an engine.
    pub sequence: u64,
    pub notification: Notification,
}
