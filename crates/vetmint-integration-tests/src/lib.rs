//! Integration test crate for vetmint.
//!
//! The scenarios under `tests/` drive the engine through its public surface
//! and check the cross-crate invariants: registry indices, supply
//! accounting, atomic rejection and persistence round-trips.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p vetmint-integration-tests
//! ```

use vetmint_engine::{Engine, Genesis, Settings};
use vetmint_types::{Amount, CallerId};

/// 2023-03-01T12:00:00Z.
pub const T0: u64 = 1_677_672_000;

/// Seconds per day.
pub const DAY: u64 = 24 * 60 * 60;

/// Default unit price.
pub const PRICE: Amount = vetmint_types::DEFAULT_UNIT_PRICE;

/// The genesis operator used by every scenario.
pub const OPERATOR: CallerId = CallerId::from_bytes([0xA0; 20]);

/// Deterministic member identity `n` (never equal to [`OPERATOR`] for n < 0xA0).
pub fn identity(n: u8) -> CallerId {
    let mut bytes = [0u8; 20];
    bytes[19] = n;
    CallerId::from_bytes(bytes)
}

/// `ipfs://<name>` uris.
pub fn uris(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| format!("ipfs://{n}")).collect()
}

/// An engine with registration and issuance open, genesis at [`T0`].
pub fn open_engine() -> Engine {
    let settings = Settings {
        registration_enabled: true,
        issuance_enabled: true,
        ..Settings::default()
    };
    Engine::new(
        settings,
        Genesis {
            operator: OPERATOR,
            name: "admin".to_string(),
            avatar_id: 1,
            joined_at: T0,
        },
    )
    .expect("fixed genesis is valid")
}
