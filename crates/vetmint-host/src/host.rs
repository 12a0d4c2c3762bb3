//! The single-writer host: one engine, one database connection, one bus.
//!
//! Lines are applied strictly one after another. A successful mutating
//! command is persisted (snapshot plus its notifications, atomically) before
//! its notifications are broadcast and its response is written.

use rusqlite::Connection;
use tracing::{debug, info, warn};
use vetmint_db::queries::{notifications, state};
use vetmint_engine::{Engine, ErrorKind};

use crate::commands::{self, Request, Response};
use crate::config::HostConfig;
use crate::events::{Event, EventBus};

/// Host-wide state.
pub struct Host {
    engine: Engine,
    db: Connection,
    event_bus: EventBus,
}

impl Host {
    /// Restore the engine from `db`, or bootstrap it from `config` when the
    /// database holds no state yet.
    pub fn open(
        mut db: Connection,
        config: &HostConfig,
        event_bus: EventBus,
        now: u64,
    ) -> anyhow::Result<Self> {
        let engine = match state::load(&db)? {
            Some(snapshot) => {
                let journaled = notifications::last_sequence(&db)?;
                if journaled != snapshot.last_sequence {
                    warn!(
                        journaled,
                        snapshot = snapshot.last_sequence,
                        "notification journal out of step with snapshot"
                    );
                }
                if config.genesis.operator.is_some_and(|op| op != snapshot.operator) {
                    warn!(
                        stored = %snapshot.operator,
                        "configured genesis operator differs from stored state; keeping stored"
                    );
                }
                Engine::restore(snapshot)?
            }
            None => {
                let genesis = config.genesis.to_genesis(now)?;
                let mut engine = Engine::new(config.settings.clone(), genesis)?;
                let events = engine.drain_notifications();
                state::persist(&mut db, &engine.snapshot(), &events, now)?;
                info!(operator = %engine.operator(), "engine bootstrapped");
                engine
            }
        };
        Ok(Self {
            engine,
            db,
            event_bus,
        })
    }

    /// Apply one input line and produce its response.
    ///
    /// Rejections become failure responses. Only a persistence failure is
    /// returned as an error.
    pub fn handle_line(&mut self, line: &str, now: u64) -> anyhow::Result<Response> {
        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "malformed request");
                return Ok(Response::failure(
                    ErrorKind::InvalidInput,
                    format!("malformed request: {e}"),
                ));
            }
        };

        let caller = request.caller;
        let mutating = request.command.is_mutating();
        let reply = match commands::execute(&mut self.engine, &caller, request.command, now) {
            Ok(reply) => reply,
            Err(e) => {
                debug!(
                    %caller,
                    role = self.engine.role_of(&caller).as_str(),
                    kind = e.kind().as_str(),
                    error = %e,
                    "operation rejected"
                );
                return Ok(Response::failure(e.kind(), e.to_string()));
            }
        };

        if mutating {
            let events = self.engine.drain_notifications();
            state::persist(&mut self.db, &self.engine.snapshot(), &events, now)?;
            for event in events {
                self.event_bus.emit(Event::committed(event, now));
            }
        }
        Ok(Response::success(reply))
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetmint_types::CallerId;

    const ADMIN: &str = "0x0101010101010101010101010101010101010101";
    const ALICE: &str = "0x0202020202020202020202020202020202020202";
    const T0: u64 = 1_677_672_000;

    fn config() -> HostConfig {
        let mut config = HostConfig::default();
        config.genesis.operator = Some(ADMIN.parse().expect("admin id"));
        config.settings.registration_enabled = true;
        config
    }

    fn host(bus: &EventBus) -> Host {
        let db = vetmint_db::open_memory().expect("open db");
        Host::open(db, &config(), bus.clone(), T0).expect("bootstrap")
    }

    #[test]
    fn test_bootstrap_persists_genesis() {
        let bus = EventBus::new(16);
        let host = host(&bus);
        let stored = state::load(&host.db).expect("load").expect("present");
        assert_eq!(stored.members.len(), 1);
        assert_eq!(stored.last_sequence, 1);
        assert_eq!(notifications::last_sequence(&host.db).expect("last"), 1);
    }

    #[test]
    fn test_bootstrap_requires_operator() {
        let db = vetmint_db::open_memory().expect("open db");
        assert!(Host::open(db, &HostConfig::default(), EventBus::new(4), T0).is_err());
    }

    #[test]
    fn test_success_persists_and_broadcasts() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let mut host = host(&bus);

        let response = host
            .handle_line(
                &format!(r#"{{"caller":"{ALICE}","op":"register","name":"alice"}}"#),
                T0 + 10,
            )
            .expect("handle");
        assert!(response.ok);

        let event = rx.try_recv().expect("broadcast");
        assert_eq!(event.sequence, 2);
        assert_eq!(event.timestamp, T0 + 10);

        let stored = state::load(&host.db).expect("load").expect("present");
        assert_eq!(stored.members.len(), 2);
        assert_eq!(notifications::last_sequence(&host.db).expect("last"), 2);
    }

    #[test]
    fn test_rejection_changes_nothing() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let mut host = host(&bus);

        let response = host
            .handle_line(
                &format!(r#"{{"caller":"{ALICE}","op":"register","name":"admin"}}"#),
                T0,
            )
            .expect("handle");
        assert!(!response.ok);
        assert_eq!(response.kind, Some(ErrorKind::DuplicateName));
        assert!(rx.try_recv().is_err());
        assert_eq!(host.engine().count_all(), 1);
    }

    #[test]
    fn test_malformed_line() {
        let bus = EventBus::new(4);
        let mut host = host(&bus);
        let response = host.handle_line("{not json", T0).expect("handle");
        assert_eq!(response.kind, Some(ErrorKind::InvalidInput));
    }

    #[test]
    fn test_restart_restores_state() {
        let dir = std::env::temp_dir().join(format!("vetmint-host-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("mkdir");
        let path = dir.join(vetmint_db::DB_FILE_NAME);
        let _ = std::fs::remove_file(&path);

        {
            let db = vetmint_db::open(&path).expect("open");
            let mut host = Host::open(db, &config(), EventBus::new(4), T0)
                .expect("bootstrap");
            host.handle_line(
                &format!(r#"{{"caller":"{ALICE}","op":"register","name":"alice"}}"#),
                T0,
            )
            .expect("handle");
        }

        let db = vetmint_db::open(&path).expect("reopen");
        let host = Host::open(db, &config(), EventBus::new(4), T0 + 99)
            .expect("restore");
        let alice: CallerId = ALICE.parse().expect("alice id");
        assert!(host.engine().name_exists("alice"));
        assert_eq!(host.engine().count_all(), 2);
        assert_eq!(host.engine().last_sequence(), 2);
        assert!(!host.engine().is_operator(&alice));

        drop(host);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
