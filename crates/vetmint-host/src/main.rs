//! vetmint: host process for the membership registry and issuance ledger.
//!
//! Single OS process running a Tokio runtime. Commands arrive as JSON lines
//! on stdin and are applied one at a time; each yields one JSON line on
//! stdout. Logs go to stderr.

mod commands;
mod config;
mod events;
mod host;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::HostConfig;
use crate::events::EventBus;
use crate::host::Host;

/// Buffered events per subscriber.
const EVENT_BUFFER: usize = 1000;

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = HostConfig::load()?;

    // 2. Initialize tracing; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("vetmint host starting");

    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)?;

    // 3. Open database
    let db_path = data_dir.join(vetmint_db::DB_FILE_NAME);
    let db = vetmint_db::open(&db_path)?;
    info!("Database at {:?}", db_path);

    // 4. Create event bus and its log subscriber
    let event_bus = EventBus::new(EVENT_BUFFER);
    let mut event_rx = event_bus.subscribe();
    tokio::spawn(async move {
        loop {
            match event_rx.recv().await {
                Ok(event) => info!(
                    sequence = event.sequence,
                    event_type = event.notification.event_type().as_str(),
                    "notification"
                ),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event log subscriber lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // 5. Restore or bootstrap the engine
    let mut host = Host::open(db, &config, event_bus.clone(), now_secs())?;
    info!(
        operator = %host.engine().operator(),
        members = host.engine().count_all(),
        live_supply = host.engine().live_supply(),
        "engine ready"
    );

    // 6. Apply commands until EOF or Ctrl-C
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let response = host.handle_line(&line, now_secs())?;
                let mut response_json = serde_json::to_string(&response)?;
                response_json.push('\n');
                stdout.write_all(response_json.as_bytes()).await?;
                stdout.flush().await?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C received, shutting down");
                break;
            }
        }
    }

    info!(events = event_bus.emitted(), "vetmint host stopped");
    Ok(())
}
