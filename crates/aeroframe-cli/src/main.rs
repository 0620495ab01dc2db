//! `aeroframe` – transform relay for a flying sensor platform.
//!
//! Startup sequence:
//!
//! 1. Initialise structured logging (`RUST_LOG` filter, `info` default;
//!    `AEROFRAME_LOG_FORMAT=json` for newline-delimited JSON).
//! 2. Load and validate configuration; malformed config refuses to start
//!    before anything is published.
//! 3. Publish the two static edges, once.
//! 4. Spawn every relay node on a single-threaded runtime and dispatch
//!    until Ctrl-C.

mod config;

use std::process::ExitCode;

use tokio::sync::watch;
use tracing::{error, info, warn};

use aeroframe_middleware::{EventBus, RelayNode, TfBroadcaster};
use aeroframe_nodes::{CloudRelay, DetectionRelay, ImageRelay, PoseRelay, StaticFramePublisher};

// One message per incoming handler invocation; no batching anywhere, so a
// modest buffer per lane is plenty even under bursty input.
const BUS_CAPACITY: usize = 256;

fn init_tracing() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("AEROFRAME_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    // ── Configuration: fatal before the first publication ─────────────────
    let cfg = match config::load() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!(%err, "configuration unreadable");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = cfg.validate() {
        error!(%err, "configuration rejected; refusing to publish");
        return ExitCode::FAILURE;
    }
    info!(
        sensor = %cfg.frames.sensor,
        body = %cfg.frames.body,
        world = %cfg.frames.world_final,
        "configuration loaded"
    );

    let bus = EventBus::new(BUS_CAPACITY);
    let broadcaster = TfBroadcaster::new(bus.clone());

    // ── Static skeleton, once, before any dynamic handler runs ────────────
    StaticFramePublisher::new(&cfg).publish(&broadcaster);
    info!("static frame skeleton published");

    // ── Shutdown signal ───────────────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    if let Err(err) = ctrlc::set_handler(move || {
        let _ = shutdown_tx.send(true);
    }) {
        warn!(%err, "failed to install Ctrl-C handler; stop with SIGKILL");
    }

    // ── Relay nodes ───────────────────────────────────────────────────────
    let nodes: Vec<Box<dyn RelayNode>> = vec![
        Box::new(PoseRelay::new(&cfg)),
        Box::new(CloudRelay::new(&cfg)),
        Box::new(ImageRelay::new(&cfg)),
        Box::new(DetectionRelay::new(&cfg)),
    ];

    let mut tasks = Vec::with_capacity(nodes.len());
    for node in nodes {
        info!(node = node.name(), "starting");
        tasks.push(tokio::spawn(node.run(bus.clone(), shutdown_rx.clone())));
    }

    for task in tasks {
        if let Err(err) = task.await {
            warn!(%err, "relay task ended abnormally");
        }
    }

    info!("aeroframe stopped");
    ExitCode::SUCCESS
}
