//! relay-receiver entry point.
//!
//! Wires the receive loop, dispatcher and actuation actor together, then
//! waits for `Ctrl-C`.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  ├─ load relay-receiver.toml, apply CLI overrides
//!  ├─ spawn_actuation_actor()      -- dedicated thread, optional priority boost
//!  ├─ bind_receiver()              -- UDP socket, 500 ms read timeout
//!  └─ run_receive_loop()           -- blocking thread
//!       ├─ MouseMove                -> MotionWriter (accumulate + wake)
//!       └─ MouseButton / Key / Wheel -> PlatformInputEmulator
//! ```
//!
//! Shutdown: `Ctrl-C` clears the `running` flag; the receive loop notices on
//! its next read timeout and returns, dropping the dispatcher.  That closes
//! the actuation mailbox and the actor thread exits.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use relay_receiver::application::actuate_motion::{
    spawn_actuation_actor, Actuator, DesktopGeometry, MotionAccumulator, MotionWriter,
};
use relay_receiver::application::dispatch_event::EventDispatcher;
use relay_receiver::application::inject_input::PlatformInputEmulator;
use relay_receiver::infrastructure::{
    input_emulation::dry_run::DryRunEmulator,
    network::{bind_receiver, run_receive_loop},
    priority,
    screen_info::dry_run::DryRunDesktop,
    storage::config::{config_file_path, load_config, ReceiverConfig},
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Input relay receiver: replays keyboard and mouse events sent by
/// `relay-sender` on this machine.
///
/// Values given here override `relay-receiver.toml`, which overrides the
/// built-in defaults.
#[derive(Debug, Parser)]
#[command(name = "relay-receiver", version)]
struct Cli {
    /// UDP port to listen on [default: 7777].
    #[arg(long, env = "RELAY_PORT")]
    port: Option<u16>,

    /// Address to bind [default: 0.0.0.0].
    #[arg(long, env = "RELAY_BIND")]
    bind: Option<IpAddr>,

    /// Path to the config file [default: platform config dir].
    #[arg(long, env = "RELAY_RECEIVER_CONFIG")]
    config: Option<PathBuf>,

    /// Length of the stickiness window in milliseconds [default: 10].
    #[arg(long)]
    window_ms: Option<u64>,

    /// Absolute moves issued per assertion [default: 2].
    #[arg(long)]
    injections_per_assert: Option<u8>,

    /// Decode and log events without injecting them.
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut ReceiverConfig) {
        if let Some(port) = self.port {
            config.network.port = port;
        }
        if let Some(bind) = self.bind {
            config.network.bind_address = bind;
        }
        if let Some(ms) = self.window_ms {
            config.actuation.stickiness_window_ms = ms;
        }
        if let Some(n) = self.injections_per_assert {
            config.actuation.injections_per_assert = n;
        }
    }
}

type Adapters = (Arc<dyn PlatformInputEmulator>, Arc<dyn DesktopGeometry>);

fn dry_run_adapters() -> Adapters {
    (Arc::new(DryRunEmulator), Arc::new(DryRunDesktop::default()))
}

#[cfg(target_os = "windows")]
fn platform_adapters(dry_run: bool) -> Adapters {
    use relay_receiver::infrastructure::{
        input_emulation::windows::WindowsInputEmulator, screen_info::windows::WindowsDesktop,
    };

    if dry_run {
        return dry_run_adapters();
    }
    (
        Arc::new(WindowsInputEmulator::new()),
        Arc::new(WindowsDesktop::new()),
    )
}

#[cfg(not(target_os = "windows"))]
fn platform_adapters(dry_run: bool) -> Adapters {
    if !dry_run {
        warn!("no native input injector on this platform; running as --dry-run");
    }
    dry_run_adapters()
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(|| config_file_path().ok());
    let mut config = match &config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ReceiverConfig::default(),
    };
    cli.apply_overrides(&mut config);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.actuation.log_level)),
        )
        .init();

    info!("relay-receiver starting");
    if config_path.is_none() {
        warn!("no platform config directory; using built-in defaults");
    }

    // ── Actuation actor ───────────────────────────────────────────────────────
    let (emulator, geometry) = platform_adapters(cli.dry_run);
    let accumulator = Arc::new(MotionAccumulator::new());
    let stickiness = config.actuation.stickiness();
    info!(
        window_ms = stickiness.window.as_millis() as u64,
        injections_per_assert = stickiness.injections_per_assert,
        "actuation tuning"
    );
    let actuator = Actuator::new(
        Arc::clone(&accumulator),
        Arc::clone(&emulator),
        geometry,
        stickiness,
    );
    let boost = config.actuation.boost_thread_priority;
    let (wake, actor) = spawn_actuation_actor(actuator, move || {
        if boost {
            priority::boost_current_thread();
        }
    })
    .context("failed to spawn actuation actor")?;

    let dispatcher = EventDispatcher::new(MotionWriter::new(accumulator, Arc::new(wake)), emulator);

    // ── Receive endpoint ──────────────────────────────────────────────────────
    let addr = SocketAddr::new(config.network.bind_address, config.network.port);
    let socket = bind_receiver(addr).with_context(|| format!("cannot listen on {addr}"))?;

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            running_clone.store(false, Ordering::Relaxed);
        }
    });

    // ── Receive loop ──────────────────────────────────────────────────────────
    let stats = tokio::task::spawn_blocking(move || {
        run_receive_loop(&socket, &dispatcher, &running)
    })
    .await
    .context("receive loop panicked")?;

    actor
        .join()
        .map_err(|_| anyhow::anyhow!("actuation actor panicked"))?;

    info!(
        received = stats.received,
        dropped = stats.dropped,
        "relay-receiver stopped"
    );
    Ok(())
}
