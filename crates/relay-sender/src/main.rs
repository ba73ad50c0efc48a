//! relay-sender entry point.
//!
//! Resolves the target, opens the datagram sink, starts the capture thread and
//! waits for `Ctrl-C`.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  ├─ load relay-sender.toml, apply CLI overrides
//!  ├─ UdpEventSink::connect()      -- ephemeral socket connected to TARGET
//!  └─ spawn_capture_thread()       -- message-only window + hooks
//!       ├─ WH_KEYBOARD_LL          -> CaptureSession::on_key
//!       ├─ WM_INPUT                -> CaptureSession::on_raw_mouse
//!       └─ WM_HOTKEY / toggle      -> CaptureSession::toggle
//! ```
//!
//! Shutdown: `Ctrl-C` posts `WM_QUIT` to the capture thread, which forces the
//! session to Idle, unregisters the hotkey and removes its hooks.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use relay_sender::infrastructure::{
    network::{resolve_target, UdpEventSink},
    storage::config::{config_file_path, load_config, SenderConfig},
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Input relay sender: forwards this machine's keyboard and mouse to a
/// `relay-receiver` while capture is toggled on.
///
/// Values given here override `relay-sender.toml`, which overrides the
/// built-in defaults.
#[derive(Debug, Parser)]
#[command(name = "relay-sender", version)]
struct Cli {
    /// Target host running relay-receiver (IP address or host name).
    #[arg(env = "RELAY_TARGET")]
    target: String,

    /// Capture toggle hotkey, e.g. "CTRL+SHIFT+K" [default: ALT+1].
    #[arg(long, env = "RELAY_HOTKEY")]
    hotkey: Option<String>,

    /// Target UDP port [default: 7777].
    #[arg(long, env = "RELAY_PORT")]
    port: Option<u16>,

    /// Path to the config file [default: platform config dir].
    #[arg(long, env = "RELAY_SENDER_CONFIG")]
    config: Option<PathBuf>,

    /// Leave the local cursor free while capture is active.
    #[arg(long)]
    no_pin_cursor: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut SenderConfig) {
        if let Some(port) = self.port {
            config.network.port = port;
        }
        if self.no_pin_cursor {
            config.capture.pin_cursor = false;
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(|| config_file_path().ok());
    let mut config = match &config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SenderConfig::default(),
    };
    cli.apply_overrides(&mut config);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.capture.log_level)),
        )
        .init();

    info!("relay-sender starting");
    if config_path.is_none() {
        warn!("no platform config directory; using built-in defaults");
    }

    let binding = config
        .capture
        .resolve_hotkey(cli.hotkey.as_deref())
        .context("invalid --hotkey")?;

    let target = resolve_target(&cli.target, config.network.port)?;
    let sink = UdpEventSink::connect(target)?;

    run_capture(binding, config.capture.pin_cursor, sink).await?;

    info!("relay-sender stopped");
    Ok(())
}

#[cfg(target_os = "windows")]
async fn run_capture(
    binding: relay_core::HotkeyBinding,
    pin_cursor: bool,
    sink: UdpEventSink,
) -> anyhow::Result<()> {
    use relay_sender::infrastructure::input_capture::windows::{
        request_quit, spawn_capture_thread,
    };

    let (ready, capture) = spawn_capture_thread(binding, pin_cursor, sink)
        .context("failed to spawn capture thread")?;

    let thread_id = ready
        .await
        .context("capture thread exited during start-up")?
        .context("capture start-up failed")?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    info!("shutdown signal received");
    request_quit(thread_id);

    tokio::task::spawn_blocking(move || capture.join())
        .await
        .context("capture join task failed")?
        .map_err(|_| anyhow::anyhow!("capture thread panicked"))
}

#[cfg(not(target_os = "windows"))]
async fn run_capture(
    _binding: relay_core::HotkeyBinding,
    _pin_cursor: bool,
    _sink: UdpEventSink,
) -> anyhow::Result<()> {
    anyhow::bail!("input capture is only implemented for Windows")
}
