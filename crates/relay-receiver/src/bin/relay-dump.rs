//! relay-dump: print every datagram arriving on the relay port.
//!
//! A diagnostic companion to `relay-receiver`.  It decodes and prints each
//! packet but never injects anything, so it can run on any platform to check
//! what a sender is emitting.
//!
//! ```text
//! [#1] From 192.168.1.20:51234 - Type: MOUSE_MOVE - Delta: (4, -1)
//! [#2] From 192.168.1.20:51234 - Type: KEYBOARD - Key: A (65) DOWN
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};

use anyhow::Context;
use clap::Parser;
use relay_core::DEFAULT_PORT;
use relay_receiver::application::describe_packet::describe_datagram;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "relay-dump",
    about = "Print input-relay datagrams without injecting them",
    version
)]
struct Cli {
    /// UDP port to listen on.
    #[arg(long, default_value_t = DEFAULT_PORT, env = "RELAY_PORT")]
    port: u16,

    /// Address to bind.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED), env = "RELAY_BIND")]
    bind: IpAddr,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let addr = SocketAddr::new(cli.bind, cli.port);
    let socket =
        UdpSocket::bind(addr).with_context(|| format!("failed to bind UDP socket on {addr}"))?;
    info!("listening on UDP {addr}; press Ctrl-C to stop");

    let mut buf = [0u8; 2048];
    let mut count: u64 = 0;
    loop {
        let (len, src) = match socket.recv_from(&mut buf) {
            Ok(pair) => pair,
            Err(e) => {
                warn!("receive error: {e}");
                continue;
            }
        };
        count += 1;
        println!("[#{count}] From {src} - {}", describe_datagram(&buf[..len]));
    }
}
