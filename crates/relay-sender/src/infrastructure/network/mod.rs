//! Datagram sink: ships each captured event to the target as one UDP packet.
//!
//! The socket is bound to an ephemeral local port and `connect`ed to the
//! target, so every send is a single non-blocking `send` call.  Nothing is
//! acknowledged or retried; a failed send loses that one event.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use relay_core::{encode_event, InputEvent};
use thiserror::Error;
use tracing::{info, trace, warn};

use crate::application::capture_session::EventSink;

/// Error type for setting up the datagram sink.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The target host name did not resolve to any address.
    #[error("cannot resolve target '{target}': {source}")]
    Resolve {
        target: String,
        #[source]
        source: io::Error,
    },

    /// The local ephemeral socket could not be bound.
    #[error("failed to bind local socket: {0}")]
    Bind(#[source] io::Error),

    #[error("failed to connect socket to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to configure socket: {0}")]
    Configure(#[source] io::Error),
}

/// Resolves `host` (an IP literal or a host name) and `port` to the first
/// matching socket address.
///
/// # Errors
///
/// Returns [`TransportError::Resolve`] if resolution fails or yields nothing.
pub fn resolve_target(host: &str, port: u16) -> Result<SocketAddr, TransportError> {
    let resolve_err = |source| TransportError::Resolve {
        target: host.to_string(),
        source,
    };
    (host, port)
        .to_socket_addrs()
        .map_err(resolve_err)?
        .next()
        .ok_or_else(|| resolve_err(io::Error::new(io::ErrorKind::NotFound, "no addresses")))
}

/// UDP implementation of [`EventSink`].
#[derive(Debug)]
pub struct UdpEventSink {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpEventSink {
    /// Binds an ephemeral socket of the target's address family and connects
    /// it to `target`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the socket cannot be set up.
    pub fn connect(target: SocketAddr) -> Result<Self, TransportError> {
        let local = match target.ip() {
            IpAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            IpAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        };
        let socket = UdpSocket::bind(local).map_err(TransportError::Bind)?;
        socket
            .connect(target)
            .map_err(|source| TransportError::Connect { addr: target, source })?;
        socket
            .set_nonblocking(true)
            .map_err(TransportError::Configure)?;

        info!("sending events to {target}");
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl EventSink for UdpEventSink {
    fn send(&self, event: &InputEvent) {
        let packet = encode_event(event);
        match self.socket.send(&packet) {
            Ok(_) => trace!(?event, "sent"),
            Err(e) => warn!("dropped {} event: {e}", event.kind().name()),
        }
    }
}
