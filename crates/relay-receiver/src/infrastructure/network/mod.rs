//! UDP receive path for the receiver.
//!
//! # Threading model
//!
//! [`run_receive_loop`] runs on its own OS thread and calls the dispatcher
//! synchronously for every datagram.  The dispatcher never blocks (motion is
//! handed to the actuation actor through atomics), so the only wait in this
//! loop is the socket read itself.
//!
//! The socket has a 500 ms read timeout.  On each timeout the loop checks the
//! `running` flag, which is how `Ctrl-C` stops it.

use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::application::dispatch_event::{DispatchOutcome, EventDispatcher};

/// How often the receive loop wakes to check the `running` flag.
pub const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Large enough that an oversized datagram arrives whole and is rejected
/// by length rather than truncated into something plausible.
const RECV_BUFFER_SIZE: usize = 2048;

/// Errors for the receive endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The UDP socket could not be bound.
    #[error("failed to bind UDP socket on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// A socket option could not be applied.
    #[error("failed to configure UDP socket: {0}")]
    Configure(#[source] std::io::Error),
}

/// Counters reported when the loop stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveStats {
    pub received: u64,
    pub dropped: u64,
}

/// Binds the receive socket and applies the read timeout.
///
/// # Errors
///
/// Returns [`TransportError::BindFailed`] if the address is unavailable.
pub fn bind_receiver(addr: SocketAddr) -> Result<UdpSocket, TransportError> {
    let socket =
        UdpSocket::bind(addr).map_err(|source| TransportError::BindFailed { addr, source })?;
    socket
        .set_read_timeout(Some(READ_TIMEOUT))
        .map_err(TransportError::Configure)?;
    info!("listening for input on UDP {addr}");
    Ok(socket)
}

/// Receives and dispatches datagrams until `running` is cleared.
pub fn run_receive_loop(
    socket: &UdpSocket,
    dispatcher: &EventDispatcher,
    running: &AtomicBool,
) -> ReceiveStats {
    let mut buf = [0u8; RECV_BUFFER_SIZE];
    let mut stats = ReceiveStats::default();

    while running.load(Ordering::Relaxed) {
        let (len, src) = match socket.recv_from(&mut buf) {
            Ok(pair) => pair,
            Err(e) if is_timeout_error(&e) => continue,
            Err(e) => {
                // e.g. ICMP port-unreachable surfacing as ConnectionReset on Windows.
                warn!("UDP receive error: {e}");
                continue;
            }
        };

        stats.received += 1;
        trace!(len, %src, "datagram");
        if let DispatchOutcome::Dropped(e) = dispatcher.dispatch(&buf[..len]) {
            stats.dropped += 1;
            debug!("dropped datagram from {src}: {e}");
        }
    }

    info!(
        received = stats.received,
        dropped = stats.dropped,
        "receive loop stopped"
    );
    stats
}

/// Returns `true` for OS timeout / would-block errors that should be retried.
fn is_timeout_error(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_timeout_error_recognises_timed_out() {
        let e = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        assert!(is_timeout_error(&e));
    }

    #[test]
    fn test_is_timeout_error_recognises_would_block() {
        let e = std::io::Error::new(std::io::ErrorKind::WouldBlock, "would block");
        assert!(is_timeout_error(&e));
    }

    #[test]
    fn test_is_timeout_error_returns_false_for_other_errors() {
        let e = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        assert!(!is_timeout_error(&e));
    }

    #[test]
    fn test_bind_receiver_on_ephemeral_port_succeeds() {
        let socket = bind_receiver("127.0.0.1:0".parse().unwrap()).expect("bind");
        assert_eq!(socket.read_timeout().unwrap(), Some(READ_TIMEOUT));
    }

    #[test]
    fn test_bind_receiver_reports_address_in_use() {
        let first = bind_receiver("127.0.0.1:0".parse().unwrap()).expect("bind");
        let addr = first.local_addr().unwrap();

        let second = bind_receiver(addr);

        assert!(matches!(second, Err(TransportError::BindFailed { .. })));
    }
}
