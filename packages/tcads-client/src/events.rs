//! The client's event surface: a single [`Event`] enum broadcast to every
//! subscriber via [`Client::events`](crate::client::Client::events).
//!
//! This replaces a per-event-name callback registry with one typed stream —
//! callers `match` on the variant instead of registering a handler per name.

use crate::error::ClientError;
use std::net::SocketAddr;
use tcads_core::ads::AdsState;
use tcads_core::ams::RouterState;

/// Capacity of the broadcast channel backing [`crate::client::Client::events`].
///
/// Slow subscribers that fall this far behind will observe a `Lagged` error
/// from `broadcast::Receiver::recv` and skip forward; the client itself never
/// blocks on event delivery.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A snapshot transition: what a value was, and what it became.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<T> {
    pub previous: T,
    pub current: T,
}

impl<T> Transition<T> {
    pub fn new(previous: T, current: T) -> Self {
        Self { previous, current }
    }
}

/// Every event the client can emit.
///
/// Mirrors the source's `connect` / `disconnect` / `reconnect` /
/// `connectionLost` / `plcSymbolVersionChange` / `plcRuntimeStateChange` /
/// `tcSystemStateChange` / `routerStateChange` / `client-error` / `warning`
/// callback names, one variant per name.
#[derive(Debug, Clone)]
pub enum Event {
    /// The connection handshake completed and the client is usable.
    Connected { local: SocketAddr, remote: SocketAddr },
    /// The connection was torn down, either by request or by failure.
    Disconnected { forced: bool },
    /// A reconnect attempt succeeded after a prior connection loss and every
    /// previously active subscription has been given a chance to resubscribe.
    /// `unrestored` names (by `SubscriptionId`) any that failed to re-arm.
    Reconnected { all_restored: bool, unrestored: Vec<u64> },
    /// The state monitor (C9) declared the connection lost.
    ConnectionLost,
    /// The PLC's symbol table version changed; cached symbols/data types are stale.
    PlcSymbolVersionChange(Transition<u32>),
    /// The target PLC runtime's ADS state changed.
    PlcRuntimeStateChange(Transition<AdsState>),
    /// The target TwinCAT system service's ADS state changed.
    TcSystemStateChange(Transition<AdsState>),
    /// The local AMS router reported a state change (start/stop/removed).
    RouterStateChange(Transition<RouterState>),
    /// A background operation (reconnect, notification dispatch, state poll)
    /// failed in a way that doesn't map to any in-flight caller's request.
    ClientError(String),
    /// A non-fatal anomaly worth surfacing to the embedding application.
    Warning(String),
}

impl Event {
    pub(crate) fn client_error(err: &ClientError) -> Self {
        Self::ClientError(err.to_string())
    }

    pub(crate) fn warning(msg: impl Into<String>) -> Self {
        Self::Warning(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_holds_previous_and_current() {
        let t = Transition::new(AdsState::Run, AdsState::Stop);
        assert_eq!(t.previous, AdsState::Run);
        assert_eq!(t.current, AdsState::Stop);
    }

    #[test]
    fn client_error_event_carries_display_string() {
        let err = ClientError::state("not connected");
        let event = Event::client_error(&err);
        match event {
            Event::ClientError(msg) => assert!(msg.contains("not connected")),
            _ => panic!("wrong variant"),
        }
    }
}
