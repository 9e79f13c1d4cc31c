//! Request multiplexer (C4): invoke-id allocation, pending-request table,
//! per-request timeout and response routing.
//!
//! Responses can arrive in any order; the only correlator is the invoke-id
//! carried in the ADS header.

use crate::error::{ClientError, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use tcads_core::ads::AdsHeader;
use tokio::sync::oneshot;
use tokio::time::{Duration, timeout};
use tracing::warn;

/// A decoded ADS response: the header (for error code/command id) plus the
/// raw payload bytes that follow it.
#[derive(Debug, Clone)]
pub struct AdsResponse {
    pub header: AdsHeader,
    pub payload: Vec<u8>,
}

type Waiter = oneshot::Sender<Result<AdsResponse>>;

/// Owns invoke-id allocation and the pending-request table. Not `Clone`;
/// shared behind an `Arc` by the connection that owns the socket.
pub struct Multiplexer {
    next_invoke_id: Mutex<u32>,
    pending: Mutex<HashMap<u32, Waiter>>,
}

impl Default for Multiplexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Multiplexer {
    pub fn new() -> Self {
        Self {
            next_invoke_id: Mutex::new(1),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Allocates the next invoke-id (wraps at `u32::MAX`; 0 is skipped so it
    /// can never collide with an in-flight id after a wrap).
    fn allocate_invoke_id(&self) -> u32 {
        let mut guard = self.next_invoke_id.lock().unwrap();
        let id = *guard;
        *guard = guard.wrapping_add(1).max(1);
        id
    }

    /// Registers a new pending request and returns its invoke-id plus a
    /// receiver that resolves when [`Multiplexer::resolve`] or
    /// [`Multiplexer::reject_all`] is called with a matching id.
    pub fn register(&self) -> (u32, oneshot::Receiver<Result<AdsResponse>>) {
        let invoke_id = self.allocate_invoke_id();
        let (tx, rx) = oneshot::channel();
        let mut pending = self.pending.lock().unwrap();
        assert!(
            pending.insert(invoke_id, tx).is_none(),
            "invoke-id collision: {invoke_id} already pending"
        );
        (invoke_id, rx)
    }

    /// Awaits the response for `invoke_id`, bounded by `timeout_delay`, removing
    /// the pending entry either way.
    pub async fn wait(
        &self,
        invoke_id: u32,
        rx: oneshot::Receiver<Result<AdsResponse>>,
        timeout_delay: Duration,
    ) -> Result<AdsResponse> {
        let result = timeout(timeout_delay, rx).await;
        self.pending.lock().unwrap().remove(&invoke_id);
        match result {
            Ok(Ok(inner)) => inner,
            Ok(Err(_)) => Err(ClientError::cancelled(format!(
                "invoke-id {invoke_id} cancelled before completion"
            ))),
            Err(_) => Err(ClientError::timeout(timeout_delay)),
        }
    }

    /// Routes an inbound ADS response to its waiter. Logs and drops the packet
    /// if no pending entry matches (§4.4: "on mismatch, emit a warning and drop").
    /// A non-OK error code in the header is surfaced to the waiter as an
    /// [`ClientError::ads`] failure rather than a successful response.
    pub fn resolve(&self, response: AdsResponse) {
        let invoke_id = response.header.invoke_id();
        let entry = self.pending.lock().unwrap().remove(&invoke_id);
        match entry {
            Some(waiter) => {
                let result = if response.header.error_code().is_success() {
                    Ok(response)
                } else {
                    Err(ClientError::ads(response.header.error_code()))
                };
                let _ = waiter.send(result);
            }
            None => {
                warn!(invoke_id, "no pending request for invoke-id; dropping response");
            }
        }
    }

    /// Rejects every pending request with a connection-lost error and clears
    /// the table. Called by C3 when the socket drops.
    pub fn reject_all(&self) {
        let mut pending = self.pending.lock().unwrap();
        for (_, waiter) in pending.drain() {
            let _ = waiter.send(Err(ClientError::cancelled("connection lost")));
        }
    }

    /// Drops a single pending entry without resolving it, e.g. when the write
    /// that would have carried the request never reached the socket.
    pub fn cancel(&self, invoke_id: u32) {
        self.pending.lock().unwrap().remove(&invoke_id);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcads_core::ads::{AdsCommand, AdsReturnCode, StateFlag};
    use tcads_core::ams::{AmsAddr, AmsNetId};

    fn addr() -> AmsAddr {
        AmsAddr::new(AmsNetId::new(192, 168, 4, 1, 1, 1), 851)
    }

    #[tokio::test]
    async fn resolve_routes_response_to_its_own_waiter() {
        let mux = Multiplexer::new();
        let (id, rx) = mux.register();
        mux.resolve(AdsResponse {
            header: AdsHeader::new(
                addr(),
                addr(),
                AdsCommand::AdsRead,
                StateFlag::tcp_ads_response(),
                0,
                AdsReturnCode::Ok,
                id,
            ),
            payload: vec![1, 2, 3],
        });
        let response = mux.wait(id, rx, Duration::from_millis(500)).await.unwrap();
        assert_eq!(response.payload, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn mismatched_invoke_id_is_dropped_not_delivered() {
        let mux = Multiplexer::new();
        let (id, rx) = mux.register();
        mux.resolve(AdsResponse {
            header: AdsHeader::new(
                addr(),
                addr(),
                AdsCommand::AdsRead,
                StateFlag::tcp_ads_response(),
                0,
                AdsReturnCode::Ok,
                id.wrapping_add(999),
            ),
            payload: Vec::new(),
        });
        let result = mux.wait(id, rx, Duration::from_millis(50)).await;
        assert!(matches!(result, Err(e) if matches!(e.kind, crate::error::ErrorKind::Timeout(_))));
    }

    #[tokio::test]
    async fn non_ok_error_code_surfaces_as_ads_error() {
        let mux = Multiplexer::new();
        let (id, rx) = mux.register();
        mux.resolve(AdsResponse {
            header: AdsHeader::new(
                addr(),
                addr(),
                AdsCommand::AdsRead,
                StateFlag::tcp_ads_response(),
                0,
                AdsReturnCode::AdsErrDeviceSymbolVersionInvalid,
                id,
            ),
            payload: Vec::new(),
        });
        let err = mux.wait(id, rx, Duration::from_millis(500)).await.unwrap_err();
        assert!(matches!(
            err.kind,
            crate::error::ErrorKind::Ads(AdsReturnCode::AdsErrDeviceSymbolVersionInvalid, _)
        ));
    }

    #[tokio::test]
    async fn reject_all_fails_every_pending_request_as_cancelled() {
        let mux = Multiplexer::new();
        let (_id1, rx1) = mux.register();
        let (_id2, rx2) = mux.register();
        mux.reject_all();
        assert_eq!(mux.pending_count(), 0);
        assert!(rx1.await.unwrap().is_err());
        assert!(rx2.await.unwrap().is_err());
    }
}
