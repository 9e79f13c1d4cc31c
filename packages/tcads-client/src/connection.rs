//! Connection manager (C3): TCP lifecycle to the AMS router, port registration,
//! the reconnect loop, and router-notification handling.
//!
//! Owns the single socket. Everything above this layer reaches the network only
//! through [`Connection::send`].

use crate::config::ClientSettings;
use crate::error::{ClientError, Result};
use crate::events::{Event, Transition};
use crate::multiplexer::{AdsResponse, Multiplexer};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as SyncMutex};
use tcads_core::ads::header::ADS_HEADER_LEN;
use tcads_core::ads::{AdsCommand, AdsHeader, AdsReturnCode, StateFlag};
use tcads_core::ams::{AmsAddr, AmsCommand, RouterState};
use tcads_core::io::AmsFrame;
use tcads_core::io::tokio::{AmsReader, AmsStream, AmsWriter};
use tcads_core::protocol::router::{PortCloseRequest, PortConnectRequest, PortConnectResponse, RouterNotification};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{Mutex as AsyncMutex, broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Lifecycle state of the connection to the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
    Closing,
}

struct Shared {
    settings: ClientSettings,
    target: AmsAddr,
    mux: Arc<Multiplexer>,
    events: broadcast::Sender<Event>,
    notify_tx: mpsc::UnboundedSender<AdsResponse>,
    state: SyncMutex<ConnectionState>,
    writer: AsyncMutex<Option<AmsWriter<OwnedWriteHalf>>>,
    local_addr: SyncMutex<Option<AmsAddr>>,
    router_state: SyncMutex<RouterState>,
    reader_task: SyncMutex<Option<JoinHandle<()>>>,
    lifecycle: AsyncMutex<()>,
    closing: AtomicBool,
}

/// Handle to the managed connection. Cheaply `Clone`able; every clone shares the
/// same socket and state.
#[derive(Clone)]
pub struct Connection(Arc<Shared>);

impl Connection {
    pub fn new(
        settings: ClientSettings,
        events: broadcast::Sender<Event>,
        notify_tx: mpsc::UnboundedSender<AdsResponse>,
    ) -> Self {
        let target = AmsAddr::new(settings.target_ams_net_id, settings.target_ads_port);
        Self(Arc::new(Shared {
            settings,
            target,
            mux: Arc::new(Multiplexer::new()),
            events,
            notify_tx,
            state: SyncMutex::new(ConnectionState::Disconnected),
            writer: AsyncMutex::new(None),
            local_addr: SyncMutex::new(None),
            router_state: SyncMutex::new(RouterState::Stop),
            reader_task: SyncMutex::new(None),
            lifecycle: AsyncMutex::new(()),
            closing: AtomicBool::new(false),
        }))
    }

    pub fn state(&self) -> ConnectionState {
        *self.0.state.lock().unwrap()
    }

    pub fn target(&self) -> AmsAddr {
        self.0.target
    }

    pub fn local_addr(&self) -> Option<AmsAddr> {
        *self.0.local_addr.lock().unwrap()
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.0.settings
    }

    pub fn multiplexer(&self) -> Arc<Multiplexer> {
        self.0.mux.clone()
    }

    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.0.events.subscribe()
    }

    /// Broadcasts an event on behalf of a sibling component (e.g. the state
    /// monitor reporting a runtime/system state transition).
    pub fn emit_event(&self, event: Event) {
        let _ = self.0.events.send(event);
    }

    /// Tears down the current socket and enters the same reconnect path as a
    /// socket-level read failure, without waiting for one to happen. Used by
    /// the state monitor when liveness checks stop getting replies on an
    /// otherwise-open socket (a half-open connection).
    pub async fn report_unresponsive(&self) {
        if self.state() != ConnectionState::Connected {
            return;
        }
        if let Some(handle) = self.0.reader_task.lock().unwrap().take() {
            handle.abort();
        }
        self.0.writer.lock().await.take();
        handle_disconnect(&self.0).await;
    }

    /// Opens the TCP connection and registers a local AMS port. Idempotent while
    /// already connecting or connected.
    pub async fn connect(&self) -> Result<()> {
        let _guard = self.0.lifecycle.lock().await;
        if matches!(self.state(), ConnectionState::Connecting | ConnectionState::Connected) {
            return Ok(());
        }
        *self.0.state.lock().unwrap() = ConnectionState::Connecting;
        self.0.closing.store(false, Ordering::SeqCst);

        match establish(&self.0).await {
            Ok(established) => {
                *self.0.local_addr.lock().unwrap() = Some(established.local_ams_addr);
                *self.0.state.lock().unwrap() = ConnectionState::Connected;
                let handle = tokio::spawn(read_loop(self.0.clone(), established.reader));
                *self.0.reader_task.lock().unwrap() = Some(handle);
                let _ = self.0.events.send(Event::Connected {
                    local: established.local_socket,
                    remote: established.remote_socket,
                });
                debug!(target = %self.0.target, "connected");
                Ok(())
            }
            Err(e) => {
                *self.0.state.lock().unwrap() = ConnectionState::Disconnected;
                Err(e)
            }
        }
    }

    /// Closes the connection. If `force` is false, attempts a polite port-close
    /// handshake first; sockets are released on every exit path either way.
    pub async fn disconnect(&self, force: bool) -> Result<()> {
        let _guard = self.0.lifecycle.lock().await;
        if matches!(self.state(), ConnectionState::Disconnected | ConnectionState::Closing) {
            return Ok(());
        }
        *self.0.state.lock().unwrap() = ConnectionState::Closing;
        self.0.closing.store(true, Ordering::SeqCst);

        if let Some(mut writer) = self.0.writer.lock().await.take() {
            if !force {
                if let Some(local) = self.local_addr() {
                    let mut payload = Vec::new();
                    if PortCloseRequest::new(local.port()).write_to(&mut payload).is_ok() {
                        let frame = AmsFrame::new(AmsCommand::PortClose, payload);
                        let _ = writer.write_frame(&frame).await;
                    }
                }
            }
        }

        if let Some(handle) = self.0.reader_task.lock().unwrap().take() {
            handle.abort();
        }

        self.0.mux.reject_all();
        *self.0.local_addr.lock().unwrap() = None;
        *self.0.state.lock().unwrap() = ConnectionState::Disconnected;
        let _ = self.0.events.send(Event::Disconnected { forced: force });
        debug!(target = %self.0.target, forced = force, "disconnected");
        Ok(())
    }

    /// Sends a single ADS command to `target` and awaits its reply, bounded by
    /// the configured `timeout_delay`.
    pub async fn send(&self, command: AdsCommand, target: AmsAddr, payload: Vec<u8>) -> Result<AdsResponse> {
        if self.state() != ConnectionState::Connected {
            return Err(ClientError::state("not connected"));
        }
        let source = self
            .local_addr()
            .ok_or_else(|| ClientError::state("not connected"))?;

        let (invoke_id, rx) = self.0.mux.register();
        let header = AdsHeader::new(
            target,
            source,
            command,
            StateFlag::tcp_ads_request(),
            payload.len() as u32,
            AdsReturnCode::Ok,
            invoke_id,
        );
        let mut bytes = header.to_bytes().to_vec();
        bytes.extend_from_slice(&payload);
        let frame = AmsFrame::new(AmsCommand::AdsCommand, bytes);

        let write_result = {
            let mut guard = self.0.writer.lock().await;
            match guard.as_mut() {
                Some(writer) => writer.write_frame(&frame).await,
                None => {
                    self.0.mux.cancel(invoke_id);
                    return Err(ClientError::state("not connected"));
                }
            }
        };
        if let Err(e) = write_result {
            self.0.mux.cancel(invoke_id);
            return Err(ClientError::from(e));
        }

        self.0.mux.wait(invoke_id, rx, self.0.settings.timeout_delay).await
    }

    /// Convenience for sending to the configured target device.
    pub async fn send_to_target(&self, command: AdsCommand, payload: Vec<u8>) -> Result<AdsResponse> {
        self.send(command, self.0.target, payload).await
    }
}

struct Established {
    reader: AmsReader<OwnedReadHalf>,
    local_ams_addr: AmsAddr,
    local_socket: SocketAddr,
    remote_socket: SocketAddr,
}

async fn establish(shared: &Arc<Shared>) -> Result<Established> {
    let router_addr = SocketAddr::new(shared.settings.router_address, shared.settings.router_tcp_port);
    let mut stream = AmsStream::connect(router_addr).await?;
    let local_socket = stream.local_addr()?;
    let remote_socket = stream.peer_addr()?;

    let local_ams_addr = if let (Some(net_id), Some(port)) =
        (shared.settings.local_ams_net_id, shared.settings.local_ads_port)
    {
        AmsAddr::new(net_id, port)
    } else {
        let mut payload = Vec::new();
        PortConnectRequest::any().write_to(&mut payload)?;
        let request_frame = AmsFrame::new(AmsCommand::PortConnect, payload);
        stream.write_frame(&request_frame).await?;

        let reply = stream.read_frame().await?;
        if reply.header().command() != AmsCommand::PortConnect {
            return Err(ClientError::protocol("router did not reply to port-connect request"));
        }
        let response = PortConnectResponse::try_from_slice(reply.payload())
            .map_err(|e| ClientError::protocol(e.to_string()))?;
        AmsAddr::new(response.net_id(), response.port())
    };

    let (reader, writer) = stream.into_split();
    *shared.writer.lock().await = Some(writer);

    Ok(Established {
        reader,
        local_ams_addr,
        local_socket,
        remote_socket,
    })
}

async fn read_loop(shared: Arc<Shared>, mut reader: AmsReader<OwnedReadHalf>) {
    loop {
        match reader.read_frame().await {
            Ok(frame) => dispatch_frame(&shared, frame),
            Err(e) => {
                if shared.closing.load(Ordering::SeqCst) {
                    return;
                }
                warn!(error = %e, "connection read loop terminated");
                handle_disconnect(&shared).await;
                return;
            }
        }
    }
}

fn dispatch_frame(shared: &Arc<Shared>, frame: AmsFrame) {
    match frame.header().command() {
        AmsCommand::AdsCommand => {
            let payload = frame.payload();
            if payload.len() < ADS_HEADER_LEN {
                warn!(len = payload.len(), "dropping undersized ADS payload");
                return;
            }
            let header = AdsHeader::from_bytes(payload[..ADS_HEADER_LEN].try_into().unwrap());
            let body = payload[ADS_HEADER_LEN..].to_vec();
            if header.command_id() == AdsCommand::AdsDeviceNotification {
                let _ = shared.notify_tx.send(AdsResponse { header, payload: body });
            } else {
                shared.mux.resolve(AdsResponse { header, payload: body });
            }
        }
        AmsCommand::RouterNotification => match RouterNotification::try_from_slice(frame.payload()) {
            Ok(note) => {
                let mut guard = shared.router_state.lock().unwrap();
                let previous = *guard;
                *guard = note.state();
                drop(guard);
                let _ = shared
                    .events
                    .send(Event::RouterStateChange(Transition::new(previous, note.state())));
            }
            Err(e) => warn!(error = %e, "malformed router notification"),
        },
        other => {
            warn!(command = ?other, "dropping frame with unhandled AMS command");
        }
    }
}

async fn handle_disconnect(shared: &Arc<Shared>) {
    shared.mux.reject_all();
    let next = {
        let mut state = shared.state.lock().unwrap();
        if *state == ConnectionState::Closing {
            return;
        }
        *state = if shared.settings.auto_reconnect {
            ConnectionState::Reconnecting
        } else {
            ConnectionState::Disconnected
        };
        *state
    };
    *shared.local_addr.lock().unwrap() = None;
    let _ = shared.events.send(Event::ConnectionLost);

    if next == ConnectionState::Reconnecting {
        tokio::spawn(reconnect_loop(shared.clone()));
    }
}

async fn reconnect_loop(shared: Arc<Shared>) {
    loop {
        tokio::time::sleep(shared.settings.reconnect_interval).await;
        if shared.closing.load(Ordering::SeqCst) {
            return;
        }
        debug!("attempting reconnect");
        match establish(&shared).await {
            Ok(established) => {
                *shared.local_addr.lock().unwrap() = Some(established.local_ams_addr);
                *shared.state.lock().unwrap() = ConnectionState::Connected;
                let handle = tokio::spawn(read_loop(shared.clone(), established.reader));
                *shared.reader_task.lock().unwrap() = Some(handle);
                // Tells C5 the socket is back (it resubscribes and emits
                // `Event::Reconnected` with the outcome once it has tried).
                let _ = shared.events.send(Event::Connected {
                    local: established.local_socket,
                    remote: established.remote_socket,
                });
                return;
            }
            Err(e) => {
                if !shared.settings.hide_console_warnings {
                    warn!(error = %e, "reconnect attempt failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcads_core::ams::AmsNetId;

    fn test_settings() -> ClientSettings {
        ClientSettings::builder(AmsNetId::new(192, 168, 4, 1, 1, 1), 851)
            .build()
            .unwrap()
    }

    #[test]
    fn new_connection_starts_disconnected() {
        let (events_tx, _events_rx) = broadcast::channel(16);
        let (notify_tx, _notify_rx) = mpsc::unbounded_channel();
        let connection = Connection::new(test_settings(), events_tx, notify_tx);
        assert_eq!(connection.state(), ConnectionState::Disconnected);
        assert!(connection.local_addr().is_none());
    }

    #[tokio::test]
    async fn send_fails_fast_when_not_connected() {
        let (events_tx, _events_rx) = broadcast::channel(16);
        let (notify_tx, _notify_rx) = mpsc::unbounded_channel();
        let connection = Connection::new(test_settings(), events_tx, notify_tx);
        let err = connection
            .send(AdsCommand::AdsRead, connection.target(), Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err.kind, crate::error::ErrorKind::State(_)));
    }

    #[tokio::test]
    async fn disconnect_is_idempotent_when_already_disconnected() {
        let (events_tx, _events_rx) = broadcast::channel(16);
        let (notify_tx, _notify_rx) = mpsc::unbounded_channel();
        let connection = Connection::new(test_settings(), events_tx, notify_tx);
        connection.disconnect(false).await.unwrap();
        assert_eq!(connection.state(), ConnectionState::Disconnected);
    }
}
