//! Fake AMS router (C14): a loopback TCP server standing in for the real
//! `AmsRouter`/`TcAmsRouter` in integration tests.
//!
//! `Connection::establish` dials `AmsStream::connect`, the `TcpStream`-only
//! constructor, so this harness answers over a genuine socket rather than an
//! in-memory duplex pair the way `tcads-core`'s own frame-level unit tests do.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};

use tcads_core::ads::header::ADS_HEADER_LEN;
use tcads_core::ads::{AdsCommand, AdsHeader, AdsReturnCode, StateFlag};
use tcads_core::ams::{AmsAddr, AmsCommand, AmsNetId};
use tcads_core::io::AmsFrame;
use tcads_core::io::tokio::AmsStream;
use tcads_core::protocol::router::PortConnectResponse;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// A single ADS request handed to a [`Handler`] so a test can script a reply.
pub struct IncomingRequest {
    pub header: AdsHeader,
    pub payload: Vec<u8>,
}

/// A scripted reply. `result` lands in the ADS header's error code (what
/// `Multiplexer::resolve` checks); `payload` is the raw response bytes
/// (e.g. an already-encoded `AdsReadResponse`).
pub struct ScriptedReply {
    pub result: AdsReturnCode,
    pub payload: Vec<u8>,
}

impl ScriptedReply {
    pub fn ok(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            result: AdsReturnCode::Ok,
            payload: payload.into(),
        }
    }

    pub fn error(result: AdsReturnCode) -> Self {
        Self {
            result,
            payload: Vec::new(),
        }
    }
}

pub type Handler = Arc<dyn Fn(&IncomingRequest) -> ScriptedReply + Send + Sync>;

/// A fake router bound to a loopback port. Accepts any number of connections
/// and answers the `PortConnect` handshake itself; every subsequent ADS
/// request is handed to the supplied [`Handler`].
pub struct FakeRouter {
    addr: SocketAddr,
    local_net_id: AmsNetId,
    shutdown: mpsc::UnboundedSender<()>,
}

impl FakeRouter {
    pub async fn spawn(handler: Handler) -> std::io::Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;
        let local_net_id = AmsNetId::new(127, 0, 0, 1, 1, 1);
        let next_port = Arc::new(AtomicU16::new(30000));
        let (shutdown_tx, mut shutdown_rx) = mpsc::unbounded_channel::<()>();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => return,
                    accepted = listener.accept() => {
                        let Ok((stream, _)) = accepted else { return };
                        let handler = handler.clone();
                        let next_port = next_port.clone();
                        tokio::spawn(serve_connection(stream, local_net_id, next_port, handler));
                    }
                }
            }
        });

        Ok(Self {
            addr,
            local_net_id,
            shutdown: shutdown_tx,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn local_net_id(&self) -> AmsNetId {
        self.local_net_id
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown.send(());
    }
}

impl Drop for FakeRouter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn serve_connection(
    stream: TcpStream,
    local_net_id: AmsNetId,
    next_port: Arc<AtomicU16>,
    handler: Handler,
) {
    let _ = stream.set_nodelay(true);
    let mut stream = AmsStream::new(stream);

    loop {
        let frame = match stream.read_frame().await {
            Ok(frame) => frame,
            Err(_) => return,
        };

        match frame.header().command() {
            AmsCommand::PortConnect => {
                let assigned_port = next_port.fetch_add(1, Ordering::SeqCst);
                let mut payload = Vec::new();
                if PortConnectResponse::new(local_net_id, assigned_port)
                    .write_to(&mut payload)
                    .is_err()
                {
                    return;
                }
                let reply = AmsFrame::new(AmsCommand::PortConnect, payload);
                if stream.write_frame(&reply).await.is_err() {
                    return;
                }
            }
            AmsCommand::PortClose => return,
            AmsCommand::AdsCommand => {
                let payload = frame.payload();
                if payload.len() < ADS_HEADER_LEN {
                    return;
                }
                let header = match AdsHeader::try_from_slice(&payload[..ADS_HEADER_LEN]) {
                    Ok(header) => header,
                    Err(_) => return,
                };
                let request = IncomingRequest {
                    payload: payload[ADS_HEADER_LEN..].to_vec(),
                    header: header.clone(),
                };
                let scripted = handler(&request);

                let reply_header = AdsHeader::new(
                    *header.source(),
                    *header.target(),
                    header.command_id(),
                    StateFlag::tcp_ads_response(),
                    scripted.payload.len() as u32,
                    scripted.result,
                    header.invoke_id(),
                );
                let mut bytes = reply_header.to_bytes().to_vec();
                bytes.extend_from_slice(&scripted.payload);
                let reply = AmsFrame::new(AmsCommand::AdsCommand, bytes);
                if stream.write_frame(&reply).await.is_err() {
                    return;
                }
            }
            _ => {
                // Router notifications and other AMS-level commands are not
                // exercised by this harness; ignore and keep serving.
            }
        }
    }
}

/// Convenience: target address to use when configuring a [`crate::ClientSettings`]
/// test instance, matching the identity this router claims for itself.
pub fn fake_target(router: &FakeRouter, port: tcads_core::ams::AmsPort) -> AmsAddr {
    AmsAddr::new(router.local_net_id(), port)
}
