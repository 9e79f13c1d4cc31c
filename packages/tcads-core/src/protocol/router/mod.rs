//! AMS router-level commands: the handshake the client performs with the local
//! `AmsRouter`/`TcAmsRouter` before any ADS command can be exchanged, plus the
//! unsolicited notifications the router pushes about its own state.

pub mod get_local_net_id;
pub mod port_close;
pub mod port_connect;
pub mod router_notification;

pub use get_local_net_id::GetLocalNetIdResponse;
pub use port_close::PortCloseRequest;
pub use port_connect::{PortConnectRequest, PortConnectResponse};
pub use router_notification::RouterNotification;
