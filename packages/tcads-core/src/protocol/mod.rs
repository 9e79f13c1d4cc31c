//! Typed request and response payloads for every ADS command, plus the AMS
//! router-level commands ([`router`]) used for the port-connect handshake.
//!
//! These types encode/decode only the payload that sits between the AMS/TCP
//! header and, where applicable, the 32-byte ADS header. Framing the full
//! wire message is the job of the `io` module and the client's connection layer.

pub mod ads;
pub mod error;
pub mod index_groups;
pub mod router;

pub use ads::*;
pub use error::PayloadError;
pub use router::{
    GetLocalNetIdResponse, PortCloseRequest, PortConnectRequest, PortConnectResponse,
    RouterNotification,
};
