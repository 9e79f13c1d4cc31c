//! `PortConnect` (0x1000) — registers an AMS port with the local router.
//!
//! The client writes the requested port (`0` lets the router assign one) and the
//! router replies with the `AmsNetId` of the local machine plus the port it assigned.

use crate::ams::AmsPort;
use crate::ams::AmsNetId;
use crate::protocol::error::PayloadError;
use std::io::{self, Read, Write};

/// Request payload for `PortConnect`: the port to register, or `0` for "assign any".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortConnectRequest {
    requested_port: AmsPort,
}

impl PortConnectRequest {
    pub const LENGTH: usize = 2;

    pub fn new(requested_port: AmsPort) -> Self {
        Self { requested_port }
    }

    /// A request that lets the router pick an available port.
    pub fn any() -> Self {
        Self::new(0)
    }

    pub fn requested_port(&self) -> AmsPort {
        self.requested_port
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.requested_port.to_le_bytes())
    }
}

/// Reply payload for `PortConnect`: the local `AmsNetId` and the port assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortConnectResponse {
    net_id: AmsNetId,
    port: AmsPort,
}

impl PortConnectResponse {
    pub const LENGTH: usize = 8;

    pub fn new(net_id: AmsNetId, port: AmsPort) -> Self {
        Self { net_id, port }
    }

    pub fn net_id(&self) -> AmsNetId {
        self.net_id
    }

    pub fn port(&self) -> AmsPort {
        self.port
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.net_id.write_to(w)?;
        w.write_all(&self.port.to_le_bytes())
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let net_id = AmsNetId::read_from(r)?;
        let mut port_buf = [0u8; 2];
        r.read_exact(&mut port_buf)?;
        Ok(Self {
            net_id,
            port: AmsPort::from_le_bytes(port_buf),
        })
    }

    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, PayloadError> {
        if bytes.len() < Self::LENGTH {
            return Err(PayloadError::TooSmall {
                item: "PortConnectResponse",
                expected: Self::LENGTH,
                found: bytes.len(),
            });
        }
        Self::read_from(&mut &bytes[..Self::LENGTH]).map_err(|_| PayloadError::TooSmall {
            item: "PortConnectResponse",
            expected: Self::LENGTH,
            found: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_any_encodes_zero() {
        let req = PortConnectRequest::any();
        let mut buf = Vec::new();
        req.write_to(&mut buf).unwrap();
        assert_eq!(buf, [0, 0]);
    }

    #[test]
    fn response_roundtrip() {
        let resp = PortConnectResponse::new(AmsNetId::new(192, 168, 1, 1, 1, 1), 32905);
        let mut buf = Vec::new();
        resp.write_to(&mut buf).unwrap();
        let parsed = PortConnectResponse::read_from(&mut &buf[..]).unwrap();
        assert_eq!(parsed, resp);
    }

    #[test]
    fn response_try_from_slice_too_small() {
        let err = PortConnectResponse::try_from_slice(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, PayloadError::TooSmall { .. }));
    }
}
