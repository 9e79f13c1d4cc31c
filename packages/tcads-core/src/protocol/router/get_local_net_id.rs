//! `GetLocalNetId` (0x1002) — requests the `AmsNetId` of the local router. Carries
//! no request payload; the reply is the bare net ID.

use crate::ams::AmsNetId;
use crate::protocol::error::PayloadError;
use std::io::{self, Read};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetLocalNetIdResponse {
    net_id: AmsNetId,
}

impl GetLocalNetIdResponse {
    pub const LENGTH: usize = 6;

    pub fn new(net_id: AmsNetId) -> Self {
        Self { net_id }
    }

    pub fn net_id(&self) -> AmsNetId {
        self.net_id
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(Self {
            net_id: AmsNetId::read_from(r)?,
        })
    }

    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, PayloadError> {
        if bytes.len() < Self::LENGTH {
            return Err(PayloadError::TooSmall {
                item: "GetLocalNetIdResponse",
                expected: Self::LENGTH,
                found: bytes.len(),
            });
        }
        Self::read_from(&mut &bytes[..Self::LENGTH]).map_err(|_| PayloadError::TooSmall {
            item: "GetLocalNetIdResponse",
            expected: Self::LENGTH,
            found: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let resp = GetLocalNetIdResponse::new(AmsNetId::new(127, 0, 0, 1, 1, 1));
        let bytes = resp.net_id().to_bytes();
        let parsed = GetLocalNetIdResponse::read_from(&mut &bytes[..]).unwrap();
        assert_eq!(parsed, resp);
    }
}
