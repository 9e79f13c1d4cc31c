//! ADS request payloads.
//!
//! Every type here encodes only the ADS-specific payload that follows the 32-byte
//! [`AdsHeader`](crate::ads::AdsHeader) — the header itself is assembled by the
//! connection/multiplexer layer, not here.

use crate::ads::{AdsState, AdsTransMode, IndexGroup, IndexOffset};
use crate::protocol::error::PayloadError;
use std::io::{self, Read, Write};

/// `AdsRead` request payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdsReadRequest {
    index_group: IndexGroup,
    index_offset: IndexOffset,
    read_length: u32,
}

impl AdsReadRequest {
    pub const LENGTH: usize = 12;

    pub fn new(index_group: IndexGroup, index_offset: IndexOffset, read_length: u32) -> Self {
        Self {
            index_group,
            index_offset,
            read_length,
        }
    }

    pub fn index_group(&self) -> IndexGroup {
        self.index_group
    }

    pub fn index_offset(&self) -> IndexOffset {
        self.index_offset
    }

    pub fn read_length(&self) -> u32 {
        self.read_length
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.index_group.to_le_bytes())?;
        w.write_all(&self.index_offset.to_le_bytes())?;
        w.write_all(&self.read_length.to_le_bytes())
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; Self::LENGTH];
        r.read_exact(&mut buf)?;
        Ok(Self::from(buf))
    }
}

impl From<[u8; Self::LENGTH]> for AdsReadRequest {
    fn from(b: [u8; Self::LENGTH]) -> Self {
        Self {
            index_group: u32::from_le_bytes(b[0..4].try_into().unwrap()),
            index_offset: u32::from_le_bytes(b[4..8].try_into().unwrap()),
            read_length: u32::from_le_bytes(b[8..12].try_into().unwrap()),
        }
    }
}

impl TryFrom<&[u8]> for AdsReadRequest {
    type Error = PayloadError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() < Self::LENGTH {
            return Err(PayloadError::TooSmall {
                item: "AdsReadRequest",
                expected: Self::LENGTH,
                found: bytes.len(),
            });
        }
        Ok(Self::from(<[u8; Self::LENGTH]>::try_from(&bytes[..Self::LENGTH]).unwrap()))
    }
}

/// `AdsWrite` request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdsWriteRequest {
    index_group: IndexGroup,
    index_offset: IndexOffset,
    data: Vec<u8>,
}

impl AdsWriteRequest {
    pub const HEADER_LEN: usize = 12;

    pub fn new(index_group: IndexGroup, index_offset: IndexOffset, data: impl Into<Vec<u8>>) -> Self {
        Self {
            index_group,
            index_offset,
            data: data.into(),
        }
    }

    pub fn index_group(&self) -> IndexGroup {
        self.index_group
    }

    pub fn index_offset(&self) -> IndexOffset {
        self.index_offset
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.index_group.to_le_bytes())?;
        w.write_all(&self.index_offset.to_le_bytes())?;
        w.write_all(&(self.data.len() as u32).to_le_bytes())?;
        w.write_all(&self.data)
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut head = [0u8; Self::HEADER_LEN];
        r.read_exact(&mut head)?;
        let index_group = u32::from_le_bytes(head[0..4].try_into().unwrap());
        let index_offset = u32::from_le_bytes(head[4..8].try_into().unwrap());
        let len = u32::from_le_bytes(head[8..12].try_into().unwrap()) as usize;
        let mut data = vec![0u8; len];
        r.read_exact(&mut data)?;
        Ok(Self {
            index_group,
            index_offset,
            data,
        })
    }
}

/// `AdsReadWrite` request payload — a write followed by a read in one round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdsReadWriteRequest {
    index_group: IndexGroup,
    index_offset: IndexOffset,
    read_length: u32,
    write_data: Vec<u8>,
}

impl AdsReadWriteRequest {
    pub const HEADER_LEN: usize = 16;

    pub fn new(
        index_group: IndexGroup,
        index_offset: IndexOffset,
        read_length: u32,
        write_data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            index_group,
            index_offset,
            read_length,
            write_data: write_data.into(),
        }
    }

    pub fn index_group(&self) -> IndexGroup {
        self.index_group
    }

    pub fn index_offset(&self) -> IndexOffset {
        self.index_offset
    }

    pub fn read_length(&self) -> u32 {
        self.read_length
    }

    pub fn write_data(&self) -> &[u8] {
        &self.write_data
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.index_group.to_le_bytes())?;
        w.write_all(&self.index_offset.to_le_bytes())?;
        w.write_all(&self.read_length.to_le_bytes())?;
        w.write_all(&(self.write_data.len() as u32).to_le_bytes())?;
        w.write_all(&self.write_data)
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut head = [0u8; Self::HEADER_LEN];
        r.read_exact(&mut head)?;
        let index_group = u32::from_le_bytes(head[0..4].try_into().unwrap());
        let index_offset = u32::from_le_bytes(head[4..8].try_into().unwrap());
        let read_length = u32::from_le_bytes(head[8..12].try_into().unwrap());
        let write_len = u32::from_le_bytes(head[12..16].try_into().unwrap()) as usize;
        let mut write_data = vec![0u8; write_len];
        r.read_exact(&mut write_data)?;
        Ok(Self {
            index_group,
            index_offset,
            read_length,
            write_data,
        })
    }
}

/// `AdsWriteControl` request payload — changes the ADS/device state of the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdsWriteControlRequest {
    ads_state: AdsState,
    device_state: u16,
    data: Vec<u8>,
}

impl AdsWriteControlRequest {
    pub const HEADER_LEN: usize = 8;

    pub fn new(ads_state: AdsState, device_state: u16, data: impl Into<Vec<u8>>) -> Self {
        Self {
            ads_state,
            device_state,
            data: data.into(),
        }
    }

    pub fn ads_state(&self) -> AdsState {
        self.ads_state
    }

    pub fn device_state(&self) -> u16 {
        self.device_state
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.ads_state.to_bytes())?;
        w.write_all(&self.device_state.to_le_bytes())?;
        w.write_all(&(self.data.len() as u32).to_le_bytes())?;
        w.write_all(&self.data)
    }
}

/// `AdsAddDeviceNotification` request payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdsAddDeviceNotificationRequest {
    index_group: IndexGroup,
    index_offset: IndexOffset,
    length: u32,
    trans_mode: AdsTransMode,
    max_delay_100ns: u32,
    cycle_time_100ns: u32,
}

impl AdsAddDeviceNotificationRequest {
    pub const LENGTH: usize = 40;

    pub fn new(
        index_group: IndexGroup,
        index_offset: IndexOffset,
        length: u32,
        trans_mode: AdsTransMode,
        max_delay_100ns: u32,
        cycle_time_100ns: u32,
    ) -> Self {
        Self {
            index_group,
            index_offset,
            length,
            trans_mode,
            max_delay_100ns,
            cycle_time_100ns,
        }
    }

    pub fn index_group(&self) -> IndexGroup {
        self.index_group
    }

    pub fn index_offset(&self) -> IndexOffset {
        self.index_offset
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn trans_mode(&self) -> AdsTransMode {
        self.trans_mode
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.index_group.to_le_bytes())?;
        w.write_all(&self.index_offset.to_le_bytes())?;
        w.write_all(&self.length.to_le_bytes())?;
        w.write_all(&self.trans_mode.to_bytes())?;
        w.write_all(&self.max_delay_100ns.to_le_bytes())?;
        w.write_all(&self.cycle_time_100ns.to_le_bytes())?;
        w.write_all(&[0u8; 16])
    }
}

/// `AdsDeleteDeviceNotification` request payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdsDeleteDeviceNotificationRequest {
    handle: u32,
}

impl AdsDeleteDeviceNotificationRequest {
    pub const LENGTH: usize = 4;

    pub fn new(handle: impl Into<u32>) -> Self {
        Self {
            handle: handle.into(),
        }
    }

    pub fn handle(&self) -> u32 {
        self.handle
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.handle.to_le_bytes())
    }
}

/// `AdsReadDeviceInfo` and `AdsReadState` carry no request payload — the ADS header alone
/// identifies the command. No type is needed for their (empty) bodies.
pub const EMPTY_REQUEST: &[u8] = &[];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::AdsState;

    #[test]
    fn read_request_roundtrip() {
        let req = AdsReadRequest::new(0x4020, 0, 2);
        let mut buf = Vec::new();
        req.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), AdsReadRequest::LENGTH);
        let parsed = AdsReadRequest::read_from(&mut &buf[..]).unwrap();
        assert_eq!(parsed, req);
    }

    #[test]
    fn write_request_roundtrip() {
        let req = AdsWriteRequest::new(0x4020, 4, vec![1, 2, 3, 4]);
        let mut buf = Vec::new();
        req.write_to(&mut buf).unwrap();
        let parsed = AdsWriteRequest::read_from(&mut &buf[..]).unwrap();
        assert_eq!(parsed, req);
    }

    #[test]
    fn read_write_request_roundtrip() {
        let req = AdsReadWriteRequest::new(0xF003, 0, 4, b"GVL.x".to_vec());
        let mut buf = Vec::new();
        req.write_to(&mut buf).unwrap();
        let parsed = AdsReadWriteRequest::read_from(&mut &buf[..]).unwrap();
        assert_eq!(parsed, req);
    }

    #[test]
    fn write_control_request_encodes_header_fields() {
        let req = AdsWriteControlRequest::new(AdsState::Run, 0, Vec::new());
        let mut buf = Vec::new();
        req.write_to(&mut buf).unwrap();
        assert_eq!(&buf[0..2], &AdsState::Run.to_bytes());
        assert_eq!(&buf[4..8], &0u32.to_le_bytes());
    }

    #[test]
    fn add_notification_request_has_16_reserved_bytes() {
        let req = AdsAddDeviceNotificationRequest::new(
            0x4020,
            0,
            2,
            AdsTransMode::ClientOnChange,
            0,
            100_000_000,
        );
        let mut buf = Vec::new();
        req.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), AdsAddDeviceNotificationRequest::LENGTH);
        assert!(buf[24..40].iter().all(|&b| b == 0));
    }

    #[test]
    fn delete_notification_request_encodes_handle() {
        let req = AdsDeleteDeviceNotificationRequest::new(42u32);
        let mut buf = Vec::new();
        req.write_to(&mut buf).unwrap();
        assert_eq!(buf, 42u32.to_le_bytes());
    }
}
