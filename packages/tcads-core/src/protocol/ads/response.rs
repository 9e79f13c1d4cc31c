//! ADS response payloads.
//!
//! As with [`super::request`], these types encode only the ADS-specific payload that
//! follows the 32-byte [`AdsHeader`](crate::ads::AdsHeader); the header's own
//! `error_code` field already carries the outer ADS return code for commands whose
//! reply has no further structure.

use crate::ads::{AdsDeviceVersion, AdsReturnCode, AdsState, NotificationHandle, WindowsFileTime};
use crate::protocol::error::PayloadError;
use std::io::{self, Read, Write};

/// `AdsRead` reply payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdsReadResponse {
    result: AdsReturnCode,
    data: Vec<u8>,
}

impl AdsReadResponse {
    pub const HEADER_LEN: usize = 8;

    pub fn new(result: AdsReturnCode, data: impl Into<Vec<u8>>) -> Self {
        Self {
            result,
            data: data.into(),
        }
    }

    pub fn result(&self) -> AdsReturnCode {
        self.result
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.result.to_bytes())?;
        w.write_all(&(self.data.len() as u32).to_le_bytes())?;
        w.write_all(&self.data)
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut head = [0u8; Self::HEADER_LEN];
        r.read_exact(&mut head)?;
        let result = AdsReturnCode::from_bytes(head[0..4].try_into().unwrap());
        let len = u32::from_le_bytes(head[4..8].try_into().unwrap()) as usize;
        let mut data = vec![0u8; len];
        r.read_exact(&mut data)?;
        Ok(Self { result, data })
    }
}

/// `AdsReadWrite` reply payload — structurally identical to [`AdsReadResponse`].
pub type AdsReadWriteResponse = AdsReadResponse;

/// `AdsWrite` reply payload — a bare ADS return code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdsWriteResponse {
    result: AdsReturnCode,
}

impl AdsWriteResponse {
    pub const LENGTH: usize = 4;

    pub fn new(result: AdsReturnCode) -> Self {
        Self { result }
    }

    pub fn result(&self) -> AdsReturnCode {
        self.result
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.result.to_bytes())
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; Self::LENGTH];
        r.read_exact(&mut buf)?;
        Ok(Self {
            result: AdsReturnCode::from_bytes(buf),
        })
    }
}

/// `AdsWriteControl` reply payload — structurally identical to [`AdsWriteResponse`].
pub type AdsWriteControlResponse = AdsWriteResponse;

/// `AdsReadState` reply payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdsReadStateResponse {
    ads_state: AdsState,
    device_state: u16,
}

impl AdsReadStateResponse {
    pub const LENGTH: usize = 4;

    pub fn new(ads_state: AdsState, device_state: u16) -> Self {
        Self {
            ads_state,
            device_state,
        }
    }

    pub fn ads_state(&self) -> AdsState {
        self.ads_state
    }

    pub fn device_state(&self) -> u16 {
        self.device_state
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.ads_state.to_bytes())?;
        w.write_all(&self.device_state.to_le_bytes())
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; Self::LENGTH];
        r.read_exact(&mut buf)?;
        Ok(Self {
            ads_state: AdsState::from_bytes([buf[0], buf[1]]),
            device_state: u16::from_le_bytes([buf[2], buf[3]]),
        })
    }
}

/// `AdsReadDeviceInfo` reply payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdsDeviceInfoResponse {
    version: AdsDeviceVersion,
    device_name: String,
}

impl AdsDeviceInfoResponse {
    pub const LENGTH: usize = 20;

    pub fn new(version: AdsDeviceVersion, device_name: impl Into<String>) -> Self {
        Self {
            version,
            device_name: device_name.into(),
        }
    }

    pub fn version(&self) -> AdsDeviceVersion {
        self.version
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.version.to_bytes())?;
        let (encoded, _, _) = encoding_rs::WINDOWS_1252.encode(&self.device_name);
        let mut name_buf = [0u8; 16];
        let n = encoded.len().min(15);
        name_buf[..n].copy_from_slice(&encoded[..n]);
        w.write_all(&name_buf)
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; Self::LENGTH];
        r.read_exact(&mut buf)?;
        let version = AdsDeviceVersion::from_bytes(buf[0..4].try_into().unwrap());
        let name_bytes = &buf[4..20];
        let end = name_bytes.iter().position(|&b| b == 0).unwrap_or(16);
        let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&name_bytes[..end]);
        Ok(Self {
            version,
            device_name: decoded.into_owned(),
        })
    }
}

/// `AdsAddDeviceNotification` reply payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdsAddDeviceNotificationResponse {
    result: AdsReturnCode,
    handle: NotificationHandle,
}

impl AdsAddDeviceNotificationResponse {
    pub const LENGTH: usize = 8;

    pub fn new(result: AdsReturnCode, handle: NotificationHandle) -> Self {
        Self { result, handle }
    }

    pub fn result(&self) -> AdsReturnCode {
        self.result
    }

    pub fn handle(&self) -> NotificationHandle {
        self.handle
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.result.to_bytes())?;
        w.write_all(&self.handle.as_u32().to_le_bytes())
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; Self::LENGTH];
        r.read_exact(&mut buf)?;
        Ok(Self {
            result: AdsReturnCode::from_bytes(buf[0..4].try_into().unwrap()),
            handle: NotificationHandle::from_bytes(buf[4..8].try_into().unwrap()),
        })
    }
}

/// `AdsDeleteDeviceNotification` reply payload — structurally identical to [`AdsWriteResponse`].
pub type AdsDeleteDeviceNotificationResponse = AdsWriteResponse;

/// Header of an inbound `AdsDeviceNotification` stream: `totalLength | stampCount`,
/// followed by `stampCount` [`AdsStampHeader`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdsDeviceNotificationStreamHeader {
    length: u32,
    stamp_count: u32,
}

impl AdsDeviceNotificationStreamHeader {
    pub const LENGTH: usize = 8;

    pub fn new(length: u32, stamp_count: u32) -> Self {
        Self {
            length,
            stamp_count,
        }
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn stamp_count(&self) -> u32 {
        self.stamp_count
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; Self::LENGTH];
        r.read_exact(&mut buf)?;
        Ok(Self {
            length: u32::from_le_bytes(buf[0..4].try_into().unwrap()),
            stamp_count: u32::from_le_bytes(buf[4..8].try_into().unwrap()),
        })
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.length.to_le_bytes())?;
        w.write_all(&self.stamp_count.to_le_bytes())
    }
}

/// One timestamped group of samples within a notification stream: `plcTime | sampleCount`,
/// followed by `sampleCount` [`AdsNotificationSampleHeader`]s (each with trailing value bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdsStampHeader {
    timestamp: WindowsFileTime,
    sample_count: u32,
}

impl AdsStampHeader {
    pub const LENGTH: usize = 12;

    pub fn new(timestamp: WindowsFileTime, sample_count: u32) -> Self {
        Self {
            timestamp,
            sample_count,
        }
    }

    pub fn timestamp(&self) -> WindowsFileTime {
        self.timestamp
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; Self::LENGTH];
        r.read_exact(&mut buf)?;
        Ok(Self {
            timestamp: WindowsFileTime::from_bytes(buf[0..8].try_into().unwrap()),
            sample_count: u32::from_le_bytes(buf[8..12].try_into().unwrap()),
        })
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.timestamp.to_bytes())?;
        w.write_all(&self.sample_count.to_le_bytes())
    }
}

/// One sample within a stamp group: `handle | size`, followed by `size` value bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdsNotificationSampleHeader {
    handle: NotificationHandle,
    data: Vec<u8>,
}

impl AdsNotificationSampleHeader {
    pub const HEADER_LEN: usize = 8;

    pub fn new(handle: NotificationHandle, data: impl Into<Vec<u8>>) -> Self {
        Self {
            handle,
            data: data.into(),
        }
    }

    pub fn handle(&self) -> NotificationHandle {
        self.handle
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut head = [0u8; Self::HEADER_LEN];
        r.read_exact(&mut head)?;
        let handle = NotificationHandle::from_bytes(head[0..4].try_into().unwrap());
        let size = u32::from_le_bytes(head[4..8].try_into().unwrap()) as usize;
        let mut data = vec![0u8; size];
        r.read_exact(&mut data)?;
        Ok(Self { handle, data })
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.handle.as_u32().to_le_bytes())?;
        w.write_all(&(self.data.len() as u32).to_le_bytes())?;
        w.write_all(&self.data)
    }
}

/// A fully decoded notification stream: the header plus every stamp group and sample,
/// flattened for consumption by the notification manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdsDeviceNotificationStream {
    pub stamps: Vec<(WindowsFileTime, Vec<AdsNotificationSampleHeader>)>,
}

impl AdsDeviceNotificationStream {
    pub fn parse(bytes: &[u8]) -> Result<Self, PayloadError> {
        let mut cursor = io::Cursor::new(bytes);
        let header = AdsDeviceNotificationStreamHeader::read_from(&mut cursor).map_err(|_| {
            PayloadError::TooSmall {
                item: "AdsDeviceNotificationStreamHeader",
                expected: AdsDeviceNotificationStreamHeader::LENGTH,
                found: bytes.len(),
            }
        })?;

        let mut stamps = Vec::with_capacity(header.stamp_count() as usize);
        for _ in 0..header.stamp_count() {
            let stamp = AdsStampHeader::read_from(&mut cursor)
                .map_err(|_| PayloadError::TooSmall {
                    item: "AdsStampHeader",
                    expected: AdsStampHeader::LENGTH,
                    found: 0,
                })?;
            let mut samples = Vec::with_capacity(stamp.sample_count() as usize);
            for _ in 0..stamp.sample_count() {
                let sample = AdsNotificationSampleHeader::read_from(&mut cursor).map_err(|_| {
                    PayloadError::TooSmall {
                        item: "AdsNotificationSampleHeader",
                        expected: AdsNotificationSampleHeader::HEADER_LEN,
                        found: 0,
                    }
                })?;
                samples.push(sample);
            }
            stamps.push((stamp.timestamp(), samples));
        }

        Ok(Self { stamps })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_response_roundtrip() {
        let resp = AdsReadResponse::new(AdsReturnCode::Ok, vec![0xFF, 0x7F]);
        let mut buf = Vec::new();
        resp.write_to(&mut buf).unwrap();
        let parsed = AdsReadResponse::read_from(&mut &buf[..]).unwrap();
        assert_eq!(parsed, resp);
    }

    #[test]
    fn write_response_roundtrip() {
        let resp = AdsWriteResponse::new(AdsReturnCode::Ok);
        let mut buf = Vec::new();
        resp.write_to(&mut buf).unwrap();
        let parsed = AdsWriteResponse::read_from(&mut &buf[..]).unwrap();
        assert_eq!(parsed, resp);
    }

    #[test]
    fn read_state_response_roundtrip() {
        let resp = AdsReadStateResponse::new(AdsState::Run, 0);
        let mut buf = Vec::new();
        resp.write_to(&mut buf).unwrap();
        let parsed = AdsReadStateResponse::read_from(&mut &buf[..]).unwrap();
        assert_eq!(parsed, resp);
    }

    #[test]
    fn device_info_response_roundtrip_truncates_name() {
        let resp = AdsDeviceInfoResponse::new(AdsDeviceVersion::new(3, 1, 4024), "Plc30 App");
        let mut buf = Vec::new();
        resp.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), AdsDeviceInfoResponse::LENGTH);
        let parsed = AdsDeviceInfoResponse::read_from(&mut &buf[..]).unwrap();
        assert_eq!(parsed.device_name(), "Plc30 App");
        assert_eq!(parsed.version(), AdsDeviceVersion::new(3, 1, 4024));
    }

    #[test]
    fn add_notification_response_roundtrip() {
        let resp = AdsAddDeviceNotificationResponse::new(AdsReturnCode::Ok, NotificationHandle::new(7));
        let mut buf = Vec::new();
        resp.write_to(&mut buf).unwrap();
        let parsed = AdsAddDeviceNotificationResponse::read_from(&mut &buf[..]).unwrap();
        assert_eq!(parsed, resp);
    }

    #[test]
    fn notification_stream_parses_multiple_stamps_and_samples() {
        let mut buf = Vec::new();
        AdsDeviceNotificationStreamHeader::new(0, 2)
            .write_to(&mut buf)
            .unwrap();
        AdsStampHeader::new(WindowsFileTime::from_raw(100), 1)
            .write_to(&mut buf)
            .unwrap();
        AdsNotificationSampleHeader::new(NotificationHandle::new(1), vec![0x01])
            .write_to(&mut buf)
            .unwrap();
        AdsStampHeader::new(WindowsFileTime::from_raw(200), 1)
            .write_to(&mut buf)
            .unwrap();
        AdsNotificationSampleHeader::new(NotificationHandle::new(2), vec![0x02, 0x03])
            .write_to(&mut buf)
            .unwrap();

        let stream = AdsDeviceNotificationStream::parse(&buf).unwrap();
        assert_eq!(stream.stamps.len(), 2);
        assert_eq!(stream.stamps[0].1[0].handle(), NotificationHandle::new(1));
        assert_eq!(stream.stamps[1].1[0].data(), &[0x02, 0x03]);
    }
}
