use super::error::AdsCommandError;

/// The ADS Command ID, identifying the type of an ADS request or response.
///
/// Carried in the [`AdsHeader`](super::header::AdsHeader) once the AMS/TCP
/// command flag indicates a full ADS packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum AdsCommand {
    /// Invalid/unset command.
    #[default]
    Invalid,
    /// Reads device identification, version and name.
    AdsReadDeviceInfo,
    /// Reads data from the ADS device.
    AdsRead,
    /// Writes data to the ADS device.
    AdsWrite,
    /// Reads the ADS and device state.
    AdsReadState,
    /// Changes the ADS or device state.
    AdsWriteControl,
    /// Registers a device notification (a subscription).
    AdsAddDeviceNotification,
    /// Removes a previously registered device notification.
    AdsDeleteDeviceNotification,
    /// A device notification sample pushed by the server.
    AdsDeviceNotification,
    /// Combined write followed by read in a single round trip.
    AdsReadWrite,
    /// An ADS command ID not recognised by this library.
    Unknown(u16),
}

impl AdsCommand {
    /// The length of an `AdsCommand` on the wire.
    pub const LENGTH: usize = 2;

    /// Creates an `AdsCommand` from a 2-byte little-endian array.
    pub fn from_bytes(bytes: [u8; Self::LENGTH]) -> Self {
        Self::from(bytes)
    }

    /// Converts the command to its 2-byte little-endian representation.
    pub fn to_bytes(&self) -> [u8; Self::LENGTH] {
        (*self).into()
    }

    /// Tries to parse an `AdsCommand` from a byte slice.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, AdsCommandError> {
        bytes.try_into()
    }
}

impl From<u16> for AdsCommand {
    fn from(val: u16) -> Self {
        match val {
            0 => Self::Invalid,
            1 => Self::AdsReadDeviceInfo,
            2 => Self::AdsRead,
            3 => Self::AdsWrite,
            4 => Self::AdsReadState,
            5 => Self::AdsWriteControl,
            6 => Self::AdsAddDeviceNotification,
            7 => Self::AdsDeleteDeviceNotification,
            8 => Self::AdsDeviceNotification,
            9 => Self::AdsReadWrite,
            n => Self::Unknown(n),
        }
    }
}

impl From<AdsCommand> for u16 {
    fn from(val: AdsCommand) -> Self {
        match val {
            AdsCommand::Invalid => 0,
            AdsCommand::AdsReadDeviceInfo => 1,
            AdsCommand::AdsRead => 2,
            AdsCommand::AdsWrite => 3,
            AdsCommand::AdsReadState => 4,
            AdsCommand::AdsWriteControl => 5,
            AdsCommand::AdsAddDeviceNotification => 6,
            AdsCommand::AdsDeleteDeviceNotification => 7,
            AdsCommand::AdsDeviceNotification => 8,
            AdsCommand::AdsReadWrite => 9,
            AdsCommand::Unknown(n) => n,
        }
    }
}

impl From<[u8; Self::LENGTH]> for AdsCommand {
    fn from(bytes: [u8; Self::LENGTH]) -> Self {
        u16::from_le_bytes(bytes).into()
    }
}

impl From<AdsCommand> for [u8; AdsCommand::LENGTH] {
    fn from(cmd: AdsCommand) -> Self {
        u16::from(cmd).to_le_bytes()
    }
}

impl TryFrom<&[u8]> for AdsCommand {
    type Error = AdsCommandError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() < Self::LENGTH {
            return Err(AdsCommandError::UnexpectedLength {
                expected: Self::LENGTH,
                got: bytes.len(),
            });
        }
        Ok(Self::from([bytes[0], bytes[1]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ads_command_conversion() {
        assert_eq!(AdsCommand::from(2), AdsCommand::AdsRead);
        assert_eq!(u16::from(AdsCommand::AdsRead), 2);

        assert_eq!(AdsCommand::from(9), AdsCommand::AdsReadWrite);
        assert_eq!(u16::from(AdsCommand::AdsReadWrite), 9);

        assert_eq!(AdsCommand::from(42), AdsCommand::Unknown(42));
    }

    #[test]
    fn test_ads_command_bytes_roundtrip() {
        let cmd = AdsCommand::AdsAddDeviceNotification;
        let bytes = cmd.to_bytes();
        assert_eq!(bytes, [6, 0]);
        assert_eq!(AdsCommand::from_bytes(bytes), cmd);
    }

    #[test]
    fn test_try_from_slice_too_short() {
        let err = AdsCommand::try_from_slice(&[9]).unwrap_err();
        assert!(matches!(
            err,
            AdsCommandError::UnexpectedLength {
                expected: 2,
                got: 1
            }
        ));
    }
}
