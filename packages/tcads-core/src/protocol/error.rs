/// Errors raised while parsing an ADS payload or router-protocol payload.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("buffer too small for {item}: expected at least {expected} bytes, found {found}")]
    TooSmall {
        item: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("declared length {declared} does not match available payload length {available}")]
    LengthMismatch { declared: usize, available: usize },

    #[error("invalid ADS command for this payload: {0:?}")]
    UnexpectedCommand(crate::ads::AdsCommand),
}
