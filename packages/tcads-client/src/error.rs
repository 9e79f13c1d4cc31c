//! Client-facing error types.
//!
//! [`ClientError`] is the single error type returned from every public API call. It
//! wraps an [`ErrorKind`] — one variant per kind named in the error-handling design —
//! plus a `trace` of breadcrumbs accumulated as the error crosses component
//! boundaries (transport -> protocol -> engine -> API), added via
//! [`ClientError::with_trace`] rather than lost across a bare `?`.

use std::fmt;
use std::time::Duration;
use tcads_core::ads::AdsReturnCode;
use thiserror::Error;

/// The kind of failure, independent of where it was raised.
#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("malformed frame or unexpected command: {0}")]
    Protocol(String),

    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("target returned ADS error {0:?} ({1:#06x})")]
    Ads(AdsReturnCode, u32),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("operation not valid in current connection state: {0}")]
    State(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("request cancelled: {0}")]
    Cancelled(String),
}

/// An [`ErrorKind`] plus the trace of layers it propagated through.
#[derive(Debug, Error)]
pub struct ClientError {
    pub kind: ErrorKind,
    pub trace: Vec<String>,
}

impl ClientError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            trace: Vec::new(),
        }
    }

    pub fn ads(code: AdsReturnCode) -> Self {
        let raw = u32::from_le_bytes(code.to_bytes());
        Self::new(ErrorKind::Ads(code, raw))
    }

    pub fn timeout(after: Duration) -> Self {
        Self::new(ErrorKind::Timeout(after))
    }

    pub fn state(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::State(msg.into()))
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound(msg.into()))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation(msg.into()))
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cancelled(msg.into()))
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Protocol(msg.into()))
    }

    /// Appends a breadcrumb naming the layer that observed/rethrew this error.
    pub fn with_trace(mut self, layer: impl Into<String>) -> Self {
        self.trace.push(layer.into());
        self
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.trace.is_empty() {
            write!(f, " (via {})", self.trace.join(" -> "))?;
        }
        Ok(())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorKind::Transport(e))
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Validation errors raised by [`crate::config::ClientSettingsBuilder::build`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid interval for {field}: {reason}")]
    InvalidInterval { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_accumulates_in_display_order() {
        let err = ClientError::state("not connected")
            .with_trace("multiplexer")
            .with_trace("client");
        let msg = err.to_string();
        assert!(msg.contains("not connected"));
        assert!(msg.contains("multiplexer -> client"));
    }

    #[test]
    fn ads_error_carries_raw_code() {
        let err = ClientError::ads(AdsReturnCode::AdsErrDeviceNotifyHndInvalid);
        assert!(matches!(
            err.kind,
            ErrorKind::Ads(AdsReturnCode::AdsErrDeviceNotifyHndInvalid, _)
        ));
    }
}
