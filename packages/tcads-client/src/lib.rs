//! Async client for talking to TwinCAT PLCs over the ADS/AMS protocol.
//!
//! [`client::Client`] is the entry point: build [`config::ClientSettings`] via
//! [`config::ClientSettings::builder`], then [`client::Client::connect`].

pub mod catalog;
pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod events;
pub mod handles;
pub mod multiplexer;
pub mod notification;
pub mod state_monitor;
pub mod symbols;
pub mod type_engine;

pub use client::Client;
pub use config::{ClientSettings, ClientSettingsBuilder};
pub use error::{ClientError, ErrorKind, Result};
pub use events::Event;

pub use tcads_core::{
    ads::{AdsReturnCode, AdsState, IndexGroup, IndexOffset},
    ams::{AmsAddr, AmsNetId, AmsPort},
};
