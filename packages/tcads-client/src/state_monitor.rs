//! State monitor (C9): periodic liveness/state polling against the TwinCAT
//! system service and the target PLC runtime.
//!
//! Runs independently of C3's socket-level reconnect: the socket can stay
//! open while the remote stops answering (a half-open connection), so this
//! module tracks its own "last-seen" timestamp and forces a reconnect through
//! [`Connection::report_unresponsive`] once it goes stale.

use crate::connection::{Connection, ConnectionState};
use crate::error::{ClientError, Result};
use crate::events::{Event, Transition};
use tcads_core::ads::{AdsCommand, AdsState};
use tcads_core::ams::{AmsAddr, AmsPort};
use tcads_core::protocol::index_groups;
use tcads_core::protocol::{AdsReadRequest, AdsReadResponse, AdsReadStateResponse};
use tokio::time::Instant;
use tracing::warn;

/// Well-known AMS port of the TwinCAT system service, queried for the overall
/// TwinCAT system state independently of the target PLC runtime's own port.
pub(crate) const SYSTEM_SERVICE_PORT: AmsPort = 10000;

pub struct StateMonitor;

impl StateMonitor {
    /// Spawns the monitor loop. A no-op in raw-client mode, which wires only
    /// the transport and nothing above it.
    pub fn spawn(connection: Connection) {
        if connection.settings().raw_client {
            return;
        }
        tokio::spawn(run(connection));
    }
}

async fn run(connection: Connection) {
    let system_addr = AmsAddr::new(connection.target().net_id(), SYSTEM_SERVICE_PORT);
    let plc_addr = connection.target();
    let monitor_symbol_version = connection.settings().monitor_plc_symbol_version;

    let mut last_seen = Instant::now();
    let mut tc_system_state: Option<AdsState> = None;
    let mut plc_runtime_state: Option<AdsState> = None;
    let mut symbol_version: Option<u32> = None;

    loop {
        tokio::time::sleep(connection.settings().connection_check_interval).await;
        if connection.state() != ConnectionState::Connected {
            last_seen = Instant::now();
            continue;
        }

        let mut any_reply = false;

        match read_state(&connection, system_addr).await {
            Ok(state) => {
                any_reply = true;
                if tc_system_state != Some(state) {
                    let previous = tc_system_state.unwrap_or(state);
                    tc_system_state = Some(state);
                    connection.emit_event(Event::TcSystemStateChange(Transition::new(previous, state)));
                }
            }
            Err(e) => warn!(error = %e, "system-service state poll failed"),
        }

        match read_state(&connection, plc_addr).await {
            Ok(state) => {
                any_reply = true;
                if plc_runtime_state != Some(state) {
                    let previous = plc_runtime_state.unwrap_or(state);
                    plc_runtime_state = Some(state);
                    connection.emit_event(Event::PlcRuntimeStateChange(Transition::new(previous, state)));
                }
            }
            Err(e) => warn!(error = %e, "plc runtime state poll failed"),
        }

        if monitor_symbol_version {
            match read_symbol_version(&connection, plc_addr).await {
                Ok(version) => {
                    any_reply = true;
                    if symbol_version != Some(version) {
                        let previous = symbol_version.unwrap_or(version);
                        symbol_version = Some(version);
                        connection.emit_event(Event::PlcSymbolVersionChange(Transition::new(previous, version)));
                    }
                }
                Err(e) => warn!(error = %e, "symbol version poll failed"),
            }
        }

        if any_reply {
            last_seen = Instant::now();
        } else if last_seen.elapsed() > connection.settings().connection_down_delay {
            warn!("no response from target within connection_down_delay; forcing reconnect");
            connection.report_unresponsive().await;
            last_seen = Instant::now();
        }
    }
}

pub(crate) async fn read_state(connection: &Connection, target: AmsAddr) -> Result<AdsState> {
    let response = connection.send(AdsCommand::AdsReadState, target, Vec::new()).await?;
    let parsed = AdsReadStateResponse::read_from(&mut &response.payload[..])?;
    Ok(parsed.ads_state())
}

pub(crate) async fn read_symbol_version(connection: &Connection, target: AmsAddr) -> Result<u32> {
    let request = AdsReadRequest::new(index_groups::SYM_VERSION, 0, 4);
    let mut payload = Vec::new();
    request.write_to(&mut payload)?;
    let response = connection.send(AdsCommand::AdsRead, target, payload).await?;
    let parsed = AdsReadResponse::read_from(&mut &response.payload[..])?;
    if !parsed.result().is_success() {
        return Err(ClientError::ads(parsed.result()));
    }
    if parsed.data().len() < 4 {
        return Err(ClientError::protocol("symbol-version response shorter than 4 bytes"));
    }
    Ok(u32::from_le_bytes(parsed.data()[0..4].try_into().unwrap()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcads_core::ams::AmsNetId;

    #[test]
    fn system_service_port_is_well_known() {
        assert_eq!(SYSTEM_SERVICE_PORT, 10000);
    }

    #[test]
    fn system_addr_shares_net_id_with_target() {
        let target = AmsAddr::new(AmsNetId::new(192, 168, 4, 1, 1, 1), 851);
        let system_addr = AmsAddr::new(target.net_id(), SYSTEM_SERVICE_PORT);
        assert_eq!(system_addr.net_id(), target.net_id());
        assert_eq!(system_addr.port(), SYSTEM_SERVICE_PORT);
    }
}
