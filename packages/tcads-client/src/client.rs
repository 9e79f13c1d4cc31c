//! Public API (C10): composes the connection, multiplexer, notification
//! manager, symbol/type catalog, type engine, handle layer and state monitor
//! into the one type applications hold.

use crate::catalog;
use crate::connection::Connection;
use crate::error::{ClientError, Result};
use crate::events::{Event, EVENT_CHANNEL_CAPACITY};
use crate::handles::{self, ItemResult, ReadItem, ReadWriteItem, WriteItem};
use crate::notification::{NotificationCallback, NotificationManager, NotificationSample, SubscriptionId, SubscriptionSettings};
use crate::state_monitor::{self, StateMonitor, SYSTEM_SERVICE_PORT};
use crate::symbols::{AdsDataType, AdsSymbol, SymbolCache};
use crate::type_engine::{self, EngineOptions, PlcValue};
use crate::config::ClientSettings;
use indexmap::IndexMap;
use std::sync::{Arc, Mutex as SyncMutex};
use tcads_core::ads::{AdsCommand, AdsDeviceVersion, AdsState, IndexGroup, IndexOffset};
use tcads_core::ams::AmsAddr;
use tcads_core::protocol::index_groups;
use tcads_core::protocol::{
    AdsDeviceInfoResponse, AdsReadRequest, AdsReadResponse, AdsReadWriteRequest, AdsWriteControlRequest,
    AdsWriteControlResponse, AdsWriteRequest, AdsWriteResponse,
};
use tokio::sync::{broadcast, mpsc};
use tokio::time::Duration;
use tracing::warn;

/// The client entry point. Cheaply `Clone`able: every clone shares the same
/// connection, notification manager and symbol cache.
#[derive(Clone)]
pub struct Client {
    connection: Connection,
    notifications: Arc<NotificationManager>,
    cache: Arc<SyncMutex<SymbolCache>>,
}

impl Client {
    /// Builds the client and spawns its background tasks (notification
    /// dispatch, state monitor, cache invalidation). The socket isn't opened
    /// until [`Client::connect`] is called.
    pub fn new(settings: ClientSettings) -> Self {
        let (events_tx, _events_rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();
        let connection = Connection::new(settings, events_tx, notify_tx);
        let notifications = NotificationManager::spawn(connection.clone(), notify_rx);
        StateMonitor::spawn(connection.clone());
        let cache = Arc::new(SyncMutex::new(SymbolCache::new()));
        spawn_cache_invalidator(connection.clone(), cache.clone());
        Self { connection, notifications, cache }
    }

    /// Connects, then prefetches the full symbol/data-type catalog if
    /// `read_and_cache_symbols`/`read_and_cache_data_types` ask for it.
    pub async fn connect(&self) -> Result<()> {
        self.connection.connect().await?;
        let (read_symbols, read_data_types) = {
            let settings = self.connection.settings();
            (settings.read_and_cache_symbols, settings.read_and_cache_data_types)
        };
        if read_symbols {
            self.ensure_symbols_cached().await?;
        }
        if read_data_types {
            self.ensure_data_types_cached().await?;
        }
        Ok(())
    }

    /// Unsubscribes everything, then tears down the socket.
    pub async fn disconnect(&self, force: bool) -> Result<()> {
        if !force {
            let _ = self.notifications.unsubscribe_all().await;
        }
        self.connection.disconnect(force).await
    }

    pub async fn reconnect(&self, force: bool) -> Result<()> {
        self.connection.disconnect(force).await?;
        self.connection.connect().await
    }

    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.connection.events()
    }

    pub fn target(&self) -> AmsAddr {
        self.connection.target()
    }

    fn system_addr(&self) -> AmsAddr {
        AmsAddr::new(self.connection.target().net_id(), SYSTEM_SERVICE_PORT)
    }

    fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            objectify_enumerations: self.connection.settings().objectify_enumerations,
            pointer_width: 8,
        }
    }

    // -- Raw read/write -----------------------------------------------------

    pub async fn read_raw(&self, index_group: IndexGroup, index_offset: IndexOffset, size: u32) -> Result<Vec<u8>> {
        let request = AdsReadRequest::new(index_group, index_offset, size);
        let mut payload = Vec::new();
        request.write_to(&mut payload)?;
        let response = self.connection.send_to_target(AdsCommand::AdsRead, payload).await?;
        let parsed = AdsReadResponse::read_from(&mut &response.payload[..])?;
        if !parsed.result().is_success() {
            return Err(ClientError::ads(parsed.result()));
        }
        Ok(parsed.data().to_vec())
    }

    pub async fn write_raw(&self, index_group: IndexGroup, index_offset: IndexOffset, data: Vec<u8>) -> Result<()> {
        let request = AdsWriteRequest::new(index_group, index_offset, data);
        let mut payload = Vec::new();
        request.write_to(&mut payload)?;
        let response = self.connection.send_to_target(AdsCommand::AdsWrite, payload).await?;
        let parsed = AdsWriteResponse::read_from(&mut &response.payload[..])?;
        if !parsed.result().is_success() {
            return Err(ClientError::ads(parsed.result()));
        }
        Ok(())
    }

    pub async fn read_write_raw(
        &self,
        index_group: IndexGroup,
        index_offset: IndexOffset,
        read_length: u32,
        write_data: Vec<u8>,
    ) -> Result<Vec<u8>> {
        let request = AdsReadWriteRequest::new(index_group, index_offset, read_length, write_data);
        let mut payload = Vec::new();
        request.write_to(&mut payload)?;
        let response = self.connection.send_to_target(AdsCommand::AdsReadWrite, payload).await?;
        let parsed = AdsReadResponse::read_from(&mut &response.payload[..])?;
        if !parsed.result().is_success() {
            return Err(ClientError::ads(parsed.result()));
        }
        Ok(parsed.data().to_vec())
    }

    pub async fn read_raw_by_path(&self, path: &str, size: u32) -> Result<Vec<u8>> {
        let target = self.connection.target();
        let handle = handles::create_variable_handle(&self.connection, target, path).await?;
        let result = self.read_raw(index_groups::SYM_VALBYHND, handle, size).await;
        let _ = handles::delete_variable_handle(&self.connection, target, handle).await;
        result
    }

    pub async fn write_raw_by_path(&self, path: &str, data: Vec<u8>) -> Result<()> {
        let target = self.connection.target();
        let handle = handles::create_variable_handle(&self.connection, target, path).await?;
        let result = self.write_raw(index_groups::SYM_VALBYHND, handle, data).await;
        let _ = handles::delete_variable_handle(&self.connection, target, handle).await;
        result
    }

    pub async fn read_raw_by_symbol(&self, symbol: &AdsSymbol) -> Result<Vec<u8>> {
        self.read_raw(symbol.index_group, symbol.index_offset, symbol.size).await
    }

    pub async fn write_raw_by_symbol(&self, symbol: &AdsSymbol, data: Vec<u8>) -> Result<()> {
        self.write_raw(symbol.index_group, symbol.index_offset, data).await
    }

    // -- Value conversion -----------------------------------------------------

    pub async fn convert_from_raw(&self, type_name: &str, bytes: &[u8]) -> Result<PlcValue> {
        let data_type = self.resolve_type(type_name).await?;
        let cache = self.cache.lock().unwrap();
        type_engine::decode(&data_type, bytes, &cache, self.engine_options())
    }

    pub async fn convert_to_raw(&self, type_name: &str, value: &PlcValue, auto_fill: bool) -> Result<Vec<u8>> {
        let data_type = self.resolve_type(type_name).await?;
        type_engine::encode(value, &data_type, auto_fill)
    }

    pub async fn read_value(&self, path: &str) -> Result<PlcValue> {
        let symbol = self.get_symbol(path).await?;
        let data_type = self.resolve_type(&symbol.type_name).await?;
        let raw = self.read_raw_by_symbol(&symbol).await?;
        let cache = self.cache.lock().unwrap();
        type_engine::decode(&data_type, &raw, &cache, self.engine_options())
    }

    pub async fn write_value(&self, path: &str, value: &PlcValue, auto_fill: bool) -> Result<()> {
        let symbol = self.get_symbol(path).await?;
        let data_type = self.resolve_type(&symbol.type_name).await?;
        let bytes = type_engine::encode(value, &data_type, auto_fill)?;
        self.write_raw_by_symbol(&symbol, bytes).await
    }

    /// Resolves `type_name` through pointer/alias indirection (§4.6) before
    /// falling back to a catalog fetch on a cache miss.
    async fn resolve_type(&self, type_name: &str) -> Result<AdsDataType> {
        if let Some(data_type) = self.cache.lock().unwrap().resolve_effective_type(type_name).cloned() {
            return Ok(data_type);
        }
        self.ensure_data_types_cached().await?;
        self.cache
            .lock()
            .unwrap()
            .resolve_effective_type(type_name)
            .cloned()
            .ok_or_else(|| ClientError::not_found(format!("data type `{type_name}` not found")))
    }

    // -- Handles & multi-operations -------------------------------------------

    pub async fn create_variable_handle(&self, path: &str) -> Result<u32> {
        handles::create_variable_handle(&self.connection, self.connection.target(), path).await
    }

    pub async fn delete_variable_handle(&self, handle: u32) -> Result<()> {
        handles::delete_variable_handle(&self.connection, self.connection.target(), handle).await
    }

    pub async fn create_variable_handles_multi(&self, paths: &[&str]) -> Result<Vec<ItemResult<u32>>> {
        handles::create_variable_handles_multi(&self.connection, self.connection.target(), paths).await
    }

    pub async fn delete_variable_handles_multi(&self, handle_list: &[u32]) -> Result<Vec<ItemResult<()>>> {
        handles::delete_variable_handles_multi(&self.connection, self.connection.target(), handle_list).await
    }

    pub async fn read_raw_multi(&self, items: &[ReadItem]) -> Result<Vec<ItemResult<Vec<u8>>>> {
        handles::read_raw_multi(&self.connection, self.connection.target(), items).await
    }

    pub async fn write_raw_multi(&self, items: &[WriteItem]) -> Result<Vec<ItemResult<()>>> {
        handles::write_raw_multi(&self.connection, self.connection.target(), items).await
    }

    pub async fn read_write_raw_multi(&self, items: &[ReadWriteItem]) -> Result<Vec<ItemResult<Vec<u8>>>> {
        handles::read_write_raw_multi(&self.connection, self.connection.target(), items).await
    }

    // -- Symbol/data-type catalog ----------------------------------------------

    pub async fn get_symbol(&self, path: &str) -> Result<AdsSymbol> {
        if let Some(symbol) = self.cache.lock().unwrap().get_symbol(path).cloned() {
            return Ok(symbol);
        }
        if self.connection.settings().read_and_cache_symbols {
            self.ensure_symbols_cached().await?;
            return self
                .cache
                .lock()
                .unwrap()
                .get_symbol(path)
                .cloned()
                .ok_or_else(|| ClientError::not_found(format!("symbol `{path}` not found")));
        }
        let symbol = catalog::read_symbol_by_name(&self.connection, self.connection.target(), path).await?;
        if !self.connection.settings().disable_caching {
            self.cache.lock().unwrap().insert_symbol(symbol.clone());
        }
        Ok(symbol)
    }

    pub async fn get_symbols(&self) -> Result<Vec<AdsSymbol>> {
        self.ensure_symbols_cached().await?;
        Ok(self.cache.lock().unwrap().symbols().cloned().collect())
    }

    pub async fn get_data_type(&self, name: &str) -> Result<AdsDataType> {
        if let Some(data_type) = self.cache.lock().unwrap().get_data_type(name).cloned() {
            return Ok(data_type);
        }
        self.ensure_data_types_cached().await?;
        self.cache
            .lock()
            .unwrap()
            .get_data_type(name)
            .cloned()
            .ok_or_else(|| ClientError::not_found(format!("data type `{name}` not found")))
    }

    pub async fn get_data_types(&self) -> Result<Vec<AdsDataType>> {
        self.ensure_data_types_cached().await?;
        Ok(self.cache.lock().unwrap().data_types().cloned().collect())
    }

    async fn ensure_symbols_cached(&self) -> Result<()> {
        if self.cache.lock().unwrap().symbols_fully_cached() {
            return Ok(());
        }
        let target = self.connection.target();
        let info = catalog::read_upload_info(&self.connection, target).await?;
        let symbols = catalog::read_all_symbols(&self.connection, target, &info).await?;
        let mut cache = self.cache.lock().unwrap();
        for symbol in symbols {
            cache.insert_symbol(symbol);
        }
        cache.mark_symbols_fully_cached();
        Ok(())
    }

    async fn ensure_data_types_cached(&self) -> Result<()> {
        if self.cache.lock().unwrap().data_types_fully_cached() {
            return Ok(());
        }
        let target = self.connection.target();
        let info = catalog::read_upload_info(&self.connection, target).await?;
        let data_types = catalog::read_all_data_types(&self.connection, target, &info).await?;
        let mut cache = self.cache.lock().unwrap();
        for data_type in data_types {
            cache.insert_data_type(data_type);
        }
        cache.mark_data_types_fully_cached();
        Ok(())
    }

    // -- Device/system/runtime state -------------------------------------------

    pub async fn read_device_info(&self) -> Result<(AdsDeviceVersion, String)> {
        let response = self.connection.send_to_target(AdsCommand::AdsReadDeviceInfo, Vec::new()).await?;
        let parsed = AdsDeviceInfoResponse::read_from(&mut &response.payload[..])?;
        Ok((parsed.version(), parsed.device_name().to_string()))
    }

    pub async fn read_tc_system_state(&self) -> Result<AdsState> {
        state_monitor::read_state(&self.connection, self.system_addr()).await
    }

    pub async fn read_plc_runtime_state(&self) -> Result<AdsState> {
        state_monitor::read_state(&self.connection, self.connection.target()).await
    }

    pub async fn read_plc_symbol_version(&self) -> Result<u32> {
        state_monitor::read_symbol_version(&self.connection, self.connection.target()).await
    }

    pub async fn read_plc_upload_info(&self) -> Result<crate::symbols::UploadInfo> {
        catalog::read_upload_info(&self.connection, self.connection.target()).await
    }

    async fn write_control(&self, target: AmsAddr, ads_state: AdsState, device_state: u16) -> Result<()> {
        let request = AdsWriteControlRequest::new(ads_state, device_state, Vec::new());
        let mut payload = Vec::new();
        request.write_to(&mut payload)?;
        let response = self.connection.send(AdsCommand::AdsWriteControl, target, payload).await?;
        let parsed = AdsWriteControlResponse::read_from(&mut &response.payload[..])?;
        if !parsed.result().is_success() {
            return Err(ClientError::ads(parsed.result()));
        }
        Ok(())
    }

    pub async fn start_plc(&self) -> Result<()> {
        self.write_control(self.connection.target(), AdsState::Run, 0).await
    }

    pub async fn stop_plc(&self) -> Result<()> {
        self.write_control(self.connection.target(), AdsState::Stop, 0).await
    }

    pub async fn restart_plc(&self) -> Result<()> {
        self.stop_plc().await?;
        self.start_plc().await
    }

    pub async fn reset_plc(&self) -> Result<()> {
        self.write_control(self.connection.target(), AdsState::Reset, 0).await
    }

    pub async fn set_tc_system_to_config(&self) -> Result<()> {
        self.write_control(self.system_addr(), AdsState::Config, 0).await
    }

    pub async fn set_tc_system_to_run(&self) -> Result<()> {
        self.write_control(self.system_addr(), AdsState::Run, 0).await
    }

    // -- RPC method invocation --------------------------------------------------

    /// Invokes a function block's RPC method. Only primitive (non-struct,
    /// non-array) parameters are supported; the method descriptor comes from
    /// the containing FB's data-type metadata.
    pub async fn invoke_rpc_method(
        &self,
        symbol_path: &str,
        method_name: &str,
        inputs: &IndexMap<String, PlcValue>,
    ) -> Result<IndexMap<String, PlcValue>> {
        let symbol = self.get_symbol(symbol_path).await?;
        let data_type = self.resolve_type(&symbol.type_name).await?;
        let method = data_type
            .rpc_methods
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(method_name))
            .ok_or_else(|| ClientError::not_found(format!("method `{method_name}` not found on `{}`", symbol.type_name)))?;

        let mut write_data = Vec::new();
        for param in method.parameters.iter().filter(|p| !p.is_output) {
            let value = inputs
                .get(&param.name)
                .ok_or_else(|| ClientError::validation(format!("missing input parameter `{}`", param.name)))?;
            write_data.extend(encode_rpc_primitive(&param.type_name, value)?);
        }
        let read_length: u32 =
            method.parameters.iter().filter(|p| p.is_output).map(|p| p.size).sum::<u32>() + method.return_size;

        let target = self.connection.target();
        let handle_path = format!("{symbol_path}.{method_name}(");
        let handle = handles::create_variable_handle(&self.connection, target, &handle_path).await?;
        let data = self.read_write_raw(index_groups::SYM_VALBYHND, handle, read_length, write_data).await;
        let _ = handles::delete_variable_handle(&self.connection, target, handle).await;
        let data = data?;

        let mut outputs = IndexMap::new();
        let mut offset = 0usize;
        for param in method.parameters.iter().filter(|p| p.is_output) {
            let end = offset + param.size as usize;
            let slice = data.get(offset..end).ok_or_else(|| ClientError::protocol("rpc reply shorter than declared output"))?;
            outputs.insert(param.name.clone(), decode_rpc_primitive(&param.type_name, slice)?);
            offset = end;
        }
        if method.return_size > 0 {
            let end = offset + method.return_size as usize;
            let slice = data.get(offset..end).ok_or_else(|| ClientError::protocol("rpc reply shorter than declared return value"))?;
            outputs.insert("returnValue".to_string(), decode_rpc_primitive(&method.return_type_name, slice)?);
        }
        Ok(outputs)
    }

    // -- Subscriptions -----------------------------------------------------------

    pub async fn subscribe_raw(
        &self,
        index_group: IndexGroup,
        index_offset: IndexOffset,
        size: u32,
        send_on_change: bool,
        cycle_time: Duration,
        max_delay: Duration,
        callback: NotificationCallback,
    ) -> Result<SubscriptionId> {
        let settings = SubscriptionSettings {
            target: self.connection.target(),
            index_group,
            index_offset,
            size,
            send_on_change,
            cycle_time,
            max_delay,
        };
        self.notifications.subscribe(settings, callback).await
    }

    pub async fn subscribe_by_path(
        &self,
        path: &str,
        send_on_change: bool,
        cycle_time: Duration,
        max_delay: Duration,
        callback: NotificationCallback,
    ) -> Result<SubscriptionId> {
        let symbol = self.get_symbol(path).await?;
        self.subscribe_raw(
            symbol.index_group,
            symbol.index_offset,
            symbol.size,
            send_on_change,
            cycle_time,
            max_delay,
            callback,
        )
        .await
    }

    /// Like [`Client::subscribe_by_path`], but the callback receives a decoded
    /// [`PlcValue`] instead of raw bytes.
    pub async fn subscribe_value(
        &self,
        path: &str,
        send_on_change: bool,
        cycle_time: Duration,
        max_delay: Duration,
        callback: Box<dyn Fn(PlcValue) + Send + Sync>,
    ) -> Result<SubscriptionId> {
        let symbol = self.get_symbol(path).await?;
        let data_type = self.resolve_type(&symbol.type_name).await?;
        let cache = self.cache.clone();
        let opts = self.engine_options();
        let raw_callback: NotificationCallback = Box::new(move |sample: NotificationSample| {
            let cache_guard = cache.lock().unwrap();
            match type_engine::decode(&data_type, &sample.value, &cache_guard, opts) {
                Ok(value) => callback(value),
                Err(e) => warn!(error = %e, "failed decoding subscribed value"),
            }
        });
        self.subscribe_raw(
            symbol.index_group,
            symbol.index_offset,
            symbol.size,
            send_on_change,
            cycle_time,
            max_delay,
            raw_callback,
        )
        .await
    }

    pub async fn unsubscribe(&self, id: SubscriptionId) -> Result<()> {
        self.notifications.unsubscribe(id).await
    }

    pub async fn unsubscribe_all(&self) -> Result<()> {
        self.notifications.unsubscribe_all().await
    }
}

fn spawn_cache_invalidator(connection: Connection, cache: Arc<SyncMutex<SymbolCache>>) {
    let mut events = connection.events();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(Event::PlcSymbolVersionChange(_)) => {
                    cache.lock().unwrap().invalidate();
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return,
            }
        }
    });
}

/// IEC 61131-3 elementary type names, mapped directly to fixed-width codecs.
/// Used only by [`Client::invoke_rpc_method`], where a parameter's type is
/// named but not resolved through the full data-type catalog.
fn encode_rpc_primitive(type_name: &str, value: &PlcValue) -> Result<Vec<u8>> {
    use crate::type_engine::PlcPrimitive as P;
    let PlcValue::Primitive(primitive) = value else {
        return Err(ClientError::validation(format!(
            "rpc parameter `{type_name}` must be a primitive value"
        )));
    };
    Ok(match (type_name.to_ascii_uppercase().as_str(), primitive) {
        ("BOOL", P::Bool(v)) => vec![*v as u8],
        ("BYTE" | "USINT", P::Byte(v)) => vec![*v],
        ("SINT", P::SByte(v)) => vec![*v as u8],
        ("WORD" | "UINT", P::Word(v)) => v.to_le_bytes().to_vec(),
        ("INT", P::Int(v)) => v.to_le_bytes().to_vec(),
        ("DWORD" | "UDINT", P::DWord(v)) => v.to_le_bytes().to_vec(),
        ("DINT", P::DInt(v)) => v.to_le_bytes().to_vec(),
        ("LWORD" | "ULINT", P::LWord(v)) => v.to_le_bytes().to_vec(),
        ("LINT", P::LInt(v)) => v.to_le_bytes().to_vec(),
        ("REAL", P::Real(v)) => v.to_le_bytes().to_vec(),
        ("LREAL", P::LReal(v)) => v.to_le_bytes().to_vec(),
        ("STRING", P::String(v)) => {
            let (encoded, _, _) = encoding_rs::WINDOWS_1252.encode(v);
            let mut out = encoded.into_owned();
            out.push(0);
            out
        }
        _ => {
            return Err(ClientError::validation(format!(
                "unsupported rpc parameter type `{type_name}`, or value doesn't match it"
            )));
        }
    })
}

fn decode_rpc_primitive(type_name: &str, bytes: &[u8]) -> Result<PlcValue> {
    use crate::type_engine::PlcPrimitive as P;
    let too_short = || ClientError::protocol(format!("rpc value for `{type_name}` is shorter than expected"));
    let primitive = match type_name.to_ascii_uppercase().as_str() {
        "BOOL" => P::Bool(*bytes.first().ok_or_else(too_short)? != 0),
        "BYTE" | "USINT" => P::Byte(*bytes.first().ok_or_else(too_short)?),
        "SINT" => P::SByte(*bytes.first().ok_or_else(too_short)? as i8),
        "WORD" | "UINT" => P::Word(u16::from_le_bytes(bytes.get(0..2).ok_or_else(too_short)?.try_into().unwrap())),
        "INT" => P::Int(i16::from_le_bytes(bytes.get(0..2).ok_or_else(too_short)?.try_into().unwrap())),
        "DWORD" | "UDINT" => P::DWord(u32::from_le_bytes(bytes.get(0..4).ok_or_else(too_short)?.try_into().unwrap())),
        "DINT" => P::DInt(i32::from_le_bytes(bytes.get(0..4).ok_or_else(too_short)?.try_into().unwrap())),
        "LWORD" | "ULINT" => P::LWord(u64::from_le_bytes(bytes.get(0..8).ok_or_else(too_short)?.try_into().unwrap())),
        "LINT" => P::LInt(i64::from_le_bytes(bytes.get(0..8).ok_or_else(too_short)?.try_into().unwrap())),
        "REAL" => P::Real(f32::from_le_bytes(bytes.get(0..4).ok_or_else(too_short)?.try_into().unwrap())),
        "LREAL" => P::LReal(f64::from_le_bytes(bytes.get(0..8).ok_or_else(too_short)?.try_into().unwrap())),
        "STRING" => {
            let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes[..end]);
            P::String(decoded.into_owned())
        }
        other => {
            return Err(ClientError::validation(format!("unsupported rpc value type `{other}`")));
        }
    };
    Ok(PlcValue::Primitive(primitive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcads_core::ams::AmsNetId;

    fn test_settings() -> ClientSettings {
        ClientSettings::builder(AmsNetId::new(192, 168, 4, 1, 1, 1), 851).build().unwrap()
    }

    #[test]
    fn new_client_targets_configured_address() {
        let client = Client::new(test_settings());
        assert_eq!(client.target().port(), 851);
    }

    #[test]
    fn system_addr_shares_net_id_with_target_and_uses_well_known_port() {
        let client = Client::new(test_settings());
        let system_addr = client.system_addr();
        assert_eq!(system_addr.net_id(), client.target().net_id());
        assert_eq!(system_addr.port(), SYSTEM_SERVICE_PORT);
    }

    #[test]
    fn encode_rpc_primitive_rejects_type_mismatch() {
        let err = encode_rpc_primitive("INT", &PlcValue::Primitive(crate::type_engine::PlcPrimitive::Bool(true))).unwrap_err();
        assert!(matches!(err.kind, crate::error::ErrorKind::Validation(_)));
    }

    #[test]
    fn encode_decode_dint_roundtrip() {
        let value = PlcValue::Primitive(crate::type_engine::PlcPrimitive::DInt(-42));
        let bytes = encode_rpc_primitive("DINT", &value).unwrap();
        let decoded = decode_rpc_primitive("DINT", &bytes).unwrap();
        assert_eq!(decoded, value);
    }

    #[tokio::test]
    async fn send_fails_fast_when_not_connected() {
        let client = Client::new(test_settings());
        let err = client.read_raw(0x4020, 0, 2).await.unwrap_err();
        assert!(matches!(err.kind, crate::error::ErrorKind::State(_)));
    }
}
