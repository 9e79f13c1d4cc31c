//! Client configuration: a validated, strongly-typed settings object built through
//! [`ClientSettingsBuilder`]. The client itself never reads files or environment
//! variables — that responsibility stays with the application embedding this crate.

use crate::error::ConfigError;
use std::net::IpAddr;
use std::time::Duration;
use tcads_core::ams::{AmsNetId, AmsPort};

/// Validated, immutable client settings. Construct via [`ClientSettingsBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClientSettings {
    pub target_ams_net_id: AmsNetId,
    pub target_ads_port: AmsPort,

    pub router_address: IpAddr,
    pub router_tcp_port: u16,

    pub local_ams_net_id: Option<AmsNetId>,
    pub local_ads_port: Option<AmsPort>,

    pub timeout_delay: Duration,

    pub auto_reconnect: bool,
    pub reconnect_interval: Duration,

    pub objectify_enumerations: bool,
    pub convert_dates_to_chrono: bool,

    pub read_and_cache_symbols: bool,
    pub read_and_cache_data_types: bool,

    pub monitor_plc_symbol_version: bool,

    pub hide_console_warnings: bool,

    pub connection_check_interval: Duration,
    pub connection_down_delay: Duration,

    pub allow_half_open: bool,
    pub raw_client: bool,
    pub disable_caching: bool,
    pub delete_unknown_subscriptions: bool,
}

impl ClientSettings {
    /// Starts a builder for connecting to `target` on the default local router.
    pub fn builder(target_ams_net_id: AmsNetId, target_ads_port: AmsPort) -> ClientSettingsBuilder {
        ClientSettingsBuilder::new(target_ams_net_id, target_ads_port)
    }
}

/// Builder for [`ClientSettings`] with the documented defaults pre-filled.
#[derive(Debug, Clone)]
pub struct ClientSettingsBuilder {
    target_ams_net_id: AmsNetId,
    target_ads_port: AmsPort,
    router_address: IpAddr,
    router_tcp_port: u16,
    local_ams_net_id: Option<AmsNetId>,
    local_ads_port: Option<AmsPort>,
    timeout_delay: Duration,
    auto_reconnect: bool,
    reconnect_interval: Duration,
    objectify_enumerations: bool,
    convert_dates_to_chrono: bool,
    read_and_cache_symbols: bool,
    read_and_cache_data_types: bool,
    monitor_plc_symbol_version: bool,
    hide_console_warnings: bool,
    connection_check_interval: Duration,
    connection_down_delay: Duration,
    allow_half_open: bool,
    raw_client: bool,
    disable_caching: bool,
    delete_unknown_subscriptions: bool,
}

impl ClientSettingsBuilder {
    pub fn new(target_ams_net_id: AmsNetId, target_ads_port: AmsPort) -> Self {
        Self {
            target_ams_net_id,
            target_ads_port,
            router_address: IpAddr::from([127, 0, 0, 1]),
            router_tcp_port: 48898,
            local_ams_net_id: None,
            local_ads_port: None,
            timeout_delay: Duration::from_millis(2000),
            auto_reconnect: true,
            reconnect_interval: Duration::from_millis(2000),
            objectify_enumerations: true,
            convert_dates_to_chrono: true,
            read_and_cache_symbols: false,
            read_and_cache_data_types: false,
            monitor_plc_symbol_version: true,
            hide_console_warnings: false,
            connection_check_interval: Duration::from_millis(1000),
            connection_down_delay: Duration::from_millis(5000),
            allow_half_open: false,
            raw_client: false,
            disable_caching: false,
            delete_unknown_subscriptions: false,
        }
    }

    pub fn router_address(mut self, address: IpAddr) -> Self {
        self.router_address = address;
        self
    }

    pub fn router_tcp_port(mut self, port: u16) -> Self {
        self.router_tcp_port = port;
        self
    }

    pub fn local_identity(mut self, net_id: AmsNetId, port: AmsPort) -> Self {
        self.local_ams_net_id = Some(net_id);
        self.local_ads_port = Some(port);
        self
    }

    pub fn timeout_delay(mut self, timeout: Duration) -> Self {
        self.timeout_delay = timeout;
        self
    }

    pub fn auto_reconnect(mut self, enabled: bool) -> Self {
        self.auto_reconnect = enabled;
        self
    }

    pub fn reconnect_interval(mut self, interval: Duration) -> Self {
        self.reconnect_interval = interval;
        self
    }

    pub fn objectify_enumerations(mut self, enabled: bool) -> Self {
        self.objectify_enumerations = enabled;
        self
    }

    pub fn convert_dates_to_chrono(mut self, enabled: bool) -> Self {
        self.convert_dates_to_chrono = enabled;
        self
    }

    pub fn read_and_cache_symbols(mut self, enabled: bool) -> Self {
        self.read_and_cache_symbols = enabled;
        self
    }

    pub fn read_and_cache_data_types(mut self, enabled: bool) -> Self {
        self.read_and_cache_data_types = enabled;
        self
    }

    pub fn monitor_plc_symbol_version(mut self, enabled: bool) -> Self {
        self.monitor_plc_symbol_version = enabled;
        self
    }

    pub fn hide_console_warnings(mut self, enabled: bool) -> Self {
        self.hide_console_warnings = enabled;
        self
    }

    pub fn connection_check_interval(mut self, interval: Duration) -> Self {
        self.connection_check_interval = interval;
        self
    }

    pub fn connection_down_delay(mut self, delay: Duration) -> Self {
        self.connection_down_delay = delay;
        self
    }

    pub fn allow_half_open(mut self, enabled: bool) -> Self {
        self.allow_half_open = enabled;
        self
    }

    pub fn raw_client(mut self, enabled: bool) -> Self {
        self.raw_client = enabled;
        self
    }

    pub fn disable_caching(mut self, enabled: bool) -> Self {
        self.disable_caching = enabled;
        self
    }

    pub fn delete_unknown_subscriptions(mut self, enabled: bool) -> Self {
        self.delete_unknown_subscriptions = enabled;
        self
    }

    pub fn build(self) -> Result<ClientSettings, ConfigError> {
        if self.target_ads_port == 0 {
            return Err(ConfigError::MissingField("target_ads_port"));
        }
        if self.auto_reconnect && self.reconnect_interval.is_zero() {
            return Err(ConfigError::InvalidInterval {
                field: "reconnect_interval",
                reason: "must be non-zero when auto_reconnect is enabled".into(),
            });
        }
        if !self.raw_client && self.connection_check_interval.is_zero() {
            return Err(ConfigError::InvalidInterval {
                field: "connection_check_interval",
                reason: "must be non-zero unless raw_client is enabled".into(),
            });
        }
        if self.connection_down_delay < self.connection_check_interval {
            return Err(ConfigError::InvalidInterval {
                field: "connection_down_delay",
                reason: "must be at least connection_check_interval".into(),
            });
        }

        Ok(ClientSettings {
            target_ams_net_id: self.target_ams_net_id,
            target_ads_port: self.target_ads_port,
            router_address: self.router_address,
            router_tcp_port: self.router_tcp_port,
            local_ams_net_id: self.local_ams_net_id,
            local_ads_port: self.local_ads_port,
            timeout_delay: self.timeout_delay,
            auto_reconnect: self.auto_reconnect,
            reconnect_interval: self.reconnect_interval,
            objectify_enumerations: self.objectify_enumerations,
            convert_dates_to_chrono: self.convert_dates_to_chrono,
            read_and_cache_symbols: self.read_and_cache_symbols,
            read_and_cache_data_types: self.read_and_cache_data_types,
            monitor_plc_symbol_version: self.monitor_plc_symbol_version,
            hide_console_warnings: self.hide_console_warnings,
            connection_check_interval: self.connection_check_interval,
            connection_down_delay: self.connection_down_delay,
            allow_half_open: self.allow_half_open,
            raw_client: self.raw_client,
            disable_caching: self.disable_caching,
            delete_unknown_subscriptions: self.delete_unknown_subscriptions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net_id() -> AmsNetId {
        AmsNetId::new(192, 168, 4, 1, 1, 1)
    }

    #[test]
    fn defaults_match_documented_values() {
        let settings = ClientSettings::builder(net_id(), 851).build().unwrap();
        assert_eq!(settings.router_tcp_port, 48898);
        assert_eq!(settings.timeout_delay, Duration::from_millis(2000));
        assert!(settings.auto_reconnect);
        assert!(settings.monitor_plc_symbol_version);
    }

    #[test]
    fn rejects_zero_ads_port() {
        let err = ClientSettings::builder(net_id(), 0).build().unwrap_err();
        assert_eq!(err, ConfigError::MissingField("target_ads_port"));
    }

    #[test]
    fn rejects_zero_reconnect_interval_when_auto_reconnect_enabled() {
        let err = ClientSettings::builder(net_id(), 851)
            .reconnect_interval(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInterval { field: "reconnect_interval", .. }));
    }

    #[test]
    fn rejects_down_delay_shorter_than_check_interval() {
        let err = ClientSettings::builder(net_id(), 851)
            .connection_check_interval(Duration::from_millis(2000))
            .connection_down_delay(Duration::from_millis(500))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInterval { field: "connection_down_delay", .. }));
    }

    #[test]
    fn builder_chains_overrides() {
        let settings = ClientSettings::builder(net_id(), 851)
            .auto_reconnect(false)
            .raw_client(true)
            .build()
            .unwrap();
        assert!(!settings.auto_reconnect);
        assert!(settings.raw_client);
    }
}
