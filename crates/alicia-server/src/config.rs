//! YAML configuration with environment variable overrides, per the
//! documented config surface: one section per service plus a `data`
//! section selecting the persistence backend. Hostnames are resolved
//! to IPv4 at load time so every listener and advertisement downstream
//! deals in plain `SocketAddr`s.

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    pub address: String,
    pub port: u16,
}

impl ListenConfig {
    pub fn resolve(&self) -> Result<SocketAddr, ConfigError> {
        resolve_host_port(&self.address, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdvertisementConfig {
    pub address: String,
    pub port: u16,
}

impl AdvertisementConfig {
    pub fn resolve(&self) -> Result<SocketAddr, ConfigError> {
        resolve_host_port(&self.address, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LobbyAdvertisements {
    pub ranch: AdvertisementConfig,
    pub race: AdvertisementConfig,
    pub messenger: AdvertisementConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LobbyConfig {
    pub enabled: bool,
    pub listen: ListenConfig,
    pub advertisement: LobbyAdvertisements,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub enabled: bool,
    pub listen: ListenConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    File,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileSourceConfig {
    pub base_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub source: DataSourceKind,
    pub file: FileSourceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    pub brand: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub general: GeneralConfig,
    pub lobby: LobbyConfig,
    pub ranch: ServiceConfig,
    pub race: ServiceConfig,
    pub messenger: ServiceConfig,
    pub data: DataConfig,
}

impl ServerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: ServerConfig = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment overrides applied after file load, matching the
    /// reference's layered `Settings`/`Config` precedence.
    fn apply_env_overrides(&mut self) {
        override_string("LOBBY_SERVER_ADDRESS", &mut self.lobby.listen.address);
        override_port("LOBBY_SERVER_PORT", &mut self.lobby.listen.port);
        override_string("LOBBY_ADVERTISED_RANCH_ADDRESS", &mut self.lobby.advertisement.ranch.address);
        override_port("LOBBY_ADVERTISED_RANCH_PORT", &mut self.lobby.advertisement.ranch.port);
        override_string("LOBBY_ADVERTISED_RACE_ADDRESS", &mut self.lobby.advertisement.race.address);
        override_port("LOBBY_ADVERTISED_RACE_PORT", &mut self.lobby.advertisement.race.port);
        override_string("RANCH_SERVER_ADDRESS", &mut self.ranch.listen.address);
        override_port("RANCH_SERVER_PORT", &mut self.ranch.listen.port);
        override_string("RACE_SERVER_ADDRESS", &mut self.race.listen.address);
        override_port("RACE_SERVER_PORT", &mut self.race.listen.port);
    }
}

fn override_string(var: &str, target: &mut String) {
    if let Ok(value) = std::env::var(var) {
        *target = value;
    }
}

fn override_port(var: &str, target: &mut u16) {
    if let Ok(value) = std::env::var(var) {
        if let Ok(port) = value.parse() {
            *target = port;
        }
    }
}

/// Resolves `host:port` to its first IPv4 address. An IP literal
/// resolves to itself without a DNS round trip; a hostname goes
/// through the system resolver.
fn resolve_host_port(host: &str, port: u16) -> Result<SocketAddr, ConfigError> {
    if let Ok(ip) = host.parse::<std::net::Ipv4Addr>() {
        return Ok(SocketAddr::from((ip, port)));
    }

    (host, port)
        .to_socket_addrs()
        .map_err(|source| ConfigError::Resolve { host: host.to_string(), source })?
        .find(|addr| addr.is_ipv4())
        .ok_or_else(|| ConfigError::NoAddress { host: host.to_string() })
}

/// Packs an IPv4 `SocketAddr` into the wire's network-byte-order `u32`
/// address format used by every `HostAdvertisement`.
pub fn pack_ipv4(addr: SocketAddr) -> u32 {
    match addr {
        SocketAddr::V4(v4) => u32::from_be_bytes(v4.ip().octets()),
        SocketAddr::V6(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ip_literal_resolves_without_dns() {
        let addr = resolve_host_port("127.0.0.1", 8080).unwrap();
        assert_eq!(addr, SocketAddr::from(([127, 0, 0, 1], 8080)));
    }

    #[test]
    fn pack_ipv4_is_network_byte_order() {
        let addr = SocketAddr::from(([10, 0, 0, 1], 0));
        assert_eq!(pack_ipv4(addr), 0x0A00_0001);
    }

    #[test]
    fn env_override_replaces_loaded_port() {
        let yaml = r#"
general:
  brand: "Alicia"
lobby:
  enabled: true
  listen: { address: "0.0.0.0", port: 10000 }
  advertisement:
    ranch: { address: "127.0.0.1", port: 10001 }
    race: { address: "127.0.0.1", port: 10002 }
    messenger: { address: "127.0.0.1", port: 10003 }
ranch:
  enabled: true
  listen: { address: "0.0.0.0", port: 10001 }
race:
  enabled: true
  listen: { address: "0.0.0.0", port: 10002 }
messenger:
  enabled: true
  listen: { address: "0.0.0.0", port: 10004 }
data:
  source: file
  file: { base_path: "./data" }
"#;
        let mut config: ServerConfig = serde_yaml::from_str(yaml).unwrap();
        std::env::set_var("LOBBY_SERVER_PORT", "20000");
        config.apply_env_overrides();
        std::env::remove_var("LOBBY_SERVER_PORT");
        assert_eq!(config.lobby.listen.port, 20000);
    }
}
