//! Application configuration. Listen address, session store, webhook client.

use crate::adapters::integrations::DEFAULT_WEBHOOK_TIMEOUT;
use crate::usecases::budget_agent::DEFAULT_CURRENCY_SYMBOL;
use crate::usecases::ledger_service::DEFAULT_SESSION_TTL;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_STORE_URL: &str = "memory://";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Bind address. Read from BUDGET_HOST.
    #[serde(default)]
    pub host: Option<String>,

    /// Listen port. Read from PORT (or BUDGET_PORT).
    #[serde(default)]
    pub port: Option<u16>,

    /// Session store URL: `memory://` or `sqlite://<path>`.
    /// Read from STORE_URL (or BUDGET_STORE_URL).
    #[serde(default)]
    pub store_url: Option<String>,

    /// Timeout for push-notification requests, in seconds. Read from BUDGET_WEBHOOK_TIMEOUT_SECS.
    #[serde(default)]
    pub webhook_timeout_secs: Option<u64>,

    /// Lifetime of an idle session key, in seconds. Read from BUDGET_SESSION_TTL_SECS.
    #[serde(default)]
    pub session_ttl_secs: Option<u64>,

    /// Currency sign used in replies. Read from BUDGET_CURRENCY_SYMBOL.
    #[serde(default)]
    pub currency_symbol: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("BUDGET"));
        if let Ok(path) = std::env::var("BUDGET_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        cfg.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// PORT and STORE_URL are read without the BUDGET_ prefix so the usual
    /// platform variables work. Unparseable values are ignored.
    pub fn apply_env_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(port) = get("PORT").and_then(|s| s.trim().parse::<u16>().ok()) {
            self.port = Some(port);
        }
        if let Some(url) = get("STORE_URL").filter(|s| !s.trim().is_empty()) {
            self.store_url = Some(url);
        }
    }

    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Socket address to bind. Falls back to 0.0.0.0 when BUDGET_HOST is not an IP.
    pub fn listen_addr(&self) -> SocketAddr {
        let ip = self
            .host
            .as_deref()
            .and_then(|h| h.parse::<IpAddr>().ok())
            .unwrap_or_else(|| IpAddr::from([0, 0, 0, 0]));
        SocketAddr::new(ip, self.port_or_default())
    }

    pub fn store_url_or_default(&self) -> String {
        self.store_url
            .clone()
            .unwrap_or_else(|| DEFAULT_STORE_URL.to_string())
    }

    /// Defaults to 10 seconds.
    pub fn webhook_timeout(&self) -> Duration {
        self.webhook_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_WEBHOOK_TIMEOUT)
    }

    /// Defaults to seven days.
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SESSION_TTL)
    }

    pub fn currency_symbol_or_default(&self) -> String {
        self.currency_symbol
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.listen_addr(), "0.0.0.0:5001".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.store_url_or_default(), DEFAULT_STORE_URL);
        assert_eq!(cfg.webhook_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.session_ttl(), Duration::from_secs(604_800));
        assert_eq!(cfg.currency_symbol_or_default(), "₦");
    }

    #[test]
    fn test_unprefixed_overrides() {
        let env: HashMap<&str, &str> = [("PORT", "8080"), ("STORE_URL", "sqlite://./b.db")]
            .into_iter()
            .collect();
        let mut cfg = AppConfig {
            host: Some("127.0.0.1".into()),
            port: Some(9000),
            ..Default::default()
        };
        cfg.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.listen_addr(), "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.store_url_or_default(), "sqlite://./b.db");
    }

    #[test]
    fn test_bad_port_is_ignored() {
        let mut cfg = AppConfig::default();
        cfg.apply_env_overrides(|k| (k == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(cfg.port_or_default(), DEFAULT_PORT);
    }
}
