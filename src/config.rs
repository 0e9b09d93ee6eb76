//! Layered configuration: defaults, then `config.toml`, then `ROLLCALL_*` env vars.

use std::sync::LazyLock;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

const CONFIG_FILE_NAME: &str = "config.toml";
const ENV_PREFIX: &str = "ROLLCALL_";

/// Process-wide configuration, resolved on first access.
///
/// Panics if the configuration sources cannot be parsed; `main` touches it
/// before anything else so a bad config fails fast at startup.
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| match Config::load() {
    Ok(cfg) => cfg,
    Err(e) => panic!("invalid configuration: {e}"),
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    /// Socket address the HTTP server binds to.
    pub listen_addr: String,
    /// sqlx SQLite connection string.
    pub database_url: String,
    /// Fallback log filter when `RUST_LOG` is unset.
    pub loglevel: String,
    /// Master secret for the session cookie key. Must be at least 32 bytes,
    /// otherwise a random per-process key is used.
    pub session_secret: String,
    /// Lifetime of a login session in seconds.
    pub session_ttl_secs: u64,
    /// Drop the `Secure` attribute on the session cookie (plain-HTTP dev setups).
    pub insecure_cookie: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Populate the store with demo accounts, courses and attendance on startup.
    pub seed: bool,
    /// Artificial latency of the simulated recognizer in milliseconds.
    pub recognizer_delay_ms: u64,
    /// Show the canned demo recognition when the recognizer is unavailable.
    pub fallback_on_unavailable: bool,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
            database_url: "sqlite:attendance.db".to_string(),
            loglevel: "info".to_string(),
            session_secret: String::new(),
            session_ttl_secs: 8 * 60 * 60,
            insecure_cookie: false,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed: false,
            recognizer_delay_ms: 1000,
            fallback_on_unavailable: true,
        }
    }
}

impl Config {
    /// Resolve configuration from all sources.
    pub fn load() -> Result<Self, AppError> {
        let cfg = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE_NAME))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;
        Ok(cfg)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.basic.session_ttl_secs)
    }

    pub fn recognizer_delay(&self) -> Duration {
        Duration::from_millis(self.demo.recognizer_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_safe_for_production() {
        let cfg = Config::default();
        assert!(!cfg.demo.seed);
        assert!(!cfg.basic.insecure_cookie);
        assert_eq!(cfg.session_ttl(), Duration::from_secs(28_800));
    }

    #[test]
    fn env_overrides_nested_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ROLLCALL_DEMO__SEED", "true");
            jail.set_env("ROLLCALL_BASIC__LISTEN_ADDR", "127.0.0.1:9000");
            let cfg = Config::load().map_err(|e| e.to_string())?;
            assert!(cfg.demo.seed);
            assert_eq!(cfg.basic.listen_addr, "127.0.0.1:9000");
            Ok(())
        });
    }
}
