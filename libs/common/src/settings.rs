//! Service-level settings and logging bootstrap
//!
//! Settings are layered: built-in defaults, then an optional
//! `config/{service}.toml`, then `VIDORA_{SERVICE}_*` environment variables
//! (e.g. `VIDORA_API_PORT=8080`).

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Bind address and logging settings of one service
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl ServiceConfig {
    /// Load the settings of `service`, defaulting to `0.0.0.0:{default_port}`
    pub fn load(service: &str, default_port: u16) -> Result<Self, config::ConfigError> {
        let prefix = format!("VIDORA_{}", service.to_ascii_uppercase());

        config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(default_port))?
            .set_default("log_level", "info")?
            .add_source(config::File::with_name(&format!("config/{}", service)).required(false))
            .add_source(
                config::Environment::with_prefix(&prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Socket address string for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_level` when set.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults() {
        unsafe {
            std::env::remove_var("VIDORA_TESTSVC_PORT");
            std::env::remove_var("VIDORA_TESTSVC_HOST");
        }

        let config = ServiceConfig::load("testsvc", 3001).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3001);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.bind_address(), "0.0.0.0:3001");
    }

    #[test]
    #[serial]
    fn test_environment_overrides() {
        unsafe {
            std::env::set_var("VIDORA_TESTSVC_PORT", "8080");
            std::env::set_var("VIDORA_TESTSVC_HOST", "127.0.0.1");
        }

        let config = ServiceConfig::load("testsvc", 3001).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");

        unsafe {
            std::env::remove_var("VIDORA_TESTSVC_PORT");
            std::env::remove_var("VIDORA_TESTSVC_HOST");
        }
    }
}
