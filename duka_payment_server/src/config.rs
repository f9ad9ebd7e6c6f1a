//! Server configuration.
//!
//! All configuration is read from environment variables (a `.env` file is honoured in development). Every value
//! has a default, so a bare `duka_payment_server` invocation starts against a local SQLite file and the SwiftPesa
//! sandbox.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `DUKA_HOST` | `127.0.0.1` | Interface to bind the HTTP server to |
//! | `DUKA_PORT` | `8480` | Port to bind the HTTP server to |
//! | `DUKA_DATABASE_URL` | `sqlite://data/duka_store.db` | SQLite connection string |
//! | `DUKA_GATEWAY_TIMEOUT_SECS` | `30` | Deadline for any single SwiftPesa call |
//! | `DUKA_ORDER_SYNC_INTERVAL_SECS` | `300` | Interval of the background order-sync sweep |
//! | `SWIFTPESA_API_URL`, `SWIFTPESA_API_KEY`, `SWIFTPESA_MERCHANT_ID` | sandbox values | Gateway credentials |

use std::{env, time::Duration};

use log::*;
use swiftpesa_tools::SwiftPesaConfig;

const DEFAULT_DUKA_HOST: &str = "127.0.0.1";
const DEFAULT_DUKA_PORT: u16 = 8480;
const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_ORDER_SYNC_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Deadline applied to every outbound gateway call. A timed-out call means "status unknown", never a failed
    /// payment.
    pub gateway_timeout: Duration,
    /// How often the background sweep re-applies the order-side effect of completed payments.
    pub order_sync_interval: Duration,
    /// SwiftPesa gateway credentials.
    pub swiftpesa_config: SwiftPesaConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DUKA_HOST.to_string(),
            port: DEFAULT_DUKA_PORT,
            database_url: String::default(),
            gateway_timeout: DEFAULT_GATEWAY_TIMEOUT,
            order_sync_interval: DEFAULT_ORDER_SYNC_INTERVAL,
            swiftpesa_config: SwiftPesaConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("DUKA_HOST").ok().unwrap_or_else(|| DEFAULT_DUKA_HOST.into());
        let port = env::var("DUKA_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for DUKA_PORT. {e} Using the default, {DEFAULT_DUKA_PORT}, \
                         instead."
                    );
                    DEFAULT_DUKA_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_DUKA_PORT);
        let database_url = env::var("DUKA_DATABASE_URL").unwrap_or_else(|_| {
            warn!("🪛️ DUKA_DATABASE_URL is not set. Using a local SQLite database.");
            "sqlite://data/duka_store.db".to_string()
        });
        let gateway_timeout = duration_from_env("DUKA_GATEWAY_TIMEOUT_SECS", DEFAULT_GATEWAY_TIMEOUT);
        let order_sync_interval = duration_from_env("DUKA_ORDER_SYNC_INTERVAL_SECS", DEFAULT_ORDER_SYNC_INTERVAL);
        let swiftpesa_config = SwiftPesaConfig::new_from_env_or_default();
        Self { host, port, database_url, gateway_timeout, order_sync_interval, swiftpesa_config }
    }
}

fn duration_from_env(var: &str, default: Duration) -> Duration {
    env::var(var)
        .map(|s| {
            s.parse::<u64>().map(Duration::from_secs).unwrap_or_else(|e| {
                error!("🪛️ {s} is not a valid number of seconds for {var}. {e} Using {}s instead.", default.as_secs());
                default
            })
        })
        .ok()
        .unwrap_or(default)
}
