//! Shop API client configuration.
//!
//! Holds the shop credentials and the options handed to the transport.
//! Credentials have no defaults: the shop ID, shop password and host must
//! all be supplied, either explicitly or through the environment.

use std::time::Duration;

use url::Url;
use zeroize::Zeroizing;

use crate::transport::TransportOptions;

/// Shop credentials. Immutable once built.
///
/// Custom `Debug` implementation redacts the `shop_pass` field
/// to prevent credential leakage in log output. The password is zeroized on
/// drop here and in the per-request [`Params`](crate::params::Params) copy;
/// the encoded request body built by the HTTP transport is not.
#[derive(Clone)]
pub struct Credentials {
    shop_id: String,
    shop_pass: Zeroizing<String>,
    host: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("shop_id", &self.shop_id)
            .field("shop_pass", &"[REDACTED]")
            .field("host", &self.host)
            .finish()
    }
}

impl Credentials {
    /// Build credentials, rejecting empty values.
    ///
    /// Every missing value is reported in one error.
    pub fn new(
        shop_id: impl Into<String>,
        shop_pass: impl Into<String>,
        host: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let shop_id = shop_id.into();
        let shop_pass = Zeroizing::new(shop_pass.into());
        let host = host.into().trim().to_string();

        let missing: Vec<&'static str> = [
            ("shop_id", shop_id.is_empty()),
            ("shop_pass", shop_pass.is_empty()),
            ("host", host.is_empty()),
        ]
        .into_iter()
        .filter_map(|(name, empty)| empty.then_some(name))
        .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingCredentials(missing));
        }

        Ok(Self {
            shop_id,
            shop_pass,
            host,
        })
    }

    pub fn shop_id(&self) -> &str {
        &self.shop_id
    }

    pub fn shop_pass(&self) -> &str {
        self.shop_pass.as_str()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Base URL every endpoint hangs off: `{host}/payment/`.
    ///
    /// A bare host gets `https://`. A host that already carries a scheme is
    /// used as-is, which lets tests point the client at a local mock.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let root = if self.host.contains("://") {
            self.host.clone()
        } else {
            format!("https://{}", self.host)
        };
        let with_path = format!("{}/payment/", root.trim_end_matches('/'));
        Url::parse(&with_path)
            .map_err(|e| ConfigError::InvalidHost(self.host.clone(), e.to_string()))
    }
}

/// Configuration for connecting to the Shop API.
#[derive(Debug, Clone)]
pub struct ShopApiConfig {
    pub credentials: Credentials,
    pub transport: TransportOptions,
}

impl ShopApiConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            transport: TransportOptions::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `GMO_SHOP_ID` (required)
    /// - `GMO_SHOP_PASS` (required)
    /// - `GMO_HOST` (required, e.g. `pt01.mul-pay.jp`)
    /// - `GMO_TIMEOUT_SECS` (default: 30)
    /// - `GMO_CONNECT_TIMEOUT_SECS` (default: 10)
    /// - `GMO_ACCEPT_INVALID_CERTS` (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        let shop_id = std::env::var("GMO_SHOP_ID").unwrap_or_default();
        let shop_pass = std::env::var("GMO_SHOP_PASS").unwrap_or_default();
        let host = std::env::var("GMO_HOST").unwrap_or_default();
        let credentials = Credentials::new(shop_id, shop_pass, host).map_err(|e| match e {
            ConfigError::MissingCredentials(fields) => ConfigError::MissingCredentials(
                fields.into_iter().map(env_var_for).collect(),
            ),
            other => other,
        })?;
        credentials.base_url()?;

        let defaults = TransportOptions::default();
        Ok(Self {
            credentials,
            transport: TransportOptions {
                timeout: env_secs("GMO_TIMEOUT_SECS", defaults.timeout)?,
                connect_timeout: env_secs("GMO_CONNECT_TIMEOUT_SECS", defaults.connect_timeout)?,
                accept_invalid_certs: env_bool(
                    "GMO_ACCEPT_INVALID_CERTS",
                    defaults.accept_invalid_certs,
                )?,
            },
        })
    }

    /// Create a configuration pointing at a local mock server (for testing).
    pub fn local_mock(uri: &str) -> Result<Self, ConfigError> {
        let credentials = Credentials::new("test-shop", "test-pass", uri)?;
        credentials.base_url()?;
        Ok(Self {
            credentials,
            transport: TransportOptions {
                timeout: Duration::from_secs(5),
                connect_timeout: Duration::from_secs(2),
                accept_invalid_certs: false,
            },
        })
    }

    pub fn with_transport_options(mut self, options: TransportOptions) -> Self {
        self.transport = options;
        self
    }
}

fn env_var_for(field: &'static str) -> &'static str {
    match field {
        "shop_id" => "GMO_SHOP_ID",
        "shop_pass" => "GMO_SHOP_PASS",
        "host" => "GMO_HOST",
        other => other,
    }
}

fn env_secs(var: &str, default: Duration) -> Result<Duration, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidValue(var.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

fn env_bool(var: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidValue(var.to_string(), raw)),
        },
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing shop credentials: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),
    #[error("invalid host {0}: {1}")]
    InvalidHost(String, String),
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(String, String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
