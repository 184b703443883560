//! # gmo-shop-api -- Typed Rust client for the GMO Payment Gateway Shop API
//!
//! Covers the shop-authenticated (`*.idPass`) operations:
//! - **Credit card** entry, execution, alteration, amount change, lookup
//! - **Convenience store** and **Pay-easy** payments
//! - **LINE Pay**
//! - **Carrier billing** (SoftBank, au, docomo), one-off and continuance
//! - **Recurring credit card** registration and lookup
//!
//! ## Architecture
//!
//! Operations are rows in a static [`catalog`]: endpoint, required fields,
//! and derivation rules. The [`engine`] interprets any row generically, so
//! there is no per-operation logic. [`ShopClient`] exposes one async method
//! per row on top of it.
//!
//! Every call ends in exactly one of: a success [`ApiResponse`], or a
//! [`ShopApiError`] tagged as a missing-parameter, transport or business
//! failure. Business failures are responses carrying `ErrInfo`; see
//! [`ApiError`].
//!
//! ## Example
//!
//! ```no_run
//! use gmo_shop_api::{Field, Params, ShopApiConfig, ShopClient};
//!
//! # async fn run() -> Result<(), gmo_shop_api::ShopApiError> {
//! let client = ShopClient::new(ShopApiConfig::from_env()?)?;
//! let entry = client
//!     .entry_tran(
//!         Params::new()
//!             .with(Field::OrderId, "order-100")
//!             .with(Field::JobCd, "AUTH")
//!             .with(Field::Amount, 100),
//!     )
//!     .await?;
//! println!("AccessID: {:?}", entry.get("AccessID"));
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
mod operations;
pub mod params;
pub mod response;
pub mod transport;

pub use catalog::{Operation, OperationContract};
pub use config::{ConfigError, Credentials, ShopApiConfig};
pub use engine::RequestEngine;
pub use error::{ApiError, MissingParameterError, ShopApiError};
pub use http::HttpTransport;
pub use params::{Field, ParamValue, Params};
pub use response::{ApiResponse, ResponseFields};
pub use transport::{MockTransport, Transport, TransportError, TransportOptions, Verb};

/// Top-level Shop API client.
///
/// Cheap to clone when the transport is; safe to share across tasks.
#[derive(Debug, Clone)]
pub struct ShopClient<T = HttpTransport> {
    engine: RequestEngine<T>,
}

impl ShopClient<HttpTransport> {
    /// Create a client that talks HTTP to the configured host.
    pub fn new(config: ShopApiConfig) -> Result<Self, ShopApiError> {
        let base_url = config.credentials.base_url()?;
        let transport = HttpTransport::new(base_url, &config.transport)?;
        tracing::info!(
            shop_id = config.credentials.shop_id(),
            host = config.credentials.host(),
            "Shop API client configured"
        );
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> ShopClient<T> {
    /// Create a client over any transport.
    pub fn with_transport(config: ShopApiConfig, transport: T) -> Self {
        Self {
            engine: RequestEngine::from_config(config, transport),
        }
    }

    pub fn engine(&self) -> &RequestEngine<T> {
        &self.engine
    }

    /// Run any catalog operation.
    pub async fn call(&self, operation: Operation, params: Params) -> Result<ApiResponse, ShopApiError> {
        self.engine.execute(operation.contract(), params).await
    }
}
