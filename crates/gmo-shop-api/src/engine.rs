//! # Request Engine
//!
//! Runs one catalog operation end to end:
//!
//! ```text
//! Built → Validated → Authenticated → Sent → Succeeded
//!                                          → BusinessFailed
//!                                          → TransportFailed
//! ```
//!
//! 1. Apply the contract's derivation rules to the caller's parameters.
//! 2. Reject the call locally if any required field is absent, naming all of
//!    them at once.
//! 3. Write the shop credentials over `ShopID`/`ShopPass`.
//! 4. Hand the request to the [`Transport`].
//! 5. Classify the response: a mapping carrying `ErrInfo` is a business
//!    failure, anything else is a success returned unchanged.
//!
//! The engine keeps no per-call state and never retries.

use crate::catalog::OperationContract;
use crate::config::{Credentials, ShopApiConfig};
use crate::error::{ApiError, MissingParameterError, ShopApiError, ERR_CODE, ERR_INFO};
use crate::params::{Field, Params};
use crate::response::ApiResponse;
use crate::transport::{Transport, TransportOptions, TransportRequest, Verb};

/// Validates, authenticates and dispatches Shop API calls.
#[derive(Debug, Clone)]
pub struct RequestEngine<T> {
    credentials: Credentials,
    options: TransportOptions,
    transport: T,
}

impl<T: Transport> RequestEngine<T> {
    pub fn new(credentials: Credentials, options: TransportOptions, transport: T) -> Self {
        Self {
            credentials,
            options,
            transport,
        }
    }

    /// Build an engine from a full configuration and a transport.
    pub fn from_config(config: ShopApiConfig, transport: T) -> Self {
        Self::new(config.credentials, config.transport, transport)
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute `contract` with the default verb (POST).
    pub async fn execute(
        &self,
        contract: &OperationContract,
        params: Params,
    ) -> Result<ApiResponse, ShopApiError> {
        self.execute_with_verb(contract, params, Verb::default()).await
    }

    pub async fn execute_with_verb(
        &self,
        contract: &OperationContract,
        params: Params,
        verb: Verb,
    ) -> Result<ApiResponse, ShopApiError> {
        let endpoint = contract.endpoint;
        let params = prepare(contract, params)?;
        let params = self.authenticate(params);

        tracing::debug!(endpoint, %verb, fields = params.len(), "dispatching Shop API request");
        let request = TransportRequest {
            endpoint,
            verb,
            params,
            options: self.options.clone(),
        };

        let response = self.transport.send(request).await.map_err(|e| {
            tracing::warn!(endpoint, error = %e, "Shop API transport failure");
            ShopApiError::Transport(e)
        })?;

        match classify(response) {
            Ok(response) => {
                tracing::debug!(endpoint, "Shop API request succeeded");
                Ok(response)
            }
            Err(err) => {
                tracing::warn!(
                    endpoint,
                    err_code = err.response().get(ERR_CODE).unwrap_or(""),
                    err_info = err.response().get(ERR_INFO).unwrap_or(""),
                    "Shop API reported a business failure"
                );
                Err(ShopApiError::Business(err))
            }
        }
    }

    /// Overwrite any caller-supplied credentials with the engine's own.
    fn authenticate(&self, mut params: Params) -> Params {
        params.insert(Field::ShopId, self.credentials.shop_id());
        params.insert(Field::ShopPass, self.credentials.shop_pass());
        params
    }
}

/// Apply derivations, then check required fields against the result.
///
/// This is everything the engine does before credentials are attached, and
/// it never touches the network.
pub fn prepare(contract: &OperationContract, mut params: Params) -> Result<Params, MissingParameterError> {
    contract.apply_derivations(&mut params);

    let missing = contract.missing_fields(&params);
    if !missing.is_empty() {
        let names: Vec<_> = missing.iter().map(Field::name).collect();
        tracing::warn!(
            endpoint = contract.endpoint,
            missing = ?names,
            "Shop API request rejected before sending"
        );
        return Err(MissingParameterError {
            endpoint: contract.endpoint,
            missing,
        });
    }
    Ok(params)
}

/// Split a transported response into success or business failure.
///
/// A key/value response containing `ErrInfo` is always a failure; every other
/// response, including a text body, is a success.
pub fn classify(response: ApiResponse) -> Result<ApiResponse, ApiError> {
    match response {
        ApiResponse::Fields(fields) if fields.contains_key(ERR_INFO) => Err(ApiError::new(fields)),
        other => Ok(other),
    }
}
