//! # Transport Interface
//!
//! The engine never touches HTTP directly. It hands a [`TransportRequest`] to
//! a [`Transport`] and receives either an [`ApiResponse`] or a
//! [`TransportError`]. [`crate::http::HttpTransport`] is the production
//! implementation; [`MockTransport`] answers with canned replies for tests
//! and local development.
//!
//! [`TransportOptions`] travel with every request untouched by the engine.
//! Only the transport decides what a timeout or a TLS toggle means.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;

use crate::params::Params;
use crate::response::{ApiResponse, ResponseFields};

/// HTTP verb for a Shop API call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    #[default]
    Post,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// Transport configuration passed through the engine opaquely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    /// Whole-request timeout (connect, send and read).
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Skip TLS certificate verification. Only for test gateways.
    pub accept_invalid_certs: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            accept_invalid_certs: false,
        }
    }
}

/// One fully validated, authenticated call ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// Endpoint identifier, e.g. `EntryTran.idPass`.
    pub endpoint: &'static str,
    pub verb: Verb,
    pub params: Params,
    pub options: TransportOptions,
}

/// Failures below the application layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP error calling {endpoint}: {source}")]
    Request {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The request exceeded its configured timeout.
    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },
    /// The service answered with a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The endpoint URL could not be built from the configured host.
    #[error("invalid URL for {endpoint}: {reason}")]
    InvalidUrl { endpoint: String, reason: String },
    /// The transport is unable to serve requests at all.
    #[error("transport unavailable for {endpoint}: {reason}")]
    Unavailable { endpoint: String, reason: String },
}

/// Performs one Shop API round trip.
///
/// Implementations must be `Send + Sync` and return `Send` futures so a
/// single client can serve concurrent tasks.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportError>> + Send;
}

/// Canned reply served by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    Fields(ResponseFields),
    Text(String),
    /// Fail with [`TransportError::Unavailable`].
    Unavailable(String),
}

/// In-memory transport that returns a fixed reply and records every request.
#[derive(Debug)]
pub struct MockTransport {
    reply: MockReply,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Reply with the given key/value pairs.
    pub fn with_fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(MockReply::Fields(fields.into_iter().collect()))
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last_request(&self) -> Option<TransportRequest> {
        self.requests.lock().last().cloned()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: TransportRequest) -> Result<ApiResponse, TransportError> {
        let endpoint = request.endpoint;
        self.requests.lock().push(request);
        match &self.reply {
            MockReply::Fields(fields) => Ok(ApiResponse::Fields(fields.clone())),
            MockReply::Text(body) => Ok(ApiResponse::Text(body.clone())),
            MockReply::Unavailable(reason) => Err(TransportError::Unavailable {
                endpoint: endpoint.to_string(),
                reason: reason.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Field;

    fn request(endpoint: &'static str) -> TransportRequest {
        TransportRequest {
            endpoint,
            verb: Verb::default(),
            params: Params::new().with(Field::OrderId, "o-1"),
            options: TransportOptions::default(),
        }
    }

    #[test]
    fn default_verb_is_post() {
        assert_eq!(Verb::default(), Verb::Post);
        assert_eq!(Verb::Post.to_string(), "POST");
        assert_eq!(Verb::Get.to_string(), "GET");
    }

    #[test]
    fn default_options() {
        let options = TransportOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert_eq!(options.connect_timeout, Duration::from_secs(10));
        assert!(!options.accept_invalid_certs);
    }

    #[tokio::test]
    async fn mock_records_requests_in_order() {
        let mock = MockTransport::with_fields([("AccessID", "a")]);
        mock.send(request("EntryTran.idPass")).await.unwrap();
        mock.send(request("ExecTran.idPass")).await.unwrap();

        let endpoints: Vec<_> = mock.requests().iter().map(|r| r.endpoint).collect();
        assert_eq!(endpoints, vec!["EntryTran.idPass", "ExecTran.idPass"]);
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn mock_unavailable_reply_is_transport_error() {
        let mock = MockTransport::new(MockReply::Unavailable("offline".into()));
        let err = mock.send(request("SearchTrade.idPass")).await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::Unavailable { ref endpoint, ref reason }
                if endpoint == "SearchTrade.idPass" && reason == "offline"
        ));
        assert_eq!(mock.request_count(), 1);
    }
}
