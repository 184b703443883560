//! # HTTP Transport
//!
//! reqwest-backed [`Transport`]. Sends parameters form-encoded to
//! `{base_url}{endpoint}` and decodes the flat key/value response body.
//!
//! Connection timeout and certificate checking are fixed when the client is
//! built; the overall timeout is taken from each request's options. Retries
//! are NOT built in: payment calls are not idempotent, so resubmission is a
//! caller decision.

use url::Url;

use crate::config::ConfigError;
use crate::response::{ApiResponse, ResponseFields};
use crate::transport::{Transport, TransportError, TransportOptions, TransportRequest, Verb};

/// Production transport for the Shop API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Build a transport rooted at `base_url` (normally
    /// [`crate::Credentials::base_url`]).
    pub fn new(base_url: Url, options: &TransportOptions) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .connect_timeout(options.connect_timeout)
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()
            .map_err(ConfigError::HttpClient)?;
        Ok(Self { client, base_url })
    }

    /// Wrap an existing reqwest client, e.g. one shared with other services.
    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(endpoint)
            .map_err(|e| TransportError::InvalidUrl {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<ApiResponse, TransportError> {
        let endpoint = request.endpoint;
        let url = self.endpoint_url(endpoint)?;
        let pairs = request.params.to_wire_pairs();

        let builder = match request.verb {
            Verb::Post => self.client.post(url).form(&pairs),
            Verb::Get => self.client.get(url).query(&pairs),
        };

        let resp = builder
            .timeout(request.options.timeout)
            .send()
            .await
            .map_err(|e| send_error(endpoint, e))?;

        let status = resp.status();
        let is_html = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("text/html"));
        let body = resp.text().await.map_err(|e| send_error(endpoint, e))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        if is_html {
            return Ok(ApiResponse::Text(body));
        }
        Ok(ApiResponse::Fields(ResponseFields::from_form_body(&body)))
    }
}

fn send_error(endpoint: &str, source: reqwest::Error) -> TransportError {
    if source.is_timeout() {
        TransportError::Timeout {
            endpoint: endpoint.to_string(),
        }
    } else {
        TransportError::Request {
            endpoint: endpoint.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::new(base.parse().unwrap(), &TransportOptions::default()).unwrap()
    }

    #[test]
    fn endpoint_joins_under_payment_path() {
        let t = transport("https://pt01.mul-pay.jp/payment/");
        assert_eq!(
            t.endpoint_url("EntryTran.idPass").unwrap().as_str(),
            "https://pt01.mul-pay.jp/payment/EntryTran.idPass"
        );
    }

    #[test]
    fn with_client_keeps_base_url() {
        let base: Url = "http://127.0.0.1:9000/payment/".parse().unwrap();
        let t = HttpTransport::with_client(reqwest::Client::new(), base.clone());
        assert_eq!(t.base_url(), &base);
    }
}
