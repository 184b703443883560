//! # Error Taxonomy
//!
//! [`ShopApiError`] keeps the four failure kinds apart so callers branch on
//! the variant, never on message text:
//!
//! - [`ConfigError`]: the client could not be built.
//! - [`MissingParameterError`]: a local contract violation. Nothing was sent.
//! - [`TransportError`]: the round trip did not complete.
//! - [`ApiError`]: the remote service answered with `ErrCode`/`ErrInfo`.

use std::fmt;

use crate::config::ConfigError;
use crate::params::Field;
use crate::response::ResponseFields;
use crate::transport::TransportError;

/// Response key carrying the `|`-separated error codes.
pub const ERR_CODE: &str = "ErrCode";
/// Response key carrying the `|`-separated error detail codes. Its presence
/// marks a response as a business failure.
pub const ERR_INFO: &str = "ErrInfo";

/// `ErrInfo` code reported when the order ID was already used for this shop.
pub const ORDER_ID_EXISTS: &str = "M01004010";

/// Errors from Shop API calls.
#[derive(Debug, thiserror::Error)]
pub enum ShopApiError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    MissingParameter(#[from] MissingParameterError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Business(#[from] ApiError),
}

impl ShopApiError {
    /// The structured business error, if the remote service reported one.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Business(err) => Some(err),
            _ => None,
        }
    }
}

/// Required parameters were absent after derivation rules ran.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{endpoint}: missing required parameters: {}", display_fields(.missing))]
pub struct MissingParameterError {
    pub endpoint: &'static str,
    /// Every absent field, in contract order.
    pub missing: Vec<Field>,
}

impl MissingParameterError {
    /// Snake_case names of the missing fields.
    pub fn names(&self) -> Vec<&'static str> {
        self.missing.iter().map(Field::name).collect()
    }
}

fn display_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A failure reported by the remote service.
///
/// Wraps the full response so callers can read any field the service sent
/// alongside the error codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    response: ResponseFields,
}

impl ApiError {
    pub(crate) fn new(response: ResponseFields) -> Self {
        Self { response }
    }

    /// The raw failure response.
    pub fn response(&self) -> &ResponseFields {
        &self.response
    }

    pub fn into_response(self) -> ResponseFields {
        self.response
    }

    /// `ErrCode` split on `|`. Empty when the service sent no codes.
    pub fn error_codes(&self) -> Vec<&str> {
        split_codes(self.response.get(ERR_CODE))
    }

    /// `ErrInfo` split on `|`, in the same order as [`error_codes`](Self::error_codes).
    pub fn error_infos(&self) -> Vec<&str> {
        split_codes(self.response.get(ERR_INFO))
    }

    /// `(code, info)` pairs zipped in source order.
    pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.error_codes().into_iter().zip(self.error_infos())
    }

    pub fn has_error_code(&self, code: &str) -> bool {
        self.error_codes().contains(&code)
    }

    pub fn has_error_info(&self, info: &str) -> bool {
        self.error_infos().contains(&info)
    }

    /// True when the service rejected the call because the order ID is taken.
    pub fn has_order_id_exists_error(&self) -> bool {
        self.has_error_info(ORDER_ID_EXISTS)
    }
}

fn split_codes(raw: Option<&str>) -> Vec<&str> {
    match raw {
        Some(raw) if !raw.is_empty() => raw.split('|').collect(),
        _ => Vec::new(),
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Shop API error: ErrCode={} ErrInfo={}",
            self.response.get(ERR_CODE).unwrap_or(""),
            self.response.get(ERR_INFO).unwrap_or("")
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(code: &str, info: &str) -> ApiError {
        ApiError::new(ResponseFields::from_iter([(ERR_CODE, code), (ERR_INFO, info)]))
    }

    #[test]
    fn splits_codes_and_infos() {
        let err = api_error("E01|E02", "M01004010|M02002020");
        assert_eq!(err.error_codes(), vec!["E01", "E02"]);
        assert_eq!(err.error_infos(), vec!["M01004010", "M02002020"]);
        assert_eq!(
            err.errors().collect::<Vec<_>>(),
            vec![("E01", "M01004010"), ("E02", "M02002020")]
        );
    }

    #[test]
    fn detects_order_id_exists() {
        assert!(api_error("E01|E02", "M01004010|M02002020").has_order_id_exists_error());
        assert!(api_error("E02|E01", "M02002020|M01004010").has_order_id_exists_error());
        assert!(!api_error("E01", "E01010001").has_order_id_exists_error());
    }

    #[test]
    fn code_membership_checks() {
        let err = api_error("E01|E92", "E01040010|E92000001");
        assert!(err.has_error_code("E92"));
        assert!(!err.has_error_code("E9"));
        assert!(err.has_error_info("E01040010"));
    }

    #[test]
    fn missing_err_code_yields_no_codes() {
        let err = ApiError::new(ResponseFields::from_iter([(ERR_INFO, "E01")]));
        assert!(err.error_codes().is_empty());
        assert_eq!(err.error_infos(), vec!["E01"]);
        assert_eq!(err.errors().count(), 0);
    }

    #[test]
    fn display_includes_raw_codes() {
        let err = api_error("E01", "E01010001");
        assert_eq!(err.to_string(), "Shop API error: ErrCode=E01 ErrInfo=E01010001");
    }

    #[test]
    fn missing_parameter_error_lists_every_field() {
        let err = MissingParameterError {
            endpoint: "EntryTran.idPass",
            missing: vec![Field::JobCd, Field::Amount],
        };
        assert_eq!(err.names(), vec!["job_cd", "amount"]);
        assert_eq!(
            err.to_string(),
            "EntryTran.idPass: missing required parameters: job_cd, amount"
        );
    }

    #[test]
    fn as_api_error_only_matches_business_failures() {
        let business = ShopApiError::from(api_error("E01", "E01010001"));
        assert!(business.as_api_error().is_some());

        let missing = ShopApiError::from(MissingParameterError {
            endpoint: "SearchTrade.idPass",
            missing: vec![Field::OrderId],
        });
        assert!(missing.as_api_error().is_none());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Codes and infos keep their pairing and order.
            #[test]
            fn errors_zip_pairwise_in_order(
                pairs in prop::collection::vec(("E[0-9]{2}", "[EM][0-9]{8}"), 1..6)
            ) {
                let codes: Vec<_> = pairs.iter().map(|(c, _)| c.as_str()).collect();
                let infos: Vec<_> = pairs.iter().map(|(_, i)| i.as_str()).collect();
                let err = api_error(&codes.join("|"), &infos.join("|"));

                prop_assert_eq!(err.error_codes().len(), err.error_infos().len());
                let zipped: Vec<_> = err.errors().collect();
                let expected: Vec<_> = codes.iter().copied().zip(infos.iter().copied()).collect();
                prop_assert_eq!(zipped, expected);
            }
        }
    }
}
