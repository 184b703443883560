//! # Responses
//!
//! The Shop API answers with flat `key=value&key=value` bodies. Transports
//! decode them into [`ResponseFields`]; bodies that are not key/value data
//! come back as [`ApiResponse::Text`].
//!
//! Typed views ([`EntryTranResponse`], [`ExecTranResponse`],
//! [`AlterTranResponse`]) are optional: [`ApiResponse::parse`] deserializes
//! the mapping into any `serde` type whose fields use the wire names.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Format of `TranDate` values: `YYYYMMDDhhmmss`, Japan local time.
pub const TRAN_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

/// Flat response mapping, keyed by wire name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseFields(BTreeMap<String, String>);

impl ResponseFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` body. A repeated key
    /// keeps its last value.
    pub fn from_form_body(body: &str) -> Self {
        url::form_urlencoded::parse(body.trim().as_bytes())
            .into_owned()
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResponseFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A successfully transported response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    /// Key/value body.
    Fields(ResponseFields),
    /// Body that could not be read as key/value pairs (e.g. an HTML page).
    Text(String),
}

impl ApiResponse {
    pub fn fields(&self) -> Option<&ResponseFields> {
        match self {
            Self::Fields(fields) => Some(fields),
            Self::Text(_) => None,
        }
    }

    pub fn into_fields(self) -> Option<ResponseFields> {
        match self {
            Self::Fields(fields) => Some(fields),
            Self::Text(_) => None,
        }
    }

    /// Shorthand for `fields()?.get(key)`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields().and_then(|f| f.get(key))
    }

    /// Deserialize the key/value body into a typed response.
    ///
    /// A text body deserializes as an empty mapping, so it succeeds only for
    /// types whose fields are all optional.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let value = match self {
            Self::Fields(fields) => serde_json::to_value(fields)?,
            Self::Text(_) => serde_json::Value::Object(serde_json::Map::new()),
        };
        serde_json::from_value(value)
    }
}

// -- Typed responses ----------------------------------------------------------

/// Result of `EntryTran` and the other `EntryTran*` operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTranResponse {
    #[serde(rename = "AccessID")]
    pub access_id: String,
    #[serde(rename = "AccessPass")]
    pub access_pass: String,
}

/// Result of `ExecTran`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecTranResponse {
    #[serde(rename = "ACS")]
    pub acs: Option<String>,
    #[serde(rename = "OrderID")]
    pub order_id: Option<String>,
    #[serde(rename = "Forward")]
    pub forward: Option<String>,
    #[serde(rename = "Method")]
    pub method: Option<String>,
    #[serde(rename = "PayTimes")]
    pub pay_times: Option<String>,
    #[serde(rename = "Approve")]
    pub approve: Option<String>,
    #[serde(rename = "TranID")]
    pub tran_id: Option<String>,
    #[serde(rename = "TranDate")]
    pub tran_date: Option<String>,
    #[serde(rename = "CheckString")]
    pub check_string: Option<String>,
    #[serde(rename = "ClientField1")]
    pub client_field_1: Option<String>,
    #[serde(rename = "ClientField2")]
    pub client_field_2: Option<String>,
    #[serde(rename = "ClientField3")]
    pub client_field_3: Option<String>,
}

impl ExecTranResponse {
    /// `TranDate` as a timestamp. `None` when absent or malformed.
    pub fn tran_date(&self) -> Option<NaiveDateTime> {
        parse_tran_date(self.tran_date.as_deref()?)
    }

    /// True when the card issuer asked for 3-D Secure authentication.
    pub fn requires_acs(&self) -> bool {
        self.acs.as_deref().is_some_and(|acs| acs != "0")
    }
}

/// Result of `AlterTran` and `ChangeTran`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlterTranResponse {
    #[serde(rename = "AccessID")]
    pub access_id: Option<String>,
    #[serde(rename = "AccessPass")]
    pub access_pass: Option<String>,
    #[serde(rename = "Forward")]
    pub forward: Option<String>,
    #[serde(rename = "Approve")]
    pub approve: Option<String>,
    #[serde(rename = "TranID")]
    pub tran_id: Option<String>,
    #[serde(rename = "TranDate")]
    pub tran_date: Option<String>,
}

impl AlterTranResponse {
    pub fn tran_date(&self) -> Option<NaiveDateTime> {
        parse_tran_date(self.tran_date.as_deref()?)
    }
}

fn parse_tran_date(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TRAN_DATE_FORMAT).ok()
}
