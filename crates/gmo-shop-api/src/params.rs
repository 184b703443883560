//! # Request Parameters
//!
//! Callers address Shop API parameters by [`Field`], a closed set of the
//! parameters the catalog knows about plus [`Field::Custom`] for anything
//! else. Every field carries two names: the snake_case name callers and error
//! messages use (`order_id`) and the wire name the remote service expects
//! (`OrderID`).
//!
//! [`Params`] is the per-call parameter map. It is ordered by field
//! declaration order so the encoded request body is deterministic. Keys are
//! unique by wire name: a [`Field::Custom`] naming a known parameter is
//! stored under that parameter's variant.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use zeroize::Zeroize;

macro_rules! define_fields {
    ($($(#[$meta:meta])* $variant:ident => $name:literal, $wire:literal;)+) => {
        /// A Shop API request parameter.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Field {
            $($(#[$meta])* $variant,)+
            /// A parameter with no dedicated variant, addressed by its wire name.
            Custom(&'static str),
        }

        impl Field {
            /// Snake_case name used by callers and in validation errors.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                    Self::Custom(wire) => *wire,
                }
            }

            /// Parameter name as sent on the wire.
            pub fn wire_name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Custom(wire) => *wire,
                }
            }

            /// Look up a field by its snake_case name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Look up a named field by its wire name.
            pub fn from_wire_name(wire: &str) -> Option<Self> {
                match wire {
                    $($wire => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

define_fields! {
    // Authentication. Always injected by the engine.
    ShopId => "shop_id", "ShopID";
    ShopPass => "shop_pass", "ShopPass";

    // Transaction identity.
    OrderId => "order_id", "OrderID";
    AccessId => "access_id", "AccessID";
    AccessPass => "access_pass", "AccessPass";
    JobCd => "job_cd", "JobCd";
    Amount => "amount", "Amount";
    Tax => "tax", "Tax";
    ItemCode => "item_code", "ItemCode";
    TdFlag => "td_flag", "TdFlag";
    TdTenantName => "td_tenant_name", "TdTenantName";
    PayType => "pay_type", "PayType";

    // Card execution.
    Method => "method", "Method";
    PayTimes => "pay_times", "PayTimes";
    CardNo => "card_no", "CardNo";
    Expire => "expire", "Expire";
    SecurityCode => "security_code", "SecurityCode";
    Token => "token", "Token";
    MemberId => "member_id", "MemberID";
    CardSeq => "card_seq", "CardSeq";
    DeviceCategory => "device_category", "DeviceCategory";

    // Merchant echo fields.
    ClientField1 => "client_field_1", "ClientField1";
    ClientField2 => "client_field_2", "ClientField2";
    ClientField3 => "client_field_3", "ClientField3";
    ClientFieldFlg => "client_field_flg", "ClientFieldFlag";

    // Convenience store and Pay-easy.
    Convenience => "convenience", "Convenience";
    CustomerName => "customer_name", "CustomerName";
    CustomerKana => "customer_kana", "CustomerKana";
    TelNo => "tel_no", "TelNo";
    MailAddress => "mail_address", "MailAddress";
    PaymentTermDay => "payment_term_day", "PaymentTermDay";
    ReceiptsDisp11 => "receipts_disp_11", "ReceiptsDisp11";
    ReceiptsDisp12 => "receipts_disp_12", "ReceiptsDisp12";
    ReceiptsDisp13 => "receipts_disp_13", "ReceiptsDisp13";

    // Redirect-based wallets and carrier billing.
    RetUrl => "ret_url", "RetURL";
    ErrorRcvUrl => "error_rcv_url", "ErrorRcvURL";
    ProductName => "product_name", "ProductName";
    Commodity => "commodity", "Commodity";
    ServiceName => "service_name", "ServiceName";
    ServiceTel => "service_tel", "ServiceTel";
    FirstAmount => "first_amount", "FirstAmount";
    ChargeDay => "charge_day", "ChargeDay";
    FirstMonthFreeFlag => "first_month_free_flag", "FirstMonthFreeFlag";
    LastMonthFreeFlag => "last_month_free_flag", "LastMonthFreeFlag";
    AccountTimingKbn => "account_timing_kbn", "AccountTimingKbn";
    AccountTiming => "account_timing", "AccountTiming";
    FirstAccountDate => "first_account_date", "FirstAccountDate";
    ConfirmBaseDate => "confirm_base_date", "ConfirmBaseDate";

    // Recurring credit card billing.
    RecurringId => "recurring_id", "RecurringID";
    RegistType => "regist_type", "RegistType";
}

impl Field {
    /// Whether the value must never appear in logs or `Debug` output.
    pub fn is_secret(&self) -> bool {
        matches!(
            self,
            Self::ShopPass | Self::CardNo | Self::SecurityCode | Self::Token
        )
    }

    /// The named variant for a [`Field::Custom`] whose wire name is already
    /// known; any other field is returned unchanged.
    pub fn canonical(self) -> Self {
        match self {
            Self::Custom(wire) => Self::from_wire_name(wire).unwrap_or(self),
            named => named,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single parameter value. The remote service treats every value as text;
/// integers are kept distinct only so callers can pass amounts and IDs
/// without formatting them first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
}

impl ParamValue {
    /// The value as it is encoded on the wire.
    pub fn as_wire(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Integer(n) => Cow::Owned(n.to_string()),
        }
    }

    /// True only for an empty text value. Integers are never empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl Zeroize for ParamValue {
    fn zeroize(&mut self) {
        match self {
            Self::Text(s) => s.zeroize(),
            Self::Integer(n) => n.zeroize(),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_wire())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

/// Per-call parameter map.
///
/// Values of secret fields are zeroized when the map is dropped.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<Field, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: Field, value: impl Into<ParamValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert a value, returning the one it replaced.
    pub fn insert(&mut self, field: Field, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.0.insert(field.canonical(), value.into())
    }

    /// Insert only when `value` is `Some`. An absent optional stays absent.
    pub fn insert_opt<V: Into<ParamValue>>(&mut self, field: Field, value: Option<V>) {
        if let Some(value) = value {
            self.insert(field, value);
        }
    }

    pub fn get(&self, field: Field) -> Option<&ParamValue> {
        self.0.get(&field.canonical())
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field.canonical())
    }

    pub fn remove(&mut self, field: Field) -> Option<ParamValue> {
        self.0.remove(&field.canonical())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &ParamValue)> {
        self.0.iter().map(|(field, value)| (*field, value))
    }

    /// Wire-named key/value pairs in field order. Text values are borrowed.
    pub fn to_wire_pairs(&self) -> Vec<(&'static str, Cow<'_, str>)> {
        self.0
            .iter()
            .map(|(field, value)| (field.wire_name(), value.as_wire()))
            .collect()
    }
}

impl Drop for Params {
    fn drop(&mut self) {
        for (field, value) in self.0.iter_mut() {
            if field.is_secret() {
                value.zeroize();
            }
        }
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (field, value) in &self.0 {
            if field.is_secret() {
                map.entry(&field.name(), &"[REDACTED]");
            } else {
                map.entry(&field.name(), value);
            }
        }
        map.finish()
    }
}

impl<V: Into<ParamValue>> FromIterator<(Field, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (Field, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(field, value)| (field.canonical(), value.into()))
                .collect(),
        )
    }
}

impl<V: Into<ParamValue>, const N: usize> From<[(Field, V); N]> for Params {
    fn from(entries: [(Field, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip_through_lookup() {
        for field in [Field::OrderId, Field::ClientFieldFlg, Field::ReceiptsDisp13] {
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
        assert_eq!(Field::from_name("no_such_field"), None);
    }

    #[test]
    fn wire_names_follow_remote_casing() {
        assert_eq!(Field::OrderId.wire_name(), "OrderID");
        assert_eq!(Field::ClientFieldFlg.wire_name(), "ClientFieldFlag");
        assert_eq!(Field::RetUrl.wire_name(), "RetURL");
        assert_eq!(Field::Custom("RegisterDisp1").wire_name(), "RegisterDisp1");
    }

    #[test]
    fn integer_values_encode_as_decimal_text() {
        assert_eq!(ParamValue::from(100).as_wire(), "100");
        assert_eq!(ParamValue::from(-5i64).as_wire(), "-5");
        assert_eq!(ParamValue::from("AUTH").as_wire(), "AUTH");
    }

    #[test]
    fn only_empty_text_is_empty() {
        assert!(ParamValue::from("").is_empty());
        assert!(!ParamValue::from("x").is_empty());
        assert!(!ParamValue::from(0).is_empty());
    }

    #[test]
    fn insert_opt_skips_none() {
        let mut params = Params::new();
        params.insert_opt(Field::Tax, None::<i64>);
        params.insert_opt(Field::Amount, Some(100));
        assert!(!params.contains(Field::Tax));
        assert_eq!(params.get(Field::Amount), Some(&ParamValue::Integer(100)));
    }

    #[test]
    fn wire_pairs_are_in_field_order() {
        let params = Params::from([
            (Field::Amount, ParamValue::from(100)),
            (Field::OrderId, ParamValue::from("ord-1")),
            (Field::JobCd, ParamValue::from("AUTH")),
        ]);
        assert_eq!(
            params.to_wire_pairs(),
            vec![
                ("OrderID", Cow::from("ord-1")),
                ("JobCd", Cow::from("AUTH")),
                ("Amount", Cow::from("100")),
            ]
        );
    }

    #[test]
    fn debug_redacts_secret_fields() {
        let params = Params::new()
            .with(Field::ShopPass, "hunter2")
            .with(Field::CardNo, "4111111111111111")
            .with(Field::OrderId, "ord-1");
        let rendered = format!("{params:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("4111111111111111"));
        assert!(rendered.contains("ord-1"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn custom_field_with_known_wire_name_is_the_named_field() {
        assert_eq!(Field::Custom("ShopPass").canonical(), Field::ShopPass);
        assert_eq!(Field::Custom("OrderID").canonical(), Field::OrderId);
        assert_eq!(
            Field::Custom("RegisterDisp1").canonical(),
            Field::Custom("RegisterDisp1")
        );
        assert_eq!(Field::from_wire_name("ClientFieldFlag"), Some(Field::ClientFieldFlg));
        assert_eq!(Field::from_wire_name("client_field_flg"), None);
    }

    #[test]
    fn custom_alias_replaces_named_entry() {
        let params = Params::new()
            .with(Field::OrderId, "ord-1")
            .with(Field::Custom("OrderID"), "ord-2")
            .with(Field::Custom("ShopPass"), "hunter2");

        assert_eq!(params.len(), 2);
        assert_eq!(params.get(Field::OrderId), Some(&ParamValue::from("ord-2")));
        assert!(params.contains(Field::Custom("ShopPass")));
        assert_eq!(
            params.to_wire_pairs(),
            vec![("ShopPass", Cow::from("hunter2")), ("OrderID", Cow::from("ord-2"))]
        );
        assert!(!format!("{params:?}").contains("hunter2"));
    }

    #[test]
    fn from_iter_normalizes_custom_aliases() {
        let params: Params = [
            (Field::Custom("Amount"), ParamValue::from(100)),
            (Field::Amount, ParamValue::from(200)),
        ]
        .into_iter()
        .collect();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get(Field::Amount), Some(&ParamValue::from(200)));
    }

    #[test]
    fn zeroize_clears_text_values() {
        let mut value = ParamValue::from("hunter2");
        value.zeroize();
        assert!(value.is_empty());
    }
}
