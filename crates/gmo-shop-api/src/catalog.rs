//! # Operation Catalog
//!
//! Static table of every Shop API operation the client supports. Each
//! [`Operation`] resolves to an [`OperationContract`]: the endpoint it posts
//! to, the fields it requires, and the derivation rules applied to the
//! caller's parameters before validation.
//!
//! Contracts are data. The engine interprets them generically, so adding an
//! operation means adding a variant and a table row here and nothing else.

use std::fmt;
use std::str::FromStr;

use crate::params::{Field, Params};

/// Value written by a flag derivation when any source field is set.
pub const FLAG_ON: &str = "1";
/// Value written by a flag derivation when no source field is set.
pub const FLAG_OFF: &str = "0";

/// Job code that lets `EntryTran` run without an amount (card validity check).
pub const JOB_CD_CHECK: &str = "CHECK";

/// A pure rewrite applied to the parameter map before validation.
///
/// Every derivation overwrites its target and never reads it, so applying a
/// rule twice leaves the map as applying it once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    /// Set `target` to [`FLAG_ON`] if any of `sources` is present and
    /// non-empty, otherwise to [`FLAG_OFF`].
    FlagIfAnyPresent {
        target: Field,
        sources: &'static [Field],
    },
    /// Set `target` to a fixed value.
    Constant {
        target: Field,
        value: &'static str,
    },
}

impl Derivation {
    pub fn apply(&self, params: &mut Params) {
        match *self {
            Self::FlagIfAnyPresent { target, sources } => {
                let any = sources
                    .iter()
                    .any(|field| params.get(*field).is_some_and(|v| !v.is_empty()));
                params.insert(target, if any { FLAG_ON } else { FLAG_OFF });
            }
            Self::Constant { target, value } => {
                params.insert(target, value);
            }
        }
    }
}

/// A field required unless another field carries a sentinel value.
///
/// The controlling field being absent counts as "not equal": the dependent
/// field is then required as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionalField {
    pub field: Field,
    pub unless: Field,
    pub equals: &'static str,
}

impl ConditionalField {
    pub fn is_required(&self, params: &Params) -> bool {
        params
            .get(self.unless)
            .map_or(true, |v| v.as_wire() != self.equals)
    }
}

/// Wire contract of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationContract {
    /// Endpoint identifier, appended to `{base}/payment/`.
    pub endpoint: &'static str,
    pub required: &'static [Field],
    pub conditional: &'static [ConditionalField],
    pub derivations: &'static [Derivation],
}

impl OperationContract {
    const fn new(endpoint: &'static str, required: &'static [Field]) -> Self {
        Self {
            endpoint,
            required,
            conditional: &[],
            derivations: &[],
        }
    }

    const fn conditional(mut self, conditional: &'static [ConditionalField]) -> Self {
        self.conditional = conditional;
        self
    }

    const fn derive(mut self, derivations: &'static [Derivation]) -> Self {
        self.derivations = derivations;
        self
    }

    /// Run every derivation rule in declaration order.
    pub fn apply_derivations(&self, params: &mut Params) {
        for rule in self.derivations {
            rule.apply(params);
        }
    }

    /// Required fields for this parameter map: the static list followed by
    /// whichever conditional fields apply.
    pub fn required_fields(&self, params: &Params) -> Vec<Field> {
        let mut fields = self.required.to_vec();
        fields.extend(
            self.conditional
                .iter()
                .filter(|c| c.is_required(params))
                .map(|c| c.field),
        );
        fields
    }

    /// Required fields absent from `params`. Presence is the only test; an
    /// empty value satisfies the requirement.
    pub fn missing_fields(&self, params: &Params) -> Vec<Field> {
        self.required_fields(params)
            .into_iter()
            .filter(|field| !params.contains(*field))
            .collect()
    }
}

// -- Shared rule tables -------------------------------------------------------

const CLIENT_FIELD_FLAG: Derivation = Derivation::FlagIfAnyPresent {
    target: Field::ClientFieldFlg,
    sources: &[Field::ClientField1, Field::ClientField2, Field::ClientField3],
};

const CLIENT_FIELD_FLAG_ONLY: &[Derivation] = &[CLIENT_FIELD_FLAG];

const AMOUNT_UNLESS_CHECK: &[ConditionalField] = &[ConditionalField {
    field: Field::Amount,
    unless: Field::JobCd,
    equals: JOB_CD_CHECK,
}];

const ORDER_AMOUNT: &[Field] = &[Field::OrderId, Field::Amount];
const ACCESS_ORDER: &[Field] = &[Field::AccessId, Field::AccessPass, Field::OrderId];
const ACCESS_ORDER_RET: &[Field] = &[
    Field::AccessId,
    Field::AccessPass,
    Field::OrderId,
    Field::RetUrl,
];
const ACCESS_ORDER_AMOUNT: &[Field] = &[
    Field::AccessId,
    Field::AccessPass,
    Field::OrderId,
    Field::Amount,
];
const RECURRING: &[Field] = &[Field::RecurringId];

macro_rules! define_operations {
    ($($(#[$meta:meta])* $variant:ident => $name:literal, $contract:expr;)+) => {
        /// A Shop API operation.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Operation {
            $($(#[$meta])* $variant,)+
        }

        impl Operation {
            /// Every operation in catalog order.
            pub const ALL: &'static [Operation] = &[$(Self::$variant,)+];

            /// Snake_case operation name.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            pub fn contract(&self) -> &'static OperationContract {
                match self {
                    $(Self::$variant => {
                        const CONTRACT: OperationContract = $contract;
                        &CONTRACT
                    })+
                }
            }
        }

        impl FromStr for Operation {
            type Err = UnknownOperation;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    other => Err(UnknownOperation(other.to_string())),
                }
            }
        }
    };
}

define_operations! {
    // -- Credit card ----------------------------------------------------------

    /// Register a card transaction and obtain its AccessID/AccessPass.
    EntryTran => "entry_tran",
        OperationContract::new("EntryTran.idPass", &[Field::OrderId, Field::JobCd])
            .conditional(AMOUNT_UNLESS_CHECK);
    /// Authorize or capture a registered card transaction.
    ExecTran => "exec_tran",
        OperationContract::new(
            "ExecTran.idPass",
            &[Field::AccessId, Field::AccessPass, Field::OrderId, Field::Token],
        )
        .derive(&[
            CLIENT_FIELD_FLAG,
            Derivation::Constant { target: Field::DeviceCategory, value: "0" },
        ]);
    /// Capture, void or refund a card transaction.
    AlterTran => "alter_tran",
        OperationContract::new(
            "AlterTran.idPass",
            &[Field::AccessId, Field::AccessPass, Field::JobCd],
        );
    /// Change the amount of a completed card transaction.
    ChangeTran => "change_tran",
        OperationContract::new(
            "ChangeTran.idPass",
            &[Field::AccessId, Field::AccessPass, Field::JobCd, Field::Amount],
        );
    SearchTrade => "search_trade",
        OperationContract::new("SearchTrade.idPass", &[Field::OrderId]);
    /// Look up a transaction of any payment type.
    SearchTradeMulti => "search_trade_multi",
        OperationContract::new("SearchTradeMulti.idPass", &[Field::OrderId, Field::PayType]);

    // -- Convenience store ----------------------------------------------------

    EntryTranCvs => "entry_tran_cvs",
        OperationContract::new("EntryTranCvs.idPass", ORDER_AMOUNT);
    ExecTranCvs => "exec_tran_cvs",
        OperationContract::new(
            "ExecTranCvs.idPass",
            &[
                Field::AccessId,
                Field::AccessPass,
                Field::OrderId,
                Field::Convenience,
                Field::CustomerName,
                Field::CustomerKana,
                Field::TelNo,
                Field::ReceiptsDisp11,
                Field::ReceiptsDisp12,
                Field::ReceiptsDisp13,
            ],
        );
    CancelTranCvs => "cancel_tran_cvs",
        OperationContract::new(
            "CvsCancel.idPass",
            &[Field::OrderId, Field::AccessId, Field::AccessPass],
        );

    // -- Pay-easy -------------------------------------------------------------

    EntryTranPayEasy => "entry_tran_pay_easy",
        OperationContract::new("EntryTranPayEasy.idPass", ORDER_AMOUNT);
    ExecTranPayEasy => "exec_tran_pay_easy",
        OperationContract::new(
            "ExecTranPayEasy.idPass",
            &[
                Field::AccessId,
                Field::AccessPass,
                Field::OrderId,
                Field::CustomerName,
                Field::CustomerKana,
                Field::TelNo,
                Field::ReceiptsDisp11,
                Field::ReceiptsDisp12,
                Field::ReceiptsDisp13,
            ],
        );

    // -- LINE Pay -------------------------------------------------------------

    EntryTranLinepay => "entry_tran_linepay",
        OperationContract::new(
            "EntryTranLinepay.idPass",
            &[Field::OrderId, Field::JobCd, Field::Amount],
        );
    ExecTranLinepay => "exec_tran_linepay",
        OperationContract::new(
            "ExecTranLinepay.idPass",
            &[
                Field::AccessId,
                Field::AccessPass,
                Field::OrderId,
                Field::RetUrl,
                Field::ErrorRcvUrl,
                Field::ProductName,
            ],
        );

    // -- SoftBank carrier billing ---------------------------------------------

    EntryTranSb => "entry_tran_sb",
        OperationContract::new("EntryTranSb.idPass", ORDER_AMOUNT);
    ExecTranSb => "exec_tran_sb",
        OperationContract::new("ExecTranSb.idPass", ACCESS_ORDER_RET)
            .derive(CLIENT_FIELD_FLAG_ONLY);
    EntryTranSbContinuance => "entry_tran_sb_con",
        OperationContract::new("EntryTranSbContinuance.idPass", ORDER_AMOUNT);
    ExecTranSbContinuance => "exec_tran_sb_con",
        OperationContract::new(
            "ExecTranSbContinuance.idPass",
            &[
                Field::AccessId,
                Field::AccessPass,
                Field::OrderId,
                Field::RetUrl,
                Field::ChargeDay,
                Field::FirstMonthFreeFlag,
            ],
        )
        .derive(CLIENT_FIELD_FLAG_ONLY);
    CancelContinuanceSb => "cancel_continuance_sb",
        OperationContract::new("SbContinuanceCancel.idPass", ACCESS_ORDER);

    // -- au carrier billing ---------------------------------------------------

    EntryTranAu => "entry_tran_au",
        OperationContract::new("EntryTranAu.idPass", ORDER_AMOUNT);
    ExecTranAu => "exec_tran_au",
        OperationContract::new(
            "ExecTranAu.idPass",
            &[
                Field::AccessId,
                Field::AccessPass,
                Field::OrderId,
                Field::RetUrl,
                Field::Commodity,
                Field::ServiceName,
                Field::ServiceTel,
            ],
        )
        .derive(CLIENT_FIELD_FLAG_ONLY);
    EntryTranAuContinuance => "entry_tran_au_con",
        OperationContract::new(
            "EntryTranAuContinuance.idPass",
            &[Field::OrderId, Field::Amount, Field::FirstAmount],
        );
    ExecTranAuContinuance => "exec_tran_au_con",
        OperationContract::new(
            "ExecTranAuContinuance.idPass",
            &[
                Field::AccessId,
                Field::AccessPass,
                Field::OrderId,
                Field::RetUrl,
                Field::Commodity,
                Field::AccountTimingKbn,
                Field::AccountTiming,
                Field::FirstAccountDate,
                Field::ServiceName,
                Field::ServiceTel,
            ],
        )
        .derive(CLIENT_FIELD_FLAG_ONLY);
    CancelContinuanceAu => "cancel_continuance_au",
        OperationContract::new("AuContinuanceCancel.idPass", ACCESS_ORDER);

    // -- docomo carrier billing -----------------------------------------------

    EntryTranDocomo => "entry_tran_docomo",
        OperationContract::new("EntryTranDocomo.idPass", ORDER_AMOUNT);
    ExecTranDocomo => "exec_tran_docomo",
        OperationContract::new("ExecTranDocomo.idPass", ACCESS_ORDER_RET)
            .derive(CLIENT_FIELD_FLAG_ONLY);
    EntryTranDocomoContinuance => "entry_tran_docomo_con",
        OperationContract::new("EntryTranDocomoContinuance.idPass", ORDER_AMOUNT);
    ExecTranDocomoContinuance => "exec_tran_docomo_con",
        OperationContract::new(
            "ExecTranDocomoContinuance.idPass",
            &[
                Field::AccessId,
                Field::AccessPass,
                Field::OrderId,
                Field::RetUrl,
                Field::FirstMonthFreeFlag,
                Field::ConfirmBaseDate,
            ],
        )
        .derive(CLIENT_FIELD_FLAG_ONLY);
    CancelContinuanceDocomo => "cancel_continuance_docomo",
        OperationContract::new(
            "DocomoContinuanceShopEnd.idPass",
            &[
                Field::AccessId,
                Field::AccessPass,
                Field::OrderId,
                Field::Amount,
                Field::LastMonthFreeFlag,
            ],
        );
    ContinuanceAmountChangeDocomo => "continuance_amount_change_docomo",
        OperationContract::new("DocomoContinuanceShopChange.idPass", ACCESS_ORDER_AMOUNT);
    ContinuanceSalesDocomo => "continuance_sales_docomo",
        OperationContract::new("DocomoContinuanceSales.idPass", ACCESS_ORDER_AMOUNT);

    // -- Recurring credit card billing ----------------------------------------

    RegisterCreditCardContinuance => "register_credit_card_continuance",
        OperationContract::new(
            "RegisterRecurringCredit.idPass",
            &[Field::RecurringId, Field::Amount, Field::ChargeDay, Field::RegistType],
        );
    UnregisterCreditCardContinuance => "unregister_credit_card_continuance",
        OperationContract::new("UnregisterRecurring.idPass", RECURRING);
    SearchCreditCardContinuance => "search_credit_card_continuance",
        OperationContract::new("SearchRecurring.idPass", RECURRING);
    SearchResultCreditCardContinuance => "search_result_credit_card_continuance",
        OperationContract::new("SearchRecurringResult.idPass", RECURRING);
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an operation name that is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown Shop API operation: {0}")]
pub struct UnknownOperation(pub String);
