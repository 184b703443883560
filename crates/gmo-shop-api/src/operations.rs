//! One `ShopClient` method per catalog entry. Each is a thin alias for
//! [`ShopClient::call`]; required fields and derivations live in the catalog.

use crate::catalog::Operation;
use crate::error::ShopApiError;
use crate::params::Params;
use crate::response::ApiResponse;
use crate::transport::Transport;
use crate::ShopClient;

macro_rules! operation_methods {
    ($($(#[$meta:meta])* $method:ident => $operation:ident;)+) => {
        impl<T: Transport> ShopClient<T> {
            $(
                $(#[$meta])*
                pub async fn $method(&self, params: Params) -> Result<ApiResponse, ShopApiError> {
                    self.call(Operation::$operation, params).await
                }
            )+
        }
    };
}

operation_methods! {
    /// Register a card transaction (`EntryTran.idPass`). Returns `AccessID`
    /// and `AccessPass`. `amount` is required unless `job_cd` is `CHECK`.
    entry_tran => EntryTran;
    /// Execute a card payment (`ExecTran.idPass`).
    exec_tran => ExecTran;
    /// Capture, void or refund (`AlterTran.idPass`).
    alter_tran => AlterTran;
    /// Change the amount of a completed transaction (`ChangeTran.idPass`).
    change_tran => ChangeTran;
    /// Look up a card transaction by order ID (`SearchTrade.idPass`).
    search_trade => SearchTrade;
    /// Look up a transaction of any payment type (`SearchTradeMulti.idPass`).
    search_trade_multi => SearchTradeMulti;

    /// `EntryTranCvs.idPass`
    entry_tran_cvs => EntryTranCvs;
    /// `ExecTranCvs.idPass`
    exec_tran_cvs => ExecTranCvs;
    /// `CvsCancel.idPass`
    cancel_tran_cvs => CancelTranCvs;

    /// `EntryTranPayEasy.idPass`
    entry_tran_pay_easy => EntryTranPayEasy;
    /// `ExecTranPayEasy.idPass`
    exec_tran_pay_easy => ExecTranPayEasy;

    /// `EntryTranLinepay.idPass`
    entry_tran_linepay => EntryTranLinepay;
    /// `ExecTranLinepay.idPass`
    exec_tran_linepay => ExecTranLinepay;

    /// `EntryTranSb.idPass`
    entry_tran_sb => EntryTranSb;
    /// `ExecTranSb.idPass`
    exec_tran_sb => ExecTranSb;
    /// `EntryTranSbContinuance.idPass`
    entry_tran_sb_con => EntryTranSbContinuance;
    /// `ExecTranSbContinuance.idPass`
    exec_tran_sb_con => ExecTranSbContinuance;
    /// `SbContinuanceCancel.idPass`
    cancel_continuance_sb => CancelContinuanceSb;

    /// `EntryTranAu.idPass`
    entry_tran_au => EntryTranAu;
    /// `ExecTranAu.idPass`
    exec_tran_au => ExecTranAu;
    /// `EntryTranAuContinuance.idPass`
    entry_tran_au_con => EntryTranAuContinuance;
    /// `ExecTranAuContinuance.idPass`
    exec_tran_au_con => ExecTranAuContinuance;
    /// `AuContinuanceCancel.idPass`
    cancel_continuance_au => CancelContinuanceAu;

    /// `EntryTranDocomo.idPass`
    entry_tran_docomo => EntryTranDocomo;
    /// `ExecTranDocomo.idPass`
    exec_tran_docomo => ExecTranDocomo;
    /// `EntryTranDocomoContinuance.idPass`
    entry_tran_docomo_con => EntryTranDocomoContinuance;
    /// `ExecTranDocomoContinuance.idPass`
    exec_tran_docomo_con => ExecTranDocomoContinuance;
    /// End a docomo continuance (`DocomoContinuanceShopEnd.idPass`).
    cancel_continuance_docomo => CancelContinuanceDocomo;
    /// `DocomoContinuanceShopChange.idPass`
    continuance_amount_change_docomo => ContinuanceAmountChangeDocomo;
    /// `DocomoContinuanceSales.idPass`
    continuance_sales_docomo => ContinuanceSalesDocomo;

    /// Define a recurring card charge (`RegisterRecurringCredit.idPass`).
    register_credit_card_continuance => RegisterCreditCardContinuance;
    /// `UnregisterRecurring.idPass`
    unregister_credit_card_continuance => UnregisterCreditCardContinuance;
    /// `SearchRecurring.idPass`
    search_credit_card_continuance => SearchCreditCardContinuance;
    /// `SearchRecurringResult.idPass`
    search_result_credit_card_continuance => SearchResultCreditCardContinuance;
}
