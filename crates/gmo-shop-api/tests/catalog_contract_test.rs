//! Catalog-wide contract tests.
//!
//! Every operation in the catalog is driven through the engine with an
//! in-memory transport to check the guarantees that hold for all of them:
//! incomplete calls are rejected locally with the full list of missing
//! fields, complete calls are sent to the right endpoint with the shop's
//! own credentials.

use gmo_shop_api::catalog::JOB_CD_CHECK;
use gmo_shop_api::{
    Credentials, Field, MockTransport, Operation, ParamValue, Params, ShopApiConfig, ShopApiError,
    ShopClient,
};

fn client() -> ShopClient<MockTransport> {
    let credentials = Credentials::new("shop-real", "pass-real", "pt01.mul-pay.jp").unwrap();
    ShopClient::with_transport(
        ShopApiConfig::new(credentials),
        MockTransport::with_fields([("Result", "OK")]),
    )
}

/// Every required field of `operation` filled with a placeholder. `job_cd`
/// gets a value that keeps conditional requirements active.
fn complete_params(operation: Operation) -> Params {
    let contract = operation.contract();
    let mut params = Params::new();
    for field in contract.required {
        params.insert(*field, "v");
    }
    for conditional in contract.conditional {
        params.insert(conditional.field, "v");
    }
    if params.contains(Field::JobCd) {
        params.insert(Field::JobCd, "AUTH");
    }
    params
}

#[tokio::test]
async fn empty_params_report_every_required_field() {
    let client = client();

    for operation in Operation::ALL {
        let err = client.call(*operation, Params::new()).await.unwrap_err();
        let missing = match err {
            ShopApiError::MissingParameter(missing) => missing,
            other => panic!("{operation}: expected MissingParameter, got {other:?}"),
        };

        let mut expected = operation.contract().required.to_vec();
        expected.extend(operation.contract().conditional.iter().map(|c| c.field));
        assert_eq!(missing.missing, expected, "{operation}");
        assert_eq!(missing.endpoint, operation.contract().endpoint);
    }

    assert_eq!(client.engine().transport().request_count(), 0);
}

#[tokio::test]
async fn dropping_any_single_field_is_rejected_locally() {
    let client = client();

    for operation in Operation::ALL {
        for field in operation.contract().required {
            let mut params = complete_params(*operation);
            params.remove(*field);

            let err = client.call(*operation, params).await.unwrap_err();
            let ShopApiError::MissingParameter(missing) = err else {
                panic!("{operation}: expected MissingParameter without {field}");
            };
            // Dropping job_cd also re-activates the conditional amount rule,
            // but amount is already filled in, so only job_cd is missing.
            assert_eq!(missing.missing, vec![*field], "{operation}");
        }
    }

    assert_eq!(client.engine().transport().request_count(), 0);
}

#[tokio::test]
async fn complete_params_are_sent_with_engine_credentials() {
    let client = client();

    for operation in Operation::ALL {
        let params = complete_params(*operation)
            .with(Field::ShopId, "shop-forged")
            .with(Field::ShopPass, "pass-forged");

        let response = client.call(*operation, params).await.unwrap();
        assert_eq!(response.get("Result"), Some("OK"), "{operation}");

        let sent = client.engine().transport().last_request().unwrap();
        assert_eq!(sent.endpoint, operation.contract().endpoint);
        assert_eq!(sent.params.get(Field::ShopId), Some(&ParamValue::from("shop-real")));
        assert_eq!(sent.params.get(Field::ShopPass), Some(&ParamValue::from("pass-real")));
        for field in operation.contract().required {
            assert!(sent.params.contains(*field), "{operation} dropped {field}");
        }
    }

    assert_eq!(
        client.engine().transport().request_count(),
        Operation::ALL.len()
    );
}

#[tokio::test]
async fn empty_string_values_satisfy_requirements() {
    let client = client();
    let response = client
        .search_trade(Params::new().with(Field::OrderId, ""))
        .await
        .unwrap();
    assert_eq!(response.get("Result"), Some("OK"));
}

#[tokio::test]
async fn named_methods_dispatch_to_their_catalog_entry() {
    let client = client();

    client
        .cancel_continuance_docomo(complete_params(Operation::CancelContinuanceDocomo))
        .await
        .unwrap();
    assert_eq!(
        client.engine().transport().last_request().unwrap().endpoint,
        "DocomoContinuanceShopEnd.idPass"
    );

    client
        .register_credit_card_continuance(complete_params(Operation::RegisterCreditCardContinuance))
        .await
        .unwrap();
    assert_eq!(
        client.engine().transport().last_request().unwrap().endpoint,
        "RegisterRecurringCredit.idPass"
    );

    client
        .entry_tran(
            Params::new()
                .with(Field::OrderId, 1)
                .with(Field::JobCd, JOB_CD_CHECK),
        )
        .await
        .unwrap();
    assert_eq!(
        client.engine().transport().last_request().unwrap().endpoint,
        "EntryTran.idPass"
    );
}

#[tokio::test]
async fn carrier_exec_flag_reflects_echo_fields() {
    let client = client();

    let with_echo = complete_params(Operation::ExecTranAu).with(Field::ClientField2, "memo");
    client.exec_tran_au(with_echo).await.unwrap();
    let sent = client.engine().transport().last_request().unwrap();
    assert_eq!(sent.params.get(Field::ClientFieldFlg), Some(&ParamValue::from("1")));

    client
        .exec_tran_au(complete_params(Operation::ExecTranAu))
        .await
        .unwrap();
    let sent = client.engine().transport().last_request().unwrap();
    assert_eq!(sent.params.get(Field::ClientFieldFlg), Some(&ParamValue::from("0")));
}
