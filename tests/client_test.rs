mod common;

use common::mock_client;
use serde_json::json;
use serenity_sdk::domain::errors::SerenityError;
use serenity_sdk::domain::ports::CallType;
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn test_get_sends_auth_headers_and_query() {
    let (client, transport) = mock_client(vec![json!({"assetSummary": []})]);
    let params = vec![("asOfDate".to_string(), "2022-07-01".to_string())];

    assert_ok!(client.call_api("refdata", "/asset/summaries", &params, None, None).await);

    let request = transport.last_request().await.unwrap();
    assert_eq!(request.call_type, CallType::Get);
    assert_eq!(
        request.url,
        "https://serenity-rest.athansor.dev.cloudwall.network/v1/refdata/asset/summaries"
    );
    assert_eq!(request.query_param("asOfDate"), Some("2022-07-01"));
    assert_eq!(request.header("Authorization"), Some("Bearer test-token"));
    assert_eq!(request.header("X-User-Application-Id"), Some("..."));
    assert!(request.body.is_none());
}

#[tokio::test]
async fn test_legacy_path_goes_out_under_current_spelling() {
    let (client, transport) = mock_client(vec![json!({"factorReturns": []})]);

    assert_ok!(client.call_api("risk", "/factor/returns", &[], None, None).await);

    let request = transport.last_request().await.unwrap();
    assert!(request.url.ends_with("/v1/risk/market/factor/returns"));
}

#[tokio::test]
async fn test_post_with_params_folds_them_into_body() {
    let (client, transport) = mock_client(vec![json!({"result": {}})]);
    let params = vec![
        ("as_of_date".to_string(), "2022-07-01".to_string()),
        ("model_config_id".to_string(), "abc".to_string()),
    ];
    let portfolio = json!({"assetPositions": [{"assetId": common::BTC, "quantity": 1.0}]});

    assert_ok!(
        client
            .call_api("risk", "/compute/var", &params, Some(portfolio.clone()), None)
            .await
    );

    let request = transport.last_request().await.unwrap();
    assert_eq!(request.call_type, CallType::Post);
    assert!(request.url.ends_with("/v1/risk/var/compute"));
    assert!(request.query.is_empty());
    let body = request.body.unwrap();
    assert_eq!(body["asOfDate"], "2022-07-01");
    assert_eq!(body["modelConfigId"], "abc");
    assert_eq!(body["portfolio"], portfolio);
}

#[tokio::test]
async fn test_unknown_operation_is_rejected_before_sending() {
    let (client, transport) = mock_client(vec![]);

    let err = assert_err!(client.call_api("risk", "/nonsense", &[], None, None).await);
    assert!(matches!(err, SerenityError::UnknownOperation { ref path, .. } if path == "/risk/nonsense"));
    assert!(transport.requests().await.is_empty());
}

#[tokio::test]
async fn test_service_error_detail_surfaces() {
    let (client, _transport) = mock_client(vec![json!({"detail": "Field required: portfolio"})]);

    let err = assert_err!(client.call_api("valuation", "/portfolio/compute", &[], None, None).await);
    assert_eq!(err.to_string(), "Generic API error: Field required: portfolio");
}

#[tokio::test]
async fn test_explicit_call_type_overrides_configured_verb() {
    let scenario_id = uuid::Uuid::new_v4();
    let (client, transport) = mock_client(vec![json!({"result": {}})]);
    let path = format!("/custom/{}", scenario_id);

    assert_ok!(
        client
            .call_api("risk/scenarios", &path, &[], None, Some(CallType::Delete))
            .await
    );
    assert_eq!(transport.last_request().await.unwrap().call_type, CallType::Delete);
}
