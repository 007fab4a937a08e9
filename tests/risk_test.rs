mod common;

use chrono::NaiveDate;
use common::{btc, eth, load_fixture, mock_provider};
use serenity_sdk::application::api::{DEFAULT_LOOKBACK_PERIOD, DEFAULT_VAR_QUANTILES};
use serenity_sdk::application::tables::{DEFAULT_BREACH_COUNT_PERIOD, FactorRiskTables, VaRBacktestTables};
use serenity_sdk::domain::types::common::{CalculationContext, Portfolio};
use serenity_sdk::domain::types::refdata::NATIVE;
use uuid::Uuid;

fn ctx() -> CalculationContext {
    CalculationContext::default()
        .with_as_of_date(NaiveDate::from_ymd_opt(2022, 7, 1).unwrap())
        .with_model_config_id(Uuid::new_v4())
}

#[tokio::test]
async fn test_risk_attribution_end_to_end() {
    let (api, transport) = mock_provider(vec![
        load_fixture("asset_summaries.json"),
        load_fixture("risk_attribution.json"),
    ]);

    let asset_master = api.refdata().load_asset_master(None).await.unwrap();
    let portfolio = asset_master
        .create_portfolio([("BTC", 0.25), ("ETH", 5.0)], NATIVE)
        .unwrap();
    assert!(portfolio.contains(&btc()));

    let result = api.risk().compute_risk_attrib(&ctx(), &portfolio, None).await.unwrap();
    assert_eq!(result.get_portfolio_volatility().total_risk, 0.55);

    let request = transport.last_request().await.unwrap();
    assert!(request.url.ends_with("/v1/risk/market/factor/attribution"));
    let body = request.body.unwrap();
    assert_eq!(body["asOfDate"], "2022-07-01");
    assert_eq!(body["assetPositions"], body["portfolio"]["assetPositions"]);
    assert!(body.get("sectorTaxonomyId").is_none());

    let tables = FactorRiskTables::new(&result);
    let assets = tables.to_asset_risk_table(&asset_master).unwrap();
    assert_eq!(assets.len(), 2);
    assert_eq!(assets.get(0, "assetNativeSymbol").unwrap().as_str(), Some("BTC"));
    assert_eq!(assets.get(1, "relativeTotalRisk").unwrap().as_f64(), Some(0.42));

    let sectors = tables.to_sector_risk_table().unwrap();
    assert_eq!(sectors.get(0, "sectorLevel1").unwrap().as_str(), Some("Currency"));

    let factors = tables.to_factor_risk_table().unwrap();
    assert_eq!(factors.len(), 2);
}

#[tokio::test]
async fn test_var_backtest_tables() {
    let (api, transport) = mock_provider(vec![load_fixture("var_backtest.json")]);
    let portfolio = Portfolio::new([(btc(), 0.25), (eth(), 5.0)]);

    let result = api
        .risk()
        .compute_var_backtest(
            &ctx(),
            &portfolio,
            NaiveDate::from_ymd_opt(2022, 1, 3).unwrap(),
            NaiveDate::from_ymd_opt(2022, 1, 9).unwrap(),
            DEFAULT_LOOKBACK_PERIOD,
            &[95.0, 99.0],
        )
        .await
        .unwrap();

    let body = transport.last_request().await.unwrap().body.unwrap();
    assert_eq!(body["startDate"], "2022-01-03");
    assert_eq!(body["endDate"], "2022-01-09");

    let tables = VaRBacktestTables::new(&result, &[95.0, 99.0], DEFAULT_BREACH_COUNT_PERIOD);
    assert_eq!(tables.run_dates().len(), 7);
    assert_eq!(tables.breach_count(95.0).unwrap(), 2);
    assert_eq!(tables.breach_count(99.0).unwrap(), 2);

    let summary = tables.get_breaches_summary(99.0).unwrap();
    assert_eq!(summary.get(0, "Run Date").unwrap().as_str(), Some("2022-01-04"));
    assert_eq!(summary.get(0, "P&L").unwrap().as_f64(), Some(-500.0));
}

#[tokio::test]
async fn test_backtest_rejects_reversed_dates() {
    let (api, transport) = mock_provider(vec![]);
    let err = api
        .risk()
        .compute_var_backtest(
            &ctx(),
            &Portfolio::default(),
            NaiveDate::from_ymd_opt(2022, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            DEFAULT_LOOKBACK_PERIOD,
            &DEFAULT_VAR_QUANTILES,
        )
        .await;
    assert!(err.is_err());
    assert!(transport.requests().await.is_empty());
}
