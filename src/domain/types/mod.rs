pub mod common;
pub mod factors;
pub mod model;
pub mod pricing;
pub mod refdata;
pub mod scenarios;
pub mod valuation;
pub mod var;

pub use common::{
    AssetPosition, CalculationContext, CashTreatment, MarkTime, Portfolio, PricingContext,
    STD_DATE_FMT, SectorPath,
};
pub use factors::{FactorExposureValue, Risk, RiskAttributionResult, SectorFactorExposure, TotalFactorRisk};
pub use model::ModelMetadata;
pub use refdata::{AssetMaster, AssetSummary, NATIVE, SERENITY};
pub use valuation::ValuationResult;
pub use var::{VaRAnalysisResult, VaRBacktestResult, VaRBreach, VaRQuantile};
