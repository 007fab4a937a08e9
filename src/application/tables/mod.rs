//! Tabular reshaping of API results for display and analysis.

pub mod factor_risk;
pub mod format;
pub mod matrix;
pub mod table;
pub mod var_backtest;

pub use factor_risk::FactorRiskTables;
pub use format::{format_currency, format_percent};
pub use matrix::Matrix;
pub use table::{Cell, Table};
pub use var_backtest::{DEFAULT_BREACH_COUNT_PERIOD, VaRBacktestTables, traffic_light_zones};
