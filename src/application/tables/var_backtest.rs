//! Time-series view over a VaR backtest: baselines, VaR per quantile, daily
//! P&L, breaches and rolling breach counts.

use crate::application::tables::format::{format_currency, format_percent};
use crate::application::tables::table::{Cell, Table};
use crate::domain::errors::{SerenityError, SerenityResult};
use crate::domain::types::common::format_date;
use crate::domain::types::var::{VaRAnalysisResult, VaRBacktestResult, VaRQuantile};
use chrono::NaiveDate;
use statrs::distribution::{Binomial, DiscreteCDF};
use std::collections::BTreeMap;

pub const DEFAULT_BREACH_COUNT_PERIOD: usize = 365;

const RUN_DATE_COL: &str = "Run Date";
const BASELINE_COL: &str = "Baseline ($)";
const PNL_COL: &str = "P&L";
const BREACH_COL: &str = "Breach";

/// Confidence levels for the green/amber and amber/red boundaries
const TRAFFIC_LIGHT_CONFIDENCE: [f64; 2] = [0.05, 0.0001];

fn quantile_label(quantile: f64) -> String {
    format!("{}", quantile)
}

#[derive(Debug, Clone)]
pub struct VaRBacktestTables {
    quantiles: Vec<f64>,
    breach_count_period: usize,
    run_dates: Vec<NaiveDate>,
    baselines: Vec<f64>,
    // indexed [quantile][day]
    vars_abs: Vec<Vec<Option<f64>>>,
    vars_rel: Vec<Vec<Option<f64>>>,
    pnls_abs: Vec<Option<f64>>,
    pnls_rel: Vec<Option<f64>>,
    breaches: Vec<Vec<bool>>,
    rolling_breaches: Vec<Vec<Option<f64>>>,
}

impl VaRBacktestTables {
    pub fn new(result: &VaRBacktestResult, quantiles: &[f64], breach_count_period: usize) -> Self {
        let by_date: BTreeMap<NaiveDate, &VaRAnalysisResult> =
            result.results.iter().map(|r| (r.run_date, r)).collect();
        let run_dates: Vec<NaiveDate> = by_date.keys().copied().collect();
        let days: Vec<&VaRAnalysisResult> = by_date.into_values().collect();
        let baselines: Vec<f64> = days.iter().map(|r| r.baseline).collect();

        let var_series = |f: fn(&VaRQuantile) -> f64| -> Vec<Vec<Option<f64>>> {
            quantiles
                .iter()
                .enumerate()
                .map(|(i, q)| {
                    days.iter()
                        .map(|r| r.quantile(*q).or_else(|| r.quantiles.get(i)).map(f))
                        .collect()
                })
                .collect()
        };
        let vars_abs = var_series(|q| q.var_absolute);
        let vars_rel = var_series(|q| q.var_relative);

        // P&L realised over the day after each run date
        let pnls_abs: Vec<Option<f64>> = (0..baselines.len())
            .map(|t| baselines.get(t + 1).map(|next| next - baselines[t]))
            .collect();
        let pnls_rel: Vec<Option<f64>> = pnls_abs
            .iter()
            .zip(&baselines)
            .map(|(pnl, baseline)| pnl.map(|p| p / baseline))
            .collect();

        let breaches: Vec<Vec<bool>> = quantiles
            .iter()
            .zip(&vars_abs)
            .map(|(q, vars)| {
                let direction = if *q < 50.0 { -1.0 } else { 1.0 };
                vars.iter()
                    .zip(&pnls_abs)
                    .map(|(var, pnl)| match (var, pnl) {
                        (Some(var), Some(pnl)) => direction * (var - (-pnl)) < 0.0,
                        _ => false,
                    })
                    .collect()
            })
            .collect();

        let rolling_breaches = breaches
            .iter()
            .map(|series| rolling_sum(series, breach_count_period))
            .collect();

        Self {
            quantiles: quantiles.to_vec(),
            breach_count_period,
            run_dates,
            baselines,
            vars_abs,
            vars_rel,
            pnls_abs,
            pnls_rel,
            breaches,
            rolling_breaches,
        }
    }

    pub fn breach_count_period(&self) -> usize {
        self.breach_count_period
    }

    pub fn run_dates(&self) -> &[NaiveDate] {
        &self.run_dates
    }

    fn quantile_index(&self, quantile: f64) -> SerenityResult<usize> {
        self.quantiles
            .iter()
            .position(|q| (q - quantile).abs() < 1e-9)
            .ok_or_else(|| {
                SerenityError::invalid_input(format!("quantile {} was not part of the backtest", quantile))
            })
    }

    fn series_table(&self, name: &str, series: &[Option<f64>]) -> SerenityResult<Table> {
        let mut table = Table::new(["run_date"], [name]);
        for (date, value) in self.run_dates.iter().zip(series) {
            table.push_row(vec![Cell::from(format_date(*date)), Cell::from(*value)])?;
        }
        Ok(table)
    }

    fn by_quantile_table<T: Copy + Into<Cell>>(&self, series: &[Vec<T>]) -> SerenityResult<Table> {
        let mut table = Table::new(["run_date"], self.quantiles.iter().map(|q| quantile_label(*q)));
        for (t, date) in self.run_dates.iter().enumerate() {
            let mut row = vec![Cell::from(format_date(*date))];
            row.extend(series.iter().map(|s| s[t].into()));
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Baseline portfolio value per run date
    pub fn get_baselines(&self) -> SerenityResult<Table> {
        let series: Vec<Option<f64>> = self.baselines.iter().copied().map(Some).collect();
        self.series_table("baseline", &series)
    }

    pub fn get_absolute_var_by_quantiles(&self) -> SerenityResult<Table> {
        self.by_quantile_table(&self.vars_abs)
    }

    pub fn get_relative_var_by_quantiles(&self) -> SerenityResult<Table> {
        self.by_quantile_table(&self.vars_rel)
    }

    /// Next day's baseline minus this day's; missing on the last day
    pub fn get_absolute_pnl(&self) -> SerenityResult<Table> {
        self.series_table("pnl", &self.pnls_abs)
    }

    pub fn get_relative_pnl(&self) -> SerenityResult<Table> {
        self.series_table("pnl", &self.pnls_rel)
    }

    pub fn get_var_breaches(&self) -> SerenityResult<Table> {
        self.by_quantile_table(&self.breaches)
    }

    /// Breaches over the trailing `breach_count_period` days; missing until the window fills
    pub fn get_rolling_breaches(&self) -> SerenityResult<Table> {
        self.by_quantile_table(&self.rolling_breaches)
    }

    pub fn breach_count(&self, quantile: f64) -> SerenityResult<usize> {
        let i = self.quantile_index(quantile)?;
        Ok(self.breaches[i].iter().filter(|b| **b).count())
    }

    /// Breach days for `quantile` with the VaR forecast and realised P&L
    pub fn get_breaches_summary(&self, quantile: f64) -> SerenityResult<Table> {
        let i = self.quantile_index(quantile)?;
        let label = quantile_label(quantile);
        let mut table = Table::new(
            [RUN_DATE_COL],
            [
                BASELINE_COL.to_string(),
                format!("{}% VaR ($)", label),
                format!("{}% VaR (Relative)", label),
                PNL_COL.to_string(),
                BREACH_COL.to_string(),
            ],
        );
        for t in (0..self.run_dates.len()).filter(|t| self.breaches[i][*t]) {
            table.push_row(vec![
                Cell::from(format_date(self.run_dates[t])),
                Cell::from(self.baselines[t]),
                Cell::from(self.vars_abs[i][t]),
                Cell::from(self.vars_rel[i][t]),
                Cell::from(self.pnls_abs[t]),
                Cell::from(true),
            ])?;
        }
        Ok(table)
    }

    /// Render a breaches summary for display: currency amounts as `$1,234.56`
    /// (losses in parentheses) and relative VaR as a percentage
    pub fn format_breaches_summary(summary: &Table) -> SerenityResult<Table> {
        let mut formatted = Table::new(summary.index_columns().to_vec(), summary.columns().to_vec());
        let relative_col = summary.index_columns().len() + 2;
        for row in summary.rows() {
            let cells = row
                .iter()
                .enumerate()
                .map(|(pos, cell)| match cell.as_f64() {
                    Some(v) if pos == relative_col => Cell::from(format_percent(v)),
                    Some(v) => Cell::from(format_currency(v)),
                    None => cell.clone(),
                })
                .collect();
            formatted.push_row(cells)?;
        }
        Ok(formatted)
    }

    /// Breach counts at which the rolling count moves from green to amber and
    /// from amber to red, from the binomial tail over the breach window
    pub fn traffic_light_zones(&self, quantile: f64) -> SerenityResult<(u64, u64)> {
        traffic_light_zones(quantile, self.breach_count_period)
    }
}

/// Green/amber and amber/red breach-count boundaries for `quantile` over `period` days
pub fn traffic_light_zones(quantile: f64, period: usize) -> SerenityResult<(u64, u64)> {
    let n = period as u64;
    let binomial = Binomial::new(1.0 - quantile / 100.0, n)
        .map_err(|e| SerenityError::invalid_input(format!("quantile {}: {}", quantile, e)))?;

    let boundary = |confidence: f64| {
        (0..n)
            .find(|x| 1.0 - binomial.cdf(*x) < confidence)
            .ok_or_else(|| {
                SerenityError::invalid_input(format!(
                    "no breach count within {} days reaches confidence {}",
                    period, confidence
                ))
            })
    };
    Ok((
        boundary(TRAFFIC_LIGHT_CONFIDENCE[0])?,
        boundary(TRAFFIC_LIGHT_CONFIDENCE[1])?,
    ))
}

fn rolling_sum(series: &[bool], window: usize) -> Vec<Option<f64>> {
    (0..series.len())
        .map(|t| {
            if window == 0 || t + 1 < window {
                None
            } else {
                Some(series[t + 1 - window..=t].iter().filter(|b| **b).count() as f64)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(date: &str, baseline: f64, var99: f64) -> serde_json::Value {
        json!({
            "runDate": date,
            "baseline": baseline,
            "quantiles": [
                {"quantile": 1.0, "varAbsolute": -var99, "varRelative": -var99 / baseline},
                {"quantile": 99.0, "varAbsolute": var99, "varRelative": var99 / baseline}
            ]
        })
    }

    fn backtest() -> VaRBacktestResult {
        VaRBacktestResult::parse(json!({
            "results": [
                day("2022-01-03", 1000.0, 50.0),
                day("2022-01-01", 1000.0, 50.0),
                day("2022-01-02", 1100.0, 50.0),
                day("2022-01-04", 900.0, 50.0)
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_pnl_and_breaches() {
        let tables = VaRBacktestTables::new(&backtest(), &[1.0, 99.0], 2);
        assert_eq!(tables.run_dates()[0], NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());

        let pnl = tables.get_absolute_pnl().unwrap();
        assert_eq!(pnl.get(0, "pnl").unwrap().as_f64(), Some(100.0));
        assert_eq!(pnl.get(1, "pnl").unwrap().as_f64(), Some(-100.0));
        assert!(pnl.get(3, "pnl").unwrap().is_missing());

        // losses of 100 exceed the 99% VaR of 50; gains of 100 exceed the 1% VaR
        assert_eq!(tables.breach_count(99.0).unwrap(), 2);
        assert_eq!(tables.breach_count(1.0).unwrap(), 1);

        let rolling = tables.get_rolling_breaches().unwrap();
        assert!(rolling.get(0, "99").unwrap().is_missing());
        assert_eq!(rolling.get(2, "99").unwrap().as_f64(), Some(2.0));
        assert_eq!(rolling.get(3, "99").unwrap().as_f64(), Some(1.0));
    }

    #[test]
    fn test_breaches_summary() {
        let tables = VaRBacktestTables::new(&backtest(), &[1.0, 99.0], DEFAULT_BREACH_COUNT_PERIOD);
        let summary = tables.get_breaches_summary(99.0).unwrap();
        assert_eq!(
            summary.columns(),
            ["Baseline ($)", "99% VaR ($)", "99% VaR (Relative)", "P&L", "Breach"]
        );
        assert_eq!(summary.len(), 2);
        assert_eq!(summary.get(0, "Run Date").unwrap().as_str(), Some("2022-01-02"));

        let formatted = VaRBacktestTables::format_breaches_summary(&summary).unwrap();
        assert_eq!(formatted.get(0, "Baseline ($)").unwrap().as_str(), Some("$1,100.00"));
        assert_eq!(formatted.get(0, "P&L").unwrap().as_str(), Some("($100.00)"));
        assert_eq!(formatted.get(0, "Breach").unwrap().as_bool(), Some(true));

        assert!(tables.get_breaches_summary(95.0).is_err());
    }

    #[test]
    fn test_traffic_light_zones() {
        let (green_amber, amber_red) = traffic_light_zones(99.0, 250).unwrap();
        assert!(green_amber < amber_red);
        // Basel: 250 days at 99% puts the amber zone at 5 breaches
        assert_eq!(green_amber, 5);
        assert!(traffic_light_zones(150.0, 250).is_err());
    }

    #[test]
    fn test_rolling_sum() {
        assert_eq!(
            rolling_sum(&[true, false, true], 2),
            vec![None, Some(1.0), Some(1.0)]
        );
    }
}
