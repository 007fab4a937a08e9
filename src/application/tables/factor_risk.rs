use crate::application::tables::table::{Cell, Table};
use crate::domain::errors::SerenityResult;
use crate::domain::types::common::SectorPath;
use crate::domain::types::factors::{Risk, RiskAttributionResult};
use crate::domain::types::refdata::{AssetMaster, NATIVE, SERENITY};

const RISK_SUFFIXES: [&str; 3] = ["FactorRisk", "SpecificRisk", "TotalRisk"];

fn risk_columns(prefix: &str) -> Vec<String> {
    RISK_SUFFIXES.iter().map(|s| format!("{}{}", prefix, s)).collect()
}

fn risk_cells(r: &Risk) -> [Cell; 3] {
    [r.factor_risk.into(), r.specific_risk.into(), r.total_risk.into()]
}

fn sector_level_columns(depth: usize) -> Vec<String> {
    (1..=depth).map(|n| format!("sectorLevel{}", n)).collect()
}

fn sector_level_cells(path: &SectorPath, depth: usize) -> Vec<Cell> {
    (0..depth)
        .map(|i| {
            path.sector_levels
                .get(i)
                .map(|level| Cell::from(level.as_str()))
                .unwrap_or(Cell::Missing)
        })
        .collect()
}

/// Flattens a [`RiskAttributionResult`] into tables, one per pivot
pub struct FactorRiskTables<'a> {
    result: &'a RiskAttributionResult,
}

impl<'a> FactorRiskTables<'a> {
    pub fn new(result: &'a RiskAttributionResult) -> Self {
        Self { result }
    }

    /// Factor, specific and total risk, indexed by measure (volatility, variance)
    pub fn to_total_risk_table(&self) -> SerenityResult<Table> {
        let mut table = Table::new(["measure"], ["factorRisk", "specificRisk", "totalRisk"]);
        for (measure, risk) in [
            ("volatility", self.result.get_portfolio_volatility()),
            ("variance", self.result.get_portfolio_variance()),
        ] {
            let mut row = vec![Cell::from(measure)];
            row.extend(risk_cells(risk));
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Absolute, relative and marginal risk per asset, sorted by Serenity symbol.
    /// Only assets present in all three breakdowns get a row.
    pub fn to_asset_risk_table(&self, asset_master: &AssetMaster) -> SerenityResult<Table> {
        let mut columns = vec!["assetNativeSymbol".to_string(), "assetSerenitySymbol".to_string()];
        for prefix in ["absolute", "relative", "marginal"] {
            columns.extend(risk_columns(prefix));
        }
        let mut table = Table::new(["assetId"], columns);

        let absolute = self.result.get_absolute_risk_by_asset();
        let relative = self.result.get_relative_risk_by_asset();
        let marginal = self.result.get_marginal_risk_by_asset();
        for (asset_id, abs_risk) in absolute {
            let (Some(rel_risk), Some(marginal_risk)) = (relative.get(asset_id), marginal.get(asset_id)) else {
                continue;
            };
            let mut row = vec![
                Cell::from(asset_id.to_string()),
                Cell::from(asset_master.get_symbol_by_id(asset_id, NATIVE)?),
                Cell::from(asset_master.get_symbol_by_id(asset_id, SERENITY)?),
            ];
            row.extend(risk_cells(abs_risk));
            row.extend(risk_cells(rel_risk));
            row.extend(risk_cells(marginal_risk));
            table.push_row(row)?;
        }
        table.sort_by_column("assetSerenitySymbol")?;
        Ok(table)
    }

    /// Absolute and relative risk per sector, indexed by sector levels. Only
    /// sectors with both breakdowns get a row.
    pub fn to_sector_risk_table(&self) -> SerenityResult<Table> {
        let absolute = self.result.get_absolute_risk_by_sector();
        let relative = self.result.get_relative_risk_by_sector();
        let paths: Vec<(&SectorPath, &Risk, &Risk)> = absolute
            .iter()
            .filter_map(|(path, abs_risk)| relative.get(path).map(|rel_risk| (path, abs_risk, rel_risk)))
            .collect();
        let depth = paths.iter().map(|(path, _, _)| path.depth()).max().unwrap_or(0);

        let mut columns = risk_columns("absolute");
        columns.extend(risk_columns("relative"));
        let mut table = Table::new(sector_level_columns(depth), columns);

        for (path, abs_risk, rel_risk) in paths {
            let mut row = sector_level_cells(path, depth);
            row.extend(risk_cells(abs_risk));
            row.extend(risk_cells(rel_risk));
            table.push_row(row)?;
        }
        table.sort_by_index();
        Ok(table)
    }

    /// One row per (sector, factor) pair, in the order the service returned them
    pub fn to_sector_factor_risk_table(&self) -> SerenityResult<Table> {
        let exposures = self.result.get_sector_factor_exposures();
        let depth = exposures.iter().map(|(path, _)| path.depth()).max().unwrap_or(0);

        let mut index = sector_level_columns(depth);
        index.push("factor".to_string());
        let mut table = Table::new(
            index,
            ["absoluteRisk", "relativeRisk", "marginalRisk", "factorExposure", "factorExposureBaseCcy"],
        );
        for exposure in exposures.iter().flat_map(|(_, group)| group) {
            let mut row = sector_level_cells(&exposure.sector_path, depth);
            row.push(Cell::from(exposure.factor.as_str()));
            row.push(exposure.absolute_risk.into());
            row.push(exposure.relative_risk.into());
            row.push(exposure.marginal_risk.into());
            row.push(exposure.factor_exposure.factor_exposure.into());
            row.push(exposure.factor_exposure.factor_exposure_base_ccy.into());
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Portfolio-level risk contribution per factor
    pub fn to_factor_risk_table(&self) -> SerenityResult<Table> {
        let mut table = Table::new(
            ["factor"],
            [
                "absoluteRiskContribution",
                "relativeRiskContribution",
                "marginalRiskContribution",
                "factorExposureBaseCcy",
            ],
        );
        for risk in self.result.get_portfolio_risk_by_factor() {
            table.push_row(vec![
                Cell::from(risk.factor.as_str()),
                risk.absolute_risk_contribution.into(),
                risk.relative_risk_contribution.into(),
                risk.marginal_risk_contribution.into(),
                risk.factor_exposure.factor_exposure_base_ccy.into(),
            ])?;
        }
        Ok(table)
    }
}
