//! Pivoted (row label × column label) views of long-format records, as the
//! risk endpoints return covariance, correlation and exposure data.

use crate::application::tables::table::{Cell, Table};
use crate::domain::errors::{SerenityError, SerenityResult};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    row_labels: Vec<String>,
    col_labels: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

fn label_of(record: &Value, key: &str) -> SerenityResult<String> {
    match record.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(SerenityError::parse(format!("record is missing {}: {}", key, record))),
    }
}

impl Matrix {
    /// Pivot `records` into a matrix. Records without a numeric `value_key`
    /// are dropped. Labels come out sorted.
    pub fn pivot(records: &[Value], row_key: &str, col_key: &str, value_key: &str) -> SerenityResult<Self> {
        let mut cells: BTreeMap<(String, String), f64> = BTreeMap::new();
        let mut rows = BTreeSet::new();
        let mut cols = BTreeSet::new();

        for record in records {
            let Some(value) = record.get(value_key).and_then(Value::as_f64) else {
                continue;
            };
            let row = label_of(record, row_key)?;
            let col = label_of(record, col_key)?;
            rows.insert(row.clone());
            cols.insert(col.clone());
            cells.insert((row, col), value);
        }

        let row_labels: Vec<String> = rows.into_iter().collect();
        let col_labels: Vec<String> = cols.into_iter().collect();
        let values = row_labels
            .iter()
            .map(|r| {
                col_labels
                    .iter()
                    .map(|c| cells.get(&(r.clone(), c.clone())).copied())
                    .collect()
            })
            .collect();

        Ok(Self {
            row_labels,
            col_labels,
            values,
        })
    }

    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    pub fn col_labels(&self) -> &[String] {
        &self.col_labels
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.row_labels.len(), self.col_labels.len())
    }

    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let r = self.row_labels.iter().position(|l| l == row)?;
        let c = self.col_labels.iter().position(|l| l == col)?;
        self.values[r][c]
    }

    /// Rename row and column labels, e.g. asset IDs to ticker symbols
    pub fn relabel<F>(self, mut f: F) -> SerenityResult<Self>
    where
        F: FnMut(&str) -> SerenityResult<String>,
    {
        let row_labels = self.row_labels.iter().map(|l| f(l.as_str())).collect::<SerenityResult<_>>()?;
        let col_labels = self.col_labels.iter().map(|l| f(l.as_str())).collect::<SerenityResult<_>>()?;
        Ok(Self {
            row_labels,
            col_labels,
            values: self.values,
        })
    }

    /// Rename row labels only
    pub fn relabel_rows<F>(self, f: F) -> SerenityResult<Self>
    where
        F: FnMut(&str) -> SerenityResult<String>,
    {
        let row_labels = self.row_labels.iter().map(|l| l.as_str()).map(f).collect::<SerenityResult<_>>()?;
        Ok(Self {
            row_labels,
            col_labels: self.col_labels,
            values: self.values,
        })
    }

    /// Keep rows (and, when `square`, columns) whose label is in `labels`
    pub fn subset(&self, labels: &HashSet<String>, square: bool) -> Self {
        let rows: Vec<usize> = (0..self.row_labels.len())
            .filter(|i| labels.contains(&self.row_labels[*i]))
            .collect();
        let cols: Vec<usize> = (0..self.col_labels.len())
            .filter(|j| !square || labels.contains(&self.col_labels[*j]))
            .collect();
        Self {
            row_labels: rows.iter().map(|i| self.row_labels[*i].clone()).collect(),
            col_labels: cols.iter().map(|j| self.col_labels[*j].clone()).collect(),
            values: rows
                .iter()
                .map(|i| cols.iter().map(|j| self.values[*i][*j]).collect())
                .collect(),
        }
    }

    pub fn to_table(&self, index_name: &str) -> SerenityResult<Table> {
        let mut table = Table::new([index_name], self.col_labels.iter().cloned());
        for (label, row) in self.row_labels.iter().zip(&self.values) {
            let mut cells = Vec::with_capacity(row.len() + 1);
            cells.push(Cell::from(label.as_str()));
            cells.extend(row.iter().map(|v| Cell::from(*v)));
            table.push_row(cells)?;
        }
        Ok(table)
    }
}
