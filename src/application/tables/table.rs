use crate::domain::errors::{SerenityError, SerenityResult};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// A single table value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    Missing,
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Cell::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Missing sorts last; numbers before text
    fn sort_cmp(&self, other: &Cell) -> Ordering {
        fn rank(c: &Cell) -> u8 {
            match c {
                Cell::Bool(_) => 0,
                Cell::Number(_) => 1,
                Cell::Text(_) => 2,
                Cell::Missing => 3,
            }
        }
        match (self, other) {
            (Cell::Number(a), Cell::Number(b)) => a.total_cmp(b),
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            (Cell::Bool(a), Cell::Bool(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Missing => f.write_str(""),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        if value.is_nan() { Cell::Missing } else { Cell::Number(value) }
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map(Cell::from).unwrap_or(Cell::Missing)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// Row-oriented table with one or more index columns.
///
/// Each row holds the index cells first, then the value cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    index_columns: Vec<String>,
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<I, C>(index_columns: I, columns: C) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            index_columns: index_columns.into_iter().map(Into::into).collect(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> SerenityResult<()> {
        let width = self.index_columns.len() + self.columns.len();
        if row.len() != width {
            return Err(SerenityError::invalid_input(format!(
                "row has {} cells, table has {} columns",
                row.len(),
                width
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn index_columns(&self) -> &[String] {
        &self.index_columns
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.index_columns
            .iter()
            .chain(self.columns.iter())
            .position(|c| c == name)
    }

    /// All cells of an index or value column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let pos = self.position(name)?;
        Some(self.rows.iter().map(|row| &row[pos]).collect())
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let pos = self.position(column)?;
        self.rows.get(row).map(|r| &r[pos])
    }

    /// First row whose index cells render as `key`
    pub fn row_by_index(&self, key: &[&str]) -> Option<&[Cell]> {
        let n = self.index_columns.len();
        self.rows
            .iter()
            .find(|row| {
                row.len() >= n
                    && key.len() == n
                    && row[..n].iter().zip(key).all(|(c, k)| c.to_string() == *k)
            })
            .map(|row| row.as_slice())
    }

    pub fn sort_by_index(&mut self) {
        let n = self.index_columns.len();
        self.rows.sort_by(|a, b| {
            a[..n]
                .iter()
                .zip(&b[..n])
                .map(|(x, y)| x.sort_cmp(y))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
    }

    pub fn sort_by_column(&mut self, name: &str) -> SerenityResult<()> {
        let pos = self
            .position(name)
            .ok_or_else(|| SerenityError::invalid_input(format!("no column named {}", name)))?;
        self.rows.sort_by(|a, b| a[pos].sort_cmp(&b[pos]));
        Ok(())
    }

    /// Keep only rows matching `predicate`
    pub fn filter<F>(&self, predicate: F) -> Table
    where
        F: Fn(&[Cell]) -> bool,
    {
        Table {
            index_columns: self.index_columns.clone(),
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| predicate(r)).cloned().collect(),
        }
    }
}
