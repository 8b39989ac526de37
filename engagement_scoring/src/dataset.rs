use log::debug;
use std::collections::{HashMap, HashSet};

use crate::config::*;

// Hashable form of a non-empty cell, equal exactly when the cells are equal.
#[derive(Eq, PartialEq, Hash)]
enum CellKey<'a> {
    Number(u64),
    Text(&'a str),
    Bool(bool),
}

impl<'a> CellKey<'a> {
    fn of(cell: &'a Cell) -> Option<CellKey<'a>> {
        match cell {
            Cell::Empty => None,
            // 0.0 and -0.0 compare equal.
            Cell::Number(x) if *x == 0.0 => Some(CellKey::Number(0.0f64.to_bits())),
            Cell::Number(x) => Some(CellKey::Number(x.to_bits())),
            Cell::Text(s) => Some(CellKey::Text(s.as_str())),
            Cell::Bool(b) => Some(CellKey::Bool(*b)),
        }
    }
}

/// A named column of a dataset.
#[derive(PartialEq, Debug, Clone)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    cells: Vec<Cell>,
}

impl Column {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The numeric values of the column, skipping the empty cells.
    pub fn numbers(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().filter_map(|c| c.as_number())
    }
}

fn infer_kind(cells: &[Cell]) -> ColumnKind {
    let all_numbers = cells
        .iter()
        .all(|c| matches!(c, Cell::Empty | Cell::Number(_)));
    if all_numbers {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

/// An immutable table of named columns of equal length.
///
/// Column kinds are inferred at construction and kept by every derived
/// dataset, so that a subset of a text column is still a text column.
#[derive(PartialEq, Debug, Clone)]
pub struct Dataset {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    num_rows: usize,
}

impl Dataset {
    /// Builds a dataset from (name, cells) pairs.
    ///
    /// Fails if two columns share a name or if the columns do not all have
    /// the same length.
    pub fn new(columns: Vec<(String, Vec<Cell>)>) -> Result<Dataset, AnalysisError> {
        let cols = columns
            .into_iter()
            .map(|(name, cells)| Column {
                kind: infer_kind(&cells),
                name,
                cells,
            })
            .collect();
        Dataset::from_columns(cols)
    }

    fn from_columns(columns: Vec<Column>) -> Result<Dataset, AnalysisError> {
        let num_rows = columns.first().map(|c| c.cells.len()).unwrap_or(0);
        let mut index: HashMap<String, usize> = HashMap::new();
        for (idx, c) in columns.iter().enumerate() {
            if c.cells.len() != num_rows {
                return Err(AnalysisError::MalformedDataset {
                    message: format!(
                        "column '{}' has {} rows, expected {}",
                        c.name,
                        c.cells.len(),
                        num_rows
                    ),
                });
            }
            if index.insert(c.name.clone(), idx).is_some() {
                return Err(AnalysisError::MalformedDataset {
                    message: format!("duplicate column name '{}'", c.name),
                });
            }
        }
        Ok(Dataset {
            columns,
            index,
            num_rows,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.name())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|idx| &self.columns[*idx])
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The names of all the numeric columns, in dataset order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Numeric)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Returns the column, or a schema error naming the dataset it was expected in.
    pub fn require_column(&self, name: &str, dataset: &str) -> Result<&Column, AnalysisError> {
        self.column(name).ok_or_else(|| AnalysisError::Schema {
            dataset: dataset.to_string(),
            column: name.to_string(),
        })
    }

    /// The distinct non-empty values of a field, in order of first appearance.
    pub fn distinct_values(&self, field: &str) -> Result<Vec<Cell>, AnalysisError> {
        let col = self.require_column(field, ENGAGEMENT_DATASET)?;
        let mut seen: HashSet<CellKey> = HashSet::new();
        let mut res: Vec<Cell> = Vec::new();
        for c in col.cells.iter() {
            if let Some(key) = CellKey::of(c) {
                if seen.insert(key) {
                    res.push(c.clone());
                }
            }
        }
        Ok(res)
    }

    /// The row of cells at the given position, in column order.
    pub fn row(&self, idx: usize) -> Option<Vec<&Cell>> {
        if idx >= self.num_rows {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.cells[idx]).collect())
    }

    fn take_rows(&self, rows: &[usize]) -> Dataset {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                kind: c.kind,
                cells: rows.iter().map(|r| c.cells[*r].clone()).collect(),
            })
            .collect();
        Dataset {
            columns,
            index: self.index.clone(),
            num_rows: rows.len(),
        }
    }
}

/// Keeps the rows for which every field of the selector equals its value.
///
/// The comparison is exact (case-sensitive for text). Row order is kept.
pub fn filter(dataset: &Dataset, selector: &Selector) -> Result<Dataset, AnalysisError> {
    let mut conditions: Vec<(&Column, &Cell)> = Vec::new();
    for (field, value) in selector.conditions() {
        conditions.push((dataset.require_column(field, ENGAGEMENT_DATASET)?, value));
    }

    let rows: Vec<usize> = (0..dataset.num_rows())
        .filter(|r| conditions.iter().all(|(col, v)| col.cells[*r] == **v))
        .collect();
    debug!(
        "filter: selector {:?} kept {} of {} rows",
        selector.conditions(),
        rows.len(),
        dataset.num_rows()
    );
    Ok(dataset.take_rows(&rows))
}
