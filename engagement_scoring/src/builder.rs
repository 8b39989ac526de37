pub use crate::config::*;
use crate::dataset::Dataset;

/// A builder for assembling a dataset row by row.
///
/// This is the simplest way for a reader to produce a dataset: declare the
/// header once, then push the rows in order.
///
/// ```
/// use engagement_scoring::builder::DatasetBuilder;
/// use engagement_scoring::Cell;
/// # use engagement_scoring::AnalysisError;
///
/// let mut builder = DatasetBuilder::new(&["Department", "Q-1"]);
/// builder.add_row(vec![Cell::from("Sales"), Cell::Number(4.0)]);
/// builder.add_row(vec![Cell::from("Ops"), Cell::Empty]);
///
/// let dataset = builder.build()?;
/// assert_eq!(dataset.num_rows(), 2);
///
/// # Ok::<(), AnalysisError>(())
/// ```
pub struct DatasetBuilder {
    pub(crate) _names: Vec<String>,
    pub(crate) _rows: Vec<Vec<Cell>>,
}

impl DatasetBuilder {
    pub fn new<S: AsRef<str>>(names: &[S]) -> DatasetBuilder {
        DatasetBuilder {
            _names: names.iter().map(|s| s.as_ref().to_string()).collect(),
            _rows: Vec::new(),
        }
    }

    pub fn row(mut self, cells: Vec<Cell>) -> DatasetBuilder {
        self.add_row(cells);
        self
    }

    /// Adds a row. Rows shorter than the header are padded with empty cells
    /// when the dataset is built; longer rows are an error.
    pub fn add_row(&mut self, cells: Vec<Cell>) {
        self._rows.push(cells);
    }

    pub fn num_rows(&self) -> usize {
        self._rows.len()
    }

    pub fn build(self) -> Result<Dataset, AnalysisError> {
        let width = self._names.len();
        let mut columns: Vec<Vec<Cell>> = (0..width)
            .map(|_| Vec::with_capacity(self._rows.len()))
            .collect();
        for (lineno, row) in self._rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(AnalysisError::MalformedDataset {
                    message: format!(
                        "row {} has {} cells but the header has {} columns",
                        lineno + 1,
                        row.len(),
                        width
                    ),
                });
            }
            let num_cells = row.len();
            for (col, cell) in columns.iter_mut().zip(row) {
                col.push(cell);
            }
            for col in columns.iter_mut().skip(num_cells) {
                col.push(Cell::Empty);
            }
        }
        Dataset::new(self._names.into_iter().zip(columns).collect())
    }
}
