// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The content of a single cell in a dataset.
///
/// Readers are expected to map their own cell representation to one of these
/// variants. Blank cells should be `Empty`, not an empty `Text`.
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(x) => Some(*x),
            _ => None,
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(x) => write!(f, "{}", x),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(x: f64) -> Self {
        Cell::Number(x)
    }
}

/// The type of a column, decided once when the dataset is loaded.
///
/// A column is numeric when all its non-empty cells are numbers. A column
/// without any value is numeric as well: it will never produce a score.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// A conjunction of exact-match conditions on categorical fields.
///
/// The fields are kept in insertion order. Setting the same field twice
/// replaces the previous value.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Selector {
    pub(crate) conditions: Vec<(String, Cell)>,
}

impl Selector {
    pub fn new() -> Selector {
        Selector::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<Cell>) -> Selector {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: &str, value: impl Into<Cell>) {
        let value = value.into();
        match self.conditions.iter_mut().find(|(f, _)| f == field) {
            Some(cond) => cond.1 = value,
            None => self.conditions.push((field.to_string(), value)),
        }
    }

    pub fn remove(&mut self, field: &str) {
        self.conditions.retain(|(f, _)| f != field);
    }

    pub fn get(&self, field: &str) -> Option<&Cell> {
        self.conditions
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v)
    }

    pub fn conditions(&self) -> &[(String, Cell)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

// ******** Output data structures *********

/// A column recognized as a survey statement.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct StatementColumn {
    pub name: String,
    /// The number parsed from the suffix of the name, if any.
    pub index: Option<u32>,
}

impl AsRef<str> for StatementColumn {
    fn as_ref(&self) -> &str {
        self.name.as_str()
    }
}

/// The mean of one statement column over a set of rows.
///
/// The value is always a finite number: undefined means are never built.
#[derive(PartialEq, Debug, Clone)]
pub struct AggregateScore {
    pub statement: String,
    pub value: f64,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum ActionBand {
    Low,
    Medium,
    High,
}

impl ActionBand {
    pub const HIGH_THRESHOLD: f64 = 4.0;
    pub const LOW_THRESHOLD: f64 = 2.0;

    /// Both thresholds are inclusive: 4.0 is High and 2.0 is Low.
    pub fn for_score(score: f64) -> ActionBand {
        if score >= ActionBand::HIGH_THRESHOLD {
            ActionBand::High
        } else if score <= ActionBand::LOW_THRESHOLD {
            ActionBand::Low
        } else {
            ActionBand::Medium
        }
    }

    /// The label used in the `Score` column of the action plan.
    pub fn label(&self) -> &'static str {
        match self {
            ActionBand::Low => "Low",
            ActionBand::Medium => "Medium",
            ActionBand::High => "High",
        }
    }

    pub fn from_label(label: &str) -> Option<ActionBand> {
        match label {
            "Low" => Some(ActionBand::Low),
            "Medium" => Some(ActionBand::Medium),
            "High" => Some(ActionBand::High),
            _ => None,
        }
    }
}

impl Display for ActionBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Recommendation {
    pub statement: String,
    pub score: f64,
    pub action: String,
}

/// The reason why a request did not produce anything to show.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum EmptyReason {
    NoMatchingRows,
    NoStatementColumns,
    NoNumericColumns,
    NoStatementScores,
}

/// Errors that prevent a request from completing.
///
/// `EmptyResult` is not fatal: the request ran but there is nothing to show,
/// and this should be reported as a warning.
#[derive(PartialEq, Debug, Clone)]
pub enum AnalysisError {
    Schema { dataset: String, column: String },
    EmptyResult(EmptyReason),
    Lookup { band: ActionBand },
    MalformedDataset { message: String },
}

impl AnalysisError {
    pub fn is_warning(&self) -> bool {
        matches!(self, AnalysisError::EmptyResult(_))
    }
}

impl Error for AnalysisError {}

impl Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::Schema { dataset, column } => {
                write!(f, "Missing column '{}' in the {} data", column, dataset)
            }
            AnalysisError::EmptyResult(EmptyReason::NoMatchingRows) => {
                write!(f, "No responses match the selected filters.")
            }
            AnalysisError::EmptyResult(EmptyReason::NoStatementColumns) => {
                write!(f, "No statements found within the requested range for the selected data.")
            }
            AnalysisError::EmptyResult(EmptyReason::NoNumericColumns) => {
                write!(f, "No numeric columns found to calculate scores.")
            }
            AnalysisError::EmptyResult(EmptyReason::NoStatementScores) => {
                write!(f, "No valid statement scores found to generate recommendations.")
            }
            AnalysisError::Lookup { band } => write!(
                f,
                "The action plan has no row with Score '{}'",
                band.label()
            ),
            AnalysisError::MalformedDataset { message } => {
                write!(f, "Malformed dataset: {}", message)
            }
        }
    }
}

// ********* Configuration **********

/// The fixed parameters of an analysis.
#[derive(PartialEq, Debug, Clone)]
pub struct AnalysisSettings {
    /// Prefix of the statement columns (`Q-1`, `Q-2`, ...).
    pub statement_prefix: String,
    /// Inclusive range of statement numbers for the ranged view.
    pub statement_range: (u32, u32),
    /// Number of entries shown by the overall lowest/highest views.
    pub overall_count: usize,
    /// Fields offered as selectors, in display order.
    pub selector_fields: Vec<String>,
}

pub const ENGAGEMENT_DATASET: &str = "engagement";
pub const ACTION_PLAN_DATASET: &str = "action plan";

pub const SCORE_COLUMN: &str = "Score";
pub const ACTION_COLUMN: &str = "Action";

pub const DEFAULT_SELECTOR_FIELDS: [&str; 3] = ["BUHR NAME", "Department", "BUHEAD NAME"];

impl AnalysisSettings {
    pub fn default_settings() -> AnalysisSettings {
        AnalysisSettings {
            statement_prefix: "Q-".to_string(),
            statement_range: (1, 26),
            overall_count: 5,
            selector_fields: DEFAULT_SELECTOR_FIELDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings::default_settings()
    }
}
