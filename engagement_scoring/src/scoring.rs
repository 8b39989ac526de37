use log::{debug, warn};

use crate::config::*;
use crate::dataset::Dataset;

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Computes the mean of each column over all the rows of the dataset.
///
/// Columns that are missing, not numeric or without any value are left out
/// of the result. The order of the input is kept.
pub fn score<S: AsRef<str>>(dataset: &Dataset, columns: &[S]) -> Vec<AggregateScore> {
    let mut res: Vec<AggregateScore> = Vec::new();
    for name in columns.iter().map(|c| c.as_ref()) {
        let col = match dataset.column(name) {
            Some(c) => c,
            None => {
                warn!("score: column {:?} does not exist, skipping", name);
                continue;
            }
        };
        if col.kind() != ColumnKind::Numeric {
            debug!("score: column {:?} is not numeric, skipping", name);
            continue;
        }
        match mean(col.numbers()) {
            Some(value) => res.push(AggregateScore {
                statement: name.to_string(),
                value,
            }),
            None => debug!("score: column {:?} has no values, skipping", name),
        }
    }
    res
}

/// Returns the `n` lowest (ascending) or highest (descending) scores.
///
/// The sort is stable: equal scores keep their input order. Asking for more
/// scores than available returns all of them.
pub fn top_n(scores: &[AggregateScore], n: usize, direction: Direction) -> Vec<AggregateScore> {
    let mut sorted: Vec<AggregateScore> = scores.to_vec();
    match direction {
        Direction::Ascending => sorted.sort_by(|a, b| a.value.total_cmp(&b.value)),
        Direction::Descending => sorted.sort_by(|a, b| b.value.total_cmp(&a.value)),
    }
    sorted.truncate(n);
    sorted
}
