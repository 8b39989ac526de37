use log::debug;

use crate::config::StatementColumn;
use crate::dataset::Dataset;

fn parse_index(suffix: &str) -> Option<u32> {
    suffix.trim().parse::<u32>().ok()
}

/// Finds the statement columns of a dataset.
///
/// A statement column is a column whose name starts with `prefix`. When a
/// range `(lo, hi)` is given, only the columns whose suffix is an integer in
/// `lo..=hi` are returned: a suffix that is not a number (`Q-abc`) excludes
/// the column, it is not an error.
///
/// The columns are returned in dataset order. The result may be empty.
pub fn resolve(
    dataset: &Dataset,
    prefix: &str,
    range: Option<(u32, u32)>,
) -> Vec<StatementColumn> {
    let mut res: Vec<StatementColumn> = Vec::new();
    for name in dataset.column_names() {
        let suffix = match name.strip_prefix(prefix) {
            Some(s) => s,
            None => continue,
        };
        let index = parse_index(suffix);
        if let Some((lo, hi)) = range {
            match index {
                Some(n) if lo <= n && n <= hi => {}
                Some(n) => {
                    debug!("resolve: {:?}: index {} outside {}..={}", name, n, lo, hi);
                    continue;
                }
                None => {
                    debug!("resolve: {:?}: could not read a statement number", name);
                    continue;
                }
            }
        }
        res.push(StatementColumn {
            name: name.to_string(),
            index,
        });
    }
    debug!(
        "resolve: prefix {:?} range {:?}: {} columns",
        prefix,
        range,
        res.len()
    );
    res
}
