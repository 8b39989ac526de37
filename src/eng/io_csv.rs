// Primitives for reading CSV files.

use crate::eng::{
    io_common::{header_names, is_blank_row, parse_text_cell, simplify_file_name},
    *,
};
use engagement_scoring::builder::DatasetBuilder;

/// Reads a CSV file with a header row.
pub fn read_csv_dataset(path: &str) -> EngResult<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let raw_names: Vec<Option<String>> = rdr
        .headers()
        .context(CsvLineParseSnafu { path, lineno: 1usize })?
        .iter()
        .map(|s| Some(s.to_string()))
        .collect();
    let names = header_names(&raw_names);
    debug!("read_csv_dataset: header: {:?}", names);

    let mut builder = DatasetBuilder::new(&names);
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        let cells: Vec<Cell> = line.iter().map(parse_text_cell).collect();
        if is_blank_row(&cells) {
            debug!("read_csv_dataset: skipping blank line {}", lineno);
            continue;
        }
        builder.add_row(cells);
    }
    info!(
        "Read {} rows from {}",
        builder.num_rows(),
        simplify_file_name(path)
    );
    builder.build().context(AnalysisSnafu {})
}
