use calamine::DataType;

use crate::eng::{
    io_common::{header_names, is_blank_row, simplify_file_name},
    *,
};
use engagement_scoring::builder::DatasetBuilder;

/// Reads the first row of a worksheet as the header and every following row as data.
pub fn read_excel_dataset(path: &str, worksheet_name: Option<&str>) -> EngResult<Dataset> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header = iter.next().context(EmptyExcelSnafu { path })?;
    let raw_names: Vec<Option<String>> = header
        .iter()
        .map(|dt| match dt {
            DataType::Empty => None,
            x => Some(x.to_string()),
        })
        .collect();
    let names = header_names(&raw_names);
    debug!("read_excel_dataset: header: {:?}", names);

    let mut builder = DatasetBuilder::new(&names);
    for (idx, row) in iter.enumerate() {
        let cells: Vec<Cell> = row.iter().map(read_cell).collect();
        if is_blank_row(&cells) {
            debug!("read_excel_dataset: skipping blank row {}", idx + 2);
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

fn read_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::Int(i) => Cell::Number(*i as f64),
        DataType::Float(f) => Cell::Number(*f),
        DataType::String(s) if s.trim().is_empty() => Cell::Empty,
        DataType::String(s) => Cell::Text(s.clone()),
        DataType::Bool(b) => Cell::Bool(*b),
        // Dates are kept as labels, they are not scores.
        DataType::DateTime(f) => Cell::Text(f.to_string()),
        DataType::Error(e) => {
            debug!("read_cell: error cell {:?} read as empty", e);
            Cell::Empty
        }
        _ => Cell::Empty,
    }
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> EngResult<calamine::Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    match worksheet_name {
        // A worksheet name was provided, use it.
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?
            .context(OpeningExcelSnafu { path }),
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path }),
    }
}
