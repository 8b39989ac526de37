use rust_xlsxwriter::{Format, Workbook};

use crate::eng::*;

pub const WORKSHEET_NAME: &str = "Recommendations";

/// Writes the recommendations workbook in the given directory and returns its path.
///
/// The file always has the same name, an existing file is overwritten.
pub fn write_recommendations(directory: &str, report: &RecommendationReport) -> EngResult<String> {
    let p: PathBuf = [directory, RecommendationReport::EXPORT_FILE_NAME]
        .iter()
        .collect();
    let path = p.as_path().display().to_string();

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(WORKSHEET_NAME)
        .context(ExportSnafu { path: &path })?;

    for (col, title) in RecommendationReport::HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *title, &bold)
            .context(ExportSnafu { path: &path })?;
    }
    for (idx, rec) in report.rows.iter().enumerate() {
        let row = (idx + 1) as u32;
        worksheet
            .write_string(row, 0, rec.statement.as_str())
            .context(ExportSnafu { path: &path })?;
        worksheet
            .write_number(row, 1, rec.score)
            .context(ExportSnafu { path: &path })?;
        worksheet
            .write_string(row, 2, rec.action.as_str())
            .context(ExportSnafu { path: &path })?;
    }
    worksheet.autofit();

    workbook.save(&path).context(ExportSnafu { path: &path })?;
    info!(
        "Wrote {} recommendations to {} ({})",
        report.len(),
        path,
        RecommendationReport::EXPORT_MIME_TYPE
    );
    Ok(path)
}
