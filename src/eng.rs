use log::{debug, info, warn};

use engagement_scoring::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Reader, Xlsx};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::eng::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod io_export;
mod render;

#[derive(Debug, Snafu)]
pub enum EngError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The file {path} has no worksheet or no header row"))]
    EmptyExcel { path: String },
    #[snafu(display("Cannot find worksheet {name:?} in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("{source}"))]
    Analysis { source: AnalysisError },
    #[snafu(display("Error exporting the recommendations to {path}"))]
    Export {
        source: rust_xlsxwriter::XlsxError,
        path: String,
    },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type EngResult<T> = Result<T, EngError>;

/// The analyses that can be requested, one per run.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Action {
    Options,
    Filter,
    Lowest,
    Highest,
    Bar,
    Pie,
    LowestStatements,
    Recommend,
}

impl Action {
    pub fn parse(s: &str) -> EngResult<Action> {
        let res = match s {
            "options" => Action::Options,
            "filter" => Action::Filter,
            "lowest" => Action::Lowest,
            "highest" => Action::Highest,
            "bar" => Action::Bar,
            "pie" => Action::Pie,
            "lowest-statements" => Action::LowestStatements,
            "recommend" => Action::Recommend,
            x => whatever!("Unknown action {:?}", x),
        };
        Ok(res)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Options => "options",
            Action::Filter => "filter",
            Action::Lowest => "lowest",
            Action::Highest => "highest",
            Action::Bar => "bar",
            Action::Pie => "pie",
            Action::LowestStatements => "lowest-statements",
            Action::Recommend => "recommend",
        }
    }
}

/// The outcome of an action, before rendering.
#[derive(PartialEq, Debug, Clone)]
pub enum ActionResult {
    Options(Vec<(String, Vec<Cell>)>),
    Rows(Dataset),
    Scores(Vec<AggregateScore>),
    Distribution(Vec<DistributionEntry>),
    Recommendations(RecommendationReport),
}

fn read_dataset(path: &str, rc: &ResolvedConfig) -> EngResult<Dataset> {
    info!("Attempting to read file {:?}", path);
    match rc.input_type {
        InputType::Xlsx => io_excel::read_excel_dataset(path, rc.excel_worksheet_name.as_deref()),
        InputType::Csv => io_csv::read_csv_dataset(path),
    }
}

// The text given on the command line is matched against the values of the data,
// so that numeric fields can be selected too.
fn selection_value(dataset: &Dataset, field: &str, value: &str) -> Cell {
    dataset
        .distinct_values(field)
        .ok()
        .and_then(|values| values.into_iter().find(|v| v.to_string() == value))
        .unwrap_or_else(|| Cell::from(value))
}

/// Starts from the first value of every selector field and applies the selections.
/// The value `*` removes the field from the selector.
pub fn build_selector(session: &Session, selections: &[(String, String)]) -> EngResult<Selector> {
    let mut selector = session.default_selector().context(AnalysisSnafu {})?;
    for (field, value) in selections {
        if value == "*" {
            selector.remove(field);
        } else {
            selector.set(field, selection_value(session.engagement(), field, value));
        }
    }
    Ok(selector)
}

pub fn run_action(
    session: &Session,
    selector: &Selector,
    action: Action,
    count: usize,
) -> Result<ActionResult, AnalysisError> {
    let res = match action {
        Action::Options => ActionResult::Options(session.selector_options()?),
        Action::Filter => ActionResult::Rows(session.select(selector)?),
        Action::Lowest => {
            ActionResult::Scores(session.overall_extremes(selector, count, Direction::Ascending)?)
        }
        Action::Highest => {
            ActionResult::Scores(session.overall_extremes(selector, count, Direction::Descending)?)
        }
        Action::Bar => ActionResult::Scores(session.all_statement_scores(selector)?),
        Action::Pie => {
            let scores = session.all_statement_scores(selector)?;
            ActionResult::Distribution(score_distribution(&scores))
        }
        Action::LowestStatements => {
            ActionResult::Scores(session.lowest_statements(selector, count)?)
        }
        Action::Recommend => ActionResult::Recommendations(session.recommendations(selector)?),
    };
    Ok(res)
}

fn cell_to_json(cell: &Cell) -> JSValue {
    match cell {
        Cell::Empty => JSValue::Null,
        Cell::Number(x) => json!(x),
        Cell::Text(s) => json!(s),
        Cell::Bool(b) => json!(b),
    }
}

fn result_to_json(res: &ActionResult) -> Vec<JSValue> {
    match res {
        ActionResult::Options(options) => options
            .iter()
            .map(|(field, values)| {
                let vs: Vec<JSValue> = values.iter().map(cell_to_json).collect();
                json!({"field": field, "values": vs})
            })
            .collect(),
        ActionResult::Rows(dataset) => (0..dataset.num_rows())
            .filter_map(|idx| dataset.row(idx))
            .map(|row| {
                let mut obj: JSMap<String, JSValue> = JSMap::new();
                for (name, cell) in dataset.column_names().zip(row) {
                    obj.insert(name.to_string(), cell_to_json(cell));
                }
                JSValue::Object(obj)
            })
            .collect(),
        ActionResult::Scores(scores) => scores
            .iter()
            .map(|s| json!({"statement": s.statement, "score": s.value}))
            .collect(),
        ActionResult::Distribution(entries) => entries
            .iter()
            .map(|e| json!({"score": e.value, "count": e.count, "percent": e.percent}))
            .collect(),
        ActionResult::Recommendations(report) => report
            .rows
            .iter()
            .map(|r| json!({"statement": r.statement, "score": r.score, "action": r.action}))
            .collect(),
    }
}

fn build_summary_js(
    action: Action,
    selector: &Selector,
    outcome: &Result<ActionResult, AnalysisError>,
) -> JSValue {
    let mut sel: JSMap<String, JSValue> = JSMap::new();
    for (field, value) in selector.conditions() {
        sel.insert(field.clone(), cell_to_json(value));
    }
    match outcome {
        Ok(res) => json!({
            "action": action.name(),
            "selector": sel,
            "results": result_to_json(res)
        }),
        Err(e) => json!({
            "action": action.name(),
            "selector": sel,
            "results": [],
            "warning": e.to_string()
        }),
    }
}

fn render_result(action: Action, res: &ActionResult, count: usize) -> String {
    match res {
        ActionResult::Options(options) => render::render_options(options),
        ActionResult::Rows(dataset) => render::render_rows(dataset),
        ActionResult::Scores(scores) => match action {
            Action::Lowest => render::render_scores(
                &format!("Lowest {} Scores (Overall):", count),
                scores,
            ),
            Action::Highest => render::render_scores(
                &format!("Highest {} Scores (Overall):", count),
                scores,
            ),
            Action::LowestStatements => render::render_bar_chart(
                &format!("Top {} Lowest Scoring Statements:", scores.len()),
                &bar_series(scores),
            ),
            _ => render::render_bar_chart("Average Scores for All Statements", &bar_series(scores)),
        },
        ActionResult::Distribution(entries) => {
            render::render_distribution("Distribution of Scores (All Statements)", entries)
        }
        ActionResult::Recommendations(report) => render::render_recommendations(report),
    }
}

fn write_output(out: &str, content: &str) -> EngResult<()> {
    match out {
        "" => Ok(()),
        "stdout" => {
            println!("{}", content);
            Ok(())
        }
        path => {
            fs::write(path, content).context(WritingOutputSnafu { path })?;
            info!("Wrote summary to {}", path);
            Ok(())
        }
    }
}

pub fn read_summary(path: &str) -> EngResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// Compares a summary to a reference file and prints the differences.
pub fn check_reference(reference_path: &str, summary: &JSValue) -> EngResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("summary: {:?}", summary_ref);
    let pretty_ref = serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    let pretty_stats = serde_json::to_string_pretty(summary).context(ParsingJsonSnafu {})?;
    if pretty_ref != pretty_stats {
        warn!("Found differences with the reference summary");
        print_diff(pretty_ref.as_str(), pretty_stats.as_str(), "\n");
        return ReferenceMismatchSnafu {}.fail();
    }
    Ok(())
}

/// Runs one analysis as described by the arguments and returns its JSON summary.
///
/// Empty results are reported as warnings and are not errors.
pub fn run_analysis(args: &Args) -> EngResult<JSValue> {
    let rc = resolve_config(args)?;
    let action = match args.action.as_deref() {
        Some(s) => Action::parse(s)?,
        None => Action::Recommend,
    };
    info!("config: {:?} action: {:?}", rc, action);

    let engagement = read_dataset(&rc.engagement_path, &rc)?;
    let action_plan = read_dataset(&rc.action_plan_path, &rc)?;
    let count = rc.settings.overall_count;
    let session = Session::new(engagement, &action_plan, rc.settings).context(AnalysisSnafu {})?;

    let selector = build_selector(&session, &rc.selections)?;
    info!("selector: {:?}", selector.conditions());

    let outcome = run_action(&session, &selector, action, count);
    match &outcome {
        Ok(res) => {
            println!("{}", render_result(action, res, count));
            if let (ActionResult::Recommendations(report), Some(dir)) = (res, &args.export) {
                let path = io_export::write_recommendations(dir, report)?;
                println!("Recommendations written to {}", path);
            }
        }
        Err(e) if e.is_warning() => {
            warn!("{}", e);
            println!("Warning: {}", e);
        }
        Err(e) => {
            return Err(EngError::Analysis { source: e.clone() });
        }
    }

    let summary = build_summary_js(action, &selector, &outcome);
    let pretty_js_stats = serde_json::to_string_pretty(&summary).context(ParsingJsonSnafu {})?;
    if let Some(out) = &args.out {
        write_output(out, &pretty_js_stats)?;
    }

    // The reference summary, if provided for comparison
    if let Some(reference) = &args.reference {
        check_reference(reference, &summary)?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rust_xlsxwriter::Workbook;

    fn data_path(name: &str) -> String {
        format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    fn csv_args(extra: &[&str]) -> Args {
        let mut argv = vec![
            "engage".to_string(),
            "--input-type".to_string(),
            "csv".to_string(),
            "-e".to_string(),
            data_path("engagement.csv"),
            "-a".to_string(),
            data_path("action_plan.csv"),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Args::parse_from(argv)
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("engage-test-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn statements(summary: &JSValue) -> Vec<String> {
        summary["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["statement"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn recommendations_match_reference() {
        let args = csv_args(&["-r", &data_path("expected_recommendations.json")]);
        let summary = run_analysis(&args).unwrap();
        assert_eq!(statements(&summary), vec!["Q-1", "Q-2", "Q-3", "Q-27"]);
    }

    #[test]
    fn reference_mismatch_fails() {
        let args = csv_args(&[
            "-s",
            "BUHR NAME=Ben Okafor",
            "-r",
            &data_path("expected_recommendations.json"),
        ]);
        let res = run_analysis(&args);
        assert!(matches!(res, Err(EngError::ReferenceMismatch {})));
    }

    #[test]
    fn lowest_overall_includes_every_numeric_column() {
        let summary = run_analysis(&csv_args(&["--action", "lowest"])).unwrap();
        assert_eq!(
            statements(&summary),
            vec!["Q-1", "Q-27", "Q-2", "Q-3", "Tenure"]
        );
        let summary = run_analysis(&csv_args(&["--action", "highest", "-n", "2"])).unwrap();
        assert_eq!(statements(&summary), vec!["Q-2", "Q-3"]);
    }

    #[test]
    fn lowest_statements_use_range() {
        let summary = run_analysis(&csv_args(&["--action", "lowest-statements"])).unwrap();
        assert_eq!(statements(&summary), vec!["Q-1", "Q-2", "Q-3"]);
    }

    #[test]
    fn pie_distribution() {
        let summary = run_analysis(&csv_args(&["--action", "pie"])).unwrap();
        assert_eq!(
            summary["results"],
            json!([
                {"score": 4.0, "count": 3, "percent": 60.0},
                {"score": 3.0, "count": 2, "percent": 40.0}
            ])
        );
    }

    #[test]
    fn wildcard_selection() {
        let summary = run_analysis(&csv_args(&[
            "--action",
            "filter",
            "-s",
            "BUHR NAME=*",
            "-s",
            "BUHEAD NAME=*",
        ]))
        .unwrap();
        // Only the department is left in the selector.
        assert_eq!(summary["selector"], json!({"Department": "Sales"}));
        assert_eq!(summary["results"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn no_match_is_a_warning() {
        let summary = run_analysis(&csv_args(&["-s", "Department=Operations"])).unwrap();
        assert_eq!(summary["results"], json!([]));
        assert_eq!(
            summary["warning"],
            json!("No responses match the selected filters.")
        );
    }

    #[test]
    fn unknown_selector_field_is_an_error() {
        let res = run_analysis(&csv_args(&["-s", "Region=North"]));
        assert!(matches!(
            res,
            Err(EngError::Analysis {
                source: AnalysisError::Schema { .. }
            })
        ));
    }

    #[test]
    fn missing_band_is_an_error() {
        let mut args = csv_args(&[]);
        args.action_plan = Some(data_path("action_plan_no_medium.csv"));
        let res = run_analysis(&args);
        assert!(matches!(
            res,
            Err(EngError::Analysis {
                source: AnalysisError::Lookup {
                    band: ActionBand::Medium
                }
            })
        ));
    }

    #[test]
    fn unknown_action() {
        assert!(Action::parse("scatter").is_err());
        assert_eq!(Action::parse("lowest-statements").unwrap().name(), "lowest-statements");
    }

    fn write_engagement_xlsx(path: &Path) {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let header = ["BUHR NAME", "Department", "BUHEAD NAME", "Q-1", "Q-2"];
        for (col, h) in header.iter().enumerate() {
            worksheet.write_string(0, col as u16, *h).unwrap();
        }
        let rows = [
            ("Ana", "Sales", "Carl", 1.0, 2.0),
            ("Ben", "Sales", "Carl", 4.0, 4.0),
            ("Ana", "Sales", "Carl", 5.0, 2.0),
        ];
        for (idx, (buhr, dept, head, q1, q2)) in rows.iter().enumerate() {
            let r = (idx + 1) as u32;
            worksheet.write_string(r, 0, *buhr).unwrap();
            worksheet.write_string(r, 1, *dept).unwrap();
            worksheet.write_string(r, 2, *head).unwrap();
            worksheet.write_number(r, 3, *q1).unwrap();
            worksheet.write_number(r, 4, *q2).unwrap();
        }
        workbook.save(path).unwrap();
    }

    fn write_plan_xlsx(path: &Path) {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let rows = [
            ("Score", "Action"),
            ("Low", "Listen"),
            ("Medium", "Adjust"),
            ("High", "Celebrate"),
        ];
        for (idx, (band, action)) in rows.iter().enumerate() {
            worksheet.write_string(idx as u32, 0, *band).unwrap();
            worksheet.write_string(idx as u32, 1, *action).unwrap();
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn excel_end_to_end_with_export() {
        let dir = temp_dir("xlsx");
        let engagement = dir.join("engagement.xlsx");
        let plan = dir.join("plan.xlsx");
        write_engagement_xlsx(&engagement);
        write_plan_xlsx(&plan);

        let dir_s = dir.display().to_string();
        let args = Args::parse_from([
            "engage",
            "-e",
            engagement.to_str().unwrap(),
            "-a",
            plan.to_str().unwrap(),
            "--export",
            dir_s.as_str(),
        ]);
        let summary = run_analysis(&args).unwrap();
        assert_eq!(
            summary["results"],
            json!([
                {"statement": "Q-1", "score": 3.0, "action": "Adjust"},
                {"statement": "Q-2", "score": 2.0, "action": "Listen"}
            ])
        );

        let exported = dir.join(RecommendationReport::EXPORT_FILE_NAME);
        let ds = io_excel::read_excel_dataset(exported.to_str().unwrap(), Some("Recommendations"))
            .unwrap();
        let names: Vec<&str> = ds.column_names().collect();
        assert_eq!(names, RecommendationReport::HEADERS.to_vec());
        assert_eq!(
            ds.column("Average Score").unwrap().cells(),
            &[Cell::Number(3.0), Cell::Number(2.0)]
        );
        assert_eq!(
            ds.column("Recommended Action").unwrap().cells(),
            &[Cell::from("Adjust"), Cell::from("Listen")]
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_worksheet() {
        let dir = temp_dir("worksheet");
        let engagement = dir.join("engagement.xlsx");
        write_engagement_xlsx(&engagement);
        let res = io_excel::read_excel_dataset(engagement.to_str().unwrap(), Some("Responses"));
        assert!(matches!(res, Err(EngError::MissingWorksheet { .. })));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn summary_written_to_file() {
        let dir = temp_dir("out");
        let out = dir.join("summary.json").display().to_string();
        let summary = run_analysis(&csv_args(&["--action", "options", "-o", &out])).unwrap();
        let written = read_summary(&out).unwrap();
        assert_eq!(written, summary);
        assert_eq!(written["results"][1]["values"], json!(["Sales", "Operations"]));
        let _ = fs::remove_dir_all(&dir);
    }
}
