use crate::eng::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct StatementRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisConfig {
    #[serde(rename = "engagementFile")]
    pub engagement_file: Option<String>,
    #[serde(rename = "actionPlanFile")]
    pub action_plan_file: Option<String>,
    #[serde(rename = "inputType")]
    pub input_type: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    pub selectors: Option<BTreeMap<String, String>>,
    #[serde(rename = "statementPrefix")]
    pub statement_prefix: Option<String>,
    #[serde(rename = "statementRange")]
    pub statement_range: Option<StatementRange>,
    pub count: Option<usize>,
}

/// The kind of files to read the datasets from.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Xlsx,
    Csv,
}

impl InputType {
    pub fn parse(s: &str) -> EngResult<InputType> {
        match s {
            "xlsx" | "excel" => Ok(InputType::Xlsx),
            "csv" => Ok(InputType::Csv),
            x => whatever!("Unknown input type {:?}, expected xlsx or csv", x),
        }
    }
}

/// The configuration after merging the file and the command line.
#[derive(PartialEq, Debug, Clone)]
pub struct ResolvedConfig {
    pub engagement_path: String,
    pub action_plan_path: String,
    pub input_type: InputType,
    pub excel_worksheet_name: Option<String>,
    pub selections: Vec<(String, String)>,
    pub settings: AnalysisSettings,
}

pub fn read_config(path: &str) -> EngResult<AnalysisConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: AnalysisConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

// Paths in a configuration file are relative to the file itself.
fn config_relative_path(config_path: Option<&str>, file: &str) -> String {
    match config_path.and_then(|p| Path::new(p).parent()) {
        Some(dir) if Path::new(file).is_relative() => {
            let p: PathBuf = [dir, Path::new(file)].iter().collect();
            p.display().to_string()
        }
        _ => file.to_string(),
    }
}

/// Merges the configuration file (if any) with the command line arguments.
/// Arguments take precedence.
pub fn resolve_config(args: &Args) -> EngResult<ResolvedConfig> {
    let config = match args.config.as_deref() {
        Some(p) => read_config(p)?,
        None => AnalysisConfig::default(),
    };
    let config_path = args.config.as_deref();

    let engagement_path = match (&args.engagement, &config.engagement_file) {
        (Some(p), _) => p.clone(),
        (None, Some(p)) => config_relative_path(config_path, p),
        (None, None) => whatever!("No engagement data provided (--engagement or engagementFile)"),
    };
    let action_plan_path = match (&args.action_plan, &config.action_plan_file) {
        (Some(p), _) => p.clone(),
        (None, Some(p)) => config_relative_path(config_path, p),
        (None, None) => whatever!("No action plan provided (--action-plan or actionPlanFile)"),
    };

    let input_type = match args.input_type.as_ref().or(config.input_type.as_ref()) {
        Some(s) => InputType::parse(s)?,
        None => InputType::Xlsx,
    };

    let mut selections: Vec<(String, String)> = config
        .selectors
        .clone()
        .unwrap_or_default()
        .into_iter()
        .collect();
    for (field, value) in args.select.iter() {
        selections.retain(|(f, _)| f != field);
        selections.push((field.clone(), value.clone()));
    }

    let mut settings = AnalysisSettings::default();
    if let Some(prefix) = config.statement_prefix.clone() {
        settings.statement_prefix = prefix;
    }
    if let Some(range) = config.statement_range.clone() {
        if range.min > range.max {
            whatever!(
                "Invalid statement range: min {} is greater than max {}",
                range.min,
                range.max
            );
        }
        settings.statement_range = (range.min, range.max);
    }
    if let Some(n) = args.count.or(config.count) {
        if n == 0 {
            whatever!("Invalid count: at least one statement must be requested");
        }
        settings.overall_count = n;
    }

    Ok(ResolvedConfig {
        engagement_path,
        action_plan_path,
        input_type,
        excel_worksheet_name: args
            .excel_worksheet_name
            .clone()
            .or(config.excel_worksheet_name),
        selections,
        settings,
    })
}
