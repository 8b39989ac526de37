use clap::Parser;

/// Scores employee engagement surveys and recommends actions.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the analysis (input files, selectors, statement range).
    /// Relative paths in this file are resolved from the directory of the file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The survey responses. Overrides the engagementFile option of the configuration.
    #[clap(short, long, value_parser)]
    pub engagement: Option<String>,

    /// (file path) The action plan, with the Score and Action columns. Overrides the actionPlanFile
    /// option of the configuration.
    #[clap(short, long, value_parser)]
    pub action_plan: Option<String>,

    /// (default xlsx) The type of the inputs: xlsx or csv.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: first worksheet) When using Excel files, the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (FIELD=VALUE, repeatable) The value to select for a field, for example 'Department=Sales'.
    /// Fields that are not specified are set to their first value in the data.
    #[clap(short, long, value_parser = parse_selection)]
    pub select: Vec<(String, String)>,

    /// (default recommend) The analysis to run: options, filter, lowest, highest, bar, pie,
    /// lowest-statements or recommend.
    #[clap(long, value_parser)]
    pub action: Option<String>,

    /// (default 5) The number of statements to show for lowest, highest and lowest-statements.
    #[clap(short = 'n', long, value_parser)]
    pub count: Option<usize>,

    /// (file path, 'stdout' or empty) If specified, the summary of the analysis will be written in JSON
    /// format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (directory) With the recommend action, writes the recommendations as an Excel file in this directory.
    #[clap(long, value_parser)]
    pub export: Option<String>,

    /// (file path) A reference file containing the JSON summary of an analysis. If provided, the program
    /// will check that its output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}

fn parse_selection(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((field, value)) if !field.is_empty() => Ok((field.to_string(), value.to_string())),
        _ => Err(format!("expected FIELD=VALUE, got '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_parsing() {
        assert_eq!(
            parse_selection("BUHR NAME=Ana Lopez"),
            Ok(("BUHR NAME".to_string(), "Ana Lopez".to_string()))
        );
        assert_eq!(
            parse_selection("Department=R=D"),
            Ok(("Department".to_string(), "R=D".to_string()))
        );
        assert!(parse_selection("Department").is_err());
        assert!(parse_selection("=Sales").is_err());
    }

    #[test]
    fn parses_flags() {
        let args = Args::parse_from([
            "engage",
            "-e",
            "data.xlsx",
            "--select",
            "Department=Sales",
            "-s",
            "BUHR NAME=Ana",
            "--action",
            "lowest",
            "-n",
            "3",
        ]);
        assert_eq!(args.engagement.as_deref(), Some("data.xlsx"));
        assert_eq!(args.select.len(), 2);
        assert_eq!(args.count, Some(3));
        assert!(!args.verbose);
    }
}
