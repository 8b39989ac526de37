use std::collections::HashSet;
use std::path::Path;

use engagement_scoring::Cell;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Turns the cells of a header row into unique column names.
///
/// Blank headers become `Unnamed: <position>` and repeated names get a `.1`,
/// `.2`, ... suffix, the way spreadsheet tools usually label them.
pub fn header_names(raw: &[Option<String>]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut res: Vec<String> = Vec::new();
    for (idx, name_o) in raw.iter().enumerate() {
        let base = match name_o {
            Some(s) if !s.trim().is_empty() => s.clone(),
            _ => format!("Unnamed: {}", idx),
        };
        let mut name = base.clone();
        let mut dup = 0;
        while seen.contains(&name) {
            dup += 1;
            name = format!("{}.{}", base, dup);
        }
        seen.insert(name.clone());
        res.push(name);
    }
    res
}

/// Reads a cell from its text representation (CSV inputs).
pub fn parse_text_cell(s: &str) -> Cell {
    let t = s.trim();
    if t.is_empty() {
        return Cell::Empty;
    }
    match t {
        "true" | "True" | "TRUE" => return Cell::Bool(true),
        "false" | "False" | "FALSE" => return Cell::Bool(false),
        _ => {}
    }
    match t.parse::<f64>() {
        Ok(x) if x.is_finite() => Cell::Number(x),
        _ => Cell::Text(s.to_string()),
    }
}

pub fn is_blank_row(cells: &[Cell]) -> bool {
    cells.iter().all(|c| c.is_empty())
}
