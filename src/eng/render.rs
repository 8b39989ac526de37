// Text rendering of the results, for the terminal.

use std::fmt::Write;

use engagement_scoring::*;

const BAR_WIDTH: f64 = 40.0;

fn render_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let mut out = String::new();
    let fmt_line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect();
        padded.join(" | ").trim_end().to_string()
    };
    let _ = writeln!(out, "{}", fmt_line(header.to_vec()));
    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", sep.join("-+-"));
    for row in rows {
        let _ = writeln!(out, "{}", fmt_line(row.iter().map(|s| s.as_str()).collect()));
    }
    out
}

pub fn render_options(options: &[(String, Vec<Cell>)]) -> String {
    let mut out = String::new();
    for (field, values) in options {
        let vs: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        let _ = writeln!(out, "{}: {}", field, vs.join(", "));
    }
    out
}

pub fn render_rows(dataset: &Dataset) -> String {
    let header: Vec<&str> = dataset.column_names().collect();
    let rows: Vec<Vec<String>> = (0..dataset.num_rows())
        .filter_map(|idx| dataset.row(idx))
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect();
    render_table(&header, &rows)
}

pub fn render_scores(title: &str, scores: &[AggregateScore]) -> String {
    let rows: Vec<Vec<String>> = scores
        .iter()
        .map(|s| vec![s.statement.clone(), format!("{:.2}", s.value)])
        .collect();
    format!("{}\n{}", title, render_table(&["Statement", "Average Score"], &rows))
}

/// A horizontal bar chart, scaled on the largest value.
pub fn render_bar_chart(title: &str, series: &[(String, f64)]) -> String {
    let label_width = series
        .iter()
        .map(|(l, _)| l.chars().count())
        .max()
        .unwrap_or(0);
    let max_value = series.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    for (label, value) in series {
        let len = if max_value > 0.0 {
            (value.max(0.0) / max_value * BAR_WIDTH).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "{:<width$} | {} {:.2}",
            label,
            "#".repeat(len),
            value,
            width = label_width
        );
    }
    out
}

pub fn render_distribution(title: &str, entries: &[DistributionEntry]) -> String {
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                format!("{:.2}", e.value),
                e.count.to_string(),
                format!("{:.1}%", e.percent),
            ]
        })
        .collect();
    format!(
        "{}\n{}",
        title,
        render_table(&["Average Score", "Statements", "Share"], &rows)
    )
}

pub fn render_recommendations(report: &RecommendationReport) -> String {
    let rows: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|r| {
            vec![
                r.statement.clone(),
                format!("{:.2}", r.score),
                r.action.clone(),
            ]
        })
        .collect();
    render_table(&RecommendationReport::HEADERS, &rows)
}
