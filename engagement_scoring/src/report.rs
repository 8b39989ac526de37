use log::debug;

use crate::actions::{recommend, ActionPlan};
use crate::config::*;

/// The recommended actions for a set of statements, ready to be exported.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct RecommendationReport {
    pub rows: Vec<Recommendation>,
}

impl RecommendationReport {
    pub const HEADERS: [&'static str; 3] = ["Statement", "Average Score", "Recommended Action"];
    pub const EXPORT_FILE_NAME: &'static str = "employee_engagement_recommendations.xlsx";
    pub const EXPORT_MIME_TYPE: &'static str = "application/vnd.ms-excel";

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Looks up the recommended action of every score, in order.
///
/// Any score whose band is missing from the plan aborts the whole report.
pub fn build(
    scores: &[AggregateScore],
    plan: &ActionPlan,
) -> Result<RecommendationReport, AnalysisError> {
    let mut rows: Vec<Recommendation> = Vec::with_capacity(scores.len());
    for s in scores {
        let action = recommend(s.value, plan)?;
        debug!(
            "build: {} {} -> {}",
            s.statement,
            s.value,
            ActionBand::for_score(s.value)
        );
        rows.push(Recommendation {
            statement: s.statement.clone(),
            score: s.value,
            action: action.to_string(),
        });
    }
    Ok(RecommendationReport { rows })
}

/// One slice of the score distribution.
#[derive(PartialEq, Debug, Clone)]
pub struct DistributionEntry {
    pub value: f64,
    pub count: usize,
    /// Share of all the scores, between 0 and 100.
    pub percent: f64,
}

/// The (label, value) pairs plotted by the bar chart of all statements.
pub fn bar_series(scores: &[AggregateScore]) -> Vec<(String, f64)> {
    scores
        .iter()
        .map(|s| (s.statement.clone(), s.value))
        .collect()
}

/// How many statements share each mean value, for the pie chart.
///
/// Entries are sorted by decreasing count; values with the same count keep
/// the order in which they first appear.
pub fn score_distribution(scores: &[AggregateScore]) -> Vec<DistributionEntry> {
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for s in scores {
        match counts.iter_mut().find(|(v, _)| *v == s.value) {
            Some(entry) => entry.1 += 1,
            None => counts.push((s.value, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    let total = scores.len() as f64;
    counts
        .into_iter()
        .map(|(value, count)| DistributionEntry {
            value,
            count,
            percent: 100.0 * count as f64 / total,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::tests::{full_plan, plan_dataset};

    fn s(name: &str, value: f64) -> AggregateScore {
        AggregateScore {
            statement: name.to_string(),
            value,
        }
    }

    #[test]
    fn one_row_per_score_in_order() {
        let scores = vec![s("Q-3", 4.5), s("Q-1", 1.5), s("Q-2", 3.0)];
        let report = build(&scores, &full_plan()).unwrap();
        assert_eq!(report.len(), 3);
        let statements: Vec<&str> = report.rows.iter().map(|r| r.statement.as_str()).collect();
        assert_eq!(statements, vec!["Q-3", "Q-1", "Q-2"]);
        assert_eq!(report.rows[1].action, "Run listening sessions");
        assert_eq!(report.rows[2].score, 3.0);
    }

    #[test]
    fn empty_scores_empty_report() {
        let report = build(&[], &ActionPlan::default()).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn lookup_failure_aborts() {
        let plan = ActionPlan::from_dataset(&plan_dataset(&[("High", "Keep going")])).unwrap();
        let res = build(&[s("Q-1", 4.0), s("Q-2", 1.0)], &plan);
        assert_eq!(
            res,
            Err(AnalysisError::Lookup {
                band: ActionBand::Low
            })
        );
    }

    #[test]
    fn distribution_counts() {
        let scores = vec![s("a", 3.0), s("b", 4.0), s("c", 4.0), s("d", 2.5)];
        let dist = score_distribution(&scores);
        assert_eq!(dist.len(), 3);
        assert_eq!(dist[0].value, 4.0);
        assert_eq!(dist[0].count, 2);
        assert_eq!(dist[0].percent, 50.0);
        assert_eq!(dist[1].value, 3.0);
        assert_eq!(dist[2].value, 2.5);
        assert_eq!(dist[2].percent, 25.0);
    }

    #[test]
    fn bar_series_keeps_order() {
        let scores = vec![s("Q-2", 3.0), s("Q-1", 4.0)];
        assert_eq!(
            bar_series(&scores),
            vec![("Q-2".to_string(), 3.0), ("Q-1".to_string(), 4.0)]
        );
    }
}
