use log::info;

use crate::actions::ActionPlan;
use crate::config::*;
use crate::dataset::{filter, Dataset};
use crate::report::{build, RecommendationReport};
use crate::scoring::{score, top_n};
use crate::statements::resolve;

/// The datasets loaded for one analysis, and the requests that can be run on them.
///
/// Every request is an independent computation: it borrows the datasets and
/// returns a new value. Loading a new file replaces the corresponding
/// dataset as a whole.
#[derive(Debug, Clone)]
pub struct Session {
    engagement: Dataset,
    action_plan: ActionPlan,
    settings: AnalysisSettings,
}

fn check_selector_fields(
    engagement: &Dataset,
    settings: &AnalysisSettings,
) -> Result<(), AnalysisError> {
    for field in settings.selector_fields.iter() {
        engagement.require_column(field, ENGAGEMENT_DATASET)?;
    }
    Ok(())
}

impl Session {
    pub fn new(
        engagement: Dataset,
        action_plan: &Dataset,
        settings: AnalysisSettings,
    ) -> Result<Session, AnalysisError> {
        check_selector_fields(&engagement, &settings)?;
        let action_plan = ActionPlan::from_dataset(action_plan)?;
        info!(
            "Session started: {} responses, {} columns",
            engagement.num_rows(),
            engagement.columns().len()
        );
        Ok(Session {
            engagement,
            action_plan,
            settings,
        })
    }

    pub fn engagement(&self) -> &Dataset {
        &self.engagement
    }

    pub fn action_plan(&self) -> &ActionPlan {
        &self.action_plan
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Replaces the engagement data. On error, the current data is kept.
    pub fn replace_engagement(&mut self, engagement: Dataset) -> Result<(), AnalysisError> {
        check_selector_fields(&engagement, &self.settings)?;
        self.engagement = engagement;
        Ok(())
    }

    /// Replaces the action plan. On error, the current plan is kept.
    pub fn replace_action_plan(&mut self, action_plan: &Dataset) -> Result<(), AnalysisError> {
        self.action_plan = ActionPlan::from_dataset(action_plan)?;
        Ok(())
    }

    /// The values that can be picked for each selector field.
    pub fn selector_options(&self) -> Result<Vec<(String, Vec<Cell>)>, AnalysisError> {
        let mut res = Vec::new();
        for field in self.settings.selector_fields.iter() {
            res.push((field.clone(), self.engagement.distinct_values(field)?));
        }
        Ok(res)
    }

    /// Selects the first value of every selector field.
    pub fn default_selector(&self) -> Result<Selector, AnalysisError> {
        let mut sel = Selector::new();
        for (field, values) in self.selector_options()? {
            if let Some(v) = values.into_iter().next() {
                sel.set(&field, v);
            }
        }
        Ok(sel)
    }

    /// The responses matching the selector. No matching response is reported
    /// as an empty result.
    pub fn select(&self, selector: &Selector) -> Result<Dataset, AnalysisError> {
        let filtered = filter(&self.engagement, selector)?;
        if filtered.is_empty() {
            return Err(AnalysisError::EmptyResult(EmptyReason::NoMatchingRows));
        }
        Ok(filtered)
    }

    /// The mean of every numeric column of the selected responses.
    pub fn all_statement_scores(
        &self,
        selector: &Selector,
    ) -> Result<Vec<AggregateScore>, AnalysisError> {
        let filtered = self.select(selector)?;
        let scores = score(&filtered, &filtered.numeric_columns());
        if scores.is_empty() {
            return Err(AnalysisError::EmptyResult(EmptyReason::NoNumericColumns));
        }
        Ok(scores)
    }

    /// The `n` lowest or highest means among all the numeric columns.
    pub fn overall_extremes(
        &self,
        selector: &Selector,
        n: usize,
        direction: Direction,
    ) -> Result<Vec<AggregateScore>, AnalysisError> {
        let scores = self.all_statement_scores(selector)?;
        let res = top_n(&scores, n, direction);
        info!(
            "overall_extremes: {:?} {} of {} scores",
            direction,
            res.len(),
            scores.len()
        );
        Ok(res)
    }

    /// The `n` lowest statements among the statements of the configured range.
    pub fn lowest_statements(
        &self,
        selector: &Selector,
        n: usize,
    ) -> Result<Vec<AggregateScore>, AnalysisError> {
        let filtered = self.select(selector)?;
        let columns = resolve(
            &filtered,
            &self.settings.statement_prefix,
            Some(self.settings.statement_range),
        );
        if columns.is_empty() {
            return Err(AnalysisError::EmptyResult(EmptyReason::NoStatementColumns));
        }
        let scores = score(&filtered, &columns);
        if scores.is_empty() {
            return Err(AnalysisError::EmptyResult(EmptyReason::NoNumericColumns));
        }
        Ok(top_n(&scores, n, Direction::Ascending))
    }

    /// The recommended action for every statement of the selected responses.
    pub fn recommendations(
        &self,
        selector: &Selector,
    ) -> Result<RecommendationReport, AnalysisError> {
        let filtered = self.select(selector)?;
        let columns = resolve(&filtered, &self.settings.statement_prefix, None);
        let scores = score(&filtered, &columns);
        let report = build(&scores, &self.action_plan)?;
        if report.is_empty() {
            return Err(AnalysisError::EmptyResult(EmptyReason::NoStatementScores));
        }
        info!("recommendations: {} statements", report.len());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::tests::plan_dataset;
    use crate::builder::DatasetBuilder;

    const HEADER: [&str; 6] = ["BUHR NAME", "Department", "BUHEAD NAME", "Q-1", "Q-2", "Q-30"];

    fn row(buhr: &str, dept: &str, head: &str, q: [f64; 3]) -> Vec<Cell> {
        vec![
            buhr.into(),
            dept.into(),
            head.into(),
            q[0].into(),
            q[1].into(),
            q[2].into(),
        ]
    }

    fn engagement() -> Dataset {
        DatasetBuilder::new(&HEADER)
            .row(row("Ana", "Sales", "Carl", [1.0, 4.0, 2.0]))
            .row(row("Ben", "Sales", "Carl", [3.0, 3.0, 3.0]))
            .row(row("Ana", "Sales", "Carl", [5.0, 5.0, 4.0]))
            .build()
            .unwrap()
    }

    fn plan() -> Dataset {
        plan_dataset(&[
            ("Low", "Run listening sessions"),
            ("Medium", "Review team rituals"),
            ("High", "Celebrate and share practices"),
        ])
    }

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn session() -> Session {
        Session::new(engagement(), &plan(), AnalysisSettings::default()).unwrap()
    }

    fn ana() -> Selector {
        Selector::new()
            .with("BUHR NAME", "Ana")
            .with("Department", "Sales")
            .with("BUHEAD NAME", "Carl")
    }

    #[test]
    fn end_to_end_medium() {
        init();
        let report = session().recommendations(&ana()).unwrap();
        assert_eq!(report.rows[0].statement, "Q-1");
        assert_eq!(report.rows[0].score, 3.0);
        assert_eq!(report.rows[0].action, "Review team rituals");
        // Q-2: (4 + 5) / 2, Q-30: (2 + 4) / 2. The range does not apply here.
        assert_eq!(report.len(), 3);
        assert_eq!(report.rows[1].action, "Celebrate and share practices");
    }

    #[test]
    fn missing_selector_field() {
        let ds = DatasetBuilder::new(&["BUHR NAME", "Department"])
            .build()
            .unwrap();
        let res = Session::new(ds, &plan(), AnalysisSettings::default());
        assert_eq!(
            res.err(),
            Some(AnalysisError::Schema {
                dataset: ENGAGEMENT_DATASET.to_string(),
                column: "BUHEAD NAME".to_string()
            })
        );
    }

    #[test]
    fn no_matching_rows_is_a_warning() {
        let sel = ana().with("BUHR NAME", "Zoe");
        let err = session().recommendations(&sel).unwrap_err();
        assert_eq!(err, AnalysisError::EmptyResult(EmptyReason::NoMatchingRows));
        assert!(err.is_warning());
    }

    #[test]
    fn lowest_statements_uses_range() {
        let res = session().lowest_statements(&ana(), 5).unwrap();
        let names: Vec<&str> = res.iter().map(|s| s.statement.as_str()).collect();
        assert_eq!(names, vec!["Q-1", "Q-2"]);
    }

    #[test]
    fn lowest_statements_without_statements() {
        init();
        let ds = DatasetBuilder::new(&["BUHR NAME", "Department", "BUHEAD NAME", "Q-40"])
            .row(vec!["Ana".into(), "Sales".into(), "Carl".into(), 3.0.into()])
            .build()
            .unwrap();
        let s = Session::new(ds, &plan(), AnalysisSettings::default()).unwrap();
        let sel = Selector::new().with("BUHR NAME", "Ana");
        assert_eq!(
            s.lowest_statements(&sel, 5),
            Err(AnalysisError::EmptyResult(EmptyReason::NoStatementColumns))
        );
        assert_eq!(
            s.recommendations(&sel).unwrap().rows[0].statement,
            "Q-40"
        );
    }

    #[test]
    fn lowest_statements_without_numbers() {
        init();
        let ds = DatasetBuilder::new(&["BUHR NAME", "Department", "BUHEAD NAME", "Q-1", "Q-2"])
            .row(vec![
                "Ana".into(),
                "Sales".into(),
                "Carl".into(),
                "agree".into(),
                Cell::Empty,
            ])
            .build()
            .unwrap();
        let s = Session::new(ds, &plan(), AnalysisSettings::default()).unwrap();
        assert_eq!(
            s.lowest_statements(&Selector::new(), 5),
            Err(AnalysisError::EmptyResult(EmptyReason::NoNumericColumns))
        );
    }

    #[test]
    fn overall_extremes() {
        let s = session();
        let sel = Selector::new().with("Department", "Sales");
        let low = s.overall_extremes(&sel, 5, Direction::Ascending).unwrap();
        // Q-1: 3.0, Q-2: 4.0, Q-30: 3.0
        let names: Vec<&str> = low.iter().map(|s| s.statement.as_str()).collect();
        assert_eq!(names, vec!["Q-1", "Q-30", "Q-2"]);
        let high = s.overall_extremes(&sel, 1, Direction::Descending).unwrap();
        assert_eq!(high[0].statement, "Q-2");
    }

    #[test]
    fn no_numeric_columns() {
        init();
        let ds = DatasetBuilder::new(&DEFAULT_SELECTOR_FIELDS)
            .row(vec!["Ana".into(), "Sales".into(), "Carl".into()])
            .build()
            .unwrap();
        let s = Session::new(ds, &plan(), AnalysisSettings::default()).unwrap();
        assert_eq!(
            s.all_statement_scores(&Selector::new()),
            Err(AnalysisError::EmptyResult(EmptyReason::NoNumericColumns))
        );
        assert_eq!(
            s.recommendations(&Selector::new()),
            Err(AnalysisError::EmptyResult(EmptyReason::NoStatementScores))
        );
    }

    #[test]
    fn default_selector_takes_first_values() {
        let s = session();
        let sel = s.default_selector().unwrap();
        assert_eq!(sel.get("BUHR NAME"), Some(&Cell::from("Ana")));
        assert_eq!(sel.get("BUHEAD NAME"), Some(&Cell::from("Carl")));
        let options = s.selector_options().unwrap();
        assert_eq!(options[0].1, vec![Cell::from("Ana"), Cell::from("Ben")]);
    }

    #[test]
    fn replacing_with_bad_data_keeps_the_old_data() {
        let mut s = session();
        let bad = DatasetBuilder::new(&["Department"]).build().unwrap();
        assert!(s.replace_engagement(bad).is_err());
        assert_eq!(s.engagement().num_rows(), 3);
        assert!(s.replace_action_plan(&plan_dataset(&[])).is_ok());
        assert_eq!(
            s.recommendations(&ana()),
            Err(AnalysisError::Lookup {
                band: ActionBand::Medium
            })
        );
    }
}
