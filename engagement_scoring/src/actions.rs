use log::{debug, info};
use std::collections::HashMap;

use crate::config::*;
use crate::dataset::Dataset;

/// The recommended action for each band, read once from an action plan dataset.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ActionPlan {
    actions: HashMap<ActionBand, String>,
}

impl ActionPlan {
    /// Reads the `Score` and `Action` columns of an action plan.
    ///
    /// When several rows carry the same band label, the first one wins.
    /// Rows with another label are ignored. A band without any row is only
    /// an error when a score falls into it.
    pub fn from_dataset(dataset: &Dataset) -> Result<ActionPlan, AnalysisError> {
        let bands = dataset.require_column(SCORE_COLUMN, ACTION_PLAN_DATASET)?;
        let actions = dataset.require_column(ACTION_COLUMN, ACTION_PLAN_DATASET)?;

        let mut plan = ActionPlan::default();
        for (label, action) in bands.cells().iter().zip(actions.cells()) {
            let band = match label {
                Cell::Text(s) => ActionBand::from_label(s),
                _ => None,
            };
            match band {
                Some(b) if plan.actions.contains_key(&b) => {
                    debug!("from_dataset: duplicate row for band {}, keeping the first", b);
                }
                Some(b) => {
                    plan.actions.insert(b, action.to_string());
                }
                None => {
                    debug!("from_dataset: ignoring row with score label {:?}", label);
                }
            }
        }
        info!(
            "Action plan loaded with {} of 3 bands",
            plan.actions.len()
        );
        Ok(plan)
    }

    pub fn action_for(&self, band: ActionBand) -> Option<&str> {
        self.actions.get(&band).map(|s| s.as_str())
    }

    /// The bands that have an action, in Low, Medium, High order.
    pub fn bands(&self) -> Vec<ActionBand> {
        [ActionBand::Low, ActionBand::Medium, ActionBand::High]
            .into_iter()
            .filter(|b| self.actions.contains_key(b))
            .collect()
    }
}

/// The action recommended for an aggregate score.
pub fn recommend(score: f64, plan: &ActionPlan) -> Result<&str, AnalysisError> {
    let band = ActionBand::for_score(score);
    plan.action_for(band)
        .ok_or(AnalysisError::Lookup { band })
}
