/*!

Scoring and recommendation engine for employee engagement surveys.

The engine works on two tables: the survey responses (one row per employee,
one `Q-<n>` column per statement) and an action plan that maps the bands
`Low`, `Medium` and `High` to a recommended action.

```
use engagement_scoring::builder::DatasetBuilder;
use engagement_scoring::*;
# use engagement_scoring::AnalysisError;

let responses = DatasetBuilder::new(&["BUHR NAME", "Department", "BUHEAD NAME", "Q-1"])
    .row(vec!["Ana".into(), "Sales".into(), "Carl".into(), 1.0.into()])
    .row(vec!["Ana".into(), "Sales".into(), "Carl".into(), 5.0.into()])
    .row(vec!["Ben".into(), "Ops".into(), "Dina".into(), 2.0.into()])
    .build()?;
let plan = DatasetBuilder::new(&["Score", "Action"])
    .row(vec!["Low".into(), "Listen".into()])
    .row(vec!["Medium".into(), "Adjust".into()])
    .row(vec!["High".into(), "Celebrate".into()])
    .build()?;

let session = Session::new(responses, &plan, AnalysisSettings::default())?;
let selector = Selector::new().with("BUHR NAME", "Ana");
let report = session.recommendations(&selector)?;
assert_eq!(report.rows[0].score, 3.0);
assert_eq!(report.rows[0].action, "Adjust");

# Ok::<(), AnalysisError>(())
```

See the [manual] for the details of each step.
*/
mod config;

pub use crate::config::*;

pub mod actions;
pub mod builder;
pub mod dataset;
pub mod manual;
pub mod report;
pub mod scoring;
pub mod session;
pub mod statements;

pub use crate::actions::{recommend, ActionPlan};
pub use crate::dataset::{filter, Column, Dataset};
pub use crate::report::{
    bar_series, build, score_distribution, DistributionEntry, RecommendationReport,
};
pub use crate::scoring::{score, top_n};
pub use crate::session::Session;
pub use crate::statements::resolve;
