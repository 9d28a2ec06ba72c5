pub mod check;
pub mod config;
pub mod parse;
pub mod run;
pub mod simulate;
pub mod tail;

use cursorhome_highlight::CoordinatorOutcome;

/// One-line human description of a coordinator outcome.
pub fn describe(outcome: &CoordinatorOutcome) -> String {
    match outcome {
        CoordinatorOutcome::Created { display, center } => {
            format!("highlight on {display} at ({:.0}, {:.0})", center.x, center.y)
        }
        CoordinatorOutcome::Recentered { display } => format!("recentered on {display}"),
        CoordinatorOutcome::Transferred { from, to } => format!("moved {from} -> {to}"),
        CoordinatorOutcome::Tracked => "tracking".to_string(),
        CoordinatorOutcome::Expired => "highlight expired".to_string(),
        CoordinatorOutcome::Cancelled => "highlight cancelled".to_string(),
        CoordinatorOutcome::Ignored(reason) => format!("ignored: {reason}"),
        CoordinatorOutcome::Failed { display, error } => format!("failed on {display}: {error}"),
    }
}
