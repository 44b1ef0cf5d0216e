//! Report aggregation
//!
//! Folds resolved components into a [`Report`]. Pure: the caller supplies
//! the system metadata.
//!
//! | Tier      | Bucket         |
//! |-----------|----------------|
//! | `works`   | `compatible`   |
//! | `partial` | `partial`      |
//! | `broken`  | `incompatible` |
//! | other     | `unknown`      |

use crate::compat::CompatibilityResult;
use crate::hardware::HardwareComponent;
use crate::report::{Readiness, Report, ReportEntry, Summary, SystemInfo};

/// Build the report for one run.
///
/// With zero components the score and readiness are `None` rather than a
/// division by zero.
pub fn aggregate(
    system: SystemInfo,
    resolved: Vec<(HardwareComponent, CompatibilityResult)>,
) -> Report {
    let mut summary = Summary::default();
    let entries: Vec<ReportEntry> = resolved
        .into_iter()
        .map(|(component, result)| {
            summary.record(result.compatibility());
            ReportEntry { component, result }
        })
        .collect();

    let score = summary.score();
    let readiness = score.map(Readiness::from_score);

    match score {
        Some(score) => tracing::info!(
            "Compatibility score {:.1}% across {} component(s)",
            score,
            summary.total
        ),
        None => tracing::info!("No components to score"),
    }

    Report {
        system,
        summary,
        score,
        readiness,
        entries,
    }
}
