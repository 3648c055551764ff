//! Photo-vs-spec analysis: snapshot of the inputs and the verdict rule.
//!
//! The rule is a pure function: given an immutable snapshot it returns the
//! verdict without side effects. Scheduling the simulated latency and
//! writing the result back is the workflow service's job.

use serde::{Deserialize, Serialize};

use super::checklist::CompletionChecklist;
use super::state::{DesignChange, Verdict};

/// Inputs of one analysis, frozen at the moment the verdict is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSnapshot {
    pub checklist: CompletionChecklist,
    pub design_change: DesignChange,
    pub photo_count: u32,
}

impl AnalysisSnapshot {
    /// NeedsGoBack if the design changed, any checklist item is missing, or no
    /// photos were uploaded. MeetsSpec otherwise.
    ///
    /// MeetsSpec needs an explicit "no design change"; an undeclared flag
    /// counts against the package.
    pub fn evaluate(&self) -> Verdict {
        let confirmed_as_designed = self.design_change == DesignChange::No;
        if !confirmed_as_designed || !self.checklist.is_complete() || self.photo_count == 0 {
            Verdict::NeedsGoBack
        } else {
            Verdict::MeetsSpec
        }
    }
}
