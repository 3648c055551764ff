//! Per-job completion workflow record.
//!
//! Design: JobWorkflow is the single source of truth for one job's
//! completion state. Transitions go through methods so the "nothing changes
//! after Finalized" rule lives in one place.

use serde::{Deserialize, Serialize};

use super::analysis::AnalysisSnapshot;
use super::checklist::{ChecklistUpdate, CompletionChecklist};
use super::errors::NexaError;
use super::ids::{AnalysisRunId, JobId};
use super::state::{DesignChange, Verdict, WorkflowState};

/// Crew-side actions taken for a job on the day board.
///
/// Which tailboard is open is a day-board concern (one at a time), so it
/// is not kept here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewStatus {
    pub pin_sent: bool,
    pub timesheet_started: bool,
    pub hazard_notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct JobWorkflow {
    job_id: JobId,
    checklist: CompletionChecklist,
    design_change: DesignChange,
    photo_count: u32,
    opened: bool,
    /// Analyze 実行中の run。完了時にこれと一致した run だけが判定を書ける。
    pending_run: Option<AnalysisRunId>,
    verdict: Option<Verdict>,
    finalized: bool,
    crew: CrewStatus,
}

impl JobWorkflow {
    pub fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            checklist: CompletionChecklist::default(),
            design_change: DesignChange::Unset,
            photo_count: 0,
            opened: false,
            pending_run: None,
            verdict: None,
            finalized: false,
            crew: CrewStatus::default(),
        }
    }

    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    pub fn state(&self) -> WorkflowState {
        if self.finalized {
            WorkflowState::Finalized
        } else if let Some(verdict) = self.verdict {
            verdict.as_state()
        } else if self.opened {
            WorkflowState::InProgress
        } else {
            WorkflowState::NotStarted
        }
    }

    pub fn checklist(&self) -> CompletionChecklist {
        self.checklist
    }

    pub fn design_change(&self) -> DesignChange {
        self.design_change
    }

    pub fn photo_count(&self) -> u32 {
        self.photo_count
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    pub fn is_analyzing(&self) -> bool {
        self.pending_run.is_some()
    }

    pub fn pending_run(&self) -> Option<AnalysisRunId> {
        self.pending_run
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn crew(&self) -> &CrewStatus {
        &self.crew
    }

    pub fn snapshot(&self) -> AnalysisSnapshot {
        AnalysisSnapshot {
            checklist: self.checklist,
            design_change: self.design_change,
            photo_count: self.photo_count,
        }
    }

    /// Finalized なら InvalidTransition。そうでなければ InProgress 扱いにする。
    fn ensure_mutable(&mut self) -> Result<(), NexaError> {
        if self.finalized {
            return Err(NexaError::InvalidTransition(format!(
                "job {} is already finalized",
                self.job_id
            )));
        }
        self.opened = true;
        Ok(())
    }

    /// Open the completion view. Returns true the first time.
    pub fn open(&mut self) -> Result<bool, NexaError> {
        let first = !self.opened;
        self.ensure_mutable()?;
        Ok(first)
    }

    pub fn update_checklist(&mut self, update: &ChecklistUpdate) -> Result<(), NexaError> {
        self.ensure_mutable()?;
        self.checklist.apply(update);
        Ok(())
    }

    /// Replace (not add to) the photo count with the latest upload's size.
    pub fn set_photo_count(&mut self, count: u32) -> Result<(), NexaError> {
        self.ensure_mutable()?;
        self.photo_count = count;
        Ok(())
    }

    pub fn declare_design_change(&mut self, change: DesignChange) -> Result<(), NexaError> {
        if change == DesignChange::Unset {
            return Err(NexaError::Validation(
                "design change must be declared as yes or no".to_string(),
            ));
        }
        self.ensure_mutable()?;
        self.design_change = change;
        Ok(())
    }

    /// Start a new analysis run, clearing the previous verdict.
    ///
    /// Returns the run it supersedes, if one was still pending.
    pub fn begin_analysis(&mut self, run: AnalysisRunId) -> Result<Option<AnalysisRunId>, NexaError> {
        self.ensure_mutable()?;
        self.verdict = None;
        Ok(self.pending_run.replace(run))
    }

    /// Resolve `run` against the current inputs.
    ///
    /// Returns `None` (and changes nothing) when `run` was superseded or the
    /// job was finalized meanwhile.
    pub fn complete_analysis(&mut self, run: AnalysisRunId) -> Option<Verdict> {
        if self.finalized || self.pending_run != Some(run) {
            return None;
        }
        self.pending_run = None;
        let verdict = self.snapshot().evaluate();
        self.verdict = Some(verdict);
        Some(verdict)
    }

    /// Mark the job finalized regardless of the verdict. Returns true the
    /// first time; finalizing again changes nothing.
    pub fn finalize(&mut self) -> bool {
        if self.finalized {
            return false;
        }
        self.finalized = true;
        self.opened = true;
        self.pending_run = None;
        true
    }

    pub fn send_pin(&mut self) -> bool {
        let first = !self.crew.pin_sent;
        self.crew.pin_sent = true;
        first
    }

    /// Returns true the first time.
    pub fn start_timesheet(&mut self) -> bool {
        let first = !self.crew.timesheet_started;
        self.crew.timesheet_started = true;
        first
    }

    /// Replace the tailboard hazard notes. Blank text clears them.
    ///
    /// Allowed after Finalized too: the briefing belongs to the crew, not to
    /// the completion package.
    pub fn set_hazard_notes(&mut self, notes: Option<&str>) {
        self.crew.hazard_notes = notes
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use ulid::Ulid;

    fn run() -> AnalysisRunId {
        AnalysisRunId::from_ulid(Ulid::new())
    }

    #[test]
    fn new_workflow_is_not_started() {
        let wf = JobWorkflow::new(JobId::new(1));
        assert_eq!(wf.state(), WorkflowState::NotStarted);
        assert_eq!(wf.checklist(), CompletionChecklist::default());
        assert_eq!(wf.design_change(), DesignChange::Unset);
        assert_eq!(wf.photo_count(), 0);
    }

    #[test]
    fn open_moves_to_in_progress() {
        let mut wf = JobWorkflow::new(JobId::new(1));
        assert!(wf.open().unwrap());
        assert!(!wf.open().unwrap());
        assert_eq!(wf.state(), WorkflowState::InProgress);
    }

    #[test]
    fn photo_upload_replaces_count() {
        let mut wf = JobWorkflow::new(JobId::new(1));
        wf.set_photo_count(4).unwrap();
        wf.set_photo_count(2).unwrap();
        assert_eq!(wf.photo_count(), 2);
    }

    #[test]
    fn analysis_resolves_to_a_verdict() {
        let mut wf = JobWorkflow::new(JobId::new(1));
        wf.update_checklist(&ChecklistUpdate::all(true)).unwrap();
        wf.declare_design_change(DesignChange::No).unwrap();
        wf.set_photo_count(3).unwrap();

        let r = run();
        assert_eq!(wf.begin_analysis(r).unwrap(), None);
        assert!(wf.is_analyzing());
        assert_eq!(wf.complete_analysis(r), Some(Verdict::MeetsSpec));
        assert!(!wf.is_analyzing());
        assert_eq!(wf.state(), WorkflowState::MeetsSpec);
    }

    #[test]
    fn superseded_run_writes_nothing() {
        let mut wf = JobWorkflow::new(JobId::new(1));
        let first = run();
        let second = run();
        wf.begin_analysis(first).unwrap();
        assert_eq!(wf.begin_analysis(second).unwrap(), Some(first));

        assert_eq!(wf.complete_analysis(first), None);
        assert!(wf.is_analyzing());
        assert_eq!(wf.complete_analysis(second), Some(Verdict::NeedsGoBack));
    }

    #[test]
    fn verdict_uses_inputs_at_resolution_time() {
        let mut wf = JobWorkflow::new(JobId::new(1));
        let r = run();
        wf.begin_analysis(r).unwrap();

        // inputs change while the run is pending
        wf.update_checklist(&ChecklistUpdate::all(true)).unwrap();
        wf.declare_design_change(DesignChange::No).unwrap();
        wf.set_photo_count(1).unwrap();

        assert_eq!(wf.complete_analysis(r), Some(Verdict::MeetsSpec));
    }

    #[test]
    fn begin_analysis_clears_previous_verdict() {
        let mut wf = JobWorkflow::new(JobId::new(1));
        let r = run();
        wf.begin_analysis(r).unwrap();
        wf.complete_analysis(r);
        assert!(wf.verdict().is_some());

        wf.begin_analysis(run()).unwrap();
        assert_eq!(wf.verdict(), None);
        assert_eq!(wf.state(), WorkflowState::InProgress);
    }

    #[test]
    fn finalize_ignores_verdict_and_is_idempotent() {
        let mut wf = JobWorkflow::new(JobId::new(1));
        let r = run();
        wf.begin_analysis(r).unwrap();
        wf.complete_analysis(r);
        assert_eq!(wf.state(), WorkflowState::NeedsGoBack);

        assert!(wf.finalize());
        assert!(!wf.finalize());
        assert_eq!(wf.state(), WorkflowState::Finalized);
    }

    #[test]
    fn finalized_job_rejects_changes() {
        let mut wf = JobWorkflow::new(JobId::new(1));
        wf.finalize();

        assert!(matches!(
            wf.update_checklist(&ChecklistUpdate::all(true)),
            Err(NexaError::InvalidTransition(_))
        ));
        assert!(wf.set_photo_count(1).is_err());
        assert!(wf.declare_design_change(DesignChange::Yes).is_err());
        assert!(wf.begin_analysis(run()).is_err());
        assert!(wf.open().is_err());
        assert_eq!(wf.state(), WorkflowState::Finalized);
    }

    #[test]
    fn finalize_drops_pending_analysis() {
        let mut wf = JobWorkflow::new(JobId::new(1));
        let r = run();
        wf.begin_analysis(r).unwrap();
        wf.finalize();
        assert_eq!(wf.complete_analysis(r), None);
        assert_eq!(wf.state(), WorkflowState::Finalized);
    }

    #[test]
    fn unset_design_change_cannot_be_declared() {
        let mut wf = JobWorkflow::new(JobId::new(1));
        assert!(matches!(
            wf.declare_design_change(DesignChange::Unset),
            Err(NexaError::Validation(_))
        ));
    }

    #[test]
    fn timesheet_starts_once() {
        let mut wf = JobWorkflow::new(JobId::new(2));
        assert!(wf.start_timesheet());
        assert!(!wf.start_timesheet());
        assert!(wf.crew().timesheet_started);
    }

    #[test]
    fn crew_actions_do_not_open_completion() {
        let mut wf = JobWorkflow::new(JobId::new(2));
        assert!(wf.send_pin());
        assert!(!wf.send_pin());
        wf.start_timesheet();
        wf.set_hazard_notes(Some("traffic control"));
        assert_eq!(wf.state(), WorkflowState::NotStarted);
    }

    #[rstest]
    #[case::kept(Some("  energized equipment "), Some("energized equipment"))]
    #[case::blank(Some("   "), None)]
    #[case::cleared(None, None)]
    fn hazard_notes_are_trimmed(#[case] input: Option<&str>, #[case] expected: Option<&str>) {
        let mut wf = JobWorkflow::new(JobId::new(1));
        wf.set_hazard_notes(Some("weather"));
        wf.set_hazard_notes(input);
        assert_eq!(wf.crew().hazard_notes.as_deref(), expected);
    }

    #[test]
    fn hazard_notes_survive_finalize() {
        let mut wf = JobWorkflow::new(JobId::new(1));
        wf.finalize();
        wf.set_hazard_notes(Some("wind"));
        assert_eq!(wf.crew().hazard_notes.as_deref(), Some("wind"));
    }
}
