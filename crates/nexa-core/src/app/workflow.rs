//! WorkflowService - 当日ジョブの完了ワークフローと day flow
//!
//! # 状態の持ち方
//! - job ごとの JobWorkflow を 1 つの tokio Mutex の中に置く
//! - Analyze の待ち時間は spawn した task で寝て過ごす。AbortHandle は
//!   job のレコードに持たせ、再実行や Finalize のときに abort する
//! - abort が間に合わなかった run も、run id が現在の run と一致しない限り
//!   判定を書かない（JobWorkflow::complete_analysis）
//!
//! イベントはロックを持ったまま EventSink に流す（EventSink は同期 API）。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tracing::{debug, info};

use crate::domain::{
    AnalysisRunId, ChecklistUpdate, CompletionChecklist, CrewStatus, DayPlan, DesignChange,
    DomainEvent, Job, JobId, JobWorkflow, NexaError, NexaResult, Verdict, WorkflowState,
};
use crate::ports::{EventSink, IdGenerator};

pub const DEFAULT_ANALYSIS_DELAY: Duration = Duration::from_millis(1200);

/// A job as the day board shows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    #[serde(flatten)]
    pub job: Job,
    pub status: WorkflowState,
    #[serde(flatten)]
    pub crew: CrewStatus,
    pub tailboard_open: bool,
}

/// The completion screen of one job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionView {
    pub job_id: JobId,
    pub title: String,
    pub state: WorkflowState,
    pub checklist: CompletionChecklist,
    pub design_change: DesignChange,
    pub photo_count: u32,
    pub analyzing: bool,
    pub verdict: Option<Verdict>,
    pub message: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeOutcome {
    pub finalized: bool,
    pub staged: bool,
    pub next_job_id: Option<JobId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialsView {
    pub staged: bool,
    pub materials: Vec<String>,
}

struct JobRecord {
    workflow: JobWorkflow,
    analysis: Option<AbortHandle>,
}

impl JobRecord {
    fn cancel_analysis(&mut self) {
        if let Some(handle) = self.analysis.take() {
            handle.abort();
        }
    }
}

struct DayBoard {
    records: HashMap<JobId, JobRecord>,
    staged: bool,
    /// 開いている tailboard は常に 1 つだけ。
    tailboard: Option<JobId>,
}

impl DayBoard {
    fn record_mut(&mut self, id: JobId) -> NexaResult<&mut JobRecord> {
        self.records.get_mut(&id).ok_or_else(|| not_found(id))
    }

    fn view(&self, job: &Job) -> NexaResult<JobView> {
        let record = self.records.get(&job.id).ok_or_else(|| not_found(job.id))?;
        Ok(job_view(job, &record.workflow, self.tailboard == Some(job.id)))
    }
}

fn not_found(id: JobId) -> NexaError {
    NexaError::NotFound(format!("job {id} not found"))
}

pub struct WorkflowService {
    plan: DayPlan,
    state: Arc<Mutex<DayBoard>>,
    ids: Arc<dyn IdGenerator>,
    events: Arc<dyn EventSink>,
    analysis_delay: Duration,
}

impl WorkflowService {
    pub fn new(
        plan: DayPlan,
        ids: Arc<dyn IdGenerator>,
        events: Arc<dyn EventSink>,
        analysis_delay: Duration,
    ) -> Self {
        let records = plan
            .jobs()
            .iter()
            .map(|job| {
                (
                    job.id,
                    JobRecord {
                        workflow: JobWorkflow::new(job.id),
                        analysis: None,
                    },
                )
            })
            .collect();
        Self {
            plan,
            state: Arc::new(Mutex::new(DayBoard {
                records,
                staged: false,
                tailboard: None,
            })),
            ids,
            events,
            analysis_delay,
        }
    }

    pub fn plan(&self) -> &DayPlan {
        &self.plan
    }

    pub fn analysis_delay(&self) -> Duration {
        self.analysis_delay
    }

    fn lookup(&self, id: JobId) -> NexaResult<&Job> {
        self.plan.get(id).ok_or_else(|| not_found(id))
    }

    /// Every job in start-time order.
    pub async fn jobs(&self) -> Vec<JobView> {
        let state = self.state.lock().await;
        self.plan
            .jobs()
            .iter()
            .filter_map(|job| state.view(job).ok())
            .collect()
    }

    pub async fn job(&self, id: JobId) -> NexaResult<JobView> {
        let job = self.lookup(id)?;
        let state = self.state.lock().await;
        state.view(job)
    }

    pub fn next_job(&self, id: JobId) -> NexaResult<Option<JobId>> {
        self.lookup(id)?;
        Ok(self.plan.next_after(id).map(|job| job.id))
    }

    /// Read the completion view without opening it.
    pub async fn completion(&self, id: JobId) -> NexaResult<CompletionView> {
        let job = self.lookup(id)?;
        let mut state = self.state.lock().await;
        let record = state.record_mut(id)?;
        Ok(completion_view(job, &record.workflow))
    }

    pub async fn open(&self, id: JobId) -> NexaResult<CompletionView> {
        self.mutate(id, |_| Ok(())).await
    }

    pub async fn update_checklist(
        &self,
        id: JobId,
        update: ChecklistUpdate,
    ) -> NexaResult<CompletionView> {
        self.mutate(id, |wf| wf.update_checklist(&update)).await
    }

    /// Replace the photo count with the size of the latest upload.
    pub async fn upload_photos(&self, id: JobId, count: u32) -> NexaResult<CompletionView> {
        self.mutate(id, |wf| wf.set_photo_count(count)).await
    }

    pub async fn declare_design_change(
        &self,
        id: JobId,
        change: DesignChange,
    ) -> NexaResult<CompletionView> {
        if change == DesignChange::Unset {
            return Err(NexaError::Validation(
                "design change must be declared as yes or no".to_string(),
            ));
        }
        self.mutate(id, |wf| wf.declare_design_change(change)).await
    }

    /// Open the job implicitly, then apply `op`.
    async fn mutate<F>(&self, id: JobId, op: F) -> NexaResult<CompletionView>
    where
        F: FnOnce(&mut JobWorkflow) -> NexaResult<()>,
    {
        let job = self.lookup(id)?;
        let mut state = self.state.lock().await;
        let record = state.record_mut(id)?;
        self.open_record(job, &mut record.workflow)?;
        op(&mut record.workflow)?;
        Ok(completion_view(job, &record.workflow))
    }

    fn open_record(&self, job: &Job, workflow: &mut JobWorkflow) -> NexaResult<()> {
        if workflow.open()? {
            info!(job_id = %job.id, "completion opened");
            self.events.emit(DomainEvent::CompletionOpened {
                job_id: job.id,
                title: job.title.clone(),
            });
        }
        Ok(())
    }

    /// Start (or restart) the simulated photo analysis.
    ///
    /// The verdict is written once `analysis_delay` has elapsed, evaluated
    /// against whatever the job looks like at that moment. A pending run is
    /// cancelled and only the latest run writes.
    pub async fn analyze(&self, id: JobId) -> NexaResult<CompletionView> {
        let job = self.lookup(id)?;
        let run = self.ids.generate_run_id();
        let mut state = self.state.lock().await;
        let record = state.record_mut(id)?;
        self.open_record(job, &mut record.workflow)?;

        if let Some(superseded) = record.workflow.begin_analysis(run)? {
            debug!(job_id = %id, run_id = %superseded, "analysis superseded");
        }
        record.cancel_analysis();

        let task = tokio::spawn(resolve_analysis(
            self.state.clone(),
            self.events.clone(),
            job.clone(),
            run,
            self.analysis_delay,
        ));
        record.analysis = Some(task.abort_handle());

        info!(job_id = %id, run_id = %run, "analysis started");
        self.events.emit(DomainEvent::AnalysisStarted {
            job_id: id,
            title: job.title.clone(),
        });
        Ok(completion_view(job, &record.workflow))
    }

    /// Finalize the job; with `stage_next`, also stage the day's materials
    /// and prepare the next job's crew (pin + tailboard).
    pub async fn finalize(&self, id: JobId, stage_next: bool) -> NexaResult<FinalizeOutcome> {
        let job = self.lookup(id)?;
        let mut state = self.state.lock().await;
        let record = state.record_mut(id)?;
        record.cancel_analysis();
        if record.workflow.finalize() {
            info!(job_id = %id, state = ?record.workflow.state(), "job finalized");
            self.events.emit(DomainEvent::JobFinalized {
                job_id: id,
                title: job.title.clone(),
            });
        }

        let mut next_job_id = None;
        if stage_next {
            self.stage_locked(&mut state);
            if let Some(next) = self.plan.next_after(id) {
                let record = state.record_mut(next.id)?;
                self.send_pin_locked(next, &mut record.workflow);
                self.open_tailboard_locked(next, &mut state)?;
                next_job_id = Some(next.id);
            }
        }

        Ok(FinalizeOutcome {
            finalized: true,
            staged: state.staged,
            next_job_id,
        })
    }

    pub async fn send_pin(&self, id: JobId) -> NexaResult<JobView> {
        let job = self.lookup(id)?;
        let mut state = self.state.lock().await;
        let record = state.record_mut(id)?;
        self.send_pin_locked(job, &mut record.workflow);
        state.view(job)
    }

    /// Open this job's tailboard. Any other open tailboard closes.
    pub async fn open_tailboard(&self, id: JobId) -> NexaResult<JobView> {
        let job = self.lookup(id)?;
        let mut state = self.state.lock().await;
        self.open_tailboard_locked(job, &mut state)?;
        state.view(job)
    }

    /// Write the tailboard hazard notes. `None` or blank text clears them.
    pub async fn set_hazard_notes(&self, id: JobId, notes: Option<&str>) -> NexaResult<JobView> {
        let job = self.lookup(id)?;
        let mut state = self.state.lock().await;
        let record = state.record_mut(id)?;
        record.workflow.set_hazard_notes(notes);
        debug!(
            job_id = %id,
            present = record.workflow.crew().hazard_notes.is_some(),
            "hazard notes updated"
        );
        state.view(job)
    }

    fn send_pin_locked(&self, job: &Job, workflow: &mut JobWorkflow) {
        if workflow.send_pin() {
            info!(job_id = %job.id, "pin sent");
            self.events.emit(DomainEvent::PinSent {
                job_id: job.id,
                title: job.title.clone(),
            });
        }
    }

    fn open_tailboard_locked(&self, job: &Job, state: &mut DayBoard) -> NexaResult<()> {
        let timesheet_started = state.record_mut(job.id)?.workflow.start_timesheet();
        let previous = state.tailboard.replace(job.id);
        if previous != Some(job.id) {
            info!(job_id = %job.id, closed = ?previous, "tailboard opened");
            self.events.emit(DomainEvent::TailboardOpened {
                job_id: job.id,
                title: job.title.clone(),
            });
        }
        if timesheet_started {
            self.events.emit(DomainEvent::TimesheetStarted {
                job_id: job.id,
                title: job.title.clone(),
            });
        }
        Ok(())
    }

    /// Mark the day staged and return the pick sheet.
    pub async fn stage_materials(&self) -> MaterialsView {
        let mut state = self.state.lock().await;
        self.stage_locked(&mut state);
        MaterialsView {
            staged: true,
            materials: self.plan.staged_materials(),
        }
    }

    pub async fn materials(&self) -> MaterialsView {
        let state = self.state.lock().await;
        MaterialsView {
            staged: state.staged,
            materials: self.plan.staged_materials(),
        }
    }

    fn stage_locked(&self, state: &mut DayBoard) {
        if state.staged {
            return;
        }
        state.staged = true;
        let count = self.plan.staged_materials().len();
        info!(count, "materials staged");
        self.events.emit(DomainEvent::MaterialsStaged { count });
    }
}

async fn resolve_analysis(
    state: Arc<Mutex<DayBoard>>,
    events: Arc<dyn EventSink>,
    job: Job,
    run: AnalysisRunId,
    delay: Duration,
) {
    tokio::time::sleep(delay).await;
    let mut state = state.lock().await;
    let Some(record) = state.records.get_mut(&job.id) else {
        return;
    };
    match record.workflow.complete_analysis(run) {
        Some(verdict) => {
            record.analysis = None;
            info!(job_id = %job.id, run_id = %run, ?verdict, "analysis completed");
            events.emit(DomainEvent::AnalysisCompleted {
                job_id: job.id,
                title: job.title,
                verdict,
            });
        }
        None => debug!(job_id = %job.id, run_id = %run, "stale analysis run dropped"),
    }
}

fn job_view(job: &Job, workflow: &JobWorkflow, tailboard_open: bool) -> JobView {
    JobView {
        job: job.clone(),
        status: workflow.state(),
        crew: workflow.crew().clone(),
        tailboard_open,
    }
}

fn completion_view(job: &Job, workflow: &JobWorkflow) -> CompletionView {
    CompletionView {
        job_id: job.id,
        title: job.title.clone(),
        state: workflow.state(),
        checklist: workflow.checklist(),
        design_change: workflow.design_change(),
        photo_count: workflow.photo_count(),
        analyzing: workflow.is_analyzing(),
        verdict: workflow.verdict(),
        message: workflow.verdict().map(Verdict::message),
    }
}
