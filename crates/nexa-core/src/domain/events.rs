//! Events - ドメインイベント
//!
//! ワークフローと day flow の遷移ごとに 1 件発行し、EventSink 経由で
//! activity feed に載せる。

use serde::{Deserialize, Serialize};

use super::ids::{JobId, TodoId};
use super::state::Verdict;

/// DomainEvent はドメインで発生したイベント
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    CompletionOpened { job_id: JobId, title: String },
    AnalysisStarted { job_id: JobId, title: String },
    AnalysisCompleted { job_id: JobId, title: String, verdict: Verdict },
    JobFinalized { job_id: JobId, title: String },
    PinSent { job_id: JobId, title: String },
    TailboardOpened { job_id: JobId, title: String },
    TimesheetStarted { job_id: JobId, title: String },
    MaterialsStaged { count: usize },
    TodoCreated { todo_id: TodoId, title: String },
    TodoCompleted { todo_id: TodoId },
}

impl DomainEvent {
    /// Human-readable line for the activity feed.
    pub fn message(&self) -> String {
        match self {
            DomainEvent::CompletionOpened { title, .. } => {
                format!("Completion package opened for “{title}”.")
            }
            DomainEvent::AnalysisStarted { title, .. } => {
                format!("Analyzing photos vs spec for “{title}”.")
            }
            DomainEvent::AnalysisCompleted { title, verdict, .. } => {
                format!("“{title}”: {}", verdict.message())
            }
            DomainEvent::JobFinalized { title, .. } => format!("Finalized “{title}”."),
            DomainEvent::PinSent { title, .. } => format!("Pin sent to crew for “{title}”."),
            DomainEvent::TailboardOpened { title, .. } => {
                format!("Tailboard opened for “{title}”.")
            }
            DomainEvent::TimesheetStarted { title, .. } => {
                format!("Timesheet started for “{title}”.")
            }
            DomainEvent::MaterialsStaged { count } => {
                format!("Material pick sheet generated for today’s jobs ({count} items).")
            }
            DomainEvent::TodoCreated { title, .. } => format!("To-do added: {title}"),
            DomainEvent::TodoCompleted { todo_id } => format!("To-do #{todo_id} marked done."),
        }
    }

    pub fn job_id(&self) -> Option<JobId> {
        match self {
            DomainEvent::CompletionOpened { job_id, .. }
            | DomainEvent::AnalysisStarted { job_id, .. }
            | DomainEvent::AnalysisCompleted { job_id, .. }
            | DomainEvent::JobFinalized { job_id, .. }
            | DomainEvent::PinSent { job_id, .. }
            | DomainEvent::TailboardOpened { job_id, .. }
            | DomainEvent::TimesheetStarted { job_id, .. } => Some(*job_id),
            DomainEvent::MaterialsStaged { .. }
            | DomainEvent::TodoCreated { .. }
            | DomainEvent::TodoCompleted { .. } => None,
        }
    }
}
