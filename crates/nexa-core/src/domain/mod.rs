//! Domain model (IDs, todos, jobs, completion workflow, events, errors).

pub mod analysis;
pub mod checklist;
pub mod design;
pub mod errors;
pub mod events;
pub mod ids;
pub mod job;
pub mod state;
pub mod todo;
pub mod workflow;

pub use analysis::AnalysisSnapshot;
pub use checklist::{ChecklistUpdate, CompletionChecklist};
pub use design::{Design, DesignRequest};
pub use errors::{ErrorKind, NexaError, NexaResult};
pub use events::DomainEvent;
pub use ids::{AnalysisRunId, JobId, RequestId, TodoId};
pub use job::{DayPlan, Job};
pub use state::{BuildKind, DesignChange, Verdict, WorkflowState};
pub use todo::{NewTodo, Todo, TodoPatch};
pub use workflow::{CrewStatus, JobWorkflow};
