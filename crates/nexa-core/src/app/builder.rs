//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! # 方針
//! - ports の実装を外から注入し、App（サービスの束）を組み立てる
//! - 起動時検証（Fail-fast）: おかしな組み合わせは build() で BuildError
//! - todo ストアは省略可能。省略時は todo 操作がすべて Unconfigured になる

use std::sync::Arc;
use std::time::Duration;

use super::todos::TodoService;
use super::workflow::{DEFAULT_ANALYSIS_DELAY, WorkflowService};
use crate::domain::DayPlan;
use crate::impls::{DEFAULT_ACTIVITY_CAPACITY, InMemoryActivityFeed, KeywordDesignGenerator};
use crate::ports::{Clock, DesignGenerator, SystemClock, TodoStore, UlidGenerator};

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .todo_store(Arc::new(store))
///     .analysis_delay(Duration::from_millis(1200))
///     .build()?;
/// ```
pub struct AppBuilder {
    todo_store: Option<Arc<dyn TodoStore>>,
    design_generator: Arc<dyn DesignGenerator>,
    clock: Arc<dyn Clock>,
    plan: DayPlan,
    analysis_delay: Duration,
    activity_capacity: usize,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("day plan has no jobs")]
    EmptyDayPlan,

    #[error("day plan lists job {0} more than once")]
    DuplicateJob(crate::domain::JobId),
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            todo_store: None,
            design_generator: Arc::new(KeywordDesignGenerator::new()),
            clock: Arc::new(SystemClock),
            plan: DayPlan::sample(),
            analysis_delay: DEFAULT_ANALYSIS_DELAY,
            activity_capacity: DEFAULT_ACTIVITY_CAPACITY,
        }
    }

    pub fn todo_store(mut self, store: Arc<dyn TodoStore>) -> Self {
        self.todo_store = Some(store);
        self
    }

    pub fn design_generator(mut self, generator: Arc<dyn DesignGenerator>) -> Self {
        self.design_generator = generator;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn day_plan(mut self, plan: DayPlan) -> Self {
        self.plan = plan;
        self
    }

    pub fn analysis_delay(mut self, delay: Duration) -> Self {
        self.analysis_delay = delay;
        self
    }

    pub fn activity_capacity(mut self, capacity: usize) -> Self {
        self.activity_capacity = capacity;
        self
    }

    /// # 検証
    /// - day plan が空でないこと
    /// - job id が重複していないこと
    pub fn build(self) -> Result<App, BuildError> {
        if self.plan.jobs().is_empty() {
            return Err(BuildError::EmptyDayPlan);
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = self.plan.jobs().iter().find(|j| !seen.insert(j.id)) {
            return Err(BuildError::DuplicateJob(dup.id));
        }

        let activity = Arc::new(InMemoryActivityFeed::new(
            self.activity_capacity,
            self.clock.clone(),
        ));
        let ids = Arc::new(UlidGenerator::new(self.clock.clone()));
        Ok(App {
            todos: Arc::new(TodoService::new(self.todo_store, activity.clone())),
            workflow: Arc::new(WorkflowService::new(
                self.plan,
                ids.clone(),
                activity.clone(),
                self.analysis_delay,
            )),
            design: self.design_generator,
            activity,
            ids,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// App はサービスの束。HTTP 層はこれを state として持つ。
#[derive(Clone)]
pub struct App {
    pub todos: Arc<TodoService>,
    pub workflow: Arc<WorkflowService>,
    pub design: Arc<dyn DesignGenerator>,
    pub activity: Arc<InMemoryActivityFeed>,
    pub ids: Arc<UlidGenerator<Arc<dyn Clock>>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::sample_jobs;
    use crate::impls::InMemoryTodoStore;
    use crate::ports::StoreKind;

    #[test]
    fn test_build_defaults() {
        let app = AppBuilder::new().build().unwrap();
        assert_eq!(app.todos.store_kind(), None);
        assert_eq!(app.workflow.plan().jobs().len(), 3);
        assert_eq!(app.workflow.analysis_delay(), DEFAULT_ANALYSIS_DELAY);
    }

    #[test]
    fn test_build_with_store() {
        let app = AppBuilder::new()
            .todo_store(Arc::new(InMemoryTodoStore::seeded(Arc::new(SystemClock))))
            .build()
            .unwrap();
        assert_eq!(app.todos.store_kind(), Some(StoreKind::Memory));
    }

    #[test]
    fn test_build_empty_plan() {
        let app = AppBuilder::new().day_plan(DayPlan::new(Vec::new())).build();
        assert!(matches!(app, Err(BuildError::EmptyDayPlan)));
    }

    #[test]
    fn test_build_duplicate_job() {
        let mut jobs = sample_jobs();
        jobs.push(jobs[0].clone());
        let app = AppBuilder::new().day_plan(DayPlan::new(jobs)).build();
        assert!(matches!(
            app,
            Err(BuildError::DuplicateJob(id)) if id.get() == 1
        ));
    }

    #[tokio::test]
    async fn test_services_share_activity_feed() {
        let app = AppBuilder::new().build().unwrap();
        app.workflow.stage_materials().await;
        assert_eq!(app.activity.recent().len(), 1);
    }
}
