//! TodoService - todo 操作の入口
//!
//! 入力の検証はここで行い、adapter には検証済みの値だけを渡す。
//! ストアが未設定（DATABASE_URL なし、フォールバックなし）の場合は
//! すべての操作が Unconfigured を返す。

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{DomainEvent, NewTodo, NexaError, NexaResult, Todo, TodoId, TodoPatch};
use crate::ports::{EventSink, StoreKind, TodoStore};

pub const UNCONFIGURED_MESSAGE: &str = "DATABASE_URL is not configured";

pub struct TodoService {
    store: Option<Arc<dyn TodoStore>>,
    events: Arc<dyn EventSink>,
}

impl TodoService {
    pub fn new(store: Option<Arc<dyn TodoStore>>, events: Arc<dyn EventSink>) -> Self {
        Self { store, events }
    }

    pub fn store_kind(&self) -> Option<StoreKind> {
        self.store.as_ref().map(|s| s.kind())
    }

    fn store(&self) -> NexaResult<&dyn TodoStore> {
        self.store
            .as_deref()
            .ok_or_else(|| NexaError::Unconfigured(UNCONFIGURED_MESSAGE.to_string()))
    }

    pub async fn list(&self) -> NexaResult<Vec<Todo>> {
        self.store()?.list().await
    }

    pub async fn get(&self, id: TodoId) -> NexaResult<Todo> {
        self.store()?.get(id).await
    }

    pub async fn create(&self, input: NewTodo) -> NexaResult<Todo> {
        let store = self.store()?;
        let input = input.validated()?;
        let todo = store.create(input).await?;
        info!(todo_id = %todo.id, title = %todo.title, "todo created");
        self.events.emit(DomainEvent::TodoCreated {
            todo_id: todo.id,
            title: todo.title.clone(),
        });
        Ok(todo)
    }

    pub async fn patch(&self, id: TodoId, patch: TodoPatch) -> NexaResult<Todo> {
        let store = self.store()?;
        let patch = patch.validated()?;
        let marks_done = patch.done == Some(true);
        let todo = store.patch(id, patch).await?;
        debug!(todo_id = %id, done = todo.done, "todo patched");
        if marks_done {
            self.events.emit(DomainEvent::TodoCompleted { todo_id: id });
        }
        Ok(todo)
    }

    pub async fn delete(&self, id: TodoId) -> NexaResult<()> {
        self.store()?.delete(id).await?;
        info!(todo_id = %id, "todo deleted");
        Ok(())
    }

    /// Probe the backend. Unconfigured when there is none.
    pub async fn ping(&self) -> NexaResult<()> {
        self.store()?.ping().await
    }
}
