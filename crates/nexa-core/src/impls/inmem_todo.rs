//! InMemoryTodoStore - プロセス内の todo ストア
//!
//! プロセス終了で消える。テスト、および DATABASE_URL なしで
//! フォールバックを有効にしたときに使う。

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::todo::seed_todos;
use crate::domain::{NexaError, NexaResult, NewTodo, Todo, TodoId, TodoPatch};
use crate::ports::{Clock, StoreKind, TodoStore};

struct InMemoryTodoState {
    todos: BTreeMap<TodoId, Todo>,
    next_id: i64,
}

impl InMemoryTodoState {
    fn allocate_id(&mut self) -> TodoId {
        let id = TodoId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

pub struct InMemoryTodoStore {
    state: Mutex<InMemoryTodoState>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTodoStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(InMemoryTodoState {
                todos: BTreeMap::new(),
                next_id: 1,
            }),
            clock,
        }
    }

    /// Store pre-filled with the three demo todos (ids 1..=3).
    pub fn seeded(clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        let mut state = InMemoryTodoState {
            todos: BTreeMap::new(),
            next_id: 1,
        };
        for input in seed_todos() {
            let id = state.allocate_id();
            state.todos.insert(id, new_record(id, input, now));
        }
        Self {
            state: Mutex::new(state),
            clock,
        }
    }
}

fn new_record(id: TodoId, input: NewTodo, created_at: chrono::DateTime<chrono::Utc>) -> Todo {
    Todo {
        id,
        title: input.title,
        due: input.due,
        can_ai_handle: input.can_ai_handle.unwrap_or(false),
        done: false,
        created_at,
    }
}

fn not_found(id: TodoId) -> NexaError {
    NexaError::NotFound(format!("todo {id} not found"))
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Memory
    }

    async fn list(&self) -> NexaResult<Vec<Todo>> {
        let state = self.state.lock().await;
        let mut todos: Vec<Todo> = state.todos.values().cloned().collect();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(todos)
    }

    async fn get(&self, id: TodoId) -> NexaResult<Todo> {
        let state = self.state.lock().await;
        state.todos.get(&id).cloned().ok_or_else(|| not_found(id))
    }

    async fn create(&self, input: NewTodo) -> NexaResult<Todo> {
        let mut state = self.state.lock().await;
        let id = state.allocate_id();
        let todo = new_record(id, input, self.clock.now());
        state.todos.insert(id, todo.clone());
        Ok(todo)
    }

    async fn patch(&self, id: TodoId, patch: TodoPatch) -> NexaResult<Todo> {
        let mut state = self.state.lock().await;
        let todo = state.todos.get_mut(&id).ok_or_else(|| not_found(id))?;
        todo.apply(&patch);
        Ok(todo.clone())
    }

    async fn delete(&self, id: TodoId) -> NexaResult<()> {
        let mut state = self.state.lock().await;
        state.todos.remove(&id).map(|_| ()).ok_or_else(|| not_found(id))
    }

    async fn ping(&self) -> NexaResult<()> {
        Ok(())
    }
}
