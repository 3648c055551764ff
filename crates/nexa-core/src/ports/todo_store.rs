//! TodoStore port - todo の永続化
//!
//! 実装（adapter）は差し替え可能:
//! - InMemoryTodoStore: テスト用 / DATABASE_URL なしのフォールバック
//! - SqliteTodoStore: relational table（DATABASE_URL あり）
//!
//! 入力の検証（title の trim など）は TodoService 側で行う。
//! adapter は検証済みの値だけを受け取る前提。

use async_trait::async_trait;

use crate::domain::{NexaResult, NewTodo, Todo, TodoId, TodoPatch};

/// Which adapter is behind the port (health check reports on it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Sqlite,
}

/// TodoStore は todo レコードの CRUD
///
/// # 設計原則
/// - 各操作は独立した 1 回の試行（リトライなし）
/// - 楽観ロックなし（同じ id への同時 PATCH は後勝ち）
#[async_trait]
pub trait TodoStore: Send + Sync {
    fn kind(&self) -> StoreKind;

    /// All todos, newest first (created_at desc, then id desc).
    async fn list(&self) -> NexaResult<Vec<Todo>>;

    /// NotFound if absent.
    async fn get(&self, id: TodoId) -> NexaResult<Todo>;

    /// Assigns the id; `done` starts false, `can_ai_handle` defaults to false.
    async fn create(&self, input: NewTodo) -> NexaResult<Todo>;

    /// NotFound if absent.
    async fn patch(&self, id: TodoId, patch: TodoPatch) -> NexaResult<Todo>;

    /// NotFound if absent.
    async fn delete(&self, id: TodoId) -> NexaResult<()>;

    /// Liveness probe for the backend.
    async fn ping(&self) -> NexaResult<()>;
}
