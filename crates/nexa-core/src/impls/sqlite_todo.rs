//! SqliteTodoStore - relational table backend (rusqlite)
//!
//! # 実装詳細
//! - 接続は 1 本を std Mutex で保護
//! - rusqlite は同期 API なので spawn_blocking で runtime の外に出す
//! - スキーマは open 時に `CREATE TABLE IF NOT EXISTS`
//! - created_at は UTC の epoch ミリ秒で保存（並び順に使う）

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::domain::{NexaError, NexaResult, NewTodo, Todo, TodoId, TodoPatch};
use crate::ports::{Clock, StoreKind, TodoStore};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        due TEXT,
        can_ai_handle INTEGER NOT NULL DEFAULT 0,
        done INTEGER NOT NULL DEFAULT 0,
        created_at_ms INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_todos_created_at ON todos(created_at_ms);
";

const SELECT_COLUMNS: &str = "SELECT id, title, due, can_ai_handle, done, created_at_ms FROM todos";

pub struct SqliteTodoStore {
    conn: Arc<Mutex<Connection>>,
    clock: Arc<dyn Clock>,
}

impl SqliteTodoStore {
    pub fn open(path: impl AsRef<Path>, clock: Arc<dyn Clock>) -> NexaResult<Self> {
        let conn = Connection::open(path)?;
        Self::bootstrap(conn, clock)
    }

    pub fn in_memory(clock: Arc<dyn Clock>) -> NexaResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::bootstrap(conn, clock)
    }

    fn bootstrap(conn: Connection, clock: Arc<dyn Clock>) -> NexaResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            clock,
        })
    }

    /// Run `f` on the connection off the async runtime.
    async fn with_conn<T, F>(&self, f: F) -> NexaResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> NexaResult<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| NexaError::Storage("sqlite connection lock poisoned".to_string()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| NexaError::Unexpected(format!("sqlite task failed: {e}")))?
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<Todo> {
    let created_at_ms: i64 = row.get(5)?;
    Ok(Todo {
        id: TodoId::new(row.get(0)?),
        title: row.get(1)?,
        due: row.get(2)?,
        can_ai_handle: row.get(3)?,
        done: row.get(4)?,
        created_at: DateTime::<Utc>::from_timestamp_millis(created_at_ms).unwrap_or_default(),
    })
}

fn find(conn: &Connection, id: TodoId) -> NexaResult<Option<Todo>> {
    let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
    Ok(conn.query_row(&sql, params![id.get()], map_row).optional()?)
}

fn not_found(id: TodoId) -> NexaError {
    NexaError::NotFound(format!("todo {id} not found"))
}

#[async_trait]
impl TodoStore for SqliteTodoStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Sqlite
    }

    async fn list(&self) -> NexaResult<Vec<Todo>> {
        self.with_conn(|conn| {
            let sql = format!("{SELECT_COLUMNS} ORDER BY created_at_ms DESC, id DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], map_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
    }

    async fn get(&self, id: TodoId) -> NexaResult<Todo> {
        self.with_conn(move |conn| find(conn, id)?.ok_or_else(|| not_found(id)))
            .await
    }

    async fn create(&self, input: NewTodo) -> NexaResult<Todo> {
        let created_at = self.clock.now();
        self.with_conn(move |conn| {
            let can_ai_handle = input.can_ai_handle.unwrap_or(false);
            conn.execute(
                "INSERT INTO todos (title, due, can_ai_handle, done, created_at_ms)
                 VALUES (?1, ?2, ?3, 0, ?4)",
                params![
                    input.title,
                    input.due,
                    can_ai_handle,
                    created_at.timestamp_millis()
                ],
            )?;
            let id = TodoId::new(conn.last_insert_rowid());
            find(conn, id)?.ok_or_else(|| {
                NexaError::Storage(format!("todo {id} vanished right after insert"))
            })
        })
        .await
    }

    async fn patch(&self, id: TodoId, patch: TodoPatch) -> NexaResult<Todo> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let mut todo = find(&tx, id)?.ok_or_else(|| not_found(id))?;
            todo.apply(&patch);
            tx.execute(
                "UPDATE todos SET title = ?1, due = ?2, can_ai_handle = ?3, done = ?4 WHERE id = ?5",
                params![todo.title, todo.due, todo.can_ai_handle, todo.done, id.get()],
            )?;
            tx.commit()?;
            Ok(todo)
        })
        .await
    }

    async fn delete(&self, id: TodoId) -> NexaResult<()> {
        self.with_conn(move |conn| {
            let affected = conn.execute("DELETE FROM todos WHERE id = ?1", params![id.get()])?;
            if affected == 0 {
                return Err(not_found(id));
            }
            Ok(())
        })
        .await
    }

    async fn ping(&self) -> NexaResult<()> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::contract;
    use crate::ports::FixedClock;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        ))
    }

    #[tokio::test]
    async fn satisfies_store_contract() {
        let clock = clock();
        let store = SqliteTodoStore::in_memory(clock.clone()).unwrap();
        contract::run_all(&store, &clock).await;
    }

    #[tokio::test]
    async fn rows_survive_reopen() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nexa.sqlite");

        let created = {
            let store = SqliteTodoStore::open(&path, clock()).unwrap();
            store
                .create(NewTodo::new("Confirm outage window").with_due("Tomorrow 9:00 AM"))
                .await
                .unwrap()
        };

        let reopened = SqliteTodoStore::open(&path, clock()).unwrap();
        let fetched = reopened.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn ping_succeeds_on_open_database() {
        let store = SqliteTodoStore::in_memory(clock()).unwrap();
        store.ping().await.unwrap();
        assert_eq!(store.kind(), StoreKind::Sqlite);
    }
}
