//! nexa-server
//!
//! HTTP front of the NEXA field-service backend: configuration, store
//! selection, logging setup and the axum router.

pub mod config;
pub mod http;
pub mod telemetry;

use std::sync::Arc;

use nexa_core::app::{App, AppBuilder, BuildError};
use nexa_core::domain::NexaError;
use nexa_core::impls::{InMemoryTodoStore, SqliteTodoStore};
use nexa_core::ports::{Clock, SystemClock, TodoStore};

use crate::config::{ServerConfig, SqliteLocation};

pub use crate::http::{AppState, build_router};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to open todo store: {0}")]
    Store(#[from] NexaError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Pick the todo backend.
///
/// - DATABASE_URL あり → SQLite
/// - なし + NEXA_MEMORY_FALLBACK → seed 済みのメモリストア
/// - どちらもなし → None（todo API は 503）
pub fn open_todo_store(
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> Result<Option<Arc<dyn TodoStore>>, NexaError> {
    let store: Option<Arc<dyn TodoStore>> = match &config.database {
        Some(SqliteLocation::Memory) => Some(Arc::new(SqliteTodoStore::in_memory(clock)?)),
        Some(SqliteLocation::File(path)) => Some(Arc::new(SqliteTodoStore::open(path, clock)?)),
        None if config.memory_fallback => Some(Arc::new(InMemoryTodoStore::seeded(clock))),
        None => None,
    };
    Ok(store)
}

pub fn build_app(config: &ServerConfig) -> Result<App, StartupError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut builder = AppBuilder::new()
        .clock(clock.clone())
        .analysis_delay(config.analysis_delay)
        .activity_capacity(config.activity_capacity);
    match open_todo_store(config, clock)? {
        Some(store) => {
            tracing::info!(kind = ?store.kind(), "todo store ready");
            builder = builder.todo_store(store);
        }
        None => tracing::warn!("DATABASE_URL not set; todo endpoints will answer 503"),
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexa_core::ports::StoreKind;
    use std::time::Duration;

    fn config(database: Option<SqliteLocation>, memory_fallback: bool) -> ServerConfig {
        ServerConfig {
            bind: "127.0.0.1:0".parse().unwrap(),
            database,
            memory_fallback,
            analysis_delay: Duration::from_millis(10),
            activity_capacity: 5,
            log_json: false,
        }
    }

    fn kind_of(config: &ServerConfig) -> Option<StoreKind> {
        open_todo_store(config, Arc::new(SystemClock))
            .unwrap()
            .map(|store| store.kind())
    }

    #[test]
    fn no_database_and_no_fallback_means_no_store() {
        assert_eq!(kind_of(&config(None, false)), None);
    }

    #[test]
    fn fallback_uses_memory_store() {
        assert_eq!(kind_of(&config(None, true)), Some(StoreKind::Memory));
    }

    #[test]
    fn database_url_wins_over_fallback() {
        let cfg = config(Some(SqliteLocation::Memory), true);
        assert_eq!(kind_of(&cfg), Some(StoreKind::Sqlite));
    }

    #[test]
    fn opens_sqlite_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("todos.sqlite");
        let cfg = config(Some(SqliteLocation::File(path.clone())), false);
        assert_eq!(kind_of(&cfg), Some(StoreKind::Sqlite));
        assert!(path.exists());
    }

    #[test]
    fn unopenable_sqlite_path_fails_startup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing-dir").join("todos.sqlite");
        let err = build_app(&config(Some(SqliteLocation::File(path)), false))
            .err()
            .expect("startup must fail");
        assert!(matches!(err, StartupError::Store(_)));
    }

    #[test]
    fn build_app_applies_config() {
        let app = build_app(&config(None, false)).unwrap();
        assert_eq!(app.todos.store_kind(), None);
        assert_eq!(app.workflow.analysis_delay(), Duration::from_millis(10));
    }
}
