//! Status - ヘルスチェック
//!
//! プロセスは常に `ok: true`。`db` だけがストアの状態で変わる。
//! 永続ストア（SQLite）がない場合は、メモリのフォールバック中でも
//! "missing DATABASE_URL" を返す。

use serde::Serialize;

use super::todos::TodoService;
use crate::ports::StoreKind;

pub const DB_UP: &str = "up";
pub const DB_MISSING: &str = "missing DATABASE_URL";
pub const DB_ERROR: &str = "error";

/// `GET /api/health` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub ok: bool,
    pub db: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    /// False only when the database probe failed.
    pub fn is_healthy(&self) -> bool {
        self.error.is_none()
    }
}

pub async fn check(todos: &TodoService) -> HealthReport {
    if todos.store_kind() != Some(StoreKind::Sqlite) {
        return HealthReport {
            ok: true,
            db: DB_MISSING,
            error: None,
        };
    }
    match todos.ping().await {
        Ok(()) => HealthReport {
            ok: true,
            db: DB_UP,
            error: None,
        },
        Err(err) => {
            tracing::warn!(error = %err, "database probe failed");
            HealthReport {
                ok: true,
                db: DB_ERROR,
                error: Some(err.to_string()),
            }
        }
    }
}
