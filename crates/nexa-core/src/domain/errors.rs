//! Errors - エラー型と分類
//!
//! 境界（HTTP handler）は `ErrorKind` だけを見てステータスを決めます。
//! variant の追加はしても、kind の対応表は崩さないこと。

use thiserror::Error;

/// ErrorKind は運用上のエラー分類
///
/// # 分類
/// - Validation: 入力不正（必須フィールド欠落、id の形式違反など）
/// - NotFound: 指定 id のレコードがない
/// - Unconfigured: 外部依存（永続ストアなど）が設定されていない
/// - Conflict: 状態遷移として許されない操作（Finalized 後の変更など）
/// - Unexpected: それ以外すべて
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Unconfigured,
    Conflict,
    Unexpected,
}

/// NexaError はドメインエラー
#[derive(Debug, Error)]
pub enum NexaError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unconfigured(String),

    #[error("{0}")]
    InvalidTransition(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Unexpected(String),
}

impl NexaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NexaError::Validation(_) => ErrorKind::Validation,
            NexaError::NotFound(_) => ErrorKind::NotFound,
            NexaError::Unconfigured(_) => ErrorKind::Unconfigured,
            NexaError::InvalidTransition(_) => ErrorKind::Conflict,
            NexaError::Storage(_) | NexaError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }
}

impl From<rusqlite::Error> for NexaError {
    fn from(err: rusqlite::Error) -> Self {
        NexaError::Storage(err.to_string())
    }
}

pub type NexaResult<T> = Result<T, NexaError>;
