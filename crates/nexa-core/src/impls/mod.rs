//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryTodoStore**: テスト用 / フォールバック用の todo ストア
//! - **SqliteTodoStore**: DATABASE_URL がある場合の todo ストア
//! - **KeywordDesignGenerator**: キーワードマッチの設計案 mock
//! - **InMemoryActivityFeed**: activity feed 用の EventSink

pub mod activity_feed;
pub mod inmem_todo;
pub mod keyword_design;
pub mod sqlite_todo;

// 主要な型を再エクスポート
pub use self::activity_feed::{ActivityEntry, DEFAULT_ACTIVITY_CAPACITY, InMemoryActivityFeed};
pub use self::inmem_todo::InMemoryTodoStore;
pub use self::keyword_design::KeywordDesignGenerator;
pub use self::sqlite_todo::SqliteTodoStore;
