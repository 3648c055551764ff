//! Ports - 抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」。外部システム（DB、engineering
//! service、時計、ログ先）への依存をここの trait に閉じ込め、
//! app 層は trait object だけを見る。

pub mod clock;
pub mod design_generator;
pub mod event_sink;
pub mod id_generator;
pub mod todo_store;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::design_generator::DesignGenerator;
pub use self::event_sink::{EventSink, NoopEventSink};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::todo_store::{StoreKind, TodoStore};
