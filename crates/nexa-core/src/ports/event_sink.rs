//! EventSink port - イベント記録の抽象化
//!
//! - NoopEventSink: 何もしない
//! - InMemoryActivityFeed（impls）: 直近 N 件を保持して activity feed に出す

use crate::domain::DomainEvent;

/// EventSink はドメインイベントを記録
///
/// 同期 API。ワークフローのロックを持ったまま呼ばれることがあるので、
/// 実装はブロックしないこと。
pub trait EventSink: Send + Sync {
    fn emit(&self, event: DomainEvent);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: DomainEvent) {}
}
