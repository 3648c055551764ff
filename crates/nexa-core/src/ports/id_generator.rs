//! IdGenerator port - ID 生成の抽象化
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース。Clock から timestamp を取るので、
//!   FixedClock を渡せば timestamp 部分が決定的になる。

use crate::domain::ids::{AnalysisRunId, RequestId};
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator はプロセス内で使う ULID ID を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（handler と spawn された task の両方から使う）
pub trait IdGenerator: Send + Sync {
    fn generate_request_id(&self) -> RequestId;

    fn generate_run_id(&self) -> AnalysisRunId;
}

pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn next_ulid(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis().max(0) as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_request_id(&self) -> RequestId {
        RequestId::from(self.next_ulid())
    }

    fn generate_run_id(&self) -> AnalysisRunId {
        AnalysisRunId::from(self.next_ulid())
    }
}
