//! DesignGenerator port - 説明文から設計案（資材リスト）を作る
//!
//! 今はキーワードマッチの mock（KeywordDesignGenerator）だけ。
//! 実際の engineering service（O-Calc など）につなぐときも同じ trait を実装する。

use async_trait::async_trait;

use crate::domain::{Design, NexaResult};

#[async_trait]
pub trait DesignGenerator: Send + Sync {
    /// Empty or whitespace-only descriptions are accepted, never rejected.
    async fn generate(&self, description: &str) -> NexaResult<Design>;
}
