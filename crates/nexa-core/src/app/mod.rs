//! App - アプリケーション層
//!
//! ports を組み合わせてユースケースを実装します。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: アプリケーションの構築とワイヤリング
//! - **TodoService**: todo CRUD（検証 + 未設定時の Unconfigured）
//! - **WorkflowService**: 完了ワークフローと day flow
//! - **status**: ヘルスチェック

pub mod builder;
pub mod status;
pub mod todos;
pub mod workflow;

// 主要な型を再エクスポート
pub use self::builder::{App, AppBuilder, BuildError};
pub use self::status::HealthReport;
pub use self::todos::TodoService;
pub use self::workflow::{
    CompletionView, FinalizeOutcome, JobView, MaterialsView, WorkflowService,
};
