//! State - 完了ワークフローの状態と判定結果
//!
//! # 状態遷移
//! - NotStarted → InProgress（完了画面を開く / 何か操作する）
//! - InProgress → MeetsSpec | NeedsGoBack（Analyze の完了）
//! - * → Finalized（Finalize。判定結果による制限はしない）
//!
//! Finalized から戻る遷移はない。

use serde::{Deserialize, Serialize};

use super::errors::NexaError;

/// WorkflowState は Job 1 件の完了ワークフローの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    NotStarted,
    InProgress,
    MeetsSpec,
    NeedsGoBack,
    Finalized,
}

impl WorkflowState {
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkflowState::Finalized)
    }
}

/// Analyze の判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    MeetsSpec,
    NeedsGoBack,
}

impl Verdict {
    pub fn message(self) -> &'static str {
        match self {
            Verdict::MeetsSpec => "Meets Spec: all checks passed.",
            Verdict::NeedsGoBack => "Needs Go-Back: discrepancies found against spec items.",
        }
    }

    pub fn as_state(self) -> WorkflowState {
        match self {
            Verdict::MeetsSpec => WorkflowState::MeetsSpec,
            Verdict::NeedsGoBack => WorkflowState::NeedsGoBack,
        }
    }
}

/// 設計変更（Redlines/Bluelines）の有無。未申告は Unset。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignChange {
    #[default]
    Unset,
    Yes,
    No,
}

impl From<bool> for DesignChange {
    fn from(changed: bool) -> Self {
        if changed {
            DesignChange::Yes
        } else {
            DesignChange::No
        }
    }
}

/// 現場が申告する施工の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildKind {
    /// Built as designed
    Built,
    Redlines,
    Bluelines,
}

impl BuildKind {
    pub fn design_change(self) -> DesignChange {
        match self {
            BuildKind::Built => DesignChange::No,
            BuildKind::Redlines | BuildKind::Bluelines => DesignChange::Yes,
        }
    }
}

impl std::str::FromStr for BuildKind {
    type Err = NexaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "built" => Ok(BuildKind::Built),
            "redlines" => Ok(BuildKind::Redlines),
            "bluelines" => Ok(BuildKind::Bluelines),
            other => Err(NexaError::Validation(format!("unknown build kind: {other}"))),
        }
    }
}
