//! Domain identifiers (strongly-typed IDs).
//!
//! 2 種類の ID があります。
//!
//! - **数値 ID**: `TodoId`, `JobId`。ストア/固定データが採番するので、
//!   HTTP の path から来る文字列をここでパースする。
//! - **ULID ID**: `RequestId`, `AnalysisRunId`。プロセス内で生成するだけの ID。
//!   Phantom type パターンで `Id<T>` を共有し、型で混同を防ぐ。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

use super::errors::NexaError;

/// IdMarker は各 ULID ID 型のマーカー trait
///
/// Display で使うプレフィックス（"req-", "run-"）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ULID ID 型
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// HTTP リクエストのマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Request {}

impl IdMarker for Request {
    fn prefix() -> &'static str {
        "req-"
    }
}

/// Analyze 1 回分のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnalysisRun {}

impl IdMarker for AnalysisRun {
    fn prefix() -> &'static str {
        "run-"
    }
}

/// Identifier of one HTTP request (log correlation).
pub type RequestId = Id<Request>;

/// Identifier of one Analyze invocation. Only the latest run for a job may
/// write a verdict.
pub type AnalysisRunId = Id<AnalysisRun>;

// ========================================
// 数値 ID
// ========================================

/// Todo の ID（ストアが採番）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i64);

impl TodoId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }

    /// path segment をパースする。数値でなければ Validation。
    pub fn parse(raw: &str) -> Result<Self, NexaError> {
        raw.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| NexaError::Validation("invalid id".to_string()))
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 固定の作業予定（Job）の ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(u32);

impl JobId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn parse(raw: &str) -> Result<Self, NexaError> {
        raw.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| NexaError::Validation("invalid job id".to_string()))
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
