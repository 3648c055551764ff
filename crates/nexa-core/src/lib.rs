//! nexa-core
//!
//! Core building blocks for the NEXA field-service backend.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, todo, job, checklist, state, workflow, analysis, events, errors）
//! - **ports**: 抽象化レイヤー（TodoStore, DesignGenerator, EventSink, Clock, IdGenerator）
//! - **app**: アプリケーションロジック（builder, todos, workflow, status）
//! - **impls**: ports の実装（InMemoryTodoStore, SqliteTodoStore, KeywordDesignGenerator など）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
