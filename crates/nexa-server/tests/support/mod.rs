#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nexa_core::app::{App, AppBuilder};
use nexa_core::domain::{NewTodo, NexaError, NexaResult, Todo, TodoId, TodoPatch};
use nexa_core::impls::{InMemoryTodoStore, SqliteTodoStore};
use nexa_core::ports::{StoreKind, SystemClock, TodoStore};
use nexa_server::build_router;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const TEST_ANALYSIS_DELAY: Duration = Duration::from_millis(30);

/// App with an empty SQLite store in memory.
pub fn sqlite_app() -> App {
    let store = SqliteTodoStore::in_memory(Arc::new(SystemClock)).expect("sqlite store");
    AppBuilder::new()
        .todo_store(Arc::new(store))
        .analysis_delay(TEST_ANALYSIS_DELAY)
        .build()
        .expect("build app")
}

/// App running the seeded in-memory fallback.
pub fn memory_app() -> App {
    AppBuilder::new()
        .todo_store(Arc::new(InMemoryTodoStore::seeded(Arc::new(SystemClock))))
        .analysis_delay(TEST_ANALYSIS_DELAY)
        .build()
        .expect("build app")
}

/// App without any todo store (DATABASE_URL unset, no fallback).
pub fn unconfigured_app() -> App {
    AppBuilder::new()
        .analysis_delay(TEST_ANALYSIS_DELAY)
        .build()
        .expect("build app")
}

/// SQLite-kind store whose every call fails, as if the database file vanished.
struct UnreachableDb;

fn gone<T>() -> NexaResult<T> {
    Err(NexaError::Storage("disk gone".to_string()))
}

#[async_trait]
impl TodoStore for UnreachableDb {
    fn kind(&self) -> StoreKind {
        StoreKind::Sqlite
    }
    async fn list(&self) -> NexaResult<Vec<Todo>> {
        gone()
    }
    async fn get(&self, _id: TodoId) -> NexaResult<Todo> {
        gone()
    }
    async fn create(&self, _input: NewTodo) -> NexaResult<Todo> {
        gone()
    }
    async fn patch(&self, _id: TodoId, _patch: TodoPatch) -> NexaResult<Todo> {
        gone()
    }
    async fn delete(&self, _id: TodoId) -> NexaResult<()> {
        gone()
    }
    async fn ping(&self) -> NexaResult<()> {
        gone()
    }
}

/// App whose database is configured but unreachable.
pub fn unreachable_db_app() -> App {
    AppBuilder::new()
        .todo_store(Arc::new(UnreachableDb))
        .analysis_delay(TEST_ANALYSIS_DELAY)
        .build()
        .expect("build app")
}

pub async fn spawn_app(app: App) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let router = build_router(app);
    tokio::spawn(async move { axum::serve(listener, router).await.expect("serve app") });
    addr
}

pub async fn send_raw(
    addr: SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<&str>,
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    match body {
        Some(payload) => {
            req.push_str("Content-Type: application/json\r\n");
            req.push_str(&format!("Content-Length: {}\r\n", payload.len()));
        }
        None => req.push_str("Content-Length: 0\r\n"),
    }
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    req.push_str("\r\n");
    if let Some(payload) = body {
        req.push_str(payload);
    }
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, head.to_string(), body.to_string())
}

pub async fn get(addr: SocketAddr, path: &str) -> (u16, Value) {
    let (status, _, body) = send_raw(addr, "GET", path, &[], None).await;
    (status, parse(&body))
}

pub async fn send_json(addr: SocketAddr, method: &str, path: &str, body: &str) -> (u16, Value) {
    let (status, _, body) = send_raw(addr, method, path, &[], Some(body)).await;
    (status, parse(&body))
}

pub async fn send_empty(addr: SocketAddr, method: &str, path: &str) -> (u16, Value) {
    let (status, _, body) = send_raw(addr, method, path, &[], None).await;
    (status, parse(&body))
}

fn parse(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|e| panic!("json body ({e}): {body}"))
}

/// Header lookup on a raw response head (case-insensitive name).
pub fn header<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines().find_map(|line| {
        let (k, v) = line.split_once(':')?;
        k.trim().eq_ignore_ascii_case(name).then(|| v.trim())
    })
}
