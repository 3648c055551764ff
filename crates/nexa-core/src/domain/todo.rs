//! Todo record and its create/patch inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::errors::NexaError;
use super::ids::TodoId;

/// A task record for the foreman's to-do list.
///
/// `can_ai_handle = false` marks items NEXA cannot take over (the client
/// shows those as "human required").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub due: Option<String>,
    pub can_ai_handle: bool,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Apply a validated patch. Absent fields stay as they are.
    pub fn apply(&mut self, patch: &TodoPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(due) = &patch.due {
            self.due = due.clone();
        }
        if let Some(can_ai_handle) = patch.can_ai_handle {
            self.can_ai_handle = can_ai_handle;
        }
        if let Some(done) = patch.done {
            self.done = done;
        }
    }
}

/// Create request body: `{title, due?, canAiHandle?}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub can_ai_handle: Option<bool>,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            due: None,
            can_ai_handle: None,
        }
    }

    pub fn with_due(mut self, due: impl Into<String>) -> Self {
        self.due = Some(due.into());
        self
    }

    pub fn with_can_ai_handle(mut self, can_ai_handle: bool) -> Self {
        self.can_ai_handle = Some(can_ai_handle);
        self
    }

    /// Trim the title and reject it when nothing is left.
    pub fn validated(self) -> Result<Self, NexaError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(NexaError::Validation("title is required".to_string()));
        }
        Ok(Self { title, ..self })
    }
}

/// Patch request body. Every field is optional.
///
/// `due` distinguishes "absent" (`None`, keep) from `null` (`Some(None)`,
/// clear).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub due: Option<Option<String>>,
    #[serde(default)]
    pub can_ai_handle: Option<bool>,
    #[serde(default)]
    pub done: Option<bool>,
}

impl TodoPatch {
    pub fn done(done: bool) -> Self {
        Self {
            done: Some(done),
            ..Self::default()
        }
    }

    pub fn validated(self) -> Result<Self, NexaError> {
        match self.title {
            Some(title) => {
                let title = title.trim().to_string();
                if title.is_empty() {
                    return Err(NexaError::Validation("title must not be empty".to_string()));
                }
                Ok(Self {
                    title: Some(title),
                    ..self
                })
            }
            None => Ok(self),
        }
    }
}

/// A field that is present (even as `null`) deserializes to `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Demo rows the in-memory store starts with.
pub fn seed_todos() -> Vec<NewTodo> {
    vec![
        NewTodo::new("Approve Crew A timesheets")
            .with_due("Today 5:00 PM")
            .with_can_ai_handle(false),
        NewTodo::new("Confirm weekend outage window with Dispatch")
            .with_due("Tomorrow 9:00 AM")
            .with_can_ai_handle(false),
        NewTodo::new("Email supplier about transformer lead times")
            .with_due("Mon 10:30 AM")
            .with_can_ai_handle(true),
    ]
}
