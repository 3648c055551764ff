//! Design request/response shapes for the design generator.

use serde::{Deserialize, Serialize};

/// `POST /api/design` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignRequest {
    #[serde(default)]
    pub description: Option<String>,
}

/// An engineered design proposal (materials list + notes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Design {
    pub title: String,
    pub description: String,
    pub materials: Vec<String>,
    pub notes: String,
}
