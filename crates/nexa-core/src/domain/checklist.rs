//! Completion checklist (four independent booleans per job).

use serde::{Deserialize, Serialize};

/// Checklist for one job. A missing entry is the same as `default()` (all false).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionChecklist {
    pub as_built: bool,
    pub photos: bool,
    pub site_clean: bool,
    pub materials_reconciled: bool,
}

impl CompletionChecklist {
    pub fn all_checked() -> Self {
        Self {
            as_built: true,
            photos: true,
            site_clean: true,
            materials_reconciled: true,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.as_built && self.photos && self.site_clean && self.materials_reconciled
    }

    pub fn apply(&mut self, update: &ChecklistUpdate) {
        if let Some(v) = update.as_built {
            self.as_built = v;
        }
        if let Some(v) = update.photos {
            self.photos = v;
        }
        if let Some(v) = update.site_clean {
            self.site_clean = v;
        }
        if let Some(v) = update.materials_reconciled {
            self.materials_reconciled = v;
        }
    }
}

/// Toggle request. Only the present items change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistUpdate {
    #[serde(default)]
    pub as_built: Option<bool>,
    #[serde(default)]
    pub photos: Option<bool>,
    #[serde(default)]
    pub site_clean: Option<bool>,
    #[serde(default)]
    pub materials_reconciled: Option<bool>,
}

impl ChecklistUpdate {
    pub fn all(value: bool) -> Self {
        Self {
            as_built: Some(value),
            photos: Some(value),
            site_clean: Some(value),
            materials_reconciled: Some(value),
        }
    }
}
