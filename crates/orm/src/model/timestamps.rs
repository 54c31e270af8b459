use serde::{Deserialize, Serialize};

/// Creation and update timestamp columns of a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    pub created_at: String,
    pub updated_at: String,
}

impl Timestamps {
    pub fn new(created_at: impl Into<String>, updated_at: impl Into<String>) -> Self {
        Self {
            created_at: created_at.into(),
            updated_at: updated_at.into(),
        }
    }

    /// Whether the model must override `CREATED_AT`/`UPDATED_AT`
    pub fn is_custom(&self) -> bool {
        self.created_at != "created_at" || self.updated_at != "updated_at"
    }
}

impl Default for Timestamps {
    fn default() -> Self {
        Self::new("created_at", "updated_at")
    }
}

/// Soft delete column of a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftDelete {
    pub column: String,
}

impl SoftDelete {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }

    pub fn is_custom(&self) -> bool {
        self.column != "deleted_at"
    }
}
