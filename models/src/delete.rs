//! Per-identifier outcomes of a bulk delete.
//!
//! The backend may delete some identifiers of a batch and refuse others. The
//! outcome of every identifier is kept; nothing collapses to a single bool.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteOutcome<Id> {
    pub id: Id,
    /// Backend message for this identifier. `None` means it was deleted.
    #[serde(default)]
    pub error: Option<String>,
}

impl<Id> DeleteOutcome<Id> {
    pub fn succeeded(id: Id) -> Self {
        Self { id, error: None }
    }

    pub fn failed(id: Id, error: impl Into<String>) -> Self {
        Self {
            id,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchDeleteResult<Id> {
    pub data: Vec<DeleteOutcome<Id>>,
}

impl<Id: PartialEq + Copy> BatchDeleteResult<Id> {
    pub fn new(data: Vec<DeleteOutcome<Id>>) -> Self {
        Self { data }
    }

    pub fn succeeded(&self) -> Vec<Id> {
        self.data
            .iter()
            .filter(|outcome| outcome.is_success())
            .map(|outcome| outcome.id)
            .collect()
    }

    pub fn failed(&self) -> Vec<&DeleteOutcome<Id>> {
        self.data.iter().filter(|outcome| !outcome.is_success()).collect()
    }

    pub fn is_complete_success(&self) -> bool {
        self.data.iter().all(DeleteOutcome::is_success)
    }

    pub fn outcome_for(&self, id: Id) -> Option<&DeleteOutcome<Id>> {
        self.data.iter().find(|outcome| outcome.id == id)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
