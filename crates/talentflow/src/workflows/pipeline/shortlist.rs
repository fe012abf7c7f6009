use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::board::ColumnMap;
use super::domain::{ApplicationId, JobId, ShortlistId};

/// Curated subset of applications shared with a client for review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortlistRecord {
    pub id: ShortlistId,
    pub job_id: JobId,
    pub application_ids: Vec<ApplicationId>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Multi-select layer over the board. Selection is independent of status and
/// never mutates it; its only consumer is shortlist creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: BTreeSet<ApplicationId>,
}

impl SelectionState {
    /// Toggle a card in or out of the selection. Returns whether the card is
    /// selected afterwards.
    pub fn toggle(
        &mut self,
        columns: &ColumnMap,
        id: &ApplicationId,
    ) -> Result<bool, SelectionError> {
        if columns.position(id).is_none() {
            return Err(SelectionError::UnknownCard(id.0.clone()));
        }
        if self.selected.remove(id) {
            Ok(false)
        } else {
            self.selected.insert(id.clone());
            Ok(true)
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: &ApplicationId) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Identifiers to hand to shortlist creation.
    pub fn selected_ids(&self) -> Vec<ApplicationId> {
        self.selected.iter().cloned().collect()
    }
}

/// Raised when a selection gesture targets a card not on the board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("application '{0}' is not on the board")]
    UnknownCard(String),
}
