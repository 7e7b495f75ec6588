use serde::Serialize;
use tracing::debug;

use crate::error::SessionError;
use crate::task::{Status, Task};

/// Staged fields for the task under edit. Also serves as the read-only
/// session snapshot in the view model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Draft {
    pub target_id: u64,
    pub description: String,
    pub status: Status,
}

/// At most one task is under edit at a time. Creation never goes through
/// the session; the create path keeps its own buffer, so the two are
/// never aliased.
#[derive(Debug, Default)]
pub enum EditSession {
    #[default]
    Closed,
    Open(Draft),
}

impl EditSession {
    /// Opens (or re-targets) the session, copying the task's fields into
    /// the draft.
    pub fn open(&mut self, task: &Task) {
        debug!(id = task.id, "edit session opened");
        *self = Self::Open(Draft {
            target_id: task.id,
            description: task.description.clone(),
            status: task.status,
        });
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    pub fn draft(&self) -> Option<&Draft> {
        match self {
            Self::Closed => None,
            Self::Open(draft) => Some(draft),
        }
    }

    pub fn set_description(&mut self, description: String) -> Result<(), SessionError> {
        match self {
            Self::Closed => Err(SessionError::NotOpen),
            Self::Open(draft) => {
                draft.description = description;
                Ok(())
            }
        }
    }

    pub fn set_status(&mut self, status: Status) -> Result<(), SessionError> {
        match self {
            Self::Closed => Err(SessionError::NotOpen),
            Self::Open(draft) => {
                draft.status = status;
                Ok(())
            }
        }
    }

    /// Closes the session and hands the staged fields to the caller,
    /// which is responsible for writing them back to the store.
    pub fn commit(&mut self) -> Result<Draft, SessionError> {
        match std::mem::take(self) {
            Self::Closed => Err(SessionError::NotOpen),
            Self::Open(draft) => {
                debug!(id = draft.target_id, "edit session committed");
                Ok(draft)
            }
        }
    }

    /// Discards the draft without touching the store. Harmless when
    /// already closed.
    pub fn cancel(&mut self) {
        if self.is_open() {
            debug!("edit session cancelled");
        }
        *self = Self::Closed;
    }
}
