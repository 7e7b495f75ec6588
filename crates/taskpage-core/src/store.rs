use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::task::{Status, Task};

/// The authoritative task collection for one session.
///
/// Insertion order is preserved; display order is derived elsewhere and
/// never stored. Ids come from a counter that only moves forward, so an
/// id freed by `remove` is never handed out again within the session.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    #[tracing::instrument(skip(self, description, now))]
    pub fn create(&mut self, description: String, now: DateTime<Utc>) -> Task {
        let id = self.next_id;
        self.next_id += 1;

        let task = Task::new(id, description, now);
        self.tasks.push(task.clone());

        info!(id, count = self.tasks.len(), "task created");
        task
    }

    #[tracing::instrument(skip(self, description, now))]
    pub fn update(
        &mut self,
        id: u64,
        description: String,
        status: Status,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(StoreError::NotFound(id))?;

        task.description = description;
        task.status = status;
        task.modified = now;

        debug!(id, status = %task.status, "task updated");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub fn remove(&mut self, id: u64) -> Result<Task, StoreError> {
        let idx = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let task = self.tasks.remove(idx);
        info!(id, remaining = self.tasks.len(), "task removed");
        Ok(task)
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Snapshot in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
