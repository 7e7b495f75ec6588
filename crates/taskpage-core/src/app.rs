use chrono::Utc;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::StoreError;
use crate::session::{Draft, EditSession};
use crate::store::TaskStore;
use crate::task::{Status, Task};
use crate::view::{self, Page, SortField, StatusFilter, ViewControls};

/// A discrete user action reported by the shell. Every mutation of the
/// application state funnels through `App::apply`.
#[derive(Debug, Clone)]
pub enum Intent {
    Create(String),
    OpenEdit(u64),
    EditDescription(String),
    EditStatus(Status),
    SaveEdit,
    CancelEdit,
    Delete(u64),
    SetSort(SortField),
    SetFilter(StatusFilter),
    SetPage(usize),
}

/// Read-only projection the shell renders after each intent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub visible: Page,
    pub edit: Option<Draft>,
}

#[derive(Debug)]
pub struct App {
    store: TaskStore,
    controls: ViewControls,
    session: EditSession,
}

impl App {
    pub fn new(controls: ViewControls) -> Self {
        Self {
            store: TaskStore::new(),
            controls,
            session: EditSession::default(),
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn controls(&self) -> &ViewControls {
        &self.controls
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Applies one intent. Recoverable conditions (`NotFound`, editing
    /// without an open session) come back as errors for the shell to
    /// report; state is left consistent either way.
    #[instrument(skip(self, intent))]
    pub fn apply(&mut self, intent: Intent) -> anyhow::Result<Option<Task>> {
        let now = Utc::now();
        debug!(?intent, "applying intent");

        match intent {
            Intent::Create(description) => {
                let task = self.store.create(description, now);
                return Ok(Some(task));
            }
            Intent::OpenEdit(id) => {
                let task = self.store.get(id).ok_or(StoreError::NotFound(id))?;
                self.session.open(task);
            }
            Intent::EditDescription(description) => {
                self.session.set_description(description)?;
            }
            Intent::EditStatus(status) => {
                self.session.set_status(status)?;
            }
            Intent::SaveEdit => {
                let draft = self.session.commit()?;
                self.store
                    .update(draft.target_id, draft.description, draft.status, now)?;
                return Ok(self.store.get(draft.target_id).cloned());
            }
            Intent::CancelEdit => {
                self.session.cancel();
            }
            Intent::Delete(id) => {
                let task = self.store.remove(id)?;
                // A session targeting the removed task must not be able
                // to resurrect it on save.
                if self.session.draft().is_some_and(|d| d.target_id == id) {
                    self.session.cancel();
                }
                return Ok(Some(task));
            }
            Intent::SetSort(field) => {
                self.controls.sort_field = field;
            }
            Intent::SetFilter(filter) => {
                self.controls.filter = filter;
            }
            Intent::SetPage(page) => {
                // The requested page is kept verbatim; `derive` clamps.
                self.controls.page = page.max(1);
            }
        }

        Ok(None)
    }

    /// Pure projection: filter, sort, paginate, plus the open session
    /// snapshot if any.
    pub fn view_model(&self) -> ViewModel {
        ViewModel {
            visible: view::derive(self.store.tasks(), &self.controls),
            edit: self.session.draft().cloned(),
        }
    }
}
