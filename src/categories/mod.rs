//! Local category list kept in step with the remote collection.
//!
//! The list only ever changes after the server confirms an operation: loads
//! replace it wholesale, creates append the server's record, updates splice the
//! submitted draft into the matching record and deletes remove by id. Failures
//! leave the list untouched and record a diagnostic.
//!
//! State sits behind a mutex that is held only while applying a result, never
//! across a request, so several requests may be outstanding at once and their
//! results land in completion order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::CategoryApi;
use crate::error::{ClientError, ClientResult};
use crate::model::{Category, CategoryDraft};

/// The record currently being edited.
///
/// `position` is where the record sat when the edit began. Other operations may
/// shift the list afterwards, so the record is always located by `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditCursor {
    pub position: usize,
    pub id: i64,
}

#[derive(Debug, Default)]
struct ListState {
    records: Vec<Category>,
    cursor: Option<EditCursor>,
    draft: CategoryDraft,
    diagnostic: Option<String>,
}

impl ListState {
    fn locate(&self, cursor: EditCursor) -> Option<usize> {
        match self.records.get(cursor.position) {
            Some(record) if record.id == cursor.id => Some(cursor.position),
            _ => self.records.iter().position(|r| r.id == cursor.id),
        }
    }
}

pub struct CategoryList {
    api: Arc<dyn CategoryApi>,
    state: Mutex<ListState>,
}

impl CategoryList {
    pub fn new(api: Arc<dyn CategoryApi>) -> Self {
        Self {
            api,
            state: Mutex::new(ListState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fail(&self, context: &str, err: &ClientError) {
        tracing::error!("{}: {}", context, err);
        self.lock().diagnostic = Some(format!("{}: {}", context, err));
    }

    /// Replace the local list with the server's. Drops any edit in progress.
    pub async fn load(&self) -> ClientResult<usize> {
        match self.api.list().await {
            Ok(records) => {
                let mut state = self.lock();
                state.records = records;
                state.cursor = None;
                state.diagnostic = None;
                tracing::debug!("loaded {} categories", state.records.len());
                Ok(state.records.len())
            }
            Err(e) => {
                self.fail("Failed to fetch categories", &e);
                Err(e)
            }
        }
    }

    /// Create a category and append the server's copy
    pub async fn create(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> ClientResult<Category> {
        let draft = CategoryDraft::new(name, description);
        match self.api.create(&draft).await {
            Ok(saved) => {
                let mut state = self.lock();
                state.records.push(saved.clone());
                // An edit started while this was in flight keeps its draft
                if state.cursor.is_none() {
                    state.draft = CategoryDraft::default();
                }
                state.diagnostic = None;
                tracing::info!("created category {} ({})", saved.id, saved.name);
                Ok(saved)
            }
            Err(e) => {
                self.fail("Failed to save category", &e);
                Err(e)
            }
        }
    }

    /// Start editing the record at `position`, copying it into the draft.
    /// Returns false (and changes nothing) when out of range.
    pub fn begin_edit(&self, position: usize) -> bool {
        let mut state = self.lock();
        let Some(record) = state.records.get(position) else {
            return false;
        };
        let cursor = EditCursor {
            position,
            id: record.id,
        };
        let draft = CategoryDraft::from_category(record);
        state.draft = draft;
        state.cursor = Some(cursor);
        true
    }

    /// Abandon the current edit and its draft
    pub fn cancel_edit(&self) {
        let mut state = self.lock();
        state.cursor = None;
        state.draft = CategoryDraft::default();
    }

    /// Send the draft as an update of the record under the edit cursor.
    ///
    /// `Ok(None)` when there is no edit in progress (nothing is sent) or when
    /// the record disappeared locally while the request was in flight.
    pub async fn commit_edit(&self) -> ClientResult<Option<Category>> {
        let (cursor, draft) = {
            let state = self.lock();
            match state.cursor {
                Some(cursor) => (cursor, state.draft.clone()),
                None => return Ok(None),
            }
        };

        match self.api.update(cursor.id, &draft).await {
            Ok(()) => {
                let mut state = self.lock();
                // The submitted draft is authoritative; the response body is not read
                let updated = match state.locate(cursor) {
                    Some(index) => {
                        let record = &mut state.records[index];
                        record.name = draft.name;
                        record.description = draft.description;
                        Some(record.clone())
                    }
                    None => None,
                };
                if state.cursor == Some(cursor) {
                    state.cursor = None;
                    state.draft = CategoryDraft::default();
                }
                state.diagnostic = None;
                tracing::info!("updated category {}", cursor.id);
                Ok(updated)
            }
            Err(e) => {
                self.fail("Failed to update category", &e);
                Err(e)
            }
        }
    }

    /// Delete by id. `Ok(true)` when a local record was removed; an id that is
    /// not held locally is still sent to the server.
    pub async fn delete(&self, id: i64) -> ClientResult<bool> {
        match self.api.delete(id).await {
            Ok(()) => {
                let mut state = self.lock();
                let index = state.records.iter().position(|r| r.id == id);
                let removed = match index {
                    Some(index) => {
                        state.records.remove(index);
                        true
                    }
                    None => false,
                };
                if state.cursor.is_some_and(|c| c.id == id) {
                    state.cursor = None;
                    state.draft = CategoryDraft::default();
                }
                state.diagnostic = None;
                tracing::info!("deleted category {}", id);
                Ok(removed)
            }
            Err(e) => {
                self.fail("Failed to delete category", &e);
                Err(e)
            }
        }
    }

    /// Submit the form: update when editing, create otherwise
    pub async fn submit_draft(&self) -> ClientResult<Option<Category>> {
        let (editing, draft) = {
            let state = self.lock();
            (state.cursor.is_some(), state.draft.clone())
        };

        if editing {
            self.commit_edit().await
        } else {
            self.create(draft.name, draft.description).await.map(Some)
        }
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.lock().draft.name = name.into();
    }

    pub fn set_description(&self, description: impl Into<String>) {
        self.lock().draft.description = description.into();
    }

    pub fn draft(&self) -> CategoryDraft {
        self.lock().draft.clone()
    }

    pub fn records(&self) -> Vec<Category> {
        self.lock().records.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    pub fn edit_cursor(&self) -> Option<EditCursor> {
        self.lock().cursor
    }

    pub fn is_editing(&self) -> bool {
        self.lock().cursor.is_some()
    }

    /// Message from the most recent failed operation, cleared by the next success
    pub fn diagnostic(&self) -> Option<String> {
        self.lock().diagnostic.clone()
    }
}
