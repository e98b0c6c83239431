//! Console state controller.
//!
//! Owns the cached assistant list, the selection and both form buffers, and
//! keeps them in step with the record store. One store call runs at a time:
//! entry points claim the busy flag first and fail with [`AppError::Busy`]
//! while another call is outstanding.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::errors::{AppError, StoreError};
use crate::gateway::RecordStore;
use crate::models::{Assistant, AssistantChanges, AssistantForm, ConsoleView};

pub const FILL_ALL_FIELDS: &str = "Please fill in all fields!";
pub const CANNOT_CLEAR_FIELDS: &str = "Name and picture cannot be cleared";
const FETCH_FAILED: &str = "Failed to fetch assistants";
const CREATE_FAILED: &str = "Failed to add assistant";
const UPDATE_FAILED: &str = "Failed to update assistant";
const DELETE_FAILED: &str = "Failed to delete assistant";
const BUSY: &str = "Another operation is in progress";

#[derive(Debug, Default)]
struct ConsoleState {
    assistants: Vec<Assistant>,
    selected_id: Option<String>,
    create_form: AssistantForm,
    edit_form: AssistantForm,
    error: Option<String>,
    prompt: Option<String>,
}

impl ConsoleState {
    fn clear_selection(&mut self) {
        self.selected_id = None;
        self.edit_form = AssistantForm::default();
    }

    /// Prompts last until the next action; errors until the next store call.
    fn reset_banners(&mut self) {
        self.error = None;
        self.prompt = None;
    }

    fn is_selected(&self, id: &str) -> bool {
        self.selected_id.as_deref() == Some(id)
    }
}

/// Releases the busy flag when dropped, including when the owning future is
/// cancelled mid-call.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Application state controller for one console session.
pub struct Console {
    store: Arc<dyn RecordStore>,
    state: Mutex<ConsoleState>,
    busy: AtomicBool,
}

impl Console {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            state: Mutex::new(ConsoleState::default()),
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<BusyGuard<'_>, AppError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| BusyGuard(&self.busy))
            .map_err(|_| AppError::Busy(BUSY.to_string()))
    }

    fn ensure_idle(&self) -> Result<(), AppError> {
        if self.is_busy() {
            return Err(AppError::Busy(BUSY.to_string()));
        }
        Ok(())
    }

    /// Record a failed store call as the single user-visible error.
    async fn fail(&self, message: &str, err: StoreError) -> AppError {
        tracing::error!("{}: {}", message, err);
        self.state.lock().await.error = Some(message.to_string());
        AppError::from(err)
    }

    /// Snapshot for rendering.
    pub async fn view(&self) -> ConsoleView {
        let state = self.state.lock().await;
        ConsoleView {
            assistants: state.assistants.clone(),
            selected_id: state.selected_id.clone(),
            create_form: state.create_form.clone(),
            edit_form: state
                .selected_id
                .as_ref()
                .map(|_| state.edit_form.clone()),
            busy: self.is_busy(),
            error: state.error.clone(),
            prompt: state.prompt.clone(),
        }
    }

    /// Replace the cached list with the store's current contents.
    pub async fn refresh(&self) -> Result<(), AppError> {
        let _busy = self.begin()?;
        self.state.lock().await.reset_banners();

        match self.store.list().await {
            Ok(assistants) => {
                let mut state = self.state.lock().await;
                let still_present = state
                    .selected_id
                    .as_deref()
                    .is_some_and(|id| assistants.iter().any(|a| a.id == id));
                if !still_present {
                    state.clear_selection();
                }
                tracing::debug!("Loaded {} assistants", assistants.len());
                state.assistants = assistants;
                Ok(())
            }
            Err(e) => Err(self.fail(FETCH_FAILED, e).await),
        }
    }

    pub async fn edit_create_form(&self, form: AssistantForm) -> Result<(), AppError> {
        self.ensure_idle()?;
        self.state.lock().await.create_form = form;
        Ok(())
    }

    /// Create an assistant from the create-form buffer.
    ///
    /// An incomplete buffer never reaches the store: the prompt is set and a
    /// validation error returned with the list untouched.
    pub async fn submit_create(&self) -> Result<Assistant, AppError> {
        let _busy = self.begin()?;
        let form = {
            let mut state = self.state.lock().await;
            if !state.create_form.is_complete() {
                state.prompt = Some(FILL_ALL_FIELDS.to_string());
                return Err(AppError::Validation(FILL_ALL_FIELDS.to_string()));
            }
            state.reset_banners();
            state.create_form.clone()
        };

        match self.store.create(&form.name, &form.picture).await {
            Ok(created) => {
                tracing::info!("Created assistant {}", created.id);
                let mut state = self.state.lock().await;
                state.assistants.push(created.clone());
                state.create_form = AssistantForm::default();
                Ok(created)
            }
            Err(e) => Err(self.fail(CREATE_FAILED, e).await),
        }
    }

    /// Fill the create-form buffer and submit it.
    pub async fn create(
        &self,
        name: impl Into<String>,
        picture: impl Into<String>,
    ) -> Result<Assistant, AppError> {
        self.edit_create_form(AssistantForm::new(name, picture)).await?;
        self.submit_create().await
    }

    /// Select a cached record for editing, replacing any previous edit buffer.
    pub async fn select(&self, id: &str) -> Result<(), AppError> {
        self.ensure_idle()?;
        let mut state = self.state.lock().await;
        let form = state
            .assistants
            .iter()
            .find(|a| a.id == id)
            .map(AssistantForm::from_assistant)
            .ok_or_else(|| AppError::NotFound(format!("Assistant {} not found", id)))?;
        state.selected_id = Some(id.to_string());
        state.edit_form = form;
        state.prompt = None;
        Ok(())
    }

    pub async fn edit_selected(&self, form: AssistantForm) -> Result<(), AppError> {
        self.ensure_idle()?;
        let mut state = self.state.lock().await;
        if state.selected_id.is_none() {
            return Err(AppError::BadRequest("No assistant selected".to_string()));
        }
        state.edit_form = form;
        Ok(())
    }

    /// Save the edit buffer onto the selected record. No-op without a selection.
    pub async fn submit_update(&self) -> Result<(), AppError> {
        let busy = self.begin()?;
        let (id, changes) = {
            let state = self.state.lock().await;
            let Some(id) = state.selected_id.clone() else {
                return Ok(());
            };
            (id, state.edit_form.to_changes())
        };
        self.apply_update(busy, &id, changes).await
    }

    /// Partially update any record. Clears the selection only if it pointed
    /// at `id`.
    pub async fn update(&self, id: &str, changes: AssistantChanges) -> Result<(), AppError> {
        let busy = self.begin()?;
        if changes.is_empty() {
            return Ok(());
        }
        self.apply_update(busy, id, changes).await
    }

    async fn apply_update(
        &self,
        _busy: BusyGuard<'_>,
        id: &str,
        changes: AssistantChanges,
    ) -> Result<(), AppError> {
        {
            let mut state = self.state.lock().await;
            // Create enforces non-empty fields; updates must not undo that.
            if changes.clears_required_field() {
                state.prompt = Some(CANNOT_CLEAR_FIELDS.to_string());
                return Err(AppError::Validation(CANNOT_CLEAR_FIELDS.to_string()));
            }
            state.reset_banners();
        }

        match self.store.update(id, &changes).await {
            Ok(_) => {
                tracing::info!("Updated assistant {}", id);
                // Overlay what was sent; the store does not echo the document.
                let mut state = self.state.lock().await;
                if let Some(assistant) = state.assistants.iter_mut().find(|a| a.id == id) {
                    assistant.apply(&changes);
                }
                if state.is_selected(id) {
                    state.clear_selection();
                }
                Ok(())
            }
            Err(e) => Err(self.fail(UPDATE_FAILED, e).await),
        }
    }

    /// Drop the selection and edit buffer. No-op without a selection.
    pub async fn cancel(&self) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        if state.selected_id.is_none() {
            return Ok(());
        }
        self.ensure_idle()?;
        state.clear_selection();
        state.prompt = None;
        Ok(())
    }

    /// Delete a record and purge it from the cache, clearing the selection
    /// if it pointed at `id`.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let _busy = self.begin()?;
        self.state.lock().await.reset_banners();

        match self.store.delete(id).await {
            Ok(deleted) => {
                tracing::info!("Deleted assistant {}", deleted);
                let mut state = self.state.lock().await;
                state.assistants.retain(|a| a.id != deleted);
                if state.is_selected(&deleted) {
                    state.clear_selection();
                }
                Ok(())
            }
            Err(e) => Err(self.fail(DELETE_FAILED, e).await),
        }
    }
}
