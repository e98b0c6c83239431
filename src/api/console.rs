//! Console JSON endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::models::{Assistant, AssistantChanges, AssistantForm, ConsoleView};
use crate::AppState;

/// GET /api/console - Current console snapshot.
pub async fn get_console(State(state): State<AppState>) -> ApiResult<ConsoleView> {
    success(state.console.view().await)
}

/// POST /api/console/refresh - Reload the list from the store.
pub async fn refresh_console(State(state): State<AppState>) -> ApiResult<ConsoleView> {
    state.console.refresh().await?;
    success(state.console.view().await)
}

/// PUT /api/console/create-form - Replace the create-form buffer.
pub async fn put_create_form(
    State(state): State<AppState>,
    Json(form): Json<AssistantForm>,
) -> ApiResult<ConsoleView> {
    state.console.edit_create_form(form).await?;
    success(state.console.view().await)
}

/// POST /api/console/create - Fill the create form and submit it.
pub async fn create_assistant(
    State(state): State<AppState>,
    Json(form): Json<AssistantForm>,
) -> ApiResult<Assistant> {
    success(state.console.create(form.name, form.picture).await?)
}

/// POST /api/console/submit-create - Submit the current create-form buffer.
pub async fn submit_create(State(state): State<AppState>) -> ApiResult<Assistant> {
    success(state.console.submit_create().await?)
}

/// POST /api/console/select/:id - Select a record for editing.
pub async fn select_assistant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ConsoleView> {
    state.console.select(&id).await?;
    success(state.console.view().await)
}

/// PUT /api/console/edit-form - Replace the edit buffer of the selection.
pub async fn put_edit_form(
    State(state): State<AppState>,
    Json(form): Json<AssistantForm>,
) -> ApiResult<ConsoleView> {
    state.console.edit_selected(form).await?;
    success(state.console.view().await)
}

/// POST /api/console/save - Save the edit buffer onto the selection.
pub async fn save_selected(State(state): State<AppState>) -> ApiResult<ConsoleView> {
    state.console.submit_update().await?;
    success(state.console.view().await)
}

/// POST /api/console/cancel - Drop the selection.
pub async fn cancel_edit(State(state): State<AppState>) -> ApiResult<ConsoleView> {
    state.console.cancel().await?;
    success(state.console.view().await)
}

/// PATCH /api/assistants/:id - Partially update a record.
pub async fn patch_assistant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(changes): Json<AssistantChanges>,
) -> ApiResult<ConsoleView> {
    state.console.update(&id, changes).await?;
    success(state.console.view().await)
}

/// DELETE /api/assistants/:id - Delete a record.
pub async fn delete_assistant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ConsoleView> {
    state.console.delete(&id).await?;
    success(state.console.view().await)
}
