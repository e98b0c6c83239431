//! Server-rendered HTML console.
//!
//! Forms post to `/console/*` and every post redirects back to `/`, so a
//! reload never resubmits.

use std::fmt::Write as _;

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};

use crate::errors::AppError;
use crate::models::{AssistantForm, ConsoleView};
use crate::AppState;

/// GET / - Render the console page.
pub async fn console_page(State(state): State<AppState>) -> Html<String> {
    Html(render_console(&state.console.view().await))
}

/// POST /console/create - Submit the create form.
pub async fn create_form_post(
    State(state): State<AppState>,
    Form(form): Form<AssistantForm>,
) -> Redirect {
    back(state.console.create(form.name, form.picture).await.map(|_| ()))
}

/// POST /console/select/:id - Open the edit panel for a row.
pub async fn select_post(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    back(state.console.select(&id).await)
}

/// POST /console/save - Save the edit panel.
pub async fn save_post(
    State(state): State<AppState>,
    Form(form): Form<AssistantForm>,
) -> Redirect {
    let result = match state.console.edit_selected(form).await {
        Ok(()) => state.console.submit_update().await,
        Err(e) => Err(e),
    };
    back(result)
}

/// POST /console/cancel - Close the edit panel.
pub async fn cancel_post(State(state): State<AppState>) -> Redirect {
    back(state.console.cancel().await)
}

/// POST /console/delete/:id - Delete a row.
pub async fn delete_post(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    back(state.console.delete(&id).await)
}

// Store failures and prompts already live in the console state and show up
// on the next render; the rest is only logged.
fn back(result: Result<(), AppError>) -> Redirect {
    if let Err(e) = result {
        tracing::debug!("Console action rejected: {}", e);
    }
    Redirect::to("/")
}

/// Render the console page.
pub fn render_console(view: &ConsoleView) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Assistants</title></head>\n<body>\n<h1>Assistants</h1>\n",
    );

    if let Some(error) = &view.error {
        out.push_str("<div class=\"error-message\">");
        escape_into(&mut out, error);
        out.push_str("</div>\n");
    }
    if let Some(prompt) = &view.prompt {
        out.push_str("<div class=\"prompt\">");
        escape_into(&mut out, prompt);
        out.push_str("</div>\n");
    }
    if view.busy {
        out.push_str("<div class=\"loading-indicator\">Loading...</div>\n");
    }
    let disabled = if view.busy { " disabled" } else { "" };

    out.push_str(
        "<table border=\"1\">\n<thead><tr><th>Name</th><th>Picture</th><th>Creation Date</th><th>Actions</th></tr></thead>\n<tbody>\n",
    );
    for assistant in &view.assistants {
        let class = if view.is_selected(&assistant.id) {
            " class=\"selected\""
        } else {
            ""
        };
        let _ = write!(out, "<tr{}><td>", class);
        escape_into(&mut out, &assistant.name);
        out.push_str("</td><td><img src=\"");
        escape_into(&mut out, &assistant.picture);
        out.push_str("\" alt=\"");
        escape_into(&mut out, &assistant.name);
        let _ = write!(
            out,
            "\" width=\"50\"></td><td>{}</td><td>",
            assistant.creation_day()
        );
        out.push_str("<form method=\"post\" action=\"/console/select/");
        escape_into(&mut out, &assistant.id);
        let _ = write!(out, "\"><button{}>Edit</button></form>", disabled);
        out.push_str("<form method=\"post\" action=\"/console/delete/");
        escape_into(&mut out, &assistant.id);
        let _ = write!(out, "\"><button{}>Delete</button></form>", disabled);
        out.push_str("</td></tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");

    if let Some(edit) = &view.edit_form {
        out.push_str("<div class=\"edit-panel\">\n<h2>Edit Assistant</h2>\n");
        out.push_str("<form method=\"post\" action=\"/console/save\">\n");
        text_input(&mut out, "Name", "name", &edit.name, disabled);
        text_input(&mut out, "Picture URL", "picture", &edit.picture, disabled);
        if !edit.picture.is_empty() {
            out.push_str("<label>Preview:</label><img src=\"");
            escape_into(&mut out, &edit.picture);
            out.push_str("\" alt=\"Preview\" width=\"100\">\n");
        }
        let _ = writeln!(out, "<button{}>Save Changes</button>\n</form>", disabled);
        let _ = writeln!(
            out,
            "<form method=\"post\" action=\"/console/cancel\"><button{}>Cancel</button></form>\n</div>",
            disabled
        );
    }

    out.push_str("<h2>Add New Assistant</h2>\n<form method=\"post\" action=\"/console/create\">\n");
    text_input(&mut out, "Name", "name", &view.create_form.name, disabled);
    text_input(
        &mut out,
        "Picture URL",
        "picture",
        &view.create_form.picture,
        disabled,
    );
    let _ = writeln!(out, "<button{}>Add Assistant</button>\n</form>", disabled);

    out.push_str("</body>\n</html>\n");
    out
}

fn text_input(out: &mut String, label: &str, name: &str, value: &str, disabled: &str) {
    let _ = write!(
        out,
        "<label>{}:</label><input type=\"text\" name=\"{}\" placeholder=\"{}\" value=\"",
        label, name, label
    );
    escape_into(out, value);
    let _ = writeln!(out, "\"{}>", disabled);
}

/// HTML-escape a string into the output buffer.
fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
