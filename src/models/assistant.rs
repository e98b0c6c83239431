//! Assistant record model and the request bodies that mutate it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted assistant record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assistant {
    pub id: String,
    pub name: String,
    pub picture: String,
    pub creation_date: DateTime<Utc>,
}

impl Assistant {
    /// Overlay the supplied fields onto this record.
    pub fn apply(&mut self, changes: &AssistantChanges) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(picture) = &changes.picture {
            self.picture = picture.clone();
        }
    }

    /// Creation date formatted as a calendar date for display.
    pub fn creation_day(&self) -> String {
        self.creation_date.format("%Y-%m-%d").to_string()
    }
}

/// Document body as held by the store; the id lives outside the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: String,
    pub creation_date: DateTime<Utc>,
}

impl AssistantDocument {
    pub fn into_assistant(self, id: String) -> Assistant {
        Assistant {
            id,
            name: self.name,
            picture: self.picture,
            creation_date: self.creation_date,
        }
    }
}

/// Partial field set for an update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

impl AssistantChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.picture.is_none()
    }

    /// Whether any supplied field would clear a required value.
    pub fn clears_required_field(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().is_some_and(|s| s.trim().is_empty());
        blank(&self.name) || blank(&self.picture)
    }
}

/// Two-field buffer backing the create form and the edit panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: String,
}

impl AssistantForm {
    pub fn new(name: impl Into<String>, picture: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            picture: picture.into(),
        }
    }

    /// Both fields carry a non-blank value.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.picture.trim().is_empty()
    }

    pub fn from_assistant(assistant: &Assistant) -> Self {
        Self::new(assistant.name.clone(), assistant.picture.clone())
    }

    /// Every field of the form as an update.
    pub fn to_changes(&self) -> AssistantChanges {
        AssistantChanges {
            name: Some(self.name.clone()),
            picture: Some(self.picture.clone()),
        }
    }
}
