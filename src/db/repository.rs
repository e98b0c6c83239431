//! SQLite-backed assistant collection.
//!
//! Each row stores one JSON document; the repository normalizes documents
//! into [`Assistant`] records on the way out.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::StoreError;
use crate::gateway::{RecordStore, StoreFuture, COLLECTION_NAME};
use crate::models::{Assistant, AssistantChanges, AssistantDocument};

/// Database repository for the assistant collection.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all assistants in insertion order.
    pub async fn list_assistants(&self) -> Result<Vec<Assistant>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT id, document FROM {} ORDER BY rowid",
            COLLECTION_NAME
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut assistants = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.get("id");
            let document: String = row.get("document");
            match serde_json::from_str::<AssistantDocument>(&document) {
                Ok(doc) => assistants.push(doc.into_assistant(id)),
                Err(e) => tracing::warn!("Skipping malformed assistant document {}: {}", id, e),
            }
        }
        Ok(assistants)
    }

    /// Create a new assistant stamped with the current time.
    pub async fn create_assistant(
        &self,
        name: &str,
        picture: &str,
    ) -> Result<Assistant, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let document = AssistantDocument {
            name: name.to_string(),
            picture: picture.to_string(),
            creation_date: Utc::now(),
        };

        sqlx::query(&format!(
            "INSERT INTO {} (id, document) VALUES (?, ?)",
            COLLECTION_NAME
        ))
        .bind(&id)
        .bind(serde_json::to_string(&document)?)
        .execute(&self.pool)
        .await?;

        Ok(document.into_assistant(id))
    }

    /// Overlay the supplied fields onto a stored document.
    pub async fn update_assistant(
        &self,
        id: &str,
        changes: &AssistantChanges,
    ) -> Result<AssistantChanges, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            "SELECT document FROM {} WHERE id = ?",
            COLLECTION_NAME
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let stored: String = row.get("document");
        let mut document: AssistantDocument = serde_json::from_str(&stored)?;
        if let Some(name) = &changes.name {
            document.name = name.clone();
        }
        if let Some(picture) = &changes.picture {
            document.picture = picture.clone();
        }

        sqlx::query(&format!(
            "UPDATE {} SET document = ? WHERE id = ?",
            COLLECTION_NAME
        ))
        .bind(serde_json::to_string(&document)?)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(changes.clone())
    }

    /// Delete an assistant. A missing id is not an error.
    pub async fn delete_assistant(&self, id: &str) -> Result<String, StoreError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", COLLECTION_NAME))
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!("Delete of missing assistant {} ignored", id);
        }
        Ok(id.to_string())
    }
}

fn logged<T>(operation: &str, result: Result<T, StoreError>) -> Result<T, StoreError> {
    if let Err(e) = &result {
        tracing::error!("Error during assistant {}: {}", operation, e);
    }
    result
}

impl RecordStore for Repository {
    fn list(&self) -> StoreFuture<'_, Vec<Assistant>> {
        Box::pin(async move { logged("list", self.list_assistants().await) })
    }

    fn create<'a>(&'a self, name: &'a str, picture: &'a str) -> StoreFuture<'a, Assistant> {
        Box::pin(async move { logged("create", self.create_assistant(name, picture).await) })
    }

    fn update<'a>(
        &'a self,
        id: &'a str,
        changes: &'a AssistantChanges,
    ) -> StoreFuture<'a, AssistantChanges> {
        Box::pin(async move { logged("update", self.update_assistant(id, changes).await) })
    }

    fn delete<'a>(&'a self, id: &'a str) -> StoreFuture<'a, String> {
        Box::pin(async move { logged("delete", self.delete_assistant(id).await) })
    }
}
