//! Deadline wrapper for any record store.

use std::future::Future;
use std::time::Duration;

use super::{RecordStore, StoreFuture};
use crate::errors::StoreError;
use crate::models::{Assistant, AssistantChanges};

/// Fails any inner call that runs longer than `limit`.
pub struct TimeoutStore<S> {
    inner: S,
    limit: Duration,
}

impl<S: RecordStore> TimeoutStore<S> {
    pub fn new(inner: S, limit: Duration) -> Self {
        Self { inner, limit }
    }

    fn bounded<'a, T: Send + 'a>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, StoreError>> + Send + 'a,
    ) -> StoreFuture<'a, T> {
        let limit = self.limit;
        Box::pin(async move {
            match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::error!("Store {} timed out after {:?}", operation, limit);
                    Err(StoreError::TimedOut(limit))
                }
            }
        })
    }
}

impl<S: RecordStore> RecordStore for TimeoutStore<S> {
    fn list(&self) -> StoreFuture<'_, Vec<Assistant>> {
        self.bounded("list", self.inner.list())
    }

    fn create<'a>(&'a self, name: &'a str, picture: &'a str) -> StoreFuture<'a, Assistant> {
        self.bounded("create", self.inner.create(name, picture))
    }

    fn update<'a>(
        &'a self,
        id: &'a str,
        changes: &'a AssistantChanges,
    ) -> StoreFuture<'a, AssistantChanges> {
        self.bounded("update", self.inner.update(id, changes))
    }

    fn delete<'a>(&'a self, id: &'a str) -> StoreFuture<'a, String> {
        self.bounded("delete", self.inner.delete(id))
    }
}
