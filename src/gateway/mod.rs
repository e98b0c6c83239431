//! Record store gateway.
//!
//! The console talks to its document store only through [`RecordStore`], so
//! the SQLite repository, the timeout wrapper and test doubles are
//! interchangeable.

mod timeout;

pub use timeout::TimeoutStore;

use std::future::Future;
use std::pin::Pin;

use crate::errors::StoreError;
use crate::models::{Assistant, AssistantChanges};

/// Name of the collection holding assistant documents.
pub const COLLECTION_NAME: &str = "assistants";

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// CRUD surface of a document collection of assistants.
pub trait RecordStore: Send + Sync {
    /// Every document in the collection, in store order.
    fn list(&self) -> StoreFuture<'_, Vec<Assistant>>;

    /// Insert a document; the store assigns the id and creation date.
    /// Callers are responsible for rejecting empty fields.
    fn create<'a>(&'a self, name: &'a str, picture: &'a str) -> StoreFuture<'a, Assistant>;

    /// Apply the supplied fields and echo them back. Fails with
    /// [`StoreError::NotFound`] when `id` does not exist.
    fn update<'a>(
        &'a self,
        id: &'a str,
        changes: &'a AssistantChanges,
    ) -> StoreFuture<'a, AssistantChanges>;

    /// Remove a document. Removing a missing id succeeds.
    fn delete<'a>(&'a self, id: &'a str) -> StoreFuture<'a, String>;
}
