//! Raw-content store boundary.
//!
//! Source records live in an external store (object storage in
//! production). The engine only needs one operation at this boundary:
//! fetch the UTF-8 text payload for a record id.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{CallaError, Result};

/// Read-only access to raw record content.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the text payload for a record id.
    ///
    /// Fails with [`CallaError::NotFound`] when the record has no
    /// stored content.
    async fn get_content(&self, record_id: &str) -> Result<String>;
}

/// In-process content store backed by a map.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    contents: RwLock<HashMap<String, String>>,
}

impl MemoryContentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the text payload for a record id.
    pub fn put(&self, record_id: impl Into<String>, content: impl Into<String>) {
        self.contents.write().insert(record_id.into(), content.into());
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn get_content(&self, record_id: &str) -> Result<String> {
        self.contents
            .read()
            .get(record_id)
            .cloned()
            .ok_or_else(|| CallaError::not_found(format!("content for record '{record_id}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_stored_content() {
        let store = MemoryContentStore::new();
        store.put("p1", "leather boots");
        assert_eq!(store.get_content("p1").await.unwrap(), "leather boots");
    }

    #[tokio::test]
    async fn missing_record_is_not_found() {
        let store = MemoryContentStore::new();
        let err = store.get_content("absent").await.unwrap_err();
        assert!(matches!(err, CallaError::NotFound(_)));
    }
}
