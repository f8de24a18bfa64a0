//! # Storage Namespaces
//!
//! Named key/value stores for session-like state (e.g. help pager positions).
//! Each namespace has its own read/write lock; there is no cross-namespace
//! transaction, and concurrent writers to one key resolve last-write-wins.
//! Namespaces are created on first use and live as long as the router.

use crate::domain::error::StorageError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A value held in a namespace. Callers convert explicitly and get a
/// [`StorageError::TypeMismatch`] instead of a silent wrong-type read.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Int(i64),
    Bool(bool),
    Text(String),
    Json(serde_json::Value),
}

impl StoredValue {
    pub fn kind(&self) -> &'static str {
        match self {
            StoredValue::Int(_) => "int",
            StoredValue::Bool(_) => "bool",
            StoredValue::Text(_) => "text",
            StoredValue::Json(_) => "json",
        }
    }
}

impl std::fmt::Display for StoredValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoredValue::Int(v) => write!(f, "{v}"),
            StoredValue::Bool(v) => write!(f, "{v}"),
            StoredValue::Text(v) => f.write_str(v),
            StoredValue::Json(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for StoredValue {
    fn from(v: i64) -> Self {
        StoredValue::Int(v)
    }
}

impl From<bool> for StoredValue {
    fn from(v: bool) -> Self {
        StoredValue::Bool(v)
    }
}

impl From<String> for StoredValue {
    fn from(v: String) -> Self {
        StoredValue::Text(v)
    }
}

impl From<&str> for StoredValue {
    fn from(v: &str) -> Self {
        StoredValue::Text(v.to_string())
    }
}

impl From<serde_json::Value> for StoredValue {
    fn from(v: serde_json::Value) -> Self {
        StoredValue::Json(v)
    }
}

/// One independently locked namespace.
#[derive(Debug, Default)]
pub struct ObjectStore {
    inner: RwLock<HashMap<String, StoredValue>>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<StoredValue> {
        self.inner.read().await.get(key).cloned()
    }

    pub async fn set(&self, key: impl Into<String>, value: impl Into<StoredValue>) {
        self.inner.write().await.insert(key.into(), value.into());
    }

    pub async fn delete(&self, key: &str) -> Option<StoredValue> {
        self.inner.write().await.remove(key)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// `Ok(None)` on a miss, an error if the key holds something other than an int.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>, StorageError> {
        match self.get(key).await {
            None => Ok(None),
            Some(StoredValue::Int(v)) => Ok(Some(v)),
            Some(other) => Err(mismatch(key, "int", &other)),
        }
    }

    pub async fn get_text(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.get(key).await {
            None => Ok(None),
            Some(StoredValue::Text(v)) => Ok(Some(v)),
            Some(other) => Err(mismatch(key, "text", &other)),
        }
    }

    pub async fn get_bool(&self, key: &str) -> Result<Option<bool>, StorageError> {
        match self.get(key).await {
            None => Ok(None),
            Some(StoredValue::Bool(v)) => Ok(Some(v)),
            Some(other) => Err(mismatch(key, "bool", &other)),
        }
    }
}

fn mismatch(key: &str, expected: &'static str, found: &StoredValue) -> StorageError {
    StorageError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}

/// Name -> namespace map.
#[derive(Debug, Default)]
pub struct Storage {
    namespaces: RwLock<HashMap<String, Arc<ObjectStore>>>,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the namespace called `name`, creating it if needed.
    pub async fn namespace(&self, name: &str) -> Arc<ObjectStore> {
        if let Some(store) = self.namespaces.read().await.get(name) {
            return store.clone();
        }
        self.namespaces
            .write()
            .await
            .entry(name.to_string())
            .or_default()
            .clone()
    }

    /// Get an existing namespace without creating one.
    pub async fn existing(&self, name: &str) -> Option<Arc<ObjectStore>> {
        self.namespaces.read().await.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let store = ObjectStore::new();
        assert_eq!(store.get("a").await, None);

        store.set("a", 3_i64).await;
        assert_eq!(store.get_int("a").await.unwrap(), Some(3));

        store.set("a", 4_i64).await;
        assert_eq!(store.get_int("a").await.unwrap(), Some(4));

        assert_eq!(store.delete("a").await, Some(StoredValue::Int(4)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_type_mismatch() {
        let store = ObjectStore::new();
        store.set("k", "text").await;
        let err = store.get_int("k").await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::TypeMismatch {
                expected: "int",
                found: "text",
                ..
            }
        ));
        assert_eq!(store.get_text("k").await.unwrap().as_deref(), Some("text"));
        assert_eq!(store.get_bool("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_namespaces_are_independent_and_persistent() {
        let storage = Storage::new();
        assert!(storage.existing("pages").await.is_none());

        storage.namespace("pages").await.set("x", 1_i64).await;
        storage.namespace("other").await.set("x", 2_i64).await;

        let pages = storage.existing("pages").await.unwrap();
        assert_eq!(pages.get_int("x").await.unwrap(), Some(1));
        assert_eq!(
            storage.namespace("other").await.get_int("x").await.unwrap(),
            Some(2)
        );
    }

    #[tokio::test]
    async fn test_concurrent_writers() {
        let storage = Arc::new(Storage::new());
        let mut handles = Vec::new();
        for i in 0..16_i64 {
            let storage = storage.clone();
            handles.push(tokio::spawn(async move {
                storage.namespace("n").await.set(format!("k{i}"), i).await;
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(storage.namespace("n").await.len().await, 16);
    }
}
