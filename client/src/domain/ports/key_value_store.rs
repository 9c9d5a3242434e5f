//! Port for durable key-value persistence.
//!
//! Session and theme state survive process restarts through this
//! capability. Each store owns one namespace; payloads are opaque JSON
//! strings so the adapter stays schema-free.

use async_trait::async_trait;

/// Persistence namespace. One per store, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Namespace(&'static str);

impl Namespace {
    /// Session store namespace.
    pub const SESSION: Self = Self("session");
    /// Preference store namespace.
    pub const THEME: Self = Self("theme");

    /// The namespace's stable string form.
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Errors raised by persistence adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyValueStoreError {
    /// The backing medium rejected the operation.
    #[error("persistence io failure for '{namespace}': {message}")]
    Io {
        /// Namespace the operation targeted.
        namespace: String,
        /// Adapter diagnostics.
        message: String,
    },
}

impl KeyValueStoreError {
    /// Convenience constructor for [`KeyValueStoreError::Io`].
    pub fn io(namespace: Namespace, message: impl Into<String>) -> Self {
        Self::Io {
            namespace: namespace.as_str().to_owned(),
            message: message.into(),
        }
    }
}

/// Port for durable key-value persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the payload stored under a namespace, if any.
    async fn get(&self, namespace: Namespace) -> Result<Option<String>, KeyValueStoreError>;

    /// Replace the payload stored under a namespace.
    async fn put(&self, namespace: Namespace, value: &str) -> Result<(), KeyValueStoreError>;

    /// Delete the payload stored under a namespace. Deleting an absent
    /// namespace is a no-op.
    async fn remove(&self, namespace: Namespace) -> Result<(), KeyValueStoreError>;
}
