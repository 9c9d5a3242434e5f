//! File-backed key-value adapter.
//!
//! Each namespace maps to one JSON file inside a capability-scoped
//! directory, so the adapter can only ever touch the app's own data
//! directory. Writes go through a staging file renamed into place, keeping
//! a partially written payload from clobbering the previous one.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::Dir;

use crate::domain::ports::{KeyValueStore, KeyValueStoreError, Namespace};

/// Key-value adapter persisting namespaces as files in one directory.
pub struct DirKeyValueStore {
    dir: Dir,
}

impl DirKeyValueStore {
    /// Open (creating if needed) the backing directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created or opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let path = path.as_ref();
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self { dir })
    }

    fn file_name(namespace: Namespace) -> String {
        format!("{namespace}.json")
    }

    fn staging_name(namespace: Namespace) -> String {
        format!(".{namespace}.json.tmp")
    }
}

#[async_trait]
impl KeyValueStore for DirKeyValueStore {
    async fn get(&self, namespace: Namespace) -> Result<Option<String>, KeyValueStoreError> {
        match self.dir.read_to_string(Self::file_name(namespace)) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(KeyValueStoreError::io(namespace, error.to_string())),
        }
    }

    async fn put(&self, namespace: Namespace, value: &str) -> Result<(), KeyValueStoreError> {
        let staging = Self::staging_name(namespace);
        self.dir
            .write(&staging, value.as_bytes())
            .map_err(|error| KeyValueStoreError::io(namespace, error.to_string()))?;
        self.dir
            .rename(&staging, &self.dir, Self::file_name(namespace))
            .map_err(|error| KeyValueStoreError::io(namespace, error.to_string()))
    }

    async fn remove(&self, namespace: Namespace) -> Result<(), KeyValueStoreError> {
        match self.dir.remove_file(Self::file_name(namespace)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(KeyValueStoreError::io(namespace, error.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the file-backed adapter.
    use super::*;

    fn open_adapter(dir: &tempfile::TempDir) -> DirKeyValueStore {
        DirKeyValueStore::open(dir.path()).expect("adapter should open")
    }

    #[tokio::test]
    async fn absent_namespaces_read_as_none() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = open_adapter(&tmp);
        let value = store.get(Namespace::SESSION).await.expect("get succeeds");
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn written_payloads_survive_reopening() {
        let tmp = tempfile::tempdir().expect("tempdir");
        {
            let store = open_adapter(&tmp);
            store
                .put(Namespace::THEME, r#"{"mode":"dark"}"#)
                .await
                .expect("put succeeds");
        }
        let store = open_adapter(&tmp);
        let value = store.get(Namespace::THEME).await.expect("get succeeds");
        assert_eq!(value.as_deref(), Some(r#"{"mode":"dark"}"#));
    }

    #[tokio::test]
    async fn puts_replace_previous_payloads() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = open_adapter(&tmp);
        store
            .put(Namespace::SESSION, "first")
            .await
            .expect("put succeeds");
        store
            .put(Namespace::SESSION, "second")
            .await
            .expect("put succeeds");
        let value = store.get(Namespace::SESSION).await.expect("get succeeds");
        assert_eq!(value.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn namespaces_are_isolated() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = open_adapter(&tmp);
        store
            .put(Namespace::SESSION, "session-data")
            .await
            .expect("put succeeds");
        let theme = store.get(Namespace::THEME).await.expect("get succeeds");
        assert_eq!(theme, None);
    }

    #[tokio::test]
    async fn removing_an_absent_namespace_is_a_noop() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = open_adapter(&tmp);
        store
            .remove(Namespace::SESSION)
            .await
            .expect("remove succeeds");
        store
            .put(Namespace::SESSION, "data")
            .await
            .expect("put succeeds");
        store
            .remove(Namespace::SESSION)
            .await
            .expect("remove succeeds");
        let value = store.get(Namespace::SESSION).await.expect("get succeeds");
        assert_eq!(value, None);
    }
}
