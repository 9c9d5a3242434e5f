//! Theme preference custody.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::ports::{KeyValueStore, Namespace, SystemScheme};
use crate::domain::{StoreError, StoreResult, ThemeMode};
use crate::stores::lock_state;

/// Persistence payload for the theme namespace.
#[derive(Debug, Serialize, Deserialize)]
struct ThemePayload {
    mode: ThemeMode,
}

/// Owns the persisted theme preference and resolves it against the
/// platform scheme.
pub struct PreferenceStore<K, S> {
    storage: Arc<K>,
    scheme: Arc<S>,
    mode: Mutex<ThemeMode>,
}

impl<K, S> PreferenceStore<K, S>
where
    K: KeyValueStore,
    S: SystemScheme,
{
    /// Construct the store, restoring any persisted preference.
    ///
    /// Unreadable persisted state falls back to the dark default.
    pub async fn rehydrate(storage: Arc<K>, scheme: Arc<S>) -> Self {
        let mode = match storage.get(Namespace::THEME).await {
            Ok(Some(raw)) => match serde_json::from_str::<ThemePayload>(&raw) {
                Ok(payload) => payload.mode,
                Err(error) => {
                    warn!(error = %error, "discarding unreadable persisted theme");
                    ThemeMode::default()
                }
            },
            Ok(None) => ThemeMode::default(),
            Err(error) => {
                warn!(error = %error, "reading persisted theme failed; using default");
                ThemeMode::default()
            }
        };
        Self {
            storage,
            scheme,
            mode: Mutex::new(mode),
        }
    }

    /// The current preference.
    pub fn mode(&self) -> ThemeMode {
        *lock_state(&self.mode)
    }

    /// Whether the UI should render dark, resolving `System` against the
    /// platform scheme.
    pub fn is_dark(&self) -> bool {
        self.mode().is_dark(self.scheme.current())
    }

    /// Change and persist the preference.
    ///
    /// The in-memory mode changes even when persistence fails, so the UI
    /// follows the user's choice for this run regardless.
    ///
    /// # Errors
    ///
    /// [`StoreError::Persistence`] when the write fails.
    pub async fn set_mode(&self, mode: ThemeMode) -> StoreResult<()> {
        *lock_state(&self.mode) = mode;
        let payload = serde_json::to_string(&ThemePayload { mode })
            .map_err(|error| StoreError::persistence(error.to_string()))?;
        self.storage
            .put(Namespace::THEME, &payload)
            .await
            .map_err(|error| StoreError::persistence(error.to_string()))
    }
}
