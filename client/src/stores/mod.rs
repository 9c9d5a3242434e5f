//! Client-side state stores.
//!
//! Each store is a plain service object owning one slice of app state:
//! session custody, the recipe catalogue, social interactions, theme
//! preference, and transient alerts. Stores are constructed once at
//! startup (see [`ClientStores::initialise`]) and shared by `Arc`; the UI
//! layer reads state through accessor methods and mutates it only through
//! store operations.
//!
//! Mutating operations follow one propagation pattern throughout: on
//! failure the store records the rendered message in its last-error slot
//! *and* returns the error, so a global "last error" observer and the
//! immediate caller can both react.

mod catalog;
mod interaction;
mod notifications;
mod preferences;
mod session;

use std::sync::{Arc, Mutex, MutexGuard};

pub use catalog::CatalogStore;
pub use interaction::InteractionStore;
pub use notifications::{ActiveAlert, AlertIntent, AlertKind, AlertRequest, NotificationStore};
pub use preferences::PreferenceStore;
pub use session::SessionStore;

use crate::domain::LikeLedger;
use crate::domain::StoreError;
use crate::domain::ports::{KeyValueStore, RecipeApi, SystemScheme};

/// Last-error slot shared by every store.
///
/// Holds the rendered message of the most recent failed operation, cleared
/// at the start of each new one.
#[derive(Debug, Default)]
pub struct ErrorSlot(Mutex<Option<String>>);

impl ErrorSlot {
    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub(crate) fn clear(&self) {
        *self.lock() = None;
    }

    pub(crate) fn record(&self, error: &StoreError) {
        *self.lock() = Some(error.to_string());
    }

    /// The message of the most recent failed operation, if any.
    pub fn get(&self) -> Option<String> {
        self.lock().clone()
    }
}

/// The full set of stores, wired together once at startup.
///
/// The session store is shared into the catalogue and interaction stores
/// for token custody, and both of those share one [`LikeLedger`] so "is
/// this recipe liked" has a single answer everywhere.
pub struct ClientStores<A, K, S> {
    /// Authentication lifecycle and bearer-token custody.
    pub session: Arc<SessionStore<A, K>>,
    /// Recipe feed, own recipes, detail, and search.
    pub catalog: Arc<CatalogStore<A, K>>,
    /// Likes, comments, and saved recipes.
    pub interactions: Arc<InteractionStore<A, K>>,
    /// Theme preference.
    pub preferences: Arc<PreferenceStore<K, S>>,
    /// Transient alert state.
    pub notifications: Arc<NotificationStore>,
}

impl<A, K, S> ClientStores<A, K, S>
where
    A: RecipeApi,
    K: KeyValueStore,
    S: SystemScheme,
{
    /// Construct and wire every store, rehydrating persisted state.
    pub async fn initialise(api: Arc<A>, storage: Arc<K>, scheme: Arc<S>) -> Self {
        let ledger = Arc::new(LikeLedger::new());
        let session = Arc::new(SessionStore::rehydrate(Arc::clone(&api), Arc::clone(&storage)).await);
        let catalog = Arc::new(CatalogStore::new(
            Arc::clone(&api),
            Arc::clone(&session),
            Arc::clone(&ledger),
        ));
        let interactions = Arc::new(InteractionStore::new(
            Arc::clone(&api),
            Arc::clone(&session),
            Arc::clone(&ledger),
        ));
        let preferences =
            Arc::new(PreferenceStore::rehydrate(Arc::clone(&storage), scheme).await);

        Self {
            session,
            catalog,
            interactions,
            preferences,
            notifications: Arc::new(NotificationStore::new()),
        }
    }
}

/// Lock a state mutex, recovering the data if a panicking holder poisoned it.
pub(crate) fn lock_state<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
