//! Authentication lifecycle and bearer-token custody.
//!
//! Login deliberately commits (and persists) the token *before* fetching
//! the profile: if the profile fetch fails or the process dies mid-login,
//! the surviving token-only session still authorises requests and the
//! profile can be refetched. That intermediate state is part of the store's
//! contract, not an accident.

use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::domain::ports::{KeyValueStore, Namespace, RecipeApi};
use crate::domain::validation::{require_email, require_non_empty};
use crate::domain::{AccessToken, ProfileUpdate, Session, StoreError, StoreResult, User, UserId};
use crate::stores::{ErrorSlot, lock_state};

/// Owns the viewer's session: who is logged in and with which token.
pub struct SessionStore<A, K> {
    api: Arc<A>,
    storage: Arc<K>,
    state: Mutex<Session>,
    last_error: ErrorSlot,
}

impl<A, K> SessionStore<A, K>
where
    A: RecipeApi,
    K: KeyValueStore,
{
    /// Construct the store, restoring any persisted session.
    ///
    /// Unreadable or unparsable persisted state is discarded with a warning
    /// rather than blocking startup.
    pub async fn rehydrate(api: Arc<A>, storage: Arc<K>) -> Self {
        let state = match storage.get(Namespace::SESSION).await {
            Ok(Some(raw)) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => session,
                Err(error) => {
                    warn!(error = %error, "discarding unreadable persisted session");
                    Session::default()
                }
            },
            Ok(None) => Session::default(),
            Err(error) => {
                warn!(error = %error, "reading persisted session failed; starting anonymous");
                Session::default()
            }
        };
        Self {
            api,
            storage,
            state: Mutex::new(state),
            last_error: ErrorSlot::default(),
        }
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        lock_state(&self.state).clone()
    }

    /// The bearer token, if one is held.
    pub fn token(&self) -> Option<AccessToken> {
        lock_state(&self.state).token.clone()
    }

    /// The authenticated viewer's profile, if the profile fetch completed.
    pub fn viewer(&self) -> Option<User> {
        lock_state(&self.state).user.clone()
    }

    /// The authenticated viewer's id, used for like and comment ownership.
    pub fn viewer_id(&self) -> Option<UserId> {
        lock_state(&self.state).user.as_ref().map(|user| user.id.clone())
    }

    /// Whether a token is available for authorised requests.
    pub fn is_authenticated(&self) -> bool {
        lock_state(&self.state).is_authenticated()
    }

    /// The message of the most recent failed operation, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.get()
    }

    /// Exchange credentials for a session.
    ///
    /// On success the store holds both token and profile. If the profile
    /// fetch fails after the token exchange, the token-only session is kept
    /// and persisted; a later [`Self::refresh_profile`] can complete it.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] for malformed input (no network call),
    /// otherwise [`StoreError::Auth`] carrying the server's message.
    pub async fn login(&self, email: &str, password: &str) -> StoreResult<User> {
        self.last_error.clear();
        require_email(email).map_err(|error| self.fail(error))?;
        require_non_empty("password", password).map_err(|error| self.fail(error))?;

        let token = self
            .api
            .login(email.trim(), password)
            .await
            .map_err(|error| self.fail(StoreError::auth(error.message())))?;

        // Commit the token first so an interrupted login is resumable.
        let partial = Session {
            user: None,
            token: Some(token.clone()),
        };
        *lock_state(&self.state) = partial.clone();
        self.persist(&partial).await;

        let user = self
            .api
            .fetch_profile(&token)
            .await
            .map_err(|error| self.fail(StoreError::auth(error.message())))?;

        let complete = Session {
            user: Some(user.clone()),
            token: Some(token),
        };
        *lock_state(&self.state) = complete.clone();
        self.persist(&complete).await;
        Ok(user)
    }

    /// Refetch the viewer's profile into a token-only session.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unauthorized`] without a token, [`StoreError::Auth`]
    /// when the fetch fails.
    pub async fn refresh_profile(&self) -> StoreResult<User> {
        self.last_error.clear();
        let token = self.require_token()?;
        let user = self
            .api
            .fetch_profile(&token)
            .await
            .map_err(|error| self.fail(StoreError::auth(error.message())))?;
        let snapshot = {
            let mut state = lock_state(&self.state);
            state.user = Some(user.clone());
            state.clone()
        };
        self.persist(&snapshot).await;
        Ok(user)
    }

    /// Create an account. Does not authenticate; the account must be
    /// verified and then logged in.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] for malformed input, otherwise
    /// [`StoreError::Registration`].
    pub async fn register(&self, name: &str, email: &str, password: &str) -> StoreResult<()> {
        self.last_error.clear();
        require_non_empty("name", name).map_err(|error| self.fail(error))?;
        require_email(email).map_err(|error| self.fail(error))?;
        require_non_empty("password", password).map_err(|error| self.fail(error))?;
        self.api
            .register(name.trim(), email.trim(), password)
            .await
            .map_err(|error| self.fail(StoreError::registration(error.message())))
    }

    /// Confirm the emailed one-time code.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] for a blank code, otherwise
    /// [`StoreError::Verification`].
    pub async fn verify(&self, otp: &str) -> StoreResult<()> {
        self.last_error.clear();
        require_non_empty("verification code", otp).map_err(|error| self.fail(error))?;
        self.api
            .verify(otp.trim())
            .await
            .map_err(|error| self.fail(StoreError::verification(error.message())))
    }

    /// End the session.
    ///
    /// The backend notification is best effort: a failure is logged and the
    /// local session is cleared regardless, so logout cannot be blocked by
    /// an unreachable backend.
    pub async fn logout(&self) {
        self.last_error.clear();
        let token = self.token();
        if let Some(token) = token {
            if let Err(error) = self.api.logout(&token).await {
                warn!(error = %error, "logout notification failed; clearing session anyway");
            }
        }
        *lock_state(&self.state) = Session::default();
        if let Err(error) = self.storage.remove(Namespace::SESSION).await {
            warn!(error = %error, "removing persisted session failed");
        }
    }

    /// Apply a partial profile update, replacing the local profile with the
    /// merged one the server returns.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unauthorized`] without a token; network and decode
    /// failures propagate from the adapter.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> StoreResult<User> {
        self.last_error.clear();
        let token = self.require_token()?;
        let user = self
            .api
            .update_profile(&token, update)
            .await
            .map_err(|error| self.fail(StoreError::from(error)))?;
        let snapshot = {
            let mut state = lock_state(&self.state);
            state.user = Some(user.clone());
            state.clone()
        };
        self.persist(&snapshot).await;
        Ok(user)
    }

    fn require_token(&self) -> StoreResult<AccessToken> {
        self.token()
            .ok_or_else(|| self.fail(StoreError::Unauthorized))
    }

    fn fail(&self, error: StoreError) -> StoreError {
        self.last_error.record(&error);
        error
    }

    /// Persist a session snapshot. Persistence failures are logged, not
    /// surfaced; the in-memory session stays authoritative for this run.
    async fn persist(&self, session: &Session) {
        let payload = match serde_json::to_string(session) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(error = %error, "serialising session failed; skipping persist");
                return;
            }
        };
        if let Err(error) = self.storage.put(Namespace::SESSION, &payload).await {
            warn!(error = %error, "persisting session failed");
        }
    }
}

#[cfg(test)]
mod tests {
    //! Behavioural coverage for the session lifecycle, driven through
    //! mocked ports.
    use super::*;
    use crate::domain::ports::{ApiError, MockKeyValueStore, MockRecipeApi};

    fn viewer() -> User {
        User {
            id: UserId::new("u-1").expect("valid id"),
            name: "Rowan".to_owned(),
            email: "rowan@example.com".to_owned(),
            avatar: None,
            is_verified: Some(true),
        }
    }

    fn quiet_storage() -> MockKeyValueStore {
        let mut storage = MockKeyValueStore::new();
        storage.expect_get().returning(|_| Ok(None));
        storage.expect_put().returning(|_, _| Ok(()));
        storage.expect_remove().returning(|_| Ok(()));
        storage
    }

    async fn store_with(api: MockRecipeApi) -> SessionStore<MockRecipeApi, MockKeyValueStore> {
        SessionStore::rehydrate(Arc::new(api), Arc::new(quiet_storage())).await
    }

    #[tokio::test]
    async fn login_completes_the_session_on_success() {
        let mut api = MockRecipeApi::new();
        api.expect_login()
            .withf(|email, password| email == "rowan@example.com" && password == "hunter2")
            .returning(|_, _| Ok(AccessToken::new("tok-1")));
        api.expect_fetch_profile().returning(|_| Ok(viewer()));

        let store = store_with(api).await;
        let user = store
            .login("rowan@example.com", "hunter2")
            .await
            .expect("login should succeed");

        assert_eq!(user.name, "Rowan");
        assert!(store.is_authenticated());
        assert_eq!(store.viewer_id(), Some(UserId::new("u-1").expect("valid id")));
        assert_eq!(store.last_error(), None);
    }

    #[tokio::test]
    async fn failed_profile_fetch_leaves_a_resumable_token_only_session() {
        let mut api = MockRecipeApi::new();
        api.expect_login()
            .returning(|_, _| Ok(AccessToken::new("tok-1")));
        api.expect_fetch_profile()
            .returning(|_| Err(ApiError::status(500, "profile unavailable")));

        let store = store_with(api).await;
        let error = store
            .login("rowan@example.com", "hunter2")
            .await
            .expect_err("login should report the profile failure");

        assert!(matches!(error, StoreError::Auth { .. }));
        // The token survives: the session is authenticated but profile-less.
        assert!(store.is_authenticated());
        assert!(store.viewer().is_none());
        assert!(store.last_error().expect("error recorded").contains("profile unavailable"));
    }

    #[tokio::test]
    async fn profile_refresh_completes_a_token_only_session() {
        let mut api = MockRecipeApi::new();
        api.expect_login()
            .returning(|_, _| Ok(AccessToken::new("tok-1")));
        api.expect_fetch_profile()
            .times(1)
            .returning(|_| Err(ApiError::transport("connection reset")));
        api.expect_fetch_profile().returning(|_| Ok(viewer()));

        let store = store_with(api).await;
        store
            .login("rowan@example.com", "hunter2")
            .await
            .expect_err("first profile fetch fails");
        let user = store.refresh_profile().await.expect("refresh should succeed");

        assert_eq!(user.id.as_ref(), "u-1");
        assert_eq!(store.viewer(), Some(viewer()));
    }

    #[tokio::test]
    async fn malformed_email_is_rejected_before_any_network_call() {
        // No expectations: any API call would panic the mock.
        let store = store_with(MockRecipeApi::new()).await;
        let error = store
            .login("not-an-email", "hunter2")
            .await
            .expect_err("validation should fail");
        assert!(matches!(error, StoreError::Validation { .. }));
        assert!(store.last_error().is_some());
    }

    #[tokio::test]
    async fn login_failure_surfaces_the_server_message() {
        let mut api = MockRecipeApi::new();
        api.expect_login()
            .returning(|_, _| Err(ApiError::status(401, "wrong password")));

        let store = store_with(api).await;
        let error = store
            .login("rowan@example.com", "hunter2")
            .await
            .expect_err("login should fail");

        assert_eq!(error.to_string(), "authentication failed: wrong password");
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn register_trims_input_and_maps_failures() {
        let mut api = MockRecipeApi::new();
        api.expect_register()
            .withf(|name, email, _| name == "Rowan" && email == "rowan@example.com")
            .returning(|_, _, _| Err(ApiError::status(409, "email already registered")));

        let store = store_with(api).await;
        let error = store
            .register("  Rowan  ", " rowan@example.com ", "hunter2")
            .await
            .expect_err("registration should fail");

        assert!(matches!(error, StoreError::Registration { .. }));
        assert!(store.last_error().expect("recorded").contains("already registered"));
    }

    #[tokio::test]
    async fn verify_rejects_a_blank_code_locally() {
        let store = store_with(MockRecipeApi::new()).await;
        let error = store.verify("   ").await.expect_err("blank code");
        assert!(matches!(error, StoreError::Validation { .. }));
    }

    #[tokio::test]
    async fn logout_clears_the_session_even_when_the_backend_fails() {
        let mut api = MockRecipeApi::new();
        api.expect_login()
            .returning(|_, _| Ok(AccessToken::new("tok-1")));
        api.expect_fetch_profile().returning(|_| Ok(viewer()));
        api.expect_logout()
            .returning(|_| Err(ApiError::transport("connection refused")));

        let store = store_with(api).await;
        store
            .login("rowan@example.com", "hunter2")
            .await
            .expect("login should succeed");
        store.logout().await;

        assert!(!store.is_authenticated());
        assert!(store.viewer().is_none());
        assert_eq!(store.last_error(), None);
    }

    #[tokio::test]
    async fn rehydration_restores_a_persisted_session() {
        let persisted = serde_json::to_string(&Session {
            user: Some(viewer()),
            token: Some(AccessToken::new("tok-1")),
        })
        .expect("serialise");
        let mut storage = MockKeyValueStore::new();
        storage
            .expect_get()
            .returning(move |_| Ok(Some(persisted.clone())));

        let store = SessionStore::rehydrate(Arc::new(MockRecipeApi::new()), Arc::new(storage)).await;
        assert!(store.is_authenticated());
        assert_eq!(store.viewer(), Some(viewer()));
    }

    #[tokio::test]
    async fn corrupt_persisted_state_falls_back_to_anonymous() {
        let mut storage = MockKeyValueStore::new();
        storage
            .expect_get()
            .returning(|_| Ok(Some("{not json".to_owned())));

        let store = SessionStore::rehydrate(Arc::new(MockRecipeApi::new()), Arc::new(storage)).await;
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn profile_updates_require_a_session() {
        let store = store_with(MockRecipeApi::new()).await;
        let error = store
            .update_profile(&ProfileUpdate::default())
            .await
            .expect_err("anonymous update must fail");
        assert_eq!(error, StoreError::Unauthorized);
    }

    #[tokio::test]
    async fn profile_updates_replace_the_local_profile() {
        let mut api = MockRecipeApi::new();
        api.expect_login()
            .returning(|_, _| Ok(AccessToken::new("tok-1")));
        api.expect_fetch_profile().returning(|_| Ok(viewer()));
        api.expect_update_profile().returning(|_, _| {
            Ok(User {
                name: "Ash".to_owned(),
                ..viewer()
            })
        });

        let store = store_with(api).await;
        store
            .login("rowan@example.com", "hunter2")
            .await
            .expect("login should succeed");
        let updated = store
            .update_profile(&ProfileUpdate {
                name: Some("Ash".to_owned()),
                avatar: None,
            })
            .await
            .expect("update should succeed");

        assert_eq!(updated.name, "Ash");
        assert_eq!(store.viewer().expect("profile present").name, "Ash");
    }
}
