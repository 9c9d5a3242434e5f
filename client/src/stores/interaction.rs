//! Social interactions: likes, comments, and saved recipes.
//!
//! Like toggles are serialised per recipe id through a small guard table,
//! so two rapid taps on the same recipe settle as two ordered toggles
//! instead of racing. Toggles on different recipes proceed concurrently,
//! and a recipe's guard entry is dropped once its last queued toggle
//! finishes.
//!
//! Read-only fetches here (like counts, comments, saved recipes) record
//! failures but do not propagate them; a stale list is preferable to a
//! screen-level error for background refreshes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::domain::ports::{KeyValueStore, RecipeApi};
use crate::domain::{
    AccessToken, Comment, CommentAuthor, CommentId, LikeLedger, LikeState, Recipe, RecipeId,
    StoreError, StoreResult,
};
use crate::stores::{ErrorSlot, SessionStore, lock_state};

#[derive(Debug, Default)]
struct InteractionState {
    comments: HashMap<RecipeId, Vec<Comment>>,
    saved: Vec<Recipe>,
}

/// Owns the viewer's interactions with recipes.
pub struct InteractionStore<A, K> {
    api: Arc<A>,
    session: Arc<SessionStore<A, K>>,
    ledger: Arc<LikeLedger>,
    state: Mutex<InteractionState>,
    toggle_guards: Mutex<HashMap<RecipeId, Arc<tokio::sync::Mutex<()>>>>,
    last_error: ErrorSlot,
}

impl<A, K> InteractionStore<A, K>
where
    A: RecipeApi,
    K: KeyValueStore,
{
    /// Wire the store to its API, session, and shared like ledger.
    pub fn new(api: Arc<A>, session: Arc<SessionStore<A, K>>, ledger: Arc<LikeLedger>) -> Self {
        Self {
            api,
            session,
            ledger,
            state: Mutex::new(InteractionState::default()),
            toggle_guards: Mutex::new(HashMap::new()),
            last_error: ErrorSlot::default(),
        }
    }

    /// Like state for a recipe, if any fetch or toggle has observed it.
    pub fn like_state(&self, recipe: &RecipeId) -> Option<LikeState> {
        self.ledger.get(recipe)
    }

    /// Loaded comments for a recipe, newest first.
    pub fn comments_for(&self, recipe: &RecipeId) -> Vec<Comment> {
        lock_state(&self.state)
            .comments
            .get(recipe)
            .cloned()
            .unwrap_or_default()
    }

    /// The viewer's saved recipes, as last fetched or toggled.
    pub fn saved(&self) -> Vec<Recipe> {
        lock_state(&self.state).saved.clone()
    }

    /// The message of the most recent failed operation, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.get()
    }

    /// Whether the viewer may edit or delete a comment.
    ///
    /// Ownership compares the comment's stable author id against the
    /// session's viewer id; display names play no part.
    pub fn can_edit(&self, comment: &Comment) -> bool {
        self.session.viewer_id().as_ref() == Some(&comment.user_id)
    }

    /// Toggle the viewer's like on a recipe.
    ///
    /// The server's verdict is applied to the shared ledger relative to the
    /// local count. Concurrent toggles on the same recipe are queued; the
    /// returned state reflects this call's outcome.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unauthorized`] without a session; network failures
    /// propagate from the adapter.
    pub async fn toggle_like(&self, recipe: &RecipeId) -> StoreResult<LikeState> {
        self.last_error.clear();
        let token = self.require_token()?;
        let guard = self.toggle_guard(recipe);
        let outcome = {
            let _serialised = guard.lock().await;
            match self.api.toggle_like(&token, recipe).await {
                Ok(liked) => Ok(self.ledger.apply_toggle(recipe, liked)),
                Err(error) => Err(self.fail(error.into())),
            }
        };
        self.release_toggle_guard(recipe, guard);
        outcome
    }

    /// Refresh a recipe's aggregate like count from the backend.
    ///
    /// Failures are logged and recorded but not propagated; the previous
    /// count stays on screen.
    pub async fn fetch_like_count(&self, recipe: &RecipeId) {
        self.last_error.clear();
        match self.api.like_count(recipe).await {
            Ok(count) => self.ledger.set_count(recipe, count),
            Err(error) => {
                warn!(recipe = %recipe.as_ref(), error = %error, "like count refresh failed");
                self.last_error.record(&error.into());
            }
        }
    }

    /// Replace the loaded comments for a recipe with the server's list.
    ///
    /// Failures are logged and recorded but not propagated.
    pub async fn fetch_comments(&self, recipe: &RecipeId) {
        self.last_error.clear();
        match self.api.list_comments(recipe).await {
            Ok(comments) => {
                lock_state(&self.state)
                    .comments
                    .insert(recipe.clone(), comments);
            }
            Err(error) => {
                warn!(recipe = %recipe.as_ref(), error = %error, "comment fetch failed");
                self.last_error.record(&error.into());
            }
        }
    }

    /// Post a comment, prepending it to the recipe's loaded list.
    ///
    /// When the server omits the nested author on a freshly created
    /// comment, the viewer's own attribution is stamped in so the UI never
    /// renders an anonymous row for the author themselves.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unauthorized`] without a session; network failures
    /// propagate from the adapter.
    pub async fn add_comment(&self, recipe: &RecipeId, content: &str) -> StoreResult<Comment> {
        self.last_error.clear();
        let token = self.require_token()?;
        let mut comment = self
            .api
            .add_comment(&token, recipe, content)
            .await
            .map_err(|error| self.fail(error.into()))?;
        if comment.user.is_none() {
            comment.user = self.session.viewer().map(|user| CommentAuthor {
                name: user.name,
                avatar: user.avatar,
            });
        }
        lock_state(&self.state)
            .comments
            .entry(recipe.clone())
            .or_default()
            .insert(0, comment.clone());
        Ok(comment)
    }

    /// Edit a comment's content, updating it in place locally.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unauthorized`] without a session; network failures
    /// propagate from the adapter.
    pub async fn update_comment(&self, comment: &CommentId, content: &str) -> StoreResult<Comment> {
        self.last_error.clear();
        let token = self.require_token()?;
        let updated = self
            .api
            .update_comment(&token, comment, content)
            .await
            .map_err(|error| self.fail(error.into()))?;
        let mut state = lock_state(&self.state);
        for comments in state.comments.values_mut() {
            if let Some(entry) = comments.iter_mut().find(|entry| &entry.id == comment) {
                entry.content = updated.content.clone();
            }
        }
        Ok(updated)
    }

    /// Delete a comment, removing it from any loaded list.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unauthorized`] without a session; network failures
    /// propagate from the adapter.
    pub async fn delete_comment(&self, comment: &CommentId) -> StoreResult<()> {
        self.last_error.clear();
        let token = self.require_token()?;
        self.api
            .delete_comment(&token, comment)
            .await
            .map_err(|error| self.fail(error.into()))?;
        let mut state = lock_state(&self.state);
        for comments in state.comments.values_mut() {
            comments.retain(|entry| &entry.id != comment);
        }
        Ok(())
    }

    /// Toggle the viewer's bookmark on a recipe.
    ///
    /// On save the given snapshot is appended to the local saved list; on
    /// unsave every entry with the recipe's id is removed. Returns the new
    /// saved flag.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unauthorized`] without a session; network failures
    /// propagate from the adapter.
    pub async fn toggle_save(&self, recipe: &Recipe) -> StoreResult<bool> {
        self.last_error.clear();
        let token = self.require_token()?;
        let saved = self
            .api
            .toggle_save(&token, &recipe.id)
            .await
            .map_err(|error| self.fail(error.into()))?;
        let mut state = lock_state(&self.state);
        if saved {
            state.saved.push(recipe.clone());
        } else {
            state.saved.retain(|entry| entry.id != recipe.id);
        }
        Ok(saved)
    }

    /// Replace the saved list with the server's, folding like data into the
    /// ledger. Failures are logged and recorded but not propagated.
    pub async fn fetch_saved(&self) {
        self.last_error.clear();
        let Some(token) = self.session.token() else {
            self.last_error.record(&StoreError::Unauthorized);
            return;
        };
        match self.api.saved_recipes(&token).await {
            Ok(fetched) => {
                let viewer = self.session.viewer_id();
                let recipes = fetched
                    .into_iter()
                    .map(|entry| {
                        let liked = viewer.as_ref().map(|id| entry.liked_by_viewer(id));
                        self.ledger
                            .observe(&entry.recipe.id, entry.like_count(), liked);
                        entry.recipe
                    })
                    .collect();
                lock_state(&self.state).saved = recipes;
            }
            Err(error) => {
                warn!(error = %error, "saved recipe fetch failed");
                self.last_error.record(&error.into());
            }
        }
    }

    fn toggle_guard(&self, recipe: &RecipeId) -> Arc<tokio::sync::Mutex<()>> {
        let mut guards = lock_state(&self.toggle_guards);
        Arc::clone(guards.entry(recipe.clone()).or_default())
    }

    /// Drop this call's handle and evict the entry when no toggle still
    /// holds one. Both steps happen under the table lock, so a concurrent
    /// `toggle_guard` either sees the entry before eviction or creates a
    /// fresh one.
    fn release_toggle_guard(&self, recipe: &RecipeId, guard: Arc<tokio::sync::Mutex<()>>) {
        let mut guards = lock_state(&self.toggle_guards);
        drop(guard);
        if guards
            .get(recipe)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            guards.remove(recipe);
        }
    }

    fn require_token(&self) -> StoreResult<AccessToken> {
        self.session
            .token()
            .ok_or_else(|| self.fail(StoreError::Unauthorized))
    }

    fn fail(&self, error: StoreError) -> StoreError {
        self.last_error.record(&error);
        error
    }
}
