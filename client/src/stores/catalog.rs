//! Recipe catalogue: paginated feed, detail, own recipes, search, and
//! publishing.
//!
//! Every fetch that carries like data folds it into the shared
//! [`LikeLedger`] relative to the current viewer before the recipes land in
//! local state, so like counts and flags are consistent across screens
//! without embedding them in recipe snapshots.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::domain::ports::{FetchedRecipe, KeyValueStore, RecipeApi};
use crate::domain::validation::require_non_empty;
use crate::domain::{
    AccessToken, LikeLedger, Recipe, RecipeDraft, RecipeId, StoreError, StoreResult,
};
use crate::stores::{ErrorSlot, SessionStore, lock_state};

/// Recipes shown per feed page unless the caller asks otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Default)]
struct CatalogState {
    feed: Vec<Recipe>,
    current: Option<Recipe>,
    own: Option<Vec<Recipe>>,
    search_results: Vec<Recipe>,
}

/// Owns the recipe catalogue slice of client state.
pub struct CatalogStore<A, K> {
    api: Arc<A>,
    session: Arc<SessionStore<A, K>>,
    ledger: Arc<LikeLedger>,
    state: Mutex<CatalogState>,
    last_error: ErrorSlot,
}

impl<A, K> CatalogStore<A, K>
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
            state: Mutex::new(CatalogState::default()),
            last_error: ErrorSlot::default(),
        }
    }

    /// Snapshot of the accumulated feed.
    pub fn feed(&self) -> Vec<Recipe> {
        lock_state(&self.state).feed.clone()
    }

    /// The recipe loaded for the detail view, if any.
    pub fn current_recipe(&self) -> Option<Recipe> {
        lock_state(&self.state).current.clone()
    }

    /// The viewer's own recipes; `None` until first fetched.
    pub fn own_recipes(&self) -> Option<Vec<Recipe>> {
        lock_state(&self.state).own.clone()
    }

    /// Results of the most recent search.
    pub fn search_results(&self) -> Vec<Recipe> {
        lock_state(&self.state).search_results.clone()
    }

    /// Shared like ledger, for screens that render like state.
    pub fn likes(&self) -> &LikeLedger {
        &self.ledger
    }

    /// The message of the most recent failed operation, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.get()
    }

    /// Fetch one feed page. Page 1 replaces the feed; later pages append.
    ///
    /// A failure leaves the previously loaded feed intact.
    ///
    /// # Errors
    ///
    /// Network and decode failures propagate from the adapter.
    pub async fn fetch_recipes(&self, page: u32, limit: u32) -> StoreResult<()> {
        self.last_error.clear();
        let token = self.session.token();
        let fetched = self
            .api
            .list_recipes(token, page, limit)
            .await
            .map_err(|error| self.fail(error.into()))?;
        debug!(page, count = fetched.len(), "feed page fetched");
        let recipes = self.absorb_likes(fetched);
        let mut state = lock_state(&self.state);
        if page <= 1 {
            state.feed = recipes;
        } else {
            state.feed.extend(recipes);
        }
        Ok(())
    }

    /// Load one recipe for the detail view.
    ///
    /// # Errors
    ///
    /// Network and decode failures propagate from the adapter.
    pub async fn fetch_recipe_by_id(&self, id: &RecipeId) -> StoreResult<Recipe> {
        self.last_error.clear();
        let token = self.session.token();
        let fetched = self
            .api
            .recipe_by_id(token, id)
            .await
            .map_err(|error| self.fail(error.into()))?;
        let recipe = self.absorb_one(fetched);
        lock_state(&self.state).current = Some(recipe.clone());
        Ok(recipe)
    }

    /// Fetch the viewer's own recipes.
    ///
    /// Once loaded, subsequent calls are a no-op unless `force` is set, so
    /// profile screens can refresh cheaply.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unauthorized`] without a session.
    pub async fn fetch_own_recipes(&self, force: bool) -> StoreResult<()> {
        self.last_error.clear();
        if !force && lock_state(&self.state).own.is_some() {
            return Ok(());
        }
        let token = self.require_token()?;
        let fetched = self
            .api
            .user_recipes(&token)
            .await
            .map_err(|error| self.fail(error.into()))?;
        let recipes = self.absorb_likes(fetched);
        lock_state(&self.state).own = Some(recipes);
        Ok(())
    }

    /// Search recipes by name.
    ///
    /// A blank query clears the results without touching the network. On
    /// failure the results are cleared so a stale list is never shown
    /// against a new query.
    ///
    /// # Errors
    ///
    /// [`StoreError::Search`] carrying the server's message.
    pub async fn search_recipes(&self, query: &str) -> StoreResult<()> {
        self.last_error.clear();
        let query = query.trim();
        if query.is_empty() {
            lock_state(&self.state).search_results.clear();
            return Ok(());
        }
        let token = self.session.token();
        match self.api.search_recipes(token, query).await {
            Ok(fetched) => {
                let recipes = self.absorb_likes(fetched);
                lock_state(&self.state).search_results = recipes;
                Ok(())
            }
            Err(error) => {
                lock_state(&self.state).search_results.clear();
                Err(self.fail(StoreError::search(error.message())))
            }
        }
    }

    /// Publish a draft. The created recipe is prepended to the feed and its
    /// like state seeded in the ledger.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] for an incomplete draft (no network
    /// call), [`StoreError::Unauthorized`] without a session.
    pub async fn create_recipe(&self, draft: &RecipeDraft) -> StoreResult<Recipe> {
        self.last_error.clear();
        self.validate_draft(draft).map_err(|error| self.fail(error))?;
        let token = self.require_token()?;
        let fetched = self
            .api
            .create_recipe(&token, draft)
            .await
            .map_err(|error| self.fail(error.into()))?;
        let recipe = self.absorb_one(fetched);
        lock_state(&self.state).feed.insert(0, recipe.clone());
        Ok(recipe)
    }

    /// Upload a cover image, returning its public URL for use in a draft.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unauthorized`] without a session; network failures
    /// propagate from the adapter.
    pub async fn upload_image(&self, file_name: &str, bytes: Vec<u8>) -> StoreResult<String> {
        self.last_error.clear();
        let token = self.require_token()?;
        self.api
            .upload_image(&token, file_name, bytes)
            .await
            .map_err(|error| self.fail(error.into()))
    }

    fn validate_draft(&self, draft: &RecipeDraft) -> StoreResult<()> {
        require_non_empty("title", &draft.title)?;
        require_non_empty("description", &draft.description)?;
        require_non_empty("image", &draft.image)?;
        if draft.instructions.is_empty() {
            return Err(StoreError::validation("instructions must not be empty"));
        }
        if draft.ingredients.is_empty() {
            return Err(StoreError::validation("ingredients must not be empty"));
        }
        Ok(())
    }

    fn absorb_likes(&self, fetched: Vec<FetchedRecipe>) -> Vec<Recipe> {
        fetched.into_iter().map(|entry| self.absorb_one(entry)).collect()
    }

    fn absorb_one(&self, fetched: FetchedRecipe) -> Recipe {
        let viewer = self.session.viewer_id();
        let liked = viewer.as_ref().map(|id| fetched.liked_by_viewer(id));
        self.ledger
            .observe(&fetched.recipe.id, fetched.like_count(), liked);
        fetched.recipe
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
