//! End-to-end store wiring over an in-memory backend.
//!
//! These tests drive the full store graph — session, catalogue,
//! interactions, preferences, notifications — against a scripted fake
//! backend and the real in-memory persistence adapter, covering the flows
//! a user actually walks: log in, browse, like, comment, save, restart,
//! log out.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use client::domain::ports::{ApiError, FetchedRecipe, FixedScheme, RecipeApi};
use client::domain::{
    AccessToken, ColorScheme, Comment, CommentId, Ingredient, ProfileUpdate, Recipe, RecipeDraft,
    RecipeId, StoreError, ThemeMode, User, UserId,
};
use client::outbound::persistence::MemoryKeyValueStore;
use client::stores::{AlertKind, AlertRequest, ClientStores};

const VIEWER_EMAIL: &str = "rowan@example.com";
const VIEWER_PASSWORD: &str = "hunter2";
const VIEWER_TOKEN: &str = "tok-rowan";

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn viewer() -> User {
    User {
        id: UserId::new("u-1").expect("valid id"),
        name: "Rowan".to_owned(),
        email: VIEWER_EMAIL.to_owned(),
        avatar: None,
        is_verified: Some(true),
    }
}

fn seeded_recipe(raw_id: &str, title: &str) -> Recipe {
    Recipe {
        id: RecipeId::new(raw_id).expect("valid id"),
        title: title.to_owned(),
        description: "seeded".to_owned(),
        instructions: vec!["Cook".to_owned()],
        image: format!("https://cdn.example.com/{raw_id}.jpg"),
        ingredients: Vec::new(),
        created_by: None,
        created_at: None,
    }
}

#[derive(Default)]
struct Backend {
    recipes: Vec<Recipe>,
    likes: HashMap<RecipeId, HashSet<UserId>>,
    comments: HashMap<RecipeId, Vec<Comment>>,
    saved: HashSet<RecipeId>,
    next_id: u32,
}

/// Scripted backend standing in for the REST API.
struct FakeRecipeApi {
    backend: Mutex<Backend>,
}

impl FakeRecipeApi {
    fn seeded() -> Self {
        Self {
            backend: Mutex::new(Backend {
                recipes: vec![seeded_recipe("r-1", "Soup"), seeded_recipe("r-2", "Stew")],
                next_id: 3,
                ..Backend::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Backend> {
        self.backend.lock().expect("backend lock")
    }

    fn authorise(token: &AccessToken) -> Result<UserId, ApiError> {
        if token.expose() == VIEWER_TOKEN {
            Ok(UserId::new("u-1").expect("valid id"))
        } else {
            Err(ApiError::status(401, "invalid token"))
        }
    }

    fn fetched(&self, backend: &Backend, recipe: &Recipe) -> FetchedRecipe {
        FetchedRecipe {
            recipe: recipe.clone(),
            liked_by: backend
                .likes
                .get(&recipe.id)
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl RecipeApi for FakeRecipeApi {
    async fn login(&self, email: &str, password: &str) -> Result<AccessToken, ApiError> {
        if email == VIEWER_EMAIL && password == VIEWER_PASSWORD {
            Ok(AccessToken::new(VIEWER_TOKEN))
        } else {
            Err(ApiError::status(401, "invalid credentials"))
        }
    }

    async fn fetch_profile(&self, token: &AccessToken) -> Result<User, ApiError> {
        Self::authorise(token)?;
        Ok(viewer())
    }

    async fn register(&self, _name: &str, _email: &str, _password: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn verify(&self, otp: &str) -> Result<(), ApiError> {
        if otp == "123456" {
            Ok(())
        } else {
            Err(ApiError::status(400, "wrong code"))
        }
    }

    async fn logout(&self, token: &AccessToken) -> Result<(), ApiError> {
        Self::authorise(token)?;
        Ok(())
    }

    async fn update_profile(
        &self,
        token: &AccessToken,
        update: &ProfileUpdate,
    ) -> Result<User, ApiError> {
        Self::authorise(token)?;
        let mut user = viewer();
        if let Some(name) = &update.name {
            user.name = name.clone();
        }
        if let Some(avatar) = &update.avatar {
            user.avatar = Some(avatar.clone());
        }
        Ok(user)
    }

    async fn list_recipes(
        &self,
        _token: Option<AccessToken>,
        page: u32,
        limit: u32,
    ) -> Result<Vec<FetchedRecipe>, ApiError> {
        let backend = self.lock();
        let start = (page.saturating_sub(1) * limit) as usize;
        Ok(backend
            .recipes
            .iter()
            .skip(start)
            .take(limit as usize)
            .map(|recipe| self.fetched(&backend, recipe))
            .collect())
    }

    async fn recipe_by_id(
        &self,
        _token: Option<AccessToken>,
        id: &RecipeId,
    ) -> Result<FetchedRecipe, ApiError> {
        let backend = self.lock();
        backend
            .recipes
            .iter()
            .find(|recipe| &recipe.id == id)
            .map(|recipe| self.fetched(&backend, recipe))
            .ok_or_else(|| ApiError::status(404, "recipe not found"))
    }

    async fn user_recipes(&self, token: &AccessToken) -> Result<Vec<FetchedRecipe>, ApiError> {
        Self::authorise(token)?;
        Ok(Vec::new())
    }

    async fn search_recipes(
        &self,
        _token: Option<AccessToken>,
        name: &str,
    ) -> Result<Vec<FetchedRecipe>, ApiError> {
        let backend = self.lock();
        let needle = name.to_lowercase();
        Ok(backend
            .recipes
            .iter()
            .filter(|recipe| recipe.title.to_lowercase().contains(&needle))
            .map(|recipe| self.fetched(&backend, recipe))
            .collect())
    }

    async fn create_recipe(
        &self,
        token: &AccessToken,
        draft: &RecipeDraft,
    ) -> Result<FetchedRecipe, ApiError> {
        Self::authorise(token)?;
        let mut backend = self.lock();
        let id = RecipeId::new(format!("r-{}", backend.next_id)).expect("valid id");
        backend.next_id += 1;
        let recipe = Recipe {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            instructions: draft.instructions.clone(),
            image: draft.image.clone(),
            ingredients: draft.ingredients.clone(),
            created_by: None,
            created_at: Some(Utc::now()),
        };
        backend.recipes.insert(0, recipe.clone());
        let fetched = self.fetched(&backend, &recipe);
        Ok(fetched)
    }

    async fn toggle_like(&self, token: &AccessToken, recipe: &RecipeId) -> Result<bool, ApiError> {
        let user = Self::authorise(token)?;
        let mut backend = self.lock();
        let likes = backend.likes.entry(recipe.clone()).or_default();
        if likes.remove(&user) {
            Ok(false)
        } else {
            likes.insert(user);
            Ok(true)
        }
    }

    async fn like_count(&self, recipe: &RecipeId) -> Result<u64, ApiError> {
        Ok(self.lock().likes.get(recipe).map_or(0, HashSet::len) as u64)
    }

    async fn add_comment(
        &self,
        token: &AccessToken,
        recipe: &RecipeId,
        content: &str,
    ) -> Result<Comment, ApiError> {
        let user = Self::authorise(token)?;
        let mut backend = self.lock();
        let id = CommentId::new(format!("c-{}", backend.next_id)).expect("valid id");
        backend.next_id += 1;
        // No nested author, as the create endpoint responds.
        let comment = Comment {
            id,
            content: content.to_owned(),
            user_id: user,
            user: None,
            created_at: Utc::now(),
        };
        backend
            .comments
            .entry(recipe.clone())
            .or_default()
            .push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, recipe: &RecipeId) -> Result<Vec<Comment>, ApiError> {
        Ok(self.lock().comments.get(recipe).cloned().unwrap_or_default())
    }

    async fn update_comment(
        &self,
        token: &AccessToken,
        comment: &CommentId,
        content: &str,
    ) -> Result<Comment, ApiError> {
        Self::authorise(token)?;
        let mut backend = self.lock();
        for comments in backend.comments.values_mut() {
            if let Some(entry) = comments.iter_mut().find(|entry| &entry.id == comment) {
                entry.content = content.to_owned();
                return Ok(entry.clone());
            }
        }
        Err(ApiError::status(404, "comment not found"))
    }

    async fn delete_comment(
        &self,
        token: &AccessToken,
        comment: &CommentId,
    ) -> Result<(), ApiError> {
        Self::authorise(token)?;
        let mut backend = self.lock();
        for comments in backend.comments.values_mut() {
            comments.retain(|entry| &entry.id != comment);
        }
        Ok(())
    }

    async fn toggle_save(&self, token: &AccessToken, recipe: &RecipeId) -> Result<bool, ApiError> {
        Self::authorise(token)?;
        let mut backend = self.lock();
        if backend.saved.remove(recipe) {
            Ok(false)
        } else {
            backend.saved.insert(recipe.clone());
            Ok(true)
        }
    }

    async fn saved_recipes(&self, token: &AccessToken) -> Result<Vec<FetchedRecipe>, ApiError> {
        Self::authorise(token)?;
        let backend = self.lock();
        Ok(backend
            .recipes
            .iter()
            .filter(|recipe| backend.saved.contains(&recipe.id))
            .map(|recipe| self.fetched(&backend, recipe))
            .collect())
    }

    async fn upload_image(
        &self,
        token: &AccessToken,
        file_name: &str,
        _bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        Self::authorise(token)?;
        Ok(format!("https://cdn.example.com/uploads/{file_name}"))
    }
}

async fn stores_over(
    api: Arc<FakeRecipeApi>,
    storage: Arc<MemoryKeyValueStore>,
) -> ClientStores<FakeRecipeApi, MemoryKeyValueStore, FixedScheme> {
    ClientStores::initialise(api, storage, Arc::new(FixedScheme(ColorScheme::Light))).await
}

#[tokio::test]
async fn browse_like_comment_save_journey() {
    init_tracing();
    let api = Arc::new(FakeRecipeApi::seeded());
    let storage = Arc::new(MemoryKeyValueStore::new());
    let stores = stores_over(api, storage).await;

    // Anonymous browsing works; like flags stay unknown.
    stores.catalog.fetch_recipes(1, 10).await.expect("feed");
    assert_eq!(stores.catalog.feed().len(), 2);
    let soup = RecipeId::new("r-1").expect("valid id");
    assert!(
        stores
            .catalog
            .likes()
            .get(&soup)
            .expect("observed")
            .liked_by_viewer
            .is_none()
    );

    stores
        .session
        .login(VIEWER_EMAIL, VIEWER_PASSWORD)
        .await
        .expect("login");

    // Like from the detail view, visible everywhere through the ledger.
    let state = stores.interactions.toggle_like(&soup).await.expect("like");
    assert_eq!(state.count, 1);
    assert_eq!(state.liked_by_viewer, Some(true));
    assert_eq!(stores.catalog.likes().get(&soup), Some(state));

    // A refetch agrees with the toggled state.
    stores.catalog.fetch_recipes(1, 10).await.expect("refetch");
    assert_eq!(stores.catalog.likes().get(&soup), Some(state));

    // Comment, then edit it; ownership follows the stable user id.
    let comment = stores
        .interactions
        .add_comment(&soup, "Lovely broth")
        .await
        .expect("comment");
    assert!(stores.interactions.can_edit(&comment));
    assert_eq!(comment.user.as_ref().expect("stamped").name, "Rowan");
    stores
        .interactions
        .update_comment(&comment.id, "Lovely broth indeed")
        .await
        .expect("edit");
    assert_eq!(
        stores.interactions.comments_for(&soup)[0].content,
        "Lovely broth indeed"
    );

    // Save, then confirm the server-side list agrees.
    let snapshot = stores.catalog.feed()[0].clone();
    assert!(stores.interactions.toggle_save(&snapshot).await.expect("save"));
    stores.interactions.fetch_saved().await;
    assert_eq!(stores.interactions.saved().len(), 1);
}

#[tokio::test]
async fn publishing_flows_through_upload_and_prepends_the_feed() {
    init_tracing();
    let api = Arc::new(FakeRecipeApi::seeded());
    let storage = Arc::new(MemoryKeyValueStore::new());
    let stores = stores_over(api, storage).await;
    stores
        .session
        .login(VIEWER_EMAIL, VIEWER_PASSWORD)
        .await
        .expect("login");
    stores.catalog.fetch_recipes(1, 10).await.expect("feed");

    let image = stores
        .catalog
        .upload_image("flatbread.jpg", vec![0xFF, 0xD8])
        .await
        .expect("upload");
    let created = stores
        .catalog
        .create_recipe(&RecipeDraft {
            title: "Flatbread".to_owned(),
            description: "Quick flatbread".to_owned(),
            instructions: vec!["Mix".to_owned(), "Fry".to_owned()],
            image,
            ingredients: vec![Ingredient {
                name: "flour".to_owned(),
                item_type: "dry".to_owned(),
                quantity: "200".to_owned(),
                unit: "g".to_owned(),
            }],
        })
        .await
        .expect("create");

    let feed = stores.catalog.feed();
    assert_eq!(feed[0].id, created.id);
    assert_eq!(feed.len(), 3);
    assert!(created.image.ends_with("flatbread.jpg"));

    // Search finds it too.
    stores.catalog.search_recipes("flat").await.expect("search");
    assert_eq!(stores.catalog.search_results().len(), 1);
}

#[tokio::test]
async fn sessions_and_theme_survive_a_restart_but_logout_clears_them() {
    init_tracing();
    let api = Arc::new(FakeRecipeApi::seeded());
    let storage = Arc::new(MemoryKeyValueStore::new());

    let stores = stores_over(Arc::clone(&api), Arc::clone(&storage)).await;
    stores
        .session
        .login(VIEWER_EMAIL, VIEWER_PASSWORD)
        .await
        .expect("login");
    stores
        .preferences
        .set_mode(ThemeMode::Light)
        .await
        .expect("theme");

    // Restart: a fresh store graph over the same storage.
    let restarted = stores_over(Arc::clone(&api), Arc::clone(&storage)).await;
    assert!(restarted.session.is_authenticated());
    assert_eq!(
        restarted.session.viewer().expect("profile restored").name,
        "Rowan"
    );
    assert_eq!(restarted.preferences.mode(), ThemeMode::Light);
    assert!(!restarted.preferences.is_dark());

    restarted.session.logout().await;
    let after_logout = stores_over(api, storage).await;
    assert!(!after_logout.session.is_authenticated());
    // Theme is a device preference; it outlives the session.
    assert_eq!(after_logout.preferences.mode(), ThemeMode::Light);
}

#[tokio::test]
async fn failed_logins_leave_the_store_anonymous_with_a_recorded_error() {
    init_tracing();
    let api = Arc::new(FakeRecipeApi::seeded());
    let storage = Arc::new(MemoryKeyValueStore::new());
    let stores = stores_over(api, storage).await;

    let error = stores
        .session
        .login(VIEWER_EMAIL, "wrong")
        .await
        .expect_err("bad password");

    assert!(matches!(error, StoreError::Auth { .. }));
    assert!(!stores.session.is_authenticated());
    assert!(
        stores
            .session
            .last_error()
            .expect("recorded")
            .contains("invalid credentials")
    );
}

#[tokio::test]
async fn destructive_actions_route_through_a_confirming_alert() {
    init_tracing();
    let api = Arc::new(FakeRecipeApi::seeded());
    let storage = Arc::new(MemoryKeyValueStore::new());
    let stores = stores_over(api, storage).await;
    stores
        .session
        .login(VIEWER_EMAIL, VIEWER_PASSWORD)
        .await
        .expect("login");

    let soup = RecipeId::new("r-1").expect("valid id");
    let comment = stores
        .interactions
        .add_comment(&soup, "Delete me")
        .await
        .expect("comment");

    stores.notifications.show(
        AlertRequest::new("Delete comment?", "This cannot be undone")
            .kind(AlertKind::Warning)
            .confirm_text("Delete")
            .cancel_text("Keep"),
    );
    assert!(stores.notifications.is_visible());

    // The UI confirms, then runs the deletion.
    let _intent = stores.notifications.confirm();
    stores
        .interactions
        .delete_comment(&comment.id)
        .await
        .expect("delete");

    assert!(!stores.notifications.is_visible());
    stores.interactions.fetch_comments(&soup).await;
    assert!(stores.interactions.comments_for(&soup).is_empty());
}
