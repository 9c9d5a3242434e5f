//! Port for the remote recipe-sharing REST API.
//!
//! One method per endpoint the client consumes. Implementations own all
//! transport detail: URL construction, bearer headers, status mapping, and
//! JSON decoding into domain types. The stores never see HTTP.

use async_trait::async_trait;

use crate::domain::{
    AccessToken, Comment, CommentId, ProfileUpdate, Recipe, RecipeDraft, RecipeId, User, UserId,
};

/// Errors raised by remote API adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend was unreachable or the connection failed mid-request.
    #[error("transport failure: {message}")]
    Transport {
        /// Transport diagnostics.
        message: String,
    },
    /// The request exceeded the configured timeout.
    #[error("request timed out: {message}")]
    Timeout {
        /// Transport diagnostics.
        message: String,
    },
    /// The backend answered with a non-2xx status.
    #[error("status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The response body's `message` field when it parsed as JSON,
        /// otherwise a generic message with a truncated body excerpt.
        message: String,
    },
    /// A 2xx body failed to decode into the expected shape.
    #[error("decode failure: {message}")]
    Decode {
        /// Decode diagnostics.
        message: String,
    },
}

impl ApiError {
    /// Convenience constructor for [`ApiError::Transport`].
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`ApiError::Timeout`].
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`ApiError::Status`].
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Convenience constructor for [`ApiError::Decode`].
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// The message carried by the error, without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Transport { message }
            | Self::Timeout { message }
            | Self::Status { message, .. }
            | Self::Decode { message } => message.as_str(),
        }
    }
}

/// A recipe as returned by the read endpoints, with its raw like data.
///
/// The adapter does not interpret likes; the catalogue store folds them
/// into the [`crate::domain::LikeLedger`] relative to the current viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedRecipe {
    /// The recipe itself.
    pub recipe: Recipe,
    /// Ids of the users who have liked it.
    pub liked_by: Vec<UserId>,
}

impl FetchedRecipe {
    /// Aggregate like count derived from the raw like list.
    pub fn like_count(&self) -> u64 {
        self.liked_by.len() as u64
    }

    /// Whether the given viewer appears in the like list.
    pub fn liked_by_viewer(&self, viewer: &UserId) -> bool {
        self.liked_by.contains(viewer)
    }
}

/// Port for the remote REST backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// POST `/users/login`; returns the bearer token on success.
    async fn login(&self, email: &str, password: &str) -> Result<AccessToken, ApiError>;

    /// GET `/users`; fetch the authenticated viewer's profile.
    async fn fetch_profile(&self, token: &AccessToken) -> Result<User, ApiError>;

    /// POST `/users`; create an account. Does not authenticate.
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), ApiError>;

    /// POST `/users/verify`; confirm the emailed OTP.
    async fn verify(&self, otp: &str) -> Result<(), ApiError>;

    /// POST `/users/logout`; notify the backend the session is ending.
    async fn logout(&self, token: &AccessToken) -> Result<(), ApiError>;

    /// PATCH `/users`; apply a partial profile update, returning the merged
    /// profile.
    async fn update_profile(
        &self,
        token: &AccessToken,
        update: &ProfileUpdate,
    ) -> Result<User, ApiError>;

    /// GET `/recipes?page&limit`; one feed page, anonymous access allowed.
    async fn list_recipes(
        &self,
        token: Option<AccessToken>,
        page: u32,
        limit: u32,
    ) -> Result<Vec<FetchedRecipe>, ApiError>;

    /// GET `/recipes/recipe/{id}`; single recipe detail.
    async fn recipe_by_id(
        &self,
        token: Option<AccessToken>,
        id: &RecipeId,
    ) -> Result<FetchedRecipe, ApiError>;

    /// GET `/recipes/user`; the viewer's own recipes.
    async fn user_recipes(&self, token: &AccessToken) -> Result<Vec<FetchedRecipe>, ApiError>;

    /// GET `/recipes/search/{name}`; name search. Adapters map HTTP 404 to
    /// an empty list and normalise single-object responses into one-element
    /// lists.
    async fn search_recipes(
        &self,
        token: Option<AccessToken>,
        name: &str,
    ) -> Result<Vec<FetchedRecipe>, ApiError>;

    /// POST `/recipes`; publish a draft, returning the created recipe.
    async fn create_recipe(
        &self,
        token: &AccessToken,
        draft: &RecipeDraft,
    ) -> Result<FetchedRecipe, ApiError>;

    /// POST `/interactions/like`; toggle the viewer's like. Returns the new
    /// liked flag.
    async fn toggle_like(&self, token: &AccessToken, recipe: &RecipeId) -> Result<bool, ApiError>;

    /// GET `/interactions/like/{id}`; current aggregate like count.
    async fn like_count(&self, recipe: &RecipeId) -> Result<u64, ApiError>;

    /// POST `/interactions/comment`; create a comment. The nested author may
    /// be absent in the response.
    async fn add_comment(
        &self,
        token: &AccessToken,
        recipe: &RecipeId,
        content: &str,
    ) -> Result<Comment, ApiError>;

    /// GET `/interactions/comment/{id}`; list a recipe's comments.
    async fn list_comments(&self, recipe: &RecipeId) -> Result<Vec<Comment>, ApiError>;

    /// PUT `/interactions/comment/{id}`; edit a comment's content.
    async fn update_comment(
        &self,
        token: &AccessToken,
        comment: &CommentId,
        content: &str,
    ) -> Result<Comment, ApiError>;

    /// DELETE `/interactions/comment/{id}`.
    async fn delete_comment(&self, token: &AccessToken, comment: &CommentId)
    -> Result<(), ApiError>;

    /// POST `/interactions/save`; toggle the viewer's bookmark. Returns the
    /// new saved flag.
    async fn toggle_save(&self, token: &AccessToken, recipe: &RecipeId) -> Result<bool, ApiError>;

    /// GET `/interactions/save`; the viewer's saved recipes.
    async fn saved_recipes(&self, token: &AccessToken) -> Result<Vec<FetchedRecipe>, ApiError>;

    /// POST `/upload`; multipart image upload, returning the public URL.
    async fn upload_image(
        &self,
        token: &AccessToken,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError>;
}
