//! Reqwest-backed implementation of the [`RecipeApi`] port.
//!
//! This adapter owns transport details only: URL construction, bearer
//! headers, timeout and HTTP error mapping, and JSON decoding into domain
//! types. Every response is read as text first so a non-JSON failure body
//! can still be surfaced as a truncated excerpt.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use super::dto::{
    CommentDto, CommentEnvelope, CommentsEnvelope, CountDto, ErrorBodyDto, LikedDto, LoginDto,
    RecipeEnvelope, RecipesEnvelope, SavedDto, SearchEnvelope, UploadDto,
};
use crate::config::ApiSettings;
use crate::domain::ports::{ApiError, FetchedRecipe, RecipeApi};
use crate::domain::{
    AccessToken, Comment, CommentId, ProfileUpdate, RecipeDraft, RecipeId, User,
};

/// Errors raised while constructing the HTTP adapter.
#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    /// The configured base URL could not be parsed.
    #[error("invalid base url '{url}': {message}")]
    InvalidBaseUrl {
        /// The offending URL value.
        url: String,
        /// Parser diagnostics.
        message: String,
    },
    /// The underlying reqwest client could not be built.
    #[error("failed to build http client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Remote API adapter performing HTTP requests against one base URL.
#[derive(Debug)]
pub struct HttpRecipeApi {
    client: Client,
    base_url: String,
}

impl HttpRecipeApi {
    /// Build an adapter from connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL does not parse or the reqwest
    /// client cannot be constructed.
    pub fn new(settings: &ApiSettings) -> Result<Self, HttpClientError> {
        let raw = settings.base_url.as_str();
        let parsed = url::Url::parse(raw).map_err(|error| HttpClientError::InvalidBaseUrl {
            url: raw.to_owned(),
            message: error.to_string(),
        })?;
        let client = Client::builder().timeout(settings.timeout()).build()?;
        Ok(Self {
            client,
            base_url: parsed.as_str().trim_end_matches('/').to_owned(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn execute(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<(StatusCode, String), ApiError> {
        debug!(%url, "issuing api request");
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;
        Ok((status, body))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&AccessToken>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        let request = authorize(self.client.get(&url), token);
        let (status, body) = self.execute(&url, request).await?;
        decode_response(status, &body)
    }
}

fn authorize(
    request: reqwest::RequestBuilder,
    token: Option<&AccessToken>,
) -> reqwest::RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token.expose()),
        None => request,
    }
}

#[async_trait]
impl RecipeApi for HttpRecipeApi {
    async fn login(&self, email: &str, password: &str) -> Result<AccessToken, ApiError> {
        let url = self.endpoint("/users/login");
        let request = self
            .client
            .post(&url)
            .json(&json!({ "email": email, "password": password }));
        let (status, body) = self.execute(&url, request).await?;
        let dto: LoginDto = decode_response(status, &body)?;
        Ok(AccessToken::new(dto.access_token))
    }

    async fn fetch_profile(&self, token: &AccessToken) -> Result<User, ApiError> {
        self.get_json("/users", Some(token)).await
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), ApiError> {
        let url = self.endpoint("/users");
        let request = self
            .client
            .post(&url)
            .json(&json!({ "name": name, "email": email, "password": password }));
        let (status, body) = self.execute(&url, request).await?;
        ensure_success(status, &body)
    }

    async fn verify(&self, otp: &str) -> Result<(), ApiError> {
        let url = self.endpoint("/users/verify");
        let request = self.client.post(&url).json(&json!({ "token": otp }));
        let (status, body) = self.execute(&url, request).await?;
        ensure_success(status, &body)
    }

    async fn logout(&self, token: &AccessToken) -> Result<(), ApiError> {
        let url = self.endpoint("/users/logout");
        let request = authorize(self.client.post(&url), Some(token));
        let (status, body) = self.execute(&url, request).await?;
        ensure_success(status, &body)
    }

    async fn update_profile(
        &self,
        token: &AccessToken,
        update: &ProfileUpdate,
    ) -> Result<User, ApiError> {
        let url = self.endpoint("/users");
        let request = authorize(self.client.patch(&url), Some(token)).json(update);
        let (status, body) = self.execute(&url, request).await?;
        decode_response(status, &body)
    }

    async fn list_recipes(
        &self,
        token: Option<AccessToken>,
        page: u32,
        limit: u32,
    ) -> Result<Vec<FetchedRecipe>, ApiError> {
        let envelope: RecipesEnvelope = self
            .get_json(&format!("/recipes?page={page}&limit={limit}"), token.as_ref())
            .await?;
        convert_recipes(envelope.recipes)
    }

    async fn recipe_by_id(
        &self,
        token: Option<AccessToken>,
        id: &RecipeId,
    ) -> Result<FetchedRecipe, ApiError> {
        let envelope: RecipeEnvelope = self
            .get_json(&format!("/recipes/recipe/{id}"), token.as_ref())
            .await?;
        envelope.recipe.into_domain().map_err(ApiError::decode)
    }

    async fn user_recipes(&self, token: &AccessToken) -> Result<Vec<FetchedRecipe>, ApiError> {
        let envelope: RecipesEnvelope = self.get_json("/recipes/user", Some(token)).await?;
        convert_recipes(envelope.recipes)
    }

    async fn search_recipes(
        &self,
        token: Option<AccessToken>,
        name: &str,
    ) -> Result<Vec<FetchedRecipe>, ApiError> {
        let url = self.endpoint(&format!("/recipes/search/{name}"));
        let request = authorize(self.client.get(&url), token.as_ref());
        let (status, body) = self.execute(&url, request).await?;
        decode_search_response(status, &body)
    }

    async fn create_recipe(
        &self,
        token: &AccessToken,
        draft: &RecipeDraft,
    ) -> Result<FetchedRecipe, ApiError> {
        let url = self.endpoint("/recipes");
        let request = authorize(self.client.post(&url), Some(token)).json(draft);
        let (status, body) = self.execute(&url, request).await?;
        let envelope: RecipeEnvelope = decode_response(status, &body)?;
        envelope.recipe.into_domain().map_err(ApiError::decode)
    }

    async fn toggle_like(&self, token: &AccessToken, recipe: &RecipeId) -> Result<bool, ApiError> {
        let url = self.endpoint("/interactions/like");
        let request = authorize(self.client.post(&url), Some(token))
            .json(&json!({ "recipeId": recipe.as_ref() }));
        let (status, body) = self.execute(&url, request).await?;
        let dto: LikedDto = decode_response(status, &body)?;
        Ok(dto.liked)
    }

    async fn like_count(&self, recipe: &RecipeId) -> Result<u64, ApiError> {
        let dto: CountDto = self
            .get_json(&format!("/interactions/like/{recipe}"), None)
            .await?;
        Ok(dto.count)
    }

    async fn add_comment(
        &self,
        token: &AccessToken,
        recipe: &RecipeId,
        content: &str,
    ) -> Result<Comment, ApiError> {
        let url = self.endpoint("/interactions/comment");
        let request = authorize(self.client.post(&url), Some(token))
            .json(&json!({ "recipeId": recipe.as_ref(), "content": content }));
        let (status, body) = self.execute(&url, request).await?;
        let envelope: CommentEnvelope = decode_response(status, &body)?;
        envelope.comment.into_domain().map_err(ApiError::decode)
    }

    async fn list_comments(&self, recipe: &RecipeId) -> Result<Vec<Comment>, ApiError> {
        let envelope: CommentsEnvelope = self
            .get_json(&format!("/interactions/comment/{recipe}"), None)
            .await?;
        envelope
            .comments
            .into_iter()
            .map(|dto: CommentDto| dto.into_domain().map_err(ApiError::decode))
            .collect()
    }

    async fn update_comment(
        &self,
        token: &AccessToken,
        comment: &CommentId,
        content: &str,
    ) -> Result<Comment, ApiError> {
        let url = self.endpoint(&format!("/interactions/comment/{comment}"));
        let request =
            authorize(self.client.put(&url), Some(token)).json(&json!({ "content": content }));
        let (status, body) = self.execute(&url, request).await?;
        let envelope: CommentEnvelope = decode_response(status, &body)?;
        envelope.comment.into_domain().map_err(ApiError::decode)
    }

    async fn delete_comment(
        &self,
        token: &AccessToken,
        comment: &CommentId,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/interactions/comment/{comment}"));
        let request = authorize(self.client.delete(&url), Some(token));
        let (status, body) = self.execute(&url, request).await?;
        ensure_success(status, &body)
    }

    async fn toggle_save(&self, token: &AccessToken, recipe: &RecipeId) -> Result<bool, ApiError> {
        let url = self.endpoint("/interactions/save");
        let request = authorize(self.client.post(&url), Some(token))
            .json(&json!({ "recipeId": recipe.as_ref() }));
        let (status, body) = self.execute(&url, request).await?;
        let dto: SavedDto = decode_response(status, &body)?;
        Ok(dto.saved)
    }

    async fn saved_recipes(&self, token: &AccessToken) -> Result<Vec<FetchedRecipe>, ApiError> {
        let envelope: RecipesEnvelope = self.get_json("/interactions/save", Some(token)).await?;
        convert_recipes(envelope.recipes)
    }

    async fn upload_image(
        &self,
        token: &AccessToken,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        let mime = guess_image_mime(file_name);
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_owned())
            .mime_str(&mime)
            .map_err(|error| ApiError::transport(format!("invalid upload mime type: {error}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);
        let url = self.endpoint("/upload");
        let request = authorize(self.client.post(&url), Some(token)).multipart(form);
        let (status, body) = self.execute(&url, request).await?;
        let dto: UploadDto = decode_response(status, &body)?;
        Ok(dto.url)
    }
}

fn convert_recipes(
    recipes: Vec<super::dto::RecipeDto>,
) -> Result<Vec<FetchedRecipe>, ApiError> {
    recipes
        .into_iter()
        .map(|dto| dto.into_domain().map_err(ApiError::decode))
        .collect()
}

fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::timeout(error.to_string())
    } else {
        ApiError::transport(error.to_string())
    }
}

/// Decode a 2xx JSON body, or map the failure status to an error.
fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ApiError> {
    ensure_success(status, body)?;
    serde_json::from_str(body).map_err(|error| {
        ApiError::decode(format!("invalid JSON payload: {error}: {}", body_preview(body)))
    })
}

/// Reject non-2xx statuses, extracting the server's message when present.
fn ensure_success(status: StatusCode, body: &str) -> Result<(), ApiError> {
    if status.is_success() {
        return Ok(());
    }
    Err(ApiError::status(status.as_u16(), extract_error_message(body)))
}

/// Decode a search response. 404 means zero results, and a single recipe
/// object is normalised to a one-element list.
fn decode_search_response(status: StatusCode, body: &str) -> Result<Vec<FetchedRecipe>, ApiError> {
    if status == StatusCode::NOT_FOUND {
        return Ok(Vec::new());
    }
    let envelope: SearchEnvelope = decode_response(status, body)?;
    convert_recipes(envelope.recipe)
}

/// Pull the `message` field out of an error body, falling back to a
/// generic message carrying a truncated excerpt of the raw text.
fn extract_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBodyDto>(body) {
        Ok(parsed) => parsed.message,
        Err(_) => {
            let preview = body_preview(body);
            if preview.is_empty() {
                "server error".to_owned()
            } else {
                format!("server error: {preview}")
            }
        }
    }
}

fn body_preview(body: &str) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = body.split_whitespace().collect::<Vec<_>>().join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

fn guess_image_mime(file_name: &str) -> String {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase());
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "image/jpeg",
    }
    .to_owned()
}
