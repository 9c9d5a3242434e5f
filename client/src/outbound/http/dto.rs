//! Wire shapes for the recipe API.
//!
//! DTOs mirror the backend's JSON exactly and convert into domain types via
//! `into_domain`; conversion failures carry a plain message the adapter
//! wraps as a decode error. Two tolerances are deliberate: `instructions`
//! may arrive as a single multi-line string from older recipe documents,
//! and the search endpoint may return one object where a list is expected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::domain::ports::FetchedRecipe;
use crate::domain::{
    Comment, CommentAuthor, Ingredient, Recipe, RecipeAuthor, UserId, validation,
};

/// `POST /users/login` success body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LoginDto {
    pub access_token: String,
}

/// Error body shape shared by all endpoints.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBodyDto {
    pub message: String,
}

/// `{ url }` returned by the upload endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct UploadDto {
    pub url: String,
}

/// `{ liked }` returned by the like toggle.
#[derive(Debug, Deserialize)]
pub(super) struct LikedDto {
    pub liked: bool,
}

/// `{ saved }` returned by the save toggle.
#[derive(Debug, Deserialize)]
pub(super) struct SavedDto {
    pub saved: bool,
}

/// `{ count }` returned by the aggregate like endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct CountDto {
    pub count: u64,
}

/// A like relation entry nested in fetched recipes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LikeDto {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct IngredientDto {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub quantity: String,
    pub unit: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RecipeAuthorDto {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

/// A recipe document as the read endpoints return it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RecipeDto {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "steps_or_text")]
    pub instructions: Vec<String>,
    pub image: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientDto>,
    pub created_by: Option<RecipeAuthorDto>,
    #[serde(default)]
    pub likes: Option<Vec<LikeDto>>,
    pub created_at: Option<DateTime<Utc>>,
}

/// `{ recipes: [...] }` envelope used by feed, own-recipes, and saved lists.
#[derive(Debug, Deserialize)]
pub(super) struct RecipesEnvelope {
    pub recipes: Vec<RecipeDto>,
}

/// `{ recipe: ... }` envelope used by detail and create.
#[derive(Debug, Deserialize)]
pub(super) struct RecipeEnvelope {
    pub recipe: RecipeDto,
}

/// `{ recipe: one-or-many }` envelope used by name search.
#[derive(Debug, Deserialize)]
pub(super) struct SearchEnvelope {
    #[serde(deserialize_with = "one_or_many")]
    pub recipe: Vec<RecipeDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CommentAuthorDto {
    pub name: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CommentDto {
    pub id: String,
    pub content: String,
    pub user_id: String,
    pub user: Option<CommentAuthorDto>,
    pub created_at: DateTime<Utc>,
}

/// `{ comment: ... }` envelope used by comment create and edit.
#[derive(Debug, Deserialize)]
pub(super) struct CommentEnvelope {
    pub comment: CommentDto,
}

/// `{ comments: [...] }` envelope used by the comment list.
#[derive(Debug, Deserialize)]
pub(super) struct CommentsEnvelope {
    pub comments: Vec<CommentDto>,
}

fn steps_or_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Steps(Vec<String>),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Steps(steps) => steps,
        Raw::Text(text) => validation::split_instructions(&text),
    })
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<RecipeDto>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Many(Vec<RecipeDto>),
        One(RecipeDto),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Many(recipes) => recipes,
        Raw::One(recipe) => vec![recipe],
    })
}

impl IngredientDto {
    fn into_domain(self) -> Ingredient {
        Ingredient {
            name: self.name,
            item_type: self.item_type,
            quantity: self.quantity,
            unit: self.unit,
        }
    }
}

impl RecipeDto {
    /// Convert into a domain recipe plus its raw like list.
    pub(super) fn into_domain(self) -> Result<FetchedRecipe, String> {
        let id = self
            .id
            .try_into()
            .map_err(|error| format!("recipe id: {error}"))?;
        let liked_by = self
            .likes
            .unwrap_or_default()
            .into_iter()
            .map(|like| {
                UserId::new(&like.user_id).map_err(|error| format!("like user id: {error}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FetchedRecipe {
            recipe: Recipe {
                id,
                title: self.title,
                description: self.description,
                instructions: self.instructions,
                image: self.image,
                ingredients: self
                    .ingredients
                    .into_iter()
                    .map(IngredientDto::into_domain)
                    .collect(),
                created_by: self.created_by.map(|author| RecipeAuthor {
                    name: author.name,
                    email: author.email,
                    avatar: author.avatar,
                }),
                created_at: self.created_at,
            },
            liked_by,
        })
    }
}

impl CommentDto {
    /// Convert into a domain comment.
    pub(super) fn into_domain(self) -> Result<Comment, String> {
        Ok(Comment {
            id: self
                .id
                .try_into()
                .map_err(|error| format!("comment id: {error}"))?,
            content: self.content,
            user_id: UserId::new(&self.user_id)
                .map_err(|error| format!("comment user id: {error}"))?,
            user: self.user.map(|author| CommentAuthor {
                name: author.name,
                avatar: author.avatar,
            }),
            created_at: self.created_at,
        })
    }
}
