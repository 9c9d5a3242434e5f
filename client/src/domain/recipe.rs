//! Recipe catalogue entities.
//!
//! A [`Recipe`] is immutable once fetched; the client refreshes it only by
//! refetching. Viewer-relative like state is deliberately *not* embedded
//! here — it lives in the [`super::LikeLedger`] keyed by recipe id, so the
//! feed, the detail view, and the interaction layer all read one table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecipeId;

/// Single ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// Ingredient name, e.g. "flour".
    pub name: String,
    /// Category label, e.g. "dry" or "produce".
    #[serde(rename = "type")]
    pub item_type: String,
    /// Quantity as entered by the author; free-form text.
    pub quantity: String,
    /// Measurement unit, e.g. "g" or "cups".
    pub unit: String,
}

/// Author attribution embedded in fetched recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeAuthor {
    /// Author display name.
    pub name: String,
    /// Author contact address.
    pub email: String,
    /// Optional avatar image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A published recipe as held in client state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Server-assigned identifier.
    pub id: RecipeId,
    /// Recipe title.
    pub title: String,
    /// Short description shown on cards.
    pub description: String,
    /// Ordered preparation steps.
    pub instructions: Vec<String>,
    /// Cover image URL.
    pub image: String,
    /// Ordered ingredient list.
    pub ingredients: Vec<Ingredient>,
    /// Author attribution, when the server includes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<RecipeAuthor>,
    /// Publication timestamp, when the server includes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Recipe payload submitted to the create endpoint; the server assigns the id.
///
/// `instructions` carries the already-split steps so created entries share
/// the shape of fetched ones. Use
/// [`super::validation::split_instructions`] to derive it from the
/// multi-line editor text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    /// Recipe title.
    pub title: String,
    /// Short description.
    pub description: String,
    /// Ordered preparation steps.
    pub instructions: Vec<String>,
    /// Cover image URL, usually obtained from the upload endpoint.
    pub image: String,
    /// Ordered ingredient list.
    pub ingredients: Vec<Ingredient>,
}
