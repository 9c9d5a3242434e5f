//! Per-recipe discussion entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CommentId, UserId};

/// Display attribution nested inside a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthor {
    /// Author display name.
    pub name: String,
    /// Optional avatar image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A comment attached to a recipe.
///
/// `content` is the only field the client ever mutates in place (after a
/// successful edit). Ownership checks compare `user_id` against the
/// session's viewer id; the nested [`CommentAuthor`] is display-only and
/// may be absent on freshly created comments, in which case the store
/// stamps the viewer's own attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Server-assigned identifier.
    pub id: CommentId,
    /// Comment body.
    pub content: String,
    /// Stable id of the author, used for edit/delete authorisation.
    pub user_id: UserId,
    /// Display attribution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<CommentAuthor>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
