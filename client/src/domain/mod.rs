//! Domain primitives and aggregates.
//!
//! Purpose: define the strongly typed entities shared by the stores and the
//! outbound adapters. Types are immutable value objects; invariants and
//! serialisation contracts (serde) are documented on each type.
//!
//! Public surface:
//! - Identifiers ([`RecipeId`], [`CommentId`], [`UserId`]) — validated
//!   opaque server-assigned ids.
//! - [`User`], [`Session`], [`AccessToken`] — viewer identity and bearer
//!   token custody.
//! - [`Recipe`], [`Ingredient`], [`RecipeDraft`] — the catalogue entities.
//! - [`Comment`] — per-recipe discussion entries.
//! - [`ThemeMode`] — persisted display preference.
//! - [`LikeLedger`] — the single normalised table of per-recipe like state.
//! - [`StoreError`] — the error taxonomy surfaced by store operations.

pub mod comment;
pub mod error;
pub mod ids;
pub mod likes;
pub mod ports;
pub mod recipe;
pub mod theme;
pub mod user;
pub mod validation;

pub use self::comment::{Comment, CommentAuthor};
pub use self::error::StoreError;
pub use self::ids::{CommentId, IdValidationError, RecipeId, UserId};
pub use self::likes::{LikeLedger, LikeState};
pub use self::recipe::{Ingredient, Recipe, RecipeAuthor, RecipeDraft};
pub use self::theme::{ColorScheme, ParseThemeModeError, ThemeMode};
pub use self::user::{AccessToken, ProfileUpdate, Session, User};

/// Convenient result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
