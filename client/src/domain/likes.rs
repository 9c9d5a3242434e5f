//! Normalised per-recipe like state.
//!
//! The ledger is the single source of truth for "how many likes does this
//! recipe have" and "has the viewer liked it". The catalogue store folds
//! fetched like data into it; the interaction store mutates it on toggles.
//! Screens read it by recipe id instead of trusting snapshots embedded in
//! recipe objects, so a like toggled from the detail view is immediately
//! visible on the feed without a refetch.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::RecipeId;

/// Aggregate like state for one recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LikeState {
    /// Last known aggregate like count.
    pub count: u64,
    /// Whether the viewer has liked the recipe; `None` until observed.
    pub liked_by_viewer: Option<bool>,
}

/// Shared table of per-recipe like state.
///
/// Interior mutability keeps the ledger shareable between the catalogue and
/// interaction stores behind one `Arc`. The mutex is never held across an
/// await point.
#[derive(Debug, Default)]
pub struct LikeLedger {
    entries: Mutex<HashMap<RecipeId, LikeState>>,
}

impl LikeLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the state observed in a fetched recipe, overwriting any
    /// previous entry. Last fetch wins.
    pub fn observe(&self, recipe: &RecipeId, count: u64, liked_by_viewer: Option<bool>) {
        let mut entries = self.lock();
        entries.insert(
            recipe.clone(),
            LikeState {
                count,
                liked_by_viewer,
            },
        );
    }

    /// Overwrite only the aggregate count, preserving the viewer flag.
    pub fn set_count(&self, recipe: &RecipeId, count: u64) {
        let mut entries = self.lock();
        let entry = entries.entry(recipe.clone()).or_default();
        entry.count = count;
    }

    /// Apply a toggle outcome reported by the server.
    ///
    /// The count moves by one relative to the previous local value (absent
    /// treated as zero); the viewer flag is set to the server's verdict.
    /// Returns the resulting state.
    pub fn apply_toggle(&self, recipe: &RecipeId, liked: bool) -> LikeState {
        let mut entries = self.lock();
        let entry = entries.entry(recipe.clone()).or_default();
        entry.count = if liked {
            entry.count.saturating_add(1)
        } else {
            entry.count.saturating_sub(1)
        };
        entry.liked_by_viewer = Some(liked);
        *entry
    }

    /// Look up the state for a recipe, if any fetch or toggle observed it.
    pub fn get(&self, recipe: &RecipeId) -> Option<LikeState> {
        self.lock().get(recipe).copied()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<RecipeId, LikeState>> {
        // A poisoned ledger only means a panicking thread observed stale
        // counts; the data itself stays valid.
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
