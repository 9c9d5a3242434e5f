//! Ports consumed by the stores.
//!
//! The stores depend on these traits rather than concrete adapters: the
//! remote REST backend ([`RecipeApi`]), durable key-value persistence
//! ([`KeyValueStore`]), and the platform's reported colour scheme
//! ([`SystemScheme`]). Outbound adapters live under `crate::outbound`.

mod key_value_store;
mod recipe_api;
mod system_scheme;

#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
pub use key_value_store::{KeyValueStore, KeyValueStoreError, Namespace};
#[cfg(test)]
pub use recipe_api::MockRecipeApi;
pub use recipe_api::{ApiError, FetchedRecipe, RecipeApi};
pub use system_scheme::{FixedScheme, SystemScheme};
