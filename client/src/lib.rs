//! Client-side state synchronisation core for the recipe-sharing app.
//!
//! The crate models the stores that sit between the UI layer and the remote
//! REST API: session custody, the recipe catalogue, social interactions,
//! theme preferences, and transient alerts. Stores are plain service objects
//! constructed once at startup and shared by reference; they depend on two
//! ports — [`domain::ports::RecipeApi`] for the remote backend and
//! [`domain::ports::KeyValueStore`] for durable local persistence — so the
//! UI layer, tests, and platform adapters stay decoupled.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod stores;
