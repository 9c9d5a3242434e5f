//! Reqwest-backed remote API adapter.

mod client;
mod dto;

pub use client::{HttpClientError, HttpRecipeApi};
