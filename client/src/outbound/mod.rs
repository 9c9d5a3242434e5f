//! Outbound adapters.
//!
//! Concrete implementations of the domain ports: the reqwest-backed REST
//! client and the durable key-value persistence adapters.

pub mod http;
pub mod persistence;
