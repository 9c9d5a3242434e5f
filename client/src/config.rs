//! API connection settings loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration values for reaching the remote recipe API.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECIPE_CLIENT")]
pub struct ApiSettings {
    /// Base URL of the REST backend, e.g. `https://api.example.com/api`.
    #[ortho_config(default = DEFAULT_BASE_URL.to_owned())]
    pub base_url: String,
    /// Request timeout in seconds.
    #[ortho_config(default = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl ApiSettings {
    /// Return the configured request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
