use serde::Deserialize;

use crate::services::explain::ExplanationMode;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the product catalog CSV
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Path to the interaction log CSV
    #[serde(default = "default_interactions_path")]
    pub interactions_path: String,

    /// Number of synthetic profiles in the pool
    ///
    /// Must match the value the fixture generator was run with. Changing it
    /// after deployment silently remaps existing visitors to different
    /// profiles.
    #[serde(default = "default_profile_count")]
    pub profile_count: u32,

    /// First profile id in the pool (profiles occupy a contiguous range)
    #[serde(default = "default_profile_id_start")]
    pub profile_id_start: u32,

    /// Text-generation API key
    pub generation_api_key: String,

    /// Text-generation API base URL
    #[serde(default = "default_generation_api_url")]
    pub generation_api_url: String,

    /// Text-generation model name
    #[serde(default = "default_generation_model")]
    pub generation_model: String,

    /// Request timeout for the text-generation call, in seconds
    #[serde(default = "default_explain_timeout_secs")]
    pub explain_timeout_secs: u64,

    /// One generation call per request batch, or one per recommended item
    #[serde(default)]
    pub explanation_mode: ExplanationMode,

    /// Origin allowed to call this API with credentials
    #[serde(default = "default_frontend_origin")]
    pub frontend_origin: String,

    /// Issue the identity cookie with cross-site attributes (SameSite=None; Secure)
    #[serde(default)]
    pub cookie_secure: bool,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_path() -> String {
    "data/products.csv".to_string()
}

fn default_interactions_path() -> String {
    "data/user_behavior.csv".to_string()
}

fn default_profile_count() -> u32 {
    50
}

fn default_profile_id_start() -> u32 {
    101
}

fn default_generation_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_generation_model() -> String {
    "gemini-pro-latest".to_string()
}

fn default_explain_timeout_secs() -> u64 {
    10
}

fn default_frontend_origin() -> String {
    "http://localhost:5173".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
