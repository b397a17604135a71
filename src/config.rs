use std::env;

use anyhow::Result;

use crate::gemini::client::DEFAULT_API_URL;

/// Model used when CINNABAR_MODEL is not set.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Gemini API key. May be empty — `require_api_key` checks before any
    /// call, so a missing key is reported as a setup problem rather than
    /// bouncing off the API as an auth error.
    pub gemini_api_key: String,
    pub model: String,
    /// API endpoint (defaults to the public Gemini URL). Overridable for
    /// testing or proxied deployments.
    pub api_url: String,
    /// Path of the JSON store file holding news and counters.
    pub store_path: String,
    /// Shared password gating news mutations (CINNABAR_ADMIN_PASSWORD).
    pub admin_password: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default except the API key and admin password —
    /// those are required only by the operations that use them.
    pub fn load() -> Result<Self> {
        Ok(Self {
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            model: env::var("CINNABAR_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            api_url: env::var("CINNABAR_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            store_path: env::var("CINNABAR_STORE_PATH")
                .unwrap_or_else(|_| "./cinnabar.json".to_string()),
            admin_password: env::var("CINNABAR_ADMIN_PASSWORD").unwrap_or_default(),
        })
    }

    /// Check that the API key is configured.
    /// Call this before any operation that talks to the provider.
    pub fn require_api_key(&self) -> Result<()> {
        if self.gemini_api_key.is_empty() {
            anyhow::bail!(
                "GEMINI_API_KEY not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }

    /// Check a supplied admin password against the configured one.
    /// Call this before any news mutation.
    pub fn require_admin(&self, password: &str) -> Result<()> {
        if self.admin_password.is_empty() {
            anyhow::bail!(
                "CINNABAR_ADMIN_PASSWORD not set. Add it to your .env file to enable\n\
                 news administration."
            );
        }
        if password != self.admin_password {
            anyhow::bail!("Incorrect admin password.");
        }
        Ok(())
    }
}
