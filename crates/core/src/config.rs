use crate::error::{Error, Result};

pub const DEFAULT_SITE_NAME: &str = "AI Job Spot";
pub const DEFAULT_BASE_URL: &str = "https://www.ai-job-spot.com";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE: &str = "(default)";

/// Runtime configuration, read from the environment (and `.env` if present)
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    pub site_name: String,
    /// Absolute origin without a trailing slash, used for sitemap `<loc>`s
    pub base_url: String,
    pub port: u16,
    /// `None` when no project is configured; commands that need the
    /// backing store refuse to start without it
    pub firestore: Option<FirestoreConfig>,
    pub ads: AdsConfig,
}

/// Connection parameters for the Firestore REST API
#[derive(Debug, Clone, PartialEq)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub database: String,
    pub api_key: Option<String>,
    /// `host:port` of a local emulator; switches the client to plain HTTP
    pub emulator_host: Option<String>,
    /// OAuth access token, needed for writes against a secured project
    pub bearer_token: Option<String>,
}

/// Ad network identifiers. Either one missing renders a placeholder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdsConfig {
    pub client_id: Option<String>,
    pub slot_id: Option<String>,
}

impl AdsConfig {
    /// Client and slot, only when both are configured
    pub fn slot(&self) -> Option<(&str, &str)> {
        match (&self.client_id, &self.slot_id) {
            (Some(client), Some(slot)) => Some((client.as_str(), slot.as_str())),
            _ => None,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: DEFAULT_SITE_NAME.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            port: DEFAULT_PORT,
            firestore: None,
            ads: AdsConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let base_url = match get("SITE_BASE_URL") {
            Some(url) => validate_base_url(&url)?,
            None => DEFAULT_BASE_URL.to_string(),
        };

        let port = match get("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| Error::Config(format!("PORT must be a valid number, got '{}'", port)))?,
            None => DEFAULT_PORT,
        };

        let firestore = get("FIRESTORE_PROJECT_ID").map(|project_id| FirestoreConfig {
            project_id,
            database: get("FIRESTORE_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            api_key: get("FIRESTORE_API_KEY"),
            emulator_host: get("FIRESTORE_EMULATOR_HOST"),
            bearer_token: get("FIRESTORE_BEARER_TOKEN"),
        });

        Ok(Self {
            site_name: get("SITE_NAME").unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
            base_url,
            port,
            firestore,
            ads: AdsConfig {
                client_id: get("ADSENSE_CLIENT_ID"),
                slot_id: get("ADSENSE_SLOT_ID"),
            },
        })
    }
}

/// Require an absolute http(s) origin and drop any trailing slash
fn validate_base_url(url: &str) -> Result<String> {
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(Error::Config(format!(
            "SITE_BASE_URL must start with http:// or https://, got '{}'",
            url
        )));
    }

    let trimmed = url.trim_end_matches('/');
    if trimmed.ends_with("://") {
        return Err(Error::Config(format!("SITE_BASE_URL has no host: '{}'", url)));
    }

    Ok(trimmed.to_string())
}
