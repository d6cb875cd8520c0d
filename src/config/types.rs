use serde::Deserialize;

/// Main configuration structure
///
/// Every section is optional in the TOML file; missing sections fall back to
/// the values the tool uses against the live services.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub trakt: TraktConfig,
}

/// Letterboxd scraping behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Domain prefixed to every site-relative link
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Width of each fan-out stage
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: u32,

    /// Whole-request timeout in seconds; requests may run indefinitely when unset
    #[serde(rename = "request-timeout")]
    pub request_timeout: Option<u64>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://letterboxd.com".to_string(),
            max_concurrent_fetches: 20,
            request_timeout: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the exported watch history CSV
    #[serde(rename = "csv-path")]
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "Watched_Movies_LBD.csv".to_string(),
        }
    }
}

/// Trakt endpoints and OAuth settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TraktConfig {
    #[serde(rename = "api-url")]
    pub api_url: String,

    #[serde(rename = "authorize-url")]
    pub authorize_url: String,

    #[serde(rename = "redirect-uri")]
    pub redirect_uri: String,

    /// Value of the `trakt-api-version` header
    #[serde(rename = "api-version")]
    pub api_version: String,
}

impl Default for TraktConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.trakt.tv".to_string(),
            authorize_url: "https://trakt.tv/oauth/authorize".to_string(),
            redirect_uri: "urn:ietf:wg:oauth:2.0:oob".to_string(),
            api_version: "2".to_string(),
        }
    }
}
