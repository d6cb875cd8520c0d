//! Manual-code OAuth exchange for a Trakt bearer token
//!
//! The operator opens the authorization URL, approves the application, and
//! pastes the displayed code back. The code is traded for an access token
//! which the operator then puts in `TRAKT_ACCESS_TOKEN`.

use crate::config::{OAuthClient, TraktConfig};
use crate::MigrationError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    code: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
    grant_type: &'a str,
}

/// Token endpoint response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

/// Builds the URL the operator visits to authorize the application
///
/// # Example
///
/// ```
/// use letterboxd_trakt::config::TraktConfig;
/// use letterboxd_trakt::trakt::authorize_url;
///
/// let url = authorize_url(&TraktConfig::default(), "abc").unwrap();
/// assert!(url.as_str().starts_with("https://trakt.tv/oauth/authorize?response_type=code&client_id=abc"));
/// ```
pub fn authorize_url(config: &TraktConfig, client_id: &str) -> Result<Url, MigrationError> {
    Ok(Url::parse_with_params(
        &config.authorize_url,
        &[
            ("response_type", "code"),
            ("client_id", client_id),
            ("redirect_uri", config.redirect_uri.as_str()),
        ],
    )?)
}

/// Trades an authorization code for a bearer token
///
/// A rejected exchange returns `MigrationError::Api` carrying the raw
/// response body.
pub async fn exchange_code(
    http: &Client,
    config: &TraktConfig,
    credentials: &OAuthClient,
    code: &str,
) -> Result<TokenResponse, MigrationError> {
    let url = format!("{}/oauth/token", config.api_url.trim_end_matches('/'));
    let request = TokenRequest {
        code: code.trim(),
        client_id: &credentials.client_id,
        client_secret: &credentials.client_secret,
        redirect_uri: &config.redirect_uri,
        grant_type: "authorization_code",
    };

    let response = http
        .post(&url)
        .json(&request)
        .send()
        .await
        .map_err(|source| MigrationError::Network {
            url: url.clone(),
            source,
        })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| MigrationError::Network {
            url: url.clone(),
            source,
        })?;

    if !status.is_success() {
        return Err(MigrationError::Api {
            status: status.as_u16(),
            body,
        });
    }

    Ok(serde_json::from_str(&body)?)
}
