//! Authenticated Trakt REST client
//!
//! Every request carries the JSON content type, the bearer token, the API
//! version and the client id as API key.

use crate::config::{ApiAuth, TraktConfig};
use crate::model::MediaType;
use crate::MigrationError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const API_VERSION_HEADER: &str = "trakt-api-version";
const API_KEY_HEADER: &str = "trakt-api-key";

/// TMDb identifier in Trakt's id object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraktIds {
    pub tmdb: u64,
}

/// One movie or show to mark as watched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryItem {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    pub ids: TraktIds,
}

/// Body of `POST /sync/history`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryPayload {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub movies: Vec<HistoryItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shows: Vec<HistoryItem>,
}

impl HistoryPayload {
    /// Files `item` under movies or shows; unknown media types are refused
    pub fn push(&mut self, media_type: MediaType, item: HistoryItem) -> bool {
        match media_type {
            MediaType::Movie => self.movies.push(item),
            MediaType::Show => self.shows.push(item),
            MediaType::Unknown => return false,
        }
        true
    }

    pub fn len(&self) -> usize {
        self.movies.len() + self.shows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Counts in a sync response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SyncCounts {
    #[serde(default)]
    pub movies: u64,
    #[serde(default)]
    pub episodes: u64,
}

/// Items Trakt could not match
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SyncNotFound {
    #[serde(default)]
    pub movies: Vec<serde_json::Value>,
    #[serde(default)]
    pub shows: Vec<serde_json::Value>,
}

impl SyncNotFound {
    pub fn len(&self) -> usize {
        self.movies.len() + self.shows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Response of `POST /sync/history`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SyncResponse {
    #[serde(default)]
    pub added: SyncCounts,
    #[serde(default)]
    pub not_found: SyncNotFound,
}

/// Client for the authenticated part of the Trakt API
#[derive(Debug, Clone)]
pub struct TraktClient {
    client: Client,
    api_url: String,
}

impl TraktClient {
    /// Builds a client whose every request carries the Trakt headers
    pub fn new(config: &TraktConfig, auth: &ApiAuth) -> Result<Self, MigrationError> {
        let headers = api_headers(&config.api_version, auth)?;
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|source| MigrationError::Network {
                url: config.api_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Adds movies and shows to the user's watch history
    pub async fn add_to_history(
        &self,
        payload: &HistoryPayload,
    ) -> Result<SyncResponse, MigrationError> {
        let url = format!("{}/sync/history", self.api_url);
        tracing::debug!(
            "POST {} ({} movies, {} shows)",
            url,
            payload.movies.len(),
            payload.shows.len()
        );

        let response = self
            .client
            .post(&url)
            .json(payload)
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
}

/// Headers required on every authenticated request
pub fn api_headers(api_version: &str, auth: &ApiAuth) -> Result<HeaderMap, MigrationError> {
    let invalid = |what: &str| MigrationError::AuthConfig(format!("{} is not a valid header value", what));

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", auth.access_token))
            .map_err(|_| invalid("access token"))?,
    );
    headers.insert(
        HeaderName::from_static(API_VERSION_HEADER),
        HeaderValue::from_str(api_version).map_err(|_| invalid("api version"))?,
    );
    headers.insert(
        HeaderName::from_static(API_KEY_HEADER),
        HeaderValue::from_str(&auth.client_id).map_err(|_| invalid("client id"))?,
    );

    Ok(headers)
}
