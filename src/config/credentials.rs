//! Trakt credentials read from the environment
//!
//! Values come from the process environment, with a local `.env` file loaded
//! first when present. They are read once at startup and passed by reference
//! to whatever issues authenticated requests.

use crate::MigrationError;
use std::env;
use std::fmt;

pub const CLIENT_ID_VAR: &str = "TRAKT_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "TRAKT_CLIENT_SECRET";
pub const ACCESS_TOKEN_VAR: &str = "TRAKT_ACCESS_TOKEN";

/// Credential values as found at startup; blank values count as missing
#[derive(Clone, Default)]
pub struct Credentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub access_token: Option<String>,
}

/// What an authenticated API call needs
#[derive(Debug, Clone)]
pub struct ApiAuth {
    pub client_id: String,
    pub access_token: String,
}

/// What the OAuth code exchange needs
#[derive(Debug, Clone)]
pub struct OAuthClient {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    /// Reads credentials from `.env` and the process environment
    pub fn from_env() -> Self {
        // A missing .env file is fine; the variables may be exported directly
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads credentials through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            client_id: read(CLIENT_ID_VAR),
            client_secret: read(CLIENT_SECRET_VAR),
            access_token: read(ACCESS_TOKEN_VAR),
        }
    }

    /// Requires the client id and bearer token used by history writes
    pub fn require_api(&self) -> Result<ApiAuth, MigrationError> {
        Ok(ApiAuth {
            client_id: required(&self.client_id, CLIENT_ID_VAR)?,
            access_token: required(&self.access_token, ACCESS_TOKEN_VAR)?,
        })
    }

    /// Requires the client id and secret used by the token exchange
    pub fn require_oauth(&self) -> Result<OAuthClient, MigrationError> {
        Ok(OAuthClient {
            client_id: required(&self.client_id, CLIENT_ID_VAR)?,
            client_secret: required(&self.client_secret, CLIENT_SECRET_VAR)?,
        })
    }
}

fn required(value: &Option<String>, var: &str) -> Result<String, MigrationError> {
    value
        .clone()
        .ok_or_else(|| MigrationError::AuthConfig(format!("{} is not set", var)))
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "<set>" } else { "<missing>" };
        f.debug_struct("Credentials")
            .field("client_id", &mask(&self.client_id))
            .field("client_secret", &mask(&self.client_secret))
            .field("access_token", &mask(&self.access_token))
            .finish()
    }
}
