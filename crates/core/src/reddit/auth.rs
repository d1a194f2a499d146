//! Client-credentials token exchange: request shape and response parsing.

use serde::{Deserialize, Serialize};

use super::config::Credentials;
use super::request::app_user_agent;
use super::AccessToken;

pub const ACCESS_TOKEN_PATH: &str = "/api/v1/access_token";
pub const GRANT_TYPE: &str = "client_credentials";

/// Token endpoint response
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    /// Lifetime in seconds; reported but not acted upon
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub scope: String,
}

/// Error type for the token exchange
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unmarshalling token response: {0}")]
    Decode(String),
}

/// Form body and headers of the token request, minus the Basic credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    pub path: &'static str,
    pub form: Vec<(&'static str, &'static str)>,
    pub user_agent: String,
    pub username: String,
    pub password: String,
}

/// Describe the token request for complete credentials, `None` otherwise
pub fn token_request(credentials: &Credentials) -> Option<TokenRequest> {
    if !credentials.is_complete() {
        return None;
    }

    Some(TokenRequest {
        path: ACCESS_TOKEN_PATH,
        form: vec![("grant_type", GRANT_TYPE)],
        user_agent: app_user_agent(&credentials.app_name),
        username: credentials.client_id.clone(),
        password: credentials.client_secret.clone(),
    })
}

/// Interpret the token endpoint's status and body
pub fn parse_token_response(status: u16, body: &str) -> Result<(AccessToken, TokenResponse), AuthError> {
    if status != 200 {
        return Err(AuthError::Status {
            status,
            body: body.to_string(),
        });
    }

    let response: TokenResponse =
        serde_json::from_str(body).map_err(|e| AuthError::Decode(e.to_string()))?;

    Ok((AccessToken::new(response.access_token.clone()), response))
}
