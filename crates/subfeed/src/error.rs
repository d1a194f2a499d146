use subfeed_core::reddit::auth::AuthError;
use subfeed_core::reddit::config::ConfigError;
use subfeed_core::reddit::FeedError;

#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize, PartialEq, Eq)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetching Reddit API access token: {0}")]
    CredentialExchange(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("No posts found")]
    NoPosts,

    #[error("Refresh cancelled: {0}")]
    Cancelled(String),
}

impl Error {
    /// Fatal errors abort initialization; the rest only discard one refresh cycle
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Config(_) | Error::CredentialExchange(_))
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        Error::CredentialExchange(err.to_string())
    }
}

impl From<FeedError> for Error {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::NoPosts => Error::NoPosts,
            FeedError::Decode(msg) => Error::Decode(msg),
        }
    }
}
