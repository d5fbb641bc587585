use thiserror::Error;

use kihsa_core::errors::ApplicationError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid api base url `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
}

impl From<ClientError> for ApplicationError {
    fn from(value: ClientError) -> Self {
        match value {
            ClientError::InvalidBaseUrl { .. } | ClientError::Build(_) => {
                Self::Configuration(value.to_string())
            }
            _ => Self::Integration(value.to_string()),
        }
    }
}
