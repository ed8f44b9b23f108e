//! TinyPNG "shrink" API client.
//!
//! One upload per image: the encoded bytes are POSTed with HTTP basic auth
//! (credential as user name, empty password). A `201 Created` answer points
//! at the compressed result, which is then downloaded with the same
//! credential. Any other status is classified into a [`CompressionError`].

use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::LOCATION;
use serde::Deserialize;
use tracing::{debug, warn};

use devkit_core::application::{CompressionError, ports::ImageCompressor};

/// Public shrink endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.tinify.com/shrink";

/// Blocking client for the TinyPNG API.
#[derive(Debug, Clone)]
pub struct TinyPngClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

/// Error body returned by the service for non-2xx answers.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Body returned with `201 Created`.
#[derive(Debug, Deserialize)]
struct ShrinkBody {
    output: Option<ShrinkOutput>,
}

#[derive(Debug, Deserialize)]
struct ShrinkOutput {
    url: Option<String>,
}

impl TinyPngClient {
    /// Build a client for `endpoint` authenticating with `api_key`.
    ///
    /// Without a timeout, requests wait as long as the connection stays open.
    /// `None` also replaces the blocking client's own 30 second default.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, CompressionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CompressionError::Network {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn shrink(&self, payload: Vec<u8>) -> Result<String, CompressionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.api_key, None::<&str>)
            .body(payload)
            .send()
            .map_err(|e| CompressionError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.text().unwrap_or_default();

        if status != StatusCode::CREATED {
            return Err(classify_failure(status.as_u16(), &body));
        }

        result_url(location.as_deref(), &body).ok_or(CompressionError::MissingLocation)
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, CompressionError> {
        let response = self
            .client
            .get(url)
            .basic_auth(&self.api_key, None::<&str>)
            .send()
            .map_err(|e| CompressionError::Download {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompressionError::Download {
                message: format!("status {}", status.as_u16()),
            });
        }

        response
            .bytes()
            .map(|bytes| bytes.to_vec())
            .map_err(|e| CompressionError::Download {
                message: e.to_string(),
            })
    }
}

impl ImageCompressor for TinyPngClient {
    fn compress(&self, source: &Path) -> Result<Vec<u8>, CompressionError> {
        let payload = fs::read(source).map_err(|e| CompressionError::Io {
            message: format!("{}: {e}", source.display()),
        })?;
        debug!(source = %source.display(), bytes = payload.len(), "Uploading for compression");

        let url = self.shrink(payload).inspect_err(|e| {
            warn!(source = %source.display(), error = %e, "Compression request failed");
        })?;
        debug!(url = %url, "Downloading compressed result");

        self.download(&url)
    }
}

/// Map a non-201 answer to the error the user sees.
pub(crate) fn classify_failure(status: u16, body: &str) -> CompressionError {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok();
    let message = parsed
        .and_then(|b| match (b.error, b.message) {
            (Some(error), Some(message)) => Some(format!("{error}: {message}")),
            (error, message) => message.or(error),
        })
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        401 => CompressionError::Unauthorized,
        429 => CompressionError::RateLimited,
        400 => CompressionError::BadRequest { message },
        status => CompressionError::UnexpectedStatus { status, message },
    }
}

/// Where the compressed image can be fetched: the `Location` header, or
/// `output.url` from the JSON body.
pub(crate) fn result_url(location: Option<&str>, body: &str) -> Option<String> {
    location
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .or_else(|| {
            serde_json::from_str::<ShrinkBody>(body)
                .ok()?
                .output?
                .url
                .filter(|u| !u.is_empty())
        })
}
