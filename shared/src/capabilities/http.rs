use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const MAX_URL_LENGTH: usize = 2048;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidatedUrl {
    url: String,
}

impl ValidatedUrl {
    pub fn new(url: impl Into<String>) -> Result<Self, HttpError> {
        let url = url.into();
        let parsed = Self::validate(&url)?;

        Ok(Self {
            url: parsed.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn has_query_or_fragment(&self) -> bool {
        Url::parse(&self.url)
            .map(|u| u.query().is_some() || u.fragment().is_some())
            .unwrap_or(false)
    }

    /// Appends `path` below this URL, keeping any path the URL already has.
    pub fn join(&self, path: &str) -> Result<Self, HttpError> {
        let base = self.url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Self::new(format!("{base}/{path}"))
    }

    fn validate(url: &str) -> Result<Url, HttpError> {
        if url.is_empty() {
            return Err(HttpError::InvalidUrl {
                url: String::new(),
                reason: "URL cannot be empty".to_string(),
            });
        }

        if url.len() > MAX_URL_LENGTH {
            return Err(HttpError::InvalidUrl {
                url: Self::truncate_url(url),
                reason: format!("URL exceeds maximum length of {MAX_URL_LENGTH} bytes"),
            });
        }

        if url.trim().is_empty() {
            return Err(HttpError::InvalidUrl {
                url: url.to_string(),
                reason: "URL cannot be only whitespace".to_string(),
            });
        }

        let parsed = Url::parse(url).map_err(|e| HttpError::InvalidUrl {
            url: Self::truncate_url(url),
            reason: e.to_string(),
        })?;

        let scheme = parsed.scheme().to_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(HttpError::InvalidUrl {
                url: Self::truncate_url(url),
                reason: format!(
                    "invalid scheme '{scheme}', only 'http' and 'https' are allowed"
                ),
            });
        }

        if parsed.host_str().is_none() {
            return Err(HttpError::InvalidUrl {
                url: Self::truncate_url(url),
                reason: "URL must have a host".to_string(),
            });
        }

        if !parsed.username().is_empty() || parsed.password().is_some() {
            return Err(HttpError::InvalidUrl {
                url: Self::truncate_url(url),
                reason: "credentials in URL are not allowed".to_string(),
            });
        }

        Ok(parsed)
    }

    fn truncate_url(url: &str) -> String {
        if url.len() <= 100 {
            url.to_string()
        } else {
            let cut = (0..=100).rev().find(|i| url.is_char_boundary(*i)).unwrap_or(0);
            format!("{}...", &url[..cut])
        }
    }
}

impl std::fmt::Display for ValidatedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url)
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum HttpError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{message}")]
    Transport { message: String },

    #[error("HTTP error {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("invalid response: {reason}")]
    InvalidResponse { reason: String },
}

impl From<crux_http::Error> for HttpError {
    fn from(e: crux_http::Error) -> Self {
        match e {
            // crux_http reports 4xx/5xx replies here, with the body attached.
            crux_http::Error::Http(e) => HttpError::HttpStatus {
                status: e.code.into(),
                body: String::from_utf8_lossy(e.body.as_deref().unwrap_or_default())
                    .into_owned(),
            },
            crux_http::Error::Json(reason) => HttpError::InvalidResponse { reason },
            crux_http::Error::Url(reason) => HttpError::InvalidUrl {
                url: String::new(),
                reason,
            },
            e @ (crux_http::Error::Io(_) | crux_http::Error::Timeout) => HttpError::Transport {
                message: e.to_string(),
            },
        }
    }
}

/// Collapses a resolved crux_http request into the raw body of a 2xx
/// response, or the error the rest of the core understands.
pub fn read_body(
    result: crux_http::Result<crux_http::Response<Vec<u8>>>,
) -> Result<Vec<u8>, HttpError> {
    let mut response = result?;
    let status = u16::from(response.status());
    let body = response.take_body().unwrap_or_default();
    if (200..300).contains(&status) {
        Ok(body)
    } else {
        Err(HttpError::HttpStatus {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}
