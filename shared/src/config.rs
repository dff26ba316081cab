use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capabilities::{HttpError, ValidatedUrl};

pub const DEFAULT_CATALOG_PATH: &str = "/form/data";
pub const DEFAULT_PREDICTION_PATH: &str = "/form/prediction";

/// Service location handed over by the shell at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
    #[serde(default = "default_prediction_path")]
    pub prediction_path: String,
}

fn default_catalog_path() -> String {
    DEFAULT_CATALOG_PATH.to_string()
}

fn default_prediction_path() -> String {
    DEFAULT_PREDICTION_PATH.to_string()
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            catalog_path: default_catalog_path(),
            prediction_path: default_prediction_path(),
        }
    }

    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        let base = ValidatedUrl::new(self.base_url.trim()).map_err(ConfigError::BaseUrl)?;
        if base.has_query_or_fragment() {
            return Err(ConfigError::BaseUrlHasQuery(base.to_string()));
        }

        Ok(Endpoints {
            catalog: Self::endpoint(&base, &self.catalog_path)?,
            prediction: Self::endpoint(&base, &self.prediction_path)?,
        })
    }

    fn endpoint(base: &ValidatedUrl, path: &str) -> Result<ValidatedUrl, ConfigError> {
        if path.trim().is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        base.join(path.trim()).map_err(ConfigError::BaseUrl)
    }
}

/// Fully resolved request URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub catalog: ValidatedUrl,
    pub prediction: ValidatedUrl,
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("invalid base URL: {0}")]
    BaseUrl(HttpError),

    #[error("base URL must not carry a query or fragment: {0}")]
    BaseUrlHasQuery(String),

    #[error("endpoint path cannot be empty")]
    EmptyPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let endpoints = ServiceConfig::new("https://api.example.com").endpoints().unwrap();
        assert_eq!(endpoints.catalog.as_str(), "https://api.example.com/form/data");
        assert_eq!(
            endpoints.prediction.as_str(),
            "https://api.example.com/form/prediction"
        );
    }

    #[test]
    fn test_paths_default_when_missing_from_json() {
        let config: ServiceConfig =
            serde_json::from_str(r#"{"base_url": "https://api.example.com/v2"}"#).unwrap();
        assert_eq!(config.catalog_path, DEFAULT_CATALOG_PATH);

        let endpoints = config.endpoints().unwrap();
        assert_eq!(endpoints.prediction.as_str(), "https://api.example.com/v2/form/prediction");
    }

    #[test]
    fn test_custom_paths() {
        let config = ServiceConfig {
            base_url: "https://api.example.com/".into(),
            catalog_path: "dados".into(),
            prediction_path: "/predicao".into(),
        };
        let endpoints = config.endpoints().unwrap();
        assert_eq!(endpoints.catalog.as_str(), "https://api.example.com/dados");
        assert_eq!(endpoints.prediction.as_str(), "https://api.example.com/predicao");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ServiceConfig::new("api.example.com").endpoints();
        assert!(matches!(result, Err(ConfigError::BaseUrl(_))));

        let result = ServiceConfig::new("").endpoints();
        assert!(matches!(result, Err(ConfigError::BaseUrl(_))));
    }

    #[test]
    fn test_query_rejected() {
        let result = ServiceConfig::new("https://api.example.com/?token=x").endpoints();
        assert!(matches!(result, Err(ConfigError::BaseUrlHasQuery(_))));
    }

    #[test]
    fn test_empty_path_rejected() {
        let mut config = ServiceConfig::new("https://api.example.com");
        config.prediction_path = "  ".into();
        assert_eq!(config.endpoints(), Err(ConfigError::EmptyPath));
    }
}
