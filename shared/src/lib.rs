// lib.rs - Case-duration prediction core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod capabilities;
pub mod catalog;
pub mod config;
pub mod event;
pub mod form;
pub mod model;
pub mod prediction;
pub mod view;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub use app::App;
pub use capabilities::{Capabilities, Effect, HttpError};
pub use catalog::{
    CaseClass, DefendantClass, DependentClassList, JudicialUnit, ReferenceCatalog, Subject,
};
pub use config::{ConfigError, Endpoints, ServiceConfig};
pub use event::Event;
pub use form::{Field, FormFields, FormState, ValidationErrors};
pub use model::{CatalogStatus, Model, SubmissionTracker, ToastKind, ToastMessage};
pub use prediction::PredictionResult;
pub use view::ViewModel;

pub const MIN_CASE_NUMBER_LEN: usize = 20;
pub const MINUTES_PER_MONTH: f64 = 43_200.0;
pub const ELAPSED_LABEL: &str = "0 meses";
pub const PREDICTION_SUCCESS_MESSAGE: &str = "Predição concluída! 🚀";
pub const NOT_CONFIGURED_MESSAGE: &str = "Serviço de predição não configurado.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Validation,
    Configuration,
    Network,
    Rejected,
    Deserialization,
    Serialization,
    DateOutOfRange,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Configuration => "CONFIGURATION_ERROR",
            Self::Network => "NETWORK_ERROR",
            Self::Rejected => "REQUEST_REJECTED",
            Self::Deserialization => "DESERIALIZATION_ERROR",
            Self::Serialization => "SERIALIZATION_ERROR",
            Self::DateOutOfRange => "DATE_OUT_OF_RANGE",
        }
    }
}

/// Error shape surfaced to the shell.
///
/// Every concern-specific error converts into this, keeping the message that
/// should be shown to the user next to a stable machine-readable code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// The text for an error toast. Rejections from the prediction service
    /// carry the response payload, which is shown as-is.
    #[must_use]
    pub fn user_facing_message(&self) -> String {
        self.message.clone()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)
    }
}

impl std::error::Error for AppError {}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] HttpError),

    #[error("malformed reference catalog: {0}")]
    Malformed(String),
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        let kind = match &e {
            CatalogError::Http(http) => http_error_kind(http),
            CatalogError::Malformed(_) => ErrorKind::Deserialization,
        };
        AppError::new(kind, e.to_string())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
pub enum PredictionError {
    #[error("{0}")]
    Http(#[from] HttpError),

    #[error("unexpected prediction payload: {0}")]
    MalformedResponse(String),

    #[error("prediction is not a finite number")]
    NonFinite,

    #[error("start date {start} plus {months} months is out of range")]
    DateOutOfRange { start: String, months: f64 },

    #[error("could not serialize prediction request: {0}")]
    Serialization(String),

    #[error("{}", NOT_CONFIGURED_MESSAGE)]
    NotConfigured,
}

impl From<PredictionError> for AppError {
    fn from(e: PredictionError) -> Self {
        match e {
            // The service's own error payload is what the user sees.
            PredictionError::Http(HttpError::HttpStatus { status, body }) => {
                let message = if body.trim().is_empty() {
                    format!("Erro {status}")
                } else {
                    body
                };
                AppError::new(ErrorKind::Rejected, message)
                    .with_context("http_status", status.to_string())
            }
            PredictionError::Http(http) => AppError::new(http_error_kind(&http), http.to_string()),
            PredictionError::MalformedResponse(_) | PredictionError::NonFinite => {
                AppError::new(ErrorKind::Deserialization, e.to_string())
            }
            PredictionError::DateOutOfRange { .. } => {
                AppError::new(ErrorKind::DateOutOfRange, e.to_string())
            }
            PredictionError::Serialization(_) => {
                AppError::new(ErrorKind::Serialization, e.to_string())
            }
            PredictionError::NotConfigured => {
                AppError::new(ErrorKind::Configuration, e.to_string())
            }
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::new(ErrorKind::Configuration, e.to_string())
    }
}

fn http_error_kind(error: &HttpError) -> ErrorKind {
    match error {
        HttpError::InvalidUrl { .. } => ErrorKind::Configuration,
        HttpError::Transport { .. } => ErrorKind::Network,
        HttpError::HttpStatus { .. } => ErrorKind::Rejected,
        HttpError::InvalidResponse { .. } => ErrorKind::Deserialization,
    }
}

#[must_use]
pub fn get_current_time_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}
