use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::ReferenceCatalog;
use crate::config::ServiceConfig;
use crate::form::Field;
use crate::{CatalogError, PredictionError};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub enum Event {
    #[default]
    Noop,

    AppStarted {
        config: ServiceConfig,
    },

    FieldChanged {
        field: Field,
        value: String,
    },
    SubmitRequested,
    ClearRequested,
    DismissToast,

    // Resolved effects, fed back by the capabilities.
    CatalogLoaded {
        result: Result<ReferenceCatalog, CatalogError>,
    },
    PredictionReceived {
        seq: u64,
        start_date: NaiveDate,
        result: Result<f64, PredictionError>,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::AppStarted { .. } => "app_started",
            Self::FieldChanged { .. } => "field_changed",
            Self::SubmitRequested => "submit_requested",
            Self::ClearRequested => "clear_requested",
            Self::DismissToast => "dismiss_toast",
            Self::CatalogLoaded { .. } => "catalog_loaded",
            Self::PredictionReceived { .. } => "prediction_received",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::FieldChanged { .. }
                | Self::SubmitRequested
                | Self::ClearRequested
                | Self::DismissToast
        )
    }
}
