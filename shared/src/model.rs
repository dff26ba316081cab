use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::ReferenceCatalog;
use crate::config::Endpoints;
use crate::form::{Field, FormState};
use crate::prediction::PredictionResult;
use crate::get_current_time_ms;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogStatus {
    #[default]
    NotRequested,
    Loading,
    Loaded,
    Failed,
}

impl CatalogStatus {
    #[must_use]
    pub const fn is_requested(self) -> bool {
        matches!(self, Self::Loading | Self::Loaded)
    }
}

/// Bookkeeping for prediction requests. Requests are never cancelled, so
/// several may be in flight; whichever response arrives last wins, except
/// for responses to submissions made before the last clear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionTracker {
    next_seq: u64,
    in_flight: BTreeSet<u64>,
    last_applied: Option<u64>,
    discard_through: u64,
}

impl SubmissionTracker {
    pub fn begin(&mut self) -> u64 {
        self.next_seq += 1;
        self.in_flight.insert(self.next_seq);
        self.next_seq
    }

    /// Returns false when `seq` was not in flight.
    pub fn finish(&mut self, seq: u64) -> bool {
        self.in_flight.remove(&seq)
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        !self.in_flight.is_empty()
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn discard_pending(&mut self) {
        self.discard_through = self.next_seq;
    }

    #[must_use]
    pub fn is_discarded(&self, seq: u64) -> bool {
        seq <= self.discard_through
    }

    /// Records `seq` as the displayed result. Returns true when a newer
    /// submission had already been applied.
    pub fn record_applied(&mut self, seq: u64) -> bool {
        let out_of_order = self.last_applied.is_some_and(|last| seq < last);
        self.last_applied = Some(seq);
        out_of_order
    }

    #[must_use]
    pub fn last_applied(&self) -> Option<u64> {
        self.last_applied
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub endpoints: Option<Endpoints>,
    pub catalog: ReferenceCatalog,
    pub catalog_status: CatalogStatus,
    pub form: FormState,
    pub result: Option<PredictionResult>,
    pub submissions: SubmissionTracker,
    pub active_toast: Option<ToastMessage>,
}

impl Model {
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.set_field(field, value, &self.catalog);
    }

    pub fn apply_catalog(&mut self, catalog: ReferenceCatalog) {
        self.catalog = catalog;
        self.catalog_status = CatalogStatus::Loaded;
        self.form.refresh_dependent_classes(&self.catalog);
    }

    /// Clears the form and the displayed result. The catalog stays.
    pub fn reset(&mut self) {
        self.form.reset();
        self.result = None;
        self.submissions.discard_pending();
    }

    pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.active_toast = Some(ToastMessage::new(message, kind));
    }

    pub fn clear_toast(&mut self) {
        self.active_toast = None;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastMessage {
    pub message: String,
    pub kind: ToastKind,
    pub created_at_ms: u64,
    pub duration_ms: u64,
}

impl ToastMessage {
    #[must_use]
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            created_at_ms: get_current_time_ms(),
            duration_ms: kind.default_duration_ms(),
        }
    }

    #[must_use]
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.created_at_ms) > self.duration_ms
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    #[must_use]
    pub const fn default_duration_ms(self) -> u64 {
        match self {
            Self::Success => 2000,
            Self::Error => 5000,
        }
    }
}
