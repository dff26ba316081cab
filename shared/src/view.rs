//! View model handed to the shell.
//!
//! Built fresh on every render: the "already passed" check and the
//! remaining-time label depend on the clock at build time, not at the time
//! the prediction arrived.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::catalog::SelectOption;
use crate::form::{Field, FormFields, ValidationErrors};
use crate::model::{CatalogStatus, Model, ToastKind, ToastMessage};
use crate::prediction::PredictionResult;

/// Static description of one input, so the shell can lay the form out.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldView {
    pub field: Field,
    pub label: String,
    pub required: bool,
    pub is_date: bool,
}

impl From<Field> for FieldView {
    fn from(field: Field) -> Self {
        Self {
            field,
            label: field.label().to_string(),
            required: field.is_required(),
            is_date: field.is_date(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FormView {
    pub fields: Vec<FieldView>,
    pub values: FormFields,
    pub errors: ValidationErrors,
    pub defendant_class_options: Vec<SelectOption>,
    pub class_options: Vec<SelectOption>,
    pub subject_options: Vec<SelectOption>,
    pub judicial_unit_options: Vec<SelectOption>,
    pub is_submitting: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ResultView {
    pub total_duration: String,
    pub remaining: String,
    pub target_date: String,
    pub target_date_iso: String,
    pub is_past: bool,
}

impl ResultView {
    #[must_use]
    pub fn build(result: &PredictionResult, now: NaiveDateTime) -> Self {
        Self {
            total_duration: result.total_duration_label(),
            remaining: result.remaining_label(now),
            target_date: result.target_date_label(),
            target_date_iso: result.target_date.to_string(),
            is_past: result.is_past(now),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToastView {
    pub message: String,
    pub kind: ToastKind,
    pub duration_ms: u64,
}

impl From<&ToastMessage> for ToastView {
    fn from(t: &ToastMessage) -> Self {
        Self {
            message: t.message.clone(),
            kind: t.kind,
            duration_ms: t.duration_ms,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub form: FormView,
    pub result: Option<ResultView>,
    pub toast: Option<ToastView>,
    pub catalog_status: CatalogStatus,
}

/// `now` is local wall-clock time for date comparisons; `now_ms` is the
/// epoch clock toasts are stamped with.
#[must_use]
pub fn build_view(model: &Model, now: NaiveDateTime, now_ms: u64) -> ViewModel {
    let form = FormView {
        fields: Field::ALL.into_iter().map(FieldView::from).collect(),
        values: model.form.fields.clone(),
        errors: model.form.errors.clone(),
        defendant_class_options: model.catalog.defendant_class_options(),
        class_options: model.form.dependent_classes.options(),
        subject_options: model.catalog.subject_options(),
        judicial_unit_options: model.catalog.judicial_unit_options(),
        is_submitting: model.submissions.is_submitting(),
    };

    ViewModel {
        form,
        result: model.result.as_ref().map(|r| ResultView::build(r, now)),
        toast: model
            .active_toast
            .as_ref()
            .filter(|t| !t.is_expired(now_ms))
            .map(ToastView::from),
        catalog_status: model.catalog_status,
    }
}
