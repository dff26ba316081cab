use chrono::{Local, NaiveDate};
use tracing::{debug, error, info, warn};

use crate::capabilities::{read_body, Capabilities};
use crate::catalog::ReferenceCatalog;
use crate::config::Endpoints;
use crate::event::Event;
use crate::model::{CatalogStatus, Model, ToastKind};
use crate::prediction::{parse_months, PredictionResult};
use crate::view::{build_view, ViewModel};
use crate::{
    get_current_time_ms, AppError, CatalogError, PredictionError, PREDICTION_SUCCESS_MESSAGE,
};

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

#[derive(Default)]
pub struct App;

impl App {
    fn fetch_catalog(endpoints: &Endpoints, caps: &Capabilities) {
        caps.http
            .get(endpoints.catalog.as_str())
            .header("Accept", "application/json")
            .send(|result| Event::CatalogLoaded {
                result: read_body(result)
                    .map_err(CatalogError::from)
                    .and_then(|body| ReferenceCatalog::from_json(&body)),
            });
    }

    fn send_prediction_request(
        seq: u64,
        start_date: NaiveDate,
        model: &Model,
        caps: &Capabilities,
    ) -> Result<(), PredictionError> {
        let endpoints = model
            .endpoints
            .as_ref()
            .ok_or(PredictionError::NotConfigured)?;

        let body = serde_json::to_vec(&model.form.fields)
            .map_err(|e| PredictionError::Serialization(e.to_string()))?;

        let request_id = uuid::Uuid::new_v4().to_string();
        debug!(seq, request_id = %request_id, "sending prediction request");

        caps.http
            .post(endpoints.prediction.as_str())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header(REQUEST_ID_HEADER, request_id.as_str())
            .body(body)
            .send(move |result| Event::PredictionReceived {
                seq,
                start_date,
                result: read_body(result)
                    .map_err(PredictionError::from)
                    .and_then(|body| parse_months(&body)),
            });

        Ok(())
    }

    fn submit(model: &mut Model, caps: &Capabilities) {
        if !model.form.validate_in_place() {
            debug!(
                invalid_fields = model.form.errors.len(),
                "submission blocked by validation"
            );
            return;
        }

        let Some(start_date) = model.form.start_date() else {
            // validate_in_place already rejects unparseable start dates
            return;
        };

        let seq = model.submissions.begin();
        if let Err(e) = Self::send_prediction_request(seq, start_date, model, caps) {
            model.submissions.finish(seq);
            let err = AppError::from(e);
            error!(seq, code = err.code(), error = %err, "could not send prediction request");
            model.show_toast(err.user_facing_message(), ToastKind::Error);
        }
    }

    fn apply_prediction(
        model: &mut Model,
        seq: u64,
        start_date: NaiveDate,
        result: Result<f64, PredictionError>,
    ) {
        if !model.submissions.finish(seq) {
            warn!(seq, "response for a submission that was not in flight");
        }

        if model.submissions.is_discarded(seq) {
            debug!(seq, "dropping response to a submission made before the form was cleared");
            return;
        }

        match result.and_then(|months| PredictionResult::derive(months, start_date)) {
            Ok(prediction) => {
                if model.submissions.record_applied(seq) {
                    warn!(seq, "prediction responses arrived out of order, showing the latest");
                }
                info!(
                    seq,
                    months = prediction.months,
                    target_date = %prediction.target_date,
                    "prediction applied"
                );
                model.result = Some(prediction);
                model.show_toast(PREDICTION_SUCCESS_MESSAGE, ToastKind::Success);
            }
            Err(e) => {
                let err = AppError::from(e);
                warn!(seq, code = err.code(), error = %err, "prediction request failed");
                model.show_toast(err.user_facing_message(), ToastKind::Error);
            }
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        let event_name = event.name();
        if event.is_user_initiated() {
            debug!(event = event_name, "user action");
        } else {
            debug!(event = event_name, "handling event");
        }

        match event {
            Event::Noop => {}

            Event::AppStarted { config } => {
                if model.catalog_status.is_requested() {
                    debug!("catalog already requested, ignoring repeated start");
                    return;
                }

                match config.endpoints() {
                    Ok(endpoints) => {
                        model.catalog_status = CatalogStatus::Loading;
                        Self::fetch_catalog(&endpoints, caps);
                        model.endpoints = Some(endpoints);
                    }
                    Err(e) => {
                        error!(
                            error = %e,
                            base_url = %config.base_url,
                            "invalid service configuration"
                        );
                        model.catalog_status = CatalogStatus::Failed;
                        model.endpoints = None;
                    }
                }

                caps.render.render();
            }

            Event::CatalogLoaded { result } => {
                match result {
                    Ok(catalog) => {
                        info!(
                            subjects = catalog.subjects.len(),
                            defendant_classes = catalog.defendant_classes.len(),
                            judicial_units = catalog.judicial_units.len(),
                            "reference catalog loaded"
                        );
                        model.apply_catalog(catalog);
                    }
                    Err(e) => {
                        // Not surfaced to the user: the dropdowns just stay empty.
                        error!(error = %e, "failed to load reference catalog");
                        model.catalog_status = CatalogStatus::Failed;
                    }
                }

                caps.render.render();
            }

            Event::FieldChanged { field, value } => {
                model.set_field(field, value);
                caps.render.render();
            }

            Event::SubmitRequested => {
                Self::submit(model, caps);
                caps.render.render();
            }

            Event::PredictionReceived {
                seq,
                start_date,
                result,
            } => {
                Self::apply_prediction(model, seq, start_date, result);
                caps.render.render();
            }

            Event::ClearRequested => {
                model.reset();
                caps.render.render();
            }

            Event::DismissToast => {
                model.clear_toast();
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        build_view(model, Local::now().naive_local(), get_current_time_ms())
    }
}
