//! Form state: field values, validation and the dependent class list.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::{DependentClassList, ReferenceCatalog};
use crate::MIN_CASE_NUMBER_LEN;

pub const REQUIRED_MESSAGE: &str = "Campo Obrigatório";
pub const INVALID_CASE_NUMBER_MESSAGE: &str = "Número de processo inválido.";
pub const CLASS_MISMATCH_MESSAGE: &str = "Classe não pertence ao réu selecionado.";
pub const INVALID_DATE_MESSAGE: &str = "Data inválida.";

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "numProcesso")]
    CaseNumber,
    #[serde(rename = "reuAjustado")]
    DefendantClass,
    #[serde(rename = "classeReu")]
    CaseClass,
    #[serde(rename = "assuntoProcesso")]
    Subject,
    #[serde(rename = "unidadeJuridica")]
    JudicialUnit,
    #[serde(rename = "dataInicio")]
    StartDate,
    #[serde(rename = "dataResposta")]
    ResponseDate,
    #[serde(rename = "dataConclusao")]
    ConclusionDate,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::CaseNumber,
        Field::DefendantClass,
        Field::CaseClass,
        Field::Subject,
        Field::JudicialUnit,
        Field::StartDate,
        Field::ResponseDate,
        Field::ConclusionDate,
    ];

    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::CaseNumber => "numProcesso",
            Self::DefendantClass => "reuAjustado",
            Self::CaseClass => "classeReu",
            Self::Subject => "assuntoProcesso",
            Self::JudicialUnit => "unidadeJuridica",
            Self::StartDate => "dataInicio",
            Self::ResponseDate => "dataResposta",
            Self::ConclusionDate => "dataConclusao",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CaseNumber => "Número de processo",
            Self::DefendantClass => "Réu ajustado",
            Self::CaseClass => "Classe réu",
            Self::Subject => "Assunto do processo",
            Self::JudicialUnit => "Unidade judiciaria",
            Self::StartDate => "Data início de cumprimento",
            Self::ResponseDate => "Data de resposta",
            Self::ConclusionDate => "Data conclusão para a sentença",
        }
    }

    #[must_use]
    pub const fn is_required(self) -> bool {
        !matches!(self, Self::CaseNumber | Self::ConclusionDate)
    }

    #[must_use]
    pub const fn is_date(self) -> bool {
        matches!(
            self,
            Self::StartDate | Self::ResponseDate | Self::ConclusionDate
        )
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Field values as typed by the user. Serializes to the prediction request
/// payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    #[serde(rename = "reuAjustado")]
    pub defendant_class_id: String,
    #[serde(rename = "classeReu")]
    pub class_id: String,
    #[serde(rename = "assuntoProcesso")]
    pub subject_id: String,
    #[serde(rename = "unidadeJuridica")]
    pub judicial_unit_id: String,
    #[serde(rename = "dataInicio")]
    pub start_date: String,
    #[serde(rename = "dataResposta")]
    pub response_date: String,
    #[serde(rename = "dataConclusao")]
    pub conclusion_date: String,
    #[serde(rename = "numProcesso")]
    pub case_number: String,
}

impl FormFields {
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::CaseNumber => &self.case_number,
            Field::DefendantClass => &self.defendant_class_id,
            Field::CaseClass => &self.class_id,
            Field::Subject => &self.subject_id,
            Field::JudicialUnit => &self.judicial_unit_id,
            Field::StartDate => &self.start_date,
            Field::ResponseDate => &self.response_date,
            Field::ConclusionDate => &self.conclusion_date,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::CaseNumber => &mut self.case_number,
            Field::DefendantClass => &mut self.defendant_class_id,
            Field::CaseClass => &mut self.class_id,
            Field::Subject => &mut self.subject_id,
            Field::JudicialUnit => &mut self.judicial_unit_id,
            Field::StartDate => &mut self.start_date,
            Field::ResponseDate => &mut self.response_date,
            Field::ConclusionDate => &mut self.conclusion_date,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// The form as one unit: values, last validation result, and the class list
/// derived from the selected defendant class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub fields: FormFields,
    pub errors: ValidationErrors,
    pub dependent_classes: DependentClassList,
}

impl FormState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `value` to `field`. Selecting a defendant class rebuilds the
    /// dependent class list and clears the class selection.
    pub fn set_field(
        &mut self,
        field: Field,
        value: impl Into<String>,
        catalog: &ReferenceCatalog,
    ) {
        *self.fields.slot(field) = value.into();

        if field == Field::DefendantClass {
            self.fields.class_id.clear();
            self.refresh_dependent_classes(catalog);
        }
    }

    /// Rebuilds the dependent class list from the current defendant class.
    pub fn refresh_dependent_classes(&mut self, catalog: &ReferenceCatalog) {
        self.dependent_classes = catalog.dependent_classes(&self.fields.defendant_class_id);
    }

    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        for field in Field::ALL {
            let value = self.fields.get(field);

            if value.is_empty() {
                if field.is_required() {
                    errors.insert(field, REQUIRED_MESSAGE);
                }
                continue;
            }

            match field {
                Field::CaseNumber if value.chars().count() < MIN_CASE_NUMBER_LEN => {
                    errors.insert(field, INVALID_CASE_NUMBER_MESSAGE);
                }
                Field::CaseClass if !self.dependent_classes.contains(value) => {
                    errors.insert(field, CLASS_MISMATCH_MESSAGE);
                }
                Field::StartDate | Field::ResponseDate if parse_date(value).is_none() => {
                    errors.insert(field, INVALID_DATE_MESSAGE);
                }
                _ => {}
            }
        }

        errors
    }

    /// Runs `validate` and keeps the outcome for display.
    pub fn validate_in_place(&mut self) -> bool {
        self.errors = self.validate();
        self.errors.is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn start_date(&self) -> Option<NaiveDate> {
        parse_date(&self.fields.start_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::sample_catalog;
    use proptest::prelude::*;

    fn filled_form(catalog: &ReferenceCatalog) -> FormState {
        let mut form = FormState::new();
        form.set_field(Field::DefendantClass, "10", catalog);
        form.set_field(Field::CaseClass, "101", catalog);
        form.set_field(Field::Subject, "1", catalog);
        form.set_field(Field::JudicialUnit, "7", catalog);
        form.set_field(Field::StartDate, "2024-01-15", catalog);
        form.set_field(Field::ResponseDate, "2024-02-01", catalog);
        form
    }

    #[test]
    fn test_filled_form_is_valid() {
        let catalog = sample_catalog();
        let form = filled_form(&catalog);
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_empty_form_flags_every_required_field() {
        let form = FormState::new();
        let errors = form.validate();

        let required: Vec<Field> = Field::ALL.into_iter().filter(|f| f.is_required()).collect();
        assert_eq!(errors.fields().collect::<Vec<_>>(), required);
        assert!(errors.iter().all(|(_, m)| m == REQUIRED_MESSAGE));
        assert!(!errors.contains(Field::CaseNumber));
        assert!(!errors.contains(Field::ConclusionDate));
    }

    #[test]
    fn test_validate_does_not_mutate() {
        let catalog = sample_catalog();
        let form = filled_form(&catalog);
        let before = form.clone();
        let _ = form.validate();
        assert_eq!(form, before);
    }

    #[test]
    fn test_short_case_number_flagged() {
        let catalog = sample_catalog();
        let mut form = filled_form(&catalog);
        form.set_field(Field::CaseNumber, "0001234-56.2024", &catalog);

        let errors = form.validate();
        assert_eq!(errors.get(Field::CaseNumber), Some(INVALID_CASE_NUMBER_MESSAGE));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_full_case_number_accepted() {
        let catalog = sample_catalog();
        let mut form = filled_form(&catalog);
        form.set_field(Field::CaseNumber, "0001234-56.2024.8.26.0100", &catalog);
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_conclusion_date_unconstrained() {
        let catalog = sample_catalog();
        let mut form = filled_form(&catalog);
        form.set_field(Field::ConclusionDate, "não sei", &catalog);
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_malformed_start_date_flagged() {
        let catalog = sample_catalog();
        let mut form = filled_form(&catalog);
        form.set_field(Field::StartDate, "15/01/2024", &catalog);
        assert_eq!(form.validate().get(Field::StartDate), Some(INVALID_DATE_MESSAGE));
        assert_eq!(form.start_date(), None);
    }

    #[test]
    fn test_changing_defendant_class_resets_class() {
        let catalog = sample_catalog();
        let mut form = filled_form(&catalog);
        assert_eq!(form.fields.class_id, "101");

        form.set_field(Field::DefendantClass, "20", &catalog);

        assert_eq!(form.fields.class_id, "");
        assert_eq!(form.dependent_classes.parent_id, "20");
        assert_eq!(form.dependent_classes.classes, catalog.defendant_classes[1].classes);
    }

    #[test]
    fn test_class_outside_dependent_list_flagged() {
        let catalog = sample_catalog();
        let mut form = filled_form(&catalog);
        form.set_field(Field::CaseClass, "200", &catalog);
        assert_eq!(form.validate().get(Field::CaseClass), Some(CLASS_MISMATCH_MESSAGE));
    }

    #[test]
    fn test_set_field_keeps_previous_errors() {
        let catalog = sample_catalog();
        let mut form = FormState::new();
        assert!(!form.validate_in_place());

        form.set_field(Field::Subject, "1", &catalog);
        assert!(form.errors.contains(Field::Subject));
    }

    #[test]
    fn test_reset_then_validate_is_empty_state() {
        let catalog = sample_catalog();
        let mut form = filled_form(&catalog);
        form.set_field(Field::CaseNumber, "curto", &catalog);
        form.validate_in_place();

        form.reset();

        assert!(form.fields.is_empty());
        assert!(form.errors.is_empty());
        assert!(form.dependent_classes.is_empty());

        let errors = form.validate();
        for field in Field::ALL.into_iter().filter(|f| f.is_required()) {
            assert_eq!(errors.get(field), Some(REQUIRED_MESSAGE));
        }

        form.reset();
        assert_eq!(form.validate(), errors);
    }

    #[test]
    fn test_payload_uses_wire_names() {
        let catalog = sample_catalog();
        let form = filled_form(&catalog);
        let json = serde_json::to_value(&form.fields).unwrap();

        assert_eq!(json["reuAjustado"], "10");
        assert_eq!(json["classeReu"], "101");
        assert_eq!(json["assuntoProcesso"], "1");
        assert_eq!(json["unidadeJuridica"], "7");
        assert_eq!(json["dataInicio"], "2024-01-15");
        assert_eq!(json["dataResposta"], "2024-02-01");
        assert_eq!(json["dataConclusao"], "");
        assert_eq!(json["numProcesso"], "");
    }

    #[test]
    fn test_errors_serialize_by_wire_name() {
        let mut errors = ValidationErrors::new();
        errors.insert(Field::StartDate, REQUIRED_MESSAGE);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["dataInicio"], REQUIRED_MESSAGE);
    }

    fn required_field() -> impl Strategy<Value = Field> {
        prop::sample::select(
            Field::ALL
                .into_iter()
                .filter(|f| f.is_required())
                .collect::<Vec<_>>(),
        )
    }

    proptest! {
        #[test]
        fn clearing_a_required_field_is_always_flagged(field in required_field()) {
            let catalog = sample_catalog();
            let mut form = filled_form(&catalog);
            *form.fields.slot(field) = String::new();

            let errors = form.validate();
            prop_assert_eq!(errors.get(field), Some(REQUIRED_MESSAGE));
        }

        #[test]
        fn short_case_numbers_are_always_flagged(number in "[0-9.-]{1,19}") {
            let catalog = sample_catalog();
            let mut form = filled_form(&catalog);
            form.set_field(Field::CaseNumber, number, &catalog);

            prop_assert!(form.validate().contains(Field::CaseNumber));
        }

        #[test]
        fn long_case_numbers_are_never_flagged(number in "[0-9.-]{20,30}") {
            let catalog = sample_catalog();
            let mut form = filled_form(&catalog);
            form.set_field(Field::CaseNumber, number, &catalog);

            prop_assert!(!form.validate().contains(Field::CaseNumber));
        }
    }
}
