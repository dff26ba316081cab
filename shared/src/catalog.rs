//! Reference catalog of selectable options.
//!
//! Fetched once per session and read-only afterwards. Ids arrive as numbers
//! but the form holds every value as a string, so lookups parse the
//! selected value before comparing.

use serde::{Deserialize, Serialize};

use crate::CatalogError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceCatalog {
    #[serde(rename = "assunto_processo", default)]
    pub subjects: Vec<Subject>,
    #[serde(rename = "reu_ajustado", default)]
    pub defendant_classes: Vec<DefendantClass>,
    #[serde(rename = "unidade_judiciaria", default)]
    pub judicial_units: Vec<JudicialUnit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(rename = "indice_assunto")]
    pub id: i64,
    #[serde(rename = "nome_assunto")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefendantClass {
    #[serde(rename = "indice_reu")]
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "classe", default)]
    pub classes: Vec<CaseClass>,
}

/// Entry of a defendant class's nested list. Only entries with a `classe_id`
/// can be selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseClass {
    #[serde(rename = "classe_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "nome_classe")]
    pub name: String,
    #[serde(rename = "indice_classe", default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudicialUnit {
    #[serde(rename = "indice_judiciaria")]
    pub id: i64,
    #[serde(rename = "nome_unidade_judiciaria")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn new(value: i64, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

fn parse_id(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

impl ReferenceCatalog {
    pub fn from_json(bytes: &[u8]) -> Result<Self, CatalogError> {
        serde_json::from_slice(bytes).map_err(|e| CatalogError::Malformed(e.to_string()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
            && self.defendant_classes.is_empty()
            && self.judicial_units.is_empty()
    }

    #[must_use]
    pub fn defendant_class(&self, id: &str) -> Option<&DefendantClass> {
        let id = parse_id(id)?;
        self.defendant_classes.iter().find(|d| d.id == id)
    }

    /// The class list governed by the defendant class `parent_id`.
    #[must_use]
    pub fn dependent_classes(&self, parent_id: &str) -> DependentClassList {
        let classes = self
            .defendant_class(parent_id)
            .map(|d| d.classes.clone())
            .unwrap_or_default();

        DependentClassList {
            parent_id: parent_id.to_string(),
            classes,
        }
    }

    #[must_use]
    pub fn subject_options(&self) -> Vec<SelectOption> {
        self.subjects
            .iter()
            .map(|s| SelectOption::new(s.id, &s.name))
            .collect()
    }

    #[must_use]
    pub fn defendant_class_options(&self) -> Vec<SelectOption> {
        self.defendant_classes
            .iter()
            .map(|d| SelectOption::new(d.id, &d.name))
            .collect()
    }

    #[must_use]
    pub fn judicial_unit_options(&self) -> Vec<SelectOption> {
        self.judicial_units
            .iter()
            .map(|u| SelectOption::new(u.id, &u.name))
            .collect()
    }
}

/// Derived view of the classes selectable under the current defendant class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentClassList {
    pub parent_id: String,
    pub classes: Vec<CaseClass>,
}

impl DependentClassList {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, class_id: &str) -> bool {
        match parse_id(class_id) {
            Some(id) => self.classes.iter().any(|c| c.id == Some(id)),
            None => false,
        }
    }

    #[must_use]
    pub fn options(&self) -> Vec<SelectOption> {
        self.classes
            .iter()
            .filter_map(|c| c.id.map(|id| SelectOption::new(id, &c.name)))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn sample_catalog() -> ReferenceCatalog {
        ReferenceCatalog::from_json(SAMPLE_JSON.as_bytes()).unwrap()
    }

    pub const SAMPLE_JSON: &str = r#"{
        "assunto_processo": [
            {"indice_assunto": 1, "nome_assunto": "Indenização por Dano Moral"},
            {"indice_assunto": 2, "nome_assunto": "Obrigação de Fazer"}
        ],
        "reu_ajustado": [
            {
                "indice_reu": 10,
                "nome": "Banco",
                "classe": [
                    {"classe_id": 100, "nome_classe": "Procedimento Comum Cível", "indice_classe": 0},
                    {"classe_id": 101, "nome_classe": "Juizado Especial Cível", "indice_classe": 1}
                ]
            },
            {
                "indice_reu": 20,
                "nome": "Companhia Aérea",
                "classe": [
                    {"classe_id": 200, "nome_classe": "Juizado Especial Cível"},
                    {"nome_classe": "Sem identificador"}
                ]
            }
        ],
        "unidade_judiciaria": [
            {"indice_judiciaria": 7, "nome_unidade_judiciaria": "1ª Vara Cível"}
        ]
    }"#;
}

#[cfg(test)]
mod tests {
    use super::fixtures::sample_catalog;
    use super::*;

    #[test]
    fn test_deserializes_wire_names() {
        let catalog = sample_catalog();
        assert_eq!(catalog.subjects.len(), 2);
        assert_eq!(catalog.defendant_classes.len(), 2);
        assert_eq!(catalog.judicial_units[0].name, "1ª Vara Cível");
        assert_eq!(catalog.defendant_classes[1].classes[1].id, None);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let catalog = ReferenceCatalog::from_json(br#"{"assunto_processo": []}"#).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_malformed_catalog() {
        let result = ReferenceCatalog::from_json(b"[1, 2, 3]");
        assert!(matches!(result, Err(CatalogError::Malformed(_))));
    }

    #[test]
    fn test_dependent_classes_for_parent() {
        let catalog = sample_catalog();
        let list = catalog.dependent_classes("10");
        assert_eq!(list.parent_id, "10");
        assert_eq!(list.classes, catalog.defendant_classes[0].classes);
        assert!(list.contains("101"));
        assert!(!list.contains("200"));
    }

    #[test]
    fn test_dependent_classes_unknown_or_empty_parent() {
        let catalog = sample_catalog();
        assert!(catalog.dependent_classes("").is_empty());
        assert!(catalog.dependent_classes("999").is_empty());
        assert!(catalog.dependent_classes("abc").is_empty());
    }

    #[test]
    fn test_options_skip_classes_without_id() {
        let catalog = sample_catalog();
        let options = catalog.dependent_classes("20").options();
        assert_eq!(
            options,
            vec![SelectOption {
                value: "200".into(),
                label: "Juizado Especial Cível".into()
            }]
        );
    }

    #[test]
    fn test_top_level_options() {
        let catalog = sample_catalog();
        assert_eq!(catalog.subject_options()[1].value, "2");
        assert_eq!(catalog.defendant_class_options()[0].label, "Banco");
        assert_eq!(catalog.judicial_unit_options()[0].value, "7");
    }
}
