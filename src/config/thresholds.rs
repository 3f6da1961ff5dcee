use crate::core::{format_number, parse_number};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One entry of a regulatory threshold table as written in a profile.
///
/// Regulations mix numeric maxima with narrative limits ("virtually
/// absent"), so both forms are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThresholdEntry {
    Number(f64),
    Text(String),
}

/// Result of looking up the limit for a (class, parameter) pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Limit {
    /// A numeric maximum permissible value
    Value(f64),
    /// The class or the parameter has no entry in the table
    Undefined,
    /// An entry exists but does not read as a number
    NonNumeric(String),
}

impl Limit {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Limit::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Limit::Value(_))
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Value(v) => f.write_str(&format_number(*v)),
            Limit::Undefined => Ok(()),
            Limit::NonNumeric(text) => f.write_str(text),
        }
    }
}

/// Regulatory class -> parameter -> limit. Read-only reference data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdTable {
    classes: BTreeMap<String, BTreeMap<String, ThresholdEntry>>,
}

impl ThresholdTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(
        mut self,
        class: impl Into<String>,
        parameter: impl Into<String>,
        entry: ThresholdEntry,
    ) -> Self {
        self.classes
            .entry(class.into())
            .or_default()
            .insert(parameter.into(), entry);
        self
    }

    pub fn with_value(
        self,
        class: impl Into<String>,
        parameter: impl Into<String>,
        value: f64,
    ) -> Self {
        self.with_limit(class, parameter, ThresholdEntry::Number(value))
    }

    /// Resolve the limit for a parameter under a class. Unknown classes
    /// and unknown parameters both resolve to [`Limit::Undefined`].
    pub fn limit(&self, class: &str, parameter: &str) -> Limit {
        match self.classes.get(class).and_then(|limits| limits.get(parameter)) {
            None => Limit::Undefined,
            Some(ThresholdEntry::Number(v)) if v.is_finite() => Limit::Value(*v),
            Some(ThresholdEntry::Number(v)) => Limit::NonNumeric(v.to_string()),
            Some(ThresholdEntry::Text(text)) => match parse_number(text) {
                Some(v) => Limit::Value(v),
                None => Limit::NonNumeric(text.clone()),
            },
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Parameters with an entry under a class, sorted by name.
    pub fn parameters(&self, class: &str) -> Vec<&str> {
        self.classes
            .get(class)
            .map(|limits| limits.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ThresholdTable {
        ThresholdTable::new()
            .with_value("Classe 2", "Cromo", 0.05)
            .with_limit("Classe 2", "pH", ThresholdEntry::Text("6.0".into()))
            .with_limit(
                "Classe 2",
                "Materiais flutuantes",
                ThresholdEntry::Text("Virtualmente ausentes".into()),
            )
    }

    #[test]
    fn numeric_limits_resolve() {
        assert_eq!(table().limit("Classe 2", "Cromo"), Limit::Value(0.05));
        assert_eq!(table().limit("Classe 2", "pH"), Limit::Value(6.0));
    }

    #[test]
    fn absent_class_or_parameter_is_undefined() {
        assert_eq!(table().limit("Classe 4", "Cromo"), Limit::Undefined);
        assert_eq!(table().limit("Classe 2", "Zinco"), Limit::Undefined);
    }

    #[test]
    fn narrative_limits_are_non_numeric() {
        let limit = table().limit("Classe 2", "Materiais flutuantes");
        assert_eq!(limit, Limit::NonNumeric("Virtualmente ausentes".to_string()));
        assert_eq!(limit.as_number(), None);
    }

    #[test]
    fn parameters_are_sorted_by_name() {
        assert_eq!(
            table().parameters("Classe 2"),
            vec!["Cromo", "Materiais flutuantes", "pH"]
        );
        assert!(table().parameters("Classe 4").is_empty());
    }

    #[test]
    fn table_deserializes_from_toml() {
        let table: ThresholdTable = toml::from_str(
            r#"
            ["Classe 1"]
            "Cromo" = 0.05
            "Coliformes" = 200
            "Óleos e graxas" = "Virtualmente ausentes"
            "#,
        )
        .unwrap();

        assert_eq!(table.limit("Classe 1", "Coliformes"), Limit::Value(200.0));
        assert!(!table.limit("Classe 1", "Óleos e graxas").is_numeric());
        assert_eq!(table.parameters("Classe 1").len(), 3);
    }
}
