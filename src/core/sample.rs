use super::value::RawValue;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Depth category used to stratify statistics and charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stratum {
    Surface,
    Middle,
    Bottom,
}

impl Stratum {
    pub const ALL: [Stratum; 3] = [Stratum::Surface, Stratum::Middle, Stratum::Bottom];

    /// Map a free-text stratification tag onto the closed vocabulary.
    /// Anything outside it (including "N/A") has no stratum.
    pub fn from_tag(tag: &str) -> Option<Stratum> {
        match tag.trim().to_lowercase().as_str() {
            "superfície" | "superficie" | "surface" => Some(Stratum::Surface),
            "meio" | "middle" => Some(Stratum::Middle),
            "fundo" | "bottom" => Some(Stratum::Bottom),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Stratum::Surface => 0,
            Stratum::Middle => 1,
            Stratum::Bottom => 2,
        }
    }
}

impl fmt::Display for Stratum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stratum::Surface => "Surface",
            Stratum::Middle => "Middle",
            Stratum::Bottom => "Bottom",
        };
        f.write_str(name)
    }
}

/// Names of the identity columns in the raw result rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    #[serde(default = "default_point_column")]
    pub point: String,
    #[serde(default = "default_class_column")]
    pub class: String,
    #[serde(default = "default_stratum_column")]
    pub stratum: String,
    #[serde(default = "default_analysis_column")]
    pub analysis_type: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            point: default_point_column(),
            class: default_class_column(),
            stratum: default_stratum_column(),
            analysis_type: default_analysis_column(),
        }
    }
}

fn default_point_column() -> String {
    "Ponto".to_string()
}
fn default_class_column() -> String {
    "Classe".to_string()
}
fn default_stratum_column() -> String {
    "Profundidade".to_string()
}
fn default_analysis_column() -> String {
    "Tipo de análise".to_string()
}

/// One row of field data for one collection point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub point: String,
    pub stratum_tag: String,
    pub class: String,
    pub analysis_type: String,
    pub values: HashMap<String, RawValue>,
}

impl SampleRecord {
    pub fn new(
        point: impl Into<String>,
        stratum_tag: impl Into<String>,
        class: impl Into<String>,
    ) -> Self {
        Self {
            point: point.into(),
            stratum_tag: stratum_tag.into(),
            class: class.into(),
            analysis_type: String::new(),
            values: HashMap::new(),
        }
    }

    pub fn with_analysis_type(mut self, analysis_type: impl Into<String>) -> Self {
        self.analysis_type = analysis_type.into();
        self
    }

    pub fn with_value(mut self, parameter: impl Into<String>, value: RawValue) -> Self {
        self.values.insert(parameter.into(), value);
        self
    }

    pub fn with_number(self, parameter: impl Into<String>, value: f64) -> Self {
        self.with_value(parameter, RawValue::Number(value))
    }

    pub fn with_text(self, parameter: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_value(parameter, RawValue::Text(value.into()))
    }

    pub fn stratum(&self) -> Option<Stratum> {
        Stratum::from_tag(&self.stratum_tag)
    }

    /// Raw value of a parameter; absent parameters read as missing.
    pub fn value(&self, parameter: &str) -> &RawValue {
        static MISSING: RawValue = RawValue::Missing;
        self.values.get(parameter).unwrap_or(&MISSING)
    }

    pub fn number(&self, parameter: &str) -> Option<f64> {
        self.value(parameter).as_number()
    }
}

/// All sample rows of one campaign, in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    records: Vec<SampleRecord>,
}

impl SampleSet {
    pub fn new(records: Vec<SampleRecord>) -> Self {
        Self { records }
    }

    /// Decode the campaign's result rows. Every key that is not an identity
    /// column becomes a parameter value.
    pub fn from_json_rows(
        rows: &[serde_json::Value],
        columns: &ColumnNames,
        unavailable_marker: &str,
    ) -> Result<Self> {
        rows.iter()
            .enumerate()
            .map(|(index, row)| decode_row(index, row, columns, unavailable_marker))
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &SampleRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Point identifiers in order of first appearance.
    pub fn points(&self) -> Vec<&str> {
        distinct_in_order(self.records.iter().map(|r| r.point.as_str()))
    }

    /// Regulatory classes in order of first appearance.
    pub fn classes(&self) -> Vec<&str> {
        distinct_in_order(self.records.iter().map(|r| r.class.as_str()))
    }

    pub fn distinct_point_count(&self) -> usize {
        self.points().len()
    }

    /// Rows belonging to one regulatory class, as a new set.
    pub fn for_class(&self, class: &str) -> SampleSet {
        SampleSet::new(
            self.records
                .iter()
                .filter(|r| r.class == class)
                .cloned()
                .collect(),
        )
    }
}

impl FromIterator<SampleRecord> for SampleSet {
    fn from_iter<I: IntoIterator<Item = SampleRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

pub(crate) fn distinct_in_order<'a>(items: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    items.filter(|item| seen.insert(*item)).collect()
}

fn decode_row(
    index: usize,
    row: &serde_json::Value,
    columns: &ColumnNames,
    unavailable_marker: &str,
) -> Result<SampleRecord> {
    let object = row.as_object().ok_or_else(|| {
        Error::config(format!("result row {} is not a JSON object", index))
    })?;

    let text = |key: &str| -> String {
        object
            .get(key)
            .map(|v| RawValue::from_json(v, unavailable_marker).display())
            .unwrap_or_default()
    };

    let point = text(&columns.point);
    if point.is_empty() {
        return Err(Error::config(format!(
            "result row {} has no `{}` column",
            index, columns.point
        )));
    }

    let identity = [
        columns.point.as_str(),
        columns.class.as_str(),
        columns.stratum.as_str(),
        columns.analysis_type.as_str(),
    ];
    let values = object
        .iter()
        .filter(|(key, _)| !identity.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), RawValue::from_json(value, unavailable_marker)))
        .collect();

    Ok(SampleRecord {
        point,
        stratum_tag: text(&columns.stratum),
        class: text(&columns.class),
        analysis_type: text(&columns.analysis_type),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stratum_tags_map_to_closed_vocabulary() {
        assert_eq!(Stratum::from_tag("Superfície"), Some(Stratum::Surface));
        assert_eq!(Stratum::from_tag(" fundo "), Some(Stratum::Bottom));
        assert_eq!(Stratum::from_tag("Middle"), Some(Stratum::Middle));
        assert_eq!(Stratum::from_tag("N/A"), None);
        assert_eq!(Stratum::from_tag(""), None);
    }

    #[test]
    fn rows_decode_identity_columns_and_parameters() {
        let rows = vec![
            json!({"Ponto": "P1", "Classe": "Classe 2", "Profundidade": "Superfície",
                   "Tipo de análise": "Química", "Cromo": 0.04, "pH": "7,1", "Cor": null}),
            json!({"Ponto": "P2", "Classe": "Classe 2", "Cromo": "Indisponível"}),
        ];
        let set = SampleSet::from_json_rows(&rows, &ColumnNames::default(), "Indisponível")
            .unwrap();

        assert_eq!(set.len(), 2);
        let first = &set.records()[0];
        assert_eq!(first.point, "P1");
        assert_eq!(first.stratum(), Some(Stratum::Surface));
        assert_eq!(first.analysis_type, "Química");
        assert_eq!(first.number("Cromo"), Some(0.04));
        assert_eq!(first.value("pH"), &RawValue::Text("7,1".into()));
        assert!(first.value("Cor").is_missing());
        assert!(!first.values.contains_key("Ponto"));

        let second = &set.records()[1];
        assert_eq!(second.stratum_tag, "");
        assert!(second.value("Cromo").is_missing());
        assert!(second.value("Zinco").is_missing());
    }

    #[test]
    fn rows_without_point_are_rejected() {
        let rows = vec![json!({"Classe": "Classe 1"})];
        let err = SampleSet::from_json_rows(&rows, &ColumnNames::default(), "Indisponível")
            .unwrap_err();
        assert!(err.to_string().contains("Ponto"));
    }

    #[test]
    fn points_and_classes_keep_first_appearance_order() {
        let set: SampleSet = vec![
            SampleRecord::new("P2", "Fundo", "B"),
            SampleRecord::new("P1", "Fundo", "A"),
            SampleRecord::new("P2", "Meio", "A"),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.points(), vec!["P2", "P1"]);
        assert_eq!(set.classes(), vec!["B", "A"]);
        assert_eq!(set.distinct_point_count(), 2);
        assert_eq!(set.for_class("A").len(), 2);
    }
}
