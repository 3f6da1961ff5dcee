use super::fields::{lookup, vocabulary, FieldId};
use super::ReportType;
use crate::charts::ChartArtifact;
use crate::errors::{Error, Result};
use crate::tables::PresentationTable;
use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A value handed to the document template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ContextValue {
    Text(String),
    Number(f64),
    Integer(i64),
    Date(NaiveDate),
    TextList(Vec<String>),
    Table(PresentationTable),
    Image(ChartArtifact),
    Images(Vec<ChartArtifact>),
    /// Remote photo the renderer downloads and embeds
    Photo { url: String },
    /// Hyperlink rendered with its own text
    Link { text: String, url: String },
}

impl ContextValue {
    pub fn text(value: impl Into<String>) -> Self {
        ContextValue::Text(value.into())
    }

    /// Short human description, used by the terminal writer.
    pub fn summary(&self) -> String {
        match self {
            ContextValue::Text(text) => text.clone(),
            ContextValue::Number(value) => crate::core::format_number(*value),
            ContextValue::Integer(value) => value.to_string(),
            ContextValue::Date(date) => date.to_string(),
            ContextValue::TextList(items) => format!("{} items", items.len()),
            ContextValue::Table(table) => format!(
                "table, {} columns x {} rows",
                table.columns().len(),
                table.row_count()
            ),
            ContextValue::Image(chart) => format!("chart \"{}\"", chart.title),
            ContextValue::Images(charts) => format!("{} charts", charts.len()),
            ContextValue::Photo { url } => format!("photo {}", url),
            ContextValue::Link { url, .. } => format!("link {}", url),
        }
    }
}

/// Field identifier to value mapping for one report, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportContext {
    report: ReportType,
    entries: Vec<(FieldId, ContextValue)>,
}

impl ReportContext {
    pub fn new(report: ReportType) -> Self {
        Self {
            report,
            entries: Vec::new(),
        }
    }

    pub fn report(&self) -> ReportType {
        self.report
    }

    /// Set a field, replacing any previous value. Fields outside the
    /// report's vocabulary are rejected.
    pub fn insert(&mut self, field: FieldId, value: ContextValue) -> Result<()> {
        if lookup(self.report, field.as_str()).is_none() {
            return Err(Error::UnknownField {
                report: self.report.code().to_string(),
                field: field.to_string(),
            });
        }
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((field, value)),
        }
        Ok(())
    }

    pub fn get(&self, field: FieldId) -> Option<&ContextValue> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, value)| value)
    }

    /// Lookup by the template's spelling of the identifier.
    pub fn get_by_name(&self, name: &str) -> Option<&ContextValue> {
        self.entries
            .iter()
            .find(|(f, _)| f.as_str() == name)
            .map(|(_, value)| value)
    }

    pub fn entries(&self) -> impl Iterator<Item = (FieldId, &ContextValue)> {
        self.entries.iter().map(|(f, v)| (*f, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vocabulary fields that were never set.
    pub fn missing_fields(&self) -> Vec<FieldId> {
        vocabulary(self.report)
            .into_iter()
            .filter(|field| self.get(*field).is_none())
            .collect()
    }
}

impl Serialize for ReportContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, value) in &self.entries {
            map.serialize_entry(field.as_str(), value)?;
        }
        map.end()
    }
}
