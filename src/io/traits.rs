//! Collaborator contracts of the generation workflow.
//!
//! The compiler itself is pure. Everything it needs from the outside world
//! (records, rendering, storage, the audit registry and the wall clock)
//! comes through these traits, so the workflow can run against the
//! filesystem implementations in [`crate::io::real`] or against test
//! doubles.
//!
//! Implementations must be thread-safe (`Send + Sync`): several generation
//! requests may share one set of collaborators.

use crate::errors::Result;
use crate::report::{AssetRecord, CampaignRecord, FormConfiguration, ReportContext};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Looks up monitored assets by identifier.
pub trait AssetDirectory: Send + Sync {
    /// # Errors
    ///
    /// Returns `Error::NotFound` when no asset has this identifier.
    fn asset(&self, asset_id: &str) -> Result<AssetRecord>;
}

/// Per-asset form configuration.
pub trait ConfigurationSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `Error::NotFound` when the asset has no configuration for
    /// `form_type`.
    fn configuration(&self, asset_id: &str, form_type: &str) -> Result<FormConfiguration>;
}

/// Campaign results and field metadata.
pub trait SampleSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `Error::NotFound` when no campaign of `form_type` was
    /// collected for the asset on `date`.
    fn campaign(&self, asset_id: &str, form_type: &str, date: NaiveDate)
        -> Result<CampaignRecord>;
}

/// A rendered document ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    /// File extension without the dot, e.g. "docx"
    pub extension: String,
    pub content_type: String,
}

/// The document templating engine.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &str, context: &ReportContext) -> Result<RenderedDocument>;
}

/// Where finished documents go.
pub trait StorageSink: Send + Sync {
    /// Store `document` under `bucket`/`key` and return its public URL.
    fn upload(&self, bucket: &str, key: &str, document: &RenderedDocument) -> Result<String>;
}

/// Audit record of one generated report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRecord {
    #[serde(rename = "nome_relatorio")]
    pub name: String,
    #[serde(rename = "descricao_relatorio")]
    pub description: String,
    #[serde(rename = "ativo_id")]
    pub asset_id: String,
    pub user_id: String,
    #[serde(rename = "tipo_relatorio")]
    pub report_type: String,
    #[serde(rename = "url_relatorio")]
    pub url: String,
}

/// Audit log of generated reports.
pub trait ReportRegistry: Send + Sync {
    fn register(&self, record: &RegistryRecord) -> Result<()>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
