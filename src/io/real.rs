//! Filesystem implementations of the collaborator traits.
//!
//! Records are JSON files under a data root:
//!
//! ```text
//! <root>/assets/<asset>.json
//! <root>/configurations/<asset>/<form_type>.json
//! <root>/campaigns/<form_type>/<asset>/<YYYY-MM-DD>.json
//! ```
//!
//! Documents are written below a storage directory and the registry is a
//! JSON-lines file, one [`RegistryRecord`] per line.

use crate::errors::{Entity, Error, Result, ResultExt};
use crate::io::traits::{
    AssetDirectory, Clock, ConfigurationSource, RegistryRecord, RenderedDocument, ReportRegistry,
    SampleSource, StorageSink, TemplateRenderer,
};
use crate::report::FIELD_VOCABULARY_VERSION;
use crate::report::{AssetRecord, CampaignRecord, FormConfiguration, ReportContext};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads assets, configurations and campaigns from JSON files.
#[derive(Debug, Clone)]
pub struct FsDataSource {
    root: PathBuf,
}

impl FsDataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn asset_path(&self, asset_id: &str) -> PathBuf {
        self.root.join("assets").join(format!("{}.json", asset_id))
    }

    pub fn configuration_path(&self, asset_id: &str, form_type: &str) -> PathBuf {
        self.root
            .join("configurations")
            .join(asset_id)
            .join(format!("{}.json", form_type))
    }

    pub fn campaign_path(&self, asset_id: &str, form_type: &str, date: NaiveDate) -> PathBuf {
        self.root
            .join("campaigns")
            .join(form_type)
            .join(asset_id)
            .join(format!("{}.json", date.format("%Y-%m-%d")))
    }
}

/// Read and decode one record. A missing file is `NotFound` for `entity`.
fn read_record<T: DeserializeOwned>(path: &Path, entity: Entity, key: &str) -> Result<T> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::not_found(entity, key));
        }
        Err(e) => return Err(Error::file_system(format!("Failed to read {}", entity), path, e)),
    };
    debug!(path = %path.display(), "Read {}", entity);
    serde_json::from_str(&contents)
        .map_err(Error::from)
        .context(format!("{} {}", entity, path.display()))
}

impl AssetDirectory for FsDataSource {
    fn asset(&self, asset_id: &str) -> Result<AssetRecord> {
        let mut asset: AssetRecord =
            read_record(&self.asset_path(asset_id), Entity::Asset, asset_id)?;
        if asset.id.is_empty() {
            asset.id = asset_id.to_string();
        }
        Ok(asset)
    }
}

impl ConfigurationSource for FsDataSource {
    fn configuration(&self, asset_id: &str, form_type: &str) -> Result<FormConfiguration> {
        read_record(
            &self.configuration_path(asset_id, form_type),
            Entity::FormConfiguration,
            &format!("{}/{}", asset_id, form_type),
        )
    }
}

impl SampleSource for FsDataSource {
    fn campaign(
        &self,
        asset_id: &str,
        form_type: &str,
        date: NaiveDate,
    ) -> Result<CampaignRecord> {
        read_record(
            &self.campaign_path(asset_id, form_type, date),
            Entity::Campaign,
            &format!("{}/{}", asset_id, date),
        )
    }
}

/// Stores documents as plain files, one directory per bucket.
#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    root: PathBuf,
    public_base_url: String,
}

impl DirectoryStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn public_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            bucket,
            key
        )
    }
}

impl StorageSink for DirectoryStorage {
    fn upload(&self, bucket: &str, key: &str, document: &RenderedDocument) -> Result<String> {
        let path = self.root.join(bucket).join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Storage(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
        fs::write(&path, &document.bytes)
            .map_err(|e| Error::Storage(format!("cannot write {}: {}", path.display(), e)))?;

        debug!(path = %path.display(), bytes = document.bytes.len(), "Stored document");
        Ok(self.public_url(bucket, key))
    }
}

/// Appends registry records to a JSON-lines file.
#[derive(Debug, Clone)]
pub struct JsonLinesRegistry {
    path: PathBuf,
}

impl JsonLinesRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Every record written so far, oldest first.
    pub fn records(&self) -> Result<Vec<RegistryRecord>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::file_system("Failed to read registry", &self.path, e)),
        };
        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(Error::from))
            .collect()
    }
}

impl ReportRegistry for JsonLinesRegistry {
    fn register(&self, record: &RegistryRecord) -> Result<()> {
        let registry_error =
            |e: std::io::Error| Error::Registry(format!("{}: {}", self.path.display(), e));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(registry_error)?;
        }
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(registry_error)?;
        file.write_all(line.as_bytes()).map_err(registry_error)?;
        Ok(())
    }
}

/// Stand-in for the document engine: serializes the context and the
/// template name as pretty JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBundleRenderer;

#[derive(Serialize)]
struct Bundle<'a> {
    template: &'a str,
    report: &'a str,
    vocabulary_version: &'a str,
    fields: &'a ReportContext,
}

impl TemplateRenderer for JsonBundleRenderer {
    fn render(&self, template: &str, context: &ReportContext) -> Result<RenderedDocument> {
        let bundle = Bundle {
            template,
            report: context.report().code(),
            vocabulary_version: FIELD_VOCABULARY_VERSION,
            fields: context,
        };
        let bytes = serde_json::to_vec_pretty(&bundle)
            .map_err(|e| Error::Render(format!("cannot serialize context: {}", e)))?;
        Ok(RenderedDocument {
            bytes,
            extension: "json".to_string(),
            content_type: "application/json".to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportType;
    use indoc::indoc;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn missing_records_are_not_found() {
        let dir = TempDir::new().unwrap();
        let source = FsDataSource::new(dir.path());

        let err = source.asset("a1").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "asset not found: a1");

        let err = source.configuration("a1", "form_x").unwrap_err();
        assert!(err.is_not_found());

        let err = source.campaign("a1", "form_x", date()).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("2024-03-15"));
    }

    #[test]
    fn asset_id_defaults_to_file_name() {
        let dir = TempDir::new().unwrap();
        let source = FsDataSource::new(dir.path());
        let path = source.asset_path("a1");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            indoc! {r#"
                {"nome": "Porto Norte", "cnpj": "00.000.000/0001-00"}
            "#},
        )
        .unwrap();

        let asset = source.asset("a1").unwrap();
        assert_eq!(asset.id, "a1");
        assert_eq!(asset.name, "Porto Norte");
        assert_eq!(asset.address, "");
    }

    #[test]
    fn malformed_record_is_not_a_not_found() {
        let dir = TempDir::new().unwrap();
        let source = FsDataSource::new(dir.path());
        let path = source.campaign_path("a1", "form_x", date());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        let err = source.campaign("a1", "form_x", date()).unwrap_err();
        assert!(!err.is_not_found());
    }

    #[test]
    fn storage_writes_below_bucket_and_returns_url() {
        let dir = TempDir::new().unwrap();
        let storage = DirectoryStorage::new(dir.path(), "https://files.example.org/");
        let document = RenderedDocument {
            bytes: b"doc".to_vec(),
            extension: "json".into(),
            content_type: "application/json".into(),
        };

        let url = storage
            .upload("relatorios-qsd", "a1/2024-03-15/x.json", &document)
            .unwrap();

        assert_eq!(url, "https://files.example.org/relatorios-qsd/a1/2024-03-15/x.json");
        let stored = fs::read(dir.path().join("relatorios-qsd/a1/2024-03-15/x.json")).unwrap();
        assert_eq!(stored, b"doc");
    }

    #[test]
    fn registry_appends_lines() {
        let dir = TempDir::new().unwrap();
        let registry = JsonLinesRegistry::new(dir.path().join("logs/registry.jsonl"));
        let record = RegistryRecord {
            name: "Relatório".into(),
            description: "março".into(),
            asset_id: "a1".into(),
            user_id: "u1".into(),
            report_type: "qsd".into(),
            url: "file://x".into(),
        };

        registry.register(&record).unwrap();
        registry.register(&record).unwrap();

        let records = registry.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], record);
        let raw = fs::read_to_string(dir.path().join("logs/registry.jsonl")).unwrap();
        assert!(raw.contains("\"tipo_relatorio\":\"qsd\""));
    }

    #[test]
    fn registry_in_unwritable_location_fails_as_registry_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let registry = JsonLinesRegistry::new(blocker.join("registry.jsonl"));
        let record = RegistryRecord {
            name: String::new(),
            description: String::new(),
            asset_id: String::new(),
            user_id: String::new(),
            report_type: String::new(),
            url: String::new(),
        };

        let err = registry.register(&record).unwrap_err();
        assert_eq!(err.category(), "registry");
    }

    #[test]
    fn bundle_renderer_embeds_vocabulary_version() {
        let context = ReportContext::new(ReportType::Sediment);
        let document = JsonBundleRenderer.render("qsd.docx", &context).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&document.bytes).unwrap();

        assert_eq!(document.extension, "json");
        assert_eq!(value["template"], "qsd.docx");
        assert_eq!(value["report"], "qsd");
        assert_eq!(value["vocabulary_version"], FIELD_VOCABULARY_VERSION);
    }
}
