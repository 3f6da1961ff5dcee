//! Report generation workflow.
//!
//! [`ReportService`] resolves the records a report needs, compiles the
//! context, renders and stores the document, and finally writes the audit
//! record. Missing records stop the workflow before anything is computed.
//! A registry failure does not: the document already exists, so the
//! outcome reports it as [`Registration::Failed`].

use crate::config::{DisplayLabels, ProfileRegistry, ReportSettings};
use crate::core::SampleSet;
use crate::errors::Result;
use crate::io::{
    AssetDirectory, Clock, ConfigurationSource, RegistryRecord, ReportRegistry, SampleSource,
    StorageSink, TemplateRenderer,
};
use crate::report::{compile, CompileInputs, FieldId, ReportType};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;
use tracing::{info, info_span, warn};

/// One request to generate a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub report: ReportType,
    pub asset_id: String,
    pub campaign_date: NaiveDate,
    pub user_id: String,
    /// Report name for the registry; the profile title when absent
    pub name: Option<String>,
    pub description: String,
    /// Periodicity chosen by the user, printed in the report
    pub periodicity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Registration {
    Registered,
    /// Generated and stored, but the audit record could not be written
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOutcome {
    pub report: ReportType,
    pub object_key: String,
    pub url: String,
    pub registration: Registration,
    /// Template fields the available data could not fill
    pub missing_fields: Vec<FieldId>,
}

impl GenerationOutcome {
    pub fn is_registered(&self) -> bool {
        self.registration == Registration::Registered
    }

    /// Caller-facing message.
    pub fn message(&self) -> String {
        match &self.registration {
            Registration::Registered => "Relatório gerado e registrado com sucesso.".to_string(),
            Registration::Failed { reason } => {
                format!("Erro ao registrar o relatório: {}", reason)
            }
        }
    }
}

/// The collaborators one service instance talks to.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub assets: &'a dyn AssetDirectory,
    pub configurations: &'a dyn ConfigurationSource,
    pub samples: &'a dyn SampleSource,
    pub renderer: &'a dyn TemplateRenderer,
    pub storage: &'a dyn StorageSink,
    pub registry: &'a dyn ReportRegistry,
    pub clock: &'a dyn Clock,
}

pub struct ReportService<'a> {
    profiles: &'a ProfileRegistry,
    labels: &'a DisplayLabels,
    settings: &'a ReportSettings,
    collaborators: Collaborators<'a>,
}

impl<'a> ReportService<'a> {
    pub fn new(
        profiles: &'a ProfileRegistry,
        labels: &'a DisplayLabels,
        settings: &'a ReportSettings,
        collaborators: Collaborators<'a>,
    ) -> Self {
        Self {
            profiles,
            labels,
            settings,
            collaborators,
        }
    }

    pub fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutcome> {
        let _span = info_span!(
            "generate",
            report = request.report.code(),
            asset = %request.asset_id,
            campaign = %request.campaign_date
        )
        .entered();
        let c = &self.collaborators;
        let profile = self.profiles.get(request.report)?;

        let asset = c.assets.asset(&request.asset_id)?;
        let configuration = c
            .configurations
            .configuration(&request.asset_id, &profile.form_type)?;
        let campaign =
            c.samples
                .campaign(&request.asset_id, &profile.form_type, request.campaign_date)?;
        let samples = SampleSet::from_json_rows(
            &campaign.results,
            &profile.columns,
            &self.labels.unavailable,
        )?;
        info!(rows = samples.len(), points = samples.distinct_point_count(), "Loaded campaign");

        let generated_at = c.clock.now().with_timezone(&self.settings.offset()?);
        let context = compile(&CompileInputs {
            profile,
            samples: &samples,
            labels: self.labels,
            settings: self.settings,
            generated_at,
            asset: Some(&asset),
            configuration: Some(&configuration),
            campaign: Some(&campaign),
            periodicity: request.periodicity.as_deref(),
        })?;
        let missing_fields = context.missing_fields();

        let document = c.renderer.render(&profile.template, &context)?;
        let object_key = object_key(
            &request.asset_id,
            request.campaign_date,
            generated_at,
            &document.extension,
        );
        let url = c.storage.upload(&profile.bucket, &object_key, &document)?;
        info!(%url, "Stored report");

        let record = RegistryRecord {
            name: request.name.clone().unwrap_or_else(|| profile.title.clone()),
            description: request.description.clone(),
            asset_id: request.asset_id.clone(),
            user_id: request.user_id.clone(),
            report_type: request.report.code().to_string(),
            url: url.clone(),
        };
        let registration = match c.registry.register(&record) {
            Ok(()) => Registration::Registered,
            Err(e) => {
                warn!(error = %e, "Report stored but not registered");
                Registration::Failed {
                    reason: e.to_string(),
                }
            }
        };

        Ok(GenerationOutcome {
            report: request.report,
            object_key,
            url,
            registration,
            missing_fields,
        })
    }
}

/// `{asset}/{campaign date}/{generation timestamp}.{ext}`, with the
/// timestamp in the offset it was generated in.
pub fn object_key(
    asset_id: &str,
    campaign_date: NaiveDate,
    generated_at: DateTime<FixedOffset>,
    extension: &str,
) -> String {
    format!(
        "{}/{}/{}.{}",
        asset_id,
        campaign_date.format("%Y-%m-%d"),
        generated_at.format("%Y-%m-%d_%H-%M-%S"),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::io::{FixedClock, JsonBundleRenderer, RenderedDocument};
    use crate::report::{AssetRecord, CampaignRecord, FormConfiguration};
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::sync::Mutex;

    struct Memory {
        asset: Option<AssetRecord>,
        campaign: Option<CampaignRecord>,
        uploads: Mutex<Vec<(String, String)>>,
        registered: Mutex<Vec<RegistryRecord>>,
        registry_fails: bool,
    }

    impl Memory {
        fn complete() -> Self {
            let campaign: CampaignRecord = serde_json::from_value(json!({
                "campanha_de_coleta": "2024-03-15",
                "resultados": [
                    {"Ponto": "S1", "Classe": "Nível 1", "Arsênio (mg/kg)": 3.0},
                    {"Ponto": "S2", "Classe": "Nível 1", "Arsênio (mg/kg)": 9.0}
                ],
                "laudo": ["https://example.org/laudo.pdf"]
            }))
            .unwrap();
            Self {
                asset: Some(AssetRecord {
                    id: "a1".into(),
                    name: "Porto Norte".into(),
                    ..AssetRecord::default()
                }),
                campaign: Some(campaign),
                uploads: Mutex::new(Vec::new()),
                registered: Mutex::new(Vec::new()),
                registry_fails: false,
            }
        }
    }

    impl AssetDirectory for Memory {
        fn asset(&self, asset_id: &str) -> Result<AssetRecord> {
            self.asset
                .clone()
                .ok_or_else(|| Error::not_found(crate::errors::Entity::Asset, asset_id))
        }
    }

    impl ConfigurationSource for Memory {
        fn configuration(&self, _: &str, form_type: &str) -> Result<FormConfiguration> {
            Ok(FormConfiguration {
                form_type: form_type.to_string(),
                ..FormConfiguration::default()
            })
        }
    }

    impl SampleSource for Memory {
        fn campaign(&self, asset_id: &str, _: &str, _: NaiveDate) -> Result<CampaignRecord> {
            self.campaign
                .clone()
                .ok_or_else(|| Error::not_found(crate::errors::Entity::Campaign, asset_id))
        }
    }

    impl StorageSink for Memory {
        fn upload(&self, bucket: &str, key: &str, _: &RenderedDocument) -> Result<String> {
            self.uploads
                .lock()
                .unwrap()
                .push((bucket.to_string(), key.to_string()));
            Ok(format!("mem://{}/{}", bucket, key))
        }
    }

    impl ReportRegistry for Memory {
        fn register(&self, record: &RegistryRecord) -> Result<()> {
            if self.registry_fails {
                return Err(Error::Registry("table unavailable".into()));
            }
            self.registered.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            report: ReportType::Sediment,
            asset_id: "a1".into(),
            campaign_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            user_id: "u1".into(),
            name: None,
            description: "Campanha de março".into(),
            periodicity: Some("Semestral".into()),
        }
    }

    fn run(memory: &Memory) -> Result<GenerationOutcome> {
        let profiles = ProfileRegistry::builtin().unwrap();
        let labels = DisplayLabels::default();
        let settings = ReportSettings::default();
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 4, 9, 17, 30, 5).unwrap());
        let renderer = JsonBundleRenderer;
        let service = ReportService::new(
            &profiles,
            &labels,
            &settings,
            Collaborators {
                assets: memory,
                configurations: memory,
                samples: memory,
                renderer: &renderer,
                storage: memory,
                registry: memory,
                clock: &clock,
            },
        );
        service.generate(&request())
    }

    #[test]
    fn generates_stores_and_registers() {
        let memory = Memory::complete();
        let outcome = run(&memory).unwrap();

        assert!(outcome.is_registered());
        assert_eq!(outcome.object_key, "a1/2024-03-15/2024-04-09_14-30-05.json");
        assert_eq!(outcome.url, "mem://relatorios-qsd/a1/2024-03-15/2024-04-09_14-30-05.json");
        assert_eq!(outcome.message(), "Relatório gerado e registrado com sucesso.");

        let registered = memory.registered.lock().unwrap();
        assert_eq!(registered.len(), 1);
        assert_eq!(registered[0].name, "Relatório de Qualidade de Sedimentos");
        assert_eq!(registered[0].report_type, "qsd");
        assert_eq!(registered[0].url, outcome.url);
    }

    #[test]
    fn registry_failure_is_a_partial_outcome() {
        let memory = Memory {
            registry_fails: true,
            ..Memory::complete()
        };
        let outcome = run(&memory).unwrap();

        assert!(!outcome.is_registered());
        assert!(outcome.message().starts_with("Erro ao registrar o relatório"));
        assert_eq!(memory.uploads.lock().unwrap().len(), 1);
    }

    #[test]
    fn missing_campaign_stops_before_upload() {
        let memory = Memory {
            campaign: None,
            ..Memory::complete()
        };
        let err = run(&memory).unwrap_err();

        assert!(err.is_not_found());
        assert!(memory.uploads.lock().unwrap().is_empty());
        assert!(memory.registered.lock().unwrap().is_empty());
    }

    #[test]
    fn missing_asset_is_not_found() {
        let memory = Memory {
            asset: None,
            ..Memory::complete()
        };
        assert!(run(&memory).unwrap_err().is_not_found());
    }

    #[test]
    fn object_key_uses_generation_offset() {
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        let at = Utc
            .with_ymd_and_hms(2024, 1, 1, 1, 0, 0)
            .unwrap()
            .with_timezone(&offset);
        let key = object_key("a1", NaiveDate::from_ymd_opt(2023, 12, 20).unwrap(), at, "docx");
        assert_eq!(key, "a1/2023-12-20/2023-12-31_22-00-00.docx");
    }
}
