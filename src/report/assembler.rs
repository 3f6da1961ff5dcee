//! Report context assembly.
//!
//! [`compile`] walks the layout of the report type and asks the table,
//! compliance, chart and scorecard components for each field. It holds no
//! business rules of its own: component errors propagate unchanged, and
//! fields whose inputs were not supplied (e.g. no asset record) are left
//! unset so [`ReportContext::missing_fields`] can report them.

use super::context::{ContextValue, ReportContext};
use super::layout::{
    layout_for, AssetField, CampaignField, ConfigurationField, GenerationField, LabField,
    ParameterScope, Section,
};
use crate::charts::{comparison_charts, composition_chart, trend_charts};
use crate::compliance::evaluate;
use crate::config::{DisplayLabels, ParameterCategory, ReportProfile, ReportSettings};
use crate::core::SampleSet;
use crate::errors::{Error, Result};
use crate::scorecard::{build_scorecard, indicator_catalog_table};
use crate::tables::{
    build_grouped_table, flagged_pivot, overall_mean, share_of_points_with,
    stratified_summary_table, GroupedTableSpec,
};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info_span};

/// Asset record as stored by the data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "cnpj", default)]
    pub tax_id: String,
    #[serde(rename = "endereco", default)]
    pub address: String,
    #[serde(rename = "numero_licenca", default)]
    pub license_number: String,
    #[serde(rename = "orgao_regulador", default)]
    pub regulator: String,
}

/// Laboratory methodology block of a form configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabMethodology {
    #[serde(rename = "metodologia_adotada", default)]
    pub methodology: Option<String>,
    #[serde(rename = "amostrador_de_coleta", default)]
    pub sampler: Option<String>,
    #[serde(rename = "equipamento_de_armazenamento", default)]
    pub storage_equipment: Option<String>,
    #[serde(rename = "tipo_de_ampostragem", alias = "tipo_de_amostragem", default)]
    pub sampling_type: Option<String>,
}

/// Per-asset configuration of one monitoring form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormConfiguration {
    #[serde(rename = "ativo_id", default)]
    pub asset_id: String,
    #[serde(rename = "tipo_formulario", default)]
    pub form_type: String,
    #[serde(rename = "parametros_escolhidos", default)]
    pub chosen_parameters: Vec<String>,
    #[serde(rename = "localizacao_dos_pontos_de_monitoramento", default)]
    pub point_locations: serde_json::Value,
    #[serde(rename = "parametro_periodicidade", default)]
    pub periodicity_parameter: serde_json::Value,
    #[serde(rename = "dados_laboratoriais", default)]
    pub lab_data: Vec<LabMethodology>,
}

/// Laboratory identity recorded with a campaign.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabIdentity {
    #[serde(rename = "nome_laboratorio", default)]
    pub name: Option<String>,
    #[serde(rename = "razao_social_laboratorio", default)]
    pub legal_name: Option<String>,
    #[serde(rename = "cnpj_laboratorio", default)]
    pub tax_id: Option<String>,
    #[serde(rename = "endereco_laboratorio", default)]
    pub address: Option<String>,
    #[serde(rename = "responsavel_tecnico", default)]
    pub technical_lead: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "contato", default)]
    pub contact: Option<String>,
}

/// One campaign: the sample results plus the field metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    #[serde(rename = "campanha_de_coleta")]
    pub campaign_date: NaiveDate,
    #[serde(rename = "resultados", default)]
    pub results: Vec<serde_json::Value>,
    #[serde(flatten)]
    pub lab: LabIdentity,
    /// Links to the laboratory's technical reports
    #[serde(rename = "laudo", alias = "laudos", default)]
    pub technical_reports: Vec<String>,
    /// Photo evidence lists and any other campaign attribute
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CampaignRecord {
    /// First URL of a photo evidence list.
    pub fn photo(&self, key: &str) -> Option<&str> {
        match self.extra.get(key)? {
            serde_json::Value::Array(items) => items.first()?.as_str(),
            serde_json::Value::String(url) => Some(url.as_str()),
            _ => None,
        }
    }
}

/// Everything one compilation reads. All borrowed; compile never mutates
/// its inputs.
#[derive(Debug, Clone, Copy)]
pub struct CompileInputs<'a> {
    pub profile: &'a ReportProfile,
    pub samples: &'a SampleSet,
    pub labels: &'a DisplayLabels,
    pub settings: &'a ReportSettings,
    pub generated_at: DateTime<FixedOffset>,
    pub asset: Option<&'a AssetRecord>,
    pub configuration: Option<&'a FormConfiguration>,
    pub campaign: Option<&'a CampaignRecord>,
    pub periodicity: Option<&'a str>,
}

impl CompileInputs<'_> {
    /// Resolve a scope to its ordered parameter names.
    pub fn parameters(&self, scope: ParameterScope) -> Result<Vec<String>> {
        match scope {
            ParameterScope::Category(name) => Ok(self.profile.category(name)?.parameters.clone()),
            ParameterScope::Chosen => Ok(self
                .configuration
                .map(|c| c.chosen_parameters.clone())
                .filter(|chosen| !chosen.is_empty())
                .unwrap_or_else(|| self.profile.chosen_parameters.clone())),
            ParameterScope::Indicators => Ok(dedup(
                self.profile.indicators.iter().map(|i| i.parameter.clone()),
            )),
            ParameterScope::AllCategories => Ok(dedup(
                self.profile
                    .categories
                    .iter()
                    .flat_map(|c| c.parameters.iter().cloned()),
            )),
        }
    }

    /// A category for table builders. Scopes other than a named category
    /// become an ad hoc category without aliases.
    fn category(&self, scope: ParameterScope) -> Result<ParameterCategory> {
        match scope {
            ParameterScope::Category(name) => Ok(self.profile.category(name)?.clone()),
            other => Ok(ParameterCategory::new(
                format!("{:?}", other).to_lowercase(),
                self.parameters(other)?,
            )),
        }
    }
}

fn dedup(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Compile the report context for the report type of `inputs.profile`.
pub fn compile(inputs: &CompileInputs<'_>) -> Result<ReportContext> {
    let report = inputs.profile.report;
    let _span = info_span!("compile", report = report.code()).entered();

    let mut context = ReportContext::new(report);
    for entry in layout_for(report) {
        if let Some(value) = resolve(inputs, &entry.section)? {
            context.insert(entry.field, value)?;
        }
    }

    debug!(
        fields = context.len(),
        missing = context.missing_fields().len(),
        rows = inputs.samples.len(),
        "Compiled report context"
    );
    Ok(context)
}

fn resolve(inputs: &CompileInputs<'_>, section: &Section) -> Result<Option<ContextValue>> {
    let samples = inputs.samples;
    let labels = inputs.labels;

    let value = match *section {
        Section::Asset(field) => inputs.asset.map(|asset| asset_value(asset, field)),
        Section::Campaign(field) => inputs
            .campaign
            .map(|campaign| campaign_value(campaign.campaign_date, field)),
        Section::Generation(field) => Some(generation_value(inputs, field)),
        Section::Lab(field) => inputs
            .campaign
            .and_then(|campaign| lab_value(&campaign.lab, field))
            .map(ContextValue::Text),
        Section::Configuration(field) => inputs
            .configuration
            .and_then(|configuration| configuration_value(configuration, field)),
        Section::Photo(key) => inputs
            .campaign
            .and_then(|campaign| campaign.photo(key))
            .map(|url| ContextValue::Photo {
                url: url.to_string(),
            }),
        Section::TechnicalReport => inputs
            .campaign
            .and_then(|campaign| campaign.technical_reports.first())
            .map(|url| ContextValue::Link {
                text: url.clone(),
                url: url.clone(),
            }),
        Section::Periodicity => inputs.periodicity.map(ContextValue::text),
        Section::PointCount => Some(ContextValue::Integer(samples.distinct_point_count() as i64)),
        Section::ParameterList(scope) => Some(ContextValue::TextList(inputs.parameters(scope)?)),
        Section::IndicatorCatalog => Some(ContextValue::Table(indicator_catalog_table(
            &inputs.profile.indicators,
        ))),
        Section::GroupedTable {
            scope,
            include_stratum,
        } => {
            let category = inputs.category(scope)?;
            Some(ContextValue::Table(build_grouped_table(
                samples,
                GroupedTableSpec {
                    columns: &inputs.profile.columns,
                    category: &category,
                    include_stratum,
                },
            )))
        }
        Section::StratifiedSummary(scope) => {
            let category = inputs.category(scope)?;
            Some(ContextValue::Table(stratified_summary_table(
                samples, &category, labels,
            )))
        }
        Section::ComplianceRate(scope) => {
            let evaluation =
                evaluate(samples, &inputs.parameters(scope)?, &inputs.profile.thresholds);
            Some(number_or_unavailable(evaluation.rate(), labels))
        }
        Section::FlaggedPivot { scope, passthrough } => {
            let category = inputs.category(scope)?;
            let evaluation = evaluate(samples, &category.parameters, &inputs.profile.thresholds);
            let passthrough: Vec<String> = passthrough.iter().map(|s| s.to_string()).collect();
            Some(ContextValue::Table(flagged_pivot(
                samples,
                &evaluation,
                &category,
                &passthrough,
                &inputs.profile.columns,
                labels,
            )))
        }
        Section::ToxicShare(parameter) => Some(number_or_unavailable(
            share_of_points_with(samples, parameter, &labels.toxic),
            labels,
        )),
        Section::CompositionChart(scope) => {
            let category = inputs.category(scope)?;
            Some(ContextValue::Image(composition_chart(
                samples,
                &category,
                &inputs.profile.charts.composition_colors,
                labels,
            )?))
        }
        Section::FractionMean(scope, index) => {
            let parameters = inputs.parameters(scope)?;
            let parameter = parameters.get(index).ok_or_else(|| {
                Error::config(format!(
                    "composition has {} fractions, layout asks for fraction {}",
                    parameters.len(),
                    index + 1
                ))
            })?;
            Some(number_or_unavailable(overall_mean(samples, parameter), labels))
        }
        Section::ComparisonCharts(scope) => Some(ContextValue::Images(comparison_charts(
            samples,
            &inputs.parameters(scope)?,
            &inputs.profile.thresholds,
            labels,
        )?)),
        Section::TrendCharts(scope) => Some(ContextValue::Images(trend_charts(
            samples,
            &inputs.parameters(scope)?,
            &inputs.profile.thresholds,
            &inputs.profile.columns.point,
            labels,
        )?)),
        Section::Scorecard => {
            let parameters = inputs.parameters(ParameterScope::Indicators)?;
            let evaluation = evaluate(samples, &parameters, &inputs.profile.thresholds);
            Some(ContextValue::Table(build_scorecard(
                &inputs.profile.indicators,
                &evaluation,
                labels,
            )))
        }
        Section::Placeholder(text) => Some(ContextValue::text(text)),
    };

    Ok(value)
}

fn number_or_unavailable(value: Option<f64>, labels: &DisplayLabels) -> ContextValue {
    match value {
        Some(value) => ContextValue::Number(value),
        None => ContextValue::text(labels.unavailable.clone()),
    }
}

fn asset_value(asset: &AssetRecord, field: AssetField) -> ContextValue {
    let text = match field {
        AssetField::Name => &asset.name,
        AssetField::TaxId => &asset.tax_id,
        AssetField::Address => &asset.address,
        AssetField::LicenseNumber => &asset.license_number,
        AssetField::Regulator => &asset.regulator,
    };
    ContextValue::text(text.clone())
}

fn campaign_value(date: NaiveDate, field: CampaignField) -> ContextValue {
    match field {
        CampaignField::Date => ContextValue::Date(date),
        CampaignField::MonthNumber => ContextValue::text(format!("{:02}", date.month())),
        CampaignField::Year => ContextValue::text(date.year().to_string()),
        CampaignField::MonthName => ContextValue::text(month_name(date.month())),
    }
}

fn generation_value(inputs: &CompileInputs<'_>, field: GenerationField) -> ContextValue {
    match field {
        GenerationField::City => ContextValue::text(inputs.settings.city.clone()),
        GenerationField::Day => ContextValue::Integer(i64::from(inputs.generated_at.day())),
        GenerationField::Year => ContextValue::Integer(i64::from(inputs.generated_at.year())),
    }
}

fn lab_value(lab: &LabIdentity, field: LabField) -> Option<String> {
    match field {
        LabField::Name => lab.name.clone(),
        LabField::LegalName => lab.legal_name.clone(),
        LabField::TaxId => lab.tax_id.clone(),
        LabField::Address => lab.address.clone(),
        LabField::TechnicalLead => lab.technical_lead.clone(),
        LabField::Email => lab.email.clone(),
        LabField::Contact => lab.contact.clone(),
    }
}

fn configuration_value(
    configuration: &FormConfiguration,
    field: ConfigurationField,
) -> Option<ContextValue> {
    let methodology = configuration.lab_data.first();
    match field {
        ConfigurationField::PointLocations => json_value(&configuration.point_locations),
        ConfigurationField::PeriodicityParameter => {
            json_value(&configuration.periodicity_parameter)
        }
        ConfigurationField::Methodology => methodology?.methodology.clone().map(ContextValue::Text),
        ConfigurationField::Sampler => methodology?.sampler.clone().map(ContextValue::Text),
        ConfigurationField::StorageEquipment => methodology?
            .storage_equipment
            .clone()
            .map(ContextValue::Text),
        ConfigurationField::SamplingType => {
            methodology?.sampling_type.clone().map(ContextValue::Text)
        }
    }
}

/// Free-form configuration values: strings stay text, lists of strings
/// become text lists, anything else is written as JSON text.
fn json_value(value: &serde_json::Value) -> Option<ContextValue> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(ContextValue::text(text.clone())),
        serde_json::Value::Array(items) if items.iter().all(|i| i.is_string()) => {
            Some(ContextValue::TextList(
                items
                    .iter()
                    .filter_map(|i| i.as_str().map(str::to_string))
                    .collect(),
            ))
        }
        other => Some(ContextValue::text(other.to_string())),
    }
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "Janeiro",
        2 => "Fevereiro",
        3 => "Março",
        4 => "Abril",
        5 => "Maio",
        6 => "Junho",
        7 => "Julho",
        8 => "Agosto",
        9 => "Setembro",
        10 => "Outubro",
        11 => "Novembro",
        12 => "Dezembro",
        _ => "",
    }
}
