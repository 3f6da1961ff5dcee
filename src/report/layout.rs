//! Declarative report layouts.
//!
//! A layout is the ordered list of template fields of one report type,
//! each paired with the [`Section`] that produces its value. The assembler
//! walks the layout and never names a field itself.

use super::fields::{qag, qags, qsd, FieldId};
use super::ReportType;

/// Which parameters a section works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterScope {
    /// A named category of the report profile
    Category(&'static str),
    /// The asset's chosen parameters, or the profile default
    Chosen,
    /// The parameters referenced by the indicator catalog
    Indicators,
    /// Every parameter of every profile category, first occurrence wins
    AllCategories,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetField {
    Name,
    TaxId,
    Address,
    LicenseNumber,
    Regulator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignField {
    Date,
    MonthNumber,
    Year,
    MonthName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationField {
    City,
    Day,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabField {
    Name,
    LegalName,
    TaxId,
    Address,
    TechnicalLead,
    Email,
    Contact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationField {
    PointLocations,
    PeriodicityParameter,
    Methodology,
    Sampler,
    StorageEquipment,
    SamplingType,
}

/// The component that produces one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Asset(AssetField),
    Campaign(CampaignField),
    Generation(GenerationField),
    Lab(LabField),
    Configuration(ConfigurationField),
    /// First photo of a campaign evidence list
    Photo(&'static str),
    /// Hyperlink to the laboratory's technical report
    TechnicalReport,
    /// Periodicity chosen by the user at generation time
    Periodicity,
    PointCount,
    ParameterList(ParameterScope),
    IndicatorCatalog,
    GroupedTable {
        scope: ParameterScope,
        include_stratum: bool,
    },
    StratifiedSummary(ParameterScope),
    ComplianceRate(ParameterScope),
    FlaggedPivot {
        scope: ParameterScope,
        passthrough: &'static [&'static str],
    },
    /// Share of points whose text value of the parameter is the toxic label
    ToxicShare(&'static str),
    CompositionChart(ParameterScope),
    /// Mean of the n-th parameter of a composition
    FractionMean(ParameterScope, usize),
    ComparisonCharts(ParameterScope),
    TrendCharts(ParameterScope),
    Scorecard,
    /// Fixed text the author fills in later
    Placeholder(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEntry {
    pub field: FieldId,
    pub section: Section,
}

const fn entry(field: FieldId, section: Section) -> LayoutEntry {
    LayoutEntry { field, section }
}

use AssetField as A;
use CampaignField as C;
use ConfigurationField as Cfg;
use GenerationField as G;
use LabField as L;
use ParameterScope::{AllCategories, Category, Chosen};
use Section::*;

const TOXICITY: &str = "Toxicidade";

const SURFACE_WATER: &[LayoutEntry] = &[
    entry(qag::PARAMETROS_ESCOLHIDOS, ParameterList(Chosen)),
    entry(qag::QAG_01, Asset(A::Name)),
    entry(qag::QAG_02, Campaign(C::Date)),
    entry(qag::QAG_03, Campaign(C::MonthNumber)),
    entry(qag::QAG_04, Campaign(C::Year)),
    entry(qag::QAG_05, Generation(G::City)),
    entry(qag::QAG_06, Generation(G::Day)),
    entry(qag::QAG_07, Campaign(C::MonthName)),
    entry(qag::QAG_08, Generation(G::Year)),
    entry(qag::QAG_09, Asset(A::Name)),
    entry(qag::QAG_10, Asset(A::TaxId)),
    entry(qag::QAG_11, Asset(A::Address)),
    entry(qag::QAG_12, Asset(A::Name)),
    entry(qag::QAG_13, Asset(A::LicenseNumber)),
    entry(qag::QAG_14, PointCount),
    entry(qag::QAG_15, Asset(A::Regulator)),
    entry(qag::QAG_16, Asset(A::Address)),
    entry(qag::QAG_18, Configuration(Cfg::PointLocations)),
    entry(qag::QAG_19, Configuration(Cfg::PeriodicityParameter)),
    entry(qag::QAG_20_1, Lab(L::Name)),
    entry(qag::QAG_20_2, Lab(L::LegalName)),
    entry(qag::QAG_20_3, Lab(L::TaxId)),
    entry(qag::QAG_20_4, Lab(L::Address)),
    entry(qag::QAG_20_5, Lab(L::TechnicalLead)),
    entry(qag::QAG_20_6, Lab(L::Email)),
    entry(qag::QAG_20_7, Lab(L::Contact)),
    entry(qag::QAG_22, Photo("registros_fotograficos_sondas")),
    entry(qag::QAG_23, Photo("registros_fotograficos_amostradores")),
    entry(qag::QAG_24, Photo("registros_fotograficos_caixas_termicas")),
    entry(qag::QAG_25, Configuration(Cfg::Methodology)),
    entry(qag::QAG_26, IndicatorCatalog),
    entry(
        qag::QAG_27,
        GroupedTable {
            scope: Category("fisico_quimicos"),
            include_stratum: true,
        },
    ),
    entry(
        qag::QAG_28,
        GroupedTable {
            scope: Category("metais"),
            include_stratum: true,
        },
    ),
    entry(qag::QAG_29, ComparisonCharts(Chosen)),
    entry(qag::QAG_30, StratifiedSummary(Chosen)),
    entry(qag::QAG_31, ComplianceRate(Category("metais"))),
    entry(
        qag::QAG_32,
        FlaggedPivot {
            scope: Category("metais"),
            passthrough: &[],
        },
    ),
    entry(qag::QAG_33, ComplianceRate(Category("nutrientes"))),
    entry(
        qag::QAG_34,
        FlaggedPivot {
            scope: Category("nutrientes"),
            passthrough: &[],
        },
    ),
    entry(qag::QAG_35, ComplianceRate(Chosen)),
    entry(qag::QAG_40, Scorecard),
    entry(qag::QAG_43, TechnicalReport),
    entry(qag::QAG_54, Periodicity),
];

const GROUNDWATER: &[LayoutEntry] = &[
    entry(qags::PARAMETROS_ESCOLHIDOS, ParameterList(Chosen)),
    entry(qags::QAGS_01, Asset(A::Name)),
    entry(qags::QAGS_02, Campaign(C::Date)),
    entry(qags::QAGS_03, Campaign(C::MonthNumber)),
    entry(qags::QAGS_04, Campaign(C::Year)),
    entry(qags::QAGS_05, Generation(G::City)),
    entry(qags::QAGS_06, Generation(G::Day)),
    entry(qags::QAGS_07, Campaign(C::MonthName)),
    entry(qags::QAGS_08, Generation(G::Year)),
    entry(qags::QAGS_09, Asset(A::Name)),
    entry(qags::QAGS_10, Asset(A::TaxId)),
    entry(qags::QAGS_11, Asset(A::Address)),
    entry(qags::QAGS_12, Asset(A::Name)),
    entry(qags::QAGS_13, Asset(A::LicenseNumber)),
    entry(qags::QAGS_14, PointCount),
    entry(qags::QAGS_15, Asset(A::Regulator)),
    entry(qags::QAGS_16, Asset(A::Address)),
    entry(qags::QAGS_18, Configuration(Cfg::PointLocations)),
    entry(qags::QAGS_19, Configuration(Cfg::PeriodicityParameter)),
    entry(qags::QAGS_20_1, Lab(L::Name)),
    entry(qags::QAGS_20_2, Lab(L::LegalName)),
    entry(qags::QAGS_20_3, Lab(L::TaxId)),
    entry(qags::QAGS_20_4, Lab(L::Address)),
    entry(qags::QAGS_20_5, Lab(L::TechnicalLead)),
    entry(qags::QAGS_20_6, Lab(L::Email)),
    entry(qags::QAGS_20_7, Lab(L::Contact)),
    entry(qags::QAGS_22, Photo("registros_fotograficos_sondas")),
    entry(qags::QAGS_23, Photo("registros_fotograficos_amostradores")),
    entry(qags::QAGS_24, Photo("registros_fotograficos_caixas_termicas")),
    entry(qags::QAGS_25, Configuration(Cfg::Methodology)),
    entry(qags::QAGS_26, IndicatorCatalog),
    entry(
        qags::TABELA_QAGS_27,
        GroupedTable {
            scope: Category("inorganicos"),
            include_stratum: false,
        },
    ),
    entry(qags::QAGS_28, ParameterList(Category("inorganicos"))),
    entry(qags::QAGS_29, ComparisonCharts(Chosen)),
    entry(qags::QAGS_31, ComplianceRate(Category("inorganicos"))),
    entry(qags::QAGS_32, ComplianceRate(Category("organicos"))),
    entry(
        qags::QAGS_33,
        GroupedTable {
            scope: Category("organicos"),
            include_stratum: false,
        },
    ),
    entry(qags::QAGS_34, ComplianceRate(Category("agrotoxicos"))),
    entry(
        qags::QAGS_35,
        GroupedTable {
            scope: Category("agrotoxicos"),
            include_stratum: false,
        },
    ),
    entry(
        qags::QAG_37,
        GroupedTable {
            scope: Category("microrganismos"),
            include_stratum: false,
        },
    ),
    entry(qags::QAG_38, ComplianceRate(Category("microrganismos"))),
    entry(qags::QAG_40, Scorecard),
    entry(qags::QAG_43, TechnicalReport),
    entry(qags::QAG_54, Periodicity),
];

const SEDIMENT: &[LayoutEntry] = &[
    entry(qsd::QSD_01, Asset(A::Name)),
    entry(qsd::QSD_02, Campaign(C::Date)),
    entry(qsd::QSD_03, Campaign(C::MonthNumber)),
    entry(qsd::QSD_04, Campaign(C::Year)),
    entry(qsd::QSD_05, Generation(G::City)),
    entry(qsd::QSD_06, Generation(G::Day)),
    entry(qsd::QSD_07, Campaign(C::MonthName)),
    entry(qsd::QSD_08, Generation(G::Year)),
    entry(qsd::QSD_09, Asset(A::Name)),
    entry(qsd::QSD_10, Asset(A::TaxId)),
    entry(qsd::QSD_11, Asset(A::Address)),
    entry(qsd::QSD_12, Asset(A::Name)),
    entry(qsd::QSD_13, Asset(A::LicenseNumber)),
    entry(qsd::QSD_14, PointCount),
    entry(qsd::QSD_15, Asset(A::Regulator)),
    entry(qsd::QSD_16, Asset(A::Address)),
    entry(qsd::QSD_18, Configuration(Cfg::PointLocations)),
    entry(qsd::QSD_19, Configuration(Cfg::PeriodicityParameter)),
    entry(qsd::QSD_20_1, Lab(L::Name)),
    entry(qsd::QSD_20_2, Lab(L::LegalName)),
    entry(qsd::QSD_20_3, Lab(L::TaxId)),
    entry(qsd::QSD_20_4, Lab(L::Address)),
    entry(qsd::QSD_20_5, Lab(L::TechnicalLead)),
    entry(qsd::QSD_20_6, Lab(L::Email)),
    entry(qsd::QSD_20_7, Lab(L::Contact)),
    entry(
        qsd::QSD_21,
        Photo("registro_fotografico_fundeio_amostra_de_sedimentos"),
    ),
    entry(qsd::QSD_22, Configuration(Cfg::Sampler)),
    entry(qsd::QSD_23, Configuration(Cfg::StorageEquipment)),
    entry(qsd::QSD_24, Configuration(Cfg::SamplingType)),
    entry(
        qsd::QSD_25,
        Photo("registro_fotografico_equipamento_de_transporte"),
    ),
    entry(qsd::QSD_26, Configuration(Cfg::Methodology)),
    entry(qsd::QSD_28, IndicatorCatalog),
    entry(qsd::QSD_29, CompositionChart(Category("granulometria"))),
    entry(qsd::QSD_30, FractionMean(Category("granulometria"), 0)),
    entry(qsd::QSD_31, FractionMean(Category("granulometria"), 1)),
    entry(qsd::QSD_32, FractionMean(Category("granulometria"), 2)),
    entry(qsd::QSD_33, FractionMean(Category("granulometria"), 3)),
    entry(qsd::QSD_34, FractionMean(Category("granulometria"), 4)),
    entry(qsd::QSD_35, FractionMean(Category("granulometria"), 5)),
    entry(qsd::QSD_36, FractionMean(Category("granulometria"), 6)),
    entry(qsd::QSD_37, ComplianceRate(AllCategories)),
    entry(
        qsd::QSD_38,
        FlaggedPivot {
            scope: Category("metais"),
            passthrough: &[],
        },
    ),
    entry(
        qsd::QSD_39,
        FlaggedPivot {
            scope: Category("pesticidas"),
            passthrough: &[],
        },
    ),
    entry(
        qsd::QSD_40,
        FlaggedPivot {
            scope: Category("hpas"),
            passthrough: &[],
        },
    ),
    entry(
        qsd::QSD_41,
        FlaggedPivot {
            scope: Category("nutrientes"),
            passthrough: &[],
        },
    ),
    entry(
        qsd::QSD_42,
        FlaggedPivot {
            scope: Category("ecotoxicologia"),
            passthrough: &[TOXICITY],
        },
    ),
    entry(qsd::QSD_43, ToxicShare(TOXICITY)),
    entry(qsd::QSD_44, Placeholder("Responsável Técnico")),
    entry(qsd::QSD_45, Placeholder("CREA")),
    entry(qsd::QSD_46, Placeholder("CTF IBAMA")),
    entry(qsd::QSD_47, Scorecard),
    entry(qsd::QSD_48, Placeholder("")),
    entry(qsd::QSD_49, Placeholder("")),
    entry(qsd::QSD_50, TechnicalReport),
    entry(qsd::QSD_51, TrendCharts(Category("nutrientes"))),
    entry(qsd::QSD_54, Periodicity),
];

pub fn layout_for(report: ReportType) -> &'static [LayoutEntry] {
    match report {
        ReportType::SurfaceWater => SURFACE_WATER,
        ReportType::Groundwater => GROUNDWATER,
        ReportType::Sediment => SEDIMENT,
    }
}

/// Profile categories a layout reads, without repeats.
pub fn required_categories(report: ReportType) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for entry in layout_for(report) {
        if let Some(Category(name)) = scope_of(&entry.section) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

fn scope_of(section: &Section) -> Option<ParameterScope> {
    match *section {
        ParameterList(scope)
        | StratifiedSummary(scope)
        | ComplianceRate(scope)
        | CompositionChart(scope)
        | FractionMean(scope, _)
        | ComparisonCharts(scope)
        | TrendCharts(scope)
        | GroupedTable { scope, .. }
        | FlaggedPivot { scope, .. } => Some(scope),
        _ => None,
    }
}
