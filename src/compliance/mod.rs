//! Compliance evaluation of sample values against regulatory limits.
//!
//! Every (row, parameter) pair yields one [`ComplianceRecord`] with a
//! tri-state verdict. A verdict is only determinate when both the observed
//! value and the limit read as real numbers; otherwise it is
//! [`Verdict::Unknown`] and the record is left out of the compliance rate.

use crate::config::{Limit, ParameterCategory, ThresholdTable};
use crate::core::{SampleRecord, SampleSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Why a verdict could not be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownReason {
    /// The sample value is missing or not numeric
    ValueUnavailable,
    /// No limit is defined for the class / parameter
    LimitUndefined,
    /// A limit is defined but is not numeric
    LimitNonNumeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum Verdict {
    Compliant,
    NonCompliant,
    Unknown(UnknownReason),
}

impl Verdict {
    /// Compare a value with a limit. Compliance is `value <= limit`.
    pub fn judge(value: Option<f64>, limit: &Limit) -> Verdict {
        let limit = match limit {
            Limit::Value(v) => *v,
            Limit::Undefined => return Verdict::Unknown(UnknownReason::LimitUndefined),
            Limit::NonNumeric(_) => return Verdict::Unknown(UnknownReason::LimitNonNumeric),
        };
        match value {
            Some(value) if value <= limit => Verdict::Compliant,
            Some(_) => Verdict::NonCompliant,
            None => Verdict::Unknown(UnknownReason::ValueUnavailable),
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Verdict::Compliant => Some(true),
            Verdict::NonCompliant => Some(false),
            Verdict::Unknown(_) => None,
        }
    }

    pub fn is_determinate(self) -> bool {
        !matches!(self, Verdict::Unknown(_))
    }
}

/// Outcome of comparing one parameter of one sample row with its limit.
///
/// When the verdict is unknown, `value` and `limit` are both `None` and
/// render as the unavailable marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    pub point: String,
    pub class: String,
    pub stratum_tag: String,
    pub parameter: String,
    pub value: Option<f64>,
    pub limit: Option<f64>,
    pub verdict: Verdict,
}

impl ComplianceRecord {
    fn evaluate(sample: &SampleRecord, parameter: &str, thresholds: &ThresholdTable) -> Self {
        let limit = thresholds.limit(&sample.class, parameter);
        let observed = sample.number(parameter);
        let verdict = Verdict::judge(observed, &limit);
        let (value, limit) = if verdict.is_determinate() {
            (observed, limit.as_number())
        } else {
            (None, None)
        };

        Self {
            point: sample.point.clone(),
            class: sample.class.clone(),
            stratum_tag: sample.stratum_tag.clone(),
            parameter: parameter.to_string(),
            value,
            limit,
            verdict,
        }
    }

    pub fn compliant(&self) -> Option<bool> {
        self.verdict.as_bool()
    }
}

/// Verdict counts of one evaluation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    pub compliant: usize,
    pub non_compliant: usize,
    pub unknown: usize,
}

impl ComplianceSummary {
    pub fn from_records(records: &[ComplianceRecord]) -> Self {
        records
            .iter()
            .fold(Self::default(), |mut acc, record| {
                match record.verdict {
                    Verdict::Compliant => acc.compliant += 1,
                    Verdict::NonCompliant => acc.non_compliant += 1,
                    Verdict::Unknown(_) => acc.unknown += 1,
                }
                acc
            })
    }

    pub fn determinate(&self) -> usize {
        self.compliant + self.non_compliant
    }

    /// Percentage of compliant verdicts among determinate ones. `None` when
    /// no verdict is determinate.
    pub fn rate(&self) -> Option<f64> {
        match self.determinate() {
            0 => None,
            n => Some(self.compliant as f64 * 100.0 / n as f64),
        }
    }
}

/// Records and summary of one evaluation run. Transient, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceEvaluation {
    pub records: Vec<ComplianceRecord>,
    pub summary: ComplianceSummary,
}

impl ComplianceEvaluation {
    pub fn rate(&self) -> Option<f64> {
        self.summary.rate()
    }

    /// Records of one parameter, in sample order.
    pub fn for_parameter<'a>(
        &'a self,
        parameter: &'a str,
    ) -> impl Iterator<Item = &'a ComplianceRecord> + 'a {
        self.records.iter().filter(move |r| r.parameter == parameter)
    }
}

/// Evaluate every sample row against every listed parameter.
pub fn evaluate<S: AsRef<str>>(
    samples: &SampleSet,
    parameters: &[S],
    thresholds: &ThresholdTable,
) -> ComplianceEvaluation {
    let records: Vec<ComplianceRecord> = samples
        .iter()
        .flat_map(|sample| {
            parameters.iter().map(move |parameter| {
                ComplianceRecord::evaluate(sample, parameter.as_ref(), thresholds)
            })
        })
        .collect();
    let summary = ComplianceSummary::from_records(&records);

    debug!(
        rows = samples.len(),
        parameters = parameters.len(),
        compliant = summary.compliant,
        non_compliant = summary.non_compliant,
        unknown = summary.unknown,
        "Evaluated compliance"
    );

    ComplianceEvaluation { records, summary }
}

pub fn evaluate_category(
    samples: &SampleSet,
    category: &ParameterCategory,
    thresholds: &ThresholdTable,
) -> ComplianceEvaluation {
    evaluate(samples, &category.parameters, thresholds)
}
