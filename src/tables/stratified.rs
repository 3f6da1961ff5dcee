use super::stats::mean;
use super::{Cell, Column, PresentationTable};
use crate::config::{DisplayLabels, ParameterCategory};
use crate::core::{SampleSet, Stratum};
use serde::Serialize;

/// Overall and per-depth means of one parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StratifiedMean {
    pub parameter: String,
    pub overall: Option<f64>,
    /// Indexed by [`Stratum::index`]
    pub strata: [Option<f64>; 3],
}

impl StratifiedMean {
    pub fn stratum(&self, stratum: Stratum) -> Option<f64> {
        self.strata[stratum.index()]
    }
}

/// Rows without a recognised stratum count toward the overall mean only.
pub fn stratified_mean(samples: &SampleSet, parameter: &str) -> StratifiedMean {
    let mut buckets: [Vec<f64>; 3] = Default::default();
    let mut all = Vec::new();

    for sample in samples.iter() {
        let Some(value) = sample.number(parameter) else {
            continue;
        };
        all.push(value);
        if let Some(stratum) = sample.stratum() {
            buckets[stratum.index()].push(value);
        }
    }

    StratifiedMean {
        parameter: parameter.to_string(),
        overall: mean(all),
        strata: buckets.map(mean),
    }
}

/// One row per category parameter: parameter, total, then one column per
/// stratum. Undefined means are empty cells.
pub fn stratified_summary_table(
    samples: &SampleSet,
    category: &ParameterCategory,
    labels: &DisplayLabels,
) -> PresentationTable {
    let mut columns = vec![
        Column::named(labels.parameter.clone()),
        Column::named(labels.total.clone()),
    ];
    columns.extend(
        Stratum::ALL
            .iter()
            .map(|s| Column::named(labels.stratum(*s).to_string())),
    );
    let mut table = PresentationTable::new(columns);

    for parameter in &category.parameters {
        let means = stratified_mean(samples, parameter);
        let mut cells = vec![
            Cell::text(parameter.clone()),
            Cell::from_option(means.overall),
        ];
        cells.extend(means.strata.iter().map(|m| Cell::from_option(*m)));
        table.push_row(cells);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SampleRecord;
    use pretty_assertions::assert_eq;

    fn samples() -> SampleSet {
        vec![
            SampleRecord::new("P1", "Superfície", "C").with_number("OD", 6.0),
            SampleRecord::new("P1", "Fundo", "C").with_number("OD", 4.0),
            SampleRecord::new("P2", "Superfície", "C").with_number("OD", 8.0),
            SampleRecord::new("P2", "Fundo", "C").with_text("OD", "n.d."),
            SampleRecord::new("P3", "N/A", "C").with_number("OD", 3.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn means_split_by_stratum() {
        let means = stratified_mean(&samples(), "OD");
        assert_eq!(means.overall, Some(5.25));
        assert_eq!(means.stratum(Stratum::Surface), Some(7.0));
        assert_eq!(means.stratum(Stratum::Bottom), Some(4.0));
        assert_eq!(means.stratum(Stratum::Middle), None);
    }

    #[test]
    fn parameter_without_numbers_has_no_means() {
        let means = stratified_mean(&samples(), "Turbidez");
        assert_eq!(means.overall, None);
        assert_eq!(means.strata, [None, None, None]);
    }

    #[test]
    fn summary_table_has_one_row_per_parameter() {
        let category = ParameterCategory::new("campo", ["OD", "Turbidez"]);
        let table = stratified_summary_table(&samples(), &category, &DisplayLabels::default());

        let titles: Vec<&str> = table.columns().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Parâmetro", "Total", "Superfície", "Meio", "Fundo"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, "Superfície"), Some(&Cell::Number(7.0)));
        assert_eq!(table.cell(0, "Meio"), Some(&Cell::Empty));
        assert_eq!(table.cell(1, "Total"), Some(&Cell::Empty));
    }
}
