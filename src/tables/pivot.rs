use super::grouped::group_by_point;
use super::{Cell, Column, PresentationTable};
use crate::compliance::{ComplianceEvaluation, ComplianceRecord, Verdict};
use crate::config::{DisplayLabels, ParameterCategory};
use crate::core::{format_number, ColumnNames, SampleSet};
use std::collections::HashMap;

/// Pivot compliance records into one row per point and one column per
/// category parameter.
///
/// Compliant values are plain numbers, exceedances are flagged cells and
/// undetermined verdicts show the unavailable marker. `passthrough`
/// columns are copied as text from the first row of each point. When a
/// point has several records for one parameter the first one wins.
pub fn flagged_pivot(
    samples: &SampleSet,
    evaluation: &ComplianceEvaluation,
    category: &ParameterCategory,
    passthrough: &[String],
    columns: &ColumnNames,
    labels: &DisplayLabels,
) -> PresentationTable {
    let mut header = vec![Column::named(columns.point.clone())];
    header.extend(
        category
            .parameters
            .iter()
            .map(|p| Column::new(category.column_key(p), p.clone())),
    );
    header.extend(passthrough.iter().map(|name| Column::named(name.clone())));
    let mut table = PresentationTable::new(header);

    let mut by_key: HashMap<(&str, &str), &ComplianceRecord> = HashMap::new();
    for record in &evaluation.records {
        by_key
            .entry((record.point.as_str(), record.parameter.as_str()))
            .or_insert(record);
    }

    for (point, rows) in group_by_point(samples) {
        let mut cells = vec![Cell::text(point)];
        cells.extend(category.parameters.iter().map(|parameter| {
            match by_key.get(&(point, parameter.as_str())) {
                Some(record) => verdict_cell(record, labels),
                None => Cell::text(labels.unavailable.clone()),
            }
        }));
        cells.extend(passthrough.iter().map(|name| match rows.first() {
            Some(row) => Cell::from_raw(row.value(name)),
            None => Cell::Empty,
        }));
        table.push_row(cells);
    }

    table
}

fn verdict_cell(record: &ComplianceRecord, labels: &DisplayLabels) -> Cell {
    match (record.verdict, record.value) {
        (Verdict::Compliant, Some(value)) => Cell::Number(value),
        (Verdict::NonCompliant, Some(value)) => Cell::Flagged(format_number(value)),
        _ => Cell::text(labels.unavailable.clone()),
    }
}
