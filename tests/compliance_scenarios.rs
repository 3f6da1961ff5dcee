//! Worked examples of compliance evaluation, grouped tables and the
//! indicator scorecard.

use monitoring_report::compliance::{evaluate, UnknownReason, Verdict};
use monitoring_report::config::{
    DisplayLabels, IndicatorDefinition, ParameterCategory, ThresholdTable,
};
use monitoring_report::core::{ColumnNames, SampleRecord, SampleSet};
use monitoring_report::scorecard::build_scorecard;
use monitoring_report::tables::{build_grouped_table, Cell, GroupedTableSpec};
use pretty_assertions::assert_eq;

fn thresholds() -> ThresholdTable {
    ThresholdTable::new().with_value("ClassX", "Cromo", 0.05)
}

#[test]
fn one_exceedance_out_of_two_rows_is_fifty_percent() {
    let samples = SampleSet::new(vec![
        SampleRecord::new("Point1", "Superfície", "ClassX").with_number("Cromo", 0.04),
        SampleRecord::new("Point1", "Fundo", "ClassX").with_number("Cromo", 0.06),
    ]);

    let evaluation = evaluate(&samples, &["Cromo"], &thresholds());

    let verdicts: Vec<(&str, Option<bool>)> = evaluation
        .records
        .iter()
        .map(|r| (r.stratum_tag.as_str(), r.compliant()))
        .collect();
    assert_eq!(verdicts, vec![("Superfície", Some(true)), ("Fundo", Some(false))]);
    assert_eq!(evaluation.rate(), Some(50.0));
}

#[test]
fn missing_value_is_unknown_and_left_out_of_the_rate() {
    let samples = SampleSet::new(vec![
        SampleRecord::new("Point1", "Superfície", "ClassX").with_number("Cromo", 0.04),
        SampleRecord::new("Point1", "Fundo", "ClassX"),
    ]);

    let evaluation = evaluate(&samples, &["Cromo"], &thresholds());

    assert_eq!(
        evaluation.records[1].verdict,
        Verdict::Unknown(UnknownReason::ValueUnavailable)
    );
    assert_eq!(evaluation.records[1].value, None);
    assert_eq!(evaluation.records[1].limit, None);
    assert_eq!(evaluation.summary.unknown, 1);
    assert_eq!(evaluation.rate(), Some(100.0));
}

#[test]
fn unknown_class_and_text_limit_are_distinct_reasons() {
    let table = thresholds().with_limit(
        "ClassX",
        "Coliformes",
        monitoring_report::config::ThresholdEntry::Text("Ausentes em 100 mL".into()),
    );
    let samples = SampleSet::new(vec![
        SampleRecord::new("P1", "", "ClassX").with_number("Coliformes", 0.0),
        SampleRecord::new("P2", "", "ClassY").with_number("Cromo", 0.01),
    ]);

    let evaluation = evaluate(&samples, &["Coliformes", "Cromo"], &table);
    let verdicts: Vec<Verdict> = evaluation.records.iter().map(|r| r.verdict).collect();

    assert_eq!(
        verdicts,
        vec![
            Verdict::Unknown(UnknownReason::LimitNonNumeric),
            Verdict::Unknown(UnknownReason::ValueUnavailable),
            Verdict::Unknown(UnknownReason::LimitUndefined),
            Verdict::Unknown(UnknownReason::LimitUndefined),
        ]
    );
    assert_eq!(evaluation.rate(), None);
}

#[test]
fn grouped_table_merges_non_adjacent_rows_of_a_point() {
    let samples = SampleSet::new(vec![
        SampleRecord::new("P1", "Superfície", "ClassX").with_number("Cromo", 0.01),
        SampleRecord::new("P2", "Superfície", "ClassX").with_number("Cromo", 0.02),
        SampleRecord::new("P1", "Fundo", "ClassX").with_number("Cromo", 0.03),
    ]);
    let columns = ColumnNames::default();
    let category = ParameterCategory::new("metais", ["Cromo"]);

    let table = build_grouped_table(
        &samples,
        GroupedTableSpec {
            columns: &columns,
            category: &category,
            include_stratum: true,
        },
    );

    let labels: Vec<Cell> = table.column_cells("Ponto").into_iter().cloned().collect();
    assert_eq!(
        labels,
        vec![Cell::text("P1"), Cell::Empty, Cell::text("P2")]
    );
    let values: Vec<String> = table
        .column_cells("Cromo")
        .into_iter()
        .map(Cell::display)
        .collect();
    assert_eq!(values, vec!["0.01", "0.03", "0.02"]);

    let spans: Vec<(usize, usize)> = table
        .merges()
        .iter()
        .map(|m| (m.first_row, m.row_count))
        .collect();
    assert_eq!(spans, vec![(0, 2), (2, 1)]);
}

#[test]
fn indicator_without_records_has_no_scorecard_row() {
    let samples = SampleSet::new(vec![
        SampleRecord::new("P1", "", "ClassX").with_number("Cromo", 0.04),
    ]);
    let evaluation = evaluate(&samples, &["Cromo"], &thresholds());
    let catalog = vec![
        IndicatorDefinition::new("Cromo dentro do limite", "Cromo").with_target("≤ 0,05"),
        IndicatorDefinition::new("Oxigênio dissolvido", "OD").with_target("≥ 5"),
    ];

    let table = build_scorecard(&catalog, &evaluation, &DisplayLabels::default());

    assert_eq!(table.row_count(), 1);
    assert_eq!(
        table.rows()[0],
        vec![
            Cell::text("Cromo dentro do limite"),
            Cell::text("≤ 0,05"),
            Cell::text("Alcançado"),
        ]
    );
}
