//! Indicator scorecard: the program indicator catalog joined with the
//! compliance verdicts of the indicator parameters.

use crate::compliance::ComplianceEvaluation;
use crate::config::{DisplayLabels, IndicatorDefinition};
use crate::tables::{Cell, Column, PresentationTable};

pub const INDICATOR_COLUMN: &str = "Indicador";
pub const TARGET_COLUMN: &str = "Meta";
pub const RESULT_COLUMN: &str = "Resultado";

/// The catalog as the template lists it.
pub fn indicator_catalog_table(catalog: &[IndicatorDefinition]) -> PresentationTable {
    let mut table = PresentationTable::new(vec![
        Column::named("Programa"),
        Column::named("Tipo"),
        Column::named(INDICATOR_COLUMN),
        Column::named("Parametro"),
        Column::named("Unidade"),
        Column::named(TARGET_COLUMN),
    ]);
    for indicator in catalog {
        table.push_row(vec![
            Cell::text(indicator.program.clone()),
            Cell::text(indicator.kind.clone()),
            Cell::text(indicator.description.clone()),
            Cell::text(indicator.parameter.clone()),
            Cell::text(indicator.unit.clone()),
            Cell::text(indicator.target.clone()),
        ]);
    }
    table
}

/// Join every indicator with every determinate compliance record of its
/// parameter, in catalog order.
///
/// Indicators whose parameter has no determinate record produce no row.
/// Only the description, target and achieved / not-achieved label are
/// kept.
pub fn build_scorecard(
    catalog: &[IndicatorDefinition],
    evaluation: &ComplianceEvaluation,
    labels: &DisplayLabels,
) -> PresentationTable {
    let mut table = PresentationTable::new(vec![
        Column::named(INDICATOR_COLUMN),
        Column::named(TARGET_COLUMN),
        Column::named(RESULT_COLUMN),
    ]);

    for indicator in catalog {
        for record in evaluation.for_parameter(&indicator.parameter) {
            let Some(compliant) = record.compliant() else {
                continue;
            };
            let result = if compliant {
                &labels.achieved
            } else {
                &labels.not_achieved
            };
            table.push_row(vec![
                Cell::text(indicator.description.clone()),
                Cell::text(indicator.target.clone()),
                Cell::text(result.clone()),
            ]);
        }
    }

    table
}
