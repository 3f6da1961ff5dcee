use super::{Cell, Column, MergeSpan, PresentationTable};
use crate::config::ParameterCategory;
use crate::core::{ColumnNames, SampleRecord, SampleSet};
use std::collections::HashMap;

/// Column selection of a point-grouped table.
#[derive(Debug, Clone, Copy)]
pub struct GroupedTableSpec<'a> {
    pub columns: &'a ColumnNames,
    pub category: &'a ParameterCategory,
    /// Whether the stratification tag gets its own column
    pub include_stratum: bool,
}

/// Reshape sample rows into a table grouped by point.
///
/// Rows of the same point are emitted together even when they are not
/// adjacent in the source; groups appear in the order each point first
/// appears. The point label is written on the first row of its group and
/// a [`MergeSpan`] covers the whole group.
pub fn build_grouped_table(samples: &SampleSet, spec: GroupedTableSpec<'_>) -> PresentationTable {
    let mut table = PresentationTable::new(header(spec));

    for (point, rows) in group_by_point(samples) {
        let first_row = table.row_count();
        for (offset, sample) in rows.iter().enumerate() {
            let label = if offset == 0 {
                Cell::text(point)
            } else {
                Cell::Empty
            };
            table.push_row(row_cells(label, sample, spec));
        }
        table.push_merge(MergeSpan {
            column: 0,
            first_row,
            row_count: rows.len(),
        });
    }

    table
}

fn header(spec: GroupedTableSpec<'_>) -> Vec<Column> {
    let mut columns = vec![Column::named(spec.columns.point.clone())];
    if spec.include_stratum {
        columns.push(Column::named(spec.columns.stratum.clone()));
    }
    columns.push(Column::named(spec.columns.analysis_type.clone()));
    columns.extend(
        spec.category
            .parameters
            .iter()
            .map(|p| Column::new(spec.category.column_key(p), p.clone())),
    );
    columns
}

fn row_cells(label: Cell, sample: &SampleRecord, spec: GroupedTableSpec<'_>) -> Vec<Cell> {
    let mut cells = vec![label];
    if spec.include_stratum {
        cells.push(Cell::text(sample.stratum_tag.clone()));
    }
    cells.push(Cell::text(sample.analysis_type.clone()));
    cells.extend(
        spec.category
            .parameters
            .iter()
            .map(|p| Cell::from_raw(sample.value(p))),
    );
    cells
}

/// Group rows by point, keyed in first-appearance order.
pub(crate) fn group_by_point(samples: &SampleSet) -> Vec<(&str, Vec<&SampleRecord>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&SampleRecord>)> = Vec::new();

    for sample in samples.iter() {
        let point = sample.point.as_str();
        match index.get(point) {
            Some(&slot) => groups[slot].1.push(sample),
            None => {
                index.insert(point, groups.len());
                groups.push((point, vec![sample]));
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RawValue;
    use pretty_assertions::assert_eq;

    fn category() -> ParameterCategory {
        ParameterCategory::new("metais", ["Cromo", "Zinco"])
    }

    fn samples() -> SampleSet {
        vec![
            SampleRecord::new("P1", "Superfície", "C2")
                .with_analysis_type("Química")
                .with_number("Cromo", 0.01),
            SampleRecord::new("P2", "Superfície", "C2")
                .with_analysis_type("Química")
                .with_number("Cromo", 0.02),
            SampleRecord::new("P1", "Fundo", "C2")
                .with_analysis_type("Química")
                .with_number("Cromo", 0.03)
                .with_value("Zinco", RawValue::Text("< LQ".into())),
        ]
        .into_iter()
        .collect()
    }

    fn build(include_stratum: bool) -> PresentationTable {
        let columns = ColumnNames::default();
        let category = category();
        build_grouped_table(
            &samples(),
            GroupedTableSpec {
                columns: &columns,
                category: &category,
                include_stratum,
            },
        )
    }

    #[test]
    fn non_adjacent_rows_of_a_point_merge_into_one_group() {
        let table = build(true);

        let points: Vec<String> = table.column_cells("Ponto").iter().map(|c| c.display()).collect();
        assert_eq!(points, vec!["P1", "", "P2"]);
        assert_eq!(
            table.merges(),
            &[
                MergeSpan { column: 0, first_row: 0, row_count: 2 },
                MergeSpan { column: 0, first_row: 2, row_count: 1 },
            ]
        );

        let chromium: Vec<String> =
            table.column_cells("Cromo").iter().map(|c| c.display()).collect();
        assert_eq!(chromium, vec!["0.01", "0.03", "0.02"]);
    }

    #[test]
    fn header_lists_category_parameters_in_order() {
        let table = build(false);
        let titles: Vec<&str> = table.columns().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Ponto", "Tipo de análise", "Cromo", "Zinco"]);
    }

    #[test]
    fn missing_parameters_render_as_empty_cells() {
        let table = build(true);
        assert_eq!(table.cell(0, "Zinco"), Some(&Cell::Empty));
        assert_eq!(table.cell(1, "Zinco"), Some(&Cell::text("< LQ")));
        assert_eq!(table.cell(1, "Profundidade"), Some(&Cell::text("Fundo")));
    }

    #[test]
    fn empty_sample_set_gives_header_only() {
        let columns = ColumnNames::default();
        let category = category();
        let table = build_grouped_table(
            &SampleSet::default(),
            GroupedTableSpec {
                columns: &columns,
                category: &category,
                include_stratum: true,
            },
        );
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), 5);
        assert!(table.merges().is_empty());
    }
}
