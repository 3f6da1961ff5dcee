use super::canvas::{Canvas, PlotArea, ValueScale};
use super::{
    ChartArtifact, LegendEntry, CHART_HEIGHT, CHART_WIDTH, LIMIT_COLOR, MEAN_POINT_COLOR,
    MEAN_TOTAL_COLOR, STRATUM_COLORS,
};
use crate::config::{DisplayLabels, Limit, ThresholdTable};
use crate::core::{format_number, SampleSet, Stratum};
use crate::errors::Result;
use crate::tables::mean;
use tracing::debug;

/// Values plotted by one parameter-comparison chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSeries {
    pub parameter: String,
    pub class: String,
    /// Points of the class, in first-appearance order
    pub points: Vec<String>,
    /// Mean per (point, stratum), indexed by [`Stratum::index`]
    pub cells: Vec<[Option<f64>; 3]>,
    /// Mean of all defined cells
    pub grand_mean: Option<f64>,
    /// Mean of each point's defined cells
    pub point_means: Vec<Option<f64>>,
    pub limit: Limit,
}

impl ComparisonSeries {
    /// Collect the plotted values of `parameter` for the rows of `class`.
    /// Rows without a recognised stratum are not plotted.
    pub fn collect(
        samples: &SampleSet,
        class: &str,
        parameter: &str,
        thresholds: &ThresholdTable,
    ) -> Self {
        let rows = samples.for_class(class);
        let points: Vec<String> = rows.points().into_iter().map(str::to_string).collect();

        let cells: Vec<[Option<f64>; 3]> = points
            .iter()
            .map(|point| {
                Stratum::ALL.map(|stratum| {
                    mean(rows.iter().filter_map(|r| {
                        (r.point == *point && r.stratum() == Some(stratum))
                            .then(|| r.number(parameter))
                            .flatten()
                    }))
                })
            })
            .collect();

        let grand_mean = mean(cells.iter().flatten().flatten().copied());
        let point_means = cells
            .iter()
            .map(|cell| mean(cell.iter().flatten().copied()))
            .collect();

        Self {
            parameter: parameter.to_string(),
            class: class.to_string(),
            points,
            cells,
            grand_mean,
            point_means,
            limit: thresholds.limit(class, parameter),
        }
    }

    fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .copied()
            .chain(self.limit.as_number())
    }

    pub fn render(&self, labels: &DisplayLabels) -> Result<ChartArtifact> {
        let mut canvas = Canvas::new(CHART_WIDTH, CHART_HEIGHT);
        let area = PlotArea {
            left: 80,
            top: 40,
            width: CHART_WIDTH - 120,
            height: CHART_HEIGHT - 120,
        };
        let scale = ValueScale::covering(self.values());
        canvas.frame(&area);
        canvas.y_labels(&area, &scale);
        canvas.x_labels(&area, &self.points);

        let slots = self.points.len();
        let bar_width = area.slot_width(slots) * 0.2;
        for (index, cell) in self.cells.iter().enumerate() {
            let center = area.slot_center(index, slots);
            for stratum in Stratum::ALL {
                let Some(value) = cell[stratum.index()] else {
                    continue;
                };
                let offset = (stratum.index() as f64 - 1.0) * bar_width;
                let left = center + offset - bar_width / 2.0;
                canvas.fill_rect(
                    left,
                    scale.y(value, &area),
                    left + bar_width,
                    area.bottom() as f64,
                    STRATUM_COLORS[stratum.index()],
                );
            }
        }

        if let Some(grand_mean) = self.grand_mean {
            canvas.hline(&area, scale.y(grand_mean, &area), MEAN_TOTAL_COLOR, 2);
        }

        let point_line: Vec<(f64, f64)> = self
            .point_means
            .iter()
            .enumerate()
            .filter_map(|(index, m)| m.map(|m| (area.slot_center(index, slots), scale.y(m, &area))))
            .collect();
        canvas.polyline(&point_line, MEAN_POINT_COLOR, 2);

        if let Some(limit) = self.limit.as_number() {
            canvas.dashed_hline(&area, scale.y(limit, &area), LIMIT_COLOR, 3);
        }

        let mut legend: Vec<LegendEntry> = Stratum::ALL
            .iter()
            .map(|s| LegendEntry::new(labels.stratum(*s), STRATUM_COLORS[s.index()]))
            .collect();
        legend.push(LegendEntry::new(labels.mean_total.clone(), MEAN_TOTAL_COLOR));
        legend.push(LegendEntry::new(labels.mean_point.clone(), MEAN_POINT_COLOR));

        let (caption, annotation) = match self.limit.as_number() {
            Some(limit) => {
                legend.push(LegendEntry::new(labels.limit.clone(), LIMIT_COLOR));
                (format!("{}: {}", labels.limit, format_number(limit)), None)
            }
            None => (
                labels.no_numeric_limit.clone(),
                Some(labels.no_numeric_limit.clone()),
            ),
        };

        Ok(ChartArtifact {
            title: format!("{} - {} ({})", self.parameter, self.class, caption),
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
            png: canvas.encode_png()?,
            legend,
            annotation,
        })
    }
}

/// One comparison chart per (class, parameter) pair present in the data,
/// grouped by class. Classes come from the samples in first-appearance
/// order and each class lists the parameters in the order given.
pub fn comparison_charts<S: AsRef<str>>(
    samples: &SampleSet,
    parameters: &[S],
    thresholds: &ThresholdTable,
    labels: &DisplayLabels,
) -> Result<Vec<ChartArtifact>> {
    let mut charts = Vec::new();
    for class in samples.classes() {
        for parameter in parameters {
            let series = ComparisonSeries::collect(samples, class, parameter.as_ref(), thresholds);
            charts.push(series.render(labels)?);
        }
    }
    debug!(charts = charts.len(), "Rendered comparison charts");
    Ok(charts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::has_ink;
    use crate::core::SampleRecord;

    fn samples() -> SampleSet {
        vec![
            SampleRecord::new("P1", "Superfície", "Classe 2").with_number("Cromo", 0.04),
            SampleRecord::new("P1", "Superfície", "Classe 2").with_number("Cromo", 0.02),
            SampleRecord::new("P1", "Fundo", "Classe 2").with_number("Cromo", 0.06),
            SampleRecord::new("P2", "Meio", "Classe 2").with_text("Cromo", "< LQ"),
            SampleRecord::new("P3", "Superfície", "Classe 3").with_number("Cromo", 0.5),
        ]
        .into_iter()
        .collect()
    }

    fn thresholds() -> ThresholdTable {
        ThresholdTable::new().with_value("Classe 2", "Cromo", 0.05)
    }

    #[test]
    fn series_averages_each_point_and_stratum() {
        let series = ComparisonSeries::collect(&samples(), "Classe 2", "Cromo", &thresholds());

        assert_eq!(series.points, vec!["P1", "P2"]);
        let p1 = series.cells[0];
        assert!((p1[0].unwrap() - 0.03).abs() < 1e-12);
        assert_eq!(p1[1], None);
        assert_eq!(p1[2], Some(0.06));
        assert_eq!(series.cells[1], [None, None, None]);
        assert!((series.grand_mean.unwrap() - 0.045).abs() < 1e-12);
        assert_eq!(series.point_means[1], None);
        assert_eq!(series.limit, Limit::Value(0.05));
    }

    #[test]
    fn one_chart_per_parameter_and_class() {
        let charts =
            comparison_charts(&samples(), &["Cromo"], &thresholds(), &DisplayLabels::default())
                .unwrap();

        assert_eq!(charts.len(), 2);
        assert_eq!(charts[0].title, "Cromo - Classe 2 (VMP: 0.05)");
        assert_eq!(charts[0].annotation, None);
        assert_eq!(charts[0].width, CHART_WIDTH);
        assert!(charts[0].png.starts_with(b"\x89PNG"));
    }

    #[test]
    fn class_without_limit_renders_with_annotation() {
        let charts =
            comparison_charts(&samples(), &["Cromo"], &thresholds(), &DisplayLabels::default())
                .unwrap();

        let unlimited = &charts[1];
        assert_eq!(unlimited.title, "Cromo - Classe 3 (sem limite numérico)");
        assert_eq!(unlimited.annotation.as_deref(), Some("sem limite numérico"));
        assert!(unlimited.legend.iter().all(|entry| entry.label != "VMP"));
    }

    #[test]
    fn parameter_absent_everywhere_still_renders() {
        let charts =
            comparison_charts(&samples(), &["Níquel"], &thresholds(), &DisplayLabels::default())
                .unwrap();
        assert_eq!(charts.len(), 2);
    }

    #[test]
    fn charts_are_grouped_by_class() {
        let samples: SampleSet = vec![
            SampleRecord::new("P1", "Superfície", "Classe 1")
                .with_number("Cromo", 0.01)
                .with_number("Zinco", 0.2),
            SampleRecord::new("P2", "Fundo", "Classe 2")
                .with_number("Cromo", 0.03)
                .with_number("Zinco", 0.4),
        ]
        .into_iter()
        .collect();

        let charts = comparison_charts(
            &samples,
            &["Cromo", "Zinco"],
            &ThresholdTable::new(),
            &DisplayLabels::default(),
        )
        .unwrap();

        let titles: Vec<&str> = charts
            .iter()
            .map(|c| c.title.split(" (").next().unwrap())
            .collect();
        assert_eq!(
            titles,
            vec![
                "Cromo - Classe 1",
                "Zinco - Classe 1",
                "Cromo - Classe 2",
                "Zinco - Classe 2"
            ]
        );
    }

    #[test]
    fn point_ids_and_values_are_drawn_on_the_axes() {
        let charts =
            comparison_charts(&samples(), &["Cromo"], &thresholds(), &DisplayLabels::default())
                .unwrap();

        let label_band = CHART_HEIGHT - 120 + 40 + 4..CHART_HEIGHT;
        assert!(has_ink(&charts[0].png, 80..CHART_WIDTH - 40, label_band));
        assert!(has_ink(&charts[0].png, 0..76, 0..CHART_HEIGHT));
    }

    #[test]
    fn charts_leave_samples_untouched() {
        let before = samples();
        let after = before.clone();
        comparison_charts(&after, &["Cromo"], &thresholds(), &DisplayLabels::default()).unwrap();
        assert_eq!(before, after);
    }
}
