use super::canvas::{Canvas, PlotArea, ValueScale};
use super::{ChartArtifact, LegendEntry, LIMIT_COLOR, SERIES_COLOR, TREND_MEAN_COLOR};
use crate::config::{DisplayLabels, ThresholdTable};
use crate::core::SampleSet;
use crate::errors::Result;
use crate::tables::overall_mean;
use tracing::debug;

const WIDTH: u32 = 960;
const HEIGHT: u32 = 600;

/// Numeric limits of `parameter` for every class in the data, without
/// repeated values.
fn class_limits(samples: &SampleSet, parameter: &str, thresholds: &ThresholdTable) -> Vec<f64> {
    let mut limits: Vec<f64> = Vec::new();
    for class in samples.classes() {
        if let Some(limit) = thresholds.limit(class, parameter).as_number() {
            if !limits.contains(&limit) {
                limits.push(limit);
            }
        }
    }
    limits
}

fn limit_legend(samples: &SampleSet, labels: &DisplayLabels) -> String {
    match samples.classes().as_slice() {
        [single] => format!("{} ({})", labels.limit, single),
        _ => format!("{} (por classe)", labels.limit),
    }
}

fn render(
    samples: &SampleSet,
    parameter: &str,
    thresholds: &ThresholdTable,
    x_label: &str,
    labels: &DisplayLabels,
) -> Result<ChartArtifact> {
    let values: Vec<Option<f64>> = samples.iter().map(|r| r.number(parameter)).collect();
    let average = overall_mean(samples, parameter);
    let limits = class_limits(samples, parameter, thresholds);

    let mut canvas = Canvas::new(WIDTH, HEIGHT);
    let area = PlotArea {
        left: 80,
        top: 40,
        width: WIDTH - 120,
        height: HEIGHT - 120,
    };
    let scale =
        ValueScale::covering(values.iter().flatten().copied().chain(limits.iter().copied()));
    canvas.frame(&area);
    canvas.y_labels(&area, &scale);
    let points: Vec<&str> = samples.iter().map(|r| r.point.as_str()).collect();
    canvas.x_labels(&area, &points);

    let slots = values.len();
    let series: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (area.slot_center(i, slots), scale.y(v, &area))))
        .collect();
    canvas.polyline(&series, SERIES_COLOR, 2);
    for (x, y) in &series {
        canvas.marker(*x, *y, SERIES_COLOR);
    }

    let mut legend = vec![LegendEntry::new(labels.samples.clone(), SERIES_COLOR)];
    if let Some(average) = average {
        canvas.dashed_hline(&area, scale.y(average, &area), TREND_MEAN_COLOR, 2);
        legend.push(LegendEntry::new(
            format!("Média ({:.2})", average),
            TREND_MEAN_COLOR,
        ));
    }
    for limit in &limits {
        canvas.dashed_hline(&area, scale.y(*limit, &area), LIMIT_COLOR, 2);
    }
    if !limits.is_empty() {
        legend.push(LegendEntry::new(limit_legend(samples, labels), LIMIT_COLOR));
    }

    Ok(ChartArtifact {
        title: format!("{} vs {}", parameter, x_label),
        width: WIDTH,
        height: HEIGHT,
        png: canvas.encode_png()?,
        legend,
        annotation: limits
            .is_empty()
            .then(|| labels.no_numeric_limit.clone()),
    })
}

/// One value-by-point line chart per parameter, with the mean and the
/// numeric limit of each class present in the data.
pub fn trend_charts<S: AsRef<str>>(
    samples: &SampleSet,
    parameters: &[S],
    thresholds: &ThresholdTable,
    x_label: &str,
    labels: &DisplayLabels,
) -> Result<Vec<ChartArtifact>> {
    let charts = parameters
        .iter()
        .map(|p| render(samples, p.as_ref(), thresholds, x_label, labels))
        .collect::<Result<Vec<_>>>()?;
    debug!(charts = charts.len(), "Rendered trend charts");
    Ok(charts)
}
