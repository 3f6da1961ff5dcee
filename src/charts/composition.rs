use super::canvas::{Canvas, PlotArea, ValueScale, WHITE};
use super::{parse_hex_color, ChartArtifact, LegendEntry};
use crate::config::{DisplayLabels, ParameterCategory};
use crate::core::SampleSet;
use crate::errors::{Error, Result};
use image::Rgb;

const WIDTH: u32 = 960;
const HEIGHT: u32 = 720;

/// One stacked bar per sample row, one segment per fraction of `category`.
///
/// Fractions are percentages; the axis spans 0..100 unless a stack is
/// taller. Non-numeric fractions contribute no segment. Sample points
/// label the x axis and are repeated, in the same order, in the
/// annotation.
pub fn composition_chart(
    samples: &SampleSet,
    category: &ParameterCategory,
    colors: &[String],
    labels: &DisplayLabels,
) -> Result<ChartArtifact> {
    let palette = colors
        .iter()
        .map(|c| parse_hex_color(c).ok_or_else(|| Error::Chart(format!("invalid color `{}`", c))))
        .collect::<Result<Vec<Rgb<u8>>>>()?;
    if palette.len() < category.len() {
        return Err(Error::Chart(format!(
            "composition `{}` has {} fractions but {} colors",
            category.name,
            category.len(),
            palette.len()
        )));
    }

    let stacks: Vec<Vec<f64>> = samples
        .iter()
        .map(|row| {
            category
                .parameters
                .iter()
                .map(|p| row.number(p).filter(|v| *v > 0.0).unwrap_or(0.0))
                .collect()
        })
        .collect();
    let tallest = stacks
        .iter()
        .map(|stack| stack.iter().sum::<f64>())
        .fold(100.0_f64, f64::max);

    let mut canvas = Canvas::new(WIDTH, HEIGHT);
    let area = PlotArea {
        left: 80,
        top: 40,
        width: WIDTH - 120,
        height: HEIGHT - 120,
    };
    let scale = ValueScale::fixed(tallest);
    canvas.frame(&area);
    canvas.y_labels(&area, &scale);
    let points: Vec<&str> = samples.iter().map(|r| r.point.as_str()).collect();
    canvas.x_labels(&area, &points);

    let slots = stacks.len();
    let bar_width = area.slot_width(slots) * 0.6;
    for (index, stack) in stacks.iter().enumerate() {
        let left = area.slot_center(index, slots) - bar_width / 2.0;
        let mut base = 0.0;
        for (fraction, value) in stack.iter().enumerate() {
            if *value <= 0.0 {
                continue;
            }
            let top = base + value;
            canvas.fill_rect(
                left,
                scale.y(top, &area),
                left + bar_width,
                scale.y(base, &area),
                palette[fraction],
            );
            // white separator between segments
            canvas.line(left, scale.y(top, &area), left + bar_width, scale.y(top, &area), WHITE, 1);
            base = top;
        }
    }

    let legend = category
        .parameters
        .iter()
        .zip(&palette)
        .map(|(parameter, color)| LegendEntry::new(parameter.clone(), *color))
        .collect();
    let title = if category.title.is_empty() {
        category.name.clone()
    } else {
        category.title.clone()
    };

    Ok(ChartArtifact {
        title,
        width: WIDTH,
        height: HEIGHT,
        png: canvas.encode_png()?,
        legend,
        annotation: (!points.is_empty())
            .then(|| format!("{}: {}", labels.samples, points.join(", "))),
    })
}
