//! Chart synthesis.
//!
//! Every chart is rendered to an in-memory PNG. Titles, legends and the
//! "no numeric limit" annotation travel next to the pixels as metadata so
//! the document template can typeset them. Synthesis only reads the
//! sample set.

pub mod canvas;
pub mod comparison;
pub mod composition;
pub mod trend;

pub use comparison::{comparison_charts, ComparisonSeries};
pub use composition::composition_chart;
pub use trend::trend_charts;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::Rgb;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

pub const CHART_WIDTH: u32 = 1200;
pub const CHART_HEIGHT: u32 = 600;

/// Series colors for the three strata, then the reference lines.
pub const STRATUM_COLORS: [Rgb<u8>; 3] =
    [Rgb([0, 114, 178]), Rgb([230, 159, 0]), Rgb([0, 158, 115])];
pub const MEAN_TOTAL_COLOR: Rgb<u8> = Rgb([86, 180, 233]);
pub const MEAN_POINT_COLOR: Rgb<u8> = Rgb([128, 128, 0]);
pub const LIMIT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const SERIES_COLOR: Rgb<u8> = Rgb([31, 119, 180]);
pub const TREND_MEAN_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

impl LegendEntry {
    pub fn new(label: impl Into<String>, color: Rgb<u8>) -> Self {
        Self {
            label: label.into(),
            color: hex_color(color),
        }
    }
}

/// One rendered chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartArtifact {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
    pub legend: Vec<LegendEntry>,
    /// Caption shown under the chart, e.g. when no numeric limit applies
    pub annotation: Option<String>,
}

impl ChartArtifact {
    pub fn png_base64(&self) -> String {
        STANDARD.encode(&self.png)
    }
}

impl Serialize for ChartArtifact {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ChartArtifact", 6)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("width", &self.width)?;
        state.serialize_field("height", &self.height)?;
        state.serialize_field("png_base64", &self.png_base64())?;
        state.serialize_field("legend", &self.legend)?;
        state.serialize_field("annotation", &self.annotation)?;
        state.end()
    }
}

/// Parse a `#rrggbb` color.
pub fn parse_hex_color(text: &str) -> Option<Rgb<u8>> {
    let hex = text.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Rgb([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
}

pub fn hex_color(color: Rgb<u8>) -> String {
    let [r, g, b] = color.0;
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Whether any pixel of the encoded chart inside the given ranges is not
/// white.
#[cfg(test)]
pub(crate) fn has_ink(png: &[u8], xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) -> bool {
    let image = image::load_from_memory(png).unwrap().to_rgb8();
    ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
        .any(|(x, y)| *image.get_pixel(x, y) != canvas::WHITE)
}
