use crate::core::Stratum;
use serde::{Deserialize, Serialize};

/// Display vocabulary written into report cells and chart captions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayLabels {
    /// Marker for values or limits that could not be read as numbers
    pub unavailable: String,
    pub achieved: String,
    pub not_achieved: String,
    pub toxic: String,
    pub surface: String,
    pub middle: String,
    pub bottom: String,
    pub total: String,
    pub parameter: String,
    pub no_numeric_limit: String,
    pub limit: String,
    pub mean_total: String,
    pub mean_point: String,
    pub samples: String,
}

impl Default for DisplayLabels {
    fn default() -> Self {
        Self {
            unavailable: "Indisponível".to_string(),
            achieved: "Alcançado".to_string(),
            not_achieved: "Não Alcançado".to_string(),
            toxic: "Tóxico".to_string(),
            surface: "Superfície".to_string(),
            middle: "Meio".to_string(),
            bottom: "Fundo".to_string(),
            total: "Total".to_string(),
            parameter: "Parâmetro".to_string(),
            no_numeric_limit: "sem limite numérico".to_string(),
            limit: "VMP".to_string(),
            mean_total: "Média total".to_string(),
            mean_point: "Média ponto".to_string(),
            samples: "Amostras".to_string(),
        }
    }
}

impl DisplayLabels {
    pub fn stratum(&self, stratum: Stratum) -> &str {
        match stratum {
            Stratum::Surface => &self.surface,
            Stratum::Middle => &self.middle,
            Stratum::Bottom => &self.bottom,
        }
    }
}
