use serde::{Deserialize, Serialize};

/// Static catalog entry of a monitoring program indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorDefinition {
    pub program: String,
    /// Indicator type code, e.g. "ICA" or "IDG"
    pub kind: String,
    pub description: String,
    pub parameter: String,
    pub unit: String,
    pub target: String,
}

impl IndicatorDefinition {
    pub fn new(description: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            program: String::new(),
            kind: String::new(),
            description: description.into(),
            parameter: parameter.into(),
            unit: String::new(),
            target: String::new(),
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }
}
