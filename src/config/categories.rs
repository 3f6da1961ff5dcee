use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named, ordered selection of parameter columns.
///
/// Categories may overlap. `aliases` maps a parameter to the column key the
/// report template expects when the parameter name itself is not a valid
/// template identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterCategory {
    pub name: String,
    #[serde(default)]
    pub title: String,
    pub parameters: Vec<String>,
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl ParameterCategory {
    pub fn new<I, S>(name: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            title: String::new(),
            parameters: parameters.into_iter().map(Into::into).collect(),
            aliases: BTreeMap::new(),
        }
    }

    pub fn with_alias(mut self, parameter: impl Into<String>, key: impl Into<String>) -> Self {
        self.aliases.insert(parameter.into(), key.into());
        self
    }

    pub fn contains(&self, parameter: &str) -> bool {
        self.parameters.iter().any(|p| p == parameter)
    }

    /// Template column key for a parameter: its alias, or the name itself.
    pub fn column_key<'a>(&'a self, parameter: &'a str) -> &'a str {
        self.aliases
            .get(parameter)
            .map(String::as_str)
            .unwrap_or(parameter)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}
