use serde::{Deserialize, Serialize};

pub type RuleId = String;

/// A named, weighted, toggleable scoring condition.
///
/// The `id` selects the condition that is evaluated; a rule whose id has no
/// wired condition never fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub weight: u32,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

impl Rule {
    pub fn new(id: &str, name: &str, description: &str, weight: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            weight,
            enabled: true,
            threshold: None,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }
}
