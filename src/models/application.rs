use crate::models::{CommentPeriod, Feature};
use serde::{Deserialize, Serialize};

/// A land-tenure application record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Geographic features of the disposition, in registry order
    #[serde(default)]
    pub features: Vec<Feature>,
    /// Open comment period, when commenting is allowed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period: Option<CommentPeriod>,
}

impl Application {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features = features;
        self
    }

    pub fn with_period(mut self, period: CommentPeriod) -> Self {
        self.current_period = Some(period);
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}
