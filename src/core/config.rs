//! Configuration for the application map view
//!
//! A `ViewerConfig` groups the map options, the fit options used for the
//! initial fit and the reset button, and the scale bar options. Presets are
//! available through `ViewerProfile`, and any config can be loaded from
//! (partial) JSON.

use crate::{
    core::{fit::FitBoundsOptions, geo::Point, map::MapOptions},
    layers::registry::{BaseLayerRegistry, DEFAULT_BASE_LAYER},
    ui::scale::ScaleOptions,
    Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerProfile {
    /// The application page: world bounds, bottom fit padding, all gestures
    Page,
    /// Small embedded preview with map gestures off
    Embedded,
    /// No fit padding, e.g. for image export
    Unpadded,
    Custom(ViewerConfig),
}

impl ViewerProfile {
    pub fn resolve(&self) -> ViewerConfig {
        match self {
            Self::Page => ViewerConfig::default(),
            Self::Embedded => ViewerConfig {
                map: MapOptions {
                    dragging: false,
                    scroll_wheel_zoom: false,
                    double_click_zoom: false,
                    ..MapOptions::default()
                },
                scale: ScaleOptions {
                    imperial: false,
                    ..ScaleOptions::default()
                },
                ..ViewerConfig::default()
            },
            Self::Unpadded => ViewerConfig {
                fit: FitBoundsOptions::with_padding(Point::new(0.0, 0.0)),
                ..ViewerConfig::default()
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for ViewerProfile {
    fn default() -> Self {
        Self::Page
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub map: MapOptions,
    pub fit: FitBoundsOptions,
    pub scale: ScaleOptions,
    pub default_base_layer: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            map: MapOptions::default(),
            fit: FitBoundsOptions::default(),
            scale: ScaleOptions::default(),
            default_base_layer: DEFAULT_BASE_LAYER.to_string(),
        }
    }
}

impl ViewerConfig {
    /// Parses a config; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects zoom limits that cross and base layer names outside the catalog
    pub fn validate(&self) -> Result<()> {
        self.map.validate()?;
        BaseLayerRegistry::with_default(&self.default_base_layer)?;
        Ok(())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapError;

    #[test]
    fn test_profile_presets() {
        let page = ViewerProfile::Page.resolve();
        assert_eq!(page.default_base_layer, "World Imagery");
        assert_eq!(page.fit.padding_bottom_right, Point::new(0.0, 25.0));
        assert!(page.map.dragging);

        let embedded = ViewerProfile::Embedded.resolve();
        assert!(!embedded.map.dragging);
        assert!(!embedded.map.scroll_wheel_zoom);
        assert!(embedded.scale.metric && !embedded.scale.imperial);

        let unpadded = ViewerProfile::Unpadded.resolve();
        assert_eq!(unpadded.fit.padding_bottom_right, Point::new(0.0, 0.0));

        let custom = ViewerProfile::Custom(embedded.clone()).resolve();
        assert_eq!(custom, embedded);
    }

    #[test]
    fn test_partial_json() {
        let config = ViewerConfig::from_json_str(
            r#"{
                "map": { "max_zoom": 15, "zoom_delta": 0.5 },
                "default_base_layer": "Ocean Base"
            }"#,
        )
        .unwrap();

        assert_eq!(config.map.max_zoom, Some(15.0));
        assert_eq!(config.map.zoom_delta, 0.5);
        assert!(config.map.dragging);
        assert_eq!(config.default_base_layer, "Ocean Base");
        assert_eq!(config.fit, FitBoundsOptions::default());
        assert_eq!(config.scale.max_width, 100.0);
    }

    #[test]
    fn test_json_round_trip_and_errors() {
        let config = ViewerProfile::Embedded.resolve();
        let json = config.to_json_string().unwrap();
        assert_eq!(ViewerConfig::from_json_str(&json).unwrap(), config);

        assert!(matches!(
            ViewerConfig::from_json_str("{ not json"),
            Err(MapError::Serialization(_))
        ));
        assert!(matches!(
            ViewerConfig::from_path("/nonexistent/tenure-map.json"),
            Err(MapError::Io(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{ "map": { "min_zoom": 12, "max_zoom": 3 } }"#),
            Err(MapError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn test_unknown_base_layer_is_rejected() {
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{ "default_base_layer": "Bing" }"#),
            Err(MapError::UnknownBaseLayer(name)) if name == "Bing"
        ));

        let mut config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        config.default_base_layer = "Street Map".to_string();
        assert!(config.validate().is_err());
    }
}
