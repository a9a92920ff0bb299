use crate::{
    core::{geo::LatLngBounds, viewport::Viewport},
    data::normalize::{normalize_feature, SkippedFeature},
    layers::{
        base::{LayerProperties, LayerTrait, LayerType},
        feature::FeatureLayer,
    },
    models::Application,
    rendering::context::RenderContext,
    MapError, Result,
};
use log::{debug, warn};

/// Outcome of loading a record's features into a group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddReport {
    /// Ids of the layers that were built, in input order
    pub added: Vec<String>,
    pub skipped: Vec<SkippedFeature>,
}

impl AddReport {
    pub fn added_count(&self) -> usize {
        self.added.len()
    }
}

/// The rendered layers of one record, attached to and detached from the map as a unit
pub struct FeatureGroup {
    properties: LayerProperties,
    record_id: String,
    layers: Vec<FeatureLayer>,
}

impl FeatureGroup {
    pub fn new(id: impl Into<String>, record_id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            properties: LayerProperties::new(id.clone(), id, LayerType::Group),
            record_id: record_id.into(),
            layers: Vec::new(),
        }
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    /// Normalizes every feature of `application` and adds one layer per success.
    ///
    /// Features that fail normalization are logged and reported, the rest still load.
    pub fn add_all(&mut self, application: &Application) -> Result<AddReport> {
        if application.id != self.record_id {
            return Err(MapError::RecordMismatch {
                expected: self.record_id.clone(),
                found: application.id.clone(),
            });
        }

        let mut report = AddReport::default();
        for (index, feature) in application.features.iter().enumerate() {
            match normalize_feature(feature) {
                Ok(geojson) => {
                    let suffix = feature.id.clone().unwrap_or_else(|| index.to_string());
                    let layer_id = format!("{}/{}", self.properties.id, suffix);
                    report.added.push(layer_id.clone());
                    self.add_layer(FeatureLayer::new(layer_id, geojson));
                }
                Err(reason) => {
                    warn!(
                        "Skipping feature {} of application {}: {}",
                        feature.id.as_deref().unwrap_or("<no id>"),
                        application.id,
                        reason
                    );
                    report.skipped.push(SkippedFeature {
                        index,
                        feature_id: feature.id.clone(),
                        reason,
                    });
                }
            }
        }

        debug!(
            "Group {} built {} layers ({} skipped)",
            self.properties.id,
            report.added.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    pub fn add_layer(&mut self, layer: FeatureLayer) {
        self.layers.push(layer);
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Member layers in insertion order
    pub fn layers(&self) -> &[FeatureLayer] {
        &self.layers
    }

    /// Union of member bounds; `None` when no member has any position
    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.layers
            .iter()
            .filter_map(|layer| layer.bounds())
            .reduce(|acc, bounds| acc.union(&bounds))
    }

    pub fn into_overlay(self) -> Box<dyn LayerTrait> {
        Box::new(self)
    }
}

impl LayerTrait for FeatureGroup {
    fn id(&self) -> &str {
        &self.properties.id
    }

    fn name(&self) -> &str {
        &self.properties.name
    }

    fn layer_type(&self) -> LayerType {
        self.properties.layer_type
    }

    fn is_visible(&self) -> bool {
        self.properties.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.properties.visible = visible;
    }

    fn opacity(&self) -> f32 {
        self.properties.opacity
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.properties.set_opacity(opacity);
    }

    fn z_index(&self) -> i32 {
        self.properties.z_index
    }

    fn set_z_index(&mut self, z_index: i32) {
        self.properties.z_index = z_index;
    }

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        if !self.properties.visible {
            return Ok(());
        }
        for layer in self.layers.iter().filter(|layer| layer.is_visible()) {
            layer.draw(context, viewport, self.properties.opacity);
        }
        Ok(())
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        FeatureGroup::bounds(self)
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "record_id": self.record_id,
            "layers": self.layers.len(),
        })
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
