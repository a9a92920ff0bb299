use crate::{
    core::{
        geo::{LatLngBounds, Point},
        viewport::Viewport,
    },
    data::geojson::{GeoJsonFeature, GeoJsonGeometry, Position},
    layers::base::{LayerProperties, LayerTrait, LayerType},
    rendering::context::{
        Color, LineRenderStyle, PointRenderStyle, PolygonRenderStyle, RenderContext,
    },
    Result,
};
use serde::{Deserialize, Serialize};

/// Path style for rendered features (Leaflet's vector defaults)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureStyle {
    pub color: Color,
    pub weight: f32,
    pub opacity: f32,
    pub fill_color: Color,
    pub fill_opacity: f32,
    pub point_radius: f32,
}

impl Default for FeatureStyle {
    fn default() -> Self {
        let blue = Color::rgb(0x33, 0x88, 0xff);
        Self {
            color: blue,
            weight: 3.0,
            opacity: 1.0,
            fill_color: blue,
            fill_opacity: 0.2,
            point_radius: 6.0,
        }
    }
}

/// A single normalized feature drawn on the map
pub struct FeatureLayer {
    properties: LayerProperties,
    feature: GeoJsonFeature,
    bounds: Option<LatLngBounds>,
    style: FeatureStyle,
}

impl FeatureLayer {
    pub fn new(id: String, feature: GeoJsonFeature) -> Self {
        let name = feature.id_string().unwrap_or_else(|| id.clone());
        let bounds = feature.bounds();
        Self {
            properties: LayerProperties::new(id, name, LayerType::Feature),
            feature,
            bounds,
            style: FeatureStyle::default(),
        }
    }

    pub fn with_style(mut self, style: FeatureStyle) -> Self {
        self.style = style;
        self
    }

    pub fn feature(&self) -> &GeoJsonFeature {
        &self.feature
    }

    pub fn geometry(&self) -> &GeoJsonGeometry {
        &self.feature.geometry
    }

    pub fn style(&self) -> &FeatureStyle {
        &self.style
    }

    /// Draws the geometry with an extra opacity factor from the enclosing group
    pub(crate) fn draw(&self, context: &mut RenderContext, viewport: &Viewport, opacity: f32) {
        let opacity = opacity * self.properties.opacity;
        self.draw_geometry(&self.feature.geometry, context, viewport, opacity);
    }

    fn draw_geometry(
        &self,
        geometry: &GeoJsonGeometry,
        context: &mut RenderContext,
        viewport: &Viewport,
        opacity: f32,
    ) {
        let project = |positions: &[Position]| -> Vec<Point> {
            positions
                .iter()
                .map(|p| viewport.lat_lng_to_container_point(&p.to_lat_lng()))
                .collect()
        };

        match geometry {
            GeoJsonGeometry::Point { coordinates } => {
                let point = viewport.lat_lng_to_container_point(&coordinates.to_lat_lng());
                self.draw_point(&point, context, opacity);
            }
            GeoJsonGeometry::MultiPoint { coordinates } => {
                for point in project(coordinates.as_slice()) {
                    self.draw_point(&point, context, opacity);
                }
            }
            GeoJsonGeometry::LineString { coordinates } => {
                context.render_line(&project(coordinates.as_slice()), &self.line_style(opacity));
            }
            GeoJsonGeometry::MultiLineString { coordinates } => {
                for line in coordinates {
                    context.render_line(&project(line.as_slice()), &self.line_style(opacity));
                }
            }
            GeoJsonGeometry::Polygon { coordinates } => {
                self.draw_polygon(coordinates, &project, context, opacity);
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => {
                for polygon in coordinates {
                    self.draw_polygon(polygon, &project, context, opacity);
                }
            }
            GeoJsonGeometry::GeometryCollection { geometries } => {
                for member in geometries {
                    self.draw_geometry(member, context, viewport, opacity);
                }
            }
        }
    }

    fn draw_point(&self, position: &Point, context: &mut RenderContext, opacity: f32) {
        context.render_point(
            position,
            &PointRenderStyle {
                fill_color: self.style.fill_color,
                stroke_color: self.style.color,
                stroke_width: self.style.weight,
                radius: self.style.point_radius,
                opacity: self.style.opacity * opacity,
            },
        );
    }

    fn draw_polygon(
        &self,
        rings: &[Vec<Position>],
        project: &dyn Fn(&[Position]) -> Vec<Point>,
        context: &mut RenderContext,
        opacity: f32,
    ) {
        let Some((exterior, holes)) = rings.split_first() else {
            return;
        };
        let holes: Vec<Vec<Point>> = holes.iter().map(|hole| project(hole.as_slice())).collect();
        context.render_polygon(
            &project(exterior.as_slice()),
            &holes,
            &PolygonRenderStyle {
                fill_color: self.style.fill_color,
                stroke_color: self.style.color,
                stroke_width: self.style.weight,
                fill_opacity: self.style.fill_opacity * opacity,
                stroke_opacity: self.style.opacity * opacity,
            },
        );
    }

    fn line_style(&self, opacity: f32) -> LineRenderStyle {
        LineRenderStyle {
            color: self.style.color,
            width: self.style.weight,
            opacity: self.style.opacity * opacity,
        }
    }
}

impl LayerTrait for FeatureLayer {
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
        if self.properties.visible {
            self.draw(context, viewport, 1.0);
        }
        Ok(())
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        self.bounds
    }

    fn options(&self) -> serde_json::Value {
        serde_json::to_value(&self.style).unwrap_or(serde_json::Value::Null)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
