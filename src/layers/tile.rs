use crate::{
    core::{
        bounds::Bounds,
        constants::TILE_SIZE,
        geo::{Point, TileCoord},
        viewport::Viewport,
    },
    layers::{
        base::{LayerProperties, LayerTrait, LayerType},
        registry::BaseLayerSpec,
    },
    rendering::context::RenderContext,
    tiles::source::{TileSource, UrlTemplateSource},
    Result,
};

/// Tile range in tile coordinates, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

/// Base-map layer that emits one draw command per visible tile
pub struct TileLayer {
    properties: LayerProperties,
    spec: BaseLayerSpec,
    source: UrlTemplateSource,
}

impl TileLayer {
    pub fn new(spec: BaseLayerSpec) -> Self {
        let mut properties =
            LayerProperties::new(spec.name.clone(), spec.name.clone(), LayerType::Tile);
        // Base maps sit below every overlay
        properties.z_index = -1;
        Self {
            properties,
            source: UrlTemplateSource::new(spec.url_template.clone()),
            spec,
        }
    }

    pub fn spec(&self) -> &BaseLayerSpec {
        &self.spec
    }

    pub fn tile_source(&self) -> &dyn TileSource {
        &self.source
    }

    /// Tile zoom for a map zoom, `None` above the layer's max zoom
    pub fn tile_zoom(&self, map_zoom: f64) -> Option<u8> {
        let zoom = map_zoom.round();
        if zoom < 0.0 || zoom > self.spec.max_zoom as f64 {
            return None;
        }
        Some(zoom as u8)
    }

    /// Get tiled pixel bounds for a specific zoom level
    /// This matches Leaflet's _getTiledPixelBounds method
    pub fn get_tiled_pixel_bounds(&self, viewport: &Viewport, zoom: u8) -> Bounds {
        let scale = 2_f64.powf(viewport.zoom - zoom as f64);
        let pixel_center = viewport.project(&viewport.center, Some(zoom as f64));
        let half_size = viewport.size.divide(scale * 2.0);

        Bounds::new(pixel_center.subtract(&half_size), pixel_center.add(&half_size))
    }

    /// This matches Leaflet's _pxBoundsToTileRange method
    pub fn pixel_bounds_to_tile_range(&self, bounds: &Bounds) -> TileRange {
        let tile_size = TILE_SIZE as f64;
        TileRange {
            min_x: (bounds.min.x / tile_size).floor() as i64,
            min_y: (bounds.min.y / tile_size).floor() as i64,
            max_x: (bounds.max.x / tile_size).ceil() as i64 - 1,
            max_y: (bounds.max.y / tile_size).ceil() as i64 - 1,
        }
    }

    /// Tiles to draw for `range`, paired with the column they are drawn at.
    ///
    /// Rows outside the world are dropped. Columns outside the world are
    /// dropped when `no_wrap` is set, otherwise wrapped.
    pub fn tile_range_to_coords(&self, range: &TileRange, zoom: u8) -> Vec<(TileCoord, i64)> {
        let max_coord = 1_i64 << zoom;
        let mut coords = Vec::new();

        for y in range.min_y..=range.max_y {
            if y < 0 || y >= max_coord {
                continue;
            }
            for x in range.min_x..=range.max_x {
                if self.spec.no_wrap && (x < 0 || x >= max_coord) {
                    continue;
                }
                let wrapped_x = x.rem_euclid(max_coord);
                coords.push((TileCoord::new(wrapped_x as u32, y as u32, zoom), x));
            }
        }
        coords
    }

    /// Calculate screen bounds for a tile drawn at column `column`
    fn tile_screen_bounds(&self, column: i64, row: u32, zoom: u8, viewport: &Viewport) -> Bounds {
        let scale = 2_f64.powf(viewport.zoom - zoom as f64);
        let tile_size = TILE_SIZE as f64 * scale;

        let center_world = viewport
            .project(&viewport.center, Some(zoom as f64))
            .multiply(scale);
        let origin = Point::new(
            column as f64 * tile_size - center_world.x + viewport.size.x / 2.0,
            row as f64 * tile_size - center_world.y + viewport.size.y / 2.0,
        );

        Bounds::from_origin_and_size(origin, Point::new(tile_size, tile_size))
    }

    /// Visible tiles for the current view
    pub fn visible_tiles(&self, viewport: &Viewport) -> Vec<TileCoord> {
        let Some(zoom) = self.tile_zoom(viewport.zoom) else {
            return Vec::new();
        };
        let range = self.pixel_bounds_to_tile_range(&self.get_tiled_pixel_bounds(viewport, zoom));
        self.tile_range_to_coords(&range, zoom)
            .into_iter()
            .map(|(coord, _)| coord)
            .collect()
    }
}

impl LayerTrait for TileLayer {
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
        let Some(zoom) = self.tile_zoom(viewport.zoom) else {
            return Ok(());
        };

        let range = self.pixel_bounds_to_tile_range(&self.get_tiled_pixel_bounds(viewport, zoom));
        for (coord, column) in self.tile_range_to_coords(&range, zoom) {
            let bounds = self.tile_screen_bounds(column, coord.y, zoom, viewport);
            context.render_tile(self.source.url(coord), bounds, self.properties.opacity)?;
        }
        Ok(())
    }

    fn attribution(&self) -> Option<&str> {
        Some(&self.spec.attribution)
    }

    fn options(&self) -> serde_json::Value {
        serde_json::to_value(&self.spec).unwrap_or(serde_json::Value::Null)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
