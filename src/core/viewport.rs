use crate::core::{
    bounds::Bounds,
    constants::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_ZOOM_SNAP, EARTH_RADIUS, TILE_SIZE},
    fit::{compute_fit, FitBoundsOptions, FitOutcome},
    geo::{LatLng, LatLngBounds, Point},
};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
    /// Zoom levels are rounded to multiples of this value (0 disables snapping)
    pub zoom_snap: f64,
    /// Maximum bounds for the map
    max_bounds: Option<LatLngBounds>,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(DEFAULT_MIN_ZOOM, DEFAULT_MAX_ZOOM),
            size,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            zoom_snap: DEFAULT_ZOOM_SNAP,
            max_bounds: None,
        }
    }

    /// Sets the maximum bounds and pulls the current view back inside them
    pub fn set_max_bounds(&mut self, bounds: Option<LatLngBounds>) {
        self.max_bounds = bounds;
        self.center = self.limit_center(self.center, self.zoom);
    }

    /// Get the maximum bounds for the map if set
    pub fn max_bounds(&self) -> Option<&LatLngBounds> {
        self.max_bounds.as_ref()
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom.min(max_zoom);
        self.max_zoom = max_zoom.max(min_zoom);
        self.zoom = self.zoom.max(self.min_zoom).min(self.max_zoom);
    }

    pub fn set_zoom_snap(&mut self, snap: f64) {
        self.zoom_snap = snap.max(0.0);
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Map scale (world size in pixels) at the given zoom
    pub fn zoom_scale(zoom: f64) -> f64 {
        TILE_SIZE as f64 * 2_f64.powf(zoom)
    }

    /// Zoom reached by scaling `from_zoom` by `scale`, infinite when the scale is not a number
    pub fn scale_zoom(scale: f64, from_zoom: f64) -> f64 {
        let zoom = from_zoom + scale.log2();
        if zoom.is_nan() {
            f64::INFINITY
        } else {
            zoom
        }
    }

    /// Projects a LatLng to world pixel coordinates at the given zoom level
    /// (spherical Web Mercator, EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let scale = Self::zoom_scale(zoom.unwrap_or(self.zoom));
        let lat = LatLng::clamp_lat(lat_lng.lat);

        let x = lat_lng.lng.to_radians() * EARTH_RADIUS;
        let y = (PI / 4.0 + lat.to_radians() / 2.0).tan().ln() * EARTH_RADIUS;

        let circumference = 2.0 * PI * EARTH_RADIUS;
        Point::new(
            (x + PI * EARTH_RADIUS) / circumference * scale,
            (-y + PI * EARTH_RADIUS) / circumference * scale,
        )
    }

    /// Unprojects world pixel coordinates back to LatLng at the given zoom level
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let scale = Self::zoom_scale(zoom.unwrap_or(self.zoom));
        let circumference = 2.0 * PI * EARTH_RADIUS;

        let x = (pixel.x / scale) * circumference - PI * EARTH_RADIUS;
        let y = PI * EARTH_RADIUS - (pixel.y / scale) * circumference;

        let lng = (x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();

        LatLng::new(lat, lng)
    }

    /// Top-left corner of the view in world pixels
    pub fn pixel_origin(&self) -> Point {
        self.project(&self.center, None)
            .subtract(&self.size.divide(2.0))
    }

    /// The visible area in world pixels at the current zoom
    pub fn pixel_bounds(&self) -> Bounds {
        Bounds::from_origin_and_size(self.pixel_origin(), self.size)
    }

    /// Converts a geographical coordinate to container (screen) pixel coordinates
    pub fn lat_lng_to_container_point(&self, lat_lng: &LatLng) -> Point {
        self.project(lat_lng, None).subtract(&self.pixel_origin())
    }

    /// Converts container pixel coordinates back to geographical coordinates
    pub fn container_point_to_lat_lng(&self, point: &Point) -> LatLng {
        self.unproject(&point.add(&self.pixel_origin()), None)
    }

    /// Gets the current viewport bounds in geographical coordinates
    pub fn bounds(&self) -> LatLngBounds {
        let nw = self.container_point_to_lat_lng(&Point::new(0.0, 0.0));
        let se = self.container_point_to_lat_lng(&self.size);

        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }

    /// Snaps a zoom level and clamps it to the zoom limits
    pub fn limit_zoom(&self, zoom: f64) -> f64 {
        let snapped = if self.zoom_snap > 0.0 {
            (zoom / self.zoom_snap).round() * self.zoom_snap
        } else {
            zoom
        };
        snapped.max(self.min_zoom).min(self.max_zoom)
    }

    /// Moves a prospective center so the view at `zoom` stays inside the max bounds
    pub fn limit_center(&self, center: LatLng, zoom: f64) -> LatLng {
        let Some(max_bounds) = &self.max_bounds else {
            return center;
        };

        let center_point = self.project(&center, Some(zoom));
        let view_half = self.size.divide(2.0);
        let view_bounds = Bounds::new(
            center_point.subtract(&view_half),
            center_point.add(&view_half),
        );
        let offset = self.bounds_offset(&view_bounds, max_bounds, zoom);

        if offset.x.abs() <= 1.0 && offset.y.abs() <= 1.0 {
            return center;
        }
        self.unproject(&center_point.add(&offset), Some(zoom))
    }

    fn bounds_offset(&self, view: &Bounds, max_bounds: &LatLngBounds, zoom: f64) -> Point {
        let projected = Bounds::from_corners(
            self.project(&max_bounds.north_east, Some(zoom)),
            self.project(&max_bounds.south_west, Some(zoom)),
        );
        let min_offset = projected.min.subtract(&view.min);
        let max_offset = projected.max.subtract(&view.max);

        Point::new(
            Self::rebound(min_offset.x, -max_offset.x),
            Self::rebound(min_offset.y, -max_offset.y),
        )
    }

    fn rebound(left: f64, right: f64) -> f64 {
        if left + right > 0.0 {
            (left - right).round() / 2.0
        } else {
            left.ceil().max(0.0) - right.floor().max(0.0)
        }
    }

    /// Sets center and zoom at once, returns whether anything changed
    pub fn set_view(&mut self, center: LatLng, zoom: f64) -> bool {
        let zoom = self.limit_zoom(zoom);
        let center = self.limit_center(center, zoom);
        let changed = center != self.center || zoom != self.zoom;
        self.center = center;
        self.zoom = zoom;
        changed
    }

    /// Pans the view by a pixel offset, staying inside the max bounds
    pub fn pan(&mut self, delta: Point) -> bool {
        let target = self.project(&self.center, None).add(&delta);
        let center = self.unproject(&target, None);
        self.set_view(center, self.zoom)
    }

    /// Zooms to a level, keeping `focus_point` (container pixels) fixed when given
    pub fn zoom_to(&mut self, zoom: f64, focus_point: Option<Point>) -> bool {
        let zoom = self.limit_zoom(zoom);
        let center = match focus_point {
            Some(focus) => {
                let scale = 2_f64.powf(zoom - self.zoom);
                let view_half = self.size.divide(2.0);
                let center_offset = focus.subtract(&view_half).multiply(1.0 - 1.0 / scale);
                self.container_point_to_lat_lng(&view_half.add(&center_offset))
            }
            None => self.center,
        };
        self.set_view(center, zoom)
    }

    /// Fits the view around `bounds` without animation.
    ///
    /// Missing or non-finite bounds leave the view untouched.
    pub fn fit_bounds(
        &mut self,
        bounds: Option<&LatLngBounds>,
        options: &FitBoundsOptions,
    ) -> FitOutcome {
        let Some(bounds) = bounds.filter(|b| b.is_valid()) else {
            return FitOutcome::Skipped;
        };

        match compute_fit(self, bounds, options) {
            Some((center, zoom)) => {
                self.set_view(center, zoom);
                FitOutcome::Fitted {
                    center: self.center,
                    zoom: self.zoom,
                }
            }
            None => FitOutcome::Skipped,
        }
    }

    /// Ground resolution in meters per pixel at the view center
    pub fn resolution(&self) -> f64 {
        let equator = 2.0 * PI * EARTH_RADIUS;
        equator * self.center.lat.to_radians().cos() / Self::zoom_scale(self.zoom)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}
