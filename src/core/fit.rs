//! Fitting the view around a geographic region.

use crate::core::{
    bounds::Bounds,
    constants::FIT_PADDING_BOTTOM,
    geo::{LatLng, LatLngBounds, Point},
    viewport::Viewport,
};
use serde::{Deserialize, Serialize};

/// Options for fitting the view around bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitBoundsOptions {
    /// Space in pixels kept free at the top-left corner
    pub padding_top_left: Point,
    /// Space in pixels kept free at the bottom-right corner
    pub padding_bottom_right: Point,
    /// Upper limit for the resulting zoom
    pub max_zoom: Option<f64>,
}

impl Default for FitBoundsOptions {
    fn default() -> Self {
        Self {
            padding_top_left: Point::new(0.0, 0.0),
            padding_bottom_right: Point::new(0.0, FIT_PADDING_BOTTOM),
            max_zoom: None,
        }
    }
}

impl FitBoundsOptions {
    /// Same padding on every side
    pub fn with_padding(padding: Point) -> Self {
        Self {
            padding_top_left: padding,
            padding_bottom_right: padding,
            max_zoom: None,
        }
    }

    pub fn with_max_zoom(mut self, max_zoom: f64) -> Self {
        self.max_zoom = Some(max_zoom);
        self
    }
}

/// Result of a fit request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitOutcome {
    /// The view was moved; carries the resulting center and zoom
    Fitted { center: LatLng, zoom: f64 },
    /// No usable region; the view was left as is
    Skipped,
}

impl FitOutcome {
    pub fn is_fitted(&self) -> bool {
        matches!(self, FitOutcome::Fitted { .. })
    }
}

/// Largest zoom at which `bounds` fits into the view minus `padding`
pub fn bounds_zoom(viewport: &Viewport, bounds: &LatLngBounds, padding: Point) -> f64 {
    let zoom = viewport.zoom;
    let size = viewport.size.subtract(&padding);
    let projected = Bounds::from_corners(
        viewport.project(&bounds.south_east(), Some(zoom)),
        viewport.project(&bounds.north_west(), Some(zoom)),
    )
    .size();

    // Zero-sized bounds yield an infinite scale and end up at the max zoom
    let scale = (size.x / projected.x).min(size.y / projected.y);
    let mut zoom = Viewport::scale_zoom(scale, zoom);

    let snap = viewport.zoom_snap;
    if snap > 0.0 {
        let fine = snap / 100.0;
        zoom = (zoom / fine).round() * fine;
        zoom = (zoom / snap).floor() * snap;
    }

    zoom.max(viewport.min_zoom).min(viewport.max_zoom)
}

/// Center and zoom that frame `bounds` with the given options.
///
/// Returns `None` when the bounds are not finite.
pub fn compute_fit(
    viewport: &Viewport,
    bounds: &LatLngBounds,
    options: &FitBoundsOptions,
) -> Option<(LatLng, f64)> {
    if !bounds.is_valid() {
        return None;
    }

    let padding_tl = options.padding_top_left;
    let padding_br = options.padding_bottom_right;

    let mut zoom = bounds_zoom(viewport, bounds, padding_tl.add(&padding_br));
    if let Some(max_zoom) = options.max_zoom {
        zoom = zoom.min(max_zoom);
    }
    if !zoom.is_finite() {
        return None;
    }

    let offset = padding_br.subtract(&padding_tl).divide(2.0);
    let sw = viewport.project(&bounds.south_west, Some(zoom));
    let ne = viewport.project(&bounds.north_east, Some(zoom));
    let center = viewport.unproject(&sw.add(&ne).divide(2.0).add(&offset), Some(zoom));

    Some((center, zoom))
}
