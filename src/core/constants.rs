//! Core constants derived from Leaflet defaults and common web-map conventions.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Latitude limit of the spherical Web Mercator projection.
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;

/// Sphere radius used by the Web Mercator projection (EPSG:3857).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Mean earth radius used for ground distances (scale bar).
pub const MEAN_EARTH_RADIUS: f64 = 6_371_000.0;

/// Snap zoom levels to these quanta (1 → integer zooms).
pub const DEFAULT_ZOOM_SNAP: f64 = 1.0;

/// Programmatic +/- zoom step when calling `zoom_in/zoom_out`.
pub const DEFAULT_ZOOM_DELTA: f64 = 1.0;

/// Zoom range used when neither the config nor a base layer narrows it.
pub const DEFAULT_MIN_ZOOM: f64 = 0.0;
pub const DEFAULT_MAX_ZOOM: f64 = 18.0;

/// Bottom padding applied when fitting a record, keeps shapes clear of
/// bottom-aligned overlay UI (scale bar, attribution).
pub const FIT_PADDING_BOTTOM: f64 = 25.0;

/// Gap between a control and the map edge, and between stacked controls.
pub const CONTROL_MARGIN: f64 = 10.0;
