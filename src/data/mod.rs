pub mod geojson;
pub mod normalize;

pub use geojson::{GeoJsonFeature, GeoJsonGeometry, Position};
pub use normalize::{normalize_feature, normalize_features, NormalizeError, SkippedFeature};
