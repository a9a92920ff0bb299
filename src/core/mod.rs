pub mod bounds;
pub mod config;
pub mod constants;
pub mod fit;
pub mod geo;
pub mod map;
pub mod viewport;

pub use bounds::Bounds;
pub use config::{ViewerConfig, ViewerProfile};
pub use fit::{FitBoundsOptions, FitOutcome};
pub use geo::{LatLng, LatLngBounds, Point, TileCoord};
pub use map::{InputOutcome, Map, MapOptions, MountPoint};
pub use viewport::Viewport;
