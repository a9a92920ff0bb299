pub mod base;
pub mod feature;
pub mod group;
pub mod manager;
pub mod registry;
pub mod tile;

pub use base::{LayerProperties, LayerTrait, LayerType};
pub use feature::{FeatureLayer, FeatureStyle};
pub use group::{AddReport, FeatureGroup};
pub use manager::LayerManager;
pub use registry::{BaseLayerRegistry, BaseLayerSpec, DEFAULT_BASE_LAYER};
pub use tile::TileLayer;
