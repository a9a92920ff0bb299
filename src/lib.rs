//! # tenure-map
//!
//! Map view for land-tenure application records, modelled on Leaflet.
//!
//! A record's features are normalized into strict GeoJSON, grouped into one
//! overlay and fitted into the view. The map carries a switchable catalog of
//! base layers plus zoom, scale, layer-switcher and "reset view" controls.
//! Everything renders into a headless display list; the `egui` feature
//! paints it.

pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod models;
pub mod page;
pub mod prelude;
pub mod rendering;
pub mod tiles;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::Bounds,
    config::{ViewerConfig, ViewerProfile},
    fit::{FitBoundsOptions, FitOutcome},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::{InputOutcome, Map, MapOptions, MountPoint},
    viewport::Viewport,
};

pub use data::{normalize_feature, normalize_features, GeoJsonFeature, NormalizeError};

pub use layers::{
    BaseLayerRegistry, BaseLayerSpec, FeatureGroup, FeatureLayer, LayerTrait, TileLayer,
};

pub use input::{InputEvent, MapEvent};

pub use models::{Application, CommentPeriod, Feature};

pub use page::{ApplicationMapController, LifecycleState};

pub use rendering::{DrawCommand, RenderContext};

pub use ui::{Control, ControlAction, EventIsolation, ResetViewControl};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Geometry error: {0}")]
    Geometry(#[from] NormalizeError),

    #[error("Unknown base layer: {0}")]
    UnknownBaseLayer(String),

    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    #[error("Record {found} does not belong to group for record {expected}")]
    RecordMismatch { expected: String, found: String },

    #[error("Cannot {operation} while {from}")]
    InvalidLifecycle {
        from: LifecycleState,
        operation: &'static str,
    },

    #[error("Control error: {0}")]
    Control(String),
}

/// Error type alias for convenience
pub type Error = MapError;
