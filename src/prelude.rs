//! Prelude module for common tenure-map types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use tenure_map::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    config::{ViewerConfig, ViewerProfile},
    fit::{FitBoundsOptions, FitOutcome},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::{InputOutcome, Map, MapOptions, MountPoint},
    viewport::Viewport,
};

pub use crate::data::{
    geojson::{GeoJsonFeature, GeoJsonGeometry, Position},
    normalize::{normalize_feature, normalize_features, NormalizeError, SkippedFeature},
};

pub use crate::layers::{
    base::LayerTrait,
    feature::{FeatureLayer, FeatureStyle},
    group::{AddReport, FeatureGroup},
    manager::LayerManager,
    registry::{BaseLayerRegistry, BaseLayerSpec},
    tile::TileLayer,
};

pub use crate::input::{
    events::{InputEvent, MapEvent, MouseButton},
    handler::{Action, EventManager, InputHandler},
};

pub use crate::models::{Application, CommentPeriod, Feature, TenureProperties};

pub use crate::page::{
    ApplicationMapController, LifecycleState, ModalOptions, ModalOutcome, ModalService,
    Navigator, Notifier, RecordSignal, Route,
};

pub use crate::rendering::context::{Color, DrawCommand, RenderContext};

pub use crate::tiles::source::{TileSource, UrlTemplateSource};

pub use crate::ui::{
    Control, ControlAction, ControlPosition, EventIsolation, LayersControl, ResetViewControl,
    ScaleControl, ZoomControl,
};

#[cfg(feature = "egui")]
pub use crate::ui::widget::{MapUiExt, MapView};

pub use crate::{Error as MapError, Result};

pub use std::{collections::VecDeque, sync::Arc};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
