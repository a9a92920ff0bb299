use crate::core::geo::{LatLng, Point};
use serde::{Deserialize, Serialize};

/// Pointer input delivered to the map, positions in container pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Single click/tap
    Click {
        position: Point,
        button: MouseButton,
    },
    /// Double click/tap
    DoubleClick { position: Point },
    /// Pointer move
    MouseMove { position: Point },
    /// Pointer pressed (mouse down or touch start); a drag may follow
    DragStart { position: Point },
    /// Drag in progress
    Drag { delta: Point },
    /// End of drag operation
    DragEnd,
    /// Scroll wheel; positive `delta` zooms in
    Scroll { delta: f64, position: Point },
    /// Pointer left the map container
    PointerLeave,
    /// Viewport/window resize
    Resize { size: Point },
}

/// Map event types that can be emitted by the map
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Map view has changed (center or zoom)
    ViewChanged { center: LatLng, zoom: f64 },
    /// Click on the map itself (never on a control)
    Click { lat_lng: LatLng, pixel: Point },
    /// Base layer was switched
    BaseLayerChange { name: String },
    /// Overlay layer was added
    OverlayAdd { layer_id: String },
    /// Overlay layer was removed
    OverlayRemove { layer_id: String },
    ControlAdd { control_id: String },
    ControlRemove { control_id: String },
}

impl MapEvent {
    /// Listener key for this event
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::ViewChanged { .. } => "viewchanged",
            MapEvent::Click { .. } => "click",
            MapEvent::BaseLayerChange { .. } => "baselayerchange",
            MapEvent::OverlayAdd { .. } => "overlayadd",
            MapEvent::OverlayRemove { .. } => "overlayremove",
            MapEvent::ControlAdd { .. } => "controladd",
            MapEvent::ControlRemove { .. } => "controlremove",
        }
    }
}

/// Mouse button types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

impl InputEvent {
    /// Gets the primary position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::Click { position, .. } => Some(*position),
            InputEvent::DoubleClick { position } => Some(*position),
            InputEvent::MouseMove { position } => Some(*position),
            InputEvent::DragStart { position } => Some(*position),
            InputEvent::Scroll { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Checks if this is a mouse/pointer event
    pub fn is_pointer_event(&self) -> bool {
        !matches!(self, InputEvent::Resize { .. })
    }
}
