pub mod controls;
pub mod layers_control;
pub mod reset_view;
pub mod scale;
pub mod zoom;

#[cfg(feature = "egui")]
pub mod widget;

pub use controls::{
    Control, ControlAction, ControlContext, ControlElement, ControlEvent, ControlManager,
    ControlPart, ControlPosition, ControlRouting, Cursor, EventIsolation, PartContent,
};
pub use layers_control::LayersControl;
pub use reset_view::ResetViewControl;
pub use scale::{ScaleControl, ScaleOptions};
pub use zoom::ZoomControl;

#[cfg(feature = "egui")]
pub use widget::{MapUiExt, MapView};
