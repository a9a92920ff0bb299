//! "Reset view" button that re-fits the map to an overlay.

use crate::{
    core::{bounds::Bounds, fit::FitBoundsOptions, geo::Point},
    rendering::context::Color,
    ui::controls::{
        Control, ControlAction, ControlContext, ControlElement, ControlEvent, ControlPart,
        ControlPosition, Cursor, EventIsolation, PartContent,
    },
};

pub const RESET_VIEW_TITLE: &str = "Reset view";
pub const RESET_VIEW_ICON: &str = "refresh";
const BUTTON_SIZE: f64 = 34.0;
const HOVER_BACKGROUND: Color = Color::rgb(0xf4, 0xf4, 0xf4);

/// Fits the map back to the current bounds of one overlay when clicked.
///
/// The overlay is looked up by id on every click, so features added to the
/// group after the control was created are included.
pub struct ResetViewControl {
    position: ControlPosition,
    layer_id: String,
    options: FitBoundsOptions,
}

impl ResetViewControl {
    pub fn new(
        position: ControlPosition,
        layer_id: impl Into<String>,
        options: FitBoundsOptions,
    ) -> Self {
        Self {
            position,
            layer_id: layer_id.into(),
            options,
        }
    }

    pub fn layer_id(&self) -> &str {
        &self.layer_id
    }
}

impl Control for ResetViewControl {
    fn id(&self) -> &str {
        "reset-view"
    }

    fn position(&self) -> ControlPosition {
        self.position
    }

    fn on_mount(&mut self, _context: &ControlContext) -> ControlElement {
        let mut element = ControlElement::new(Point::new(BUTTON_SIZE, BUTTON_SIZE));
        element.title = Some(RESET_VIEW_TITLE.to_string());
        element.cursor = Cursor::Pointer;
        element.background = Color::WHITE;
        element.parts.push(ControlPart::new(
            "icon",
            Bounds::from_coords(0.0, 0.0, BUTTON_SIZE, BUTTON_SIZE),
            PartContent::Icon(RESET_VIEW_ICON.to_string()),
        ));
        element
    }

    fn isolation(&self) -> EventIsolation {
        EventIsolation::CLICK_AND_SCROLL
    }

    fn handle_event(
        &mut self,
        event: &ControlEvent,
        element: &mut ControlElement,
    ) -> Option<ControlAction> {
        match event {
            ControlEvent::PointerEnter => {
                element.background = HOVER_BACKGROUND;
                None
            }
            ControlEvent::PointerLeave => {
                element.background = Color::WHITE;
                None
            }
            ControlEvent::Click { .. } => Some(ControlAction::FitToLayer {
                layer_id: self.layer_id.clone(),
                options: self.options.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{geo::LatLng, viewport::Viewport},
        layers::registry::BaseLayerRegistry,
    };

    fn mounted() -> (ResetViewControl, ControlElement) {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 2.0, Point::new(800.0, 600.0));
        let registry = BaseLayerRegistry::catalog();
        let mut control = ResetViewControl::new(
            ControlPosition::TopLeft,
            "features",
            FitBoundsOptions::default(),
        );
        let element = control.on_mount(&ControlContext {
            viewport: &viewport,
            base_layers: &registry,
            zoom_delta: 1.0,
        });
        (control, element)
    }

    #[test]
    fn test_appearance() {
        let (control, element) = mounted();
        assert_eq!(element.size, Point::new(34.0, 34.0));
        assert_eq!(element.title.as_deref(), Some("Reset view"));
        assert_eq!(element.cursor, Cursor::Pointer);
        assert_eq!(element.background.to_hex(), "#ffffff");
        assert_eq!(
            element.parts[0].content,
            PartContent::Icon("refresh".to_string())
        );
        assert_eq!(control.position(), ControlPosition::TopLeft);
        assert_eq!(control.isolation(), EventIsolation::CLICK_AND_SCROLL);
    }

    #[test]
    fn test_hover_changes_background() {
        let (mut control, mut element) = mounted();
        assert_eq!(control.handle_event(&ControlEvent::PointerEnter, &mut element), None);
        assert_eq!(element.background.to_hex(), "#f4f4f4");
        control.handle_event(&ControlEvent::PointerLeave, &mut element);
        assert_eq!(element.background.to_hex(), "#ffffff");
    }

    #[test]
    fn test_click_requests_fit() {
        let (mut control, mut element) = mounted();
        let action = control.handle_event(
            &ControlEvent::Click {
                local: Point::new(17.0, 17.0),
            },
            &mut element,
        );
        assert_eq!(
            action,
            Some(ControlAction::FitToLayer {
                layer_id: "features".to_string(),
                options: FitBoundsOptions::default(),
            })
        );

        // Wheel over the button is swallowed without an action
        assert_eq!(
            control.handle_event(&ControlEvent::Scroll { delta: 1.0 }, &mut element),
            None
        );
    }
}
