use crate::{
    core::{bounds::Bounds, geo::Point},
    ui::controls::{
        Control, ControlAction, ControlContext, ControlElement, ControlEvent, ControlPart,
        ControlPosition, Cursor, EventIsolation, PartContent,
    },
};

const BUTTON_SIZE: f64 = 30.0;

/// Zoom in / zoom out buttons
pub struct ZoomControl {
    position: ControlPosition,
    zoom_delta: f64,
}

impl ZoomControl {
    pub fn new(position: ControlPosition) -> Self {
        Self {
            position,
            zoom_delta: 1.0,
        }
    }

    fn refresh(&mut self, context: &ControlContext, element: &mut ControlElement) {
        self.zoom_delta = context.zoom_delta;
        let viewport = context.viewport;
        if let Some(part) = element.part_mut("zoom-in") {
            part.disabled = viewport.zoom >= viewport.max_zoom;
        }
        if let Some(part) = element.part_mut("zoom-out") {
            part.disabled = viewport.zoom <= viewport.min_zoom;
        }
    }
}

impl Default for ZoomControl {
    fn default() -> Self {
        Self::new(ControlPosition::TopLeft)
    }
}

impl Control for ZoomControl {
    fn id(&self) -> &str {
        "zoom"
    }

    fn position(&self) -> ControlPosition {
        self.position
    }

    fn on_mount(&mut self, context: &ControlContext) -> ControlElement {
        let mut element = ControlElement::new(Point::new(BUTTON_SIZE, BUTTON_SIZE * 2.0));
        element.cursor = Cursor::Pointer;
        element.parts = vec![
            ControlPart::new(
                "zoom-in",
                Bounds::from_coords(0.0, 0.0, BUTTON_SIZE, BUTTON_SIZE),
                PartContent::Text("+".to_string()),
            )
            .with_title("Zoom in"),
            ControlPart::new(
                "zoom-out",
                Bounds::from_coords(0.0, BUTTON_SIZE, BUTTON_SIZE, BUTTON_SIZE * 2.0),
                PartContent::Text("\u{2212}".to_string()),
            )
            .with_title("Zoom out"),
        ];
        self.refresh(context, &mut element);
        element
    }

    fn isolation(&self) -> EventIsolation {
        EventIsolation::CLICK
    }

    fn handle_event(
        &mut self,
        event: &ControlEvent,
        element: &mut ControlElement,
    ) -> Option<ControlAction> {
        let ControlEvent::Click { local } = event else {
            return None;
        };
        let part = element.part_at(local)?;
        if part.disabled {
            return None;
        }
        match part.id.as_str() {
            "zoom-in" => Some(ControlAction::ZoomBy(self.zoom_delta)),
            "zoom-out" => Some(ControlAction::ZoomBy(-self.zoom_delta)),
            _ => None,
        }
    }

    fn on_view_changed(&mut self, context: &ControlContext, element: &mut ControlElement) {
        self.refresh(context, element);
    }
}
