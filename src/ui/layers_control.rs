use crate::{
    core::{bounds::Bounds, geo::Point},
    ui::controls::{
        Control, ControlAction, ControlContext, ControlElement, ControlEvent, ControlPart,
        ControlPosition, Cursor, EventIsolation, PartContent,
    },
};

const ROW_HEIGHT: f64 = 22.0;
const ROW_WIDTH: f64 = 160.0;
const PADDING: f64 = 6.0;

/// Base layer switcher, one row per registered base layer
pub struct LayersControl {
    position: ControlPosition,
}

impl LayersControl {
    pub fn new(position: ControlPosition) -> Self {
        Self { position }
    }

    fn build(&self, context: &ControlContext, element: &mut ControlElement) {
        let registry = context.base_layers;
        let active = registry.active().name.as_str();
        let names = registry.names();

        element.size = Point::new(
            ROW_WIDTH + PADDING * 2.0,
            names.len() as f64 * ROW_HEIGHT + PADDING * 2.0,
        );
        element.parts = names
            .into_iter()
            .enumerate()
            .map(|(row, name)| {
                let top = PADDING + row as f64 * ROW_HEIGHT;
                let mut part = ControlPart::new(
                    name,
                    Bounds::from_coords(PADDING, top, PADDING + ROW_WIDTH, top + ROW_HEIGHT),
                    PartContent::Text(name.to_string()),
                );
                part.active = name == active;
                part
            })
            .collect();
    }
}

impl Default for LayersControl {
    fn default() -> Self {
        Self::new(ControlPosition::TopRight)
    }
}

impl Control for LayersControl {
    fn id(&self) -> &str {
        "layers"
    }

    fn position(&self) -> ControlPosition {
        self.position
    }

    fn on_mount(&mut self, context: &ControlContext) -> ControlElement {
        let mut element = ControlElement::new(Point::new(ROW_WIDTH, ROW_HEIGHT));
        element.cursor = Cursor::Pointer;
        self.build(context, &mut element);
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
        let ControlEvent::Click { local } = event else {
            return None;
        };
        let part = element.part_at(local)?;
        if part.active {
            return None;
        }
        Some(ControlAction::SwitchBaseLayer(part.id.clone()))
    }

    fn on_view_changed(&mut self, context: &ControlContext, element: &mut ControlElement) {
        self.build(context, element);
    }
}
