//! Map controls: the `Control` trait, mounted elements and corner layout.

use crate::{
    core::{
        bounds::Bounds, constants::CONTROL_MARGIN, fit::FitBoundsOptions, geo::Point,
        viewport::Viewport,
    },
    input::events::InputEvent,
    layers::registry::BaseLayerRegistry,
    rendering::context::{Color, RenderContext},
    MapError, Result,
};
use log::debug;

/// Corner of the map a control is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ControlPosition {
    pub fn is_top(&self) -> bool {
        matches!(self, ControlPosition::TopLeft | ControlPosition::TopRight)
    }

    pub fn is_left(&self) -> bool {
        matches!(self, ControlPosition::TopLeft | ControlPosition::BottomLeft)
    }
}

/// Which pointer events a control keeps from reaching the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventIsolation {
    /// Click, double click and pointer down (drag start)
    pub click: bool,
    /// Wheel
    pub scroll: bool,
}

impl EventIsolation {
    pub const NONE: EventIsolation = EventIsolation {
        click: false,
        scroll: false,
    };
    pub const CLICK: EventIsolation = EventIsolation {
        click: true,
        scroll: false,
    };
    pub const CLICK_AND_SCROLL: EventIsolation = EventIsolation {
        click: true,
        scroll: true,
    };

    /// Whether `event`, landing on the control, must not reach the map
    pub fn stops(&self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Click { .. }
            | InputEvent::DoubleClick { .. }
            | InputEvent::DragStart { .. } => self.click,
            InputEvent::Scroll { .. } => self.scroll,
            _ => false,
        }
    }
}

/// Events delivered to a control; positions are relative to the control's top-left corner
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    PointerEnter,
    PointerLeave,
    Click { local: Point },
    DoubleClick { local: Point },
    PointerDown { local: Point },
    Scroll { delta: f64 },
}

/// Map-level request produced by a control
#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    /// Fit the view to the current bounds of the overlay with this id
    FitToLayer {
        layer_id: String,
        options: FitBoundsOptions,
    },
    ZoomBy(f64),
    SwitchBaseLayer(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

/// What a control part shows
#[derive(Debug, Clone, PartialEq)]
pub enum PartContent {
    Text(String),
    /// Material icon name
    Icon(String),
    /// Outlined bar with a label, as in the scale control
    Bar { label: String },
}

/// Interactive or decorative region inside a control
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPart {
    pub id: String,
    /// Relative to the control's top-left corner
    pub bounds: Bounds,
    pub content: PartContent,
    pub title: Option<String>,
    pub disabled: bool,
    pub active: bool,
}

impl ControlPart {
    pub fn new(id: impl Into<String>, bounds: Bounds, content: PartContent) -> Self {
        Self {
            id: id.into(),
            bounds,
            content,
            title: None,
            disabled: false,
            active: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// The mounted visual of a control
#[derive(Debug, Clone, PartialEq)]
pub struct ControlElement {
    pub size: Point,
    pub background: Color,
    pub border: Option<Color>,
    pub title: Option<String>,
    pub cursor: Cursor,
    pub parts: Vec<ControlPart>,
}

impl ControlElement {
    pub fn new(size: Point) -> Self {
        Self {
            size,
            background: Color::WHITE,
            border: Some(Color::new(0, 0, 0, 51)),
            title: None,
            cursor: Cursor::Default,
            parts: Vec::new(),
        }
    }

    pub fn part(&self, id: &str) -> Option<&ControlPart> {
        self.parts.iter().find(|part| part.id == id)
    }

    pub fn part_mut(&mut self, id: &str) -> Option<&mut ControlPart> {
        self.parts.iter_mut().find(|part| part.id == id)
    }

    /// Part under a local position
    pub fn part_at(&self, local: &Point) -> Option<&ControlPart> {
        self.parts.iter().find(|part| part.bounds.contains(local))
    }

    /// Emits the element's draw commands with its top-left corner at `origin`
    pub fn render(&self, origin: Point, context: &mut RenderContext) {
        if self.background.a > 0 {
            context.render_rect(
                Bounds::from_origin_and_size(origin, self.size),
                self.background,
                self.border,
            );
        }

        for part in &self.parts {
            let bounds = part.bounds.translate(&origin);
            let ink = if part.disabled {
                Color::rgb(0xbb, 0xbb, 0xbb)
            } else {
                Color::BLACK
            };
            if part.active {
                context.render_rect(bounds, Color::rgb(0xdd, 0xdd, 0xdd), None);
            }
            match &part.content {
                PartContent::Text(text) => context.render_text(bounds.center(), text.clone(), ink, 13.0),
                PartContent::Icon(name) => context.render_icon(bounds, name.clone(), ink),
                PartContent::Bar { label } => {
                    context.render_rect(
                        bounds,
                        Color::new(255, 255, 255, 128),
                        Some(Color::rgb(0x77, 0x77, 0x77)),
                    );
                    context.render_text(bounds.center(), label.clone(), Color::rgb(0x33, 0x33, 0x33), 11.0);
                }
            }
        }
    }
}

/// Read-only map state handed to controls
pub struct ControlContext<'a> {
    pub viewport: &'a Viewport,
    pub base_layers: &'a BaseLayerRegistry,
    pub zoom_delta: f64,
}

/// A UI element anchored to a map corner
pub trait Control: Send + Sync {
    fn id(&self) -> &str;

    fn position(&self) -> ControlPosition;

    /// Builds the element when the control is added to a map
    fn on_mount(&mut self, context: &ControlContext) -> ControlElement;

    fn on_unmount(&mut self) {}

    /// Pointer events this control keeps from the map
    fn isolation(&self) -> EventIsolation {
        EventIsolation::NONE
    }

    fn handle_event(
        &mut self,
        _event: &ControlEvent,
        _element: &mut ControlElement,
    ) -> Option<ControlAction> {
        None
    }

    /// Called after the view or the active base layer changed
    fn on_view_changed(&mut self, _context: &ControlContext, _element: &mut ControlElement) {}
}

/// How a pointer event was routed
#[derive(Debug, Clone, PartialEq)]
pub enum ControlRouting {
    /// The event did not land on a control
    Unhandled,
    /// The event landed on a control; `consumed` events must not reach the map
    Handled {
        consumed: bool,
        action: Option<ControlAction>,
    },
}

struct MountedControl {
    control: Box<dyn Control>,
    element: ControlElement,
    bounds: Bounds,
}

/// Control manager that mounts, lays out and routes events to map controls
pub struct ControlManager {
    controls: Vec<MountedControl>,
    container: Point,
    hovered: Option<String>,
}

impl ControlManager {
    pub fn new(container: Point) -> Self {
        Self {
            controls: Vec::new(),
            container,
            hovered: None,
        }
    }

    /// Mounts a control; ids must be unique
    pub fn add(&mut self, mut control: Box<dyn Control>, context: &ControlContext) -> Result<()> {
        let id = control.id().to_string();
        if self.index_of(&id).is_some() {
            return Err(MapError::Control(format!("control {id} already added")));
        }

        let element = control.on_mount(context);
        debug!("Mounted control {} at {:?}", id, control.position());
        self.controls.push(MountedControl {
            control,
            element,
            bounds: Bounds::default(),
        });
        self.layout();
        Ok(())
    }

    /// Unmounts a control and hands it back
    pub fn remove(&mut self, id: &str) -> Result<Box<dyn Control>> {
        let index = self
            .index_of(id)
            .ok_or_else(|| MapError::Control(format!("control {id} not found")))?;
        let mut mounted = self.controls.remove(index);
        mounted.control.on_unmount();
        if self.hovered.as_deref() == Some(id) {
            self.hovered = None;
        }
        self.layout();
        Ok(mounted.control)
    }

    /// Unmounts every control, returning their ids
    pub fn clear(&mut self) -> Vec<String> {
        self.hovered = None;
        self.controls
            .drain(..)
            .map(|mut mounted| {
                mounted.control.on_unmount();
                mounted.control.id().to_string()
            })
            .collect()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.controls.iter().map(|m| m.control.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn element(&self, id: &str) -> Option<&ControlElement> {
        self.index_of(id).map(|index| &self.controls[index].element)
    }

    /// Screen rectangle of a mounted control
    pub fn bounds_of(&self, id: &str) -> Option<Bounds> {
        self.index_of(id).map(|index| self.controls[index].bounds)
    }

    pub fn set_container_size(&mut self, size: Point) {
        self.container = size;
        self.layout();
    }

    /// Places controls Leaflet-style: top corners stack downward, bottom
    /// corners stack upward with the first-added control lowest.
    pub fn layout(&mut self) {
        let margin = CONTROL_MARGIN;
        let container = self.container;
        let corners = [
            ControlPosition::TopLeft,
            ControlPosition::TopRight,
            ControlPosition::BottomLeft,
            ControlPosition::BottomRight,
        ];

        for corner in corners {
            let mut offset = margin;
            for mounted in self
                .controls
                .iter_mut()
                .filter(|m| m.control.position() == corner)
            {
                let size = mounted.element.size;
                let x = if corner.is_left() {
                    margin
                } else {
                    container.x - margin - size.x
                };
                let y = if corner.is_top() {
                    offset
                } else {
                    container.y - offset - size.y
                };
                mounted.bounds = Bounds::from_origin_and_size(Point::new(x, y), size);
                offset += size.y + margin;
            }
        }
    }

    /// Control under a container position
    pub fn hit_test(&self, position: &Point) -> Option<&str> {
        self.controls
            .iter()
            .find(|m| m.bounds.contains(position))
            .map(|m| m.control.id())
    }

    /// Delivers a pointer event to the control under it, if any
    pub fn route(&mut self, event: &InputEvent) -> ControlRouting {
        match event {
            InputEvent::MouseMove { position } => {
                let target = self.hit_test(position).map(str::to_string);
                let action = self.update_hover(target.clone());
                match target {
                    Some(_) => ControlRouting::Handled {
                        consumed: false,
                        action,
                    },
                    None => ControlRouting::Unhandled,
                }
            }
            InputEvent::PointerLeave => {
                self.update_hover(None);
                ControlRouting::Unhandled
            }
            InputEvent::Click { position, .. }
            | InputEvent::DoubleClick { position }
            | InputEvent::DragStart { position }
            | InputEvent::Scroll { position, .. } => {
                let Some(index) = self.controls.iter().position(|m| m.bounds.contains(position))
                else {
                    return ControlRouting::Unhandled;
                };
                let mounted = &mut self.controls[index];
                let local = position.subtract(&mounted.bounds.min);
                let control_event = match event {
                    InputEvent::Click { .. } => ControlEvent::Click { local },
                    InputEvent::DoubleClick { .. } => ControlEvent::DoubleClick { local },
                    InputEvent::DragStart { .. } => ControlEvent::PointerDown { local },
                    InputEvent::Scroll { delta, .. } => ControlEvent::Scroll { delta: *delta },
                    _ => return ControlRouting::Unhandled,
                };

                let action = mounted
                    .control
                    .handle_event(&control_event, &mut mounted.element);
                ControlRouting::Handled {
                    consumed: mounted.control.isolation().stops(event),
                    action,
                }
            }
            _ => ControlRouting::Unhandled,
        }
    }

    /// Lets every control refresh after a view or base-layer change
    pub fn view_changed(&mut self, context: &ControlContext) {
        for mounted in &mut self.controls {
            mounted
                .control
                .on_view_changed(context, &mut mounted.element);
        }
        self.layout();
    }

    pub fn render(&self, context: &mut RenderContext) {
        for mounted in &self.controls {
            mounted.element.render(mounted.bounds.min, context);
        }
    }

    fn update_hover(&mut self, target: Option<String>) -> Option<ControlAction> {
        if self.hovered == target {
            return None;
        }
        let mut action = None;
        if let Some(previous) = self.hovered.take() {
            action = self.send(&previous, ControlEvent::PointerLeave);
        }
        if let Some(next) = &target {
            action = self.send(next, ControlEvent::PointerEnter).or(action);
        }
        self.hovered = target;
        action
    }

    fn send(&mut self, id: &str, event: ControlEvent) -> Option<ControlAction> {
        let index = self.index_of(id)?;
        let mounted = &mut self.controls[index];
        mounted.control.handle_event(&event, &mut mounted.element)
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.controls.iter().position(|m| m.control.id() == id)
    }
}
