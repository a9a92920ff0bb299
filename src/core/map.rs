use crate::{
    core::{
        bounds::Bounds,
        constants::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_ZOOM_DELTA, DEFAULT_ZOOM_SNAP},
        fit::{FitBoundsOptions, FitOutcome},
        geo::{LatLng, LatLngBounds, Point},
        viewport::Viewport,
    },
    input::{Action, EventManager, InputEvent, InputHandler, MapEvent},
    layers::{
        base::LayerTrait, manager::LayerManager, registry::BaseLayerRegistry, tile::TileLayer,
    },
    rendering::context::RenderContext,
    ui::controls::{Control, ControlAction, ControlContext, ControlManager, ControlRouting},
    MapError, Result,
};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    pub dragging: bool,
    pub scroll_wheel_zoom: bool,
    pub double_click_zoom: bool,
    pub min_zoom: f64,
    /// Falls back to the max zoom of the base layer installed first
    pub max_zoom: Option<f64>,
    pub zoom_snap: f64,
    pub zoom_delta: f64,
    pub max_bounds: Option<LatLngBounds>,
    pub initial_center: LatLng,
    pub initial_zoom: f64,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            dragging: true,
            scroll_wheel_zoom: true,
            double_click_zoom: true,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: None,
            zoom_snap: DEFAULT_ZOOM_SNAP,
            zoom_delta: DEFAULT_ZOOM_DELTA,
            max_bounds: Some(LatLngBounds::world()),
            initial_center: LatLng::default(),
            initial_zoom: DEFAULT_MIN_ZOOM,
        }
    }
}

impl MapOptions {
    /// Rejects options no view can satisfy
    pub fn validate(&self) -> Result<()> {
        if !self.initial_center.is_finite() || !self.initial_center.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "initial center ({}, {})",
                self.initial_center.lat, self.initial_center.lng
            )));
        }
        if let Some(bounds) = &self.max_bounds {
            if !bounds.is_valid() {
                return Err(MapError::InvalidCoordinates("max bounds".to_string()));
            }
        }
        let max_zoom = self.max_zoom.unwrap_or(DEFAULT_MAX_ZOOM);
        if !(self.min_zoom <= max_zoom) || self.zoom_snap < 0.0 || self.zoom_delta <= 0.0 {
            return Err(MapError::InvalidCoordinates(format!(
                "zoom range {}..{} (snap {}, delta {})",
                self.min_zoom, max_zoom, self.zoom_snap, self.zoom_delta
            )));
        }
        Ok(())
    }
}

/// The page element a map is bound to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MountPoint {
    pub id: String,
    /// Size in pixels
    pub size: Point,
}

impl MountPoint {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            size: Point::new(width, height),
        }
    }
}

/// Result of feeding one input event to the map
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputOutcome {
    /// The event landed on a control
    pub on_control: bool,
    /// A control stopped the event before the map's own gestures saw it
    pub consumed: bool,
    pub view_changed: bool,
}

fn control_context<'a>(
    viewport: &'a Viewport,
    base_layers: &'a BaseLayerRegistry,
    options: &MapOptions,
) -> ControlContext<'a> {
    ControlContext {
        viewport,
        base_layers,
        zoom_delta: options.zoom_delta,
    }
}

pub struct Map {
    mount: MountPoint,
    pub viewport: Viewport,
    options: MapOptions,
    base_layers: BaseLayerRegistry,
    base_layer: Option<TileLayer>,
    overlays: LayerManager,
    controls: ControlManager,
    event_manager: EventManager,
    input_handler: InputHandler,
    removed: bool,
}

impl Map {
    /// Creates a map bound to `mount`; no base layer, overlay or control yet
    pub fn new(mount: MountPoint, options: MapOptions) -> Self {
        let mut viewport = Viewport::new(options.initial_center, options.initial_zoom, mount.size);
        viewport.set_zoom_snap(options.zoom_snap);
        viewport.set_zoom_limits(
            options.min_zoom,
            options.max_zoom.unwrap_or(DEFAULT_MAX_ZOOM),
        );
        viewport.set_max_bounds(options.max_bounds);

        let mut input_handler = InputHandler::new().with_zoom_delta(options.zoom_delta);
        input_handler.pan_on_drag = options.dragging;
        input_handler.zoom_on_wheel = options.scroll_wheel_zoom;
        input_handler.zoom_on_double_click = options.double_click_zoom;

        debug!("Created map on #{} ({}x{})", mount.id, mount.size.x, mount.size.y);
        Self {
            controls: ControlManager::new(mount.size),
            mount,
            viewport,
            options,
            base_layers: BaseLayerRegistry::default(),
            base_layer: None,
            overlays: LayerManager::new(),
            event_manager: EventManager::new(),
            input_handler,
            removed: false,
        }
    }

    pub fn mount(&self) -> &MountPoint {
        &self.mount
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn center(&self) -> LatLng {
        self.viewport.center
    }

    pub fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Restricts panning to `bounds`
    pub fn set_max_bounds(&mut self, bounds: Option<LatLngBounds>) {
        let before = (self.viewport.center, self.viewport.zoom);
        self.viewport.set_max_bounds(bounds);
        if before != (self.viewport.center, self.viewport.zoom) {
            self.view_changed();
        }
    }

    /// Installs a base-layer catalog and shows its active entry.
    ///
    /// Without a configured max zoom, the map adopts the active layer's.
    pub fn set_base_layers(&mut self, registry: BaseLayerRegistry) {
        let spec = registry.active().clone();
        if self.options.max_zoom.is_none() {
            self.viewport
                .set_zoom_limits(self.options.min_zoom, spec.max_zoom as f64);
        }
        debug!("Installed {} base layers, showing {}", registry.len(), spec.name);
        self.base_layers = registry;
        self.base_layer = Some(TileLayer::new(spec));
        self.refresh_controls();
    }

    pub fn base_layers(&self) -> &BaseLayerRegistry {
        &self.base_layers
    }

    pub fn base_layer(&self) -> Option<&TileLayer> {
        self.base_layer.as_ref()
    }

    /// Replaces the shown base layer; overlays and the view stay as they are
    pub fn switch_base_layer(&mut self, name: &str) -> Result<()> {
        let spec = self.base_layers.activate(name)?.clone();
        debug!("Switched base layer to {}", spec.name);
        self.base_layer = Some(TileLayer::new(spec));
        self.event_manager.emit(MapEvent::BaseLayerChange {
            name: name.to_string(),
        });
        self.refresh_controls();
        Ok(())
    }

    pub fn add_control(&mut self, control: Box<dyn Control>) -> Result<()> {
        let id = control.id().to_string();
        let context = control_context(&self.viewport, &self.base_layers, &self.options);
        self.controls.add(control, &context)?;
        self.event_manager.emit(MapEvent::ControlAdd { control_id: id });
        Ok(())
    }

    pub fn remove_control(&mut self, id: &str) -> Result<Box<dyn Control>> {
        let control = self.controls.remove(id)?;
        self.event_manager.emit(MapEvent::ControlRemove {
            control_id: id.to_string(),
        });
        Ok(control)
    }

    pub fn controls(&self) -> &ControlManager {
        &self.controls
    }

    pub fn add_overlay(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let layer_id = layer.id().to_string();
        self.overlays.add_layer(layer)?;
        debug!("Attached overlay {}", layer_id);
        self.event_manager.emit(MapEvent::OverlayAdd { layer_id });
        Ok(())
    }

    pub fn remove_overlay(&mut self, layer_id: &str) -> Result<Box<dyn LayerTrait>> {
        let layer = self.overlays.remove_layer(layer_id)?;
        self.event_manager.emit(MapEvent::OverlayRemove {
            layer_id: layer_id.to_string(),
        });
        Ok(layer)
    }

    pub fn overlay(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.overlays.get_layer(layer_id)
    }

    pub fn with_overlay_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        self.overlays.with_layer_mut(layer_id, f)
    }

    pub fn overlays(&self) -> &LayerManager {
        &self.overlays
    }

    /// Current bounds of an attached overlay
    pub fn overlay_bounds(&self, layer_id: &str) -> Result<Option<LatLngBounds>> {
        self.overlays
            .get_layer(layer_id)
            .map(|layer| layer.bounds())
            .ok_or_else(|| MapError::LayerNotFound(layer_id.to_string()))
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) -> bool {
        let changed = self.viewport.set_view(center, zoom);
        if changed {
            self.view_changed();
        }
        changed
    }

    pub fn pan_by(&mut self, delta: Point) -> bool {
        let changed = self.viewport.pan(delta);
        if changed {
            self.view_changed();
        }
        changed
    }

    pub fn zoom_to(&mut self, zoom: f64, focus_point: Option<Point>) -> bool {
        let changed = self.viewport.zoom_to(zoom, focus_point);
        if changed {
            self.view_changed();
        }
        changed
    }

    /// Fits the view to `bounds`; missing or non-finite bounds are a no-op
    pub fn fit_bounds(
        &mut self,
        bounds: Option<&LatLngBounds>,
        options: &FitBoundsOptions,
    ) -> FitOutcome {
        let before = (self.viewport.center, self.viewport.zoom);
        let outcome = self.viewport.fit_bounds(bounds, options);
        match outcome {
            FitOutcome::Fitted { center, zoom } => {
                debug!("Fitted view to ({:.5}, {:.5}) z{}", center.lat, center.lng, zoom);
                if before != (center, zoom) {
                    self.view_changed();
                }
            }
            FitOutcome::Skipped => debug!("Skipped fit, no usable bounds"),
        }
        outcome
    }

    /// Fits the view to an overlay's bounds as they are now
    pub fn fit_overlay(&mut self, layer_id: &str, options: &FitBoundsOptions) -> Result<FitOutcome> {
        let bounds = self.overlay_bounds(layer_id)?;
        Ok(self.fit_bounds(bounds.as_ref(), options))
    }

    /// Routes an input event to the controls first, then to the map's gestures.
    ///
    /// Events a control isolates never reach the pan and zoom handlers.
    pub fn handle_input(&mut self, event: InputEvent) -> Result<InputOutcome> {
        let mut outcome = InputOutcome::default();
        if self.removed {
            return Ok(outcome);
        }

        if let InputEvent::Resize { size } = event {
            self.resize(size);
            outcome.view_changed = true;
            return Ok(outcome);
        }

        if let ControlRouting::Handled { consumed, action } = self.controls.route(&event) {
            outcome.on_control = true;
            outcome.consumed = consumed;
            if let Some(action) = action {
                outcome.view_changed |= self.apply_action(action)?;
            }
            if consumed {
                return Ok(outcome);
            }
        }

        for action in self.input_handler.handle_event(event, self.viewport.zoom) {
            match action {
                Action::Pan { delta } => outcome.view_changed |= self.pan_by(delta),
                Action::Zoom { level, focus_point } => {
                    outcome.view_changed |= self.zoom_to(level, focus_point)
                }
                Action::Click { position } => {
                    let lat_lng = self.viewport.container_point_to_lat_lng(&position);
                    self.event_manager.emit(MapEvent::Click {
                        lat_lng,
                        pixel: position,
                    });
                }
                Action::Resize { size } => {
                    self.resize(size);
                    outcome.view_changed = true;
                }
            }
        }
        Ok(outcome)
    }

    /// Carries out a request made by a control; returns whether the view moved
    pub fn apply_action(&mut self, action: ControlAction) -> Result<bool> {
        let before = (self.viewport.center, self.viewport.zoom);
        match action {
            ControlAction::FitToLayer { layer_id, options } => {
                self.fit_overlay(&layer_id, &options)?;
            }
            ControlAction::ZoomBy(delta) => {
                self.zoom_to(self.viewport.zoom + delta, None);
            }
            ControlAction::SwitchBaseLayer(name) => self.switch_base_layer(&name)?,
        }
        Ok(before != (self.viewport.center, self.viewport.zoom))
    }

    pub fn resize(&mut self, size: Point) {
        self.mount.size = size;
        self.viewport.set_size(size);
        self.controls.set_container_size(size);
        let (center, zoom) = (self.viewport.center, self.viewport.zoom);
        self.viewport.set_view(center, zoom);
        self.view_changed();
    }

    /// Collects the frame: base tiles, overlays, then controls
    pub fn render(&mut self, context: &mut RenderContext) -> Result<()> {
        context.begin_frame();
        if self.removed {
            return Ok(());
        }
        context.set_clip_bounds(Bounds::from_origin_and_size(
            Point::new(0.0, 0.0),
            self.viewport.size,
        ));

        if let Some(base_layer) = self.base_layer.as_mut() {
            base_layer.render(context, &self.viewport)?;
        }
        self.overlays.render(context, &self.viewport)?;
        self.controls.render(context);
        context.clear_clip_bounds();
        Ok(())
    }

    /// Attribution strings of the base layer and visible overlays
    pub fn attribution(&self) -> Vec<String> {
        self.base_layer
            .iter()
            .filter_map(|layer| layer.attribution())
            .chain(
                self.overlays
                    .layers()
                    .into_iter()
                    .filter(|layer| layer.is_visible())
                    .filter_map(|layer| layer.attribution()),
            )
            .map(str::to_string)
            .collect()
    }

    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.event_manager.on(event_type, callback);
    }

    /// Dispatches queued events to listeners and returns them
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.event_manager.process_events()
    }

    /// Tears the map down: dismounts controls and detaches every layer.
    ///
    /// Returns the ids of the dismounted controls.
    pub fn remove(&mut self) -> Vec<String> {
        if self.removed {
            return Vec::new();
        }
        let control_ids = self.controls.clear();
        self.overlays.clear();
        self.base_layer = None;
        self.event_manager.clear();
        self.removed = true;
        debug!("Removed map from #{}", self.mount.id);
        control_ids
    }

    fn view_changed(&mut self) {
        self.event_manager.emit(MapEvent::ViewChanged {
            center: self.viewport.center,
            zoom: self.viewport.zoom,
        });
        self.refresh_controls();
    }

    fn refresh_controls(&mut self) {
        let context = control_context(&self.viewport, &self.base_layers, &self.options);
        self.controls.view_changed(&context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        rendering::context::DrawCommand,
        ui::{controls::ControlPosition, reset_view::ResetViewControl, zoom::ZoomControl},
    };

    fn map() -> Map {
        let mut map = Map::new(MountPoint::new("map", 800.0, 600.0), MapOptions::default());
        map.set_base_layers(BaseLayerRegistry::catalog());
        map
    }

    #[test]
    fn test_options_validation() {
        assert!(MapOptions::default().validate().is_ok());

        let mut options = MapOptions::default();
        options.initial_center = LatLng::new(f64::NAN, 0.0);
        assert!(matches!(
            options.validate(),
            Err(MapError::InvalidCoordinates(_))
        ));

        let mut options = MapOptions::default();
        options.min_zoom = 10.0;
        options.max_zoom = Some(4.0);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_max_zoom_from_base_layer() {
        let map = map();
        assert_eq!(map.viewport.max_zoom, 17.0);
        assert_eq!(map.base_layer().unwrap().spec().name, "World Imagery");

        let mut options = MapOptions::default();
        options.max_zoom = Some(12.0);
        let mut map = Map::new(MountPoint::new("map", 800.0, 600.0), options);
        map.set_base_layers(BaseLayerRegistry::catalog());
        assert_eq!(map.viewport.max_zoom, 12.0);
    }

    #[test]
    fn test_switch_base_layer_keeps_view() {
        let mut map = map();
        map.set_view(LatLng::new(48.5, -123.0), 9.0);
        let before = (map.center(), map.zoom());
        map.process_events();

        map.switch_base_layer("Ocean Base").unwrap();
        assert_eq!((map.center(), map.zoom()), before);
        assert_eq!(map.base_layer().unwrap().spec().name, "Ocean Base");
        assert!(matches!(
            map.switch_base_layer("Bing"),
            Err(MapError::UnknownBaseLayer(_))
        ));

        let events = map.process_events();
        assert_eq!(
            events,
            vec![MapEvent::BaseLayerChange {
                name: "Ocean Base".to_string()
            }]
        );
    }

    #[test]
    fn test_fit_missing_overlay() {
        let mut map = map();
        assert!(matches!(
            map.fit_overlay("nope", &FitBoundsOptions::default()),
            Err(MapError::LayerNotFound(_))
        ));
        assert_eq!(
            map.fit_bounds(None, &FitBoundsOptions::default()),
            FitOutcome::Skipped
        );
    }

    #[test]
    fn test_isolated_events_do_not_pan() {
        let mut map = map();
        map.add_control(Box::new(ZoomControl::new(ControlPosition::TopLeft)))
            .unwrap();
        map.add_control(Box::new(ResetViewControl::new(
            ControlPosition::TopLeft,
            "features",
            FitBoundsOptions::default(),
        )))
        .unwrap();
        map.set_view(LatLng::new(48.5, -123.0), 6.0);
        let before = (map.center(), map.zoom());

        // Reset button sits below the 60px zoom bar
        let on_reset = Point::new(20.0, 90.0);
        let outcome = map
            .handle_input(InputEvent::DragStart { position: on_reset })
            .unwrap();
        assert!(outcome.consumed);
        map.handle_input(InputEvent::Drag {
            delta: Point::new(100.0, 50.0),
        })
        .unwrap();
        map.handle_input(InputEvent::DragEnd).unwrap();
        map.handle_input(InputEvent::Scroll {
            delta: 1.0,
            position: on_reset,
        })
        .unwrap();
        map.handle_input(InputEvent::DoubleClick { position: on_reset })
            .unwrap();
        assert_eq!((map.center(), map.zoom()), before);

        // Clicking reset without the overlay attached is an error
        assert!(matches!(
            map.handle_input(InputEvent::Click {
                position: on_reset,
                button: crate::input::events::MouseButton::Left,
            }),
            Err(MapError::LayerNotFound(_))
        ));
    }

    #[test]
    fn test_map_gestures() {
        let mut map = map();
        map.set_view(LatLng::new(48.5, -123.0), 6.0);

        map.handle_input(InputEvent::Scroll {
            delta: 1.0,
            position: Point::new(400.0, 300.0),
        })
        .unwrap();
        assert_eq!(map.zoom(), 7.0);

        let center = map.center();
        map.handle_input(InputEvent::DragStart {
            position: Point::new(400.0, 300.0),
        })
        .unwrap();
        let outcome = map
            .handle_input(InputEvent::Drag {
                delta: Point::new(50.0, 0.0),
            })
            .unwrap();
        assert!(outcome.view_changed);
        assert!(map.center().lng < center.lng);
    }

    #[test]
    fn test_render_and_remove() {
        let mut map = map();
        map.add_control(Box::new(ZoomControl::default())).unwrap();
        map.set_view(LatLng::new(48.5, -123.0), 9.0);

        let mut context = RenderContext::new(800, 600);
        map.render(&mut context).unwrap();
        let queue = context.get_drawing_queue();
        assert!(matches!(queue.first(), Some(DrawCommand::Tile { .. })));
        assert!(matches!(queue.last(), Some(DrawCommand::Text { .. })));
        assert_eq!(map.attribution().len(), 1);

        assert_eq!(map.remove(), vec!["zoom".to_string()]);
        assert!(map.is_removed());
        assert!(map.controls().is_empty());
        map.render(&mut context).unwrap();
        assert!(context.get_drawing_queue().is_empty());
        assert_eq!(
            map.handle_input(InputEvent::Scroll {
                delta: 1.0,
                position: Point::new(400.0, 300.0)
            })
            .unwrap(),
            InputOutcome::default()
        );
    }
}
