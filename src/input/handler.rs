use crate::{
    core::{constants::DEFAULT_ZOOM_DELTA, geo::Point},
    input::events::{InputEvent, MapEvent},
    prelude::{HashMap, VecDeque},
};

/// What the map should do in response to input
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Pan by a pixel offset
    Pan { delta: Point },
    /// Zoom to a level, keeping `focus_point` fixed
    Zoom {
        level: f64,
        focus_point: Option<Point>,
    },
    /// Click at a container position
    Click { position: Point },
    /// Container was resized
    Resize { size: Point },
}

/// Event listener callback type
pub type EventCallback = Box<dyn Fn(&MapEvent) + Send + Sync>;

/// Event management system for the map
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event type
    listeners: HashMap<String, Vec<EventCallback>>,
    /// Event queue for processing
    event_queue: VecDeque<MapEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Emit an event to the queue
    pub fn emit(&mut self, event: MapEvent) {
        self.event_queue.push_back(event);
    }

    /// Process all queued events
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get(event.event_type()) {
                for callback in callbacks {
                    callback(event);
                }
            }
        }

        events
    }

    /// Drop queued events and every listener
    pub fn clear(&mut self) {
        self.event_queue.clear();
        self.listeners.clear();
    }

    /// Get number of pending events
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }
}

/// Turns pointer input that reached the map into map actions
pub struct InputHandler {
    pub enabled: bool,
    pub zoom_on_wheel: bool,
    pub zoom_on_double_click: bool,
    pub pan_on_drag: bool,
    pub zoom_delta: f64,
    /// A drag started on the map (not on a control) and is still running
    dragging: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            enabled: true,
            zoom_on_wheel: true,
            zoom_on_double_click: true,
            pan_on_drag: true,
            zoom_delta: DEFAULT_ZOOM_DELTA,
            dragging: false,
        }
    }

    pub fn with_zoom_delta(mut self, zoom_delta: f64) -> Self {
        self.zoom_delta = zoom_delta;
        self
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Handle input events and generate actions (like Leaflet's map handlers)
    pub fn handle_event(&mut self, event: InputEvent, current_zoom: f64) -> Vec<Action> {
        if !self.enabled {
            return vec![];
        }

        match event {
            InputEvent::Click { position, .. } => vec![Action::Click { position }],
            InputEvent::DragStart { .. } => {
                self.dragging = self.pan_on_drag;
                vec![]
            }
            InputEvent::Drag { delta } if self.dragging => {
                // Dragging the content right moves the view left
                vec![Action::Pan {
                    delta: Point::new(-delta.x, -delta.y),
                }]
            }
            InputEvent::DragEnd | InputEvent::PointerLeave => {
                self.dragging = false;
                vec![]
            }
            InputEvent::Scroll { delta, position } if self.zoom_on_wheel && delta != 0.0 => {
                let step = if delta > 0.0 {
                    self.zoom_delta
                } else {
                    -self.zoom_delta
                };
                vec![Action::Zoom {
                    level: current_zoom + step,
                    focus_point: Some(position),
                }]
            }
            InputEvent::DoubleClick { position } if self.zoom_on_double_click => {
                vec![Action::Zoom {
                    level: current_zoom + self.zoom_delta,
                    focus_point: Some(position),
                }]
            }
            InputEvent::Resize { size } => vec![Action::Resize { size }],
            _ => vec![],
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn test_drag_needs_drag_start() {
        let mut handler = InputHandler::new();
        let drag = InputEvent::Drag {
            delta: Point::new(10.0, 5.0),
        };

        // No drag start on the map: nothing happens
        assert!(handler.handle_event(drag.clone(), 5.0).is_empty());

        handler.handle_event(
            InputEvent::DragStart {
                position: Point::new(100.0, 100.0),
            },
            5.0,
        );
        assert_eq!(
            handler.handle_event(drag.clone(), 5.0),
            vec![Action::Pan {
                delta: Point::new(-10.0, -5.0)
            }]
        );

        handler.handle_event(InputEvent::DragEnd, 5.0);
        assert!(handler.handle_event(drag, 5.0).is_empty());
    }

    #[test]
    fn test_wheel_zoom() {
        let mut handler = InputHandler::new();
        let position = Point::new(200.0, 150.0);

        let actions = handler.handle_event(
            InputEvent::Scroll {
                delta: -3.0,
                position,
            },
            5.0,
        );
        assert_eq!(
            actions,
            vec![Action::Zoom {
                level: 4.0,
                focus_point: Some(position)
            }]
        );

        handler.zoom_on_wheel = false;
        assert!(handler
            .handle_event(InputEvent::Scroll { delta: 1.0, position }, 5.0)
            .is_empty());
    }

    #[test]
    fn test_event_manager_dispatch() {
        let mut manager = EventManager::new();
        let clicks = Arc::new(AtomicUsize::new(0));
        let counter = clicks.clone();
        manager.on("click", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        manager.emit(MapEvent::Click {
            lat_lng: LatLng::new(48.0, -123.0),
            pixel: Point::new(1.0, 1.0),
        });
        manager.emit(MapEvent::ViewChanged {
            center: LatLng::new(48.0, -123.0),
            zoom: 4.0,
        });
        assert_eq!(manager.pending_events(), 2);

        let events = manager.process_events();
        assert_eq!(events.len(), 2);
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
        assert_eq!(manager.pending_events(), 0);
    }
}
