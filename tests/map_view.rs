#[cfg(test)]
mod map_view_tests {
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tenure_map::{
        input::events::{InputEvent, MapEvent, MouseButton},
        layers::{base::LayerTrait, group::FeatureGroup, registry::BaseLayerRegistry},
        models::{Application, Feature},
        rendering::context::{DrawCommand, RenderContext},
        ui::{
            controls::PartContent, ControlPosition, LayersControl, ResetViewControl, ScaleControl,
            ZoomControl,
        },
        FitBoundsOptions, FitOutcome, LatLng, LatLngBounds, Map, MountPoint, Point, ViewerConfig,
        ViewerProfile,
    };

    const GROUP: &str = "application-features";

    fn application() -> Application {
        let features = vec![
            Feature::new(
                "parcel",
                json!({
                    "type": "Polygon",
                    "coordinates": [[
                        [-123.5, 48.0], [-122.5, 48.0], [-122.5, 49.0], [-123.5, 49.0], [-123.5, 48.0]
                    ]]
                }),
            ),
            Feature::new(
                "dock",
                json!({ "type": "Point", "coordinates": [-123.2, 48.4] }),
            ),
        ];
        Application::new("app-1").with_features(features)
    }

    /// Builds the page map the way the application view does
    fn page_map(config: &ViewerConfig) -> Map {
        let mut map = Map::new(MountPoint::new("map", 800.0, 600.0), config.map.clone());
        map.set_max_bounds(Some(LatLngBounds::world()));
        map.set_base_layers(BaseLayerRegistry::with_default(&config.default_base_layer).unwrap());
        map.add_control(Box::new(ZoomControl::new(ControlPosition::TopLeft)))
            .unwrap();
        map.add_control(Box::new(LayersControl::new(ControlPosition::TopRight)))
            .unwrap();
        map.add_control(Box::new(ResetViewControl::new(
            ControlPosition::TopLeft,
            GROUP,
            config.fit.clone(),
        )))
        .unwrap();
        map.add_control(Box::new(ScaleControl::new(
            ControlPosition::BottomRight,
            config.scale.clone(),
        )))
        .unwrap();

        let mut group = FeatureGroup::new(GROUP, "app-1");
        group.add_all(&application()).unwrap();
        map.add_overlay(group.into_overlay()).unwrap();
        map.fit_overlay(GROUP, &config.fit).unwrap();
        map
    }

    fn click(position: Point) -> InputEvent {
        InputEvent::Click {
            position,
            button: MouseButton::Left,
        }
    }

    fn group_len(map: &Map) -> usize {
        map.overlay(GROUP)
            .and_then(|layer| layer.as_any().downcast_ref::<FeatureGroup>())
            .map(FeatureGroup::len)
            .unwrap_or(0)
    }

    #[test]
    fn test_switching_base_layer_keeps_overlay_and_view() {
        let mut map = page_map(&ViewerConfig::default());
        let view = (map.center(), map.zoom());
        map.process_events();

        // "Ocean Base" is the first row of the switcher
        let layers = map.controls().bounds_of("layers").unwrap();
        let outcome = map
            .handle_input(click(layers.min.add(&Point::new(20.0, 17.0))))
            .unwrap();
        assert!(outcome.on_control && outcome.consumed);
        assert!(!outcome.view_changed);

        assert_eq!(map.base_layer().unwrap().spec().name, "Ocean Base");
        assert_eq!((map.center(), map.zoom()), view);
        assert_eq!(group_len(&map), 2);
        assert_eq!(map.viewport.max_zoom, 17.0);
        assert!(map
            .process_events()
            .contains(&MapEvent::BaseLayerChange {
                name: "Ocean Base".to_string()
            }));

        let element = map.controls().element("layers").unwrap();
        assert!(element.part("Ocean Base").unwrap().active);
        assert!(!element.part("World Imagery").unwrap().active);
    }

    #[test]
    fn test_reset_fits_current_group_contents() {
        let mut map = page_map(&ViewerConfig::default());

        map.with_overlay_mut(GROUP, |layer| {
            let group = layer
                .as_any_mut()
                .downcast_mut::<FeatureGroup>()
                .unwrap();
            group.clear();
            group
                .add_all(&Application::new("app-1").with_features(vec![Feature::new(
                    "dock",
                    json!({ "type": "Point", "coordinates": [-123.2, 48.4] }),
                )]))
                .unwrap();
        });

        // A single point fits to the highest zoom the base layer offers
        map.handle_input(click(Point::new(20.0, 90.0))).unwrap();
        assert_eq!(map.zoom(), 17.0);
        assert!((map.center().lng - -123.2).abs() < 1e-6);
    }

    #[test]
    fn test_empty_group_leaves_view() {
        let mut map = page_map(&ViewerConfig::default());
        map.set_view(LatLng::new(50.0, -120.0), 5.0);
        let view = (map.center(), map.zoom());
        map.with_overlay_mut(GROUP, |layer| {
            if let Some(group) = layer.as_any_mut().downcast_mut::<FeatureGroup>() {
                group.clear();
            }
        });

        assert_eq!(
            map.fit_overlay(GROUP, &FitBoundsOptions::default()).unwrap(),
            FitOutcome::Skipped
        );
        map.handle_input(click(Point::new(20.0, 90.0))).unwrap();
        assert_eq!((map.center(), map.zoom()), view);
    }

    #[test]
    fn test_zoom_buttons_follow_limits() {
        let mut map = page_map(&ViewerConfig::default());
        let zoom = map.zoom();

        map.handle_input(click(Point::new(25.0, 25.0))).unwrap();
        assert_eq!(map.zoom(), zoom + 1.0);
        map.handle_input(click(Point::new(25.0, 55.0))).unwrap();
        assert_eq!(map.zoom(), zoom);

        map.zoom_to(17.0, None);
        let element = map.controls().element("zoom").unwrap();
        assert!(element.part("zoom-in").unwrap().disabled);
        assert!(!element.part("zoom-out").unwrap().disabled);
    }

    #[test]
    fn test_scale_tracks_the_view() {
        let mut map = page_map(&ViewerConfig::default());
        let bars = |map: &Map| -> Vec<String> {
            map.controls()
                .element("scale")
                .unwrap()
                .parts
                .iter()
                .filter_map(|part| match &part.content {
                    PartContent::Bar { label } => Some(label.clone()),
                    _ => None,
                })
                .collect()
        };

        let before = bars(&map);
        assert_eq!(before.len(), 2);
        assert!(before[0].ends_with(" km") || before[0].ends_with(" m"));
        assert!(before[1].ends_with(" mi") || before[1].ends_with(" ft"));

        map.zoom_to(map.zoom() + 3.0, None);
        assert_ne!(bars(&map), before);
    }

    #[test]
    fn test_embedded_profile() {
        let config = ViewerProfile::Embedded.resolve();
        let mut map = page_map(&config);
        let view = (map.center(), map.zoom());

        map.handle_input(InputEvent::Scroll {
            delta: 1.0,
            position: Point::new(400.0, 300.0),
        })
        .unwrap();
        map.handle_input(InputEvent::DragStart {
            position: Point::new(400.0, 300.0),
        })
        .unwrap();
        map.handle_input(InputEvent::Drag {
            delta: Point::new(60.0, 0.0),
        })
        .unwrap();
        assert_eq!((map.center(), map.zoom()), view);

        let scale = map.controls().element("scale").unwrap();
        assert_eq!(scale.parts.len(), 1);
    }

    #[test]
    fn test_map_clicks_are_reported() {
        let mut map = page_map(&ViewerConfig::default());
        let clicks = Arc::new(Mutex::new(Vec::new()));
        let sink = clicks.clone();
        map.on("click", move |event| {
            if let MapEvent::Click { lat_lng, .. } = event {
                sink.lock().unwrap().push(*lat_lng);
            }
        });

        map.handle_input(click(Point::new(20.0, 90.0))).unwrap();
        map.handle_input(click(Point::new(400.0, 300.0))).unwrap();
        map.process_events();

        let clicks = clicks.lock().unwrap();
        assert_eq!(clicks.len(), 1);
        assert!((clicks[0].lng - map.center().lng).abs() < 1e-9);
    }

    #[test]
    fn test_resize_relayouts_controls() {
        let mut map = page_map(&ViewerConfig::default());
        map.handle_input(InputEvent::Resize {
            size: Point::new(1024.0, 768.0),
        })
        .unwrap();

        let scale = map.controls().bounds_of("scale").unwrap();
        assert_eq!(scale.max, Point::new(1014.0, 758.0));
        let layers = map.controls().bounds_of("layers").unwrap();
        assert_eq!(layers.max.x, 1014.0);

        let mut context = RenderContext::new(1024, 768);
        map.render(&mut context).unwrap();
        assert!(context
            .get_drawing_queue()
            .iter()
            .any(|command| matches!(command, DrawCommand::Text { text, .. } if text == "+")));
    }
}
