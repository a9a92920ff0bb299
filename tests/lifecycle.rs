#[cfg(test)]
mod lifecycle_tests {
    use async_trait::async_trait;
    use futures::{channel::mpsc, stream, StreamExt};
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tenure_map::{
        input::events::{InputEvent, MouseButton},
        layers::{base::LayerTrait, group::FeatureGroup},
        models::{Application, CommentPeriod, Feature},
        page::{
            ApplicationMapController, LifecycleState, ModalOptions, ModalOutcome, ModalService,
            Navigator, Notifier, Route, FEATURE_GROUP_ID, LOAD_FAILURE_MESSAGE,
        },
        rendering::context::{DrawCommand, RenderContext},
        LatLng, LatLngBounds, MapError, MountPoint, Point, ViewerConfig,
    };

    #[derive(Default)]
    struct Page {
        routes: Mutex<Vec<Route>>,
        alerts: Mutex<Vec<String>>,
        opened: Mutex<Vec<(String, ModalOptions)>>,
    }

    impl Navigator for Page {
        fn navigate(&self, route: Route) {
            self.routes.lock().unwrap().push(route);
        }
    }

    impl Notifier for Page {
        fn alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.to_string());
        }
    }

    #[async_trait]
    impl ModalService for Page {
        async fn open_add_comment(
            &self,
            period: CommentPeriod,
            options: ModalOptions,
        ) -> ModalOutcome {
            self.opened.lock().unwrap().push((period.id, options));
            ModalOutcome::Saved("comment-1".to_string())
        }
    }

    fn controller() -> (ApplicationMapController, Arc<Page>) {
        let page = Arc::new(Page::default());
        let controller = ApplicationMapController::new(
            ViewerConfig::default(),
            page.clone(),
            page.clone(),
            page.clone(),
        );
        (controller, page)
    }

    fn mount() -> MountPoint {
        MountPoint::new("map", 800.0, 600.0)
    }

    /// One-degree box around the south end of Vancouver Island, as the registry sends it
    fn box_feature() -> Feature {
        serde_json::from_value(json!({
            "type": "Feature",
            "id": "WHSE_TANTALIS.TA_CROWN_TENURES_SVW.fid-1",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [-123.5, 48.0], [-122.5, 48.0], [-122.5, 49.0], [-123.5, 49.0], [-123.5, 48.0]
                ]]
            },
            "geometry_name": "SHAPE",
            "properties": { "TENURE_STATUS": "ACCEPTED", "INTRID_SID": 101 }
        }))
        .unwrap()
    }

    fn application() -> Application {
        Application::new("app-1").with_features(vec![box_feature()])
    }

    fn reset_button() -> Point {
        // Below the 60px zoom bar in the top-left corner
        Point::new(20.0, 90.0)
    }

    async fn ready_controller() -> (ApplicationMapController, Arc<Page>) {
        let (mut controller, page) = controller();
        controller
            .on_init(stream::iter(vec![Some(application())]).boxed())
            .unwrap();
        controller.after_view_init(mount()).unwrap();
        assert_eq!(controller.resolve().await.unwrap(), LifecycleState::Ready);
        (controller, page)
    }

    #[tokio::test]
    async fn test_record_then_mount_reaches_ready() {
        let (mut controller, _) = controller();
        controller
            .on_init(stream::iter(vec![Some(application())]).boxed())
            .unwrap();
        assert_eq!(
            controller.resolve().await.unwrap(),
            LifecycleState::AwaitingRecord
        );
        assert!(controller.map().is_none());

        controller.after_view_init(mount()).unwrap();
        assert_eq!(controller.state(), LifecycleState::Ready);

        let map = controller.map().unwrap();
        assert_eq!(map.zoom(), 9.0);
        assert_eq!(map.viewport.max_zoom, 17.0);
        assert_eq!(map.base_layer().unwrap().spec().name, "World Imagery");
        assert_eq!(
            map.controls().ids(),
            vec!["zoom", "layers", "reset-view", "scale"]
        );
    }

    #[tokio::test]
    async fn test_fit_frames_the_record() {
        let (controller, _) = ready_controller().await;
        let map = controller.map().unwrap();

        let region = LatLngBounds::from_coords(48.0, -123.5, 49.0, -122.5);
        assert!(map.viewport.bounds().is_valid());
        assert!(map.viewport.bounds().contains_bounds(&region));

        // Bottom padding pushes the region up, so the center sits south of the box middle
        let center = map.center();
        assert!(center.lat < 48.5 && center.lat > 48.0);
        assert!((center.lng - -123.0).abs() < 1e-9);

        // The 25px strip along the bottom edge stays clear of the region
        let south = map
            .viewport
            .lat_lng_to_container_point(&LatLng::new(48.0, -123.0));
        let north = map
            .viewport
            .lat_lng_to_container_point(&LatLng::new(49.0, -123.0));
        assert!(south.y <= 575.0);
        assert!(north.y >= 0.0);

        let report = controller.load_report().unwrap();
        assert_eq!(report.added_count(), 1);
        assert!(report.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_reset_restores_initial_fit() {
        let (mut controller, _) = ready_controller().await;
        let (fitted_center, fitted_zoom) = {
            let map = controller.map().unwrap();
            (map.center(), map.zoom())
        };

        let map = controller.map_mut().unwrap();
        map.pan_by(Point::new(250.0, -120.0));
        map.zoom_to(12.0, None);
        assert_ne!(map.zoom(), fitted_zoom);

        let outcome = controller
            .handle_input(InputEvent::Click {
                position: reset_button(),
                button: MouseButton::Left,
            })
            .unwrap();
        assert!(outcome.on_control);
        assert!(outcome.view_changed);

        let map = controller.map().unwrap();
        assert_eq!(map.zoom(), fitted_zoom);
        assert_eq!(map.center(), fitted_center);
    }

    #[tokio::test]
    async fn test_reset_clicks_do_not_pan_or_zoom() {
        let (mut controller, _) = ready_controller().await;
        let before = {
            let map = controller.map().unwrap();
            (map.center(), map.zoom())
        };

        controller
            .handle_input(InputEvent::DoubleClick {
                position: reset_button(),
            })
            .unwrap();
        controller
            .handle_input(InputEvent::DragStart {
                position: reset_button(),
            })
            .unwrap();
        controller
            .handle_input(InputEvent::Drag {
                delta: Point::new(80.0, 40.0),
            })
            .unwrap();
        controller.handle_input(InputEvent::DragEnd).unwrap();
        controller
            .handle_input(InputEvent::Scroll {
                delta: -1.0,
                position: reset_button(),
            })
            .unwrap();

        let map = controller.map().unwrap();
        assert_eq!((map.center(), map.zoom()), before);
    }

    #[tokio::test]
    async fn test_features_are_normalized() {
        let broken = Feature::new("broken", json!({ "type": "Polygon", "coordinates": "nope" }));
        let application = Application::new("app-2").with_features(vec![box_feature(), broken]);

        let (mut controller, _) = controller();
        controller
            .on_init(stream::iter(vec![Some(application)]).boxed())
            .unwrap();
        controller.after_view_init(mount()).unwrap();
        controller.resolve().await.unwrap();

        let report = controller.load_report().unwrap();
        assert_eq!(report.added_count(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].feature_id.as_deref(), Some("broken"));

        let map = controller.map().unwrap();
        let group = map
            .overlay(FEATURE_GROUP_ID)
            .and_then(|layer| layer.as_any().downcast_ref::<FeatureGroup>())
            .unwrap();
        assert_eq!(group.record_id(), "app-2");
        assert_eq!(group.len(), 1);

        let geojson = serde_json::to_value(group.layers()[0].feature()).unwrap();
        assert!(geojson.get("geometry_name").is_none());
        assert_eq!(geojson["type"], "Feature");
        assert_eq!(geojson["geometry"]["type"], "Polygon");
        assert_eq!(geojson["properties"]["TENURE_STATUS"], "ACCEPTED");
    }

    #[tokio::test]
    async fn test_missing_record_returns_to_list() {
        let (mut controller, page) = controller();
        controller
            .on_init(stream::iter(vec![None]).boxed())
            .unwrap();
        controller.after_view_init(mount()).unwrap();

        assert_eq!(controller.resolve().await.unwrap(), LifecycleState::Destroyed);
        assert_eq!(
            *page.alerts.lock().unwrap(),
            vec![LOAD_FAILURE_MESSAGE.to_string()]
        );
        assert_eq!(*page.routes.lock().unwrap(), vec![Route::Applications]);
        assert!(controller.map().is_none());
        assert!(!controller.is_subscribed());
    }

    fn unknown_base_layer_controller() -> (ApplicationMapController, Arc<Page>) {
        let page = Arc::new(Page::default());
        let config = ViewerConfig {
            default_base_layer: "Bing".to_string(),
            ..ViewerConfig::default()
        };
        let controller =
            ApplicationMapController::new(config, page.clone(), page.clone(), page.clone());
        (controller, page)
    }

    #[tokio::test]
    async fn test_unbuildable_map_returns_to_list() {
        let (mut controller, page) = unknown_base_layer_controller();
        controller
            .on_init(stream::iter(vec![Some(application())]).boxed())
            .unwrap();
        controller.after_view_init(mount()).unwrap();

        assert!(matches!(
            controller.resolve().await,
            Err(MapError::UnknownBaseLayer(name)) if name == "Bing"
        ));
        assert_eq!(controller.state(), LifecycleState::Destroyed);
        assert!(controller.map().is_none());
        assert!(controller.application().is_none());
        assert!(!controller.is_subscribed());
        assert_eq!(
            *page.alerts.lock().unwrap(),
            vec![LOAD_FAILURE_MESSAGE.to_string()]
        );
        assert_eq!(*page.routes.lock().unwrap(), vec![Route::Applications]);
    }

    #[tokio::test]
    async fn test_unbuildable_map_after_mount() {
        let (mut controller, page) = unknown_base_layer_controller();
        controller
            .on_init(stream::iter(vec![Some(application())]).boxed())
            .unwrap();
        assert_eq!(
            controller.resolve().await.unwrap(),
            LifecycleState::AwaitingRecord
        );

        assert!(controller.after_view_init(mount()).is_err());
        assert_eq!(controller.state(), LifecycleState::Destroyed);
        assert!(!controller.is_subscribed());
        assert_eq!(*page.routes.lock().unwrap(), vec![Route::Applications]);

        // Later calls are rejected instead of hanging in a half-built state
        assert!(controller.resolve().await.is_err());
        assert!(controller.reset_view().is_err());
    }

    #[tokio::test]
    async fn test_later_values_are_ignored() {
        let (mut controller, page) = controller();
        let (tx, rx) = mpsc::unbounded();
        controller.on_init(rx.boxed()).unwrap();
        controller.after_view_init(mount()).unwrap();

        tx.unbounded_send(Some(application())).unwrap();
        controller.resolve().await.unwrap();
        let zoom = controller.map().unwrap().zoom();

        tx.unbounded_send(Some(Application::new("other"))).unwrap();
        tx.unbounded_send(None).unwrap();
        controller.resolve().await.unwrap();
        controller.resolve().await.unwrap();

        assert_eq!(controller.state(), LifecycleState::Ready);
        assert_eq!(controller.application().unwrap().id, "app-1");
        assert_eq!(controller.map().unwrap().zoom(), zoom);
        assert!(page.alerts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_destroy_releases_everything() {
        let (mut controller, _) = controller();
        let (tx, rx) = mpsc::unbounded();
        controller.on_init(rx.boxed()).unwrap();
        controller.after_view_init(mount()).unwrap();
        tx.unbounded_send(Some(application())).unwrap();
        controller.resolve().await.unwrap();
        assert!(controller.is_subscribed());

        controller.destroy().unwrap();
        assert_eq!(controller.state(), LifecycleState::Destroyed);
        assert!(controller.map().is_none());
        assert!(!controller.is_subscribed());
        assert!(tx.unbounded_send(Some(application())).is_err());

        // Nothing renders and input is dropped once destroyed
        let mut context = RenderContext::new(800, 600);
        controller.render(&mut context).unwrap();
        assert!(context.get_drawing_queue().is_empty());
        assert!(controller.reset_view().is_err());
        assert!(controller.destroy().is_ok());
    }

    #[tokio::test]
    async fn test_destroy_before_record() {
        let (mut controller, page) = controller();
        let (tx, rx) = mpsc::unbounded::<Option<Application>>();
        controller.on_init(rx.boxed()).unwrap();

        controller.destroy().unwrap();
        assert!(tx.unbounded_send(None).is_err());
        assert!(controller.resolve().await.is_err());
        assert!(page.alerts.lock().unwrap().is_empty());
        assert!(page.routes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_comment_opens_static_large_modal() {
        let (mut controller, page) = controller();
        let application = application().with_period(CommentPeriod::new("cp-7"));
        controller
            .on_init(stream::iter(vec![Some(application)]).boxed())
            .unwrap();
        controller.resolve().await.unwrap();

        let outcome = controller.add_comment().await;
        assert_eq!(outcome, Some(ModalOutcome::Saved("comment-1".to_string())));
        assert_eq!(
            *page.opened.lock().unwrap(),
            vec![("cp-7".to_string(), ModalOptions::ADD_COMMENT)]
        );
    }

    #[tokio::test]
    async fn test_show_on_full_map() {
        let (controller, page) = ready_controller().await;
        controller.show_on_full_map();

        let routes = page.routes.lock().unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].to_string(), "/map;application=app-1");
    }

    #[tokio::test]
    async fn test_ready_map_renders() {
        let (mut controller, _) = ready_controller().await;
        let mut context = RenderContext::new(800, 600);
        controller.render(&mut context).unwrap();

        let queue = context.get_drawing_queue();
        assert!(queue
            .iter()
            .any(|command| matches!(command, DrawCommand::Tile { .. })));
        assert!(queue
            .iter()
            .any(|command| matches!(command, DrawCommand::Polygon { .. })));
        assert!(queue.iter().any(|command| matches!(
            command,
            DrawCommand::Icon { name, .. } if name == "refresh"
        )));

        let center = controller.map().unwrap().center();
        assert!(center != LatLng::default());
    }
}
