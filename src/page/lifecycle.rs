//! Lifecycle of the map on the application page.
//!
//! The page hands the controller a record signal when it initializes and the
//! mount point once its view exists. As soon as both a record and a mount are
//! available the controller builds the map, loads the record's features and
//! fits the view to them. A signal that yields no record sends the user back
//! to the application list instead.

use crate::{
    core::{
        config::ViewerConfig,
        fit::FitOutcome,
        geo::LatLngBounds,
        map::{InputOutcome, Map, MountPoint},
    },
    input::events::InputEvent,
    layers::{
        group::{AddReport, FeatureGroup},
        registry::BaseLayerRegistry,
    },
    models::Application,
    page::{
        collaborators::{ModalOptions, ModalOutcome, ModalService, Navigator, Notifier, Route},
        subscription::Subscription,
    },
    rendering::context::RenderContext,
    ui::{
        controls::ControlPosition, layers_control::LayersControl, reset_view::ResetViewControl,
        scale::ScaleControl, zoom::ZoomControl,
    },
    MapError, Result,
};
use futures::stream::BoxStream;
use log::{debug, info, warn};
use std::{fmt, sync::Arc};

pub const LOAD_FAILURE_MESSAGE: &str = "Uh-oh, couldn't load application";

/// Overlay id of the record's feature group
pub const FEATURE_GROUP_ID: &str = "application-features";

/// Emits the resolved record, or `None` when it could not be loaded
pub type RecordSignal = BoxStream<'static, Option<Application>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    AwaitingRecord,
    Ready,
    Destroyed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::AwaitingRecord => "awaiting record",
            LifecycleState::Ready => "ready",
            LifecycleState::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

/// Owns the map of one application page visit
pub struct ApplicationMapController {
    state: LifecycleState,
    config: ViewerConfig,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    modals: Arc<dyn ModalService>,
    subscription: Option<Subscription<Option<Application>>>,
    record: Option<Application>,
    mount: Option<MountPoint>,
    map: Option<Map>,
    load_report: Option<AddReport>,
}

impl ApplicationMapController {
    pub fn new(
        config: ViewerConfig,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        modals: Arc<dyn ModalService>,
    ) -> Self {
        Self {
            state: LifecycleState::Uninitialized,
            config,
            navigator,
            notifier,
            modals,
            subscription: None,
            record: None,
            mount: None,
            map: None,
            load_report: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn application(&self) -> Option<&Application> {
        self.record.as_ref()
    }

    pub fn map(&self) -> Option<&Map> {
        self.map.as_ref()
    }

    pub fn map_mut(&mut self) -> Option<&mut Map> {
        self.map.as_mut()
    }

    /// Which features were loaded and which were skipped
    pub fn load_report(&self) -> Option<&AddReport> {
        self.load_report.as_ref()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription
            .as_ref()
            .map(Subscription::is_active)
            .unwrap_or(false)
    }

    /// Subscribes to the record signal
    pub fn on_init(&mut self, signal: RecordSignal) -> Result<()> {
        self.expect_state(LifecycleState::Uninitialized, "initialize")?;
        self.subscription = Some(Subscription::new(signal));
        self.transition(LifecycleState::AwaitingRecord);
        Ok(())
    }

    /// Records the mounted map element; builds the map if the record is already known
    pub fn after_view_init(&mut self, mount: MountPoint) -> Result<()> {
        self.expect_state(LifecycleState::AwaitingRecord, "attach the view")?;
        if self.mount.is_some() {
            return Err(self.invalid("attach the view twice"));
        }
        debug!("View mounted on #{}", mount.id);
        self.mount = Some(mount);
        if self.record.is_some() {
            self.enter_ready()?;
        }
        Ok(())
    }

    /// Waits for the next signal value and acts on it.
    ///
    /// The first record is kept; later values are ignored. A missing record
    /// (or a signal that ends without one) alerts the user, navigates back to
    /// the application list and tears the controller down, as does a map that
    /// cannot be built for the record.
    pub async fn resolve(&mut self) -> Result<LifecycleState> {
        if !matches!(
            self.state,
            LifecycleState::AwaitingRecord | LifecycleState::Ready
        ) {
            return Err(self.invalid("resolve the record"));
        }
        let Some(subscription) = self.subscription.as_mut() else {
            return Err(self.invalid("resolve the record"));
        };

        match subscription.next().await {
            Some(Some(application)) if self.record.is_none() => {
                info!(
                    "Loaded application {} with {} features",
                    application.id,
                    application.features.len()
                );
                self.record = Some(application);
                if self.mount.is_some() {
                    self.enter_ready()?;
                }
            }
            Some(Some(application)) => {
                warn!("Ignoring later value for application {}", application.id);
            }
            Some(None) | None if self.record.is_none() => {
                self.fail_load("No application record")
            }
            Some(None) => warn!("Ignoring empty signal value, a record is already loaded"),
            None => debug!("Record signal ended"),
        }
        Ok(self.state)
    }

    /// Releases the signal and dismounts the map. Calling it again is a no-op.
    pub fn destroy(&mut self) -> Result<()> {
        if self.state == LifecycleState::Destroyed {
            return Ok(());
        }
        self.teardown();
        Ok(())
    }

    /// Navigates to the full map, focused on this application when there is one
    pub fn show_on_full_map(&self) {
        let application = self.record.as_ref().map(|record| record.id.clone());
        self.navigator.navigate(Route::Map { application });
    }

    /// Opens the add-comment modal when the application has an open comment period
    pub async fn add_comment(&self) -> Option<ModalOutcome> {
        let period = self.record.as_ref()?.current_period.clone()?;
        let outcome = self
            .modals
            .open_add_comment(period, ModalOptions::ADD_COMMENT)
            .await;
        match &outcome {
            ModalOutcome::Saved(result) => info!("Comment saved, result = {}", result),
            ModalOutcome::Dismissed(reason) => warn!("Comment modal dismissed, reason = {}", reason),
        }
        Some(outcome)
    }

    /// Forwards input to the map; ignored until the map exists
    pub fn handle_input(&mut self, event: InputEvent) -> Result<InputOutcome> {
        match self.map.as_mut() {
            Some(map) if self.state == LifecycleState::Ready => map.handle_input(event),
            _ => Ok(InputOutcome::default()),
        }
    }

    /// Same fit as the reset button
    pub fn reset_view(&mut self) -> Result<FitOutcome> {
        self.expect_state(LifecycleState::Ready, "reset the view")?;
        let missing_map = self.invalid("reset the view");
        let fit = self.config.fit.clone();
        match self.map.as_mut() {
            Some(map) => map.fit_overlay(FEATURE_GROUP_ID, &fit),
            None => Err(missing_map),
        }
    }

    pub fn render(&mut self, context: &mut RenderContext) -> Result<()> {
        match self.map.as_mut() {
            Some(map) if self.state == LifecycleState::Ready => map.render(context),
            _ => {
                context.begin_frame();
                Ok(())
            }
        }
    }

    /// Builds the map, or gives the page up when it cannot be built
    fn enter_ready(&mut self) -> Result<()> {
        if let Err(err) = self.build_map() {
            self.record = None;
            self.fail_load(&format!("Could not build the map ({})", err));
            return Err(err);
        }
        Ok(())
    }

    fn build_map(&mut self) -> Result<()> {
        let (Some(record), Some(mount)) = (self.record.as_ref(), self.mount.as_ref()) else {
            return Err(self.invalid("build the map"));
        };

        let mut map = Map::new(mount.clone(), self.config.map.clone());
        map.set_max_bounds(Some(LatLngBounds::world()));
        map.set_base_layers(BaseLayerRegistry::with_default(
            &self.config.default_base_layer,
        )?);
        map.add_control(Box::new(ZoomControl::new(ControlPosition::TopLeft)))?;
        map.add_control(Box::new(LayersControl::new(ControlPosition::TopRight)))?;
        map.add_control(Box::new(ResetViewControl::new(
            ControlPosition::TopLeft,
            FEATURE_GROUP_ID,
            self.config.fit.clone(),
        )))?;
        map.add_control(Box::new(ScaleControl::new(
            ControlPosition::BottomRight,
            self.config.scale.clone(),
        )))?;

        let mut group = FeatureGroup::new(FEATURE_GROUP_ID, record.id.clone());
        let report = group.add_all(record)?;
        map.add_overlay(group.into_overlay())?;
        let outcome = map.fit_overlay(FEATURE_GROUP_ID, &self.config.fit)?;
        if !outcome.is_fitted() {
            warn!("Application {} has no mappable features", record.id);
        }

        self.load_report = Some(report);
        self.map = Some(map);
        self.transition(LifecycleState::Ready);
        Ok(())
    }

    fn fail_load(&mut self, reason: &str) {
        warn!("{}, returning to the application list", reason);
        self.notifier.alert(LOAD_FAILURE_MESSAGE);
        self.navigator.navigate(Route::Applications);
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.release();
        }
        if let Some(mut map) = self.map.take() {
            let controls = map.remove();
            debug!("Dismounted controls: {}", controls.join(", "));
        }
        self.transition(LifecycleState::Destroyed);
    }

    fn transition(&mut self, next: LifecycleState) {
        info!("Application map: {} -> {}", self.state, next);
        self.state = next;
    }

    fn expect_state(&self, expected: LifecycleState, operation: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.invalid(operation))
        }
    }

    fn invalid(&self, operation: &'static str) -> MapError {
        MapError::InvalidLifecycle {
            from: self.state,
            operation,
        }
    }
}
