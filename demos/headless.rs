use async_trait::async_trait;
use futures::{executor::block_on, stream, StreamExt};
use serde_json::json;
use std::sync::Arc;
use tenure_map::{
    input::events::{InputEvent, MouseButton},
    models::{Application, CommentPeriod, Feature},
    page::{ModalOptions, ModalOutcome, ModalService, Navigator, Notifier, Route},
    rendering::context::{DrawCommand, RenderContext},
    ApplicationMapController, MountPoint, Point, ViewerProfile,
};

/// Stands in for the page's router, alert box and modal service
struct ConsolePage;

impl Navigator for ConsolePage {
    fn navigate(&self, route: Route) {
        println!("   -> navigate to {}", route);
    }
}

impl Notifier for ConsolePage {
    fn alert(&self, message: &str) {
        println!("   !! {}", message);
    }
}

#[async_trait]
impl ModalService for ConsolePage {
    async fn open_add_comment(&self, period: CommentPeriod, options: ModalOptions) -> ModalOutcome {
        println!(
            "   add-comment modal for period {} ({:?} backdrop, {:?})",
            period.id, options.backdrop, options.size
        );
        ModalOutcome::Dismissed("closed from the console".to_string())
    }
}

fn sample_application() -> Application {
    let parcel: Feature = serde_json::from_value(json!({
        "type": "Feature",
        "id": "WHSE_TANTALIS.TA_CROWN_TENURES_SVW.fid-1",
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [-123.42, 48.41], [-123.36, 48.41], [-123.36, 48.45], [-123.42, 48.45], [-123.42, 48.41]
            ]]
        },
        "geometry_name": "SHAPE",
        "properties": { "TENURE_PURPOSE": "COMMERCIAL", "TENURE_STATUS": "ACCEPTED" }
    }))
    .unwrap_or_default();

    Application::new("5a1b2c")
        .with_features(vec![parcel])
        .with_period(CommentPeriod::new("cp-1"))
}

/// Drives the application map through a page visit without any UI
fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("Tenure map headless example");
    println!("===========================");

    let page = Arc::new(ConsolePage);
    let mut controller = ApplicationMapController::new(
        ViewerProfile::Page.resolve(),
        page.clone(),
        page.clone(),
        page,
    );

    controller.on_init(stream::iter(vec![Some(sample_application())]).boxed())?;
    controller.after_view_init(MountPoint::new("map", 1024.0, 768.0))?;
    let state = block_on(controller.resolve())?;
    println!("\nController is {}", state);

    if let Some(map) = controller.map() {
        println!(
            "   view: ({:.4}, {:.4}) at zoom {}",
            map.center().lat,
            map.center().lng,
            map.zoom()
        );
        println!("   controls: {}", map.controls().ids().join(", "));
        for credit in map.attribution() {
            println!("   credit: {}", credit);
        }
    }

    if let Some(map) = controller.map_mut() {
        map.pan_by(Point::new(300.0, 200.0));
        println!("\nPanned to ({:.4}, {:.4})", map.center().lat, map.center().lng);
    }

    // The reset button sits under the zoom bar
    controller.handle_input(InputEvent::Click {
        position: Point::new(20.0, 90.0),
        button: MouseButton::Left,
    })?;
    if let Some(map) = controller.map() {
        println!("Reset to ({:.4}, {:.4})", map.center().lat, map.center().lng);
    }

    let mut context = RenderContext::new(1024, 768);
    controller.render(&mut context)?;
    let queue = context.get_drawing_queue();
    let tiles = queue
        .iter()
        .filter(|command| matches!(command, DrawCommand::Tile { .. }))
        .count();
    println!("\nFrame: {} draw commands, {} tiles", queue.len(), tiles);

    println!("\nAdding a comment:");
    block_on(controller.add_comment());
    controller.show_on_full_map();

    controller.destroy()?;
    println!("\nController is {}", controller.state());
    Ok(())
}
