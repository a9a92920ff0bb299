//! egui front end: paints a map's display list and feeds pointer input back.

use crate::{
    core::{geo::Point, map::Map},
    input::events::{InputEvent, MouseButton},
    rendering::context::{DrawCommand, RenderContext},
    ui::controls::Cursor,
};
use egui::{Align2, Color32, CursorIcon, FontId, Pos2, Rect, Response, Sense, Shape, Stroke, Ui, Widget};
use log::warn;

/// Widget showing a `Map` at the available size
pub struct MapView<'a> {
    map: &'a mut Map,
}

impl<'a> MapView<'a> {
    pub fn new(map: &'a mut Map) -> Self {
        Self { map }
    }
}

impl Widget for MapView<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());

        let size = Point::new(rect.width() as f64, rect.height() as f64);
        if self.map.mount().size != size {
            self.map.resize(size);
        }

        for event in collect_input(ui, &response, rect) {
            if let Err(err) = self.map.handle_input(event) {
                warn!("Map input failed: {}", err);
            }
        }

        let mut context = RenderContext::new(rect.width() as u32, rect.height() as u32);
        if let Err(err) = self.map.render(&mut context) {
            warn!("Map render failed: {}", err);
        }
        paint(ui, rect, &context);

        // Control cursor and tooltip
        let element = response
            .hover_pos()
            .and_then(|pos| self.map.controls().hit_test(&to_local(pos, rect)))
            .and_then(|id| self.map.controls().element(id));
        match element {
            Some(element) => {
                if element.cursor == Cursor::Pointer {
                    ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
                }
                match element.title.clone() {
                    Some(title) => response.on_hover_text(title),
                    None => response,
                }
            }
            None => {
                if response.dragged() {
                    ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
                }
                response
            }
        }
    }
}

pub trait MapUiExt {
    fn tenure_map(&mut self, map: &mut Map) -> Response;
}

impl MapUiExt for Ui {
    fn tenure_map(&mut self, map: &mut Map) -> Response {
        self.add(MapView::new(map))
    }
}

fn to_local(pos: Pos2, rect: Rect) -> Point {
    Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64)
}

fn to_screen(point: &Point, rect: Rect) -> Pos2 {
    Pos2::new(rect.min.x + point.x as f32, rect.min.y + point.y as f32)
}

fn to_rect(bounds: &crate::core::bounds::Bounds, rect: Rect) -> Rect {
    Rect::from_min_max(to_screen(&bounds.min, rect), to_screen(&bounds.max, rect))
}

fn collect_input(ui: &Ui, response: &Response, rect: Rect) -> Vec<InputEvent> {
    let mut events = Vec::new();

    match response.hover_pos() {
        Some(pos) => events.push(InputEvent::MouseMove {
            position: to_local(pos, rect),
        }),
        None if !response.dragged() => events.push(InputEvent::PointerLeave),
        None => {}
    }

    if response.drag_started() {
        if let Some(pos) = response.interact_pointer_pos() {
            events.push(InputEvent::DragStart {
                position: to_local(pos, rect),
            });
        }
    }
    if response.dragged() {
        let delta = response.drag_delta();
        if delta != egui::Vec2::ZERO {
            events.push(InputEvent::Drag {
                delta: Point::new(delta.x as f64, delta.y as f64),
            });
        }
    }
    if response.drag_released() {
        events.push(InputEvent::DragEnd);
    }

    if let Some(pos) = response.interact_pointer_pos() {
        let position = to_local(pos, rect);
        if response.double_clicked() {
            events.push(InputEvent::DoubleClick { position });
        } else if response.clicked() {
            events.push(InputEvent::Click {
                position,
                button: MouseButton::Left,
            });
        }
    }

    if let Some(pos) = response.hover_pos() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll.abs() > 0.1 {
            events.push(InputEvent::Scroll {
                delta: scroll.signum() as f64,
                position: to_local(pos, rect),
            });
        }
    }

    events
}

fn icon_glyph(name: &str) -> &str {
    match name {
        "refresh" => "\u{27f3}",
        other => other,
    }
}

/// Paints a display list into `rect`
pub fn paint(ui: &Ui, rect: Rect, context: &RenderContext) {
    let painter = ui.painter_at(rect);

    for command in context.get_drawing_queue() {
        match command {
            DrawCommand::Point { position, style } => {
                painter.circle(
                    to_screen(position, rect),
                    style.radius,
                    Color32::from(style.fill_color.with_opacity(style.opacity)),
                    Stroke::new(style.stroke_width, Color32::from(style.stroke_color)),
                );
            }
            DrawCommand::Line { points, style } => {
                let points = points.iter().map(|p| to_screen(p, rect)).collect();
                painter.add(Shape::line(
                    points,
                    Stroke::new(style.width, Color32::from(style.color.with_opacity(style.opacity))),
                ));
            }
            DrawCommand::Polygon {
                exterior,
                holes,
                style,
            } => {
                let stroke = Stroke::new(
                    style.stroke_width,
                    Color32::from(style.stroke_color.with_opacity(style.stroke_opacity)),
                );
                let ring: Vec<Pos2> = exterior.iter().map(|p| to_screen(p, rect)).collect();
                painter.add(Shape::convex_polygon(
                    ring.clone(),
                    Color32::from(style.fill_color.with_opacity(style.fill_opacity)),
                    Stroke::NONE,
                ));
                painter.add(Shape::closed_line(ring, stroke));
                for hole in holes {
                    let hole = hole.iter().map(|p| to_screen(p, rect)).collect();
                    painter.add(Shape::closed_line(hole, stroke));
                }
            }
            DrawCommand::Tile {
                url,
                bounds,
                opacity,
            } => {
                let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
                egui::Image::new(url.clone())
                    .tint(Color32::from_white_alpha(alpha))
                    .paint_at(ui, to_rect(bounds, rect));
            }
            DrawCommand::Rect {
                bounds,
                fill,
                stroke,
            } => {
                let target = to_rect(bounds, rect);
                painter.rect_filled(target, 2.0, Color32::from(*fill));
                if let Some(stroke) = stroke {
                    painter.rect_stroke(target, 2.0, Stroke::new(1.0, Color32::from(*stroke)));
                }
            }
            DrawCommand::Text {
                position,
                text,
                color,
                size,
            } => {
                painter.text(
                    to_screen(position, rect),
                    Align2::CENTER_CENTER,
                    text,
                    FontId::proportional(*size),
                    Color32::from(*color),
                );
            }
            DrawCommand::Icon {
                bounds,
                name,
                color,
            } => {
                painter.text(
                    to_rect(bounds, rect).center(),
                    Align2::CENTER_CENTER,
                    icon_glyph(name),
                    FontId::proportional(20.0),
                    Color32::from(*color),
                );
            }
        }
    }
}
