use crate::{
    core::{bounds::Bounds, geo::Point},
    MapError, Result,
};
use serde::{Deserialize, Serialize};

/// RGBA color that survives serialization and maps onto any paint backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parses `#rgb` or `#rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let mut chars = digits.chars().map(|c| channel(&format!("{c}{c}")));
                Some(Self::rgb(chars.next()??, chars.next()??, chars.next()??))
            }
            6 => Some(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn with_opacity(self, opacity: f32) -> Self {
        let alpha = (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a: alpha, ..self }
    }
}

#[cfg(feature = "egui")]
impl From<Color> for egui::Color32 {
    fn from(color: Color) -> Self {
        egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
    }
}

/// Styles for different rendering primitives
#[derive(Debug, Clone, PartialEq)]
pub struct PointRenderStyle {
    pub fill_color: Color,
    pub stroke_color: Color,
    pub stroke_width: f32,
    pub radius: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineRenderStyle {
    pub color: Color,
    pub width: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRenderStyle {
    pub fill_color: Color,
    pub stroke_color: Color,
    pub stroke_width: f32,
    pub fill_opacity: f32,
    pub stroke_opacity: f32,
}

/// Commands that can be issued to the render context
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Point {
        position: Point,
        style: PointRenderStyle,
    },
    Line {
        points: Vec<Point>,
        style: LineRenderStyle,
    },
    Polygon {
        exterior: Vec<Point>,
        holes: Vec<Vec<Point>>,
        style: PolygonRenderStyle,
    },
    /// Base-layer tile; the painter fetches `url` and draws it into `bounds`
    Tile {
        url: String,
        bounds: Bounds,
        opacity: f32,
    },
    /// Filled (and optionally outlined) screen rectangle, used by controls
    Rect {
        bounds: Bounds,
        fill: Color,
        stroke: Option<Color>,
    },
    Text {
        position: Point,
        text: String,
        color: Color,
        size: f32,
    },
    /// Named icon glyph (material icons) centered in `bounds`
    Icon {
        bounds: Bounds,
        name: String,
        color: Color,
    },
}

/// Display list collected for one frame
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub width: u32,
    pub height: u32,
    pub drawing_queue: Vec<DrawCommand>,
    /// Viewport clipping bounds in screen coordinates
    pub clip_bounds: Option<Bounds>,
}

impl RenderContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            drawing_queue: Vec::new(),
            clip_bounds: None,
        }
    }

    /// Begin a frame
    pub fn begin_frame(&mut self) {
        self.drawing_queue.clear();
    }

    pub fn size(&self) -> Point {
        Point::new(self.width as f64, self.height as f64)
    }

    pub fn render_point(&mut self, position: &Point, style: &PointRenderStyle) {
        self.drawing_queue.push(DrawCommand::Point {
            position: *position,
            style: style.clone(),
        });
    }

    pub fn render_line(&mut self, points: &[Point], style: &LineRenderStyle) {
        self.drawing_queue.push(DrawCommand::Line {
            points: points.to_vec(),
            style: style.clone(),
        });
    }

    /// Render a polygon with exterior ring, holes, and style
    pub fn render_polygon(
        &mut self,
        exterior: &[Point],
        holes: &[Vec<Point>],
        style: &PolygonRenderStyle,
    ) {
        self.drawing_queue.push(DrawCommand::Polygon {
            exterior: exterior.to_vec(),
            holes: holes.to_vec(),
            style: style.clone(),
        });
    }

    /// Queue a tile, dropping it when it lies outside the clip rectangle
    pub fn render_tile(&mut self, url: String, bounds: Bounds, opacity: f32) -> Result<()> {
        if bounds.min.x >= bounds.max.x || bounds.min.y >= bounds.max.y {
            return Err(MapError::Render(format!("invalid tile bounds for {url}")));
        }
        if !(0.0..=1.0).contains(&opacity) {
            return Err(MapError::Render(
                "opacity must be between 0.0 and 1.0".to_string(),
            ));
        }

        if let Some(clip) = &self.clip_bounds {
            if !clip.intersects(&bounds) {
                return Ok(());
            }
        }

        self.drawing_queue.push(DrawCommand::Tile {
            url,
            bounds,
            opacity,
        });
        Ok(())
    }

    pub fn render_rect(&mut self, bounds: Bounds, fill: Color, stroke: Option<Color>) {
        self.drawing_queue
            .push(DrawCommand::Rect { bounds, fill, stroke });
    }

    pub fn render_text(&mut self, position: Point, text: impl Into<String>, color: Color, size: f32) {
        self.drawing_queue.push(DrawCommand::Text {
            position,
            text: text.into(),
            color,
            size,
        });
    }

    pub fn render_icon(&mut self, bounds: Bounds, name: impl Into<String>, color: Color) {
        self.drawing_queue.push(DrawCommand::Icon {
            bounds,
            name: name.into(),
            color,
        });
    }

    /// Get the current drawing queue
    pub fn get_drawing_queue(&self) -> &[DrawCommand] {
        &self.drawing_queue
    }

    /// Tile URLs in draw order
    pub fn tile_urls(&self) -> Vec<&str> {
        self.drawing_queue
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Tile { url, .. } => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Set viewport clipping bounds (like Leaflet's clip rectangle)
    pub fn set_clip_bounds(&mut self, bounds: Bounds) {
        self.clip_bounds = Some(bounds);
    }

    pub fn clear_clip_bounds(&mut self) {
        self.clip_bounds = None;
    }

    pub fn clear_queue(&mut self) {
        self.drawing_queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::from_hex("#3388ff"), Some(Color::rgb(0x33, 0x88, 0xff)));
        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("#f4f4f4").map(|c| c.to_hex()).as_deref(), Some("#f4f4f4"));
        assert!(Color::from_hex("#zzzzzz").is_none());
        assert!(Color::from_hex("#12345").is_none());
    }

    #[test]
    fn test_tile_validation() {
        let mut context = RenderContext::new(256, 256);
        let inverted = Bounds::from_coords(10.0, 10.0, 0.0, 0.0);
        assert!(context.render_tile("a".into(), inverted, 1.0).is_err());

        let ok = Bounds::from_coords(0.0, 0.0, 256.0, 256.0);
        assert!(context.render_tile("b".into(), ok, 1.5).is_err());
        assert!(context.render_tile("c".into(), ok, 1.0).is_ok());
        assert_eq!(context.tile_urls(), vec!["c"]);
    }

    #[test]
    fn test_tile_clipping() {
        let mut context = RenderContext::new(256, 256);
        context.set_clip_bounds(Bounds::from_coords(0.0, 0.0, 256.0, 256.0));

        let outside = Bounds::from_coords(300.0, 0.0, 556.0, 256.0);
        context.render_tile("outside".into(), outside, 1.0).unwrap();
        assert!(context.get_drawing_queue().is_empty());

        context.begin_frame();
        context.render_rect(
            Bounds::from_coords(0.0, 0.0, 34.0, 34.0),
            Color::WHITE,
            None,
        );
        assert_eq!(context.get_drawing_queue().len(), 1);
    }
}
