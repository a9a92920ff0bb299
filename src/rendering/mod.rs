pub mod context;

pub use context::{
    Color, DrawCommand, LineRenderStyle, PointRenderStyle, PolygonRenderStyle, RenderContext,
};
