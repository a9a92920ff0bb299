use crate::{
    core::{bounds::Bounds, geo::Point},
    rendering::context::Color,
    ui::controls::{
        Control, ControlContext, ControlElement, ControlPart, ControlPosition, PartContent,
    },
};
use serde::{Deserialize, Serialize};

const FEET_PER_METER: f64 = 3.2808399;
const FEET_PER_MILE: f64 = 5280.0;
const BAR_HEIGHT: f64 = 18.0;

/// Scale bar options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleOptions {
    /// Maximum bar width in pixels
    pub max_width: f64,
    pub metric: bool,
    pub imperial: bool,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            max_width: 100.0,
            metric: true,
            imperial: true,
        }
    }
}

/// One rendered scale line
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleBar {
    pub label: String,
    /// Width in pixels
    pub width: f64,
}

/// Largest 1, 2, 3 or 5 × 10ⁿ not above `num`
pub fn round_number(num: f64) -> f64 {
    let digits = (num.floor().max(0.0) as u64).to_string().len() as i32;
    let pow10 = 10_f64.powi(digits - 1);
    let d = num / pow10;
    let d = if d >= 10.0 {
        10.0
    } else if d >= 5.0 {
        5.0
    } else if d >= 3.0 {
        3.0
    } else if d >= 2.0 {
        2.0
    } else {
        1.0
    };
    pow10 * d
}

/// Metric bar for a ground distance spanning `max_width` pixels
pub fn metric_bar(max_meters: f64, max_width: f64) -> ScaleBar {
    let meters = round_number(max_meters);
    let label = if meters < 1000.0 {
        format!("{meters} m")
    } else {
        format!("{} km", meters / 1000.0)
    };
    ScaleBar {
        label,
        width: (max_width * meters / max_meters).round(),
    }
}

/// Imperial bar for a ground distance spanning `max_width` pixels
pub fn imperial_bar(max_meters: f64, max_width: f64) -> ScaleBar {
    let max_feet = max_meters * FEET_PER_METER;
    if max_feet > FEET_PER_MILE {
        let max_miles = max_feet / FEET_PER_MILE;
        let miles = round_number(max_miles);
        ScaleBar {
            label: format!("{miles} mi"),
            width: (max_width * miles / max_miles).round(),
        }
    } else {
        let feet = round_number(max_feet);
        ScaleBar {
            label: format!("{feet} ft"),
            width: (max_width * feet / max_feet).round(),
        }
    }
}

/// Display-only scale bar
pub struct ScaleControl {
    position: ControlPosition,
    options: ScaleOptions,
    bars: Vec<ScaleBar>,
}

impl ScaleControl {
    pub fn new(position: ControlPosition, options: ScaleOptions) -> Self {
        Self {
            position,
            options,
            bars: Vec::new(),
        }
    }

    pub fn bars(&self) -> &[ScaleBar] {
        &self.bars
    }

    fn update(&mut self, context: &ControlContext, element: &mut ControlElement) {
        let viewport = context.viewport;
        let y = viewport.size.y / 2.0;
        let left = viewport.container_point_to_lat_lng(&Point::new(0.0, y));
        let right = viewport.container_point_to_lat_lng(&Point::new(self.options.max_width, y));
        let max_meters = left.distance_to(&right);

        self.bars.clear();
        if max_meters.is_finite() && max_meters > 0.0 {
            if self.options.metric {
                self.bars.push(metric_bar(max_meters, self.options.max_width));
            }
            if self.options.imperial {
                self.bars.push(imperial_bar(max_meters, self.options.max_width));
            }
        }

        let width = self.bars.iter().map(|bar| bar.width).fold(1.0, f64::max);
        element.size = Point::new(width, BAR_HEIGHT * self.bars.len().max(1) as f64);
        element.parts = self
            .bars
            .iter()
            .enumerate()
            .map(|(row, bar)| {
                let top = row as f64 * BAR_HEIGHT;
                ControlPart::new(
                    format!("scale-{row}"),
                    Bounds::from_coords(0.0, top, bar.width, top + BAR_HEIGHT),
                    PartContent::Bar {
                        label: bar.label.clone(),
                    },
                )
            })
            .collect();
    }
}

impl Default for ScaleControl {
    fn default() -> Self {
        Self::new(ControlPosition::BottomRight, ScaleOptions::default())
    }
}

impl Control for ScaleControl {
    fn id(&self) -> &str {
        "scale"
    }

    fn position(&self) -> ControlPosition {
        self.position
    }

    fn on_mount(&mut self, context: &ControlContext) -> ControlElement {
        let mut element = ControlElement::new(Point::new(self.options.max_width, BAR_HEIGHT));
        element.background = Color::new(0, 0, 0, 0);
        element.border = None;
        self.update(context, &mut element);
        element
    }

    fn on_view_changed(&mut self, context: &ControlContext, element: &mut ControlElement) {
        self.update(context, element);
    }
}
