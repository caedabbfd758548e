//! The S1S2 matrix figure: a fixed severity heatmap with one marker per risk.
//!
//! A [`MatrixFigure`] is a plain description. Rendering it (SVG in the
//! dashboard, JSON for `s1s2 render`) is the caller's business.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::controls::{ControlKind, ControlState};
use crate::errors::CoreError;
use crate::impact::ImpactLevel;

pub const FIGURE_TITLE: &str = "S1S2 Matrix";

/// Heatmap columns (financial axis).
pub const HEATMAP_WIDTH: usize = 5;
/// Heatmap rows (ESG axis).
pub const HEATMAP_HEIGHT: usize = 4;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub fn css(self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::suboptimal_flops
    )]
    fn lerp(self, other: Self, t: f64) -> Self {
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

/// A color at a normalized position on the scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgb,
}

/// Pale yellow through orange to red.
pub const COLOR_RAMP: [ColorStop; 5] = [
    ColorStop {
        offset: 0.0,
        color: Rgb::new(255, 255, 224),
    },
    ColorStop {
        offset: 0.25,
        color: Rgb::new(255, 255, 0),
    },
    ColorStop {
        offset: 0.5,
        color: Rgb::new(255, 165, 0),
    },
    ColorStop {
        offset: 0.75,
        color: Rgb::new(255, 69, 0),
    },
    ColorStop {
        offset: 1.0,
        color: Rgb::new(255, 0, 0),
    },
];

/// Background severity grid. `z[y][x]` is the weight of the cell at
/// `(x + 1, y + 1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Heatmap {
    pub x: Vec<u8>,
    pub y: Vec<u8>,
    pub z: Vec<Vec<u32>>,
    pub colorscale: Vec<ColorStop>,
    pub show_scale: bool,
}

impl Default for Heatmap {
    #[allow(clippy::cast_possible_truncation)]
    fn default() -> Self {
        let x = (1..=HEATMAP_WIDTH as u8).collect::<Vec<_>>();
        let y = (1..=HEATMAP_HEIGHT as u8).collect::<Vec<_>>();
        let z = y
            .iter()
            .map(|row| x.iter().map(|col| u32::from(*row) * u32::from(*col)).collect())
            .collect();
        Self {
            x,
            y,
            z,
            colorscale: COLOR_RAMP.to_vec(),
            show_scale: false,
        }
    }
}

impl Heatmap {
    fn bounds(&self) -> (u32, u32) {
        let mut cells = self.z.iter().flatten().copied();
        let first = cells.next().unwrap_or(0);
        cells.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)))
    }

    /// Color of a weight, linearly interpolated along the color scale after
    /// normalizing against the grid's min and max.
    #[must_use]
    pub fn color_for(&self, weight: u32) -> Rgb {
        let (lo, hi) = self.bounds();
        let t = if hi > lo {
            (f64::from(weight.clamp(lo, hi)) - f64::from(lo)) / f64::from(hi - lo)
        } else {
            0.0
        };
        interpolate(&self.colorscale, t)
    }
}

fn interpolate(stops: &[ColorStop], t: f64) -> Rgb {
    let Some(first) = stops.first() else {
        return Rgb::new(0, 0, 0);
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let local = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            return a.color.lerp(b.color, local);
        }
    }
    stops.last().map_or(first.color, |stop| stop.color)
}

/// One risk on the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Marker {
    pub label: String,
    /// Financial score.
    pub x: u8,
    /// ESG score.
    pub y: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MarkerStyle {
    pub size: u8,
    pub color: String,
    pub text_position: String,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            size: 10,
            color: "rgba(0,0,0,0.8)".to_string(),
            text_position: "top center".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Tick {
    pub value: u8,
    pub label: String,
}

/// An axis whose ticks show impact labels instead of raw scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Axis {
    pub title: String,
    pub ticks: Vec<Tick>,
}

impl Axis {
    #[must_use]
    pub fn for_kind(kind: ControlKind) -> Self {
        Self {
            title: kind.title().to_string(),
            ticks: ImpactLevel::ALL
                .iter()
                .map(|level| Tick {
                    value: level.to_score(),
                    label: level.as_str().to_string(),
                })
                .collect(),
        }
    }
}

/// Full chart description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatrixFigure {
    pub title: String,
    pub heatmap: Heatmap,
    pub markers: Vec<Marker>,
    pub marker_style: MarkerStyle,
    pub x_axis: Axis,
    pub y_axis: Axis,
}

impl MatrixFigure {
    /// Build the figure from per-row scores in row order.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::LengthMismatch` when the three inputs differ in
    /// length.
    pub fn build(names: &[String], financial: &[u8], esg: &[u8]) -> Result<Self, CoreError> {
        if names.len() != financial.len() || names.len() != esg.len() {
            return Err(CoreError::LengthMismatch {
                names: names.len(),
                financial: financial.len(),
                esg: esg.len(),
            });
        }

        let markers = names
            .iter()
            .zip(financial.iter().zip(esg))
            .map(|(label, (x, y))| Marker {
                label: label.clone(),
                x: *x,
                y: *y,
            })
            .collect();

        Ok(Self {
            title: FIGURE_TITLE.to_string(),
            heatmap: Heatmap::default(),
            markers,
            marker_style: MarkerStyle::default(),
            x_axis: Axis::for_kind(ControlKind::Financial),
            y_axis: Axis::for_kind(ControlKind::Esg),
        })
    }

    /// Recompute the whole figure from the current control values.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::LengthMismatch` when `names` does not have one
    /// entry per control row.
    pub fn from_controls(names: &[String], controls: &ControlState) -> Result<Self, CoreError> {
        Self::build(
            names,
            &controls.axis_scores(ControlKind::Financial),
            &controls.axis_scores(ControlKind::Esg),
        )
    }
}
