//! Inline SVG rendering of a [`MatrixFigure`].
//!
//! Layout: heatmap cells span `score ± 0.5` on both axes, markers are drawn
//! after the cells so they sit on top, labels sit just above each marker.

use std::fmt::Write as _;

use s1s2_core::matrix::{Axis, MatrixFigure};

use super::escape;

const WIDTH: f64 = 760.0;
const HEIGHT: f64 = 540.0;
const MARGIN_LEFT: f64 = 120.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 80.0;

/// Maps data coordinates to pixels.
struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn for_figure(figure: &MatrixFigure) -> Self {
        let max = |values: &[u8]| values.iter().copied().max().map_or(1.0, f64::from);
        Self {
            x_min: 0.5,
            x_max: max(&figure.heatmap.x) + 0.5,
            y_min: 0.5,
            y_max: max(&figure.heatmap.y) + 0.5,
        }
    }

    fn px(&self, x: f64) -> f64 {
        let plot = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        MARGIN_LEFT + (x - self.x_min) / (self.x_max - self.x_min) * plot
    }

    fn py(&self, y: f64) -> f64 {
        let plot = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        HEIGHT - MARGIN_BOTTOM - (y - self.y_min) / (self.y_max - self.y_min) * plot
    }
}

/// Render the whole figure as a standalone `<svg>` element.
pub fn render(figure: &MatrixFigure) -> String {
    let frame = Frame::for_figure(figure);
    let mut out = String::with_capacity(8 * 1024);

    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="matrix" viewBox="0 0 {WIDTH} {HEIGHT}" width="{WIDTH}" height="{HEIGHT}" role="img" aria-label="{title}">"#,
        title = escape(&figure.title),
    );
    let _ = write!(
        out,
        r#"<text class="title" x="{x}" y="32" text-anchor="middle" font-size="20">{title}</text>"#,
        x = WIDTH / 2.0,
        title = escape(&figure.title),
    );

    out.push_str(r#"<g class="heatmap">"#);
    for (row, weights) in figure.heatmap.z.iter().enumerate() {
        let Some(y) = figure.heatmap.y.get(row) else {
            continue;
        };
        for (col, weight) in weights.iter().enumerate() {
            let Some(x) = figure.heatmap.x.get(col) else {
                continue;
            };
            let (x, y) = (f64::from(*x), f64::from(*y));
            let left = frame.px(x - 0.5);
            let top = frame.py(y + 0.5);
            let _ = write!(
                out,
                r#"<rect x="{left:.1}" y="{top:.1}" width="{w:.1}" height="{h:.1}" fill="{fill}" data-weight="{weight}"/>"#,
                w = frame.px(x + 0.5) - left,
                h = frame.py(y - 0.5) - top,
                fill = figure.heatmap.color_for(*weight).css(),
            );
        }
    }
    out.push_str("</g>");

    render_x_axis(&mut out, &frame, &figure.x_axis);
    render_y_axis(&mut out, &frame, &figure.y_axis);

    let radius = f64::from(figure.marker_style.size) / 2.0;
    out.push_str(r#"<g class="markers">"#);
    for marker in &figure.markers {
        let cx = frame.px(f64::from(marker.x));
        let cy = frame.py(f64::from(marker.y));
        let _ = write!(
            out,
            r#"<g class="marker" data-x="{x}" data-y="{y}"><circle cx="{cx:.1}" cy="{cy:.1}" r="{radius}" fill="{color}"/><text x="{cx:.1}" y="{ty:.1}" text-anchor="middle" font-size="12">{label}</text></g>"#,
            x = marker.x,
            y = marker.y,
            color = escape(&figure.marker_style.color),
            ty = cy - radius - 4.0,
            label = escape(&marker.label),
        );
    }
    out.push_str("</g></svg>");
    out
}

fn render_x_axis(out: &mut String, frame: &Frame, axis: &Axis) {
    let baseline = HEIGHT - MARGIN_BOTTOM;
    out.push_str(r#"<g class="x-axis">"#);
    for tick in &axis.ticks {
        let _ = write!(
            out,
            r#"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" font-size="13">{label}</text>"#,
            x = frame.px(f64::from(tick.value)),
            y = baseline + 20.0,
            label = escape(&tick.label),
        );
    }
    let _ = write!(
        out,
        r#"<text class="axis-title" x="{x:.1}" y="{y:.1}" text-anchor="middle" font-size="14">{title}</text></g>"#,
        x = (MARGIN_LEFT + WIDTH - MARGIN_RIGHT) / 2.0,
        y = HEIGHT - 24.0,
        title = escape(&axis.title),
    );
}

fn render_y_axis(out: &mut String, frame: &Frame, axis: &Axis) {
    out.push_str(r#"<g class="y-axis">"#);
    for tick in &axis.ticks {
        let _ = write!(
            out,
            r#"<text x="{x:.1}" y="{y:.1}" text-anchor="end" dominant-baseline="middle" font-size="13">{label}</text>"#,
            x = MARGIN_LEFT - 8.0,
            y = frame.py(f64::from(tick.value)),
            label = escape(&tick.label),
        );
    }
    let cy = (MARGIN_TOP + HEIGHT - MARGIN_BOTTOM) / 2.0;
    let _ = write!(
        out,
        r#"<text class="axis-title" x="20" y="{cy:.1}" transform="rotate(-90 20 {cy:.1})" text-anchor="middle" font-size="14">{title}</text></g>"#,
        title = escape(&axis.title),
    );
}
