//! Plotters-powered chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`. The same widget backs both the trend view
//! (line series per year) and the scatter view (point series per region).

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// One named series (a year for the trend view, a region for the scatter view).
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub name: String,
    /// Index into the shared palette, so chart colors match legend colors.
    pub color_idx: usize,
    pub data: Vec<(f64, f64)>,
}

/// Shared palette for series colors, mirrored by the legend rendering.
pub const PALETTE: [(u8, u8, u8); 6] = [
    (0, 255, 255), // cyan
    (255, 215, 0), // gold
    (0, 255, 0),   // green
    (255, 105, 180), // pink
    (255, 165, 0), // orange
    (135, 206, 250), // sky blue
];

pub fn palette_color(idx: usize) -> RGBColor {
    let (r, g, b) = PALETTE[idx % PALETTE.len()];
    RGBColor(r, g, b)
}

/// Ratatui color matching [`palette_color`], for legends and labels.
pub fn palette_tui_color(idx: usize) -> Color {
    let (r, g, b) = PALETTE[idx % PALETTE.len()];
    Color::Rgb(r, g, b)
}

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: all series and bounds are computed
/// outside the render call. This keeps `render()` focused on drawing and makes
/// it easy to test/benchmark the data prep separately.
pub struct DashChart<'a> {
    /// Line series (drawn as connected lines).
    pub lines: &'a [ChartSeries],
    /// Point series (drawn as colored pixels).
    pub points: &'a [ChartSeries],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// Axis labels (kept simple for terminal rendering).
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Formatting of tick labels.
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl Widget for DashChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a
        // chart. In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 6 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        //
        // We delegate rendering to the crate-provided widget helper to avoid
        // coupling our code to its internal backend types.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels.
            //
            // We disable the mesh lines to reduce visual clutter in
            // low-resolution terminal rendering.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(6)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for series in self.lines {
                let color = palette_color(series.color_idx);
                chart.draw_series(LineSeries::new(series.data.iter().copied(), &color))?;
                // Mark the observations on top of the line so sparse series
                // stay visible.
                chart.draw_series(
                    series
                        .data
                        .iter()
                        .map(|&(x, y)| Pixel::new((x, y), color)),
                )?;
            }

            // We intentionally avoid `Circle` markers here. The underlying
            // `plotters-ratatui-backend` currently maps circle radii
            // incorrectly (pixel radius -> normalized canvas units),
            // producing huge circles. A colored `Pixel` gives a clean "dot"
            // that looks good in terminals.
            for series in self.points {
                let color = palette_color(series.color_idx);
                chart.draw_series(
                    series
                        .data
                        .iter()
                        .map(|&(x, y)| Pixel::new((x, y), color)),
                )?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
