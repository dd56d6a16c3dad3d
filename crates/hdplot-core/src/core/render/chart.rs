use super::ChartRenderer;
use super::figure::{Figure, ImageFormat, Panel, PanelRow};
use super::style::{LegendPosition, StyleConfig};
use crate::core::stats::BoxStats;
use crate::engine::error::EngineError;
use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Share of a category slot covered by its boxes.
const CATEGORY_WIDTH: f64 = 0.8;
/// Share of a dodge slot covered by one box.
const BOX_FILL: f64 = 0.8;
const JITTER_FRACTION: f64 = 0.2;
const VALUE_PADDING: f64 = 0.05;
const ENERGETICS_SHARE: u32 = 3;
const PANEL_SHARES: u32 = 4;
const POINTS_PER_INCH: f64 = 72.0;

trait OrRender<T> {
    fn or_render(self, path: &Path) -> Result<T, EngineError>;
}

impl<T, E: fmt::Display> OrRender<T> for Result<T, E> {
    fn or_render(self, path: &Path) -> Result<T, EngineError> {
        self.map_err(|e| EngineError::Render {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Renders figures with `plotters`: PNG through the bitmap backend, SVG through the SVG backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlottersRenderer;

impl PlottersRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, figure: &Figure, style: &StyleConfig) -> Result<(), EngineError> {
        let size = figure.pixel_size();
        debug!(
            path = %figure.output.display(),
            width = size.0,
            height = size.1,
            "Rendering figure."
        );
        if let Some(dir) = figure.output.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| EngineError::file_access(dir, e))?;
        }
        match figure.format {
            ImageFormat::Png => {
                let root = BitMapBackend::new(&figure.output, size).into_drawing_area();
                draw_figure(&root, figure, style)
            }
            ImageFormat::Svg => {
                let root = SVGBackend::new(&figure.output, size).into_drawing_area();
                draw_figure(&root, figure, style)
            }
        }
    }
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    style: &StyleConfig,
) -> Result<(), EngineError> {
    let out = figure.output.as_path();
    root.fill(&WHITE).or_render(out)?;

    let colors = style.palette().colors(figure.group_count.max(1));
    let mut rng = StdRng::seed_from_u64(style.jitter_seed);
    let marker_radius = marker_radius(style.point_size, figure.dpi);

    let areas = root.split_evenly((figure.rows.len().max(1), 1));
    for (row, area) in figure.rows.iter().zip(&areas) {
        let (width, _) = area.dim_in_pixel();
        let split = (width * ENERGETICS_SHARE / PANEL_SHARES) as i32;
        let (left, right) = area.split_horizontally(split);

        let ctx = PanelContext {
            out,
            style,
            colors: &colors,
            marker_radius,
        };
        ctx.draw_panel(&left, &row.energetics, Some(row), &mut rng)?;
        ctx.draw_panel(&right, &row.surface, None, &mut rng)?;
    }

    root.present().or_render(out)
}

struct PanelContext<'a> {
    out: &'a Path,
    style: &'a StyleConfig,
    colors: &'a [RGBColor],
    marker_radius: i32,
}

impl PanelContext<'_> {
    fn color(&self, group: usize) -> RGBColor {
        self.colors
            .get(group % self.colors.len().max(1))
            .copied()
            .unwrap_or(BLACK)
    }

    fn draw_panel<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        panel: &Panel,
        legend_row: Option<&PanelRow>,
        rng: &mut StdRng,
    ) -> Result<(), EngineError> {
        let out = self.out;
        let font = (self.style.font_family.as_str(), self.style.font_size).into_font();
        let n_categories = panel.categories.len().max(1);
        let (y_min, y_max) = padded_range(panel.value_range());

        let mut chart = ChartBuilder::on(area)
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..(n_categories as f64 - 0.5), y_min..y_max)
            .or_render(out)?;

        let ticks: Vec<&str> = panel.categories.iter().map(|c| c.tick.as_str()).collect();
        let tick_formatter = |x: &f64| category_tick(*x, &ticks);
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n_categories)
            .x_label_formatter(&tick_formatter)
            .y_desc(panel.y_label.as_str())
            .label_style(font.clone())
            .axis_desc_style(font.clone())
            .draw()
            .or_render(out)?;

        let groups = panel.group_count();
        let slot = slot_width(groups, self.style.dodge);
        let box_width = slot * BOX_FILL;
        let half_jitter = if self.style.jitter {
            slot * JITTER_FRACTION
        } else {
            0.0
        };

        for (c, category) in panel.categories.iter().enumerate() {
            for (pos, series) in category.series.iter().enumerate() {
                if let Some(stats) = &series.stats {
                    let x = slot_center(c, pos, groups, self.style.dodge);
                    self.draw_box(&mut chart, x, box_width, stats)?;
                    if self.style.show_fliers {
                        let fliers: Vec<_> = stats
                            .outliers(&series.values)
                            .map(|v| Circle::new((x, v), self.marker_radius, BLACK.stroke_width(1)))
                            .collect();
                        chart.draw_series(fliers).or_render(out)?;
                    }
                }
            }
        }

        // Points are drawn per group so each group is one legend series.
        let mut labelled = false;
        for pos in 0..groups {
            let group = panel
                .categories
                .iter()
                .find_map(|c| c.series.get(pos).map(|s| s.group))
                .unwrap_or(pos);
            let color = self.color(group);
            let mut points = Vec::new();
            for (c, category) in panel.categories.iter().enumerate() {
                let Some(series) = category.series.get(pos) else {
                    continue;
                };
                let x = slot_center(c, pos, groups, self.style.dodge);
                for &value in series.values.iter().filter(|v| v.is_finite()) {
                    let jitter = if half_jitter > 0.0 {
                        rng.gen_range(-half_jitter..=half_jitter)
                    } else {
                        0.0
                    };
                    points.push(Circle::new(
                        (x + jitter, value),
                        self.marker_radius,
                        color.mix(self.style.point_alpha).filled(),
                    ));
                }
            }

            let anno = chart.draw_series(points).or_render(out)?;
            if let Some(row) = legend_row {
                if let Some(entry) = row.legend.iter().find(|e| e.group == group) {
                    anno.label(entry.label.clone()).legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                    });
                    labelled = true;
                }
            }
        }

        if labelled {
            let (background, border) = if self.style.legend_frame {
                (WHITE.mix(0.8), BLACK.mix(1.0))
            } else {
                (WHITE.mix(0.0), BLACK.mix(0.0))
            };
            chart
                .configure_series_labels()
                .position(series_label_position(self.style.legend_position))
                .background_style(background.filled())
                .border_style(border.stroke_width(1))
                .label_font(font)
                .draw()
                .or_render(out)?;
        }

        Ok(())
    }

    fn draw_box<DB: DrawingBackend>(
        &self,
        chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        x: f64,
        width: f64,
        stats: &BoxStats,
    ) -> Result<(), EngineError> {
        let out = self.out;
        let outline = box_outline(x, width, stats, self.style.notch);
        let half = width / 2.0;

        chart
            .draw_series(std::iter::once(Polygon::new(
                outline.clone(),
                self.style.box_color.filled(),
            )))
            .or_render(out)?;

        let mut closed = outline;
        if let Some(first) = closed.first().copied() {
            closed.push(first);
        }
        let median_half = if self.style.notch { half / 2.0 } else { half };
        let cap = half / 2.0;
        let lines = vec![
            closed,
            vec![(x - median_half, stats.median), (x + median_half, stats.median)],
            vec![(x, stats.q1), (x, stats.whisker_low)],
            vec![(x, stats.q3), (x, stats.whisker_high)],
            vec![(x - cap, stats.whisker_low), (x + cap, stats.whisker_low)],
            vec![(x - cap, stats.whisker_high), (x + cap, stats.whisker_high)],
        ];
        chart
            .draw_series(
                lines
                    .into_iter()
                    .map(|points| PathElement::new(points, BLACK.stroke_width(1))),
            )
            .or_render(out)?;
        Ok(())
    }
}

fn series_label_position(position: LegendPosition) -> SeriesLabelPosition {
    match position {
        LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
        LegendPosition::LowerLeft => SeriesLabelPosition::LowerLeft,
        LegendPosition::LowerRight => SeriesLabelPosition::LowerRight,
    }
}

/// Marker radius in pixels for a diameter given in points.
fn marker_radius(point_size: f64, dpi: u32) -> i32 {
    (point_size * dpi as f64 / POINTS_PER_INCH / 2.0)
        .round()
        .max(1.0) as i32
}

fn slot_width(groups: usize, dodge: bool) -> f64 {
    if dodge && groups > 1 {
        CATEGORY_WIDTH / groups as f64
    } else {
        CATEGORY_WIDTH
    }
}

/// x coordinate of the box of the `pos`-th group in category `category`.
fn slot_center(category: usize, pos: usize, groups: usize, dodge: bool) -> f64 {
    let center = category as f64;
    if !dodge || groups <= 1 {
        return center;
    }
    let slot = slot_width(groups, dodge);
    center - CATEGORY_WIDTH / 2.0 + slot * (pos as f64 + 0.5)
}

fn padded_range(range: Option<(f64, f64)>) -> (f64, f64) {
    match range {
        None => (0.0, 1.0),
        Some((lo, hi)) if lo == hi => (lo - 1.0, hi + 1.0),
        Some((lo, hi)) => {
            let pad = (hi - lo) * VALUE_PADDING;
            (lo - pad, hi + pad)
        }
    }
}

fn category_tick(x: f64, ticks: &[&str]) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    ticks
        .get(nearest as usize)
        .map(|t| t.to_string())
        .unwrap_or_default()
}

/// Outline of a box, with the sides pinched to the median between the notch limits.
fn box_outline(x: f64, width: f64, stats: &BoxStats, notch: bool) -> Vec<(f64, f64)> {
    let (l, r) = (x - width / 2.0, x + width / 2.0);
    if !notch {
        return vec![(l, stats.q1), (l, stats.q3), (r, stats.q3), (r, stats.q1)];
    }
    let (nl, nr) = (x - width / 4.0, x + width / 4.0);
    let notch_low = stats.notch_low.max(stats.q1);
    let notch_high = stats.notch_high.min(stats.q3);
    vec![
        (l, stats.q1),
        (l, notch_low),
        (nl, stats.median),
        (l, notch_high),
        (l, stats.q3),
        (r, stats.q3),
        (r, notch_high),
        (nr, stats.median),
        (r, notch_low),
        (r, stats.q1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn dodged_slots_are_centered_on_the_category() {
        let xs: Vec<f64> = (0..4).map(|p| slot_center(2, p, 4, true)).collect();
        assert!((xs[0] - 1.7).abs() < EPS);
        assert!((xs[3] - 2.3).abs() < EPS);
        let mean = xs.iter().sum::<f64>() / 4.0;
        assert!((mean - 2.0).abs() < EPS);
        assert!((slot_width(4, true) - 0.2).abs() < EPS);
    }

    #[test]
    fn undodged_groups_share_the_category_center() {
        assert_eq!(slot_center(1, 3, 4, false), 1.0);
        assert_eq!(slot_center(1, 0, 1, true), 1.0);
        assert_eq!(slot_width(4, false), CATEGORY_WIDTH);
    }

    #[test]
    fn padded_range_handles_degenerate_input() {
        assert_eq!(padded_range(None), (0.0, 1.0));
        assert_eq!(padded_range(Some((3.0, 3.0))), (2.0, 4.0));
        let (lo, hi) = padded_range(Some((0.0, 10.0)));
        assert!((lo + 0.5).abs() < EPS && (hi - 10.5).abs() < EPS);
    }

    #[test]
    fn ticks_only_on_category_positions() {
        let ticks = ["VdW", "ES", "DS"];
        assert_eq!(category_tick(0.0, &ticks), "VdW");
        assert_eq!(category_tick(2.0, &ticks), "DS");
        assert_eq!(category_tick(0.5, &ticks), "");
        assert_eq!(category_tick(-1.0, &ticks), "");
        assert_eq!(category_tick(3.0, &ticks), "");
    }

    #[test]
    fn marker_radius_follows_dpi() {
        assert_eq!(marker_radius(4.0, 72), 2);
        assert_eq!(marker_radius(4.0, 144), 4);
        assert_eq!(marker_radius(0.1, 72), 1);
    }

    #[test]
    fn notched_outline_pinches_at_the_median() {
        let stats = BoxStats::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]).unwrap();
        let outline = box_outline(0.0, 0.4, &stats, true);
        assert_eq!(outline.len(), 10);
        assert_eq!(outline[2], (-0.1, stats.median));
        assert_eq!(outline[7], (0.1, stats.median));
        assert!(outline.iter().all(|(_, y)| *y >= stats.q1 && *y <= stats.q3));
        assert_eq!(box_outline(0.0, 0.4, &stats, false).len(), 4);
    }
}
