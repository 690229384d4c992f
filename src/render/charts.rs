//! PNG charts drawn with plotters.

use super::Renderer;
use crate::config::RenderConfig;
use crate::models::EntityId;
use crate::trace::{TraceAggregator, TraceError};
use anyhow::Result;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use tracing::debug;

const BAR_HEIGHT: f64 = 0.6;

/// One bar of the activity timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityBar {
    pub node: EntityId,
    pub start: f64,
    pub end: f64,
}

/// Bars for every node, in ascending id order.
pub fn activity_bars(trace: &TraceAggregator) -> Vec<ActivityBar> {
    trace
        .nodes()
        .map(|(node, record)| ActivityBar {
            node,
            start: record.window.entry_time,
            end: record.window.exit_time,
        })
        .collect()
}

/// `(second, active count)` points of the density chart.
pub fn density_points(trace: &TraceAggregator) -> Result<Vec<(f64, f64)>, TraceError> {
    Ok(trace
        .active_count_series()?
        .into_iter()
        .map(|(second, count)| (second as f64, count as f64))
        .collect())
}

/// Axis range around `[lo, hi]` with a small margin.
///
/// Degenerate spans are widened to one unit on each side.
pub fn padded_range(lo: f64, hi: f64) -> Range<f64> {
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        return (lo - 1.0)..(hi + 1.0);
    }
    let pad = span * 0.05;
    (lo - pad)..(hi + pad)
}

fn draw_error<E: std::fmt::Display>(err: E) -> anyhow::Error {
    anyhow::anyhow!("Failed to draw chart: {}", err)
}

/// Renders both charts as PNG bitmaps.
pub struct PlotRenderer {
    config: RenderConfig,
}

impl PlotRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Density chart title with `{nodes}` substituted.
    pub fn density_title(&self, node_count: usize) -> String {
        self.config
            .density_title
            .replace("{nodes}", &node_count.to_string())
    }

    fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}

impl Renderer for PlotRenderer {
    fn render_activity(&self, trace: &TraceAggregator, out: &Path) -> Result<()> {
        let bars = activity_bars(trace);
        let (first, last) = match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => (first.node, last.node),
            _ => return Err(TraceError::EmptyTrace.into()),
        };
        let end = trace.simulation_time()?;

        let root = BitMapBackend::new(out, self.size()).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.config.activity_title, ("sans-serif", 22))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(
                padded_range(0.0, end),
                (first as f64 - 1.0)..(last as f64 + 1.0),
            )
            .map_err(draw_error)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .light_line_style(BLACK.mix(0.05))
            .bold_line_style(BLACK.mix(0.2))
            .x_desc(self.config.activity_x_label.as_str())
            .y_desc(self.config.activity_y_label.as_str())
            .draw()
            .map_err(draw_error)?;

        chart
            .draw_series(bars.iter().enumerate().map(|(i, bar)| {
                let y = bar.node as f64;
                let color = Palette99::pick(i).filled();
                Rectangle::new(
                    [(bar.start, y - BAR_HEIGHT / 2.0), (bar.end, y + BAR_HEIGHT / 2.0)],
                    color,
                )
            }))
            .map_err(draw_error)?;

        root.present().map_err(draw_error)?;
        debug!("Wrote activity chart {}", out.display());
        Ok(())
    }

    fn render_density(&self, trace: &TraceAggregator, out: &Path) -> Result<()> {
        let points = density_points(trace)?;
        let last_second = points.last().map_or(0.0, |(t, _)| *t);
        let peak = points.iter().map(|(_, c)| *c).fold(0.0, f64::max);

        let root = BitMapBackend::new(out, self.size()).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(self.density_title(trace.node_count()), ("sans-serif", 22))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..last_second.max(1.0), 0.0..(peak + 1.0))
            .map_err(draw_error)?;

        chart
            .configure_mesh()
            .light_line_style(BLACK.mix(0.05))
            .bold_line_style(BLACK.mix(0.2))
            .x_desc(self.config.density_x_label.as_str())
            .y_desc(self.config.density_y_label.as_str())
            .draw()
            .map_err(draw_error)?;

        chart
            .draw_series(LineSeries::new(points, &BLUE))
            .map_err(draw_error)?;

        root.present().map_err(draw_error)?;
        debug!("Wrote density chart {}", out.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> TraceAggregator {
        TraceAggregator::parse_str(
            r#"$ns_ at 1.0 "$node_(4) setdest 5.0 5.0 1.0"
$ns_ at 3.0 "$node_(4) setdest 6.0 5.0 1.0"
$ns_ at 2.0 "$node_(1) setdest 0.0 0.0 1.0"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_activity_bars_sorted_by_node() {
        let bars = activity_bars(&sample());
        assert_eq!(
            bars,
            vec![
                ActivityBar {
                    node: 1,
                    start: 2.0,
                    end: 2.0
                },
                ActivityBar {
                    node: 4,
                    start: 1.0,
                    end: 3.0
                },
            ]
        );
    }

    #[test]
    fn test_density_points() {
        let points = density_points(&sample()).unwrap();
        assert_eq!(points, vec![(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 1.0)]);
    }

    #[test]
    fn test_density_points_empty_trace() {
        let empty = TraceAggregator::default();
        assert!(density_points(&empty).is_err());
        assert!(activity_bars(&empty).is_empty());
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range(2.0, 2.0), 1.0..3.0);
        let range = padded_range(0.0, 100.0);
        assert_eq!(range, -5.0..105.0);
    }

    #[test]
    fn test_density_title_substitution() {
        let renderer = PlotRenderer::new(RenderConfig::default());
        assert_eq!(renderer.density_title(12), "Active nodes per second (12 nodes)");
    }

    #[test]
    fn test_render_refuses_empty_trace() {
        let renderer = PlotRenderer::new(RenderConfig::default());
        let empty = TraceAggregator::default();
        let out = Path::new("unused.png");
        assert!(renderer.render_activity(&empty, out).is_err());
        assert!(renderer.render_density(&empty, out).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_render_writes_both_pngs() {
        let temp_dir = TempDir::new().unwrap();
        let activity = temp_dir.path().join("sample_node_activity.png");
        let density = temp_dir.path().join("sample_network_density.png");

        let renderer = PlotRenderer::new(RenderConfig::default());
        let trace = sample();
        renderer.render_activity(&trace, &activity).unwrap();
        renderer.render_density(&trace, &density).unwrap();

        for path in [&activity, &density] {
            let bytes = std::fs::read(path).unwrap();
            assert!(bytes.starts_with(b"\x89PNG"), "{}", path.display());
        }
    }
}
