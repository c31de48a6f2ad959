//! Render the daily-new series to an **SVG** or **PNG** file.
//!
//! The chart is a filled area with a solid outline in the metric's colour,
//! plus a zero baseline. It carries no text so no font has to be available
//! at render time.

use crate::models::Metric;
use crate::present::{GraphPoint, metric_style};
use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;

/// Draw `points` to `out_path`; `.svg` selects the SVG backend, anything else PNG.
pub fn plot_daily<P: AsRef<Path>>(
    points: &[GraphPoint],
    metric: Metric,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    if points.is_empty() {
        return Err(anyhow!("no data to plot"));
    }

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();

    let series: Vec<(i32, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as i32, p.value as f64))
        .collect();

    let max_x = (series.len() as i32 - 1).max(1);
    let (mut min_val, mut max_val) = (
        series.iter().map(|(_, v)| *v).fold(0.0, f64::min),
        series.iter().map(|(_, v)| *v).fold(0.0, f64::max),
    );
    if (max_val - min_val).abs() < f64::EPSILON {
        min_val -= 1.0;
        max_val += 1.0;
    }

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, &series, metric, max_x, min_val, max_val)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, &series, metric, max_x, min_val, max_val)?;
    }

    Ok(())
}

/// Helper that draws to any Plotters backend.
fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    series: &[(i32, f64)],
    metric: Metric,
    max_x: i32,
    min_val: f64,
    max_val: f64,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(0..max_x, min_val..max_val)
        .map_err(|e| anyhow!("{:?}", e))?;

    let (r, g, b) = metric_style(metric).rgb;
    let color = RGBColor(r, g, b);

    chart
        .draw_series(
            AreaSeries::new(series.iter().copied(), 0.0, color.mix(0.5).filled())
                .border_style(color.stroke_width(2)),
        )
        .map_err(|e| anyhow!("{:?}", e))?;

    chart
        .draw_series(LineSeries::new(
            vec![(0, 0.0), (max_x, 0.0)],
            BLACK.mix(0.4).stroke_width(1),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
