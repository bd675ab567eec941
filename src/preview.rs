use crate::chart::{Chart, SeriesData, SeriesKind};
use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

// Font sizes
const TITLE_FONT_SIZE: u32 = 40;
const AXIS_LABEL_FONT_SIZE: u32 = 26;
const TICK_LABEL_FONT_SIZE: u32 = 20;
const LEGEND_FONT_SIZE: u32 = 20;

const DEFAULT_MARGIN_BOTTOM: u32 = 55;
const DEFAULT_X_LABEL_AREA_SIZE: u32 = 60;

/// Colors handed out to primary series in order
const COLORS: &[RGBColor] = &[
    RGBColor(66, 133, 244), // Blue
    RGBColor(251, 188, 5),  // Yellow
    RGBColor(52, 168, 83),  // Green
    RGBColor(234, 67, 53),  // Red
    RGBColor(129, 180, 255),
    RGBColor(160, 100, 200),
];

fn series_color(index: usize) -> RGBColor {
    COLORS[index % COLORS.len()]
}

fn format_value(value: f64) -> String {
    if value.abs() >= 100.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Render an SVG next to each chart's `.js` file
pub fn write_previews(charts: &[Chart], output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir).context("Failed to create output directory")?;

    let mut written = Vec::with_capacity(charts.len());
    for chart in charts {
        let path = output_dir.join(format!("{}.svg", chart.file_stem()));
        draw_preview(chart, &path)
            .with_context(|| format!("Failed to render {}", path.display()))?;
        println!("Generated: {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Value range covering every point and band of a chart, padded for labels
fn value_range(chart: &Chart) -> (f64, f64) {
    let mut min = 0.0_f64;
    let mut max = 0.0_f64;
    for series in &chart.document.series {
        match &series.data {
            SeriesData::Values(values) => {
                for &v in values {
                    min = min.min(v);
                    max = max.max(v);
                }
            }
            SeriesData::Ranges(ranges) => {
                for &[low, high] in ranges {
                    min = min.min(low);
                    max = max.max(high);
                }
            }
        }
    }
    if max <= min {
        max = min + 1.0;
    }
    (min, max * 1.1)
}

fn draw_preview(chart: &Chart, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let document = &chart.document;
    let categories = &document.x_axis.categories;
    let num_points = categories.len();
    let axis_index = |axis: u64| {
        categories
            .iter()
            .position(|c| *c == axis.to_string())
            .unwrap_or(0) as f64
    };

    let (min_value, max_value) = value_range(chart);

    let mut plot = ChartBuilder::on(&root)
        .caption(&document.title.text, ("sans-serif", TITLE_FONT_SIZE))
        .margin(20)
        .margin_bottom(DEFAULT_MARGIN_BOTTOM)
        .x_label_area_size(DEFAULT_X_LABEL_AREA_SIZE)
        .y_label_area_size(90)
        .build_cartesian_2d(-0.5..(num_points.max(1) as f64 - 0.5), min_value..max_value)?;

    plot.configure_mesh()
        .disable_x_mesh()
        .x_labels(num_points.max(1))
        .x_label_formatter(&|x| {
            let idx = x.round() as usize;
            if idx < num_points && (x - idx as f64).abs() < 0.3 {
                categories.get(idx).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .y_label_formatter(&|y| format_value(*y))
        .y_desc(document.y_axis.title.text.as_str())
        .x_desc(document.x_axis.title.text.as_str())
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    let lines = document
        .series
        .iter()
        .filter(|s| s.kind == SeriesKind::Line);
    for (idx, series) in lines.enumerate() {
        let SeriesData::Values(values) = &series.data else {
            continue;
        };
        let color = series_color(idx);
        let data: Vec<(f64, f64)> = series
            .axis_values
            .iter()
            .zip(values)
            .map(|(&axis, &v)| (axis_index(axis), v))
            .collect();

        if data.is_empty() {
            continue;
        }

        plot.draw_series(LineSeries::new(data.clone(), color.stroke_width(3)))?
            .label(series.name.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
            });

        plot.draw_series(PointSeries::of_element(
            data,
            5,
            color.filled(),
            &|coord, size, style| EmptyElement::at(coord) + Circle::new((0, 0), size, style),
        ))?;
    }

    // Band series mirror the line series order
    let bands = document
        .series
        .iter()
        .filter(|s| s.kind == SeriesKind::ErrorBand);
    for (idx, series) in bands.enumerate() {
        let SeriesData::Ranges(ranges) = &series.data else {
            continue;
        };
        let color = series_color(idx);
        plot.draw_series(series.axis_values.iter().zip(ranges).map(
            |(&axis, &[low, high])| {
                ErrorBar::new_vertical(
                    axis_index(axis),
                    low,
                    (low + high) / 2.0,
                    high,
                    color.stroke_width(2),
                    12,
                )
            },
        ))?;
    }

    plot.configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", LEGEND_FONT_SIZE))
        .draw()?;

    root.present()?;
    Ok(())
}
