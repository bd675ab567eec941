use crate::aggregate::{FunctionGroup, FunctionId};
use crate::band::project;
use crate::classify::Category;
use crate::report::MeasurementKind;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Unit shown on the y axis when the report doesn't name one
const DEFAULT_TIME_UNIT: &str = "ms";

const ERROR_BAR_COLOR: &str = "#FF0000";
const ERROR_BAR_STEM_WIDTH: u32 = 3;

/// Highcharts configuration for one benchmarked function
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDocument {
    pub chart: ChartOptions,
    pub title: Text,
    pub x_axis: XAxis,
    pub y_axis: YAxis,
    pub tooltip: Tooltip,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub zoom_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Text {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XAxis {
    pub title: Text,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YAxis {
    pub labels: Labels,
    pub title: Text,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Labels {
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesKind {
    /// Primary mean line
    #[serde(rename = "spline")]
    Line,
    /// Mean +/- stddev range
    #[serde(rename = "errorbar")]
    ErrorBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesData {
    Values(Vec<f64>),
    Ranges(Vec<[f64; 2]>),
}

impl SeriesData {
    pub fn len(&self) -> usize {
        match self {
            SeriesData::Values(v) => v.len(),
            SeriesData::Ranges(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SeriesKind,
    pub data: SeriesData,
    /// Axis value of each data point
    #[serde(skip)]
    pub axis_values: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Tooltip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stem_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whisker_length: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub enabled: bool,
}

/// A built document and the function it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub id: FunctionId,
    pub document: ChartDocument,
}

impl Chart {
    /// `<function>.vec` or `<function>.thread`, without extension
    pub fn file_stem(&self) -> String {
        format!("{}.{}", self.id.function, self.id.category.file_tag())
    }
}

fn series_label(kind: MeasurementKind, variant: Option<&str>, error: bool) -> String {
    let mut label = format!("{} time", kind.label());
    if error {
        label.push_str(" error");
    }
    if let Some(variant) = variant {
        label.push(' ');
        label.push_str(variant);
    }
    label
}

/// Build the chart for one function.
///
/// Primary series come first, grouped by kind then variant, followed by the
/// band series in the same order. Threaded functions get no band series.
pub fn build_chart(id: &FunctionId, group: &FunctionGroup, kinds: &[MeasurementKind]) -> Chart {
    let unit = group.time_unit.as_deref().unwrap_or(DEFAULT_TIME_UNIT);
    let mut primaries = Vec::new();
    let mut bands = Vec::new();

    for &kind in kinds {
        for (variant, series) in &group.variants {
            let projection = project(series, kind);

            primaries.push(ChartSeries {
                name: series_label(kind, variant.as_deref(), false),
                kind: SeriesKind::Line,
                data: SeriesData::Values(projection.primary_values()),
                axis_values: projection.primary.iter().map(|&(axis, _)| axis).collect(),
                marker: Some(Marker { enabled: false }),
                color: None,
                tooltip: None,
                stem_width: None,
                whisker_length: None,
            });

            if group.category.has_bands() {
                bands.push(ChartSeries {
                    name: series_label(kind, variant.as_deref(), true),
                    kind: SeriesKind::ErrorBand,
                    data: SeriesData::Ranges(projection.band_ranges()),
                    axis_values: projection.band.iter().map(|p| p.axis_value).collect(),
                    marker: None,
                    color: Some(ERROR_BAR_COLOR.to_string()),
                    tooltip: Some(Tooltip {
                        shared: None,
                        point_format: Some(format!(
                            "Error range: {{point.low}}-{{point.high}}{unit}"
                        )),
                    }),
                    stem_width: Some(ERROR_BAR_STEM_WIDTH),
                    whisker_length: Some(0),
                });
            }
        }
    }

    let axis_values: BTreeSet<u64> = group
        .variants
        .iter()
        .flat_map(|(_, series)| series.mean_by_axis.keys().copied())
        .collect();

    let axis_title = match id.category {
        Category::Vectorization => "input size",
        Category::Threading => "threads",
    };

    let y_title = kinds
        .iter()
        .map(|k| k.label())
        .collect::<Vec<_>>()
        .join(" / ");

    primaries.extend(bands);

    Chart {
        id: id.clone(),
        document: ChartDocument {
            chart: ChartOptions {
                zoom_type: "x".to_string(),
            },
            title: Text {
                text: format!("{} {}", id.category.name(), id.function),
            },
            x_axis: XAxis {
                title: Text {
                    text: axis_title.to_string(),
                },
                categories: axis_values.iter().map(u64::to_string).collect(),
            },
            y_axis: YAxis {
                labels: Labels {
                    format: format!("{{value}}{unit}"),
                },
                title: Text {
                    text: format!("{y_title} time"),
                },
            },
            tooltip: Tooltip {
                shared: Some(true),
                point_format: None,
            },
            series: primaries,
        },
    }
}

/// Wrap a document in the Highcharts initializer call
pub fn render(document: &ChartDocument, container: &str) -> Result<String> {
    let json = serde_json::to_string_pretty(document).context("Failed to serialize chart")?;
    Ok(format!("Highcharts.chart('{container}', {json});\n"))
}

/// Write one `.js` file per chart into `output_dir`
pub fn write_charts(charts: &[Chart], output_dir: &Path, container: &str) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir).context("Failed to create output directory")?;

    let mut written = Vec::with_capacity(charts.len());
    for chart in charts {
        let path = output_dir.join(format!("{}.js", chart.file_stem()));
        let contents = render(&chart.document, container)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Generated: {}", path.display());
        written.push(path);
    }
    Ok(written)
}
