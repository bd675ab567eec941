use crate::aggregate::Aggregator;
use crate::chart::{build_chart, write_charts, Chart};
use crate::classify::{classify, SkipReason};
use crate::preview::write_previews;
use crate::report::{BenchmarkReport, MeasurementKind};
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration for a conversion run
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Measurement kinds to chart, in series order
    pub kinds: Vec<MeasurementKind>,
    /// Id of the HTML element passed to `Highcharts.chart`
    pub container: String,
    /// Also render an SVG preview per chart
    pub svg_preview: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            kinds: MeasurementKind::all().to_vec(),
            container: "container".to_string(),
            svg_preview: false,
        }
    }
}

/// Result of converting one report
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    pub charts: Vec<Chart>,
    /// Records left out, in input order
    pub skipped: Vec<SkipReason>,
}

/// Classify, group and project every record of a report
pub fn convert(report: &BenchmarkReport, config: &ChartConfig) -> Conversion {
    let mut aggregator = Aggregator::new();
    let mut skipped = Vec::new();

    for entry in &report.benchmarks {
        match classify(&entry.name) {
            Ok(classified) => {
                let replaced =
                    aggregator.insert(&classified, entry.record(), entry.time_unit.as_deref());
                if replaced {
                    debug!(name = %entry.name, "duplicate benchmark record, keeping the later one");
                }
            }
            Err(reason) => {
                warn!("{reason}");
                skipped.push(reason);
            }
        }
    }

    let charts = aggregator
        .functions()
        .map(|(id, group)| build_chart(id, group, &config.kinds))
        .collect();

    Conversion { charts, skipped }
}

/// Load a report, convert it and write the charts into `output_dir`
pub fn run(input: &Path, output_dir: &Path, config: &ChartConfig) -> Result<Vec<PathBuf>> {
    if config.kinds.is_empty() {
        bail!("At least one measurement kind is required");
    }

    let report = BenchmarkReport::load(input)?;
    info!(
        input = %input.display(),
        records = report.benchmarks.len(),
        "loaded benchmark report"
    );

    let conversion = convert(&report, config);
    if !conversion.skipped.is_empty() {
        warn!(count = conversion.skipped.len(), "skipped unrecognized benchmark records");
    }

    let mut written = write_charts(&conversion.charts, output_dir, &config.container)?;
    if config.svg_preview {
        written.extend(write_previews(&conversion.charts, output_dir)?);
    }

    info!(charts = conversion.charts.len(), "conversion complete");
    Ok(written)
}
