use anyhow::Result;
use bench_chart::report::MeasurementKind;
use bench_chart::{run, ChartConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bench-chart")]
#[command(about = "Turn a Google Benchmark JSON report into Highcharts charts, one per function")]
struct Cli {
    /// Benchmark report written with --benchmark_format=json
    input: PathBuf,

    /// Output directory for chart files
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Measurement kinds to chart (real, cpu)
    #[arg(short, long = "kind", value_parser = parse_kind, default_values = ["real", "cpu"])]
    kinds: Vec<MeasurementKind>,

    /// Id of the HTML element the charts render into
    #[arg(long, default_value = "container")]
    container: String,

    /// Also render an SVG preview of each chart
    #[arg(long, default_value = "false")]
    svg: bool,

    /// Enable debug logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

fn parse_kind(label: &str) -> Result<MeasurementKind, String> {
    MeasurementKind::from_label(label)
        .ok_or_else(|| format!("unknown measurement kind {label:?}, expected real or cpu"))
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bench_chart={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut kinds = Vec::new();
    for kind in cli.kinds {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    let config = ChartConfig {
        kinds,
        container: cli.container,
        svg_preview: cli.svg,
    };

    run(&cli.input, &cli.output, &config)?;
    Ok(())
}
