use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Timing dimension a number represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeasurementKind {
    /// Wall-clock time
    Real,
    /// CPU time
    Cpu,
}

impl MeasurementKind {
    pub fn all() -> &'static [MeasurementKind] {
        &[MeasurementKind::Real, MeasurementKind::Cpu]
    }

    pub fn label(&self) -> &'static str {
        match self {
            MeasurementKind::Real => "real",
            MeasurementKind::Cpu => "CPU",
        }
    }

    /// Parse a kind label, case-insensitively
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "real" => Some(MeasurementKind::Real),
            "cpu" => Some(MeasurementKind::Cpu),
            _ => None,
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Timing numbers of a single benchmark entry
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasurementRecord {
    pub real_time: f64,
    pub cpu_time: f64,
}

impl MeasurementRecord {
    pub fn new(real_time: f64, cpu_time: f64) -> Self {
        Self {
            real_time,
            cpu_time,
        }
    }

    pub fn get(&self, kind: MeasurementKind) -> f64 {
        match kind {
            MeasurementKind::Real => self.real_time,
            MeasurementKind::Cpu => self.cpu_time,
        }
    }
}

/// One element of the `benchmarks` array
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    pub name: String,
    pub real_time: f64,
    pub cpu_time: f64,
    /// Unit of `real_time` and `cpu_time`, e.g. "ns"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_unit: Option<String>,
}

impl BenchmarkEntry {
    pub fn record(&self) -> MeasurementRecord {
        MeasurementRecord::new(self.real_time, self.cpu_time)
    }
}

/// A benchmark report as written by `--benchmark_format=json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub benchmarks: Vec<BenchmarkEntry>,
}

impl BenchmarkReport {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse benchmark report")
    }

    /// Read and parse a report file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid report {}", path.display()))
    }
}
