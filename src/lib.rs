pub mod aggregate;
pub mod band;
pub mod chart;
pub mod classify;
pub mod pipeline;
pub mod preview;
pub mod report;

pub use pipeline::{convert, run, ChartConfig, Conversion};
