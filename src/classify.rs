//! Benchmark name classification.
//!
//! Names are matched against an ordered list of naming grammars. The first
//! rule whose pattern covers the whole name wins.

use regex::{Captures, Regex};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

static TYPED_RE: OnceLock<Regex> = OnceLock::new();
static THREADED_RE: OnceLock<Regex> = OnceLock::new();

fn typed_regex() -> &'static Regex {
    TYPED_RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z_0-9:]+)<([A-Za-z_0-9:]+)>/(\d+)_(mean|stddev)$")
            .expect("valid typed benchmark regex")
    })
}

fn threaded_regex() -> &'static Regex {
    THREADED_RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z_0-9:]+)/threads:(\d+)$").expect("valid threaded benchmark regex")
    })
}

/// Which naming grammar produced a function's data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// `func<Type>/size_mean` style names
    Vectorization,
    /// `func/threads:N` style names
    Threading,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Category::Vectorization => "Vectorization",
            Category::Threading => "Threading",
        }
    }

    /// Suffix of emitted files, without extension
    pub fn file_tag(&self) -> &'static str {
        match self {
            Category::Vectorization => "vec",
            Category::Threading => "thread",
        }
    }

    /// Whether this grammar can carry stddev records
    pub fn has_bands(&self) -> bool {
        matches!(self, Category::Vectorization)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Aggregate statistic a record holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    Mean,
    Stddev,
}

/// Structured key extracted from a benchmark name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub function: String,
    /// Template argument; `None` for thread-count benchmarks
    pub variant: Option<String>,
    pub axis_value: u64,
}

/// A successfully classified benchmark name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedName {
    Typed {
        function: String,
        variant: String,
        size: u64,
        statistic: Statistic,
    },
    Threaded {
        function: String,
        threads: u64,
    },
}

impl ClassifiedName {
    pub fn category(&self) -> Category {
        match self {
            ClassifiedName::Typed { .. } => Category::Vectorization,
            ClassifiedName::Threaded { .. } => Category::Threading,
        }
    }

    pub fn statistic(&self) -> Statistic {
        match self {
            ClassifiedName::Typed { statistic, .. } => *statistic,
            ClassifiedName::Threaded { .. } => Statistic::Mean,
        }
    }

    pub fn key(&self) -> SeriesKey {
        match self {
            ClassifiedName::Typed {
                function,
                variant,
                size,
                ..
            } => SeriesKey {
                function: function.clone(),
                variant: Some(variant.clone()),
                axis_value: *size,
            },
            ClassifiedName::Threaded { function, threads } => SeriesKey {
                function: function.clone(),
                variant: None,
                axis_value: *threads,
            },
        }
    }
}

/// Why a benchmark record was left out
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("couldn't match benchmark name {name:?}")]
    Unrecognized { name: String },

    #[error("malformed benchmark name {name:?}: {reason}")]
    Malformed { name: String, reason: String },
}

impl SkipReason {
    pub fn name(&self) -> &str {
        match self {
            SkipReason::Unrecognized { name } | SkipReason::Malformed { name, .. } => name,
        }
    }
}

type Rule = fn(&str) -> Result<Option<ClassifiedName>, SkipReason>;

/// Grammars in priority order
const RULES: &[Rule] = &[match_typed, match_threaded];

/// Classify a benchmark name against the known grammars
pub fn classify(name: &str) -> Result<ClassifiedName, SkipReason> {
    for rule in RULES {
        if let Some(classified) = rule(name)? {
            return Ok(classified);
        }
    }
    Err(SkipReason::Unrecognized {
        name: name.to_string(),
    })
}

fn match_typed(name: &str) -> Result<Option<ClassifiedName>, SkipReason> {
    let Some(caps) = typed_regex().captures(name) else {
        return Ok(None);
    };

    let function = group(&caps, 1, name)?;
    let variant = group(&caps, 2, name)?;
    let size = parse_axis(group(&caps, 3, name)?, name)?;
    let statistic = match group(&caps, 4, name)? {
        "mean" => Statistic::Mean,
        "stddev" => Statistic::Stddev,
        other => {
            return Err(SkipReason::Malformed {
                name: name.to_string(),
                reason: format!("unknown statistic suffix {other:?}"),
            })
        }
    };

    Ok(Some(ClassifiedName::Typed {
        function: function.to_string(),
        variant: variant.to_string(),
        size,
        statistic,
    }))
}

fn match_threaded(name: &str) -> Result<Option<ClassifiedName>, SkipReason> {
    let Some(caps) = threaded_regex().captures(name) else {
        return Ok(None);
    };

    let function = group(&caps, 1, name)?;
    let threads = parse_axis(group(&caps, 2, name)?, name)?;

    Ok(Some(ClassifiedName::Threaded {
        function: function.to_string(),
        threads,
    }))
}

fn group<'h>(caps: &Captures<'h>, index: usize, name: &str) -> Result<&'h str, SkipReason> {
    caps.get(index)
        .map(|m| m.as_str())
        .ok_or_else(|| SkipReason::Malformed {
            name: name.to_string(),
            reason: format!("missing capture group {index}"),
        })
}

fn parse_axis(digits: &str, name: &str) -> Result<u64, SkipReason> {
    digits.parse().map_err(|err| SkipReason::Malformed {
        name: name.to_string(),
        reason: format!("axis value {digits:?} out of range: {err}"),
    })
}
