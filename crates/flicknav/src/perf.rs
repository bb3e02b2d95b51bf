//! Scene performance logs.
//!
//! A scene run with performance logging writes one line per frame holding
//! seven whitespace separated integer counters, in [`Counter::ALL`] order.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::Path;
use std::str::FromStr;

use crate::result::{NavError, NavResult};

/// Frames rendered per measured run
pub const FRAME_COUNT: usize = 100;

/// Scene binary spawned by default
pub const DEFAULT_SCENE_BINARY: &str = "quick-plus-scene";

/// A performance counter column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Counter {
    /// Frames rendered so far
    FrameCount,
    /// Scene graph sync time
    SyncTime,
    /// CPU side render time
    RenderTime,
    /// GPU side render time
    GpuRenderTime,
    /// Process CPU usage
    CpuUsage,
    /// Virtual memory size
    VszMemory,
    /// Resident set size
    RssMemory,
}

impl Counter {
    /// All counters in log column order
    pub const ALL: [Self; 7] = [
        Self::FrameCount,
        Self::SyncTime,
        Self::RenderTime,
        Self::GpuRenderTime,
        Self::CpuUsage,
        Self::VszMemory,
        Self::RssMemory,
    ];

    /// Name used on the command line
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FrameCount => "frameCount",
            Self::SyncTime => "syncTime",
            Self::RenderTime => "renderTime",
            Self::GpuRenderTime => "gpuRenderTime",
            Self::CpuUsage => "cpuUsage",
            Self::VszMemory => "vszMemory",
            Self::RssMemory => "rssMemory",
        }
    }

    /// Scale applied to raw values; times are logged in nanoseconds
    #[must_use]
    pub const fn factor(self) -> f64 {
        match self {
            Self::SyncTime | Self::RenderTime | Self::GpuRenderTime => 0.000_001,
            _ => 1.0,
        }
    }

    /// Human readable label with unit
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FrameCount => "Frame count",
            Self::SyncTime => "Sync time (ms)",
            Self::RenderTime => "Render time (ms)",
            Self::GpuRenderTime => "GPU render time (ms)",
            Self::CpuUsage => "CPU usage (%)",
            Self::VszMemory => "Virtual size memory (kB)",
            Self::RssMemory => "RSS memory (kB)",
        }
    }

    /// Column index in a log line
    #[must_use]
    pub const fn column(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Counter {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|counter| counter.name() == s)
            .ok_or_else(|| NavError::PerfLog {
                message: format!(
                    "unknown counter '{s}', expected one of: {}",
                    Self::ALL.map(Self::name).join(", ")
                ),
            })
    }
}

/// Raw counters of one frame
pub type FrameCounters = [i64; Counter::ALL.len()];

/// Parsed performance log of a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerfLog {
    frame_count: usize,
    frames: Vec<FrameCounters>,
    skipped: usize,
}

impl PerfLog {
    /// Parse at most `frame_count` lines of `text`.
    ///
    /// Only the first seven columns of a line are read. Lines with fewer
    /// columns or a non-integer counter are skipped; a scene that exits
    /// early leaves a truncated last line.
    #[must_use]
    pub fn parse(text: &str, frame_count: usize) -> Self {
        let mut frames = Vec::with_capacity(frame_count);
        let mut skipped = 0;
        for line in text.lines().take(frame_count) {
            match parse_line(line) {
                Some(counters) => frames.push(counters),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::debug!(skipped, "skipped malformed performance log lines");
        }
        Self {
            frame_count,
            frames,
            skipped,
        }
    }

    /// Read and parse a log file
    pub fn from_file(path: impl AsRef<Path>, frame_count: usize) -> NavResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text, frame_count))
    }

    /// Frames requested for the run
    #[must_use]
    pub const fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Well-formed frames
    #[must_use]
    pub fn frames(&self) -> &[FrameCounters] {
        &self.frames
    }

    /// Lines that were skipped
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Whether every requested frame was logged
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.frames.len() == self.frame_count
    }

    /// Scaled values of `counter`, or `None` for an incomplete run
    #[must_use]
    pub fn series(&self, counter: Counter) -> Option<Vec<f64>> {
        self.is_complete().then(|| {
            self.frames
                .iter()
                .map(|frame| frame[counter.column()] as f64 * counter.factor())
                .collect()
        })
    }

    /// Summary of `counter`, or `None` for an incomplete run
    #[must_use]
    pub fn statistics(&self, counter: Counter) -> Option<Statistics> {
        self.series(counter).map(|values| Statistics::from_values(&values))
    }
}

fn parse_line(line: &str) -> Option<FrameCounters> {
    let mut counters = [0; Counter::ALL.len()];
    let mut fields = line.split_whitespace();
    for slot in &mut counters {
        *slot = fields.next()?.parse().ok()?;
    }
    Some(counters)
}

/// Arguments for a scene run logging `frame_count` frames of `scene`
#[must_use]
pub fn scene_args(log_file: &Path, frame_count: usize, scene: &Path) -> Vec<OsString> {
    vec![
        "--performance-logging".into(),
        "--performance-log-file".into(),
        log_file.into(),
        "--continuous-update".into(),
        "--quit-after-frame-count".into(),
        frame_count.to_string().into(),
        scene.into(),
    ]
}

/// Summary statistics of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Mean
    pub mean: f64,
    /// Median value
    pub median: f64,
    /// 95th percentile
    pub p95: f64,
    /// Sample count
    pub count: usize,
}

impl Statistics {
    /// Calculate statistics from a slice of values
    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::empty();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };
        let p95_idx = ((count as f64 * 0.95) as usize).min(count - 1);

        Self {
            min: sorted[0],
            max: sorted[count - 1],
            mean,
            median,
            p95: sorted[p95_idx],
            count,
        }
    }

    /// Statistics of no values
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            mean: 0.0,
            median: 0.0,
            p95: 0.0,
            count: 0,
        }
    }
}
