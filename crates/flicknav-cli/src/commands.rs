//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use flicknav::perf::{DEFAULT_SCENE_BINARY, FRAME_COUNT};
use flicknav::Direction;
use std::path::PathBuf;

/// Flicknav: swipe elements of flickable views into sight
#[derive(Parser, Debug)]
#[command(name = "flicknav")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Write logs to stderr as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare a performance counter across scenes
    ///
    /// Runs the scene binary once per file with performance logging enabled
    /// and summarizes the chosen counter over the logged frames.
    ComparePerf(ComparePerfArgs),

    /// Click an element of a simulated virtualized list
    Simulate(SimulateArgs),
}

/// Arguments for the compare-perf command
#[derive(Parser, Debug)]
pub struct ComparePerfArgs {
    /// Counter to compare: frameCount, syncTime, renderTime, gpuRenderTime,
    /// cpuUsage, vszMemory or rssMemory
    pub counter: String,

    /// Scene files to run
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Scene binary to spawn
    #[arg(long, default_value = DEFAULT_SCENE_BINARY)]
    pub scene_binary: String,

    /// Frames to render per scene
    #[arg(long, default_value_t = FRAME_COUNT)]
    pub frames: usize,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

/// Arguments for the simulate command
#[derive(Parser, Debug)]
pub struct SimulateArgs {
    /// `objectName` of the element to click
    #[arg(long)]
    pub target: String,

    /// Number of rows in the list
    #[arg(long, default_value = "20")]
    pub items: usize,

    /// Rows that fit in the view
    #[arg(long, default_value = "4")]
    pub visible: usize,

    /// Row height in pixels
    #[arg(long, default_value = "50")]
    pub item_height: i32,

    /// Pixels around the view in which rows stay instantiated
    #[arg(long, default_value = "0")]
    pub cache_buffer: i32,

    /// Content offset to start from; `end` scrolls to the bottom
    #[arg(long, default_value = "0")]
    pub start: StartPosition,

    /// Where the target is relative to the view, if known
    #[arg(long, value_enum)]
    pub direction: Option<DirectionArg>,

    /// Navigator configuration (YAML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

/// Initial scroll position of a simulated list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartPosition {
    /// Content offset in pixels
    Offset(i32),
    /// Bottom of the content
    End,
}

impl std::str::FromStr for StartPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "end" {
            return Ok(Self::End);
        }
        s.parse()
            .map(Self::Offset)
            .map_err(|_| format!("expected a pixel offset or 'end', got '{s}'"))
    }
}

/// Report output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Direction argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectionArg {
    /// Above the view
    Above,
    /// Below the view
    Below,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Above => Self::Above,
            DirectionArg::Below => Self::Below,
        }
    }
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
