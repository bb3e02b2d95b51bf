//! compare-perf command handler

use flicknav::perf::{scene_args, Counter, PerfLog, Statistics};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use std::process::Command;

use crate::commands::{ComparePerfArgs, ReportFormat};
use crate::config::CliConfig;
use crate::output::{render_json, ProgressReporter};
use crate::{CliError, CliResult};

/// Result of one scene run
#[derive(Debug, Clone, Serialize)]
pub struct SceneRun {
    /// Scene file name
    pub scene: String,
    /// Well-formed frames in the log
    pub frames_logged: usize,
    /// Malformed lines skipped
    pub skipped_lines: usize,
    /// Counter summary; absent when the run logged fewer frames than asked
    pub statistics: Option<Statistics>,
}

/// Comparison of one counter across scene runs
#[derive(Debug, Clone, Serialize)]
pub struct ComparePerfReport {
    /// Compared counter
    pub counter: Counter,
    /// Counter label with unit
    pub label: String,
    /// Frames requested per run
    pub frame_count: usize,
    /// One entry per scene, in command line order
    pub runs: Vec<SceneRun>,
}

impl ComparePerfReport {
    /// Empty report for `counter`
    #[must_use]
    pub fn new(counter: Counter, frame_count: usize) -> Self {
        Self {
            counter,
            label: counter.label().to_string(),
            frame_count,
            runs: Vec::new(),
        }
    }

    /// Add the log of a scene run
    pub fn add_run(&mut self, scene: &str, log: &PerfLog) {
        self.runs.push(SceneRun {
            scene: scene.to_string(),
            frames_logged: log.frames().len(),
            skipped_lines: log.skipped(),
            statistics: log.statistics(self.counter),
        });
    }

    /// Runs that logged every frame
    #[must_use]
    pub fn complete_runs(&self) -> usize {
        self.runs.iter().filter(|run| run.statistics.is_some()).count()
    }

    /// Render as a text table
    #[must_use]
    pub fn render_text(&self) -> String {
        let width = self
            .runs
            .iter()
            .map(|run| run.scene.len())
            .max()
            .unwrap_or(0)
            .max("scene".len());

        let mut out = format!("{} over {} frames\n", self.label, self.frame_count);
        let _ = writeln!(
            out,
            "{:<width$}  {:>12} {:>12} {:>12} {:>12} {:>12}",
            "scene", "min", "max", "mean", "median", "p95"
        );
        for run in &self.runs {
            match run.statistics {
                Some(s) => {
                    let _ = writeln!(
                        out,
                        "{:<width$}  {:>12.3} {:>12.3} {:>12.3} {:>12.3} {:>12.3}",
                        run.scene, s.min, s.max, s.mean, s.median, s.p95
                    );
                }
                None => {
                    let _ = writeln!(
                        out,
                        "{:<width$}  incomplete ({}/{} frames)",
                        run.scene, run.frames_logged, self.frame_count
                    );
                }
            }
        }
        out
    }
}

/// Parse a counter name given on the command line
pub fn parse_counter(name: &str) -> CliResult<Counter> {
    name.parse().map_err(|_| {
        let valid: Vec<_> = Counter::ALL.iter().map(|c| c.name()).collect();
        CliError::invalid_argument(format!(
            "unknown counter '{name}', expected one of: {}",
            valid.join(", ")
        ))
    })
}

/// Run `scene` once with performance logging and parse its log
pub fn run_scene(binary: &str, scene: &Path, frame_count: usize) -> CliResult<PerfLog> {
    let log_file = tempfile::NamedTempFile::new()?;
    let _span = tracing::info_span!("run_scene", scene = %scene.display()).entered();

    let status = Command::new(binary)
        .args(scene_args(log_file.path(), frame_count, scene))
        .status()
        .map_err(|e| CliError::scene_spawn(binary, e.to_string()))?;
    if !status.success() {
        tracing::warn!(%status, "scene exited unsuccessfully");
    }

    let log = PerfLog::from_file(log_file.path(), frame_count)?;
    tracing::info!(
        frames = log.frames().len(),
        skipped = log.skipped(),
        "performance log read"
    );
    Ok(log)
}

fn scene_name(scene: &Path) -> String {
    scene.file_name().map_or_else(
        || scene.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Execute the compare-perf command
pub fn execute_compare_perf(config: &CliConfig, args: &ComparePerfArgs) -> CliResult<()> {
    let counter = parse_counter(&args.counter)?;
    if args.frames == 0 {
        return Err(CliError::invalid_argument("--frames must be positive"));
    }

    let mut reporter =
        ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    reporter.start_progress(args.files.len() as u64, "running scenes");

    let mut report = ComparePerfReport::new(counter, args.frames);
    for file in &args.files {
        let name = scene_name(file);
        reporter.set_message(&name);
        let log = run_scene(&args.scene_binary, file, args.frames)?;
        if !log.is_complete() {
            reporter.warning(&format!(
                "{name}: only {} of {} frames logged, excluded",
                log.frames().len(),
                args.frames
            ));
        }
        report.add_run(&name, &log);
        reporter.increment(1);
    }
    reporter.finish();

    match args.format {
        ReportFormat::Text => print!("{}", report.render_text()),
        ReportFormat::Json => println!("{}", render_json(&report)?),
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn log_text(frames: usize, cpu: usize) -> String {
        (0..frames)
            .map(|i| format!("{i} 1000000 {} 500000 {cpu} 2048 1024\n", (i + 1) * 1_000_000))
            .collect()
    }

    #[test]
    fn test_parse_counter() {
        assert_eq!(parse_counter("gpuRenderTime").unwrap(), Counter::GpuRenderTime);
        let err = parse_counter("fps").unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }));
        assert!(err.to_string().contains("rssMemory"));
    }

    #[test]
    fn test_report_excludes_incomplete_runs() {
        let mut report = ComparePerfReport::new(Counter::CpuUsage, 4);
        report.add_run("a.qml", &PerfLog::parse(&log_text(4, 20), 4));
        report.add_run("b.qml", &PerfLog::parse(&log_text(2, 30), 4));

        assert_eq!(report.complete_runs(), 1);
        assert_eq!(report.runs[0].statistics.unwrap().mean, 20.0);
        assert!(report.runs[1].statistics.is_none());

        let text = report.render_text();
        assert!(text.starts_with("CPU usage (%) over 4 frames"));
        assert!(text.contains("b.qml  incomplete (2/4 frames)"));
    }

    #[test]
    fn test_report_json_shape() {
        let mut report = ComparePerfReport::new(Counter::RenderTime, 3);
        report.add_run("scene.qml", &PerfLog::parse(&log_text(3, 5), 3));
        let json: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();
        assert_eq!(json["counter"], "renderTime");
        assert_eq!(json["runs"][0]["scene"], "scene.qml");
        assert_eq!(json["runs"][0]["statistics"]["count"], 3);
    }

    #[test]
    fn test_scene_name_is_file_name() {
        assert_eq!(scene_name(Path::new("/tmp/scenes/list.qml")), "list.qml");
    }

    #[test]
    fn test_spawn_failure() {
        let err = run_scene("/nonexistent/flicknav-scene", Path::new("a.qml"), 10).unwrap_err();
        assert!(matches!(err, CliError::SceneSpawn { .. }));
    }
}
