//! simulate command handler

use flicknav::mock::{MockList, MockListConfig};
use flicknav::{HasBoundaryFlags, ListView, NavigatorConfig, Selector};
use serde::Serialize;
use std::path::Path;

use crate::commands::{ReportFormat, SimulateArgs, StartPosition};
use crate::config::CliConfig;
use crate::output::{render_json, ProgressReporter};
use crate::{CliError, CliResult};

/// Outcome of a simulated click
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// Requested `objectName`
    pub target: String,
    /// Element hit by the click
    pub clicked: Option<String>,
    /// Drags performed
    pub swipes: usize,
    /// Final content offset
    pub content_y: i32,
    /// View at its top boundary
    pub at_top: bool,
    /// View at its bottom boundary
    pub at_bottom: bool,
}

impl SimulationReport {
    /// Render as aligned key/value lines
    #[must_use]
    pub fn render_text(&self) -> String {
        format!(
            "target:    {}\nclicked:   {}\nswipes:    {}\ncontent y: {}\nat top:    {}\nat bottom: {}\n",
            self.target,
            self.clicked.as_deref().unwrap_or("-"),
            self.swipes,
            self.content_y,
            self.at_top,
            self.at_bottom
        )
    }
}

/// Navigator configuration from a YAML file, or a fast-polling default
pub fn load_navigator_config(path: Option<&Path>) -> CliResult<NavigatorConfig> {
    match path {
        Some(path) => NavigatorConfig::from_yaml_file(path)
            .map_err(|e| CliError::config(format!("{}: {e}", path.display()))),
        // The simulated list settles within a few polls.
        None => Ok(NavigatorConfig::default()
            .with_poll_interval(1)
            .with_settle_timeout(1_000)),
    }
}

/// Height in pixels of `rows` rows, rejecting sizes beyond `i32`
fn pixel_extent(rows: usize, item_height: i32, flag: &str) -> CliResult<i32> {
    i32::try_from(rows)
        .ok()
        .and_then(|rows| rows.checked_mul(item_height))
        .ok_or_else(|| {
            CliError::invalid_argument(format!(
                "{flag} {rows} with --item-height {item_height} exceeds {} pixels",
                i32::MAX
            ))
        })
}

/// Build the simulated list and click the target in it
pub fn simulate(args: &SimulateArgs, navigator: NavigatorConfig) -> CliResult<SimulationReport> {
    if args.items == 0 || args.visible == 0 || args.item_height <= 0 {
        return Err(CliError::invalid_argument(
            "--items, --visible and --item-height must be positive",
        ));
    }

    let shape = MockListConfig::default()
        .with_items(args.items)
        .with_visible_items(args.visible)
        .with_item_height(args.item_height)
        .with_cache_buffer(args.cache_buffer);
    pixel_extent(args.items, args.item_height, "--items")?;
    pixel_extent(args.visible, args.item_height, "--visible")?
        .checked_add(shape.header_height)
        .ok_or_else(|| CliError::invalid_argument("--visible rows do not fit in the window"))?;

    let list = MockList::new(shape);
    match args.start {
        StartPosition::Offset(y) => list.scroll_to(y),
        StartPosition::End => list.scroll_to_end(),
    }

    let pointer = list.pointer();
    let helper = ListView::new(&list, &pointer).with_config(navigator)?;
    helper.click_element(
        &Selector::object_name(args.target.as_str()),
        args.direction.map(Into::into),
    )?;

    Ok(SimulationReport {
        target: args.target.clone(),
        clicked: list.last_clicked(),
        swipes: list.drag_count(),
        content_y: list.content_y(),
        at_top: list.at_y_beginning(),
        at_bottom: list.at_y_end(),
    })
}

/// Execute the simulate command
pub fn execute_simulate(config: &CliConfig, args: &SimulateArgs) -> CliResult<()> {
    let navigator = load_navigator_config(args.config.as_deref())?;
    let report = simulate(args, navigator)?;

    let reporter = ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    if report.clicked.as_deref() == Some(args.target.as_str()) {
        reporter.success(&format!("clicked {} after {} swipes", report.target, report.swipes));
    } else {
        reporter.warning(&format!("click on {} missed", report.target));
    }

    match args.format {
        ReportFormat::Text => print!("{}", report.render_text()),
        ReportFormat::Json => println!("{}", render_json(&report)?),
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::commands::{Cli, Commands};
    use clap::Parser;

    fn args(extra: &[&str]) -> SimulateArgs {
        let mut argv = vec!["flicknav", "simulate"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Simulate(args) => args,
            other => panic!("expected Simulate, got {other:?}"),
        }
    }

    fn fast() -> NavigatorConfig {
        load_navigator_config(None).unwrap()
    }

    #[test]
    fn test_click_on_first_page() {
        let report = simulate(&args(&["--target", "item1"]), fast()).unwrap();
        assert_eq!(report.clicked.as_deref(), Some("item1"));
        assert_eq!(report.swipes, 0);
        assert!(report.at_top);
    }

    #[test]
    fn test_click_last_item() {
        let report = simulate(&args(&["--target", "item19"]), fast()).unwrap();
        assert_eq!(report.clicked.as_deref(), Some("item19"));
        assert!(report.swipes > 0);
        assert!(report.at_bottom);
    }

    #[test]
    fn test_click_above_from_end() {
        let report = simulate(
            &args(&["--target", "item2", "--start", "end", "--direction", "above"]),
            fast(),
        )
        .unwrap();
        assert_eq!(report.clicked.as_deref(), Some("item2"));
    }

    #[test]
    fn test_missing_target_fails() {
        let err = simulate(&args(&["--target", "nothing", "--items", "6"]), fast()).unwrap_err();
        assert!(matches!(err, CliError::Nav(ref e) if e.is_not_found()));
    }

    #[test]
    fn test_rejects_empty_list() {
        let err = simulate(&args(&["--target", "item0", "--items", "0"]), fast()).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }));
    }

    #[test]
    fn test_rejects_list_taller_than_pixel_range() {
        let err = simulate(
            &args(&["--target", "item0", "--items", "50000000"]),
            fast(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }));
        assert!(err.to_string().contains("--items 50000000"));

        let err = simulate(
            &args(&["--target", "item0", "--visible", "3000000000"]),
            fast(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }));
    }

    #[test]
    fn test_config_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "poll_interval_ms: 2\nmax_swipes: 3\n").unwrap();
        let config = load_navigator_config(Some(file.path())).unwrap();
        assert_eq!(config.poll_interval_ms, 2);
        assert_eq!(config.max_swipes, 3);

        std::fs::write(file.path(), "drag_rate: 0\n").unwrap();
        assert!(load_navigator_config(Some(file.path())).is_err());
    }

    #[test]
    fn test_render_text() {
        let report = SimulationReport {
            target: "item3".to_string(),
            clicked: None,
            swipes: 2,
            content_y: 380,
            at_top: false,
            at_bottom: false,
        };
        let text = report.render_text();
        assert!(text.contains("clicked:   -"));
        assert!(text.contains("swipes:    2"));
    }
}
