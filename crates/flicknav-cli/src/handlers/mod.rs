//! Command handlers - extracted from main.rs for testability
//!
//! Each handler module contains:
//! - The execution logic for a CLI command
//! - Pure helper functions
//! - Tests

pub mod compare_perf;
pub mod simulate;

pub use compare_perf::{
    execute_compare_perf, parse_counter, run_scene, ComparePerfReport, SceneRun,
};
pub use simulate::{execute_simulate, load_navigator_config, simulate, SimulationReport};
