//! Scenario financial model and calculation engine.
//!
//! Pure, deterministic transformations from (floorplan inventory, scenario
//! adjustments) to per-floorplan figures, portfolio-level results, and the
//! waterfall decomposition between two scenarios. The engine does no I/O,
//! holds no state, and is safe to call concurrently; persistence and
//! transport belong to the portfolio store and the API service.

mod aggregator;
mod calculator;
pub mod domain;
pub mod waterfall;

pub use aggregator::calculate_scenario_results;
pub use calculator::calculate_floorplan_figures;
pub use domain::{
    ConcessionType, EngineError, Floorplan, FloorplanFigures, ScenarioAdjustments,
    ScenarioResults, WaterfallStep, WaterfallStepKind,
};
pub use waterfall::{build_waterfall, ScenarioSnapshot};
