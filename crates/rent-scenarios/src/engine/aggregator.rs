use super::calculator::calculate_floorplan_figures;
use super::domain::{EngineError, Floorplan, ScenarioAdjustments, ScenarioResults};

/// Reduces per-floorplan net effective rents into portfolio-level results,
/// weighting by unit count.
///
/// Zero-denominator policy: a property with zero total units (or zero total
/// weighted square footage) reports `avg_rent_per_unit`, `revenue_per_sqft`,
/// and `weighted_avg_rent` as 0.0 rather than propagating NaN or raising.
///
/// `weighted_avg_rent` is intentionally the same computation as
/// `avg_rent_per_unit`: both are the unit-count-weighted mean of net
/// effective rent. They stay separate fields so a future requirement can
/// diverge them without a wire change.
pub fn calculate_scenario_results(
    floorplans: &[Floorplan],
    adjustments: &ScenarioAdjustments,
) -> Result<ScenarioResults, EngineError> {
    let mut weighted_net_rent = 0.0;
    let mut total_units: u64 = 0;
    let mut total_weighted_sqft = 0.0;

    for floorplan in floorplans {
        let figures = calculate_floorplan_figures(floorplan, adjustments)?;
        let units = f64::from(floorplan.unit_count);

        weighted_net_rent += figures.net_effective_rent * units;
        total_weighted_sqft += floorplan.square_footage * units;
        total_units += u64::from(floorplan.unit_count);
    }

    let avg_rent_per_unit = ratio_or_zero(weighted_net_rent, total_units as f64);

    Ok(ScenarioResults {
        total_annual_revenue: weighted_net_rent * 12.0,
        avg_rent_per_unit,
        revenue_per_sqft: ratio_or_zero(weighted_net_rent, total_weighted_sqft),
        weighted_avg_rent: avg_rent_per_unit,
    })
}

fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
