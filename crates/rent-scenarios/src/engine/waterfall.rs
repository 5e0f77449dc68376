use super::aggregator::calculate_scenario_results;
use super::domain::{
    EngineError, Floorplan, ScenarioAdjustments, WaterfallStep, WaterfallStepKind,
};

/// One scenario's adjustments paired with the floorplan inventory they were
/// (or will be) calculated against. Both sides of a waterfall comparison
/// must reference the same inventory snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioSnapshot<'a> {
    pub floorplans: &'a [Floorplan],
    pub adjustments: &'a ScenarioAdjustments,
}

pub const BASELINE_LABEL: &str = "Baseline";
pub const BASE_RENT_LABEL: &str = "Base Rent Adjustment";
pub const AMENITY_RENT_LABEL: &str = "Amenity Rent Adjustment";
pub const CONCESSION_LABEL: &str = "Concessions";
pub const INTERACTION_LABEL: &str = "Interaction";
pub const FINAL_LABEL: &str = "Final";

/// Builds the ordered revenue bridge from a baseline scenario to a target
/// scenario over one shared floorplan inventory.
///
/// Attribution rule: each driver's delta is its marginal effect measured in
/// isolation against the baseline (only that driver's target parameters
/// applied, everything else held at baseline). Whatever the isolated
/// marginals do not explain lands in an explicit `Interaction` step, so
/// baseline + all deltas reconciles to the target total exactly. The step
/// sequence and labels are fixed; repeated calls on the same inputs produce
/// the same steps.
pub fn build_waterfall(
    baseline: &ScenarioSnapshot<'_>,
    target: &ScenarioSnapshot<'_>,
) -> Result<Vec<WaterfallStep>, EngineError> {
    if baseline.floorplans != target.floorplans {
        return Err(EngineError::MismatchedInventory);
    }
    let floorplans = baseline.floorplans;

    let baseline_total =
        calculate_scenario_results(floorplans, baseline.adjustments)?.total_annual_revenue;
    let target_total =
        calculate_scenario_results(floorplans, target.adjustments)?.total_annual_revenue;

    let base_rent_only = ScenarioAdjustments {
        base_rent_pct_adj: target.adjustments.base_rent_pct_adj,
        base_rent_dollar_adj: target.adjustments.base_rent_dollar_adj,
        ..*baseline.adjustments
    };
    let base_rent_effect =
        calculate_scenario_results(floorplans, &base_rent_only)?.total_annual_revenue
            - baseline_total;

    let amenity_rent_only = ScenarioAdjustments {
        amenity_rent_pct_adj: target.adjustments.amenity_rent_pct_adj,
        amenity_rent_dollar_adj: target.adjustments.amenity_rent_dollar_adj,
        ..*baseline.adjustments
    };
    let amenity_rent_effect =
        calculate_scenario_results(floorplans, &amenity_rent_only)?.total_annual_revenue
            - baseline_total;

    let concession_only = ScenarioAdjustments {
        concession_type: target.adjustments.concession_type,
        concession_value: target.adjustments.concession_value,
        ..*baseline.adjustments
    };
    let concession_effect =
        calculate_scenario_results(floorplans, &concession_only)?.total_annual_revenue
            - baseline_total;

    // Residual computed as a difference, so the steps reconcile exactly.
    let interaction = (target_total - baseline_total)
        - (base_rent_effect + amenity_rent_effect + concession_effect);

    Ok(vec![
        WaterfallStep {
            label: BASELINE_LABEL,
            value: baseline_total,
            kind: WaterfallStepKind::Base,
        },
        WaterfallStep {
            label: BASE_RENT_LABEL,
            value: base_rent_effect,
            kind: WaterfallStepKind::Delta,
        },
        WaterfallStep {
            label: AMENITY_RENT_LABEL,
            value: amenity_rent_effect,
            kind: WaterfallStepKind::Delta,
        },
        WaterfallStep {
            label: CONCESSION_LABEL,
            value: concession_effect,
            kind: WaterfallStepKind::Delta,
        },
        WaterfallStep {
            label: INTERACTION_LABEL,
            value: interaction,
            kind: WaterfallStepKind::Delta,
        },
        WaterfallStep {
            label: FINAL_LABEL,
            value: target_total,
            kind: WaterfallStepKind::Final,
        },
    ])
}
