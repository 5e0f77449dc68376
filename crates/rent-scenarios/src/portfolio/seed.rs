use super::domain::{
    AnalysisDraft, AnalysisId, FloorplanDetails, FloorplanDraft, PropertyDraft, PropertyId,
    ScenarioDraft, ScenarioId,
};
use super::repository::PortfolioRepository;
use super::service::{ScenarioService, ScenarioServiceError};
use crate::engine::{ConcessionType, Floorplan, ScenarioAdjustments};

/// Ids of the records created by [`seed_sample_portfolio`], so demos and
/// tests can address the sample data directly.
#[derive(Debug, Clone)]
pub struct SeedSummary {
    pub campus_view: PropertyId,
    pub university_heights: PropertyId,
    pub analysis: AnalysisId,
    pub baseline: ScenarioId,
    pub optimistic: ScenarioId,
    pub pessimistic: ScenarioId,
}

/// Seeds the two sample student-housing properties with their floorplan
/// inventories, one leasing analysis, and three scenarios (baseline,
/// +5% optimistic, one-month-free pessimistic).
pub fn seed_sample_portfolio<R>(
    service: &ScenarioService<R>,
) -> Result<SeedSummary, ScenarioServiceError>
where
    R: PortfolioRepository + 'static,
{
    let campus_view = service.create_property(PropertyDraft {
        name: "Campus View Apartments".to_string(),
        address: "123 University Ave, Austin, TX 78705".to_string(),
        total_units: 240,
    })?;

    let campus_view_floorplans = [
        ("A1 - Studio", "Studio", 40, 450.0, "1-4", "Courtyard", 1200.0, 50.0),
        ("B1 - One Bedroom", "1BR", 80, 650.0, "1-6", "Mixed", 1450.0, 75.0),
        ("C1 - Two Bedroom", "2BR", 90, 950.0, "1-6", "Mixed", 1900.0, 100.0),
        ("D1 - Three Bedroom", "3BR", 30, 1250.0, "2-6", "City", 2400.0, 125.0),
    ];
    for floorplan in campus_view_floorplans {
        service.add_floorplan(floorplan_draft(&campus_view.property.id, floorplan))?;
    }

    let university_heights = service.create_property(PropertyDraft {
        name: "University Heights".to_string(),
        address: "456 College Blvd, Austin, TX 78712".to_string(),
        total_units: 180,
    })?;

    let university_heights_floorplans = [
        ("Studio Deluxe", "Studio", 30, 500.0, "1-5", "Park", 1350.0, 60.0),
        ("One Bed Premium", "1BR", 60, 700.0, "1-5", "Park", 1600.0, 85.0),
        ("Two Bed Luxury", "2BR", 70, 1050.0, "1-5", "Mixed", 2200.0, 110.0),
        ("Four Bed Townhouse", "4BR", 20, 1600.0, "Ground", "Street", 3200.0, 150.0),
    ];
    for floorplan in university_heights_floorplans {
        service.add_floorplan(floorplan_draft(&university_heights.property.id, floorplan))?;
    }

    let analysis = service.create_analysis(AnalysisDraft {
        property_id: campus_view.property.id.clone(),
        name: "Fall 2024 Leasing Analysis".to_string(),
        description: Some("Baseline analysis for fall semester leasing period".to_string()),
    })?;

    let baseline = service.create_scenario(ScenarioDraft {
        analysis_id: analysis.analysis.id.clone(),
        name: "Baseline".to_string(),
        adjustments: ScenarioAdjustments::default(),
    })?;

    let optimistic = service.create_scenario(ScenarioDraft {
        analysis_id: analysis.analysis.id.clone(),
        name: "Optimistic (+5%)".to_string(),
        adjustments: ScenarioAdjustments {
            base_rent_pct_adj: 0.05,
            amenity_rent_pct_adj: 0.05,
            ..ScenarioAdjustments::default()
        },
    })?;

    let pessimistic = service.create_scenario(ScenarioDraft {
        analysis_id: analysis.analysis.id.clone(),
        name: "Pessimistic (1 month free)".to_string(),
        adjustments: ScenarioAdjustments {
            concession_type: ConcessionType::FreeMonths,
            concession_value: 1.0,
            ..ScenarioAdjustments::default()
        },
    })?;

    Ok(SeedSummary {
        campus_view: campus_view.property.id,
        university_heights: university_heights.property.id,
        analysis: analysis.analysis.id,
        baseline: baseline.id,
        optimistic: optimistic.id,
        pessimistic: pessimistic.id,
    })
}

#[allow(clippy::type_complexity)]
fn floorplan_draft(
    property_id: &PropertyId,
    (name, unit_type, unit_count, square_footage, floor_level, view_type, base_rent, amenity_rent): (
        &str,
        &str,
        u32,
        f64,
        &str,
        &str,
        f64,
        f64,
    ),
) -> FloorplanDraft {
    FloorplanDraft {
        property_id: property_id.clone(),
        details: FloorplanDetails {
            floorplan: Floorplan {
                name: name.to_string(),
                unit_type: unit_type.to_string(),
                unit_count,
                square_footage,
                base_rent,
                amenity_rent,
            },
            floor_level: Some(floor_level.to_string()),
            view_type: Some(view_type.to_string()),
        },
    }
}
