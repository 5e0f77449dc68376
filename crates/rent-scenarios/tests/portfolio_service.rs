use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use rent_scenarios::engine::{ConcessionType, ScenarioAdjustments};
use rent_scenarios::portfolio::{
    seed_sample_portfolio, AnalysisDraft, AnalysisId, AnalysisRecord, FloorplanDraft,
    FloorplanId, FloorplanRecord, PortfolioRepository, PropertyDraft, PropertyId,
    PropertyRecord, RepositoryError, ScenarioDraft, ScenarioId, ScenarioRecord,
    ScenarioService, ScenarioServiceError,
};

/// Minimal mutex-guarded repository for exercising the service in tests.
#[derive(Default)]
struct MemoryPortfolio {
    properties: Mutex<BTreeMap<String, PropertyRecord>>,
    floorplans: Mutex<BTreeMap<String, FloorplanRecord>>,
    analyses: Mutex<BTreeMap<String, AnalysisRecord>>,
    scenarios: Mutex<BTreeMap<String, ScenarioRecord>>,
}

impl PortfolioRepository for MemoryPortfolio {
    fn insert_property(&self, record: PropertyRecord) -> Result<(), RepositoryError> {
        let mut guard = self.properties.lock().expect("mutex poisoned");
        if guard.contains_key(&record.id.0) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.0.clone(), record);
        Ok(())
    }

    fn fetch_property(&self, id: &PropertyId) -> Result<Option<PropertyRecord>, RepositoryError> {
        Ok(self
            .properties
            .lock()
            .expect("mutex poisoned")
            .get(&id.0)
            .cloned())
    }

    fn list_properties(&self) -> Result<Vec<PropertyRecord>, RepositoryError> {
        Ok(self
            .properties
            .lock()
            .expect("mutex poisoned")
            .values()
            .cloned()
            .collect())
    }

    fn insert_floorplan(&self, record: FloorplanRecord) -> Result<(), RepositoryError> {
        let mut guard = self.floorplans.lock().expect("mutex poisoned");
        if guard.contains_key(&record.id.0) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.0.clone(), record);
        Ok(())
    }

    fn update_floorplan(&self, record: FloorplanRecord) -> Result<(), RepositoryError> {
        let mut guard = self.floorplans.lock().expect("mutex poisoned");
        if !guard.contains_key(&record.id.0) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.id.0.clone(), record);
        Ok(())
    }

    fn delete_floorplan(&self, id: &FloorplanId) -> Result<(), RepositoryError> {
        let mut guard = self.floorplans.lock().expect("mutex poisoned");
        guard.remove(&id.0).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn fetch_floorplan(
        &self,
        id: &FloorplanId,
    ) -> Result<Option<FloorplanRecord>, RepositoryError> {
        Ok(self
            .floorplans
            .lock()
            .expect("mutex poisoned")
            .get(&id.0)
            .cloned())
    }

    fn floorplans_for_property(
        &self,
        id: &PropertyId,
    ) -> Result<Vec<FloorplanRecord>, RepositoryError> {
        Ok(self
            .floorplans
            .lock()
            .expect("mutex poisoned")
            .values()
            .filter(|record| record.property_id == *id)
            .cloned()
            .collect())
    }

    fn insert_analysis(&self, record: AnalysisRecord) -> Result<(), RepositoryError> {
        let mut guard = self.analyses.lock().expect("mutex poisoned");
        if guard.contains_key(&record.id.0) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.0.clone(), record);
        Ok(())
    }

    fn fetch_analysis(&self, id: &AnalysisId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        Ok(self
            .analyses
            .lock()
            .expect("mutex poisoned")
            .get(&id.0)
            .cloned())
    }

    fn list_analyses(&self) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        Ok(self
            .analyses
            .lock()
            .expect("mutex poisoned")
            .values()
            .cloned()
            .collect())
    }

    fn insert_scenario(&self, record: ScenarioRecord) -> Result<(), RepositoryError> {
        let mut guard = self.scenarios.lock().expect("mutex poisoned");
        if guard.contains_key(&record.id.0) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.0.clone(), record);
        Ok(())
    }

    fn update_scenario(&self, record: ScenarioRecord) -> Result<(), RepositoryError> {
        let mut guard = self.scenarios.lock().expect("mutex poisoned");
        if !guard.contains_key(&record.id.0) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.id.0.clone(), record);
        Ok(())
    }

    fn fetch_scenario(&self, id: &ScenarioId) -> Result<Option<ScenarioRecord>, RepositoryError> {
        Ok(self
            .scenarios
            .lock()
            .expect("mutex poisoned")
            .get(&id.0)
            .cloned())
    }

    fn scenarios_for_analysis(
        &self,
        id: &AnalysisId,
    ) -> Result<Vec<ScenarioRecord>, RepositoryError> {
        Ok(self
            .scenarios
            .lock()
            .expect("mutex poisoned")
            .values()
            .filter(|record| record.analysis_id == *id)
            .cloned()
            .collect())
    }
}

fn service() -> ScenarioService<MemoryPortfolio> {
    ScenarioService::new(Arc::new(MemoryPortfolio::default()))
}

#[test]
fn seeded_portfolio_exposes_properties_with_inventories() {
    let service = service();
    let seed = seed_sample_portfolio(&service).expect("seed succeeds");

    let campus_view = service.property(&seed.campus_view).expect("property view");
    assert_eq!(campus_view.property.name, "Campus View Apartments");
    assert_eq!(campus_view.floorplans.len(), 4);
    let total_units: u32 = campus_view
        .floorplans
        .iter()
        .map(|record| record.details.floorplan.unit_count)
        .sum();
    assert_eq!(total_units, 240);

    let analysis = service.analysis(&seed.analysis).expect("analysis view");
    assert_eq!(analysis.scenarios.len(), 3);
    assert!(analysis.scenarios.iter().all(|s| s.results.is_none()));
}

#[test]
fn calculating_a_scenario_persists_results() {
    let service = service();
    let seed = seed_sample_portfolio(&service).expect("seed succeeds");

    let record = service
        .calculate_scenario(&seed.baseline)
        .expect("calculation succeeds");
    let results = record.results.expect("results stored");

    // 40*1250 + 80*1525 + 90*2000 + 30*2525 = 427,750 monthly net for Campus View.
    assert!((results.total_annual_revenue - 427_750.0 * 12.0).abs() < 1e-6);
    assert!((results.avg_rent_per_unit - 427_750.0 / 240.0).abs() < 1e-9);
    assert!((results.weighted_avg_rent - results.avg_rent_per_unit).abs() < f64::EPSILON);

    let stored = service.scenario(&seed.baseline).expect("fetch succeeds");
    assert!(stored.results.is_some());
}

#[test]
fn updating_a_scenario_discards_stale_results() {
    let service = service();
    let seed = seed_sample_portfolio(&service).expect("seed succeeds");

    service
        .calculate_scenario(&seed.optimistic)
        .expect("calculation succeeds");

    let updated = service
        .update_scenario(
            &seed.optimistic,
            ScenarioDraft {
                analysis_id: seed.analysis.clone(),
                name: "Optimistic (+7%)".to_string(),
                adjustments: ScenarioAdjustments {
                    base_rent_pct_adj: 0.07,
                    ..ScenarioAdjustments::default()
                },
            },
        )
        .expect("update succeeds");

    assert!(updated.results.is_none());
    let stored = service.scenario(&seed.optimistic).expect("fetch succeeds");
    assert!(stored.results.is_none());
}

#[test]
fn batch_recalculation_covers_every_scenario_of_the_analysis() {
    let service = service();
    let seed = seed_sample_portfolio(&service).expect("seed succeeds");

    let updated = service
        .recalculate_analysis(&seed.analysis)
        .expect("batch recalculation succeeds");

    assert_eq!(updated.len(), 3);
    assert!(updated.iter().all(|record| record.results.is_some()));

    let baseline = updated
        .iter()
        .find(|record| record.id == seed.baseline)
        .expect("baseline recalculated");
    let pessimistic = updated
        .iter()
        .find(|record| record.id == seed.pessimistic)
        .expect("pessimistic recalculated");

    let baseline_results = baseline.results.expect("baseline results");
    let pessimistic_results = pessimistic.results.expect("pessimistic results");

    // One month free amortizes to 11/12 of the baseline revenue.
    assert!(
        (pessimistic_results.total_annual_revenue
            - baseline_results.total_annual_revenue * 11.0 / 12.0)
            .abs()
            < 1e-6
    );
}

#[test]
fn calculation_requires_floorplans_on_the_property() {
    let service = service();
    let property = service
        .create_property(PropertyDraft {
            name: "Empty Lot".to_string(),
            address: "789 Nowhere Rd".to_string(),
            total_units: 0,
        })
        .expect("property created");
    let analysis = service
        .create_analysis(AnalysisDraft {
            property_id: property.property.id.clone(),
            name: "Speculative".to_string(),
            description: None,
        })
        .expect("analysis created");
    let scenario = service
        .create_scenario(ScenarioDraft {
            analysis_id: analysis.analysis.id.clone(),
            name: "Baseline".to_string(),
            adjustments: ScenarioAdjustments::default(),
        })
        .expect("scenario created");

    assert!(matches!(
        service.calculate_scenario(&scenario.id),
        Err(ScenarioServiceError::MissingFloorplans { .. })
    ));
}

#[test]
fn duplicated_analysis_copies_scenarios_without_results() {
    let service = service();
    let seed = seed_sample_portfolio(&service).expect("seed succeeds");
    service
        .recalculate_analysis(&seed.analysis)
        .expect("recalculation succeeds");

    let duplicate = service
        .duplicate_analysis(&seed.analysis, "Spring 2025 Rerun".to_string())
        .expect("duplication succeeds");

    assert_eq!(duplicate.analysis.name, "Spring 2025 Rerun");
    assert_eq!(
        duplicate.analysis.parent_analysis_id.as_ref(),
        Some(&seed.analysis)
    );
    assert_eq!(duplicate.scenarios.len(), 3);
    assert!(duplicate.scenarios.iter().all(|s| s.results.is_none()));
    assert!(duplicate
        .scenarios
        .iter()
        .any(|s| s.name == "Pessimistic (1 month free)"));
}

#[test]
fn waterfall_between_sibling_scenarios_reconciles() {
    let service = service();
    let seed = seed_sample_portfolio(&service).expect("seed succeeds");

    let steps = service
        .waterfall(&seed.optimistic, &seed.baseline)
        .expect("waterfall builds");

    assert_eq!(steps.len(), 6);
    let final_total = steps.last().expect("final step").value;
    let bridged: f64 = steps[..steps.len() - 1].iter().map(|step| step.value).sum();
    assert!((bridged - final_total).abs() < 1e-6);
}

#[test]
fn waterfall_across_properties_is_refused() {
    let service = service();
    let seed = seed_sample_portfolio(&service).expect("seed succeeds");

    let other_analysis = service
        .create_analysis(AnalysisDraft {
            property_id: seed.university_heights.clone(),
            name: "Heights Baseline Review".to_string(),
            description: None,
        })
        .expect("analysis created");
    let other_scenario = service
        .create_scenario(ScenarioDraft {
            analysis_id: other_analysis.analysis.id.clone(),
            name: "Baseline".to_string(),
            adjustments: ScenarioAdjustments::default(),
        })
        .expect("scenario created");

    assert!(matches!(
        service.waterfall(&other_scenario.id, &seed.baseline),
        Err(ScenarioServiceError::Engine(
            rent_scenarios::engine::EngineError::MismatchedInventory
        ))
    ));
}

#[test]
fn rent_roll_import_attaches_floorplans_to_the_property() {
    let service = service();
    let property = service
        .create_property(PropertyDraft {
            name: "Imported Holdings".to_string(),
            address: "1 Import Way".to_string(),
            total_units: 120,
        })
        .expect("property created");

    let csv = "\
Name,Unit Type,Unit Count,Square Footage,Base Rent,Amenity Rent,Floor Level,View Type
S1,Studio,50,475,1250.00,55.00,1-3,Courtyard
T2,2BR,70,980,2050.00,95.00,,
";

    let imported = service
        .import_rent_roll(&property.property.id, Cursor::new(csv))
        .expect("import succeeds");
    assert_eq!(imported.len(), 2);

    let view = service.property(&property.property.id).expect("view");
    assert_eq!(view.floorplans.len(), 2);
    assert!(view
        .floorplans
        .iter()
        .any(|record| record.details.floorplan.name == "T2"
            && record.details.floorplan.unit_count == 70));
}

#[test]
fn floorplan_update_refuses_reattachment_to_unknown_property() {
    let service = service();
    let seed = seed_sample_portfolio(&service).expect("seed succeeds");

    let view = service.property(&seed.campus_view).expect("property view");
    let floorplan = view.floorplans[0].clone();

    let result = service.update_floorplan(
        &floorplan.id,
        FloorplanDraft {
            property_id: PropertyId("prop-999999".to_string()),
            details: floorplan.details.clone(),
        },
    );

    assert!(matches!(
        result,
        Err(ScenarioServiceError::NotFound {
            entity: "property",
            ..
        })
    ));

    // The floorplan stays attached to its original property.
    let view = service.property(&seed.campus_view).expect("property view");
    assert!(view.floorplans.iter().any(|record| record.id == floorplan.id));
}

#[test]
fn invalid_scenario_adjustments_are_rejected_at_creation() {
    let service = service();
    let seed = seed_sample_portfolio(&service).expect("seed succeeds");

    let result = service.create_scenario(ScenarioDraft {
        analysis_id: seed.analysis.clone(),
        name: "Bad Concession".to_string(),
        adjustments: ScenarioAdjustments {
            concession_type: ConcessionType::Percentage,
            concession_value: -5.0,
            ..ScenarioAdjustments::default()
        },
    });

    assert!(matches!(result, Err(ScenarioServiceError::Engine(_))));
}
