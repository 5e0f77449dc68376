use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    AnalysisDraft, AnalysisId, AnalysisRecord, AnalysisView, FloorplanDraft, FloorplanId,
    FloorplanRecord, PropertyDraft, PropertyId, PropertyRecord, PropertyView, ScenarioDraft,
    ScenarioId, ScenarioRecord,
};
use super::rentroll::{parse_rent_roll, RentRollImportError};
use super::repository::{PortfolioRepository, RepositoryError};
use crate::engine::{
    build_waterfall, calculate_scenario_results, EngineError, Floorplan, ScenarioSnapshot,
    WaterfallStep,
};

static PROPERTY_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static FLOORPLAN_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ANALYSIS_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static SCENARIO_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_property_id() -> PropertyId {
    PropertyId(format!(
        "prop-{:06}",
        PROPERTY_SEQUENCE.fetch_add(1, Ordering::Relaxed)
    ))
}

fn next_floorplan_id() -> FloorplanId {
    FloorplanId(format!(
        "fp-{:06}",
        FLOORPLAN_SEQUENCE.fetch_add(1, Ordering::Relaxed)
    ))
}

fn next_analysis_id() -> AnalysisId {
    AnalysisId(format!(
        "an-{:06}",
        ANALYSIS_SEQUENCE.fetch_add(1, Ordering::Relaxed)
    ))
}

fn next_scenario_id() -> ScenarioId {
    ScenarioId(format!(
        "scn-{:06}",
        SCENARIO_SEQUENCE.fetch_add(1, Ordering::Relaxed)
    ))
}

/// Service composing the repository and the calculation engine. Owns the
/// record lifecycle: the engine itself never sees ids or timestamps, only
/// plain floorplan and adjustment data.
pub struct ScenarioService<R> {
    repository: Arc<R>,
}

impl<R> ScenarioService<R>
where
    R: PortfolioRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn create_property(
        &self,
        draft: PropertyDraft,
    ) -> Result<PropertyView, ScenarioServiceError> {
        info!(name = %draft.name, "creating property");
        let now = Utc::now();
        let record = PropertyRecord {
            id: next_property_id(),
            name: draft.name,
            address: draft.address,
            total_units: draft.total_units,
            created_at: now,
            updated_at: now,
        };
        self.repository.insert_property(record.clone())?;
        Ok(PropertyView {
            property: record,
            floorplans: Vec::new(),
        })
    }

    pub fn property(&self, id: &PropertyId) -> Result<PropertyView, ScenarioServiceError> {
        let record = self
            .repository
            .fetch_property(id)?
            .ok_or_else(|| ScenarioServiceError::not_found("property", &id.0))?;
        let floorplans = self.repository.floorplans_for_property(id)?;
        Ok(PropertyView {
            property: record,
            floorplans,
        })
    }

    pub fn properties(&self) -> Result<Vec<PropertyView>, ScenarioServiceError> {
        let mut views = Vec::new();
        for record in self.repository.list_properties()? {
            let floorplans = self.repository.floorplans_for_property(&record.id)?;
            views.push(PropertyView {
                property: record,
                floorplans,
            });
        }
        Ok(views)
    }

    pub fn add_floorplan(
        &self,
        draft: FloorplanDraft,
    ) -> Result<FloorplanRecord, ScenarioServiceError> {
        info!(property_id = %draft.property_id.0, "adding floorplan");
        self.require_property(&draft.property_id)?;
        draft.details.floorplan.validate()?;

        let record = FloorplanRecord {
            id: next_floorplan_id(),
            property_id: draft.property_id,
            details: draft.details,
        };
        self.repository.insert_floorplan(record.clone())?;
        Ok(record)
    }

    pub fn update_floorplan(
        &self,
        id: &FloorplanId,
        draft: FloorplanDraft,
    ) -> Result<FloorplanRecord, ScenarioServiceError> {
        info!(floorplan_id = %id.0, "updating floorplan");
        self.repository
            .fetch_floorplan(id)?
            .ok_or_else(|| ScenarioServiceError::not_found("floorplan", &id.0))?;
        self.require_property(&draft.property_id)?;
        draft.details.floorplan.validate()?;

        let record = FloorplanRecord {
            id: id.clone(),
            property_id: draft.property_id,
            details: draft.details,
        };
        self.repository.update_floorplan(record.clone())?;
        Ok(record)
    }

    pub fn remove_floorplan(&self, id: &FloorplanId) -> Result<(), ScenarioServiceError> {
        info!(floorplan_id = %id.0, "deleting floorplan");
        self.repository
            .fetch_floorplan(id)?
            .ok_or_else(|| ScenarioServiceError::not_found("floorplan", &id.0))?;
        self.repository.delete_floorplan(id)?;
        Ok(())
    }

    /// Imports a rent-roll CSV as new floorplans under the given property.
    pub fn import_rent_roll<Rd: Read>(
        &self,
        property_id: &PropertyId,
        reader: Rd,
    ) -> Result<Vec<FloorplanRecord>, ScenarioServiceError> {
        info!(property_id = %property_id.0, "importing rent roll");
        self.require_property(property_id)?;

        let mut records = Vec::new();
        for details in parse_rent_roll(reader)? {
            let record = FloorplanRecord {
                id: next_floorplan_id(),
                property_id: property_id.clone(),
                details,
            };
            self.repository.insert_floorplan(record.clone())?;
            records.push(record);
        }
        info!(
            property_id = %property_id.0,
            imported = records.len(),
            "rent roll imported"
        );
        Ok(records)
    }

    pub fn create_analysis(
        &self,
        draft: AnalysisDraft,
    ) -> Result<AnalysisView, ScenarioServiceError> {
        info!(name = %draft.name, property_id = %draft.property_id.0, "creating analysis");
        self.require_property(&draft.property_id)?;

        let now = Utc::now();
        let record = AnalysisRecord {
            id: next_analysis_id(),
            property_id: draft.property_id,
            name: draft.name,
            description: draft.description,
            parent_analysis_id: None,
            created_at: now,
            updated_at: now,
        };
        self.repository.insert_analysis(record.clone())?;
        Ok(AnalysisView {
            analysis: record,
            scenarios: Vec::new(),
        })
    }

    pub fn analysis(&self, id: &AnalysisId) -> Result<AnalysisView, ScenarioServiceError> {
        let record = self
            .repository
            .fetch_analysis(id)?
            .ok_or_else(|| ScenarioServiceError::not_found("analysis", &id.0))?;
        let scenarios = self.repository.scenarios_for_analysis(id)?;
        Ok(AnalysisView {
            analysis: record,
            scenarios,
        })
    }

    pub fn analyses(&self) -> Result<Vec<AnalysisView>, ScenarioServiceError> {
        let mut views = Vec::new();
        for record in self.repository.list_analyses()? {
            let scenarios = self.repository.scenarios_for_analysis(&record.id)?;
            views.push(AnalysisView {
                analysis: record,
                scenarios,
            });
        }
        Ok(views)
    }

    /// Copies an analysis and all of its scenarios under a new name. Copied
    /// scenarios start without results: they have not been calculated yet.
    pub fn duplicate_analysis(
        &self,
        id: &AnalysisId,
        new_name: String,
    ) -> Result<AnalysisView, ScenarioServiceError> {
        info!(analysis_id = %id.0, new_name = %new_name, "duplicating analysis");
        let original = self
            .repository
            .fetch_analysis(id)?
            .ok_or_else(|| ScenarioServiceError::not_found("analysis", &id.0))?;

        let now = Utc::now();
        let duplicate = AnalysisRecord {
            id: next_analysis_id(),
            property_id: original.property_id.clone(),
            name: new_name,
            description: Some(format!("Duplicated from: {}", original.name)),
            parent_analysis_id: Some(original.id.clone()),
            created_at: now,
            updated_at: now,
        };
        self.repository.insert_analysis(duplicate.clone())?;

        let mut scenarios = Vec::new();
        for scenario in self.repository.scenarios_for_analysis(id)? {
            let copy = ScenarioRecord {
                id: next_scenario_id(),
                analysis_id: duplicate.id.clone(),
                name: scenario.name,
                adjustments: scenario.adjustments,
                results: None,
                created_at: now,
            };
            self.repository.insert_scenario(copy.clone())?;
            scenarios.push(copy);
        }

        Ok(AnalysisView {
            analysis: duplicate,
            scenarios,
        })
    }

    pub fn create_scenario(
        &self,
        draft: ScenarioDraft,
    ) -> Result<ScenarioRecord, ScenarioServiceError> {
        info!(analysis_id = %draft.analysis_id.0, name = %draft.name, "creating scenario");
        self.repository
            .fetch_analysis(&draft.analysis_id)?
            .ok_or_else(|| ScenarioServiceError::not_found("analysis", &draft.analysis_id.0))?;
        draft.adjustments.validate()?;

        let record = ScenarioRecord {
            id: next_scenario_id(),
            analysis_id: draft.analysis_id,
            name: draft.name,
            adjustments: draft.adjustments,
            results: None,
            created_at: Utc::now(),
        };
        self.repository.insert_scenario(record.clone())?;
        Ok(record)
    }

    /// Replaces a scenario's parameters. Any previously calculated results
    /// are discarded because they no longer describe the stored adjustments.
    pub fn update_scenario(
        &self,
        id: &ScenarioId,
        draft: ScenarioDraft,
    ) -> Result<ScenarioRecord, ScenarioServiceError> {
        info!(scenario_id = %id.0, "updating scenario");
        let existing = self
            .repository
            .fetch_scenario(id)?
            .ok_or_else(|| ScenarioServiceError::not_found("scenario", &id.0))?;
        draft.adjustments.validate()?;

        let record = ScenarioRecord {
            id: id.clone(),
            analysis_id: draft.analysis_id,
            name: draft.name,
            adjustments: draft.adjustments,
            results: None,
            created_at: existing.created_at,
        };
        self.repository.update_scenario(record.clone())?;
        Ok(record)
    }

    pub fn scenario(&self, id: &ScenarioId) -> Result<ScenarioRecord, ScenarioServiceError> {
        self.repository
            .fetch_scenario(id)?
            .ok_or_else(|| ScenarioServiceError::not_found("scenario", &id.0))
    }

    /// Runs the aggregator for one scenario against its property's current
    /// floorplan inventory and persists the results.
    pub fn calculate_scenario(
        &self,
        id: &ScenarioId,
    ) -> Result<ScenarioRecord, ScenarioServiceError> {
        info!(scenario_id = %id.0, "calculating scenario");
        let mut record = self
            .repository
            .fetch_scenario(id)?
            .ok_or_else(|| ScenarioServiceError::not_found("scenario", &id.0))?;
        let inventory = self.inventory_for_analysis(&record.analysis_id)?;

        record.results = Some(calculate_scenario_results(&inventory, &record.adjustments)?);
        self.repository.update_scenario(record.clone())?;
        Ok(record)
    }

    /// Recalculates every scenario of an analysis against one consistent
    /// inventory snapshot. Each scenario's calculation is independent, but
    /// all of them observe the same floorplan set: no scenario sees a
    /// mid-update inventory while a sibling sees another.
    pub fn recalculate_analysis(
        &self,
        id: &AnalysisId,
    ) -> Result<Vec<ScenarioRecord>, ScenarioServiceError> {
        info!(analysis_id = %id.0, "recalculating analysis scenarios");
        let inventory = self.inventory_for_analysis(id)?;

        let mut updated = Vec::new();
        for mut scenario in self.repository.scenarios_for_analysis(id)? {
            scenario.results = Some(calculate_scenario_results(
                &inventory,
                &scenario.adjustments,
            )?);
            self.repository.update_scenario(scenario.clone())?;
            updated.push(scenario);
        }
        Ok(updated)
    }

    /// Builds the waterfall decomposition from a baseline scenario to a
    /// target scenario. Each side is snapshotted against its own analysis's
    /// property; the engine refuses the comparison when the two inventories
    /// differ.
    pub fn waterfall(
        &self,
        target_id: &ScenarioId,
        baseline_id: &ScenarioId,
    ) -> Result<Vec<WaterfallStep>, ScenarioServiceError> {
        info!(
            scenario_id = %target_id.0,
            baseline_scenario_id = %baseline_id.0,
            "building waterfall"
        );
        let target = self
            .repository
            .fetch_scenario(target_id)?
            .ok_or_else(|| ScenarioServiceError::not_found("scenario", &target_id.0))?;
        let baseline = self
            .repository
            .fetch_scenario(baseline_id)?
            .ok_or_else(|| ScenarioServiceError::not_found("scenario", &baseline_id.0))?;

        let target_inventory = self.inventory_for_analysis(&target.analysis_id)?;
        let baseline_inventory = self.inventory_for_analysis(&baseline.analysis_id)?;

        let steps = build_waterfall(
            &ScenarioSnapshot {
                floorplans: &baseline_inventory,
                adjustments: &baseline.adjustments,
            },
            &ScenarioSnapshot {
                floorplans: &target_inventory,
                adjustments: &target.adjustments,
            },
        )?;
        Ok(steps)
    }

    fn require_property(&self, id: &PropertyId) -> Result<PropertyRecord, ScenarioServiceError> {
        self.repository
            .fetch_property(id)?
            .ok_or_else(|| ScenarioServiceError::not_found("property", &id.0))
    }

    /// Materializes the floorplan inventory backing an analysis as one
    /// consistent snapshot of plain engine inputs.
    fn inventory_for_analysis(
        &self,
        id: &AnalysisId,
    ) -> Result<Vec<Floorplan>, ScenarioServiceError> {
        let analysis = self
            .repository
            .fetch_analysis(id)?
            .ok_or_else(|| ScenarioServiceError::not_found("analysis", &id.0))?;
        let records = self
            .repository
            .floorplans_for_property(&analysis.property_id)?;
        if records.is_empty() {
            return Err(ScenarioServiceError::MissingFloorplans {
                property_id: analysis.property_id.0,
            });
        }
        Ok(records
            .into_iter()
            .map(|record| record.details.floorplan)
            .collect())
    }
}

/// Error raised by the scenario service.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("property {property_id} has no floorplans to calculate against")]
    MissingFloorplans { property_id: String },
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    RentRoll(#[from] RentRollImportError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ScenarioServiceError {
    fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
