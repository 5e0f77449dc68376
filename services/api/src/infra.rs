use metrics_exporter_prometheus::PrometheusHandle;
use rent_scenarios::portfolio::{
    AnalysisId, AnalysisRecord, FloorplanId, FloorplanRecord, PortfolioRepository, PropertyId,
    PropertyRecord, RepositoryError, ScenarioId, ScenarioRecord,
};
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Mutex-guarded maps keyed by id. Sequence-generated ids are zero-padded,
/// so BTreeMap iteration order doubles as insertion order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPortfolioRepository {
    properties: Arc<Mutex<BTreeMap<String, PropertyRecord>>>,
    floorplans: Arc<Mutex<BTreeMap<String, FloorplanRecord>>>,
    analyses: Arc<Mutex<BTreeMap<String, AnalysisRecord>>>,
    scenarios: Arc<Mutex<BTreeMap<String, ScenarioRecord>>>,
}

impl PortfolioRepository for InMemoryPortfolioRepository {
    fn insert_property(&self, record: PropertyRecord) -> Result<(), RepositoryError> {
        let mut guard = self.properties.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id.0) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.0.clone(), record);
        Ok(())
    }

    fn fetch_property(&self, id: &PropertyId) -> Result<Option<PropertyRecord>, RepositoryError> {
        let guard = self.properties.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }

    fn list_properties(&self) -> Result<Vec<PropertyRecord>, RepositoryError> {
        let guard = self.properties.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn insert_floorplan(&self, record: FloorplanRecord) -> Result<(), RepositoryError> {
        let mut guard = self.floorplans.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id.0) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.0.clone(), record);
        Ok(())
    }

    fn update_floorplan(&self, record: FloorplanRecord) -> Result<(), RepositoryError> {
        let mut guard = self.floorplans.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id.0) {
            guard.insert(record.id.0.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn delete_floorplan(&self, id: &FloorplanId) -> Result<(), RepositoryError> {
        let mut guard = self.floorplans.lock().expect("repository mutex poisoned");
        match guard.remove(&id.0) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_floorplan(
        &self,
        id: &FloorplanId,
    ) -> Result<Option<FloorplanRecord>, RepositoryError> {
        let guard = self.floorplans.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }

    fn floorplans_for_property(
        &self,
        id: &PropertyId,
    ) -> Result<Vec<FloorplanRecord>, RepositoryError> {
        let guard = self.floorplans.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.property_id == *id)
            .cloned()
            .collect())
    }

    fn insert_analysis(&self, record: AnalysisRecord) -> Result<(), RepositoryError> {
        let mut guard = self.analyses.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id.0) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.0.clone(), record);
        Ok(())
    }

    fn fetch_analysis(&self, id: &AnalysisId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        let guard = self.analyses.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }

    fn list_analyses(&self) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        let guard = self.analyses.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn insert_scenario(&self, record: ScenarioRecord) -> Result<(), RepositoryError> {
        let mut guard = self.scenarios.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id.0) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.0.clone(), record);
        Ok(())
    }

    fn update_scenario(&self, record: ScenarioRecord) -> Result<(), RepositoryError> {
        let mut guard = self.scenarios.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id.0) {
            guard.insert(record.id.0.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_scenario(&self, id: &ScenarioId) -> Result<Option<ScenarioRecord>, RepositoryError> {
        let guard = self.scenarios.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }

    fn scenarios_for_analysis(
        &self,
        id: &AnalysisId,
    ) -> Result<Vec<ScenarioRecord>, RepositoryError> {
        let guard = self.scenarios.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.analysis_id == *id)
            .cloned()
            .collect())
    }
}
