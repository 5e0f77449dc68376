use super::domain::{
    AnalysisId, AnalysisRecord, FloorplanId, FloorplanRecord, PropertyId, PropertyRecord,
    ScenarioId, ScenarioRecord,
};

/// Storage abstraction owning property, floorplan, analysis, and scenario
/// records so the scenario service can be exercised in isolation.
///
/// List methods return records ordered by ascending id so repeated reads are
/// stable across calls.
pub trait PortfolioRepository: Send + Sync {
    fn insert_property(&self, record: PropertyRecord) -> Result<(), RepositoryError>;
    fn fetch_property(&self, id: &PropertyId) -> Result<Option<PropertyRecord>, RepositoryError>;
    fn list_properties(&self) -> Result<Vec<PropertyRecord>, RepositoryError>;

    fn insert_floorplan(&self, record: FloorplanRecord) -> Result<(), RepositoryError>;
    fn update_floorplan(&self, record: FloorplanRecord) -> Result<(), RepositoryError>;
    fn delete_floorplan(&self, id: &FloorplanId) -> Result<(), RepositoryError>;
    fn fetch_floorplan(&self, id: &FloorplanId)
        -> Result<Option<FloorplanRecord>, RepositoryError>;
    fn floorplans_for_property(
        &self,
        id: &PropertyId,
    ) -> Result<Vec<FloorplanRecord>, RepositoryError>;

    fn insert_analysis(&self, record: AnalysisRecord) -> Result<(), RepositoryError>;
    fn fetch_analysis(&self, id: &AnalysisId) -> Result<Option<AnalysisRecord>, RepositoryError>;
    fn list_analyses(&self) -> Result<Vec<AnalysisRecord>, RepositoryError>;

    fn insert_scenario(&self, record: ScenarioRecord) -> Result<(), RepositoryError>;
    fn update_scenario(&self, record: ScenarioRecord) -> Result<(), RepositoryError>;
    fn fetch_scenario(&self, id: &ScenarioId) -> Result<Option<ScenarioRecord>, RepositoryError>;
    fn scenarios_for_analysis(
        &self,
        id: &AnalysisId,
    ) -> Result<Vec<ScenarioRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
