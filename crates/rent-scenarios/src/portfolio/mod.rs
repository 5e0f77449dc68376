//! Portfolio store: the records, repository boundary, and service wrapping
//! the calculation engine.
//!
//! The engine never touches storage; this module owns ids, timestamps, and
//! the persisted lifecycle of calculated results, and exposes the whole
//! surface over an axum router generic over the repository implementation.

pub mod domain;
pub mod rentroll;
pub mod repository;
pub mod router;
pub mod seed;
pub mod service;

pub use domain::{
    AnalysisDraft, AnalysisId, AnalysisRecord, AnalysisView, FloorplanDetails, FloorplanDraft,
    FloorplanId, FloorplanRecord, PropertyDraft, PropertyId, PropertyRecord, PropertyView,
    ScenarioDraft, ScenarioId, ScenarioRecord,
};
pub use rentroll::{parse_rent_roll, parse_rent_roll_from_path, RentRollImportError};
pub use repository::{PortfolioRepository, RepositoryError};
pub use router::portfolio_router;
pub use seed::{seed_sample_portfolio, SeedSummary};
pub use service::{ScenarioService, ScenarioServiceError};
