use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    AnalysisDraft, AnalysisId, FloorplanDraft, FloorplanId, PropertyDraft, PropertyId,
    ScenarioDraft, ScenarioId,
};
use super::repository::{PortfolioRepository, RepositoryError};
use super::service::{ScenarioService, ScenarioServiceError};

/// Router builder exposing the portfolio CRUD and calculation endpoints.
pub fn portfolio_router<R>(service: Arc<ScenarioService<R>>) -> Router
where
    R: PortfolioRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/properties",
            get(list_properties_handler::<R>).post(create_property_handler::<R>),
        )
        .route("/api/v1/properties/:property_id", get(get_property_handler::<R>))
        .route(
            "/api/v1/properties/:property_id/rentroll",
            post(import_rent_roll_handler::<R>),
        )
        .route("/api/v1/floorplans", post(create_floorplan_handler::<R>))
        .route(
            "/api/v1/floorplans/:floorplan_id",
            put(update_floorplan_handler::<R>).delete(delete_floorplan_handler::<R>),
        )
        .route(
            "/api/v1/analyses",
            get(list_analyses_handler::<R>).post(create_analysis_handler::<R>),
        )
        .route("/api/v1/analyses/:analysis_id", get(get_analysis_handler::<R>))
        .route(
            "/api/v1/analyses/:analysis_id/duplicate",
            post(duplicate_analysis_handler::<R>),
        )
        .route(
            "/api/v1/analyses/:analysis_id/recalculate",
            post(recalculate_analysis_handler::<R>),
        )
        .route("/api/v1/scenarios", post(create_scenario_handler::<R>))
        .route("/api/v1/scenarios/:scenario_id", put(update_scenario_handler::<R>))
        .route(
            "/api/v1/scenarios/:scenario_id/calculate",
            get(calculate_scenario_handler::<R>),
        )
        .route(
            "/api/v1/scenarios/:scenario_id/waterfall",
            get(waterfall_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct DuplicateAnalysisQuery {
    pub(crate) new_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WaterfallQuery {
    pub(crate) baseline_scenario_id: String,
}

pub(crate) async fn list_properties_handler<R>(
    State(service): State<Arc<ScenarioService<R>>>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.properties() {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_property_handler<R>(
    State(service): State<Arc<ScenarioService<R>>>,
    Json(draft): Json<PropertyDraft>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.create_property(draft) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_property_handler<R>(
    State(service): State<Arc<ScenarioService<R>>>,
    Path(property_id): Path<String>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.property(&PropertyId(property_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn import_rent_roll_handler<R>(
    State(service): State<Arc<ScenarioService<R>>>,
    Path(property_id): Path<String>,
    body: String,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.import_rent_roll(&PropertyId(property_id), body.as_bytes()) {
        Ok(records) => (StatusCode::CREATED, Json(records)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_floorplan_handler<R>(
    State(service): State<Arc<ScenarioService<R>>>,
    Json(draft): Json<FloorplanDraft>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.add_floorplan(draft) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_floorplan_handler<R>(
    State(service): State<Arc<ScenarioService<R>>>,
    Path(floorplan_id): Path<String>,
    Json(draft): Json<FloorplanDraft>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.update_floorplan(&FloorplanId(floorplan_id), draft) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_floorplan_handler<R>(
    State(service): State<Arc<ScenarioService<R>>>,
    Path(floorplan_id): Path<String>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.remove_floorplan(&FloorplanId(floorplan_id)) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "floorplan deleted" })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_analyses_handler<R>(
    State(service): State<Arc<ScenarioService<R>>>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.analyses() {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_analysis_handler<R>(
    State(service): State<Arc<ScenarioService<R>>>,
    Json(draft): Json<AnalysisDraft>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.create_analysis(draft) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_analysis_handler<R>(
    State(service): State<Arc<ScenarioService<R>>>,
    Path(analysis_id): Path<String>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.analysis(&AnalysisId(analysis_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn duplicate_analysis_handler<R>(
    State(service): State<Arc<ScenarioService<R>>>,
    Path(analysis_id): Path<String>,
    Query(query): Query<DuplicateAnalysisQuery>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.duplicate_analysis(&AnalysisId(analysis_id), query.new_name) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn recalculate_analysis_handler<R>(
    State(service): State<Arc<ScenarioService<R>>>,
    Path(analysis_id): Path<String>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.recalculate_analysis(&AnalysisId(analysis_id)) {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_scenario_handler<R>(
    State(service): State<Arc<ScenarioService<R>>>,
    Json(draft): Json<ScenarioDraft>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.create_scenario(draft) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_scenario_handler<R>(
    State(service): State<Arc<ScenarioService<R>>>,
    Path(scenario_id): Path<String>,
    Json(draft): Json<ScenarioDraft>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.update_scenario(&ScenarioId(scenario_id), draft) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn calculate_scenario_handler<R>(
    State(service): State<Arc<ScenarioService<R>>>,
    Path(scenario_id): Path<String>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.calculate_scenario(&ScenarioId(scenario_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn waterfall_handler<R>(
    State(service): State<Arc<ScenarioService<R>>>,
    Path(scenario_id): Path<String>,
    Query(query): Query<WaterfallQuery>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    let baseline_id = ScenarioId(query.baseline_scenario_id);
    match service.waterfall(&ScenarioId(scenario_id), &baseline_id) {
        Ok(steps) => (StatusCode::OK, Json(json!({ "waterfall": steps }))).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ScenarioServiceError) -> Response {
    let status = match &error {
        ScenarioServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        ScenarioServiceError::MissingFloorplans { .. } => StatusCode::BAD_REQUEST,
        ScenarioServiceError::Engine(_) | ScenarioServiceError::RentRoll(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ScenarioServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ScenarioServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ScenarioServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(json!({ "error": error.to_string() }))).into_response()
}
