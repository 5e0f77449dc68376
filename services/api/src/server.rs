use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryPortfolioRepository};
use crate::routes::with_portfolio_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use rent_scenarios::config::AppConfig;
use rent_scenarios::error::AppError;
use rent_scenarios::portfolio::{seed_sample_portfolio, ScenarioService};
use rent_scenarios::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(config.environment, &config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryPortfolioRepository::default());
    let service = Arc::new(ScenarioService::new(repository));

    if !args.no_seed {
        let seed = seed_sample_portfolio(&service)?;
        info!(
            property = %seed.campus_view.0,
            analysis = %seed.analysis.0,
            "sample portfolio seeded"
        );
    }

    let app = with_portfolio_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "rent scenario service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
