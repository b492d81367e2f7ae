use crate::cli::ServeArgs;
use crate::infra::{load_directory, AppState, InMemoryDriveCatalog, InMemoryEligibilityTable};
use crate::routes::with_drive_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use placements::config::AppConfig;
use placements::drives::DrivePlacementService;
use placements::error::AppError;
use placements::telemetry;
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
    if let Some(roster) = args.roster.take() {
        config.roster_path = Some(roster);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let directory = Arc::new(load_directory(config.roster_path.as_deref())?);
    let drives = Arc::new(InMemoryDriveCatalog::default());
    let records = Arc::new(InMemoryEligibilityTable::default());
    let students = directory.len();
    let placement_service = Arc::new(DrivePlacementService::new(drives, records, directory));

    let app = with_drive_routes(placement_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, students, "placement portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}
