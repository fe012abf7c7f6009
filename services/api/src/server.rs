use crate::cli::ServeArgs;
use crate::infra::{seed_demo_pipeline, AppState, InMemoryPipelineRepository};
use crate::routes::with_pipeline_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use talentflow::config::AppConfig;
use talentflow::error::AppError;
use talentflow::telemetry;
use talentflow::workflows::pipeline::PipelineService;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryPipelineRepository::default());
    let job = seed_demo_pipeline(&repository)?;
    let pipeline_service = Arc::new(PipelineService::new(repository));

    let app = with_pipeline_routes(pipeline_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, job = %job.id.0, "pipeline service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
