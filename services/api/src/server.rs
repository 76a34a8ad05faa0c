use crate::cli::ServeArgs;
use crate::infra::{default_grading_config, AppState, InMemoryAssessmentRepository};
use crate::routes::{with_service_routes, ScreeningState};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use candidate_ai::config::AppConfig;
use candidate_ai::error::AppError;
use candidate_ai::oracle::HttpOracleClient;
use candidate_ai::telemetry;
use candidate_ai::workflows::assessment::{AssessmentService, QuestionBank};
use candidate_ai::workflows::screening::extraction::{DocumentExtractor, OracleVisionOcr};
use candidate_ai::workflows::screening::relevance::RelevanceMatcher;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    // One oracle client shared by grading, integrity, ranking, and OCR.
    let oracle = Arc::new(HttpOracleClient::new(&config.oracle)?);

    let repository = Arc::new(InMemoryAssessmentRepository::default());
    let assessment_service = Arc::new(AssessmentService::new(
        repository,
        oracle.clone(),
        QuestionBank::standard(),
        default_grading_config(),
    ));

    let screening = Arc::new(ScreeningState {
        extractor: DocumentExtractor::new(OracleVisionOcr::new(oracle.clone())),
        matcher: RelevanceMatcher::new(oracle),
    });

    let app = with_service_routes(assessment_service, screening)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "assessment pipeline service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
