use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_intake_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use gatekeeper::config::{AppConfig, MailConfig};
use gatekeeper::error::AppError;
use gatekeeper::intake::{AuditRequestService, MailjetClient, INTAKE_PATH};
use gatekeeper::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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

    let mail = MailConfig::load()?;
    let mailer = Arc::new(MailjetClient::from_config(&mail));
    info!(
        endpoint = mailer.endpoint(),
        sender = %mail.sender.email,
        recipient = %mail.recipient.email,
        "mail provider configured"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(AuditRequestService::new(
        mailer,
        mail.sender.clone(),
        mail.recipient.clone(),
    ));

    let app = with_intake_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, intake = INTAKE_PATH, "audit request gatekeeper ready");

    axum::serve(listener, app).await?;
    Ok(())
}
