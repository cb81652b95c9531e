use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};

use super::dispatch::Mailer;
use super::service::AuditRequestService;

/// Path accepting audit request submissions.
pub const INTAKE_PATH: &str = "/gatekeeper";

/// Router builder exposing the audit request intake endpoint.
pub fn intake_router<M>(service: Arc<AuditRequestService<M>>) -> Router
where
    M: Mailer + ?Sized + 'static,
{
    Router::new()
        .route(INTAKE_PATH, post(submit_handler::<M>))
        .with_state(service)
}

/// The body is taken as raw bytes so every decode failure maps to one client error.
pub(crate) async fn submit_handler<M>(
    State(service): State<Arc<AuditRequestService<M>>>,
    body: Bytes,
) -> Response
where
    M: Mailer + ?Sized + 'static,
{
    match service.submit(&body).await {
        Ok(receipt) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Err(err) => err.into_response(),
    }
}
