use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use super::dispatch::{subject_line, AuditDispatcher, DeliveryError, DeliveryReceipt, Mailer};
use super::display::DerivedDisplay;
use super::document::{render_document, RenderError, RenderedDocument};
use super::submission::{AuditSubmission, ValidationError};
use crate::config::Mailbox;

/// Validated submission rendered but not dispatched.
#[derive(Debug, Clone)]
pub struct AuditPreview {
    pub submission: AuditSubmission,
    pub display: DerivedDisplay,
    pub subject: String,
    pub document: RenderedDocument,
}

/// Response body for an accepted audit request.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub status: &'static str,
    pub message: &'static str,
    pub facility_name: String,
    pub subject: String,
    pub received_at: DateTime<Utc>,
    pub delivery: DeliveryReceipt,
}

/// Terminal failure for a single audit request.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl SubmissionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SubmissionError::Validation(_) => StatusCode::BAD_REQUEST,
            SubmissionError::Render(_) | SubmissionError::Delivery(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            SubmissionError::Validation(err) => json!({
                "error": self.to_string(),
                "category": err.category,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, axum::Json(body)).into_response()
    }
}

/// Runs validate, derive, render, and dispatch for one request body.
pub struct AuditRequestService<M: ?Sized> {
    dispatcher: AuditDispatcher<M>,
}

impl<M> AuditRequestService<M>
where
    M: Mailer + ?Sized + 'static,
{
    pub fn new(mailer: Arc<M>, sender: Mailbox, recipient: Mailbox) -> Self {
        Self {
            dispatcher: AuditDispatcher::new(mailer, sender, recipient),
        }
    }

    /// Decode, derive, and render without contacting the mail provider.
    pub fn preview(&self, body: &[u8]) -> Result<AuditPreview, SubmissionError> {
        preview(body)
    }

    pub async fn submit(&self, body: &[u8]) -> Result<SubmissionReceipt, SubmissionError> {
        let received_at = Utc::now();
        let AuditPreview {
            submission,
            subject,
            document,
            ..
        } = preview(body).map_err(|err| {
            log_rejection(&err);
            err
        })?;

        let delivery = self
            .dispatcher
            .dispatch(document, &submission.facility_name)
            .await?;

        Ok(SubmissionReceipt {
            status: "success",
            message: "Email sent successfully",
            facility_name: submission.facility_name,
            subject,
            received_at,
            delivery,
        })
    }
}

// Delivery failures are logged by the dispatcher.
fn log_rejection(err: &SubmissionError) {
    match err {
        SubmissionError::Validation(err) => {
            info!(category = ?err.category, error = %err, "audit request rejected");
        }
        SubmissionError::Render(err) => {
            warn!(error = %err, "audit request could not be rendered");
        }
        SubmissionError::Delivery(_) => {}
    }
}

/// Offline half of the pipeline, shared by the service and the CLI preview.
pub fn preview(body: &[u8]) -> Result<AuditPreview, SubmissionError> {
    let submission = AuditSubmission::from_slice(body)?;
    let derived = DerivedDisplay::from_submission(&submission);

    if submission.honeypot_tripped() {
        warn!(
            facility = %submission.facility_name,
            "audit request filled the bot check field"
        );
    }
    debug!(submission = ?submission, "decoded audit request");

    let document = render_document(&submission, &derived)?;
    info!(
        facility = %submission.facility_name,
        audit_types = %derived.audit_type_label,
        windows = derived.interval_count,
        findings = derived.finding_count,
        focus_areas = derived.focus_area_count,
        scope = %derived.scope_summary,
        bytes = document.len(),
        "rendered audit request"
    );

    Ok(AuditPreview {
        subject: subject_line(&submission.facility_name),
        submission,
        display: derived,
        document,
    })
}
