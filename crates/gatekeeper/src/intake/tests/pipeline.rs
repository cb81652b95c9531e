use std::sync::Arc;

use serde_json::json;

use super::common::*;
use crate::intake::document::fallback;
use crate::intake::service::{AuditRequestService, SubmissionError};
use crate::intake::submission::ValidationCategory;

#[tokio::test]
async fn scenario_request_renders_and_dispatches() {
    let (service, mailer) = build_service();
    let body = serde_json::to_vec(&scenario_json()).expect("serializes");

    let receipt = service.submit(&body).await.expect("request accepted");
    assert_eq!(receipt.subject, "Example Clinic has submitted an audit request!");
    assert_eq!(receipt.facility_name, "Example Clinic");
    assert_eq!(receipt.delivery.message_ids, vec!["msg-0001".to_string()]);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    let email = &sent[0];
    assert_eq!(email.subject, "Example Clinic has submitted an audit request!");
    assert_eq!(email.to.email, "audits@example.com");

    let html = &email.html_body;
    assert!(html.contains("Example Clinic"));
    assert_eq!(html.matches("class=\"date-item\"").count(), 1);
    assert!(html.contains("2024-01-01 to 2024-01-03"));
    assert!(html.contains("<span class=\"scope-tag\">Endoscopes</span>"));
    assert!(html.contains(fallback::NO_TRACKING));
    assert!(html.contains(fallback::NO_FINDINGS));
    assert!(html.contains("CSSD Operational Review"));
}

#[tokio::test]
async fn unknown_field_is_rejected_before_dispatch() {
    let (service, mailer) = build_service();
    let mut value = scenario_json();
    value["extra"] = json!(1);
    let body = serde_json::to_vec(&value).expect("serializes");

    let err = service.submit(&body).await.expect_err("unknown field");
    match err {
        SubmissionError::Validation(validation) => {
            assert_eq!(validation.category, ValidationCategory::Data);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn provider_rejection_surfaces_as_delivery_error() {
    let mailer = Arc::new(RejectingMailer::default());
    let service = AuditRequestService::new(
        mailer.clone(),
        mailbox("requests@example.com", "Gatekeeper"),
        mailbox("audits@example.com", "Recipient"),
    );
    let body = serde_json::to_vec(&scenario_json()).expect("serializes");

    let err = service.submit(&body).await.expect_err("provider rejects");
    assert!(matches!(err, SubmissionError::Delivery(_)));
    assert_eq!(err.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(mailer.attempts(), 1);
}

#[test]
fn missing_optionals_render_documented_fallbacks() {
    let (service, _) = build_service();
    let mut value = scenario_json();
    value["isAffiliated"] = json!(true);
    value["hasTracking"] = json!(true);
    value["procEndoscopes"] = json!(false);
    let body = serde_json::to_vec(&value).expect("serializes");

    let preview = service.preview(&body).expect("renders without optionals");
    let html = preview.document.as_str();
    assert!(html.contains(fallback::SYSTEM_UNNAMED));
    assert!(html.contains(fallback::TRACKING_UNNAMED));
    assert!(html.contains(fallback::NO_ADDITIONAL_INFO));
    assert!(html.contains(&fallback::standard_processing_only()));
    assert!(!html.contains("Areas of Focus"));
}

#[test]
fn findings_render_even_when_flag_is_unset() {
    let (service, _) = build_service();
    let mut value = scenario_json();
    value["hasFindings"] = json!(false);
    value["findings"] = json!(["Wet packs in sterile storage"]);
    let body = serde_json::to_vec(&value).expect("serializes");

    let preview = service.preview(&body).expect("renders");
    let html = preview.document.as_str();
    assert!(html.contains("<li>Wet packs in sterile storage</li>"));
    assert!(!html.contains(fallback::NO_FINDINGS));
    assert_eq!(preview.display.finding_count, 1);
}

#[test]
fn honeypot_value_never_reaches_document() {
    let (service, _) = build_service();
    let mut value = scenario_json();
    value["botCheck"] = json!("buy-cheap-widgets");
    let body = serde_json::to_vec(&value).expect("serializes");

    let preview = service.preview(&body).expect("honeypot does not block rendering");
    assert!(!preview.document.as_str().contains("buy-cheap-widgets"));
}

#[test]
fn field_order_does_not_change_output() {
    let (service, _) = build_service();
    let forward = r#"{"procVascular": true, "procRobotic": true}"#;
    let mut value = scenario_json();
    value["procEndoscopes"] = json!(false);
    let object = value.as_object_mut().expect("object");
    object.remove("procVascular");
    object.remove("procRobotic");
    let base = serde_json::to_string(&value).expect("serializes");

    // Same record, flags placed first and last in the object text.
    let flags_first = format!(
        "{{{}, {}",
        &forward[1..forward.len() - 1],
        &base[1..]
    );
    let flags_last = format!(
        "{}, {}}}",
        &base[..base.len() - 1],
        &forward[1..forward.len() - 1]
    );

    let first = service.preview(flags_first.as_bytes()).expect("flags first");
    let last = service.preview(flags_last.as_bytes()).expect("flags last");
    assert_eq!(first.display.scope_tags, vec!["Vascular/Heart", "Robotic"]);
    assert_eq!(first.document, last.document);
}

#[test]
fn preview_of_same_body_is_byte_identical() {
    let (service, _) = build_service();
    let body = serde_json::to_vec(&scenario_json()).expect("serializes");
    let first = service.preview(&body).expect("first");
    let second = service.preview(&body).expect("second");
    assert_eq!(first.document.as_str(), second.document.as_str());
}
