use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Value};

use crate::config::Mailbox;
use crate::intake::dispatch::{DeliveryError, DeliveryReceipt, Mailer, OutboundEmail};
use crate::intake::display::DerivedDisplay;
use crate::intake::document::{render_document, RenderedDocument};
use crate::intake::service::AuditRequestService;
use crate::intake::submission::{AuditSubmission, AuditType, DateInterval};

pub(crate) fn submission() -> AuditSubmission {
    AuditSubmission {
        date_intervals: vec![DateInterval {
            start: "2024-01-01".to_string(),
            end: "2024-01-03".to_string(),
        }],
        audit_types: vec![AuditType::Cssd],
        facility_name: "Example Clinic".to_string(),
        facility_address: "100 Harbor Way, Springfield".to_string(),
        is_affiliated: false,
        system_name: None,
        trauma_level: "Level II".to_string(),
        contact_name: "Dana Whitfield".to_string(),
        contact_title: "SPD Manager".to_string(),
        contact_phone: "555-0142".to_string(),
        contact_email: "dana@example.com".to_string(),
        reporting_to: "Director of Surgical Services".to_string(),
        accrediting_name: "The Joint Commission".to_string(),
        last_audit_date: "2023-06-14".to_string(),
        has_findings: false,
        findings: Vec::new(),
        staff_ft_w_fmla: "12".to_string(),
        staff_pt: "3".to_string(),
        staff_pd: "2".to_string(),
        staff_travelers: "1".to_string(),
        hours_operation: "24/7".to_string(),
        or_count: "9".to_string(),
        clinic_count: "4".to_string(),
        proc_endoscopes: false,
        proc_vascular: false,
        proc_arthroscopic: false,
        proc_robotic: false,
        proc_tee: false,
        has_tracking: false,
        tracking_system_name: None,
        pain_points: "Instrument turnaround delays first cases".to_string(),
        additional_info: None,
        areas_of_focus: Vec::new(),
        bot_check: None,
    }
}

/// Wire form of the documented example request.
pub(crate) fn scenario_json() -> Value {
    json!({
        "dateIntervals": [{ "start": "2024-01-01", "end": "2024-01-03" }],
        "auditTypes": ["CSSD"],
        "facilityName": "Example Clinic",
        "facilityAddress": "100 Harbor Way, Springfield",
        "isAffiliated": false,
        "traumaLevel": "Level II",
        "contactName": "Dana Whitfield",
        "contactTitle": "SPD Manager",
        "contactPhone": "555-0142",
        "contactEmail": "dana@example.com",
        "reportingTo": "Director of Surgical Services",
        "accreditingName": "The Joint Commission",
        "lastAuditDate": "2023-06-14",
        "hasFindings": false,
        "findings": [],
        "staffFtWFmla": "12",
        "staffPt": "3",
        "staffPd": "2",
        "staffTravelers": "1",
        "hoursOperation": "24/7",
        "orCount": "9",
        "clinicCount": "4",
        "procEndoscopes": true,
        "procVascular": false,
        "procArthroscopic": false,
        "procRobotic": false,
        "procTee": false,
        "hasTracking": false,
        "painPoints": "Instrument turnaround delays first cases"
    })
}

pub(crate) fn mailbox(email: &str, name: &str) -> Mailbox {
    Mailbox {
        email: email.to_string(),
        name: name.to_string(),
    }
}

pub(crate) fn rendered(submission: &AuditSubmission) -> RenderedDocument {
    let display = DerivedDisplay::from_submission(submission);
    render_document(submission, &display).expect("document renders")
}

#[derive(Default)]
pub(crate) struct RecordingMailer {
    sent: Mutex<Vec<OutboundEmail>>,
}

impl RecordingMailer {
    pub(crate) fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutboundEmail) -> Result<DeliveryReceipt, DeliveryError> {
        self.sent.lock().expect("mailer mutex poisoned").push(email);
        Ok(DeliveryReceipt {
            provider_status: "success".to_string(),
            message_ids: vec!["msg-0001".to_string()],
        })
    }
}

#[derive(Default)]
pub(crate) struct RejectingMailer {
    attempts: AtomicUsize,
}

impl RejectingMailer {
    pub(crate) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mailer for RejectingMailer {
    async fn send(&self, _email: OutboundEmail) -> Result<DeliveryReceipt, DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(DeliveryError::Rejected {
            status: 401,
            detail: "API key authentication/authorization failure".to_string(),
        })
    }
}

pub(crate) fn build_service() -> (Arc<AuditRequestService<RecordingMailer>>, Arc<RecordingMailer>) {
    let mailer = Arc::new(RecordingMailer::default());
    let service = Arc::new(AuditRequestService::new(
        mailer.clone(),
        mailbox("requests@example.com", "Crown Point Gatekeeper"),
        mailbox("audits@example.com", "Recipient"),
    ));
    (service, mailer)
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("valid json")
}
