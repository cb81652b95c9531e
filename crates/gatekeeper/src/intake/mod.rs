//! Audit request intake: strict decode, derived display values, HTML rendering,
//! and email dispatch.

pub mod dispatch;
pub mod display;
pub mod document;
pub mod router;
pub mod service;
pub mod submission;

#[cfg(test)]
mod tests;

pub use dispatch::{
    subject_line, AuditDispatcher, DeliveryError, DeliveryReceipt, MailjetClient, Mailer,
    OutboundEmail,
};
pub use display::{DerivedDisplay, ProcedureScope, OPERATIONAL_REVIEW, STANDARD_PROCESSING};
pub use document::{render_document, RenderError, RenderedDocument};
pub use router::{intake_router, INTAKE_PATH};
pub use service::{
    preview, AuditPreview, AuditRequestService, SubmissionError, SubmissionReceipt,
};
pub use submission::{
    AuditSubmission, AuditType, DateInterval, ValidationCategory, ValidationError,
};
