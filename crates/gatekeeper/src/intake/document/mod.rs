//! HTML notification document for an audit request.

mod markup;
mod sections;

use std::fmt::{self, Write};

use serde::Serialize;

use self::sections::SectionWriter;
use super::display::DerivedDisplay;
use super::submission::AuditSubmission;

pub use markup::{escape_html, Escaped};

/// Text rendered in place of absent or empty values.
pub mod fallback {
    use crate::intake::display::STANDARD_PROCESSING;

    pub const INDEPENDENT: &str = "Independent";
    pub const SYSTEM_UNNAMED: &str = "Not specified";
    pub const NO_WINDOWS: &str = "No audit windows requested";
    pub const NO_TRACKING: &str = "No Tracking System";
    pub const TRACKING_UNNAMED: &str = "System Implemented";
    pub const NO_ADDITIONAL_INFO: &str = "No additional information provided";
    pub const NO_FINDINGS: &str = "No findings reported";

    /// Shown instead of the specialized procedures block.
    pub fn standard_processing_only() -> String {
        format!("{STANDARD_PROCESSING} Only")
    }
}

const SECTIONS: [(&str, SectionWriter); 10] = [
    ("document head", sections::document_head),
    ("header", sections::header),
    ("facility information", sections::facility),
    ("requested windows", sections::requested_windows),
    ("point of contact", sections::point_of_contact),
    ("operations and scope", sections::operations),
    ("areas of focus", sections::areas_of_focus),
    ("pain points and notes", sections::notes),
    ("regulatory history", sections::regulatory_history),
    ("footer", sections::footer),
];

/// Complete, self-contained HTML document ready to be used as a mail body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RenderedDocument(String);

impl RenderedDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RenderedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Internal failure while composing the document. Never caused by user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("failed to compose the {section} section")]
    Compose { section: &'static str },
}

pub fn render_document(
    submission: &AuditSubmission,
    display: &DerivedDisplay,
) -> Result<RenderedDocument, RenderError> {
    let mut html = String::with_capacity(16 * 1024);
    render_into(&mut html, submission, display)?;
    Ok(RenderedDocument(html))
}

/// Writes every section, in order, into `out`.
pub fn render_into(
    out: &mut dyn Write,
    submission: &AuditSubmission,
    display: &DerivedDisplay,
) -> Result<(), RenderError> {
    for (section, writer) in SECTIONS {
        writer(out, submission, display).map_err(|_| RenderError::Compose { section })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::tests::common::submission;

    struct RejectingWriter;

    impl Write for RejectingWriter {
        fn write_str(&mut self, _s: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn document_is_complete_and_self_contained() {
        let record = submission();
        let display = DerivedDisplay::from_submission(&record);
        let document = render_document(&record, &display).expect("document renders");
        let html = document.as_str();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.ends_with("</html>"));
        assert!(html.contains("<style>"));
        assert!(!html.contains("<link"));
        assert!(!html.contains("src=\""));
        assert!(!html.contains("http://"));
        assert!(!html.contains("https://"));
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let mut record = submission();
        record.areas_of_focus = vec!["Storage".to_string()];
        let display = DerivedDisplay::from_submission(&record);
        let html = render_document(&record, &display)
            .expect("document renders")
            .into_string();

        let order = [
            "Facility Information",
            "Requested Windows",
            "Point of Contact",
            "Operations &amp; Scope",
            "Areas of Focus",
            "Pain Points &amp; Additional Notes",
            "Regulatory History",
            "Pre-Audit Assessment Portal",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|title| html.find(title).unwrap_or_else(|| panic!("missing {title}")))
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn user_strings_are_escaped_everywhere() {
        let mut record = submission();
        record.facility_name = "<b>Clinic</b>".to_string();
        record.pain_points = "<script>steal()</script>".to_string();
        record.areas_of_focus = vec!["<img src=x>".to_string()];
        let display = DerivedDisplay::from_submission(&record);
        let html = render_document(&record, &display)
            .expect("document renders")
            .into_string();

        assert!(!html.contains("<b>Clinic</b>"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;b&gt;Clinic&lt;/b&gt;"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let record = submission();
        let display = DerivedDisplay::from_submission(&record);
        let first = render_document(&record, &display).expect("first render");
        let second = render_document(&record, &display).expect("second render");
        assert_eq!(first, second);
    }

    #[test]
    fn writer_failure_names_the_section() {
        let record = submission();
        let display = DerivedDisplay::from_submission(&record);
        let err = render_into(&mut RejectingWriter, &record, &display)
            .expect_err("writer rejects output");
        assert_eq!(
            err,
            RenderError::Compose {
                section: "document head"
            }
        );
    }

    #[test]
    fn standard_processing_notice_tracks_scope_fallback() {
        assert!(fallback::standard_processing_only()
            .starts_with(crate::intake::display::STANDARD_PROCESSING));
    }
}
