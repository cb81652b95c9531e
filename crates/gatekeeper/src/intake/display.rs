use serde::Serialize;

use super::submission::AuditSubmission;

/// Scope summary shown when no specialized procedure flag is set.
pub const STANDARD_PROCESSING: &str = "Standard Processing";

/// Audit-type label shown when the request names no audit program.
pub const OPERATIONAL_REVIEW: &str = "Operational Review";

/// Specialized reprocessing scopes, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcedureScope {
    Endoscopes,
    Vascular,
    Arthroscopic,
    Robotic,
    Tee,
}

impl ProcedureScope {
    pub const ALL: [ProcedureScope; 5] = [
        Self::Endoscopes,
        Self::Vascular,
        Self::Arthroscopic,
        Self::Robotic,
        Self::Tee,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Endoscopes => "Endoscopes",
            Self::Vascular => "Vascular/Heart",
            Self::Arthroscopic => "Arthroscopic",
            Self::Robotic => "Robotic",
            Self::Tee => "TEE Probes",
        }
    }

    fn selected_by(self, submission: &AuditSubmission) -> bool {
        match self {
            Self::Endoscopes => submission.proc_endoscopes,
            Self::Vascular => submission.proc_vascular,
            Self::Arthroscopic => submission.proc_arthroscopic,
            Self::Robotic => submission.proc_robotic,
            Self::Tee => submission.proc_tee,
        }
    }
}

/// Display values computed from a submission. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedDisplay {
    pub scope_tags: Vec<&'static str>,
    pub scope_summary: String,
    pub has_specialized_procedures: bool,
    pub audit_type_label: String,
    pub interval_count: usize,
    pub finding_count: usize,
    pub focus_area_count: usize,
}

impl DerivedDisplay {
    pub fn from_submission(submission: &AuditSubmission) -> Self {
        let scope_tags: Vec<&'static str> = ProcedureScope::ALL
            .into_iter()
            .filter(|scope| scope.selected_by(submission))
            .map(ProcedureScope::label)
            .collect();

        let has_specialized_procedures = !scope_tags.is_empty();
        let scope_summary = if has_specialized_procedures {
            scope_tags.join(", ")
        } else {
            STANDARD_PROCESSING.to_string()
        };

        let audit_type_label = if submission.audit_types.is_empty() {
            OPERATIONAL_REVIEW.to_string()
        } else {
            submission
                .audit_types
                .iter()
                .map(|audit_type| audit_type.label())
                .collect::<Vec<_>>()
                .join(", ")
        };

        Self {
            scope_tags,
            scope_summary,
            has_specialized_procedures,
            audit_type_label,
            interval_count: submission.date_intervals.len(),
            finding_count: reportable_findings(submission).count(),
            focus_area_count: submission.areas_of_focus.len(),
        }
    }

    /// Title for the document header and summary lines.
    pub fn review_title(&self, submission: &AuditSubmission) -> String {
        if submission.audit_types.is_empty() {
            self.audit_type_label.clone()
        } else {
            format!("{} {}", self.audit_type_label, OPERATIONAL_REVIEW)
        }
    }
}

/// Non-blank findings, trimmed. `has_findings` is not consulted.
pub fn reportable_findings(submission: &AuditSubmission) -> impl Iterator<Item = &str> {
    submission
        .findings
        .iter()
        .map(|finding| finding.trim())
        .filter(|finding| !finding.is_empty())
}
