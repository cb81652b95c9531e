use std::fmt;

use serde::{Deserialize, Serialize};

/// Requested on-site audit window. Dates are display strings and are never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DateInterval {
    pub start: String,
    pub end: String,
}

/// Audit programs a facility can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditType {
    #[serde(rename = "CSSD")]
    Cssd,
    Endoscopy,
    Dental,
}

impl AuditType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cssd => "CSSD",
            Self::Endoscopy => "Endoscopy",
            Self::Dental => "Dental",
        }
    }
}

impl fmt::Display for AuditType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Audit request submitted through the intake form.
///
/// The schema is closed: any field not declared here rejects the whole record.
/// Numeric-looking values (staff counts, room counts) stay free-form strings and
/// no cross-field consistency is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct AuditSubmission {
    pub date_intervals: Vec<DateInterval>,
    pub audit_types: Vec<AuditType>,
    pub facility_name: String,
    pub facility_address: String,
    pub is_affiliated: bool,
    #[serde(default)]
    pub system_name: Option<String>,
    pub trauma_level: String,

    pub contact_name: String,
    pub contact_title: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub reporting_to: String,

    pub accrediting_name: String,
    pub last_audit_date: String,
    pub has_findings: bool,
    pub findings: Vec<String>,

    pub staff_ft_w_fmla: String,
    pub staff_pt: String,
    pub staff_pd: String,
    pub staff_travelers: String,
    pub hours_operation: String,
    pub or_count: String,
    pub clinic_count: String,

    pub proc_endoscopes: bool,
    pub proc_vascular: bool,
    pub proc_arthroscopic: bool,
    pub proc_robotic: bool,
    pub proc_tee: bool,

    pub has_tracking: bool,
    #[serde(default)]
    pub tracking_system_name: Option<String>,

    pub pain_points: String,
    #[serde(default)]
    pub additional_info: Option<String>,
    #[serde(default)]
    pub areas_of_focus: Vec<String>,
    /// Honeypot populated only by form-filling bots. Never rendered.
    #[serde(default)]
    pub bot_check: Option<String>,
}

impl AuditSubmission {
    /// Decode and validate a raw JSON request body.
    pub fn from_slice(body: &[u8]) -> Result<Self, ValidationError> {
        serde_json::from_slice(body).map_err(ValidationError::from)
    }

    /// Validate an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        serde_json::from_value(value).map_err(ValidationError::from)
    }

    /// True when the honeypot field carries anything other than whitespace.
    pub fn honeypot_tripped(&self) -> bool {
        self.bot_check
            .as_deref()
            .is_some_and(|value| !value.trim().is_empty())
    }
}

/// Broad class of a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCategory {
    /// Body is not well-formed JSON.
    Syntax,
    /// Well-formed JSON that does not match the schema.
    Data,
    /// Body ended before a complete value was read.
    Eof,
}

/// Inbound record rejected before any rendering or dispatch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid audit request: {message}")]
pub struct ValidationError {
    pub category: ValidationCategory,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        let category = match err.classify() {
            Category::Syntax | Category::Io => ValidationCategory::Syntax,
            Category::Data => ValidationCategory::Data,
            Category::Eof => ValidationCategory::Eof,
        };

        Self {
            category,
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}
