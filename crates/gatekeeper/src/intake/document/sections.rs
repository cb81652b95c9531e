//! One fragment writer per document section.
//!
//! Every writer is a pure function of the submission and its derived display
//! values; the assembler in the parent module decides the order.

use std::fmt::{self, Write};

use super::fallback;
use super::markup::{info_row, notice, present, section_close, section_open, Escaped, STYLESHEET};
use crate::intake::display::{reportable_findings, DerivedDisplay};
use crate::intake::submission::AuditSubmission;

pub(super) type SectionWriter =
    fn(&mut dyn Write, &AuditSubmission, &DerivedDisplay) -> fmt::Result;

pub(super) fn document_head(
    out: &mut dyn Write,
    submission: &AuditSubmission,
    display: &DerivedDisplay,
) -> fmt::Result {
    write!(
        out,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\
         <title>{} | {}</title><style>{}</style></head><body><div class=\"container\">",
        Escaped(&display.review_title(submission)),
        Escaped(&submission.facility_name),
        STYLESHEET
    )
}

pub(super) fn header(
    out: &mut dyn Write,
    submission: &AuditSubmission,
    display: &DerivedDisplay,
) -> fmt::Result {
    write!(
        out,
        "<div class=\"header\"><div class=\"header-badge\">New Service Request</div><h1>{}</h1></div>",
        Escaped(&display.review_title(submission))
    )
}

pub(super) fn facility(
    out: &mut dyn Write,
    submission: &AuditSubmission,
    _display: &DerivedDisplay,
) -> fmt::Result {
    section_open(out, "Facility Information")?;
    info_row(
        out,
        "Facility",
        format_args!("<strong>{}</strong>", Escaped(&submission.facility_name)),
    )?;
    info_row(
        out,
        "Address",
        format_args!("{}", Escaped(&submission.facility_address)),
    )?;
    info_row(
        out,
        "System",
        format_args!("{}", Escaped(system_label(submission))),
    )?;
    info_row(
        out,
        "Trauma Level",
        format_args!("<span class=\"pill\">{}</span>", Escaped(&submission.trauma_level)),
    )?;
    section_close(out)
}

pub(super) fn requested_windows(
    out: &mut dyn Write,
    submission: &AuditSubmission,
    _display: &DerivedDisplay,
) -> fmt::Result {
    section_open(out, "Requested Windows")?;
    if submission.date_intervals.is_empty() {
        notice(out, "muted", fallback::NO_WINDOWS)?;
    }
    for interval in &submission.date_intervals {
        write!(
            out,
            "<div class=\"date-item\">{} to {}</div>",
            Escaped(&interval.start),
            Escaped(&interval.end)
        )?;
    }
    section_close(out)
}

pub(super) fn point_of_contact(
    out: &mut dyn Write,
    submission: &AuditSubmission,
    _display: &DerivedDisplay,
) -> fmt::Result {
    section_open(out, "Point of Contact")?;
    info_row(
        out,
        "Contact",
        format_args!(
            "<strong>{}</strong> ({})",
            Escaped(&submission.contact_name),
            Escaped(&submission.contact_title)
        ),
    )?;
    let email = Escaped(&submission.contact_email);
    info_row(out, "Email", format_args!("<a href=\"mailto:{email}\">{email}</a>"))?;
    info_row(
        out,
        "Phone",
        format_args!("{}", Escaped(&submission.contact_phone)),
    )?;
    info_row(
        out,
        "Reporting To",
        format_args!("{}", Escaped(&submission.reporting_to)),
    )?;
    section_close(out)
}

pub(super) fn operations(
    out: &mut dyn Write,
    submission: &AuditSubmission,
    display: &DerivedDisplay,
) -> fmt::Result {
    section_open(out, "Operations & Scope")?;

    out.write_str("<div class=\"stats\">")?;
    for (value, label) in [
        (&submission.staff_ft_w_fmla, "Full-Time Staff (incl. FMLA)"),
        (&submission.staff_pt, "Part-Time Staff"),
        (&submission.staff_pd, "Per Diem Staff"),
        (&submission.staff_travelers, "Travelers"),
    ] {
        write!(
            out,
            "<div class=\"stat\"><span class=\"stat-value\">{}</span><span class=\"stat-label\">{}</span></div>",
            Escaped(value),
            label
        )?;
    }
    out.write_str("</div>")?;

    info_row(
        out,
        "Hours of Operation",
        format_args!("{}", Escaped(&submission.hours_operation)),
    )?;
    info_row(
        out,
        "Main ORs",
        format_args!("<strong>{} Operating Rooms</strong>", Escaped(&submission.or_count)),
    )?;
    info_row(
        out,
        "Clinics",
        format_args!("{}", Escaped(&submission.clinic_count)),
    )?;
    info_row(
        out,
        "Processing Scope",
        format_args!("{}", Escaped(&display.scope_summary)),
    )?;
    match tracking_label(submission) {
        TrackingLabel::Named(name) => {
            info_row(out, "Tracking System", format_args!("{}", Escaped(name)))?
        }
        TrackingLabel::Unnamed => info_row(
            out,
            "Tracking System",
            format_args!("{}", fallback::TRACKING_UNNAMED),
        )?,
        TrackingLabel::Absent => info_row(
            out,
            "Tracking System",
            format_args!("<span class=\"notice muted\">{}</span>", fallback::NO_TRACKING),
        )?,
    }

    specialized_procedures(out, display)?;
    section_close(out)
}

fn specialized_procedures(out: &mut dyn Write, display: &DerivedDisplay) -> fmt::Result {
    out.write_str("<div class=\"highlight-box\">")?;
    if display.has_specialized_procedures {
        out.write_str("<strong>Specialized Procedures</strong><div class=\"scope-tags\">")?;
        for tag in &display.scope_tags {
            write!(out, "<span class=\"scope-tag\">{}</span>", Escaped(tag))?;
        }
        out.write_str("</div>")?;
    } else {
        notice(out, "muted", &fallback::standard_processing_only())?;
    }
    out.write_str("</div>")
}

pub(super) fn areas_of_focus(
    out: &mut dyn Write,
    submission: &AuditSubmission,
    _display: &DerivedDisplay,
) -> fmt::Result {
    if submission.areas_of_focus.is_empty() {
        return Ok(());
    }

    section_open(out, "Areas of Focus")?;
    out.write_str("<ul class=\"focus-list\">")?;
    for area in &submission.areas_of_focus {
        write!(out, "<li>{}</li>", Escaped(area))?;
    }
    out.write_str("</ul>")?;
    section_close(out)
}

pub(super) fn notes(
    out: &mut dyn Write,
    submission: &AuditSubmission,
    _display: &DerivedDisplay,
) -> fmt::Result {
    section_open(out, "Pain Points & Additional Notes")?;
    write!(
        out,
        "<div class=\"concerns\"><strong>Primary Concerns</strong><p>{}</p></div>",
        Escaped(&submission.pain_points)
    )?;
    out.write_str("<div class=\"additional\"><strong>Additional Information</strong>")?;
    match present(submission.additional_info.as_deref()) {
        Some(info) => write!(out, "<p>{}</p>", Escaped(info))?,
        None => notice(out, "muted", fallback::NO_ADDITIONAL_INFO)?,
    }
    out.write_str("</div>")?;
    section_close(out)
}

pub(super) fn regulatory_history(
    out: &mut dyn Write,
    submission: &AuditSubmission,
    display: &DerivedDisplay,
) -> fmt::Result {
    section_open(out, "Regulatory History")?;
    info_row(
        out,
        "Accreditor",
        format_args!("<strong>{}</strong>", Escaped(&submission.accrediting_name)),
    )?;
    info_row(
        out,
        "Last Audit",
        format_args!("{}", Escaped(&submission.last_audit_date)),
    )?;

    out.write_str("<div class=\"highlight-box\"><strong>Past Audit Findings</strong>")?;
    if display.finding_count == 0 {
        notice(out, "ok", fallback::NO_FINDINGS)?;
    } else {
        out.write_str("<ul class=\"findings-list\">")?;
        for finding in reportable_findings(submission) {
            write!(out, "<li>{}</li>", Escaped(finding))?;
        }
        out.write_str("</ul>")?;
    }
    out.write_str("</div>")?;
    section_close(out)
}

pub(super) fn footer(
    out: &mut dyn Write,
    _submission: &AuditSubmission,
    _display: &DerivedDisplay,
) -> fmt::Result {
    out.write_str(
        "<div class=\"footer\">\
         <div>This is an automated notification from the Pre-Audit Assessment Portal</div>\
         <div class=\"footer-brand\">Crown Point Consulting</div>\
         </div></div></body></html>",
    )
}

fn system_label(submission: &AuditSubmission) -> &str {
    if !submission.is_affiliated {
        return fallback::INDEPENDENT;
    }
    present(submission.system_name.as_deref()).unwrap_or(fallback::SYSTEM_UNNAMED)
}

enum TrackingLabel<'a> {
    Named(&'a str),
    Unnamed,
    Absent,
}

fn tracking_label(submission: &AuditSubmission) -> TrackingLabel<'_> {
    if !submission.has_tracking {
        return TrackingLabel::Absent;
    }
    match present(submission.tracking_system_name.as_deref()) {
        Some(name) => TrackingLabel::Named(name),
        None => TrackingLabel::Unnamed,
    }
}
