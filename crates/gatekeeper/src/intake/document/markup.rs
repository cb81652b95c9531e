use std::fmt::{self, Write};

/// Writes the wrapped text with HTML special characters escaped.
///
/// Safe in element content and in double- or single-quoted attribute values.
#[derive(Debug, Clone, Copy)]
pub struct Escaped<'a>(pub &'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.0;
        while let Some(index) = rest.find(|c: char| matches!(c, '&' | '<' | '>' | '"' | '\'')) {
            f.write_str(&rest[..index])?;
            let entity = match rest.as_bytes()[index] {
                b'&' => "&amp;",
                b'<' => "&lt;",
                b'>' => "&gt;",
                b'"' => "&quot;",
                _ => "&#39;",
            };
            f.write_str(entity)?;
            rest = &rest[index + 1..];
        }
        f.write_str(rest)
    }
}

pub fn escape_html(raw: &str) -> String {
    Escaped(raw).to_string()
}

/// Trimmed text of an optional field, or `None` when absent or blank.
pub(super) fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

pub(super) fn section_open(out: &mut dyn Write, title: &str) -> fmt::Result {
    write!(
        out,
        "<div class=\"section\"><h2 class=\"section-title\">{}</h2>",
        Escaped(title)
    )
}

pub(super) fn section_close(out: &mut dyn Write) -> fmt::Result {
    out.write_str("</div>")
}

/// Label/value row. `value` must already be markup.
pub(super) fn info_row(out: &mut dyn Write, label: &str, value: fmt::Arguments<'_>) -> fmt::Result {
    write!(
        out,
        "<div class=\"info-row\"><div class=\"label\">{}</div><div class=\"value\">",
        Escaped(label)
    )?;
    out.write_fmt(value)?;
    out.write_str("</div></div>")
}

pub(super) fn notice(out: &mut dyn Write, class: &str, text: &str) -> fmt::Result {
    write!(out, "<p class=\"notice {class}\">{}</p>", Escaped(text))
}

/// Inline stylesheet; mail clients do not fetch external resources.
pub(super) const STYLESHEET: &str = "\
body{margin:0;padding:32px 16px;background:#f4f1fb;color:#1e293b;\
font-family:-apple-system,'Segoe UI',Roboto,Helvetica,Arial,sans-serif;line-height:1.6}\
.container{max-width:680px;margin:0 auto;background:#fff;border-radius:16px;overflow:hidden;\
border:1px solid #e9e3f7}\
.header{background:#5b4bc4;color:#fff;padding:36px 32px;text-align:center}\
.header-badge{display:inline-block;padding:6px 16px;border-radius:999px;\
border:1px solid rgba(255,255,255,.4);font-size:11px;font-weight:700;letter-spacing:2px;\
text-transform:uppercase}\
.header h1{margin:12px 0 0;font-size:26px}\
.section{padding:28px 32px;border-bottom:1px solid #f1edf9}\
.section-title{margin:0 0 16px;font-size:12px;font-weight:800;letter-spacing:1.5px;\
text-transform:uppercase;color:#5b4bc4}\
.info-row{display:table;width:100%;padding:8px 0;border-bottom:1px solid #f5f3fa}\
.label{display:table-cell;width:38%;font-size:12px;font-weight:700;color:#64748b;\
text-transform:uppercase}\
.value{display:table-cell;font-size:14px}\
.value a{color:#5b4bc4;text-decoration:none;font-weight:600}\
.pill,.scope-tag{display:inline-block;padding:4px 12px;border-radius:999px;font-size:12px;\
font-weight:700}\
.pill{background:#ede9fe;color:#5b4bc4}\
.scope-tag{background:#059669;color:#fff;margin:0 6px 6px 0}\
.date-item{padding:10px 14px;margin-bottom:8px;border-left:4px solid #10b981;\
background:#f0fdf4;color:#047857;font-weight:600}\
.stats{display:table;width:100%;margin-bottom:16px}\
.stat{display:table-cell;text-align:center;padding:12px;background:#f5f3ff}\
.stat-value{display:block;font-size:22px;font-weight:800;color:#4338ca}\
.stat-label{font-size:11px;text-transform:uppercase;color:#64748b}\
.highlight-box{margin-top:16px;padding:16px 20px;border-left:4px solid #5b4bc4;\
border-radius:8px;background:#f5f3ff}\
.highlight-box strong{display:block;margin-bottom:8px;font-size:13px;text-transform:uppercase}\
.concerns{padding:16px 20px;border-left:4px solid #ef4444;background:#fef2f2;border-radius:8px}\
.additional{margin-top:12px;padding:16px 20px;border-left:4px solid #3b82f6;\
background:#eff6ff;border-radius:8px}\
.notice{margin:8px 0 0;font-weight:600}\
.notice.ok{color:#059669}\
.notice.muted{color:#64748b}\
ul{margin:8px 0 0;padding-left:20px}\
.footer{padding:24px 32px;text-align:center;background:#1e293b;color:#cbd5e1;font-size:12px}\
.footer-brand{margin-top:6px;font-size:11px;letter-spacing:2px;text-transform:uppercase;\
opacity:.7}";
