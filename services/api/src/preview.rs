use clap::Args;
use gatekeeper::error::AppError;
use gatekeeper::intake::{preview, AuditPreview};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    /// JSON audit request to render (`-` reads standard input)
    pub(crate) input: PathBuf,
    /// Write the rendered HTML here instead of standard output
    #[arg(long, short)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_preview(args: PreviewArgs) -> Result<(), AppError> {
    let PreviewArgs { input, output } = args;

    let body = read_input(&input)?;
    let rendered = preview(&body)?;

    match output {
        Some(path) => {
            fs::write(&path, rendered.document.as_str())?;
            eprintln!("Wrote {} bytes to {}", rendered.document.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.document.as_str().as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    eprint!("{}", summary(&rendered));
    Ok(())
}

fn read_input(input: &Path) -> Result<Vec<u8>, AppError> {
    if input.as_os_str() == "-" {
        let mut body = Vec::new();
        io::stdin().lock().read_to_end(&mut body)?;
        Ok(body)
    } else {
        Ok(fs::read(input)?)
    }
}

fn summary(rendered: &AuditPreview) -> String {
    let display = &rendered.display;
    format!(
        "Subject: {}\nAudit types: {}\nScope: {}\nWindows: {} | Findings listed: {} | Focus areas: {}\n",
        rendered.subject,
        display.audit_type_label,
        display.scope_summary,
        display.interval_count,
        display.finding_count,
        display.focus_area_count,
    )
}
