//! Human-readable report layout.

use console::Style;
use cutcheck_core::{FieldStatus, PipelineState, SubmissionSpec, ValidationReport};

struct Palette {
    ok: Style,
    warn: Style,
    error: Style,
    dim: Style,
    bold: Style,
}

impl Palette {
    fn new(colors: bool) -> Self {
        let base = Style::new().force_styling(colors);
        Self {
            ok: base.clone().green(),
            warn: base.clone().yellow(),
            error: base.clone().red(),
            dim: base.clone().dim(),
            bold: base.bold(),
        }
    }
}

/// Render one report as a block of lines.
pub fn render_report(report: &ValidationReport, spec: &SubmissionSpec, colors: bool) -> String {
    let p = Palette::new(colors);
    let mut out = String::new();

    out.push_str(&format!(
        "{} {}\n",
        p.bold.apply_to(&report.file_name),
        p.dim
            .apply_to(format!("[{} {}x{}]", spec.id, spec.width, spec.height))
    ));

    for row in &report.fields {
        let (mark, style) = match row.status {
            FieldStatus::Ok => ("✓", &p.ok),
            FieldStatus::Warn => ("!", &p.warn),
            FieldStatus::Error => ("✗", &p.error),
            FieldStatus::Neutral => (" ", &p.dim),
        };
        let mut line = format!(
            "  {} {:<11} {}",
            style.apply_to(mark),
            row.label(),
            style.apply_to(&row.value)
        );
        if let Some(note) = &row.note {
            line.push_str(&format!("  {}", p.dim.apply_to(format!("({note})"))));
        }
        out.push_str(&line);
        out.push('\n');
    }

    if let Some(tally) = &report.tally {
        out.push_str(&format!(
            "  {}\n",
            p.dim.apply_to(format!(
                "pixels: {} mono, {} color, {} transparent",
                tally.mono, tally.color, tally.alpha
            ))
        ));
    }

    for advisory in &report.advisories {
        out.push_str(&format!("  {} {}\n", p.warn.apply_to("!"), advisory));
    }

    let verdict = if report.can_submit() {
        p.ok.apply_to("ready to submit".to_string())
    } else if report.state == PipelineState::RejectedFormat {
        p.error.apply_to("rejected: only PNG and PSD files are accepted".to_string())
    } else {
        p.error.apply_to("blocked: fix the errors above and resubmit".to_string())
    };
    out.push_str(&format!("  → {verdict}\n"));
    out
}

/// The out-of-band notice shown when a layered document never finishes decoding.
pub fn render_timeout(file: &str, timeout_ms: u64, colors: bool) -> String {
    let p = Palette::new(colors);
    format!(
        "{} {}\n  {} {}\n",
        p.bold.apply_to(file),
        p.error.apply_to("✗ could not be read"),
        p.error.apply_to("→"),
        format_args!(
            "the layered document did not finish loading within {:.1}s; \
             re-save it and submit again",
            timeout_ms as f64 / 1000.0
        )
    )
}
