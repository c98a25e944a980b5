//! The `cutcheck check` command.

mod render;
pub mod types;

pub use types::OutputFormat;

use clap::Args;
use console::style;
use cutcheck_core::pipeline::{format_bytes, FileDiscovery};
use cutcheck_core::{Checker, Config, PipelineError, ReportWriter, Session};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Arguments for the `check` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Image file or directory to check
    #[arg(required = true)]
    pub input: PathBuf,

    /// Submission profile to check against (see `cutcheck profiles`)
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Channel difference still treated as gray
    #[arg(short, long)]
    pub tolerance: Option<u8>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not attach a preview image to JSON output
    #[arg(long)]
    pub no_preview: bool,
}

/// Where finished reports go.
enum Sink {
    Text { out: Box<dyn Write>, colors: bool },
    Machine(ReportWriter<Box<dyn Write>>),
}

impl Sink {
    fn open(args: &CheckArgs) -> anyhow::Result<Self> {
        let (out, colors): (Box<dyn Write>, bool) = match &args.output {
            Some(path) => {
                let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
                (Box::new(BufWriter::new(File::create(expanded)?)), false)
            }
            None => (Box::new(std::io::stdout()), console::colors_enabled()),
        };
        Ok(match args.format.core() {
            None => Sink::Text { out, colors },
            Some(format) => Sink::Machine(ReportWriter::new(out, format, true)),
        })
    }
}

/// Apply command-line overrides to the loaded config.
fn apply_overrides(args: &CheckArgs, config: &mut Config) -> anyhow::Result<()> {
    if let Some(profile) = &args.profile {
        config.select_profile(profile)?;
    }
    if let Some(tolerance) = args.tolerance {
        config.pixels.tolerance = tolerance;
    }
    // the text layout never shows a preview
    if args.no_preview || args.format == OutputFormat::Text {
        config.preview.enabled = false;
    }
    Ok(())
}

/// Execute the check command.
///
/// Returns `true` when every checked file may be submitted.
pub async fn execute(args: CheckArgs, mut config: Config) -> anyhow::Result<bool> {
    if !args.input.exists() {
        anyhow::bail!(
            "Input path does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            args.input
        );
    }
    apply_overrides(&args, &mut config)?;

    let files = FileDiscovery::discover(&args.input);
    if files.is_empty() {
        tracing::warn!("No PNG or PSD files found at {:?}", args.input);
        return Ok(true);
    }
    tracing::info!(
        "Found {} file(s) to check ({})",
        files.len(),
        format_bytes(FileDiscovery::total_size(&files), 2)
    );

    let mut session = Session::new(Checker::new(&config)?);
    let spec = session.spec().clone();
    let mut sink = Sink::open(&args)?;
    let mut blocked = 0usize;

    for file in &files {
        let name = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.path.display().to_string());

        let bytes = match tokio::fs::read(&file.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                blocked += 1;
                tracing::error!("Failed to read {:?}: {}", file.path, e);
                continue;
            }
        };

        match session.submit_file(&name, bytes).await {
            Ok(report) => {
                if !report.can_submit() {
                    blocked += 1;
                }
                match &mut sink {
                    Sink::Text { out, colors } => {
                        write!(out, "{}", render::render_report(report, &spec, *colors))?;
                        writeln!(out)?;
                    }
                    Sink::Machine(writer) => writer.push(report)?,
                }
            }
            Err(PipelineError::DecodeTimeout { file, timeout_ms }) => {
                blocked += 1;
                eprint!(
                    "{}",
                    render::render_timeout(&file, timeout_ms, console::colors_enabled_stderr())
                );
            }
            Err(e) => {
                blocked += 1;
                tracing::error!("Failed: {:?} - {}", file.path, e);
            }
        }
    }

    match sink {
        Sink::Text { mut out, .. } => out.flush()?,
        Sink::Machine(writer) => {
            writer.finish()?;
        }
    }

    if let Some(path) = &args.output {
        tracing::info!("Output written to {:?}", path);
    }

    let checked = files.len();
    let summary = format!("{checked} file(s) checked, {blocked} blocked");
    if blocked == 0 {
        eprintln!("{}", style(summary).green().for_stderr());
    } else {
        eprintln!("{}", style(summary).red().for_stderr());
    }

    Ok(blocked == 0)
}
