use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::Settings;
use crate::export::bundle::{default_bundle_path, write_bundle};
use crate::export::pdf::WkhtmltopdfRenderer;
use crate::export::{export_html, spawn_export, ExportJob, ExportProgress, ExportRequest};

#[derive(Parser, Debug)]
#[command(
    name = "screenscribe",
    version,
    about = "Record installation steps as annotated screenshots and export them to PDF"
)]
pub struct Cli {
    /// Settings file (default: <config dir>/screenscribe/settings.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record clicks and keystrokes until Enter is pressed in this terminal
    Record(RecordArgs),
    /// Render a recorded markup document to PDF
    Export(ExportArgs),
    /// Zip a session directory (markup, screenshots, manifest)
    Bundle(BundleArgs),
    /// Print the effective settings and where they are read from
    Settings(SettingsArgs),
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Working directory; each session gets its own timestamped folder inside
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,
    /// Downsample captures wider than this many pixels
    #[arg(long)]
    pub max_width: Option<u32>,
    /// Tesseract executable
    #[arg(long)]
    pub tesseract: Option<PathBuf>,
    /// OCR language code
    #[arg(long)]
    pub lang: Option<String>,
    /// Export the session to PDF right after stopping
    #[arg(long, action = ArgAction::SetTrue)]
    pub pdf: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Markup document to export
    pub markdown: PathBuf,
    /// Output file (default: installation_steps.pdf next to the document)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// Write the intermediate HTML page instead of a PDF
    #[arg(long, action = ArgAction::SetTrue)]
    pub html: bool,
    #[command(flatten)]
    pub render: RenderArgs,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// wkhtmltopdf executable
    #[arg(long)]
    pub wkhtmltopdf: Option<PathBuf>,
    /// Page size understood by wkhtmltopdf (A4, Letter, ...)
    #[arg(long)]
    pub page_size: Option<String>,
    #[arg(long)]
    pub dpi: Option<u32>,
    /// JPEG quality of embedded screenshots (1-100)
    #[arg(long)]
    pub quality: Option<u8>,
}

#[derive(Args, Debug)]
pub struct BundleArgs {
    pub session_dir: PathBuf,
    /// Output archive (default: <session_dir>.zip)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SettingsArgs {
    /// Write the effective settings back to the settings file
    #[arg(long, action = ArgAction::SetTrue)]
    pub save: bool,
}

impl RenderArgs {
    fn apply(&self, settings: &mut Settings) {
        if let Some(path) = &self.wkhtmltopdf {
            settings.render.wkhtmltopdf_path = path.clone();
        }
        if let Some(size) = &self.page_size {
            settings.render.options.page_size = size.clone();
        }
        if let Some(dpi) = self.dpi {
            settings.render.options.dpi = dpi;
        }
        if let Some(quality) = self.quality {
            settings.render.options.image_quality = quality;
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let settings_path = match cli.config {
        Some(path) => path,
        None => Settings::default_path()?,
    };
    let mut settings = Settings::load(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;

    match cli.command {
        Commands::Record(args) => {
            if let Some(width) = args.max_width {
                settings.capture.max_width = Some(width);
            }
            if let Some(path) = &args.tesseract {
                settings.ocr.tesseract_path = path.clone();
            }
            if let Some(lang) = &args.lang {
                settings.ocr.language = lang.clone();
            }
            record(&settings, &args.dir, args.pdf)
        }
        Commands::Export(args) => {
            args.render.apply(&mut settings);
            let request =
                ExportRequest::new(args.markdown.clone(), args.output.clone(), settings.render.options.clone());
            if args.html {
                let mut request = request;
                if args.output.is_none() {
                    request.output_path = request.markup_path.with_extension("html");
                }
                let out = export_html(&request)?;
                println!("{}", out.display());
                return Ok(());
            }
            let renderer = WkhtmltopdfRenderer::new(&settings.render.wkhtmltopdf_path);
            let job = spawn_export(request, renderer).context("Failed to start export")?;
            let out = follow_export(job)?;
            println!("{}", out.display());
            Ok(())
        }
        Commands::Bundle(args) => {
            let output = args
                .output
                .unwrap_or_else(|| default_bundle_path(&args.session_dir));
            let out = write_bundle(&args.session_dir, &output)?;
            println!("{}", out.display());
            Ok(())
        }
        Commands::Settings(args) => {
            if args.save {
                settings
                    .save(&settings_path)
                    .with_context(|| format!("Failed to save settings to {}", settings_path.display()))?;
                log::info!("Saved settings to {}", settings_path.display());
            }
            println!("# {}", settings_path.display());
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

/// Print progress to stderr until the job ends.
fn follow_export(job: ExportJob) -> Result<PathBuf> {
    for progress in job.progress().iter() {
        match progress {
            ExportProgress::Reading => eprintln!("Reading {}", job.markup_path().display()),
            ExportProgress::Rendering => eprintln!("Rendering PDF..."),
            ExportProgress::Writing => eprintln!("Writing..."),
            ExportProgress::Finished(_) => eprintln!("Done."),
            ExportProgress::Cancelled => eprintln!("Cancelled."),
            ExportProgress::Failed(reason) => eprintln!("Export failed: {reason}"),
        }
    }
    Ok(job.wait()?)
}

#[cfg(feature = "desktop")]
fn record(settings: &Settings, dir: &Path, export_pdf: bool) -> Result<()> {
    use crate::controller::Recorder;
    use crate::recorder::desktop::{RdevInput, XcapCapture};
    use crate::recorder::ocr::{RegionTextExtractor, TesseractCli};
    use crate::recorder::pipeline::StepRecorder;

    let ocr = TesseractCli::new(&settings.ocr.tesseract_path, settings.ocr.language.clone());
    let steps = StepRecorder::new(
        XcapCapture,
        RegionTextExtractor::new(ocr, settings.ocr.region.clone()),
        settings.capture.clone(),
        settings.marker.clone(),
    );
    let mut recorder = Recorder::new(steps, RdevInput, settings.channel_capacity);

    let root = recorder.start(dir)?;
    println!("Recording into {}", root.display());
    println!("Press Enter to stop.");
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;

    let session = recorder.stop()?;
    println!(
        "Recorded {} steps in {}",
        session.steps().len(),
        session.root_directory().display()
    );

    if export_pdf {
        let request = ExportRequest::for_session(&session, settings.render.options.clone());
        let renderer = WkhtmltopdfRenderer::new(&settings.render.wkhtmltopdf_path);
        recorder.export(request, renderer)?;
        for result in recorder.wait_for_exports() {
            let out = result?;
            println!("{}", out.display());
        }
    }
    Ok(())
}

#[cfg(not(feature = "desktop"))]
fn record(_settings: &Settings, _dir: &Path, _export_pdf: bool) -> Result<()> {
    anyhow::bail!("recording needs the `desktop` feature; rebuild with `--features desktop`")
}
