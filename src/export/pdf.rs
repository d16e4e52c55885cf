use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub page_size: String,
    pub margins_mm: u32,
    pub dpi: u32,
    /// JPEG quality for embedded screenshots (1-100).
    pub image_quality: u8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_size: "A4".to_string(),
            margins_mm: 15,
            dpi: 96,
            image_quality: 85,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("PDF renderer not found at \"{0}\"; install wkhtmltopdf or set render.wkhtmltopdf_path")]
    EngineNotFound(String),
    #[error("PDF renderer failed (status={status:?}): {stderr}")]
    EngineFailed { status: Option<i32>, stderr: String },
    #[error("PDF renderer produced no output")]
    EmptyOutput,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Turns the HTML page built from a markup document into PDF bytes.
pub trait Renderer: Send {
    fn render(&self, html: &str, options: &RenderOptions) -> Result<Vec<u8>, RenderError>;
}

impl<T: Renderer + ?Sized> Renderer for Box<T> {
    fn render(&self, html: &str, options: &RenderOptions) -> Result<Vec<u8>, RenderError> {
        (**self).render(html, options)
    }
}

/// Pipes HTML through `wkhtmltopdf - -`.
#[derive(Debug, Clone)]
pub struct WkhtmltopdfRenderer {
    executable: PathBuf,
}

impl WkhtmltopdfRenderer {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    fn args(options: &RenderOptions) -> Vec<String> {
        let margin = format!("{}mm", options.margins_mm);
        let mut args: Vec<String> = vec![
            "--quiet".into(),
            "--encoding".into(),
            "utf-8".into(),
            "--page-size".into(),
            options.page_size.clone(),
        ];
        for side in ["--margin-top", "--margin-bottom", "--margin-left", "--margin-right"] {
            args.push(side.into());
            args.push(margin.clone());
        }
        args.extend([
            "--dpi".into(),
            options.dpi.to_string(),
            "--image-quality".into(),
            options.image_quality.clamp(1, 100).to_string(),
            "--enable-local-file-access".into(),
            "-".into(),
            "-".into(),
        ]);
        args
    }
}

impl Renderer for WkhtmltopdfRenderer {
    fn render(&self, html: &str, options: &RenderOptions) -> Result<Vec<u8>, RenderError> {
        let mut child = Command::new(&self.executable)
            .args(Self::args(options))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => {
                    RenderError::EngineNotFound(self.executable.display().to_string())
                }
                _ => RenderError::Io(e),
            })?;

        // Feed stdin from a separate thread so a full stdout pipe cannot
        // deadlock the child.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "renderer stdin closed"))?;
        let input = html.to_owned();
        let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;
        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(RenderError::Io(e)),
            Err(_) => {
                return Err(RenderError::Io(io::Error::other("renderer input thread panicked")))
            }
        }

        if !output.status.success() {
            return Err(RenderError::EngineFailed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if output.stdout.is_empty() {
            return Err(RenderError::EmptyOutput);
        }
        Ok(output.stdout)
    }
}
