pub mod bundle;
pub mod encoding;
pub mod helpers;
pub mod html;
pub mod pdf;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::recorder::session::{RecordingSession, PDF_FILE_NAME};
use encoding::read_markup;
use pdf::{RenderError, RenderOptions, Renderer};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unreadable file: {0}")]
    Unreadable(PathBuf),
    #[error("no markup document found in {0}")]
    MarkupNotFound(PathBuf),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("{0}")]
    Write(String),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("export cancelled")]
    Cancelled,
    #[error("export worker panicked")]
    Worker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportProgress {
    Reading,
    Rendering,
    Writing,
    Finished(PathBuf),
    Cancelled,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub markup_path: PathBuf,
    pub output_path: PathBuf,
    pub options: RenderOptions,
}

impl ExportRequest {
    /// Without an explicit output the PDF lands next to the markup document.
    pub fn new(markup_path: PathBuf, output_path: Option<PathBuf>, options: RenderOptions) -> Self {
        let output_path = output_path.unwrap_or_else(|| {
            markup_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(PDF_FILE_NAME)
        });
        Self {
            markup_path,
            output_path,
            options,
        }
    }

    pub fn for_session(session: &RecordingSession, options: RenderOptions) -> Self {
        Self {
            markup_path: session.markup_path().to_path_buf(),
            output_path: session.pdf_path(),
            options,
        }
    }

    /// Directory relative image paths resolve against.
    pub fn base_dir(&self) -> &Path {
        self.markup_path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Turn an IO error into a user-friendly message.
pub fn friendly_write_error(e: &io::Error, path: &Path) -> String {
    let path = path.display();
    match e.kind() {
        io::ErrorKind::PermissionDenied => {
            format!("Cannot save to \"{path}\": permission denied. Is the file open in another app or the folder read-only?")
        }
        io::ErrorKind::NotFound => {
            format!("The folder for \"{path}\" does not exist.")
        }
        _ if e.raw_os_error() == Some(28) /* ENOSPC */ => {
            "Not enough disk space to save the file.".to_string()
        }
        _ => format!("Could not save file: {e}"),
    }
}

/// Pre-validate that we can write to `output_path` before doing expensive work.
///
/// Checks: parent dir writable (tempfile probe), existing file writable,
/// sufficient disk space.
pub fn validate_write_access(output_path: &Path, estimated_bytes: u64) -> Result<(), String> {
    let parent = match output_path.parent() {
        Some(p) if p.as_os_str().is_empty() => Path::new("."),
        Some(p) => p,
        None => {
            return Err(format!(
                "Invalid output path: \"{}\"",
                output_path.display()
            ))
        }
    };

    if !parent.exists() {
        return Err(format!(
            "The folder \"{}\" does not exist.",
            parent.display()
        ));
    }

    // Probe writability: create a temp file in the same directory
    let probe_path = parent.join(format!(".screenscribe_probe_{}", std::process::id()));
    match std::fs::File::create(&probe_path) {
        Ok(_) => {
            let _ = std::fs::remove_file(&probe_path);
        }
        Err(e) => {
            let _ = std::fs::remove_file(&probe_path);
            return Err(match e.kind() {
                io::ErrorKind::PermissionDenied => format!(
                    "Cannot write to folder \"{}\": permission denied.",
                    parent.display()
                ),
                _ => format!("Cannot write to folder \"{}\": {e}", parent.display()),
            });
        }
    }

    // If target file exists, verify it is writable (opens without truncating)
    if output_path.exists() {
        if let Err(e) = std::fs::OpenOptions::new().write(true).open(output_path) {
            return Err(match e.kind() {
                io::ErrorKind::PermissionDenied => format!(
                    "Cannot overwrite \"{}\": the file is read-only or locked.",
                    output_path.display()
                ),
                _ => format!("Cannot write to \"{}\": {e}", output_path.display()),
            });
        }
    }

    if let Ok(avail) = available_disk_space(parent) {
        const MIN_BUFFER: u64 = 10 * 1024 * 1024; // 10 MB safety margin
        let needed = estimated_bytes + MIN_BUFFER;
        if avail < needed {
            let need_mb = needed / (1024 * 1024);
            let have_mb = avail / (1024 * 1024);
            return Err(format!(
                "Not enough disk space. Need ~{need_mb} MB, but only {have_mb} MB available."
            ));
        }
    }

    Ok(())
}

/// Returns available disk space in bytes for the filesystem containing `path`.
#[cfg(unix)]
pub fn available_disk_space(path: &Path) -> io::Result<u64> {
    use std::os::unix::ffi::OsStrExt;
    let c_path = std::ffi::CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
    let ret = unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) };
    if ret != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(stat.f_bavail as u64 * stat.f_frsize as u64)
}

#[cfg(not(unix))]
pub fn available_disk_space(_path: &Path) -> io::Result<u64> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "disk space query not supported on this platform",
    ))
}

/// Build the HTML intermediate for a markup document.
pub fn render_html(request: &ExportRequest) -> Result<String, ExportError> {
    let decoded = read_markup(&request.markup_path)?;
    Ok(html::generate(
        &decoded.text,
        request.base_dir(),
        request.options.image_quality,
    ))
}

/// Write the HTML intermediate itself instead of a PDF.
pub fn export_html(request: &ExportRequest) -> Result<PathBuf, ExportError> {
    let content = render_html(request)?;
    validate_write_access(&request.output_path, content.len() as u64)
        .map_err(ExportError::Write)?;
    std::fs::write(&request.output_path, content)
        .map_err(|e| ExportError::Write(friendly_write_error(&e, &request.output_path)))?;
    Ok(request.output_path.clone())
}

/// Render `request` to PDF on the calling thread.
///
/// `cancel` is checked before the renderer is invoked; a render in progress
/// always runs to completion. Every call ends with exactly one terminal
/// progress report.
pub fn export_document<R: Renderer + ?Sized>(
    request: &ExportRequest,
    renderer: &R,
    cancel: &AtomicBool,
    progress: &dyn Fn(ExportProgress),
) -> Result<PathBuf, ExportError> {
    let result = run_export(request, renderer, cancel, progress);
    match &result {
        Ok(path) => {
            log::info!("Exported {}", path.display());
            progress(ExportProgress::Finished(path.clone()));
        }
        Err(ExportError::Cancelled) => {
            log::info!("Export of {} cancelled", request.markup_path.display());
            progress(ExportProgress::Cancelled);
        }
        Err(err) => {
            log::error!("Export of {} failed: {err}", request.markup_path.display());
            progress(ExportProgress::Failed(err.to_string()));
        }
    }
    result
}

fn run_export<R: Renderer + ?Sized>(
    request: &ExportRequest,
    renderer: &R,
    cancel: &AtomicBool,
    progress: &dyn Fn(ExportProgress),
) -> Result<PathBuf, ExportError> {
    progress(ExportProgress::Reading);
    let html = render_html(request)?;

    // Rendered PDFs are usually no larger than the page with embedded images.
    validate_write_access(&request.output_path, html.len() as u64)
        .map_err(ExportError::Write)?;

    if cancel.load(Ordering::SeqCst) {
        return Err(ExportError::Cancelled);
    }
    progress(ExportProgress::Rendering);
    let pdf = renderer.render(&html, &request.options)?;

    progress(ExportProgress::Writing);
    std::fs::write(&request.output_path, pdf)
        .map_err(|e| ExportError::Write(friendly_write_error(&e, &request.output_path)))?;
    Ok(request.output_path.clone())
}

/// An export running on its own worker thread.
pub struct ExportJob {
    markup_path: PathBuf,
    cancel: Arc<AtomicBool>,
    progress: Receiver<ExportProgress>,
    handle: JoinHandle<Result<PathBuf, ExportError>>,
}

impl ExportJob {
    pub fn markup_path(&self) -> &Path {
        &self.markup_path
    }

    /// Request cancellation; honoured only if rendering has not begun.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn progress(&self) -> &Receiver<ExportProgress> {
        &self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn wait(self) -> Result<PathBuf, ExportError> {
        self.handle.join().map_err(|_| ExportError::Worker)?
    }
}

pub fn spawn_export<R: Renderer + 'static>(
    request: ExportRequest,
    renderer: R,
) -> io::Result<ExportJob> {
    let cancel = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel();
    let markup_path = request.markup_path.clone();

    let worker_cancel = cancel.clone();
    let handle = std::thread::Builder::new()
        .name("export".into())
        .spawn(move || {
            let report = |p: ExportProgress| {
                let _ = tx.send(p);
            };
            export_document(&request, &renderer, &worker_cancel, &report)
        })?;

    Ok(ExportJob {
        markup_path,
        cancel,
        progress: rx,
        handle,
    })
}
