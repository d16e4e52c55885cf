use super::state::RecorderStateError;
use super::storage::{write_steps, StorageError};
use super::typed_text::TypedTextBuffer;
use super::types::Step;
use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const SCREENSHOT_DIR: &str = "screenshots";
pub const PDF_FILE_NAME: &str = "installation_steps.pdf";
const MARKUP_PREFIX: &str = "installation_steps_";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    State(#[from] RecorderStateError),
    #[error("failed to prepare session directory: {0}")]
    Io(#[from] io::Error),
}

/// One start..stop span: a timestamped directory, its markup document and
/// the state that must never leak into the next session.
#[derive(Debug)]
pub struct RecordingSession {
    root_directory: PathBuf,
    screenshot_directory: PathBuf,
    markup_path: PathBuf,
    step_counter: u32,
    pending_text: TypedTextBuffer,
    steps: Vec<Step>,
}

impl RecordingSession {
    pub fn create(working_directory: &Path) -> io::Result<Self> {
        Self::create_at(working_directory, Local::now())
    }

    pub fn create_at(working_directory: &Path, now: DateTime<Local>) -> io::Result<Self> {
        let timestamp = now.format("%Y%m%d_%H%M%S").to_string();
        fs::create_dir_all(working_directory)?;

        let root_directory = create_unique_dir(working_directory, &format!("session_{timestamp}"))?;
        let screenshot_directory = root_directory.join(SCREENSHOT_DIR);
        fs::create_dir_all(&screenshot_directory)?;
        let markup_path = root_directory.join(format!("{MARKUP_PREFIX}{timestamp}.md"));

        Ok(Self {
            root_directory,
            screenshot_directory,
            markup_path,
            step_counter: 1,
            pending_text: TypedTextBuffer::new(),
            steps: Vec::new(),
        })
    }

    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    pub fn screenshot_directory(&self) -> &Path {
        &self.screenshot_directory
    }

    pub fn markup_path(&self) -> &Path {
        &self.markup_path
    }

    pub fn pdf_path(&self) -> PathBuf {
        self.root_directory.join(PDF_FILE_NAME)
    }

    /// Index the next recorded step will get.
    pub fn step_counter(&self) -> u32 {
        self.step_counter
    }

    pub fn screenshot_path(&self, index: u32) -> PathBuf {
        self.screenshot_directory.join(screenshot_file_name(index))
    }

    pub fn relative_image_path(&self, index: u32) -> String {
        format!("{SCREENSHOT_DIR}/{}", screenshot_file_name(index))
    }

    pub fn pending_text(&self) -> &TypedTextBuffer {
        &self.pending_text
    }

    pub fn pending_text_mut(&mut self) -> &mut TypedTextBuffer {
        &mut self.pending_text
    }

    /// Append a finished step and advance the counter.
    pub fn record_step(&mut self, step: Step) {
        debug_assert_eq!(step.index, self.step_counter);
        self.steps.push(step);
        self.step_counter += 1;
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Drop unflushed typed text, returning how many characters were lost.
    pub fn discard_pending_text(&mut self) -> usize {
        let lost = self.pending_text.len();
        self.pending_text.flush();
        lost
    }

    pub fn write_manifest(&self) -> Result<PathBuf, StorageError> {
        write_steps(&self.root_directory, &self.steps)
    }
}

fn screenshot_file_name(index: u32) -> String {
    format!("step_{index}.png")
}

/// Create `base/name`, or `base/name_2`, `base/name_3`... if taken.
fn create_unique_dir(base: &Path, name: &str) -> io::Result<PathBuf> {
    let mut suffix = 1;
    loop {
        let candidate = if suffix == 1 {
            base.join(name)
        } else {
            base.join(format!("{name}_{suffix}"))
        };
        match fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => suffix += 1,
            Err(e) => return Err(e),
        }
    }
}

/// Find the markup document inside a session directory.
pub fn locate_markup(root: &Path) -> io::Result<Option<PathBuf>> {
    let mut found: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some("md")
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(MARKUP_PREFIX))
        })
        .collect();
    found.sort();
    Ok(found.pop())
}
