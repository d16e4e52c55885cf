//! The per-session Markdown document. Blocks are only ever appended; the
//! file is opened for each write and closed again.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::typed_text::KeyMarker;
use super::types::Step;

pub const DOCUMENT_TITLE: &str = "Software Installation Steps";

#[derive(Debug, Clone)]
pub struct MarkupDocument {
    path: PathBuf,
}

impl MarkupDocument {
    /// Create (or truncate) the document and write its header.
    pub fn create(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let mut file = File::create(&path)?;
        write!(file, "# {DOCUMENT_TITLE}\n\n")?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one block. A document removed mid-session is recreated with
    /// its header.
    pub fn append(&self, block: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if file.metadata()?.len() == 0 {
            write!(file, "# {DOCUMENT_TITLE}\n\n")?;
        }
        file.write_all(block.as_bytes())?;
        if !block.ends_with('\n') {
            file.write_all(b"\n")?;
        }
        file.write_all(b"\n")
    }

    pub fn append_step(&self, step: &Step) -> io::Result<()> {
        self.append(&step_block(step))
    }

    pub fn append_typed(&self, text: &str) -> io::Result<()> {
        self.append(&typed_block(text))
    }

    pub fn append_marker(&self, marker: &KeyMarker) -> io::Result<()> {
        self.append(&marker_block(marker))
    }
}

pub fn step_block(step: &Step) -> String {
    let title = escape_inline(&step.window_title);
    let mut block = format!("## Step {}: {}", step.index, title)
        .trim_end()
        .to_string();
    block.push_str("\n\n");

    if let Some(text) = step.recognized_text.as_deref().filter(|t| !t.is_empty()) {
        block.push_str(&format!("Clicked on: **{}**\n\n", escape_inline(text)));
    }
    if let Some(text) = step.typed_text.as_deref().filter(|t| !t.is_empty()) {
        block.push_str(&format!("**Typed:** {}\n\n", escape_inline(text)));
    }

    block.push_str(&format!("![Step {}]({})\n", step.index, step.image_path));
    block
}

pub fn typed_block(text: &str) -> String {
    format!("**Typed:** {}\n", escape_inline(text))
}

pub fn marker_block(marker: &KeyMarker) -> String {
    format!("**Pressed:** {}\n", escape_inline(&marker.0))
}

/// Backslash-escape characters that would otherwise change inline Markdown
/// formatting, and fold line breaks into spaces so a block stays one line.
pub fn escape_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '>' => {
                out.push('\\');
                out.push(c);
            }
            '\r' | '\n' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}
