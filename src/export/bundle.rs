//! Zip bundle of a recorded session: the markup document, its screenshots
//! and the step manifest, laid out exactly as on disk.

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::{friendly_write_error, validate_write_access, ExportError};
use crate::recorder::session::{locate_markup, SCREENSHOT_DIR};
use crate::recorder::storage::MANIFEST_FILE_NAME;

/// Default archive path: `<session_dir>.zip` next to the session directory.
pub fn default_bundle_path(session_dir: &Path) -> PathBuf {
    session_dir.with_extension("zip")
}

pub fn write_bundle(session_dir: &Path, output_path: &Path) -> Result<PathBuf, ExportError> {
    let markup_path = locate_markup(session_dir)
        .map_err(|source| ExportError::Read {
            path: session_dir.to_path_buf(),
            source,
        })?
        .ok_or_else(|| ExportError::MarkupNotFound(session_dir.to_path_buf()))?;

    let mut entries: Vec<(String, PathBuf)> = Vec::new();
    if let Some(name) = markup_path.file_name().and_then(|n| n.to_str()) {
        entries.push((name.to_string(), markup_path.clone()));
    }
    let manifest = session_dir.join(MANIFEST_FILE_NAME);
    if manifest.is_file() {
        entries.push((MANIFEST_FILE_NAME.to_string(), manifest));
    }
    entries.extend(screenshot_entries(&session_dir.join(SCREENSHOT_DIR)));

    let estimated_bytes: u64 = entries
        .iter()
        .filter_map(|(_, path)| fs::metadata(path).ok())
        .map(|meta| meta.len())
        .sum();
    validate_write_access(output_path, estimated_bytes).map_err(ExportError::Write)?;

    let opts = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let buf: Vec<u8> = {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, path) in &entries {
            let data = fs::read(path).map_err(|source| ExportError::Read {
                path: path.clone(),
                source,
            })?;
            zip.start_file(name.as_str(), opts)?;
            zip.write_all(&data)
                .map_err(|e| ExportError::Write(format!("Failed to write {name}: {e}")))?;
        }
        zip.finish()?.into_inner()
    };

    fs::write(output_path, buf)
        .map_err(|e| ExportError::Write(friendly_write_error(&e, output_path)))?;
    log::info!(
        "Bundled {} files into {}",
        entries.len(),
        output_path.display()
    );
    Ok(output_path.to_path_buf())
}

fn screenshot_entries(dir: &Path) -> Vec<(String, PathBuf)> {
    let Ok(read_dir) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut entries: Vec<(String, PathBuf)> = read_dir
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?.to_string();
            Some((format!("{SCREENSHOT_DIR}/{name}"), path))
        })
        .collect();
    entries.sort();
    entries
}
