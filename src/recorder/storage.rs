use super::types::Step;
use std::{
    io,
    path::{Path, PathBuf},
};

pub const MANIFEST_FILE_NAME: &str = "steps.json";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to write step manifest: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize step manifest: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn write_steps(dir: &Path, steps: &[Step]) -> Result<PathBuf, StorageError> {
    let json = serde_json::to_string_pretty(steps)?;
    let path = dir.join(MANIFEST_FILE_NAME);
    std::fs::write(&path, json)?;
    Ok(path)
}

pub fn read_steps(dir: &Path) -> Result<Vec<Step>, StorageError> {
    let contents = std::fs::read_to_string(dir.join(MANIFEST_FILE_NAME))?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn writes_steps_json() {
        let dir = tempdir().expect("tempdir");
        let mut second = Step::sample();
        second.index = 2;
        second.recognized_text = None;
        let steps = vec![Step::sample(), second];

        let path = write_steps(dir.path(), &steps).expect("write steps");
        assert_eq!(path, dir.path().join("steps.json"));

        let contents = fs::read_to_string(path).expect("read steps.json");
        let parsed: Vec<Step> = serde_json::from_str(&contents).expect("parse steps");
        assert_eq!(steps, parsed);
        assert_eq!(read_steps(dir.path()).expect("read back"), steps);
    }

    #[test]
    fn missing_manifest_is_io_error() {
        let dir = tempdir().expect("tempdir");
        assert!(matches!(read_steps(dir.path()), Err(StorageError::Io(_))));
    }
}
