use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::export::pdf::RenderOptions;
use crate::recorder::annotate::MarkerStyle;
use crate::recorder::listener::DEFAULT_CHANNEL_CAPACITY;
use crate::recorder::ocr::RegionPolicy;
use crate::recorder::pipeline::CaptureSettings;

const APP_DIR: &str = "screenscribe";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("no configuration directory on this platform")]
    NoConfigDir,
    #[error("failed to access settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    #[serde(flatten)]
    pub region: RegionPolicy,
    pub tesseract_path: PathBuf,
    pub language: String,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            region: RegionPolicy::default(),
            tesseract_path: PathBuf::from("tesseract"),
            language: "eng".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub wkhtmltopdf_path: PathBuf,
    #[serde(flatten)]
    pub options: RenderOptions,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            wkhtmltopdf_path: PathBuf::from("wkhtmltopdf"),
            options: RenderOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub capture: CaptureSettings,
    pub marker: MarkerStyle,
    pub ocr: OcrSettings,
    pub render: RenderSettings,
    pub channel_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            capture: CaptureSettings::default(),
            marker: MarkerStyle::default(),
            ocr: OcrSettings::default(),
            render: RenderSettings::default(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl Settings {
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
            .ok_or(SettingsError::NoConfigDir)
    }

    /// Missing file → defaults. Unparsable file → defaults with a warning.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match serde_json::from_str(&contents) {
            Ok(settings) => Ok(settings),
            Err(err) => {
                log::warn!(
                    "Ignoring unreadable settings {}: {err}",
                    path.display()
                );
                Ok(Self::default())
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized).map_err(io_err)
    }
}
