//! Text recognition around a click point.
//!
//! The crop around the click is binarized before it is handed to the OCR
//! engine: UI chrome turns white and dark glyphs turn black. Anti-aliased or
//! coloured text may be lost, which is accepted.

use std::io;
use std::path::PathBuf;
use std::process::Command;

use image::{GrayImage, Luma, RgbaImage};
use serde::{Deserialize, Serialize};

use super::types::Point;

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR engine not found at \"{0}\"; install Tesseract or set ocr.tesseract_path")]
    EngineNotFound(String),
    #[error("OCR engine failed (status={status:?}): {stderr}")]
    EngineFailed { status: Option<i32>, stderr: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// OCR collaborator.
pub trait TextRecognizer: Send {
    fn recognize(&self, image: &GrayImage) -> Result<String, OcrError>;
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for Box<T> {
    fn recognize(&self, image: &GrayImage) -> Result<String, OcrError> {
        (**self).recognize(image)
    }
}

/// Runs the `tesseract` command line tool on a temporary PNG.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    executable: PathBuf,
    language: String,
}

impl TesseractCli {
    pub fn new(executable: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            language: language.into(),
        }
    }
}

impl TextRecognizer for TesseractCli {
    fn recognize(&self, image: &GrayImage) -> Result<String, OcrError> {
        let input = tempfile::Builder::new()
            .prefix("screenscribe-ocr-")
            .suffix(".png")
            .tempfile()?;
        image.save(input.path())?;

        // psm 6: a single uniform block of text
        let output = Command::new(&self.executable)
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg("6")
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => {
                    OcrError::EngineNotFound(self.executable.display().to_string())
                }
                _ => OcrError::Io(e),
            })?;

        if !output.status.success() {
            return Err(OcrError::EngineFailed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionPolicy {
    /// Half-size of the box around the click.
    pub margin: u32,
    /// Size a degenerate box is widened to.
    pub min_width: u32,
    pub min_height: u32,
    /// Gray values below this become black.
    pub threshold: u8,
}

impl Default for RegionPolicy {
    fn default() -> Self {
        Self {
            margin: 60,
            min_width: 100,
            min_height: 40,
            threshold: 128,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextOutcome {
    Text(String),
    Empty,
    Failed(String),
}

impl TextOutcome {
    pub fn into_text(self) -> Option<String> {
        match self {
            TextOutcome::Text(text) => Some(text),
            TextOutcome::Empty | TextOutcome::Failed(_) => None,
        }
    }
}

/// Box of `margin` around `point`, clamped to the image. A box that collapses
/// after clamping is rebuilt at the policy minimum around the point and kept
/// inside the image.
/// Returns `None` only for an image without pixels.
pub fn crop_box(width: u32, height: u32, point: Point, policy: &RegionPolicy) -> Option<CropBox> {
    if width == 0 || height == 0 {
        return None;
    }

    let (w, h) = (width as i64, height as i64);
    let (px, py) = (point.x as i64, point.y as i64);
    let margin = policy.margin as i64;

    let mut x0 = (px - margin).clamp(0, w);
    let mut x1 = (px + margin).clamp(0, w);
    let mut y0 = (py - margin).clamp(0, h);
    let mut y1 = (py + margin).clamp(0, h);

    // Only a collapsed axis is rebuilt at the minimum size; the box slides
    // back inside the image instead of being cut at the edge.
    if x1 <= x0 {
        let min_w = (policy.min_width as i64).max(1);
        x0 = (px - min_w / 2).clamp(0, (w - min_w).max(0));
        x1 = (x0 + min_w).min(w);
    }
    if y1 <= y0 {
        let min_h = (policy.min_height as i64).max(1);
        y0 = (py - min_h / 2).clamp(0, (h - min_h).max(0));
        y1 = (y0 + min_h).min(h);
    }

    Some(CropBox {
        x: x0 as u32,
        y: y0 as u32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    })
}

/// Grayscale then binary threshold of one region.
pub fn binarize(image: &RgbaImage, region: CropBox, threshold: u8) -> GrayImage {
    let crop = image::imageops::crop_imm(image, region.x, region.y, region.width, region.height)
        .to_image();
    let gray = image::DynamicImage::ImageRgba8(crop).into_luma8();
    let (width, height) = gray.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let value = gray.get_pixel(x, y)[0];
        Luma([if value < threshold { 0 } else { 255 }])
    })
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub struct RegionTextExtractor<R> {
    recognizer: R,
    policy: RegionPolicy,
    engine_missing_reported: bool,
}

impl<R: TextRecognizer> RegionTextExtractor<R> {
    pub fn new(recognizer: R, policy: RegionPolicy) -> Self {
        Self {
            recognizer,
            policy,
            engine_missing_reported: false,
        }
    }

    /// Recognize text near `point`. Never fails: OCR errors become
    /// `TextOutcome::Failed` and are logged.
    pub fn extract(&mut self, image: &RgbaImage, point: Point) -> TextOutcome {
        let Some(region) = crop_box(image.width(), image.height(), point, &self.policy) else {
            return TextOutcome::Empty;
        };
        let prepared = binarize(image, region, self.policy.threshold);

        match self.recognizer.recognize(&prepared) {
            Ok(raw) => {
                let text = normalize_whitespace(&raw);
                if text.is_empty() {
                    TextOutcome::Empty
                } else {
                    TextOutcome::Text(text)
                }
            }
            Err(OcrError::EngineNotFound(path)) => {
                if !self.engine_missing_reported {
                    log::error!("OCR disabled: engine not found at {path}");
                    self.engine_missing_reported = true;
                } else {
                    log::debug!("OCR skipped: engine not found at {path}");
                }
                TextOutcome::Failed(format!("engine not found at {path}"))
            }
            Err(err) => {
                log::warn!("Text recognition failed near ({}, {}): {err}", point.x, point.y);
                TextOutcome::Failed(err.to_string())
            }
        }
    }
}
