//! Click marker drawn onto step screenshots.

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use super::types::Point;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    pub radius: u32,
    pub thickness: u32,
    pub color: [u8; 3],
    /// Alpha of the inner fill; 0 disables it.
    pub fill_alpha: u8,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: 18,
            thickness: 3,
            color: [255, 59, 48],
            fill_alpha: 56,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("image has no pixels")]
    EmptyImage,
    #[error("invalid marker style: {0}")]
    InvalidStyle(&'static str),
}

/// Draw a ring (and optional translucent fill) centred on `point`.
///
/// Pixels outside the image are clipped, so any point is accepted. On error
/// the image is left untouched.
pub fn annotate(
    image: &mut RgbaImage,
    point: Point,
    style: &MarkerStyle,
) -> Result<(), AnnotationError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(AnnotationError::EmptyImage);
    }
    if style.radius == 0 {
        return Err(AnnotationError::InvalidStyle("radius must be positive"));
    }
    if style.thickness == 0 {
        return Err(AnnotationError::InvalidStyle("thickness must be positive"));
    }

    let radius = style.radius as f64;
    let half = style.thickness as f64 / 2.0;
    let reach = (style.radius + style.thickness) as i64;
    let cx = point.x as i64;
    let cy = point.y as i64;

    let x0 = (cx - reach).max(0);
    let x1 = (cx + reach).min(width as i64 - 1);
    let y0 = (cy - reach).max(0);
    let y1 = (cy + reach).min(height as i64 - 1);
    if x0 > x1 || y0 > y1 {
        return Ok(());
    }

    let [r, g, b] = style.color;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = (x - cx) as f64;
            let dy = (y - cy) as f64;
            let distance = (dx * dx + dy * dy).sqrt();
            let pixel = image.get_pixel_mut(x as u32, y as u32);
            if (distance - radius).abs() <= half {
                *pixel = Rgba([r, g, b, 255]);
            } else if distance < radius - half && style.fill_alpha > 0 {
                blend(pixel, style.color, style.fill_alpha);
            }
        }
    }

    Ok(())
}

fn blend(pixel: &mut Rgba<u8>, color: [u8; 3], alpha: u8) {
    let a = alpha as u32;
    for channel in 0..3 {
        let base = pixel[channel] as u32;
        pixel[channel] = ((color[channel] as u32 * a + base * (255 - a)) / 255) as u8;
    }
}
