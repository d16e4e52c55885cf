//! Mapping between global screen coordinates and positions inside a captured
//! window image.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use super::types::Point;

/// A window capture after the optional max-width resample.
#[derive(Debug, Clone)]
pub struct ScaledCapture {
    pub image: RgbaImage,
    pub original_width: u32,
    pub original_height: u32,
    /// `resampled_width / original_width`; 1.0 when the image was kept as is.
    pub scale: f64,
}

impl ScaledCapture {
    pub fn was_resampled(&self) -> bool {
        self.image.width() != self.original_width
    }
}

/// Convert a global pointer position into the local coordinate space of a
/// capture whose top-left corner sits at `window_origin`.
pub fn to_local(global: Point, window_origin: Point, scale: f64) -> Point {
    let dx = (global.x - window_origin.x) as f64;
    let dy = (global.y - window_origin.y) as f64;
    Point::new((dx * scale).round() as i32, (dy * scale).round() as i32)
}

/// Shrink `image` to `max_width` (aspect ratio kept) when it is wider.
pub fn downsample(image: RgbaImage, max_width: Option<u32>) -> ScaledCapture {
    let (width, height) = image.dimensions();
    let target = match max_width {
        Some(max) if max > 0 && width > max => max,
        _ => {
            return ScaledCapture {
                image,
                original_width: width,
                original_height: height,
                scale: 1.0,
            }
        }
    };

    let scale = target as f64 / width as f64;
    let target_height = ((height as f64 * scale).round() as u32).max(1);
    let resized = imageops::resize(&image, target, target_height, FilterType::Triangle);

    ScaledCapture {
        image: resized,
        original_width: width,
        original_height: height,
        scale,
    }
}

/// Clamp a local point into `[0, width) x [0, height)`.
pub fn clamp_to_image(point: Point, width: u32, height: u32) -> Point {
    let max_x = width.saturating_sub(1) as i32;
    let max_y = height.saturating_sub(1) as i32;
    Point::new(point.x.clamp(0, max_x), point.y.clamp(0, max_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_local_without_scale_is_plain_offset() {
        let local = to_local(Point::new(120, 80), Point::new(100, 50), 1.0);
        assert_eq!(local, Point::new(20, 30));
    }

    #[test]
    fn to_local_handles_points_left_of_window() {
        let local = to_local(Point::new(90, 40), Point::new(100, 50), 1.0);
        assert_eq!(local, Point::new(-10, -10));
    }

    #[test]
    fn to_local_applies_scale_with_rounding() {
        let local = to_local(Point::new(301, 150), Point::new(100, 50), 0.5);
        // 201 * 0.5 = 100.5 rounds away from zero
        assert_eq!(local, Point::new(101, 50));
    }

    #[test]
    fn scaled_mapping_matches_unscaled_times_factor() {
        let origin = Point::new(37, -12);
        for scale in [0.25, 0.5, 0.6667, 0.8, 1.0] {
            for (gx, gy) in [(37, -12), (100, 100), (1919, 1079), (-200, 50), (640, 3)] {
                let global = Point::new(gx, gy);
                let scaled = to_local(global, origin, scale);
                let unit = to_local(global, origin, 1.0);
                let expected_x = unit.x as f64 * scale;
                let expected_y = unit.y as f64 * scale;
                assert!((scaled.x as f64 - expected_x).abs() <= 0.5 + f64::EPSILON);
                assert!((scaled.y as f64 - expected_y).abs() <= 0.5 + f64::EPSILON);
            }
        }
    }

    #[test]
    fn downsample_keeps_narrow_images() {
        let capture = downsample(RgbaImage::new(800, 600), Some(1280));
        assert_eq!(capture.scale, 1.0);
        assert_eq!(capture.image.dimensions(), (800, 600));
        assert!(!capture.was_resampled());
    }

    #[test]
    fn downsample_without_policy_keeps_size() {
        let capture = downsample(RgbaImage::new(4000, 100), None);
        assert_eq!(capture.scale, 1.0);
        assert_eq!(capture.image.width(), 4000);
    }

    #[test]
    fn downsample_shrinks_wide_images_and_reports_scale() {
        let capture = downsample(RgbaImage::new(2560, 1440), Some(1280));
        assert_eq!(capture.image.dimensions(), (1280, 720));
        assert!((capture.scale - 0.5).abs() < 1e-9);
        assert_eq!(capture.original_width, 2560);
        assert_eq!(capture.original_height, 1440);
        assert!(capture.was_resampled());
    }

    #[test]
    fn downsample_never_produces_zero_height() {
        let capture = downsample(RgbaImage::new(4000, 1), Some(100));
        assert_eq!(capture.image.dimensions(), (100, 1));
    }

    #[test]
    fn clamp_to_image_pulls_points_inside() {
        assert_eq!(clamp_to_image(Point::new(-5, 900), 800, 600), Point::new(0, 599));
        assert_eq!(clamp_to_image(Point::new(10, 20), 800, 600), Point::new(10, 20));
    }
}
