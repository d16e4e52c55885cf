use image::RgbaImage;

use super::window_info::{WindowBounds, WindowInfo};

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("invalid region x={x} y={y} w={w} h={h}")]
    InvalidRegion { x: i32, y: i32, w: u32, h: u32 },
    #[error("capture backend failed: {0}")]
    Backend(String),
}

impl CaptureError {
    pub fn invalid_region(bounds: &WindowBounds) -> Self {
        CaptureError::InvalidRegion {
            x: bounds.x,
            y: bounds.y,
            w: bounds.width,
            h: bounds.height,
        }
    }
}

/// Screen capture collaborator.
pub trait ScreenCapture: Send {
    /// The focused window, or `None` when nothing can be resolved.
    fn active_window(&self) -> Option<WindowInfo>;

    /// Pixels of `region` in global screen coordinates.
    fn capture(&self, region: &WindowBounds) -> Result<RgbaImage, CaptureError>;
}

impl<T: ScreenCapture + ?Sized> ScreenCapture for Box<T> {
    fn active_window(&self) -> Option<WindowInfo> {
        (**self).active_window()
    }

    fn capture(&self, region: &WindowBounds) -> Result<RgbaImage, CaptureError> {
        (**self).capture(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_region_displays_bounds() {
        let err = CaptureError::invalid_region(&WindowBounds {
            x: 1,
            y: 2,
            width: 0,
            height: 4,
        });
        assert_eq!(err.to_string(), "invalid region x=1 y=2 w=0 h=4");
    }
}
