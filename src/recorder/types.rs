use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One recorded click. Written to the markup document once and never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub index: u32,
    pub ts: i64,
    pub window_title: String,
    /// Click position inside the saved screenshot, after any resampling.
    pub click_point: Point,
    pub recognized_text: Option<String>,
    pub typed_text: Option<String>,
    /// Path of the screenshot relative to the session root.
    pub image_path: String,
    /// False when the marker could not be drawn and the raw capture was kept.
    pub annotated: bool,
}

impl Step {
    #[cfg(test)]
    pub fn sample() -> Self {
        Self {
            index: 1,
            ts: 0,
            window_title: "Setup - Example App".to_string(),
            click_point: Point::new(20, 30),
            recognized_text: Some("Next".to_string()),
            typed_text: None,
            image_path: "screenshots/step_1.png".to_string(),
            annotated: true,
        }
    }
}
