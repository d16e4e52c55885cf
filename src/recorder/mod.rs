pub mod annotate;
pub mod capture;
pub mod coords;
#[cfg(feature = "desktop")]
pub mod desktop;
pub mod input_event;
pub mod listener;
pub mod markup;
pub mod ocr;
pub mod pipeline;
pub mod session;
pub mod state;
pub mod storage;
pub mod typed_text;
pub mod types;
pub mod window_info;
