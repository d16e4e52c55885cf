//! Capture pipeline that turns input events into documented steps.
//!
//! For every qualifying click:
//! - resolve the active window and capture it
//! - map the global click into the (possibly resampled) image
//! - draw the marker and save the screenshot
//! - recognize text around the click
//! - drain typed text and append one block to the markup document
//!
//! Failures in any of these stages skip or degrade the step; they never end
//! the session.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::annotate::{annotate, MarkerStyle};
use super::capture::{CaptureError, ScreenCapture};
use super::coords::{clamp_to_image, downsample, to_local, ScaledCapture};
use super::input_event::{ClickEvent, InputEvent, Key};
use super::markup::MarkupDocument;
use super::ocr::{RegionTextExtractor, TextRecognizer};
use super::session::{RecordingSession, SessionError};
use super::state::RecorderState;
use super::typed_text::KeyEffect;
use super::types::Step;

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Captures wider than this are resampled down; `None` keeps full size.
    pub max_width: Option<u32>,
}

/// Why a click did not produce a step. The step counter is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum StepSkip {
    #[error("not recording")]
    NotRecording,
    #[error("button release")]
    ButtonReleased,
    #[error("no active window")]
    NoActiveWindow,
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),
    #[error("failed to save screenshot {path}: {source}")]
    Screenshot {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to append to markup document: {0}")]
    Markup(#[source] io::Error),
}

pub struct StepRecorder<C, R> {
    capture: C,
    extractor: RegionTextExtractor<R>,
    capture_settings: CaptureSettings,
    marker: MarkerStyle,
    state: RecorderState,
    session: Option<RecordingSession>,
    markup: Option<MarkupDocument>,
}

impl<C: ScreenCapture, R: TextRecognizer> StepRecorder<C, R> {
    pub fn new(
        capture: C,
        extractor: RegionTextExtractor<R>,
        capture_settings: CaptureSettings,
        marker: MarkerStyle,
    ) -> Self {
        Self {
            capture,
            extractor,
            capture_settings,
            marker,
            state: RecorderState::new(),
            session: None,
            markup: None,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.state.is_recording()
    }

    pub fn session(&self) -> Option<&RecordingSession> {
        self.session.as_ref()
    }

    /// Index the next step will get, while recording.
    pub fn step_counter(&self) -> Option<u32> {
        self.session.as_ref().map(RecordingSession::step_counter)
    }

    /// Begin a fresh session beneath `working_directory`.
    pub fn start(&mut self, working_directory: &Path) -> Result<&RecordingSession, SessionError> {
        self.state.start()?;
        let prepared = RecordingSession::create(working_directory).and_then(|session| {
            MarkupDocument::create(session.markup_path()).map(|markup| (session, markup))
        });
        let (session, markup) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => {
                let _ = self.state.stop();
                return Err(err.into());
            }
        };

        log::info!(
            "Recording started in {}",
            session.root_directory().display()
        );
        self.markup = Some(markup);
        Ok(&*self.session.insert(session))
    }

    /// End the session, discarding unflushed typed text and writing the step
    /// manifest. Returns the finished session.
    pub fn stop(&mut self) -> Result<RecordingSession, SessionError> {
        self.state.stop()?;
        self.markup = None;
        let Some(mut session) = self.session.take() else {
            return Err(SessionError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "no active session",
            )));
        };

        let discarded = session.discard_pending_text();
        if discarded > 0 {
            log::info!("Discarded {discarded} unflushed typed characters on stop");
        }

        match session.write_manifest() {
            Ok(path) => log::debug!("Wrote step manifest {}", path.display()),
            Err(err) => log::warn!("Step manifest not written: {err}"),
        }

        log::info!(
            "Recording stopped after {} steps",
            session.steps().len()
        );
        Ok(session)
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::Click(click) => match self.on_click(&click) {
                Ok(step) => log::info!("Recorded step {}", step.index),
                Err(StepSkip::NotRecording | StepSkip::ButtonReleased) => {}
                Err(skip @ StepSkip::NoActiveWindow) => {
                    log::warn!(
                        "Click at ({}, {}) skipped: {skip}",
                        click.point.x,
                        click.point.y
                    )
                }
                Err(skip) => log::error!(
                    "Click at ({}, {}) skipped: {skip}",
                    click.point.x,
                    click.point.y
                ),
            },
            InputEvent::KeyDown(key) => {
                self.on_key_press(&key);
            }
        }
    }

    /// Build, persist and document one step for a button press.
    pub fn on_click(&mut self, click: &ClickEvent) -> Result<Step, StepSkip> {
        let (Some(session), Some(markup)) = (self.session.as_mut(), self.markup.as_ref()) else {
            log::debug!("Click ignored while not recording");
            return Err(StepSkip::NotRecording);
        };
        if !click.pressed {
            return Err(StepSkip::ButtonReleased);
        }

        let window = self
            .capture
            .active_window()
            .ok_or(StepSkip::NoActiveWindow)?;
        if window.bounds.is_empty() {
            return Err(CaptureError::invalid_region(&window.bounds).into());
        }
        let raw = self.capture.capture(&window.bounds)?;

        let scaled = downsample(raw, self.capture_settings.max_width);
        if scaled.was_resampled() {
            log::debug!(
                "Capture resampled from {}px to {}px wide",
                scaled.original_width,
                scaled.image.width()
            );
        }
        let ScaledCapture { image, scale, .. } = scaled;
        if !window.bounds.contains(click.point) {
            log::debug!(
                "Click at ({}, {}) is outside \"{}\"; clamping to its edge",
                click.point.x,
                click.point.y,
                window.title
            );
        }
        let local = to_local(click.point, window.bounds.origin(), scale);
        let local = clamp_to_image(local, image.width(), image.height());

        let index = session.step_counter();
        let screenshot_path = session.screenshot_path(index);

        let mut marked = image.clone();
        let annotated = match annotate(&mut marked, local, &self.marker) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Step {index}: keeping unannotated screenshot ({err})");
                false
            }
        };
        let saved = if annotated { &marked } else { &image };
        if let Err(source) = saved.save(&screenshot_path) {
            let _ = std::fs::remove_file(&screenshot_path);
            return Err(StepSkip::Screenshot {
                path: screenshot_path,
                source,
            });
        }

        // Failures are logged by the extractor and leave the text empty.
        let recognized_text = self.extractor.extract(&image, local).into_text();

        // Drained only once the block is on disk, so a failed append keeps it.
        let typed = session.pending_text().peek().to_string();
        let step = Step {
            index,
            ts: click.timestamp_ms,
            window_title: window.title,
            click_point: local,
            recognized_text,
            typed_text: (!typed.is_empty()).then_some(typed),
            image_path: session.relative_image_path(index),
            annotated,
        };

        if let Err(err) = markup.append_step(&step) {
            let _ = std::fs::remove_file(&screenshot_path);
            return Err(StepSkip::Markup(err));
        }
        session.pending_text_mut().flush();
        session.record_step(step.clone());
        Ok(step)
    }

    /// Route a key press; returns `None` when not recording.
    pub fn on_key_press(&mut self, key: &Key) -> Option<KeyEffect> {
        let (Some(session), Some(markup)) = (self.session.as_mut(), self.markup.as_ref()) else {
            log::debug!("Key press ignored while not recording");
            return None;
        };

        let effect = session.pending_text_mut().apply(key);
        let written = match &effect {
            KeyEffect::Buffered | KeyEffect::Ignored => Ok(()),
            KeyEffect::Marker(marker) => markup.append_marker(marker),
            KeyEffect::Submitted { typed, marker } => {
                let typed_written = if typed.is_empty() {
                    Ok(())
                } else {
                    markup.append_typed(typed)
                };
                typed_written.and_then(|()| markup.append_marker(marker))
            }
        };
        if let Err(err) = written {
            log::error!("Failed to write key block: {err}");
        }
        Some(effect)
    }
}

/// Drain `events` into `recorder` until `running` is cleared, then consume
/// whatever is still queued and hand the recorder back.
pub fn run_event_loop<C: ScreenCapture, R: TextRecognizer>(
    mut recorder: StepRecorder<C, R>,
    events: Receiver<InputEvent>,
    running: Arc<AtomicBool>,
) -> StepRecorder<C, R> {
    while running.load(Ordering::SeqCst) {
        match events.recv_timeout(EVENT_POLL_INTERVAL) {
            Ok(event) => recorder.handle(event),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    while let Ok(event) = events.try_recv() {
        recorder.handle(event);
    }
    recorder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::input_event::{KeyName, MouseButton};
    use crate::recorder::listener::event_channel;
    use crate::recorder::ocr::{OcrError, RegionPolicy};
    use crate::recorder::types::Point;
    use crate::recorder::window_info::{WindowBounds, WindowInfo};
    use image::{GrayImage, Rgba, RgbaImage};
    use tempfile::tempdir;

    struct FakeCapture {
        window: Option<WindowInfo>,
        fail: bool,
    }

    impl ScreenCapture for FakeCapture {
        fn active_window(&self) -> Option<WindowInfo> {
            self.window.clone()
        }

        fn capture(&self, region: &WindowBounds) -> Result<RgbaImage, CaptureError> {
            if self.fail {
                return Err(CaptureError::Backend("display asleep".into()));
            }
            Ok(RgbaImage::from_pixel(
                region.width,
                region.height,
                Rgba([255, 255, 255, 255]),
            ))
        }
    }

    struct FakeOcr(Option<&'static str>);

    impl TextRecognizer for FakeOcr {
        fn recognize(&self, _image: &GrayImage) -> Result<String, OcrError> {
            match self.0 {
                Some(text) => Ok(text.to_string()),
                None => Err(OcrError::EngineFailed {
                    status: Some(1),
                    stderr: "boom".into(),
                }),
            }
        }
    }

    /// Collects log records per thread so parallel tests do not see each
    /// other's output.
    mod captured_logs {
        use std::sync::{Mutex, Once};
        use std::thread::{self, ThreadId};

        static RECORDS: Mutex<Vec<(ThreadId, log::Level, String)>> = Mutex::new(Vec::new());
        static INSTALL: Once = Once::new();

        struct Capture;

        impl log::Log for Capture {
            fn enabled(&self, _metadata: &log::Metadata) -> bool {
                true
            }

            fn log(&self, record: &log::Record) {
                if let Ok(mut records) = RECORDS.lock() {
                    records.push((thread::current().id(), record.level(), record.args().to_string()));
                }
            }

            fn flush(&self) {}
        }

        static LOGGER: Capture = Capture;

        pub fn install() {
            INSTALL.call_once(|| {
                log::set_logger(&LOGGER).unwrap();
                log::set_max_level(log::LevelFilter::Trace);
            });
        }

        /// Remove and return the records logged by the calling thread.
        pub fn take() -> Vec<(log::Level, String)> {
            let me = thread::current().id();
            let mut records = RECORDS.lock().unwrap();
            let (mine, others): (Vec<_>, Vec<_>) =
                records.drain(..).partition(|(id, _, _)| *id == me);
            *records = others;
            mine.into_iter().map(|(_, level, msg)| (level, msg)).collect()
        }
    }

    fn recorder(
        window: Option<WindowInfo>,
        ocr: Option<&'static str>,
        max_width: Option<u32>,
    ) -> StepRecorder<FakeCapture, FakeOcr> {
        StepRecorder::new(
            FakeCapture {
                window,
                fail: false,
            },
            RegionTextExtractor::new(FakeOcr(ocr), RegionPolicy::default()),
            CaptureSettings { max_width },
            MarkerStyle::default(),
        )
    }

    fn markup_text(recorder: &StepRecorder<FakeCapture, FakeOcr>) -> String {
        let session = recorder.session().unwrap();
        std::fs::read_to_string(session.markup_path()).unwrap()
    }

    fn type_keys(recorder: &mut StepRecorder<FakeCapture, FakeOcr>, text: &str) {
        for c in text.chars() {
            recorder.on_key_press(&Key::Char(c));
        }
    }

    #[test]
    fn click_records_step_at_local_point() {
        let dir = tempdir().unwrap();
        let mut rec = recorder(Some(WindowInfo::sample()), Some("Next"), None);
        rec.start(dir.path()).unwrap();

        let step = rec.on_click(&ClickEvent::press(120, 80)).unwrap();
        assert_eq!(step.index, 1);
        assert_eq!(step.click_point, Point::new(20, 30));
        assert_eq!(step.recognized_text.as_deref(), Some("Next"));
        assert!(step.annotated);
        assert_eq!(rec.step_counter(), Some(2));

        let session = rec.session().unwrap();
        let png = image::open(session.screenshot_path(1)).unwrap();
        assert_eq!((png.width(), png.height()), (800, 600));
        assert!(markup_text(&rec).contains(
            "## Step 1: Setup - Example App\n\nClicked on: **Next**\n\n![Step 1](screenshots/step_1.png)\n"
        ));
    }

    #[test]
    fn downsampled_capture_scales_click_point() {
        let dir = tempdir().unwrap();
        let mut rec = recorder(Some(WindowInfo::sample()), Some("Next"), Some(400));
        rec.start(dir.path()).unwrap();

        let step = rec.on_click(&ClickEvent::press(120, 80)).unwrap();
        assert_eq!(step.click_point, Point::new(10, 15));
        let png = image::open(rec.session().unwrap().screenshot_path(1)).unwrap();
        assert_eq!(png.width(), 400);
    }

    #[test]
    fn missing_window_skips_without_consuming_index() {
        let dir = tempdir().unwrap();
        let mut rec = recorder(None, Some("Next"), None);
        rec.start(dir.path()).unwrap();

        assert!(matches!(
            rec.on_click(&ClickEvent::press(5, 5)),
            Err(StepSkip::NoActiveWindow)
        ));
        assert_eq!(rec.step_counter(), Some(1));
        assert_eq!(markup_text(&rec), "# Software Installation Steps\n\n");
    }

    #[test]
    fn skipped_click_logs_exactly_once() {
        captured_logs::install();
        let dir = tempdir().unwrap();
        let mut rec = recorder(None, Some("Next"), None);
        rec.start(dir.path()).unwrap();
        captured_logs::take();

        rec.handle(InputEvent::Click(ClickEvent::press(5, 5)));

        let logs = captured_logs::take();
        assert_eq!(logs.len(), 1, "{logs:?}");
        assert_eq!(logs[0].0, log::Level::Warn);
        assert!(logs[0].1.contains("no active window"));
        assert_eq!(rec.step_counter(), Some(1));
    }

    #[test]
    fn annotation_failure_keeps_raw_screenshot() {
        captured_logs::install();
        let dir = tempdir().unwrap();
        let mut rec = recorder(Some(WindowInfo::sample()), Some("Next"), None);
        rec.marker = MarkerStyle {
            radius: 0,
            ..MarkerStyle::default()
        };
        rec.start(dir.path()).unwrap();
        captured_logs::take();

        let step = rec.on_click(&ClickEvent::press(120, 80)).unwrap();
        assert!(!step.annotated);
        assert_eq!(step.recognized_text.as_deref(), Some("Next"));
        assert_eq!(rec.step_counter(), Some(2));

        let png = image::open(rec.session().unwrap().screenshot_path(1))
            .unwrap()
            .to_rgba8();
        assert!(png.pixels().all(|p| *p == Rgba([255, 255, 255, 255])));

        let warnings: Vec<_> = captured_logs::take()
            .into_iter()
            .filter(|(level, _)| *level == log::Level::Warn)
            .collect();
        assert_eq!(warnings.len(), 1, "{warnings:?}");
        assert!(warnings[0].1.contains("unannotated"));
    }

    #[test]
    fn markup_write_failure_keeps_typed_text_and_index() {
        let dir = tempdir().unwrap();
        let mut rec = recorder(Some(WindowInfo::sample()), Some("Next"), None);
        rec.start(dir.path()).unwrap();
        rec.on_click(&ClickEvent::press(120, 80)).unwrap();
        let markup_path = rec.session().unwrap().markup_path().to_path_buf();

        // A directory in place of the document makes every append fail.
        std::fs::remove_file(&markup_path).unwrap();
        std::fs::create_dir(&markup_path).unwrap();
        type_keys(&mut rec, "secret");

        assert!(matches!(
            rec.on_click(&ClickEvent::press(130, 90)),
            Err(StepSkip::Markup(_))
        ));
        let session = rec.session().unwrap();
        assert_eq!(rec.step_counter(), Some(2));
        assert_eq!(session.pending_text().peek(), "secret");
        assert!(!session.screenshot_path(2).exists());

        std::fs::remove_dir(&markup_path).unwrap();
        let step = rec.on_click(&ClickEvent::press(130, 90)).unwrap();
        assert_eq!(step.index, 2);
        assert_eq!(step.typed_text.as_deref(), Some("secret"));
        assert!(rec.session().unwrap().pending_text().is_empty());
        assert_eq!(
            markup_text(&rec),
            "# Software Installation Steps\n\n\
             ## Step 2: Setup - Example App\n\n\
             Clicked on: **Next**\n\n\
             **Typed:** secret\n\n\
             ![Step 2](screenshots/step_2.png)\n\n"
        );
    }

    #[test]
    fn deleted_markup_document_does_not_end_recording() {
        let dir = tempdir().unwrap();
        let mut rec = recorder(Some(WindowInfo::sample()), Some("Next"), None);
        rec.start(dir.path()).unwrap();
        rec.on_click(&ClickEvent::press(120, 80)).unwrap();
        std::fs::remove_file(rec.session().unwrap().markup_path()).unwrap();

        type_keys(&mut rec, "secret");
        rec.on_click(&ClickEvent::press(130, 90)).unwrap();
        rec.on_click(&ClickEvent::press(140, 95)).unwrap();

        assert_eq!(rec.step_counter(), Some(4));
        let text = markup_text(&rec);
        assert!(text.starts_with("# Software Installation Steps\n\n## Step 2"));
        assert!(text.contains("**Typed:** secret"));
        assert!(text.contains("## Step 3"));
    }

    #[test]
    fn capture_failure_skips_step() {
        let dir = tempdir().unwrap();
        let mut rec = recorder(Some(WindowInfo::sample()), None, None);
        rec.capture.fail = true;
        rec.start(dir.path()).unwrap();

        assert!(matches!(
            rec.on_click(&ClickEvent::press(120, 80)),
            Err(StepSkip::Capture(_))
        ));
        assert_eq!(rec.step_counter(), Some(1));
    }

    #[test]
    fn ocr_failure_still_records_step() {
        let dir = tempdir().unwrap();
        let mut rec = recorder(Some(WindowInfo::sample()), None, None);
        rec.start(dir.path()).unwrap();

        let step = rec.on_click(&ClickEvent::press(120, 80)).unwrap();
        assert_eq!(step.recognized_text, None);
        assert!(!markup_text(&rec).contains("Clicked on"));
        assert_eq!(rec.step_counter(), Some(2));
    }

    #[test]
    fn releases_and_idle_clicks_are_ignored() {
        let dir = tempdir().unwrap();
        let mut rec = recorder(Some(WindowInfo::sample()), Some("Next"), None);
        assert!(matches!(
            rec.on_click(&ClickEvent::press(120, 80)),
            Err(StepSkip::NotRecording)
        ));
        assert_eq!(rec.on_key_press(&Key::Char('a')), None);

        rec.start(dir.path()).unwrap();
        let release = ClickEvent::new(120, 80, MouseButton::Left, false);
        assert!(matches!(
            rec.on_click(&release),
            Err(StepSkip::ButtonReleased)
        ));
        assert_eq!(rec.step_counter(), Some(1));
    }

    #[test]
    fn typed_text_is_attached_to_next_click() {
        let dir = tempdir().unwrap();
        let mut rec = recorder(Some(WindowInfo::sample()), Some("OK"), None);
        rec.start(dir.path()).unwrap();

        type_keys(&mut rec, "admin");
        let step = rec.on_click(&ClickEvent::press(120, 80)).unwrap();
        assert_eq!(step.typed_text.as_deref(), Some("admin"));
        assert!(markup_text(&rec).contains("**Typed:** admin\n\n![Step 1]"));

        let next = rec.on_click(&ClickEvent::press(130, 90)).unwrap();
        assert_eq!(next.typed_text, None);
    }

    #[test]
    fn enter_writes_typed_block_then_marker() {
        let dir = tempdir().unwrap();
        let mut rec = recorder(Some(WindowInfo::sample()), Some("OK"), None);
        rec.start(dir.path()).unwrap();

        type_keys(&mut rec, "abc");
        rec.on_key_press(&Key::Named(KeyName::Backspace));
        rec.on_key_press(&Key::Named(KeyName::Enter));
        rec.on_key_press(&Key::Named(KeyName::Tab));

        assert_eq!(
            markup_text(&rec),
            "# Software Installation Steps\n\n\
             **Typed:** ab\n\n\
             **Pressed:** Enter\n\n\
             **Pressed:** Tab\n\n"
        );
    }

    #[test]
    fn stop_discards_pending_text_and_writes_manifest() {
        let dir = tempdir().unwrap();
        let mut rec = recorder(Some(WindowInfo::sample()), Some("Next"), None);
        rec.start(dir.path()).unwrap();
        rec.on_click(&ClickEvent::press(120, 80)).unwrap();
        type_keys(&mut rec, "lost");

        let finished = rec.stop().unwrap();
        assert!(!rec.is_recording());
        assert_eq!(finished.steps().len(), 1);
        assert!(finished.pending_text().is_empty());
        assert!(finished.root_directory().join("steps.json").is_file());
        assert!(!std::fs::read_to_string(finished.markup_path())
            .unwrap()
            .contains("lost"));
    }

    #[test]
    fn restart_begins_fresh_session() {
        let dir = tempdir().unwrap();
        let mut rec = recorder(Some(WindowInfo::sample()), Some("Next"), None);
        rec.start(dir.path()).unwrap();
        rec.on_click(&ClickEvent::press(120, 80)).unwrap();
        let first = rec.stop().unwrap();

        let second_root = rec.start(dir.path()).unwrap().root_directory().to_path_buf();
        assert_ne!(first.root_directory(), second_root);
        assert_eq!(rec.step_counter(), Some(1));
    }

    #[test]
    fn double_start_and_idle_stop_are_rejected() {
        let dir = tempdir().unwrap();
        let mut rec = recorder(Some(WindowInfo::sample()), Some("Next"), None);
        assert!(matches!(rec.stop(), Err(SessionError::State(_))));

        let root = rec.start(dir.path()).unwrap().root_directory().to_path_buf();
        assert!(matches!(rec.start(dir.path()), Err(SessionError::State(_))));
        assert_eq!(rec.session().unwrap().root_directory(), root);
    }

    #[test]
    fn event_loop_drains_queue_after_stop_signal() {
        let dir = tempdir().unwrap();
        let mut rec = recorder(Some(WindowInfo::sample()), Some("Next"), None);
        rec.start(dir.path()).unwrap();

        let (tx, rx) = event_channel(8);
        tx.send(InputEvent::KeyDown(Key::Char('x'))).unwrap();
        tx.send(InputEvent::Click(ClickEvent::press(120, 80))).unwrap();
        tx.send(InputEvent::Click(ClickEvent::press(500, 400))).unwrap();

        let running = Arc::new(AtomicBool::new(false));
        let rec = run_event_loop(rec, rx, running);

        let steps = rec.session().unwrap().steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].typed_text.as_deref(), Some("x"));
        assert_eq!(steps[1].click_point, Point::new(400, 350));
        assert_eq!(rec.step_counter(), Some(3));
    }

    #[test]
    fn click_outside_window_is_clamped() {
        let dir = tempdir().unwrap();
        let mut rec = recorder(Some(WindowInfo::sample()), Some("Next"), None);
        rec.start(dir.path()).unwrap();

        let step = rec.on_click(&ClickEvent::press(2000, 10)).unwrap();
        assert_eq!(step.click_point, Point::new(799, 0));
    }
}
