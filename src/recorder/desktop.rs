//! Real collaborators: `xcap` for window enumeration and screen pixels,
//! `rdev` for the global mouse and keyboard hook.

use std::sync::mpsc::{self, SyncSender};
use std::sync::Mutex;
use std::time::Duration;

use image::imageops;
use image::RgbaImage;
use rdev::{listen, Button, Event, EventType};
use xcap::{Monitor, Window};

use super::capture::{CaptureError, ScreenCapture};
use super::input_event::{ClickEvent, InputEvent, Key, KeyName, MouseButton};
use super::listener::{GatedSender, InputSource, ListenerError, ListenerHandle};
use super::types::Point;
use super::window_info::{WindowBounds, WindowInfo};

/// How long `subscribe` waits for the hook to report a startup failure.
const HOOK_STARTUP_GRACE: Duration = Duration::from_millis(200);

pub struct XcapCapture;

impl ScreenCapture for XcapCapture {
    /// The topmost visible window with a title.
    fn active_window(&self) -> Option<WindowInfo> {
        let windows = match Window::all() {
            Ok(windows) => windows,
            Err(err) => {
                log::warn!("Failed to enumerate windows: {err}");
                return None;
            }
        };
        windows
            .into_iter()
            .find(|w| !w.is_minimized() && !w.title().is_empty() && w.width() > 0 && w.height() > 0)
            .map(|w| WindowInfo {
                title: w.title().to_string(),
                bounds: WindowBounds {
                    x: w.x(),
                    y: w.y(),
                    width: w.width(),
                    height: w.height(),
                },
            })
    }

    fn capture(&self, region: &WindowBounds) -> Result<RgbaImage, CaptureError> {
        if region.is_empty() {
            return Err(CaptureError::invalid_region(region));
        }
        let monitors = Monitor::all().map_err(|e| CaptureError::Backend(e.to_string()))?;
        let monitor = monitors
            .iter()
            .find(|m| {
                region.x >= m.x()
                    && region.y >= m.y()
                    && region.x < m.x() + m.width() as i32
                    && region.y < m.y() + m.height() as i32
            })
            .or(monitors.first())
            .ok_or_else(|| CaptureError::Backend("no monitor found".into()))?;

        let screen = monitor
            .capture_image()
            .map_err(|e| CaptureError::Backend(e.to_string()))?;

        let x = (region.x - monitor.x()).max(0) as u32;
        let y = (region.y - monitor.y()).max(0) as u32;
        if x >= screen.width() || y >= screen.height() {
            return Err(CaptureError::invalid_region(region));
        }
        // crop_imm clamps the size to the monitor edge
        Ok(imageops::crop_imm(&screen, x, y, region.width, region.height).to_image())
    }
}

/// Where the process-wide hook forwards events. `rdev::listen` never returns
/// on success, so the hook thread outlives every subscription and only the
/// sink is swapped.
struct HookState {
    sink: Option<GatedSender>,
    started: bool,
}

static HOOK: Mutex<HookState> = Mutex::new(HookState {
    sink: None,
    started: false,
});

pub struct RdevInput;

struct RdevHandle {
    gate: GatedSender,
}

impl ListenerHandle for RdevHandle {
    fn stop(&mut self) {
        self.gate.close();
        if let Ok(mut hook) = HOOK.lock() {
            hook.sink = None;
        }
    }
}

impl Drop for RdevHandle {
    fn drop(&mut self) {
        self.gate.close();
    }
}

impl InputSource for RdevInput {
    fn subscribe(
        &mut self,
        events: SyncSender<InputEvent>,
    ) -> Result<Box<dyn ListenerHandle>, ListenerError> {
        let gate = GatedSender::new(events);
        let mut hook = HOOK
            .lock()
            .map_err(|_| ListenerError::Unavailable("hook state poisoned".into()))?;
        hook.sink = Some(gate.clone());

        if !hook.started {
            let (err_tx, err_rx) = mpsc::channel::<String>();
            std::thread::Builder::new()
                .name("input-hook".into())
                .spawn(move || run_hook(err_tx))
                .map_err(|e| ListenerError::Unavailable(e.to_string()))?;

            if let Ok(reason) = err_rx.recv_timeout(HOOK_STARTUP_GRACE) {
                hook.sink = None;
                return Err(ListenerError::Unavailable(reason));
            }
            hook.started = true;
        }

        Ok(Box::new(RdevHandle { gate }))
    }
}

fn run_hook(errors: mpsc::Sender<String>) {
    let mut cursor = Point::default();
    let callback = move |event: Event| {
        let converted = match event.event_type {
            EventType::MouseMove { x, y } => {
                cursor = Point::new(x.round() as i32, y.round() as i32);
                None
            }
            EventType::ButtonPress(button) => Some(InputEvent::Click(ClickEvent::new(
                cursor.x,
                cursor.y,
                map_button(button),
                true,
            ))),
            EventType::ButtonRelease(button) => Some(InputEvent::Click(ClickEvent::new(
                cursor.x,
                cursor.y,
                map_button(button),
                false,
            ))),
            EventType::KeyPress(key) => Some(InputEvent::KeyDown(map_key(key, event.name.as_deref()))),
            _ => None,
        };

        if let Some(event) = converted {
            if let Ok(hook) = HOOK.lock() {
                if let Some(sink) = hook.sink.as_ref() {
                    sink.send(event);
                }
            }
        }
    };

    if let Err(err) = listen(callback) {
        log::error!("Input hook failed: {err:?}");
        let _ = errors.send(format!("{err:?}"));
    }
}

fn map_button(button: Button) -> MouseButton {
    match button {
        Button::Left => MouseButton::Left,
        Button::Right => MouseButton::Right,
        Button::Middle => MouseButton::Middle,
        Button::Unknown(code) => MouseButton::Other(code),
    }
}

/// Decide once, at the boundary, whether a key is text or a named key.
fn map_key(key: rdev::Key, name: Option<&str>) -> Key {
    use rdev::Key as K;
    let named = match key {
        K::Return | K::KpReturn => KeyName::Enter,
        K::Backspace => KeyName::Backspace,
        K::Space => KeyName::Space,
        K::Tab => KeyName::Tab,
        K::Escape => KeyName::Escape,
        K::Delete => KeyName::Delete,
        K::UpArrow => KeyName::Up,
        K::DownArrow => KeyName::Down,
        K::LeftArrow => KeyName::Left,
        K::RightArrow => KeyName::Right,
        K::Home => KeyName::Home,
        K::End => KeyName::End,
        K::PageUp => KeyName::PageUp,
        K::PageDown => KeyName::PageDown,
        K::ShiftLeft | K::ShiftRight => KeyName::Shift,
        K::ControlLeft | K::ControlRight => KeyName::Control,
        K::Alt | K::AltGr => KeyName::Alt,
        K::MetaLeft | K::MetaRight => KeyName::Meta,
        K::CapsLock => KeyName::CapsLock,
        K::F1 => KeyName::Function(1),
        K::F2 => KeyName::Function(2),
        K::F3 => KeyName::Function(3),
        K::F4 => KeyName::Function(4),
        K::F5 => KeyName::Function(5),
        K::F6 => KeyName::Function(6),
        K::F7 => KeyName::Function(7),
        K::F8 => KeyName::Function(8),
        K::F9 => KeyName::Function(9),
        K::F10 => KeyName::Function(10),
        K::F11 => KeyName::Function(11),
        K::F12 => KeyName::Function(12),
        other => {
            let mut chars = name.unwrap_or_default().chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => Key::Named(KeyName::Other(format!("{other:?}"))),
            };
        }
    };
    Key::Named(named)
}
