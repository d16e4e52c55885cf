//! Input subscription: listeners push `InputEvent`s into one bounded channel
//! that a single orchestrator thread drains in arrival order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::input_event::InputEvent;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("input hook unavailable: {0}")]
    Unavailable(String),
}

/// Returned by `InputSource::subscribe`; stopping it ends event delivery.
pub trait ListenerHandle: Send {
    fn stop(&mut self);
}

/// Global input-event collaborator.
pub trait InputSource: Send {
    fn subscribe(
        &mut self,
        events: SyncSender<InputEvent>,
    ) -> Result<Box<dyn ListenerHandle>, ListenerError>;
}

impl<T: InputSource + ?Sized> InputSource for Box<T> {
    fn subscribe(
        &mut self,
        events: SyncSender<InputEvent>,
    ) -> Result<Box<dyn ListenerHandle>, ListenerError> {
        (**self).subscribe(events)
    }
}

pub fn event_channel(capacity: usize) -> (SyncSender<InputEvent>, Receiver<InputEvent>) {
    mpsc::sync_channel(capacity.max(1))
}

/// A sender that drops everything once closed, for hooks that cannot be
/// unregistered.
#[derive(Debug, Clone)]
pub struct GatedSender {
    open: Arc<AtomicBool>,
    tx: SyncSender<InputEvent>,
}

impl GatedSender {
    pub fn new(tx: SyncSender<InputEvent>) -> Self {
        Self {
            open: Arc::new(AtomicBool::new(true)),
            tx,
        }
    }

    /// Returns false when the gate is closed or the receiver is gone.
    pub fn send(&self, event: InputEvent) -> bool {
        if !self.is_open() {
            return false;
        }
        self.tx.send(event).is_ok()
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

/// Replays a fixed list of events from a background thread.
///
/// Stopping waits until the whole script has been delivered, so a stop
/// issued right after start still sees every scripted event.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    events: Vec<InputEvent>,
}

impl ScriptedInput {
    pub fn new(events: Vec<InputEvent>) -> Self {
        Self { events }
    }
}

struct ScriptedHandle {
    gate: GatedSender,
    feeder: Option<JoinHandle<()>>,
}

impl ListenerHandle for ScriptedHandle {
    fn stop(&mut self) {
        if let Some(feeder) = self.feeder.take() {
            if feeder.join().is_err() {
                log::warn!("Scripted input feeder panicked");
            }
        }
        self.gate.close();
    }
}

impl Drop for ScriptedHandle {
    fn drop(&mut self) {
        self.gate.close();
    }
}

impl InputSource for ScriptedInput {
    fn subscribe(
        &mut self,
        events: SyncSender<InputEvent>,
    ) -> Result<Box<dyn ListenerHandle>, ListenerError> {
        let gate = GatedSender::new(events);
        let feeder_gate = gate.clone();
        let script = self.events.clone();
        let feeder = thread::Builder::new()
            .name("scripted-input".into())
            .spawn(move || {
                for event in script {
                    if !feeder_gate.send(event) {
                        break;
                    }
                }
            })
            .map_err(|e| ListenerError::Unavailable(e.to_string()))?;

        Ok(Box::new(ScriptedHandle {
            gate,
            feeder: Some(feeder),
        }))
    }
}
