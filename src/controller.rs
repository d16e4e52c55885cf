//! Front-end facing recorder: owns the orchestrator thread while recording,
//! the input subscription, and any exports running in the background.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;

use crate::export::pdf::Renderer;
use crate::export::{spawn_export, ExportError, ExportJob, ExportRequest};
use crate::recorder::capture::ScreenCapture;
use crate::recorder::listener::{event_channel, InputSource, ListenerError, ListenerHandle};
use crate::recorder::ocr::TextRecognizer;
use crate::recorder::pipeline::{run_event_loop, StepRecorder};
use crate::recorder::session::{RecordingSession, SessionError};

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("already recording")]
    AlreadyRecording,
    #[error("not recording")]
    NotRecording,
    #[error("an export of {0} is still running")]
    ExportInFlight(PathBuf),
    #[error("recorder was lost after a failed start")]
    RecorderUnavailable,
    #[error("recording thread panicked")]
    WorkerPanicked,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Listener(#[from] ListenerError),
    #[error("failed to spawn thread: {0}")]
    Spawn(#[source] io::Error),
}

/// Body of the orchestrator thread; yields the recorder back when done.
type WorkerFn<C, R> = Box<dyn FnOnce() -> Option<StepRecorder<C, R>> + Send>;

struct ActiveRecording<C, R> {
    root: PathBuf,
    listener: Box<dyn ListenerHandle>,
    running: Arc<AtomicBool>,
    worker: JoinHandle<Option<StepRecorder<C, R>>>,
}

pub struct Recorder<C, R, I> {
    input: I,
    channel_capacity: usize,
    idle: Option<StepRecorder<C, R>>,
    active: Option<ActiveRecording<C, R>>,
    last_session_root: Option<PathBuf>,
    exports: Vec<ExportJob>,
}

impl<C, R, I> Recorder<C, R, I>
where
    C: ScreenCapture + 'static,
    R: TextRecognizer + 'static,
    I: InputSource,
{
    pub fn new(recorder: StepRecorder<C, R>, input: I, channel_capacity: usize) -> Self {
        Self {
            input,
            channel_capacity,
            idle: Some(recorder),
            active: None,
            last_session_root: None,
            exports: Vec::new(),
        }
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Root of the running session, or of the last finished one.
    pub fn session_root(&self) -> Option<&Path> {
        self.active
            .as_ref()
            .map(|a| a.root.as_path())
            .or(self.last_session_root.as_deref())
    }

    /// True while an export reading from `session_root` is still running.
    pub fn is_exporting(&self, session_root: &Path) -> bool {
        self.exports
            .iter()
            .any(|job| !job.is_finished() && job.markup_path().parent() == Some(session_root))
    }

    pub fn start(&mut self, working_directory: &Path) -> Result<PathBuf, ControllerError> {
        self.start_with(working_directory, |work| {
            std::thread::Builder::new()
                .name("step-recorder".into())
                .spawn(work)
        })
    }

    fn start_with<S>(
        &mut self,
        working_directory: &Path,
        spawn: S,
    ) -> Result<PathBuf, ControllerError>
    where
        S: FnOnce(WorkerFn<C, R>) -> io::Result<JoinHandle<Option<StepRecorder<C, R>>>>,
    {
        if self.active.is_some() {
            return Err(ControllerError::AlreadyRecording);
        }
        if let Some(previous) = self.last_session_root.as_deref() {
            if self.is_exporting(previous) {
                return Err(ControllerError::ExportInFlight(previous.to_path_buf()));
            }
        }

        let mut recorder = self.idle.take().ok_or(ControllerError::RecorderUnavailable)?;
        let root = match recorder.start(working_directory) {
            Ok(session) => session.root_directory().to_path_buf(),
            Err(err) => {
                self.idle = Some(recorder);
                return Err(err.into());
            }
        };

        let (tx, rx) = event_channel(self.channel_capacity);
        let mut listener = match self.input.subscribe(tx) {
            Ok(listener) => listener,
            Err(err) => {
                self.abandon_start(recorder);
                return Err(err.into());
            }
        };

        // The worker is spawned before it owns the recorder, so a failed
        // spawn leaves the recorder here to be handed back.
        let running = Arc::new(AtomicBool::new(true));
        let worker_running = running.clone();
        let (handoff_tx, handoff_rx) = mpsc::channel();
        let work: WorkerFn<C, R> = Box::new(move || {
            let recorder = handoff_rx.recv().ok()?;
            Some(run_event_loop(recorder, rx, worker_running))
        });
        let worker = match spawn(work) {
            Ok(worker) => worker,
            Err(err) => {
                listener.stop();
                self.abandon_start(recorder);
                return Err(ControllerError::Spawn(err));
            }
        };
        if let Err(mpsc::SendError(recorder)) = handoff_tx.send(recorder) {
            listener.stop();
            self.abandon_start(recorder);
            return Err(ControllerError::WorkerPanicked);
        }

        self.active = Some(ActiveRecording {
            root: root.clone(),
            listener,
            running,
            worker,
        });
        Ok(root)
    }

    /// Close the half-started session and keep the recorder for the next start.
    fn abandon_start(&mut self, mut recorder: StepRecorder<C, R>) {
        if let Err(err) = recorder.stop() {
            log::warn!("Failed to close session after aborted start: {err}");
        }
        self.idle = Some(recorder);
    }

    /// Unsubscribe, let the orchestrator drain queued events, then close the
    /// session.
    pub fn stop(&mut self) -> Result<RecordingSession, ControllerError> {
        let mut active = self.active.take().ok_or(ControllerError::NotRecording)?;
        active.listener.stop();
        active.running.store(false, Ordering::SeqCst);
        let mut recorder = active
            .worker
            .join()
            .map_err(|_| ControllerError::WorkerPanicked)?
            .ok_or(ControllerError::RecorderUnavailable)?;

        let session = recorder.stop();
        self.idle = Some(recorder);
        self.last_session_root = Some(active.root);
        Ok(session?)
    }

    /// Start a background export. Recording state is not touched.
    pub fn export<Rn: Renderer + 'static>(
        &mut self,
        request: ExportRequest,
        renderer: Rn,
    ) -> Result<&ExportJob, ControllerError> {
        self.exports.retain(|job| !job.is_finished());
        let job = spawn_export(request, renderer).map_err(ControllerError::Spawn)?;
        self.exports.push(job);
        Ok(&self.exports[self.exports.len() - 1])
    }

    /// Block until every pending export has finished.
    pub fn wait_for_exports(&mut self) -> Vec<Result<PathBuf, ExportError>> {
        self.exports.drain(..).map(ExportJob::wait).collect()
    }
}

impl<C, R, I> Drop for Recorder<C, R, I> {
    fn drop(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.listener.stop();
            active.running.store(false, Ordering::SeqCst);
            let _ = active.worker.join();
        }
    }
}
