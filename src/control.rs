//! Session control surface for the host.
//!
//! One controller owns at most one live session plus the pure booleans the
//! host polls every frame (movement lock, HUD hiding). Work from other
//! threads reaches the controller through a task queue drained on the
//! render thread, so all session mutation happens on one thread.

use std::time::Instant;

use crossbeam::channel::{self, Receiver, Sender};
use tracing::debug;

use crate::media::audio::AudioSinkProvider;
use crate::media::decoder::DecoderOpener;
use crate::net::payload::PlayRequest;
use crate::playback::session::{Session, SessionError};
use crate::render::surface::SurfaceProvider;
use crate::source::{self, SourceDirs};

/// A closure scheduled to run on the presentation thread.
pub type Task = Box<dyn FnOnce(&mut CutsceneController) + Send>;

/// Cloneable handle for posting tasks to the controller from any thread.
#[derive(Clone)]
pub struct ControllerHandle {
    tx: Sender<Task>,
}

impl ControllerHandle {
    /// Schedules `task` to run on the next render tick. Returns `false`
    /// when the controller is gone.
    pub fn post(&self, task: impl FnOnce(&mut CutsceneController) + Send + 'static) -> bool {
        self.tx.send(Box::new(task)).is_ok()
    }
}

/// Owns the current session and the host-facing playback flags.
pub struct CutsceneController {
    opener: Box<dyn DecoderOpener>,
    surfaces: Box<dyn SurfaceProvider>,
    sinks: Box<dyn AudioSinkProvider>,
    dirs: SourceDirs,
    session: Option<Session>,
    movement_disabled: bool,
    hide_hud: bool,
    tasks_tx: Sender<Task>,
    tasks_rx: Receiver<Task>,
}

impl CutsceneController {
    pub fn new(
        opener: Box<dyn DecoderOpener>,
        surfaces: Box<dyn SurfaceProvider>,
        sinks: Box<dyn AudioSinkProvider>,
    ) -> Self {
        Self::with_dirs(opener, surfaces, sinks, SourceDirs::default())
    }

    pub fn with_dirs(
        opener: Box<dyn DecoderOpener>,
        surfaces: Box<dyn SurfaceProvider>,
        sinks: Box<dyn AudioSinkProvider>,
        dirs: SourceDirs,
    ) -> Self {
        let (tasks_tx, tasks_rx) = channel::unbounded();
        Self {
            opener,
            surfaces,
            sinks,
            dirs,
            session: None,
            movement_disabled: false,
            hide_hud: false,
            tasks_tx,
            tasks_rx,
        }
    }

    /// Handle for posting work onto the render thread.
    pub fn handle(&self) -> ControllerHandle {
        ControllerHandle {
            tx: self.tasks_tx.clone(),
        }
    }

    /// Starts playback for a request, stopping any session in progress
    /// first so at most one decode thread is ever alive.
    pub fn start(&mut self, request: &PlayRequest) -> Result<(), SessionError> {
        self.stop();

        let resolved = source::resolve(&request.path, request.source_type, &self.dirs)?;
        let session = Session::start(
            &resolved,
            &*self.opener,
            &mut *self.surfaces,
            self.sinks.open_sink(),
        )?;

        self.movement_disabled = request.disable_movement;
        self.hide_hud = request.hide_hud;
        self.session = Some(session);
        Ok(())
    }

    /// Stops and tears down the current session, if any.
    ///
    /// The owning reference is taken before teardown runs, so a reentrant
    /// stop arriving mid-teardown finds no session and does nothing.
    pub fn stop(&mut self) {
        if let Some(mut session) = self.session.take() {
            debug!("stopping cutscene session");
            session.stop();
        }
    }

    /// Runs queued tasks and drives the session, once per render tick.
    pub fn render_tick(&mut self, now: Instant) {
        while let Ok(task) = self.tasks_rx.try_recv() {
            task(self);
        }

        if let Some(session) = self.session.as_mut() {
            session.render_tick(now);
            if session.is_closed() {
                self.session = None;
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_some()
    }

    /// True while a session with movement lock is playing.
    pub fn is_movement_disabled(&self) -> bool {
        self.movement_disabled && self.is_playing()
    }

    /// True while a session that hides the HUD is playing.
    pub fn should_hide_overlay(&self) -> bool {
        self.hide_hud && self.is_playing()
    }
}
