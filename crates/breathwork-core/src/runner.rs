//! Countdown driver: runs a [`BreathingSession`] against wall-clock time.
//!
//! Architecture:
//! - The runner owns the session and at most one pending tick, a one-shot
//!   `crossbeam_channel::after` receiver. Dropping it cancels the tick.
//! - The tick is re-armed only after a tick has been processed while the
//!   session is running, so two ticks can never be outstanding at once.
//! - Commands (start, pause, skip, close, ...) arrive over a bounded channel
//!   from any number of cloned [`SessionController`] handles.
//! - When every controller is dropped the session is closed.

use crate::config::SessionConfig;
use crate::session::{BreathingSession, SessionEvent, SessionObserver, SessionSummary};
use crossbeam_channel::{after, bounded, never, select, Receiver, Sender};
use std::time::{Duration, Instant};

const COMMAND_CAPACITY: usize = 16;

/// User commands sent to a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Pause,
    Resume,
    Toggle,
    Skip,
    Close,
}

impl From<SessionCommand> for SessionEvent {
    fn from(cmd: SessionCommand) -> Self {
        match cmd {
            SessionCommand::Start => SessionEvent::Start,
            SessionCommand::Pause => SessionEvent::Pause,
            SessionCommand::Resume => SessionEvent::Resume,
            SessionCommand::Toggle => SessionEvent::Toggle,
            SessionCommand::Skip => SessionEvent::Skip,
            SessionCommand::Close => SessionEvent::Close,
        }
    }
}

/// Cloneable handle for steering a [`SessionRunner`] from other threads.
#[derive(Debug, Clone)]
pub struct SessionController {
    tx: Sender<SessionCommand>,
}

impl SessionController {
    /// Send a command. Returns false once the runner has finished.
    pub fn send(&self, cmd: SessionCommand) -> bool {
        self.tx.send(cmd).is_ok()
    }

    pub fn start(&self) -> bool {
        self.send(SessionCommand::Start)
    }

    pub fn pause(&self) -> bool {
        self.send(SessionCommand::Pause)
    }

    pub fn resume(&self) -> bool {
        self.send(SessionCommand::Resume)
    }

    pub fn toggle(&self) -> bool {
        self.send(SessionCommand::Toggle)
    }

    pub fn skip(&self) -> bool {
        self.send(SessionCommand::Skip)
    }

    pub fn close(&self) -> bool {
        self.send(SessionCommand::Close)
    }
}

/// The single outstanding tick of a session, if any.
///
/// Holds the receiving end of a one-shot timer; dropping the handle
/// cancels the tick.
#[derive(Debug)]
struct TickHandle {
    rx: Receiver<Instant>,
}

impl TickHandle {
    fn arm(interval: Duration) -> Self {
        Self { rx: after(interval) }
    }
}

/// Drives a session with a periodic tick until it completes or closes.
pub struct SessionRunner<O: SessionObserver> {
    session: BreathingSession<O>,
    commands: Receiver<SessionCommand>,
    pending_tick: Option<TickHandle>,
    interval: Duration,
    close_on_complete: bool,
}

impl<O: SessionObserver> SessionRunner<O> {
    /// Wrap a session. Returns the runner and a controller for it.
    pub fn new(session: BreathingSession<O>, config: &SessionConfig) -> (Self, SessionController) {
        let (tx, rx) = bounded(COMMAND_CAPACITY);
        let mut runner = Self {
            session,
            commands: rx,
            pending_tick: None,
            interval: Duration::from_millis(config.tick_interval_ms.max(1)),
            close_on_complete: config.close_on_complete,
        };
        if config.auto_start {
            runner.apply(SessionEvent::Start);
        } else {
            // The session may already be running when handed over.
            runner.sync_timer();
        }
        (runner, SessionController { tx })
    }

    pub fn session(&self) -> &BreathingSession<O> {
        &self.session
    }

    /// True while a tick is scheduled.
    pub fn has_pending_tick(&self) -> bool {
        self.pending_tick.is_some()
    }

    /// Process commands and ticks until the session ends.
    ///
    /// Returns the session summary and hands the observer back.
    pub fn run(mut self) -> (SessionSummary, O) {
        loop {
            if self.is_done() {
                break;
            }

            // Idle sessions wait on commands only.
            let commands = self.commands.clone();
            let tick_rx = match &self.pending_tick {
                Some(handle) => handle.rx.clone(),
                None => never(),
            };

            select! {
                recv(commands) -> cmd => match cmd {
                    Ok(cmd) => self.apply(cmd.into()),
                    Err(_) => {
                        log::debug!("All session controllers dropped, closing session");
                        self.apply(SessionEvent::Close);
                    }
                },
                recv(tick_rx) -> _ => {
                    // The fired timer is spent; re-arming happens in apply().
                    self.pending_tick = None;
                    self.apply(SessionEvent::Tick);
                }
            }
        }

        self.pending_tick = None;
        let summary = self.session.summary();
        (summary, self.session.into_observer())
    }

    fn is_done(&self) -> bool {
        let state = self.session.state();
        state.is_closed() || (state.is_completed() && self.close_on_complete)
    }

    fn apply(&mut self, event: SessionEvent) {
        self.session.dispatch(event);
        self.sync_timer();
    }

    /// Keep exactly one tick armed while running and none otherwise.
    fn sync_timer(&mut self) {
        if self.session.is_active() {
            if self.pending_tick.is_none() {
                self.pending_tick = Some(TickHandle::arm(self.interval));
            }
        } else if self.pending_tick.take().is_some() {
            log::trace!("Tick cancelled");
        }
    }
}
