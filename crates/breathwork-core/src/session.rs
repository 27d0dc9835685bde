//! Breathing session engine.
//!
//! All mutable session data lives in one [`RunState`] record. Events are
//! applied by the pure [`step`] function; [`BreathingSession`] wraps it,
//! owns the technique for the whole session and turns state changes into
//! observer notifications (update, complete, close).
//!
//! # Invariants
//! - `time_left_in_phase` is the full phase duration right after a transition
//!   and drops by exactly 1 per tick while running.
//! - `total_elapsed_seconds` only changes on ticks and never passes
//!   `duration_seconds` by more than one tick.
//! - Completion is signalled at most once; a closed session never signals it.

use crate::phase_machine::{Phase, PhaseSequencer};
use crate::progress::SessionSnapshot;
use crate::technique::{Category, Technique, TechniqueError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("invalid technique: {0}")]
    InvalidTechnique(#[from] TechniqueError),
}

/// Lifecycle of a session. Only `Running` advances the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    Idle,
    Running,
    Completed,
    Closed,
}

/// Events accepted by [`step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    Start,
    Resume,
    Pause,
    /// Start/resume when idle, pause when running
    Toggle,
    /// Jump to the next phase now; elapsed time is untouched
    Skip,
    /// One second of wall time
    Tick,
    Close,
}

/// Complete run-state of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    pub lifecycle: Lifecycle,
    pub current_phase: Phase,
    pub time_left_in_phase: u32,
    pub total_elapsed_seconds: u32,
    pub cycle_count: u32,
}

impl RunState {
    /// Fresh, idle state positioned at the start of the first phase.
    pub fn new(plan: &SessionPlan) -> Self {
        let phase = plan.sequencer.first_phase();
        Self {
            lifecycle: Lifecycle::Idle,
            current_phase: phase,
            time_left_in_phase: plan.sequencer.duration_of(phase),
            total_elapsed_seconds: 0,
            cycle_count: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    pub fn is_completed(&self) -> bool {
        self.lifecycle == Lifecycle::Completed
    }

    pub fn is_closed(&self) -> bool {
        self.lifecycle == Lifecycle::Closed
    }
}

/// Immutable inputs of the transition function, derived from a technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPlan {
    pub sequencer: PhaseSequencer,
    pub duration_seconds: u32,
}

impl SessionPlan {
    pub fn from_technique(technique: &Technique) -> Self {
        Self {
            sequencer: PhaseSequencer::new(&technique.pattern),
            duration_seconds: technique.duration_seconds,
        }
    }

    /// A session with nothing to count down completes on its first tick.
    pub fn is_degenerate(&self) -> bool {
        self.duration_seconds == 0 || self.sequencer.is_degenerate()
    }

    fn enter_next_phase(&self, state: &mut RunState) {
        let t = self.sequencer.advance(state.current_phase);
        state.current_phase = t.phase;
        state.time_left_in_phase = t.duration;
        if t.cycle_completed {
            state.cycle_count = state.cycle_count.saturating_add(1);
        }
    }

    fn tick(&self, state: &mut RunState) {
        if self.is_degenerate() {
            state.lifecycle = Lifecycle::Completed;
            return;
        }

        // A countdown reaching zero hands over to the next phase in the same tick.
        if state.time_left_in_phase > 0 {
            state.time_left_in_phase -= 1;
        }
        if state.time_left_in_phase == 0 {
            self.enter_next_phase(state);
        }
        state.total_elapsed_seconds = state.total_elapsed_seconds.saturating_add(1);

        if state.total_elapsed_seconds >= self.duration_seconds {
            state.lifecycle = Lifecycle::Completed;
        }
    }
}

/// Pure transition function: `(state, event) -> state`.
///
/// Events that make no sense in the current lifecycle (pause while idle,
/// tick while paused, anything after close) return the state unchanged.
pub fn step(plan: &SessionPlan, state: RunState, event: SessionEvent) -> RunState {
    use Lifecycle::*;
    use SessionEvent::*;

    let mut next = state;
    match (state.lifecycle, event) {
        (Closed, _) => {}
        (_, Close) => next.lifecycle = Closed,
        (Completed, _) => {}
        (Idle, Start | Resume | Toggle) => next.lifecycle = Running,
        (Running, Pause | Toggle) => next.lifecycle = Idle,
        (Idle | Running, Skip) => plan.enter_next_phase(&mut next),
        (Running, Tick) => plan.tick(&mut next),
        (Idle, Pause | Tick) | (Running, Start | Resume) => {}
    }
    next
}

/// Receiver of session notifications.
pub trait SessionObserver {
    /// The user dismissed the session (before or after completion).
    fn on_close(&mut self);

    /// Elapsed time reached the technique duration. Called exactly once.
    fn on_complete(&mut self);

    /// Any state change other than close.
    fn on_update(&mut self, _snapshot: &SessionSnapshot) {}
}

impl SessionObserver for () {
    fn on_close(&mut self) {}
    fn on_complete(&mut self) {}
}

/// Adapter turning two closures into a [`SessionObserver`].
pub struct Callbacks<C, F>
where
    C: FnMut(),
    F: FnMut(),
{
    on_close: C,
    on_complete: F,
}

impl<C, F> Callbacks<C, F>
where
    C: FnMut(),
    F: FnMut(),
{
    pub fn new(on_close: C, on_complete: F) -> Self {
        Self {
            on_close,
            on_complete,
        }
    }
}

impl<C, F> SessionObserver for Callbacks<C, F>
where
    C: FnMut(),
    F: FnMut(),
{
    fn on_close(&mut self) {
        (self.on_close)()
    }

    fn on_complete(&mut self) {
        (self.on_complete)()
    }
}

/// Outcome of a finished (or abandoned) session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub technique_id: String,
    pub technique_name: String,
    pub category: Category,
    pub elapsed_seconds: u32,
    pub duration_seconds: u32,
    pub cycles: u32,
    pub completed: bool,
}

/// A breathing session for one technique.
///
/// The technique is fixed for the lifetime of the session.
pub struct BreathingSession<O: SessionObserver> {
    technique: Technique,
    plan: SessionPlan,
    state: RunState,
    observer: O,
    completion_signaled: bool,
    close_signaled: bool,
}

impl<O: SessionObserver> BreathingSession<O> {
    /// Create an idle session. Refuses techniques that fail validation.
    pub fn new(technique: Technique, observer: O) -> Result<Self, SessionError> {
        technique.validate()?;
        let plan = SessionPlan::from_technique(&technique);
        let state = RunState::new(&plan);
        log::debug!(
            "Session created: technique={}, duration={}s, cycle={}s",
            technique.id,
            plan.duration_seconds,
            plan.sequencer.cycle_seconds()
        );
        Ok(Self {
            technique,
            plan,
            state,
            observer,
            completion_signaled: false,
            close_signaled: false,
        })
    }

    pub fn technique(&self) -> &Technique {
        &self.technique
    }

    pub fn plan(&self) -> &SessionPlan {
        &self.plan
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Completed or closed; no further events have any effect except close.
    pub fn is_finished(&self) -> bool {
        self.state.is_completed() || self.state.is_closed()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(&self.state, self.plan.duration_seconds)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            technique_id: self.technique.id.clone(),
            technique_name: self.technique.name.clone(),
            category: self.technique.category,
            elapsed_seconds: self.state.total_elapsed_seconds,
            duration_seconds: self.plan.duration_seconds,
            cycles: self.state.cycle_count,
            completed: self.completion_signaled,
        }
    }

    pub fn start(&mut self) -> &RunState {
        self.dispatch(SessionEvent::Start)
    }

    pub fn resume(&mut self) -> &RunState {
        self.dispatch(SessionEvent::Resume)
    }

    pub fn pause(&mut self) -> &RunState {
        self.dispatch(SessionEvent::Pause)
    }

    pub fn toggle(&mut self) -> &RunState {
        self.dispatch(SessionEvent::Toggle)
    }

    pub fn skip(&mut self) -> &RunState {
        self.dispatch(SessionEvent::Skip)
    }

    pub fn tick(&mut self) -> &RunState {
        self.dispatch(SessionEvent::Tick)
    }

    pub fn close(&mut self) -> &RunState {
        self.dispatch(SessionEvent::Close)
    }

    /// Apply one event and notify the observer of the resulting change.
    pub fn dispatch(&mut self, event: SessionEvent) -> &RunState {
        let before = self.state;
        self.state = step(&self.plan, before, event);
        if self.state == before {
            return &self.state;
        }

        if self.state.current_phase != before.current_phase {
            log::debug!(
                "{}: {} -> {} ({}s), cycle {}",
                self.technique.id,
                before.current_phase,
                self.state.current_phase,
                self.state.time_left_in_phase,
                self.state.cycle_count
            );
        }

        match self.state.lifecycle {
            Lifecycle::Closed => {
                if !self.close_signaled {
                    self.close_signaled = true;
                    log::info!(
                        "Session closed: technique={}, elapsed={}s of {}s",
                        self.technique.id,
                        self.state.total_elapsed_seconds,
                        self.plan.duration_seconds
                    );
                    self.observer.on_close();
                }
            }
            Lifecycle::Completed => {
                let snapshot = self.snapshot();
                self.observer.on_update(&snapshot);
                if !self.completion_signaled {
                    self.completion_signaled = true;
                    log::info!(
                        "Session completed: technique={}, cycles={}",
                        self.technique.id,
                        self.state.cycle_count
                    );
                    self.observer.on_complete();
                }
            }
            Lifecycle::Idle | Lifecycle::Running => {
                if before.lifecycle != self.state.lifecycle {
                    log::info!(
                        "Session {}: technique={}, elapsed={}s",
                        if self.state.is_active() { "running" } else { "paused" },
                        self.technique.id,
                        self.state.total_elapsed_seconds
                    );
                }
                let snapshot = self.snapshot();
                self.observer.on_update(&snapshot);
            }
        }
        &self.state
    }
}
