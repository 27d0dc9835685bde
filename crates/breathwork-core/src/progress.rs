//! Presentation values derived from run-state.
//!
//! Nothing here holds state: every value can be recomputed from a
//! [`RunState`] and the session duration at any instant.

use crate::config::PresentationConfig;
use crate::phase_machine::Phase;
use crate::session::RunState;
use serde::{Deserialize, Serialize};

/// Render-ready view of a session, produced once per state change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub time_left_in_phase: u32,
    pub total_elapsed_seconds: u32,
    pub duration_seconds: u32,
    pub cycle_count: u32,
    pub progress_percent: f32,
    pub is_active: bool,
}

impl SessionSnapshot {
    pub fn new(state: &RunState, duration_seconds: u32) -> Self {
        Self {
            phase: state.current_phase,
            time_left_in_phase: state.time_left_in_phase,
            total_elapsed_seconds: state.total_elapsed_seconds,
            duration_seconds,
            cycle_count: state.cycle_count,
            progress_percent: progress_percent(state.total_elapsed_seconds, duration_seconds),
            is_active: state.is_active(),
        }
    }

    /// `"m:ss / m:ss"` elapsed over total.
    pub fn elapsed_label(&self) -> String {
        format!(
            "{} / {}",
            format_time(self.total_elapsed_seconds),
            format_time(self.duration_seconds)
        )
    }

    /// 1-based cycle label, e.g. `"Cycle 3"`.
    pub fn cycle_label(&self) -> String {
        format!("Cycle {}", self.cycle_count.saturating_add(1))
    }
}

/// Percentage of the session completed, clamped to `[0, 100]`.
///
/// A zero-length session counts as finished.
pub fn progress_percent(elapsed_seconds: u32, duration_seconds: u32) -> f32 {
    if duration_seconds == 0 {
        return 100.0;
    }
    (elapsed_seconds as f32 / duration_seconds as f32 * 100.0).clamp(0.0, 100.0)
}

/// Format seconds as `m:ss`.
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Text shown for a phase.
pub fn phase_instruction(phase: Phase) -> &'static str {
    match phase {
        Phase::Inhale => "Breathe In",
        Phase::Hold => "Hold",
        Phase::Exhale => "Breathe Out",
        Phase::Pause => "Pause",
    }
}

/// Animation cue for a phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseVisual {
    pub phase: Phase,
    pub instruction: &'static str,
    /// Relative size of the breathing avatar
    pub scale: f32,
}

pub fn phase_scale(phase: Phase, config: &PresentationConfig) -> f32 {
    match phase {
        Phase::Inhale => config.inhale_scale,
        Phase::Hold => config.hold_scale,
        Phase::Exhale => config.exhale_scale,
        Phase::Pause => config.pause_scale,
    }
}

pub fn phase_visual(phase: Phase, config: &PresentationConfig) -> PhaseVisual {
    PhaseVisual {
        phase,
        instruction: phase_instruction(phase),
        scale: phase_scale(phase, config),
    }
}
