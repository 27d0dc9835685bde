//! Phase sequencing for a breathing cycle.
//!
//! The cycle order is fixed: `Inhale → Hold → Exhale → Pause → Inhale …`.
//! A phase whose configured duration is zero (or absent) is never entered;
//! the sequencer steps over it. `next_phase` and `duration_of` read the
//! same durations so they cannot disagree about which phases exist.

use crate::technique::BreathPattern;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Inhale,
    Hold,
    Exhale,
    Pause,
}

impl Phase {
    /// Cycle order.
    pub const ORDER: [Phase; 4] = [Phase::Inhale, Phase::Hold, Phase::Exhale, Phase::Pause];

    fn index(self) -> usize {
        match self {
            Phase::Inhale => 0,
            Phase::Hold => 1,
            Phase::Exhale => 2,
            Phase::Pause => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Inhale => "inhale",
            Phase::Hold => "hold",
            Phase::Exhale => "exhale",
            Phase::Pause => "pause",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-phase durations in seconds, with optional phases collapsed to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    pub inhale: u32,
    pub hold: u32,
    pub exhale: u32,
    pub pause: u32,
}

impl PhaseDurations {
    pub fn total(&self) -> u32 {
        self.inhale
            .saturating_add(self.hold)
            .saturating_add(self.exhale)
            .saturating_add(self.pause)
    }
}

impl From<&BreathPattern> for PhaseDurations {
    fn from(p: &BreathPattern) -> Self {
        PhaseDurations {
            inhale: p.inhale,
            hold: p.hold.unwrap_or(0),
            exhale: p.exhale,
            pause: p.pause.unwrap_or(0),
        }
    }
}

/// Result of moving to the next phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub phase: Phase,
    /// Full duration of the entered phase
    pub duration: u32,
    /// True when the sequence wrapped back to the start of a cycle
    pub cycle_completed: bool,
}

/// Pure next-phase / duration lookup for one pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSequencer {
    durations: PhaseDurations,
}

impl PhaseSequencer {
    pub fn new(pattern: &BreathPattern) -> Self {
        Self {
            durations: PhaseDurations::from(pattern),
        }
    }

    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }

    /// Configured duration of `phase`, or 0 if it is not configured.
    pub fn duration_of(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Inhale => self.durations.inhale,
            Phase::Hold => self.durations.hold,
            Phase::Exhale => self.durations.exhale,
            Phase::Pause => self.durations.pause,
        }
    }

    /// Length of one full cycle in seconds.
    pub fn cycle_seconds(&self) -> u32 {
        self.durations.total()
    }

    /// True when every phase has zero duration and no countdown is possible.
    pub fn is_degenerate(&self) -> bool {
        self.cycle_seconds() == 0
    }

    /// First phase of a session: the first non-empty phase in cycle order.
    pub fn first_phase(&self) -> Phase {
        Phase::ORDER
            .into_iter()
            .find(|p| self.duration_of(*p) > 0)
            .unwrap_or(Phase::Inhale)
    }

    /// Phase that follows `current`, skipping empty phases.
    ///
    /// For the usual pattern (non-zero inhale and exhale):
    /// `Inhale → Hold` only if hold > 0, else `Inhale → Exhale`;
    /// `Exhale → Pause` only if pause > 0, else `Exhale → Inhale`;
    /// `Hold → Exhale` and `Pause → Inhale` always.
    pub fn next_phase(&self, current: Phase) -> Phase {
        self.advance(current).phase
    }

    /// Step to the next phase and report whether a cycle wrapped.
    pub fn advance(&self, current: Phase) -> PhaseTransition {
        let start = current.index();
        let mut cycle_completed = false;
        for step in 1..=Phase::ORDER.len() {
            let idx = start + step;
            if idx >= Phase::ORDER.len() {
                cycle_completed = true;
            }
            let candidate = Phase::ORDER[idx % Phase::ORDER.len()];
            if self.duration_of(candidate) > 0 {
                return PhaseTransition {
                    phase: candidate,
                    duration: self.duration_of(candidate),
                    cycle_completed,
                };
            }
        }
        // Empty pattern: nothing to enter, park on inhale.
        PhaseTransition {
            phase: Phase::Inhale,
            duration: 0,
            cycle_completed: current != Phase::Inhale,
        }
    }
}
