//! Breathwork core: guided breathing sessions.
//!
//! The session engine sequences inhale/hold/exhale/pause phases for a
//! technique, counts them down once per tick, and reports completion.
//! Around it sit the technique catalog, the keyword recommender, the
//! presentation adapter and an in-memory journey tally.

pub mod catalog;
pub mod config;
pub mod phase_machine;
pub mod progress;
pub mod recommend;
pub mod runner; // Wall-clock driver with a single cancellable tick
pub mod session;
pub mod stats;
pub mod technique;

#[cfg(test)]
pub mod tests_config;
#[cfg(test)]
pub mod tests_proptest;

// ============================================================================
// CURATED PUBLIC API EXPORTS
// ============================================================================

// Techniques
pub use catalog::{
    builtin_techniques, category_counts, get_technique, load_techniques_file, resolve_technique,
    techniques_by_category,
};
pub use recommend::recommend;
pub use technique::{BreathPattern, Category, Technique, TechniqueError};

// Configuration
pub use config::{BreathworkConfig, ConfigError, PresentationConfig, SessionConfig};

// Phase machine
pub use phase_machine::{Phase, PhaseSequencer, PhaseTransition};

// Session engine
pub use session::{
    step, BreathingSession, Callbacks, Lifecycle, RunState, SessionError, SessionEvent,
    SessionObserver, SessionPlan, SessionSummary,
};

// Countdown driver
pub use runner::{SessionCommand, SessionController, SessionRunner};

// Presentation
pub use progress::{format_time, phase_visual, progress_percent, PhaseVisual, SessionSnapshot};

// Journey
pub use stats::JourneyStats;
