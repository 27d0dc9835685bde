//! Technique descriptors.
//!
//! A [`Technique`] is an immutable, named breathing pattern with per-phase
//! durations and a total session length. Techniques come from the built-in
//! catalog or from TOML/JSON files supplied by the host application.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TechniqueError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("unknown technique: {0}")]
    UnknownTechnique(String),
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("technique validation error: {0}")]
    Validation(String),
}

/// Fixed set of technique categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Anxiety,
    Sleep,
    Focus,
    Energy,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Anxiety,
        Category::Sleep,
        Category::Focus,
        Category::Energy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Anxiety => "anxiety",
            Category::Sleep => "sleep",
            Category::Focus => "focus",
            Category::Energy => "energy",
        }
    }

    /// Human readable label used by list views.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Anxiety => "Anxiety & Stress",
            Category::Sleep => "Sleep",
            Category::Focus => "Focus",
            Category::Energy => "Energy",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TechniqueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TechniqueError::UnknownCategory(s.to_string()))
    }
}

/// Phase timings in whole seconds.
///
/// `hold` and `pause` are optional. `None` and `Some(0)` both mean the phase
/// is skipped by the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathPattern {
    pub inhale: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold: Option<u32>,
    pub exhale: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause: Option<u32>,
}

impl BreathPattern {
    pub fn new(inhale: u32, exhale: u32) -> Self {
        Self {
            inhale,
            hold: None,
            exhale,
            pause: None,
        }
    }

    pub fn with_hold(mut self, hold: u32) -> Self {
        self.hold = Some(hold);
        self
    }

    pub fn with_pause(mut self, pause: u32) -> Self {
        self.pause = Some(pause);
        self
    }

    /// Length of one full cycle in seconds.
    pub fn cycle_seconds(&self) -> u32 {
        self.inhale
            .saturating_add(self.hold.unwrap_or(0))
            .saturating_add(self.exhale)
            .saturating_add(self.pause.unwrap_or(0))
    }

    /// Inhale and exhale are both required. The only exception is an
    /// all-zero pattern, which completes on its first tick.
    pub fn validate(&self) -> Result<(), TechniqueError> {
        if (self.inhale == 0 || self.exhale == 0) && self.cycle_seconds() > 0 {
            return Err(TechniqueError::Validation(format!(
                "pattern needs both inhale and exhale (inhale={}, exhale={})",
                self.inhale, self.exhale
            )));
        }
        Ok(())
    }

    /// Breaths per minute, or 0.0 for an empty pattern.
    pub fn breaths_per_minute(&self) -> f32 {
        match self.cycle_seconds() {
            0 => 0.0,
            total => 60.0 / total as f32,
        }
    }
}

/// Breathing technique definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technique {
    /// Unique technique identifier
    pub id: String,
    /// Display name
    pub name: String,
    pub category: Category,
    pub description: String,
    /// Shown under the countdown while the session runs
    pub instructions: String,
    pub benefits: String,
    pub icon: String,
    /// Target session length
    pub duration_seconds: u32,
    pub pattern: BreathPattern,
}

impl Technique {
    /// Parse a single technique from TOML.
    pub fn from_toml_str(s: &str) -> Result<Self, TechniqueError> {
        let technique: Technique = toml::from_str(s)?;
        technique.validate()?;
        Ok(technique)
    }

    /// Parse a single technique from JSON.
    pub fn from_json_str(s: &str) -> Result<Self, TechniqueError> {
        let technique: Technique = serde_json::from_str(s)?;
        technique.validate()?;
        Ok(technique)
    }

    /// Check the descriptor is usable for a session.
    pub fn validate(&self) -> Result<(), TechniqueError> {
        if self.id.trim().is_empty() {
            return Err(TechniqueError::Validation(
                "technique.id must not be blank".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(TechniqueError::Validation(format!(
                "technique '{}' must have a name",
                self.id
            )));
        }
        self.pattern.validate()
    }
}
