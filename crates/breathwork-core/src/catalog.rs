//! Technique Catalog
//!
//! Built-in breathing techniques shown by list views and used by the
//! recommender. Order is significant: the recommender falls back to the
//! first three entries.
//!
//! # Techniques Available
//! - **box-breathing**: Anxiety (4-4-4-4 square)
//! - **physiological-sigh**: Anxiety (quick double inhale, long exhale)
//! - **coherence-breathing**: Anxiety (6 in, 6 out)
//! - **4-7-8-breathing**: Sleep
//! - **buteyko-method**: Sleep (nasal breathing with pauses)
//! - **wim-hof-breathing**: Energy
//! - **extended-exhalation**: Focus

use crate::technique::{BreathPattern, Category, Technique, TechniqueError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[allow(clippy::too_many_arguments)]
fn technique(
    id: &str,
    name: &str,
    category: Category,
    description: &str,
    duration_seconds: u32,
    pattern: BreathPattern,
    instructions: &str,
    benefits: &str,
    icon: &str,
) -> Technique {
    Technique {
        id: id.to_string(),
        name: name.to_string(),
        category,
        description: description.to_string(),
        instructions: instructions.to_string(),
        benefits: benefits.to_string(),
        icon: icon.to_string(),
        duration_seconds,
        pattern,
    }
}

/// Get all built-in techniques, in catalog order.
pub fn builtin_techniques() -> Vec<Technique> {
    vec![
        technique(
            "box-breathing",
            "Box Breathing",
            Category::Anxiety,
            "Proven to activate the parasympathetic nervous system, reducing cortisol levels.",
            240,
            BreathPattern::new(4, 4).with_hold(4).with_pause(4),
            "Breathe in a square pattern: inhale, hold, exhale, pause - each for 4 counts.",
            "Used in high-pressure environments like the military to manage acute stress.",
            "⬜",
        ),
        technique(
            "physiological-sigh",
            "Physiological Sigh",
            Category::Anxiety,
            "Double inhale followed by a long exhale that rapidly reduces stress arousal.",
            60,
            BreathPattern::new(2, 8),
            "Take two quick inhales through your nose, then one long exhale through your mouth.",
            "Ideal for quick anxiety relief during the day by resetting blood CO₂ levels.",
            "🌬️",
        ),
        technique(
            "coherence-breathing",
            "Coherence Breathing",
            Category::Anxiety,
            "Balances the autonomic nervous system, improving heart rate variability.",
            300,
            BreathPattern::new(6, 6),
            "Breathe slowly and evenly: 6 seconds in, 6 seconds out.",
            "Reduces long-term emotional and physiological stress.",
            "⚖️",
        ),
        technique(
            "4-7-8-breathing",
            "4-7-8 Breathing",
            Category::Sleep,
            "Triggers the body relaxation response by extending the exhalation.",
            180,
            BreathPattern::new(4, 8).with_hold(7),
            "Inhale for 4, hold for 7, exhale for 8. Repeat the cycle.",
            "Helps reduce nighttime cortisol spikes and promotes faster sleep onset.",
            "🌙",
        ),
        technique(
            "buteyko-method",
            "Buteyko Method",
            Category::Sleep,
            "Focuses on nasal breathing and breath retention to improve oxygen efficiency.",
            600,
            BreathPattern::new(3, 3).with_pause(3),
            "Breathe gently through your nose with controlled pauses between breaths.",
            "Improves sleep quality, especially useful for people with sleep apnea.",
            "👃",
        ),
        technique(
            "wim-hof-breathing",
            "Wim Hof Breathing",
            Category::Energy,
            "Cycles of hyperventilation and breath retention increase adrenaline.",
            900,
            BreathPattern::new(2, 2),
            "30 deep breaths followed by breath retention. Repeat 3-4 cycles.",
            "Oxygenates tissues, giving a short-term energy and alertness boost.",
            "❄️",
        ),
        technique(
            "extended-exhalation",
            "Extended Exhalation",
            Category::Focus,
            "Slow exhalations elevate GABA levels and calm internal chatter.",
            360,
            BreathPattern::new(4, 8),
            "Inhale normally, then exhale twice as long to activate your calm response.",
            "Enhances focus, ideal for mentally overwhelmed users needing clarity.",
            "🎯",
        ),
    ]
}

/// Get a built-in technique by ID
pub fn get_technique(id: &str) -> Option<Technique> {
    builtin_techniques().into_iter().find(|t| t.id == id)
}

/// Get built-in techniques by category, in catalog order
pub fn techniques_by_category(category: Category) -> Vec<Technique> {
    builtin_techniques()
        .into_iter()
        .filter(|t| t.category == category)
        .collect()
}

/// Number of built-in techniques per category. Every category is present,
/// even when empty.
pub fn category_counts() -> BTreeMap<Category, usize> {
    let mut counts: BTreeMap<Category, usize> =
        Category::ALL.into_iter().map(|c| (c, 0)).collect();
    for t in builtin_techniques() {
        *counts.entry(t.category).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Serialize, Deserialize)]
struct TechniqueFile {
    #[serde(default, rename = "technique")]
    techniques: Vec<Technique>,
}

/// Load extra techniques from a TOML file of `[[technique]]` tables.
pub fn load_techniques_file<P: AsRef<Path>>(path: P) -> Result<Vec<Technique>, TechniqueError> {
    let content = fs::read_to_string(path)?;
    parse_techniques_toml(&content)
}

/// Parse a TOML document of `[[technique]]` tables.
pub fn parse_techniques_toml(content: &str) -> Result<Vec<Technique>, TechniqueError> {
    let file: TechniqueFile = toml::from_str(content)?;
    for t in &file.techniques {
        t.validate()?;
    }
    Ok(file.techniques)
}

/// Find a technique among user supplied ones first, then the built-ins.
pub fn resolve_technique(id: &str, extra: &[Technique]) -> Result<Technique, TechniqueError> {
    extra
        .iter()
        .find(|t| t.id == id)
        .cloned()
        .or_else(|| get_technique(id))
        .ok_or_else(|| {
            log::warn!("Unknown technique: {}", id);
            TechniqueError::UnknownTechnique(id.to_string())
        })
}

// ============================================================================
// TESTS
// ============================================================================
