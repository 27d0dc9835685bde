//! Journey statistics.
//!
//! In-memory tally of finished sessions. Nothing is persisted; the host
//! feeds [`SessionSummary`] values in from its completion/close handlers.

use crate::session::SessionSummary;
use crate::technique::Category;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JourneyStats {
    total_sessions: u32,
    completed_sessions: u32,
    total_seconds: u64,
    by_category: BTreeMap<Category, u32>,
    practice_days: BTreeSet<NaiveDate>,
}

impl JourneyStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a session that ended on `day`.
    pub fn record(&mut self, summary: &SessionSummary, day: NaiveDate) {
        self.total_sessions += 1;
        self.total_seconds += u64::from(summary.elapsed_seconds);
        if summary.completed {
            self.completed_sessions += 1;
            *self.by_category.entry(summary.category).or_insert(0) += 1;
            self.practice_days.insert(day);
        }
    }

    /// Record a session that ended today (local time).
    pub fn record_today(&mut self, summary: &SessionSummary) {
        self.record(summary, Local::now().date_naive());
    }

    pub fn total_sessions(&self) -> u32 {
        self.total_sessions
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    /// Whole minutes practised, across completed and abandoned sessions.
    pub fn total_minutes(&self) -> u64 {
        self.total_seconds / 60
    }

    /// Category with the most completed sessions. Ties go to the category
    /// listed first.
    pub fn favorite_category(&self) -> Option<Category> {
        let mut best: Option<(Category, u32)> = None;
        for (category, count) in &self.by_category {
            match best {
                Some((_, top)) if top >= *count => {}
                _ => best = Some((*category, *count)),
            }
        }
        best.map(|(c, _)| c)
    }

    /// Consecutive days with a completed session, ending at the most recent
    /// practice day.
    pub fn streak_days(&self) -> u32 {
        let mut days = self.practice_days.iter().rev();
        let Some(mut prev) = days.next().copied() else {
            return 0;
        };
        let mut streak = 1;
        for day in days {
            if prev.pred_opt() == Some(*day) {
                streak += 1;
                prev = *day;
            } else {
                break;
            }
        }
        streak
    }
}
