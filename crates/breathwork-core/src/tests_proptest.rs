use proptest::prelude::*;

/// Property-based tests for the session engine invariants.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_technique;
    use crate::phase_machine::Phase;
    use crate::session::{step, BreathingSession, RunState, SessionEvent, SessionObserver, SessionPlan};
    use crate::technique::{BreathPattern, Technique};

    #[derive(Default)]
    struct Counter {
        completes: u32,
        closes: u32,
    }

    impl SessionObserver for Counter {
        fn on_close(&mut self) {
            self.closes += 1;
        }
        fn on_complete(&mut self) {
            self.completes += 1;
        }
    }

    fn any_pattern() -> impl Strategy<Value = BreathPattern> {
        (
            0u32..10,
            prop::option::of(0u32..6),
            0u32..10,
            prop::option::of(0u32..6),
        )
            .prop_map(|(inhale, hold, exhale, pause)| BreathPattern {
                inhale,
                hold,
                exhale,
                pause,
            })
    }

    /// Patterns a session accepts, the empty one included.
    fn pattern_strategy() -> impl Strategy<Value = BreathPattern> {
        any_pattern().prop_filter("pattern must validate", |p| p.validate().is_ok())
    }

    /// Accepted patterns that actually count down.
    fn breathing_pattern() -> impl Strategy<Value = BreathPattern> {
        pattern_strategy().prop_filter("pattern must not be empty", |p| p.cycle_seconds() > 0)
    }

    fn technique_with(pattern: BreathPattern, duration_seconds: u32) -> Technique {
        let mut t = get_technique("box-breathing").expect("catalog entry");
        t.id = "generated".to_string();
        t.pattern = pattern;
        t.duration_seconds = duration_seconds;
        t
    }

    fn running(plan: &SessionPlan) -> RunState {
        step(plan, RunState::new(plan), SessionEvent::Start)
    }

    // =========================================================================
    // Test 1: Exactly one completion, no ticks afterwards
    // =========================================================================
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_single_completion(
            pattern in pattern_strategy(),
            duration in 0u32..400,
            extra in 1usize..50,
        ) {
            let mut session = BreathingSession::new(technique_with(pattern, duration), Counter::default())
                .expect("valid technique");
            session.start();
            let mut ticks = 0u32;
            while !session.is_finished() {
                session.tick();
                ticks += 1;
                prop_assert!(ticks <= duration.max(1), "session did not complete in time");
            }
            let done = *session.state();
            let expected = if session.plan().is_degenerate() { 0 } else { duration };
            prop_assert_eq!(done.total_elapsed_seconds, expected);

            for _ in 0..extra {
                session.tick();
                session.resume();
            }
            prop_assert_eq!(*session.state(), done);
            prop_assert_eq!(session.observer().completes, 1);
            prop_assert_eq!(session.observer().closes, 0);
        }
    }

    // =========================================================================
    // Test 2: Cycle count moves only on entry into inhale
    // =========================================================================
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_cycle_count_tracks_inhale_entries(
            pattern in breathing_pattern(),
            events in prop::collection::vec(prop::bool::weighted(0.8), 1..300),
        ) {
            let plan = SessionPlan::from_technique(&technique_with(pattern, 10_000));
            let mut state = running(&plan);
            for is_tick in events {
                let event = if is_tick { SessionEvent::Tick } else { SessionEvent::Skip };
                let next = step(&plan, state, event);
                let entered_inhale =
                    next.current_phase == Phase::Inhale && state.current_phase != Phase::Inhale;
                let expected = state.cycle_count + u32::from(entered_inhale);
                prop_assert_eq!(next.cycle_count, expected);
                state = next;
            }
        }
    }

    // =========================================================================
    // Test 3: Only complete or empty patterns start a session
    // =========================================================================
    proptest! {
        #[test]
        fn test_session_accepts_only_usable_patterns(pattern in any_pattern()) {
            let one_sided = pattern.inhale == 0 || pattern.exhale == 0;
            let accepted = BreathingSession::new(technique_with(pattern, 60), ()).is_ok();
            prop_assert_eq!(accepted, !one_sided || pattern.cycle_seconds() == 0);
        }
    }

    // =========================================================================
    // Test 4: Skip never touches elapsed time
    // =========================================================================
    proptest! {
        #[test]
        fn test_skip_preserves_elapsed(
            pattern in breathing_pattern(),
            warmup in 0usize..40,
            skips in 1usize..10,
        ) {
            let plan = SessionPlan::from_technique(&technique_with(pattern, 10_000));
            let mut state = running(&plan);
            for _ in 0..warmup {
                state = step(&plan, state, SessionEvent::Tick);
            }
            let elapsed = state.total_elapsed_seconds;
            for _ in 0..skips {
                state = step(&plan, state, SessionEvent::Skip);
                prop_assert_eq!(state.total_elapsed_seconds, elapsed);
                prop_assert_eq!(
                    state.time_left_in_phase,
                    plan.sequencer.duration_of(state.current_phase)
                );
            }
        }
    }

    // =========================================================================
    // Test 5: Pause/resume is invisible at equal elapsed time
    // =========================================================================
    proptest! {
        #[test]
        fn test_pause_resume_equivalence(
            pattern in breathing_pattern(),
            before_pause in 0usize..60,
            idle_ticks in 0usize..20,
            after_resume in 0usize..60,
        ) {
            let plan = SessionPlan::from_technique(&technique_with(pattern, 10_000));

            let mut straight = running(&plan);
            for _ in 0..(before_pause + after_resume) {
                straight = step(&plan, straight, SessionEvent::Tick);
            }

            let mut interrupted = running(&plan);
            for _ in 0..before_pause {
                interrupted = step(&plan, interrupted, SessionEvent::Tick);
            }
            interrupted = step(&plan, interrupted, SessionEvent::Pause);
            for _ in 0..idle_ticks {
                interrupted = step(&plan, interrupted, SessionEvent::Tick);
            }
            interrupted = step(&plan, interrupted, SessionEvent::Resume);
            for _ in 0..after_resume {
                interrupted = step(&plan, interrupted, SessionEvent::Tick);
            }

            prop_assert_eq!(interrupted, straight);
        }
    }

    // =========================================================================
    // Test 6: Countdown bounds and unreachable empty phases
    // =========================================================================
    proptest! {
        #[test]
        fn test_countdown_within_phase_bounds(
            pattern in breathing_pattern(),
            ticks in 1usize..200,
        ) {
            let plan = SessionPlan::from_technique(&technique_with(pattern, 10_000));
            let mut state = running(&plan);
            for _ in 0..ticks {
                state = step(&plan, state, SessionEvent::Tick);
                let full = plan.sequencer.duration_of(state.current_phase);
                prop_assert!(full > 0, "entered empty phase {:?}", state.current_phase);
                prop_assert!(state.time_left_in_phase >= 1);
                prop_assert!(state.time_left_in_phase <= full);
            }
        }
    }
}
