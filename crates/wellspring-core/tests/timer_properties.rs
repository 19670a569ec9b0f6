//! Property tests for the router, the relaxation timers and the journal.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use wellspring_core::screens::Journal;
use wellspring_core::timer::{BreathingExercise, BreathingPhase, MeditationTimer};
use wellspring_core::{Event, Router, View};

// -- Strategy helpers --

fn arb_view() -> impl Strategy<Value = View> {
    prop_oneof![
        Just(View::Dashboard),
        Just(View::Mood),
        Just(View::Relax),
        Just(View::Journal),
        Just(View::Profile),
    ]
}

/// Strictly increasing tick instants.
fn arb_ticks() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(1u64..20_000, 1..40).prop_map(|gaps| {
        gaps.into_iter()
            .scan(0u64, |now, gap| {
                *now += gap;
                Some(*now)
            })
            .collect()
    })
}

/// Phase the exercise must be in `elapsed` ms after starting.
fn expected_phase(elapsed: u64) -> BreathingPhase {
    let mut offset = elapsed % BreathingPhase::cycle_ms();
    for phase in BreathingPhase::ALL {
        if offset < phase.duration_ms() {
            return phase;
        }
        offset -= phase.duration_ms();
    }
    BreathingPhase::Inhale
}

proptest! {
    #[test]
    fn navigation_lands_on_last_target(targets in prop::collection::vec(arb_view(), 1..30)) {
        let mut router = Router::new();
        for target in &targets {
            router.navigate(*target);
        }
        let last = *targets.last().unwrap();
        let expected = if last == View::Profile { View::Dashboard } else { last };
        prop_assert_eq!(router.current(), expected);
    }

    #[test]
    fn back_always_returns_to_dashboard(targets in prop::collection::vec(arb_view(), 0..30)) {
        let mut router = Router::new();
        for target in targets {
            router.navigate(target);
        }
        router.back();
        prop_assert_eq!(router.current(), View::Dashboard);
    }

    #[test]
    fn breathing_never_skips_a_phase(ticks in arb_ticks()) {
        let mut exercise = BreathingExercise::new();
        exercise.start(0);
        let mut phase = BreathingPhase::Inhale;
        for now in &ticks {
            for event in exercise.tick(*now) {
                if let Event::BreathingPhaseChanged { from, to, .. } = event {
                    prop_assert_eq!(from, phase);
                    prop_assert_eq!(to, from.next());
                    phase = to;
                }
            }
        }
        let last = *ticks.last().unwrap();
        prop_assert_eq!(exercise.phase(), expected_phase(last));
        prop_assert_eq!(exercise.cycles_completed(), last / BreathingPhase::cycle_ms());
    }

    #[test]
    fn meditation_counts_only_running_time(
        segments in prop::collection::vec((0u64..5_000, 0u64..5_000), 1..20)
    ) {
        let mut timer = MeditationTimer::new(300).unwrap();
        let mut now = 0u64;
        let mut running_ms = 0u64;
        for (run, rest) in segments {
            timer.start(now);
            now += run;
            running_ms += run;
            timer.pause(now);
            prop_assert!(!timer.is_running());
            let frozen = timer.remaining_secs();
            now += rest;
            timer.tick(now);
            prop_assert_eq!(timer.remaining_secs(), frozen);
        }
        prop_assert_eq!(timer.remaining_secs() as u64, 300 - running_ms / 1_000);
    }

    #[test]
    fn journal_timestamps_never_decrease(offsets in prop::collection::vec(-3_600i64..3_600, 1..20)) {
        let base = Utc.timestamp_opt(1_700_000_000, 0).single().unwrap();
        let mut journal = Journal::new();
        for (i, offset) in offsets.iter().enumerate() {
            journal.set_draft(format!("entry {i}"));
            journal.save(base + Duration::seconds(*offset)).unwrap();
        }
        let entries = journal.entries();
        prop_assert_eq!(entries.len(), offsets.len());
        for pair in entries.windows(2) {
            prop_assert!(pair[0].created_at >= pair[1].created_at);
        }
    }
}
