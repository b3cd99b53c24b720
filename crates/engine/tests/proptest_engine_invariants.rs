//! Property-based tests for the gesture engine.
//!
//! 1. Committed segment stores stay sorted, disjoint, long enough and in range
//!    under arbitrary pointer, clock and completion sequences.
//! 2. Two normal drag deltas land on the same boundary as their sum.
//! 3. Rubber-band damping is strictly monotonic and bounded.
//! 4. Detail windows contain their handle and never exceed half the track.
//! 5. The dwell timer never fires before an uninterrupted 600 ms hold.

use std::time::Duration;

use proptest::prelude::*;
use trimline_engine::{
    AnimationId, Command, CommitPhase, DragTarget, Engine, Event, Segment, SegmentId,
    detail_window, rubber_band,
};

const DURATION: f64 = 10.0;
const WIDTH: f64 = 1_000.0;
const MIN_LEN: f64 = 0.1;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Step {
    Down(f64),
    Move(f64),
    Up,
    Wait(u64),
    Finish,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        1 => (-50.0..1_050.0_f64).prop_map(Step::Down),
        4 => (-300.0..1_300.0_f64).prop_map(Step::Move),
        1 => Just(Step::Up),
        1 => (0_u64..900).prop_map(Step::Wait),
        1 => Just(Step::Finish),
    ]
}

fn initial_bounds() -> impl Strategy<Value = Vec<(f64, f64)>> {
    proptest::collection::vec((0.0..DURATION, 0.0..3.0_f64), 1..6).prop_map(|raw| {
        raw.into_iter()
            .map(|(start, length)| (start, start + length))
            .collect()
    })
}

fn engine_with(bounds: &[(f64, f64)]) -> Engine<()> {
    let mut engine = Engine::new(DURATION, WIDTH);
    let segments = bounds
        .iter()
        .enumerate()
        .map(|(index, (start, end))| Segment::new(SegmentId(index as u64 + 1), *start, *end))
        .collect();
    engine.handle_command(Command::ReplaceSegments(segments));
    engine
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Store invariants hold in every committed state
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn committed_states_keep_store_invariants(
        bounds in initial_bounds(),
        steps in proptest::collection::vec(step(), 1..60),
    ) {
        let mut engine = engine_with(&bounds);
        prop_assert!(engine.store().check_invariants(DURATION, MIN_LEN).is_ok());

        let mut now = 0_u64;
        let mut animation: Option<AnimationId> = None;
        for step in steps {
            now += 16;
            let command = match step {
                Step::Down(x) => Command::PointerDown { x, at: ms(now) },
                Step::Move(x) => Command::PointerMove { x, at: ms(now) },
                Step::Up => Command::PointerUp { at: ms(now) },
                Step::Wait(delay) => {
                    now += delay;
                    Command::Tick { at: ms(now) }
                }
                Step::Finish => match animation.take() {
                    Some(animation) => Command::AnimationFinished { animation, at: ms(now) },
                    None => Command::Tick { at: ms(now) },
                },
            };
            for event in engine.handle_command(command) {
                if let Event::AnimationStarted { animation: started, .. } = event {
                    animation = Some(started);
                }
            }

            prop_assert!(
                !(engine.intent().is_some() && engine.detail_mode().is_some()),
                "intent and detail view coexist"
            );
            if !matches!(engine.commit_phase(), CommitPhase::Committing(_)) {
                let checked = engine.store().check_invariants(DURATION, MIN_LEN);
                prop_assert!(checked.is_ok(), "{:?} for {:?}", checked, engine.segments());
            }
        }

        for event in engine.handle_command(Command::PointerUp { at: ms(now + 1) }) {
            if let Event::AnimationStarted { animation: started, .. } = event {
                animation = Some(started);
            }
        }
        if let Some(animation) = animation {
            engine.handle_command(Command::AnimationFinished { animation, at: ms(now + 500) });
        }
        engine.handle_command(Command::Tick { at: ms(now + 2_000) });
        prop_assert_eq!(engine.commit_phase(), &CommitPhase::Idle);
        prop_assert!(!engine.segments().is_empty());
        prop_assert!(engine.store().check_invariants(DURATION, MIN_LEN).is_ok());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Normal drag deltas compose
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn split_drag_matches_combined_drag(first in -180_i32..190, total in -180_i32..190) {
        let bounds = [(2.0, 4.0), (6.0, 8.0)];

        let mut stepped = engine_with(&bounds);
        stepped.start_drag(DragTarget::EndHandle(0), 400.0, ms(0));
        stepped.handle_command(Command::PointerMove { x: 400.0 + f64::from(first), at: ms(16) });
        stepped.handle_command(Command::PointerMove { x: 400.0 + f64::from(total), at: ms(32) });

        let mut direct = engine_with(&bounds);
        direct.start_drag(DragTarget::EndHandle(0), 400.0, ms(0));
        direct.handle_command(Command::PointerMove { x: 400.0 + f64::from(total), at: ms(16) });

        prop_assert!(stepped.intent().is_none());
        prop_assert_eq!(stepped.segments()[0].end, direct.segments()[0].end);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Damping is monotonic and bounded
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn damping_grows_with_overshoot(raw in 0.0..500.0_f64, delta in 0.01..500.0_f64) {
        let scale = 0.55 * 100.0;
        prop_assert!(rubber_band(raw + delta, scale) > rubber_band(raw, scale));
    }

    #[test]
    fn damping_stays_below_scale(raw in 0.0..1.0e12_f64) {
        let scale = 0.55 * 100.0;
        prop_assert!(rubber_band(raw, scale) < scale);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Detail window containment
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn detail_window_contains_handle(duration in 0.01..10_000.0_f64, ratio in 0.0..=1.0_f64) {
        let handle = (ratio * duration).min(duration);
        let window = detail_window(handle, duration);

        prop_assert!(window.start >= 0.0);
        prop_assert!(window.start <= handle);
        prop_assert!(handle <= window.end);
        prop_assert!(window.end <= duration);
        prop_assert!(window.span() <= duration / 2.0 + duration * 1e-12);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Dwell timing
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn dwell_waits_for_uninterrupted_hold(gaps in proptest::collection::vec(1_u64..600, 0..12)) {
        let mut engine = engine_with(&[(0.0, 4.0), (6.0, 10.0)]);
        engine.handle_command(Command::PointerDown { x: 400.0, at: ms(0) });

        let mut last_move = 0_u64;
        for (index, gap) in gaps.iter().enumerate() {
            let at = last_move + gap;
            engine.handle_command(Command::Tick { at: ms(at) });
            prop_assert!(engine.detail_mode().is_none());

            let x = if index % 2 == 0 { 410.0 } else { 420.0 };
            engine.handle_command(Command::PointerMove { x, at: ms(at) });
            last_move = at;
        }

        engine.handle_command(Command::Tick { at: ms(last_move + 599) });
        prop_assert!(engine.detail_mode().is_none());
        engine.handle_command(Command::Tick { at: ms(last_move + 600) });
        prop_assert!(engine.detail_mode().is_some());
    }
}
