//! End-to-end drawing scenarios through the public session API: pointer
//! events in, classified strokes and history state out.

use scrawl::{Coord, DrawingSession, StrokeOutcome};
use std::time::{Duration, SystemTime};

fn at(base: SystemTime, ms: u64) -> SystemTime {
    base + Duration::from_millis(ms)
}

/// A deliberate, slow stroke from `from` to `to`.
fn write_stroke(
    session: &mut DrawingSession,
    base: SystemTime,
    start_ms: u64,
    from: (f64, f64),
    to: (f64, f64),
) -> Option<StrokeOutcome> {
    session.pointer_down_at(Coord::new(from.0, from.1), at(base, start_ms));
    for i in 1..=10u64 {
        let t = i as f64 / 10.0;
        session.pointer_move_at(
            Coord::new(from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t),
            at(base, start_ms + i * 30),
        );
    }
    session.pointer_up_at(at(base, start_ms + 330))
}

/// A fast zigzag scribble filling the box between `min` and `max`.
fn scribble(
    session: &mut DrawingSession,
    base: SystemTime,
    start_ms: u64,
    min: (f64, f64),
    max: (f64, f64),
) -> Option<StrokeOutcome> {
    session.pointer_down_at(Coord::new(min.0, min.1), at(base, start_ms));
    for i in 1..=10u64 {
        let x = if i % 2 == 0 { min.0 } else { max.0 };
        let y = min.1 + (max.1 - min.1) * (i as f64 / 10.0);
        session.pointer_move_at(Coord::new(x, y), at(base, start_ms + i));
    }
    session.pointer_up_at(at(base, start_ms + 11))
}

#[test]
fn writing_commits_strokes_in_order() {
    let base = SystemTime::now();
    let mut session = DrawingSession::default();

    assert_eq!(
        write_stroke(&mut session, base, 0, (100.0, 100.0), (150.0, 110.0)),
        Some(StrokeOutcome::Committed)
    );
    assert_eq!(
        write_stroke(&mut session, base, 500, (160.0, 100.0), (210.0, 110.0)),
        Some(StrokeOutcome::Committed)
    );

    let strokes = session.committed_strokes();
    assert_eq!(strokes.len(), 2);
    assert!(strokes[0].bounding_box.end.x <= strokes[1].bounding_box.end.x);
}

#[test]
fn scribble_erases_only_covered_strokes() {
    let base = SystemTime::now();
    let mut session = DrawingSession::default();

    // Two separate marks: one left, one far right.
    write_stroke(&mut session, base, 0, (100.0, 100.0), (150.0, 110.0));
    write_stroke(&mut session, base, 500, (400.0, 100.0), (450.0, 110.0));
    assert_eq!(session.committed_strokes().len(), 2);

    // Scribble out only the left mark.
    let outcome = scribble(&mut session, base, 1_000, (90.0, 90.0), (160.0, 120.0));
    assert_eq!(outcome, Some(StrokeOutcome::Erased(1)));

    let strokes = session.committed_strokes();
    assert_eq!(strokes.len(), 1);
    assert!(strokes[0].bounding_box.start.x >= 400.0);
}

#[test]
fn erasing_everything_resets_the_session_clock() {
    let base = SystemTime::now();
    let mut session = DrawingSession::default();

    write_stroke(&mut session, base, 0, (100.0, 100.0), (150.0, 110.0));
    assert!(session.timer().elapsed_minutes().is_some());

    let outcome = scribble(&mut session, base, 1_000, (90.0, 90.0), (160.0, 120.0));
    assert_eq!(outcome, Some(StrokeOutcome::Erased(1)));
    assert!(session.committed_strokes().is_empty());
    assert_eq!(session.timer().elapsed_minutes(), None);

    // The next stroke starts a brand-new session.
    write_stroke(&mut session, base, 60_000, (100.0, 100.0), (150.0, 110.0));
    let started = session.timer().started_at().unwrap();
    assert_eq!(started, at(base, 60_000));
}

#[test]
fn undo_redo_round_trip_preserves_order() {
    let base = SystemTime::now();
    let mut session = DrawingSession::default();

    write_stroke(&mut session, base, 0, (100.0, 100.0), (150.0, 110.0));
    write_stroke(&mut session, base, 500, (160.0, 100.0), (210.0, 110.0));
    write_stroke(&mut session, base, 1_000, (220.0, 100.0), (270.0, 110.0));
    let original: Vec<_> = session.committed_strokes().to_vec();

    session.undo();
    session.undo();
    assert_eq!(session.committed_strokes().len(), 1);

    session.redo();
    session.redo();
    assert_eq!(session.committed_strokes(), original.as_slice());

    // Redo past the end of the stack is a no-op.
    session.redo();
    assert_eq!(session.committed_strokes(), original.as_slice());
}

#[test]
fn starting_a_stroke_after_undo_clears_redo() {
    let base = SystemTime::now();
    let mut session = DrawingSession::default();

    write_stroke(&mut session, base, 0, (100.0, 100.0), (150.0, 110.0));
    session.undo();
    assert!(session.can_redo());

    write_stroke(&mut session, base, 500, (160.0, 100.0), (210.0, 110.0));
    assert!(!session.can_redo());
    session.redo();
    assert_eq!(session.committed_strokes().len(), 1);
}

#[test]
fn session_survives_many_short_strokes() {
    let base = SystemTime::now();
    let mut session = DrawingSession::default();

    for i in 0..20u64 {
        let x = 100.0 + i as f64 * 30.0;
        write_stroke(&mut session, base, i * 400, (x, 100.0), (x + 20.0, 112.0));
    }

    assert_eq!(session.committed_strokes().len(), 20);
    // Session start stays pinned to the very first stroke.
    assert_eq!(session.timer().started_at(), Some(base));
    assert_eq!(session.timer().ended_at(), Some(at(base, 19 * 400 + 330)));
}
