use super::*;

fn count_ticks(events: &[ClockEvent], id: SourceId) -> u64 {
    events
        .iter()
        .filter_map(|e| match e {
            ClockEvent::Tick {
                source, periods, ..
            } if *source == id => Some(*periods),
            _ => None,
        })
        .sum()
}

#[test]
fn interval_catches_up_on_elapsed_periods() {
    let mut sched = FrameScheduler::new();
    let timer = sched.every(50.0).unwrap();

    assert!(sched.advance(49.0).is_empty());
    let events = sched.advance(1.0);
    assert_eq!(count_ticks(&events, timer.id()), 1);

    let events = sched.advance(120.0);
    assert_eq!(count_ticks(&events, timer.id()), 2);
    assert_eq!(sched.now_ms(), 170.0);
}

#[test]
fn frames_fire_once_per_advance_after_ticks() {
    let mut sched = FrameScheduler::new();
    let frames = sched.request_frames();
    let timer = sched.every(10.0).unwrap();

    let events = sched.advance(35.0);
    assert_eq!(
        events,
        vec![
            ClockEvent::Tick {
                source: timer.id(),
                due_ms: 30.0,
                periods: 3
            },
            ClockEvent::Frame {
                source: frames.id(),
                now_ms: 35.0
            },
        ]
    );

    // Next due is 40: 5 ms short of it yields nothing, landing on it yields one period.
    assert_eq!(count_ticks(&sched.advance(4.0), timer.id()), 0);
    assert_eq!(count_ticks(&sched.advance(1.0), timer.id()), 1);
}

#[test]
fn long_gaps_coalesce_into_one_tick() {
    let mut sched = FrameScheduler::new();
    let timer = sched.every(50.0).unwrap();

    let events = sched.advance(1e8);
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0],
        ClockEvent::Tick {
            source: timer.id(),
            due_ms: 1e8,
            periods: 2_000_000
        }
    );

    // Phase is kept: the next period is due 50 ms after the last one.
    assert!(sched.advance(49.0).is_empty());
    assert_eq!(count_ticks(&sched.advance(1.0), timer.id()), 1);
}

#[test]
fn coalesced_ticks_match_small_steps() {
    let mut coarse = FrameScheduler::new();
    let mut fine = FrameScheduler::new();
    let a = coarse.every(50.0).unwrap();
    let b = fine.every(50.0).unwrap();

    let total: u64 = [37.0, 250.0, 13.0, 1234.5]
        .iter()
        .map(|dt| count_ticks(&coarse.advance(*dt), a.id()))
        .sum();
    let mut steps = 0;
    for _ in 0..15345 {
        steps += count_ticks(&fine.advance(0.1), b.id());
    }
    assert_eq!(total, 30);
    assert_eq!(steps, 30);
}

#[test]
fn cancelled_sources_never_fire_again() {
    let mut sched = FrameScheduler::new();
    let frames = sched.request_frames();
    let timer = sched.every(5.0).unwrap();
    assert_eq!(sched.active_count(), 2);

    frames.cancel();
    drop(timer);
    assert_eq!(sched.active_count(), 0);
    assert!(sched.advance(100.0).is_empty());
}

#[test]
fn cancel_is_idempotent_and_safe_before_first_fire() {
    let mut sched = FrameScheduler::new();
    let timer = sched.every(1000.0).unwrap();
    timer.cancel();
    timer.cancel();
    assert!(!timer.is_active());
    drop(timer);
    assert!(sched.advance(5000.0).is_empty());
}

#[test]
fn invalid_periods_are_rejected() {
    let mut sched = FrameScheduler::new();
    assert!(sched.every(0.0).is_err());
    assert!(sched.every(-1.0).is_err());
    assert!(sched.every(f64::NAN).is_err());
    assert_eq!(sched.active_count(), 0);
}

#[test]
fn negative_deltas_do_not_rewind() {
    let mut sched = FrameScheduler::new();
    sched.advance(10.0);
    sched.advance(-5.0);
    sched.advance(f64::INFINITY);
    assert_eq!(sched.now_ms(), 10.0);
}

#[test]
fn registration_inside_scope_is_released_on_early_exit() {
    fn mount(sched: &mut FrameScheduler, fail: bool) -> FolioResult<(SourceGuard, SourceGuard)> {
        let frames = sched.request_frames();
        let period = if fail { 0.0 } else { 50.0 };
        let timer = sched.every(period)?;
        Ok((frames, timer))
    }

    let mut sched = FrameScheduler::new();
    assert!(mount(&mut sched, true).is_err());
    assert_eq!(sched.active_count(), 0);

    let guards = mount(&mut sched, false).unwrap();
    assert_eq!(sched.active_count(), 2);
    drop(guards);
    assert_eq!(sched.active_count(), 0);
}
