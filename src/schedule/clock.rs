//! Single-threaded virtual clock driving the two periodic sources of the page: the
//! display-refresh frame loop and the fixed-interval rotation ticker.
//!
//! Sources are registered on a [`FrameScheduler`] and handed back as [`SourceGuard`]s.
//! Dropping a guard (or calling [`SourceGuard::cancel`]) stops the source; cancellation is
//! idempotent and safe for sources that never fired. The scheduler never invokes callbacks
//! itself: [`FrameScheduler::advance`] returns the due [`ClockEvent`]s and the owner
//! dispatches them, checking [`SourceGuard::is_active`] so nothing fires after it was
//! cancelled mid-batch.

use std::{cell::Cell, rc::Rc};

use crate::foundation::error::{FolioError, FolioResult};

/// Identifier for a registered periodic source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClockEvent {
    /// Display refresh for a frame-loop source, stamped with the clock time after advancing.
    Frame { source: SourceId, now_ms: f64 },
    /// Elapsed periods of an interval source since the last advance, coalesced into one event
    /// stamped with the latest due time. `periods` is at least 1.
    Tick {
        source: SourceId,
        due_ms: f64,
        periods: u64,
    },
}

impl ClockEvent {
    pub fn source(&self) -> SourceId {
        match *self {
            Self::Frame { source, .. } | Self::Tick { source, .. } => source,
        }
    }
}

#[derive(Clone, Debug)]
enum SourceKind {
    Frames,
    Interval { period_ms: f64, next_due_ms: f64 },
}

#[derive(Debug)]
struct Source {
    id: SourceId,
    kind: SourceKind,
    live: Rc<Cell<bool>>,
}

/// Cancellation handle for a registered source. Cancels on drop.
#[derive(Debug)]
pub struct SourceGuard {
    id: SourceId,
    live: Rc<Cell<bool>>,
}

impl SourceGuard {
    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.live.get()
    }

    /// Stop the source. Calling this more than once is a no-op.
    pub fn cancel(&self) {
        if self.live.replace(false) {
            tracing::debug!(source = self.id.0, "clock source cancelled");
        }
    }
}

impl Drop for SourceGuard {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    now_ms: f64,
    next_id: u64,
    sources: Vec<Source>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Number of sources that have not been cancelled.
    pub fn active_count(&self) -> usize {
        self.sources.iter().filter(|s| s.live.get()).count()
    }

    /// Register a display-refresh loop: one [`ClockEvent::Frame`] per [`advance`](Self::advance)
    /// until the guard is cancelled.
    pub fn request_frames(&mut self) -> SourceGuard {
        self.register(SourceKind::Frames)
    }

    /// Register a fixed-interval source. The first tick is due one period from now.
    pub fn every(&mut self, period_ms: f64) -> FolioResult<SourceGuard> {
        if !period_ms.is_finite() || period_ms <= 0.0 {
            return Err(FolioError::validation(format!(
                "interval period must be finite and > 0 (got {period_ms})"
            )));
        }
        Ok(self.register(SourceKind::Interval {
            period_ms,
            next_due_ms: self.now_ms + period_ms,
        }))
    }

    fn register(&mut self, kind: SourceKind) -> SourceGuard {
        let id = SourceId(self.next_id);
        self.next_id += 1;
        let live = Rc::new(Cell::new(true));
        tracing::debug!(source = id.0, kind = ?kind, "clock source registered");
        self.sources.push(Source {
            id,
            kind,
            live: live.clone(),
        });
        SourceGuard { id, live }
    }

    /// Move the clock forward by `dt_ms` and return the due events in time order.
    ///
    /// Each interval source yields at most one [`ClockEvent::Tick`] carrying the number of
    /// periods that elapsed, so the cost does not grow with `dt_ms`. Frame sources fire once,
    /// after all ticks. Negative or non-finite deltas are treated as zero.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<ClockEvent> {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        let end_ms = self.now_ms + dt_ms;

        self.sources.retain(|s| s.live.get());

        let mut ticks = Vec::new();
        let mut frames = Vec::new();
        for source in &mut self.sources {
            match &mut source.kind {
                SourceKind::Interval {
                    period_ms,
                    next_due_ms,
                } => {
                    if *next_due_ms <= end_ms {
                        let periods = elapsed_periods(*next_due_ms, *period_ms, end_ms);
                        let last_due_ms = *next_due_ms + (periods - 1) as f64 * *period_ms;
                        ticks.push(ClockEvent::Tick {
                            source: source.id,
                            due_ms: last_due_ms,
                            periods,
                        });
                        *next_due_ms = last_due_ms + *period_ms;
                    }
                }
                SourceKind::Frames => frames.push(ClockEvent::Frame {
                    source: source.id,
                    now_ms: end_ms,
                }),
            }
        }

        ticks.sort_by(|a, b| match (a, b) {
            (
                ClockEvent::Tick {
                    source: sa,
                    due_ms: da,
                    ..
                },
                ClockEvent::Tick {
                    source: sb,
                    due_ms: db,
                    ..
                },
            ) => da.total_cmp(db).then(sa.cmp(sb)),
            _ => std::cmp::Ordering::Equal,
        });

        self.now_ms = end_ms;
        tracing::trace!(
            now_ms = end_ms,
            ticks = ticks.len(),
            frames = frames.len(),
            "clock advanced"
        );
        ticks.extend(frames);
        ticks
    }
}

/// Periods due in `[next_due_ms, end_ms]`, given `next_due_ms <= end_ms`.
fn elapsed_periods(next_due_ms: f64, period_ms: f64, end_ms: f64) -> u64 {
    let mut periods = ((end_ms - next_due_ms) / period_ms).floor() as u64 + 1;
    // Float division can land one period off at exact multiples.
    if periods > 1 && next_due_ms + (periods - 1) as f64 * period_ms > end_ms {
        periods -= 1;
    }
    if next_due_ms + periods as f64 * period_ms <= end_ms {
        periods += 1;
    }
    periods
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/clock.rs"]
mod tests;
