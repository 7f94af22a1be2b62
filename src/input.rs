use std::sync::{Arc, Mutex, MutexGuard};

use glam::Vec2;

use crate::screen::ScreenBounds;

/// A single button-down event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    pub position: Vec2,
    /// Monotonic seconds, same source as the simulation clock.
    pub time: f64,
}

/// Latest pointer/click sample. Only the newest values are kept, so any
/// event rate is absorbed without queuing. Sequence numbers let the
/// engine tell whether something happened since its last poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionRecord {
    pub last_pointer: Vec2,
    pub last_click: Option<Click>,
    pub move_seq: u64,
    pub click_seq: u64,
}

impl InteractionRecord {
    pub fn new(pointer: Vec2) -> Self {
        Self {
            last_pointer: pointer,
            last_click: None,
            move_seq: 0,
            click_seq: 0,
        }
    }

    /// Last click position, or the pointer if nothing was clicked yet.
    pub fn click_position(&self) -> Vec2 {
        self.last_click
            .map(|c| c.position)
            .unwrap_or(self.last_pointer)
    }
}

/// Record plus the bounds samples are clamped to. Both live behind the
/// one lock so every feed clone sees a bounds change.
#[derive(Debug)]
struct Shared {
    record: InteractionRecord,
    bounds: ScreenBounds,
}

/// Writer side of the shared interaction record, handed to the OS hook.
///
/// Cloning is cheap; every clone writes the same record.
#[derive(Debug, Clone)]
pub struct InputFeed {
    shared: Arc<Mutex<Shared>>,
}

impl InputFeed {
    pub fn new(bounds: ScreenBounds) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                record: InteractionRecord::new(bounds.center()),
                bounds,
            })),
        }
    }

    /// New virtual-screen layout. Applies to every clone; the last pointer
    /// is pulled inside if the screen shrank.
    pub fn set_bounds(&self, bounds: ScreenBounds) {
        let mut shared = self.lock();
        shared.bounds = bounds;
        shared.record.last_pointer = bounds.clamp(shared.record.last_pointer);
    }

    pub fn bounds(&self) -> ScreenBounds {
        self.lock().bounds
    }

    /// Pointer moved to an absolute virtual-screen position.
    pub fn on_pointer_moved(&self, position: Vec2) {
        if !position.is_finite() {
            log::trace!("Dropped non-finite pointer sample {position:?}");
            return;
        }
        let mut shared = self.lock();
        shared.record.last_pointer = shared.bounds.clamp(position);
        shared.record.move_seq = shared.record.move_seq.wrapping_add(1);
    }

    /// Button pressed at `position`, `time` in monotonic seconds.
    pub fn on_button_down(&self, position: Vec2, time: f64) {
        let mut shared = self.lock();
        let record = shared.record;
        let position = if position.is_finite() {
            shared.bounds.clamp(position)
        } else {
            record.last_pointer
        };
        let time = if time.is_finite() {
            time
        } else {
            record.last_click.map(|c| c.time).unwrap_or(0.0)
        };
        shared.record.last_pointer = position;
        shared.record.last_click = Some(Click { position, time });
        shared.record.click_seq = record.click_seq.wrapping_add(1);
    }

    /// Copy of the current record. Never blocks for longer than a write.
    pub fn snapshot(&self) -> InteractionRecord {
        self.lock().record
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        // Plain data: a panic mid-write cannot leave it half-updated.
        self.shared
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// What changed in the record since the previous poll.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputEvents {
    pub moved: bool,
    pub clicked: Option<Click>,
}

impl InputEvents {
    pub fn any(&self) -> bool {
        self.moved || self.clicked.is_some()
    }
}

/// Reader-side bookkeeping: last seen sequence numbers and engagement times.
#[derive(Debug, Clone, Copy)]
pub struct InputTracker {
    seen_move_seq: u64,
    seen_click_seq: u64,
    /// Last time any input arrived.
    pub last_engagement: f64,
    /// Last time the pointer moved.
    pub last_pointer_move: f64,
}

impl InputTracker {
    pub fn new(now: f64) -> Self {
        Self {
            seen_move_seq: 0,
            seen_click_seq: 0,
            last_engagement: now,
            last_pointer_move: now,
        }
    }

    /// Diff `record` against what was seen last and stamp engagement times.
    pub fn poll(&mut self, record: &InteractionRecord, now: f64) -> InputEvents {
        let moved = record.move_seq != self.seen_move_seq;
        let clicked = if record.click_seq != self.seen_click_seq {
            record.last_click
        } else {
            None
        };
        self.seen_move_seq = record.move_seq;
        self.seen_click_seq = record.click_seq;

        if moved {
            self.last_pointer_move = now;
        }
        if moved || clicked.is_some() {
            self.last_engagement = now;
        }
        InputEvents { moved, clicked }
    }

    pub fn pointer_idle_for(&self, now: f64) -> f64 {
        now - self.last_pointer_move
    }

    pub fn unengaged_for(&self, now: f64) -> f64 {
        now - self.last_engagement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed() -> InputFeed {
        InputFeed::new(ScreenBounds::new(0.0, 0.0, 1920.0, 1080.0))
    }

    #[test]
    fn nan_pointer_keeps_last_valid_value() {
        let feed = feed();
        feed.on_pointer_moved(Vec2::new(100.0, 200.0));
        feed.on_pointer_moved(Vec2::new(f32::NAN, 5.0));
        let record = feed.snapshot();
        assert_eq!(record.last_pointer, Vec2::new(100.0, 200.0));
        assert_eq!(record.move_seq, 1);
    }

    #[test]
    fn out_of_bounds_pointer_is_clamped() {
        let feed = feed();
        feed.on_pointer_moved(Vec2::new(5000.0, -40.0));
        assert_eq!(feed.snapshot().last_pointer, Vec2::new(1920.0, 0.0));
    }

    #[test]
    fn only_latest_sample_is_retained() {
        let feed = feed();
        for i in 0..10_000 {
            feed.on_pointer_moved(Vec2::new(i as f32 % 1000.0, 10.0));
        }
        let record = feed.snapshot();
        assert_eq!(record.last_pointer, Vec2::new(999.0, 10.0));
        assert_eq!(record.move_seq, 10_000);
    }

    #[test]
    fn tracker_reports_each_event_once() {
        let feed = feed();
        let mut tracker = InputTracker::new(0.0);
        assert!(!tracker.poll(&feed.snapshot(), 0.1).any());

        feed.on_button_down(Vec2::new(50.0, 60.0), 0.2);
        let events = tracker.poll(&feed.snapshot(), 0.3);
        assert_eq!(events.clicked.map(|c| c.position), Some(Vec2::new(50.0, 60.0)));
        assert!(!events.moved);
        assert_eq!(tracker.last_engagement, 0.3);

        assert!(!tracker.poll(&feed.snapshot(), 0.4).any());
        assert!((tracker.unengaged_for(1.3) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn clones_share_one_record() {
        let feed = feed();
        let hook_side = feed.clone();
        hook_side.on_pointer_moved(Vec2::new(7.0, 8.0));
        assert_eq!(feed.snapshot().last_pointer, Vec2::new(7.0, 8.0));
    }

    #[test]
    fn bounds_change_reaches_every_clone() {
        let feed = feed();
        let hook_side = feed.clone();
        feed.set_bounds(ScreenBounds::new(0.0, 0.0, 3840.0, 1080.0));
        hook_side.on_pointer_moved(Vec2::new(3000.0, 500.0));
        assert_eq!(feed.snapshot().last_pointer, Vec2::new(3000.0, 500.0));
        assert_eq!(hook_side.bounds().width, 3840.0);
    }

    #[test]
    fn shrinking_bounds_pulls_pointer_inside() {
        let feed = feed();
        feed.on_pointer_moved(Vec2::new(1800.0, 900.0));
        feed.set_bounds(ScreenBounds::new(0.0, 0.0, 1280.0, 720.0));
        assert_eq!(feed.snapshot().last_pointer, Vec2::new(1280.0, 720.0));
    }
}
