//! Daily playback of a resolved schedule path.
//!
//! Holds the chosen path as a time-ascending queue and dequeues one waypoint
//! per exact (hour, minute) match. Exact match is deliberate: a clock paused
//! mid-minute and resumed past a waypoint's time skips that waypoint rather
//! than firing it late.

use std::collections::VecDeque;

use crate::shared::Waypoint;

/// Per-character runtime queue of today's not-yet-reached waypoints.
#[derive(Debug, Default)]
pub struct SchedulePlayback {
    queue: VecDeque<Waypoint>,
    current: Option<Waypoint>,
}

impl SchedulePlayback {
    /// Day-boundary reset: discard yesterday's leftovers and rebuild the
    /// queue from the newly selected path, earliest time first.
    pub fn reset_for_day(&mut self, path: &[Waypoint]) {
        let mut waypoints: Vec<Waypoint> = path.to_vec();
        waypoints.sort_by_key(|wp| (wp.hour, wp.minute));
        self.queue = waypoints.into();
        self.current = None;
    }

    /// Day-boundary reset with no matching variant: nothing scheduled today.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.current = None;
    }

    /// Clock-tick drive. Dequeues the earliest waypoint iff its time-of-day
    /// exactly equals the tick's; otherwise a no-op.
    pub fn on_minute(&mut self, hour: u8, minute: u8) -> Option<Waypoint> {
        let front = self.queue.front()?;
        if front.hour == hour && front.minute == minute {
            let waypoint = self.queue.pop_front()?;
            self.current = Some(waypoint.clone());
            return Some(waypoint);
        }
        None
    }

    /// The most recently dequeued waypoint, if any fired today.
    pub fn current(&self) -> Option<&Waypoint> {
        self.current.as_ref()
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
