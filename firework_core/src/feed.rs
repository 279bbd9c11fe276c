//! Latest-frame cell between the tracker and the render loop.
//!
//! The tracker publishes at its own cadence (possibly several times, or
//! not at all, between two display frames).  Only the newest frame is
//! kept; the render loop reads it once per frame.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::gesture::TrackingFrame;

#[derive(Clone, Debug, Default)]
pub struct HandFeed {
    slot: Arc<Mutex<Option<TrackingFrame>>>,
}

impl HandFeed {
    pub fn new() -> Self { Self::default() }

    /// Replace whatever was there.
    pub fn publish(&self, frame: TrackingFrame) {
        *self.lock() = Some(frame);
    }

    /// Copy of the newest frame; empty until the tracker first reports.
    pub fn latest(&self) -> TrackingFrame {
        self.lock().clone().unwrap_or_default()
    }

    // A panicking tracker thread must not take the show down with it.
    fn lock(&self) -> MutexGuard<'_, Option<TrackingFrame>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{HandObservation, Lane, Point};

    fn one_hand(x: f32) -> TrackingFrame {
        TrackingFrame::new(vec![HandObservation::new(Lane::Left, Point::new(x, 0.5), vec![])])
    }

    #[test]
    fn empty_until_first_publish() {
        let feed = HandFeed::new();
        assert_eq!(feed.latest(), TrackingFrame::default());
    }

    #[test]
    fn newest_frame_wins_and_persists() {
        let feed = HandFeed::new();
        let writer = feed.clone();
        writer.publish(one_hand(0.1));
        writer.publish(one_hand(0.2));
        writer.publish(one_hand(0.3));
        assert_eq!(feed.latest(), one_hand(0.3));
        // no new publish: the same frame is read again
        assert_eq!(feed.latest(), one_hand(0.3));
    }

    #[test]
    fn publish_from_another_thread() {
        let feed = HandFeed::new();
        let writer = feed.clone();
        std::thread::spawn(move || writer.publish(one_hand(0.7)))
            .join()
            .unwrap();
        assert_eq!(feed.latest(), one_hand(0.7));
    }
}
