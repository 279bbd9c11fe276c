//! Sound cue seam.
//!
//! The show never waits on audio and never sees an audio error: backends
//! are fire-and-forget and swallow their own failures.

use std::cell::RefCell;

pub trait AudioCues {
    /// A rocket leaves the hand.  `charge` is 0.0–1.0.
    fn play_launch(&self, charge: f32);
    /// A batch went off.  `size` is the size class loudness.
    fn play_explosion(&self, size: f32);
}

/// No sound at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentCues;

impl AudioCues for SilentCues {
    fn play_launch(&self, _charge: f32) {}
    fn play_explosion(&self, _size: f32) {}
}

/// Remembers every cue; lets tests count what the show asked for.
#[derive(Debug, Default)]
pub struct RecordingCues {
    launches:   RefCell<Vec<f32>>,
    explosions: RefCell<Vec<f32>>,
}

impl RecordingCues {
    pub fn launches(&self)   -> Vec<f32> { self.launches.borrow().clone() }
    pub fn explosions(&self) -> Vec<f32> { self.explosions.borrow().clone() }
}

impl AudioCues for RecordingCues {
    fn play_launch(&self, charge: f32) { self.launches.borrow_mut().push(charge); }
    fn play_explosion(&self, size: f32) { self.explosions.borrow_mut().push(size); }
}
