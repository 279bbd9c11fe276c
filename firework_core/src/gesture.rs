//! Gesture classification.
//!
//! The tracking collaborator reports, per inference frame, zero or more
//! hands.  Each hand carries a lane label, a wrist point and four fingertip
//! points, all normalized to `[0, 1]²` in camera space.  The classifier
//! reduces a hand to a discrete [`HandState`] by the mean wrist→fingertip
//! distance: a curled hand keeps its fingertips near the wrist.

use crate::error::FireworksError;

// ════════════════════════════════════════════════════════════════════════════
// Observation types
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self { Point { x, y } }

    pub fn is_finite(self) -> bool { self.x.is_finite() && self.y.is_finite() }

    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One of the two fixed hand identities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lane { Left, Right }

impl Lane {
    pub const BOTH: [Lane; 2] = [Lane::Left, Lane::Right];

    /// Parse the tracker's handedness label (`"Left"` / `"Right"`).
    pub fn from_label(label: &str) -> Option<Lane> {
        match label {
            "Left"  | "left"  => Some(Lane::Left),
            "Right" | "right" => Some(Lane::Right),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Lane::Left  => "LEFT",
            Lane::Right => "RIGHT",
        }
    }
}

/// A single hand as reported by the tracker.
///
/// `fingertips` is a `Vec` rather than an array because trackers do drop
/// landmarks; anything short of four tips classifies as `Unknown`.
#[derive(Clone, Debug, PartialEq)]
pub struct HandObservation {
    pub lane:       Lane,
    pub wrist:      Point,
    pub fingertips: Vec<Point>,
}

impl HandObservation {
    pub fn new(lane: Lane, wrist: Point, fingertips: Vec<Point>) -> Self {
        HandObservation { lane, wrist, fingertips }
    }

    /// Mean wrist→fingertip distance over the first four tips.
    pub fn spread(&self) -> Result<f32, FireworksError> {
        if self.fingertips.len() < 4 {
            return Err(FireworksError::MalformedHand { found: self.fingertips.len() });
        }
        let tips = &self.fingertips[..4];
        if !self.wrist.is_finite() || !tips.iter().all(|t| t.is_finite()) {
            return Err(FireworksError::NonFiniteHand);
        }
        let sum: f32 = tips.iter().map(|t| self.wrist.distance(*t)).sum();
        Ok(sum / 4.0)
    }
}

/// Everything the tracker reported in one inference frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackingFrame {
    pub hands: Vec<HandObservation>,
}

impl TrackingFrame {
    pub fn new(hands: Vec<HandObservation>) -> Self { TrackingFrame { hands } }

    /// First hand reported for `lane`, if any.
    pub fn hand(&self, lane: Lane) -> Option<&HandObservation> {
        self.hands.iter().find(|h| h.lane == lane)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandState
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HandState {
    Open,
    Fist,
    #[default]
    Unknown,
}

impl HandState {
    pub fn name(self) -> &'static str {
        match self {
            HandState::Open    => "OPEN",
            HandState::Fist    => "FIST",
            HandState::Unknown => "-",
        }
    }
}

/// Classify one lane of a frame.
///
/// Returns the lane's state and, when the hand is present and well formed,
/// its wrist as the position of record.  Absent or malformed hands are
/// `Unknown` with no position.
pub fn classify(frame: &TrackingFrame, lane: Lane, fist_threshold: f32) -> (HandState, Option<Point>) {
    let Some(hand) = frame.hand(lane) else {
        return (HandState::Unknown, None);
    };
    match hand.spread() {
        Ok(spread) if spread < fist_threshold => (HandState::Fist, Some(hand.wrist)),
        Ok(_)                                 => (HandState::Open, Some(hand.wrist)),
        Err(e) => {
            log::debug!("{} hand ignored: {}", lane.name(), e);
            (HandState::Unknown, None)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
