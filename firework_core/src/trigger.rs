//! Trigger controller — decides when and where explosions spawn.
//!
//! ## Normal mode
//!
//! Each lane is an edge detector: a lane fires when its state *becomes*
//! `Open` (previous frame anything else), at least `debounce` after that
//! lane's last fire.  The shot lands on the wrist, mirrored horizontally so
//! the show behaves like a mirror rather than a camera.
//!
//! ## Finale
//!
//! While both lanes are `Open` in the same frame, per-lane triggering is
//! suspended and a choreography driver fires one scripted volley every
//! `cadence`.  The pattern is chosen by wall-clock slot:
//! `floor(now / pattern_ms) mod 6`.
//!
//! The previous-state slot of each lane is rolled forward every frame in
//! both modes, so leaving the finale never looks like a fresh rising edge.

use std::f32::consts::TAU;
use std::time::Duration;

use rand::Rng;

use crate::config::FireworksConfig;
use crate::gesture::{classify, HandState, Lane, Point, TrackingFrame};

// ════════════════════════════════════════════════════════════════════════════
// Per-lane state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LaneTrack {
    pub state:        HandState,
    pub previous:     HandState,
    /// Time of this lane's last fire, measured from show start.
    pub last_trigger: Duration,
    /// Wrist of the current frame, if the hand was seen.
    pub wrist:        Option<Point>,
}

impl LaneTrack {
    pub fn rising_edge(&self) -> bool {
        self.state == HandState::Open && self.previous != HandState::Open
    }
}

/// The two lanes as a fixed record.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Lanes {
    pub left:  LaneTrack,
    pub right: LaneTrack,
}

impl Lanes {
    pub fn get(&self, lane: Lane) -> &LaneTrack {
        match lane {
            Lane::Left  => &self.left,
            Lane::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, lane: Lane) -> &mut LaneTrack {
        match lane {
            Lane::Left  => &mut self.left,
            Lane::Right => &mut self.right,
        }
    }

    /// Roll every lane forward by one frame.  A lane missing from `frame`
    /// becomes `Unknown` whatever it was before.
    pub fn observe(&mut self, frame: &TrackingFrame, fist_threshold: f32) {
        for lane in Lane::BOTH {
            let track = self.get_mut(lane);
            track.previous = track.state;
            let (state, wrist) = classify(frame, lane, fist_threshold);
            track.state = state;
            track.wrist = wrist;
        }
    }

    pub fn both_open(&self) -> bool {
        self.left.state == HandState::Open && self.right.state == HandState::Open
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Finale choreography
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinalePattern {
    SideBursts,
    RisingWave,
    Cascade,
    DiagonalCross,
    OctagonRing,
    RandomScatter,
}

impl FinalePattern {
    pub const ALL: [FinalePattern; 6] = [
        FinalePattern::SideBursts,
        FinalePattern::RisingWave,
        FinalePattern::Cascade,
        FinalePattern::DiagonalCross,
        FinalePattern::OctagonRing,
        FinalePattern::RandomScatter,
    ];

    /// Pattern owning the wall-clock slot that contains `now`.
    pub fn at(now: Duration, slot: Duration) -> Self {
        let index = now.as_millis() / slot.as_millis().max(1);
        Self::ALL[(index % Self::ALL.len() as u128) as usize]
    }

    /// Screen coordinates of every burst in one volley.
    pub fn points<R: Rng + ?Sized>(self, width: f32, height: f32, rng: &mut R) -> Vec<(f32, f32)> {
        let at = |fx: f32, fy: f32| (fx * width, fy * height);
        match self {
            FinalePattern::SideBursts => [0.25, 0.45, 0.65]
                .iter()
                .flat_map(|&fy| [at(0.15, fy), at(0.85, fy)])
                .collect(),

            FinalePattern::RisingWave => (0..7)
                .map(|i| {
                    let t = i as f32 / 6.0;
                    at(0.1 + 0.8 * t, 0.65 - 0.35 * t - 0.08 * (t * TAU).sin())
                })
                .collect(),

            FinalePattern::Cascade => (0..5)
                .map(|i| at(0.2 + 0.15 * i as f32, 0.15 + 0.12 * i as f32))
                .collect(),

            FinalePattern::DiagonalCross => [0.2, 0.35, 0.65, 0.8]
                .iter()
                .flat_map(|&f| [at(f, f), at(f, 1.0 - f)])
                .collect(),

            FinalePattern::OctagonRing => {
                let r = 0.3 * width.min(height);
                (0..8)
                    .map(|i| {
                        let a = i as f32 * TAU / 8.0;
                        (width * 0.5 + a.cos() * r, height * 0.45 + a.sin() * r)
                    })
                    .collect()
            }

            FinalePattern::RandomScatter => (0..6)
                .map(|_| at(rng.gen_range(0.1..0.9), rng.gen_range(0.1..0.6)))
                .collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FinaleState {
    pub active:     bool,
    pub last_spawn: Option<Duration>,
}

// ════════════════════════════════════════════════════════════════════════════
// Orders for the composer
// ════════════════════════════════════════════════════════════════════════════

/// One explosion request in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    pub x:    f32,
    pub y:    f32,
    /// Intensity hint for the composer.
    pub hint: f32,
}

/// Everything the controller wants done this frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Salvo {
    /// Launch cue charges, one per trigger (and one on finale entry).
    pub launches: Vec<f32>,
    pub shots:    Vec<Shot>,
}

impl Salvo {
    pub fn is_empty(&self) -> bool { self.launches.is_empty() && self.shots.is_empty() }
}

// ════════════════════════════════════════════════════════════════════════════
// TriggerController
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct TriggerController {
    lanes:          Lanes,
    finale:         FinaleState,
    fist_threshold: f32,
    debounce:       Duration,
    cadence:        Duration,
    pattern_slot:   Duration,
}

impl TriggerController {
    pub fn new(cfg: &FireworksConfig) -> Self {
        TriggerController {
            lanes:          Lanes::default(),
            finale:         FinaleState::default(),
            fist_threshold: cfg.fist_threshold,
            debounce:       cfg.debounce(),
            cadence:        cfg.finale_cadence(),
            pattern_slot:   cfg.finale_pattern(),
        }
    }

    /// Process one display frame.
    ///
    /// `now` is wall-clock time since the show started; `viewport` is the
    /// drawing surface in device pixels.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        frame:    &TrackingFrame,
        now:      Duration,
        viewport: (f32, f32),
        rng:      &mut R,
    ) -> Salvo {
        self.lanes.observe(frame, self.fist_threshold);

        let was_active = self.finale.active;
        self.finale.active = self.lanes.both_open();

        let mut salvo = Salvo::default();
        match (was_active, self.finale.active) {
            (false, true) => {
                log::info!("finale: both hands open");
                salvo.launches.push(1.0);
            }
            (true, false) => log::info!("finale over"),
            _ => {}
        }

        if self.finale.active {
            self.drive_finale(now, viewport, rng, &mut salvo);
        } else {
            for lane in Lane::BOTH {
                self.try_fire(lane, now, viewport, &mut salvo);
            }
        }
        salvo
    }

    fn try_fire(&mut self, lane: Lane, now: Duration, (w, h): (f32, f32), salvo: &mut Salvo) {
        let debounce = self.debounce;
        let track = self.lanes.get_mut(lane);
        if !track.rising_edge() || now.saturating_sub(track.last_trigger) < debounce {
            return;
        }
        let Some(wrist) = track.wrist else { return };

        track.last_trigger = now;
        let x = (1.0 - wrist.x) * w;
        let y = wrist.y * h;
        let charge = (1.0 - wrist.y).clamp(0.0, 1.0);
        log::debug!("{} fired at ({:.0}, {:.0})", lane.name(), x, y);

        salvo.launches.push(charge);
        salvo.shots.push(Shot { x, y, hint: charge });
    }

    fn drive_finale<R: Rng + ?Sized>(
        &mut self,
        now:      Duration,
        (w, h):   (f32, f32),
        rng:      &mut R,
        salvo:    &mut Salvo,
    ) {
        let due = match self.finale.last_spawn {
            Some(t) => now.saturating_sub(t) >= self.cadence,
            None    => true,
        };
        if !due {
            return;
        }
        self.finale.last_spawn = Some(now);
        let pattern = FinalePattern::at(now, self.pattern_slot);
        salvo.shots.extend(
            pattern.points(w, h, rng).into_iter().map(|(x, y)| Shot { x, y, hint: 1.0 }),
        );
    }

    pub fn lanes(&self)            -> &Lanes       { &self.lanes }
    pub fn finale(&self)           -> &FinaleState { &self.finale }
    pub fn is_finale_active(&self) -> bool         { self.finale.active }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
