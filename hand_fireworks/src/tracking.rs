//! Hand tracking — from LeapMotion hardware or from keyboard/mouse
//! simulation.
//!
//! Either way the output is the same: [`TrackingFrame`]s published into a
//! [`HandFeed`] from a thread of their own.  The render loop never knows
//! which source is behind the feed.

use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};

use firework_core::{HandFeed, HandObservation, Lane, Point, TrackingFrame};

// ════════════════════════════════════════════════════════════════════════════
// TrackingSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can publish hand frames into a [`HandFeed`].
pub trait TrackingSource: Send + 'static {
    fn run(self: Box<Self>, feed: HandFeed);
}

/// Spawn a tracking source on its own thread.
pub fn spawn_tracking_source<T: TrackingSource>(source: T, feed: HandFeed) -> JoinHandle<()> {
    thread::spawn(move || Box::new(source).run(feed))
}

/// Keeps a source's last hands from outliving the source.
///
/// On loss the feed is reset to an empty frame, so every lane reads
/// `Unknown` on the next display frame.  The warning is logged once per
/// outage.
#[derive(Debug, Default)]
pub struct SignalWatch {
    lost: bool,
}

impl SignalWatch {
    pub fn delivered(&mut self, feed: &HandFeed, frame: TrackingFrame) {
        if self.lost {
            log::info!("hand tracking restored");
            self.lost = false;
        }
        feed.publish(frame);
    }

    pub fn lost(&mut self, feed: &HandFeed, reason: &str) {
        feed.publish(TrackingFrame::default());
        if !self.lost {
            log::warn!("hand tracking lost ({}) — clearing hands", reason);
            self.lost = true;
        }
    }

    pub fn is_lost(&self) -> bool { self.lost }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapTrackingSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Tracking source backed by a real LeapMotion controller.
///
/// Palm and distal fingertip positions (millimetres, device space) are
/// mapped into the normalized `[0, 1]²` space the classifier expects.
/// The device looks up at the hands rather than at the user, so x is
/// pre-flipped to cancel the mirroring applied downstream.
#[cfg(feature = "leap")]
pub struct LeapTrackingSource;

#[cfg(feature = "leap")]
impl TrackingSource for LeapTrackingSource {
    fn run(self: Box<Self>, feed: HandFeed) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                log::warn!("LeapC connection failed: {:?} — no hands will be reported", e);
                return;
            }
        };
        if let Err(e) = connection.open() {
            log::warn!("LeapMotion device failed to open: {:?}", e);
            return;
        }
        log::info!("LeapMotion tracking started");

        let mut watch = SignalWatch::default();
        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(e) => {
                    watch.lost(&feed, &format!("{:?}", e));
                    continue;
                }
            };

            match msg.event() {
                Event::Tracking(frame) => {
                    let hands = frame.hands().filter_map(|h| {
                        let lane = match h.hand_type() {
                            HandType::Left  => Lane::Left,
                            HandType::Right => Lane::Right,
                        };
                        let palm = h.palm().position();
                        let digits: Vec<_> = h.digits().collect();
                        if digits.len() < 5 { return None; }
                        // index, middle, ring, pinky
                        let tips = digits[1..5].iter()
                            .map(|d| {
                                let tip = d.distal().next_joint();
                                leap_to_unit(tip.x, tip.y)
                            })
                            .collect();
                        Some(HandObservation::new(lane, leap_to_unit(palm.x, palm.y), tips))
                    }).collect();

                    watch.delivered(&feed, TrackingFrame::new(hands));
                }
                Event::DeviceLost { .. }     => watch.lost(&feed, "device unplugged"),
                Event::ConnectionLost { .. } => watch.lost(&feed, "service connection lost"),
                _ => {}
            }
        }
    }
}

/// Interaction box used to normalize LeapMotion millimetres.
#[cfg(feature = "leap")]
const LEAP_SPAN_MM:  f32 = 300.0;
#[cfg(feature = "leap")]
const LEAP_FLOOR_MM: f32 = 100.0;

#[cfg(feature = "leap")]
fn leap_to_unit(x_mm: f32, y_mm: f32) -> Point {
    let x = (x_mm + LEAP_SPAN_MM / 2.0) / LEAP_SPAN_MM;
    let y = (y_mm - LEAP_FLOOR_MM) / LEAP_SPAN_MM;
    Point::new((1.0 - x).clamp(0.0, 1.0), (1.0 - y).clamp(0.0, 1.0))
}

// ════════════════════════════════════════════════════════════════════════════
// SimTrackingSource — keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer moved; window-relative, 0.0–1.0 on both axes.
    Pointer { x: f32, y: f32 },
    /// Show / hide a hand.
    Toggle(Lane),
    /// Curl (`true`) or uncurl a hand.
    Curl { lane: Lane, curled: bool },
    /// Both hands present and open.
    RaiseBoth,
}

/// Fingertip reach for synthetic hands, in normalized units.
pub const OPEN_REACH: f32 = 0.35;
pub const FIST_REACH: f32 = 0.12;

/// Synthetic hand state driven by window input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimHands {
    pub pointer: Point,
    pub present: [bool; 2],
    pub curled:  [bool; 2],
}

impl Default for SimHands {
    fn default() -> Self {
        SimHands {
            pointer: Point::new(0.5, 0.5),
            present: [false; 2],
            curled:  [false; 2],
        }
    }
}

fn slot(lane: Lane) -> usize {
    match lane {
        Lane::Left  => 0,
        Lane::Right => 1,
    }
}

impl SimHands {
    pub fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Pointer { x, y }      => self.pointer = Point::new(x, y),
            SimInput::Toggle(lane)          => self.present[slot(lane)] ^= true,
            SimInput::Curl { lane, curled } => self.curled[slot(lane)] = curled,
            SimInput::RaiseBoth => {
                self.present = [true; 2];
                self.curled  = [false; 2];
            }
        }
    }

    /// Build the landmark frame the tracker would have reported.
    ///
    /// The Left wrist sits under the pointer on screen; the Right wrist is
    /// its horizontal mirror.  Screen x is `1 - camera x`, hence the flip.
    pub fn frame(&self) -> TrackingFrame {
        let p = self.pointer;
        let hands = Lane::BOTH.iter()
            .filter(|&&lane| self.present[slot(lane)])
            .map(|&lane| {
                let wrist = match lane {
                    Lane::Left  => Point::new(1.0 - p.x, p.y),
                    Lane::Right => Point::new(p.x, p.y),
                };
                let reach = if self.curled[slot(lane)] { FIST_REACH } else { OPEN_REACH };
                synthetic_hand(lane, wrist, reach)
            })
            .collect();
        TrackingFrame::new(hands)
    }
}

/// Four fingertips fanned above the wrist at distance `reach`.
pub fn synthetic_hand(lane: Lane, wrist: Point, reach: f32) -> HandObservation {
    let tips = (0..4)
        .map(|i| {
            let a = -2.1 + i as f32 * 0.35; // radians, pointing up-screen
            Point::new(wrist.x + a.cos() * reach, wrist.y + a.sin() * reach)
        })
        .collect();
    HandObservation::new(lane, wrist, tips)
}

/// Tracking source driven by [`SimInput`] events (from the visualizer's
/// window).
pub struct SimTrackingSource {
    pub rx: Receiver<SimInput>,
}

impl TrackingSource for SimTrackingSource {
    fn run(self: Box<Self>, feed: HandFeed) {
        let mut hands = SimHands::default();
        let mut watch = SignalWatch::default();
        watch.delivered(&feed, hands.frame());
        for input in self.rx {
            hands.apply(input);
            watch.delivered(&feed, hands.frame());
        }
        watch.lost(&feed, "window input closed");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use firework_core::gesture::classify;
    use firework_core::HandState;
    use std::sync::mpsc;

    #[test]
    fn synthetic_hands_classify_as_intended() {
        let w = Point::new(0.5, 0.7);
        let open = TrackingFrame::new(vec![synthetic_hand(Lane::Left, w, OPEN_REACH)]);
        let fist = TrackingFrame::new(vec![synthetic_hand(Lane::Left, w, FIST_REACH)]);
        assert_eq!(classify(&open, Lane::Left, 0.25).0, HandState::Open);
        assert_eq!(classify(&fist, Lane::Left, 0.25).0, HandState::Fist);
    }

    #[test]
    fn hands_absent_until_toggled() {
        let mut hands = SimHands::default();
        assert!(hands.frame().hands.is_empty());
        hands.apply(SimInput::Toggle(Lane::Right));
        let f = hands.frame();
        assert_eq!(f.hands.len(), 1);
        assert_eq!(f.hands[0].lane, Lane::Right);
        hands.apply(SimInput::Toggle(Lane::Right));
        assert!(hands.frame().hands.is_empty());
    }

    #[test]
    fn left_wrist_lands_under_pointer_after_mirroring() {
        let mut hands = SimHands::default();
        hands.apply(SimInput::Toggle(Lane::Left));
        hands.apply(SimInput::Pointer { x: 0.2, y: 0.3 });
        let wrist = hands.frame().hands[0].wrist;
        // screen_x = (1 - wrist.x) * width
        assert!((1.0 - wrist.x - 0.2).abs() < 1e-6);
        assert_eq!(wrist.y, 0.3);
    }

    #[test]
    fn raise_both_opens_both() {
        let mut hands = SimHands::default();
        hands.apply(SimInput::Curl { lane: Lane::Left, curled: true });
        hands.apply(SimInput::RaiseBoth);
        let f = hands.frame();
        assert_eq!(f.hands.len(), 2);
        for lane in Lane::BOTH {
            assert_eq!(classify(&f, lane, 0.25).0, HandState::Open);
        }
    }

    #[test]
    fn sim_source_publishes_latest_state() {
        let (tx, rx) = mpsc::channel();
        let feed = HandFeed::new();
        let reader = feed.clone();
        let _handle = spawn_tracking_source(SimTrackingSource { rx }, feed);
        tx.send(SimInput::Toggle(Lane::Left)).unwrap();
        tx.send(SimInput::Curl { lane: Lane::Left, curled: true }).unwrap();
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while classify(&reader.latest(), Lane::Left, 0.25).0 != HandState::Fist {
            assert!(std::time::Instant::now() < deadline, "fist never published");
            std::thread::yield_now();
        }
    }

    #[test]
    fn sim_source_clears_hands_when_input_closes() {
        let (tx, rx) = mpsc::channel();
        let feed = HandFeed::new();
        let handle = spawn_tracking_source(SimTrackingSource { rx }, feed.clone());
        tx.send(SimInput::RaiseBoth).unwrap();
        drop(tx);
        handle.join().unwrap();
        assert!(feed.latest().hands.is_empty());
    }

    #[test]
    fn lost_signal_drops_open_hands_until_restored() {
        let feed = HandFeed::new();
        let mut watch = SignalWatch::default();
        let mut both = SimHands::default();
        both.apply(SimInput::RaiseBoth);

        watch.delivered(&feed, both.frame());
        assert_eq!(classify(&feed.latest(), Lane::Right, 0.25).0, HandState::Open);

        watch.lost(&feed, "unplugged");
        watch.lost(&feed, "unplugged");
        assert!(watch.is_lost());
        for lane in Lane::BOTH {
            assert_eq!(classify(&feed.latest(), lane, 0.25).0, HandState::Unknown);
        }

        watch.delivered(&feed, both.frame());
        assert!(!watch.is_lost());
        assert_eq!(feed.latest().hands.len(), 2);
    }
}
