//! The per-frame simulation loop.
//!
//! `Show` owns the particle pool, the trigger controller, the composer and
//! the random source.  The host calls [`Show::frame`] once per display
//! refresh with the newest tracking frame and the wall-clock time since
//! start, then [`Show::render`] onto its canvas.
//!
//! One frame is: classify hands → roll lane states → run the trigger
//! controller → spawn the requested batches → integrate and cull the pool.
//! There is no fixed timestep; physics advances one tick per call.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio::{AudioCues, SilentCues};
use crate::canvas::Canvas;
use crate::composer::Composer;
use crate::config::FireworksConfig;
use crate::error::Result;
use crate::gesture::TrackingFrame;
use crate::pool::ParticlePool;
use crate::trigger::{Lanes, Shot, TriggerController};

/// What one frame did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Shots that became batches.
    pub spawned: Vec<Shot>,
    /// Shots refused because the pool was over its cap.
    pub dropped: usize,
    /// Sparks that died this frame.
    pub culled:  usize,
    /// Sparks alive after the frame.
    pub live:    usize,
}

pub struct Show<A: AudioCues = SilentCues> {
    cfg:        FireworksConfig,
    pool:       ParticlePool,
    composer:   Composer,
    controller: TriggerController,
    rng:        StdRng,
    audio:      A,
    viewport:   (usize, usize),
    frames:     u64,
}

impl<A: AudioCues> Show<A> {
    /// Build a show.  `seed` fixes every random draw; `None` seeds from
    /// the OS.
    pub fn new(cfg: FireworksConfig, audio: A, viewport: (usize, usize), seed: Option<u64>) -> Result<Self> {
        cfg.validate()?;
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None    => StdRng::from_entropy(),
        };
        Ok(Show {
            pool:       ParticlePool::new(cfg.pool_cap),
            composer:   Composer::new(cfg.friction),
            controller: TriggerController::new(&cfg),
            rng,
            audio,
            viewport,
            frames:     0,
            cfg,
        })
    }

    /// Follow a viewport resize.  Live sparks keep their pixel positions.
    pub fn set_viewport(&mut self, width: usize, height: usize) {
        self.viewport = (width, height);
    }

    /// Advance the show by one display frame.
    pub fn frame(&mut self, observations: &TrackingFrame, now: Duration) -> FrameReport {
        let view = (self.viewport.0 as f32, self.viewport.1 as f32);
        let salvo = self.controller.tick(observations, now, view, &mut self.rng);

        for &charge in &salvo.launches {
            self.audio.play_launch(charge);
        }

        let mut report = FrameReport::default();
        for shot in salvo.shots {
            let blast = self.composer.explode(
                &mut self.pool, shot.x, shot.y, shot.hint, &mut self.rng, &self.audio,
            );
            match blast {
                Some(_) => report.spawned.push(shot),
                None    => report.dropped += 1,
            }
        }

        report.culled = self.pool.step();
        report.live   = self.pool.len();
        self.frames  += 1;
        report
    }

    /// Paint the current pool: fade the previous frame, then add sparks.
    pub fn render(&self, canvas: &mut Canvas) {
        canvas.fade(self.cfg.trail_fade);
        for p in self.pool.iter() {
            canvas.draw_particle(p);
        }
    }

    pub fn pool(&self)             -> &ParticlePool     { &self.pool }
    pub fn lanes(&self)            -> &Lanes            { self.controller.lanes() }
    pub fn is_finale_active(&self) -> bool              { self.controller.is_finale_active() }
    pub fn frames(&self)           -> u64               { self.frames }
    pub fn audio(&self)            -> &A                { &self.audio }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingCues;
    use crate::gesture::{HandObservation, HandState, Lane, Point};

    fn ms(n: u64) -> Duration { Duration::from_millis(n) }

    fn hand(lane: Lane, wrist: Point, reach: f32) -> HandObservation {
        HandObservation::new(lane, wrist, vec![Point::new(wrist.x + reach, wrist.y); 4])
    }

    fn show() -> Show<RecordingCues> {
        Show::new(FireworksConfig::default(), RecordingCues::default(), (800, 600), Some(42)).unwrap()
    }

    #[test]
    fn fist_then_open_spawns_one_batch_at_mirrored_wrist() {
        let mut s = show();
        let wrist = Point::new(0.25, 0.5);
        let fist = TrackingFrame::new(vec![hand(Lane::Left, wrist, 0.1)]);
        let open = TrackingFrame::new(vec![hand(Lane::Left, wrist, 0.4)]);

        let r1 = s.frame(&fist, ms(300));
        assert!(r1.spawned.is_empty());
        assert_eq!(s.lanes().left.state, HandState::Fist);

        let r2 = s.frame(&open, ms(316));
        assert_eq!(r2.spawned.len(), 1);
        assert_eq!((r2.spawned[0].x, r2.spawned[0].y), (600.0, 300.0));
        assert!((70..300).contains(&r2.live));
        assert_eq!(s.audio().explosions().len(), 1);
        assert_eq!(s.audio().launches().len(), 1);
        // one tick of flight: everything is still near the spawn point
        for p in s.pool().iter() {
            assert!((p.x - 600.0).abs() < 30.0 && (p.y - 300.0).abs() < 30.0);
        }

        // holding open adds nothing new
        let r3 = s.frame(&open, ms(332));
        assert!(r3.spawned.is_empty());
        assert_eq!(s.audio().explosions().len(), 1);
    }

    #[test]
    fn bursts_burn_out_completely() {
        let mut s = show();
        let wrist = Point::new(0.5, 0.5);
        s.frame(&TrackingFrame::default(), ms(300));
        s.frame(&TrackingFrame::new(vec![hand(Lane::Right, wrist, 0.4)]), ms(316));
        assert!(s.pool().len() > 0);
        // slowest decay is 0.008 per tick → gone within 126 ticks
        let mut t = 316;
        for _ in 0..130 {
            t += 16;
            s.frame(&TrackingFrame::default(), ms(t));
        }
        assert!(s.pool().is_empty());
    }

    #[test]
    fn finale_saturates_pool_then_drops_batches() {
        let mut s = show();
        let both = TrackingFrame::new(vec![
            hand(Lane::Left,  Point::new(0.3, 0.5), 0.4),
            hand(Lane::Right, Point::new(0.7, 0.5), 0.4),
        ]);
        let mut dropped = 0;
        let mut t = 1000;
        for _ in 0..10 {
            let r = s.frame(&both, ms(t));
            assert!(s.is_finale_active());
            dropped += r.dropped;
            t += 16;
        }
        assert!(dropped > 0);
        // a dropped batch never makes a sound
        let volleys: usize = s.audio().explosions().len();
        assert!(volleys < 10 * 8);
        // only the entry launch cue
        assert_eq!(s.audio().launches(), vec![1.0]);
    }

    #[test]
    fn render_paints_live_sparks() {
        let mut s = show();
        let mut canvas = Canvas::new(800, 600);
        s.frame(&TrackingFrame::default(), ms(300));
        s.frame(&TrackingFrame::new(vec![hand(Lane::Left, Point::new(0.5, 0.5), 0.4)]), ms(316));
        s.render(&mut canvas);
        assert!(canvas.pixels().iter().any(|&px| px != crate::canvas::BLACK));
    }

    #[test]
    fn oversized_cap_builds_without_reserving() {
        let cfg = FireworksConfig::from_toml_str("pool_cap = 9223372036854775807").unwrap();
        let mut s = Show::new(cfg, SilentCues, (10, 10), Some(1)).unwrap();
        assert_eq!(s.pool().cap(), 9223372036854775807);
        assert_eq!(s.frame(&TrackingFrame::default(), ms(16)).live, 0);
    }

    #[test]
    fn non_finite_wrist_never_spawns() {
        let mut s = show();
        let bad = HandObservation::new(
            Lane::Left,
            Point::new(f32::NAN, 0.5),
            vec![Point::new(0.9, 0.5); 4],
        );
        s.frame(&TrackingFrame::default(), ms(300));
        let r = s.frame(&TrackingFrame::new(vec![bad]), ms(316));
        assert!(r.spawned.is_empty());
        assert_eq!(r.live, 0);
        assert_eq!(s.lanes().left.state, HandState::Unknown);
        assert!(s.audio().launches().is_empty());
    }

    #[test]
    fn invalid_config_refused() {
        let cfg = FireworksConfig { pool_cap: 0, ..FireworksConfig::default() };
        assert!(Show::new(cfg, SilentCues, (10, 10), None).is_err());
    }
}
