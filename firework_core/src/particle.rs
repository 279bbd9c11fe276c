//! A single spark.
//!
//! Physics is integrated per frame tick: damping, gravity, move, fade, in
//! that order.  Decay, friction, gravity and size are fixed at creation;
//! alpha only ever goes down.

/// Saturation is not a per-particle property; every spark is fully saturated.
pub const SATURATION: f32 = 100.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x:  f32,
    pub y:  f32,
    pub vx: f32,
    pub vy: f32,
    /// Hue in degrees, always kept in `[0, 360)`.
    pub hue:       f32,
    /// HSL lightness, 0–100.
    pub lightness: f32,
    pub alpha:     f32,
    decay:    f32,
    friction: f32,
    gravity:  f32,
    size:     f32,
}

impl Particle {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x: f32, y: f32,
        vx: f32, vy: f32,
        hue: f32, lightness: f32,
        decay: f32, friction: f32, gravity: f32, size: f32,
    ) -> Self {
        Particle {
            x, y, vx, vy,
            hue:       wrap_hue(hue),
            lightness: lightness.clamp(0.0, 100.0),
            alpha:     1.0,
            decay, friction, gravity, size,
        }
    }

    /// Advance one frame tick.
    pub fn update(&mut self) {
        self.vx *= self.friction;
        self.vy *= self.friction;
        self.vy += self.gravity;
        self.x  += self.vx;
        self.y  += self.vy;
        self.alpha -= self.decay;
    }

    pub fn is_dead(&self) -> bool { self.alpha <= 0.0 }

    /// Drawn radius: the disc shrinks as the spark fades.
    pub fn radius(&self) -> f32 { (self.size * self.alpha).max(0.0) }

    pub fn decay(&self)    -> f32 { self.decay }
    pub fn friction(&self) -> f32 { self.friction }
    pub fn gravity(&self)  -> f32 { self.gravity }
    pub fn size(&self)     -> f32 { self.size }

    pub fn speed(&self) -> f32 { (self.vx * self.vx + self.vy * self.vy).sqrt() }
}

pub fn wrap_hue(h: f32) -> f32 {
    h.rem_euclid(360.0)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn spark() -> Particle {
        Particle::new(100.0, 100.0, 4.0, -2.0, 30.0, 50.0, 0.1, 0.5, 0.04, 5.0)
    }

    #[test]
    fn update_order_damp_gravity_move_fade() {
        let mut p = spark();
        p.update();
        // vx: 4 * 0.5 = 2; vy: -2 * 0.5 + 0.04 = -0.96
        assert!((p.vx - 2.0).abs() < 1e-6);
        assert!((p.vy + 0.96).abs() < 1e-6);
        assert!((p.x - 102.0).abs() < 1e-4);
        assert!((p.y - 99.04).abs() < 1e-4);
        assert!((p.alpha - 0.9).abs() < 1e-6);
    }

    #[test]
    fn alpha_never_increases_and_death_is_final() {
        let mut p = spark();
        let mut prev = p.alpha;
        let mut ticks = 0;
        while !p.is_dead() {
            p.update();
            assert!(p.alpha <= prev);
            prev = p.alpha;
            ticks += 1;
            assert!(ticks < 100, "particle never died");
        }
        // 1.0 / 0.1 — float error may cost one extra tick
        assert!((10..=11).contains(&ticks));
        assert_eq!(p.radius(), 0.0);
    }

    #[test]
    fn constants_fixed_after_updates() {
        let mut p = spark();
        for _ in 0..5 { p.update(); }
        assert_eq!(p.decay(), 0.1);
        assert_eq!(p.friction(), 0.5);
        assert_eq!(p.gravity(), 0.04);
        assert_eq!(p.size(), 5.0);
    }

    #[test]
    fn radius_scales_with_alpha() {
        let mut p = spark();
        assert_eq!(p.radius(), 5.0);
        p.update();
        assert!((p.radius() - 4.5).abs() < 1e-5);
    }

    #[test]
    fn hue_wraps_into_range() {
        assert_eq!(wrap_hue(370.0), 10.0);
        assert_eq!(wrap_hue(-15.0), 345.0);
        let p = Particle::new(0.0, 0.0, 0.0, 0.0, 540.0, 50.0, 0.01, 1.0, 0.0, 1.0);
        assert_eq!(p.hue, 180.0);
    }
}
