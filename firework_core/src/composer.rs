//! Explosion composer — turns a spawn point into a batch of sparks.
//!
//! Every explosion rolls three things independently:
//!
//! * a [`SizeClass`] (how many sparks, how fast, how big),
//! * a [`Palette`] (the base hue, jittered ±15° per spark),
//! * a [`Style`] (the shape: per-spark speed/decay/gravity/color overrides).
//!
//! All draws go through a caller-supplied [`Rng`], so a seeded generator
//! reproduces a show exactly.

use std::f32::consts::TAU;
use std::ops::Range;

use rand::Rng;

use crate::audio::AudioCues;
use crate::particle::Particle;
use crate::pool::ParticlePool;

/// Downward acceleration applied per tick unless a style overrides it.
pub const BASE_GRAVITY: f32 = 0.04;
/// Per-spark hue jitter around the palette hue, in degrees.
pub const HUE_JITTER: f32 = 15.0;

// ════════════════════════════════════════════════════════════════════════════
// SizeClass
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeClass { Small, Medium, Large }

impl SizeClass {
    /// Map a uniform draw in `[0, 1)` to a class: 30% small, 40% medium,
    /// 30% large.
    pub fn from_unit(r: f32) -> Self {
        if r < 0.3 {
            SizeClass::Small
        } else if r < 0.7 {
            SizeClass::Medium
        } else {
            SizeClass::Large
        }
    }

    pub fn count_range(self) -> Range<usize> {
        match self {
            SizeClass::Small  =>  70..110,
            SizeClass::Medium => 120..180,
            SizeClass::Large  => 200..300,
        }
    }

    pub fn power_range(self) -> Range<f32> {
        match self {
            SizeClass::Small  =>  5.0..8.0,
            SizeClass::Medium =>  8.0..11.0,
            SizeClass::Large  => 10.0..14.0,
        }
    }

    pub fn radius_range(self) -> Range<f32> {
        match self {
            SizeClass::Small  => 3.5..5.0,
            SizeClass::Medium => 4.5..6.0,
            SizeClass::Large  => 5.5..7.5,
        }
    }

    /// Loudness handed to the explosion sound cue.
    pub fn loudness(self) -> f32 {
        match self {
            SizeClass::Small  => 0.4,
            SizeClass::Medium => 0.7,
            SizeClass::Large  => 1.0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Palette
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub name: &'static str,
    pub hue:  f32,
}

pub const PALETTES: [Palette; 8] = [
    Palette { name: "crimson", hue:   0.0 },
    Palette { name: "amber",   hue:  30.0 },
    Palette { name: "gold",    hue:  50.0 },
    Palette { name: "emerald", hue: 130.0 },
    Palette { name: "cyan",    hue: 185.0 },
    Palette { name: "azure",   hue: 215.0 },
    Palette { name: "violet",  hue: 275.0 },
    Palette { name: "rose",    hue: 320.0 },
];

// ════════════════════════════════════════════════════════════════════════════
// Style
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style { Circle, Ring, Burst, Willow, Chrysanthemum }

/// Per-spark values before they become a [`Particle`].  Styles rewrite
/// these in place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SparkRoll {
    pub speed:     f32,
    pub hue:       f32,
    pub lightness: f32,
    pub decay:     f32,
    pub gravity:   f32,
}

impl Style {
    pub const ALL: [Style; 5] = [
        Style::Circle, Style::Ring, Style::Burst, Style::Willow, Style::Chrysanthemum,
    ];

    /// Apply this style's overrides to a default roll.
    pub fn shape<R: Rng + ?Sized>(self, spark: &mut SparkRoll, power: f32, rng: &mut R) {
        match self {
            Style::Circle => {}
            Style::Ring => {
                spark.speed = power * rng.gen_range(0.85..=1.15);
                spark.decay = rng.gen_range(0.015..=0.025);
            }
            Style::Burst => {
                if rng.gen_bool(0.3) {
                    spark.speed *= 1.8;
                }
                spark.lightness = rng.gen_range(45.0..=58.0);
            }
            Style::Willow => {
                spark.speed   = power * rng.gen_range(0.3..=0.7);
                spark.gravity = 0.08;
                spark.decay   = rng.gen_range(0.008..=0.015);
                if rng.gen_bool(0.3) {
                    spark.hue += 180.0;
                }
            }
            Style::Chrysanthemum => {
                spark.speed = power * rng.gen_range(0.5..=1.0);
                if rng.gen_bool(0.3) {
                    spark.lightness = rng.gen_range(50.0..=60.0);
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Blast — one rolled explosion plan
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blast {
    pub size_class: SizeClass,
    pub palette:    Palette,
    pub style:      Style,
    pub count:      usize,
    pub power:      f32,
    pub radius:     f32,
}

// ════════════════════════════════════════════════════════════════════════════
// Composer
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct Composer {
    friction: f32,
}

impl Composer {
    pub fn new(friction: f32) -> Self { Composer { friction } }

    /// Roll size class, palette and style for one explosion.
    pub fn plan<R: Rng + ?Sized>(&self, rng: &mut R) -> Blast {
        let size_class = SizeClass::from_unit(rng.gen::<f32>());
        let count  = rng.gen_range(size_class.count_range());
        let power  = rng.gen_range(size_class.power_range());
        let radius = rng.gen_range(size_class.radius_range());
        let palette = PALETTES[rng.gen_range(0..PALETTES.len())];
        let style   = Style::ALL[rng.gen_range(0..Style::ALL.len())];
        Blast { size_class, palette, style, count, power, radius }
    }

    /// Build every spark of `blast` centred on `(x, y)`.
    pub fn sparks<R: Rng + ?Sized>(&self, blast: &Blast, x: f32, y: f32, rng: &mut R) -> Vec<Particle> {
        (0..blast.count).map(|_| {
            let angle = rng.gen_range(0.0..TAU);
            let mut spark = SparkRoll {
                speed:     rng.gen_range(0.0..blast.power),
                hue:       blast.palette.hue + rng.gen_range(-HUE_JITTER..=HUE_JITTER),
                lightness: rng.gen_range(45.0..=55.0),
                decay:     rng.gen_range(0.01..=0.02),
                gravity:   BASE_GRAVITY,
            };
            blast.style.shape(&mut spark, blast.power, rng);

            Particle::new(
                x, y,
                angle.cos() * spark.speed,
                angle.sin() * spark.speed,
                spark.hue, spark.lightness,
                spark.decay, self.friction, spark.gravity, blast.radius,
            )
        }).collect()
    }

    /// Spawn one explosion into `pool`.
    ///
    /// The whole batch is refused while the pool is above its cap; in that
    /// case nothing is built, no sound plays and `None` comes back.
    /// `hint` is the caller's intensity guess; the size class is always
    /// rolled here.
    pub fn explode<R: Rng + ?Sized>(
        &self,
        pool:  &mut ParticlePool,
        x: f32, y: f32,
        hint:  f32,
        rng:   &mut R,
        audio: &dyn AudioCues,
    ) -> Option<Blast> {
        if pool.is_saturated() {
            log::debug!("explosion at ({:.0}, {:.0}) dropped: {} live sparks over cap", x, y, pool.len());
            return None;
        }
        let blast = self.plan(rng);
        log::trace!(
            "explode ({:.0}, {:.0}) hint={:.2} → {:?} {} {:?} ×{}",
            x, y, hint, blast.size_class, blast.palette.name, blast.style, blast.count
        );
        let batch = self.sparks(&blast, x, y, rng);
        pool.admit(batch);
        audio.play_explosion(blast.size_class.loudness());
        Some(blast)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingCues;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng(seed: u64) -> StdRng { StdRng::seed_from_u64(seed) }

    fn default_roll(power: f32) -> SparkRoll {
        SparkRoll { speed: power * 0.5, hue: 100.0, lightness: 45.0, decay: 0.015, gravity: BASE_GRAVITY }
    }

    fn blast(style: Style, size_class: SizeClass) -> Blast {
        Blast {
            size_class, style,
            palette: PALETTES[0],
            count:   150,
            power:   10.0,
            radius:  5.0,
        }
    }

    #[test]
    fn size_class_thresholds() {
        assert_eq!(SizeClass::from_unit(0.0),   SizeClass::Small);
        assert_eq!(SizeClass::from_unit(0.299), SizeClass::Small);
        assert_eq!(SizeClass::from_unit(0.3),   SizeClass::Medium);
        assert_eq!(SizeClass::from_unit(0.699), SizeClass::Medium);
        assert_eq!(SizeClass::from_unit(0.7),   SizeClass::Large);
        assert_eq!(SizeClass::from_unit(0.999), SizeClass::Large);
    }

    #[test]
    fn plans_stay_inside_their_class_bounds() {
        let composer = Composer::new(0.96);
        let mut r = rng(7);
        let mut seen = [false; 3];
        for _ in 0..2000 {
            let b = composer.plan(&mut r);
            assert!(b.size_class.count_range().contains(&b.count), "{:?}", b);
            assert!(b.size_class.power_range().contains(&b.power), "{:?}", b);
            assert!(b.size_class.radius_range().contains(&b.radius), "{:?}", b);
            seen[b.size_class as usize] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn every_style_and_palette_gets_picked() {
        let composer = Composer::new(0.96);
        let mut r = rng(11);
        let plans: Vec<Blast> = (0..1000).map(|_| composer.plan(&mut r)).collect();
        for style in Style::ALL {
            assert!(plans.iter().any(|b| b.style == style), "{:?} never rolled", style);
        }
        for pal in PALETTES {
            assert!(plans.iter().any(|b| b.palette == pal), "{} never rolled", pal.name);
        }
    }

    #[test]
    fn circle_leaves_roll_untouched() {
        let mut spark = default_roll(10.0);
        Style::Circle.shape(&mut spark, 10.0, &mut rng(1));
        assert_eq!(spark, default_roll(10.0));
    }

    #[test]
    fn ring_forces_narrow_speed_band() {
        let mut r = rng(2);
        for _ in 0..500 {
            let mut spark = default_roll(10.0);
            Style::Ring.shape(&mut spark, 10.0, &mut r);
            assert!((8.5..=11.5).contains(&spark.speed));
            assert!((0.015..=0.025).contains(&spark.decay));
        }
    }

    #[test]
    fn willow_droops_and_lingers() {
        let mut r = rng(3);
        let mut flipped = 0;
        for _ in 0..500 {
            let mut spark = default_roll(10.0);
            Style::Willow.shape(&mut spark, 10.0, &mut r);
            assert!((3.0..=7.0).contains(&spark.speed));
            assert_eq!(spark.gravity, 0.08);
            assert!((0.008..=0.015).contains(&spark.decay));
            if spark.hue == 280.0 { flipped += 1; } else { assert_eq!(spark.hue, 100.0); }
        }
        assert!(flipped > 80 && flipped < 230, "flipped {}", flipped);
    }

    #[test]
    fn burst_streaks_and_lightness() {
        let mut r = rng(4);
        let mut streaks = 0;
        for _ in 0..500 {
            let mut spark = default_roll(10.0);
            Style::Burst.shape(&mut spark, 10.0, &mut r);
            if spark.speed > 5.0 { streaks += 1; }
            assert!((45.0..=58.0).contains(&spark.lightness));
        }
        assert!(streaks > 80 && streaks < 230, "streaks {}", streaks);
    }

    #[test]
    fn chrysanthemum_speed_and_brightening() {
        let mut r = rng(5);
        let mut brightened = 0;
        for _ in 0..500 {
            let mut spark = default_roll(10.0);
            Style::Chrysanthemum.shape(&mut spark, 10.0, &mut r);
            assert!((5.0..=10.0).contains(&spark.speed));
            if spark.lightness == 45.0 { continue; }
            assert!((50.0..=60.0).contains(&spark.lightness), "lightness {}", spark.lightness);
            brightened += 1;
        }
        assert!(brightened > 80 && brightened < 230, "brightened {}", brightened);
    }

    #[test]
    fn ring_batch_speeds_within_band_of_rolled_power() {
        let composer = Composer::new(0.96);
        let b = blast(Style::Ring, SizeClass::Medium);
        let sparks = composer.sparks(&b, 50.0, 60.0, &mut rng(6));
        assert_eq!(sparks.len(), 150);
        for p in &sparks {
            assert!(p.speed() >= 10.0 * 0.85 - 1e-3 && p.speed() <= 10.0 * 1.15 + 1e-3);
            assert_eq!((p.x, p.y), (50.0, 60.0));
        }
    }

    #[test]
    fn default_spark_values() {
        let composer = Composer::new(0.9);
        let b = blast(Style::Circle, SizeClass::Large);
        for p in composer.sparks(&b, 0.0, 0.0, &mut rng(8)) {
            assert!(p.speed() < 10.0 + 1e-3);
            assert!(p.hue >= 345.0 || p.hue <= 15.0, "hue {}", p.hue);
            assert!((45.0..=55.0).contains(&p.lightness));
            assert!((0.01..=0.02).contains(&p.decay()));
            assert_eq!(p.gravity(), BASE_GRAVITY);
            assert_eq!(p.friction(), 0.9);
            assert_eq!(p.size(), 5.0);
            assert_eq!(p.alpha, 1.0);
        }
    }

    #[test]
    fn explode_appends_one_batch_and_one_sound() {
        let composer = Composer::new(0.96);
        let mut pool = ParticlePool::new(2000);
        let audio = RecordingCues::default();
        let b = composer.explode(&mut pool, 10.0, 10.0, 0.5, &mut rng(9), &audio).unwrap();
        assert_eq!(pool.len(), b.count);
        assert!((70..300).contains(&pool.len()));
        assert_eq!(audio.explosions(), vec![b.size_class.loudness()]);
    }

    #[test]
    fn explode_refused_over_cap() {
        let composer = Composer::new(0.96);
        let mut pool = ParticlePool::new(50);
        let audio = RecordingCues::default();
        let mut r = rng(10);
        // first batch always fits (0 <= cap) and overshoots it
        assert!(composer.explode(&mut pool, 0.0, 0.0, 1.0, &mut r, &audio).is_some());
        let live = pool.len();
        assert!(composer.explode(&mut pool, 0.0, 0.0, 1.0, &mut r, &audio).is_none());
        assert_eq!(pool.len(), live);
        assert_eq!(audio.explosions().len(), 1);
    }
}
