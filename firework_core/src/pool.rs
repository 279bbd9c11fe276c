//! The particle pool.
//!
//! An ordered arena of live sparks.  Whole batches are admitted or refused
//! at once: while the live count is above the cap no new batch gets in, but
//! nothing already alive is ever evicted.  Each frame [`ParticlePool::step`]
//! integrates every spark and compacts dead slots away in a single pass.

use crate::particle::Particle;

/// Up-front reservation ceiling; larger pools grow on demand.
const INITIAL_RESERVE: usize = 4096;

#[derive(Debug)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    cap:       usize,
}

impl ParticlePool {
    pub fn new(cap: usize) -> Self {
        ParticlePool {
            particles: Vec::with_capacity(cap.saturating_add(300).min(INITIAL_RESERVE)),
            cap,
        }
    }

    pub fn len(&self)      -> usize { self.particles.len() }
    pub fn is_empty(&self) -> bool  { self.particles.is_empty() }
    pub fn cap(&self)      -> usize { self.cap }

    /// True while a new batch would be refused.
    pub fn is_saturated(&self) -> bool { self.particles.len() > self.cap }

    /// Append a whole batch, or nothing.  Returns the number admitted.
    pub fn admit<I>(&mut self, batch: I) -> usize
    where
        I: IntoIterator<Item = Particle>,
    {
        if self.is_saturated() {
            return 0;
        }
        let before = self.particles.len();
        self.particles.extend(batch);
        self.particles.len() - before
    }

    /// Integrate every live spark, then overwrite dead slots with the next
    /// survivor and truncate.  Survivor order is preserved.  Returns how
    /// many sparks died this tick.
    pub fn step(&mut self) -> usize {
        let mut write = 0;
        for read in 0..self.particles.len() {
            self.particles[read].update();
            if !self.particles[read].is_dead() {
                if write != read {
                    self.particles.swap(write, read);
                }
                write += 1;
            }
        }
        let died = self.particles.len() - write;
        self.particles.truncate(write);
        died
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> { self.particles.iter() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
