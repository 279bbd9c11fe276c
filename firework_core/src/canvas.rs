//! Software drawing surface.
//!
//! A packed ARGB (`0xAARRGGBB`) framebuffer in device pixels.  The
//! background is composited normally (a fade toward black that leaves
//! short motion trails); sparks are composited additively so overlapping
//! bursts bloom toward white.

use crate::particle::{Particle, SATURATION};

pub const BLACK: u32 = 0xFF000000;

#[derive(Clone, Debug)]
pub struct Canvas {
    width:  usize,
    height: usize,
    buf:    Vec<u32>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas { width, height, buf: vec![BLACK; width * height] }
    }

    pub fn width(&self)  -> usize  { self.width }
    pub fn height(&self) -> usize  { self.height }
    pub fn pixels(&self) -> &[u32] { &self.buf }

    /// Match a new viewport size.  Contents are discarded on change.
    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width  = width;
        self.height = height;
        self.buf.clear();
        self.buf.resize(width * height, BLACK);
    }

    /// Darken every pixel toward black; `keep` = 0 clears, 1 leaves as is.
    pub fn fade(&mut self, keep: f32) {
        let k = (keep.clamp(0.0, 1.0) * 256.0) as u32;
        for px in &mut self.buf {
            let r = (((*px >> 16) & 0xFF) * k) >> 8;
            let g = (((*px >>  8) & 0xFF) * k) >> 8;
            let b = (( *px        & 0xFF) * k) >> 8;
            *px = BLACK | (r << 16) | (g << 8) | b;
        }
    }

    /// Normal-blend an opaque rectangle (status bars, labels).
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buf[y * self.width + x] = color;
        }
    }

    /// Additively blend `rgb` scaled by `alpha` into one pixel.
    pub fn add_pixel(&mut self, x: isize, y: isize, rgb: (f32, f32, f32), alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        let cur = self.buf[idx];
        let add = |shift: u32, c: f32| -> u32 {
            let ch = (cur >> shift) & 0xFF;
            (ch + (c * alpha * 255.0) as u32).min(255) << shift
        };
        self.buf[idx] = BLACK | add(16, rgb.0) | add(8, rgb.1) | add(0, rgb.2);
    }

    /// Draw one spark as a filled disc of radius `size × alpha`.
    pub fn draw_particle(&mut self, p: &Particle) {
        if p.is_dead() {
            return;
        }
        let rgb = hsl_to_rgb(p.hue, SATURATION, p.lightness);
        let r = p.radius();
        let (cx, cy) = (p.x, p.y);
        if r < 0.75 {
            self.add_pixel(cx.round() as isize, cy.round() as isize, rgb, p.alpha);
            return;
        }
        let r2 = r * r;
        let (x0, x1) = ((cx - r).floor() as isize, (cx + r).ceil() as isize);
        let (y0, y1) = ((cy - r).floor() as isize, (cy + r).ceil() as isize);
        for y in y0..=y1 {
            let dy = y as f32 + 0.5 - cy;
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                if dx * dx + dy * dy <= r2 {
                    self.add_pixel(x, y, rgb, p.alpha);
                }
            }
        }
    }
}

/// HSL (degrees, percent, percent) → linear 0.0–1.0 RGB.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let h = h.rem_euclid(360.0) / 60.0;
    let s = (s / 100.0).clamp(0.0, 1.0);
    let l = (l / 100.0).clamp(0.0, 1.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = l - c / 2.0;
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    (r + m, g + m, b + m)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_to_argb((r, g, b): (f32, f32, f32)) -> u32 {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        BLACK | (q(r) << 16) | (q(g) << 8) | q(b)
    }

    fn spark_at(x: f32, y: f32, hue: f32, size: f32) -> Particle {
        Particle::new(x, y, 0.0, 0.0, hue, 50.0, 0.1, 1.0, 0.0, size)
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(rgb_to_argb(hsl_to_rgb(0.0,   100.0, 50.0)), 0xFFFF0000);
        assert_eq!(rgb_to_argb(hsl_to_rgb(120.0, 100.0, 50.0)), 0xFF00FF00);
        assert_eq!(rgb_to_argb(hsl_to_rgb(240.0, 100.0, 50.0)), 0xFF0000FF);
        assert_eq!(rgb_to_argb(hsl_to_rgb(60.0,  100.0, 100.0)), 0xFFFFFFFF);
        assert_eq!(rgb_to_argb(hsl_to_rgb(300.0, 100.0, 0.0)),  0xFF000000);
    }

    #[test]
    fn additive_blend_saturates() {
        let mut c = Canvas::new(4, 4);
        c.add_pixel(1, 1, (1.0, 0.0, 0.0), 0.6);
        c.add_pixel(1, 1, (1.0, 0.0, 0.0), 0.6);
        assert_eq!(c.pixels()[5] & 0x00FF0000, 0x00FF0000);
        c.add_pixel(-1, 9, (1.0, 1.0, 1.0), 1.0); // off-canvas: ignored
    }

    #[test]
    fn particle_disc_is_drawn_and_dead_is_not() {
        let mut c = Canvas::new(20, 20);
        let mut p = spark_at(10.0, 10.0, 0.0, 3.0);
        c.draw_particle(&p);
        let lit = c.pixels().iter().filter(|&&px| px != BLACK).count();
        assert!(lit >= 20 && lit <= 40, "lit {}", lit);

        c.fade(0.0);
        p.alpha = 0.0;
        c.draw_particle(&p);
        assert!(c.pixels().iter().all(|&px| px == BLACK));
    }

    #[test]
    fn fade_darkens_and_zero_clears() {
        let mut c = Canvas::new(2, 1);
        c.fill_rect(0, 0, 2, 1, 0xFFC8C8C8);
        c.fade(0.5);
        assert_eq!(c.pixels()[0], 0xFF646464);
        c.fade(0.0);
        assert_eq!(c.pixels()[0], BLACK);
    }

    #[test]
    fn resize_reallocates() {
        let mut c = Canvas::new(4, 4);
        c.resize(8, 2);
        assert_eq!((c.width(), c.height(), c.pixels().len()), (8, 2, 16));
    }
}
