//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │          sparks (additive, fading trails)                    │
//! │                                                              │
//! ├──────────────────────────────────────────────────────────────┤
//! │  status bar: lane states · live sparks · FINALE              │
//! │  key legend                                                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The window is resizable; the canvas follows the window's pixel size.

use std::sync::mpsc::Sender;

use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use firework_core::{Canvas, Lane};

use crate::tracking::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const STATUS_H:   usize = 28;
const TEXT_BG:        u32   = 0xFF0F1A30;
const STATUS_COLOR:   u32   = 0xFFEEEEEE;
const LEGEND_COLOR:   u32   = 0xFF888888;
const FINALE_COLOR:   u32   = 0xFFFFD700;  // gold

const LEGEND: &str = "1/2=show hand  A/D=fist  F=both open  mouse=move  Q=quit";

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:  Window,
    canvas:  Canvas,
    sim_tx:  Sender<SimInput>,
    pointer: Option<(f32, f32)>,
}

impl Visualizer {
    pub fn new(width: usize, height: usize, sim_tx: Sender<SimInput>) -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            "Hand Fireworks",
            width, height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            canvas: Canvas::new(width, height),
            sim_tx,
            pointer: None,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Drawing area in device pixels, following window resizes.
    pub fn viewport(&mut self) -> (usize, usize) {
        let (w, h) = self.window.get_size();
        self.canvas.resize(w.max(1), h.max(1));
        (self.canvas.width(), self.canvas.height())
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas { &mut self.canvas }

    /// Poll keyboard and mouse and translate to SimInput events.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let one_shot = |w: &Window, k: Key| w.is_key_pressed(k, KeyRepeat::No);

        if one_shot(&self.window, Key::Q) || one_shot(&self.window, Key::Escape) {
            return false;
        }
        if one_shot(&self.window, Key::Key1) { self.send(SimInput::Toggle(Lane::Left)); }
        if one_shot(&self.window, Key::Key2) { self.send(SimInput::Toggle(Lane::Right)); }
        if one_shot(&self.window, Key::F)    { self.send(SimInput::RaiseBoth); }

        for (key, lane) in [(Key::A, Lane::Left), (Key::D, Lane::Right)] {
            if one_shot(&self.window, key) {
                self.send(SimInput::Curl { lane, curled: true });
            }
            if self.window.is_key_released(key) {
                self.send(SimInput::Curl { lane, curled: false });
            }
        }

        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            let w = self.canvas.width().max(1) as f32;
            let h = self.canvas.height().max(1) as f32;
            let p = ((mx / w).clamp(0.0, 1.0), (my / h).clamp(0.0, 1.0));
            if self.pointer != Some(p) {
                self.pointer = Some(p);
                self.send(SimInput::Pointer { x: p.0, y: p.1 });
            }
        }

        true
    }

    fn send(&self, input: SimInput) {
        let _ = self.sim_tx.send(input);
    }

    /// Draw the status bar over the sparks and push the frame to the window.
    pub fn present(&mut self, status: &str, finale: bool) {
        let (w, h) = (self.canvas.width(), self.canvas.height());
        let bar_y = h.saturating_sub(STATUS_H);
        self.canvas.fill_rect(0, bar_y, w, STATUS_H, TEXT_BG);
        let color = if finale { FINALE_COLOR } else { STATUS_COLOR };
        draw_label(&mut self.canvas, status, 10, bar_y + 6, color);
        draw_label(&mut self.canvas, LEGEND, 10, bar_y + 17, LEGEND_COLOR);

        if let Err(e) = self.window.update_with_buffer(self.canvas.pixels(), w, h) {
            log::warn!("frame not presented: {}", e);
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

/// Each character is encoded as 5 rows × 3 bits, drawn 1 pixel apart.
fn draw_label(canvas: &mut Canvas, text: &str, x: usize, y: usize, color: u32) {
    let mut cx = x;
    for ch in text.chars() {
        if cx + 4 > canvas.width() { break; }
        for (row, &bits) in char_glyph(ch).iter().enumerate() {
            for col in 0..3usize {
                if bits & (1 << (2 - col)) != 0 {
                    canvas.set_pixel(cx + col, y + row, color);
                }
            }
        }
        cx += 4;
    }
}

fn char_glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '*' => [0b101, 0b010, 0b111, 0b010, 0b101],
        ' ' => [0b000; 5],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000],
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_pixels_stay_inside_canvas() {
        let mut c = Canvas::new(40, 10);
        draw_label(&mut c, "A VERY LONG STATUS LINE THAT OVERFLOWS", 2, 2, 0xFFFFFFFF);
        let lit = c.pixels().iter().filter(|&&px| px == 0xFFFFFFFF).count();
        assert!(lit > 0);
    }

    #[test]
    fn lowercase_uses_uppercase_glyphs() {
        assert_eq!(char_glyph('q'), char_glyph('Q'));
        assert_ne!(char_glyph('Q'), char_glyph('?'));
    }
}
