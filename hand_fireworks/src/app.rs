//! Top-level run loop.
//!
//! Wires the tracking source, the sound thread, the show and the window
//! together and drives one simulation + render pass per display refresh.

use std::sync::mpsc;
use std::time::Instant;

use firework_core::{AudioCues, FireworksConfig, HandFeed, Show};

use crate::audio::MidiCues;
use crate::tracking::{spawn_tracking_source, SimInput};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub fireworks:    FireworksConfig,
    pub width:        usize,
    pub height:       usize,
    /// MIDI channel for launch whistles (explosions use GM percussion).
    pub midi_channel: u8,
    /// Fixed seed for a reproducible show.
    pub seed:         Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            fireworks:    FireworksConfig::default(),
            width:        1280,
            height:       720,
            midi_channel: 0,
            seed:         None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Status line
// ════════════════════════════════════════════════════════════════════════════

/// One-line summary shown in the status bar.
pub fn status_line<A: AudioCues>(show: &Show<A>) -> String {
    let lanes = show.lanes();
    let mut s = format!(
        "LEFT: {}  RIGHT: {}  SPARKS: {}",
        lanes.left.state.name(),
        lanes.right.state.name(),
        show.pool().len(),
    );
    if show.pool().is_saturated() {
        s.push_str(" (FULL)");
    }
    if show.is_finale_active() {
        s.push_str("  *** FINALE ***");
    }
    s
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Creates the window, the tracking source (simulation by default,
/// hardware with `--features leap`), the sound thread and the show, then
/// loops until the window closes.
pub fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let feed = HandFeed::new();

    // ── Sim input channel (the window is the only writer) ────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();

    #[cfg(not(feature = "leap"))]
    let _tracker = spawn_tracking_source(crate::tracking::SimTrackingSource { rx: sim_rx }, feed.clone());
    #[cfg(feature = "leap")]
    let _tracker = {
        drop(sim_rx);
        spawn_tracking_source(crate::tracking::LeapTrackingSource, feed.clone())
    };

    // ── Sound, show, window ──────────────────────────────────────────────
    let audio = MidiCues::spawn(cfg.midi_channel);
    let mut show = Show::new(cfg.fireworks, audio.clone(), (cfg.width, cfg.height), cfg.seed)?;
    let mut vis = Visualizer::new(cfg.width, cfg.height, sim_tx)?;
    log::info!("show started at {}×{}", cfg.width, cfg.height);

    // ── Main loop ─────────────────────────────────────────────────────────
    let start = Instant::now();
    while vis.is_open() {
        // 1. Window input → simulated hands
        if !vis.poll_input() { break; }

        // 2. Viewport may have been resized
        let (w, h) = vis.viewport();
        show.set_viewport(w, h);

        // 3. Newest tracking frame → one simulation tick
        let frame = feed.latest();
        show.frame(&frame, start.elapsed());

        // 4. Render
        show.render(vis.canvas_mut());
        vis.present(&status_line(&show), show.is_finale_active());
    }

    audio.shutdown();
    log::info!("show stopped after {} frames", show.frames());
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
