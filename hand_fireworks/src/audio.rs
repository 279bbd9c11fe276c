//! MIDI sound cues.
//!
//! A background thread owns the MIDI connection.  The show talks to it
//! through [`MidiCues`], which only ever pushes a command onto a channel,
//! so no cue can stall a frame or surface an error.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use firework_core::AudioCues;

/// General MIDI percussion channel (0-based).
const DRUM_CHANNEL: u8 = 9;
/// Lead Square — a bright whistle for rocket launches.
const LAUNCH_PROGRAM: u8 = 80;

// ════════════════════════════════════════════════════════════════════════════
// CueCommand — sent to the sound thread
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CueCommand {
    Launch(f32),
    Explosion(f32),
    /// Terminate the thread.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// MidiOut — abstraction over midir / null
// ════════════════════════════════════════════════════════════════════════════

trait MidiOut: Send {
    fn program_change(&mut self, channel: u8, program: u8);
    fn note_on(&mut self,  channel: u8, note: u8, velocity: u8);
    fn note_off(&mut self, channel: u8, note: u8);
}

// ── midir backend ─────────────────────────────────────────────────────────

struct MidirOut {
    conn: midir::MidiOutputConnection,
}

impl MidiOut for MidirOut {
    fn program_change(&mut self, channel: u8, program: u8) {
        if let Err(e) = self.conn.send(&[0xC0 | (channel & 0x0F), program]) {
            log::warn!("MIDI program change failed: {}", e);
        }
    }
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8) {
        if let Err(e) = self.conn.send(&[0x90 | (channel & 0x0F), note, velocity]) {
            log::warn!("MIDI note on failed: {}", e);
        }
    }
    fn note_off(&mut self, channel: u8, note: u8) {
        let _ = self.conn.send(&[0x80 | (channel & 0x0F), note, 0]);
    }
}

// ── null backend (used when no MIDI port is available) ────────────────────

struct NullOut;
impl MidiOut for NullOut {
    fn program_change(&mut self, _ch: u8, _p: u8)   {}
    fn note_on(&mut self, _ch: u8, _n: u8, _v: u8)  {}
    fn note_off(&mut self, _ch: u8, _n: u8)          {}
}

// ════════════════════════════════════════════════════════════════════════════
// open_midi_output — enumerate ports and pick first available
// ════════════════════════════════════════════════════════════════════════════

/// Try to open the first available MIDI output port.
/// Falls back to `NullOut` with a warning if none found.
fn open_midi_output() -> Box<dyn MidiOut> {
    let midi_out = match midir::MidiOutput::new("hand_fireworks") {
        Ok(m)  => m,
        Err(e) => {
            log::warn!("MIDI init error: {} — playing silently", e);
            return Box::new(NullOut);
        }
    };

    let ports = midi_out.ports();
    if ports.is_empty() {
        log::warn!("no MIDI output ports found — playing silently");
        log::warn!("start a synthesiser (e.g. `fluidsynth` or `timidity -iA`) for sound");
        return Box::new(NullOut);
    }

    // Prefer a softsynth if visible
    let port_idx = ports.iter()
        .position(|p| {
            midi_out.port_name(p).map(|n| {
                let n = n.to_lowercase();
                n.contains("fluid") || n.contains("timidity") ||
                n.contains("microsoft") || n.contains("synth")
            }).unwrap_or(false)
        })
        .unwrap_or(0);

    let port = &ports[port_idx];
    let name = midi_out.port_name(port)
        .unwrap_or_else(|_| "Unknown".to_string());
    log::info!("opening MIDI port: {}", name);

    match midi_out.connect(port, "hand-fireworks-cues") {
        Ok(conn) => Box::new(MidirOut { conn }),
        Err(e) => {
            log::warn!("failed to connect to {}: {} — playing silently", name, e);
            Box::new(NullOut)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Cue → note mapping
// ════════════════════════════════════════════════════════════════════════════

/// A note to play: (channel, key, velocity, how long it rings).
#[derive(Clone, Copy, Debug, PartialEq)]
struct Voice {
    channel:  u8,
    note:     u8,
    velocity: u8,
    length:   Duration,
}

/// Higher hands whistle higher and louder.
fn launch_voice(melody_channel: u8, charge: f32) -> Voice {
    let c = charge.clamp(0.0, 1.0);
    Voice {
        channel:  melody_channel,
        note:     72 + (c * 12.0).round() as u8,
        velocity: 50 + (c * 60.0).round() as u8,
        length:   Duration::from_millis(180),
    }
}

/// Small → snare, medium → low tom, large → crash cymbal.
fn explosion_voice(size: f32) -> Voice {
    let s = size.clamp(0.0, 1.0);
    let note = if s < 0.5 { 38 } else if s < 0.85 { 41 } else { 49 };
    Voice {
        channel:  DRUM_CHANNEL,
        note,
        velocity: 60 + (s * 67.0).round() as u8,
        length:   Duration::from_millis(400),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MidiCues — handle to the sound thread
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct MidiCues {
    cmd_tx: Sender<CueCommand>,
}

impl MidiCues {
    /// Spawn the sound thread; launches play on `channel`.
    pub fn spawn(channel: u8) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<CueCommand>();
        thread::spawn(move || cue_thread(channel & 0x0F, cmd_rx, open_midi_output()));
        MidiCues { cmd_tx }
    }

    /// Stop the sound thread, silencing anything still ringing.
    pub fn shutdown(&self) { let _ = self.cmd_tx.send(CueCommand::Quit); }
}

impl AudioCues for MidiCues {
    fn play_launch(&self, charge: f32) {
        let _ = self.cmd_tx.send(CueCommand::Launch(charge));
    }
    fn play_explosion(&self, size: f32) {
        let _ = self.cmd_tx.send(CueCommand::Explosion(size));
    }
}

// ════════════════════════════════════════════════════════════════════════════
// cue_thread — the actual loop
// ════════════════════════════════════════════════════════════════════════════

fn cue_thread(channel: u8, cmd_rx: Receiver<CueCommand>, mut midi: Box<dyn MidiOut>) {
    midi.program_change(channel, LAUNCH_PROGRAM);
    let mut ringing: Vec<(Voice, Instant)> = Vec::new();

    loop {
        // Wake at least every 10 ms to release finished notes
        match cmd_rx.recv_timeout(Duration::from_millis(10)) {
            Ok(CueCommand::Launch(c))    => start(&mut *midi, &mut ringing, launch_voice(channel, c)),
            Ok(CueCommand::Explosion(s)) => start(&mut *midi, &mut ringing, explosion_voice(s)),
            Ok(CueCommand::Quit) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }

        let now = Instant::now();
        ringing.retain(|(v, until)| {
            if *until <= now {
                midi.note_off(v.channel, v.note);
                false
            } else {
                true
            }
        });
    }

    for (v, _) in ringing {
        midi.note_off(v.channel, v.note);
    }
}

/// Strike `v`.  A key that is still ringing is struck again and keeps a
/// single release deadline, pushed out to the later of the two.
fn start(midi: &mut dyn MidiOut, ringing: &mut Vec<(Voice, Instant)>, v: Voice) {
    midi.note_on(v.channel, v.note, v.velocity);
    let until = Instant::now() + v.length;
    match ringing.iter_mut().find(|(r, _)| (r.channel, r.note) == (v.channel, v.note)) {
        Some((_, deadline)) => *deadline = (*deadline).max(until),
        None                => ringing.push((v, until)),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
