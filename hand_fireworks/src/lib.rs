//! # hand_fireworks
//!
//! Hand-gesture fireworks show: a software-rendered window, simulated or
//! LeapMotion hand tracking, and MIDI sound cues around
//! [`firework_core`].
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: keyboard and mouse stand in for hands.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation controls
//!
//! | Input | Effect |
//! |---|---|
//! | Mouse | Move the Left hand (the Right hand mirrors it) |
//! | `1` / `2` | Show or hide the Left / Right hand |
//! | hold `A` / `D` | Curl the Left / Right hand into a fist; release to open |
//! | `F` | Both hands up and open (finale) |
//! | `Q` / `Escape` | Quit |

pub mod tracking;
pub mod audio;
pub mod visualizer;
pub mod app;
