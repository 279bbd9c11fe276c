//! # firework_core
//!
//! Real-time particle simulation and gesture-trigger engine for a
//! hand-controlled fireworks show.
//!
//! A hand-tracking collaborator publishes landmark frames into a
//! [`HandFeed`]; once per display frame [`Show::frame`] classifies each
//! hand, runs the trigger state machine, spawns explosion batches into the
//! particle pool, integrates and culls every live particle and finally
//! paints the survivors onto a [`Canvas`].
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Lane | Action |
//! |---|---|---|
//! | Fist → open (rising edge) | Left / Right | One explosion at the mirrored wrist position |
//! | Open held | Left / Right | Nothing (edge-triggered, 250 ms debounce) |
//! | Both hands open | Both | Finale choreography: 6 scripted multi-burst patterns |
//! | Hand leaves the frame | Either | Lane drops to `Unknown` immediately |
//!
//! ## Explosion styles
//!
//! | Style | Shape |
//! |---|---|
//! | `Circle` | uniform spread |
//! | `Ring` | narrow speed band around the rolled power |
//! | `Burst` | sparse long streaks |
//! | `Willow` | slow, heavy, long-lived droop |
//! | `Chrysanthemum` | dense bright core |
//!
//! Physics constants are expressed per frame tick, not per second, so the
//! apparent speed of a show follows the display refresh rate.

pub mod error;
pub mod config;
pub mod particle;
pub mod pool;
pub mod composer;
pub mod gesture;
pub mod trigger;
pub mod audio;
pub mod feed;
pub mod canvas;
pub mod show;

pub use error::FireworksError;
pub use config::FireworksConfig;
pub use particle::Particle;
pub use pool::ParticlePool;
pub use composer::{Composer, Palette, SizeClass, Style};
pub use gesture::{HandObservation, HandState, Lane, Point, TrackingFrame};
pub use trigger::{Lanes, TriggerController};
pub use audio::{AudioCues, SilentCues};
pub use feed::HandFeed;
pub use canvas::Canvas;
pub use show::{FrameReport, Show};
