//! Quadmap Library
//!
//! Renders Quadstick mouthpiece mappings as a two-colour table for
//! bilevel e-paper displays: token normalization, button-state decoding,
//! row layout, and drawing onto a primary and an accent pixel plane.

// Module declarations
pub mod button_state;
pub mod cli;
pub mod config;
pub mod constants;
pub mod display;
pub mod error;
pub mod layout;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod source;
#[cfg(feature = "web")]
pub mod web;

pub use error::{QuadmapError, QuadmapResult};
