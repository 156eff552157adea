//! Pit shaft generators

mod generator;
pub mod layers;

pub use generator::{standard_palette, PitGenerator, PitVariant};
