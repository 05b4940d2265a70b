//! View a multiple sequence alignment from FASTA, draw residue and region annotations over it,
//! and export the result as an image, and as a JSON manifest.
//!
//! Everything except `gui` (and the `eframe::App` impl on `State`) works without a display.

pub mod annotation;
pub mod color_scheme;
pub mod coords;
pub mod error;
pub mod fasta;
pub mod file_io;
pub mod gui;
pub mod layout;
pub mod render;
pub mod state;
pub mod util;

pub type Color = (u8, u8, u8); // RGB
