//! Core types and constants for casenotes
//!
//! This crate contains domain types shared across all other crates.

mod attachment;
mod digest;
mod limits;
mod note;
mod phase;
mod text;

pub use attachment::*;
pub use digest::*;
pub use limits::*;
pub use note::*;
pub use phase::*;
pub use text::*;
