//! Colors used by the frame loop.

pub mod color;

pub use color::Color;
