//! CPU-side texture payloads.
//!
//! Backends turn a [`TextureData`] into their own texture handle; nothing here
//! touches the GPU.

mod data;

pub use data::{Filter, Sampling, TextureData, TextureError, Wrap};
