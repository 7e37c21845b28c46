//! Keyboard input.
//!
//! The public types do not expose winit; [`translate_window_event`] is the
//! only place that knows about platform events.

mod frame;
mod state;
mod translate;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use translate::translate_window_event;
pub use types::{InputEvent, Key, KeyState, Modifiers};
