//! Scene state for the spinning-quad loop.
//!
//! Pure CPU state: the render layer reads the matrices produced here and
//! uploads them through the quad's program.

mod projection;
mod spin;

pub use projection::{aspect_ratio, mvp, Projection};
pub use spin::{SpinState, MAX_SPEED, RATE_PER_SECOND, STEP_PER_FRAME, VIEW_DISTANCE};
