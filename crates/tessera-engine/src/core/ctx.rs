use winit::window::Window;

use crate::device::{Gpu, GpuFrame, SurfaceErrorAction};
use crate::gfx::{FrameTarget, WgpuContext};
use crate::input::{InputFrame, InputState};
use crate::paint::Color;
use crate::scene;
use crate::time::FrameTime;

use super::app::AppControl;

/// The window being drawn.
pub struct WindowCtx<'a> {
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
///
/// `'a` is the callback borrow; `'w` is the window borrow carried by `Gpu<'w>`.
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
}

impl FrameCtx<'_, '_> {
    /// Surface width over height.
    pub fn aspect(&self) -> f32 {
        let size = self.gpu.size();
        scene::aspect_ratio(size.width, size.height)
    }

    /// Acquires a frame, clears color and depth, lets `draw` record into the
    /// frame's [`WgpuContext`], then submits and presents.
    ///
    /// Surface errors are handled here on every frame: lost/outdated surfaces
    /// are reconfigured, timeouts skip the frame, out-of-memory exits.
    pub fn render<F>(&mut self, clear: Color, draw: F) -> AppControl
    where
        F: FnOnce(&mut WgpuContext),
    {
        let size = self.gpu.size();
        if size.width == 0 || size.height == 0 {
            // Minimised.
            return AppControl::Continue;
        }

        let frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    _ => AppControl::Continue,
                };
            }
        };

        let GpuFrame {
            surface_texture,
            view,
            depth_view,
            encoder,
        } = frame;

        let gfx = self.gpu.graphics();
        gfx.begin_frame(FrameTarget {
            encoder,
            color_view: view,
            depth_view,
        });
        gfx.clear(clear.to_wgpu());

        draw(gfx);

        let Some(target) = gfx.end_frame() else {
            log::error!("frame target vanished before submit");
            return AppControl::Continue;
        };

        self.window.window.pre_present_notify();
        self.gpu.present(target.encoder, surface_texture);

        AppControl::Continue
    }
}
