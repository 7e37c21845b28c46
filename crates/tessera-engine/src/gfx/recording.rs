use std::cell::RefCell;
use std::rc::Rc;

use crate::math::Mat4;
use crate::texture::TextureData;

use super::{BufferKind, GfxError, GraphicsContext, IndexedDraw, ProgramSource};

/// Identity of a recorded resource. Unique per context.
pub type ResourceId = u32;

/// One call observed by a [`RecordingContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum GfxCall {
    BuildProgram {
        id: ResourceId,
        label: String,
    },
    CreateBuffer {
        id: ResourceId,
        kind: BufferKind,
        contents: Vec<u8>,
        label: String,
    },
    WriteBuffer {
        id: ResourceId,
        contents: Vec<u8>,
    },
    CreateTexture {
        id: ResourceId,
        width: u32,
        height: u32,
        label: String,
    },
    SetTransform {
        program: ResourceId,
        matrix: Mat4,
    },
    DrawIndexed {
        program: ResourceId,
        vertex_buffers: Vec<ResourceId>,
        index_buffer: ResourceId,
        texture: ResourceId,
        index_count: u32,
    },
    Release {
        id: ResourceId,
    },
}

type CallLog = Rc<RefCell<Vec<GfxCall>>>;

/// Handle that appends a `Release` to the log when dropped.
#[derive(Debug)]
pub struct RecordedHandle {
    id: ResourceId,
    log: CallLog,
}

impl RecordedHandle {
    #[inline]
    pub fn id(&self) -> ResourceId {
        self.id
    }
}

impl Drop for RecordedHandle {
    fn drop(&mut self) {
        self.log.borrow_mut().push(GfxCall::Release { id: self.id });
    }
}

/// Headless [`GraphicsContext`] that records every call in order.
///
/// Intended for tests and for checking call sequences without a GPU.
#[derive(Debug, Default)]
pub struct RecordingContext {
    log: CallLog,
    next_id: ResourceId,
    build_failure: Option<GfxError>,
    /// Largest accepted texture edge; `None` accepts any size.
    max_texture_dimension: Option<u32>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `build_program` call fail with `err`.
    pub fn fail_next_build(&mut self, err: GfxError) {
        self.build_failure = Some(err);
    }

    /// Rejects textures wider or taller than `max`, like a device limit.
    pub fn limit_texture_dimension(&mut self, max: u32) {
        self.max_texture_dimension = Some(max);
    }

    /// Snapshot of the calls recorded so far.
    pub fn calls(&self) -> Vec<GfxCall> {
        self.log.borrow().clone()
    }

    /// Drains the recorded calls.
    pub fn take_calls(&mut self) -> Vec<GfxCall> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    fn handle(&mut self) -> RecordedHandle {
        let id = self.next_id;
        self.next_id += 1;
        RecordedHandle {
            id,
            log: Rc::clone(&self.log),
        }
    }

    fn push(&self, call: GfxCall) {
        self.log.borrow_mut().push(call);
    }
}

impl GraphicsContext for RecordingContext {
    type Program = RecordedHandle;
    type Buffer = RecordedHandle;
    type Texture = RecordedHandle;

    fn build_program(&mut self, source: &ProgramSource<'_>) -> Result<RecordedHandle, GfxError> {
        if let Some(err) = self.build_failure.take() {
            return Err(err);
        }
        let h = self.handle();
        self.push(GfxCall::BuildProgram {
            id: h.id,
            label: source.label.to_owned(),
        });
        Ok(h)
    }

    fn create_buffer(&mut self, kind: BufferKind, contents: &[u8], label: &str) -> RecordedHandle {
        let h = self.handle();
        self.push(GfxCall::CreateBuffer {
            id: h.id,
            kind,
            contents: contents.to_vec(),
            label: label.to_owned(),
        });
        h
    }

    fn write_buffer(&mut self, buffer: &mut RecordedHandle, contents: &[u8]) {
        self.push(GfxCall::WriteBuffer {
            id: buffer.id,
            contents: contents.to_vec(),
        });
    }

    fn create_texture(&mut self, data: &TextureData, label: &str) -> Result<RecordedHandle, GfxError> {
        if let Some(max) = self.max_texture_dimension {
            if data.width() > max || data.height() > max {
                return Err(GfxError::TextureCreate {
                    label: label.to_owned(),
                    log: format!("{}x{} exceeds {max}", data.width(), data.height()),
                });
            }
        }
        let h = self.handle();
        self.push(GfxCall::CreateTexture {
            id: h.id,
            width: data.width(),
            height: data.height(),
            label: label.to_owned(),
        });
        Ok(h)
    }

    fn set_transform(&mut self, program: &RecordedHandle, matrix: &Mat4) {
        self.push(GfxCall::SetTransform {
            program: program.id,
            matrix: *matrix,
        });
    }

    fn draw_indexed(&mut self, draw: IndexedDraw<'_, Self>) {
        self.push(GfxCall::DrawIndexed {
            program: draw.program.id,
            vertex_buffers: draw.vertex_buffers.iter().map(|b| b.id).collect(),
            index_buffer: draw.index_buffer.id,
            texture: draw.texture.id,
            index_count: draw.index_count,
        });
    }
}

/// Reinterprets recorded bytes as native-endian `f32`s.
pub fn f32s(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// Reinterprets recorded bytes as native-endian `u16`s.
pub fn u16s(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|c| u16::from_ne_bytes([c[0], c[1]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_release_is_logged() {
        let mut ctx = RecordingContext::new();
        let a = ctx.create_buffer(BufferKind::Vertex, &[1, 2], "a");
        let b = ctx.create_buffer(BufferKind::Index, &[3, 4], "b");
        assert_ne!(a.id(), b.id());

        let a_id = a.id();
        drop(a);
        assert_eq!(ctx.calls().last(), Some(&GfxCall::Release { id: a_id }));
    }

    #[test]
    fn injected_failure_applies_once() {
        let mut ctx = RecordingContext::new();
        ctx.fail_next_build(GfxError::ProgramLink {
            label: "p".into(),
            log: "nope".into(),
        });

        let src = ProgramSource {
            label: "p",
            wgsl: "",
            vertex_entry: "vs",
            fragment_entry: "fs",
            attributes: &[],
        };
        assert!(ctx.build_program(&src).is_err());
        assert!(ctx.build_program(&src).is_ok());
    }

    #[test]
    fn texture_limit_rejects_oversized_data() {
        let mut ctx = RecordingContext::new();
        ctx.limit_texture_dimension(4);

        assert!(ctx.create_texture(&TextureData::checkerboard(4), "fits").is_ok());
        let err = ctx
            .create_texture(&TextureData::checkerboard(5), "too big")
            .unwrap_err();
        assert!(matches!(err, GfxError::TextureCreate { .. }));
        assert!(!ctx.calls().iter().any(|c| matches!(
            c,
            GfxCall::CreateTexture { label, .. } if label == "too big"
        )));
    }

    #[test]
    fn byte_helpers_roundtrip_native_layout() {
        let floats = [0.25f32, -1.0];
        assert_eq!(f32s(bytemuck::cast_slice(&floats)), floats.to_vec());
        let idx = [0u16, 2, 3];
        assert_eq!(u16s(bytemuck::cast_slice(&idx)), idx.to_vec());
    }
}
