use std::cell::Cell;

use wgpu::util::DeviceExt;

use crate::math::{mat4, Mat4};
use crate::texture::{Filter, TextureData, Wrap};

use super::{BufferKind, GfxError, GraphicsContext, IndexedDraw, ProgramSource, VertexAttribute};

/// Remaps GL clip-space depth (`[-1, 1]`) to wgpu's `[0, 1]`: `z' = (z + w) / 2`.
const GL_TO_WGPU_CLIP: Mat4 = Mat4::from_cols_array([
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 0.5, 0.0, //
    0.0, 0.0, 0.5, 1.0,
]);

/// Encoder + attachments that draws are recorded into for one frame.
pub struct FrameTarget {
    pub encoder: wgpu::CommandEncoder,
    pub color_view: wgpu::TextureView,
    /// Must be present iff the context was created with a depth format.
    pub depth_view: Option<wgpu::TextureView>,
}

/// [`GraphicsContext`] backed by a wgpu device and queue.
///
/// Resource creation works at any time. Draws need an open frame (see
/// [`WgpuContext::begin_frame`]); without one they are skipped with a warning.
pub struct WgpuContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
    color_format: wgpu::TextureFormat,
    depth_format: Option<wgpu::TextureFormat>,
    target: Option<FrameTarget>,
    /// Clip-space transforms uploaded by the open frame's draws, in order.
    frame_transforms: Vec<Mat4>,
}

impl WgpuContext {
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        color_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> Self {
        Self {
            device,
            queue,
            color_format,
            depth_format,
            target: None,
            frame_transforms: Vec::new(),
        }
    }

    /// Opens a frame. Any frame still open is dropped unsubmitted.
    pub fn begin_frame(&mut self, target: FrameTarget) {
        if self.target.replace(target).is_some() {
            log::warn!("previous frame was never ended; discarded");
        }
        self.frame_transforms.clear();
    }

    /// Closes the current frame and hands back its encoder for submission.
    pub fn end_frame(&mut self) -> Option<FrameTarget> {
        let target = self.target.take();
        if target.is_some() {
            log::trace!("frame closed after {} draw(s)", self.frame_transforms.len());
        }
        target
    }

    /// Transforms the current (or last) frame's draws were issued with,
    /// already remapped to wgpu clip space.
    #[inline]
    pub fn frame_transforms(&self) -> &[Mat4] {
        &self.frame_transforms
    }

    #[inline]
    pub fn in_frame(&self) -> bool {
        self.target.is_some()
    }

    /// Clears the frame's color (and depth, to 1.0) attachments.
    pub fn clear(&mut self, color: wgpu::Color) {
        let Some(target) = self.target.as_mut() else {
            log::warn!("clear issued outside a frame; skipped");
            return;
        };

        let _rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: target.depth_view.as_ref().map(|view| {
                wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[inline]
    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.color_format
    }

    #[inline]
    pub fn depth_format(&self) -> Option<wgpu::TextureFormat> {
        self.depth_format
    }
}

/// Compiled pipeline plus the transform its next draw will use.
///
/// The matrix lives on the CPU until a draw snapshots it into that draw's
/// own uniform buffer.
pub struct WgpuProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    transform: Cell<Mat4>,
    label: String,
}

impl WgpuProgram {
    /// Current transform, in wgpu clip space.
    #[inline]
    pub fn clip_transform(&self) -> Mat4 {
        self.transform.get()
    }
}

pub struct WgpuBuffer {
    buffer: wgpu::Buffer,
    kind: BufferKind,
    label: String,
}

impl WgpuBuffer {
    #[inline]
    pub fn raw(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

pub struct WgpuTexture {
    #[allow(dead_code)]
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl GraphicsContext for WgpuContext {
    type Program = WgpuProgram;
    type Buffer = WgpuBuffer;
    type Texture = WgpuTexture;

    fn build_program(&mut self, source: &ProgramSource<'_>) -> Result<WgpuProgram, GfxError> {
        check_entry_points(source)?;

        let (module, error) = capture_validation(&self.device, || {
            self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(source.label),
                source: wgpu::ShaderSource::Wgsl(source.wgsl.into()),
            })
        });
        check_compilation(source.label, &module, error)?;

        let bind_group_layout =
            self.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("tessera quad bgl"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::VERTEX,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: wgpu::BufferSize::new(
                                    std::mem::size_of::<Mat4>() as u64,
                                ),
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 2,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ],
                });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("tessera quad pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        // One tightly packed buffer per attribute.
        let attrs: Vec<[wgpu::VertexAttribute; 1]> = source
            .attributes
            .iter()
            .map(|a| {
                [wgpu::VertexAttribute {
                    format: float_format(a),
                    offset: 0,
                    shader_location: a.location,
                }]
            })
            .collect();
        let buffers: Vec<wgpu::VertexBufferLayout<'_>> = source
            .attributes
            .iter()
            .zip(&attrs)
            .map(|(a, attr)| wgpu::VertexBufferLayout {
                array_stride: u64::from(a.components.clamp(1, 4)) * 4,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: attr,
            })
            .collect();

        let (pipeline, error) = capture_validation(&self.device, || {
            self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(source.label),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some(source.vertex_entry),
                    compilation_options: Default::default(),
                    buffers: &buffers,
                },

                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: Some(source.fragment_entry),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.color_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // The quad spins; both faces stay visible.
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: self.depth_format.map(|format| wgpu::DepthStencilState {
                    format,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        });
        if let Some(err) = error {
            return Err(GfxError::ProgramLink {
                label: source.label.to_owned(),
                log: err.to_string(),
            });
        }

        log::debug!("built program `{}`", source.label);

        Ok(WgpuProgram {
            pipeline,
            bind_group_layout,
            transform: Cell::new(GL_TO_WGPU_CLIP),
            label: source.label.to_owned(),
        })
    }

    fn create_buffer(&mut self, kind: BufferKind, contents: &[u8], label: &str) -> WgpuBuffer {
        WgpuBuffer {
            buffer: self.create_raw_buffer(kind, contents, label),
            kind,
            label: label.to_owned(),
        }
    }

    fn write_buffer(&mut self, buffer: &mut WgpuBuffer, contents: &[u8]) {
        let aligned = contents.len() as u64 % wgpu::COPY_BUFFER_ALIGNMENT == 0;
        if aligned && contents.len() as u64 == buffer.buffer.size() {
            self.queue.write_buffer(&buffer.buffer, 0, contents);
            return;
        }

        // Size changed (or cannot be copied in place): replace the allocation.
        log::trace!("reallocating buffer `{}` ({} bytes)", buffer.label, contents.len());
        buffer.buffer = self.create_raw_buffer(buffer.kind, contents, &buffer.label);
    }

    fn create_texture(&mut self, data: &TextureData, label: &str) -> Result<WgpuTexture, GfxError> {
        let max = self.device.limits().max_texture_dimension_2d;
        if data.width() > max || data.height() > max {
            return Err(GfxError::TextureCreate {
                label: label.to_owned(),
                log: format!(
                    "{}x{} exceeds the device limit of {max} px per side",
                    data.width(),
                    data.height()
                ),
            });
        }

        let (texture, error) = capture_validation(&self.device, || {
            self.device.create_texture_with_data(
                &self.queue,
                &wgpu::TextureDescriptor {
                    label: Some(label),
                    size: wgpu::Extent3d {
                        width: data.width(),
                        height: data.height(),
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: wgpu::TextureFormat::Rgba8UnormSrgb,
                    usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                    view_formats: &[],
                },
                wgpu::util::TextureDataOrder::LayerMajor,
                data.pixels(),
            )
        });
        if let Some(err) = error {
            return Err(GfxError::TextureCreate {
                label: label.to_owned(),
                log: err.to_string(),
            });
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let address_mode = match data.sampling.wrap {
            Wrap::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            Wrap::Repeat => wgpu::AddressMode::Repeat,
        };
        let filter = match data.sampling.filter {
            Filter::Nearest => wgpu::FilterMode::Nearest,
            Filter::Linear => wgpu::FilterMode::Linear,
        };

        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: filter,
            min_filter: filter,
            ..Default::default()
        });

        Ok(WgpuTexture {
            texture,
            view,
            sampler,
        })
    }

    fn set_transform(&mut self, program: &WgpuProgram, matrix: &Mat4) {
        let mut clip = Mat4::IDENTITY;
        mat4::multiply(&mut clip, &GL_TO_WGPU_CLIP, matrix);
        program.transform.set(clip);
    }

    fn draw_indexed(&mut self, draw: IndexedDraw<'_, Self>) {
        let Some(target) = self.target.as_mut() else {
            log::warn!("draw for `{}` issued outside a frame; skipped", draw.program.label);
            return;
        };

        // One uniform per draw: queued writes land before the whole submission runs.
        let clip = draw.program.transform.get();
        let transform_ubo = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessera draw transform"),
            contents: bytemuck::bytes_of(&clip),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        self.frame_transforms.push(clip);

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera quad bind group"),
            layout: &draw.program.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: transform_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&draw.texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&draw.texture.sampler),
                },
            ],
        });

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera quad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: target.depth_view.as_ref().map(|view| {
                wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&draw.program.pipeline);
        rpass.set_bind_group(0, &bind_group, &[]);
        for (slot, buffer) in draw.vertex_buffers.iter().enumerate() {
            rpass.set_vertex_buffer(slot as u32, buffer.buffer.slice(..));
        }
        rpass.set_index_buffer(draw.index_buffer.buffer.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..draw.index_count, 0, 0..1);
    }
}

impl WgpuContext {
    fn create_raw_buffer(&self, kind: BufferKind, contents: &[u8], label: &str) -> wgpu::Buffer {
        let usage = match kind {
            BufferKind::Vertex => wgpu::BufferUsages::VERTEX,
            BufferKind::Index => wgpu::BufferUsages::INDEX,
        };
        self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: usage | wgpu::BufferUsages::COPY_DST,
        })
    }
}

fn float_format(attr: &VertexAttribute) -> wgpu::VertexFormat {
    match attr.components {
        0 | 1 => wgpu::VertexFormat::Float32,
        2 => wgpu::VertexFormat::Float32x2,
        3 => wgpu::VertexFormat::Float32x3,
        _ => wgpu::VertexFormat::Float32x4,
    }
}

/// Link-time check: both entry points must exist in the module.
fn check_entry_points(source: &ProgramSource<'_>) -> Result<(), GfxError> {
    let missing: Vec<&str> = [source.vertex_entry, source.fragment_entry]
        .into_iter()
        .filter(|entry| !declares_fn(source.wgsl, entry))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    Err(GfxError::ProgramLink {
        label: source.label.to_owned(),
        log: format!("missing entry point(s): {}", missing.join(", ")),
    })
}

fn declares_fn(wgsl: &str, name: &str) -> bool {
    wgsl.match_indices("fn ").any(|(i, m)| {
        wgsl[i + m.len()..]
            .trim_start()
            .strip_prefix(name)
            .is_some_and(|rest| rest.trim_start().starts_with('('))
    })
}

/// Runs `f` inside a validation error scope.
///
/// Errors caught here are returned instead of reaching the device's
/// uncaptured-error handler, which panics by default.
fn capture_validation<T>(device: &wgpu::Device, f: impl FnOnce() -> T) -> (T, Option<wgpu::Error>) {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = f();
    (value, pollster::block_on(scope.pop()))
}

/// Folds the module's compilation messages and any validation error raised
/// while creating it into one result. Warnings are only logged.
fn check_compilation(
    label: &str,
    module: &wgpu::ShaderModule,
    validation: Option<wgpu::Error>,
) -> Result<(), GfxError> {
    let info = pollster::block_on(module.get_compilation_info());

    let mut errors = Vec::new();
    for msg in &info.messages {
        let at = msg
            .location
            .as_ref()
            .map(|l| format!("{}:{}: ", l.line_number, l.line_position))
            .unwrap_or_default();

        match msg.message_type {
            wgpu::CompilationMessageType::Error => errors.push(format!("{at}{}", msg.message)),
            wgpu::CompilationMessageType::Warning => {
                log::warn!("shader `{label}`: {at}{}", msg.message)
            }
            wgpu::CompilationMessageType::Info => {
                log::debug!("shader `{label}`: {at}{}", msg.message)
            }
        }
    }

    // The scope's error repeats the compiler messages; keep it only when
    // they said nothing.
    if let Some(err) = validation {
        if errors.is_empty() {
            errors.push(err.to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(GfxError::ShaderCompile {
            label: label.to_owned(),
            log: errors.join("\n"),
        })
    }
}
