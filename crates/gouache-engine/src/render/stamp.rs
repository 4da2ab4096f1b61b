use bytemuck::{Pod, Zeroable};
use gouache_brush::{BrushConfig, Falloff, StampBatch, StampRequest, StampSink};

use super::canvas::{Canvas, CANVAS_FORMAT};
use super::common::{premul_alpha_blend, uniform_binding_size, GrowableBuffer, QuadVertex, UnitQuad};
use super::RenderCtx;

/// Instanced renderer for brush stamps.
///
/// Owns the frame's [`StampBatch`]. The painter appends through [`StampSink`];
/// [`draw`](Self::draw) uploads the live range of every per-instance array and
/// issues one instanced draw into the canvas, then rewinds the batch.
///
/// Hardness, noise, opacity and the falloff curve are per-frame uniforms
/// shared by all stamps of a batch; position, size, shape and color are
/// per instance.
pub struct StampRenderer {
    batch: StampBatch,
    clear_requested: bool,
    counter: u32,

    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    uniform_ubo: Option<wgpu::Buffer>,
    quad: Option<UnitQuad>,

    positions: GrowableBuffer,
    sizes: GrowableBuffer,
    shapes: GrowableBuffer,
    colors: GrowableBuffer,
}

impl Default for StampRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl StampRenderer {
    pub fn new() -> Self {
        let usage = wgpu::BufferUsages::VERTEX;
        Self {
            batch: StampBatch::new(),
            clear_requested: false,
            counter: 0,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            uniform_ubo: None,
            quad: None,
            positions: GrowableBuffer::new("gouache stamp positions", usage),
            sizes: GrowableBuffer::new("gouache stamp sizes", usage),
            shapes: GrowableBuffer::new("gouache stamp shapes", usage),
            colors: GrowableBuffer::new("gouache stamp colors", usage),
        }
    }

    /// Stamps waiting for the next draw.
    #[inline]
    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    #[inline]
    pub fn batch(&self) -> &StampBatch {
        &self.batch
    }

    /// Composites the pending batch into `canvas` with one instanced draw.
    ///
    /// A clear requested since the last draw is applied to the canvas first.
    /// The batch cursor is rewound afterwards; its capacity is kept.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        encoder: &mut wgpu::CommandEncoder,
        canvas: &mut Canvas,
        brush: &BrushConfig,
    ) {
        if std::mem::take(&mut self.clear_requested) {
            canvas.clear();
        }

        let count = self.batch.len();
        if count == 0 {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        self.upload_instances(ctx);
        self.write_uniforms(ctx, brush);

        let (Some(pipeline), Some(bind_group), Some(quad)) =
            (self.pipeline.as_ref(), self.bind_group.as_ref(), self.quad.as_ref())
        else {
            return;
        };
        let (Some(positions), Some(sizes), Some(shapes), Some(colors)) = (
            self.positions.buffer(),
            self.sizes.buffer(),
            self.shapes.buffer(),
            self.colors.buffer(),
        ) else {
            return;
        };

        {
            let mut rpass = canvas.begin_pass(encoder, "gouache stamp pass");
            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, bind_group, &[]);
            rpass.set_vertex_buffer(0, quad.vbo.slice(..));
            rpass.set_vertex_buffer(1, positions.slice(..));
            rpass.set_vertex_buffer(2, sizes.slice(..));
            rpass.set_vertex_buffer(3, shapes.slice(..));
            rpass.set_vertex_buffer(4, colors.slice(..));
            rpass.set_index_buffer(quad.ibo.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..UnitQuad::INDEX_COUNT, 0, 0..count as u32);
        }

        log::trace!("drew {count} stamps (frame {})", self.counter);
        self.counter = self.counter.wrapping_add(1);
        self.batch.reset();
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gouache stamp shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/stamp.wgsl").into()),
        });

        let bind_group_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("gouache stamp bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: uniform_binding_size::<StampUniform>(),
                },
                count: None,
            }],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gouache stamp pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("gouache stamp pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    QuadVertex::layout(),
                    instance_layout(&POSITION_ATTRS, 8),
                    instance_layout(&SIZE_ATTRS, 4),
                    instance_layout(&SHAPE_ATTRS, 8),
                    instance_layout(&COLOR_ATTRS, 16),
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: CANVAS_FORMAT,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.quad = Some(UnitQuad::new(ctx.device, "gouache stamp"));
        self.bind_group = None;
        self.uniform_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.uniform_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let uniform_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gouache stamp ubo"),
            size: std::mem::size_of::<StampUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gouache stamp bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_ubo.as_entire_binding(),
            }],
        });

        self.uniform_ubo = Some(uniform_ubo);
        self.bind_group = Some(bind_group);
    }

    /// GPU buffers track the batch capacity so a stable stamp count never
    /// reallocates; only the live range is written.
    fn upload_instances(&mut self, ctx: &RenderCtx<'_>) {
        let capacity = self.batch.capacity() as u64;
        self.positions.reserve(ctx.device, capacity * 8);
        self.sizes.reserve(ctx.device, capacity * 4);
        self.shapes.reserve(ctx.device, capacity * 8);
        self.colors.reserve(ctx.device, capacity * 16);

        self.positions.write(ctx.queue, 0, bytemuck::cast_slice(self.batch.positions()));
        self.sizes.write(ctx.queue, 0, bytemuck::cast_slice(self.batch.sizes()));
        self.shapes.write(ctx.queue, 0, bytemuck::cast_slice(self.batch.shapes()));
        self.colors.write(ctx.queue, 0, bytemuck::cast_slice(self.batch.colors()));
    }

    fn write_uniforms(&mut self, ctx: &RenderCtx<'_>, brush: &BrushConfig) {
        let Some(ubo) = self.uniform_ubo.as_ref() else { return };
        let uniform = StampUniform::new(
            [ctx.viewport.width.max(1.0), ctx.viewport.height.max(1.0)],
            self.counter,
            &Falloff::from_config(brush),
            brush.opacity(),
        );
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&uniform));
    }
}

impl StampSink for StampRenderer {
    fn append(&mut self, stamp: &StampRequest) {
        self.batch.append(stamp);
    }

    /// Drops stamps not yet drawn and clears the canvas at the next draw.
    fn clear(&mut self) {
        self.batch.reset();
        self.clear_requested = true;
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Per-frame uniform block (48 bytes):
///
///  offset  0  viewport  [f32; 2]
///  offset  8  counter   u32
///  offset 16  params    [f32; 4]   (softness, noise, opacity, 0)
///  offset 32  curve     [f32; 4]   (x1, y1, x2, y2)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct StampUniform {
    viewport: [f32; 2],
    counter: u32,
    _pad: u32,
    params: [f32; 4],
    curve: [f32; 4],
}

impl StampUniform {
    fn new(viewport: [f32; 2], counter: u32, falloff: &Falloff, opacity: f32) -> Self {
        Self {
            viewport,
            counter,
            _pad: 0,
            params: [falloff.softness, falloff.noise, opacity, 0.0],
            curve: falloff.curve.to_array(),
        }
    }
}

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x2];
const SIZE_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32];
const SHAPE_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![3 => Float32x2];
const COLOR_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![4 => Float32x4];

/// One instance-rate buffer per parallel array of the batch.
fn instance_layout(attrs: &'static [wgpu::VertexAttribute], stride: u64) -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: stride,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: attrs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gouache_brush::Rgba;

    fn stamp(x: f32) -> StampRequest {
        StampRequest { x, y: 0.0, size: 8.0, angle: 0.0, ratio: 1.0, color: Rgba::BLACK }
    }

    #[test]
    fn uniform_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<StampUniform>(), 48);
        assert_eq!(std::mem::size_of::<StampUniform>() % 16, 0);
    }

    #[test]
    fn uniform_packs_falloff() {
        let mut brush = BrushConfig::default();
        brush.set_hardness(0.5);
        brush.set_noise(0.25);
        brush.set_opacity(0.8);
        let u = StampUniform::new([640.0, 480.0], 7, &Falloff::from_config(&brush), brush.opacity());
        assert_eq!(u.params, [0.5, 0.25, 0.8, 0.0]);
        assert_eq!(u.curve, brush.falloff_curve().to_array());
        assert_eq!(u.counter, 7);
    }

    #[test]
    fn sink_collects_until_draw() {
        let mut r = StampRenderer::new();
        for i in 0..20 {
            StampSink::append(&mut r, &stamp(i as f32));
        }
        assert_eq!(r.pending(), 20);
        assert_eq!(r.batch().capacity(), 32);
    }

    #[test]
    fn sink_clear_drops_pending_and_requests_canvas_clear() {
        let mut r = StampRenderer::new();
        StampSink::append(&mut r, &stamp(1.0));
        StampSink::clear(&mut r);
        assert_eq!(r.pending(), 0);
        assert!(r.clear_requested);

        // Stamps after the clear survive it.
        StampSink::append(&mut r, &stamp(2.0));
        assert_eq!(r.batch().get(0), Some(stamp(2.0)));
    }
}
