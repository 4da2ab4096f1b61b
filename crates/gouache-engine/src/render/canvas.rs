use anyhow::Result;
use gouache_brush::Rgba;

use crate::coords::Viewport;
use crate::device::Gpu;

use super::common::{premul_alpha_blend, QuadVertex, UnitQuad};
use super::{RenderCtx, RenderTarget};

/// Storage format of the persistent image buffer.
pub const CANVAS_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CanvasConfig {
    /// Canvas texels per physical pixel.
    pub resolution_scale: f32,
    /// Color the canvas resets to on `clear`.
    pub background: Rgba,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            resolution_scale: 1.0,
            background: Rgba::WHITE,
        }
    }
}

struct CanvasTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    extent: (u32, u32),
}

impl CanvasTexture {
    fn new(device: &wgpu::Device, extent: (u32, u32)) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("gouache canvas"),
            size: wgpu::Extent3d {
                width: extent.0,
                height: extent.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: CANVAS_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view, extent }
    }
}

/// Persistent float image buffer that stamps accumulate into.
///
/// `clear` is O(1): it only flags the next render pass to load with the
/// background color instead of the previous contents.
pub struct Canvas {
    config: CanvasConfig,
    target: CanvasTexture,
    pending_clear: bool,

    sampler: wgpu::Sampler,
    quad: UnitQuad,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: Option<wgpu::BindGroup>,
}

impl Canvas {
    /// Creates a canvas covering `viewport` at the window's `scale_factor`.
    ///
    /// Fails when the adapter cannot render and blend into [`CANVAS_FORMAT`].
    pub fn new(gpu: &Gpu<'_>, config: CanvasConfig, viewport: Viewport, scale_factor: f32) -> Result<Self> {
        anyhow::ensure!(
            gpu.supports_blendable_target(CANVAS_FORMAT),
            "render to float texture not supported ({CANVAS_FORMAT:?})"
        );

        let device = gpu.device();
        let extent = viewport.physical_extent(scale_factor * config.resolution_scale);
        log::debug!("canvas {}x{} ({:?})", extent.0, extent.1, CANVAS_FORMAT);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("gouache canvas sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("gouache composite bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        Ok(Self {
            config,
            target: CanvasTexture::new(device, extent),
            pending_clear: true,
            sampler,
            quad: UnitQuad::new(device, "gouache composite"),
            pipeline_format: None,
            pipeline: None,
            bind_group_layout,
            bind_group: None,
        })
    }

    #[inline]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Texel size of the backing texture.
    #[inline]
    pub fn extent(&self) -> (u32, u32) {
        self.target.extent
    }

    /// Resets the image to the background on the next pass.
    pub fn clear(&mut self) {
        self.pending_clear = true;
    }

    #[inline]
    pub fn is_clear_pending(&self) -> bool {
        self.pending_clear
    }

    /// Opens a render pass on the canvas, applying a pending clear as its load op.
    pub fn begin_pass<'e>(&mut self, encoder: &'e mut wgpu::CommandEncoder, label: &str) -> wgpu::RenderPass<'e> {
        let load = if std::mem::take(&mut self.pending_clear) {
            wgpu::LoadOp::Clear(to_wgpu_color(self.config.background))
        } else {
            wgpu::LoadOp::Load
        };

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.target.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }

    /// Matches the backing texture to the current viewport.
    ///
    /// Existing content is kept at its texel position; newly exposed area is
    /// filled with the background.
    pub fn resize(&mut self, ctx: &RenderCtx<'_>, encoder: &mut wgpu::CommandEncoder) {
        let extent = ctx
            .viewport
            .physical_extent(ctx.scale_factor * self.config.resolution_scale);
        if extent == self.target.extent {
            return;
        }
        log::debug!(
            "canvas resize {}x{} -> {}x{}",
            self.target.extent.0,
            self.target.extent.1,
            extent.0,
            extent.1
        );

        let old = std::mem::replace(&mut self.target, CanvasTexture::new(ctx.device, extent));
        self.bind_group = None;

        let keep_content = !self.pending_clear;
        self.pending_clear = true;
        drop(self.begin_pass(encoder, "gouache canvas resize clear"));

        if keep_content {
            let overlap = wgpu::Extent3d {
                width: old.extent.0.min(extent.0),
                height: old.extent.1.min(extent.1),
                depth_or_array_layers: 1,
            };
            encoder.copy_texture_to_texture(
                old.texture.as_image_copy(),
                self.target.texture.as_image_copy(),
                overlap,
            );
        }
    }

    /// Draws the canvas over the whole swapchain target.
    ///
    /// A clear still pending at this point is flushed first.
    pub fn composite(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        if self.pending_clear {
            drop(self.begin_pass(target.encoder, "gouache canvas clear"));
        }

        self.ensure_pipeline(ctx);
        self.ensure_bind_group(ctx);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("gouache composite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad.vbo.slice(..));
        rpass.set_index_buffer(self.quad.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..UnitQuad::INDEX_COUNT, 0, 0..1);
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gouache composite shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/composite.wgsl").into()),
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gouache composite pipeline layout"),
            bind_group_layouts: &[&self.bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("gouache composite pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
    }

    fn ensure_bind_group(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() {
            return;
        }
        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gouache composite bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&self.target.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        }));
    }
}

fn to_wgpu_color(c: Rgba) -> wgpu::Color {
    let [r, g, b, a] = c.premultiplied();
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_is_premultiplied() {
        let c = to_wgpu_color(Rgba::new(1.0, 0.5, 0.0, 0.5));
        assert_eq!((c.r, c.g, c.b, c.a), (0.5, 0.25, 0.0, 0.5));
    }

    #[test]
    fn default_config_is_white_at_native_resolution() {
        let c = CanvasConfig::default();
        assert_eq!(c.resolution_scale, 1.0);
        assert_eq!(c.background, Rgba::WHITE);
    }
}
