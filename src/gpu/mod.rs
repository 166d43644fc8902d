//! wgpu drawing surface for the particle network.
//!
//! [`GpuSurface`] owns the device, the window surface and two passes: edges
//! as a line list and particles as instanced point sprites. All per-frame
//! data is uploaded with `queue.write_buffer` before a single render pass.

mod edges;
mod particles;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use winit::window::Window;

use crate::config::{srgb_to_linear, NetworkConfig};
use crate::error::GpuError;
use crate::scene::{DrawSurface, Frame};

use edges::EdgePass;
use particles::ParticlePass;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct Uniforms {
    transform: [[f32; 4]; 4],
    particle_color: [f32; 4],
    particle_size: f32,
    aspect: f32,
    edge_opacity: f32,
    /// 1.0 when edge colours must be linearized in the shader.
    linearize: f32,
}

/// Window-backed GPU renderer.
pub struct GpuSurface {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    particles: ParticlePass,
    edges: EdgePass,
    particle_color: [f32; 4],
    particle_size: f32,
    edge_opacity: f32,
    linearize: bool,
    clear_color: wgpu::Color,
}

impl GpuSurface {
    /// Set up the device and pipelines for `window`.
    ///
    /// Buffers are sized for `network.particle_count` particles and the
    /// worst-case N² edges.
    pub async fn new(window: Arc<Window>, network: &NetworkConfig) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Uniform Buffer"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let n = network.particle_count as usize;
        let particles = ParticlePass::new(&device, &uniform_bind_group_layout, n, surface_format);
        let edges = EdgePass::new(&device, &uniform_bind_group_layout, n * n, surface_format);

        // Hex colours are sRGB-encoded; an sRGB target expects linear input.
        let linearize = surface_format.is_srgb();
        let encode = |rgb| if linearize { srgb_to_linear(rgb) } else { rgb };
        let [r, g, b] = encode(network.particle_color);
        let [br, bg, bb] = encode(network.background_color);

        tracing::info!(
            adapter = %adapter.get_info().name,
            format = ?surface_format,
            linearize,
            particles = n,
            "GPU surface ready"
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            uniform_buffer,
            uniform_bind_group,
            particles,
            edges,
            particle_color: [r, g, b, 1.0],
            particle_size: network.particle_size,
            edge_opacity: network.edge_opacity,
            linearize,
            clear_color: wgpu::Color {
                r: br as f64,
                g: bg as f64,
                b: bb as f64,
                a: 1.0,
            },
        })
    }

    /// Current surface size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height as f32
    }
}

impl DrawSurface for GpuSurface {
    type Error = wgpu::SurfaceError;

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), wgpu::SurfaceError> {
        let uniforms = Uniforms {
            transform: frame.transform.to_cols_array_2d(),
            particle_color: self.particle_color,
            particle_size: self.particle_size,
            aspect: self.aspect(),
            edge_opacity: self.edge_opacity,
            linearize: if self.linearize { 1.0 } else { 0.0 },
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let instances = self.particles.upload(&self.queue, frame.particles);
        let edge_vertices = self.edges.upload(&self.queue, frame.edges);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Network Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Lines first so sprites sit on top of their edges.
            self.edges
                .draw(&mut render_pass, &self.uniform_bind_group, edge_vertices);
            self.particles
                .draw(&mut render_pass, &self.uniform_bind_group, instances);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout_matches_wgsl() {
        // mat4 (64) + vec4 (16) + four f32.
        assert_eq!(std::mem::size_of::<Uniforms>(), 96);
        for shader in [edges::EDGE_SHADER, particles::PARTICLE_SHADER] {
            assert!(shader.contains("edge_opacity: f32,\n    linearize: f32,\n};"));
        }
    }

    #[test]
    fn test_edge_shader_linearizes_on_request() {
        assert!(edges::EDGE_SHADER.contains("if (uniforms.linearize > 0.5)"));
        assert!(edges::EDGE_SHADER.contains("pow((c + vec3<f32>(0.055)) / 1.055, vec3<f32>(2.4))"));
    }
}
