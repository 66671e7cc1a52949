//! Rendering system with wgpu pipeline and shader management.
//!
//! The scene (background + torus) is drawn into the composer's offscreen
//! target; the composer then writes the post-processed frame to the surface.

mod gpu;
mod post;
mod texture;

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

pub use gpu::Gpu;
pub use post::{Composer, PostUniforms};
pub use texture::{fallback_image, load_image, GpuTexture};

use crate::camera::PerspectiveCamera;
use crate::params::Settings;
use crate::scene::Scene;
use crate::torus::{TorusMesh, Vertex};
use crate::viewport::{apply_resize, Viewport};

/// Uniform buffer for the torus shader
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct TorusUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub time: f32,
    pub treble: f32,
    pub _padding: [f32; 2], // Padding for alignment
}

/// Rendering system managing wgpu device, pipelines, and buffers
pub struct Renderer {
    gpu: Gpu,
    composer: Composer,
    background_pipeline: wgpu::RenderPipeline,
    background_bind_group: wgpu::BindGroup,
    torus_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    torus_texture_bind_group: wgpu::BindGroup,
}

impl Renderer {
    /// Create new rendering system
    pub async fn new(window: Arc<Window>, torus: &TorusMesh, settings: &Settings) -> Result<Self> {
        let gpu = Gpu::new(window).await?;
        let device = Arc::clone(&gpu.device);

        let composer = Composer::new(
            Arc::clone(&device),
            gpu.config.format,
            gpu.viewport(),
            settings.post.clone(),
        );

        // Textures (missing files fall back to a flat color)
        let texture_layout = texture::bind_group_layout(&device, "Texture Bind Group Layout");
        let background = GpuTexture::load_or_fallback(
            &device,
            &gpu.queue,
            &settings.assets.background,
            wgpu::FilterMode::Linear,
            [8, 8, 16, 255],
        );
        let torus_texture = GpuTexture::load_or_fallback(
            &device,
            &gpu.queue,
            &settings.assets.texture,
            wgpu::FilterMode::Nearest,
            [255, 255, 255, 255],
        );
        let background_bind_group = background.bind_group(&device, &texture_layout);
        let torus_texture_bind_group = torus_texture.bind_group(&device, &texture_layout);

        // Load shaders
        let background_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Background Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("background.wgsl").into()),
        });

        let torus_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Torus Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("torus.wgsl").into()),
        });

        // Create buffers
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Torus Vertex Buffer"),
            contents: bytemuck::cast_slice(&torus.vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Torus Index Buffer"),
            contents: bytemuck::cast_slice(&torus.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniforms = TorusUniforms {
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            model: glam::Mat4::IDENTITY.to_cols_array_2d(),
            time: 0.0,
            treble: 0.0,
            _padding: [0.0; 2],
        };

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Torus Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Torus Uniform Layout"),
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
            label: Some("Torus Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        // Create background pipeline
        let background_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Background Pipeline Layout"),
            bind_group_layouts: &[&texture_layout],
            push_constant_ranges: &[],
        });

        let background_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Background Pipeline"),
            layout: Some(&background_layout),
            vertex: wgpu::VertexState {
                module: &background_shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &background_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: post::SCENE_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: post::DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Create torus pipeline
        let torus_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Torus Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let torus_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Torus Render Pipeline"),
            layout: Some(&torus_layout),
            vertex: wgpu::VertexState {
                module: &torus_shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x2
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &torus_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: post::SCENE_FORMAT,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None, // Double sided
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: post::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            gpu,
            composer,
            background_pipeline,
            background_bind_group,
            torus_pipeline,
            vertex_buffer,
            index_buffer,
            index_count: torus.indices.len() as u32,
            uniform_buffer,
            uniform_bind_group,
            torus_texture_bind_group,
        })
    }

    /// Resize the camera, surface and composer buffers together
    pub fn resize(&mut self, viewport: Viewport, camera: &mut PerspectiveCamera) -> bool {
        apply_resize(viewport, camera, &mut [&mut self.gpu, &mut self.composer])
    }

    /// Reconfigure the surface after it was lost or outdated
    pub fn recover_surface(&self) {
        self.gpu.reconfigure();
    }

    /// Render a frame, re-uploading the torus vertices if they changed
    pub fn render(&mut self, scene: &mut Scene) -> Result<(), wgpu::SurfaceError> {
        let queue = &self.gpu.queue;

        if scene.torus.take_needs_upload() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&scene.torus.vertices));
        }

        let uniforms = TorusUniforms {
            view_proj: scene.camera.view_proj().to_cols_array_2d(),
            model: scene.model().to_cols_array_2d(),
            time: scene.time_s(),
            treble: scene.last_drive().map_or(0.0, |d| d.treble),
            _padding: [0.0; 2],
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
        self.composer.update(queue, scene.time_s());

        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.composer.scene_color(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.composer.scene_depth(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Render background first
            render_pass.set_pipeline(&self.background_pipeline);
            render_pass.set_bind_group(0, &self.background_bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle

            // Render torus
            render_pass.set_pipeline(&self.torus_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_bind_group(1, &self.torus_texture_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.index_count, 0, 0..1);
        }

        self.composer.composite(&mut encoder, &view);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layouts_are_16_byte_aligned() {
        // WGSL uniform structs round up to 16 bytes
        assert_eq!(std::mem::size_of::<TorusUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<PostUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }
}
