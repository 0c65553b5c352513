//! Rendering system with wgpu pipeline and shader management.

use std::sync::Arc;

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use log::{debug, info};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::color;
use crate::environment::CubeMapImage;
use crate::mesh::{Vertex, WaterPlane};
use crate::params::WaterParams;
use crate::waves;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Uniform buffer for the water shader (layout matches `WaterUniforms` in water.wgsl)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WaterUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub big_waves_frequency: [f32; 2],
    pub time: f32,
    pub big_waves_elevation: f32,
    pub big_waves_speed: f32,
    pub small_waves_elevation: f32,
    pub small_waves_frequency: f32,
    pub small_waves_speed: f32,
    pub small_iterations: u32,
    pub color_offset: f32,
    pub color_multiplier: f32,
    pub cpu_displaced: u32,
    pub depth_color: [f32; 3],
    pub srgb_target: u32,
    pub surface_color: [f32; 3],
    pub _padding: f32,
}

impl WaterUniforms {
    /// Pack the live parameters for upload
    ///
    /// Colors go up as authored (sRGB triples). The shader blends them there
    /// and decodes the result only when `srgb_target` says the render target
    /// re-encodes on write.
    pub fn new(
        params: &WaterParams,
        view_proj: Mat4,
        cpu_displaced: bool,
        srgb_target: bool,
    ) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            big_waves_frequency: params.big_waves_frequency.to_array(),
            time: params.elapsed_time_s(),
            big_waves_elevation: params.big_waves_elevation,
            big_waves_speed: params.big_waves_speed,
            small_waves_elevation: params.small_waves_elevation,
            small_waves_frequency: params.small_waves_frequency,
            small_waves_speed: params.small_waves_speed,
            small_iterations: waves::octave_count(params),
            color_offset: params.color_offset,
            color_multiplier: params.color_multiplier,
            cpu_displaced: cpu_displaced as u32,
            depth_color: params.depth_color.to_array(),
            srgb_target: srgb_target as u32,
            surface_color: params.surface_color.to_array(),
            _padding: 0.0,
        }
    }

    /// Value `fs_main` writes for a fragment at `elevation`
    pub fn fragment_color(&self, elevation: f32) -> Vec3 {
        let t = (elevation * self.color_multiplier + self.color_offset).clamp(0.0, 1.0);
        let blended = color::mix(
            Vec3::from_array(self.depth_color),
            Vec3::from_array(self.surface_color),
            t,
        );
        if self.srgb_target != 0 {
            color::srgb_to_linear(blended)
        } else {
            blended
        }
    }
}

/// Uniform buffer for skybox shader (inverse of projection * rotation-only view)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SkyboxUniforms {
    pub inv_view_proj: [[f32; 4]; 4],
}

/// Rendering system managing wgpu device, pipelines, and buffers
pub struct RenderSystem {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    water_pipeline: wgpu::RenderPipeline,
    skybox_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    water_uniform_buffer: wgpu::Buffer,
    water_bind_group: wgpu::BindGroup,
    skybox_uniform_buffer: wgpu::Buffer,
    skybox_bind_group: wgpu::BindGroup,
    index_count: u32,
}

impl RenderSystem {
    /// Create new rendering system
    pub async fn new(
        window: Arc<Window>,
        plane: &WaterPlane,
        environment: &CubeMapImage,
    ) -> Result<Self> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface (window must have 'static lifetime via Arc)
        let surface = instance
            .create_surface(window)
            .context("Failed to create surface")?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to find suitable GPU adapter")?;

        let adapter_info = adapter.get_info();
        info!("GPU: {} ({:?})", adapter_info.name, adapter_info.backend);

        // Request device
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .context("Failed to request device")?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .context("Surface reports no supported formats")?;
        info!("Surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, config.width, config.height);

        // Load shaders
        let water_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Water Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("water.wgsl").into()),
        });

        let skybox_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Skybox Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("skybox.wgsl").into()),
        });

        // Create buffers
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&plane.vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&plane.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let water_uniforms = WaterUniforms::new(
            &WaterParams::default(),
            Mat4::IDENTITY,
            false,
            config.format.is_srgb(),
        );

        let water_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Water Uniform Buffer"),
            contents: bytemuck::cast_slice(&[water_uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Create water bind group
        let water_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Water Bind Group Layout"),
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

        let water_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Water Bind Group"),
            layout: &water_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: water_uniform_buffer.as_entire_binding(),
            }],
        });

        // Create water render pipeline
        let water_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Water Pipeline Layout"),
                bind_group_layouts: &[&water_bind_group_layout],
                push_constant_ranges: &[],
            });

        let water_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Water Render Pipeline"),
            layout: Some(&water_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &water_shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                        wgpu::VertexAttribute {
                            offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32,
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &water_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None, // Visible from below as well
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Create skybox uniforms, cube texture and bind group
        let skybox_uniforms = SkyboxUniforms {
            inv_view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        };

        let skybox_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Skybox Uniform Buffer"),
            contents: bytemuck::cast_slice(&[skybox_uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let environment_view = upload_cube_map(&device, &queue, environment);
        let environment_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Environment Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let skybox_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Skybox Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::Cube,
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

        let skybox_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Skybox Bind Group"),
            layout: &skybox_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: skybox_uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&environment_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&environment_sampler),
                },
            ],
        });

        // Create skybox pipeline
        let skybox_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Skybox Pipeline Layout"),
                bind_group_layouts: &[&skybox_bind_group_layout],
                push_constant_ranges: &[],
            });

        let skybox_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Skybox Pipeline"),
            layout: Some(&skybox_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &skybox_shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &skybox_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
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
            // Background never occludes the water
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            water_pipeline,
            skybox_pipeline,
            vertex_buffer,
            index_buffer,
            water_uniform_buffer,
            water_bind_group,
            skybox_uniform_buffer,
            skybox_bind_group,
            index_count: plane.indices.len() as u32,
        })
    }

    /// Whether the surface re-encodes linear output to sRGB on write
    pub fn srgb_target(&self) -> bool {
        self.config.format.is_srgb()
    }

    /// Current surface size in physical pixels
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigure surface and depth buffer; zero-sized requests are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        debug!("Resize to {}x{}", width, height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, width, height);
    }

    /// Update water vertex buffer with CPU-displaced mesh data
    pub fn update_vertices(&self, vertices: &[Vertex]) {
        self.queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
    }

    /// Update water uniforms
    pub fn update_water_uniforms(&self, uniforms: &WaterUniforms) {
        self.queue.write_buffer(
            &self.water_uniform_buffer,
            0,
            bytemuck::cast_slice(&[*uniforms]),
        );
    }

    /// Update skybox uniforms
    pub fn update_skybox_uniforms(&self, uniforms: &SkyboxUniforms) {
        self.queue.write_buffer(
            &self.skybox_uniform_buffer,
            0,
            bytemuck::cast_slice(&[*uniforms]),
        );
    }

    /// Render one frame: background first, then the water surface
    pub fn render(&self) -> Result<(), wgpu::SurfaceError> {
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
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Render skybox first
            render_pass.set_pipeline(&self.skybox_pipeline);
            render_pass.set_bind_group(0, &self.skybox_bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle

            // Render water
            render_pass.set_pipeline(&self.water_pipeline);
            render_pass.set_bind_group(0, &self.water_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.index_count, 0, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Upload six faces as one sRGB cube texture
fn upload_cube_map(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    cube: &CubeMapImage,
) -> wgpu::TextureView {
    let extent = wgpu::Extent3d {
        width: cube.size,
        height: cube.size,
        depth_or_array_layers: 6,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Environment Cube Map"),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    for (layer, pixels) in cube.faces.iter().enumerate() {
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: 0,
                    y: 0,
                    z: layer as u32,
                },
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * cube.size),
                rows_per_image: Some(cube.size),
            },
            wgpu::Extent3d {
                width: cube.size,
                height: cube.size,
                depth_or_array_layers: 1,
            },
        );
    }

    texture.create_view(&wgpu::TextureViewDescriptor {
        label: Some("Environment Cube View"),
        dimension: Some(wgpu::TextureViewDimension::Cube),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{FrameDriver, ManualClock};

    fn parse_and_validate(source: &str) -> naga::Module {
        let module = naga::front::wgsl::parse_str(source).expect("WGSL should parse");
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .expect("WGSL should validate");
        module
    }

    #[test]
    fn test_water_uniforms_layout() {
        // Must match the WGSL struct size (vec3 members are 16-byte aligned)
        assert_eq!(std::mem::size_of::<WaterUniforms>(), 144);
        assert_eq!(std::mem::size_of::<SkyboxUniforms>(), 64);
        assert_eq!(std::mem::size_of::<Vertex>(), 16);
    }

    #[test]
    fn test_water_shader_struct_matches_rust_layout() {
        let module = parse_and_validate(include_str!("water.wgsl"));
        let (_, uniforms) = module
            .global_variables
            .iter()
            .find(|(_, var)| var.name.as_deref() == Some("u"))
            .expect("water shader declares its uniform block");

        let naga::TypeInner::Struct { members, span } = &module.types[uniforms.ty].inner else {
            panic!("uniform block is not a struct");
        };
        assert_eq!(*span as usize, std::mem::size_of::<WaterUniforms>());

        let expected = [
            ("view_proj", std::mem::offset_of!(WaterUniforms, view_proj)),
            ("big_waves_frequency", std::mem::offset_of!(WaterUniforms, big_waves_frequency)),
            ("time", std::mem::offset_of!(WaterUniforms, time)),
            ("big_waves_elevation", std::mem::offset_of!(WaterUniforms, big_waves_elevation)),
            ("big_waves_speed", std::mem::offset_of!(WaterUniforms, big_waves_speed)),
            ("small_waves_elevation", std::mem::offset_of!(WaterUniforms, small_waves_elevation)),
            ("small_waves_frequency", std::mem::offset_of!(WaterUniforms, small_waves_frequency)),
            ("small_waves_speed", std::mem::offset_of!(WaterUniforms, small_waves_speed)),
            ("small_iterations", std::mem::offset_of!(WaterUniforms, small_iterations)),
            ("color_offset", std::mem::offset_of!(WaterUniforms, color_offset)),
            ("color_multiplier", std::mem::offset_of!(WaterUniforms, color_multiplier)),
            ("cpu_displaced", std::mem::offset_of!(WaterUniforms, cpu_displaced)),
            ("depth_color", std::mem::offset_of!(WaterUniforms, depth_color)),
            ("srgb_target", std::mem::offset_of!(WaterUniforms, srgb_target)),
            ("surface_color", std::mem::offset_of!(WaterUniforms, surface_color)),
        ];
        assert_eq!(members.len(), expected.len());
        for (member, (name, offset)) in members.iter().zip(expected) {
            assert_eq!(member.name.as_deref(), Some(name));
            assert_eq!(member.offset as usize, offset, "offset of {}", name);
        }
    }

    #[test]
    fn test_skybox_shader_validates() {
        let module = parse_and_validate(include_str!("skybox.wgsl"));
        let stages: Vec<_> = module.entry_points.iter().map(|e| e.stage).collect();
        assert_eq!(
            stages,
            vec![naga::ShaderStage::Vertex, naga::ShaderStage::Fragment]
        );
    }

    #[test]
    fn test_water_uniforms_carry_params() {
        let mut params = WaterParams {
            small_iterations: 7,
            ..WaterParams::default()
        };
        FrameDriver::new(ManualClock::new(3.0)).tick(&mut params);
        let uniforms = WaterUniforms::new(&params, Mat4::IDENTITY, true, true);

        assert_eq!(uniforms.time, 3.0);
        assert_eq!(uniforms.small_iterations, 7);
        assert_eq!(uniforms.cpu_displaced, 1);
        assert_eq!(uniforms.srgb_target, 1);
        assert_eq!(uniforms.big_waves_frequency, [10.0, 10.0]);
        assert_eq!(uniforms.depth_color, params.depth_color.to_array());
        assert_eq!(uniforms.surface_color, params.surface_color.to_array());
    }

    #[test]
    fn test_fragment_color_matches_surface_color() {
        let params = WaterParams::default();
        let srgb = WaterUniforms::new(&params, Mat4::IDENTITY, false, true);
        let plain = WaterUniforms::new(&params, Mat4::IDENTITY, false, false);

        for &e in &[-1.0, -0.05, 0.0, 0.1, 0.21, 0.4, 1.0] {
            let reference = color::surface_color(e, &params);
            assert!(
                srgb.fragment_color(e).abs_diff_eq(color::srgb_to_linear(reference), 1e-6),
                "sRGB target at elevation {}",
                e
            );
            assert!(
                plain.fragment_color(e).abs_diff_eq(reference, 1e-6),
                "plain target at elevation {}",
                e
            );
        }
    }

    #[test]
    fn test_octave_count_is_capped_for_upload() {
        let params = WaterParams {
            small_iterations: u32::MAX,
            ..WaterParams::default()
        };
        let uniforms = WaterUniforms::new(&params, Mat4::IDENTITY, false, true);
        assert_eq!(uniforms.small_iterations, waves::MAX_SMALL_ITERATIONS);
    }
}
