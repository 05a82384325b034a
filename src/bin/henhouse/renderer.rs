use std::{borrow::Cow, mem, num::NonZeroU64};

use futures::executor;
use henhouse::{
    gfx::{
        Bitmap, DrawBlock, DrawCall, DrawPath, FrameBlock, FrameUniforms, MeshSet, Rasterizer,
        Shape, TextureSlot, TextureSlots, Vertex,
    },
    math::Matrix4,
    util::BoxedError,
};
use sdl2::video::Window;
use wgpu::{
    util::{BufferInitDescriptor, DeviceExt},
    BackendBit, BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout,
    BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingResource, BindingType, BlendState,
    Buffer, BufferBindingType, BufferDescriptor, BufferUsage, Color, ColorTargetState, ColorWrite,
    CommandEncoderDescriptor, CompareFunction, CullMode, DepthBiasState, DepthStencilState,
    Device, DeviceDescriptor, Extent3d, Features, FilterMode, FragmentState, FrontFace,
    IndexFormat, InputStepMode, Instance, Limits, LoadOp, MultisampleState, Operations,
    Origin3d, PipelineLayoutDescriptor, PolygonMode, PowerPreference, PresentMode,
    PrimitiveState, PrimitiveTopology, Queue, RenderPassColorAttachmentDescriptor,
    RenderPassDepthStencilAttachmentDescriptor, RenderPassDescriptor, RenderPipeline,
    RenderPipelineDescriptor, RequestAdapterOptions, Sampler, SamplerDescriptor, ShaderFlags,
    ShaderModuleDescriptor, ShaderSource, ShaderStage, StencilState, Surface, SwapChain,
    SwapChainDescriptor, Texture, TextureCopyView, TextureDataLayout, TextureDescriptor,
    TextureDimension, TextureFormat, TextureSampleType, TextureUsage, TextureView,
    TextureViewDescriptor, TextureViewDimension, VertexBufferLayout, VertexState,
};

/// Dynamic uniform offsets must be multiples of this.
const UNIFORM_ALIGNMENT: u64 = 256;

/// Draw calls beyond this in one frame are dropped.
const MAX_DRAWS: usize = 64;

const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;
const SWAP_CHAIN_FORMAT: TextureFormat = TextureFormat::Bgra8Unorm;

struct WindowTarget {
    pub surface: Surface,
    pub swap_chain: SwapChain,
    pub depth_buffer: TextureView,
}

impl WindowTarget {
    fn new(device: &Device, surface: Surface, size: (u32, u32)) -> WindowTarget {
        let swap_chain = WindowTarget::create_swap_chain(&device, &surface, size);
        let depth_buffer = WindowTarget::create_depth_buffer(&device, size);
        WindowTarget {
            surface,
            swap_chain,
            depth_buffer,
        }
    }

    fn synchronize_size(&mut self, device: &Device, size: (u32, u32)) {
        self.swap_chain = WindowTarget::create_swap_chain(&device, &self.surface, size);
        self.depth_buffer = WindowTarget::create_depth_buffer(&device, size);
    }

    fn create_swap_chain(device: &Device, surface: &Surface, size: (u32, u32)) -> SwapChain {
        device.create_swap_chain(
            &surface,
            &SwapChainDescriptor {
                usage: TextureUsage::RENDER_ATTACHMENT,
                format: SWAP_CHAIN_FORMAT,
                width: size.0.max(1),
                height: size.1.max(1),
                // v-sync
                present_mode: PresentMode::Fifo,
            },
        )
    }

    fn create_depth_buffer(device: &Device, size: (u32, u32)) -> TextureView {
        device
            .create_texture(&TextureDescriptor {
                label: Some("depth"),
                size: Extent3d {
                    width: size.0.max(1),
                    height: size.1.max(1),
                    depth: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: TextureUsage::RENDER_ATTACHMENT,
            })
            .create_view(&TextureViewDescriptor::default())
    }
}

struct GpuMesh {
    shape: Shape,
    path: DrawPath,
    vertices: Buffer,
    indices: Buffer,
    index_count: u32,
}

struct GpuTexture {
    _texture: Texture,
    view: TextureView,
}

impl GpuTexture {
    fn upload(device: &Device, queue: &Queue, bitmap: &Bitmap) -> GpuTexture {
        let size = Extent3d {
            width: bitmap.width(),
            height: bitmap.height(),
            depth: 1,
        };
        let texture = device.create_texture(&TextureDescriptor {
            label: None,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8Unorm,
            usage: TextureUsage::SAMPLED | TextureUsage::COPY_DST,
        });
        queue.write_texture(
            TextureCopyView {
                texture: &texture,
                mip_level: 0,
                origin: Origin3d::ZERO,
            },
            &bitmap.to_rgba8(),
            TextureDataLayout {
                offset: 0,
                bytes_per_row: bitmap.width() * 4,
                rows_per_image: bitmap.height(),
            },
            size,
        );
        let view = texture.create_view(&TextureViewDescriptor::default());
        GpuTexture {
            _texture: texture,
            view,
        }
    }
}

/// Draws frames with wgpu into an SDL window.
pub struct WgpuRasterizer {
    device: Device,
    queue: Queue,
    target: WindowTarget,
    pipeline: RenderPipeline,
    meshes: Vec<GpuMesh>,

    frame_buffer: Buffer,
    draw_buffer: Buffer,
    frame_bind_group: BindGroup,
    draw_bind_group: BindGroup,

    texture_layout: BindGroupLayout,
    texture_sampler: Sampler,
    textures: Vec<GpuTexture>,
    texture_generations: [u64; TextureSlot::COUNT],
    texture_bind_group: BindGroup,

    frame: FrameBlock,
    draws: Vec<(Shape, DrawPath, DrawBlock)>,
}

impl WgpuRasterizer {
    pub fn new(window: &Window, meshes: &MeshSet) -> Result<WgpuRasterizer, BoxedError> {
        let instance = Instance::new(BackendBit::PRIMARY);
        let surface = unsafe { instance.create_surface(window) };

        let adapter = executor::block_on(instance.request_adapter(&RequestAdapterOptions {
            power_preference: PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
        }))
        .ok_or("Failed to request GFX adapter")?;

        let (device, queue) = executor::block_on(adapter.request_device(
            &DeviceDescriptor {
                label: None,
                features: Features::empty(),
                limits: Limits::default(),
            },
            None,
        ))?;

        let target = WindowTarget::new(&device, surface, window.size());

        let uniform_entry = |binding, has_dynamic_offset, size: usize| BindGroupLayoutEntry {
            binding,
            visibility: ShaderStage::VERTEX | ShaderStage::FRAGMENT,
            ty: BindingType::Buffer {
                ty: BufferBindingType::Uniform,
                has_dynamic_offset,
                min_binding_size: NonZeroU64::new(size as u64),
            },
            count: None,
        };
        let frame_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("frame"),
            entries: &[uniform_entry(0, false, mem::size_of::<FrameBlock>())],
        });
        let draw_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("draw"),
            entries: &[uniform_entry(0, true, mem::size_of::<DrawBlock>())],
        });

        let mut texture_entries: Vec<_> = (0..TextureSlot::COUNT as u32)
            .map(|binding| BindGroupLayoutEntry {
                binding,
                visibility: ShaderStage::FRAGMENT,
                ty: BindingType::Texture {
                    sample_type: TextureSampleType::Float { filterable: true },
                    view_dimension: TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            })
            .collect();
        texture_entries.push(BindGroupLayoutEntry {
            binding: TextureSlot::COUNT as u32,
            visibility: ShaderStage::FRAGMENT,
            ty: BindingType::Sampler {
                filtering: false,
                comparison: false,
            },
            count: None,
        });
        let texture_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("textures"),
            entries: &texture_entries,
        });

        let frame_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("frame"),
            size: mem::size_of::<FrameBlock>() as u64,
            usage: BufferUsage::UNIFORM | BufferUsage::COPY_DST,
            mapped_at_creation: false,
        });
        let draw_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("draws"),
            size: UNIFORM_ALIGNMENT * MAX_DRAWS as u64,
            usage: BufferUsage::UNIFORM | BufferUsage::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("frame"),
            layout: &frame_layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: BindingResource::Buffer {
                    buffer: &frame_buffer,
                    offset: 0,
                    size: None,
                },
            }],
        });
        let draw_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("draw"),
            layout: &draw_layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: BindingResource::Buffer {
                    buffer: &draw_buffer,
                    offset: 0,
                    size: NonZeroU64::new(mem::size_of::<DrawBlock>() as u64),
                },
            }],
        });

        let texture_sampler = device.create_sampler(&SamplerDescriptor {
            label: Some("nearest"),
            mag_filter: FilterMode::Nearest,
            min_filter: FilterMode::Nearest,
            mipmap_filter: FilterMode::Nearest,
            ..SamplerDescriptor::default()
        });
        let unbound = Bitmap::from_rgba8(1, 1, vec![0, 0, 0, 255])?;
        let textures: Vec<_> = (0..TextureSlot::COUNT)
            .map(|_| GpuTexture::upload(&device, &queue, &unbound))
            .collect();
        let texture_bind_group =
            WgpuRasterizer::create_texture_bind_group(&device, &texture_layout, &textures, &texture_sampler);

        let shader = device.create_shader_module(&ShaderModuleDescriptor {
            label: Some("henhouse"),
            source: ShaderSource::Wgsl(Cow::Borrowed(include_str!("shader.wgsl"))),
            flags: ShaderFlags::all(),
        });
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&frame_layout, &draw_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("forward"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[VertexBufferLayout {
                    array_stride: mem::size_of::<Vertex>() as u64,
                    step_mode: InputStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float3, 1 => Float2, 2 => Float3],
                }],
            },
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                // Mirrored parts flip their winding.
                cull_mode: CullMode::None,
                polygon_mode: PolygonMode::Fill,
            },
            depth_stencil: Some(DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: CompareFunction::Less,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
                clamp_depth: false,
            }),
            multisample: MultisampleState::default(),
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[ColorTargetState {
                    format: SWAP_CHAIN_FORMAT,
                    alpha_blend: BlendState::REPLACE,
                    color_blend: BlendState::REPLACE,
                    write_mask: ColorWrite::ALL,
                }],
            }),
        });

        let meshes = meshes
            .iter()
            .map(|(shape, path, mesh)| GpuMesh {
                shape,
                path,
                vertices: device.create_buffer_init(&BufferInitDescriptor {
                    label: None,
                    contents: bytemuck::cast_slice(mesh.vertices()),
                    usage: BufferUsage::VERTEX,
                }),
                indices: device.create_buffer_init(&BufferInitDescriptor {
                    label: None,
                    contents: bytemuck::cast_slice(mesh.indices()),
                    usage: BufferUsage::INDEX,
                }),
                index_count: mesh.indices().len() as u32,
            })
            .collect();

        Ok(WgpuRasterizer {
            device,
            queue,
            target,
            pipeline,
            meshes,
            frame_buffer,
            draw_buffer,
            frame_bind_group,
            draw_bind_group,
            texture_layout,
            texture_sampler,
            textures,
            texture_generations: [0; TextureSlot::COUNT],
            texture_bind_group,
            frame: FrameUniforms::default().to_block(),
            draws: Vec::with_capacity(MAX_DRAWS),
        })
    }

    fn create_texture_bind_group(
        device: &Device,
        layout: &BindGroupLayout,
        textures: &[GpuTexture],
        sampler: &Sampler,
    ) -> BindGroup {
        let mut entries: Vec<_> = textures
            .iter()
            .enumerate()
            .map(|(binding, texture)| BindGroupEntry {
                binding: binding as u32,
                resource: BindingResource::TextureView(&texture.view),
            })
            .collect();
        entries.push(BindGroupEntry {
            binding: textures.len() as u32,
            resource: BindingResource::Sampler(sampler),
        });
        device.create_bind_group(&BindGroupDescriptor {
            label: Some("textures"),
            layout,
            entries: &entries,
        })
    }

    pub fn resize(&mut self, size: (u32, u32)) {
        self.target.synchronize_size(&self.device, size);
    }

    /// Upload every slot that was bound since the last frame.
    fn synchronize_textures(&mut self, slots: &TextureSlots) {
        let mut dirty = false;
        for (slot, bitmap) in slots.iter() {
            let generation = slots.generation(slot);
            if generation == self.texture_generations[slot.index()] {
                continue;
            }
            if let Some(bitmap) = bitmap {
                log::debug!("Uploading texture slot {}", slot.index());
                self.textures[slot.index()] = GpuTexture::upload(&self.device, &self.queue, bitmap);
                dirty = true;
            }
            self.texture_generations[slot.index()] = generation;
        }
        if dirty {
            self.texture_bind_group = WgpuRasterizer::create_texture_bind_group(
                &self.device,
                &self.texture_layout,
                &self.textures,
                &self.texture_sampler,
            );
        }
    }
}

impl Rasterizer for WgpuRasterizer {
    fn begin_frame(&mut self, frame: &FrameUniforms, textures: &TextureSlots) {
        let mut frame = *frame;
        frame.projection = &Matrix4::wgpu_depth_correction() * &frame.projection;
        self.frame = frame.to_block();
        self.draws.clear();
        self.synchronize_textures(textures);
    }

    fn draw(&mut self, call: &DrawCall) {
        if self.draws.len() == MAX_DRAWS {
            log::warn!("Dropping draw call past the per-frame limit of {}", MAX_DRAWS);
            return;
        }
        self.draws.push((call.shape, call.path, DrawBlock::from(call)));
    }

    fn end_frame(&mut self) -> Result<(), BoxedError> {
        // The render buffers will automatically be swapped when this texture drops
        let current_frame = self.target.swap_chain.get_current_frame()?;

        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&self.frame));
        for (index, (_, _, block)) in self.draws.iter().enumerate() {
            let offset = index as u64 * UNIFORM_ALIGNMENT;
            self.queue
                .write_buffer(&self.draw_buffer, offset, bytemuck::bytes_of(block));
        }

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor { label: None });
        {
            let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: None,
                color_attachments: &[RenderPassColorAttachmentDescriptor {
                    attachment: &current_frame.output.view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(Color {
                            r: 0.5,
                            g: 0.5,
                            b: 0.5,
                            a: 1.0,
                        }),
                        store: true,
                    },
                }],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachmentDescriptor {
                    attachment: &self.target.depth_buffer,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: true,
                    }),
                    stencil_ops: None,
                }),
            });
            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            render_pass.set_bind_group(2, &self.texture_bind_group, &[]);
            for (index, (shape, path, _)) in self.draws.iter().enumerate() {
                let mesh = match self
                    .meshes
                    .iter()
                    .find(|mesh| mesh.shape == *shape && mesh.path == *path)
                {
                    Some(mesh) => mesh,
                    None => continue,
                };
                let offset = (index as u64 * UNIFORM_ALIGNMENT) as u32;
                render_pass.set_bind_group(1, &self.draw_bind_group, &[offset]);
                render_pass.set_vertex_buffer(0, mesh.vertices.slice(..));
                render_pass.set_index_buffer(mesh.indices.slice(..), IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        Ok(())
    }
}
