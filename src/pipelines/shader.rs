//! Shader programs: a vertex and a fragment WGSL module combined into one
//! render pipeline whose layout follows the declared [`ShaderInterface`].

use std::{borrow::Cow, num::NonZeroU64, sync::Arc};

use crate::{
    data_structures::texture::Texture,
    error::{ResourceError, ShaderStage, StageLog},
    pipelines::interface::{Attrib, ShaderInterface, Uniform},
    resources::registry::Registry,
};

/// Everything needed to build one shader.
#[derive(Clone, Debug)]
pub struct ShaderDesc {
    pub name: String,
    pub attribs: Vec<Attrib>,
    pub uniforms: Vec<Uniform>,
    pub vertex: Cow<'static, str>,
    pub fragment: Cow<'static, str>,
}

/// A built shader. Immutable once created.
#[derive(Debug)]
pub struct Shader {
    pub name: String,
    pub interface: ShaderInterface,
    pub pipeline: wgpu::RenderPipeline,
    /// Layout of the per-object uniform block, absent when the shader
    /// declares no block uniforms.
    pub uniform_layout: Option<wgpu::BindGroupLayout>,
}

impl Shader {
    /// Compiles both stages and links them.
    ///
    /// Every failing stage contributes a log. Linking is only attempted when
    /// both stages compiled, its failure is reported as the `Link` stage.
    pub async fn compile(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        texture_layout: &wgpu::BindGroupLayout,
        desc: &ShaderDesc,
    ) -> Result<Shader, ResourceError> {
        let mut logs = Vec::new();
        let vertex = compile_stage(device, desc, ShaderStage::Vertex, &mut logs).await;
        let fragment = compile_stage(device, desc, ShaderStage::Fragment, &mut logs).await;
        let (Some(vertex), Some(fragment)) = (vertex, fragment) else {
            return Err(ResourceError::ShaderCompile {
                name: desc.name.clone(),
                logs,
            });
        };

        let interface = ShaderInterface::resolve(&desc.attribs, &desc.uniforms);
        let uniform_layout = NonZeroU64::new(interface.block_size())
            .map(|size| uniform_block_layout(device, &desc.name, size));

        let mut bind_group_layouts = Vec::new();
        if let Some(layout) = &uniform_layout {
            bind_group_layouts.push(Some(layout));
        }
        if interface.texture_group().is_some() {
            bind_group_layouts.push(Some(texture_layout));
        }

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} pipeline layout", desc.name)),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });
        let pipeline = mk_render_pipeline(
            device,
            &desc.name,
            &layout,
            color_format,
            Some(Texture::DEPTH_FORMAT),
            &interface.vertex_layouts(),
            &vertex,
            &fragment,
        );
        if let Some(error) = scope.pop().await {
            logs.push(StageLog {
                stage: ShaderStage::Link,
                message: error.to_string(),
            });
            return Err(ResourceError::ShaderCompile {
                name: desc.name.clone(),
                logs,
            });
        }

        log::info!(
            "built shader `{}` ({} attributes, {} byte uniform block)",
            desc.name,
            interface.attribs().count(),
            interface.block_size()
        );
        Ok(Shader {
            name: desc.name.clone(),
            interface,
            pipeline,
            uniform_layout,
        })
    }
}

async fn compile_stage(
    device: &wgpu::Device,
    desc: &ShaderDesc,
    stage: ShaderStage,
    logs: &mut Vec<StageLog>,
) -> Option<wgpu::ShaderModule> {
    let source = match stage {
        ShaderStage::Fragment => desc.fragment.clone(),
        _ => desc.vertex.clone(),
    };
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{} {stage} shader", desc.name)),
        source: wgpu::ShaderSource::Wgsl(source),
    });
    match scope.pop().await {
        Some(error) => {
            logs.push(StageLog {
                stage,
                message: error.to_string(),
            });
            None
        }
        None => Some(module),
    }
}

/// The texture + sampler bind group layout shared by every textured shader
/// and every texture.
pub fn texture_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
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
        label: Some("texture_bind_group_layout"),
    })
}

fn uniform_block_layout(device: &wgpu::Device, name: &str, size: NonZeroU64) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: Some(size),
            },
            count: None,
        }],
        label: Some(&format!("{name} uniform_bind_group_layout")),
    })
}

#[allow(clippy::too_many_arguments)]
fn mk_render_pipeline(
    device: &wgpu::Device,
    name: &str,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    depth_format: Option<wgpu::TextureFormat>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    vertex: &wgpu::ShaderModule,
    fragment: &wgpu::ShaderModule,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some(&format!("{name} render pipeline")),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: vertex,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: fragment,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: Some(true),
            depth_compare: Some(wgpu::CompareFunction::LessEqual),
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview_mask: None,
    })
}

/// Built shaders keyed by name.
#[derive(Debug)]
pub struct ShaderRegistry {
    device: Arc<wgpu::Device>,
    color_format: wgpu::TextureFormat,
    texture_layout: Arc<wgpu::BindGroupLayout>,
    shaders: Registry<Shader>,
}

impl ShaderRegistry {
    pub fn new(
        device: Arc<wgpu::Device>,
        color_format: wgpu::TextureFormat,
        texture_layout: Arc<wgpu::BindGroupLayout>,
    ) -> Self {
        Self {
            device,
            color_format,
            texture_layout,
            shaders: Registry::new("shader"),
        }
    }

    /// Builds `desc` and registers it under its name. A failed build
    /// registers nothing.
    pub async fn compile(&mut self, desc: &ShaderDesc) -> Result<Arc<Shader>, ResourceError> {
        let shader =
            Shader::compile(&self.device, self.color_format, &self.texture_layout, desc).await?;
        Ok(self.shaders.insert(&desc.name, shader))
    }

    pub fn get_by_name(&self, name: &str) -> Result<Arc<Shader>, ResourceError> {
        self.shaders.get_by_name(name)
    }

    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }
}
