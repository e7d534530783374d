//! The arena: a fixed, ordered set of placed objects.
//!
//! [`arena_layout`] describes what goes where, [`Scene::build`] resolves the
//! names against the registries once and gives every object its own uniform
//! buffer. Nothing is added, moved or removed afterwards.

use std::sync::Arc;

use cgmath::{Matrix4, Vector3};

use crate::{
    data_structures::transform::Transform,
    error::ResourceError,
    pipelines::shader::{Shader, ShaderRegistry},
    resources::{
        mesh::{Buffers, BuffersRegistry},
        texture::{Texture, TextureRegistry},
    },
};

/// Textures the arena uses, each loaded from `<name>.png`.
pub const ARENA_TEXTURES: [&str; 4] = ["gravel", "rocks", "the-sun", "barrel"];
/// Meshes the arena uses.
pub const ARENA_MESHES: [&str; 2] = ["cube", "barrel"];

/// One object to place, referencing registry entries by name.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectSpec {
    pub mesh: &'static str,
    pub texture: &'static str,
    pub shader: &'static str,
    pub transform: Transform,
}

impl ObjectSpec {
    fn cube(texture: &'static str, transform: Transform) -> Self {
        Self {
            mesh: "cube",
            texture,
            shader: "cube",
            transform,
        }
    }
}

/// The arena in draw order: floor, walls, pillars, the sun, barrels.
pub fn arena_layout(light_position: Vector3<f32>) -> Vec<ObjectSpec> {
    let mut specs = Vec::new();

    for x in (-16..=16).step_by(2) {
        for z in (-16..=16).step_by(2) {
            let transform = Transform::at([x as f32, -3.0, z as f32]).with_scale([1.0, 1.0, 1.0]);
            specs.push(ObjectSpec::cube("gravel", transform));
        }
    }

    for z in (-15..=15).step_by(2) {
        for x in [-15.0, 15.0] {
            specs.push(ObjectSpec::cube("rocks", Transform::at([x, -1.0, z as f32])));
        }
    }

    for y in [-1.0, 1.0, 3.0] {
        for (x, z) in [(3.0, 2.0), (8.0, 7.0), (2.0, -5.0)] {
            specs.push(ObjectSpec::cube("rocks", Transform::at([x, y, z])));
        }
    }

    specs.push(ObjectSpec {
        mesh: "cube",
        texture: "the-sun",
        shader: "basic",
        transform: Transform::at(light_position)
            .with_scale([5.0, 5.0, 5.0])
            .with_rotation([0.0, 0.0, 90.0]),
    });

    for (x, z) in [(-5.0, -5.0), (5.0, 5.0), (10.0, -5.0)] {
        specs.push(ObjectSpec {
            mesh: "barrel",
            texture: "barrel",
            shader: "cube",
            transform: Transform::at([x, -2.0, z]).with_scale([0.5, 0.5, 0.5]),
        });
    }

    specs
}

/// A placed object. Holds shared references into the registries.
#[derive(Debug)]
pub struct GameObject {
    pub transform: Transform,
    /// `transform` as a matrix, computed once.
    pub model: Matrix4<f32>,
    pub buffers: Arc<Buffers>,
    pub texture: Arc<Texture>,
    pub shader: Arc<Shader>,
    uniforms: Option<ObjectUniforms>,
}

#[derive(Debug)]
struct ObjectUniforms {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl GameObject {
    pub fn new(
        device: &wgpu::Device,
        transform: Transform,
        buffers: Arc<Buffers>,
        texture: Arc<Texture>,
        shader: Arc<Shader>,
    ) -> Self {
        let uniforms = shader.uniform_layout.as_ref().map(|layout| {
            let label = format!("{} object uniforms", shader.name);
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&label),
                size: shader.interface.block_size(),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
                label: Some(&label),
            });
            ObjectUniforms { buffer, bind_group }
        });

        Self {
            model: transform.to_matrix(),
            transform,
            buffers,
            texture,
            shader,
            uniforms,
        }
    }

    /// Per-object uniform buffer, absent for shaders without a block.
    pub fn uniform_buffer(&self) -> Option<&wgpu::Buffer> {
        self.uniforms.as_ref().map(|u| &u.buffer)
    }

    pub fn uniform_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.uniforms.as_ref().map(|u| &u.bind_group)
    }
}

#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<GameObject>,
}

impl Scene {
    /// Resolves every spec. The first unknown shader, mesh or texture name
    /// aborts the build.
    pub fn build(
        device: &wgpu::Device,
        specs: &[ObjectSpec],
        shaders: &ShaderRegistry,
        meshes: &BuffersRegistry,
        textures: &TextureRegistry,
    ) -> Result<Self, ResourceError> {
        let objects = specs
            .iter()
            .map(|spec| {
                Ok(GameObject::new(
                    device,
                    spec.transform,
                    meshes.get_by_name(spec.mesh)?,
                    textures.get_by_name(spec.texture)?,
                    shaders.get_by_name(spec.shader)?,
                ))
            })
            .collect::<Result<Vec<_>, ResourceError>>()?;
        log::info!("scene built with {} objects", objects.len());
        Ok(Self { objects })
    }

    /// Objects in draw order.
    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
