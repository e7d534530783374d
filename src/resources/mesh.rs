use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::{
    data_structures::mesh::MeshData,
    error::ResourceError,
    pipelines::interface::Attrib,
    resources::registry::Registry,
};

/// GPU copies of one mesh. Shared by every object drawing it.
#[derive(Debug)]
pub struct Buffers {
    pub name: String,
    pub position: wgpu::Buffer,
    pub normal: wgpu::Buffer,
    pub uv: wgpu::Buffer,
    pub index: wgpu::Buffer,
    pub index_count: u32,
}

impl Buffers {
    pub fn upload(device: &wgpu::Device, name: &str, mesh: &MeshData) -> Self {
        let vertex_buffer = |stream: &str, data: &[f32]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{name} {stream} buffer")),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::VERTEX,
            })
        };
        let position = vertex_buffer("position", &mesh.position);
        let normal = vertex_buffer("normal", &mesh.normal);
        let uv = vertex_buffer("uv", &mesh.uv);

        // Buffer sizes must be a multiple of 4, pad odd u16 counts.
        let mut indices = mesh.index.clone();
        if indices.len() % 2 == 1 {
            indices.push(0);
        }
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} index buffer")),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            name: name.to_string(),
            position,
            normal,
            uv,
            index,
            index_count: mesh.index_count(),
        }
    }

    /// The buffer feeding `attrib`.
    pub fn buffer_for(&self, attrib: Attrib) -> &wgpu::Buffer {
        match attrib {
            Attrib::Position => &self.position,
            Attrib::Normal => &self.normal,
            Attrib::TextureUv => &self.uv,
        }
    }
}

#[derive(Debug)]
pub struct BuffersRegistry {
    device: Arc<wgpu::Device>,
    buffers: Registry<Buffers>,
}

impl BuffersRegistry {
    pub fn new(device: Arc<wgpu::Device>) -> Self {
        Self {
            device,
            buffers: Registry::new("mesh"),
        }
    }

    /// Uploads the built-in mesh description called `name`.
    pub fn load(&mut self, name: &str) -> Result<Arc<Buffers>, ResourceError> {
        let mesh = MeshData::builtin(name)
            .ok_or_else(|| ResourceError::not_found("mesh description", name))?;
        Ok(self.insert(name, &mesh))
    }

    /// Uploads `mesh` under `name`.
    pub fn insert(&mut self, name: &str, mesh: &MeshData) -> Arc<Buffers> {
        let buffers = Buffers::upload(&self.device, name, mesh);
        log::debug!(
            "uploaded mesh `{name}`: {} vertices, {} indices",
            mesh.vertex_count(),
            buffers.index_count
        );
        self.buffers.insert(name, buffers)
    }

    pub fn get_by_name(&self, name: &str) -> Result<Arc<Buffers>, ResourceError> {
        self.buffers.get_by_name(name)
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}
