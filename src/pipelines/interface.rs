//! The attribute/uniform vocabulary shaders draw from and how a declared
//! subset of it resolves to concrete wgpu locations.
//!
//! Resolution is pure: it only depends on which names a shader declares, so
//! the Rust side and the WGSL side agree as long as the WGSL follows the same
//! rules:
//!
//! - attributes get `@location(n)` and vertex buffer slot `n` in vocabulary
//!   order over the declared subset;
//! - matrix and vector uniforms are packed into one block at
//!   `@group(0) @binding(0)` in vocabulary order using WGSL uniform alignment;
//! - a declared sampler adds a texture bind group right after the block.

use std::{collections::BTreeMap, fmt, str::FromStr};

/// A per-vertex input a shader may consume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attrib {
    Position,
    Normal,
    TextureUv,
}

impl Attrib {
    pub const ALL: [Attrib; 3] = [Attrib::Position, Attrib::Normal, Attrib::TextureUv];

    pub fn name(self) -> &'static str {
        match self {
            Attrib::Position => "position",
            Attrib::Normal => "normal",
            Attrib::TextureUv => "textureUV",
        }
    }

    /// Float components per vertex.
    pub fn components(self) -> u32 {
        match self {
            Attrib::Position | Attrib::Normal => 3,
            Attrib::TextureUv => 2,
        }
    }

    pub fn format(self) -> wgpu::VertexFormat {
        match self.components() {
            2 => wgpu::VertexFormat::Float32x2,
            _ => wgpu::VertexFormat::Float32x3,
        }
    }
}

/// A per-draw input a shader may consume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Uniform {
    ProjectionMatrix,
    ViewMatrix,
    ModelMatrix,
    TextureScale,
    LightPosition,
    ViewPosition,
    Sampler,
}

impl Uniform {
    pub const ALL: [Uniform; 7] = [
        Uniform::ProjectionMatrix,
        Uniform::ViewMatrix,
        Uniform::ModelMatrix,
        Uniform::TextureScale,
        Uniform::LightPosition,
        Uniform::ViewPosition,
        Uniform::Sampler,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Uniform::ProjectionMatrix => "projectionMatrix",
            Uniform::ViewMatrix => "viewMatrix",
            Uniform::ModelMatrix => "modelMatrix",
            Uniform::TextureScale => "textureScale",
            Uniform::LightPosition => "lightPosition",
            Uniform::ViewPosition => "viewPosition",
            Uniform::Sampler => "sampler",
        }
    }

    /// Size and alignment inside the uniform block, `None` for bindings that
    /// live outside of it.
    fn block_layout(self) -> Option<(u64, u64)> {
        match self {
            Uniform::ProjectionMatrix | Uniform::ViewMatrix | Uniform::ModelMatrix => {
                Some((64, 16))
            }
            Uniform::TextureScale => Some((8, 8)),
            Uniform::LightPosition | Uniform::ViewPosition => Some((12, 16)),
            Uniform::Sampler => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not part of the shader vocabulary")]
pub struct UnknownName(pub String);

impl FromStr for Attrib {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attrib::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

impl FromStr for Uniform {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uniform::ALL
            .into_iter()
            .find(|u| u.name() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

impl fmt::Display for Attrib {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Uniform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a declared attribute is fed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttribLocation {
    /// `@location` in the vertex shader.
    pub shader_location: u32,
    /// Vertex buffer slot passed to `set_vertex_buffer`.
    pub buffer_slot: u32,
}

/// Where a declared uniform is written to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformLocation {
    /// Byte range inside the per-object uniform block.
    Block { offset: u64, size: u64 },
    /// A texture + sampler bind group.
    TextureGroup { group: u32 },
}

/// The resolved locations of one shader. Only declared names have an entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderInterface {
    attribs: BTreeMap<Attrib, AttribLocation>,
    uniforms: BTreeMap<Uniform, UniformLocation>,
    block_size: u64,
    vertex_attributes: Vec<wgpu::VertexAttribute>,
}

impl ShaderInterface {
    /// Resolves locations for exactly the declared names. Duplicates are
    /// ignored and declaration order does not matter.
    pub fn resolve(attribs: &[Attrib], uniforms: &[Uniform]) -> Self {
        let mut resolved_attribs = BTreeMap::new();
        let mut vertex_attributes = Vec::new();
        for attrib in Attrib::ALL.into_iter().filter(|a| attribs.contains(a)) {
            let slot = resolved_attribs.len() as u32;
            resolved_attribs.insert(
                attrib,
                AttribLocation {
                    shader_location: slot,
                    buffer_slot: slot,
                },
            );
            vertex_attributes.push(wgpu::VertexAttribute {
                offset: 0,
                shader_location: slot,
                format: attrib.format(),
            });
        }

        let mut resolved_uniforms = BTreeMap::new();
        let mut cursor = 0u64;
        let mut next_group = 0u32;
        let declared = || Uniform::ALL.into_iter().filter(|u| uniforms.contains(u));
        for uniform in declared() {
            if let Some((size, align)) = uniform.block_layout() {
                let offset = cursor.next_multiple_of(align);
                resolved_uniforms.insert(uniform, UniformLocation::Block { offset, size });
                cursor = offset + size;
            }
        }
        let block_size = cursor.next_multiple_of(16);
        if block_size > 0 {
            next_group += 1;
        }
        if uniforms.contains(&Uniform::Sampler) {
            resolved_uniforms.insert(
                Uniform::Sampler,
                UniformLocation::TextureGroup { group: next_group },
            );
        }

        Self {
            attribs: resolved_attribs,
            uniforms: resolved_uniforms,
            block_size,
            vertex_attributes,
        }
    }

    pub fn attrib(&self, attrib: Attrib) -> Option<AttribLocation> {
        self.attribs.get(&attrib).copied()
    }

    pub fn uniform(&self, uniform: Uniform) -> Option<UniformLocation> {
        self.uniforms.get(&uniform).copied()
    }

    /// Declared attributes with their locations, in slot order.
    pub fn attribs(&self) -> impl Iterator<Item = (Attrib, AttribLocation)> + '_ {
        self.attribs.iter().map(|(a, l)| (*a, *l))
    }

    /// Declared uniforms with their locations, in vocabulary order.
    pub fn uniforms(&self) -> impl Iterator<Item = (Uniform, UniformLocation)> + '_ {
        self.uniforms.iter().map(|(u, l)| (*u, *l))
    }

    /// Size in bytes of the uniform block, zero when nothing lives in it.
    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Bind group index of the uniform block, if there is one.
    pub fn block_group(&self) -> Option<u32> {
        (self.block_size > 0).then_some(0)
    }

    pub fn texture_group(&self) -> Option<u32> {
        match self.uniform(Uniform::Sampler) {
            Some(UniformLocation::TextureGroup { group }) => Some(group),
            _ => None,
        }
    }

    /// One vertex buffer layout per declared attribute, each attribute lives
    /// in its own tightly packed buffer.
    pub fn vertex_layouts(&self) -> Vec<wgpu::VertexBufferLayout<'_>> {
        self.vertex_attributes
            .iter()
            .map(|attribute| wgpu::VertexBufferLayout {
                array_stride: attribute.format.size(),
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: std::slice::from_ref(attribute),
            })
            .collect()
    }
}

/// Bytes of one object's uniform block.
///
/// Writes to uniforms the shader did not declare are dropped, so callers can
/// offer every value they have and let the interface pick.
pub struct UniformBlock<'a> {
    interface: &'a ShaderInterface,
    bytes: Vec<u8>,
}

impl<'a> UniformBlock<'a> {
    pub fn new(interface: &'a ShaderInterface) -> Self {
        Self {
            interface,
            bytes: vec![0; interface.block_size() as usize],
        }
    }

    /// Writes `value` at the uniform's offset. Returns whether the shader
    /// declared it.
    pub fn set(&mut self, uniform: Uniform, value: &[f32]) -> bool {
        let Some(UniformLocation::Block { offset, size }) = self.interface.uniform(uniform) else {
            return false;
        };
        let data: &[u8] = bytemuck::cast_slice(value);
        debug_assert_eq!(data.len() as u64, size, "wrong value size for {uniform}");
        let start = offset as usize;
        let len = data.len().min(size as usize);
        self.bytes[start..start + len].copy_from_slice(&data[..len]);
        true
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for attrib in Attrib::ALL {
            assert_eq!(attrib.name().parse::<Attrib>(), Ok(attrib));
        }
        for uniform in Uniform::ALL {
            assert_eq!(uniform.name().parse::<Uniform>(), Ok(uniform));
        }
        assert!("aVertexPosition".parse::<Attrib>().is_err());
    }

    #[test]
    fn vertex_layouts_use_one_buffer_per_attribute() {
        let interface = ShaderInterface::resolve(&[Attrib::TextureUv, Attrib::Position], &[]);
        let layouts = interface.vertex_layouts();
        assert_eq!(layouts.len(), 2);
        assert_eq!(layouts[0].array_stride, 12);
        assert_eq!(layouts[1].array_stride, 8);
        assert_eq!(layouts[1].attributes[0].shader_location, 1);
    }
}
