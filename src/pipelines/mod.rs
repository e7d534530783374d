//! Shader programs and the vocabulary they are declared with.
//!
//! - `interface` resolves a declared attribute/uniform subset to locations
//! - `shader` builds pipelines and keeps them in the [`shader::ShaderRegistry`]
//!
//! The WGSL sources live next to this file, one file per stage.

use std::borrow::Cow;

use interface::{Attrib, Uniform};
use shader::ShaderDesc;

pub mod interface;
pub mod shader;

/// The lit shader used for the floor, walls, pillars and barrels.
pub fn cube_shader() -> ShaderDesc {
    ShaderDesc {
        name: "cube".to_string(),
        attribs: Attrib::ALL.to_vec(),
        uniforms: Uniform::ALL.to_vec(),
        vertex: Cow::Borrowed(include_str!("cube.vert.wgsl")),
        fragment: Cow::Borrowed(include_str!("cube.frag.wgsl")),
    }
}

/// Unlit, used for the light indicator.
pub fn basic_shader() -> ShaderDesc {
    ShaderDesc {
        name: "basic".to_string(),
        attribs: vec![Attrib::Position, Attrib::TextureUv],
        uniforms: vec![
            Uniform::ProjectionMatrix,
            Uniform::ViewMatrix,
            Uniform::ModelMatrix,
            Uniform::Sampler,
            Uniform::TextureScale,
        ],
        vertex: Cow::Borrowed(include_str!("basic.vert.wgsl")),
        fragment: Cow::Borrowed(include_str!("basic.frag.wgsl")),
    }
}

pub fn builtin_shaders() -> Vec<ShaderDesc> {
    vec![cube_shader(), basic_shader()]
}
