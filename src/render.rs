//! Per-frame drawing.
//!
//! Each frame the camera is turned into [`FrameUniforms`], every object gets
//! its uniform block written with the values its shader declared, and the
//! scene is drawn in build order with one indexed draw per object.

use cgmath::{Matrix4, Point3, Vector3};

use crate::{
    camera::Camera,
    data_structures::texture::Texture,
    pipelines::interface::{ShaderInterface, Uniform, UniformBlock},
    scene::{GameObject, Scene},
};

/// Values shared by every object in a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUniforms {
    pub projection: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub view_position: Point3<f32>,
    pub light_position: Vector3<f32>,
}

impl FrameUniforms {
    pub fn new(camera: &Camera, size: (u32, u32), light_position: Vector3<f32>) -> Self {
        Self {
            projection: camera.projection_matrix(size.0, size.1),
            view: camera.view_matrix(),
            view_position: camera.position,
            light_position,
        }
    }
}

/// The uniform block for one object drawn with `interface`. Values the
/// shader did not declare are left out.
pub fn object_uniforms<'a>(
    interface: &'a ShaderInterface,
    frame: &FrameUniforms,
    model: &Matrix4<f32>,
    texture_scale: [f32; 2],
) -> UniformBlock<'a> {
    let mut block = UniformBlock::new(interface);
    let projection: &[f32; 16] = frame.projection.as_ref();
    let view: &[f32; 16] = frame.view.as_ref();
    let model: &[f32; 16] = model.as_ref();
    let view_position: &[f32; 3] = frame.view_position.as_ref();
    let light_position: &[f32; 3] = frame.light_position.as_ref();

    block.set(Uniform::ProjectionMatrix, projection);
    block.set(Uniform::ViewMatrix, view);
    block.set(Uniform::ModelMatrix, model);
    block.set(Uniform::TextureScale, &texture_scale);
    block.set(Uniform::ViewPosition, view_position);
    block.set(Uniform::LightPosition, light_position);
    block
}

/// Queues the uniform upload of every object for the coming submit.
pub fn write_object_uniforms(queue: &wgpu::Queue, scene: &Scene, frame: &FrameUniforms) {
    for object in scene.objects() {
        let Some(buffer) = object.uniform_buffer() else {
            continue;
        };
        let block = object_uniforms(
            &object.shader.interface,
            frame,
            &object.model,
            object.texture.scale,
        );
        queue.write_buffer(buffer, 0, block.as_bytes());
    }
}

/// Binds what `object`'s shader declared and issues its draw.
pub fn draw_object(pass: &mut wgpu::RenderPass<'_>, object: &GameObject) {
    let interface = &object.shader.interface;
    pass.set_pipeline(&object.shader.pipeline);

    for (attrib, location) in interface.attribs() {
        pass.set_vertex_buffer(location.buffer_slot, object.buffers.buffer_for(attrib).slice(..));
    }
    pass.set_index_buffer(object.buffers.index.slice(..), wgpu::IndexFormat::Uint16);

    if let (Some(group), Some(bind_group)) = (interface.block_group(), object.uniform_bind_group()) {
        pass.set_bind_group(group, bind_group, &[]);
    }
    if let Some(group) = interface.texture_group() {
        // Whatever is current right now, the placeholder or the decoded image.
        let texture = object.texture.handle.current();
        pass.set_bind_group(group, &texture.bind_group, &[]);
    }

    pass.draw_indexed(0..object.buffers.index_count, 0, 0..1);
}

/// Clears `target` and `depth` and draws the scene into them.
pub fn encode_frame(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    target: &wgpu::TextureView,
    depth: &Texture,
    scene: &Scene,
    frame: &FrameUniforms,
    clear_color: wgpu::Color,
) -> wgpu::CommandBuffer {
    write_object_uniforms(queue, scene, frame);

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Render Encoder"),
    });
    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
            multiview_mask: None,
        });

        for object in scene.objects() {
            draw_object(&mut render_pass, object);
        }
    }
    encoder.finish()
}

/// `[r, g, b, a]` as a wgpu clear color.
pub fn clear_color(rgba: [f64; 4]) -> wgpu::Color {
    wgpu::Color {
        r: rgba[0],
        g: rgba[1],
        b: rgba[2],
        a: rgba[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::interface::{Attrib, UniformLocation};

    fn floats(bytes: &[u8], offset: u64, count: usize) -> Vec<f32> {
        let start = offset as usize;
        bytes[start..start + count * 4]
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes(c.try_into().unwrap()))
            .collect()
    }

    #[test]
    fn undeclared_lighting_values_are_not_written() {
        let interface = ShaderInterface::resolve(
            &[Attrib::Position, Attrib::TextureUv],
            &[Uniform::ProjectionMatrix, Uniform::ViewMatrix, Uniform::ModelMatrix, Uniform::TextureScale],
        );
        let frame = FrameUniforms {
            projection: Matrix4::from_scale(2.0),
            view: Matrix4::from_scale(3.0),
            view_position: Point3::new(1.0, 2.0, 3.0),
            light_position: Vector3::new(4.0, 5.0, 6.0),
        };
        let block = object_uniforms(&interface, &frame, &Matrix4::from_scale(4.0), [2.0, 0.5]);
        let bytes = block.as_bytes();
        assert_eq!(bytes.len(), 208);
        assert_eq!(floats(bytes, 64, 1), vec![3.0]);
        assert_eq!(floats(bytes, 128, 1), vec![4.0]);
        assert_eq!(floats(bytes, 192, 2), vec![2.0, 0.5]);
        assert_eq!(interface.uniform(Uniform::LightPosition), None);
    }

    #[test]
    fn lit_block_carries_view_and_light_positions() {
        let interface = ShaderInterface::resolve(&Attrib::ALL, &Uniform::ALL);
        let frame = FrameUniforms {
            projection: Matrix4::from_scale(1.0),
            view: Matrix4::from_scale(1.0),
            view_position: Point3::new(1.0, 2.0, 3.0),
            light_position: Vector3::new(-25.0, 20.0, 5.0),
        };
        let block = object_uniforms(&interface, &frame, &Matrix4::from_scale(1.0), [1.0, 1.0]);
        let Some(UniformLocation::Block { offset, .. }) = interface.uniform(Uniform::LightPosition) else {
            panic!("light position lives in the block");
        };
        assert_eq!(floats(block.as_bytes(), offset, 3), vec![-25.0, 20.0, 5.0]);
        let Some(UniformLocation::Block { offset, .. }) = interface.uniform(Uniform::ViewPosition) else {
            panic!("view position lives in the block");
        };
        assert_eq!(floats(block.as_bytes(), offset, 3), vec![1.0, 2.0, 3.0]);
    }
}
