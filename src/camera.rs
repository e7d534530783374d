//! First person camera.
//!
//! [`Camera`] is plain state, [`CameraController`] owns the movement rules and
//! is the only thing that mutates a camera, once per frame.

use cgmath::{Deg, InnerSpace, Matrix3, Matrix4, Point3, Rad, Vector3, Zero};

use crate::{
    config::CameraConfig,
    input::{Binding, InputSource},
};

/// cgmath builds OpenGL clip space (z in -1..1), wgpu expects z in 0..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    /// Derived from position, yaw and pitch by [`Camera::retarget`].
    pub target: Point3<f32>,
    /// Radians around world up, 0 looks down -Z.
    pub yaw: f32,
    /// Height of the look target above the eye.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(position: impl Into<Point3<f32>>, fov: f32, znear: f32, zfar: f32) -> Self {
        let mut camera = Self {
            position: position.into(),
            target: Point3::new(0.0, 0.0, 0.0),
            yaw: 0.0,
            pitch: 0.0,
            fov,
            znear,
            zfar,
        };
        camera.retarget();
        camera
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new([0.0, 0.0, 0.0], config.fov, config.znear, config.zfar)
    }

    /// One unit along the view direction on the horizontal plane, lifted by
    /// pitch.
    pub fn retarget(&mut self) {
        let spin = Matrix3::from_angle_y(Rad(self.yaw)) * -Vector3::unit_z();
        self.target = self.position + spin;
        self.target.y = self.position.y + self.pitch;
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, Vector3::unit_y())
    }

    pub fn projection_matrix(&self, width: u32, height: u32) -> Matrix4<f32> {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(Deg(self.fov), aspect, self.znear, self.zfar)
    }
}

/// Movement and look rules.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraController {
    pub speed: f32,
    pub sensitivity: f32,
    pub max_pitch: f32,
    pub arena_half_extent: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl CameraController {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            speed: config.speed,
            sensitivity: config.sensitivity,
            max_pitch: config.max_pitch,
            arena_half_extent: config.arena_half_extent,
        }
    }

    /// Advances `camera` by `dt` seconds.
    ///
    /// While paused neither bindings nor mouse deltas are read, so position,
    /// yaw and pitch stay frozen. The target is recomputed and the position
    /// clamped every frame regardless.
    pub fn update(&self, camera: &mut Camera, input: &mut impl InputSource, dt: f32) {
        if !input.is_paused() {
            let direction = self.movement_direction(&*input);
            let step = direction * self.speed * dt;
            let step = Matrix3::from_angle_y(Rad(camera.yaw)) * Vector3::new(step.x, 0.0, step.z);
            camera.position += step;

            camera.yaw += input.take_mouse_delta_x() * dt * self.sensitivity;
            camera.pitch += input.take_mouse_delta_y() * dt * self.sensitivity;
            camera.pitch = camera.pitch.clamp(-self.max_pitch, self.max_pitch);
        }

        camera.retarget();

        let limit = self.arena_half_extent;
        camera.position.x = camera.position.x.clamp(-limit, limit);
        camera.position.z = camera.position.z.clamp(-limit, limit);
    }

    /// Unit length sum of the held movement bindings, zero when nothing is
    /// held or opposite bindings cancel out.
    fn movement_direction(&self, input: &impl InputSource) -> Vector3<f32> {
        let mut direction = Vector3::zero();
        if input.binding(Binding::Forward).is_down {
            direction -= Vector3::unit_z();
        }
        if input.binding(Binding::Back).is_down {
            direction += Vector3::unit_z();
        }
        if input.binding(Binding::Left).is_down {
            direction -= Vector3::unit_x();
        }
        if input.binding(Binding::Right).is_down {
            direction += Vector3::unit_x();
        }
        if direction.is_zero() {
            direction
        } else {
            direction.normalize()
        }
    }
}
