//! Per-object placement.
//!
//! Every scene object carries a position and optionally an Euler rotation (in
//! degrees) and a scale. Missing rotation or scale means identity; both are
//! fixed when the scene is built.

use cgmath::{Deg, Matrix4, Vector3};

/// Position, optional Euler rotation in degrees and optional scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Option<Vector3<f32>>,
    pub scale: Option<Vector3<f32>>,
}

impl Transform {
    /// Placed at `position` with no rotation and no scale.
    pub fn at(position: impl Into<Vector3<f32>>) -> Self {
        Self {
            position: position.into(),
            rotation: None,
            scale: None,
        }
    }

    pub fn with_rotation(mut self, degrees: impl Into<Vector3<f32>>) -> Self {
        self.rotation = Some(degrees.into());
        self
    }

    pub fn with_scale(mut self, scale: impl Into<Vector3<f32>>) -> Self {
        self.scale = Some(scale.into());
        self
    }

    /// Model matrix: translate, then rotate about X, Y and Z in that order,
    /// then scale. Each step post-multiplies, so scale is applied to the
    /// vertex first and translation last.
    pub fn to_matrix(&self) -> Matrix4<f32> {
        let mut model = Matrix4::from_translation(self.position);
        if let Some(rotation) = self.rotation {
            model = model
                * Matrix4::from_angle_x(Deg(rotation.x))
                * Matrix4::from_angle_y(Deg(rotation.y))
                * Matrix4::from_angle_z(Deg(rotation.z));
        }
        if let Some(scale) = self.scale {
            model = model * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z);
        }
        model
    }
}

impl From<Vector3<f32>> for Transform {
    fn from(position: Vector3<f32>) -> Self {
        Transform::at(position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::at([0.0, 0.0, 0.0])
    }
}
