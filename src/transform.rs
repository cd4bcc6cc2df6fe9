//! Instance world transform.
//!
//! Provides a fixed-point [`Transform`] with a fluent API for managing
//! position, rotation (Euler angles), and scale.

use crate::math::{fixed::Fixed, mat4::Mat4, vec3::Vec3};

/// Position, rotation (Euler angles, radians) and scale of an instance.
///
/// Mutating methods return `&mut Self` for chaining:
///
/// ```ignore
/// transform
///     .set_position_f32(5.0, 2.0, 0.0)
///     .rotate_y(Fixed::from_f32(0.1))
///     .set_scale_uniform(Fixed::from_int(2));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3, // x=pitch, y=yaw, z=roll
    scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity transform (position 0, rotation 0, scale 1).
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure translation.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    // ============ Position ============

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.position = position;
        self
    }

    /// Set the position from float components (truncated to fixed point).
    pub fn set_position_f32(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.position = Vec3::from_f32(x, y, z);
        self
    }

    pub fn translate(&mut self, delta: Vec3) -> &mut Self {
        self.position = self.position + delta;
        self
    }

    // ============ Rotation ============

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Vec3) -> &mut Self {
        self.rotation = rotation;
        self
    }

    /// Rotate around the X axis (pitch).
    pub fn rotate_x(&mut self, angle: Fixed) -> &mut Self {
        self.rotation.x += angle;
        self
    }

    /// Rotate around the Y axis (yaw).
    pub fn rotate_y(&mut self, angle: Fixed) -> &mut Self {
        self.rotation.y += angle;
        self
    }

    /// Rotate around the Z axis (roll).
    pub fn rotate_z(&mut self, angle: Fixed) -> &mut Self {
        self.rotation.z += angle;
        self
    }

    // ============ Scale ============

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec3) -> &mut Self {
        self.scale = scale;
        self
    }

    pub fn set_scale_uniform(&mut self, s: Fixed) -> &mut Self {
        self.scale = Vec3::new(s, s, s);
        self
    }

    // ============ Matrix Generation ============

    /// Model-to-world matrix.
    ///
    /// Order: Translation * RotationX * RotationY * RotationZ * Scale
    /// (scale applied first, then rotations, then translation). Zero angles
    /// contribute no rotation factor, so the default transform yields the
    /// exact identity.
    pub fn to_matrix(&self) -> Mat4 {
        let mut m = Mat4::translation(self.position);
        for (angle, rotation) in [
            (self.rotation.x, Mat4::rotation_x as fn(Fixed) -> Mat4),
            (self.rotation.y, Mat4::rotation_y),
            (self.rotation.z, Mat4::rotation_z),
        ] {
            if angle != Fixed::ZERO {
                m = m * rotation(angle);
            }
        }
        m * Mat4::scaling(self.scale)
    }

    /// True when [`Transform::to_matrix`] is the identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}
