//! Look-at camera.
//!
//! # Coordinate System
//!
//! Uses a **right-handed** coordinate system:
//! - X: positive right
//! - Y: positive up
//! - Z: positive toward the viewer (the camera looks down -Z)
//!
//! The camera is an explicit value passed to every render call. It caches the
//! view, projection and combined view-projection matrices; setters recompute
//! them and leave the camera untouched when the new parameters are rejected.

use std::fmt;

use crate::math::fixed::Fixed;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::projection::Projection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraError {
    /// `eye == target`, zero `up`, or `up` parallel to the view direction.
    DegenerateCamera,
    /// The perspective parameters do not describe a frustum.
    InvalidFrustum(&'static str),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::DegenerateCamera => write!(f, "degenerate camera basis"),
            CameraError::InvalidFrustum(reason) => write!(f, "invalid frustum: {}", reason),
        }
    }
}

impl std::error::Error for CameraError {}

#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vec3,
    target: Vec3,
    up: Vec3,
    projection: Projection,

    view: Mat4,
    view_projection: Mat4,
}

impl Default for Camera {
    /// Looking from (5, 5, 5) at the origin with +Y up and the default
    /// [`Projection`].
    fn default() -> Self {
        let eye = Vec3::from_ints(5, 5, 5);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::UNIT_Y).unwrap_or_default();
        let projection = Projection::default();
        Self {
            eye,
            target: Vec3::ZERO,
            up: Vec3::UNIT_Y,
            projection,
            view,
            view_projection: projection.matrix() * view,
        }
    }
}

impl Camera {
    /// Creates a camera from look-at parameters and a projection.
    pub fn new(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        projection: Projection,
    ) -> Result<Self, CameraError> {
        let mut camera = Self {
            projection,
            ..Self::default()
        };
        camera.set_look_at(eye, target, up)?;
        Ok(camera)
    }

    /// Points the camera at `target` from `eye`.
    pub fn set_look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) -> Result<(), CameraError> {
        let view = Mat4::look_at_rh(eye, target, up).ok_or(CameraError::DegenerateCamera)?;
        self.eye = eye;
        self.target = target;
        self.up = up;
        self.view = view;
        self.update_view_projection();
        Ok(())
    }

    /// Sets an OpenGL-style perspective projection (`fov_y` in radians).
    pub fn set_perspective(
        &mut self,
        fov_y: Fixed,
        aspect_ratio: Fixed,
        z_near: Fixed,
        z_far: Fixed,
    ) -> Result<(), CameraError> {
        let projection = Projection::new(fov_y, aspect_ratio, z_near, z_far)?;
        self.set_projection(projection);
        Ok(())
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
        self.update_view_projection();
    }

    fn update_view_projection(&mut self) {
        self.view_projection = self.projection.matrix() * self.view;
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix()
    }

    /// `projection * view`.
    pub fn view_projection(&self) -> Mat4 {
        self.view_projection
    }
}
