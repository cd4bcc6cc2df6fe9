//! Perspective projection parameters.
//!
//! The [`Projection`] struct is the single source of truth for the perspective
//! parameters (FOV, aspect ratio, near/far planes). Construction validates
//! them, so a `Projection` always describes a usable frustum.

use crate::camera::CameraError;
use crate::math::{fixed::Fixed, mat4::Mat4};

/// Validated perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    /// Vertical field of view in radians.
    fov_y: Fixed,
    /// Aspect ratio (width / height).
    aspect_ratio: Fixed,
    z_near: Fixed,
    z_far: Fixed,
}

impl Default for Projection {
    /// 70 degree vertical FOV, 4:3, planes at 0.01 and 10.
    fn default() -> Self {
        Self {
            fov_y: Fixed::from_f32(70.0f32.to_radians()),
            aspect_ratio: Fixed::from_int(4) / Fixed::from_int(3),
            z_near: Fixed::from_f32(0.01),
            z_far: Fixed::from_int(10),
        }
    }
}

impl Projection {
    /// Creates a projection, rejecting frustums that cannot be built.
    ///
    /// # Arguments
    /// * `fov_y` - Vertical field of view in radians, in `(0, PI)`
    /// * `aspect_ratio` - Width divided by height, `> 0`
    /// * `z_near` - Near plane distance, `> 0`
    /// * `z_far` - Far plane distance, `> z_near`
    pub fn new(
        fov_y: Fixed,
        aspect_ratio: Fixed,
        z_near: Fixed,
        z_far: Fixed,
    ) -> Result<Self, CameraError> {
        if z_near <= Fixed::ZERO {
            return Err(CameraError::InvalidFrustum("near plane must be positive"));
        }
        if z_near >= z_far {
            return Err(CameraError::InvalidFrustum(
                "near plane must be closer than far plane",
            ));
        }
        if aspect_ratio <= Fixed::ZERO {
            return Err(CameraError::InvalidFrustum("aspect ratio must be positive"));
        }
        if fov_y <= Fixed::ZERO || fov_y >= Fixed::PI {
            return Err(CameraError::InvalidFrustum(
                "field of view must lie strictly between 0 and pi",
            ));
        }
        Ok(Self {
            fov_y,
            aspect_ratio,
            z_near,
            z_far,
        })
    }

    /// Creates a projection from float parameters, FOV in degrees.
    pub fn from_degrees(
        fov_y_degrees: f32,
        aspect_ratio: f32,
        z_near: f32,
        z_far: f32,
    ) -> Result<Self, CameraError> {
        Self::new(
            Fixed::from_f32(fov_y_degrees.to_radians()),
            Fixed::from_f32(aspect_ratio),
            Fixed::from_f32(z_near),
            Fixed::from_f32(z_far),
        )
    }

    pub fn fov_y(&self) -> Fixed {
        self.fov_y
    }

    pub fn aspect_ratio(&self) -> Fixed {
        self.aspect_ratio
    }

    pub fn z_near(&self) -> Fixed {
        self.z_near
    }

    pub fn z_far(&self) -> Fixed {
        self.z_far
    }

    /// Right-handed perspective matrix with OpenGL depth range.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect_ratio, self.z_near, self.z_far)
    }
}
