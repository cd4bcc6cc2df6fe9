//! A deterministic fixed-point software rasterizer.
//!
//! Every stage after mesh loading runs on Q16.16 integers, so a scene
//! rendered with the same camera produces bit-identical pixels on every
//! platform. SDL2 is used only by the optional `viewer` feature to show
//! frames on screen.
//!
//! # Quick Start
//!
//! ```no_run
//! use fixrast::prelude::*;
//!
//! let mut scene = Scene::new();
//! let cubes = scene.add_meshes(vec![unit_cube()])?;
//! scene.add_instance(cubes.first)?;
//!
//! let mut renderer = Renderer::new(1024, 768);
//! renderer.render_scene(&scene, &Camera::default());
//! renderer.framebuffer().to_rgba_image().save("cube.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod camera;
pub mod clipper;
pub mod colors;
pub mod config;
pub mod math;
pub mod mesh;
pub mod projection;
pub mod render;
pub mod renderer;
pub mod scene;
pub mod transform;
#[cfg(feature = "viewer")]
pub mod window;

pub use camera::{Camera, CameraError};
pub use mesh::{LoadError, MeshData};
pub use projection::Projection;
pub use renderer::{FrameStats, Renderer};
pub use scene::{InstanceId, ModelId, ModelRange, Scene, SceneError};
pub use transform::Transform;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::camera::{Camera, CameraError};
    pub use crate::projection::Projection;
    pub use crate::transform::Transform;

    // Math
    pub use crate::math::fixed::Fixed;
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;

    // Scene
    pub use crate::mesh::{unit_cube, MeshData};
    pub use crate::scene::{InstanceId, ModelId, Scene};

    // Rendering
    pub use crate::render::{PixelFormat, SampleCount};
    pub use crate::renderer::{FrameStats, Renderer};

    #[cfg(feature = "viewer")]
    pub use crate::window::{FpsCounter, Window, WindowEvent};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::clipper::{ScreenTriangle, ScreenVertex};
    pub use crate::render::{EdgeFunctionRasterizer, FrameBuffer, Rasterizer, SampleCount};
}
