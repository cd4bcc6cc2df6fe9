//! TOML configuration for the `fixrast` binary.
//!
//! Every section and key is optional; missing values fall back to the
//! defaults below.
//!
//! ```toml
//! [framebuffer]
//! width = 1024
//! height = 768
//! samples = 4
//!
//! [scene]
//! model = "assets/cube/cube.obj"
//!
//! [camera]
//! eye = [5.0, 5.0, 5.0]
//! fov_degrees = 70.0
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::camera::{Camera, CameraError};
use crate::colors;
use crate::math::vec3::Vec3;
use crate::projection::Projection;
use crate::render::SampleCount;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramebufferSection {
    pub width: u32,
    pub height: u32,
    pub samples: u32,
    pub clear_color: u32,
}

impl Default for FramebufferSection {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            samples: 1,
            clear_color: colors::BACKGROUND,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSection {
    /// OBJ file to load. Empty selects the built-in unit cube.
    pub model: PathBuf,
    /// Directory `mtllib` references resolve against. Defaults to the
    /// model's own directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_base: Option<PathBuf>,
    pub instance_color: u32,
    pub backface_culling: bool,
}

impl Default for SceneSection {
    fn default() -> Self {
        Self {
            model: PathBuf::new(),
            material_base: None,
            instance_color: colors::FILL,
            backface_culling: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSection {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub up: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSection {
    fn default() -> Self {
        Self {
            eye: [5.0, 5.0, 5.0],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            fov_degrees: 70.0,
            near: 0.01,
            far: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub png: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            png: PathBuf::from("output.png"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub framebuffer: FramebufferSection,
    pub scene: SceneSection,
    pub camera: CameraSection,
    pub output: OutputSection,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {}", e),
            ConfigError::Serialize(e) => write!(f, "failed to serialize config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Serialize(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl ViewerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fb = &self.framebuffer;
        if fb.width == 0 || fb.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "framebuffer size {}x{} is empty",
                fb.width, fb.height
            )));
        }
        self.sample_count()?;
        Ok(())
    }

    pub fn sample_count(&self) -> Result<SampleCount, ConfigError> {
        SampleCount::from_count(self.framebuffer.samples).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "unsupported sample count {} (expected 1 or 4)",
                self.framebuffer.samples
            ))
        })
    }

    /// Model path, or `None` for the built-in cube.
    pub fn model_path(&self) -> Option<&Path> {
        if self.scene.model.as_os_str().is_empty() {
            None
        } else {
            Some(&self.scene.model)
        }
    }

    pub fn material_base(&self) -> PathBuf {
        match (&self.scene.material_base, self.model_path()) {
            (Some(base), _) => base.clone(),
            (None, Some(model)) => model.parent().map(Path::to_path_buf).unwrap_or_default(),
            (None, None) => PathBuf::new(),
        }
    }

    /// Camera described by the `[camera]` section, with the aspect ratio
    /// taken from the framebuffer size.
    pub fn camera(&self) -> Result<Camera, CameraError> {
        let c = &self.camera;
        let aspect = self.framebuffer.width as f32 / self.framebuffer.height as f32;
        let projection = Projection::from_degrees(c.fov_degrees, aspect, c.near, c.far)?;
        let vec = |v: [f32; 3]| Vec3::from_f32(v[0], v[1], v[2]);
        Camera::new(vec(c.eye), vec(c.target), vec(c.up), projection)
    }
}
