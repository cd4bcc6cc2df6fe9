//! Append-only scene storage.
//!
//! The scene owns two tables, models (immutable fixed-point meshes) and
//! instances (a model reference plus placement and color). Both tables are
//! preallocated to their capacity and only ever grow; ids are plain indices
//! handed out in append order and stay valid for the life of the scene.

use std::fmt;
use std::io::BufRead;
use std::path::Path;

use crate::colors;
use crate::math::vec3::Vec3;
use crate::mesh::{self, LoadError, MeshData};
use crate::transform::Transform;

pub const MAX_MODELS: usize = 256;
pub const MAX_INSTANCES: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(u32);

impl ModelId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u32);

impl InstanceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Contiguous run of models appended by one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelRange {
    pub first: ModelId,
    pub count: usize,
}

impl ModelRange {
    pub fn ids(&self) -> impl Iterator<Item = ModelId> {
        let first = self.first.0;
        (0..self.count as u32).map(move |i| ModelId(first + i))
    }
}

/// Immutable triangle mesh in fixed-point model space.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    name: String,
    positions: Vec<Vec3>,
    indices: Vec<u32>,
}

impl Model {
    /// Converts loader output, checking the triangle-list invariants.
    pub fn from_mesh(mesh: MeshData) -> Result<Self, LoadError> {
        mesh.validate()?;
        let positions = mesh
            .positions
            .chunks_exact(3)
            .map(|p| Vec3::from_f32(p[0], p[1], p[2]))
            .collect();
        Ok(Self {
            name: mesh.name,
            positions,
            indices: mesh.indices,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

/// One placement of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instance {
    pub model: ModelId,
    pub transform: Transform,
    /// Flat ARGB fragment color.
    pub color: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Models,
    Instances,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Models => write!(f, "model"),
            Table::Instances => write!(f, "instance"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    Load(LoadError),
    CapacityExceeded { table: Table, capacity: usize },
    InvalidReference(ModelId),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Load(e) => write!(f, "failed to load models: {}", e),
            SceneError::CapacityExceeded { table, capacity } => {
                write!(f, "{} table is full (capacity {})", table, capacity)
            }
            SceneError::InvalidReference(id) => write!(f, "no model with id {}", id.0),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Load(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LoadError> for SceneError {
    fn from(e: LoadError) -> Self {
        SceneError::Load(e)
    }
}

#[derive(Debug)]
pub struct Scene {
    models: Vec<Model>,
    instances: Vec<Instance>,
    max_models: usize,
    max_instances: usize,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Empty scene with the default table capacities.
    pub fn new() -> Self {
        Self::with_capacity(MAX_MODELS, MAX_INSTANCES)
    }

    pub fn with_capacity(max_models: usize, max_instances: usize) -> Self {
        Self {
            models: Vec::with_capacity(max_models),
            instances: Vec::with_capacity(max_instances),
            max_models,
            max_instances,
        }
    }

    /// Loads every shape of an OBJ file as a model.
    ///
    /// Nothing is appended unless every shape converts and fits.
    pub fn add_models(
        &mut self,
        path: impl AsRef<Path>,
        material_base: impl AsRef<Path>,
    ) -> Result<ModelRange, SceneError> {
        let meshes = mesh::load_obj(path, material_base)?;
        self.add_meshes(meshes)
    }

    /// Same as [`Scene::add_models`] for OBJ text already in memory.
    pub fn add_models_from_obj_buf<R: BufRead>(
        &mut self,
        reader: &mut R,
        material_base: impl AsRef<Path>,
    ) -> Result<ModelRange, SceneError> {
        let meshes = mesh::load_obj_buf(reader, material_base)?;
        self.add_meshes(meshes)
    }

    /// Appends one model per mesh, all or nothing.
    pub fn add_meshes(&mut self, meshes: Vec<MeshData>) -> Result<ModelRange, SceneError> {
        if self.models.len() + meshes.len() > self.max_models {
            return Err(SceneError::CapacityExceeded {
                table: Table::Models,
                capacity: self.max_models,
            });
        }
        let models = meshes
            .into_iter()
            .map(Model::from_mesh)
            .collect::<Result<Vec<_>, _>>()?;

        let range = ModelRange {
            first: ModelId(self.models.len() as u32),
            count: models.len(),
        };
        for (id, model) in range.ids().zip(&models) {
            log::info!(
                "Model {}: '{}' ({} vertices, {} triangles)",
                id.index(),
                model.name(),
                model.vertex_count(),
                model.triangle_count()
            );
        }
        self.models.extend(models);
        Ok(range)
    }

    /// Places a model with the identity transform and the default fill color.
    pub fn add_instance(&mut self, model: ModelId) -> Result<InstanceId, SceneError> {
        self.add_instance_with(model, Transform::default(), colors::FILL)
    }

    pub fn add_instance_with(
        &mut self,
        model: ModelId,
        transform: Transform,
        color: u32,
    ) -> Result<InstanceId, SceneError> {
        if model.index() >= self.models.len() {
            return Err(SceneError::InvalidReference(model));
        }
        if self.instances.len() >= self.max_instances {
            return Err(SceneError::CapacityExceeded {
                table: Table::Instances,
                capacity: self.max_instances,
            });
        }
        let id = InstanceId(self.instances.len() as u32);
        self.instances.push(Instance {
            model,
            transform,
            color,
        });
        Ok(id)
    }

    pub fn model(&self, id: ModelId) -> Option<&Model> {
        self.models.get(id.index())
    }

    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(id.index())
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn model_capacity(&self) -> usize {
        self.max_models
    }

    pub fn instance_capacity(&self) -> usize {
        self.max_instances
    }
}
