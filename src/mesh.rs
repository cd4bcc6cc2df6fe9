//! Model-file loading.
//!
//! This is the boundary with the on-disk mesh format: OBJ files are parsed
//! with `tobj` into [`MeshData`] (float positions, `u32` indices, one entry
//! per shape). Conversion to fixed-point and validation of the index bounds
//! happen when the scene takes ownership (see [`crate::scene::Scene`]).

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Geometry of one parsed shape.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub name: String,
    /// Three components per vertex.
    pub positions: Vec<f32>,
    /// Three indices per triangle.
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Checks the triangle-list invariants.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.positions.len() % 3 != 0 {
            return Err(LoadError::PositionCountNotMultipleOfThree {
                shape: self.name.clone(),
                count: self.positions.len(),
            });
        }
        if self.indices.len() % 3 != 0 {
            return Err(LoadError::IndexCountNotMultipleOfThree {
                shape: self.name.clone(),
                count: self.indices.len(),
            });
        }
        let vertex_count = self.vertex_count();
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(LoadError::InvalidIndex {
                shape: self.name.clone(),
                index,
                vertex_count,
            });
        }
        Ok(())
    }
}

/// Why a mesh source could not be turned into models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The file could not be opened or read.
    Io(String),
    /// The loader rejected the file contents.
    Parse(String),
    PositionCountNotMultipleOfThree { shape: String, count: usize },
    IndexCountNotMultipleOfThree { shape: String, count: usize },
    InvalidIndex {
        shape: String,
        index: u32,
        vertex_count: usize,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(msg) => write!(f, "I/O error: {}", msg),
            LoadError::Parse(msg) => write!(f, "Parse error: {}", msg),
            LoadError::PositionCountNotMultipleOfThree { shape, count } => write!(
                f,
                "shape '{}' has {} position components, not a multiple of 3",
                shape, count
            ),
            LoadError::IndexCountNotMultipleOfThree { shape, count } => write!(
                f,
                "shape '{}' has {} indices, not a multiple of 3",
                shape, count
            ),
            LoadError::InvalidIndex {
                shape,
                index,
                vertex_count,
            } => write!(
                f,
                "shape '{}' references vertex {} but has only {} vertices",
                shape, index, vertex_count
            ),
        }
    }
}

impl std::error::Error for LoadError {}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
    }
}

/// Load every shape of an OBJ file.
///
/// Material libraries are resolved against `material_base`. They are not
/// needed for rendering; a missing or broken library is logged and skipped.
pub fn load_obj(
    path: impl AsRef<Path>,
    material_base: impl AsRef<Path>,
) -> Result<Vec<MeshData>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| LoadError::Io(format!("{}: {}", path.display(), e)))?;
    let meshes = load_obj_buf(&mut BufReader::new(file), material_base)?;
    log::info!("Loaded {} shape(s) from {}", meshes.len(), path.display());
    Ok(meshes)
}

/// Load every shape of an OBJ document from a reader.
pub fn load_obj_buf<R: BufRead>(
    reader: &mut R,
    material_base: impl AsRef<Path>,
) -> Result<Vec<MeshData>, LoadError> {
    let base = material_base.as_ref();
    let (models, materials) =
        tobj::load_obj_buf(reader, &load_options(), |p| tobj::load_mtl(base.join(p)))
            .map_err(|e| LoadError::Parse(e.to_string()))?;

    if let Err(e) = materials {
        log::warn!("Ignoring material library under {}: {}", base.display(), e);
    }

    Ok(models
        .into_iter()
        .map(|m| MeshData {
            name: m.name,
            positions: m.mesh.positions,
            indices: m.mesh.indices,
        })
        .collect())
}

/// Cube spanning `-1..1` on every axis: 8 vertices, 12 triangles,
/// counter-clockwise when seen from outside.
pub fn unit_cube() -> MeshData {
    #[rustfmt::skip]
    let positions = vec![
        -1.0, -1.0, -1.0,
         1.0, -1.0, -1.0,
         1.0,  1.0, -1.0,
        -1.0,  1.0, -1.0,
        -1.0, -1.0,  1.0,
         1.0, -1.0,  1.0,
         1.0,  1.0,  1.0,
        -1.0,  1.0,  1.0,
    ];
    #[rustfmt::skip]
    let indices = vec![
        // +Z
        4, 5, 6,  4, 6, 7,
        // -Z
        1, 0, 3,  1, 3, 2,
        // +X
        5, 1, 2,  5, 2, 6,
        // -X
        0, 4, 7,  0, 7, 3,
        // +Y
        7, 6, 2,  7, 2, 3,
        // -Y
        0, 1, 5,  0, 5, 4,
    ];
    MeshData {
        name: "cube".to_string(),
        positions,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const QUAD_OBJ: &str = "\
o quad
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
f 1 2 3 4
";

    #[test]
    fn parses_and_triangulates_quad() {
        let meshes = load_obj_buf(&mut Cursor::new(QUAD_OBJ), ".").unwrap();
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].name, "quad");
        assert_eq!(meshes[0].vertex_count(), 4);
        assert_eq!(meshes[0].triangle_count(), 2);
        assert!(meshes[0].validate().is_ok());
    }

    #[test]
    fn missing_material_library_is_not_fatal() {
        let obj = format!("mtllib missing.mtl\n{}", QUAD_OBJ);
        let meshes = load_obj_buf(&mut Cursor::new(obj), "/nonexistent").unwrap();
        assert_eq!(meshes.len(), 1);
    }

    #[test]
    fn rejects_out_of_range_face() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n";
        assert!(matches!(
            load_obj_buf(&mut Cursor::new(obj), "."),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_obj("/nonexistent/model.obj", "/nonexistent"),
            Err(LoadError::Io(_))
        ));
    }

    #[test]
    fn validate_catches_bad_indices() {
        let mut mesh = unit_cube();
        assert!(mesh.validate().is_ok());
        mesh.indices[5] = 8;
        assert_eq!(
            mesh.validate(),
            Err(LoadError::InvalidIndex {
                shape: "cube".to_string(),
                index: 8,
                vertex_count: 8
            })
        );
        mesh.indices.pop();
        assert!(matches!(
            mesh.validate(),
            Err(LoadError::IndexCountNotMultipleOfThree { .. })
        ));
    }

    #[test]
    fn cube_has_expected_size() {
        let cube = unit_cube();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.triangle_count(), 12);
    }
}
