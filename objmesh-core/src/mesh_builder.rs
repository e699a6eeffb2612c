//! Vertex deduplication and index buffer construction
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use log::debug;
use nalgebra::{Vector2, Vector3};

use crate::error::{Pool, ResolutionError};
use crate::geometry::{FaceVertexRef, IndexedMesh, Vertex, VertexKey};
use crate::obj::RawGeometryDocument;

/// Options applied while materializing vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshBuildOptions {
    /// Store `1 - v` instead of `v` for texture coordinates
    pub flip_texcoord_v: bool,
}

/// Turns a [`RawGeometryDocument`] into an [`IndexedMesh`].
///
/// Every distinct `(position, texcoord, normal)` index triple becomes exactly
/// one vertex, stored in first-occurrence order. Any reference outside its
/// pool aborts the build; no partial mesh is returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshBuilder {
    options: MeshBuildOptions,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: MeshBuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> MeshBuildOptions {
        self.options
    }

    pub fn build(&self, document: &RawGeometryDocument) -> Result<IndexedMesh, ResolutionError> {
        let mut mesh = IndexedMesh::with_capacity(
            document.positions.len(),
            document.triangles.len() * 3,
        );
        let mut vertex_map: HashMap<VertexKey, u32> = HashMap::new();

        for triangle in &document.triangles {
            for reference in triangle {
                let index = match vertex_map.entry(reference.key()) {
                    Entry::Occupied(entry) => *entry.get(),
                    Entry::Vacant(entry) => {
                        let vertex = self.resolve(document, reference)?;
                        let index = u32::try_from(mesh.vertices.len()).map_err(|_| {
                            ResolutionError::TooManyVertices {
                                count: mesh.vertices.len() + 1,
                            }
                        })?;
                        mesh.vertices.push(vertex);
                        *entry.insert(index)
                    }
                };
                mesh.indices.push(index);
            }
        }

        debug!(
            "built mesh: {} unique vertices, {} indices from {} triangles",
            mesh.vertices.len(),
            mesh.indices.len(),
            document.triangles.len(),
        );
        Ok(mesh)
    }

    fn resolve(
        &self,
        document: &RawGeometryDocument,
        reference: &FaceVertexRef,
    ) -> Result<Vertex, ResolutionError> {
        let position = fetch(&document.positions, Pool::Position, reference.position)?;

        let mut texcoord = match reference.texcoord {
            Some(index) => fetch(&document.texcoords, Pool::Texcoord, index)?,
            None => Vector2::zeros(),
        };
        if self.options.flip_texcoord_v {
            texcoord.y = 1.0 - texcoord.y;
        }

        let normal = match reference.normal {
            Some(index) => fetch(&document.normals, Pool::Normal, index)?,
            None => Vector3::zeros(),
        };

        Ok(Vertex::new(position, texcoord, normal))
    }
}

/// Build with default options.
pub fn build_mesh(document: &RawGeometryDocument) -> Result<IndexedMesh, ResolutionError> {
    MeshBuilder::new().build(document)
}

fn fetch<T: Copy>(pool: &[T], kind: Pool, index: i32) -> Result<T, ResolutionError> {
    usize::try_from(index)
        .ok()
        .and_then(|slot| pool.get(slot))
        .copied()
        .ok_or(ResolutionError::IndexOutOfRange {
            pool: kind,
            index: i64::from(index),
            len: pool.len(),
        })
}
