//! Geometry primitives shared by the parser and the mesh builder
use nalgebra::{Vector2, Vector3};

/// One corner of a polygon: zero-based indices into the attribute pools.
///
/// The position index is always present. Texture coordinate and normal slots
/// are `None` when the source omitted them (`"5//2"`, `"9"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceVertexRef {
    pub position: i32,
    pub texcoord: Option<i32>,
    pub normal: Option<i32>,
}

impl FaceVertexRef {
    pub fn new(position: i32, texcoord: Option<i32>, normal: Option<i32>) -> Self {
        Self {
            position,
            texcoord,
            normal,
        }
    }

    /// Identity used to deduplicate vertices in the mesh builder
    pub fn key(&self) -> VertexKey {
        VertexKey(self.position, self.texcoord, self.normal)
    }
}

/// Composite deduplication key: the literal index triple of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexKey(pub i32, pub Option<i32>, pub Option<i32>);

/// Three face-vertex references in winding order
pub type Triangle = [FaceVertexRef; 3];

/// A resolved vertex with position, texture coordinate and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vector3<f32>,
    pub texcoord: Vector2<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Vector3<f32>, texcoord: Vector2<f32>, normal: Vector3<f32>) -> Self {
        Self {
            position,
            texcoord,
            normal,
        }
    }
}

/// A GPU-ready mesh: unique vertices plus a triangle index buffer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndexedMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl IndexedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate the index buffer one triangle at a time
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|triangle| [triangle[0], triangle[1], triangle[2]])
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_matches_index_triple() {
        let reference = FaceVertexRef::new(4, None, Some(1));
        assert_eq!(reference.key(), VertexKey(4, None, Some(1)));
    }

    #[test]
    fn test_keys_distinguish_unset_from_zero() {
        let unset = FaceVertexRef::new(0, None, Some(0));
        let zero = FaceVertexRef::new(0, Some(0), Some(0));
        assert_ne!(unset.key(), zero.key());
    }

    #[test]
    fn test_triangles_iterator() {
        let mesh = IndexedMesh {
            vertices: Vec::new(),
            indices: vec![0, 1, 2, 0, 2, 3],
        };
        assert_eq!(mesh.triangle_count(), 2);
        let triangles: Vec<_> = mesh.triangles().collect();
        assert_eq!(triangles, vec![[0, 1, 2], [0, 2, 3]]);
    }
}
