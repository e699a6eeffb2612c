//! objmesh core library - OBJ/MTL parsing and indexed mesh building
//!
//! Text goes through the tokenizer and numeric parsers into a
//! [`RawGeometryDocument`]; the [`MeshBuilder`] then deduplicates vertices and
//! emits an [`IndexedMesh`]. Material documents are parsed independently into
//! a [`MaterialLibrary`]. Nothing here opens files.

pub mod error;
pub mod face;
pub mod geometry;
pub mod mesh_builder;
pub mod mtl;
pub mod obj;
pub mod scalar;
pub mod tokenizer;
pub mod triangulate;

// Re-export commonly used types
pub use error::{Diagnostic, LoadError, ParseError, Pool, ResolutionError};
pub use geometry::{FaceVertexRef, IndexedMesh, Triangle, Vertex, VertexKey};
pub use mesh_builder::{build_mesh, MeshBuildOptions, MeshBuilder};
pub use mtl::{parse_mtl, parse_mtl_reader, MaterialLibrary, MaterialRecord};
pub use obj::{parse_obj, parse_obj_reader, ParsedGeometry, RawGeometryDocument, ScanSummary};
