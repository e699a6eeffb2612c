//! Thin driver around objmesh-core: locates and reads documents, runs the
//! pipeline and reports what came out of it.
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::{info, warn};
use objmesh_core::{
    parse_mtl_reader, parse_obj_reader, IndexedMesh, LoadError, MaterialLibrary, MeshBuildOptions,
    MeshBuilder, ParsedGeometry,
};
use thiserror::Error;

pub const USAGE: &str = "Usage: objmesh <file.obj> [--mtl <file.mtl>] [--flip-v]";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Command line configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub obj_path: PathBuf,
    /// Overrides the `mtllib` references of the geometry document
    pub mtl_path: Option<PathBuf>,
    pub flip_v: bool,
}

impl Args {
    /// Parse arguments, program name excluded.
    pub fn parse<I>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut obj_path = None;
        let mut mtl_path = None;
        let mut flip_v = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--mtl" => {
                    let path = args
                        .next()
                        .ok_or_else(|| CliError::Usage("--mtl requires a path".to_string()))?;
                    mtl_path = Some(PathBuf::from(path));
                }
                "--flip-v" => flip_v = true,
                flag if flag.starts_with("--") => {
                    return Err(CliError::Usage(format!("unknown option {flag}")));
                }
                _ if obj_path.is_none() => obj_path = Some(PathBuf::from(&arg)),
                _ => return Err(CliError::Usage(format!("unexpected argument {arg}"))),
            }
        }

        let obj_path = obj_path.ok_or_else(|| CliError::Usage("no OBJ file given".to_string()))?;
        Ok(Self {
            obj_path,
            mtl_path,
            flip_v,
        })
    }

    pub fn build_options(&self) -> MeshBuildOptions {
        MeshBuildOptions {
            flip_texcoord_v: self.flip_v,
        }
    }
}

/// Everything produced for one geometry file
#[derive(Debug)]
pub struct LoadReport {
    pub geometry: ParsedGeometry,
    pub mesh: IndexedMesh,
    pub materials: Vec<(PathBuf, MaterialLibrary)>,
}

impl LoadReport {
    pub fn log_summary(&self) {
        let summary = &self.geometry.summary;
        info!("=== Geometry scan ===");
        info!("positions: {}", summary.positions);
        info!("texture coordinates: {}", summary.texcoords);
        info!("normals: {}", summary.normals);
        info!("triangles: {}", summary.triangles);
        if !self.geometry.diagnostics.is_empty() {
            info!("skipped lines with problems: {}", self.geometry.diagnostics.len());
        }

        info!("=== Indexed mesh ===");
        info!("vertices: {}", self.mesh.vertices.len());
        info!("indices: {}", self.mesh.indices.len());

        for (path, library) in &self.materials {
            info!("=== Materials ({}) ===", path.display());
            for material in &library.materials {
                info!(
                    "{}: diffuse map {}, bump map {} (scale {})",
                    material.name,
                    material.diffuse_map.as_deref().unwrap_or("-"),
                    material.bump_map.as_deref().unwrap_or("-"),
                    material.bump_scale,
                );
            }
        }
    }
}

/// Read the geometry file and its material documents, then build the mesh.
pub fn load(args: &Args) -> Result<LoadReport, LoadError> {
    info!("Loading OBJ file: {}", args.obj_path.display());
    let geometry = parse_obj_reader(open(&args.obj_path)?)?;

    let mesh = MeshBuilder::with_options(args.build_options()).build(&geometry.document)?;

    let mut materials = Vec::new();
    match &args.mtl_path {
        Some(path) => materials.push((path.clone(), parse_mtl_reader(open(path)?)?)),
        None => {
            let base = args.obj_path.parent().unwrap_or_else(|| Path::new(""));
            for name in &geometry.document.material_libraries {
                let path = base.join(name);
                match open(&path) {
                    Ok(reader) => materials.push((path, parse_mtl_reader(reader)?)),
                    Err(err) => warn!("{err}"),
                }
            }
        }
    }

    Ok(LoadReport {
        geometry,
        mesh,
        materials,
    })
}

fn open(path: &Path) -> Result<BufReader<File>, LoadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|err| LoadError::unopenable(path, err))
}
