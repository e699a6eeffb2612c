//! Geometry document (OBJ) line dispatcher
//!
//! Scans `v`, `vt`, `vn`, `f` and `mtllib` directives into append-only
//! attribute pools and a triangle list. Face indices are kept unresolved so a
//! face may reference pool entries declared further down the document; the
//! [`MeshBuilder`](crate::MeshBuilder) resolves them once the scan is done.
use std::io::{self, BufRead};

use log::{debug, trace, warn};
use nalgebra::{Vector2, Vector3};

use crate::error::{Diagnostic, LoadError, ParseError};
use crate::face::parse_face_refs;
use crate::geometry::Triangle;
use crate::scalar::{parse_vector2, parse_vector3};
use crate::tokenizer::tokenize;
use crate::triangulate::triangulate;

/// Attribute pools and triangulated faces of one geometry document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawGeometryDocument {
    pub positions: Vec<Vector3<f32>>,
    pub texcoords: Vec<Vector2<f32>>,
    pub normals: Vec<Vector3<f32>>,
    /// Already triangle-granular: polygons are fanned out while scanning
    pub triangles: Vec<Triangle>,
    /// File names given by `mtllib` directives, in document order
    pub material_libraries: Vec<String>,
}

impl RawGeometryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

/// Counts gathered while scanning. Purely informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanSummary {
    pub positions: usize,
    pub texcoords: usize,
    pub normals: usize,
    pub triangles: usize,
    /// Blank and comment lines
    pub skipped_lines: usize,
    pub ignored_directives: usize,
    /// Face lines with fewer than three references
    pub dropped_faces: usize,
}

/// Result of scanning a geometry document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedGeometry {
    pub document: RawGeometryDocument,
    pub summary: ScanSummary,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedGeometry {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Scan a geometry document held in memory.
///
/// Malformed lines never abort the scan; they are skipped and reported in
/// [`ParsedGeometry::diagnostics`].
pub fn parse_obj(input: &str) -> ParsedGeometry {
    let mut scanner = GeometryScanner::default();
    for (index, line) in input.lines().enumerate() {
        scanner.scan_line(index + 1, line);
    }
    scanner.finish()
}

/// Scan a geometry document from a buffered stream.
pub fn parse_obj_reader<R: BufRead>(reader: R) -> Result<ParsedGeometry, LoadError> {
    let mut scanner = GeometryScanner::default();
    for_each_line(reader, |line_number, line| scanner.scan_line(line_number, line))?;
    Ok(scanner.finish())
}

/// Feed every line of `reader` to `visit` with its one-based line number.
///
/// Bytes that are not valid UTF-8 are replaced rather than failing the whole
/// stream; only real I/O errors are returned.
pub(crate) fn for_each_line<R: BufRead>(
    mut reader: R,
    mut visit: impl FnMut(usize, &str),
) -> io::Result<()> {
    let mut buf = Vec::new();
    let mut line_number = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        line_number += 1;

        let bytes = buf.strip_suffix(b"\n").unwrap_or(&buf);
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
        visit(line_number, &String::from_utf8_lossy(bytes));
    }
}

#[derive(Default)]
struct GeometryScanner {
    document: RawGeometryDocument,
    summary: ScanSummary,
    diagnostics: Vec<Diagnostic>,
}

impl GeometryScanner {
    fn scan_line(&mut self, line_number: usize, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            self.summary.skipped_lines += 1;
            return;
        }

        let (directive, rest) = split_directive(line);
        let tokens = tokenize(rest);

        let result = match directive {
            "v" => parse_vector3(&tokens, 0).map(|v| self.document.positions.push(v)),
            // `w` is accepted and dropped
            "vt" => parse_vector2(&tokens, 0).map(|vt| self.document.texcoords.push(vt)),
            "vn" => parse_vector3(&tokens, 0).map(|vn| self.document.normals.push(vn)),
            "f" => self.scan_face(&tokens),
            "mtllib" => self.scan_material_library(tokens),
            _ => {
                debug!("line {line_number}: ignoring unsupported directive \"{directive}\"");
                self.summary.ignored_directives += 1;
                Ok(())
            }
        };

        if let Err(error) = result {
            let diagnostic = Diagnostic {
                line: line_number,
                directive: directive.to_string(),
                error,
            };
            warn!("skipping geometry {diagnostic}");
            self.diagnostics.push(diagnostic);
        }
    }

    fn scan_face(&mut self, tokens: &[String]) -> Result<(), ParseError> {
        let polygon = parse_face_refs(tokens)?;
        if polygon.len() < 3 {
            self.summary.dropped_faces += 1;
            return Err(ParseError::EmptyFace {
                count: polygon.len(),
            });
        }
        self.document.triangles.extend(triangulate(&polygon));
        Ok(())
    }

    fn scan_material_library(&mut self, tokens: Vec<String>) -> Result<(), ParseError> {
        if tokens.is_empty() {
            return Err(ParseError::InsufficientTokens {
                expected: 1,
                found: 0,
            });
        }
        self.document.material_libraries.extend(tokens);
        Ok(())
    }

    fn finish(mut self) -> ParsedGeometry {
        self.summary.positions = self.document.positions.len();
        self.summary.texcoords = self.document.texcoords.len();
        self.summary.normals = self.document.normals.len();
        self.summary.triangles = self.document.triangles.len();

        trace!(
            "geometry scan: {} positions, {} texcoords, {} normals, {} triangles",
            self.summary.positions,
            self.summary.texcoords,
            self.summary.normals,
            self.summary.triangles,
        );

        ParsedGeometry {
            document: self.document,
            summary: self.summary,
            diagnostics: self.diagnostics,
        }
    }
}

/// Split a trimmed, non-empty line into its keyword and argument remainder.
pub(crate) fn split_directive(line: &str) -> (&str, &str) {
    match line.split_once(|c: char| c.is_ascii_whitespace()) {
        Some((directive, rest)) => (directive, rest.trim_start()),
        None => (line, ""),
    }
}
