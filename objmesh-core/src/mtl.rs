//! Material document (MTL) parser
use std::io::BufRead;

use log::{debug, warn};
use nalgebra::Vector3;

use crate::error::{Diagnostic, LoadError, ParseError};
use crate::obj::{for_each_line, split_directive};
use crate::scalar::{parse_scalar, parse_vector3};
use crate::tokenizer::tokenize;

/// Map option carrying the bump multiplier, e.g. `map_Bump -bm 2.9 normal.png`
const BUMP_SCALE_OPTION: &str = "-bm";

/// One `newmtl` block
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialRecord {
    pub name: String,

    /// `Ns`
    pub specular_exponent: f32,
    /// `Ni`, index of refraction
    pub optical_density: f32,
    /// `d`, 1 is fully opaque
    pub dissolve: f32,
    /// `illum`
    pub illumination: i32,

    /// `Ka`
    pub ambient: Vector3<f32>,
    /// `Kd`
    pub diffuse: Vector3<f32>,
    /// `Ks`
    pub specular: Vector3<f32>,
    /// `Ke`
    pub emissive: Vector3<f32>,

    pub diffuse_map: Option<String>,
    pub specular_map: Option<String>,
    pub emissive_map: Option<String>,
    pub specular_exponent_map: Option<String>,
    pub dissolve_map: Option<String>,
    /// `map_Bump` or `bump`
    pub bump_map: Option<String>,
    pub bump_scale: f32,
}

impl MaterialRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for MaterialRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            specular_exponent: 0.0,
            optical_density: 1.0,
            dissolve: 1.0,
            illumination: 2,
            ambient: Vector3::zeros(),
            diffuse: Vector3::zeros(),
            specular: Vector3::zeros(),
            emissive: Vector3::zeros(),
            diffuse_map: None,
            specular_map: None,
            emissive_map: None,
            specular_exponent_map: None,
            dissolve_map: None,
            bump_map: None,
            bump_scale: 1.0,
        }
    }
}

/// Materials of one document, in declaration order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaterialLibrary {
    pub materials: Vec<MaterialRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl MaterialLibrary {
    /// First material declared with `name`
    pub fn get(&self, name: &str) -> Option<&MaterialRecord> {
        self.materials.iter().find(|material| material.name == name)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// Parse a material document held in memory.
pub fn parse_mtl(input: &str) -> MaterialLibrary {
    let mut scanner = MaterialScanner::default();
    for (index, line) in input.lines().enumerate() {
        scanner.scan_line(index + 1, line);
    }
    scanner.finish()
}

/// Parse a material document from a buffered stream.
pub fn parse_mtl_reader<R: BufRead>(reader: R) -> Result<MaterialLibrary, LoadError> {
    let mut scanner = MaterialScanner::default();
    for_each_line(reader, |line_number, line| scanner.scan_line(line_number, line))?;
    Ok(scanner.finish())
}

#[derive(Default)]
struct MaterialScanner {
    current: Option<MaterialRecord>,
    library: MaterialLibrary,
}

impl MaterialScanner {
    fn scan_line(&mut self, line_number: usize, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return;
        }

        let (directive, rest) = split_directive(line);
        let tokens = tokenize(rest);

        let result = if directive == "newmtl" {
            self.begin(tokens)
        } else if let Some(material) = self.current.as_mut() {
            apply_directive(material, directive, &tokens)
        } else {
            debug!("line {line_number}: \"{directive}\" outside of a newmtl block, discarded");
            Ok(())
        };

        if let Err(error) = result {
            let diagnostic = Diagnostic {
                line: line_number,
                directive: directive.to_string(),
                error,
            };
            warn!("material {diagnostic}");
            self.library.diagnostics.push(diagnostic);
        }
    }

    fn begin(&mut self, tokens: Vec<String>) -> Result<(), ParseError> {
        self.flush();
        let name = tokens
            .into_iter()
            .next()
            .ok_or(ParseError::InsufficientTokens {
                expected: 1,
                found: 0,
            })?;
        self.current = Some(MaterialRecord::new(name));
        Ok(())
    }

    fn flush(&mut self) {
        if let Some(material) = self.current.take() {
            self.library.materials.push(material);
        }
    }

    fn finish(mut self) -> MaterialLibrary {
        self.flush();
        debug!("parsed {} materials", self.library.materials.len());
        self.library
    }
}

fn apply_directive(
    material: &mut MaterialRecord,
    directive: &str,
    tokens: &[String],
) -> Result<(), ParseError> {
    match directive {
        "Ns" => material.specular_exponent = first_scalar(tokens)?,
        "Ni" => material.optical_density = first_scalar(tokens)?,
        "d" => material.dissolve = first_scalar(tokens)?,
        "illum" => material.illumination = first_scalar(tokens)? as i32,
        "Ka" => material.ambient = parse_vector3(tokens, 0)?,
        "Kd" => material.diffuse = parse_vector3(tokens, 0)?,
        "Ks" => material.specular = parse_vector3(tokens, 0)?,
        "Ke" => material.emissive = parse_vector3(tokens, 0)?,
        "map_Kd" => parse_map(tokens, &mut material.diffuse_map, None)?,
        "map_Ks" => parse_map(tokens, &mut material.specular_map, None)?,
        "map_Ke" => parse_map(tokens, &mut material.emissive_map, None)?,
        "map_Ns" => parse_map(tokens, &mut material.specular_exponent_map, None)?,
        "map_d" => parse_map(tokens, &mut material.dissolve_map, None)?,
        "map_Bump" | "bump" => parse_map(
            tokens,
            &mut material.bump_map,
            Some(&mut material.bump_scale),
        )?,
        _ => debug!("ignoring material key \"{directive}\""),
    }
    Ok(())
}

fn first_scalar(tokens: &[String]) -> Result<f32, ParseError> {
    let token = tokens.first().ok_or(ParseError::InsufficientTokens {
        expected: 1,
        found: 0,
    })?;
    parse_scalar(token)
}

/// Option-then-filename scan over a map directive's arguments.
///
/// `-bm` consumes the next token as its value on every map key, but only a
/// bump map stores it. The last remaining non-empty token is the file name.
/// Whatever was parsed is applied even when an option value was bad; the
/// first such problem is returned afterwards.
fn parse_map(
    tokens: &[String],
    file: &mut Option<String>,
    bump_scale: Option<&mut f32>,
) -> Result<(), ParseError> {
    let mut filename = None;
    let mut scale = None;
    let mut error = None;

    let mut tokens = tokens.iter();
    while let Some(token) = tokens.next() {
        if token == BUMP_SCALE_OPTION {
            match tokens.next().map(|value| parse_scalar(value)) {
                Some(Ok(value)) => scale = Some(value),
                Some(Err(err)) => {
                    error.get_or_insert(err);
                }
                None => {
                    error.get_or_insert(ParseError::InsufficientTokens {
                        expected: 1,
                        found: 0,
                    });
                }
            }
        } else if !token.is_empty() {
            filename = Some(token.clone());
        }
    }

    if filename.is_some() {
        *file = filename;
    }
    if let (Some(target), Some(value)) = (bump_scale, scale) {
        *target = value;
    }

    match error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const HOUSE: &str = "newmtl HouseT3\n\
                         Ns 0.000000\n\
                         Ka 0.300000 0.300000 0.300000\n\
                         Ks 0.000000 0.000000 0.000000\n\
                         Ke 0.000000 0.000000 0.000000\n\
                         Ni 1.500000\n\
                         d 1.000000\n\
                         illum 1\n\
                         map_Kd HouseT3.png\n\
                         map_Bump -bm 2.900000 \"House T3N.png\"\n";

    #[test]
    fn test_parse_single_material() {
        let library = parse_mtl(HOUSE);
        assert!(library.diagnostics.is_empty());
        assert_eq!(library.len(), 1);

        let house = &library.materials[0];
        assert_eq!(house.name, "HouseT3");
        assert_relative_eq!(house.specular_exponent, 0.0);
        assert_relative_eq!(house.optical_density, 1.5);
        assert_relative_eq!(house.dissolve, 1.0);
        assert_eq!(house.illumination, 1);
        assert_relative_eq!(house.ambient, Vector3::new(0.3, 0.3, 0.3));
        assert_eq!(house.diffuse_map.as_deref(), Some("HouseT3.png"));
        assert_eq!(house.bump_map.as_deref(), Some("House T3N.png"));
        assert_relative_eq!(house.bump_scale, 2.9);
    }

    #[test]
    fn test_no_newmtl_yields_no_records() {
        let library = parse_mtl("# empty\nKd 1 1 1\nNs 10\n");
        assert!(library.is_empty());
        assert!(library.diagnostics.is_empty());
    }

    #[test]
    fn test_two_blocks_keep_their_own_fields() {
        let library = parse_mtl(
            "newmtl Red\n\
             Kd 1 0 0\n\
             map_Kd red.png\n\
             \n\
             newmtl Glass\n\
             d 0.25\n",
        );
        assert_eq!(library.len(), 2);

        let red = library.get("Red").unwrap();
        assert_relative_eq!(red.diffuse, Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(red.dissolve, 1.0);

        let glass = library.get("Glass").unwrap();
        assert_relative_eq!(glass.diffuse, Vector3::zeros());
        assert_relative_eq!(glass.dissolve, 0.25);
        assert_eq!(glass.diffuse_map, None);
    }

    #[test]
    fn test_defaults() {
        let library = parse_mtl("newmtl Plain\n");
        let plain = &library.materials[0];
        assert_eq!(plain, &MaterialRecord::new("Plain"));
        assert_eq!(plain.illumination, 2);
        assert_relative_eq!(plain.bump_scale, 1.0);
    }

    #[test]
    fn test_bump_alias_and_last_filename_wins() {
        let library = parse_mtl("newmtl A\nbump first.png second.png\n");
        let a = &library.materials[0];
        assert_eq!(a.bump_map.as_deref(), Some("second.png"));
        assert_relative_eq!(a.bump_scale, 1.0);
    }

    #[test]
    fn test_bump_scale_ignored_on_other_maps() {
        let library = parse_mtl("newmtl A\nmap_Kd -bm 3.0 diffuse.png\n");
        let a = &library.materials[0];
        assert_eq!(a.diffuse_map.as_deref(), Some("diffuse.png"));
        assert_relative_eq!(a.bump_scale, 1.0);
    }

    #[test]
    fn test_bad_bump_scale_reported_but_file_kept() {
        let library = parse_mtl("newmtl A\nmap_Bump -bm lots normal.png\n");
        let a = &library.materials[0];
        assert_eq!(a.bump_map.as_deref(), Some("normal.png"));
        assert_relative_eq!(a.bump_scale, 1.0);
        assert_eq!(
            library.diagnostics[0].error,
            ParseError::InvalidNumber {
                token: "lots".to_string()
            }
        );
    }

    #[test]
    fn test_trailing_bump_option_without_value() {
        let library = parse_mtl("newmtl A\nmap_Bump normal.png -bm\n");
        assert_eq!(library.materials[0].bump_map.as_deref(), Some("normal.png"));
        assert_eq!(library.diagnostics.len(), 1);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let library = parse_mtl("newmtl A\nTf 1 1 1\nmap_Ka ambient.png\n");
        assert_eq!(library.len(), 1);
        assert!(library.diagnostics.is_empty());
    }

    #[test]
    fn test_invalid_values_reported_and_skipped() {
        let library = parse_mtl("newmtl A\nNs shiny\nKd 1 0\nillum\nd 0.5\n");
        let a = &library.materials[0];
        assert_relative_eq!(a.specular_exponent, 0.0);
        assert_relative_eq!(a.dissolve, 0.5);
        let lines: Vec<usize> = library.diagnostics.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![2, 3, 4]);
    }

    #[test]
    fn test_unnamed_newmtl_flushes_and_discards_following_keys() {
        let library = parse_mtl("newmtl A\nnewmtl\nKd 1 1 1\nnewmtl B\n");
        let names: Vec<&str> = library.materials.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_relative_eq!(library.materials[0].diffuse, Vector3::zeros());
        assert_eq!(library.diagnostics.len(), 1);
    }

    #[test]
    fn test_quoted_material_name() {
        let library = parse_mtl("newmtl \"Old Brick\"\n");
        assert!(library.get("Old Brick").is_some());
    }

    #[test]
    fn test_reader_tolerates_invalid_utf8() {
        let input: &[u8] = b"# Mat\xE9riau\r\nnewmtl A\r\nKd 1 0 0\r\n";
        let library = parse_mtl_reader(input).unwrap();
        assert!(library.diagnostics.is_empty());
        assert_eq!(library.len(), 1);
        assert_relative_eq!(library.materials[0].diffuse, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_reader() {
        let library = parse_mtl_reader(HOUSE.as_bytes()).unwrap();
        assert_eq!(library, parse_mtl(HOUSE));
    }
}
