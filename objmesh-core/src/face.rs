//! Face-vertex reference parsing (`position[/texcoord][/normal]`)
use crate::error::ParseError;
use crate::geometry::FaceVertexRef;
use crate::scalar::parse_integer;

/// Parse one face-vertex token into zero-based pool indices.
///
/// Segments are split on `/` with empty segments preserved, so `"5//2"` has
/// an unset texture coordinate. Segments past the third are ignored.
pub fn parse_face_ref(token: &str) -> Result<FaceVertexRef, ParseError> {
    let mut segments = token.split('/');

    let position = segments
        .next()
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| invalid_index(token))
        .and_then(|segment| parse_segment(segment, token))?;
    let texcoord = parse_optional_segment(segments.next(), token)?;
    let normal = parse_optional_segment(segments.next(), token)?;

    Ok(FaceVertexRef::new(position, texcoord, normal))
}

/// Parse every reference of one `f` line, in order.
pub fn parse_face_refs<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<FaceVertexRef>, ParseError> {
    tokens
        .iter()
        .map(|token| parse_face_ref(token.as_ref()))
        .collect()
}

fn parse_optional_segment(segment: Option<&str>, token: &str) -> Result<Option<i32>, ParseError> {
    match segment {
        Some(segment) if !segment.is_empty() => parse_segment(segment, token).map(Some),
        _ => Ok(None),
    }
}

// One-based in the document, zero-based in memory
fn parse_segment(segment: &str, token: &str) -> Result<i32, ParseError> {
    parse_integer(segment)
        .and_then(|index| index.checked_sub(1))
        .ok_or_else(|| invalid_index(token))
}

fn invalid_index(token: &str) -> ParseError {
    ParseError::InvalidIndex {
        token: token.to_string(),
    }
}
