//! Strict numeric token parsing
use nalgebra::{Vector2, Vector3};
use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{i32 as integer, one_of},
    combinator::{all_consuming, opt, recognize},
    number::complete::recognize_float,
    sequence::pair,
    IResult,
};

use crate::error::ParseError;

/// Parse a single floating-point token.
///
/// The whole token must be consumed by the float grammar, and finite digits
/// that overflow `f32` are rejected. Optionally signed `inf`, `infinity` and
/// `nan` are accepted.
pub fn parse_scalar(token: &str) -> Result<f32, ParseError> {
    let invalid = || ParseError::InvalidNumber {
        token: token.to_string(),
    };

    float_token(token).map_err(|_| invalid())?;
    let value: f32 = token.parse().map_err(|_| invalid())?;
    if value.is_infinite() && !is_infinity_literal(token) {
        return Err(invalid());
    }
    Ok(value)
}

/// Parse three consecutive scalars starting at `offset`.
pub fn parse_vector3<S: AsRef<str>>(
    tokens: &[S],
    offset: usize,
) -> Result<Vector3<f32>, ParseError> {
    let [x, y, z] = parse_scalars::<S, 3>(tokens, offset)?;
    Ok(Vector3::new(x, y, z))
}

/// Parse two consecutive scalars starting at `offset`.
pub fn parse_vector2<S: AsRef<str>>(
    tokens: &[S],
    offset: usize,
) -> Result<Vector2<f32>, ParseError> {
    let [u, v] = parse_scalars::<S, 2>(tokens, offset)?;
    Ok(Vector2::new(u, v))
}

/// Parse a signed decimal integer token.
pub fn parse_integer(token: &str) -> Option<i32> {
    all_consuming(integer::<&str, nom::error::Error<&str>>)(token)
        .ok()
        .map(|(_, value)| value)
}

fn parse_scalars<S: AsRef<str>, const N: usize>(
    tokens: &[S],
    offset: usize,
) -> Result<[f32; N], ParseError> {
    let available = tokens.len().saturating_sub(offset);
    if available < N {
        return Err(ParseError::InsufficientTokens {
            expected: N,
            found: available,
        });
    }

    let mut out = [0.0; N];
    for (slot, token) in out.iter_mut().zip(&tokens[offset..offset + N]) {
        *slot = parse_scalar(token.as_ref())?;
    }
    Ok(out)
}

fn float_token(input: &str) -> IResult<&str, &str> {
    all_consuming(alt((recognize_float, special_float)))(input)
}

fn special_float(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        opt(one_of("+-")),
        alt((tag_no_case("infinity"), tag_no_case("inf"), tag_no_case("nan"))),
    ))(input)
}

fn is_infinity_literal(token: &str) -> bool {
    token
        .trim_start_matches(['+', '-'])
        .get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("inf"))
}
