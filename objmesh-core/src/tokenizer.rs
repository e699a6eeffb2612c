//! Whitespace tokenizer with double-quote grouping
use nom::{
    branch::alt,
    bytes::complete::{take_till, take_till1},
    character::complete::{char, multispace0},
    combinator::opt,
    multi::many0,
    sequence::{delimited, preceded, terminated},
    IResult,
};

/// Split a line into whitespace-separated tokens.
///
/// A double quote opens a token that runs to the next double quote, or to the
/// end of the line when unterminated. Quote characters are not part of the
/// token, and the content may contain spaces or tabs.
pub fn tokenize(line: &str) -> Vec<String> {
    match tokens(line) {
        Ok((_, tokens)) => tokens.into_iter().map(str::to_owned).collect(),
        Err(_) => Vec::new(),
    }
}

fn tokens(input: &str) -> IResult<&str, Vec<&str>> {
    terminated(many0(preceded(multispace0, token)), multispace0)(input)
}

fn token(input: &str) -> IResult<&str, &str> {
    alt((quoted, bare))(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till(|c: char| c == '"'), opt(char('"')))(input)
}

fn bare(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_ascii_whitespace())(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_line() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t ").is_empty());
    }

    #[test]
    fn test_whitespace_separated() {
        assert_eq!(tokenize("Ka 0.3\t0.3  0.3"), vec!["Ka", "0.3", "0.3", "0.3"]);
    }

    #[test]
    fn test_quoted_token_keeps_spaces() {
        assert_eq!(
            tokenize("-bm 2.9 \"House T3N.png\""),
            vec!["-bm", "2.9", "House T3N.png"]
        );
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        assert_eq!(tokenize("map_Kd \"my texture.png"), vec!["map_Kd", "my texture.png"]);
    }

    #[test]
    fn test_quote_inside_bare_token_is_literal() {
        assert_eq!(tokenize("abc\"def x"), vec!["abc\"def", "x"]);
    }

    #[test]
    fn test_empty_quotes_yield_empty_token() {
        assert_eq!(tokenize("a \"\" b"), vec!["a", "", "b"]);
    }
}
