// Transform spec parser
//
// Format: op(value) | op(value) | ...
// The value text is kept verbatim; TransformPipeline decides whether it is
// a valid number.

use super::lexer::{identifier, ws};
use crate::error::{BubbleError, Result};
use nom::{
    bytes::complete::take_till,
    character::complete::char,
    combinator::eof,
    multi::separated_list0,
    IResult,
};

/// Parse a single step: name(value)
fn parse_step(input: &str) -> IResult<&str, (String, String)> {
    let (input, op) = ws(identifier)(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, value) = take_till(|c| c == ')')(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((input, (op, value.trim().to_string())))
}

/// Parse a pipe-separated list of steps, consuming all input
pub fn parse_transform_steps(input: &str) -> IResult<&str, Vec<(String, String)>> {
    let (input, steps) = separated_list0(ws(char('|')), parse_step)(input)?;
    let (input, _) = ws(eof)(input)?;
    Ok((input, steps))
}

/// Parse a transform spec into ordered (operation, value) pairs
pub fn parse_transform_spec(spec: &str) -> Result<Vec<(String, String)>> {
    match parse_transform_steps(spec) {
        Ok((_, steps)) => Ok(steps),
        Err(e) => Err(BubbleError::invalid_option(
            "transform",
            format!("cannot parse '{}' (expected e.g. \"mul(2) | add(3)\"): {}", spec, e),
        )),
    }
}
