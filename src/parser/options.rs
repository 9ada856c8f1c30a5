// Parsers for compound command-line values

use super::lexer::{number_literal, ws};
use crate::error::{BubbleError, Result};
use crate::ir::RangeOverride;
use nom::{
    branch::alt,
    character::complete::char,
    combinator::{eof, map},
    IResult,
};

/// Parse "a,b"
fn parse_pair(input: &str) -> IResult<&str, (f64, f64)> {
    let (input, a) = ws(number_literal)(input)?;
    let (input, _) = ws(char(','))(input)?;
    let (input, b) = ws(number_literal)(input)?;
    let (input, _) = eof(input)?;
    Ok((input, (a, b)))
}

/// A range slot: a number or `_` for "computed"
fn parse_slot(input: &str) -> IResult<&str, Option<f64>> {
    alt((map(ws(char('_')), |_| None), map(ws(number_literal), Some)))(input)
}

/// Parse "xmin,xmax,ymin,ymax"
fn parse_range_slots(input: &str) -> IResult<&str, RangeOverride> {
    let (input, xmin) = parse_slot(input)?;
    let (input, _) = ws(char(','))(input)?;
    let (input, xmax) = parse_slot(input)?;
    let (input, _) = ws(char(','))(input)?;
    let (input, ymin) = parse_slot(input)?;
    let (input, _) = ws(char(','))(input)?;
    let (input, ymax) = parse_slot(input)?;
    let (input, _) = eof(input)?;
    Ok((input, RangeOverride { xmin, xmax, ymin, ymax }))
}

/// Parse a figure size such as "8,6"
pub fn parse_fig_size(input: &str) -> Result<(f64, f64)> {
    parse_pair(input).map(|(_, v)| v).map_err(|_| {
        BubbleError::invalid_option(
            "figure size",
            format!("'{}' (expected width,height such as \"8,6\")", input),
        )
    })
}

/// Parse a range override such as "0,10,_,_"
pub fn parse_ranges(input: &str) -> Result<RangeOverride> {
    parse_range_slots(input).map(|(_, v)| v).map_err(|_| {
        BubbleError::invalid_option(
            "ranges",
            format!("'{}' (expected xmin,xmax,ymin,ymax with _ for computed bounds)", input),
        )
    })
}
