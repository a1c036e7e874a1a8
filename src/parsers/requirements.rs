//! Provides parsers for requirement declarations.

use crate::parsed_types::Name;
use crate::parsers::{parse_name, prefix_expr, space_separated_list1, ParseResult, Span};
use nom::bytes::complete::tag;
use nom::sequence::preceded;

/// Parses a `(:requirements :key …)` section. Requirement keys are recorded
/// but not enforced.
pub fn parse_requirements<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, Vec<Name>> {
    prefix_expr(
        ":requirements",
        space_separated_list1(preceded(tag(":"), parse_name)),
    )(input.into())
}
