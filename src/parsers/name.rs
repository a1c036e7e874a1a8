//! Provides parsers for names.

use crate::parsed_types::{Location, Name};
use crate::parsers::{ParseResult, Span};
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{alpha1, alphanumeric1};
use nom::combinator::{map, recognize};
use nom::multi::many0_count;
use nom::sequence::pair;

/// Parses a name: a letter followed by letters, digits, `-` and `_`. The
/// returned name carries its source position for later diagnostics.
pub fn parse_name<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, Name> {
    map(
        recognize(pair(
            alpha1,
            many0_count(alt((alphanumeric1, tag("-"), tag("_")))),
        )),
        |span: Span| {
            Name::new(*span.fragment()).at(Location::new(
                span.location_line(),
                span.get_utf8_column(),
            ))
        },
    )(input.into())
}

impl crate::parsers::Parser for Name {
    type Item = Name;

    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_name(input)
    }
}
