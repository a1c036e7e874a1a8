//! Provides parsers for terms.

use crate::parsed_types::Term;
use crate::parsers::{parse_name, parse_variable, ParseResult, Span};
use nom::branch::alt;
use nom::combinator::map;

/// Parses a term: either a variable or a constant name.
pub fn parse_term<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, Term> {
    alt((
        map(parse_variable, Term::Variable),
        map(parse_name, Term::Name),
    ))(input.into())
}

impl crate::parsers::Parser for Term {
    type Item = Term;

    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_term(input)
    }
}
