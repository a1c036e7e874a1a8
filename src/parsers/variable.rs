//! Provides parsers for variables.

use crate::parsed_types::Variable;
use crate::parsers::{parse_name, ParseResult, Span};
use nom::bytes::complete::tag;
use nom::combinator::map;
use nom::sequence::preceded;

/// Parses a variable, i.e. `?<name>`, and returns its name.
pub fn parse_variable<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, Variable> {
    map(preceded(tag("?"), parse_name), Variable::new)(input.into())
}

impl crate::parsers::Parser for Variable {
    type Item = Variable;

    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_variable(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::Match;

    #[test]
    fn variables_parse() {
        assert!(parse_variable(Span::new("?abcde")).is_value(Variable::from_str("abcde")));
        assert!(parse_variable(Span::new("?a-1_2")).is_value(Variable::from_str("a-1_2")));
    }

    #[test]
    fn prefix_is_required() {
        assert!(parse_variable(Span::new("abcde")).is_err());
        assert!(parse_variable(Span::new("?1")).is_err());
    }
}
