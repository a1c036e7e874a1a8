//! Provides the [`literal`] parser combinator.

use crate::parsed_types::Literal;
use crate::parsers::{atom, prefix_expr, ParseResult, Span};
use nom::branch::alt;
use nom::combinator::map;

/// Parser combinator for a possibly negated atom, generic over the argument
/// parser.
pub fn literal<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, Literal<O>>
where
    F: Clone + FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    alt((
        map(prefix_expr("not", atom(inner.clone())), Literal::Negative),
        map(atom(inner), Literal::Positive),
    ))
}
