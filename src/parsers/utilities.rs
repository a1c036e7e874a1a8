//! Utility parsers.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{map, peek, value},
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, terminated},
};

use crate::parsed_types::{Location, Name};
use crate::parsers::{ignore_single_line_comment, ParseResult, Span};

/// A combinator that takes a parser `inner` and produces a parser that also
/// consumes a leading `(name` and trailing `)`, returning the output of `inner`.
pub fn prefix_expr<'a, F, O>(name: &'a str, inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, O>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    delimited(
        preceded(leading_whitespace(tag("(")), tag(name)),
        leading_whitespace(inner),
        leading_whitespace(tag(")")),
    )
}

/// A combinator that takes a parser `inner` and produces a parser that also
/// consumes leading whitespace, returning the output of `inner`. This parser
/// also suppresses line comments.
pub fn leading_whitespace<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, O>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    preceded(preceded(multispace0, ignore_single_line_comment), inner)
}

/// A combinator that takes a parser `inner` and produces a parser that also
/// consumes leading and trailing whitespace, returning the output of `inner`.
/// Also suppresses line comments.
pub fn surrounding_whitespace<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, O>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    delimited(
        preceded(multispace0, ignore_single_line_comment),
        inner,
        preceded(multispace0, ignore_single_line_comment),
    )
}

/// A combinator that takes a parser `inner` and produces a parser that also
/// consumes a whitespace separated list, returning the outputs of `inner`.
pub fn space_separated_list0<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, Vec<O>>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    leading_whitespace(separated_list0(
        multispace1,
        preceded(ignore_single_line_comment, inner),
    ))
}

/// A combinator that takes a parser `inner` and produces a parser that also
/// consumes a whitespace separated list, returning the outputs of `inner`.
pub fn space_separated_list1<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, Vec<O>>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    leading_whitespace(separated_list1(
        multispace1,
        preceded(ignore_single_line_comment, inner),
    ))
}

/// A combinator that takes a parser `inner` and produces a parser that consumes
/// surrounding parentheses, returning the outputs of `inner`.
pub fn parens<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, O>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    preceded(
        ignore_single_line_comment,
        delimited(char('('), leading_whitespace(inner), leading_whitespace(char(')'))),
    )
}

/// Consumes one s-expression element (a bare token or a balanced
/// parenthesized form) without interpreting it.
pub(crate) fn skip_sexp(input: Span) -> ParseResult<()> {
    leading_whitespace(alt((
        value((), parens(many0(skip_sexp))),
        value(
            (),
            take_while1(|c: char| c != '(' && c != ')' && c != ';' && !c.is_whitespace()),
        ),
    )))(input)
}

/// Recognizes a parenthesized construct outside the supported subset
/// (`forall`, `exists`, `imply`, `when`), consuming the whole form and
/// returning its keyword. Normalization rejects the construct by name.
pub(crate) fn unsupported_construct(input: Span) -> ParseResult<Name> {
    map(
        parens(pair(
            terminated(
                alt((tag("forall"), tag("exists"), tag("imply"), tag("when"))),
                peek(alt((value((), multispace1), value((), tag("("))))),
            ),
            many0(skip_sexp),
        )),
        |(keyword, _)| {
            Name::new(*keyword.fragment()).at(Location::new(
                keyword.location_line(),
                keyword.get_utf8_column(),
            ))
        },
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{parse_name, Match};

    #[test]
    fn parens_works() {
        let input = "(content)";
        let mut parser = parens(parse_name);
        assert!(parser(Span::new(input)).is_exactly(Name::new("content")));
    }

    #[test]
    fn prefix_expr_works() {
        let input = "(either x y)";
        let mut parser = prefix_expr("either", space_separated_list1(parse_name));
        assert!(parser(Span::new(input)).is_exactly(vec![Name::from("x"), Name::from("y")]));
    }

    #[test]
    fn space_separated_list0_works() {
        let mut parser = space_separated_list0(parse_name);
        assert!(parser(Span::new("x y")).is_value(vec![Name::from("x"), Name::from("y")]));
        assert!(parser(Span::new("x")).is_value(vec![Name::from("x")]));
        assert!(parser(Span::new("")).is_value(vec![]));
    }

    #[test]
    fn space_separated_list1_works() {
        let mut parser = space_separated_list1(parse_name);
        assert!(parser(Span::new("x y")).is_value(vec![Name::from("x"), Name::from("y")]));
        assert!(parser(Span::new("")).is_err());
    }

    #[test]
    fn unsupported_constructs_are_recognized_by_keyword() {
        let (remainder, keyword) =
            unsupported_construct(Span::new("(forall (?x - block) (p ?x))")).unwrap();
        assert!(remainder.is_empty());
        assert_eq!(keyword, "forall");
        assert!(keyword.location().is_some());
    }

    #[test]
    fn keyword_prefixes_of_predicate_names_do_not_match() {
        assert!(unsupported_construct(Span::new("(whenever x)")).is_err());
    }
}
