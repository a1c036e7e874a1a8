//! Provides the [`atom`] parser combinator.

use crate::parsed_types::{Atom, Location, Name};
use crate::parsers::{parens, parse_name, space_separated_list0, ParseResult, Span};
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::combinator::map;
use nom::sequence::pair;

/// The name of the predefined equality predicate.
pub const EQUALITY_NAME: &str = "=";

fn parse_atom_name<'a>(input: Span<'a>) -> ParseResult<'a, Name> {
    alt((
        map(tag(EQUALITY_NAME), |span: Span| {
            Name::new(EQUALITY_NAME).at(Location::new(
                span.location_line(),
                span.get_utf8_column(),
            ))
        }),
        parse_name,
    ))(input)
}

/// Parser combinator for an atom `(<predicate> <arg>*)`, generic over the
/// argument parser. The predicate position also accepts `=`.
pub fn atom<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, Atom<O>>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    map(
        parens(pair(parse_atom_name, space_separated_list0(inner))),
        |(name, values)| Atom::new(name, values),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed_types::{Term, Variable};
    use crate::parsers::{parse_term, Match};

    #[test]
    fn atoms_parse() {
        let mut parser = atom(parse_term);
        assert!(parser(Span::new("(on ?x b1)")).is_exactly(Atom::new(
            Name::new("on"),
            vec![
                Term::Variable(Variable::from_str("x")),
                Term::Name(Name::new("b1")),
            ],
        )));
    }

    #[test]
    fn nullary_atoms_parse() {
        let mut parser = atom(parse_term);
        assert!(parser(Span::new("(handempty)")).is_exactly(Atom::new(Name::new("handempty"), vec![])));
    }

    #[test]
    fn equality_parses() {
        let mut parser = atom(parse_term);
        assert!(parser(Span::new("(= ?x ?y)")).is_exactly(Atom::new(
            Name::new("="),
            vec![
                Term::Variable(Variable::from_str("x")),
                Term::Variable(Variable::from_str("y")),
            ],
        )));
    }
}
