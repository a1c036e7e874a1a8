//! Provides parsers for action effects.

use crate::parsed_types::{Effect, Literal, Name, Term};
use crate::parsers::{
    literal, parse_term, prefix_expr, space_separated_list0, unsupported_construct, ParseResult,
    Span,
};
use nom::branch::alt;
use nom::combinator::map;

enum Element {
    Literal(Literal<Term>),
    Unsupported(Name),
}

fn parse_element(input: Span) -> ParseResult<Element> {
    alt((
        map(unsupported_construct, Element::Unsupported),
        map(literal(parse_term), Element::Literal),
    ))(input)
}

fn collect(elements: Vec<Element>) -> Effect {
    let mut literals = Vec::new();
    let mut unsupported = Vec::new();
    for element in elements {
        match element {
            Element::Literal(literal) => literals.push(literal),
            Element::Unsupported(name) => unsupported.push(name),
        }
    }
    Effect::with_unsupported(literals, unsupported)
}

/// Parses an effect: a single literal or a conjunction of literals.
/// Conditional (`when`) and quantified (`forall`) effects are recognized
/// and recorded so that normalization can reject them by name.
pub fn parse_effect<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, Effect> {
    alt((
        map(
            prefix_expr("and", space_separated_list0(parse_element)),
            collect,
        ),
        map(parse_element, |element| collect(vec![element])),
    ))(input.into())
}

impl crate::parsers::Parser for Effect {
    type Item = Effect;

    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_effect(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::UnwrapValue;

    #[test]
    fn conjunction_effects_parse() {
        let effect = parse_effect("(and (on ?x ?z) (not (on ?x ?y)))").unwrap_value();
        assert_eq!(effect.literals().len(), 2);
        assert!(!effect.literals()[0].is_negated());
        assert!(effect.literals()[1].is_negated());
        assert!(effect.unsupported().is_empty());
    }

    #[test]
    fn single_literal_effects_parse() {
        let effect = parse_effect("(not (handempty))").unwrap_value();
        assert_eq!(effect.literals().len(), 1);
    }

    #[test]
    fn conditional_effects_are_recognized() {
        let effect = parse_effect("(and (p ?x) (when (q ?x) (not (p ?x))))").unwrap_value();
        assert_eq!(effect.literals().len(), 1);
        assert_eq!(effect.unsupported().len(), 1);
        assert_eq!(effect.unsupported()[0], "when");
    }
}
