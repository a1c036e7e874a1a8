//! Provides parsers for domain definitions.

use crate::parsed_types::Domain;
use crate::parsers::{
    parse_action_definition, parse_name, parse_predicate_definition, parse_requirements,
    prefix_expr, space_separated_list1, surrounding_whitespace, typed_list, ParseResult, Span,
};
use nom::character::complete::multispace1;
use nom::combinator::{map, opt};
use nom::sequence::{preceded, tuple};

/// Parses a domain definition.
pub fn parse_domain<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, Domain> {
    map(
        surrounding_whitespace(prefix_expr(
            "define",
            tuple((
                prefix_expr("domain", parse_name),
                opt(preceded(multispace1, parse_requirements)),
                opt(preceded(
                    multispace1,
                    prefix_expr(":types", typed_list(parse_name)),
                )),
                opt(preceded(
                    multispace1,
                    prefix_expr(":constants", typed_list(parse_name)),
                )),
                opt(preceded(
                    multispace1,
                    prefix_expr(
                        ":predicates",
                        space_separated_list1(parse_predicate_definition),
                    ),
                )),
                opt(preceded(
                    multispace1,
                    space_separated_list1(parse_action_definition),
                )),
            )),
        )),
        |(name, requirements, types, constants, predicates, actions)| {
            Domain::builder(name, actions.unwrap_or_default())
                .with_requirements(requirements.unwrap_or_default())
                .with_types(types.unwrap_or_default())
                .with_constants(constants.unwrap_or_default())
                .with_predicates(predicates.unwrap_or_default())
        },
    )(input.into())
}

impl crate::parsers::Parser for Domain {
    type Item = Domain;

    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_domain(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed_types::Name;
    use crate::parsers::Parser;

    #[test]
    fn domains_parse() {
        let input = r#"
        (define (domain sokoban)
            (:requirements :typing)
            (:types location direction box)
            (:constants down up left right - direction)
            (:predicates
                (at-robot ?l - location)
                (at ?o - box ?l - location)
                (adjacent ?l1 - location ?l2 - location ?d - direction)
                (clear ?l - location))

            ; push boxes around
            (:action move
                :parameters (?from - location ?to - location ?dir - direction)
                :precondition (and (clear ?to) (at-robot ?from) (adjacent ?from ?to ?dir))
                :effect (and (at-robot ?to) (not (at-robot ?from))))
        )"#;

        let (remainder, domain) = parse_domain(input).unwrap();

        assert!(remainder.is_empty());
        assert_eq!(domain.name(), &Name::from("sokoban"));
        assert_eq!(domain.requirements().len(), 1);
        assert_eq!(domain.types().len(), 3);
        assert_eq!(domain.constants().len(), 4);
        assert_eq!(domain.predicates().len(), 4);
        assert_eq!(domain.actions().len(), 1);
    }

    #[test]
    fn emitted_domains_reparse_identically() {
        let input = r#"
        (define (domain swap)
            (:types block)
            (:predicates (on ?x - block ?y - block))
            (:action move
                :parameters (?x - block ?y - block ?z - block)
                :precondition (on ?x ?y)
                :effect (and (on ?x ?z) (not (on ?x ?y))))
        )"#;

        let domain = Domain::from_str(input).unwrap();
        let reparsed = Domain::from_str(&domain.to_string()).unwrap();
        assert_eq!(domain, reparsed);
    }
}
