//! Provides parsers for predicate definitions.

use crate::parsed_types::PredicateDefinition;
use crate::parsers::{parens, parse_name, parse_variable, typed_list, ParseResult, Span};
use nom::combinator::map;
use nom::sequence::pair;

/// Parses a predicate definition, i.e. `(<name> <typed-list (variable)>)`.
pub fn parse_predicate_definition<'a, T: Into<Span<'a>>>(
    input: T,
) -> ParseResult<'a, PredicateDefinition> {
    map(
        parens(pair(parse_name, typed_list(parse_variable))),
        |(name, variables)| PredicateDefinition::new(name, variables),
    )(input.into())
}

impl crate::parsers::Parser for PredicateDefinition {
    type Item = PredicateDefinition;

    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_predicate_definition(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed_types::Name;
    use crate::parsers::UnwrapValue;

    #[test]
    fn predicate_definitions_parse() {
        let definition = parse_predicate_definition("(on ?x - block ?y - block)").unwrap_value();
        assert_eq!(definition.name(), &Name::from("on"));
        assert_eq!(definition.variables().len(), 2);
        assert_eq!(definition.variables()[0].type_(), &Name::from("block"));
    }

    #[test]
    fn nullary_predicate_definitions_parse() {
        let definition = parse_predicate_definition("(handempty)").unwrap_value();
        assert!(definition.variables().is_empty());
    }
}
