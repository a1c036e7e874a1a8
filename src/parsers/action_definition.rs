//! Provides parsers for action definitions.

use crate::parsed_types::ActionDefinition;
use crate::parsers::{
    leading_whitespace, parens, parse_condition, parse_effect, parse_name, parse_variable,
    prefix_expr, typed_list, ParseResult, Span,
};
use nom::bytes::complete::tag;
use nom::combinator::{map, opt};
use nom::sequence::{preceded, tuple};

/// Parses an action definition, i.e.
/// `(:action <name> :parameters (…) [:precondition …] :effect …)`.
pub fn parse_action_definition<'a, T: Into<Span<'a>>>(
    input: T,
) -> ParseResult<'a, ActionDefinition> {
    map(
        prefix_expr(
            ":action",
            tuple((
                parse_name,
                preceded(
                    leading_whitespace(tag(":parameters")),
                    parens(typed_list(parse_variable)),
                ),
                opt(preceded(
                    leading_whitespace(tag(":precondition")),
                    parse_condition,
                )),
                preceded(leading_whitespace(tag(":effect")), parse_effect),
            )),
        ),
        |(name, parameters, precondition, effect)| {
            ActionDefinition::new(name, parameters, precondition, effect)
        },
    )(input.into())
}

impl crate::parsers::Parser for ActionDefinition {
    type Item = ActionDefinition;

    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_action_definition(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed_types::Name;
    use crate::parsers::UnwrapValue;

    #[test]
    fn actions_parse() {
        let action = parse_action_definition(
            r#"(:action move
                :parameters (?x - block ?y - block ?z - block)
                :precondition (on ?x ?y)
                :effect (and (on ?x ?z) (not (on ?x ?y))))"#,
        )
        .unwrap_value();

        assert_eq!(action.name(), &Name::from("move"));
        assert_eq!(action.parameters().len(), 3);
        assert!(action.precondition().is_some());
        assert_eq!(action.effect().literals().len(), 2);
    }

    #[test]
    fn preconditions_are_optional() {
        let action = parse_action_definition(
            "(:action noop :parameters () :effect (done))",
        )
        .unwrap_value();

        assert!(action.precondition().is_none());
        assert!(action.parameters().is_empty());
    }
}
