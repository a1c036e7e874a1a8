//! Provides parsers for goal-description conditions.

use crate::parsed_types::Condition;
use crate::parsers::{
    literal, parens, parse_term, prefix_expr, space_separated_list0, unsupported_construct,
    ParseResult, Span,
};
use nom::branch::alt;
use nom::character::complete::multispace0;
use nom::combinator::map;

/// Parses a condition tree: literals combined with `and`, `or` and `not`.
/// An empty `()` or `(and)` is the trivially true condition. Quantifiers,
/// `imply` and `when` are recognized as unsupported constructs so that
/// normalization can reject them by name.
pub fn parse_condition<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, Condition> {
    alt((
        map(
            prefix_expr("and", space_separated_list0(parse_condition)),
            Condition::And,
        ),
        map(
            prefix_expr("or", space_separated_list0(parse_condition)),
            Condition::Or,
        ),
        map(prefix_expr("not", parse_condition), |inner| {
            Condition::Not(Box::new(inner))
        }),
        map(unsupported_construct, Condition::Unsupported),
        map(literal(parse_term), Condition::Literal),
        map(parens(multispace0), |_| Condition::And(vec![])),
    ))(input.into())
}

impl crate::parsers::Parser for Condition {
    type Item = Condition;

    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_condition(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::UnwrapValue;

    #[test]
    fn nested_conditions_parse() {
        let condition =
            parse_condition("(and (on ?x ?y) (or (clear ?x) (not (= ?x ?y))))").unwrap_value();
        match condition {
            Condition::And(parts) => {
                assert_eq!(parts.len(), 2);
                assert!(matches!(parts[0], Condition::Literal(_)));
                assert!(matches!(parts[1], Condition::Or(_)));
            }
            other => panic!("expected a conjunction, got {:?}", other),
        }
    }

    #[test]
    fn empty_condition_is_true() {
        assert_eq!(parse_condition("()").unwrap_value(), Condition::And(vec![]));
        assert_eq!(
            parse_condition("(and)").unwrap_value(),
            Condition::And(vec![])
        );
    }

    #[test]
    fn not_of_predicate_starting_with_not_parses() {
        let condition = parse_condition("(nothing ?x)").unwrap_value();
        assert!(matches!(condition, Condition::Literal(_)));
    }

    #[test]
    fn quantifiers_are_recognized_as_unsupported() {
        let condition = parse_condition("(forall (?x - block) (p ?x))").unwrap_value();
        match condition {
            Condition::Unsupported(name) => {
                assert_eq!(name, "forall");
                assert!(name.location().is_some());
            }
            other => panic!("expected an unsupported construct, got {:?}", other),
        }
    }

    #[test]
    fn nested_unsupported_constructs_are_found() {
        let condition = parse_condition("(and (p ?x) (exists (?y) (q ?y)))").unwrap_value();
        assert_eq!(
            condition.find_unsupported().map(|name| name.as_ref()),
            Some("exists")
        );
    }
}
