//! Provides parsers for problem definitions.

use crate::parsed_types::Problem;
use crate::parsers::{
    literal, parse_condition, parse_name, parse_requirements, prefix_expr, skip_sexp,
    space_separated_list0, surrounding_whitespace, typed_list, ParseResult, Span,
};
use nom::character::complete::multispace1;
use nom::combinator::{map, opt};
use nom::multi::many0;
use nom::sequence::{pair, preceded, tuple};
use tracing::warn;

fn parse_metric(input: Span) -> ParseResult<()> {
    map(
        prefix_expr(":metric", pair(parse_name, many0(skip_sexp))),
        |_| warn!("Ignoring :metric section, plan quality metrics are not supported"),
    )(input)
}

/// Parses a problem definition.
pub fn parse_problem<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, Problem> {
    map(
        surrounding_whitespace(prefix_expr(
            "define",
            tuple((
                prefix_expr("problem", parse_name),
                preceded(multispace1, prefix_expr(":domain", parse_name)),
                opt(preceded(multispace1, parse_requirements)),
                opt(preceded(
                    multispace1,
                    prefix_expr(":objects", typed_list(parse_name)),
                )),
                preceded(
                    multispace1,
                    prefix_expr(":init", space_separated_list0(literal(parse_name))),
                ),
                preceded(multispace1, prefix_expr(":goal", parse_condition)),
                opt(preceded(multispace1, parse_metric)),
            )),
        )),
        |(name, domain, requirements, objects, init, goal, _metric)| {
            Problem::new(
                name,
                domain,
                requirements.unwrap_or_default(),
                objects.unwrap_or_default(),
                init,
                goal,
            )
        },
    )(input.into())
}

impl crate::parsers::Parser for Problem {
    type Item = Problem;

    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_problem(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed_types::Name;
    use crate::parsers::Parser;

    #[test]
    fn problems_parse() {
        let input = r#"
        (define (problem move-a)
            (:domain swap)
            (:objects a b c - block)
            (:init (on a b))
            (:goal (on a c))
        )"#;

        let (remainder, problem) = parse_problem(input).unwrap();

        assert!(remainder.is_empty());
        assert_eq!(problem.name(), &Name::from("move-a"));
        assert_eq!(problem.domain(), &Name::from("swap"));
        assert_eq!(problem.objects().len(), 3);
        assert_eq!(problem.init().len(), 1);
    }

    #[test]
    fn negated_init_literals_parse() {
        let input = r#"
        (define (problem p) (:domain d)
            (:objects a)
            (:init (p a) (not (q a)))
            (:goal (p a)))"#;

        let problem = Problem::from_str(input).unwrap();
        assert_eq!(problem.init().len(), 2);
        assert!(problem.init()[1].is_negated());
    }

    #[test]
    fn metric_sections_are_skipped() {
        let input = r#"
        (define (problem p) (:domain d)
            (:objects a)
            (:init (p a))
            (:goal (p a))
            (:metric minimize (total-time)))"#;

        let (remainder, _problem) = parse_problem(input).unwrap();
        assert!(remainder.is_empty());
    }

    #[test]
    fn emitted_problems_reparse_identically() {
        let input = r#"
        (define (problem move-a)
            (:domain swap)
            (:objects a b c - block)
            (:init (on a b))
            (:goal (and (on a c) (not (on a b))))
        )"#;

        let problem = Problem::from_str(input).unwrap();
        let reparsed = Problem::from_str(&problem.to_string()).unwrap();
        assert_eq!(problem, reparsed);
    }
}
