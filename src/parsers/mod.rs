//! Parsers for the supported PDDL subset, built on [`nom`]. The entry points
//! are [`parse_domain`] and [`parse_problem`]; everything else parses one
//! grammar rule and composes.

mod action_definition;
mod atom;
mod comments;
mod condition;
mod domain;
mod effect;
mod literal;
mod name;
mod problem;
mod predicate_definition;
mod requirements;
mod term;
mod test_helpers;
mod typed_list;
mod utilities;
mod variable;

#[cfg(test)]
pub(crate) use test_helpers::Match;
pub use test_helpers::UnwrapValue;

pub trait Parser {
    type Item;

    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item>;

    /// Parse a string slice into the desired type. Discards any remaining
    /// input.
    fn from_str(input: &str) -> Result<Self::Item, nom::Err<ParseError>> {
        let (_, value) = Self::parse(input)?;
        Ok(value)
    }
}

pub type Span<'a> = nom_locate::LocatedSpan<&'a str>;

pub type ParseError<'a> = nom_greedyerror::GreedyError<Span<'a>, nom::error::ErrorKind>;

pub type ParseResult<'a, T, E = ParseError<'a>> = nom::IResult<Span<'a>, T, E>;

/// Re-exports commonly used types.
pub mod preamble {
    pub use crate::parsers::test_helpers::UnwrapValue;
    pub use crate::parsers::Parser;
    pub use crate::parsers::{ParseError, ParseResult, Span};
}

// Parsers
pub use action_definition::parse_action_definition;
pub use comments::ignore_single_line_comment;
pub use condition::parse_condition;
pub use domain::parse_domain;
pub use effect::parse_effect;
pub use name::parse_name;
pub use predicate_definition::parse_predicate_definition;
pub use problem::parse_problem;
pub use requirements::parse_requirements;
pub use term::parse_term;
pub use variable::parse_variable;

// Parser combinators
pub use atom::{atom, EQUALITY_NAME};
pub use literal::literal;
pub use typed_list::typed_list;

#[allow(unused_imports)]
pub(crate) use utilities::{
    leading_whitespace, parens, prefix_expr, skip_sexp, space_separated_list0,
    space_separated_list1, surrounding_whitespace, unsupported_construct,
};
