//! Provides the [`typed_list`] parser combinator.

use crate::parsed_types::Typed;
use crate::parsers::{
    leading_whitespace, parse_name, space_separated_list0, space_separated_list1, ParseResult, Span,
};
use nom::character::complete::char;
use nom::combinator::map;
use nom::multi::many0;
use nom::sequence::{preceded, tuple};

/// Parser combinator that parses a typed list, i.e. `x* | x⁺ - <type>`.
/// Elements without an explicit type default to `object`.
pub fn typed_list<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, Vec<Typed<O>>>
where
    F: Clone + FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    // `x⁺ - <type>`
    let explicitly_typed = map(
        tuple((
            space_separated_list1(inner.clone()),
            preceded(leading_whitespace(char('-')), leading_whitespace(parse_name)),
        )),
        |(values, r#type)| {
            values
                .into_iter()
                .map(move |value| Typed::new(value, r#type.clone()))
                .collect::<Vec<_>>()
        },
    );

    // `x*`
    let implicitly_typed_list = space_separated_list0(map(inner, Typed::new_object));

    map(
        tuple((
            map(many0(explicitly_typed), |groups| {
                groups.into_iter().flatten().collect::<Vec<_>>()
            }),
            implicitly_typed_list,
        )),
        |(mut explicit, mut implicit)| {
            explicit.append(&mut implicit);
            explicit
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed_types::Name;
    use crate::parsers::Match;

    #[test]
    fn implicit_types_default_to_object() {
        let mut parser = typed_list(parse_name);
        assert!(parser(Span::new("a b")).is_value(vec![
            Typed::new_object(Name::new("a")),
            Typed::new_object(Name::new("b")),
        ]));
    }

    #[test]
    fn explicit_groups_share_a_type() {
        let mut parser = typed_list(parse_name);
        assert!(parser(Span::new("a b - block c - table")).is_value(vec![
            Typed::new(Name::new("a"), Name::new("block")),
            Typed::new(Name::new("b"), Name::new("block")),
            Typed::new(Name::new("c"), Name::new("table")),
        ]));
    }

    #[test]
    fn mixed_lists_put_untyped_last() {
        let mut parser = typed_list(parse_name);
        assert!(parser(Span::new("a - block b c")).is_value(vec![
            Typed::new(Name::new("a"), Name::new("block")),
            Typed::new_object(Name::new("b")),
            Typed::new_object(Name::new("c")),
        ]));
    }
}
