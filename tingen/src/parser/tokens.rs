use crate::parser::{pattern::blank_line, ParsedToken};
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{line_ending, not_line_ending, space0, space1};
use nom::combinator::{eof, map, opt, value, verify};
use nom::multi::many0;
use nom::sequence::{delimited, pair, preceded};
use nom::IResult;

pub(crate) fn full_tokens(input: &str) -> IResult<&str, Vec<ParsedToken>> {
    map(
        many0(alt((map(token_line, Some), value(None, blank_line)))),
        |tokens| tokens.into_iter().flatten().collect(),
    )(input)
}

fn token_line(input: &str) -> IResult<&str, ParsedToken> {
    map(
        delimited(
            space0,
            preceded(
                pair(tag("Token:"), space1),
                pair(kind, opt(preceded(arrow, lexeme))),
            ),
            alt((line_ending, eof)),
        ),
        |(kind, lexeme)| ParsedToken { kind, lexeme },
    )(input)
}

fn kind(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

fn arrow(input: &str) -> IResult<&str, ()> {
    value((), delimited(space1, tag("->"), space1))(input)
}

fn lexeme(input: &str) -> IResult<&str, &str> {
    verify(map(not_line_ending, str::trim_end), |lexeme: &str| {
        !lexeme.is_empty()
    })(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_with_and_without_lexemes() {
        let input = "Token: if\nToken: id -> x\n\nToken: :=\nToken: num -> 42\n";
        let (rest, tokens) = full_tokens(input).unwrap();
        assert!(rest.is_empty());
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].kind, "if");
        assert_eq!(tokens[0].lexeme, None);
        assert_eq!(tokens[1].kind, "id");
        assert_eq!(tokens[1].lexeme, Some("x"));
        assert_eq!(tokens[3].kind, "num");
        assert_eq!(tokens[3].lexeme, Some("42"));
    }
}
