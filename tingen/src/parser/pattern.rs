use crate::parser::{rules, ParsedPattern};
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{line_ending, not_line_ending, space0};
use nom::combinator::{eof, map, opt, recognize, value, verify};
use nom::multi::many0;
use nom::sequence::{delimited, pair, preceded, terminated};
use nom::IResult;

pub(crate) fn full_pattern(input: &str) -> IResult<&str, ParsedPattern> {
    map(
        pair(
            many0(alt((map(entry_line, Some), value(None, blank_line)))),
            opt(preceded(rules_header, rules::full_rules)),
        ),
        |(entries, rules)| ParsedPattern {
            entries: entries.into_iter().flatten().collect(),
            rules: rules.unwrap_or_default(),
        },
    )(input)
}

fn entry_line(input: &str) -> IResult<&str, (&str, &str)> {
    delimited(
        space0,
        pair(terminated(key, pair(tag(":"), space0)), entry_value),
        alt((line_ending, eof)),
    )(input)
}

fn key(input: &str) -> IResult<&str, &str> {
    // `rules:` is a block header, not an entry
    verify(
        take_till1(|c: char| c == ':' || c.is_whitespace()),
        |key: &str| key != "rules",
    )(input)
}

fn entry_value(input: &str) -> IResult<&str, &str> {
    map(not_line_ending, str::trim_end)(input)
}

fn rules_header(input: &str) -> IResult<&str, ()> {
    value(
        (),
        delimited(space0, tag("rules:"), pair(space0, alt((line_ending, eof)))),
    )(input)
}

pub(crate) fn blank_line(input: &str) -> IResult<&str, ()> {
    // Must consume something, otherwise many0(blank_line) spins at eof
    value(
        (),
        verify(
            recognize(terminated(space0, alt((line_ending, eof)))),
            |consumed: &str| !consumed.is_empty(),
        ),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_and_rules_block() {
        let input = "\
keywords: if then else
symbols: + - :=
lcomment: {
rcomment: }

rules:
program -> stmt ; program | stmt
stmt -> if exp
";
        let (rest, parsed) = full_pattern(input).unwrap();
        assert!(rest.is_empty());
        assert_eq!(parsed.entries.len(), 4);
        assert_eq!(parsed.entries[0], ("keywords", "if then else"));
        assert_eq!(parsed.entries[2], ("lcomment", "{"));
        assert_eq!(parsed.rules.len(), 2);
        assert_eq!(parsed.rules[0].lhs, "program");
        assert_eq!(
            parsed.rules[0].alternatives,
            vec![vec!["stmt", ";", "program"], vec!["stmt"]]
        );
    }

    #[test]
    fn pattern_without_rules_block() {
        let input = "keywords: read write\nidentifier: l(l|d)*\n";
        let (rest, parsed) = full_pattern(input).unwrap();
        assert!(rest.is_empty());
        assert_eq!(parsed.entries.len(), 2);
        assert!(parsed.rules.is_empty());
    }
}
