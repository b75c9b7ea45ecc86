use crate::parser::{pattern::blank_line, ParsedRule};
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{line_ending, space0, space1};
use nom::combinator::{eof, map, value, verify};
use nom::multi::{many0, separated_list1};
use nom::sequence::{delimited, pair, preceded};
use nom::IResult;

pub(crate) fn full_rules(input: &str) -> IResult<&str, Vec<ParsedRule>> {
    map(
        many0(alt((map(rule_line, Some), value(None, blank_line)))),
        |rules| rules.into_iter().flatten().collect(),
    )(input)
}

fn rule_line(input: &str) -> IResult<&str, ParsedRule> {
    map(
        delimited(
            space0,
            pair(
                rule_symbol,
                preceded(
                    delimited(space0, tag("->"), space0),
                    separated_list1(delimited(space0, tag("|"), space0), alternative),
                ),
            ),
            pair(space0, alt((line_ending, eof))),
        ),
        |(lhs, alternatives)| ParsedRule { lhs, alternatives },
    )(input)
}

fn alternative(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(space1, rule_symbol)(input)
}

fn rule_symbol(input: &str) -> IResult<&str, &str> {
    verify(
        take_till1(|c: char| c.is_whitespace() || c == '|'),
        |symbol: &str| symbol != "->",
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternatives_split_on_bars() {
        let (rest, rules) = full_rules("E -> E + T | T\nT -> identifier\n").unwrap();
        assert!(rest.is_empty());
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].lhs, "E");
        assert_eq!(rules[0].alternatives, vec![vec!["E", "+", "T"], vec!["T"]]);
        assert_eq!(rules[1].alternatives, vec![vec!["identifier"]]);
    }

    #[test]
    fn symbols_may_contain_metacharacters() {
        let (_, rules) = full_rules("exp -> exp >= exp | ( exp )\n").unwrap();
        assert_eq!(
            rules[0].alternatives,
            vec![vec!["exp", ">=", "exp"], vec!["(", "exp", ")"]]
        );
    }
}
