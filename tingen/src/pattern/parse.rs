use crate::parser::ParsedPattern;
use crate::pattern::{Pattern, Rule};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError<'a> {
    #[error("unknown pattern key '{0}'")]
    UnknownKey(&'a str),
    #[error("both 'comment' and 'lcomment'/'rcomment' are set")]
    ConflictingCommentStyles,
    #[error("'lcomment' and 'rcomment' must be set together")]
    UnpairedCommentDelimiter,
}

impl<'a> TryFrom<ParsedPattern<'a>> for Pattern {
    type Error = PatternError<'a>;

    fn try_from(value: ParsedPattern<'a>) -> Result<Self, Self::Error> {
        use PatternError::*;
        let ParsedPattern { entries, rules } = value;

        let mut keywords = Vec::new();
        let mut symbols = Vec::new();
        let mut lcomment = None;
        let mut rcomment = None;
        let mut comment = None;
        let mut identifier = None;
        let mut number = None;
        let mut letters = Vec::new();
        let mut digits = Vec::new();
        let mut start = None;

        // A repeated key overwrites the earlier entry, like re-reading the
        // file would
        for (key, entry) in entries {
            match key {
                "keywords" => keywords = word_list(entry),
                "symbols" => symbols = word_list(entry),
                "lcomment" => lcomment = non_empty(entry),
                "rcomment" => rcomment = non_empty(entry),
                "comment" => comment = non_empty(entry),
                "identifier" => identifier = non_empty(entry),
                "number" => number = non_empty(entry),
                "letters" => letters = char_list(entry),
                "digits" => digits = char_list(entry),
                "start" => start = non_empty(entry),
                unknown => return Err(UnknownKey(unknown)),
            }
        }

        if comment.is_some() && (lcomment.is_some() || rcomment.is_some()) {
            return Err(ConflictingCommentStyles);
        }
        if lcomment.is_some() != rcomment.is_some() {
            return Err(UnpairedCommentDelimiter);
        }

        if letters.is_empty() {
            letters = ('a'..='z').collect();
        }
        if digits.is_empty() {
            digits = ('0'..='9').collect();
        }

        Ok(Pattern {
            keywords,
            symbols,
            lcomment,
            rcomment,
            comment,
            identifier,
            number,
            letters,
            digits,
            start: start.map_or_else(|| Rc::from("program"), |s| Rc::from(s.as_str())),
            rules: Rule::accumulate(&rules),
        })
    }
}

fn word_list(entry: &str) -> Vec<Rc<str>> {
    entry.split_whitespace().map(Rc::from).collect()
}

fn char_list(entry: &str) -> Vec<char> {
    entry.chars().filter(|c| !c.is_whitespace()).collect()
}

fn non_empty(entry: &str) -> Option<String> {
    if entry.is_empty() {
        None
    } else {
        Some(entry.to_string())
    }
}
