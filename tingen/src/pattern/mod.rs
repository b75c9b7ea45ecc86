//! # Token pattern model
//! The [Pattern] struct is the validated form of a pattern file (see
//! [crate::parser] for the file syntax): the keyword and symbol
//! vocabularies, the comment style, the identifier/number regex templates,
//! the letter/digit character classes, the grammar start symbol and the
//! grammar rules.
//!
//! The identifier and number entries are written with the shorthands `l`
//! (any letter) and `d` (any digit). [Pattern::identifier_regex] and
//! [Pattern::number_regex] expand them into plain alternations over the
//! declared character classes, parenthesized so the expansion composes with
//! the surrounding operators:
//!
//! ```
//! use tingen::pattern::Pattern;
//!
//! let parsed = tingen::parser::pattern("identifier: l(l|d)*\nletters: ab\ndigits: 01\n").unwrap();
//! let pattern: Pattern = parsed.try_into().unwrap();
//! assert_eq!(pattern.identifier_regex(), Some("(a|b)((a|b)|(0|1))*".to_string()));
//! ```

use std::collections::BTreeSet;
use std::rc::Rc;

pub use parse::PatternError;

pub mod parse;

/// Regex surface-syntax operators; these may not appear inside comment text,
/// since the comment recognizer is itself built from a regex
const REGEX_OPERATORS: [char; 6] = ['(', ')', '|', '*', '+', '?'];

/// A validated pattern file: the full lexical description of the source
/// language plus its grammar rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub(crate) keywords: Vec<Rc<str>>,
    pub(crate) symbols: Vec<Rc<str>>,
    pub(crate) lcomment: Option<String>,
    pub(crate) rcomment: Option<String>,
    pub(crate) comment: Option<String>,
    pub(crate) identifier: Option<String>,
    pub(crate) number: Option<String>,
    pub(crate) letters: Vec<char>,
    pub(crate) digits: Vec<char>,
    pub(crate) start: Rc<str>,
    pub(crate) rules: Vec<Rule>,
}

/// A grammar rule: one left-hand side with its accumulated alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub(crate) lhs: Rc<str>,
    pub(crate) alternatives: Vec<Vec<Rc<str>>>,
}

impl Rule {
    /// The left-hand side non-terminal
    pub fn lhs(&self) -> &str {
        &self.lhs
    }

    /// The alternatives, each an ordered sequence of symbols
    pub fn alternatives(&self) -> &[Vec<Rc<str>>] {
        &self.alternatives
    }

    /// Folds parsed rule lines into one entry per left-hand side, keeping
    /// first-appearance order; repeated left-hand sides accumulate their
    /// alternatives.
    pub(crate) fn accumulate(parsed: &[crate::parser::ParsedRule<'_>]) -> Vec<Rule> {
        let mut merged: Vec<Rule> = Vec::new();
        for rule in parsed {
            let alternatives = rule
                .alternatives
                .iter()
                .map(|alt| alt.iter().map(|s| Rc::from(*s)).collect())
                .collect::<Vec<Vec<Rc<str>>>>();
            match merged.iter_mut().find(|r| r.lhs.as_ref() == rule.lhs) {
                Some(existing) => existing.alternatives.extend(alternatives),
                None => merged.push(Rule {
                    lhs: Rc::from(rule.lhs),
                    alternatives,
                }),
            }
        }
        merged
    }
}

impl Pattern {
    /// Checks if the lexeme is a declared keyword
    pub fn is_keyword(&self, lexeme: &str) -> bool {
        self.keywords.iter().any(|k| k.as_ref() == lexeme)
    }

    /// Checks if the lexeme is a declared symbol
    pub fn is_symbol(&self, lexeme: &str) -> bool {
        self.symbols.iter().any(|s| s.as_ref() == lexeme)
    }

    /// The declared keywords, in file order
    pub fn keywords(&self) -> &[Rc<str>] {
        &self.keywords
    }

    /// The declared symbols, in file order
    pub fn symbols(&self) -> &[Rc<str>] {
        &self.symbols
    }

    /// The letter class (defaults to `a..z`)
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    /// The digit class (defaults to `0..9`)
    pub fn digits(&self) -> &[char] {
        &self.digits
    }

    /// The grammar start symbol (defaults to `program`)
    pub fn start(&self) -> &Rc<str> {
        &self.start
    }

    /// The grammar rules, with alternatives accumulated per left-hand side
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The identifier regex with `l`/`d` expanded, if one was declared
    pub fn identifier_regex(&self) -> Option<String> {
        self.identifier.as_deref().map(|r| self.expand_classes(r))
    }

    /// The number regex with `l`/`d` expanded, if one was declared
    pub fn number_regex(&self) -> Option<String> {
        self.number.as_deref().map(|r| self.expand_classes(r))
    }

    /// Replaces every `l` with the letter alternation and every `d` with the
    /// digit alternation. Multi-character classes are parenthesized so a
    /// following postfix operator repeats the whole class.
    fn expand_classes(&self, template: &str) -> String {
        let letters = class_regex(&self.letters);
        let digits = class_regex(&self.digits);
        template
            .chars()
            .map(|c| match c {
                'l' => letters.clone(),
                'd' => digits.clone(),
                c => c.to_string(),
            })
            .collect()
    }

    /// Builds the regex recognizing one whole comment, if a comment style is
    /// configured: the opening delimiter, a starred alternation over every
    /// character allowed inside, and (for block comments) the closing
    /// delimiter. Inside a comment, all printable ASCII plus blanks is
    /// allowed except the regex operators and the delimiter characters;
    /// line comments additionally exclude line breaks.
    pub fn comment_regex(&self) -> Option<String> {
        let body = |excluded: &str, line: bool| {
            let mut chars: Vec<char> = (' '..='~').collect();
            chars.extend(['\t', '\n', '\r']);
            chars.retain(|c| !REGEX_OPERATORS.contains(c) && !excluded.contains(*c));
            if line {
                chars.retain(|c| *c != '\n' && *c != '\r');
            }
            class_regex(&chars)
        };
        match (&self.comment, &self.lcomment, &self.rcomment) {
            (Some(open), _, _) => Some(format!("{open}{}*", body(open, true))),
            (None, Some(open), Some(close)) => {
                let excluded = format!("{open}{close}");
                Some(format!("{open}{}*{close}", body(&excluded, false)))
            }
            _ => None,
        }
    }

    /// Every character occurring in a declared symbol. The input splitter
    /// breaks candidate lexemes on these.
    pub fn symbol_chars(&self) -> BTreeSet<char> {
        self.symbols.iter().flat_map(|s| s.chars()).collect()
    }
}

/// Renders a character class as a regex alternation, parenthesized when the
/// class has more than one member.
fn class_regex(chars: &[char]) -> String {
    match chars {
        [] => String::new(),
        [only] => only.to_string(),
        many => {
            let alternation = many
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join("|");
            format!("({alternation})")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(input: &str) -> Pattern {
        crate::parser::pattern(input).unwrap().try_into().unwrap()
    }

    #[test]
    fn classes_default_to_ascii_letters_and_digits() {
        let pattern = pattern("identifier: l\n");
        assert_eq!(pattern.letters().len(), 26);
        assert_eq!(pattern.digits().len(), 10);
        assert_eq!(pattern.start().as_ref(), "program");
    }

    #[test]
    fn block_comment_regex_excludes_delimiters() {
        let pattern = pattern("lcomment: {\nrcomment: }\n");
        let regex = pattern.comment_regex().unwrap();
        assert!(regex.starts_with('{'));
        assert!(regex.ends_with('}'));
        assert!(!regex[1..regex.len() - 1].contains('{'));
        assert!(!regex[1..regex.len() - 1].contains('}'));
    }

    #[test]
    fn line_comment_regex_excludes_line_breaks() {
        let pattern = pattern("comment: ;\n");
        let regex = pattern.comment_regex().unwrap();
        assert!(regex.starts_with(';'));
        assert!(regex.ends_with('*'));
        assert!(!regex.contains('\n'));
    }

    #[test]
    fn symbol_chars_are_the_union_of_symbol_characters() {
        let pattern = pattern("symbols: + := <>\n");
        assert_eq!(
            pattern.symbol_chars(),
            BTreeSet::from(['+', ':', '=', '<', '>'])
        );
    }
}
