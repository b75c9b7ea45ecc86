//! # tingen parser
//! This module contains parsers for the three text formats the toolkit
//! consumes, and the entry point for the regex surface syntax.
//!
//! ## Pattern files
//! A pattern file is line-oriented. Each line is `key: value`; the
//! recognized keys are `keywords:` and `symbols:` (space-separated lists),
//! `lcomment:`/`rcomment:` (block comment delimiters) or `comment:` (line
//! comment opener; the two styles are mutually exclusive), `identifier:` and
//! `number:` (regex strings where `l` stands for any letter and `d` for any
//! digit), `letters:` and `digits:` (character lists, defaulting to `a..z`
//! and `0..9`), and `start:` (the grammar start symbol, defaulting to
//! `program`). A final `rules:` line opens a block of grammar rules that
//! runs to the end of the file:
//!
//! ```text
//! keywords: if then else end repeat until read write
//! symbols: + - * / < = ;
//! lcomment: {
//! rcomment: }
//! identifier: l(l|d)*
//! number: d+(.d+)?
//! rules:
//! program -> stmt ; program | stmt
//! stmt -> if exp then program end
//! ```
//!
//! ## Rules files
//! The `rules:` block also exists standalone: lines of the form
//! `lhs -> rhs1 | rhs2 | …`, with whitespace separating the symbols of each
//! alternative. Repeated `lhs` lines accumulate alternatives.
//!
//! ## Token streams
//! The parser driver reads newline-separated lines `Token: <kind>` or
//! `Token: <kind> -> <lexeme>`. Lines reading `Token: comment` and blank
//! lines are skipped; the kinds `id` and `num` are rewritten to the grammar
//! terminals `identifier` and `number`.
//!
//! Parsing is done in two steps: the functions here parse the raw shape of
//! the file into `Parsed*` values, and the semantic modules check the
//! invariants (e.g. [Pattern](crate::pattern::Pattern) via `TryInto`).

mod pattern;
mod rules;
mod tokens;

use crate::regex::{Regex, RegexParseError};
use crate::slr1::Token;
use nom::{combinator::all_consuming, error::Error, Finish};

/// A pattern file as parsed from text, before any validation. `entries`
/// holds the `key: value` lines in file order; `rules` holds the trailing
/// rules block, possibly empty.
#[derive(Debug)]
pub struct ParsedPattern<'a> {
    pub entries: Vec<(&'a str, &'a str)>,
    pub rules: Vec<ParsedRule<'a>>,
}

/// One `lhs -> rhs1 | rhs2 | …` line.
#[derive(Debug, Clone)]
pub struct ParsedRule<'a> {
    pub lhs: &'a str,
    pub alternatives: Vec<Vec<&'a str>>,
}

/// One `Token:` line of a token-stream file.
#[derive(Debug, Clone)]
pub struct ParsedToken<'a> {
    pub kind: &'a str,
    pub lexeme: Option<&'a str>,
}

/// Parses a pattern file. The whole string must be parsable, otherwise this
/// function errors. Note that the result is a [ParsedPattern], which is not
/// guaranteed to be a valid [crate::pattern::Pattern]; use
/// [TryInto::try_into] for the checked conversion.
pub fn pattern(input: &str) -> Result<ParsedPattern, Error<&str>> {
    all_consuming(pattern::full_pattern)(input)
        .finish()
        .map(|(_, pattern)| pattern)
}

/// Parses a standalone rules file (the `rules:` block syntax without the
/// header). The whole string must be parsable, otherwise this function
/// errors.
pub fn rules(input: &str) -> Result<Vec<ParsedRule>, Error<&str>> {
    all_consuming(rules::full_rules)(input)
        .finish()
        .map(|(_, rules)| rules)
}

/// Parses a token-stream file into driver [Token]s. Blank lines and
/// `Token: comment` lines are dropped, and the lexer's `id`/`num` kinds are
/// rewritten to the grammar terminals `identifier`/`number`.
pub fn tokens(input: &str) -> Result<Vec<Token>, Error<&str>> {
    let parsed = all_consuming(tokens::full_tokens)(input)
        .finish()
        .map(|(_, tokens)| tokens)?;
    Ok(parsed
        .into_iter()
        .filter(|token| token.kind != "comment")
        .map(|token| {
            let kind = match token.kind {
                "id" => "identifier",
                "num" => "number",
                kind => kind,
            };
            Token::new(kind, token.lexeme.unwrap_or_default())
        })
        .collect())
}

/// Parses a regular expression in the surface syntax of
/// [crate::regex::parse]. All regexes successfully parsed by this function
/// are guaranteed to be valid.
pub fn regex(input: &str) -> Result<Regex, RegexParseError> {
    crate::regex::parse::parse(input)
}
