//! # Lexer assembly
//! The [Lexer] struct turns a [Pattern](crate::pattern::Pattern) into one
//! recognizer DFA. Each keyword and symbol contributes a literal automaton
//! tagged with its own spelling; the identifier, number and comment regexes
//! contribute automata tagged `id`, `num` and `comment`. The tagged automata
//! are unioned into a master NFA, subset-constructed and minimized; the
//! resulting DFA classifies one candidate lexeme at a time.
//!
//! The recognizer consumes whole strings only. Splitting source text into
//! candidate lexemes is a separate, deliberately simple affair:
//! [Lexer::split] breaks on whitespace and on the characters occurring in
//! declared symbols, keeping comments together as one candidate. It is *not*
//! a longest-match scanner; `x:=1` splits into `x`, `:`, `=`, `1`, so the
//! two-character symbol `:=` is never formed. This mirrors the splitter
//! embedded in the emitted lexer (see [crate::codegen]).
//!
//! ```
//! use tingen::lexer::Lexer;
//! use tingen::pattern::Pattern;
//!
//! let pattern: Pattern = tingen::parser::pattern(
//!     "keywords: if then\nsymbols: + ;\nidentifier: l(l|d)*\nnumber: d+\n"
//! ).unwrap().try_into().unwrap();
//! let lexer = Lexer::new(pattern).unwrap();
//! assert_eq!(lexer.accept_tag("if"), Some("if"));
//! assert_eq!(lexer.accept_tag("x1"), Some("id"));
//! assert_eq!(lexer.accept_tag("42"), Some("num"));
//! assert_eq!(lexer.accept_tag("4x"), None);
//! ```

use crate::dfa::Dfa;
use crate::nfa::Nfa;
use crate::pattern::Pattern;
use crate::regex::{Regex, RegexParseError};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexerError {
    #[error("invalid {kind} pattern '{pattern}': {source}")]
    BadPattern {
        kind: &'static str,
        pattern: String,
        source: RegexParseError,
    },
    #[error("pattern file declares no tokens")]
    EmptyVocabulary,
}

/// One classified candidate lexeme, as printed by the emitted lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scanned {
    Token { tag: Rc<str>, lexeme: String },
    Invalid(String),
}

impl fmt::Display for Scanned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scanned::Token { tag, lexeme } => {
                // Only identifiers and numbers carry their lexeme; keywords,
                // symbols and comments are their own spelling
                if tag.as_ref() == "id" || tag.as_ref() == "num" {
                    write!(f, "Token: {tag} -> {lexeme}")
                } else {
                    write!(f, "Token: {tag}")
                }
            }
            Scanned::Invalid(lexeme) => write!(f, "Invalid token: {lexeme}"),
        }
    }
}

/// The assembled recognizer: the pattern it was built from and the minimized
/// DFA over the union of all token automata.
#[derive(Debug, Clone)]
pub struct Lexer {
    pattern: Pattern,
    dfa: Dfa,
}

impl Lexer {
    /// Builds the recognizer. Keywords and symbols become literal automata
    /// tagged with their spelling; the identifier, number and comment
    /// patterns are parsed as regexes and tagged `id`, `num` and `comment`.
    pub fn new(pattern: Pattern) -> Result<Self, LexerError> {
        let mut master: Option<Nfa> = None;

        for keyword in pattern.keywords() {
            let mut nfa = Regex::literal_string(keyword).to_nfa();
            nfa.set_accept_tag(keyword);
            master = merge(master, nfa);
        }
        for symbol in pattern.symbols() {
            let mut nfa = Regex::literal_string(symbol).to_nfa();
            nfa.set_accept_tag(symbol);
            master = merge(master, nfa);
        }
        for (kind, tag, regex) in [
            ("identifier", "id", pattern.identifier_regex()),
            ("number", "num", pattern.number_regex()),
            ("comment", "comment", pattern.comment_regex()),
        ] {
            let Some(regex) = regex else {
                continue;
            };
            let parsed =
                crate::parser::regex(&regex).map_err(|source| LexerError::BadPattern {
                    kind,
                    pattern: regex.clone(),
                    source,
                })?;
            let mut nfa = parsed.to_nfa();
            nfa.set_accept_tag(tag);
            master = merge(master, nfa);
        }

        let master = master.ok_or(LexerError::EmptyVocabulary)?;
        let dfa = master.to_dfa().minimize();
        Ok(Lexer { pattern, dfa })
    }

    /// Classifies one candidate lexeme: `Some(tag)` if the recognizer
    /// accepts the whole string, `None` otherwise.
    pub fn accept_tag(&self, lexeme: &str) -> Option<&str> {
        self.dfa.accept_tag(lexeme)
    }

    /// The minimized recognizer DFA
    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    /// The pattern the recognizer was built from
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Splits source text into candidate lexemes: whitespace separates,
    /// each symbol character stands alone, and a comment (block or line)
    /// is kept together as a single candidate, delimiters included. An
    /// unterminated block comment runs to the end of the input.
    pub fn split(&self, source: &str) -> Vec<String> {
        let chars: Vec<char> = source.chars().collect();
        let delimiters: String = match (
            self.pattern.comment.as_deref(),
            self.pattern.lcomment.as_deref(),
            self.pattern.rcomment.as_deref(),
        ) {
            (Some(line), _, _) => line.to_string(),
            (None, Some(open), Some(close)) => format!("{open}{close}"),
            _ => String::new(),
        };
        let split_chars: Vec<char> = self
            .pattern
            .symbol_chars()
            .into_iter()
            .filter(|c| !delimiters.contains(*c))
            .collect();

        let mut lexemes: Vec<String> = Vec::new();
        let mut token = String::new();
        let mut inside_comment = false;
        let mut position = 0;

        let flush = |token: &mut String, lexemes: &mut Vec<String>| {
            if !token.is_empty() {
                lexemes.push(std::mem::take(token));
            }
        };

        while position < chars.len() {
            if inside_comment {
                if let Some(close) = self.pattern.rcomment.as_deref() {
                    if matches_at(&chars, position, close) {
                        token.push_str(close);
                        position += close.chars().count();
                        flush(&mut token, &mut lexemes);
                        inside_comment = false;
                        continue;
                    }
                }
                token.push(chars[position]);
                position += 1;
                continue;
            }

            if let Some(open) = self.pattern.lcomment.as_deref() {
                if matches_at(&chars, position, open) {
                    flush(&mut token, &mut lexemes);
                    token.push_str(open);
                    position += open.chars().count();
                    inside_comment = true;
                    continue;
                }
            }
            if let Some(line) = self.pattern.comment.as_deref() {
                if matches_at(&chars, position, line) {
                    flush(&mut token, &mut lexemes);
                    while position < chars.len() && chars[position] != '\n' {
                        token.push(chars[position]);
                        position += 1;
                    }
                    flush(&mut token, &mut lexemes);
                    continue;
                }
            }

            let c = chars[position];
            if c.is_whitespace() {
                flush(&mut token, &mut lexemes);
            } else if split_chars.contains(&c) {
                flush(&mut token, &mut lexemes);
                lexemes.push(c.to_string());
            } else {
                token.push(c);
            }
            position += 1;
        }
        flush(&mut token, &mut lexemes);
        lexemes
    }

    /// Splits and classifies source text, one [Scanned] entry per candidate
    /// lexeme.
    pub fn scan(&self, source: &str) -> Vec<Scanned> {
        self.split(source)
            .into_iter()
            .map(|lexeme| match self.dfa.accept_tag(&lexeme) {
                Some(tag) => Scanned::Token {
                    tag: Rc::from(tag),
                    lexeme,
                },
                None => Scanned::Invalid(lexeme),
            })
            .collect()
    }
}

fn merge(master: Option<Nfa>, addition: Nfa) -> Option<Nfa> {
    Some(match master {
        Some(master) => Nfa::union(master, addition),
        None => addition,
    })
}

fn matches_at(chars: &[char], position: usize, needle: &str) -> bool {
    let mut offset = position;
    for c in needle.chars() {
        if chars.get(offset) != Some(&c) {
            return false;
        }
        offset += 1;
    }
    offset > position
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: &str = "\
keywords: if then else end repeat until read write
symbols: + - * / % < <> <= >= > = { } ; :=
lcomment: {
rcomment: }
identifier: l(l|d)*
number: d+(.d+)?(e(+|-)?d+)?
";

    fn tiny_lexer() -> Lexer {
        let pattern: Pattern = crate::parser::pattern(TINY).unwrap().try_into().unwrap();
        Lexer::new(pattern).unwrap()
    }

    #[test]
    fn keywords_beat_the_identifier_pattern() {
        let lexer = tiny_lexer();
        assert_eq!(lexer.accept_tag("if"), Some("if"));
        assert_eq!(lexer.accept_tag("repeat"), Some("repeat"));
        assert_eq!(lexer.accept_tag("ifx"), Some("id"));
    }

    #[test]
    fn numbers_with_fraction_and_exponent() {
        let lexer = tiny_lexer();
        assert_eq!(lexer.accept_tag("1234"), Some("num"));
        assert_eq!(lexer.accept_tag("1234.5"), Some("num"));
        assert_eq!(lexer.accept_tag("1234.5e-6"), Some("num"));
        assert_eq!(lexer.accept_tag("1234.5e+6"), Some("num"));
        assert_eq!(lexer.accept_tag("1234e6"), Some("num"));
        assert_eq!(lexer.accept_tag("1234a"), None);
        assert_eq!(lexer.accept_tag("1234."), None);
    }

    #[test]
    fn comments_need_their_closing_delimiter() {
        let lexer = tiny_lexer();
        assert_eq!(lexer.accept_tag("{abc}"), Some("comment"));
        assert_eq!(lexer.accept_tag("{abc"), None);
        assert_eq!(lexer.accept_tag("abc}"), None);
    }

    #[test]
    fn symbols_classify_as_themselves() {
        let lexer = tiny_lexer();
        assert_eq!(lexer.accept_tag(":="), Some(":="));
        assert_eq!(lexer.accept_tag("<>"), Some("<>"));
        assert_eq!(lexer.accept_tag("+"), Some("+"));
    }

    #[test]
    fn splitting_is_not_longest_match() {
        let lexer = tiny_lexer();
        assert_eq!(lexer.split("x:=1"), vec!["x", ":", "=", "1"]);
    }

    #[test]
    fn splitting_keeps_comments_together() {
        let lexer = tiny_lexer();
        assert_eq!(
            lexer.split("read x; { input x } write x"),
            vec!["read", "x", ";", "{ input x }", "write", "x"]
        );
    }

    #[test]
    fn scanning_formats_token_lines() {
        let lexer = tiny_lexer();
        let lines: Vec<String> = lexer
            .scan("read x ; x := 4")
            .iter()
            .map(Scanned::to_string)
            .collect();
        assert_eq!(
            lines,
            vec![
                "Token: read",
                "Token: id -> x",
                "Token: ;",
                "Token: id -> x",
                "Invalid token: :",
                "Token: =",
                "Token: num -> 4",
            ]
        );
    }

    #[test]
    fn empty_pattern_files_cannot_build_a_lexer() {
        let pattern: Pattern = crate::parser::pattern("start: program\n")
            .unwrap()
            .try_into()
            .unwrap();
        assert_eq!(Lexer::new(pattern).unwrap_err(), LexerError::EmptyVocabulary);
    }
}
