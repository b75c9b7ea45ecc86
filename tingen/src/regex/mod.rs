//! # Regular expressions
//! The pattern language for token definitions. It is a small, classical regex
//! dialect: single characters, `ε`, alternation `|`, implicit concatenation by
//! adjacency, the postfix operators `*` (zero or more), `+` (one or more) and
//! `?` (optional), and grouping with parentheses. Operator precedence from
//! high to low is postfix, concatenation, alternation.
//!
//! There are no character classes; the pattern file layer expands its `l`
//! (letter) and `d` (digit) shorthands into plain alternations before the
//! expression reaches this module (see [Pattern](crate::pattern::Pattern)).
//!
//! A [Regex] is turned into an ε-NFA with [Regex::to_nfa] using the Thompson
//! construction, one small automaton per syntax node:
//!
//! ```
//! use tingen::parser;
//!
//! let regex = parser::regex("a(b|c)*").unwrap();
//! let dfa = regex.to_nfa().to_dfa().minimize();
//! assert!(dfa.accepts("abcb"));
//! assert!(!dfa.accepts("ba"));
//! ```

use crate::nfa::Nfa;
use std::fmt;

pub use parse::RegexParseError;

pub mod parse;

/// A parsed regular expression. Children are owned by their parent node and
/// the tree is immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Regex {
    /// The empty string
    Epsilon,
    /// A single character
    Literal(char),
    /// Either of two alternatives
    Union(Box<Regex>, Box<Regex>),
    /// One expression followed by another
    Concat(Box<Regex>, Box<Regex>),
    /// Zero or more repetitions
    Star(Box<Regex>),
    /// One or more repetitions
    Plus(Box<Regex>),
    /// Zero or one occurrence
    Ques(Box<Regex>),
}

impl Regex {
    /// Builds a regex matching exactly the given string, as a chain of
    /// concatenated literals. No characters are interpreted as operators,
    /// which makes this the right constructor for keywords and symbols such
    /// as `:=` or `*` that may contain regex metacharacters.
    pub fn literal_string(s: &str) -> Regex {
        let mut chars = s.chars().rev();
        let last = match chars.next() {
            Some(c) => Regex::Literal(c),
            None => Regex::Epsilon,
        };
        chars.fold(last, |acc, c| {
            Regex::Concat(Box::new(Regex::Literal(c)), Box::new(acc))
        })
    }

    /// Converts this regular expression to an ε-NFA using the Thompson
    /// construction. Every accepting state of the result is untagged; use
    /// [Nfa::set_accept_tag] to stamp the token kind afterwards.
    pub fn to_nfa(&self) -> Nfa {
        match self {
            Regex::Epsilon => Nfa::epsilon(),
            Regex::Literal(c) => Nfa::literal(*c),
            Regex::Union(l, r) => Nfa::union(l.to_nfa(), r.to_nfa()),
            Regex::Concat(l, r) => Nfa::concat(l.to_nfa(), r.to_nfa()),
            Regex::Star(inner) => inner.to_nfa().star(),
            Regex::Plus(inner) => inner.to_nfa().plus(),
            Regex::Ques(inner) => inner.to_nfa().ques(),
        }
    }
}

impl fmt::Display for Regex {
    /// Writes the expression back in surface syntax. Groups are
    /// parenthesized conservatively, so the output may contain more
    /// parentheses than the input it was parsed from.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regex::Epsilon => write!(f, "ε"),
            Regex::Literal(c) => write!(f, "{c}"),
            Regex::Union(l, r) => write!(f, "({l}|{r})"),
            Regex::Concat(l, r) => write!(f, "{l}{r}"),
            Regex::Star(inner) => write!(f, "({inner})*"),
            Regex::Plus(inner) => write!(f, "({inner})+"),
            Regex::Ques(inner) => write!(f, "({inner})?"),
        }
    }
}
