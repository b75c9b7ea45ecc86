//!# tingen
//!
//! `tingen` is a compiler-construction toolkit for a small TINY-like source
//! language, in two stages. The first stage reads a declarative *pattern
//! file* (keywords, symbols, comment delimiters, identifier/number regexes)
//! and produces a token recognizer; the second reads a context-free grammar
//! over the same vocabulary, builds an LR(0) automaton, checks it for
//! SLR(1) adequacy and drives a shift/reduce parser that yields a concrete
//! syntax tree and three-address pseudocode.
//!
//! ## Usage
//!
//! ```rust
//! use tingen::grammar::Grammar;
//! use tingen::lexer::Lexer;
//! use tingen::lr0::Lr0;
//! use tingen::pattern::Pattern;
//! use tingen::slr1::{Slr1, Validity};
//!
//! let file = "
//! keywords: read write
//! symbols: + ;
//! identifier: l(l|d)*
//! number: d+
//! rules:
//! program -> stmt ; program | stmt
//! stmt -> read identifier | write exp
//! exp -> exp + identifier | identifier
//! ";
//! // First pass parses the file shape, the second checks the invariants
//! let pattern: Pattern = tingen::parser::pattern(file).unwrap().try_into().unwrap();
//!
//! // Stage one: the token recognizer
//! let lexer = Lexer::new(pattern.clone()).unwrap();
//! assert_eq!(lexer.accept_tag("read"), Some("read"));
//! assert_eq!(lexer.accept_tag("x1"), Some("id"));
//!
//! // Stage two: grammar, tables, parser
//! let grammar = Grammar::from_pattern(&pattern).unwrap();
//! let parser = Slr1::new(Lr0::new(grammar).unwrap());
//! assert_eq!(parser.check(), Validity::Ok);
//!
//! let tokens = tingen::parser::tokens("Token: read\nToken: id -> x\n").unwrap();
//! let tree = parser.parse(&tokens).unwrap();
//! assert_eq!(tree.leaves(), vec!["read", "identifier -> x"]);
//! ```
//!
//! ## Pipeline
//!
//! The lexical side runs regex text → [Regex](regex::Regex) →
//! [Nfa](nfa::Nfa) (Thompson construction) → [Dfa](dfa::Dfa) (subset
//! construction) → minimized [Dfa](dfa::Dfa), with one tagged automaton per
//! token kind unioned before determinization. The syntactic side runs
//! grammar text → [Grammar](grammar::Grammar) (FIRST/FOLLOW) →
//! [Lr0](lr0::Lr0) (canonical collection) → [Slr1](slr1::Slr1) (adequacy
//! check and driver) → [Cst](cst::Cst) → three-address pseudocode.
//!
//! ## Operations
//!
//! This library currently supports:
//!
//! * [Parsing pattern files](parser::pattern), [rules files](parser::rules),
//!   [token streams](parser::tokens) and [regexes](parser::regex)
//! * [Thompson construction](regex::Regex::to_nfa) of ε-NFAs from regexes
//! * [Subset construction](nfa::Nfa::to_dfa) with accept-tag precedence
//! * [DFA minimization](dfa::Dfa::minimize) preserving accept tags
//! * [Assembling a full recognizer](lexer::Lexer::new) from a pattern file,
//!   plus [scanning text](lexer::Lexer::scan) into token lines
//! * [Emitting a standalone lexer program](codegen::generate_lexer)
//! * [FIRST/FOLLOW computation](grammar::Grammar), the
//!   [canonical LR(0) collection](lr0::Lr0), the
//!   [SLR(1) adequacy check](slr1::Slr1::check) and the
//!   [shift/reduce driver](slr1::Slr1::parse)
//! * [Lowering a syntax tree to pseudocode](cst::Cst::to_pseudocode)

pub mod cst;
pub mod codegen;
pub mod dfa;
pub mod grammar;
pub mod lexer;
pub mod lr0;
pub mod nfa;
pub mod parser;
pub mod pattern;
pub mod regex;
pub mod slr1;

#[cfg(test)]
mod tests;
