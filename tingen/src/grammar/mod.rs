//! # Context-free grammar model
//! The [Grammar] struct holds the productions of the source language
//! together with the terminal and non-terminal vocabularies and the computed
//! FIRST and FOLLOW sets.
//!
//! Terminals are seeded from the lexer vocabulary: every keyword, every
//! symbol, plus `identifier`, `number` and the end marker `$`. Non-terminals
//! are exactly the left-hand sides of the rules. Every symbol in a
//! right-hand side must belong to one of the two sets; anything else fails
//! with [GrammarError::UnknownSymbol].
//!
//! Productions with an empty right-hand side are not modeled: FIRST sets are
//! ε-free, and optional constructs must be written as explicit alternatives.
//!
//! ```
//! use tingen::grammar::Grammar;
//! use std::rc::Rc;
//!
//! let rules = tingen::parser::pattern(
//!     "rules:\nE -> E + T | T\nT -> identifier\n"
//! ).unwrap();
//! let pattern: tingen::pattern::Pattern = rules.try_into().unwrap();
//! let grammar = Grammar::new(
//!     pattern.rules(),
//!     ["+", "identifier"].into_iter().map(Rc::from),
//!     "E",
//! ).unwrap();
//! assert!(grammar.first("E").unwrap().contains("identifier"));
//! assert!(grammar.follow("T").unwrap().contains("+"));
//! ```

use crate::pattern::{Pattern, Rule};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;
use thiserror::Error;

/// The reserved end-of-input marker, always part of the terminal set.
pub const END_MARKER: &str = "$";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarError {
    #[error("unknown symbol '{symbol}' in a production for '{lhs}'")]
    UnknownSymbol { symbol: String, lhs: String },
    #[error("a production for '{0}' has an empty alternative")]
    EmptyAlternative(String),
    #[error("start symbol '{0}' has no productions")]
    UnknownStart(String),
}

/// A production: one non-terminal with all of its alternatives, each an
/// ordered sequence of grammar symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub(crate) lhs: Rc<str>,
    pub(crate) alternatives: Vec<Vec<Rc<str>>>,
}

impl Production {
    /// The left-hand side non-terminal
    pub fn lhs(&self) -> &Rc<str> {
        &self.lhs
    }

    /// The right-hand side alternatives
    pub fn alternatives(&self) -> &[Vec<Rc<str>>] {
        &self.alternatives
    }
}

/// A context-free grammar with its FIRST and FOLLOW sets, computed once at
/// construction and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    pub(crate) start: Rc<str>,
    pub(crate) terminals: BTreeSet<Rc<str>>,
    pub(crate) non_terminals: BTreeSet<Rc<str>>,
    pub(crate) productions: Vec<Production>,
    pub(crate) first: BTreeMap<Rc<str>, BTreeSet<Rc<str>>>,
    pub(crate) follow: BTreeMap<Rc<str>, BTreeSet<Rc<str>>>,
}

impl Grammar {
    /// Builds a grammar from rules and a terminal vocabulary. The end marker
    /// `$` is always added to the terminals. FIRST and FOLLOW sets are
    /// computed here, to a fixed point.
    pub fn new(
        rules: &[Rule],
        terminals: impl IntoIterator<Item = Rc<str>>,
        start: &str,
    ) -> Result<Self, GrammarError> {
        let mut terminals: BTreeSet<Rc<str>> = terminals.into_iter().collect();
        terminals.insert(Rc::from(END_MARKER));
        let non_terminals: BTreeSet<Rc<str>> =
            rules.iter().map(|rule| rule.lhs.clone()).collect();

        if !non_terminals.contains(start) {
            return Err(GrammarError::UnknownStart(start.to_string()));
        }

        let productions: Vec<Production> = rules
            .iter()
            .map(|rule| Production {
                lhs: rule.lhs.clone(),
                alternatives: rule.alternatives.clone(),
            })
            .collect();

        for production in &productions {
            for alternative in &production.alternatives {
                if alternative.is_empty() {
                    return Err(GrammarError::EmptyAlternative(
                        production.lhs.to_string(),
                    ));
                }
                for symbol in alternative {
                    if !terminals.contains(symbol) && !non_terminals.contains(symbol) {
                        return Err(GrammarError::UnknownSymbol {
                            symbol: symbol.to_string(),
                            lhs: production.lhs.to_string(),
                        });
                    }
                }
            }
        }

        let first = Self::compute_first(&terminals, &non_terminals, &productions);
        let follow = Self::compute_follow(&non_terminals, &productions, &first, start);

        Ok(Grammar {
            start: Rc::from(start),
            terminals,
            non_terminals,
            productions,
            first,
            follow,
        })
    }

    /// Builds the grammar of a pattern file: terminals are the keywords and
    /// symbols plus `identifier` and `number`, the rules and start symbol
    /// come from the file.
    pub fn from_pattern(pattern: &Pattern) -> Result<Self, GrammarError> {
        let terminals = pattern
            .keywords()
            .iter()
            .chain(pattern.symbols())
            .cloned()
            .chain([Rc::from("identifier"), Rc::from("number")]);
        Self::new(pattern.rules(), terminals, pattern.start())
    }

    /// Builds a grammar from a standalone rules file (see
    /// [crate::parser::rules]), accumulating repeated left-hand sides the
    /// same way the pattern reader does.
    pub fn from_rules(
        parsed: &[crate::parser::ParsedRule<'_>],
        terminals: impl IntoIterator<Item = Rc<str>>,
        start: &str,
    ) -> Result<Self, GrammarError> {
        Self::new(&Rule::accumulate(parsed), terminals, start)
    }

    /// FIRST(t) = {t} for terminals; for a non-terminal, the fixed-point
    /// union of FIRST of the leading symbol of each alternative. There is no
    /// ε, so only the leading symbol contributes.
    fn compute_first(
        terminals: &BTreeSet<Rc<str>>,
        non_terminals: &BTreeSet<Rc<str>>,
        productions: &[Production],
    ) -> BTreeMap<Rc<str>, BTreeSet<Rc<str>>> {
        let mut first: BTreeMap<Rc<str>, BTreeSet<Rc<str>>> = BTreeMap::new();
        for terminal in terminals {
            first.insert(terminal.clone(), BTreeSet::from([terminal.clone()]));
        }
        for non_terminal in non_terminals {
            first.entry(non_terminal.clone()).or_default();
        }

        let mut changed = true;
        while changed {
            changed = false;
            for production in productions {
                for alternative in &production.alternatives {
                    let head = &alternative[0];
                    let additions = first
                        .get(head)
                        .cloned()
                        .unwrap_or_default();
                    let target = first
                        .get_mut(&production.lhs)
                        .expect("every non-terminal has a FIRST set");
                    for symbol in additions {
                        changed |= target.insert(symbol);
                    }
                }
            }
        }
        first
    }

    /// FOLLOW(start) starts as {$}; then for every production `B → α A β`,
    /// FIRST(β) flows into FOLLOW(A), and FOLLOW(B) flows into FOLLOW(A)
    /// when β is empty. Iterated to convergence.
    fn compute_follow(
        non_terminals: &BTreeSet<Rc<str>>,
        productions: &[Production],
        first: &BTreeMap<Rc<str>, BTreeSet<Rc<str>>>,
        start: &str,
    ) -> BTreeMap<Rc<str>, BTreeSet<Rc<str>>> {
        let mut follow: BTreeMap<Rc<str>, BTreeSet<Rc<str>>> = non_terminals
            .iter()
            .map(|nt| (nt.clone(), BTreeSet::new()))
            .collect();
        if let Some(start_follow) = follow.get_mut(start) {
            start_follow.insert(Rc::from(END_MARKER));
        }

        let mut changed = true;
        while changed {
            changed = false;
            for production in productions {
                for alternative in &production.alternatives {
                    for (position, symbol) in alternative.iter().enumerate() {
                        if !non_terminals.contains(symbol) {
                            continue;
                        }
                        let additions: BTreeSet<Rc<str>> = match alternative.get(position + 1)
                        {
                            Some(next) => {
                                first.get(next).cloned().unwrap_or_default()
                            }
                            None => follow
                                .get(&production.lhs)
                                .cloned()
                                .unwrap_or_default(),
                        };
                        let target = follow
                            .get_mut(symbol)
                            .expect("every non-terminal has a FOLLOW set");
                        for terminal in additions {
                            changed |= target.insert(terminal);
                        }
                    }
                }
            }
        }
        follow
    }

    /// Checks if the symbol is a terminal
    pub fn is_terminal(&self, symbol: &str) -> bool {
        self.terminals.contains(symbol)
    }

    /// Checks if the symbol is a non-terminal
    pub fn is_non_terminal(&self, symbol: &str) -> bool {
        self.non_terminals.contains(symbol)
    }

    /// The start symbol
    pub fn start(&self) -> &Rc<str> {
        &self.start
    }

    /// The terminal set, including `$`
    pub fn terminals(&self) -> &BTreeSet<Rc<str>> {
        &self.terminals
    }

    /// The non-terminal set
    pub fn non_terminals(&self) -> &BTreeSet<Rc<str>> {
        &self.non_terminals
    }

    /// The productions, in rule order
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// FIRST(X) for a single symbol
    pub fn first(&self, symbol: &str) -> Option<&BTreeSet<Rc<str>>> {
        self.first.get(symbol)
    }

    /// FOLLOW(A) for a single non-terminal
    pub fn follow(&self, symbol: &str) -> Option<&BTreeSet<Rc<str>>> {
        self.follow.get(symbol)
    }

    /// All FIRST sets, keyed by symbol
    pub fn first_sets(&self) -> &BTreeMap<Rc<str>, BTreeSet<Rc<str>>> {
        &self.first
    }

    /// All FOLLOW sets, keyed by non-terminal
    pub fn follow_sets(&self) -> &BTreeMap<Rc<str>, BTreeSet<Rc<str>>> {
        &self.follow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expression_grammar() -> Grammar {
        let pattern: Pattern = crate::parser::pattern(
            "symbols: + * ( )\nstart: E\nrules:\nE -> E + T | T\nT -> T * F | F\nF -> ( E ) | identifier\n",
        )
        .unwrap()
        .try_into()
        .unwrap();
        Grammar::from_pattern(&pattern).unwrap()
    }

    fn set(symbols: &[&str]) -> BTreeSet<Rc<str>> {
        symbols.iter().map(|s| Rc::from(*s)).collect()
    }

    #[test]
    fn first_sets_of_the_expression_grammar() {
        let grammar = expression_grammar();
        let expected = set(&["(", "identifier"]);
        assert_eq!(grammar.first("E"), Some(&expected));
        assert_eq!(grammar.first("T"), Some(&expected));
        assert_eq!(grammar.first("F"), Some(&expected));
        assert_eq!(grammar.first("+"), Some(&set(&["+"])));
    }

    #[test]
    fn follow_sets_of_the_expression_grammar() {
        let grammar = expression_grammar();
        assert_eq!(grammar.follow("E"), Some(&set(&["$", "+", ")"])));
        assert_eq!(grammar.follow("T"), Some(&set(&["$", "+", "*", ")"])));
        assert_eq!(grammar.follow("F"), Some(&set(&["$", "+", "*", ")"])));
    }

    #[test]
    fn first_and_follow_are_fixed_points() {
        let grammar = expression_grammar();
        // FIRST closure: FIRST(lhs) includes FIRST of every leading symbol
        for production in grammar.productions() {
            for alternative in production.alternatives() {
                let head = grammar.first(&alternative[0]).unwrap();
                assert!(head.is_subset(grammar.first(production.lhs()).unwrap()));
            }
        }
        // FOLLOW closure: the flow conditions hold without further growth
        for production in grammar.productions() {
            for alternative in production.alternatives() {
                for (position, symbol) in alternative.iter().enumerate() {
                    if !grammar.is_non_terminal(symbol) {
                        continue;
                    }
                    let target = grammar.follow(symbol).unwrap();
                    match alternative.get(position + 1) {
                        Some(next) => {
                            assert!(grammar.first(next).unwrap().is_subset(target))
                        }
                        None => assert!(grammar
                            .follow(production.lhs())
                            .unwrap()
                            .is_subset(target)),
                    }
                }
            }
        }
    }

    #[test]
    fn standalone_rules_files_build_grammars() {
        let parsed = crate::parser::rules("E -> E + identifier\nE -> identifier\n").unwrap();
        let grammar = Grammar::from_rules(
            &parsed,
            ["+", "identifier"].into_iter().map(Rc::from),
            "E",
        )
        .unwrap();
        assert!(grammar.is_terminal("+"));
        assert_eq!(grammar.productions().len(), 1);
        assert_eq!(grammar.productions()[0].alternatives().len(), 2);
    }

    #[test]
    fn unknown_symbols_are_rejected() {
        let pattern: Pattern =
            crate::parser::pattern("start: S\nrules:\nS -> S mystery | identifier\n")
                .unwrap()
                .try_into()
                .unwrap();
        let error = Grammar::from_pattern(&pattern).unwrap_err();
        assert_eq!(
            error,
            GrammarError::UnknownSymbol {
                symbol: "mystery".to_string(),
                lhs: "S".to_string()
            }
        );
    }

    #[test]
    fn missing_start_symbol_is_rejected() {
        let pattern: Pattern = crate::parser::pattern("rules:\nS -> identifier\n")
            .unwrap()
            .try_into()
            .unwrap();
        let error = Grammar::from_pattern(&pattern).unwrap_err();
        assert_eq!(error, GrammarError::UnknownStart("program".to_string()));
    }
}
