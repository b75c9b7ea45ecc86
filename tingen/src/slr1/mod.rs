//! # SLR(1) analysis and parser driver
//! The [Slr1] struct wraps an [Lr0](crate::lr0::Lr0) automaton with the two
//! operations that need FOLLOW sets: the adequacy check and the shift/reduce
//! driver.
//!
//! [Slr1::check] classifies the automaton as [Validity::Ok],
//! [Validity::ShiftReduce] or [Validity::ReduceReduce]. A reduce item
//! `[A → γ ·]` conflicts with another reduce item when their left-hand
//! sides' FOLLOW sets intersect, and with a shift item when the symbol after
//! that item's dot lies in FOLLOW(A).
//!
//! [Slr1::parse] runs the driver over a token stream. The stack holds
//! `(state, tree)` pairs; a shift pushes a leaf with the formatted lexeme, a
//! reduce pops one pair per right-hand-side symbol and pushes the goto state
//! with a new interior node. Reaching the accept item, or draining the input
//! (including the synthetic `$`) with exactly two stack entries, is success;
//! everything else fails with [ParseError].

use crate::cst::Cst;
use crate::grammar::END_MARKER;
use crate::lr0::Lr0;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// One input token for the parser driver: a terminal kind and an optional
/// lexeme (empty for keywords and symbols).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub(crate) kind: Rc<str>,
    pub(crate) lexeme: String,
}

impl Token {
    pub fn new(kind: impl Into<Rc<str>>, lexeme: impl Into<String>) -> Self {
        Token {
            kind: kind.into(),
            lexeme: lexeme.into(),
        }
    }

    /// The synthetic end-of-input token
    pub fn end() -> Self {
        Token::new(END_MARKER, "")
    }

    /// The terminal kind
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The lexeme, empty for tokens without one
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// The label a shifted token gets in the tree: the kind alone when the
    /// lexeme is empty, `kind -> lexeme` otherwise.
    fn leaf_label(&self) -> String {
        if self.lexeme.is_empty() {
            self.kind.to_string()
        } else {
            format!("{} -> {}", self.kind, self.lexeme)
        }
    }
}

/// Verdict of the SLR(1) adequacy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Ok,
    ShiftReduce,
    ReduceReduce,
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validity::Ok => write!(f, "SLR(1)"),
            Validity::ShiftReduce => write!(f, "shift-reduce conflict"),
            Validity::ReduceReduce => write!(f, "reduce-reduce conflict"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no action for token '{token}' in state {state}")]
    InvalidInput { token: String, state: usize },
    #[error("parse ended with {0} entries on the stack")]
    Unfinished(usize),
}

/// The SLR(1) parser: an LR(0) automaton driven with FOLLOW-set guidance.
#[derive(Debug, Clone)]
pub struct Slr1 {
    pub(crate) tables: Lr0,
}

impl Slr1 {
    pub fn new(tables: Lr0) -> Self {
        Slr1 { tables }
    }

    /// The underlying LR(0) automaton
    pub fn tables(&self) -> &Lr0 {
        &self.tables
    }

    /// Checks SLR(1) adequacy. The first conflict found wins, scanning item
    /// sets in index order and items in their set order.
    pub fn check(&self) -> Validity {
        let empty = BTreeSet::new();
        let grammar = self.tables.grammar();
        for item_set in self.tables.item_sets() {
            for item in item_set.items() {
                if !item.is_reduce() {
                    continue;
                }
                let reduce_follow = grammar.follow(item.lhs()).unwrap_or(&empty);
                for other in item_set.items() {
                    if other == item {
                        continue;
                    }
                    if other.is_reduce() {
                        let other_follow = grammar.follow(other.lhs()).unwrap_or(&empty);
                        if !reduce_follow.is_disjoint(other_follow) {
                            return Validity::ReduceReduce;
                        }
                    } else if let Some(next) = other.next_symbol() {
                        if reduce_follow.contains(next) {
                            return Validity::ShiftReduce;
                        }
                    }
                }
            }
        }
        Validity::Ok
    }

    /// Runs the shift/reduce driver over the tokens, appending the synthetic
    /// `$` after input exhaustion, and returns the tree left on the stack.
    pub fn parse(&self, input: &[Token]) -> Result<Cst, ParseError> {
        let transitions = self.tables.transitions();
        let end = Token::end();
        let start_label = self.tables.grammar().start().clone();
        let mut stack: Vec<(usize, Cst)> = vec![(0, Cst::leaf(start_label))];
        let mut position = 0;

        // Runs until the accept item surfaces; a shift consumes one token, a
        // reduce replaces |γ| entries by one, and a state with neither
        // applicable rejects the input
        'driver: loop {
            let state = stack.last().map_or(0, |(state, _)| *state);
            let token = input.get(position).unwrap_or(&end);

            if let Some(&next) = transitions[state].get(token.kind()) {
                stack.push((next, Cst::leaf(token.leaf_label())));
                position += 1;
                continue;
            }

            for item in self.tables.item_sets()[state].items() {
                if !item.is_reduce() {
                    continue;
                }
                if item.is_accept() {
                    break 'driver;
                }
                let popped = item.rhs().len();
                if stack.len() <= popped {
                    continue;
                }
                let goto_state = stack[stack.len() - popped - 1].0;
                if let Some(&next) = transitions[goto_state].get(item.lhs().as_ref()) {
                    let children: Vec<Cst> = stack
                        .drain(stack.len() - popped..)
                        .map(|(_, node)| node)
                        .collect();
                    stack.push((next, Cst::with_children(item.lhs().clone(), children)));
                    continue 'driver;
                }
            }

            return Err(ParseError::InvalidInput {
                token: token.kind().to_string(),
                state,
            });
        }

        if position < input.len() {
            let state = stack.last().map_or(0, |(state, _)| *state);
            return Err(ParseError::InvalidInput {
                token: input[position].kind().to_string(),
                state,
            });
        }
        if stack.len() == 2 {
            Ok(stack.pop().map(|(_, node)| node).expect("stack has two entries"))
        } else {
            Err(ParseError::Unfinished(stack.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::pattern::Pattern;

    fn parser(input: &str) -> Slr1 {
        let pattern: Pattern = crate::parser::pattern(input).unwrap().try_into().unwrap();
        let grammar = Grammar::from_pattern(&pattern).unwrap();
        Slr1::new(Lr0::new(grammar).unwrap())
    }

    #[test]
    fn expression_grammar_is_slr1() {
        let slr = parser(
            "symbols: + * ( )\nstart: E\nrules:\nE -> E + T | T\nT -> T * F | F\nF -> ( E ) | identifier\n",
        );
        assert_eq!(slr.check(), Validity::Ok);
    }

    #[test]
    fn ambiguous_repetition_grammar_has_a_shift_reduce_conflict() {
        let slr = parser("keywords: a\nstart: S\nrules:\nS -> S S | a\n");
        assert_eq!(slr.check(), Validity::ShiftReduce);
    }

    #[test]
    fn identical_alternatives_under_different_names_reduce_reduce() {
        // A and B both derive `a` and share FOLLOW = {$}, so a state holds
        // two competing reduce items
        let slr = parser("keywords: a\nstart: S\nrules:\nS -> A | B\nA -> a\nB -> a\n");
        assert_eq!(slr.check(), Validity::ReduceReduce);
    }

    #[test]
    fn driver_builds_the_expression_tree() {
        let slr = parser(
            "symbols: + * ( )\nstart: program\nrules:\nprogram -> E\nE -> E + T | T\nT -> T * F | F\nF -> ( E ) | identifier\n",
        );
        let tokens = crate::parser::tokens(
            "Token: id -> x\nToken: +\nToken: id -> y\n",
        )
        .unwrap();
        let tree = slr.parse(&tokens).unwrap();
        assert_eq!(tree.label(), "program");
        assert_eq!(tree.children().len(), 1);
        let expression = &tree.children()[0];
        assert_eq!(expression.label(), "E");
        let child_labels: Vec<&str> = expression
            .children()
            .iter()
            .map(|child| child.label())
            .collect();
        assert_eq!(child_labels, vec!["E", "+", "T"]);
        assert_eq!(
            tree.leaves(),
            vec!["identifier -> x", "+", "identifier -> y"]
        );
    }

    #[test]
    fn driver_rejects_malformed_input() {
        let slr = parser(
            "symbols: +\nstart: E\nrules:\nE -> E + identifier | identifier\n",
        );
        let tokens = crate::parser::tokens("Token: +\n").unwrap();
        assert!(matches!(
            slr.parse(&tokens),
            Err(ParseError::InvalidInput { .. })
        ));
        let tokens = crate::parser::tokens("Token: id -> x\nToken: +\n").unwrap();
        assert!(slr.parse(&tokens).is_err());
    }

    #[test]
    fn shifted_lexemes_are_observable_in_the_tree() {
        let slr = parser("symbols: +\nstart: E\nrules:\nE -> E + identifier | identifier\n");
        let tokens = crate::parser::tokens("Token: id -> a\nToken: +\nToken: id -> b\n").unwrap();
        let tree = slr.parse(&tokens).unwrap();
        assert_eq!(tree.leaves(), vec!["identifier -> a", "+", "identifier -> b"]);
    }
}
