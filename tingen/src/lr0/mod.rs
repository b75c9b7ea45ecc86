//! # LR(0) automaton
//! The [Lr0] struct augments a [Grammar](crate::grammar::Grammar) with
//! `Start → <start symbol>`, flattens the productions into single
//! productions (one right-hand side each), and builds the canonical
//! collection of LR(0) item sets together with the combined ACTION/GOTO
//! transition table.
//!
//! An [Item] is a production with a dot position; the *accept item* is
//! `Start → <start symbol> ·`. Item sets are interned by their contents, so
//! the state index is only a label. Shift and goto entries live in one
//! table (`transitions[state][symbol]`), keyed by terminal or non-terminal;
//! reduce actions are derived on demand from the reduce items of a state
//! (for SLR(1), filtered through FOLLOW sets by [Slr1](crate::slr1::Slr1)).
//!
//! ```
//! use tingen::grammar::Grammar;
//! use tingen::lr0::Lr0;
//! use tingen::pattern::Pattern;
//!
//! let pattern: Pattern = tingen::parser::pattern(
//!     "symbols: +\nstart: E\nrules:\nE -> E + identifier | identifier\n"
//! ).unwrap().try_into().unwrap();
//! let tables = Lr0::new(Grammar::from_pattern(&pattern).unwrap()).unwrap();
//! // State 0 shifts on `identifier` and has a goto on E
//! assert!(tables.transitions()[0].contains_key("identifier"));
//! assert!(tables.transitions()[0].contains_key("E"));
//! ```

use crate::grammar::Grammar;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Left-hand side of the synthetic start production added by augmentation.
pub const AUGMENTED_START: &str = "Start";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("duplicate production '{0} -> {1}'")]
    DuplicateProduction(String, String),
}

/// A production with exactly one right-hand side.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SingleProduction {
    pub(crate) lhs: Rc<str>,
    pub(crate) rhs: Rc<[Rc<str>]>,
}

impl SingleProduction {
    /// The left-hand side non-terminal
    pub fn lhs(&self) -> &Rc<str> {
        &self.lhs
    }

    /// The right-hand side symbols
    pub fn rhs(&self) -> &[Rc<str>] {
        &self.rhs
    }
}

/// An LR(0) item: a single production with a dot position in
/// `0..=rhs.len()`. Items compare by left-hand side, right-hand side and
/// dot; an item with the dot at the end is a *reduce item*.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub(crate) lhs: Rc<str>,
    pub(crate) rhs: Rc<[Rc<str>]>,
    pub(crate) dot: usize,
}

impl Item {
    /// Checks if the dot is at the end of the right-hand side
    pub fn is_reduce(&self) -> bool {
        self.dot == self.rhs.len()
    }

    /// Checks if this is the accept item `Start → <start symbol> ·`
    pub fn is_accept(&self) -> bool {
        self.lhs.as_ref() == AUGMENTED_START && self.is_reduce()
    }

    /// The symbol immediately after the dot, if any
    pub fn next_symbol(&self) -> Option<&Rc<str>> {
        self.rhs.get(self.dot)
    }

    /// The left-hand side of the item's production
    pub fn lhs(&self) -> &Rc<str> {
        &self.lhs
    }

    /// The right-hand side of the item's production
    pub fn rhs(&self) -> &[Rc<str>] {
        &self.rhs
    }

    fn advanced(&self) -> Item {
        Item {
            lhs: self.lhs.clone(),
            rhs: self.rhs.clone(),
            dot: self.dot + 1,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.lhs)?;
        for (position, symbol) in self.rhs.iter().enumerate() {
            if position == self.dot {
                write!(f, " .")?;
            }
            write!(f, " {symbol}")?;
        }
        if self.is_reduce() {
            write!(f, " .")?;
        }
        Ok(())
    }
}

/// A state of the LR(0) automaton: an interned set of items. Equality is by
/// contents; the index is the state's label in the transition table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSet {
    pub(crate) index: usize,
    pub(crate) items: BTreeSet<Item>,
}

impl ItemSet {
    /// The state index of this item set
    pub fn index(&self) -> usize {
        self.index
    }

    /// The items of this state
    pub fn items(&self) -> &BTreeSet<Item> {
        &self.items
    }
}

impl fmt::Display for ItemSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Id: {}", self.index)?;
        for item in &self.items {
            if item.is_reduce() {
                writeln!(f, "{item} (reduce)")?;
            } else {
                writeln!(f, "{item}")?;
            }
        }
        Ok(())
    }
}

/// The LR(0) automaton of an augmented grammar: flattened productions, the
/// canonical collection of item sets, and the shift/goto transition table.
#[derive(Debug, Clone)]
pub struct Lr0 {
    pub(crate) grammar: Grammar,
    pub(crate) productions: Vec<SingleProduction>,
    pub(crate) item_sets: Vec<ItemSet>,
    pub(crate) transitions: Vec<BTreeMap<Rc<str>, usize>>,
}

impl Lr0 {
    /// Augments the grammar and builds the canonical collection. Flattening
    /// the grammar's alternatives must not produce the same `(lhs, rhs)`
    /// pair twice; that fails with [TableError::DuplicateProduction].
    pub fn new(grammar: Grammar) -> Result<Self, TableError> {
        let start_rhs: Rc<[Rc<str>]> = Rc::from([grammar.start().clone()]);
        let mut productions = vec![SingleProduction {
            lhs: Rc::from(AUGMENTED_START),
            rhs: start_rhs,
        }];

        let mut seen: BTreeSet<SingleProduction> = BTreeSet::new();
        for production in grammar.productions() {
            for alternative in production.alternatives() {
                let single = SingleProduction {
                    lhs: production.lhs().clone(),
                    rhs: Rc::from(alternative.as_slice()),
                };
                if !seen.insert(single.clone()) {
                    return Err(TableError::DuplicateProduction(
                        single.lhs.to_string(),
                        single
                            .rhs
                            .iter()
                            .map(|s| s.as_ref())
                            .collect::<Vec<_>>()
                            .join(" "),
                    ));
                }
                productions.push(single);
            }
        }

        let mut lr0 = Lr0 {
            grammar,
            productions,
            item_sets: Vec::new(),
            transitions: Vec::new(),
        };
        lr0.construct_item_sets();
        Ok(lr0)
    }

    /// Builds the canonical collection from the closure of
    /// `[Start → · <start symbol>]`, interning goto targets by item-set
    /// contents until no new state appears.
    fn construct_item_sets(&mut self) {
        let initial_item = Item {
            lhs: self.productions[0].lhs.clone(),
            rhs: self.productions[0].rhs.clone(),
            dot: 0,
        };
        let mut initial = BTreeSet::from([initial_item]);
        self.closure(&mut initial);

        let mut intern: HashMap<BTreeSet<Item>, usize> = HashMap::new();
        intern.insert(initial.clone(), 0);
        self.item_sets.push(ItemSet {
            index: 0,
            items: initial,
        });
        self.transitions.push(BTreeMap::new());

        let symbols: Vec<Rc<str>> = self
            .grammar
            .terminals()
            .iter()
            .chain(self.grammar.non_terminals())
            .cloned()
            .collect();

        let mut state = 0;
        while state < self.item_sets.len() {
            let items = self.item_sets[state].items.clone();
            for symbol in &symbols {
                let next = self.goto(&items, symbol);
                if next.is_empty() {
                    continue;
                }
                let target = match intern.get(&next) {
                    Some(&target) => target,
                    None => {
                        let target = self.item_sets.len();
                        intern.insert(next.clone(), target);
                        self.item_sets.push(ItemSet {
                            index: target,
                            items: next,
                        });
                        self.transitions.push(BTreeMap::new());
                        target
                    }
                };
                self.transitions[state].insert(symbol.clone(), target);
            }
            state += 1;
        }
    }

    /// Extends the item set with `[B → · γ]` for every item `[A → α · B β]`
    /// with non-terminal B, until nothing new is added.
    pub(crate) fn closure(&self, items: &mut BTreeSet<Item>) {
        let mut changed = true;
        while changed {
            changed = false;
            let snapshot: Vec<Item> = items.iter().cloned().collect();
            for item in snapshot {
                let Some(next) = item.next_symbol() else {
                    continue;
                };
                if !self.grammar.is_non_terminal(next) {
                    continue;
                }
                for production in &self.productions {
                    if production.lhs != *next {
                        continue;
                    }
                    let new_item = Item {
                        lhs: production.lhs.clone(),
                        rhs: production.rhs.clone(),
                        dot: 0,
                    };
                    changed |= items.insert(new_item);
                }
            }
        }
    }

    /// `goto(I, X)`: every item of `I` with the dot before `X`, advanced
    /// past it, closed under [Lr0::closure].
    pub(crate) fn goto(&self, items: &BTreeSet<Item>, symbol: &Rc<str>) -> BTreeSet<Item> {
        let mut next: BTreeSet<Item> = items
            .iter()
            .filter(|item| item.next_symbol() == Some(symbol))
            .map(Item::advanced)
            .collect();
        if !next.is_empty() {
            self.closure(&mut next);
        }
        next
    }

    /// The grammar this automaton was built from
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// The flattened productions; index 0 is the synthetic start production
    pub fn productions(&self) -> &[SingleProduction] {
        &self.productions
    }

    /// The canonical collection of item sets
    pub fn item_sets(&self) -> &[ItemSet] {
        &self.item_sets
    }

    /// The combined shift/goto table: `transitions[state][symbol]` is the
    /// target state
    pub fn transitions(&self) -> &[BTreeMap<Rc<str>, usize>] {
        &self.transitions
    }
}
