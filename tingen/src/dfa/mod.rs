//! # Deterministic Finite Automaton
//! The DFA module includes the [Dfa] struct, the executable form of a token
//! recognizer. A DFA is obtained from an [Nfa](crate::nfa::Nfa) by
//! [subset construction](crate::nfa::Nfa::to_dfa) and shrunk with
//! [Dfa::minimize].
//!
//! States are stored in an arena and addressed by dense indices; state 0 is
//! always the start state and every state is reachable from it. The
//! transition map of a state is partial: a missing entry is the trap, so
//! feeding a symbol with no entry rejects the input. There are no ε-moves
//! and at most one successor per symbol, by construction.
//!
//! Like NFA states, an accepting DFA state may carry a tag naming the token
//! kind it certifies. [Dfa::minimize] never merges accepting states with
//! different tags, so a minimized recognizer still tells keywords,
//! identifiers and numbers apart:
//!
//! ```
//! use tingen::parser;
//!
//! let dfa = parser::regex("(a|b)*abb").unwrap().to_nfa().to_dfa();
//! let minimized = dfa.minimize();
//! assert!(minimized.states().len() <= dfa.states().len());
//! assert!(minimized.accepts("babb"));
//! assert!(!minimized.accepts("ba"));
//! ```

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::rc::Rc;

/// A deterministic finite automaton, defined by its alphabet, an arena of
/// states and the index of the start state (always 0 for automata produced
/// by this crate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    pub(crate) alphabet: BTreeSet<char>,
    pub(crate) states: Vec<DfaState>,
    pub(crate) start: usize,
}

/// A state in a DFA. The id is the index in the arena; an absent transition
/// entry is the trap. The tag is only meaningful on accepting states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaState {
    pub(crate) accepting: bool,
    pub(crate) tag: Option<Rc<str>>,
    pub(crate) transitions: BTreeMap<char, usize>,
}

impl DfaState {
    /// Checks if this state is accepting
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// The token kind this state certifies, if it is a tagged accepting state
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// The transitions of this state; symbols without an entry trap
    pub fn transitions(&self) -> &BTreeMap<char, usize> {
        &self.transitions
    }
}

/// Block id used for the missing-transition target during refinement
const TRAP_BLOCK: usize = usize::MAX;

impl Dfa {
    /// Runs the automaton over `input`, returning the final state index, or
    /// `None` if some symbol hit the trap.
    fn run(&self, input: &str) -> Option<usize> {
        let mut state = self.start;
        for c in input.chars() {
            state = *self.states[state].transitions.get(&c)?;
        }
        Some(state)
    }

    /// Checks if this automaton accepts the given string.
    pub fn accepts(&self, input: &str) -> bool {
        self.run(input)
            .map_or(false, |state| self.states[state].accepting)
    }

    /// Classifies a candidate lexeme: the accept-tag of the state the input
    /// ends in, or `None` if the input is rejected or ends in an untagged
    /// state. The whole string is consumed; splitting the source text into
    /// candidates is the caller's job.
    pub fn accept_tag(&self, input: &str) -> Option<&str> {
        let state = &self.states[self.run(input)?];
        if state.accepting {
            state.tag.as_deref()
        } else {
            None
        }
    }

    /// Minimizes this DFA by partition refinement, returning a fresh
    /// automaton. The initial partition separates non-accepting states from
    /// accepting ones, with one block *per distinct accept-tag*, so states
    /// certifying different token kinds are never merged. Blocks are then
    /// split until every pair of states in a block agrees, for every symbol,
    /// on the destination block (the trap counts as a block of its own).
    /// The surviving blocks are renumbered densely breadth-first from the
    /// start block.
    pub fn minimize(&self) -> Dfa {
        let mut block_of: Vec<usize> = vec![0; self.states.len()];
        let mut blocks: Vec<Vec<usize>> = vec![Vec::new()];
        let mut tag_blocks: BTreeMap<Option<Rc<str>>, usize> = BTreeMap::new();
        for (idx, state) in self.states.iter().enumerate() {
            let block = if state.accepting {
                *tag_blocks.entry(state.tag.clone()).or_insert_with(|| {
                    blocks.push(Vec::new());
                    blocks.len() - 1
                })
            } else {
                0
            };
            block_of[idx] = block;
            blocks[block].push(idx);
        }

        let mut changed = true;
        while changed {
            changed = false;
            'scan: for block in 0..blocks.len() {
                if blocks[block].len() <= 1 {
                    continue;
                }
                for &c in &self.alphabet {
                    let mut fibers: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
                    for &state in &blocks[block] {
                        let dest = self.states[state]
                            .transitions
                            .get(&c)
                            .map_or(TRAP_BLOCK, |&t| block_of[t]);
                        fibers.entry(dest).or_default().push(state);
                    }
                    if fibers.len() > 1 {
                        let mut fibers = fibers.into_values();
                        blocks[block] = fibers
                            .next()
                            .expect("a split has at least two fibers");
                        for fiber in fibers {
                            let id = blocks.len();
                            for &moved in &fiber {
                                block_of[moved] = id;
                            }
                            blocks.push(fiber);
                        }
                        changed = true;
                        break 'scan;
                    }
                }
            }
        }

        self.from_blocks(&blocks, &block_of)
    }

    /// Rebuilds a DFA with one state per block, renumbered densely
    /// breadth-first from the block containing the original start state.
    /// Accept flag, tag and transitions are taken from an arbitrary member,
    /// which is sound once refinement has converged.
    fn from_blocks(&self, blocks: &[Vec<usize>], block_of: &[usize]) -> Dfa {
        let mut new_id: Vec<Option<usize>> = vec![None; blocks.len()];
        let start_block = block_of[self.start];
        new_id[start_block] = Some(0);
        let mut queue = VecDeque::from([start_block]);
        let mut order: Vec<usize> = Vec::new();
        let mut next_id = 1;
        while let Some(block) = queue.pop_front() {
            order.push(block);
            let representative = blocks[block][0];
            for &target in self.states[representative].transitions.values() {
                let dest = block_of[target];
                if new_id[dest].is_none() {
                    new_id[dest] = Some(next_id);
                    next_id += 1;
                    queue.push_back(dest);
                }
            }
        }

        let states = order
            .iter()
            .map(|&block| {
                let representative = &self.states[blocks[block][0]];
                DfaState {
                    accepting: representative.accepting,
                    tag: representative.tag.clone(),
                    transitions: representative
                        .transitions
                        .iter()
                        .map(|(&c, &target)| {
                            let id = new_id[block_of[target]]
                                .expect("destination blocks are numbered before emission");
                            (c, id)
                        })
                        .collect(),
                }
            })
            .collect();

        Dfa {
            alphabet: self.alphabet.clone(),
            states,
            start: 0,
        }
    }

    /// Finds the states reachable from the start state, as indices.
    pub fn reachable_state_idx(&self) -> BTreeSet<usize> {
        let mut reachable = BTreeSet::from([self.start]);
        let mut frontier = vec![self.start];
        while let Some(state) = frontier.pop() {
            for &target in self.states[state].transitions.values() {
                if reachable.insert(target) {
                    frontier.push(target);
                }
            }
        }
        reachable
    }

    /// Gets the alphabet of this DFA
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    /// Gets the states of this DFA
    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    /// Gets the index of the start state
    pub fn start_index(&self) -> usize {
        self.start
    }
}
