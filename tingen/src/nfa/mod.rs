//! # Nondeterministic Finite Automaton with ε-moves
//! The NFA module includes the [Nfa] struct, the intermediate form between a
//! parsed [Regex](crate::regex::Regex) and the executable
//! [Dfa](crate::dfa::Dfa). States live in an arena (`Vec<NfaState>`) and are
//! addressed by their dense index, so combining two automata is an index
//! offset rather than a pointer graph surgery, and ε-cycles are harmless.
//!
//! An NFA is built from the Thompson constructors ([Nfa::literal],
//! [Nfa::epsilon], [Nfa::union], [Nfa::concat], [Nfa::star], [Nfa::plus],
//! [Nfa::ques]) and compiled to a DFA by [Nfa::to_dfa] (subset
//! construction).
//!
//! Accepting states can carry a *tag*: the token kind that state certifies.
//! [Nfa::set_accept_tag] stamps every accepting state of a per-token
//! automaton before the automata are unioned into one recognizer, so the
//! subset construction can attribute a merged accepting state to a token
//! kind (see [Nfa::to_dfa] for the precedence rule).
//!
//! ```
//! use tingen::nfa::Nfa;
//!
//! // (ab)+ by hand
//! let nfa = Nfa::concat(Nfa::literal('a'), Nfa::literal('b')).plus();
//! let dfa = nfa.to_dfa();
//! assert!(dfa.accepts("abab"));
//! assert!(!dfa.accepts("aba"));
//! ```

use crate::dfa::{Dfa, DfaState};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::rc::Rc;

/// A nondeterministic finite automaton with ε-moves, denoted by its
/// alphabet, an arena of states and the index of the start state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    pub(crate) alphabet: BTreeSet<char>,
    pub(crate) states: Vec<NfaState>,
    pub(crate) start: usize,
}

/// A state in an NFA. The state's id is its index in the arena. ε-moves are
/// kept apart from the symbol transitions, which realizes the reserved ε
/// sentinel without widening the symbol type. The tag is only meaningful on
/// accepting states.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NfaState {
    pub(crate) accepting: bool,
    pub(crate) tag: Option<Rc<str>>,
    pub(crate) epsilon: Vec<usize>,
    pub(crate) transitions: BTreeMap<char, BTreeSet<usize>>,
}

impl NfaState {
    fn accepting() -> Self {
        NfaState {
            accepting: true,
            ..NfaState::default()
        }
    }

    /// Checks if this state is accepting
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// The token kind this state certifies, if it is a tagged accepting state
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// The ε-transitions of this state, as state indices
    pub fn epsilon_transitions(&self) -> &[usize] {
        &self.epsilon
    }

    /// The symbol transitions of this state, as sets of state indices
    pub fn transitions(&self) -> &BTreeMap<char, BTreeSet<usize>> {
        &self.transitions
    }

    fn demote(&mut self) {
        self.accepting = false;
        self.tag = None;
    }
}

impl Nfa {
    /// The automaton accepting exactly the one-character string `c`:
    /// `s → c → f`.
    pub fn literal(c: char) -> Self {
        let mut start = NfaState::default();
        start.transitions.insert(c, BTreeSet::from([1]));
        Nfa {
            alphabet: BTreeSet::from([c]),
            states: vec![start, NfaState::accepting()],
            start: 0,
        }
    }

    /// The automaton accepting exactly the empty string: `s → ε → f`.
    pub fn epsilon() -> Self {
        let start = NfaState {
            epsilon: vec![1],
            ..NfaState::default()
        };
        Nfa {
            alphabet: BTreeSet::new(),
            states: vec![start, NfaState::accepting()],
            start: 0,
        }
    }

    /// The union of two automata: a fresh start state with ε-moves to both
    /// operands' start states. Accepting states of both operands remain
    /// accepting (and keep their tags).
    pub fn union(a: Self, b: Self) -> Self {
        let (a_start, b_start) = (a.start, b.start);
        let mut nfa = Nfa {
            alphabet: BTreeSet::new(),
            states: vec![NfaState::default()],
            start: 0,
        };
        let a_off = nfa.absorb(a);
        let b_off = nfa.absorb(b);
        nfa.states[0].epsilon = vec![a_off + a_start, b_off + b_start];
        nfa
    }

    /// The concatenation of two automata: every accepting state of `a` gets
    /// an ε-move to the start of `b` and is demoted; `b`'s accepting states
    /// remain accepting.
    pub fn concat(a: Self, b: Self) -> Self {
        let b_start = b.start;
        let mut nfa = a;
        let a_len = nfa.states.len();
        let b_off = nfa.absorb(b);
        for state in &mut nfa.states[..a_len] {
            if state.accepting {
                state.epsilon.push(b_off + b_start);
                state.demote();
            }
        }
        nfa
    }

    /// Kleene star. Every accepting state gets an ε-move back to the start
    /// state, and the start state itself becomes accepting; no new state is
    /// allocated.
    pub fn star(mut self) -> Self {
        let start = self.start;
        for (idx, state) in self.states.iter_mut().enumerate() {
            if state.accepting && idx != start {
                state.epsilon.push(start);
            }
        }
        self.states[start].accepting = true;
        self
    }

    /// One-or-more repetition. A dedicated accepting state `e` is added;
    /// every previously accepting state gets an ε-move to `e` and is
    /// demoted, and `e` loops back to the start state.
    pub fn plus(mut self) -> Self {
        let end = self.states.len();
        for state in &mut self.states {
            if state.accepting {
                state.epsilon.push(end);
                state.demote();
            }
        }
        let mut end_state = NfaState::accepting();
        end_state.epsilon.push(self.start);
        self.states.push(end_state);
        self
    }

    /// Zero-or-one occurrence. A new start state `s` and accepting state `f`
    /// are added, with `s → ε → f` bypassing the operand entirely; every
    /// previously accepting state gets an ε-move to `f` and is demoted.
    pub fn ques(self) -> Self {
        let inner_start = self.start;
        let mut nfa = Nfa {
            alphabet: BTreeSet::new(),
            states: vec![NfaState::default()],
            start: 0,
        };
        let off = nfa.absorb(self);
        let end = nfa.states.len();
        for state in &mut nfa.states[off..] {
            if state.accepting {
                state.epsilon.push(end);
                state.demote();
            }
        }
        nfa.states[0].epsilon = vec![off + inner_start, end];
        nfa.states.push(NfaState::accepting());
        nfa
    }

    /// Appends the states of `other` to this arena, remapping all of its
    /// transitions past the end of the current state list, and merging the
    /// alphabets. Returns the id offset of the absorbed states.
    fn absorb(&mut self, other: Self) -> usize {
        let offset = self.states.len();
        self.alphabet.extend(other.alphabet);
        self.states
            .extend(other.states.into_iter().map(|mut state| {
                state.epsilon.iter_mut().for_each(|t| *t += offset);
                state.transitions = state
                    .transitions
                    .into_iter()
                    .map(|(c, set)| (c, set.into_iter().map(|t| t + offset).collect()))
                    .collect();
                state
            }));
        offset
    }

    /// Overwrites the accept-tag of every accepting state with `tag`. Called
    /// once per token automaton, before the union into the master NFA.
    pub fn set_accept_tag(&mut self, tag: &str) {
        let tag: Rc<str> = Rc::from(tag);
        for state in &mut self.states {
            if state.accepting {
                state.tag = Some(tag.clone());
            }
        }
    }

    /// The ε-closure of a set of states: the smallest superset closed under
    /// ε-moves.
    pub fn closure(&self, states: &BTreeSet<usize>) -> BTreeSet<usize> {
        let mut all = states.clone();
        let mut frontier: Vec<usize> = states.iter().copied().collect();
        while let Some(state) = frontier.pop() {
            for &target in &self.states[state].epsilon {
                if all.insert(target) {
                    frontier.push(target);
                }
            }
        }
        all
    }

    /// The set of states reachable from `states` on the symbol `c`, without
    /// taking any ε-moves.
    pub fn move_on(&self, states: &BTreeSet<usize>, c: char) -> BTreeSet<usize> {
        states
            .iter()
            .filter_map(|&state| self.states[state].transitions.get(&c))
            .flatten()
            .copied()
            .collect()
    }

    /// Converts this NFA to a DFA using the subset construction. States of
    /// the result are sets of NFA states, explored breadth-first from the
    /// ε-closure of the start state, so ids come out dense and the start
    /// state is 0. A merged accepting state takes its tag from the member
    /// with the smallest id whose tag is not `id`; `id` itself is only kept
    /// when no other tag appears in the set. This is what makes keywords
    /// beat the identifier pattern on the same lexeme.
    pub fn to_dfa(&self) -> Dfa {
        let start_set = self.closure(&BTreeSet::from([self.start]));
        let mut index: HashMap<BTreeSet<usize>, usize> = HashMap::new();
        index.insert(start_set.clone(), 0);
        let mut queue = VecDeque::from([start_set]);
        let mut states: Vec<DfaState> = Vec::new();

        while let Some(set) = queue.pop_front() {
            let mut transitions = BTreeMap::new();
            for &c in &self.alphabet {
                let moved = self.move_on(&set, c);
                if moved.is_empty() {
                    continue;
                }
                let target = self.closure(&moved);
                let id = match index.get(&target) {
                    Some(&id) => id,
                    None => {
                        let id = index.len();
                        index.insert(target.clone(), id);
                        queue.push_back(target);
                        id
                    }
                };
                transitions.insert(c, id);
            }
            let (accepting, tag) = self.merged_acceptance(&set);
            states.push(DfaState {
                accepting,
                tag,
                transitions,
            });
        }

        Dfa {
            alphabet: self.alphabet.clone(),
            states,
            start: 0,
        }
    }

    /// Resolves the acceptance flag and tag of a subset-construction state.
    /// Members are visited in ascending id order; the first tag wins, except
    /// that `id` yields to the first non-`id` tag encountered later.
    fn merged_acceptance(&self, set: &BTreeSet<usize>) -> (bool, Option<Rc<str>>) {
        let mut accepting = false;
        let mut tag: Option<Rc<str>> = None;
        for &id in set {
            let state = &self.states[id];
            if !state.accepting {
                continue;
            }
            accepting = true;
            if let Some(candidate) = &state.tag {
                match &tag {
                    None => tag = Some(candidate.clone()),
                    Some(current)
                        if current.as_ref() == "id" && candidate.as_ref() != "id" =>
                    {
                        tag = Some(candidate.clone())
                    }
                    _ => {}
                }
            }
        }
        (accepting, tag)
    }

    /// Gets the alphabet of this NFA
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    /// Gets the states of this NFA
    pub fn states(&self) -> &[NfaState] {
        &self.states
    }

    /// Gets the index of the start state
    pub fn start_index(&self) -> usize {
        self.start
    }
}
