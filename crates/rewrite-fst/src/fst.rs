// Mutable weighted transducer: states, transitions, final weights.

use std::ops::Range;

use bitflags::bitflags;
use rewrite_core::{EPSILON, Label, Semiring};

/// State index. States are numbered densely from 0.
pub type StateId = u32;

/// A weighted, labeled transition to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<W> {
    pub ilabel: Label,
    pub olabel: Label,
    pub weight: W,
    pub target: StateId,
}

impl<W> Transition<W> {
    pub fn new(ilabel: Label, olabel: Label, weight: W, target: StateId) -> Self {
        Self {
            ilabel,
            olabel,
            weight,
            target,
        }
    }

    #[inline]
    pub fn is_epsilon(&self) -> bool {
        self.ilabel == EPSILON && self.olabel == EPSILON
    }
}

bitflags! {
    /// Facts about a transducer that algorithms guarantee and consumers test.
    ///
    /// A set bit is a guarantee; a cleared bit means "unknown or false".
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FstProperties: u32 {
        /// Every transition has `ilabel == olabel`.
        const ACCEPTOR = 1;
        /// No transition has both labels epsilon.
        const NO_EPSILONS = 1 << 1;
        /// Transitions of every state are sorted by input label.
        const ILABEL_SORTED = 1 << 2;
        /// Transitions of every state are sorted by output label.
        const OLABEL_SORTED = 1 << 3;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct State<W> {
    transitions: Vec<Transition<W>>,
    /// `W::zero()` when the state is not final.
    final_weight: W,
}

/// A weighted transducer stored as a vector of states.
///
/// A transducer with no start state is empty: it accepts nothing. Every
/// algorithm in this crate takes its input by reference and returns a new
/// `VectorFst`.
///
/// State ids passed to accessors must be below [`num_states`](Self::num_states);
/// out-of-range ids panic like slice indexing.
#[derive(Debug, Clone)]
pub struct VectorFst<W> {
    states: Vec<State<W>>,
    start: Option<StateId>,
    properties: FstProperties,
}

impl<W: Semiring> PartialEq for VectorFst<W> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.states == other.states
    }
}

impl<W: Semiring> Default for VectorFst<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Semiring> VectorFst<W> {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            start: None,
            properties: FstProperties::all(),
        }
    }

    /// A single-path acceptor for `labels` with weight one. Epsilon labels
    /// are dropped.
    pub fn linear_acceptor(labels: &[Label]) -> Self {
        let mut fst = Self::new();
        let mut state = fst.add_state();
        fst.set_start(state);
        for &label in labels.iter().filter(|&&l| l != EPSILON) {
            let next = fst.add_state();
            fst.add_transition(state, Transition::new(label, label, W::one(), next));
            state = next;
        }
        fst.set_final(state, W::one());
        fst
    }

    /// Union of weighted string pairs, one path per entry, sharing a start
    /// state. Shorter sides are padded with epsilon; the weight sits on the
    /// final state.
    pub fn string_map<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Vec<Label>, Vec<Label>, W)>,
    {
        let mut fst = Self::new();
        let start = fst.add_state();
        fst.set_start(start);
        for (input, output, weight) in entries {
            let len = input.len().max(output.len());
            let mut state = start;
            for i in 0..len {
                let ilabel = input.get(i).copied().unwrap_or(EPSILON);
                let olabel = output.get(i).copied().unwrap_or(EPSILON);
                let next = fst.add_state();
                fst.add_transition(state, Transition::new(ilabel, olabel, W::one(), next));
                state = next;
            }
            let combined = fst.final_weight(state).plus(&weight);
            fst.set_final(state, combined);
        }
        fst
    }

    pub fn add_state(&mut self) -> StateId {
        self.states.push(State {
            transitions: Vec::new(),
            final_weight: W::zero(),
        });
        (self.states.len() - 1) as StateId
    }

    pub fn set_start(&mut self, state: StateId) {
        debug_assert!((state as usize) < self.states.len());
        self.start = Some(state);
    }

    #[inline]
    pub fn start(&self) -> Option<StateId> {
        self.start
    }

    pub fn set_final(&mut self, state: StateId, weight: W) {
        self.states[state as usize].final_weight = weight;
    }

    #[inline]
    pub fn final_weight(&self, state: StateId) -> &W {
        &self.states[state as usize].final_weight
    }

    #[inline]
    pub fn is_final(&self, state: StateId) -> bool {
        !self.states[state as usize].final_weight.is_zero()
    }

    /// Append a transition, keeping the property bits truthful.
    pub fn add_transition(&mut self, state: StateId, transition: Transition<W>) {
        if transition.ilabel != transition.olabel {
            self.properties.remove(FstProperties::ACCEPTOR);
        }
        if transition.is_epsilon() {
            self.properties.remove(FstProperties::NO_EPSILONS);
        }
        let transitions = &mut self.states[state as usize].transitions;
        if let Some(last) = transitions.last() {
            if last.ilabel > transition.ilabel {
                self.properties.remove(FstProperties::ILABEL_SORTED);
            }
            if last.olabel > transition.olabel {
                self.properties.remove(FstProperties::OLABEL_SORTED);
            }
        }
        transitions.push(transition);
    }

    #[inline]
    pub fn transitions(&self, state: StateId) -> &[Transition<W>] {
        &self.states[state as usize].transitions
    }

    #[inline]
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Total number of transitions over all states.
    pub fn num_transitions(&self) -> usize {
        self.states.iter().map(|s| s.transitions.len()).sum()
    }

    pub fn states(&self) -> Range<StateId> {
        0..self.states.len() as StateId
    }

    #[inline]
    pub fn properties(&self) -> FstProperties {
        self.properties
    }

    /// True when the transducer has no start state and so accepts nothing.
    pub fn is_empty(&self) -> bool {
        self.start.is_none()
    }

    /// Replace every state's transitions with `f(state, transitions)` and
    /// recompute the property bits from scratch.
    pub(crate) fn rewrite_transitions<F>(&mut self, mut f: F)
    where
        F: FnMut(StateId, Vec<Transition<W>>) -> Vec<Transition<W>>,
    {
        for (id, state) in self.states.iter_mut().enumerate() {
            let old = std::mem::take(&mut state.transitions);
            state.transitions = f(id as StateId, old);
        }
        self.recompute_properties();
    }

    fn recompute_properties(&mut self) {
        let mut props = FstProperties::all();
        for state in &self.states {
            for pair in state.transitions.windows(2) {
                if pair[0].ilabel > pair[1].ilabel {
                    props.remove(FstProperties::ILABEL_SORTED);
                }
                if pair[0].olabel > pair[1].olabel {
                    props.remove(FstProperties::OLABEL_SORTED);
                }
            }
            for t in &state.transitions {
                if t.ilabel != t.olabel {
                    props.remove(FstProperties::ACCEPTOR);
                }
                if t.is_epsilon() {
                    props.remove(FstProperties::NO_EPSILONS);
                }
            }
        }
        self.properties = props;
    }
}
