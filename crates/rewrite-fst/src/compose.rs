// Composition with epsilon-sequencing filters.

use std::borrow::Cow;
use std::collections::VecDeque;

use hashbrown::HashMap;
use rewrite_core::{EPSILON, Label, Semiring};

use crate::fst::{FstProperties, StateId, Transition, VectorFst};
use crate::ops::{ArcSortType, arc_sort, connect};

/// Composition filter: decides in which order epsilon moves of the two
/// operands may interleave between two matching moves.
///
/// Without a filter, a left output-epsilon and a right input-epsilon can be
/// taken in either order (or together), producing duplicate paths whose
/// weights are then combined incorrectly. Both filters here admit exactly
/// one interleaving and never move both sides on epsilon at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ComposeFilter {
    /// Right-side input-epsilon moves first, then left-side output-epsilon
    /// moves.
    #[default]
    AltSequence,
    /// Left-side output-epsilon moves first, then right-side input-epsilon
    /// moves.
    Sequence,
}

/// Filter state: `0` until the "second" side has moved alone since the
/// last match, `1` afterwards.
type FilterState = u8;

impl ComposeFilter {
    /// Filter state after the left operand moves alone on an output epsilon,
    /// or `None` if the move is blocked.
    #[inline]
    fn left_alone(self, state: FilterState) -> Option<FilterState> {
        match self {
            Self::AltSequence => Some(1),
            Self::Sequence => (state == 0).then_some(0),
        }
    }

    /// Filter state after the right operand moves alone on an input epsilon.
    #[inline]
    fn right_alone(self, state: FilterState) -> Option<FilterState> {
        match self {
            Self::AltSequence => (state == 0).then_some(0),
            Self::Sequence => Some(1),
        }
    }
}

/// Transitions of a state sorted by input label whose input label is `label`.
fn matching<W>(transitions: &[Transition<W>], label: Label) -> &[Transition<W>] {
    let lo = transitions.partition_point(|t| t.ilabel < label);
    let hi = lo + transitions[lo..].partition_point(|t| t.ilabel == label);
    &transitions[lo..hi]
}

struct Builder<W> {
    out: VectorFst<W>,
    table: HashMap<(StateId, StateId, FilterState), StateId>,
    queue: VecDeque<(StateId, StateId, FilterState)>,
}

impl<W: Semiring> Builder<W> {
    fn state(&mut self, key: (StateId, StateId, FilterState)) -> StateId {
        if let Some(&id) = self.table.get(&key) {
            return id;
        }
        let id = self.out.add_state();
        self.table.insert(key, id);
        self.queue.push_back(key);
        id
    }

    fn add(
        &mut self,
        source: StateId,
        key: (StateId, StateId, FilterState),
        ilabel: Label,
        olabel: Label,
        weight: W,
    ) {
        if weight.is_zero() {
            return;
        }
        let target = self.state(key);
        self.out
            .add_transition(source, Transition::new(ilabel, olabel, weight, target));
    }
}

/// Compose `left` with `right`: the result maps `x` to `z` with weight
/// `⊕ (left(x, y) ⊗ right(y, z))` over all `y`.
///
/// `right` is matched by binary search on input labels; when it is not
/// known to be input-label sorted a sorted copy is made first. The result is
/// connected, so a composition with no successful path has no start state.
pub fn compose<W: Semiring>(
    left: &VectorFst<W>,
    right: &VectorFst<W>,
    filter: ComposeFilter,
) -> VectorFst<W> {
    let right: Cow<'_, VectorFst<W>> =
        if right.properties().contains(FstProperties::ILABEL_SORTED) {
            Cow::Borrowed(right)
        } else {
            Cow::Owned(arc_sort(right, ArcSortType::ILabel))
        };
    let right = right.as_ref();

    let (Some(s1), Some(s2)) = (left.start(), right.start()) else {
        return VectorFst::new();
    };

    let mut b = Builder {
        out: VectorFst::new(),
        table: HashMap::new(),
        queue: VecDeque::new(),
    };
    let start = b.state((s1, s2, 0));
    b.out.set_start(start);

    while let Some(key) = b.queue.pop_front() {
        let (q1, q2, fs) = key;
        let source = b.table[&key];

        let final_weight = left.final_weight(q1).times(right.final_weight(q2));
        if !final_weight.is_zero() {
            b.out.set_final(source, final_weight);
        }

        for t1 in left.transitions(q1) {
            if t1.olabel == EPSILON {
                if let Some(next_fs) = filter.left_alone(fs) {
                    b.add(
                        source,
                        (t1.target, q2, next_fs),
                        t1.ilabel,
                        EPSILON,
                        t1.weight.clone(),
                    );
                }
                continue;
            }
            for t2 in matching(right.transitions(q2), t1.olabel) {
                b.add(
                    source,
                    (t1.target, t2.target, 0),
                    t1.ilabel,
                    t2.olabel,
                    t1.weight.times(&t2.weight),
                );
            }
        }

        if let Some(next_fs) = filter.right_alone(fs) {
            for t2 in matching(right.transitions(q2), EPSILON) {
                b.add(
                    source,
                    (q1, t2.target, next_fs),
                    EPSILON,
                    t2.olabel,
                    t2.weight.clone(),
                );
            }
        }
    }

    connect(&b.out)
}
