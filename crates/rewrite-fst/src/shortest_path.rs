// n-best path extraction: best-first search guided by exact distances to
// the final states.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rewrite_core::{EPSILON, Label, NaturalOrder};

use crate::determinize::{DeterminizeConfig, determinize};
use crate::fst::{StateId, Transition, VectorFst};
use crate::shortest_distance::shortest_distance_reverse;

/// A path prefix discovered by the search.
struct Node<W> {
    state: StateId,
    /// Weight of the prefix from the start state.
    weight: W,
    parent: Option<usize>,
    /// The transition taken from `parent` into `state`.
    via: Option<(Label, Label, W)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    /// Expand the prefix's state.
    Expand,
    /// Report the prefix as a finished path ending in its (final) state.
    Complete,
}

/// Heap entry. Lower priority in the natural order pops first; equal
/// priorities pop in insertion order.
struct Entry<W> {
    priority: W,
    seq: u64,
    kind: EntryKind,
    node: usize,
}

impl<W: NaturalOrder> PartialEq for Entry<W> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<W: NaturalOrder> Eq for Entry<W> {}

impl<W: NaturalOrder> PartialOrd for Entry<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<W: NaturalOrder> Ord for Entry<W> {
    // Reversed: `BinaryHeap` is a max-heap.
    fn cmp(&self, other: &Self) -> Ordering {
        if self.priority.natural_less(&other.priority) {
            Ordering::Greater
        } else if other.priority.natural_less(&self.priority) {
            Ordering::Less
        } else {
            other.seq.cmp(&self.seq)
        }
    }
}

struct Search<W> {
    nodes: Vec<Node<W>>,
    heap: BinaryHeap<Entry<W>>,
    seq: u64,
}

impl<W: NaturalOrder> Search<W> {
    fn push(&mut self, node: Node<W>, priority: W, kind: EntryKind) {
        self.nodes.push(node);
        self.push_entry(self.nodes.len() - 1, priority, kind);
    }

    fn push_entry(&mut self, node: usize, priority: W, kind: EntryKind) {
        self.heap.push(Entry {
            priority,
            seq: self.seq,
            kind,
            node,
        });
        self.seq += 1;
    }

    /// Transitions from the start state to the end of `node`'s prefix.
    fn trace(&self, mut node: usize) -> Vec<(Label, Label, W)> {
        let mut steps = Vec::new();
        loop {
            let n = &self.nodes[node];
            let Some(parent) = n.parent else { break };
            if let Some(via) = &n.via {
                steps.push(via.clone());
            }
            node = parent;
        }
        steps.reverse();
        steps
    }
}

/// The `n` lowest-weight successful paths of `fst`, as a transducer that is
/// the union of one linear chain per path sharing a start state. Chains are
/// stored best first, so enumerating the result with [`paths`](crate::paths)
/// yields them in order of increasing weight; paths of equal weight keep the
/// order in which the search found them.
///
/// With `unique`, the input is determinized first so that no two returned
/// paths carry the same label sequence; this requires an acceptor.
///
/// The search is best-first on `prefix ⊗ distance-to-final`, which is exact,
/// and expands every state at most `n` times, so it terminates on cyclic
/// input as well. Requires the path property.
pub fn shortest_path<W: NaturalOrder>(fst: &VectorFst<W>, n: usize, unique: bool) -> VectorFst<W> {
    if unique {
        let det = determinize(fst, &DeterminizeConfig::default());
        return n_best(&det.fst, n);
    }
    n_best(fst, n)
}

fn n_best<W: NaturalOrder>(fst: &VectorFst<W>, n: usize) -> VectorFst<W> {
    let mut out = VectorFst::new();
    let Some(start) = fst.start() else {
        return out;
    };
    if n == 0 {
        return out;
    }
    let to_final = shortest_distance_reverse(fst);
    if to_final[start as usize].is_zero() {
        return out;
    }

    let mut search = Search {
        nodes: Vec::new(),
        heap: BinaryHeap::new(),
        seq: 0,
    };
    search.push(
        Node {
            state: start,
            weight: W::one(),
            parent: None,
            via: None,
        },
        to_final[start as usize].clone(),
        EntryKind::Expand,
    );

    let mut expanded = vec![0usize; fst.num_states()];
    let mut found = Vec::new();
    while let Some(entry) = search.heap.pop() {
        if entry.kind == EntryKind::Complete {
            found.push(entry.node);
            if found.len() == n {
                break;
            }
            continue;
        }

        let state = search.nodes[entry.node].state;
        if expanded[state as usize] >= n {
            continue;
        }
        expanded[state as usize] += 1;

        let prefix = search.nodes[entry.node].weight.clone();
        if fst.is_final(state) {
            let total = prefix.times(fst.final_weight(state));
            search.push_entry(entry.node, total, EntryKind::Complete);
        }
        for t in fst.transitions(state) {
            let remaining = &to_final[t.target as usize];
            if t.weight.is_zero() || remaining.is_zero() {
                continue;
            }
            let weight = prefix.times(&t.weight);
            let priority = weight.times(remaining);
            search.push(
                Node {
                    state: t.target,
                    weight,
                    parent: Some(entry.node),
                    via: Some((t.ilabel, t.olabel, t.weight.clone())),
                },
                priority,
                EntryKind::Expand,
            );
        }
    }

    let root = out.add_state();
    out.set_start(root);
    for (rank, node) in found.into_iter().enumerate() {
        let mut steps = search.trace(node);
        // A final root would be enumerated before every chain, so an empty
        // path that is not the best gets an epsilon chain of its own.
        if steps.is_empty() && rank > 0 {
            steps.push((EPSILON, EPSILON, W::one()));
        }
        let mut state = root;
        for (ilabel, olabel, weight) in steps {
            let next = out.add_state();
            out.add_transition(state, Transition::new(ilabel, olabel, weight, next));
            state = next;
        }
        let end = search.nodes[node].state;
        let final_weight = out.final_weight(state).plus(fst.final_weight(end));
        out.set_final(state, final_weight);
    }
    out
}
