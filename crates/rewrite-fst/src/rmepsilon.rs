// Epsilon removal.

use std::collections::VecDeque;

use hashbrown::HashMap;
use rewrite_core::Semiring;
use rewrite_core::weight::DELTA;

use crate::fst::{StateId, Transition, VectorFst};
use crate::ops::connect;

/// Remove all transitions whose input and output labels are both epsilon.
///
/// Each state receives copies of the non-epsilon transitions and final
/// weights of every state in its epsilon closure, weighted by the closure
/// distance. The result is connected. On an epsilon-free connected input
/// the result equals the input, so the operation is idempotent.
pub fn rm_epsilon<W: Semiring>(fst: &VectorFst<W>) -> VectorFst<W> {
    let Some(start) = fst.start() else {
        return VectorFst::new();
    };
    let mut out = VectorFst::new();
    for _ in fst.states() {
        out.add_state();
    }
    out.set_start(start);

    for q in fst.states() {
        let mut final_weight = W::zero();
        for (p, d) in epsilon_closure(fst, q) {
            final_weight = final_weight.plus(&d.times(fst.final_weight(p)));
            for t in fst.transitions(p).iter().filter(|t| !t.is_epsilon()) {
                out.add_transition(
                    q,
                    Transition::new(t.ilabel, t.olabel, d.times(&t.weight), t.target),
                );
            }
        }
        out.set_final(q, final_weight);
    }
    connect(&out)
}

/// States reachable from `source` through epsilon transitions only, with
/// their shortest epsilon distance. `source` comes first with weight one;
/// the rest follow in discovery order.
fn epsilon_closure<W: Semiring>(fst: &VectorFst<W>, source: StateId) -> Vec<(StateId, W)> {
    let mut order = vec![source];
    let mut index: HashMap<StateId, usize> = HashMap::new();
    index.insert(source, 0);
    let mut distance = vec![W::one()];
    let mut residual = vec![W::one()];
    let mut queue = VecDeque::from([0usize]);
    let mut enqueued = vec![true];

    while let Some(i) = queue.pop_front() {
        enqueued[i] = false;
        let q = order[i];
        let r = std::mem::replace(&mut residual[i], W::zero());
        for t in fst.transitions(q).iter().filter(|t| t.is_epsilon()) {
            let extended = r.times(&t.weight);
            let j = *index.entry(t.target).or_insert_with(|| {
                order.push(t.target);
                distance.push(W::zero());
                residual.push(W::zero());
                enqueued.push(false);
                order.len() - 1
            });
            let updated = distance[j].plus(&extended);
            if !updated.approx_eq(&distance[j], DELTA) {
                distance[j] = updated;
                residual[j] = residual[j].plus(&extended);
                if !enqueued[j] {
                    enqueued[j] = true;
                    queue.push_back(j);
                }
            }
        }
    }
    order.into_iter().zip(distance).collect()
}
