// Single-source shortest distances (generic semiring relaxation).

use std::collections::VecDeque;

use rewrite_core::Semiring;
use rewrite_core::weight::DELTA;

use crate::fst::{StateId, VectorFst};

/// Distance from the start state to every state: the `⊕`-sum over all paths
/// from the start of the path weights. Unreachable states get `W::zero()`.
///
/// Uses the generic relaxation algorithm with a FIFO queue, so it terminates
/// for acyclic transducers in any semiring and for cyclic ones in semirings
/// where cycles do not improve distances (e.g. tropical with non-negative
/// cycle weights).
pub fn shortest_distance<W: Semiring>(fst: &VectorFst<W>) -> Vec<W> {
    let n = fst.num_states();
    let mut distance = vec![W::zero(); n];
    let Some(start) = fst.start() else {
        return distance;
    };
    let mut residual = vec![W::zero(); n];
    distance[start as usize] = W::one();
    residual[start as usize] = W::one();
    relax(&mut distance, &mut residual, [start], move |q| {
        fst.transitions(q).iter().map(|t| (t.target, &t.weight))
    });
    distance
}

/// Distance from every state to the final states: the `⊕`-sum over all
/// successful paths leaving the state. States that cannot reach a final
/// state get `W::zero()`.
pub fn shortest_distance_reverse<W: Semiring>(fst: &VectorFst<W>) -> Vec<W> {
    let n = fst.num_states();
    let mut reverse: Vec<Vec<(StateId, W)>> = vec![Vec::new(); n];
    for q in fst.states() {
        for t in fst.transitions(q) {
            reverse[t.target as usize].push((q, t.weight.clone()));
        }
    }
    let mut distance = vec![W::zero(); n];
    let mut residual = vec![W::zero(); n];
    let mut finals = Vec::new();
    for q in fst.states() {
        if fst.is_final(q) {
            distance[q as usize] = fst.final_weight(q).clone();
            residual[q as usize] = fst.final_weight(q).clone();
            finals.push(q);
        }
    }
    let reverse = &reverse;
    relax(&mut distance, &mut residual, finals, move |q| {
        reverse[q as usize].iter().map(|(p, w)| (*p, w))
    });
    distance
}

/// Mohri's generic single-source relaxation.
///
/// `edges(q)` yields `(p, w)` pairs meaning "the distance of `p` can be
/// extended by `w ⊗ d(q)`" (forward: `d(q) ⊗ w`; for the tropical semiring
/// the order does not matter).
fn relax<'a, W, I, F, E>(distance: &mut [W], residual: &mut [W], sources: I, mut edges: F)
where
    W: Semiring + 'a,
    I: IntoIterator<Item = StateId>,
    F: FnMut(StateId) -> E,
    E: Iterator<Item = (StateId, &'a W)>,
{
    let mut queue: VecDeque<StateId> = VecDeque::new();
    let mut enqueued = vec![false; distance.len()];
    for s in sources {
        enqueued[s as usize] = true;
        queue.push_back(s);
    }
    while let Some(q) = queue.pop_front() {
        enqueued[q as usize] = false;
        let r = std::mem::replace(&mut residual[q as usize], W::zero());
        for (p, w) in edges(q) {
            let extended = r.times(w);
            let updated = distance[p as usize].plus(&extended);
            if !updated.approx_eq(&distance[p as usize], DELTA) {
                distance[p as usize] = updated;
                residual[p as usize] = residual[p as usize].plus(&extended);
                if !enqueued[p as usize] {
                    enqueued[p as usize] = true;
                    queue.push_back(p);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst::Transition;
    use rewrite_core::TropicalWeight;

    fn w(v: f32) -> TropicalWeight {
        TropicalWeight::new(v)
    }

    /// 0 -a/1-> 1 -b/1-> 3(final 0.5)
    /// 0 -c/5-> 2 -d/0-> 3
    /// 4 is unreachable.
    fn diamond() -> VectorFst<TropicalWeight> {
        let mut fst = VectorFst::new();
        for _ in 0..5 {
            fst.add_state();
        }
        fst.set_start(0);
        fst.set_final(3, w(0.5));
        fst.add_transition(0, Transition::new(1, 1, w(1.0), 1));
        fst.add_transition(0, Transition::new(3, 3, w(5.0), 2));
        fst.add_transition(1, Transition::new(2, 2, w(1.0), 3));
        fst.add_transition(2, Transition::new(4, 4, w(0.0), 3));
        fst.add_transition(4, Transition::new(4, 4, w(0.0), 3));
        fst
    }

    #[test]
    fn forward_distances() {
        let d = shortest_distance(&diamond());
        assert_eq!(d, vec![w(0.0), w(1.0), w(5.0), w(2.0), TropicalWeight::zero()]);
    }

    #[test]
    fn reverse_distances() {
        let d = shortest_distance_reverse(&diamond());
        assert_eq!(d, vec![w(2.5), w(1.5), w(0.5), w(0.5), w(0.5)]);
    }

    #[test]
    fn cyclic_non_negative_converges() {
        let mut fst = VectorFst::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0);
        fst.set_final(s1, w(0.0));
        fst.add_transition(s0, Transition::new(1, 1, w(2.0), s1));
        fst.add_transition(s1, Transition::new(1, 1, w(1.0), s0));
        assert_eq!(shortest_distance(&fst), vec![w(0.0), w(2.0)]);
        assert_eq!(shortest_distance_reverse(&fst), vec![w(2.0), w(0.0)]);
    }

    #[test]
    fn empty_fst_has_no_distances() {
        let fst = VectorFst::<TropicalWeight>::new();
        assert!(shortest_distance(&fst).is_empty());
    }
}
