// Weighted determinization of acceptors (subset construction with residual
// weights), with optional pruning and a hard state cap.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use rewrite_core::weight::DELTA;
use rewrite_core::{Label, NaturalOrder};

use crate::fst::{StateId, Transition, VectorFst};
use crate::shortest_distance::{shortest_distance, shortest_distance_reverse};

/// Options for [`determinize`].
#[derive(Debug, Clone)]
pub struct DeterminizeConfig<W> {
    /// Stop creating states once the output has this many. `None` means
    /// unbounded.
    pub state_cap: Option<usize>,
    /// Keep only paths whose weight is within this threshold of the best
    /// path (`best ⊗ threshold`). `W::zero()` disables pruning.
    pub weight_threshold: W,
    /// Quantization delta used to identify subsets with equal residuals.
    pub delta: f32,
}

impl<W: NaturalOrder> Default for DeterminizeConfig<W> {
    fn default() -> Self {
        Self {
            state_cap: None,
            weight_threshold: W::zero(),
            delta: DELTA,
        }
    }
}

/// Output of [`determinize`].
#[derive(Debug, Clone)]
pub struct DeterminizeResult<W> {
    pub fst: VectorFst<W>,
    /// A transition was dropped because creating its target state would
    /// have exceeded the state cap. The output is then incomplete.
    pub truncated: bool,
}

/// A determinized state: NFA states paired with residual weights, sorted by
/// state. Residuals are quantized so equal subsets hash equally.
type Subset<W> = Vec<(StateId, W)>;

/// Which parts of the input survive pruning.
struct Pruner<W> {
    forward: Vec<W>,
    backward: Vec<W>,
    limit: W,
    delta: f32,
}

impl<W: NaturalOrder> Pruner<W> {
    fn admits_transition(&self, source: StateId, weight: &W, target: StateId) -> bool {
        let through = self.forward[source as usize]
            .times(weight)
            .times(&self.backward[target as usize]);
        through.natural_less_or_close(&self.limit, self.delta)
    }

    fn admits_final(&self, state: StateId, final_weight: &W) -> bool {
        let through = self.forward[state as usize].times(final_weight);
        through.natural_less_or_close(&self.limit, self.delta)
    }
}

/// Determinize a weighted acceptor.
///
/// Labels are read from the input side; the input must be epsilon-free and
/// its semiring must have the path property (so that distinct paths for one
/// string combine by selection). The output has at most one transition per
/// label leaving each state, and maps every surviving string to the `⊕` of
/// its path weights in the input.
///
/// With a non-zero `weight_threshold`, pruning happens while subsets are
/// expanded: a transition or final weight is only followed when some path
/// through it weighs at most `best ⊗ threshold`, using the forward and
/// backward shortest distances of the input. With threshold one and the
/// tropical semiring, exactly the optimal strings survive.
///
/// With a `state_cap`, construction stops creating states at the cap;
/// transitions that would need a new state are dropped and the result is
/// flagged as truncated.
pub fn determinize<W: NaturalOrder>(
    fst: &VectorFst<W>,
    config: &DeterminizeConfig<W>,
) -> DeterminizeResult<W> {
    let mut out = VectorFst::new();
    let Some(start) = fst.start() else {
        return DeterminizeResult { fst: out, truncated: false };
    };

    let pruner = if config.weight_threshold.is_zero() {
        None
    } else {
        let backward = shortest_distance_reverse(fst);
        let best = backward[start as usize].clone();
        if best.is_zero() {
            return DeterminizeResult { fst: out, truncated: false };
        }
        Some(Pruner {
            forward: shortest_distance(fst),
            backward,
            limit: best.times(&config.weight_threshold),
            delta: config.delta,
        })
    };
    let cap = config.state_cap.map(|c| c.max(1));

    let mut subsets: Vec<Subset<W>> = Vec::new();
    let mut table: HashMap<Subset<W>, StateId> = HashMap::new();
    let initial: Subset<W> = vec![(start, W::one())];
    let s0 = out.add_state();
    out.set_start(s0);
    table.insert(initial.clone(), s0);
    subsets.push(initial);

    let mut truncated = false;
    let mut next = 0usize;
    while next < subsets.len() {
        let source = next as StateId;
        let subset = subsets[next].clone();
        next += 1;

        let mut final_weight = W::zero();
        let mut by_label: BTreeMap<Label, BTreeMap<StateId, W>> = BTreeMap::new();
        for (q, residual) in &subset {
            let q_final = fst.final_weight(*q);
            if !q_final.is_zero()
                && pruner.as_ref().is_none_or(|p| p.admits_final(*q, q_final))
            {
                final_weight = final_weight.plus(&residual.times(q_final));
            }
            for t in fst.transitions(*q) {
                if t.weight.is_zero() {
                    continue;
                }
                if let Some(p) = &pruner {
                    if !p.admits_transition(*q, &t.weight, t.target) {
                        continue;
                    }
                }
                let value = residual.times(&t.weight);
                let targets = by_label.entry(t.ilabel).or_default();
                let merged = match targets.get(&t.target) {
                    Some(existing) => existing.plus(&value),
                    None => value,
                };
                targets.insert(t.target, merged);
            }
        }
        if !final_weight.is_zero() {
            out.set_final(source, final_weight);
        }

        for (label, targets) in by_label {
            let weight = targets
                .values()
                .fold(W::zero(), |acc, v| acc.plus(v));
            let next_subset: Subset<W> = targets
                .into_iter()
                .map(|(q, v)| {
                    let residual = v.divide(&weight).unwrap_or_else(W::zero);
                    (q, residual.quantize(config.delta))
                })
                .collect();

            let target = match table.get(&next_subset) {
                Some(&id) => id,
                None => {
                    if cap.is_some_and(|c| out.num_states() >= c) {
                        truncated = true;
                        continue;
                    }
                    let id = out.add_state();
                    table.insert(next_subset.clone(), id);
                    subsets.push(next_subset);
                    id
                }
            };
            out.add_transition(source, Transition::new(label, label, weight, target));
        }
    }

    DeterminizeResult { fst: out, truncated }
}
