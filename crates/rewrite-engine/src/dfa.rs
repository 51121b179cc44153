// Bounded determinization of output lattices.

use rewrite_core::NaturalOrder;
use rewrite_fst::{DeterminizeConfig, VectorFst, determinize};

use crate::options::STATE_CAP_BASE;

/// A determinized lattice together with the state budget it was built under.
#[derive(Debug, Clone)]
pub struct Determinized<W: NaturalOrder> {
    pub lattice: VectorFst<W>,
    /// The state cap passed to determinization.
    pub state_cap: usize,
    /// The result has exactly `state_cap` states, so construction most
    /// likely stopped at the cap and the lattice may be missing strings.
    pub state_cap_reached: bool,
}

impl<W: NaturalOrder> Determinized<W> {
    pub fn into_lattice(self) -> VectorFst<W> {
        self.lattice
    }
}

/// State cap for a lattice of `num_states` states: `256 + multiplier * n`.
/// Negative or NaN multipliers count as zero.
pub fn state_cap(num_states: usize, state_multiplier: f64) -> usize {
    let scaled = (state_multiplier.max(0.0) * num_states as f64) as usize;
    STATE_CAP_BASE.saturating_add(scaled)
}

/// Determinize an epsilon-free output lattice.
///
/// With `optimal_only`, strings that are not tied with the best weight are
/// pruned during construction; otherwise every string survives. At most
/// [`state_cap`] states are created. Hitting the cap is not an error: the
/// possibly incomplete result is returned, a warning is logged, and
/// [`Determinized::state_cap_reached`] is set.
///
/// The weight semiring must have the path property.
pub fn to_dfa<W: NaturalOrder>(
    lattice: &VectorFst<W>,
    optimal_only: bool,
    state_multiplier: f64,
) -> Determinized<W> {
    let cap = state_cap(lattice.num_states(), state_multiplier);
    let config = DeterminizeConfig {
        state_cap: Some(cap),
        weight_threshold: if optimal_only { W::one() } else { W::zero() },
        ..DeterminizeConfig::default()
    };
    let result = determinize(lattice, &config);
    let state_cap_reached = result.fst.num_states() == cap;
    if state_cap_reached {
        tracing::warn!(
            state_cap = cap,
            num_states = result.fst.num_states(),
            state_multiplier,
            truncated = result.truncated,
            "determinization hit the state cap; consider a higher state_multiplier"
        );
    }
    Determinized {
        lattice: result.fst,
        state_cap: cap,
        state_cap_reached,
    }
}
