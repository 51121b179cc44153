// Structural operations: projection, arc sorting, trimming.

use rewrite_core::Semiring;

use crate::fst::{StateId, Transition, VectorFst};

/// Which side of a transducer `project` keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    Input,
    Output,
}

/// Sort key for `arc_sort`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcSortType {
    /// By input label, then output label.
    ILabel,
    /// By output label, then input label.
    OLabel,
}

/// Turn a transducer into an acceptor of one of its sides.
pub fn project<W: Semiring>(fst: &VectorFst<W>, side: ProjectType) -> VectorFst<W> {
    let mut out = fst.clone();
    out.rewrite_transitions(|_, mut transitions| {
        for t in &mut transitions {
            match side {
                ProjectType::Input => t.olabel = t.ilabel,
                ProjectType::Output => t.ilabel = t.olabel,
            }
        }
        transitions
    });
    out
}

/// Stable-sort every state's transitions.
pub fn arc_sort<W: Semiring>(fst: &VectorFst<W>, sort_type: ArcSortType) -> VectorFst<W> {
    let mut out = fst.clone();
    out.rewrite_transitions(|_, mut transitions| {
        match sort_type {
            ArcSortType::ILabel => transitions.sort_by_key(|t| (t.ilabel, t.olabel)),
            ArcSortType::OLabel => transitions.sort_by_key(|t| (t.olabel, t.ilabel)),
        }
        transitions
    });
    out
}

/// Remove states that are not on some path from the start state to a final
/// state. Surviving states keep their relative order.
///
/// If the start state itself does not survive the result is empty (no start
/// state, no states).
pub fn connect<W: Semiring>(fst: &VectorFst<W>) -> VectorFst<W> {
    let Some(start) = fst.start() else {
        return VectorFst::new();
    };
    let n = fst.num_states();

    // Forward reachability from the start state.
    let mut accessible = vec![false; n];
    let mut stack = vec![start];
    accessible[start as usize] = true;
    while let Some(q) = stack.pop() {
        for t in fst.transitions(q) {
            if !t.weight.is_zero() && !accessible[t.target as usize] {
                accessible[t.target as usize] = true;
                stack.push(t.target);
            }
        }
    }

    // Backward reachability from final states over reversed transitions.
    let mut reverse: Vec<Vec<StateId>> = vec![Vec::new(); n];
    for q in fst.states() {
        for t in fst.transitions(q) {
            if !t.weight.is_zero() {
                reverse[t.target as usize].push(q);
            }
        }
    }
    let mut coaccessible = vec![false; n];
    for q in fst.states() {
        if fst.is_final(q) {
            coaccessible[q as usize] = true;
            stack.push(q);
        }
    }
    while let Some(q) = stack.pop() {
        for &p in &reverse[q as usize] {
            if !coaccessible[p as usize] {
                coaccessible[p as usize] = true;
                stack.push(p);
            }
        }
    }

    let keep = |q: StateId| accessible[q as usize] && coaccessible[q as usize];
    if !keep(start) {
        return VectorFst::new();
    }

    let mut renumber: Vec<Option<StateId>> = vec![None; n];
    let mut out = VectorFst::new();
    for q in fst.states() {
        if keep(q) {
            renumber[q as usize] = Some(out.add_state());
        }
    }
    for q in fst.states() {
        let Some(new_q) = renumber[q as usize] else {
            continue;
        };
        out.set_final(new_q, fst.final_weight(q).clone());
        for t in fst.transitions(q) {
            if t.weight.is_zero() {
                continue;
            }
            if let Some(target) = renumber[t.target as usize] {
                out.add_transition(
                    new_q,
                    Transition::new(t.ilabel, t.olabel, t.weight.clone(), target),
                );
            }
        }
    }
    if let Some(new_start) = renumber[start as usize] {
        out.set_start(new_start);
    }
    out
}
