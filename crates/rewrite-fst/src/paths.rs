// Path enumeration over an acyclic transducer, using an explicit DFS stack.

use rewrite_core::{EPSILON, Label, Semiring};

use crate::FstError;
use crate::fst::{StateId, VectorFst};

/// One successful path: its non-epsilon input and output labels and its
/// total weight (transition weights times the final weight).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry<W> {
    pub ilabels: Vec<Label>,
    pub olabels: Vec<Label>,
    pub weight: W,
}

/// One level of the DFS stack.
struct Frame<W> {
    state: StateId,
    /// `0`: final weight not yet reported; `i + 1`: transition `i` is next.
    cursor: usize,
    /// Weight of the path prefix ending in `state`.
    weight: W,
    /// Whether the transition into this frame pushed an input / output label.
    pushed_ilabel: bool,
    pushed_olabel: bool,
}

/// Iterator over the successful paths of a transducer in depth-first order:
/// at each state the path ending there (if final) comes before the paths
/// continuing through its transitions, which are followed in stored order.
///
/// Cycles make the path set infinite; the first time the walk re-enters a
/// state already on the current path the iterator yields
/// [`FstError::Cyclic`] and then stops.
pub struct Paths<'a, W> {
    fst: &'a VectorFst<W>,
    stack: Vec<Frame<W>>,
    on_path: Vec<bool>,
    ilabels: Vec<Label>,
    olabels: Vec<Label>,
}

/// Enumerate the paths of `fst`.
pub fn paths<W: Semiring>(fst: &VectorFst<W>) -> Paths<'_, W> {
    let mut on_path = vec![false; fst.num_states()];
    let mut stack = Vec::new();
    if let Some(start) = fst.start() {
        on_path[start as usize] = true;
        stack.push(Frame {
            state: start,
            cursor: 0,
            weight: W::one(),
            pushed_ilabel: false,
            pushed_olabel: false,
        });
    }
    Paths {
        fst,
        stack,
        on_path,
        ilabels: Vec::new(),
        olabels: Vec::new(),
    }
}

impl<W: Semiring> Iterator for Paths<'_, W> {
    type Item = Result<PathEntry<W>, FstError>;

    fn next(&mut self) -> Option<Self::Item> {
        let fst = self.fst;
        loop {
            let frame = self.stack.last_mut()?;
            let state = frame.state;

            if frame.cursor == 0 {
                frame.cursor = 1;
                if fst.is_final(state) {
                    return Some(Ok(PathEntry {
                        ilabels: self.ilabels.clone(),
                        olabels: self.olabels.clone(),
                        weight: frame.weight.times(fst.final_weight(state)),
                    }));
                }
                continue;
            }

            let index = frame.cursor - 1;
            if let Some(t) = fst.transitions(state).get(index) {
                frame.cursor += 1;
                if t.weight.is_zero() {
                    continue;
                }
                if self.on_path[t.target as usize] {
                    self.stack.clear();
                    return Some(Err(FstError::Cyclic));
                }
                let weight = frame.weight.times(&t.weight);
                let pushed_ilabel = t.ilabel != EPSILON;
                let pushed_olabel = t.olabel != EPSILON;
                if pushed_ilabel {
                    self.ilabels.push(t.ilabel);
                }
                if pushed_olabel {
                    self.olabels.push(t.olabel);
                }
                self.on_path[t.target as usize] = true;
                self.stack.push(Frame {
                    state: t.target,
                    cursor: 0,
                    weight,
                    pushed_ilabel,
                    pushed_olabel,
                });
                continue;
            }

            // All transitions exhausted: pop (backtrack up).
            let frame = self.stack.pop()?;
            self.on_path[frame.state as usize] = false;
            if frame.pushed_ilabel {
                self.ilabels.pop();
            }
            if frame.pushed_olabel {
                self.olabels.pop();
            }
        }
    }
}

/// Collect every path, failing on cyclic input.
pub fn collect_paths<W: Semiring>(fst: &VectorFst<W>) -> Result<Vec<PathEntry<W>>, FstError> {
    paths(fst).collect()
}
