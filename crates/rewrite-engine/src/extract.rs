// String extraction from output lattices.

use std::cmp::Ordering;

use rewrite_core::{Label, NaturalOrder, Semiring, TokenType};
use rewrite_fst::{PathEntry, VectorFst, paths, shortest_path};

use crate::RewriteError;
use crate::lattice::check_nonempty_and_cleanup;

/// The single best output string of `lattice`.
///
/// Equal-weight competitors are not reported; use [`one_top_string`] on an
/// optimal-only DFA to reject ties instead.
pub fn top_string<W: NaturalOrder>(
    lattice: &VectorFst<W>,
    token_type: &TokenType,
) -> Result<String, RewriteError> {
    let best = shortest_path(lattice, 1, false);
    let path = paths(&best).next().ok_or(RewriteError::EmptyLattice)??;
    Ok(token_type.render(&path.olabels)?)
}

/// The only output string of `lattice`, which must be an optimal-only DFA
/// (see [`to_dfa`](crate::to_dfa)).
///
/// Every path of such a lattice has the optimal weight, so a second path is
/// a tie and fails with [`RewriteError::AmbiguousRewrite`] naming both
/// strings and the weight of the second.
pub fn one_top_string<W: Semiring>(
    lattice: &VectorFst<W>,
    token_type: &TokenType,
) -> Result<String, RewriteError> {
    let mut iter = paths(lattice);
    let first = iter.next().ok_or(RewriteError::EmptyLattice)??;
    let output = token_type.render(&first.olabels)?;
    match iter.next() {
        None => Ok(output),
        Some(second) => {
            let second = second?;
            Err(RewriteError::AmbiguousRewrite {
                first: output,
                second: token_type.render(&second.olabels)?,
                weight: second.weight.to_string(),
            })
        }
    }
}

/// Every path's output string, in enumeration order.
///
/// On a deterministic lattice this is every distinct string once. Fails with
/// [`FstError::Cyclic`](rewrite_fst::FstError::Cyclic) on cyclic lattices.
pub fn all_strings<W: Semiring>(
    lattice: &VectorFst<W>,
    token_type: &TokenType,
) -> Result<Vec<String>, RewriteError> {
    paths(lattice)
        .map(|path| -> Result<String, RewriteError> { Ok(token_type.render(&path?.olabels)?) })
        .collect()
}

/// The `n` lowest-weight distinct strings of `lattice` as a lattice of
/// linear paths, best first.
pub fn n_shortest<W: NaturalOrder>(lattice: &VectorFst<W>, n: usize) -> VectorFst<W> {
    shortest_path(lattice, n, true)
}

/// One enumerated path with its weight.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedPath<W> {
    /// Input labels of the path.
    pub input_labels: Vec<Label>,
    /// The input labels rendered with the input token type, when they are
    /// valid under it.
    pub input: Option<String>,
    /// The output string split on whitespace.
    pub output_tokens: Vec<String>,
    pub weight: W,
}

/// Every path of `lattice` with its weight, best first.
///
/// Unlike the other extractors this accepts a raw composition result: the
/// lattice is checked and normalized with [`check_nonempty_and_cleanup`]
/// first. Paths of equal weight keep their enumeration order.
pub fn strings_with_weights<W: NaturalOrder>(
    lattice: &VectorFst<W>,
    input_token_type: &TokenType,
    output_token_type: &TokenType,
) -> Result<Vec<WeightedPath<W>>, RewriteError> {
    let lattice = check_nonempty_and_cleanup(lattice)?;
    let mut out = paths(&lattice)
        .map(|path| weighted_path(path?, input_token_type, output_token_type))
        .collect::<Result<Vec<_>, _>>()?;
    out.sort_by(|a, b| natural_cmp(&a.weight, &b.weight));
    Ok(out)
}

fn weighted_path<W: Semiring>(
    path: PathEntry<W>,
    input_token_type: &TokenType,
    output_token_type: &TokenType,
) -> Result<WeightedPath<W>, RewriteError> {
    let output = output_token_type.render(&path.olabels)?;
    Ok(WeightedPath {
        input: input_token_type.render(&path.ilabels).ok(),
        input_labels: path.ilabels,
        output_tokens: output.split_whitespace().map(str::to_owned).collect(),
        weight: path.weight,
    })
}

fn natural_cmp<W: NaturalOrder>(a: &W, b: &W) -> Ordering {
    if a.natural_less(b) {
        Ordering::Less
    } else if b.natural_less(a) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}
