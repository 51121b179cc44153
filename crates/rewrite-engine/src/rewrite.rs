// Single-rule rewrite functions.
//
// Thin wrappers over the `Rewriter` methods for callers that hold a rule
// transducer and do not want to import the trait.

use rewrite_core::NaturalOrder;
use rewrite_fst::VectorFst;

use crate::RewriteError;
use crate::extract::WeightedPath;
use crate::input::RewriteInput;
use crate::options::RewriteOptions;
use crate::rewriter::Rewriter;

/// The epsilon-free output lattice of `rule` applied to `input`.
pub fn rewrite_lattice<W: NaturalOrder>(
    input: impl Into<RewriteInput<W>>,
    rule: &VectorFst<W>,
    options: &RewriteOptions,
) -> Result<VectorFst<W>, RewriteError> {
    rule.rewrite_lattice(input.into(), options)
}

/// One best rewrite.
pub fn top_rewrite<W: NaturalOrder>(
    input: impl Into<RewriteInput<W>>,
    rule: &VectorFst<W>,
    options: &RewriteOptions,
) -> Result<String, RewriteError> {
    rule.top_rewrite(input, options)
}

/// The best rewrite, or [`RewriteError::AmbiguousRewrite`] on a tie.
pub fn one_top_rewrite<W: NaturalOrder>(
    input: impl Into<RewriteInput<W>>,
    rule: &VectorFst<W>,
    options: &RewriteOptions,
) -> Result<String, RewriteError> {
    rule.one_top_rewrite(input, options)
}

/// All distinct rewrites.
pub fn rewrites<W: NaturalOrder>(
    input: impl Into<RewriteInput<W>>,
    rule: &VectorFst<W>,
    options: &RewriteOptions,
) -> Result<Vec<String>, RewriteError> {
    rule.rewrites(input, options)
}

/// The `n` best distinct rewrites, best first.
pub fn top_rewrites<W: NaturalOrder>(
    input: impl Into<RewriteInput<W>>,
    rule: &VectorFst<W>,
    n: usize,
    options: &RewriteOptions,
) -> Result<Vec<String>, RewriteError> {
    rule.top_rewrites(input, n, options)
}

/// All rewrites tied at the optimal weight.
pub fn optimal_rewrites<W: NaturalOrder>(
    input: impl Into<RewriteInput<W>>,
    rule: &VectorFst<W>,
    options: &RewriteOptions,
) -> Result<Vec<String>, RewriteError> {
    rule.optimal_rewrites(input, options)
}

/// All rewrites with their weights, best first.
pub fn weighted_rewrites<W: NaturalOrder>(
    input: impl Into<RewriteInput<W>>,
    rule: &VectorFst<W>,
    options: &RewriteOptions,
) -> Result<Vec<WeightedPath<W>>, RewriteError> {
    rule.weighted_rewrites(input, options)
}

/// Whether `rule` can rewrite `input` as `expected`.
pub fn matches<W: NaturalOrder>(
    input: impl Into<RewriteInput<W>>,
    expected: impl Into<RewriteInput<W>>,
    rule: &VectorFst<W>,
    options: &RewriteOptions,
) -> Result<bool, RewriteError> {
    rule.matches(input, expected, options)
}
