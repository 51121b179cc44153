// The rewrite family shared by single rules and cascades.

use rewrite_core::{NaturalOrder, TropicalWeight};
use rewrite_fst::{ArcSortType, FstProperties, VectorFst, arc_sort};

use crate::RewriteError;
use crate::dfa::to_dfa;
use crate::extract::{
    WeightedPath, all_strings, n_shortest, one_top_string, strings_with_weights, top_string,
};
use crate::input::RewriteInput;
use crate::lattice::build_lattice;
use crate::matches::lattice_contains;
use crate::options::RewriteOptions;

/// Something that maps inputs to output lattices: a single rule or a
/// cascade of rules.
///
/// Only [`rewrite_lattice`](Self::rewrite_lattice) is required; the rest of
/// the rewrite family is derived from it. Every method takes the token types
/// and state multiplier from `options`.
pub trait Rewriter<W: NaturalOrder = TropicalWeight> {
    /// The epsilon-free output lattice for `input`.
    fn rewrite_lattice(
        &self,
        input: RewriteInput<W>,
        options: &RewriteOptions,
    ) -> Result<VectorFst<W>, RewriteError>;

    /// One best output string. Ties are broken by search order.
    fn top_rewrite(
        &self,
        input: impl Into<RewriteInput<W>>,
        options: &RewriteOptions,
    ) -> Result<String, RewriteError> {
        let lattice = self.rewrite_lattice(input.into(), options)?;
        top_string(&lattice, &options.token_type)
    }

    /// The best output string, failing with
    /// [`RewriteError::AmbiguousRewrite`] if another string ties with it.
    fn one_top_rewrite(
        &self,
        input: impl Into<RewriteInput<W>>,
        options: &RewriteOptions,
    ) -> Result<String, RewriteError> {
        let lattice = self.rewrite_lattice(input.into(), options)?;
        let dfa = to_dfa(&lattice, true, options.state_multiplier);
        one_top_string(&dfa.lattice, &options.token_type)
    }

    /// Every distinct output string.
    fn rewrites(
        &self,
        input: impl Into<RewriteInput<W>>,
        options: &RewriteOptions,
    ) -> Result<Vec<String>, RewriteError> {
        let lattice = self.rewrite_lattice(input.into(), options)?;
        let dfa = to_dfa(&lattice, false, options.state_multiplier);
        all_strings(&dfa.lattice, &options.token_type)
    }

    /// The `n` best distinct output strings, best first.
    fn top_rewrites(
        &self,
        input: impl Into<RewriteInput<W>>,
        n: usize,
        options: &RewriteOptions,
    ) -> Result<Vec<String>, RewriteError> {
        let lattice = self.rewrite_lattice(input.into(), options)?;
        all_strings(&n_shortest(&lattice, n), &options.token_type)
    }

    /// Every output string tied at the optimal weight.
    fn optimal_rewrites(
        &self,
        input: impl Into<RewriteInput<W>>,
        options: &RewriteOptions,
    ) -> Result<Vec<String>, RewriteError> {
        let lattice = self.rewrite_lattice(input.into(), options)?;
        let dfa = to_dfa(&lattice, true, options.state_multiplier);
        all_strings(&dfa.lattice, &options.token_type)
    }

    /// Every output path with its weight, best first.
    fn weighted_rewrites(
        &self,
        input: impl Into<RewriteInput<W>>,
        options: &RewriteOptions,
    ) -> Result<Vec<WeightedPath<W>>, RewriteError> {
        let lattice = self.rewrite_lattice(input.into(), options)?;
        strings_with_weights(&lattice, &options.input_token_type, &options.token_type)
    }

    /// Whether `expected` (compiled with the output token type when it is
    /// text) is among the outputs for `input`.
    fn matches(
        &self,
        input: impl Into<RewriteInput<W>>,
        expected: impl Into<RewriteInput<W>>,
        options: &RewriteOptions,
    ) -> Result<bool, RewriteError> {
        let lattice = self.rewrite_lattice(input.into(), options)?;
        lattice_contains(&lattice, expected, &options.token_type)
    }
}

impl<W: NaturalOrder> Rewriter<W> for VectorFst<W> {
    fn rewrite_lattice(
        &self,
        input: RewriteInput<W>,
        options: &RewriteOptions,
    ) -> Result<VectorFst<W>, RewriteError> {
        build_lattice(input, self, &options.input_token_type)
    }
}

/// A rule transducer, sorted by input label.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule<W: NaturalOrder = TropicalWeight> {
    fst: VectorFst<W>,
    name: Option<String>,
}

impl<W: NaturalOrder> Rule<W> {
    /// Wrap `fst`, sorting its transitions by input label if needed.
    pub fn new(fst: VectorFst<W>) -> Self {
        let fst = if fst.properties().contains(FstProperties::ILABEL_SORTED) {
            fst
        } else {
            arc_sort(&fst, ArcSortType::ILabel)
        };
        Self { fst, name: None }
    }

    /// A rule that reports `name` in composition failures.
    pub fn named(name: impl Into<String>, fst: VectorFst<W>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(fst)
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn fst(&self) -> &VectorFst<W> {
        &self.fst
    }

    pub fn into_fst(self) -> VectorFst<W> {
        self.fst
    }
}

impl<W: NaturalOrder> From<VectorFst<W>> for Rule<W> {
    fn from(fst: VectorFst<W>) -> Self {
        Self::new(fst)
    }
}

impl<W: NaturalOrder> Rewriter<W> for Rule<W> {
    fn rewrite_lattice(
        &self,
        input: RewriteInput<W>,
        options: &RewriteOptions,
    ) -> Result<VectorFst<W>, RewriteError> {
        build_lattice(input, &self.fst, &options.input_token_type).map_err(|err| match err {
            RewriteError::CompositionFailure { input, .. } => RewriteError::CompositionFailure {
                input,
                rule: self.name.clone(),
            },
            other => other,
        })
    }
}
