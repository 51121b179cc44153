// Lattice construction: compose an input with a rule and normalize the
// result to an epsilon-free acceptor of output strings.

use rewrite_core::{Semiring, TokenType};
use rewrite_fst::{ComposeFilter, ProjectType, VectorFst, compose, project, rm_epsilon};

use crate::RewriteError;
use crate::input::{RewriteInput, describe_acceptor};

/// Build the output lattice of `rule` applied to `input`.
///
/// Text inputs are compiled with `input_token_type`. Composition uses the
/// alternating-sequence filter, so epsilons on both sides do not create
/// duplicate paths. If no path survives composition the input is not in the
/// rule's input language and the call fails with
/// [`RewriteError::CompositionFailure`] naming the input. Otherwise the
/// result is projected onto output labels with epsilons removed.
pub fn build_lattice<W: Semiring>(
    input: impl Into<RewriteInput<W>>,
    rule: &VectorFst<W>,
    input_token_type: &TokenType,
) -> Result<VectorFst<W>, RewriteError> {
    let input = input.into();
    let description = input.describe();
    let acceptor = input.into_acceptor(input_token_type)?;
    apply_rule(&acceptor, rule).ok_or(RewriteError::CompositionFailure {
        input: description,
        rule: None,
    })
}

/// One composition stage: `None` when the input is not in the rule's
/// input language.
pub(crate) fn apply_rule<W: Semiring>(
    acceptor: &VectorFst<W>,
    rule: &VectorFst<W>,
) -> Option<VectorFst<W>> {
    let composed = compose(acceptor, rule, ComposeFilter::AltSequence);
    if composed.is_empty() {
        return None;
    }
    Some(normalize(&composed))
}

fn normalize<W: Semiring>(fst: &VectorFst<W>) -> VectorFst<W> {
    rm_epsilon(&project(fst, ProjectType::Output))
}

/// Fail with [`RewriteError::CompositionFailure`] if `lattice` has no start
/// state, otherwise return its output projection without epsilons.
pub fn check_nonempty_and_cleanup<W: Semiring>(
    lattice: &VectorFst<W>,
) -> Result<VectorFst<W>, RewriteError> {
    if lattice.is_empty() {
        return Err(RewriteError::CompositionFailure {
            input: describe_acceptor(lattice),
            rule: None,
        });
    }
    Ok(normalize(lattice))
}
