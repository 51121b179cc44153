//! String rewriting with weighted finite-state rules.
//!
//! A rule is a weighted transducer from input strings to output strings. This
//! crate composes inputs with rules into output lattices and extracts strings
//! from them, with explicit tie handling and a bounded determinization step.
//!
//! # Architecture
//!
//! - [`input`] -- Text-or-acceptor inputs
//! - [`options`] -- Token types and the determinization state multiplier
//! - [`lattice`] -- Composition of an input with a rule into an output lattice
//! - [`dfa`] -- Determinization with optional optimal-only pruning and a state cap
//! - [`extract`] -- Top string, tie-detecting top string, all strings, n-best
//! - [`matches`] -- Whether an output string is reachable at all
//! - [`rewriter`] -- The `Rewriter` trait and sorted `Rule`s
//! - [`cascade`] -- Ordered rule sequences, optionally bound to a rule archive
//! - [`rewrite`] -- Single-rule convenience functions
//!
//! Weights must have the path property (e.g. [`TropicalWeight`]) for the
//! optimal-path operations to be meaningful.

pub mod cascade;
pub mod dfa;
pub mod extract;
pub mod input;
pub mod lattice;
pub mod matches;
pub mod options;
pub mod rewrite;
pub mod rewriter;

pub use cascade::{Cascade, RuleCascade};
pub use dfa::{Determinized, to_dfa};
pub use extract::{WeightedPath, all_strings, n_shortest, one_top_string, strings_with_weights, top_string};
pub use input::RewriteInput;
pub use lattice::{build_lattice, check_nonempty_and_cleanup};
pub use matches::lattice_contains;
pub use options::{DEFAULT_STATE_MULTIPLIER, RewriteOptions, STATE_CAP_BASE};
pub use rewriter::{Rewriter, Rule};

pub use rewrite_core::{SymbolTable, TokenError, TokenType, TropicalWeight};
pub use rewrite_fst::{FstError, RuleArchive, VectorFst};

/// Error type for rewriting.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    /// Composing the input with a rule left no successful path: the input is
    /// not in the rule's input language.
    #[error("composition failure: no rewrite of {input}{}", by_rule(.rule))]
    CompositionFailure {
        /// Description of the input (the quoted text for string inputs).
        input: String,
        /// Name of the failing rule, when it came from an archive.
        rule: Option<String>,
    },

    /// More than one output string is tied at the optimal weight.
    #[error("multiple top rewrites found: {first:?} and {second:?} (weight: {weight})")]
    AmbiguousRewrite {
        first: String,
        second: String,
        weight: String,
    },

    /// A cascade was used before any rule was set.
    #[error("no rules requested")]
    NoRulesConfigured,

    /// A requested rule name is not in the archive.
    #[error("cannot find rule: {0}")]
    RuleNotFound(String),

    /// An extraction was asked for a string from a lattice with no paths.
    #[error("lattice has no successful path")]
    EmptyLattice,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Fst(#[from] FstError),
}

fn by_rule(rule: &Option<String>) -> String {
    match rule {
        Some(name) => format!(" by rule {name:?}"),
        None => String::new(),
    }
}
