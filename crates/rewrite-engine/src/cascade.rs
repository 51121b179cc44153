// Rule cascades: ordered rule sequences applied one after another.

use std::path::Path;

use rewrite_core::{NaturalOrder, TropicalWeight};
use rewrite_fst::{RuleArchive, VectorFst};

use crate::RewriteError;
use crate::input::RewriteInput;
use crate::lattice::apply_rule;
use crate::options::RewriteOptions;
use crate::rewriter::{Rewriter, Rule};

/// An ordered sequence of rules. Each rule rewrites the output lattice of
/// the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct Cascade<W: NaturalOrder = TropicalWeight> {
    rules: Vec<Rule<W>>,
}

impl<W: NaturalOrder> Default for Cascade<W> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<W: NaturalOrder> Cascade<W> {
    pub fn new(rules: impl IntoIterator<Item = Rule<W>>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    pub fn rules(&self) -> &[Rule<W>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<W: NaturalOrder> FromIterator<Rule<W>> for Cascade<W> {
    fn from_iter<I: IntoIterator<Item = Rule<W>>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<W: NaturalOrder> Rewriter<W> for Cascade<W> {
    /// Thread `input` through every rule in order. A composition failure at
    /// any stage aborts the whole cascade, naming the original input and the
    /// failing rule.
    fn rewrite_lattice(
        &self,
        input: RewriteInput<W>,
        options: &RewriteOptions,
    ) -> Result<VectorFst<W>, RewriteError> {
        if self.rules.is_empty() {
            return Err(RewriteError::NoRulesConfigured);
        }
        let description = input.describe();
        let mut lattice = input.into_acceptor(&options.input_token_type)?;
        for (stage, rule) in self.rules.iter().enumerate() {
            lattice = apply_rule(&lattice, rule.fst()).ok_or_else(|| {
                tracing::debug!(stage, rule = rule.name(), "cascade stage has no output");
                RewriteError::CompositionFailure {
                    input: description.clone(),
                    rule: rule.name().map(str::to_owned),
                }
            })?;
            tracing::trace!(
                stage,
                rule = rule.name(),
                states = lattice.num_states(),
                transitions = lattice.num_transitions(),
                "cascade stage"
            );
        }
        Ok(lattice)
    }
}

/// A cascade whose rules are chosen by name from a rule archive.
///
/// Starts with no rules: rewriting fails with
/// [`RewriteError::NoRulesConfigured`] until [`set_rules`](Self::set_rules)
/// succeeds.
#[derive(Debug, Clone)]
pub struct RuleCascade {
    archive: RuleArchive,
    cascade: Cascade<TropicalWeight>,
}

impl RuleCascade {
    /// Load the archive at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RewriteError> {
        Ok(Self::from_archive(RuleArchive::open(path)?))
    }

    pub fn from_archive(archive: RuleArchive) -> Self {
        Self {
            archive,
            cascade: Cascade::default(),
        }
    }

    pub fn archive(&self) -> &RuleArchive {
        &self.archive
    }

    /// Names of the configured rules, in application order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.cascade.rules().iter().filter_map(Rule::name)
    }

    pub fn cascade(&self) -> &Cascade<TropicalWeight> {
        &self.cascade
    }

    /// Replace the rule sequence with the archive rules named by `names`,
    /// in order.
    ///
    /// Stops at the first missing name with [`RewriteError::RuleNotFound`];
    /// the previous sequence is then left unchanged.
    pub fn set_rules<I>(&mut self, names: I) -> Result<(), RewriteError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut rules = Vec::new();
        for name in names {
            let name = name.as_ref();
            let Some(fst) = self.archive.get(name) else {
                return Err(RewriteError::RuleNotFound(name.to_owned()));
            };
            rules.push(Rule::named(name, fst.clone()));
        }
        tracing::debug!(
            rules = ?rules.iter().filter_map(Rule::name).collect::<Vec<_>>(),
            "configured rule cascade"
        );
        self.cascade = Cascade::new(rules);
        Ok(())
    }
}

impl Rewriter<TropicalWeight> for RuleCascade {
    fn rewrite_lattice(
        &self,
        input: RewriteInput<TropicalWeight>,
        options: &RewriteOptions,
    ) -> Result<VectorFst<TropicalWeight>, RewriteError> {
        self.cascade.rewrite_lattice(input, options)
    }
}
