use serde::{Deserialize, Serialize};

use crate::{
    error::WffError,
    grammar::Grammar,
    rules::{self, RuleSpec},
    transform::{RewriteLimits, RewriteStrategy, Transformer},
};

/// Everything one normalization session needs: the vocabulary, the rule
/// table and the bounds on rewriting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub grammar: Grammar,
    pub rules: Vec<RuleSpec>,
    #[serde(default)]
    pub limits: RewriteLimits,
    #[serde(default)]
    pub strategy: RewriteStrategy,
}

impl Config {
    pub fn standard() -> Self {
        Self {
            grammar: Grammar::standard(),
            rules: rules::standard(),
            limits: RewriteLimits::default(),
            strategy: RewriteStrategy::default(),
        }
    }

    pub fn transformer(&self) -> Result<Transformer, WffError> {
        Ok(Transformer::new(&self.grammar, &self.rules)?
            .with_strategy(self.strategy)
            .with_limits(self.limits))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::standard()
    }
}
