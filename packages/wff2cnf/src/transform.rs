//! Pattern-based rewriting of formula trees.
//!
//! A [`Transformer`] holds an ordered list of rules and sweeps a tree in
//! pre-order, rewriting every node some rule matches, until a whole sweep
//! changes nothing. Nothing stops a rule table whose rules undo each other
//! from cycling forever, so every run is bounded by [`RewriteLimits`] and
//! reports [`RewriteOutcome::DidNotConverge`] when the bound is hit.

use std::fmt::Display;

use colored::Colorize;
use indexmap::{IndexMap, IndexSet};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};

use crate::{
    ast::{Ast, Node, Position},
    error::WffError,
    explanation::Explain,
    grammar::Grammar,
    rules::RuleSpec,
    token::Token,
};

/// Subtrees bound to pattern variables during one match attempt.
pub type Bindings = IndexMap<String, Node>;

/// Matches `pattern` against `node`, extending `bindings`.
///
/// Operator and constant nodes of the pattern must match lexeme for lexeme.
/// A variable of the pattern binds to whatever subtree sits at its place,
/// and every later occurrence of it must meet an identical subtree. On
/// failure `bindings` may be partially filled and should be discarded.
pub fn match_pattern(node: &Node, pattern: &Node, bindings: &mut Bindings) -> bool {
    match pattern.token() {
        Token::Variable(name) => match bindings.get(name) {
            Some(bound) => bound == node,
            None => {
                bindings.insert(name.clone(), node.clone());
                true
            }
        },
        _ => {
            pattern.lexeme() == node.lexeme()
                && pattern
                    .children()
                    .iter()
                    .zip(node.children())
                    .all(|(pattern, node)| match_pattern(node, pattern, bindings))
        }
    }
}

/// Copies `replacement`, putting a copy of the bound subtree in place of
/// every variable leaf.
pub fn substitute(replacement: &Node, bindings: &Bindings) -> Result<Node, WffError> {
    match replacement.token() {
        Token::Variable(name) => {
            bindings
                .get(name)
                .cloned()
                .ok_or_else(|| WffError::UnboundPatternVariable {
                    variable: name.clone(),
                })
        }
        token => Node::new(
            token.clone(),
            replacement
                .children()
                .iter()
                .map(|child| substitute(child, bindings))
                .collect::<Result<Vec<_>, _>>()?,
        ),
    }
}

#[derive(Debug, Clone)]
pub struct RewriteRule {
    name: String,
    pattern: Ast,
    replacement: Ast,
}

impl RewriteRule {
    /// Fails if the replacement mentions a variable the pattern never binds.
    pub fn new(name: impl Into<String>, pattern: Ast, replacement: Ast) -> Result<Self, WffError> {
        let bound = pattern.variables();

        if let Some(unbound) = replacement
            .variables()
            .into_iter()
            .find(|variable| !bound.contains(variable))
        {
            return Err(WffError::UnboundPatternVariable {
                variable: unbound.to_owned(),
            });
        }

        Ok(Self {
            name: name.into(),
            pattern,
            replacement,
        })
    }

    pub fn compile(grammar: &Grammar, source: &RuleSpec) -> Result<Self, WffError> {
        let pattern = grammar.parse_pattern(&source.pattern)?;
        let replacement = grammar.parse_pattern(&source.replacement)?;
        let name = source
            .name
            .clone()
            .unwrap_or_else(|| format!("{pattern} ↦ {replacement}"));

        Self::new(name, pattern, replacement)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &Ast {
        &self.pattern
    }

    pub fn replacement(&self) -> &Ast {
        &self.replacement
    }

    pub fn matches(&self, node: &Node) -> Option<Bindings> {
        let mut bindings = Bindings::new();

        match_pattern(node, self.pattern.root(), &mut bindings).then_some(bindings)
    }

    /// The rewritten subtree, or `None` if the pattern does not match `node`.
    pub fn apply(&self, node: &Node) -> Result<Option<Node>, WffError> {
        self.matches(node)
            .map(|bindings| substitute(self.replacement.root(), &bindings))
            .transpose()
    }
}

impl Display for RewriteRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} ↦ {}",
            self.name, self.pattern, self.replacement
        )
    }
}

/// Where traversal resumes after a rule fires at a node.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    StrumDisplay,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RewriteStrategy {
    /// One rule fires per node and sweep; the sweep then descends into the
    /// children of the replacement.
    #[default]
    Continue,
    /// Rules are retried at the rewritten node, first rule first, until none
    /// matches; only then does the sweep descend.
    Restart,
}

/// Bounds on one run. Under [`RewriteStrategy::Restart`] a pair of rules
/// undoing each other cycles inside a single sweep, so only `max_rewrites`
/// stops it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteLimits {
    pub max_sweeps: usize,
    pub max_rewrites: Option<usize>,
}

impl Default for RewriteLimits {
    fn default() -> Self {
        Self {
            max_sweeps: 1000,
            max_rewrites: Some(100_000),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Sweeps started, including the final one that found nothing to do.
    /// That last check still runs when a limit is reached, so a converged
    /// run may count one sweep past `max_sweeps`.
    pub sweeps: usize,
    pub rewrites: usize,
    pub rule_hits: IndexMap<String, usize>,
}

impl RewriteStats {
    fn record(&mut self, rule: &RewriteRule) {
        self.rewrites += 1;
        *self.rule_hits.entry(rule.name().to_owned()).or_default() += 1;
    }
}

#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    Converged(RewriteStats),
    /// A limit was reached while rules were still firing. The tree holds
    /// whatever the last rewrite left.
    DidNotConverge(RewriteStats),
}

impl RewriteOutcome {
    pub fn is_converged(&self) -> bool {
        matches!(self, RewriteOutcome::Converged(_))
    }

    pub fn stats(&self) -> &RewriteStats {
        match self {
            RewriteOutcome::Converged(stats) | RewriteOutcome::DidNotConverge(stats) => stats,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Transformer {
    rules: Vec<RewriteRule>,
    strategy: RewriteStrategy,
    limits: RewriteLimits,
}

impl Transformer {
    pub fn new(grammar: &Grammar, rules: &[RuleSpec]) -> Result<Self, WffError> {
        let rules = rules
            .iter()
            .map(|source| RewriteRule::compile(grammar, source))
            .collect::<Result<Vec<_>, _>>()?;

        let names = rules.iter().map(RewriteRule::name).collect::<IndexSet<_>>();
        if names.len() != rules.len() {
            return Err(WffError::invalid_config("rule names must be unique"));
        }

        Ok(Self::from_rules(rules))
    }

    pub fn from_rules(rules: Vec<RewriteRule>) -> Self {
        Self {
            rules,
            strategy: RewriteStrategy::default(),
            limits: RewriteLimits::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: RewriteStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_limits(mut self, limits: RewriteLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    pub fn strategy(&self) -> RewriteStrategy {
        self.strategy
    }

    pub fn limits(&self) -> RewriteLimits {
        self.limits
    }

    /// The first rule, in table order, that rewrites `node`, with its result.
    pub fn rewrite(&self, node: &Node) -> Result<Option<(&RewriteRule, Node)>, WffError> {
        for rule in &self.rules {
            if let Some(replacement) = rule.apply(node)? {
                return Ok(Some((rule, replacement)));
            }
        }

        Ok(None)
    }

    /// Rewrites `ast` in place, sweep after sweep, until a sweep fires no
    /// rule or a limit is reached.
    pub fn apply_transformations(
        &self,
        ast: &mut Ast,
        explanation: &mut impl Explain,
    ) -> Result<RewriteOutcome, WffError> {
        let mut stats = RewriteStats::default();

        loop {
            if stats.sweeps >= self.limits.max_sweeps || self.rewrite_limit_reached(&stats) {
                return Ok(self.stop_at_limit(ast, stats, explanation));
            }

            stats.sweeps += 1;
            let sweep = stats.sweeps;
            let rewrites_before = stats.rewrites;

            let sweep_explanation = explanation
                .subexplanation(|| format!("Sweep #{sweep}: {}", ast.to_string().blue()));
            let changed = self.sweep(ast, &mut Position::root(), &mut stats, sweep_explanation)?;

            debug!(
                "sweep {sweep}: {} rewrites, {} nodes",
                stats.rewrites - rewrites_before,
                ast.node_count()
            );

            if !changed {
                explanation.step(|| format!("Fixpoint: {}", ast.to_string().green()));

                return Ok(RewriteOutcome::Converged(stats));
            }
        }
    }

    /// A limit leaves no room for another sweep. The run still converged if
    /// no rule matches anywhere, which costs no rewrite to find out.
    fn stop_at_limit(
        &self,
        ast: &Ast,
        mut stats: RewriteStats,
        explanation: &mut impl Explain,
    ) -> RewriteOutcome {
        if self.is_fixpoint(ast) {
            stats.sweeps += 1;
            explanation.step(|| format!("Fixpoint: {}", ast.to_string().green()));

            return RewriteOutcome::Converged(stats);
        }

        warn!(
            "stopped after {} sweeps and {} rewrites without reaching a fixpoint",
            stats.sweeps, stats.rewrites
        );
        explanation.step(|| "Limit reached".red().to_string());

        RewriteOutcome::DidNotConverge(stats)
    }

    /// Whether no rule matches at any node of `ast`.
    pub fn is_fixpoint(&self, ast: &Ast) -> bool {
        ast.positions()
            .iter()
            .filter_map(|position| ast.get(position))
            .all(|node| self.rules.iter().all(|rule| rule.matches(node).is_none()))
    }

    fn rewrite_limit_reached(&self, stats: &RewriteStats) -> bool {
        self.limits
            .max_rewrites
            .is_some_and(|max_rewrites| stats.rewrites >= max_rewrites)
    }

    fn sweep(
        &self,
        ast: &mut Ast,
        position: &mut Position,
        stats: &mut RewriteStats,
        explanation: &mut impl Explain,
    ) -> Result<bool, WffError> {
        let mut changed = false;

        loop {
            if self.rewrite_limit_reached(stats) {
                return Ok(changed);
            }

            let node = ast.get(position).ok_or_else(|| WffError::NodeNotFound {
                position: position.clone(),
            })?;

            let Some((rule, replacement)) = self.rewrite(node)? else {
                break;
            };

            trace!("{} fired at {position}", rule.name());
            explanation.step(|| {
                format!(
                    "{} at {position}: {} ⟶ {}",
                    rule.name().magenta(),
                    node.to_string().blue(),
                    replacement.to_string().red()
                )
            });

            ast.replace(position, replacement)?;
            stats.record(rule);
            changed = true;

            if self.strategy == RewriteStrategy::Continue {
                break;
            }
        }

        let operand_count = ast.get(position).map_or(0, |node| node.children().len());

        for index in 0..operand_count {
            position.push(index);
            let result = self.sweep(ast, position, stats, explanation);
            position.pop();

            changed |= result?;
        }

        Ok(changed)
    }
}
