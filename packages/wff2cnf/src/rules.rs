use serde::{Deserialize, Serialize};

/// A rewrite rule as text: a pattern and the replacement it rewrites to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub pattern: String,
    pub replacement: String,
}

impl RuleSpec {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            name: None,
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    pub fn named(
        name: impl Into<String>,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(pattern, replacement)
        }
    }
}

/// Boolean-algebra identities over the standard operators, in the order
/// they are tried. Matching is positional, so every commuted form a law
/// needs is listed separately.
pub fn standard() -> Vec<RuleSpec> {
    [
        ("implication", "a=>b", "!a+b"),
        ("de_morgan_disjunction", "!(a+b)", "!a*!b"),
        ("de_morgan_conjunction", "!(a*b)", "!a+!b"),
        ("idempotence_conjunction", "a*a", "a"),
        ("idempotence_disjunction", "a+a", "a"),
        ("conjunction_identity_right", "a*1", "a"),
        ("conjunction_identity_left", "1*a", "a"),
        ("disjunction_identity_right", "a+0", "a"),
        ("disjunction_identity_left", "0+a", "a"),
        ("conjunction_annihilator_right", "a*0", "0"),
        ("conjunction_annihilator_left", "0*a", "0"),
        ("disjunction_annihilator_right", "a+1", "1"),
        ("disjunction_annihilator_left", "1+a", "1"),
        ("excluded_middle_right", "a+!a", "1"),
        ("excluded_middle_left", "!a+a", "1"),
        ("contradiction_right", "a*!a", "0"),
        ("contradiction_left", "!a*a", "0"),
        ("absorption_disjunction_1", "a+(a*b)", "a"),
        ("absorption_disjunction_2", "a+(b*a)", "a"),
        ("absorption_disjunction_3", "(a*b)+a", "a"),
        ("absorption_disjunction_4", "(b*a)+a", "a"),
        ("absorption_conjunction_1", "a*(a+b)", "a"),
        ("absorption_conjunction_2", "a*(b+a)", "a"),
        ("absorption_conjunction_3", "(a+b)*a", "a"),
        ("absorption_conjunction_4", "(b+a)*a", "a"),
        ("resolution_1", "(a+b)*(!b+c)", "a+c"),
        ("resolution_2", "(a+b)*(c+!b)", "a+c"),
        ("resolution_3", "(b+a)*(!b+c)", "a+c"),
        ("resolution_4", "(b+a)*(c+!b)", "a+c"),
        ("resolution_5", "(!b+c)*(a+b)", "a+c"),
        ("resolution_6", "(c+!b)*(a+b)", "a+c"),
        ("resolution_7", "(!b+c)*(b+a)", "a+c"),
        ("resolution_8", "(c+!b)*(b+a)", "a+c"),
        ("distribution_right", "(a*b)+c", "(a+c)*(b+c)"),
        ("distribution_left", "c+(a*b)", "(a+c)*(b+c)"),
        ("double_negation", "!!a", "a"),
    ]
    .into_iter()
    .map(|(name, pattern, replacement)| RuleSpec::named(name, pattern, replacement))
    .collect()
}
