use indexmap::IndexMap;
use wff2cnf::{
    explanation::{DiscardedExplanation, Explanation},
    grammar::Grammar,
    rules::RuleSpec,
    transform::{match_pattern, Bindings, RewriteLimits, RewriteRule, RewriteStrategy},
    Config, RewriteOutcome, Transformer, WffError,
};

fn normalize(
    transformer: &Transformer,
    grammar: &Grammar,
    input: &str,
) -> (String, RewriteOutcome) {
    let mut ast = grammar.parse(input).unwrap();
    let outcome = transformer
        .apply_transformations(&mut ast, &mut DiscardedExplanation)
        .unwrap();

    (ast.to_string(), outcome)
}

#[test]
fn standard_rules() {
    let config = Config::standard();
    let transformer = config.transformer().unwrap();

    let test_cases: [(&str, &str, usize, usize); 24] = [
        ("a=>b", "!a+b", 2, 1),
        ("!(a+b)", "!a*!b", 2, 1),
        ("!(a*b)", "!a+!b", 2, 1),
        ("a*a", "a", 2, 1),
        ("!!a", "a", 2, 1),
        ("!!a*b", "a*b", 2, 1),
        ("!!!a", "!a", 2, 1),
        ("a+b+c", "a+b+c", 1, 0),
        ("a+(b+c)", "a+b+c", 1, 0),
        ("!q+p+q", "!q+p+q", 1, 0),
        ("(a=>b)=>c", "(a+c)*(!b+c)", 4, 5),
        ("a=>b=>c", "(a+c)*(!b+c)", 4, 5),
        ("a*b+c", "(a+c)*(b+c)", 2, 1),
        ("!(a*b)*c", "(!a+!b)*c", 2, 1),
        ("!(a+b)=>c", "a+b+c", 2, 2),
        ("a+b=>c", "(!a+c)*(!b+c)", 3, 3),
        ("a * (b+!c) => !d", "(!b+!a+!d)*(c+!a+!d)", 4, 6),
        ("(a+(b*c))+d", "(b+a+d)*(c+a+d)", 3, 2),
        ("!(p*(q+!r))", "(!q+!p)*(r+!p)", 3, 4),
        ("p*1", "p", 2, 1),
        ("x+0", "x", 2, 1),
        ("1", "1", 1, 0),
        ("p+(p*q)", "p", 2, 1),
        ("(a+b)*(!b+c)", "a+c", 2, 1),
    ];

    for (i, (input, expected, sweeps, rewrites)) in test_cases.into_iter().enumerate() {
        let (result, outcome) = normalize(&transformer, &config.grammar, input);

        assert_eq!(result, expected, "Test case {}; Input: {}", i + 1, input);
        assert!(outcome.is_converged(), "Test case {}; Input: {}", i + 1, input);
        assert_eq!(
            (outcome.stats().sweeps, outcome.stats().rewrites),
            (sweeps, rewrites),
            "Test case {}; Input: {}",
            i + 1,
            input
        );
    }
}

#[test]
fn nested_implication_reaches_cnf() {
    let config = Config::standard();
    let input = "(p+!(q*r))=>((p+s)*t)";

    let test_cases: [(RewriteStrategy, &str, usize, usize); 2] = [
        (
            RewriteStrategy::Continue,
            "(p+s+!p)*(t+!p)*(p+s+q)*(t+q)*(p+s+r)*(t+r)",
            3,
            8,
        ),
        (
            RewriteStrategy::Restart,
            "(!p+p+s)*(q+p+s)*(r+p+s)*(!p+t)*(q+t)*(r+t)",
            3,
            10,
        ),
    ];

    for (i, (strategy, expected, sweeps, rewrites)) in test_cases.into_iter().enumerate() {
        let transformer = config.transformer().unwrap().with_strategy(strategy);
        let (result, outcome) = normalize(&transformer, &config.grammar, input);

        assert_eq!(result, expected, "Test case {}; Strategy: {}", i + 1, strategy);
        assert!(!result.contains("=>"));
        assert!(!result.contains("!!"));
        assert!(!result.contains("!("));
        assert_eq!(outcome.stats().sweeps, sweeps);
        assert_eq!(outcome.stats().rewrites, rewrites);
    }

    let transformer = config.transformer().unwrap();
    let (_, outcome) = normalize(&transformer, &config.grammar, input);

    let expected_hits: IndexMap<String, usize> = [
        ("implication", 1),
        ("de_morgan_disjunction", 1),
        ("double_negation", 1),
        ("distribution_right", 2),
        ("distribution_left", 3),
    ]
    .into_iter()
    .map(|(name, hits)| (name.to_owned(), hits))
    .collect();

    assert_eq!(outcome.stats().rule_hits, expected_hits);
}

#[test]
fn pattern_matching() {
    let grammar = Grammar::standard();

    let test_cases: [(&str, &str, Option<Vec<(&str, &str)>>); 7] = [
        (
            "(a+b)=>c",
            "((!p+s)+r)=>s",
            Some(vec![("a", "!p+s"), ("b", "r"), ("c", "s")]),
        ),
        ("(a+b)=>!c", "((!p+s)+r)=>s", None),
        ("a+a", "(p*q)+(p*q)", Some(vec![("a", "p*q")])),
        ("a+a", "(p*q)+(q*p)", None),
        ("a*1", "p*q", None),
        ("a*1", "(p+q)*1", Some(vec![("a", "p+q")])),
        ("!a", "!!p", Some(vec![("a", "!p")])),
    ];

    for (i, (pattern, input, expected)) in test_cases.into_iter().enumerate() {
        let pattern = grammar.parse_pattern(pattern).unwrap();
        let ast = grammar.parse(input).unwrap();
        let mut bindings = Bindings::new();

        let result = match_pattern(ast.root(), pattern.root(), &mut bindings).then(|| {
            bindings
                .iter()
                .map(|(variable, node)| (variable.clone(), node.to_string()))
                .collect::<Vec<_>>()
        });
        let expected = expected.map(|bindings| {
            bindings
                .into_iter()
                .map(|(variable, node)| (variable.to_owned(), node.to_owned()))
                .collect::<Vec<_>>()
        });

        assert_eq!(result, expected, "Test case {}; Pattern: {}", i + 1, pattern);
    }
}

#[test]
fn compile_rules() {
    let grammar = Grammar::standard();

    let rule = RewriteRule::compile(&grammar, &RuleSpec::new("a*b", "b*a")).unwrap();
    assert_eq!(rule.name(), "a*b ↦ b*a");

    let rule = RewriteRule::compile(&grammar, &RuleSpec::named("swap", "e*f", "f*e")).unwrap();
    assert_eq!(rule.to_string(), "swap: e*f ↦ f*e");

    let node = grammar.parse("p*(q+r)").unwrap().into_root();
    assert_eq!(
        rule.apply(&node).unwrap().map(|node| node.to_string()),
        Some("(q+r)*p".to_owned())
    );
    assert_eq!(rule.apply(&grammar.parse("p+q").unwrap().into_root()), Ok(None));

    assert_eq!(
        RewriteRule::compile(&grammar, &RuleSpec::new("a*b", "a+c")).map(|rule| rule.to_string()),
        Err(WffError::UnboundPatternVariable {
            variable: "c".to_owned()
        })
    );
    assert!(RewriteRule::compile(&grammar, &RuleSpec::new("a*", "a")).is_err());

    let duplicated = [
        RuleSpec::named("swap", "a*b", "b*a"),
        RuleSpec::named("swap", "a+b", "b+a"),
    ];
    assert!(matches!(
        Transformer::new(&grammar, &duplicated),
        Err(WffError::InvalidConfig { .. })
    ));
}

#[test]
fn first_rule_in_order_wins() {
    let config = Config::standard();
    let transformer = config.transformer().unwrap();

    let test_cases: [(&str, Option<(&str, &str)>); 4] = [
        ("!(a+b)", Some(("de_morgan_disjunction", "!a*!b"))),
        ("a+a", Some(("idempotence_disjunction", "a"))),
        ("(a*b)+(a*b)", Some(("idempotence_disjunction", "a*b"))),
        ("a+b", None),
    ];

    for (i, (input, expected)) in test_cases.into_iter().enumerate() {
        let node = config.grammar.parse(input).unwrap().into_root();
        let result = transformer
            .rewrite(&node)
            .unwrap()
            .map(|(rule, node)| (rule.name().to_owned(), node.to_string()));
        let expected = expected.map(|(name, node)| (name.to_owned(), node.to_owned()));

        assert_eq!(result, expected, "Test case {}; Input: {}", i + 1, input);
    }
}

#[test]
fn cycling_rules_hit_the_sweep_limit() {
    let grammar = Grammar::standard();
    let transformer = Transformer::new(&grammar, &[RuleSpec::named("swap", "a+b", "b+a")])
        .unwrap()
        .with_limits(RewriteLimits {
            max_sweeps: 5,
            max_rewrites: None,
        });

    let (result, outcome) = normalize(&transformer, &grammar, "p+q");

    assert_eq!(result, "q+p");
    assert!(!outcome.is_converged());
    assert_eq!(outcome.stats().sweeps, 5);
    assert_eq!(outcome.stats().rewrites, 5);
    assert_eq!(outcome.stats().rule_hits["swap"], 5);
}

#[test]
fn cycling_rules_hit_the_rewrite_limit() {
    let grammar = Grammar::standard();
    let transformer = Transformer::new(&grammar, &[RuleSpec::named("swap", "a+b", "b+a")])
        .unwrap()
        .with_strategy(RewriteStrategy::Restart)
        .with_limits(RewriteLimits {
            max_sweeps: 1000,
            max_rewrites: Some(7),
        });

    let (result, outcome) = normalize(&transformer, &grammar, "p+q");

    assert_eq!(result, "q+p");
    assert!(matches!(outcome, RewriteOutcome::DidNotConverge(_)));
    assert_eq!(outcome.stats().sweeps, 1);
    assert_eq!(outcome.stats().rewrites, 7);
}

#[test]
fn fixpoint_at_a_limit_still_converges() {
    let grammar = Grammar::standard();
    let transformer =
        Transformer::new(&grammar, &[RuleSpec::named("double_negation", "!!a", "a")]).unwrap();

    let test_cases: [(&str, usize, Option<usize>, &str, bool, usize, usize); 5] = [
        ("!!p", 1000, Some(1), "p", true, 2, 1),
        ("!!p", 1, None, "p", true, 2, 1),
        ("p", 0, None, "p", true, 1, 0),
        ("!!!!p", 1000, Some(1), "!!p", false, 1, 1),
        ("!!!!p", 1, None, "!!p", false, 1, 1),
    ];

    for (i, (input, max_sweeps, max_rewrites, expected, converged, sweeps, rewrites)) in
        test_cases.into_iter().enumerate()
    {
        let transformer = transformer.clone().with_limits(RewriteLimits {
            max_sweeps,
            max_rewrites,
        });
        let (result, outcome) = normalize(&transformer, &grammar, input);

        assert_eq!(
            (result.as_str(), outcome.is_converged()),
            (expected, converged),
            "Test case {}; Input: {}",
            i + 1,
            input
        );
        assert_eq!(
            (outcome.stats().sweeps, outcome.stats().rewrites),
            (sweeps, rewrites),
            "Test case {}; Input: {}",
            i + 1,
            input
        );
    }

    let config = Config::standard();
    let mut ast = config.grammar.parse("a=>b").unwrap();
    let transformer = config.transformer().unwrap().with_limits(RewriteLimits {
        max_sweeps: 1,
        max_rewrites: None,
    });

    assert!(transformer.is_fixpoint(&config.grammar.parse("!a+b").unwrap()));
    assert!(!transformer.is_fixpoint(&ast));

    let outcome = transformer
        .apply_transformations(&mut ast, &mut DiscardedExplanation)
        .unwrap();

    assert_eq!(ast.to_string(), "!a+b");
    assert!(outcome.is_converged());
    assert_eq!(outcome.stats().sweeps, 2);
}

#[test]
fn explanation_records_every_firing() {
    let config = Config::standard();
    let transformer = config.transformer().unwrap();

    let test_cases: [(&str, usize); 3] = [("a=>b", 2), ("a+b", 1), ("(a=>b)=>c", 6)];

    for (i, (input, expected)) in test_cases.into_iter().enumerate() {
        let mut ast = config.grammar.parse(input).unwrap();
        let mut explanation = Explanation::new(format!("Normalizing {input}"));

        let outcome = transformer
            .apply_transformations(&mut ast, &mut explanation)
            .unwrap();

        assert_eq!(
            explanation.step_count(),
            expected,
            "Test case {}; Input: {}",
            i + 1,
            input
        );
        assert_eq!(explanation.step_count(), outcome.stats().rewrites + 1);
    }
}

#[test]
fn strategies_parse_from_text() {
    assert_eq!("continue".parse(), Ok(RewriteStrategy::Continue));
    assert_eq!("restart".parse(), Ok(RewriteStrategy::Restart));
    assert!("sometimes".parse::<RewriteStrategy>().is_err());
    assert_eq!(RewriteStrategy::default(), RewriteStrategy::Continue);
}
