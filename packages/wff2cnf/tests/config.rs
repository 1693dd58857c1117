use wff2cnf::{
    transform::{RewriteLimits, RewriteStrategy},
    Config,
};

const STANDARD_CONFIG: &str = include_str!("../config/standard.json");

#[test]
fn bundled_config_is_standard() {
    let config: Config = serde_json::from_str(STANDARD_CONFIG).unwrap();

    assert_eq!(config, Config::standard());
    assert_eq!(config.rules.len(), 36);
    assert!(config.transformer().is_ok());
}

#[test]
fn config_survives_serialization() {
    let config = Config {
        strategy: RewriteStrategy::Restart,
        limits: RewriteLimits {
            max_sweeps: 10,
            max_rewrites: None,
        },
        ..Config::standard()
    };

    let json = serde_json::to_string(&config).unwrap();
    let deserialized: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(deserialized, config);
}

#[test]
fn limits_and_strategy_have_defaults() {
    let json = r#"{
        "grammar": {
            "symbols": { "constants": { "T": true, "F": false }, "variables": ["p", "q"] },
            "operators": {
                "~": { "precedence": 1, "associativity": "non_associative", "arity": "unary" },
                "&": { "precedence": 0, "associativity": "associative", "arity": "binary" }
            }
        },
        "rules": [
            { "pattern": "~~a", "replacement": "a" },
            { "name": "true_conjunction", "pattern": "a&T", "replacement": "a" }
        ]
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.limits, RewriteLimits::default());
    assert_eq!(config.strategy, RewriteStrategy::Continue);

    let transformer = config.transformer().unwrap();
    let names = transformer
        .rules()
        .iter()
        .map(|rule| rule.name())
        .collect::<Vec<_>>();
    assert_eq!(names, ["~~a ↦ a", "true_conjunction"]);

    let mut ast = config.grammar.parse("~~(p & T)").unwrap();
    let outcome = transformer
        .apply_transformations(&mut ast, &mut wff2cnf::explanation::DiscardedExplanation)
        .unwrap();

    assert!(outcome.is_converged());
    assert_eq!(ast.to_string(), "p");
}

#[test]
fn invalid_configs_are_rejected() {
    let test_cases = [
        // constant and variable share a lexeme
        r#"{ "grammar": { "symbols": { "constants": { "p": true }, "variables": ["p"] }, "operators": {} }, "rules": [] }"#,
        // symbol shadows an operator
        r#"{ "grammar": { "symbols": { "variables": ["~"] }, "operators": { "~": { "precedence": 1, "associativity": "non_associative", "arity": "unary" } } }, "rules": [] }"#,
        // unary connective on a binary operator
        r#"{ "grammar": { "symbols": { "variables": ["p"] }, "operators": { "-": { "precedence": 1, "associativity": "associative", "arity": "binary", "connective": "negation" } } }, "rules": [] }"#,
        // unknown strategy
        r#"{ "grammar": { "symbols": { "variables": ["p"] }, "operators": {} }, "rules": [], "strategy": "sometimes" }"#,
    ];

    for (i, input) in test_cases.into_iter().enumerate() {
        let result = serde_json::from_str::<Config>(input);

        assert!(result.is_err(), "Test case {}; Input: {}", i + 1, input);
    }
}

#[test]
fn unbound_replacement_variables_fail_to_build() {
    let json = r#"{
        "grammar": { "symbols": { "variables": ["p"] }, "operators": {
            "&": { "precedence": 0, "associativity": "associative", "arity": "binary" }
        } },
        "rules": [ { "pattern": "a&b", "replacement": "a&c" } ]
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert!(config.transformer().is_err());
}
