use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use colored::Colorize;
use env_logger::Env;
use log::{debug, info};
use wff2cnf::{
    evaluate::is_equivalent,
    explanation::{DiscardedExplanation, Explanation},
    transform::RewriteStrategy,
    Config, RewriteOutcome,
};

/// Rewrites a propositional formula toward conjunctive normal form.
#[derive(Debug, Parser)]
#[command(name = "wff2cnf", version)]
struct Cli {
    /// Formula to normalize, e.g. "(p+!(q*r))=>((p+s)*t)". Prompted for when
    /// omitted.
    formula: Option<String>,

    /// JSON file holding the grammar, the rule table and the limits
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where a sweep resumes after a rule fires: "continue" or "restart"
    #[arg(long)]
    strategy: Option<RewriteStrategy>,

    #[arg(long, value_name = "N")]
    max_sweeps: Option<usize>,

    #[arg(long, value_name = "N")]
    max_rewrites: Option<usize>,

    /// Print every rule firing, sweep by sweep
    #[arg(long)]
    explain: bool,

    /// Print the parsed and the rewritten tree
    #[arg(long)]
    tree: bool,

    /// Check the result against the input with a truth table
    #[arg(long)]
    verify: bool,

    /// Raise the log level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Returns whether rewriting reached a fixpoint.
fn run(cli: Cli) -> Result<bool> {
    let mut config = load_config(cli.config.as_deref())?;

    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }
    if let Some(max_sweeps) = cli.max_sweeps {
        config.limits.max_sweeps = max_sweeps;
    }
    if let Some(max_rewrites) = cli.max_rewrites {
        config.limits.max_rewrites = Some(max_rewrites);
    }

    let transformer = config
        .transformer()
        .context("Cannot compile the rule table")?;
    debug!(
        "{} rules, strategy {}, {:?}",
        transformer.rules().len(),
        transformer.strategy(),
        transformer.limits()
    );

    let formula = match cli.formula {
        Some(formula) => formula,
        None => prompt("Enter a WFF: ")?,
    };

    let start = Instant::now();

    let mut ast = config
        .grammar
        .parse(&formula)
        .with_context(|| format!("Cannot parse '{formula}'"))?;
    let original = ast.clone();

    let mut explanation = cli
        .explain
        .then(|| Explanation::new(format!("Normalizing {}", ast.to_string().blue())));
    let outcome = match explanation.as_mut() {
        Some(explanation) => transformer.apply_transformations(&mut ast, explanation)?,
        None => transformer.apply_transformations(&mut ast, &mut DiscardedExplanation)?,
    };

    let elapsed = start.elapsed();

    if cli.tree {
        println!("{}", original.get_tree());
    }
    if let Some(explanation) = explanation {
        println!("{explanation}");
    }

    match &outcome {
        RewriteOutcome::Converged(_) => println!("CNF: {}", ast.to_string().green()),
        RewriteOutcome::DidNotConverge(stats) => println!(
            "{} after {} sweeps and {} rewrites: {}",
            "No fixpoint".yellow(),
            stats.sweeps,
            stats.rewrites,
            ast
        ),
    }

    if cli.tree {
        println!("{}", ast.get_tree());
    }

    println!("Completed in: {} microseconds", elapsed.as_micros());

    let stats = outcome.stats();
    info!("{} sweeps, {} rewrites", stats.sweeps, stats.rewrites);
    for (rule, hits) in &stats.rule_hits {
        debug!("{rule}: {hits}");
    }

    if cli.verify {
        if is_equivalent(&original, &ast, config.grammar.symbols())? {
            println!("{}", "Equivalent to the input".green());
        } else {
            println!("{}", "Not equivalent to the input (entailed only)".yellow());
        }
    }

    Ok(outcome.is_converged())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::standard());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read configuration file {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    debug!("loaded configuration from {}", path.display());

    Ok(config)
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Cannot read the formula")?;

    Ok(line.trim_end().to_owned())
}
