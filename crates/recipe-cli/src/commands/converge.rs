//! Converge command implementation
//!
//! Builds runner options from `--config` and flags, converges the run-list
//! and prints the ledger. `--expect` / `--expect-not` checks run against the
//! converged ledger and make the command fail when any of them fails.

use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use recipe_core::{CookbookPath, LedgerRecord, Runner, RunnerOptions};
use recipe_matchers::{ResourceExpectation, expect_not, expect_that, resource_matcher};

use crate::cli::ConvergeArgs;
use crate::error::{CliError, Result};

/// One `--expect` or `--expect-not` check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    pub text: String,
    pub negated: bool,
    action: String,
    resource_type: String,
    name: String,
}

impl Expectation {
    /// Parse `action:type:name`; the name may itself contain `:`.
    pub fn parse(text: &str, negated: bool) -> Result<Self> {
        let mut parts = text.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(action), Some(resource_type), Some(name))
                if !action.is_empty() && !resource_type.is_empty() && !name.is_empty() =>
            {
                Ok(Self {
                    text: text.to_string(),
                    negated,
                    action: action.to_string(),
                    resource_type: resource_type.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(CliError::user(format!(
                "Invalid expectation '{text}': expected ACTION:TYPE:NAME"
            ))),
        }
    }

    fn matcher(&self) -> ResourceExpectation {
        resource_matcher(self.action.as_str(), self.resource_type.as_str()).named(self.name.as_str())
    }

    /// `None` when the check passes, otherwise the diagnostic.
    pub fn check(&self, runner: &Runner) -> Option<String> {
        let outcome = if self.negated {
            expect_not(runner, &self.matcher())
        } else {
            expect_that(runner, &self.matcher())
        };
        outcome.err().map(|failure| failure.message().to_string())
    }
}

#[derive(Debug, Serialize)]
struct ExpectationReport {
    expectation: String,
    negated: bool,
    passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct ConvergeReport {
    run: String,
    dry_run: bool,
    ledger: Vec<LedgerRecord>,
    expectations: Vec<ExpectationReport>,
}

/// Resolve runner options: the config file first, then flags on top.
pub fn build_options(args: &ConvergeArgs) -> Result<RunnerOptions> {
    let mut options = match (&args.config, args.cookbook_path.is_empty()) {
        (Some(config), _) => RunnerOptions::load(config)?,
        (None, false) => RunnerOptions::new(CookbookPath::Multiple(Vec::new())),
        (None, true) => {
            return Err(CliError::user(
                "No cookbook path given; pass --cookbook-path or --config",
            ));
        }
    };

    if !args.cookbook_path.is_empty() {
        options.cookbook_path = match args.cookbook_path.as_slice() {
            [single] => CookbookPath::Single(single.clone()),
            many => CookbookPath::Multiple(many.to_vec()),
        };
    }
    if let Some(level) = args.log_level {
        options = options.log_level(level);
    }
    if let Some(root) = &args.root {
        options = options.root(root);
    }
    if args.dry_run {
        options = options.dry_run(true);
    }
    Ok(options.step_into(args.step_into.iter().cloned()))
}

/// Run the converge command
pub fn run_converge(args: &ConvergeArgs) -> Result<()> {
    let expectations = args
        .expect
        .iter()
        .map(|text| Expectation::parse(text, false))
        .chain(args.expect_not.iter().map(|text| Expectation::parse(text, true)))
        .collect::<Result<Vec<_>>>()?;

    let options = build_options(args)?;
    debug!(?options, "converging {:?}", args.recipes);

    let mut runner = Runner::new(options)?;
    runner.converge(&args.recipes)?;

    let reports: Vec<ExpectationReport> = expectations
        .iter()
        .map(|expectation| {
            let message = expectation.check(&runner);
            ExpectationReport {
                expectation: expectation.text.clone(),
                negated: expectation.negated,
                passed: message.is_none(),
                message,
            }
        })
        .collect();
    let failed = reports.iter().filter(|r| !r.passed).count();

    if args.json {
        let report = ConvergeReport {
            run: runner.to_string(),
            dry_run: runner.is_dry_run(),
            ledger: runner.ledger().records(),
            expectations: reports,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_human(&runner, &reports);
    }

    if failed > 0 {
        return Err(CliError::Expectations {
            failed,
            total: expectations.len(),
        });
    }
    Ok(())
}

fn print_human(runner: &Runner, reports: &[ExpectationReport]) {
    println!("{} {}", "=>".blue().bold(), runner);

    if runner.is_dry_run() {
        println!("{} Dry run: nothing was evaluated.", "DRY-RUN".yellow().bold());
        return;
    }

    for entry in runner.ledger() {
        let declared = entry.resource().action();
        let action = if declared == entry.action() {
            format!(":{}", entry.action())
        } else {
            format!(":{} (declared :{declared})", entry.action())
        };
        let executed = if runner.step_into().contains(entry.resource_type()) {
            "executed".green()
        } else {
            "recorded".dimmed()
        };
        println!(
            "   {:>3} {}[{}] {} {}",
            entry.sequence(),
            entry.resource_type().cyan(),
            entry.name(),
            action,
            executed
        );
    }
    println!();
    println!("{} {} resources dispatched.", "OK".green().bold(), runner.ledger().len());

    for report in reports {
        match &report.message {
            None => println!("   {} {}", "PASS".green().bold(), report.expectation),
            Some(message) => println!("   {} {}: {}", "FAIL".red().bold(), report.expectation, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args() -> ConvergeArgs {
        ConvergeArgs {
            recipes: vec!["example".into()],
            cookbook_path: vec![],
            step_into: vec![],
            dry_run: false,
            log_level: None,
            root: None,
            config: None,
            json: false,
            expect: vec![],
            expect_not: vec![],
        }
    }

    #[test]
    fn parses_expectations() {
        let expectation = Expectation::parse("create:file:C:/temp/x", false).unwrap();
        assert_eq!(expectation.action, "create");
        assert_eq!(expectation.resource_type, "file");
        assert_eq!(expectation.name, "C:/temp/x");

        assert!(Expectation::parse("create:file", false).is_err());
        assert!(Expectation::parse("::x", true).is_err());
    }

    #[test]
    fn options_need_a_cookbook_path() {
        let err = build_options(&args()).unwrap_err();
        assert!(err.to_string().contains("--cookbook-path"));
    }

    #[test]
    fn flags_build_options() {
        let mut args = args();
        args.cookbook_path = vec![PathBuf::from("a"), PathBuf::from("b")];
        args.step_into = vec!["file".into()];
        args.dry_run = true;

        let options = build_options(&args).unwrap();
        assert_eq!(
            options.cookbook_path,
            CookbookPath::Multiple(vec![PathBuf::from("a"), PathBuf::from("b")])
        );
        assert!(options.step_into.contains("file"));
        assert!(options.dry_run);
    }
}
