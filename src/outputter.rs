use std::fmt;

use console::Style;
use flume::Receiver;

use crate::error::AssertionFailure;
use crate::error::HarnessError;
use crate::runner::CaseResult;

pub struct OutPutter;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
}

impl Summary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl OutPutter {
    pub async fn start(rx: Receiver<CaseResult>, test_path: &str, n_tests: usize) -> Summary {
        let style = Style::new().bold().cyan();
        let open_text =
            &format!("Running test file: {test_path} Found {n_tests} tests: Running...");
        println!("{}", style.apply_to(open_text));

        let mut i = 1;
        let mut summary = Summary::default();
        let mut failed_tests: Vec<CaseResult> = vec![];

        while let Ok(result) = rx.recv_async().await {
            let CaseResult {
                name,
                method,
                path,
                elapsed,
                ..
            } = &result;

            match &result.outcome {
                Ok(status) => {
                    summary.passed += 1;
                    println!(
                        "[{i}/{n_tests}] {}  {method} {path} {name}: Got status {status} {} {}",
                        console::style("✔").green().bold(),
                        console::style("PASS!").green().bold(),
                        console::style(format!("({}ms)", elapsed.as_millis())).dim(),
                    )
                }
                Err(error) => {
                    summary.failed += 1;
                    println!(
                        "[{i}/{n_tests}] {}  {method} {path} {name}: {} {}",
                        console::style("╳").red().bold(),
                        kind(error),
                        console::style("FAILED!").red().bold(),
                    );
                    failed_tests.push(result);
                }
            }

            i += 1;
        }

        if !failed_tests.is_empty() {
            println!();
            println!(
                "{}",
                console::style("Summary of Failed Tests:").bold().red()
            );
            for (idx, result) in failed_tests.iter().enumerate() {
                if let Err(error) = &result.outcome {
                    println!("\n{} {}. {}", idx + 1, result.name, Report(error));
                }
            }
        } else {
            println!();
            println!("{}", console::style("All tests passed! 🎉").bold().green());
        }

        summary
    }
}

fn kind(error: &HarnessError) -> &'static str {
    match error {
        HarnessError::Transport(_) => "Request failed",
        HarnessError::Assertion(AssertionFailure::Status { .. }) => "Status test",
        HarnessError::Assertion(AssertionFailure::Header { .. }) => "Header test",
        HarnessError::Assertion(AssertionFailure::BodyContains { .. }) => "Body test",
        HarnessError::Assertion(
            AssertionFailure::Fixture { .. } | AssertionFailure::FixtureUnreadable { .. },
        ) => "Fixture test",
        HarnessError::Assertion(_) => "Field test",
    }
}

/// Multi-line, colored rendering of a failure for the final summary.
struct Report<'a>(&'a HarnessError);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {}",
            console::style("✘").red().bold(),
            console::style("FAIL!").red().bold(),
        )?;

        let failure = match self.0 {
            HarnessError::Transport(error) => {
                return writeln!(
                    f,
                    "  {} {}",
                    console::style("Request failed with error:").red(),
                    console::style(error).red().bold()
                );
            }
            HarnessError::Assertion(failure) => failure,
        };

        match failure {
            AssertionFailure::Status { expected, actual } => {
                writeln!(
                    f,
                    "  Expected: {}\n  Actual:   {}",
                    console::style(format!("Expected status {expected}")).green(),
                    console::style(format!("Got status {actual}")).red(),
                )
            }
            AssertionFailure::Field {
                path,
                expected,
                actual,
            } => {
                writeln!(f, "  {} {}", console::style("Field:").yellow().bold(), path)?;
                writeln!(f, "  Expected: {}", console::style(expected).green())?;
                writeln!(f, "  Actual:   {}", console::style(pretty(actual.as_ref())).red())
            }
            AssertionFailure::Fixture {
                fixture,
                difference,
            } => {
                writeln!(
                    f,
                    "  {} {} {}",
                    console::style("Fixture:").yellow().bold(),
                    fixture.display(),
                    console::style("(lhs: response, rhs: fixture)").dim()
                )?;
                for line in difference.lines() {
                    writeln!(f, "  {}", console::style(line).red())?;
                }
                Ok(())
            }
            other => writeln!(f, "  {}", console::style(other).red()),
        }
    }
}

fn pretty(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(value) => serde_json::to_string_pretty(value).unwrap_or_default(),
        None => "<missing>".into(),
    }
}
