//! The runner invoked by `integration_test_main!`

use std::io::{self, Write};

use colored::Colorize;

use crate::types::{IntegrationTest, IntegrationTestFn, TestVerbosity};

/// Run every test whose name contains `filter`, returning whether all passed
pub async fn run_tests<'a, A: Clone + 'a>(
    tests: impl IntoIterator<Item = &'a IntegrationTest<A>>,
    args: A,
    filter: Option<&str>,
    verbosity: TestVerbosity,
) -> bool {
    let verbose = verbosity != TestVerbosity::Quiet;
    if verbose {
        println!("\n\n{}\n", "Running integration tests...".blue());
    }

    let mut n_run = 0;
    let mut n_failed = 0;
    for test in tests {
        if let Some(filter) = filter
            && !test.name.contains(filter)
        {
            continue;
        }

        n_run += 1;
        if verbose {
            print!("Running {}... ", test.name);
            let _ = io::stdout().flush();
        }

        let res = match &test.test_fn {
            IntegrationTestFn::SynchronousFn(f) => f(args.clone()),
            IntegrationTestFn::AsynchronousFn(f) => f(args.clone()).await,
        };

        match res {
            Ok(()) if verbose => println!("{}", "Success!".green()),
            Ok(()) => {},
            Err(e) => {
                n_failed += 1;
                println!("{}\n\t{e:#}", "Failure!".red());
            },
        }
    }

    if n_failed == 0 {
        if verbose {
            println!("\n{}", format!("{n_run} integration tests successful!").green());
        }
        return true;
    }

    println!("\n{}", format!("{n_failed} of {n_run} integration tests failed").red());
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A passing synchronous test
    fn passes(_: u8) -> eyre::Result<()> {
        Ok(())
    }

    /// A test that fails unless its argument is zero
    fn fails(arg: u8) -> eyre::Result<()> {
        crate::assert_eq_result!(arg, 0)
    }

    /// A passing asynchronous test
    async fn passes_async(arg: u8) -> eyre::Result<()> {
        crate::assert_true_result!(arg > 0)
    }

    /// Build the test suite used below
    fn suite() -> Vec<IntegrationTest<u8>> {
        vec![
            IntegrationTest {
                name: "suite::passes",
                test_fn: IntegrationTestFn::SynchronousFn(passes),
            },
            IntegrationTest { name: "suite::fails", test_fn: IntegrationTestFn::SynchronousFn(fails) },
            IntegrationTest {
                name: "suite::passes_async",
                test_fn: IntegrationTestFn::AsynchronousFn(|arg| Box::pin(passes_async(arg))),
            },
        ]
    }

    #[tokio::test]
    async fn test_failure_is_reported() {
        let suite = suite();
        assert!(!run_tests(&suite, 1, None, TestVerbosity::Quiet).await);
    }

    #[tokio::test]
    async fn test_filter_skips_tests() {
        let suite = suite();
        assert!(run_tests(&suite, 1, Some("passes"), TestVerbosity::Quiet).await);
    }
}
