//! Defines the entrypoint macro of an integration test binary

/// Defines a `main` that parses the CLI, runs the setup callback, and
/// dispatches to every test registered through `inventory`
///
/// The CLI type must have a `test: Option<String>` filter and a
/// `verbosity: TestVerbosity` field, and the test arguments must implement
/// `From` the CLI type
#[macro_export]
macro_rules! integration_test_main {
    // No setup
    ($cli_args:ty, $test_args:ty) => {
        /// A no-op setup callback
        fn __no_setup(_: &$cli_args) {}
        $crate::integration_test_main!($cli_args, $test_args, __no_setup);
    };

    // Setup callback
    ($cli_args:ty, $test_args:ty, $setup:ident) => {
        /// Wraps a registered test so that `inventory` may collect it
        struct TestWrapper(test_helpers::types::IntegrationTest<$test_args>);
        inventory::collect!(TestWrapper);

        fn main() {
            use clap::Parser;

            let args = <$cli_args>::parse();
            $setup(&args);

            let filter = args.test.clone();
            let verbosity = args.verbosity;

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("failed to build tokio runtime");

            // Test arguments may spawn tasks on construction
            let _guard = runtime.enter();
            let test_args: $test_args = args.into();

            let tests = inventory::iter::<TestWrapper>.into_iter().map(|wrapper| &wrapper.0);
            let all_success = runtime.block_on(test_helpers::harness::run_tests(
                tests,
                test_args,
                filter.as_deref(),
                verbosity,
            ));

            if !all_success {
                std::process::exit(1);
            }
        }
    };
}
