//! Defines assertion helpers that return errors instead of panicking, for use
//! in the integration test harness

/// Assert that a boolean value is true, return an error otherwise
#[macro_export]
macro_rules! assert_true_result {
    ($x:expr) => {
        if $x {
            Ok(())
        } else {
            Err(eyre::eyre!("Expected `{} == true`, got `false`", stringify!($x)))
        }
    };
}

/// Assert that two values are equal, return an error otherwise
#[macro_export]
macro_rules! assert_eq_result {
    ($x:expr, $y:expr) => {
        if $x == $y {
            Ok(())
        } else {
            Err(eyre::eyre!(
                "Expected `{} == {}`, got `{:?} == {:?}`",
                stringify!($x),
                stringify!($y),
                $x,
                $y
            ))
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_eq_result() {
        let ok: eyre::Result<()> = assert_eq_result!(1 + 1, 2);
        assert!(ok.is_ok());

        let err: eyre::Result<()> = assert_eq_result!(1 + 1, 3);
        assert_eq!(err.unwrap_err().to_string(), "Expected `1 + 1 == 3`, got `2 == 3`");
    }

    #[test]
    fn test_assert_true_result() {
        let err: eyre::Result<()> = assert_true_result!(1 > 2);
        assert_eq!(err.unwrap_err().to_string(), "Expected `1 > 2 == true`, got `false`");
    }
}
