//! Parsing logic for a TOML config file
//!
//! Each top-level key of the file becomes a long flag, e.g. `rpc-url = "..."`
//! becomes `--rpc-url ...`, so the file accepts exactly the options the
//! command line does

use std::fs;

use toml::{Value, map::Map};

/// The CLI argument name for the config file
const CONFIG_FILE_ARG: &str = "--config-file";

/// Parse args from the config file named in the command line args, if any
pub(crate) fn config_file_args(cli_args: &[String]) -> Result<Vec<String>, String> {
    match find_config_file(cli_args)? {
        Some(path) => read_config_file(path),
        None => Ok(vec![]),
    }
}

/// Find the path given to `--config-file`, in either `--config-file <path>`
/// or `--config-file=<path>` form
fn find_config_file(cli_args: &[String]) -> Result<Option<&str>, String> {
    let mut args = cli_args.iter();
    while let Some(arg) = args.next() {
        if arg == CONFIG_FILE_ARG {
            let path = args.next().ok_or(format!("{CONFIG_FILE_ARG} requires a path"))?;
            return Ok(Some(path.as_str()));
        }

        if let Some(path) = arg.strip_prefix(CONFIG_FILE_ARG).and_then(|s| s.strip_prefix('=')) {
            return Ok(Some(path));
        }
    }

    Ok(None)
}

/// Read a config file into CLI args
fn read_config_file(path: &str) -> Result<Vec<String>, String> {
    let file_contents =
        fs::read_to_string(path).map_err(|err| format!("reading config file {path}: {err}"))?;
    config_str_to_args(&file_contents)
}

/// Convert the contents of a config file into CLI args
fn config_str_to_args(contents: &str) -> Result<Vec<String>, String> {
    let config_kv_pairs: Map<_, _> = toml::from_str(contents).map_err(|err| err.to_string())?;

    let mut config_file_args: Vec<String> = Vec::with_capacity(config_kv_pairs.len());
    for (toml_key, value) in config_kv_pairs.iter() {
        // Format the TOML key into --key
        let cli_arg = format!("--{toml_key}");
        config_file_args.extend(parse_toml_value(cli_arg, value)?);
    }

    Ok(config_file_args)
}

// ----------------
// | TOML Parsing |
// ----------------

/// Parse a toml value into a list of strings to append to the CLI args
fn parse_toml_value(cli_arg: String, val: &Value) -> Result<Vec<String>, String> {
    match val {
        // A flag is present when true and absent otherwise
        Value::Boolean(b) => Ok(if *b { vec![cli_arg] } else { vec![] }),
        // Repeated `--arg val` pairs
        Value::Array(arr) => {
            let mut res = Vec::with_capacity(arr.len() * 2);
            for val in arr.iter() {
                res.push(cli_arg.clone());
                res.push(toml_value_to_string(&cli_arg, val)?);
            }
            Ok(res)
        },
        x => Ok(vec![toml_value_to_string(&cli_arg, x).map(|v| format!("{cli_arg}={v}"))?]),
    }
}

/// Helper method to convert a scalar toml value to a string
fn toml_value_to_string(cli_arg: &str, val: &Value) -> Result<String, String> {
    Ok(match val {
        Value::String(val) => val.clone(),
        Value::Integer(val) => val.to_string(),
        Value::Float(val) => val.to_string(),
        Value::Boolean(val) => val.to_string(),
        _ => return Err(format!("unsupported value for {cli_arg}: {val}")),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    /// Convert string slices to owned args
    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_config_str_to_args() {
        let contents = r#"
            rpc-url = "http://localhost:8545"
            deploy-block = 12
            json-logs = true
            quiet = false
        "#;

        let parsed = config_str_to_args(contents).unwrap();
        assert_eq!(
            parsed,
            args(&["--deploy-block=12", "--json-logs", "--rpc-url=http://localhost:8545"])
        );
    }

    #[test]
    fn test_array_values_repeat_flag() {
        let parsed = config_str_to_args("user = [\"0x1\", \"0x2\"]").unwrap();
        assert_eq!(parsed, args(&["--user", "0x1", "--user", "0x2"]));
    }

    #[test]
    fn test_tables_unsupported() {
        let err = config_str_to_args("[nested]\nkey = 1").unwrap_err();
        assert!(err.contains("unsupported value for --nested"));
    }

    #[test]
    fn test_find_config_file() {
        let cli = args(&["bin", "--config-file", "a.toml", "reviews"]);
        assert_eq!(find_config_file(&cli).unwrap(), Some("a.toml"));

        let cli = args(&["bin", "--config-file=b.toml"]);
        assert_eq!(find_config_file(&cli).unwrap(), Some("b.toml"));

        assert_eq!(find_config_file(&args(&["bin", "reviews"])).unwrap(), None);
        assert!(find_config_file(&args(&["bin", "--config-file"])).is_err());
    }

    #[test]
    fn test_config_file_args_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "chain = \"base-mainnet\"").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = vec!["bin".to_string(), CONFIG_FILE_ARG.to_string(), path];
        assert_eq!(config_file_args(&cli).unwrap(), args(&["--chain=base-mainnet"]));
    }
}
