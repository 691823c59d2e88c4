//! Solver configuration layering
//!
//! Precedence, lowest first: built-in defaults, the TOML config file,
//! `MAX_SOLVER_SECONDS`, and the `--max-seconds` flag.
//!
//! ```toml
//! max_seconds = 5
//! unfilled_mode = "sentinel"        # or "reject"
//! availability_default = "available" # or "unavailable"
//! allow_overlap = false
//!
//! [weights]
//! unfilled = 1000
//! change = 10
//! ```

use anyhow::{Context, Result};
use std::path::Path;

use roster_solver::SolverOptions;

/// Parse solver options from TOML text
pub fn parse_options(text: &str) -> Result<SolverOptions> {
    toml::from_str(text).context("invalid solver configuration")
}

/// Resolve the options of this invocation
pub fn load_options(
    config: Option<&Path>,
    env_seconds: Option<&str>,
    flag_seconds: Option<f64>,
) -> Result<SolverOptions> {
    let mut options = match config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            parse_options(&text).with_context(|| format!("in {}", path.display()))?
        }
        None => SolverOptions::default(),
    };

    options.apply_env_seconds(env_seconds);
    if let Some(seconds) = flag_seconds {
        options.max_seconds = seconds;
    }

    tracing::debug!(?options, "solver options resolved");
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_solver::{AvailabilityDefault, UnfilledMode};
    use std::io::Write;

    #[test]
    fn parses_partial_config() {
        let options = parse_options(
            r#"
            unfilled_mode = "reject"
            availability_default = "unavailable"

            [weights]
            change = 25
            "#,
        )
        .unwrap();

        assert_eq!(options.unfilled_mode, UnfilledMode::Reject);
        assert_eq!(options.availability_default, AvailabilityDefault::Unavailable);
        assert_eq!(options.weights.change, 25);
        assert_eq!(options.weights.unfilled, 1000);
        assert_eq!(options.max_seconds, 10.0);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(parse_options("unfilled_mode = \"maybe\"").is_err());
    }

    #[test]
    fn layers_apply_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_seconds = 3").unwrap();

        let from_file = load_options(Some(file.path()), None, None).unwrap();
        assert_eq!(from_file.max_seconds, 3.0);

        let from_env = load_options(Some(file.path()), Some("4.5"), None).unwrap();
        assert_eq!(from_env.max_seconds, 4.5);

        let bad_env = load_options(Some(file.path()), Some("soon"), None).unwrap();
        assert_eq!(bad_env.max_seconds, 3.0);

        let from_flag = load_options(Some(file.path()), Some("4.5"), Some(1.0)).unwrap();
        assert_eq!(from_flag.max_seconds, 1.0);
    }

    #[test]
    fn missing_config_is_an_error() {
        let err = load_options(Some(Path::new("/nonexistent/roster.toml")), None, None).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
