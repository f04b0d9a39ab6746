//! Fingerprint configuration loading.
//!
//! Reads [`FingerprintConfig`] from a TOML file. Every key is optional:
//!
//! ```toml
//! format_version = 2
//! include_private_state = true
//! max_scope_depth = 64
//! ```
//!
//! `REVTAG_FORMAT_VERSION` in the environment overrides the file.

use std::path::Path;
use tracing::debug;

use revtag_core::FingerprintConfig;

use crate::error::{Error, Result};

/// Environment variable overriding `format_version`.
pub const FORMAT_VERSION_ENV: &str = "REVTAG_FORMAT_VERSION";

/// Load config from `path` (defaults when `None`) and apply env overrides.
pub fn load_config(path: Option<&Path>) -> Result<FingerprintConfig> {
    let config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            debug!(path = %path.display(), "loaded fingerprint config");
            parse_config(&text)?
        }
        None => FingerprintConfig::default(),
    };
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Parse and validate a TOML config document.
pub fn parse_config(text: &str) -> Result<FingerprintConfig> {
    let config: FingerprintConfig = toml::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

/// Apply overrides looked up through `lookup`.
pub fn apply_env_overrides(
    mut config: FingerprintConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<FingerprintConfig> {
    if let Some(raw) = lookup(FORMAT_VERSION_ENV) {
        config.format_version = raw.trim().parse().map_err(|_| {
            Error::Config(format!(
                "{} must be an unsigned integer, got '{}'",
                FORMAT_VERSION_ENV, raw
            ))
        })?;
    }
    validate(&config)?;
    Ok(config)
}

fn validate(config: &FingerprintConfig) -> Result<()> {
    if config.max_scope_depth == 0 {
        return Err(Error::Config("max_scope_depth must be at least 1".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(parse_config("").unwrap(), FingerprintConfig::default());
    }

    #[test]
    fn parses_all_keys() {
        let config = parse_config(
            "format_version = 3\ninclude_private_state = false\nmax_scope_depth = 8\n",
        )
        .unwrap();
        assert_eq!(config.format_version, 3);
        assert!(!config.include_private_state);
        assert_eq!(config.max_scope_depth, 8);
    }

    #[test]
    fn rejects_zero_depth() {
        assert!(matches!(
            parse_config("max_scope_depth = 0"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn rejects_bad_toml() {
        assert!(matches!(
            parse_config("format_version = \"one\""),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn env_override_wins() {
        let config = apply_env_overrides(FingerprintConfig::default(), |key| {
            (key == FORMAT_VERSION_ENV).then(|| "9".to_string())
        })
        .unwrap();
        assert_eq!(config.format_version, 9);
    }

    #[test]
    fn env_override_must_be_numeric() {
        let result = apply_env_overrides(FingerprintConfig::default(), |_| Some("v2".to_string()));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_scope_depth = 12").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.max_scope_depth, 12);
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_config(Some(Path::new("/nonexistent/revtag.toml")));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
