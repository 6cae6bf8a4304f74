//! Secret references.
//!
//! Credentials in configuration and in the business directory are stored
//! as references rather than values:
//!
//! - `env::VAR_NAME` reads `$VAR_NAME`
//! - `file::/path/to/secret` reads the first line of the file
//! - anything else is taken literally

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("environment variable `{0}` is not set")]
    MissingEnv(String),

    #[error("failed to read secret file {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("secret reference `{0}` resolved to an empty value")]
    Empty(String),
}

/// Resolves a possibly-prefixed secret reference to its value.
///
/// Empty results are errors: an empty token is never a usable credential.
pub fn resolve(value: &str) -> Result<String, SecretError> {
    let resolved = if let Some(var) = value.strip_prefix("env::") {
        std::env::var(var).map_err(|_| SecretError::MissingEnv(var.to_string()))?
    } else if let Some(path) = value.strip_prefix("file::") {
        read_first_line(path)?
    } else {
        value.to_string()
    };

    let resolved = resolved.trim().to_string();
    if resolved.is_empty() {
        return Err(SecretError::Empty(value.to_string()));
    }
    Ok(resolved)
}

/// Whether the value is a reference rather than a literal.
pub fn is_reference(value: &str) -> bool {
    value.starts_with("env::") || value.starts_with("file::")
}

fn read_first_line(path: &str) -> Result<String, SecretError> {
    let path = expand_home(path);
    let content = std::fs::read_to_string(&path).map_err(|source| SecretError::File {
        path: path.clone(),
        source,
    })?;
    Ok(content.lines().next().unwrap_or_default().to_string())
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn plain_text_passthrough() {
        assert_eq!(resolve("abc123").unwrap(), "abc123");
        assert!(!is_reference("abc123"));
    }

    #[test]
    fn empty_literal_is_rejected() {
        assert!(matches!(resolve("  "), Err(SecretError::Empty(_))));
    }

    #[test]
    fn env_prefix_resolves() {
        unsafe {
            std::env::set_var("_BARBERBOT_TEST_TOKEN", "tok-123");
        }
        assert_eq!(resolve("env::_BARBERBOT_TEST_TOKEN").unwrap(), "tok-123");
        assert!(is_reference("env::_BARBERBOT_TEST_TOKEN"));
        unsafe {
            std::env::remove_var("_BARBERBOT_TEST_TOKEN");
        }
    }

    #[test]
    fn env_prefix_missing_var_errors() {
        let err = resolve("env::_BARBERBOT_SURELY_UNSET_98765").unwrap_err();
        assert!(matches!(err, SecretError::MissingEnv(ref v) if v == "_BARBERBOT_SURELY_UNSET_98765"));
        assert!(err.to_string().contains("not set"));
    }

    #[test]
    fn file_prefix_reads_first_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "long-lived-token").unwrap();
        writeln!(file, "ignored").unwrap();
        let reference = format!("file::{}", file.path().display());
        assert_eq!(resolve(&reference).unwrap(), "long-lived-token");
    }

    #[test]
    fn file_prefix_missing_file_errors() {
        let err = resolve("file::/nonexistent/barberbot/secret").unwrap_err();
        assert!(matches!(err, SecretError::File { .. }));
    }
}
