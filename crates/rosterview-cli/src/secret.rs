//! `[credentials]` values that live outside `config.toml`.
//!
//! A roster login is usually shared with other tools, so the email and
//! password may name where to find them instead of holding them:
//!
//! - `pass::roster/login` takes the first line of `pass show roster/login`
//! - `env::ROSTER_PASSWORD` reads that variable at startup
//!
//! Values without either prefix are literal. The `EMAIL`/`PASSWORD` fallback
//! applies only when the key is absent, see `RosterConfig::resolve_credentials`.

use rosterview_core::ConfigError;

/// A credential value as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SecretRef<'a> {
    Pass(&'a str),
    Env(&'a str),
    Literal(&'a str),
}

impl<'a> SecretRef<'a> {
    fn parse(value: &'a str) -> Self {
        if let Some(entry) = value.strip_prefix("pass::") {
            Self::Pass(entry)
        } else if let Some(var) = value.strip_prefix("env::") {
            Self::Env(var)
        } else {
            Self::Literal(value)
        }
    }
}

/// Whether `value` points at a password store entry or an env var.
///
/// `config dump` keeps such values visible since they hold no secret.
pub fn is_reference(value: &str) -> bool {
    !matches!(SecretRef::parse(value), SecretRef::Literal(_))
}

/// Turns a `[credentials]` value into the string sent at login.
pub fn resolve(value: &str) -> Result<String, ConfigError> {
    match SecretRef::parse(value) {
        SecretRef::Pass(entry) => read_pass_entry(entry),
        SecretRef::Env(var) => std::env::var(var).map_err(|_| {
            ConfigError::Secret(format!("environment variable `{}` is not set", var))
        }),
        SecretRef::Literal(literal) => Ok(literal.to_string()),
    }
}

// Only the first line counts; pass entries often carry extra metadata below.
fn read_pass_entry(entry: &str) -> Result<String, ConfigError> {
    let output = std::process::Command::new("pass")
        .args(["show", entry])
        .output()
        .map_err(|e| ConfigError::Secret(format!("cannot run `pass show {}`: {}", entry, e)))?;

    if !output.status.success() {
        return Err(ConfigError::Secret(format!(
            "`pass show {}` exited with {}: {}",
            entry,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::Secret(format!("pass entry `{}` is empty", entry)))
}
