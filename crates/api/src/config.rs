use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use roster_core::images::DEFAULT_MAX_UPLOAD_BYTES;

use crate::auth::jwt::JwtConfig;

/// Runtime settings, read once at startup.
///
/// | Env Var                | Default                 |
/// |------------------------|-------------------------|
/// | `HOST`                 | `0.0.0.0`               |
/// | `PORT`                 | `3000`                  |
/// | `CORS_ORIGINS`         | `http://localhost:5173` |
/// | `REQUEST_TIMEOUT_SECS` | `30`                    |
/// | `MEDIA_ROOT`           | `media`                 |
/// | `MAX_UPLOAD_BYTES`     | `5242880`               |
/// | `LOGIN_URL`            | `/login/`               |
///
/// JWT settings come from [`JwtConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated in `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Uploaded images are written below this directory and served at `/media`.
    pub media_root: PathBuf,
    /// Per-image limit; the request body limit is derived from it.
    pub max_upload_bytes: usize,
    /// Login-only pages redirect anonymous callers here.
    pub login_url: String,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Panics on malformed values; a bad config should stop the server at boot.
    pub fn from_env() -> Self {
        Self {
            host: var_or("HOST", "0.0.0.0"),
            port: parsed_var_or("PORT", 3000),
            cors_origins: split_origins(&var_or("CORS_ORIGINS", "http://localhost:5173")),
            request_timeout_secs: parsed_var_or("REQUEST_TIMEOUT_SECS", 30),
            media_root: PathBuf::from(var_or("MEDIA_ROOT", "media")),
            max_upload_bytes: parsed_var_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            login_url: var_or("LOGIN_URL", "/login/"),
            jwt: JwtConfig::from_env(),
        }
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parsed_var_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            split_origins(" http://a.test, ,http://b.test ,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn unset_numeric_vars_fall_back() {
        let value: u64 = parsed_var_or("ROSTER_TEST_SURELY_UNSET_VAR", 42);
        assert_eq!(value, 42);
    }
}
