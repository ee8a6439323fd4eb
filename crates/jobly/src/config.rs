//! Database configuration from the environment.
//!
//! | variable             | meaning                                             |
//! |----------------------|-----------------------------------------------------|
//! | `JOBLY_ENV`          | `test` selects `DATABASE_URL_TEST`                  |
//! | `DATABASE_URL`       | connection URL (default `postgresql:///jobly`)      |
//! | `DATABASE_URL_TEST`  | test URL (default `postgresql:///jobly_test`)       |
//! | `DATABASE_POOL_SIZE` | max pooled connections (default 16)                 |
//!
//! URLs may reference other variables as `${NAME}`.

use crate::error::{JoblyError, JoblyResult};

const DEFAULT_URL: &str = "postgresql:///jobly";
const DEFAULT_TEST_URL: &str = "postgresql:///jobly_test";
const DEFAULT_POOL_SIZE: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: String,
    pub pool_max_size: usize,
}

impl DbConfig {
    /// Load from the process environment, after reading `.env` if there is one.
    pub fn from_env() -> JoblyResult<Self> {
        // A missing .env file is the normal case outside development.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> JoblyResult<Self> {
        let testing = lookup("JOBLY_ENV").is_some_and(|v| v == "test");
        let raw_url = if testing {
            lookup("DATABASE_URL_TEST").unwrap_or_else(|| DEFAULT_TEST_URL.to_string())
        } else {
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_URL.to_string())
        };
        let url = expand_env_vars(&raw_url, &lookup)?;

        let pool_max_size = match lookup("DATABASE_POOL_SIZE") {
            None => DEFAULT_POOL_SIZE,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(JoblyError::Config(format!(
                        "DATABASE_POOL_SIZE must be a positive integer, got {raw:?}"
                    )));
                }
            },
        };

        tracing::debug!(testing, pool_max_size, "database config loaded");
        Ok(Self { url, pool_max_size })
    }
}

fn expand_env_vars(input: &str, lookup: &impl Fn(&str) -> Option<String>) -> JoblyResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                return Err(JoblyError::Config(format!(
                    "unterminated env var reference: ${{{key}}}"
                )));
            }
            if key.is_empty() {
                return Err(JoblyError::Config(
                    "invalid env var reference: ${}".to_string(),
                ));
            }

            let v = lookup(&key).ok_or_else(|| {
                JoblyError::Config(format!("missing env var for config expansion: {key}"))
            })?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}
