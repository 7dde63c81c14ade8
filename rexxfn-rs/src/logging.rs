//! Tracing subscriber setup for the `rexxfn` binary.
//!
//! Events go to stderr so they never mix with command results on stdout.
//! The filter comes from `REXXFN_LOG` (any `EnvFilter` directive string);
//! without it the level is `warn`, or `debug` when `-d` was given.

use std::env;

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "REXXFN_LOG";

#[derive(Debug, Error)]
pub enum TracingError {
    #[error("invalid REXXFN_LOG directive: {0}")]
    Filter(String),

    #[error("failed to initialize tracing: {0}")]
    Init(String),
}

/// Level used when `REXXFN_LOG` is unset.
pub fn default_level(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "warn"
    }
}

/// Build the filter: `REXXFN_LOG` wins over the `-d` default.
pub fn build_filter(debug: bool) -> Result<EnvFilter, TracingError> {
    match env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => {
            EnvFilter::try_new(&directives).map_err(|e| TracingError::Filter(e.to_string()))
        }
        _ => Ok(EnvFilter::new(default_level(debug))),
    }
}

/// Install the global subscriber.  Fails if one is already installed.
pub fn init_tracing(debug: bool) -> Result<(), TracingError> {
    let filter = build_filter(debug)?;
    let layer = fmt::layer()
        .compact()
        .with_target(debug)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| TracingError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_levels() {
        assert_eq!(default_level(false), "warn");
        assert_eq!(default_level(true), "debug");
    }

    #[test]
    fn error_messages_name_the_variable() {
        let e = TracingError::Filter("bad".into());
        assert_eq!(e.to_string(), "invalid REXXFN_LOG directive: bad");
    }
}
