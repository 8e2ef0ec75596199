//! Logging setup for hosts embedding the core
//!
//! The crate only emits `tracing` events: index lifecycle changes at
//! info, timings at trace. Rendering them is the embedding server's
//! job; [`init`] installs a global stderr subscriber for hosts that
//! do not bring their own.

use std::io;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter applied when neither the host nor the environment asks for
/// anything else: warnings from this crate only.
const DEFAULT_DIRECTIVE: &str = "flatmark=warn";

/// Output format for the subscriber installed by [`init`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Single-line human-readable output
    #[default]
    Compact,
    /// One JSON object per event, for log shippers
    Json,
}

/// Install a global `tracing` subscriber writing to stderr.
///
/// An explicit `directive` wins; a bare level such as `"debug"` is
/// scoped to this crate, anything containing `=` is taken as a full
/// filter spec. Without a directive the `FLATMARK_LOG` and `RUST_LOG`
/// environment variables are consulted in that order before falling
/// back to [`DEFAULT_DIRECTIVE`]. Fails if a global subscriber is
/// already set.
pub fn init(directive: Option<&str>, format: LogFormat) -> Result<(), Box<dyn std::error::Error>> {
    let registry = tracing_subscriber::registry().with(resolve_filter(directive)?);
    let base = fmt::layer().with_writer(io::stderr).with_ansi(false);

    match format {
        LogFormat::Json => registry.with(base.json()).try_init()?,
        LogFormat::Compact => registry.with(base.compact().with_target(false)).try_init()?,
    }

    Ok(())
}

fn resolve_filter(directive: Option<&str>) -> Result<EnvFilter, Box<dyn std::error::Error>> {
    if let Some(spec) = directive {
        let spec = if spec.contains('=') {
            spec.to_string()
        } else {
            format!("flatmark={spec}")
        };
        return Ok(EnvFilter::try_new(spec)?);
    }

    for var in ["FLATMARK_LOG", "RUST_LOG"] {
        if let Ok(filter) = EnvFilter::try_from_env(var) {
            return Ok(filter);
        }
    }

    Ok(EnvFilter::new(DEFAULT_DIRECTIVE))
}
