//! Logging integration for autoform.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-field spans.

use crate::settings::Settings;

/// The crates whose events `log_level` controls when it names a bare level.
pub const LOG_TARGETS: [&str; 3] = ["autoform_core", "autoform_db", "autoform_forms"];

/// Turns `log_level` into filter directives.
///
/// A bare level (`"debug"`) applies to [`LOG_TARGETS`] while every other
/// target stays at `warn`, so the host's own logging is left alone. Anything
/// else is taken as a full `EnvFilter` directive string.
///
/// # Examples
///
/// ```
/// use autoform_core::logging::filter_directives;
///
/// assert_eq!(
///     filter_directives("debug"),
///     "warn,autoform_core=debug,autoform_db=debug,autoform_forms=debug"
/// );
/// assert_eq!(filter_directives("autoform_forms=trace"), "autoform_forms=trace");
/// ```
pub fn filter_directives(log_level: &str) -> String {
    let level = log_level.trim().to_ascii_lowercase();
    if !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error" | "off") {
        return log_level.trim().to_string();
    }

    std::iter::once("warn".to_string())
        .chain(LOG_TARGETS.iter().map(|target| format!("{target}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs the global tracing subscriber for a host application.
///
/// Call once at startup. Events are filtered by [`filter_directives`]. In
/// debug mode they are printed in a pretty, human-readable format; otherwise
/// as flattened JSON lines carrying the enclosing [`field_span`]. An invalid
/// filter falls back to `info` for [`LOG_TARGETS`]. Installing a subscriber
/// twice is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(filter_directives(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new(filter_directives("info")));

    let installed = if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .is_ok()
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::debug!(debug = settings.debug, log_level = %settings.log_level, "logging installed");
    }
}

/// Creates a tracing span for building a single form field.
///
/// # Examples
///
/// ```
/// use autoform_core::logging::field_span;
///
/// let span = field_span("json_type", "payload");
/// let _guard = span.enter();
/// tracing::debug!("building field");
/// ```
pub fn field_span(block_prefix: &str, name: &str) -> tracing::Span {
    tracing::debug_span!("field", block_prefix = block_prefix, name = name)
}
