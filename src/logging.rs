//! Logger installation with a suppression list for known-benign diagnostics.
//!
//! The global logger is installed once. Suppression happens at the sink:
//! records whose message contains a listed pattern are dropped. Patterns are
//! either configured for the process lifetime or attached to one request's
//! future through [`quietly`], so they never leak into concurrent requests.

use std::future::Future;

use log::{Log, Metadata, Record};

tokio::task_local! {
    static SCOPED: Vec<String>;
}

/// Patterns suppressed for the whole process.
#[derive(Clone, Default)]
pub struct Suppressions {
    patterns: Vec<String>,
}

impl Suppressions {
    pub fn new(patterns: Vec<String>) -> Self {
        Suppressions { patterns }
    }

    /// True when a process-wide pattern, or one scoped to the task being
    /// polled, occurs in `message`.
    pub fn matches(&self, message: &str) -> bool {
        self.patterns.iter().any(|p| message.contains(p.as_str())) || scoped_match(message)
    }
}

fn scoped_match(message: &str) -> bool {
    SCOPED
        .try_with(|patterns| patterns.iter().any(|p| message.contains(p.as_str())))
        .unwrap_or(false)
}

/// Run `fut` with `patterns` suppressed while it is being polled. Nested
/// scopes add to the enclosing one.
pub async fn quietly<F: Future>(patterns: &[&str], fut: F) -> F::Output {
    let mut all = SCOPED.try_with(Clone::clone).unwrap_or_default();
    all.extend(patterns.iter().map(|p| p.to_string()));
    SCOPED.scope(all, fut).await
}

pub struct FilteredLogger<L: Log> {
    inner: L,
    suppressions: Suppressions,
}

impl<L: Log> FilteredLogger<L> {
    pub fn new(inner: L, suppressions: Suppressions) -> Self {
        FilteredLogger { inner, suppressions }
    }
}

impl<L: Log> Log for FilteredLogger<L> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.inner.enabled(record.metadata()) {
            return;
        }
        if self.suppressions.matches(&record.args().to_string()) {
            return;
        }
        self.inner.log(record);
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Install env_logger (`RUST_LOG`, default `info`) behind the suppression filter.
pub fn init(patterns: Vec<String>) {
    let inner = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).build();
    let max_level = inner.filter();
    let logger = FilteredLogger::new(inner, Suppressions::new(patterns));
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(max_level);
    }
}
