//! Default configuration values shared between the engine and the CLI
//!
//! These constants ensure consistent defaults across all podtrace components.

/// Default namespace for submitted runs
pub const DEFAULT_NAMESPACE: &str = "default";

/// Default polling interval for the completion waiter, in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Default generated-name prefix for submitted runs
pub const DEFAULT_RUN_NAME_PREFIX: &str = "hello-world-run-";

/// Default run template name
pub const DEFAULT_TEMPLATE_NAME: &str = "hello-world";

/// Returns the default namespace
pub fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}
