//! Skip policy for suites that need the embedded PostgreSQL cluster.
//!
//! Set `SKIP_TEST_CLUSTER` to `1`, `true` or `yes` on hosts that cannot run
//! PostgreSQL; affected tests then print a `SKIP-TEST-CLUSTER` marker and
//! return early instead of failing.

/// Whether cluster-backed tests should be skipped on this host.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Turn a cluster setup failure into a skip or a loud panic.
///
/// Returns `None` when skipping is enabled, so callers can use the result
/// directly as an `Option<Context>` fixture value.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
