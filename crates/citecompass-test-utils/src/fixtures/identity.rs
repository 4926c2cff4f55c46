//! Identities that do not collide in the process-wide registry.

use std::sync::atomic::{AtomicUsize, Ordering};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A fresh identity such as `tests::solver#3`.
///
/// Tests run in parallel against one process-wide registry, so each test that
/// registers entries by name should use its own identities.
pub fn unique_identity(prefix: &str) -> String {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}#{n}")
}
