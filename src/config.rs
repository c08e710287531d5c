// ABOUTME: Runtime tunables for an embedded interpreter instance.

/// Host-facing knobs for an `Interpreter`. Plain data, no config-file
/// crate involved -- a host that wants to tune GC cadence for a
/// latency-sensitive program does so by constructing a `Config`, not by
/// recompiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Trampoline iterations between forced collections. Allocation itself
    /// never triggers a collection; only the iteration counter does.
    pub gc_trigger_interval: usize,
    /// Max code points retained in the last-error diagnostics buffer.
    pub last_error_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gc_trigger_interval: 10_000,
            last_error_capacity: 200,
        }
    }
}
