//! Capacities and limits for an interpreter session.

/// Pair/closure storage, in value slots. Each pair takes two.
pub const DEFAULT_ARENA_SLOTS: usize = 1 << 16;

/// Bytes available to interned symbol names, terminators included.
pub const DEFAULT_SYMBOL_BYTES: usize = 1 << 14;

/// Longest token the reader collects before splitting it.
pub const DEFAULT_TOKEN_MAX: usize = 39;

/// Maximum nesting of `eval` before the session is aborted.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub arena_slots: usize,
    pub symbol_bytes: usize,
    pub token_max: usize,
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            arena_slots: DEFAULT_ARENA_SLOTS,
            symbol_bytes: DEFAULT_SYMBOL_BYTES,
            token_max: DEFAULT_TOKEN_MAX,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
