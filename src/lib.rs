// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod autoplay;
pub mod config;
pub mod point;
pub mod runtime;
pub mod sequence;
pub mod session;
pub mod spawn;

/// Frame cadence of the runtime loop in milliseconds.
pub const TICK_RATE_MS: u64 = 50;
