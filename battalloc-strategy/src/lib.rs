/**
 * Fixed-point proportional splitting with an exact-conservation fix-up.
 */
mod split;
pub use split::{rate_weights, split_proportionally};

/**
 * These are implementations of the allocation strategy port.
 */
mod proportional;
pub use proportional::{PROPORTIONAL_BY_TEST, ProportionalByTest};

/**
 * Method-name lookup for strategies.
 */
mod registry;
pub use registry::{StrategyRegistry, UnknownMethod, UnknownMethodPolicy};
