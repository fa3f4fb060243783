mod allocation;
pub use allocation::*;

mod battery;
pub use battery::*;

mod command;
pub use command::*;

mod ids;
pub use ids::*;

mod measurement;
pub use measurement::*;

mod phase;
pub use phase::*;

mod reconciliation;
pub use reconciliation::*;

mod volume;
pub use volume::*;

pub use well_test::*;

/// The deterministic hasher used by every ordered collection in the models.
///
/// Well ordering is part of the allocation contract, so we rely on
/// `indexmap` for its insertion-ordered semantics and pair it with a
/// non-randomized hasher so iteration never depends on process state.
pub type FxBuildHasher = rustc_hash::FxBuildHasher;

/// An insertion-ordered set with deterministic hashing.
pub type OrderedSet<T> = indexmap::IndexSet<T, FxBuildHasher>;
