#![warn(missing_docs)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

/// Core domain models for production allocation.
///
/// This module contains the value types the allocation engine consumes and
/// produces. They are plain data with construction-time validation and no
/// persistence or processing logic, keeping the domain separate from the
/// adapters that store and compute it.
pub mod models;

/// Interface traits for production allocation.
///
/// This module contains the "ports" in the hexagonal architecture pattern:
/// the repository contracts a storage adapter fulfils, and the strategy
/// contract an allocation algorithm fulfils. Nothing here prescribes how
/// either is implemented.
pub mod ports;
