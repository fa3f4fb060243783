#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod application;
mod failure;
mod reconcile;
mod run;

pub use application::Application;
pub use failure::{AllocationFailure, FailureKind};
pub use reconcile::reconcile;
pub use run::run_allocation;

/// The infrastructure error type of an application's repository
pub type RepositoryError<A> =
    <<A as Application>::Repository as battalloc_core::ports::Repository>::Error;
