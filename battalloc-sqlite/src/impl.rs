//! Repository trait implementations for the SQLite database.

use crate::{Db, Error};
use battalloc_core::ports::Repository;

mod battery;
mod run;

impl Repository for Db {
    type Error = Error;
}
