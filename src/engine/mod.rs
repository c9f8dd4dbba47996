//! Host side of the execution engine
//!
//! The `declarative` crate plans and applies changes. This module renders
//! plans and summaries and asks the user for confirmation.

pub mod differ;
pub mod executor;

pub use differ::display_diff;
pub use executor::{DialoguerConfirm, print_summary};
