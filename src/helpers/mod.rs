//! Helper functions for presenting the feed
//!
//! Date formatting for entries and the plain-text renderings the CLI prints.

mod date;
mod list;

pub use date::*;
pub use list::*;
