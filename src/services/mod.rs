//! Reflection analytics and the entry creation boundary.
//!
//! The analytics modules are plain functions over already-loaded entries and
//! an explicit "now"; nothing here reads the clock or touches storage except
//! `entries`, which goes through an `EntryWriter`.

pub mod entries;
pub mod insight;
pub mod mood;
pub mod streak;
pub mod summary;
pub mod time_bucket;

#[cfg(test)]
mod test_support;
