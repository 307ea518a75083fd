//! Lead lease engine.
//!
//! Serializes lease read-check-write sequences per lead and applies the
//! 24-hour lease rule on top of the ledger.

pub mod lease;
