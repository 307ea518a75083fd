//! Domain logic for the property & lead admin API.
//!
//! Everything in this crate is pure: no I/O, no async, no shared mutable
//! state. The `db`, `storage` and `api` crates wire these pieces to the
//! ledger, the object store and HTTP.

pub mod clock;
pub mod error;
pub mod hashing;
pub mod keys;
pub mod lease;
pub mod merge;
pub mod roles;
pub mod signing;
pub mod token;
pub mod types;
