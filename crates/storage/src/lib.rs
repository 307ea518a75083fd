//! Object-store access for property images.
//!
//! - [`store::ObjectStore`] -- the COPY/DELETE seam.
//! - [`client::S3Client`] -- executes SigV4-signed requests with `reqwest`.
//! - [`memory::MemoryObjectStore`] -- in-process store for tests and local runs.
//! - [`lifecycle::ImageLifecycle`] -- temp → permanent and permanent → archive moves.

pub mod client;
pub mod error;
pub mod lifecycle;
pub mod memory;
pub mod store;

pub use client::S3Client;
pub use error::StorageError;
pub use lifecycle::ImageLifecycle;
pub use memory::MemoryObjectStore;
pub use store::ObjectStore;
