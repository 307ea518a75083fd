//! Sheet-level operations built on [`Ledger`](crate::Ledger).

pub mod lead_repo;
pub mod property_repo;
pub mod user_repo;

pub use lead_repo::LeadRepo;
pub use property_repo::PropertyRepo;
pub use user_repo::UserRepo;
