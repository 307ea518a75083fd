//! Well-known role name constants.
//!
//! These must match the `role` column values of the `Users` sheet.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_AGENT: &str = "agent";
