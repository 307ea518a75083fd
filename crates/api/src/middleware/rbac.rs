//! Role checks on an authenticated caller.

use estate_core::error::CoreError;
use estate_core::roles::ROLE_ADMIN;

use super::auth::AuthUser;
use crate::error::AppError;

/// An [`AuthUser`] proven to hold the `admin` role.
#[derive(Debug)]
pub struct RequireAdmin(pub AuthUser);

impl TryFrom<AuthUser> for RequireAdmin {
    type Error = AppError;

    fn try_from(user: AuthUser) -> Result<Self, Self::Error> {
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
