//! `getLeads` and `lockLead`.

use estate_core::error::CoreError;
use estate_core::types::Row;
use estate_db::repositories::LeadRepo;
use serde::Serialize;

use super::id_text;
use crate::engine::lease::{Agent, LeaseGrant};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LockLeadResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(flatten)]
    pub lease: LeaseGrant,
}

/// All leads, newest first.
pub async fn get_leads(state: &AppState) -> AppResult<Vec<Row>> {
    Ok(LeadRepo::list_newest_first(state.ledger.as_ref()).await?)
}

pub async fn lock_lead(state: &AppState, user: &AuthUser, params: Row) -> AppResult<LockLeadResponse> {
    let lead_id = id_text(params.get("leadId"))
        .ok_or_else(|| CoreError::Validation("Missing leadId".into()))?;

    let agent = Agent {
        id: user.id.clone(),
        name: user.name.clone(),
    };
    let lease = state.leases.try_acquire(&lead_id, &agent).await?;

    Ok(LockLeadResponse {
        success: true,
        message: "Lead Locked successfully",
        lease,
    })
}
