//! Exclusive lead leases.
//!
//! The ledger has no transactions, so the check-then-write sequence of a
//! lock request runs under a [`LeaseGuard`] keyed by lead id. A caller that
//! cannot take the guard within the configured wait gets
//! [`CoreError::LockContended`] and nothing is written.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::SubsecRound;
use estate_core::clock::Clock;
use estate_core::error::CoreError;
use estate_core::lease::{self, LeaseDecision};
use estate_core::types::Timestamp;
use estate_db::repositories::LeadRepo;
use estate_db::Ledger;
use serde::Serialize;
use tokio::sync::OwnedMutexGuard;

use crate::error::AppResult;

/// Number of idle per-lead mutexes tolerated before the map is pruned.
const PRUNE_THRESHOLD: usize = 1024;

/// Held guard; released on drop.
pub struct GuardHandle {
    _held: Box<dyn Send + Sync>,
}

impl std::fmt::Debug for GuardHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardHandle").finish_non_exhaustive()
    }
}

/// Mutual exclusion around one lead's read-check-write sequence.
#[async_trait]
pub trait LeaseGuard: Send + Sync {
    /// Take the guard for `key`, waiting at most `wait`.
    async fn acquire(&self, key: &str, wait: Duration) -> Result<GuardHandle, CoreError>;
}

/// In-process guard: one async mutex per lead id.
#[derive(Default)]
pub struct InProcessGuard {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl InProcessGuard {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|p| p.into_inner());
        if locks.len() > PRUNE_THRESHOLD {
            locks.retain(|_, m| Arc::strong_count(m) > 1);
        }
        Arc::clone(locks.entry(key.to_string()).or_default())
    }
}

#[async_trait]
impl LeaseGuard for InProcessGuard {
    async fn acquire(&self, key: &str, wait: Duration) -> Result<GuardHandle, CoreError> {
        let slot = self.slot(key);
        let held: OwnedMutexGuard<()> = tokio::time::timeout(wait, slot.lock_owned())
            .await
            .map_err(|_| CoreError::LockContended {
                lead_id: key.to_string(),
            })?;
        Ok(GuardHandle {
            _held: Box::new(held),
        })
    }
}

/// The agent asking for a lease.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: String,
    pub name: String,
}

/// A granted lease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaseGrant {
    pub granted: bool,
    pub holder: String,
    pub since: Timestamp,
}

pub struct LeaseManager {
    ledger: Arc<dyn Ledger>,
    guard: Arc<dyn LeaseGuard>,
    clock: Arc<dyn Clock>,
    wait: Duration,
}

impl LeaseManager {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        guard: Arc<dyn LeaseGuard>,
        clock: Arc<dyn Clock>,
        wait: Duration,
    ) -> Self {
        Self {
            ledger,
            guard,
            clock,
            wait,
        }
    }

    /// Grant `agent` the lease on `lead_id`, or report who holds it.
    ///
    /// Granting (or renewing) writes `locked_by`, `locked_at`, the
    /// "In Progress" status and `agent_assigned` in one row write.
    pub async fn try_acquire(&self, lead_id: &str, agent: &Agent) -> AppResult<LeaseGrant> {
        let _guard = self.guard.acquire(lead_id, self.wait).await?;

        let lead = LeadRepo::find(self.ledger.as_ref(), lead_id)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity: "Lead",
                id: lead_id.to_string(),
            })?;

        // The ledger stores millisecond timestamps.
        let now = self.clock.now().trunc_subsecs(3);
        match lease::evaluate(&lead.lock_state(), &agent.id, now) {
            LeaseDecision::Held { holder, since } => {
                Err(CoreError::LeadAlreadyLocked { holder, since }.into())
            }
            LeaseDecision::Grant => {
                LeadRepo::write_lease(self.ledger.as_ref(), lead_id, &agent.id, &agent.name, now)
                    .await?;
                tracing::info!(lead_id, agent_id = %agent.id, "Lead locked");
                Ok(LeaseGrant {
                    granted: true,
                    holder: agent.id.clone(),
                    since: now,
                })
            }
        }
    }
}
