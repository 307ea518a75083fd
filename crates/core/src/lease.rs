//! Lead lease rule.
//!
//! A lead is held by `locked_by` for [`LEASE_WINDOW_HOURS`] from
//! `locked_at`. Acquisition by the current holder, or by anyone once the
//! window has passed, renews the lease from "now".

use chrono::TimeDelta;

use crate::types::Timestamp;

pub const LEASE_WINDOW_HOURS: i64 = 24;

pub fn lease_window() -> TimeDelta {
    TimeDelta::hours(LEASE_WINDOW_HOURS)
}

/// Lock columns of a lead row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockState {
    pub locked_by: Option<String>,
    pub locked_at: Option<Timestamp>,
}

impl LockState {
    /// The active holder at `now`, if any.
    ///
    /// A holder with a missing `locked_at` is treated as expired.
    pub fn active_holder(&self, now: Timestamp) -> Option<(&str, Timestamp)> {
        let holder = self.locked_by.as_deref().filter(|h| !h.is_empty())?;
        let since = self.locked_at?;
        (now - since < lease_window()).then_some((holder, since))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaseDecision {
    /// Write the lease for the requesting agent.
    Grant,
    /// Another agent holds an unexpired lease.
    Held { holder: String, since: Timestamp },
}

pub fn evaluate(state: &LockState, agent_id: &str, now: Timestamp) -> LeaseDecision {
    match state.active_holder(now) {
        Some((holder, since)) if holder != agent_id => LeaseDecision::Held {
            holder: holder.to_string(),
            since,
        },
        _ => LeaseDecision::Grant,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn held_by(agent: &str, at: Timestamp) -> LockState {
        LockState {
            locked_by: Some(agent.to_string()),
            locked_at: Some(at),
        }
    }

    #[test]
    fn unlocked_lead_is_granted() {
        assert_eq!(evaluate(&LockState::default(), "a", t0()), LeaseDecision::Grant);
    }

    #[test]
    fn empty_holder_is_unlocked() {
        let state = LockState {
            locked_by: Some(String::new()),
            locked_at: Some(t0()),
        };
        assert_eq!(evaluate(&state, "a", t0()), LeaseDecision::Grant);
    }

    #[test]
    fn other_holder_within_window_is_held() {
        let state = held_by("a", t0());
        let now = t0() + TimeDelta::hours(23);
        assert_eq!(
            evaluate(&state, "b", now),
            LeaseDecision::Held {
                holder: "a".to_string(),
                since: t0()
            }
        );
    }

    #[test]
    fn same_holder_renews() {
        let state = held_by("a", t0());
        assert_eq!(evaluate(&state, "a", t0() + TimeDelta::hours(1)), LeaseDecision::Grant);
    }

    #[test]
    fn lease_expires_at_exactly_24_hours() {
        let state = held_by("a", t0());
        assert!(matches!(
            evaluate(&state, "b", t0() + lease_window() - TimeDelta::milliseconds(1)),
            LeaseDecision::Held { .. }
        ));
        assert_eq!(evaluate(&state, "b", t0() + lease_window()), LeaseDecision::Grant);
    }

    #[test]
    fn holder_without_timestamp_is_expired() {
        let state = LockState {
            locked_by: Some("a".to_string()),
            locked_at: None,
        };
        assert_eq!(evaluate(&state, "b", t0()), LeaseDecision::Grant);
    }
}
