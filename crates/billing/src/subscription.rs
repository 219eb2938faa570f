//! Billing snapshot and the subscription predicate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subscription status as last reported by the billing provider.
///
/// `Canceling` still entitles the team: the subscription runs until the end
/// of the paid period.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    Canceling,
    PastDue,
    Canceled,
    Incomplete,
}

impl SubscriptionStatus {
    fn entitles(self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Active | SubscriptionStatus::Trialing | SubscriptionStatus::Canceling
        )
    }
}

/// The team's billing state, denormalized onto the team row.
///
/// `manual_trial_ends_at` is an operator-granted trial independent of the
/// billing provider; `manual_trial_grant_count` tracks how many times such a
/// trial was granted (an anti-abuse counter, not consulted by the gate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BillingSnapshot {
    pub stripe_subscription_status: Option<SubscriptionStatus>,
    pub manual_trial_ends_at: Option<DateTime<Utc>>,
    pub manual_trial_grant_count: u32,
}

impl BillingSnapshot {
    pub fn with_status(status: SubscriptionStatus) -> Self {
        Self {
            stripe_subscription_status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_manual_trial(ends_at: DateTime<Utc>) -> Self {
        Self {
            manual_trial_ends_at: Some(ends_at),
            manual_trial_grant_count: 1,
            ..Self::default()
        }
    }
}

/// Decide whether team-scoped gated features are reachable.
///
/// Active when the provider status entitles, OR a manual trial expiry lies
/// strictly in the future.
pub fn is_subscription_active(snapshot: &BillingSnapshot, now: DateTime<Utc>) -> bool {
    if snapshot
        .stripe_subscription_status
        .is_some_and(SubscriptionStatus::entitles)
    {
        return true;
    }

    snapshot
        .manual_trial_ends_at
        .is_some_and(|ends_at| ends_at > now)
}
