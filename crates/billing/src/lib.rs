//! `stockpile-billing`: subscription gate.
//!
//! Separates "authorized" from "entitled": a fully-permissioned team admin is
//! still blocked when the team's subscription lapsed. Pure predicate; the
//! billing snapshot is supplied by the caller (already loaded during
//! authorization) and `now` is an argument for testability.

pub mod subscription;

pub use subscription::{is_subscription_active, BillingSnapshot, SubscriptionStatus};
