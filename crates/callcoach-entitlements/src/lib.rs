//! Entitlements engine for callcoach simulated sales calls.
//!
//! This crate decides whether a user may place a simulated sales call, how
//! long that call may run, which AI personalities are reachable, and whether
//! usage has crossed into billable overage. It reconciles four independent
//! sources of truth:
//!
//! - **`TrialCreditLedger`**: remaining trial call credits and pack
//!   repurchase eligibility
//! - **`SubscriptionStatusResolver`**: normalized plan and lifecycle status
//! - **`UsageMeter`**: consumed vs. allotted tokens and the overage flag
//! - **`PersonalityCatalog`**: the tier-gated personality roster
//!
//! [`EntitlementsEngine::compute`] is the only entry point other parts of
//! the system may call. Computing entitlements never mutates billing state:
//! the single write on the read path is the idempotent
//! account-creation-on-first-access.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use callcoach_entitlements::{EntitlementsConfig, EntitlementsEngine, PersonalityCatalog};
//! use callcoach_store::RocksStore;
//!
//! let store = Arc::new(RocksStore::open("/tmp/callcoach-db").unwrap());
//! let engine = EntitlementsEngine::new(
//!     store,
//!     PersonalityCatalog::default(),
//!     EntitlementsConfig::default(),
//! )
//! .unwrap();
//!
//! let entitlements = engine.compute("user_2fT9qLx8").unwrap();
//! if entitlements.can_call {
//!     println!("dial away, up to {}s", entitlements.max_call_duration_seconds);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod meter;
pub mod resolver;

pub use catalog::PersonalityCatalog;
pub use config::EntitlementsConfig;
pub use engine::{EntitlementsEngine, ACTIVE_OVERAGE_ALLOWS_CALLS, PAST_DUE_GRACE_ALLOWS_CALLS};
pub use error::{ConfigError, EntitlementsError};
pub use ledger::TrialCreditLedger;
pub use meter::UsageMeter;
pub use resolver::{ResolvedSubscription, SubscriptionStatusResolver};
