//! Decision Policy.
//!
//! [`decide`] is a pure function from collected signal scores and a
//! [`idv_types::PolicyConfig`] to an aggregate confidence, a decision tier,
//! per-signal checks and warnings. [`PolicyStore`] holds the live config and
//! swaps it as a whole.

pub mod decide;
pub mod message;
pub mod store;

pub use decide::{classify, decide, status_for, PolicyDecision};
pub use message::{gate_message, policy_message};
pub use store::PolicyStore;
