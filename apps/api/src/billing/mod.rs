//! Paystack billing: plan catalog, payment initialization and
//! verification, subscription state, and the expiry sweep.

pub mod handlers;
pub mod paystack;
pub mod plans;
pub mod subscriptions;
