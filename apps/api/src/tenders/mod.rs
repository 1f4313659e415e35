//! Tender browsing, bookmarking, and the status-expiry sweep.

pub mod handlers;
pub mod queries;
