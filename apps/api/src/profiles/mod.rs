//! User profiles and matching preferences.

pub mod handlers;
pub mod queries;
