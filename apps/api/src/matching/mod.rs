//! Smart tender matcher: match-profile inference, additive scoring,
//! alert writing, and the all-users batch run. Scoring is pure and
//! fully testable; only the alert writer and batch touch the database.

pub mod alert_writer;
pub mod batch;
pub mod handlers;
pub mod profile;
pub mod scorer;
